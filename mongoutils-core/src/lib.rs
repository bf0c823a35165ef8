//! # mongoutils-core
//!
//! Fluent builders for MongoDB documents and aggregation pipelines, plus a
//! counter aggregator that batches per-document increments.
//!
//! This crate provides:
//! - [`DocBuilder`] for ordered BSON documents
//! - [`PipelineBuilder`] for aggregation pipelines
//! - Operator helpers (`$in`, `$set`, `$match`, regex)
//! - [`MetaCounter`] to merge counter updates into `updateMany` batches
//! - A base [`Model`](model::Model) trait with lifecycle hooks and timestamps
//!
//! ## Example
//!
//! ```rust
//! use mongoutils_core::{DocBuilder, PipelineBuilder, operators};
//!
//! let filter = operators::in_("status", ["draft", "review"]);
//! let pipeline = PipelineBuilder::new()
//!     .add_stage(operators::match_(filter))
//!     .group(|d| d.add("_id", "$author").nested("posts", "$sum", 1))
//!     .build();
//!
//! assert_eq!(pipeline.len(), 2);
//! let _ = DocBuilder::new().add("name", "Jack").build();
//! ```
//!
//! ## Flushing counters
//!
//! ```rust,ignore
//! use mongoutils_core::{MetaCounter, MongoClient, MongoConfig};
//!
//! let client = MongoClient::new(MongoConfig::from_uri("mongodb://localhost:27017", "blog")).await?;
//!
//! let mut counter = MetaCounter::new();
//! counter.add("posts", "views", post_id, 1);
//! client.apply_counters(&counter).await?;
//! ```

pub mod client;
pub mod config;
pub mod counter;
pub mod document;
pub mod error;
pub mod logging;
pub mod model;
pub mod object_id;
pub mod operators;
pub mod pipeline;

pub use bson::oid::ObjectId;
pub use bson::{Bson, Document, doc};
pub use client::{CounterFlushReport, MongoClient};
pub use config::{MongoConfig, MongoConfigBuilder};
pub use counter::{MetaCounter, MetaQuery};
pub use document::{DocBuilder, from_document, to_document};
pub use error::{MongoError, MongoResult};
pub use model::{Model, Timestamps};
pub use object_id::{is_valid_object_id, new_object_id, parse_object_id};
pub use pipeline::PipelineBuilder;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::client::{CounterFlushReport, MongoClient};
    pub use crate::config::{MongoConfig, MongoConfigBuilder};
    pub use crate::counter::{MetaCounter, MetaQuery};
    pub use crate::document::DocBuilder;
    pub use crate::error::{MongoError, MongoResult};
    pub use crate::model::{Model, Timestamps};
    pub use crate::object_id::{is_valid_object_id, parse_object_id};
    pub use crate::operators;
    pub use crate::pipeline::PipelineBuilder;
    pub use bson::oid::ObjectId;
    pub use bson::{Bson, Document, doc};
}
