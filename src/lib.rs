//! # mongoutils
//!
//! Fluent MongoDB document and pipeline builders with batched counter updates.
//!
//! mongoutils provides:
//! - Ordered document and aggregation pipeline builders over `bson`
//! - Operator helpers for `$in`, `$set`, `$match` and regex filters
//! - A counter aggregator that turns many per-document increments into a
//!   few `updateMany` calls
//! - A base model trait with lifecycle hooks and timestamp bookkeeping
//!
//! ## Quick Start
//!
//! ```rust
//! use mongoutils::prelude::*;
//!
//! let pipeline = PipelineBuilder::new()
//!     .match_stage(|d| d.add("published", true))
//!     .lookup("users", "author_id", "_id", "_author")
//!     .unwrap("$_author", "author")
//!     .un_project(["_author"])
//!     .build();
//! assert_eq!(pipeline.len(), 4);
//!
//! let post = ObjectId::new();
//! let mut counter = MetaCounter::new();
//! counter.add("posts", "views", post, 1).add("posts", "views", post, 1);
//!
//! let batches = counter.aggregate();
//! assert_eq!(batches[0].update_doc(), doc! { "$inc": { "views": 2_i64 } });
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use mongoutils_core::{
    Bson, CounterFlushReport, DocBuilder, Document, MetaCounter, MetaQuery, Model, MongoClient,
    MongoConfig, MongoConfigBuilder, MongoError, MongoResult, ObjectId, PipelineBuilder,
    Timestamps, doc, from_document, is_valid_object_id, new_object_id, parse_object_id,
    to_document,
};

/// Operator helpers such as `$in` and `$set`.
pub mod operators {
    pub use mongoutils_core::operators::*;
}

/// Logging initialisation.
pub mod logging {
    pub use mongoutils_core::logging::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use mongoutils_core::prelude::*;
}
