//! Aggregation pipeline building.
//!
//! Every stage is built with [`DocBuilder`], so a stage added through
//! [`PipelineBuilder::add`] looks exactly like one produced by the typed
//! helpers.
//!
//! # Example
//!
//! ```rust
//! use mongoutils_core::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new()
//!     .match_stage(|d| d.add("status", "published"))
//!     .lookup("users", "author_id", "_id", "_author")
//!     .unwrap("$_author", "author")
//!     .un_project(["_author"])
//!     .build();
//!
//! assert_eq!(pipeline.len(), 4);
//! ```

use bson::{Bson, Document};

use crate::document::{DocBuilder, to_array};

/// Builder for aggregation pipelines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineBuilder {
    stages: Vec<Document>,
}

impl PipelineBuilder {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stage built by `f`.
    pub fn add<F>(mut self, f: F) -> Self
    where
        F: FnOnce(DocBuilder) -> DocBuilder,
    {
        self.stages.push(f(DocBuilder::new()).build());
        self
    }

    /// Add a pre-built stage.
    pub fn add_stage(mut self, stage: Document) -> Self {
        self.stages.push(stage);
        self
    }

    /// Add a $lookup stage (left outer join).
    pub fn lookup(self, from: &str, local_field: &str, foreign_field: &str, as_field: &str) -> Self {
        self.add(|d| {
            d.doc("$lookup", |d| {
                d.add("from", from)
                    .add("localField", local_field)
                    .add("foreignField", foreign_field)
                    .add("as", as_field)
            })
        })
    }

    /// Add an $unwind stage.
    pub fn unwind(self, path: &str, preserve_null_and_empty: bool) -> Self {
        self.add(|d| {
            d.doc("$unwind", |d| {
                d.add("path", path)
                    .add("preserveNullAndEmptyArrays", preserve_null_and_empty)
            })
        })
    }

    /// Replace `as_field` with the first item of the `field` array, using $addFields.
    pub fn unwrap(self, field: &str, as_field: &str) -> Self {
        self.add(|d| d.doc("$addFields", |d| d.nested(as_field, "$first", field)))
    }

    /// Add a $group stage whose body is built by `f`.
    pub fn group<F>(self, f: F) -> Self
    where
        F: FnOnce(DocBuilder) -> DocBuilder,
    {
        self.add(|d| d.doc("$group", f))
    }

    /// Add a $replaceRoot stage.
    pub fn replace_root(self, new_root: impl Into<Bson>) -> Self {
        let new_root = new_root.into();
        self.add(|d| d.doc("$replaceRoot", |d| d.add("newRoot", new_root)))
    }

    /// Add a $replaceRoot stage that merges `fields` with $mergeObjects.
    pub fn merge_root<I, V>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Bson>,
    {
        let fields = to_array(fields);
        self.add(|d| d.doc("$replaceRoot", |d| d.nested("newRoot", "$mergeObjects", fields)))
    }

    /// Add a $project stage that removes `fields` from the result.
    pub fn un_project<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(|d| {
            d.doc("$project", |d| {
                fields.into_iter().fold(d, |d, field| d.add(field, 0))
            })
        })
    }

    /// Add a $match stage whose filter is built by `f`.
    pub fn match_stage<F>(self, f: F) -> Self
    where
        F: FnOnce(DocBuilder) -> DocBuilder,
    {
        self.add(|d| d.doc("$match", f))
    }

    /// Add a $sort stage whose specification is built by `f`.
    pub fn sort<F>(self, f: F) -> Self
    where
        F: FnOnce(DocBuilder) -> DocBuilder,
    {
        self.add(|d| d.doc("$sort", f))
    }

    /// Add a $skip stage.
    pub fn skip(self, n: i64) -> Self {
        self.add(|d| d.add("$skip", n))
    }

    /// Add a $limit stage.
    pub fn limit(self, n: i64) -> Self {
        self.add(|d| d.add("$limit", n))
    }

    /// Add a $count stage.
    pub fn count(self, field: &str) -> Self {
        self.add(|d| d.add("$count", field))
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Check if the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Build the pipeline.
    pub fn build(self) -> Vec<Document> {
        self.stages
    }
}

impl From<PipelineBuilder> for Vec<Document> {
    fn from(builder: PipelineBuilder) -> Self {
        builder.build()
    }
}
