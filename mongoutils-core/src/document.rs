//! Fluent builder for ordered BSON documents.

use std::collections::HashMap;

use bson::{Bson, Document, Regex};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::MongoResult;

/// Builder for ordered BSON documents.
///
/// Elements keep insertion order, which matters for pipeline stages and
/// sort specifications. Adding a key that already exists replaces its
/// value in place.
///
/// # Example
///
/// ```rust
/// use mongoutils_core::DocBuilder;
///
/// let doc = DocBuilder::new()
///     .add("status", "active")
///     .nested("age", "$gte", 18)
///     .doc("meta", |d| d.add("views", 0).add("likes", 0))
///     .build();
///
/// assert_eq!(doc.get_str("status").unwrap(), "active");
/// assert_eq!(doc.get_document("age").unwrap().get_i32("$gte").unwrap(), 18);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocBuilder {
    doc: Document,
}

impl DocBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder that continues an existing document.
    pub fn from_doc(doc: Document) -> Self {
        Self { doc }
    }

    /// Add an element.
    pub fn add(mut self, key: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.doc.insert(key, value.into());
        self
    }

    /// Add an element whose value is a document built by `f`.
    pub fn doc<F>(self, key: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(DocBuilder) -> DocBuilder,
    {
        let nested = f(DocBuilder::new()).build();
        self.add(key, nested)
    }

    /// Add an element with an array value.
    pub fn array<I, V>(self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Bson>,
    {
        self.add(key, to_array(values))
    }

    /// Add `root: { key: value }`.
    pub fn nested(
        self,
        root: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Bson>,
    ) -> Self {
        let mut inner = Document::new();
        inner.insert(key, value.into());
        self.add(root, inner)
    }

    /// Add `root: { key: <document built by f> }`.
    pub fn nested_doc<F>(self, root: impl Into<String>, key: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(DocBuilder) -> DocBuilder,
    {
        let nested = f(DocBuilder::new()).build();
        self.nested(root, key, nested)
    }

    /// Add `root: { key: [values] }`.
    pub fn nested_array<I, V>(self, root: impl Into<String>, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Bson>,
    {
        self.nested(root, key, to_array(values))
    }

    /// Add an element with a regular expression value.
    pub fn regex(self, key: impl Into<String>, pattern: &str, options: &str) -> Self {
        self.add(key, regex_value(pattern, options))
    }

    /// Number of elements added so far.
    pub fn len(&self) -> usize {
        self.doc.len()
    }

    /// Check if no element has been added.
    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    /// Unordered view of the elements.
    pub fn to_map(&self) -> HashMap<String, Bson> {
        self.doc
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Build the document.
    pub fn build(self) -> Document {
        self.doc
    }
}

impl From<DocBuilder> for Document {
    fn from(builder: DocBuilder) -> Self {
        builder.build()
    }
}

impl From<DocBuilder> for Bson {
    fn from(builder: DocBuilder) -> Self {
        Bson::Document(builder.build())
    }
}

pub(crate) fn to_array<I, V>(values: I) -> Bson
where
    I: IntoIterator<Item = V>,
    V: Into<Bson>,
{
    Bson::Array(values.into_iter().map(Into::into).collect())
}

/// BSON requires regex options in alphabetical order.
pub(crate) fn regex_value(pattern: &str, options: &str) -> Bson {
    let mut opts: Vec<char> = options.chars().collect();
    opts.sort_unstable();
    Bson::RegularExpression(Regex {
        pattern: pattern.to_string(),
        options: opts.into_iter().collect(),
    })
}

/// Convert a struct to a BSON document.
pub fn to_document<T: Serialize>(value: &T) -> MongoResult<Document> {
    Ok(bson::to_document(value)?)
}

/// Convert a BSON document to a struct.
pub fn from_document<T: DeserializeOwned>(doc: Document) -> MongoResult<T> {
    Ok(bson::from_document(doc)?)
}
