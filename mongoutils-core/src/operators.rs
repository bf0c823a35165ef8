//! One-shot helpers for common query and update operators.

use bson::{Bson, Document, doc};

use crate::document::{regex_value, to_array};

/// `{ field: { $in: values } }`
pub fn in_<I, V>(field: &str, values: I) -> Document
where
    I: IntoIterator<Item = V>,
    V: Into<Bson>,
{
    doc! { field: { "$in": to_array(values) } }
}

/// `{ $set: value }`
pub fn set(value: impl Into<Bson>) -> Document {
    doc! { "$set": value.into() }
}

/// `{ $set: { field: value } }`
pub fn set_nested(field: &str, value: impl Into<Bson>) -> Document {
    doc! { "$set": { field: value.into() } }
}

/// `{ $match: value }`
pub fn match_(value: impl Into<Bson>) -> Document {
    doc! { "$match": value.into() }
}

/// `{ field: /pattern/options }`
pub fn regex(field: &str, pattern: &str, options: &str) -> Document {
    doc! { field: regex_value(pattern, options) }
}

/// `{ $inc: increments }`
pub fn inc(increments: Document) -> Document {
    doc! { "$inc": increments }
}
