//! ObjectId helpers.

use bson::oid::ObjectId;

/// Parse an ObjectId from its hex form.
///
/// Returns `None` for malformed input and for the all-zero id.
pub fn parse_object_id(s: &str) -> Option<ObjectId> {
    ObjectId::parse_str(s).ok().filter(|oid| !is_zero(oid))
}

/// Check that an id is present and not the all-zero id.
pub fn is_valid_object_id(id: Option<&ObjectId>) -> bool {
    id.is_some_and(|oid| !is_zero(oid))
}

/// Create a new ObjectId.
pub fn new_object_id() -> ObjectId {
    ObjectId::new()
}

fn is_zero(oid: &ObjectId) -> bool {
    oid.bytes() == [0u8; 12]
}
