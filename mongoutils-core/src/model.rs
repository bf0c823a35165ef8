//! Base model with timestamps and lifecycle hooks.
//!
//! Embed [`Timestamps`] in a document struct with `#[serde(flatten)]` and
//! implement [`Model`] for it. Every hook has a no-op default, so a type
//! only overrides the ones it cares about.
//!
//! ```rust
//! use mongoutils_core::model::{Model, Timestamps};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct Post {
//!     title: String,
//!     #[serde(flatten)]
//!     timestamps: Timestamps,
//! }
//!
//! impl Model for Post {
//!     fn timestamps(&self) -> &Timestamps {
//!         &self.timestamps
//!     }
//!
//!     fn timestamps_mut(&mut self) -> &mut Timestamps {
//!         &mut self.timestamps
//!     }
//!
//!     fn cleanup(&mut self) {
//!         self.title = self.title.trim().to_string();
//!     }
//! }
//!
//! let mut post = Post { title: " hi ".into(), ..Default::default() };
//! post.cleanup();
//! post.prepare_insert();
//! assert_eq!(post.title, "hi");
//! ```

use bson::DateTime;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Creation and last-update times, stored as BSON datetimes.
///
/// The default `created_at` is the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// Set when the document is first inserted.
    pub created_at: DateTime,
    /// Set on every non-ghost update.
    pub updated_at: Option<DateTime>,
}

impl Default for Timestamps {
    fn default() -> Self {
        Self {
            created_at: DateTime::from_millis(0),
            updated_at: None,
        }
    }
}

impl Timestamps {
    /// Stamp `created_at` with the current UTC time.
    pub fn prepare_insert(&mut self) {
        self.created_at = now();
    }

    /// Stamp `updated_at` with the current UTC time.
    ///
    /// A ghost update leaves `updated_at` untouched.
    pub fn prepare_update(&mut self, ghost: bool) {
        if !ghost {
            self.updated_at = Some(now());
        }
    }

    /// `created_at` as a chrono datetime.
    pub fn created_at_utc(&self) -> chrono::DateTime<Utc> {
        self.created_at.to_chrono()
    }

    /// `updated_at` as a chrono datetime.
    pub fn updated_at_utc(&self) -> Option<chrono::DateTime<Utc>> {
        self.updated_at.map(DateTime::to_chrono)
    }
}

fn now() -> DateTime {
    DateTime::from_chrono(Utc::now())
}

/// Lifecycle capabilities of a persisted document.
///
/// The persistence layer calls the hooks around each write; the defaults do
/// nothing.
pub trait Model {
    /// Timestamps of this document.
    fn timestamps(&self) -> &Timestamps;

    /// Mutable timestamps of this document.
    fn timestamps_mut(&mut self) -> &mut Timestamps;

    /// Whether the document may be edited. Defaults to `true`.
    fn is_editable(&self) -> bool {
        true
    }

    /// Whether the document may be deleted. Defaults to `false`.
    fn is_deletable(&self) -> bool {
        false
    }

    /// Called before insert.
    fn before_insert(&mut self) {}

    /// Called after insert.
    fn after_insert(&mut self) {}

    /// Called before update.
    fn before_update(&mut self) {}

    /// Called after update.
    fn after_update(&mut self) {}

    /// Called before delete.
    fn before_delete(&mut self) {}

    /// Called after delete.
    fn after_delete(&mut self) {}

    /// Strip data that must not be saved, e.g. loaded relations.
    fn cleanup(&mut self) {}

    /// Fill `created_at` before insert.
    fn prepare_insert(&mut self) {
        self.timestamps_mut().prepare_insert();
    }

    /// Fill `updated_at` before update unless `ghost` is set.
    fn prepare_update(&mut self, ghost: bool) {
        self.timestamps_mut().prepare_update(ghost);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{from_document, to_document};

    #[derive(Debug, Default)]
    struct Post {
        timestamps: Timestamps,
        hooks: Vec<&'static str>,
    }

    impl Model for Post {
        fn timestamps(&self) -> &Timestamps {
            &self.timestamps
        }

        fn timestamps_mut(&mut self) -> &mut Timestamps {
            &mut self.timestamps
        }

        fn before_insert(&mut self) {
            self.hooks.push("before_insert");
        }

        fn after_delete(&mut self) {
            self.hooks.push("after_delete");
        }
    }

    #[test]
    fn test_default_timestamps_start_at_epoch() {
        let stamps = Timestamps::default();
        assert_eq!(stamps.created_at.timestamp_millis(), 0);
        assert_eq!(stamps.created_at_utc().timestamp(), 0);
        assert_eq!(stamps.updated_at, None);
    }

    #[test]
    fn test_defaults() {
        let mut post = Post::default();
        assert!(post.is_editable());
        assert!(!post.is_deletable());

        post.after_insert();
        post.before_update();
        post.after_update();
        post.before_delete();
        post.cleanup();
        assert!(post.hooks.is_empty());
    }

    #[test]
    fn test_overridden_hooks() {
        let mut post = Post::default();
        post.before_insert();
        post.after_delete();
        assert_eq!(post.hooks, vec!["before_insert", "after_delete"]);
    }

    #[test]
    fn test_prepare_insert() {
        let before = Utc::now().timestamp_millis();
        let mut post = Post::default();
        post.prepare_insert();

        assert!(post.timestamps().created_at.timestamp_millis() >= before);
        assert!(post.timestamps().updated_at.is_none());
    }

    #[test]
    fn test_prepare_update() {
        let mut post = Post::default();
        post.prepare_update(false);
        assert!(post.timestamps().updated_at.is_some());
        assert!(post.timestamps().updated_at_utc().is_some());
    }

    #[test]
    fn test_prepare_update_ghost() {
        let mut post = Post::default();
        post.prepare_update(true);
        assert!(post.timestamps().updated_at.is_none());
    }

    #[test]
    fn test_serialized_field_names() {
        let mut timestamps = Timestamps::default();
        timestamps.prepare_insert();
        timestamps.prepare_update(false);

        let doc = to_document(&timestamps).unwrap();
        assert!(doc.get_datetime("created_at").is_ok());
        assert!(doc.get_datetime("updated_at").is_ok());

        let back: Timestamps = from_document(doc).unwrap();
        assert_eq!(back, timestamps);
    }
}
