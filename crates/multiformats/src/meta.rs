//! Attachable metadata for the immutable value types.
//!
//! Metadata rides alongside a value but never participates in its equality,
//! ordering or hashing: two values with identical canonical bytes are equal
//! whatever is attached to them.

use std::collections::BTreeMap;
use std::sync::Arc;

/// String-keyed metadata attached to a value.
pub type Metadata = BTreeMap<String, String>;

/// Shared, copy-on-write metadata slot.
#[derive(Debug, Clone, Default)]
pub(crate) struct Meta(Option<Arc<Metadata>>);

impl Meta {
    /// Returns a new slot with `key` set, leaving `self` untouched.
    pub(crate) fn with(&self, key: impl Into<String>, value: impl Into<String>) -> Meta {
        let mut map = self.0.as_deref().cloned().unwrap_or_default();
        map.insert(key.into(), value.into());
        Meta(Some(Arc::new(map)))
    }

    pub(crate) fn get(&self) -> Option<&Metadata> {
        self.0.as_deref()
    }
}
