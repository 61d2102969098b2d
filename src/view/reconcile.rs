//! Fingerprint guard for DOM-driven updates
//!
//! Changes the view makes to the tagged DOM are observed by the glue, and
//! acting on every notification would re-trigger the same change. Each
//! observed state is reduced to a fingerprint and acted upon only when it
//! differs from the last one processed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::models::WordCoord;

#[derive(Debug, Clone, Default)]
pub struct Reconciler<F> {
    last_fingerprint: Option<F>,
}

impl<F: PartialEq> Reconciler<F> {
    pub fn new() -> Self {
        Self {
            last_fingerprint: None,
        }
    }

    /// Record `fingerprint`; true when it differs from the last one
    pub fn changed(&mut self, fingerprint: F) -> bool {
        if self.last_fingerprint.as_ref() == Some(&fingerprint) {
            return false;
        }
        self.last_fingerprint = Some(fingerprint);
        true
    }

    /// Forget the last state so the next call always reports a change
    pub fn reset(&mut self) {
        self.last_fingerprint = None;
    }

    pub fn last(&self) -> Option<&F> {
        self.last_fingerprint.as_ref()
    }
}

/// Order-sensitive hash of a coordinate list
pub fn coords_fingerprint(coords: &[WordCoord]) -> u64 {
    let mut hasher = DefaultHasher::new();
    coords.len().hash(&mut hasher);
    for coord in coords {
        coord.hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_changes_pass() {
        let mut guard = Reconciler::new();
        assert!(guard.changed("a|b".to_string()));
        assert!(!guard.changed("a|b".to_string()));
        assert!(guard.changed("a".to_string()));
        guard.reset();
        assert!(guard.changed("a".to_string()));
    }

    #[test]
    fn test_coords_fingerprint_is_order_sensitive() {
        let a = [WordCoord::new(1, 1), WordCoord::new(1, 2)];
        let b = [WordCoord::new(1, 2), WordCoord::new(1, 1)];
        assert_eq!(coords_fingerprint(&a), coords_fingerprint(&a.to_vec()));
        assert_ne!(coords_fingerprint(&a), coords_fingerprint(&b));
    }
}
