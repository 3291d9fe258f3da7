//! Snapshot identifiers and their filesystem-safe keys.

use std::fmt;

use crate::errors::ArgusError;

/// Token substituted for the namespace/name separator before sanitization.
/// Multi-character so a plain `_` in a name cannot imitate the separator.
const SEPARATOR_TOKEN: &str = "_SLASH_";

/// A namespaced snapshot identifier, e.g. `checkout/cart-total`.
///
/// Identifiers are caller-supplied per assertion and have no persistent
/// identity beyond the call; only the derived [`file_key`](Self::file_key)
/// touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotId {
    namespace: String,
    name: String,
}

impl SnapshotId {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, ArgusError> {
        let namespace = namespace.into();
        let name = name.into();
        if namespace.is_empty() {
            return Err(ArgusError::EmptyId { part: "namespace" });
        }
        if name.is_empty() {
            return Err(ArgusError::EmptyId { part: "name" });
        }
        Ok(Self { namespace, name })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Derives the filesystem-safe key: the separator becomes
    /// `_SLASH_`, then every character outside `[A-Za-z0-9_]` is stripped.
    ///
    /// Two identifiers differing only in stripped punctuation map to the
    /// same key. That collision risk is inherited behavior and is flagged in
    /// DESIGN.md rather than guarded against here.
    pub fn file_key(&self) -> String {
        format!("{}{}{}", self.namespace, SEPARATOR_TOKEN, self.name)
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect()
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn display_joins_namespace_and_name() {
        let id = SnapshotId::new("checkout", "cart-total").unwrap();
        assert_eq!(id.to_string(), "checkout/cart-total");
    }

    #[test]
    fn file_key_substitutes_separator_and_strips_punctuation() {
        let id = SnapshotId::new("ui.widgets", "save button!").unwrap();
        assert_eq!(id.file_key(), "uiwidgets_SLASH_savebutton");
    }

    #[test]
    fn underscores_survive_sanitization() {
        let id = SnapshotId::new("my_ns", "my_name").unwrap();
        assert_eq!(id.file_key(), "my_ns_SLASH_my_name");
    }

    #[test]
    fn empty_parts_are_rejected() {
        assert!(SnapshotId::new("", "name").is_err());
        assert!(SnapshotId::new("ns", "").is_err());
    }

    /// Known limitation: stripping punctuation can map distinct ids to one
    /// key. Documented, not guarded.
    #[test]
    fn punctuation_only_differences_collide() {
        let a = SnapshotId::new("ui", "cart-total").unwrap();
        let b = SnapshotId::new("ui", "cart.total").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.file_key(), b.file_key());
    }

    /// Fuzz-style sweep over the kind of identifier set a real suite uses:
    /// every pair must sanitize to a distinct key.
    #[test]
    fn realistic_suite_identifiers_do_not_collide() {
        let raw = [
            ("checkout", "cart-total"),
            ("checkout", "cart-empty"),
            ("checkout", "payment-form"),
            ("ui.widgets", "save-button"),
            ("ui.widgets", "cancel-button"),
            ("ui.dialogs", "confirm-delete"),
            ("report_v2", "summary-table"),
            ("report_v2", "summary-chart"),
            ("admin", "user-list page 1"),
            ("admin", "user-list page 2"),
        ];
        let mut seen: HashMap<String, String> = HashMap::new();
        for (ns, name) in raw {
            let id = SnapshotId::new(ns, name).unwrap();
            if let Some(prior) = seen.insert(id.file_key(), id.to_string()) {
                panic!("file key collision between {prior} and {id}");
            }
        }
    }
}
