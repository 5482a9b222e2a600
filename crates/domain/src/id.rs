//! Typed device identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable unique key of a registered [`Device`](crate::device::Device).
///
/// Ids are derived from something stable about the device (a bridge light
/// name, a network address, a fixed virtual slug) so that the same physical
/// or virtual thing always maps to the same key within a process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Wrap an existing key verbatim.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Build a `prefix_label` key, with `label` reduced to lowercase
    /// ASCII alphanumerics separated by single underscores.
    ///
    /// `slugged("bridge", "Living Room #2")` yields `bridge_living_room_2`.
    #[must_use]
    pub fn slugged(prefix: &str, label: &str) -> Self {
        let mut slug = String::with_capacity(prefix.len() + label.len() + 1);
        slug.push_str(prefix);
        let mut pending_separator = true;
        for ch in label.chars() {
            if ch.is_ascii_alphanumeric() {
                if pending_separator && !slug.is_empty() {
                    slug.push('_');
                }
                pending_separator = false;
                slug.push(ch.to_ascii_lowercase());
            } else {
                pending_separator = true;
            }
        }
        Self(slug)
    }

    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is empty (never valid for a registered device).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DeviceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_slug_label_with_prefix() {
        let id = DeviceId::slugged("bridge", "Living Room #2");
        assert_eq!(id.as_str(), "bridge_living_room_2");
    }

    #[test]
    fn should_collapse_repeated_separators_when_slugging() {
        let id = DeviceId::slugged("network", "192.168.1.4");
        assert_eq!(id.as_str(), "network_192_168_1_4");
    }

    #[test]
    fn should_slug_without_prefix() {
        let id = DeviceId::slugged("", "  Desk Lamp ");
        assert_eq!(id.as_str(), "desk_lamp");
    }

    #[test]
    fn should_display_raw_key() {
        let id = DeviceId::from("virtual_bedroom_light");
        assert_eq!(id.to_string(), "virtual_bedroom_light");
    }

    #[test]
    fn should_serialize_as_plain_string() {
        let id = DeviceId::from("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");
    }

    #[test]
    fn should_report_empty_key() {
        assert!(DeviceId::new("").is_empty());
        assert!(!DeviceId::new("x").is_empty());
    }
}
