//! Device selectors: which devices a command is aimed at.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Target of a control call: every capable device, or a name match.
///
/// Serialized as a plain string (`"all"` or the name fragment).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selector {
    /// Every device that has the capability the command requires.
    #[default]
    All,
    /// Devices of the command's kind whose name contains this fragment,
    /// compared case-insensitively.
    Name(String),
}

impl Selector {
    /// Parse a selector; the literal `all` (any case) or an empty string
    /// selects everything.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Name(trimmed.to_string())
        }
    }

    /// Whether a device called `name` is selected by name.
    ///
    /// [`All`](Self::All) matches every name; capability filtering is the
    /// dispatcher's job.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Name(fragment) => name.to_lowercase().contains(&fragment.to_lowercase()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Name(fragment) => f.write_str(fragment),
        }
    }
}

impl From<String> for Selector {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<Selector> for String {
    fn from(value: Selector) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_all_case_insensitively() {
        assert_eq!(Selector::parse("ALL"), Selector::All);
        assert_eq!(Selector::parse("  "), Selector::All);
    }

    #[test]
    fn should_match_name_fragment_case_insensitively() {
        let selector = Selector::parse("bedroom");
        assert!(selector.matches_name("Bedroom Light"));
        assert!(!selector.matches_name("Living Room Light"));
    }

    #[test]
    fn should_serialize_as_plain_string() {
        let json = serde_json::to_string(&Selector::parse("desk")).unwrap();
        assert_eq!(json, "\"desk\"");
        let parsed: Selector = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(parsed, Selector::All);
    }
}
