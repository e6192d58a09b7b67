use std::fmt;

pub type RequestId = u64;

/// Identity of a host element (an `<input>` or its container).
///
/// Hosts map their native node handles onto this; the value carries no meaning
/// beyond equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl From<u64> for ElementId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Namespace of a backend value-set.
///
/// Case-sensitive and trimmed; blank or missing keys fall back to `"default"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LookupKey(String);

impl LookupKey {
    pub const DEFAULT: &'static str = "default";

    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(key) => Self(key.to_string()),
            None => Self(Self::DEFAULT.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LookupKey {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Selection key for a suggestion value: trimmed and lower-cased.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Case-insensitive equality used for every widget-side match check.
pub fn same_value(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_key_trims_and_defaults() {
        assert_eq!(LookupKey::parse(Some("  env ")).as_str(), "env");
        assert_eq!(LookupKey::parse(Some("   ")).as_str(), "default");
        assert_eq!(LookupKey::parse(None), LookupKey::default());
    }

    #[test]
    fn lookup_key_is_case_sensitive() {
        assert_ne!(LookupKey::parse(Some("Env")), LookupKey::parse(Some("env")));
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Foo Bar "), "foo bar");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn same_value_ignores_case_only() {
        assert!(same_value("Alpha", "alpha"));
        assert!(!same_value("Alpha", "alpha "));
    }
}
