//! Widget and page configuration.
//!
//! Widgets read their configuration from element attributes once, at bind
//! time. Attribute parsing never fails: bad values fall back to defaults.
//! Page-wide [`LookupSettings`] may come from a TOML file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use core_types::LookupKey;
use serde::Deserialize;
use thiserror::Error;

pub const ATTR_SINGLE: &str = "data-lookup";
pub const ATTR_MULTI: &str = "data-lookup-multi";
pub const ATTR_KEY: &str = "data-key";
pub const ATTR_STRICT: &str = "data-lookup-strict";
pub const ATTR_LIMIT: &str = "data-limit";
pub const ATTR_NAME: &str = "data-name";

pub const DEFAULT_LIMIT: usize = 8;
pub const MAX_LIMIT: usize = 50;

/// Attributes of a host element, in document order.
///
/// Boolean attributes carry `None` as their value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementAttrs(Vec<(String, Option<String>)>);

impl ElementAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: Option<&str>) -> Self {
        self.0.push((name.to_string(), value.map(str::to_string)));
        self
    }

    pub fn flag(self, name: &str) -> Self {
        self.with(name, None)
    }

    pub fn has(&self, name: &str) -> bool {
        self.0.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Value of the first attribute called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.as_deref())
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for ElementAttrs {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupMode {
    Single,
    Multi,
}

impl LookupMode {
    /// Which widget an element asks for, if any. Multi wins when both are present.
    pub fn detect(attrs: &ElementAttrs) -> Option<Self> {
        if attrs.has(ATTR_MULTI) {
            Some(Self::Multi)
        } else if attrs.has(ATTR_SINGLE) {
            Some(Self::Single)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetConfig {
    pub key: LookupKey,
    pub strict: bool,
    pub limit: usize,
    /// Name of the hidden field carrying the serialized selection.
    pub field_name: String,
}

impl WidgetConfig {
    pub fn from_attrs(attrs: &ElementAttrs) -> Self {
        let key = LookupKey::parse(attrs.get(ATTR_KEY));
        let field_name = attrs
            .get(ATTR_NAME)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| key.as_str().to_string());

        Self {
            strict: attrs.has(ATTR_STRICT),
            limit: parse_limit(attrs.get(ATTR_LIMIT)),
            field_name,
            key,
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self::from_attrs(&ElementAttrs::new())
    }
}

/// Leading-integer parse (`"12px"` reads as 12), clamped to `1..=50`.
/// Anything without leading digits falls back to the default of 8.
pub fn parse_limit(raw: Option<&str>) -> usize {
    let Some(raw) = raw.map(str::trim) else {
        return DEFAULT_LIMIT;
    };

    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return DEFAULT_LIMIT;
    }
    if negative {
        return 1;
    }

    // Overflowing digit runs are simply "large".
    digits[..end]
        .parse::<usize>()
        .unwrap_or(MAX_LIMIT)
        .clamp(1, MAX_LIMIT)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid lookup settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Page-wide knobs shared by every widget on a page.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LookupSettings {
    /// Portal context path the lookup API lives under.
    pub context_path: String,
    pub debounce_ms: u64,
    pub single_toast_ms: u64,
    pub multi_toast_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            context_path: "/portal".to_string(),
            debounce_ms: 150,
            single_toast_ms: 2500,
            multi_toast_ms: 2000,
            request_timeout_secs: 10,
        }
    }
}

impl LookupSettings {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn toast_duration(&self, mode: LookupMode) -> Duration {
        match mode {
            LookupMode::Single => Duration::from_millis(self.single_toast_ms),
            LookupMode::Multi => Duration::from_millis(self.multi_toast_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Join a server origin with the context path, e.g.
    /// `http://ops:8080` + `/portal` → `http://ops:8080/portal`.
    pub fn base_url(&self, origin: &str) -> String {
        let origin = origin.trim_end_matches('/');
        let path = self.context_path.trim_matches('/');
        if path.is_empty() {
            origin.to_string()
        } else {
            format!("{origin}/{path}")
        }
    }
}
