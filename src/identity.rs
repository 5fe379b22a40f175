//! Dependency identity and URL template resolution
//!
//! A dependency is pinned by `{name, version}`. Both strings become directory
//! components of the cache root, so they are validated against anything that
//! could change where the cache lands on disk.

use crate::error::{FetchError, Result};

/// Placeholder substituted with the pinned version when resolving a template
pub const VERSION_PLACEHOLDER: &str = "{VERSION}";

/// A pinned dependency: name plus exact version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub version: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Check that name and version are usable as single path components.
    pub(crate) fn validate(&self) -> Result<()> {
        validate_component("name", &self.name)?;
        validate_component("version", &self.version)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

fn validate_component(what: &str, value: &str) -> Result<()> {
    let reason = if value.is_empty() {
        Some("must not be empty".to_string())
    } else if value.contains('/') || value.contains('\\') {
        Some("must not contain path separators".to_string())
    } else if value == "." || value == ".." {
        Some("must not be a relative path component".to_string())
    } else if value.starts_with('.') {
        // Dotfile names would collide with the version marker and lock files.
        Some("must not start with '.'".to_string())
    } else {
        None
    };

    match reason {
        Some(reason) => Err(FetchError::InvalidIdentity {
            reason: format!("{} '{}' {}", what, value, reason),
        }),
        None => Ok(()),
    }
}

/// A base-URL template containing exactly one `{VERSION}` placeholder.
///
/// Resolution is pure: the same template and version always produce the same
/// base URL.
///
/// # Example
/// ```
/// use pinfetch::UrlTemplate;
///
/// let t = UrlTemplate::new("https://example.com/fmt/{VERSION}").unwrap();
/// assert_eq!(t.resolve("10.2.1"), "https://example.com/fmt/10.2.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
}

impl UrlTemplate {
    /// Validate and wrap a template string.
    ///
    /// Fails unless the placeholder occurs exactly once.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        let found = template.matches(VERSION_PLACEHOLDER).count();
        if found != 1 {
            return Err(FetchError::Template { template, found });
        }
        Ok(Self { template })
    }

    /// Substitute the placeholder with a concrete version.
    pub fn resolve(&self, version: &str) -> String {
        self.template.replace(VERSION_PLACEHOLDER, version)
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

/// Join a resolved base URL with a relative file path.
///
/// The relative path is already validated to contain only normal components,
/// so joining is plain string concatenation with `/` separators.
pub(crate) fn join_url(base: &str, relative: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), relative)
}
