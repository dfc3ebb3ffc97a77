//! Registry configuration.

/// Default prefix for generated anonymous type names.
pub const ANON_PREFIX: &str = "__ANON__";

/// Configuration for a registry.
///
/// Controls how strictly construction requests are validated and how
/// anonymous descriptors are named in diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegistryConfig {
    /// Reject construction fields that name no attribute.
    ///
    /// When off, unknown fields are dropped (and traced).
    pub reject_unknown_fields: bool,

    /// Prefix of generated names for anonymous classes and roles.
    pub anon_prefix: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            reject_unknown_fields: false,
            anon_prefix: ANON_PREFIX.to_owned(),
        }
    }
}

impl RegistryConfig {
    /// A config that rejects unknown construction fields.
    pub fn strict() -> Self {
        Self {
            reject_unknown_fields: true,
            ..Default::default()
        }
    }

    /// A config with a custom anonymous-name prefix.
    pub fn with_anon_prefix(prefix: impl Into<String>) -> Self {
        Self {
            anon_prefix: prefix.into(),
            ..Default::default()
        }
    }
}
