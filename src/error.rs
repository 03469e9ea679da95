//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Fatal resolution errors.
///
/// A render either returns a complete artifact or one of these; there is
/// no partial output and no retry path. Optional-field absence is never
/// an error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing database host property or link")]
    MissingDatabaseHost,

    #[error("can't find link '{name}'")]
    MissingLink { name: String },

    #[error("{link} is required. Zero instances found.")]
    EmptyLinkInstances { link: String },

    #[error("missing credhub uaa properties")]
    MissingUaaProperties,

    #[error("missing credhub UAA credentials")]
    MissingUaaCredentials,

    #[error("can't find property '{path}'")]
    MissingProperty { path: String },

    #[error("ldap_enabled and ldap_test_mode are mutually exclusive")]
    ConflictingLdapModes,

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FixSuggestion for ConfigError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            ConfigError::MissingDatabaseHost => {
                Some("Set db.host or bind a 'database' link with at least one instance")
            }
            ConfigError::MissingLink { .. } => {
                Some("Bind the link in the deployment manifest, or configure the direct properties instead")
            }
            ConfigError::EmptyLinkInstances { .. } => {
                Some("Scale the provider job to at least one instance")
            }
            ConfigError::MissingUaaProperties | ConfigError::MissingUaaCredentials => {
                Some("Set credhub.uaa_client_id and credhub.uaa_client_secret")
            }
            ConfigError::MissingProperty { .. } => {
                Some("Set the property in the job's manifest")
            }
            ConfigError::ConflictingLdapModes => {
                Some("Enable only one of ldap_enabled / ldap_test_mode")
            }
            ConfigError::Yaml(_) => Some("Check YAML syntax: indentation and quoting"),
            ConfigError::Json(_) => None,
            ConfigError::Io(_) => Some("Check file path and permissions"),
        }
    }
}
