//! volconf - deployment artifact renderer for the volume services broker
//!
//! Resolves manifest properties and cross-job link bindings into the four
//! runtime artifacts of a broker deployment: the database connection
//! descriptor, the startup flag list, the CA certificate file, and the
//! application push manifest. Each render is a pure function of
//! (properties, links); there is no shared state and no partial output.

pub mod access_options;
pub mod app_manifest;
pub mod ca_cert;
pub mod credhub;
pub mod db_config;
pub mod error;
pub mod links;
pub mod properties;
pub mod start_flags;

pub use access_options::{AccessProfile, LdapMode};
pub use app_manifest::AppManifest;
pub use credhub::{CredentialScope, CredhubIdentity};
pub use db_config::DbConfig;
pub use error::{ConfigError, FixSuggestion};
pub use links::{Link, LinkInstance, Links};
pub use properties::PropertyTree;
pub use start_flags::Variant;
