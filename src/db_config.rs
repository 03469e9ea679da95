//! Database connection descriptor (config.json)
//!
//! Six required connection fields pass through 1:1. The optional TLS
//! block is gated on the CA certificate: the skip-hostname flag only has
//! effect when a certificate is also set, otherwise it is silently
//! ignored and no `tls` key is emitted at all.

use serde::Serialize;
use serde_json::Value;

use crate::error::ConfigError;
use crate::properties::PropertyTree;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DbConfig {
    pub username: String,
    pub password: String,
    pub host: String,
    /// Passes through as given; manifests carry ports as strings or numbers.
    pub port: Value,
    pub database: String,
    pub adapter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TlsConfig {
    pub cert: TlsCert,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_host_verify: Option<bool>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TlsCert {
    pub ca: String,
}

pub fn resolve(properties: &PropertyTree) -> Result<DbConfig, ConfigError> {
    // skip_hostname_validation rides on the cert; alone it is ignored
    let tls = properties.get_str("db_ca_cert").map(|ca| TlsConfig {
        cert: TlsCert { ca: ca.to_string() },
        skip_host_verify: match properties.get_bool("db_skip_hostname_validation") {
            Some(true) => Some(true),
            _ => None,
        },
    });

    Ok(DbConfig {
        username: properties.require_str("db_username")?.to_string(),
        password: properties.require_str("db_password")?.to_string(),
        host: properties.require_str("db_hostname")?.to_string(),
        port: properties.require("db_port")?.clone(),
        database: properties.require_str("db_name")?.to_string(),
        adapter: properties.require_str("db_driver")?.to_string(),
        tls,
    })
}

pub fn render(properties: &PropertyTree) -> Result<String, ConfigError> {
    let config = resolve(properties)?;
    Ok(serde_json::to_string_pretty(&config)?)
}
