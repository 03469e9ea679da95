//! Application push manifest (manifest.yml)
//!
//! Deployment descriptor for pushing the broker as a platform app.
//! Buildpack, memory and route shape are fixed choices; the credential
//! broker identity must resolve fully before any output is produced.

use serde::Serialize;

use crate::credhub::{self, CredentialScope};
use crate::error::ConfigError;
use crate::links::Links;
use crate::properties::PropertyTree;

const BUILDPACK: &str = "binary_buildpack";
const MEMORY: &str = "256M";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AppManifest {
    pub applications: Vec<Application>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Application {
    pub name: String,
    pub buildpacks: Vec<String>,
    pub memory: String,
    pub routes: Vec<Route>,
    pub env: AppEnv,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Route {
    pub route: String,
}

/// Environment block. The four credential literals are always present;
/// the remaining entries render only when resolved.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AppEnv {
    pub username: String,
    pub password: String,
    pub uaa_client_id: String,
    pub uaa_client_secret: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_time_format: Option<String>,
}

pub fn resolve(properties: &PropertyTree, links: &Links) -> Result<AppManifest, ConfigError> {
    // identity first; no partial manifest when it fails
    let identity = credhub::require(properties, links, CredentialScope::Push)?;

    let name = properties.require_str("app_name")?.to_string();
    let domain = properties.require_str("app_domain")?;
    let route = format!("{name}.{domain}");

    Ok(AppManifest {
        applications: vec![Application {
            name: name.clone(),
            buildpacks: vec![BUILDPACK.to_string()],
            memory: MEMORY.to_string(),
            routes: vec![Route { route }],
            env: AppEnv {
                username: properties.require_str("username")?.to_string(),
                password: properties.require_str("password")?.to_string(),
                uaa_client_id: identity.uaa_client_id,
                uaa_client_secret: identity.uaa_client_secret,
                store_id: credhub::store_id(properties, true),
                log_level: properties.get_scalar("log_level"),
                log_time_format: properties.get_scalar("log_time_format"),
            },
        }],
    })
}

pub fn render(properties: &PropertyTree, links: &Links) -> Result<String, ConfigError> {
    let manifest = resolve(properties, links)?;
    Ok(format!("---\n{}", serde_yaml::to_string(&manifest)?))
}
