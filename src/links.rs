//! Link bindings - named cross-job data exports
//!
//! A link is *absent* when the consumer declares no binding for its name;
//! *present with zero instances* is a distinct, valid state that some
//! consumers must reject. The two map to different errors.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::properties::PropertyTree;

/// One instance of a provider job.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkInstance {
    pub address: String,
}

/// A named link binding: provider instances plus exported properties.
#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub name: String,
    #[serde(default)]
    pub instances: Vec<LinkInstance>,
    #[serde(default)]
    pub properties: PropertyTree,
}

impl Link {
    /// Address of the first provider instance, if any.
    pub fn first_address(&self) -> Option<&str> {
        self.instances.first().map(|i| i.address.as_str())
    }

    /// Reject a binding with an empty instance list.
    pub fn require_instances(&self) -> Result<(), ConfigError> {
        if self.instances.is_empty() {
            return Err(ConfigError::EmptyLinkInstances {
                link: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// The full set of links bound for one job.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Links(Vec<Link>);

impl Links {
    pub fn new(links: Vec<Link>) -> Self {
        Self(links)
    }

    /// Parse a link set from a YAML list of bindings.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(Self(serde_yaml::from_str(yaml)?))
    }

    pub fn find(&self, name: &str) -> Option<&Link> {
        self.0.iter().find(|l| l.name == name)
    }

    pub fn require(&self, name: &str) -> Result<&Link, ConfigError> {
        self.find(name).ok_or_else(|| ConfigError::MissingLink {
            name: name.to_string(),
        })
    }
}
