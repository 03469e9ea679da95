//! Credential-broker identity resolution
//!
//! Two mutually exclusive modes per deployment: direct `credhub.url`
//! manifest properties, or a "credhub" link supplying internal URL, port
//! and CA certificate, combined with manifest-supplied UAA credentials.
//! A set `credhub.url` property always selects the direct mode; the link
//! is consulted only when the property is unset.

use tracing::debug;

use crate::error::ConfigError;
use crate::links::Links;
use crate::properties::PropertyTree;

pub const CREDHUB_LINK: &str = "credhub";

/// Store id applied when credhub is the selected identity source and no
/// store_id property is set.
pub const DEFAULT_STORE_ID: &str = "volbroker";

/// Which MissingCredentials message a caller's flow contracts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialScope {
    /// Deployed broker job ("missing credhub uaa properties")
    Server,
    /// Push flows ("missing credhub UAA credentials")
    Push,
}

impl CredentialScope {
    fn missing_uaa(self) -> ConfigError {
        match self {
            CredentialScope::Server => ConfigError::MissingUaaProperties,
            CredentialScope::Push => ConfigError::MissingUaaCredentials,
        }
    }
}

/// Fully resolved credential-broker identity.
#[derive(Debug, Clone, PartialEq)]
pub struct CredhubIdentity {
    pub url: String,
    pub uaa_client_id: String,
    pub uaa_client_secret: String,
    /// CA certificate exported by the link; absent in direct mode.
    pub ca_certificate: Option<String>,
}

/// Resolve an identity when one is configured.
///
/// `Ok(None)` means the deployment has no credhub at all - neither the
/// direct properties nor a link binding. Callers whose flow requires
/// credhub use [`require`] instead.
pub fn select(
    properties: &PropertyTree,
    links: &Links,
    scope: CredentialScope,
) -> Result<Option<CredhubIdentity>, ConfigError> {
    if properties.get("credhub.url").is_some() {
        return from_properties(properties, scope).map(Some);
    }
    match links.find(CREDHUB_LINK) {
        Some(_) => from_link(properties, links, scope).map(Some),
        None => Ok(None),
    }
}

/// Resolve an identity, failing with MissingLink when nothing is bound.
pub fn require(
    properties: &PropertyTree,
    links: &Links,
    scope: CredentialScope,
) -> Result<CredhubIdentity, ConfigError> {
    if properties.get("credhub.url").is_some() {
        return from_properties(properties, scope);
    }
    links.require(CREDHUB_LINK)?;
    from_link(properties, links, scope)
}

/// store_id with the credhub default applied.
pub fn store_id(properties: &PropertyTree, credhub_selected: bool) -> Option<String> {
    properties
        .get_scalar("store_id")
        .or_else(|| credhub_selected.then(|| DEFAULT_STORE_ID.to_string()))
}

fn from_properties(
    properties: &PropertyTree,
    scope: CredentialScope,
) -> Result<CredhubIdentity, ConfigError> {
    let url = properties.require_scalar("credhub.url")?;
    let (uaa_client_id, uaa_client_secret) = uaa_credentials(properties, scope)?;
    debug!(%url, "resolved credhub identity from manifest properties");

    Ok(CredhubIdentity {
        url,
        uaa_client_id,
        uaa_client_secret,
        ca_certificate: None,
    })
}

fn from_link(
    properties: &PropertyTree,
    links: &Links,
    scope: CredentialScope,
) -> Result<CredhubIdentity, ConfigError> {
    let link = links.require(CREDHUB_LINK)?;
    link.require_instances()?;

    let internal_url = link.properties.require_scalar("credhub.internal_url")?;
    let port = link.properties.require_scalar("credhub.port")?;
    let (uaa_client_id, uaa_client_secret) = uaa_credentials(properties, scope)?;
    let url = format!("https://{internal_url}:{port}");
    debug!(%url, "resolved credhub identity from link");

    Ok(CredhubIdentity {
        url,
        uaa_client_id,
        uaa_client_secret,
        ca_certificate: link
            .properties
            .get_str("credhub.ca_certificate")
            .map(str::to_string),
    })
}

fn uaa_credentials(
    properties: &PropertyTree,
    scope: CredentialScope,
) -> Result<(String, String), ConfigError> {
    match (
        properties.get_scalar("credhub.uaa_client_id"),
        properties.get_scalar("credhub.uaa_client_secret"),
    ) {
        (Some(id), Some(secret)) => Ok((id, secret)),
        _ => Err(scope.missing_uaa()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::{Link, LinkInstance};
    use serde_json::json;

    fn credhub_link() -> Link {
        Link {
            name: "credhub".to_string(),
            instances: vec![LinkInstance {
                address: "credhub.service.internal".to_string(),
            }],
            properties: PropertyTree::from(json!({
                "credhub": {
                    "internal_url": "some-credhub-url",
                    "port": 4321,
                    "ca_certificate": "some-certificate",
                }
            })),
        }
    }

    fn uaa_properties() -> PropertyTree {
        PropertyTree::from(json!({
            "credhub": {
                "uaa_client_id": "some-uaa-client-id",
                "uaa_client_secret": "some-uaa-client-secret",
            }
        }))
    }

    #[test]
    fn direct_mode_uses_manifest_properties() {
        let properties = PropertyTree::from(json!({
            "credhub": {
                "url": "some-credhub-url",
                "uaa_client_id": "some-uaa-client-id",
                "uaa_client_secret": "some-uaa-client-secret",
            }
        }));

        let identity = select(&properties, &Links::default(), CredentialScope::Server)
            .unwrap()
            .unwrap();

        assert_eq!(identity.url, "some-credhub-url");
        assert_eq!(identity.uaa_client_id, "some-uaa-client-id");
        assert_eq!(identity.ca_certificate, None);
    }

    #[test]
    fn direct_mode_wins_over_a_bound_link() {
        let properties = PropertyTree::from(json!({
            "credhub": {
                "url": "property-url",
                "uaa_client_id": "some-uaa-client-id",
                "uaa_client_secret": "some-uaa-client-secret",
            }
        }));
        let links = Links::new(vec![credhub_link()]);

        let identity = select(&properties, &links, CredentialScope::Server)
            .unwrap()
            .unwrap();

        assert_eq!(identity.url, "property-url");
    }

    #[test]
    fn link_mode_constructs_the_https_url_exactly() {
        let links = Links::new(vec![credhub_link()]);

        let identity = select(&uaa_properties(), &links, CredentialScope::Server)
            .unwrap()
            .unwrap();

        assert_eq!(identity.url, "https://some-credhub-url:4321");
        assert_eq!(identity.ca_certificate.as_deref(), Some("some-certificate"));
    }

    #[test]
    fn link_with_zero_instances_is_rejected() {
        let mut link = credhub_link();
        link.instances.clear();
        let links = Links::new(vec![link]);

        let err = select(&uaa_properties(), &links, CredentialScope::Server).unwrap_err();
        assert_eq!(err.to_string(), "credhub is required. Zero instances found.");
    }

    #[test]
    fn select_returns_none_when_nothing_is_configured() {
        let result = select(
            &PropertyTree::default(),
            &Links::default(),
            CredentialScope::Server,
        )
        .unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn require_fails_without_property_or_link() {
        let err = require(
            &PropertyTree::default(),
            &Links::default(),
            CredentialScope::Push,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "can't find link 'credhub'");
    }

    #[test]
    fn missing_uaa_message_depends_on_scope() {
        let links = Links::new(vec![credhub_link()]);
        let no_uaa = PropertyTree::default();

        let server = select(&no_uaa, &links, CredentialScope::Server).unwrap_err();
        assert_eq!(server.to_string(), "missing credhub uaa properties");

        let push = select(&no_uaa, &links, CredentialScope::Push).unwrap_err();
        assert_eq!(push.to_string(), "missing credhub UAA credentials");
    }

    #[test]
    fn store_id_defaults_only_when_credhub_is_selected() {
        let unset = PropertyTree::default();
        assert_eq!(store_id(&unset, true).as_deref(), Some(DEFAULT_STORE_ID));
        assert_eq!(store_id(&unset, false), None);

        let set = PropertyTree::from(json!({"store_id": "some-store-id"}));
        assert_eq!(store_id(&set, true).as_deref(), Some("some-store-id"));
    }
}
