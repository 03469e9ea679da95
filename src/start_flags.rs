//! Startup flag assembly for the broker server invocation
//!
//! Merges three independently-resolved concerns - database identity,
//! credential-broker identity, access-control options - into one ordered
//! flag list, rendered as a bash start script. Two variants exist with
//! distinct optional-flag contracts: the server variant keeps unresolved
//! valued flags as empty strings for the downstream binary, the push
//! variant omits them entirely.

use tracing::debug;

use crate::access_options::{AccessProfile, LdapMode};
use crate::ca_cert::{CREDHUB_CA_CERT_PATH, DB_CA_CERT_PATH};
use crate::credhub::{self, CredentialScope};
use crate::error::ConfigError;
use crate::links::Links;
use crate::properties::PropertyTree;

pub const DATABASE_LINK: &str = "database";

// Non-negotiable defaults: the listen address comes from the process
// environment and the services catalog path is fixed.
const LISTEN_ADDR: &str = "0.0.0.0:$PORT";
const SERVICES_CONFIG_PATH: &str = "./services.json";
const BROKER_BIN: &str = "bin/volbroker";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Deployed job: optional valued flags are always present, empty
    /// string when their concern is unresolved.
    Server,
    /// Pushed app: absent optional flags are omitted entirely, and the
    /// skip-validation flag is the bare boolean form.
    Push,
}

impl Variant {
    fn scope(self) -> CredentialScope {
        match self {
            Variant::Server => CredentialScope::Server,
            Variant::Push => CredentialScope::Push,
        }
    }
}

/// Resolve the ordered flag list.
pub fn resolve(
    properties: &PropertyTree,
    links: &Links,
    variant: Variant,
) -> Result<Vec<String>, ConfigError> {
    let mut flags = FlagList::new(variant);

    flags.push("listenAddr", LISTEN_ADDR);
    flags.push("servicesConfig", SERVICES_CONFIG_PATH);

    // ─── database identity ───────────────────────────────────────────
    flags.optional("dbDriver", properties.get_scalar("db.driver"));
    flags.push("dbHostname", &db_hostname(properties, links)?);
    flags.optional("dbPort", properties.get_scalar("db.port"));
    flags.optional("dbName", properties.get_scalar("db.name"));

    // a set cert implies the fixed path flag; content is written by the
    // certificate exporter, never embedded here
    let ca_cert = properties.get_str("db.ca_cert");
    flags.placeholder("dbCACertPath", ca_cert.map(|_| DB_CA_CERT_PATH.to_string()));

    let skip = properties
        .get_bool("db.skip_hostname_validation")
        .unwrap_or(false);
    match variant {
        Variant::Server => {
            flags.placeholder("dbSkipHostnameValidation", skip.then(|| "true".to_string()))
        }
        Variant::Push => {
            if skip {
                flags.bare("dbSkipHostnameValidation");
            }
        }
    }

    // ─── credential-broker identity ──────────────────────────────────
    let identity = credhub::select(properties, links, variant.scope())?;
    let credhub_selected = identity.is_some();

    flags.placeholder("credhubURL", identity.as_ref().map(|id| id.url.clone()));
    flags.placeholder(
        "credhubCACertPath",
        identity
            .as_ref()
            .and_then(|id| id.ca_certificate.as_ref())
            .map(|_| CREDHUB_CA_CERT_PATH.to_string()),
    );
    flags.placeholder(
        "uaaClientID",
        identity.as_ref().map(|id| id.uaa_client_id.clone()),
    );
    flags.placeholder(
        "uaaClientSecret",
        identity.as_ref().map(|id| id.uaa_client_secret.clone()),
    );

    flags.placeholder("storeID", credhub::store_id(properties, credhub_selected));
    flags.placeholder("logLevel", properties.get_scalar("log_level"));
    flags.placeholder("timeFormat", properties.get_scalar("log_time_format"));

    // ─── access-control options ──────────────────────────────────────
    let ldap = LdapMode::from_properties(properties)?;
    let credhub_full = variant == Variant::Push && credhub_selected;
    let profile = AccessProfile::select(ldap, credhub_full);
    debug!(?variant, ?profile, "selected access-control profile");
    flags.push("allowedOptions", profile.options());

    Ok(flags.into_inner())
}

/// Render the flags as a start script.
pub fn render(
    properties: &PropertyTree,
    links: &Links,
    variant: Variant,
) -> Result<String, ConfigError> {
    let flags = resolve(properties, links, variant)?;

    let mut script = String::from("#!/bin/bash\n\nset -e -x\n\nexec ");
    script.push_str(BROKER_BIN);
    for flag in &flags {
        script.push_str(" \\\n  ");
        script.push_str(flag);
    }
    script.push('\n');
    Ok(script)
}

/// Hostname precedence: manifest property, then the database link's first
/// instance address. A bound link with zero instances has no address and
/// falls through to the same error.
fn db_hostname(properties: &PropertyTree, links: &Links) -> Result<String, ConfigError> {
    if let Some(host) = properties.get_scalar("db.host") {
        return Ok(host);
    }
    links
        .find(DATABASE_LINK)
        .and_then(|link| link.first_address())
        .map(str::to_string)
        .ok_or(ConfigError::MissingDatabaseHost)
}

struct FlagList {
    variant: Variant,
    flags: Vec<String>,
}

impl FlagList {
    fn new(variant: Variant) -> Self {
        Self {
            variant,
            flags: Vec::new(),
        }
    }

    fn push(&mut self, name: &str, value: &str) {
        self.flags.push(format!("--{name}=\"{value}\""));
    }

    fn bare(&mut self, name: &str) {
        self.flags.push(format!("--{name}"));
    }

    /// Optional in both variants: emitted only when the value is present.
    fn optional(&mut self, name: &str, value: Option<String>) {
        if let Some(v) = value {
            self.push(name, &v);
        }
    }

    /// Variant-dependent: the server contract keeps the flag with an
    /// empty value, the push contract drops it.
    fn placeholder(&mut self, name: &str, value: Option<String>) {
        match (self.variant, value) {
            (_, Some(v)) => self.push(name, &v),
            (Variant::Server, None) => self.push(name, ""),
            (Variant::Push, None) => {}
        }
    }

    fn into_inner(self) -> Vec<String> {
        self.flags
    }
}
