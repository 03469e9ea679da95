//! Permitted mount-option profiles
//!
//! The allowedOptions flag carries exactly one of five fixed
//! comma-joined lists, selected by a decision table over the ldap mode
//! switches and (in push flows) whether a credhub identity was selected.
//! The lists are wire contracts with the broker binary; never reorder
//! them.

use crate::error::ConfigError;
use crate::properties::PropertyTree;

/// Mutually exclusive ldap mode switches from the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LdapMode {
    #[default]
    Off,
    Enabled,
    TestMode,
}

impl LdapMode {
    /// Read `ldap_enabled` / `ldap_test_mode`. Both set at once has no
    /// defined precedence and is rejected.
    pub fn from_properties(properties: &PropertyTree) -> Result<Self, ConfigError> {
        let enabled = properties.get_bool("ldap_enabled").unwrap_or(false);
        let test_mode = properties.get_bool("ldap_test_mode").unwrap_or(false);

        match (enabled, test_mode) {
            (true, true) => Err(ConfigError::ConflictingLdapModes),
            (true, false) => Ok(LdapMode::Enabled),
            (false, true) => Ok(LdapMode::TestMode),
            (false, false) => Ok(LdapMode::Off),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessProfile {
    Default,
    Ldap,
    LdapTest,
    CredhubFull,
    CredhubLdapFull,
}

impl AccessProfile {
    /// Decision table. `credhub_full` applies only in push flows with a
    /// selected credhub identity; server flows always pass false.
    pub fn select(ldap: LdapMode, credhub_full: bool) -> Self {
        match (credhub_full, ldap) {
            (false, LdapMode::Off) => AccessProfile::Default,
            (false, LdapMode::Enabled) => AccessProfile::Ldap,
            (false, LdapMode::TestMode) => AccessProfile::LdapTest,
            (true, LdapMode::Off) => AccessProfile::CredhubFull,
            (true, LdapMode::Enabled | LdapMode::TestMode) => AccessProfile::CredhubLdapFull,
        }
    }

    pub const fn options(self) -> &'static str {
        match self {
            AccessProfile::Default => "uid,gid,auto_cache,version",
            AccessProfile::Ldap => "auto_cache,username,password,version",
            AccessProfile::LdapTest => "auto_cache,uid,gid,username,password,version",
            AccessProfile::CredhubFull => {
                "source,uid,gid,auto_cache,readonly,version,mount,cache"
            }
            AccessProfile::CredhubLdapFull => {
                "source,auto_cache,username,password,readonly,version,mount,cache"
            }
        }
    }
}
