//! Certificate file export
//!
//! Verbatim passthrough of an optional PEM-like property: the literal
//! content when set, the empty string when unset. No structure checks.

use crate::properties::PropertyTree;

/// On-disk path the db CA certificate is written to; the startup flags
/// reference it via --dbCACertPath instead of embedding the content.
pub const DB_CA_CERT_PATH: &str = "./db_ca.crt";

/// On-disk path for a credhub link's exported CA certificate.
pub const CREDHUB_CA_CERT_PATH: &str = "./credhub_ca.crt";

pub fn render(properties: &PropertyTree, key: &str) -> String {
    properties.get_str(key).unwrap_or_default().to_string()
}
