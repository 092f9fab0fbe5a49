//! Permission catalog and the permission-name translation table.
//!
//! The CMS publishes a catalog of permission keys. An inbound message flags
//! the keys it needs; each flagged key is translated to the canonical
//! permission name the micro-app entity stores.

use serde::Deserialize;

/// One entry of the CMS permission catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Permission {
    pub name: String,
}

impl Permission {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Keys whose canonical name is not derived by capitalisation.
///
/// Both payment-provider keys collapse onto one collections permission.
const CANONICAL_NAMES: &[(&str, &str)] = &[
    ("language", "UserLanguage"),
    ("profile", "UserProfile"),
    ("presence", "UserPresence"),
    ("message", "SendMessage"),
    ("msisdn", "MSISDN"),
    ("ozow", "MoMoCollections"),
    ("momo", "MoMoCollections"),
];

/// Translates a catalog key to its canonical permission name.
///
/// Keys absent from the table get their spaces removed and their first
/// letter upper-cased (`"location data"` becomes `"Locationdata"`).
pub fn canonical_name(key: &str) -> String {
    if let Some((_, canonical)) = CANONICAL_NAMES.iter().find(|(k, _)| *k == key) {
        return (*canonical).to_string();
    }

    let compact: String = key.chars().filter(|c| *c != ' ').collect();
    let mut chars = compact.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolves the canonical names of every catalog permission for which
/// `is_requested` holds, in catalog order with duplicates removed.
pub fn resolve_permissions(
    catalog: &[Permission],
    is_requested: impl Fn(&str) -> bool,
) -> Vec<String> {
    let mut resolved: Vec<String> = Vec::new();
    for permission in catalog.iter().filter(|p| is_requested(&p.name)) {
        let name = canonical_name(&permission.name);
        if !resolved.contains(&name) {
            resolved.push(name);
        }
    }
    resolved
}
