//! Taxonomy reference sets and name matching.
//!
//! The CMS exposes languages, countries and categories as taxonomy terms.
//! Inbound messages name the terms they want; this module decodes those
//! names and picks the matching terms out of a freshly fetched reference set.

use serde::Serialize;
use serde_json::Value;

use crate::{ResourceId, ResourceType, TemplateError};

/// The taxonomy vocabularies the pipeline resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyKind {
    Languages,
    Countries,
    Categories,
}

impl TaxonomyKind {
    /// The CMS vocabulary machine name.
    pub fn vocabulary(self) -> &'static str {
        match self {
            Self::Languages => "languages",
            Self::Countries => "countries",
            Self::Categories => "category",
        }
    }
}

impl std::fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.vocabulary())
    }
}

/// One term from a taxonomy reference set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyTerm {
    pub id: ResourceId,
    pub resource_type: ResourceType,
    pub name: String,
}

/// A JSON:API resource identifier object: `{ "type": ..., "id": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub id: ResourceId,
}

impl From<&TaxonomyTerm> for Relationship {
    fn from(term: &TaxonomyTerm) -> Self {
        Self {
            resource_type: term.resource_type.clone(),
            id: term.id.clone(),
        }
    }
}

/// How requested names are compared with term names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    /// Names must be identical.
    Exact,
    /// Names are compared after removing all whitespace from both sides.
    IgnoreWhitespace,
}

impl NameMatch {
    fn normalise(self, name: &str) -> String {
        match self {
            Self::Exact => name.to_string(),
            Self::IgnoreWhitespace => strip_whitespace(name),
        }
    }
}

/// Removes every whitespace character from `s`.
pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Decodes one JSON-encoded selection into a flat list of names.
///
/// Accepts a JSON string (one name) or a list whose entries are names or
/// lists of names. Non-string entries are ignored.
///
/// This decoding is fragile: upstream nests JSON text inside otherwise plain
/// objects and that shape is not a documented contract.
pub fn decode_selection(field: &'static str, raw: &str) -> Result<Vec<String>, TemplateError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|_| TemplateError::MalformedSelection {
            field,
            value: raw.to_string(),
        })?;

    let mut names = Vec::new();
    match value {
        Value::String(name) => names.push(name),
        Value::Array(entries) => {
            for entry in entries {
                match entry {
                    Value::String(name) => names.push(name),
                    Value::Array(nested) => names.extend(
                        nested
                            .into_iter()
                            .filter_map(|v| v.as_str().map(str::to_string)),
                    ),
                    _ => {}
                }
            }
        }
        _ => {}
    }
    Ok(names)
}

/// Projects the terms whose name was requested to relationship objects,
/// preserving reference-set order.
pub fn select_terms(terms: &[TaxonomyTerm], requested: &[String], mode: NameMatch) -> Vec<Relationship> {
    let wanted: Vec<String> = requested.iter().map(|n| mode.normalise(n)).collect();
    terms
        .iter()
        .filter(|term| wanted.contains(&mode.normalise(&term.name)))
        .map(Relationship::from)
        .collect()
}
