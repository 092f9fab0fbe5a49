//! JSON:API response shapes read by the session.
//!
//! Only the members the pipeline uses are modelled; everything else in the
//! CMS responses is ignored.

use pipeline::{Permission, ResourceId, ResourceType, TaxonomyTerm};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct Document<T> {
    pub data: T,
    #[serde(default)]
    pub links: Option<Links>,
}

impl<T> Document<T> {
    /// URL of the next page, when the collection is paginated.
    pub fn next_page(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|links| links.next.as_ref())
            .map(|link| link.href.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Links {
    #[serde(default)]
    pub next: Option<Link>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Link {
    pub href: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Identified {
    pub id: ResourceId,
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct MediaResource {
    pub id: ResourceId,
    pub relationships: MediaRelationships,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MediaRelationships {
    pub field_media_image: Document<Identified>,
}

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct TermResource {
    pub id: ResourceId,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub attributes: TermAttributes,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TermAttributes {
    pub name: String,
}

impl From<TermResource> for TaxonomyTerm {
    fn from(term: TermResource) -> Self {
        TaxonomyTerm {
            id: term.id,
            resource_type: term.resource_type,
            name: term.attributes.name,
        }
    }
}

// ---------------------------------------------------------------------------
// Permission catalog
// ---------------------------------------------------------------------------

/// `data[n].attributes.permissions.permissions`
#[derive(Debug, Deserialize)]
pub(crate) struct PermissionPage {
    pub attributes: PermissionAttributes,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PermissionAttributes {
    pub permissions: PermissionList,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PermissionList {
    #[serde(default)]
    pub permissions: Vec<Permission>,
}
