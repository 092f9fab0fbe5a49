//! Request documents sent to the CMS.
//!
//! Both documents are plain values built per pipeline run. Nothing here is
//! shared between runs, so concurrent messages cannot see each other's data.
//!
//! [`build_creation_template`] is the Template Builder: a pure mapping from an
//! [`InboundMessage`] and the references resolved during the run to the
//! micro-app creation document.

use serde::Serialize;
use serde_json::Value;

use crate::message::InboundMessage;
use crate::permissions::{resolve_permissions, Permission};
use crate::taxonomy::{
    decode_selection, select_terms, strip_whitespace, NameMatch, Relationship, TaxonomyTerm,
};
use crate::{IconResource, ResourceId, ResourceType, TemplateError};

// ---------------------------------------------------------------------------
// Shared JSON:API pieces
// ---------------------------------------------------------------------------

/// A to-one relationship: `{ "data": { "type": ..., "id": ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToOne {
    pub data: Relationship,
}

/// A to-many relationship: `{ "data": [ ... ] }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToMany {
    pub data: Vec<Relationship>,
}

// ---------------------------------------------------------------------------
// Icon media request
// ---------------------------------------------------------------------------

/// Creates the `media--image` resource wrapping an uploaded icon file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconResourceRequest {
    pub data: IconResourceData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconResourceData {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub attributes: IconResourceAttributes,
    pub relationships: IconResourceRelationships,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconResourceAttributes {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconResourceRelationships {
    pub field_media_image: ToOne,
}

impl IconResourceRequest {
    pub fn new(name: impl Into<String>, file_id: ResourceId) -> Self {
        Self {
            data: IconResourceData {
                resource_type: ResourceType::media_image(),
                attributes: IconResourceAttributes { name: name.into() },
                relationships: IconResourceRelationships {
                    field_media_image: ToOne {
                        data: Relationship {
                            resource_type: ResourceType::file(),
                            id: file_id,
                        },
                    },
                },
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Creation template
// ---------------------------------------------------------------------------

/// Everything fetched from the CMS during a run that the creation template
/// refers to.
///
/// The template can only be built from a complete value of this type, so a
/// partially resolved template is never submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedReferences {
    pub icon: IconResource,
    pub permissions: Vec<Permission>,
    pub languages: Vec<TaxonomyTerm>,
    pub countries: Vec<TaxonomyTerm>,
    pub categories: Vec<TaxonomyTerm>,
}

/// The micro-app creation document (`node--micro_app`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreationTemplate {
    pub data: CreationData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreationData {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub attributes: MicroAppAttributes,
    pub relationships: MicroAppRelationships,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedText {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MicroAppAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_discovery_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_chat_uri: Option<String>,
    pub body: FormattedText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_developer: Option<String>,
    pub field_user_permissions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_momo: Option<Value>,
    /// JSON text of the mobile-money phone prefixes.
    pub field_momo_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_ozow_pay: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_contains_purchases: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_domains: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MicroAppRelationships {
    /// The uploaded icon file.
    pub field_image: ToOne,
    /// The icon media resource.
    pub field_media_image: ToOne,
    pub field_languages_term: ToMany,
    pub field_category: ToMany,
    pub field_countries_term: ToMany,
}

/// Maps an inbound message and its resolved references onto the creation
/// template.
pub fn build_creation_template(
    message: &InboundMessage,
    resolved: &ResolvedReferences,
) -> Result<CreationTemplate, TemplateError> {
    let data = &message.data;

    let permissions = resolve_permissions(&resolved.permissions, |name| message.requests(name));

    let mut wanted_languages = Vec::new();
    for selection in &data.languages {
        wanted_languages.extend(decode_selection("languages", &selection.name)?);
    }

    // Country selections may carry stray spaces inside the JSON text itself.
    let mut wanted_countries = Vec::new();
    for selection in &data.countries {
        wanted_countries.extend(decode_selection("countries", &strip_whitespace(&selection.name))?);
    }

    let wanted_categories = match &data.category {
        Some(raw) => decode_selection("category", raw)?,
        None => Vec::new(),
    };

    let momo_phone: Vec<Value> = data
        .momo_countries
        .as_ref()
        .map(|countries| countries.values().cloned().collect())
        .unwrap_or_default();

    Ok(CreationTemplate {
        data: CreationData {
            resource_type: ResourceType::micro_app(),
            attributes: MicroAppAttributes {
                title: data.title.clone(),
                field_discovery_uri: data.discovery_uri.clone(),
                field_chat_uri: data.chat_uri.clone(),
                body: FormattedText {
                    value: data.description.clone(),
                    summary: data.short_description.clone(),
                },
                field_developer: data.developer.clone(),
                field_user_permissions: permissions,
                field_momo: data.momo.clone(),
                field_momo_phone: Value::from(momo_phone).to_string(),
                field_ozow_pay: data.ozow.clone(),
                field_contains_purchases: data.billing.clone(),
                field_domains: data.domains.clone(),
            },
            relationships: MicroAppRelationships {
                field_image: ToOne {
                    data: Relationship {
                        resource_type: ResourceType::file(),
                        id: resolved.icon.file_id.clone(),
                    },
                },
                field_media_image: ToOne {
                    data: Relationship {
                        resource_type: ResourceType::media_image(),
                        id: resolved.icon.media_id.clone(),
                    },
                },
                field_languages_term: ToMany {
                    data: select_terms(&resolved.languages, &wanted_languages, NameMatch::Exact),
                },
                field_category: ToMany {
                    data: select_terms(&resolved.categories, &wanted_categories, NameMatch::Exact),
                },
                field_countries_term: ToMany {
                    data: select_terms(
                        &resolved.countries,
                        &wanted_countries,
                        NameMatch::IgnoreWhitespace,
                    ),
                },
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(s: &str) -> ResourceId {
        ResourceId::new(s).unwrap()
    }

    fn term(id_: &str, vocabulary: &str, name: &str) -> TaxonomyTerm {
        TaxonomyTerm {
            id: id(id_),
            resource_type: ResourceType::new(format!("taxonomy_term--{vocabulary}")).unwrap(),
            name: name.to_string(),
        }
    }

    fn message(data: Value) -> InboundMessage {
        InboundMessage::from_record_body(&json!({
            "Body": { "data": data },
            "Icon": { "Image": [{ "name": "icon.png", "url": "https://cdn.test/icon.png" }] }
        }))
        .unwrap()
    }

    fn resolved() -> ResolvedReferences {
        ResolvedReferences {
            icon: IconResource {
                media_id: id("media-1"),
                file_id: id("file-1"),
            },
            permissions: ["language", "profile", "message", "msisdn", "ozow", "momo"]
                .into_iter()
                .map(Permission::new)
                .collect(),
            languages: vec![
                term("l-en", "languages", "English"),
                term("l-fr", "languages", "French"),
            ],
            countries: vec![
                term("c-za", "countries", "South Africa"),
                term("c-gh", "countries", "Ghana"),
            ],
            categories: vec![
                term("g-games", "category", "Games"),
                term("g-news", "category", "News"),
            ],
        }
    }

    #[test]
    fn builds_complete_template() {
        let msg = message(json!({
            "title": "Quiz Master",
            "discoveryUri": "https://quiz.test/discover",
            "chatUri": "https://quiz.test/chat",
            "description": "A long description",
            "short_description": "Short",
            "developer": "Acme",
            "languages": [{ "name": "[\"English\"]" }],
            "countries": [{ "name": "[\"South Africa\", \"Kenya\"]" }],
            "category": "[\"Games\"]",
            "momo": true,
            "MomoCountries": { "za": "+27", "gh": "+233" },
            "ozow": true,
            "billing": false,
            "domains": "quiz.test",
            "language": true,
            "message": true,
            "msisdn": true
        }));

        let template = build_creation_template(&msg, &resolved()).unwrap();
        let doc = serde_json::to_value(&template).unwrap();

        assert_eq!(doc["data"]["type"], "node--micro_app");
        let attrs = &doc["data"]["attributes"];
        assert_eq!(attrs["title"], "Quiz Master");
        assert_eq!(attrs["body"]["value"], "A long description");
        assert_eq!(attrs["body"]["summary"], "Short");
        assert_eq!(attrs["field_developer"], "Acme");
        assert_eq!(attrs["field_momo_phone"], "[\"+27\",\"+233\"]");
        assert_eq!(attrs["field_contains_purchases"], false);
        assert_eq!(
            attrs["field_user_permissions"],
            json!(["UserLanguage", "SendMessage", "MSISDN", "MoMoCollections"])
        );

        let rels = &doc["data"]["relationships"];
        assert_eq!(rels["field_image"]["data"], json!({ "type": "file--file", "id": "file-1" }));
        assert_eq!(
            rels["field_media_image"]["data"],
            json!({ "type": "media--image", "id": "media-1" })
        );
        assert_eq!(
            rels["field_languages_term"]["data"],
            json!([{ "type": "taxonomy_term--languages", "id": "l-en" }])
        );
        assert_eq!(
            rels["field_countries_term"]["data"],
            json!([{ "type": "taxonomy_term--countries", "id": "c-za" }])
        );
        assert_eq!(
            rels["field_category"]["data"],
            json!([{ "type": "taxonomy_term--category", "id": "g-games" }])
        );
    }

    #[test]
    fn spaces_inside_country_json_are_ignored() {
        let msg = message(json!({
            "title": "x",
            "countries": [{ "name": "[ \"South  Africa\" ,\"Gha na\" ]" }]
        }));
        let template = build_creation_template(&msg, &resolved()).unwrap();
        let ids: Vec<&str> = template
            .data
            .relationships
            .field_countries_term
            .data
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c-za", "c-gh"]);
    }

    #[test]
    fn untitled_message_copies_flags_as_sent() {
        let msg = message(json!({ "momo": 1, "ozow": "yes", "billing": 0 }));
        let template = build_creation_template(&msg, &resolved()).unwrap();
        let attrs = serde_json::to_value(&template.data.attributes).unwrap();
        assert!(attrs.get("title").is_none());
        assert_eq!(attrs["field_momo"], 1);
        assert_eq!(attrs["field_ozow_pay"], "yes");
        assert_eq!(attrs["field_contains_purchases"], 0);
        assert_eq!(attrs["field_user_permissions"], json!(["MoMoCollections"]));
    }

    #[test]
    fn absent_optional_fields_are_omitted() {
        let template = build_creation_template(&message(json!({ "title": "x" })), &resolved()).unwrap();
        let attrs = serde_json::to_value(&template.data.attributes).unwrap();
        assert!(attrs.get("field_developer").is_none());
        assert_eq!(attrs["field_momo_phone"], "[]");
        assert_eq!(attrs["field_user_permissions"], json!([]));
    }

    #[test]
    fn malformed_category_fails_instead_of_submitting() {
        let msg = message(json!({ "title": "x", "category": "Games" }));
        assert_eq!(
            build_creation_template(&msg, &resolved()),
            Err(TemplateError::MalformedSelection {
                field: "category",
                value: "Games".to_string()
            })
        );
    }

    #[test]
    fn icon_request_links_uploaded_file() {
        let request = IconResourceRequest::new("icon.png", id("file-9"));
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({
                "data": {
                    "type": "media--image",
                    "attributes": { "name": "icon.png" },
                    "relationships": {
                        "field_media_image": { "data": { "type": "file--file", "id": "file-9" } }
                    }
                }
            })
        );
    }
}
