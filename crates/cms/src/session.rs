use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use pipeline::{
    CmsSession, CreationTemplate, IconResource, IconResourceRequest, IntegrationError, Permission,
    ResourceId, Submission, TaxonomyKind, TaxonomyTerm,
};
use reqwest::header::{ACCEPT, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::documents::{Document, Identified, MediaResource, PermissionPage, TermResource};
use crate::http::{decode, ensure_success, transport, JSON_API};
use crate::CmsConfig;

const CSRF_HEADER: &str = "x-csrf-token";

/// Upper bound on taxonomy pages followed in one listing.
const MAX_TERM_PAGES: usize = 100;

/// An authenticated JSON:API session: a cookie-carrying client plus the
/// CSRF token issued for it.
pub struct JsonApiSession {
    http: Client,
    config: Arc<CmsConfig>,
    csrf_token: String,
}

impl std::fmt::Debug for JsonApiSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonApiSession")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl JsonApiSession {
    /// Logs in with the configured credentials and fetches a CSRF token.
    #[instrument(skip_all, fields(base_url = %config.base_url))]
    pub async fn login(config: Arc<CmsConfig>) -> Result<Self, IntegrationError> {
        let http = Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(config.timeout)
            .build()
            .map_err(transport)?;

        let login = http
            .post(config.url("/user/login?_format=json"))
            .json(&json!({ "name": config.username, "pass": config.password }))
            .send()
            .await
            .map_err(transport)?;
        ensure_success(login).await?;
        debug!("Logged in");

        let token = http
            .get(config.url("/session/token"))
            .send()
            .await
            .map_err(transport)?;
        let token = ensure_success(token)
            .await?
            .text()
            .await
            .map_err(transport)?
            .trim()
            .to_string();
        if token.is_empty() {
            return Err(IntegrationError::Empty { what: "CSRF token" });
        }

        Ok(Self {
            http,
            config,
            csrf_token: token,
        })
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.http
            .get(url)
            .header(ACCEPT, JSON_API)
            .header(CSRF_HEADER, &self.csrf_token)
    }

    fn post_document<T: Serialize>(
        &self,
        path: &str,
        document: &T,
    ) -> Result<RequestBuilder, IntegrationError> {
        let body = serde_json::to_vec(document).map_err(|e| IntegrationError::Decode {
            message: e.to_string(),
        })?;
        Ok(self
            .http
            .post(self.config.url(path))
            .header(ACCEPT, JSON_API)
            .header(CONTENT_TYPE, JSON_API)
            .header(CSRF_HEADER, &self.csrf_token)
            .body(body))
    }
}

/// Quotes are not allowed inside the `filename` parameter.
fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name.chars().filter(|c| *c != '"' && !c.is_control()).collect();
    format!("file; filename=\"{safe}\"")
}

#[async_trait]
impl CmsSession for JsonApiSession {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ResourceId, IntegrationError> {
        let response = self
            .http
            .post(self.config.url("/jsonapi/media/image/field_media_image"))
            .header(ACCEPT, JSON_API)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_DISPOSITION, content_disposition(file_name))
            .header(CSRF_HEADER, &self.csrf_token)
            .body(bytes)
            .send()
            .await
            .map_err(transport)?;
        let document: Document<Identified> = decode(response).await?;
        debug!(file_id = %document.data.id, "Icon uploaded");
        Ok(document.data.id)
    }

    #[instrument(skip_all)]
    async fn create_icon_resource(
        &self,
        request: &IconResourceRequest,
    ) -> Result<IconResource, IntegrationError> {
        let response = self
            .post_document("/jsonapi/media/image", request)?
            .send()
            .await
            .map_err(transport)?;
        let document: Document<MediaResource> = decode(response).await?;
        let media = document.data;
        debug!(media_id = %media.id, "Icon resource created");
        Ok(IconResource {
            media_id: media.id,
            file_id: media.relationships.field_media_image.data.id,
        })
    }

    #[instrument(skip_all)]
    async fn list_permissions(&self) -> Result<Vec<Permission>, IntegrationError> {
        let response = self
            .get(&self.config.url(&self.config.permissions_path))
            .send()
            .await
            .map_err(transport)?;
        let document: Document<Vec<PermissionPage>> = decode(response).await?;
        let page = document
            .data
            .into_iter()
            .next()
            .ok_or(IntegrationError::Empty {
                what: "permission catalog",
            })?;
        Ok(page.attributes.permissions.permissions)
    }

    #[instrument(skip(self))]
    async fn list_terms(&self, kind: TaxonomyKind) -> Result<Vec<TaxonomyTerm>, IntegrationError> {
        let mut url = self
            .config
            .url(&format!("/jsonapi/taxonomy_term/{}", kind.vocabulary()));
        let mut terms = Vec::new();
        let mut visited = HashSet::new();
        loop {
            if visited.len() >= MAX_TERM_PAGES {
                return Err(IntegrationError::Decode {
                    message: format!("taxonomy listing exceeded {MAX_TERM_PAGES} pages"),
                });
            }
            visited.insert(url.clone());

            let response = self.get(&url).send().await.map_err(transport)?;
            let document: Document<Vec<TermResource>> = decode(response).await?;
            let next = document.next_page().map(str::to_string);
            terms.extend(document.data.into_iter().map(TaxonomyTerm::from));

            let Some(next) = next else {
                break;
            };
            if visited.contains(&next) {
                return Err(IntegrationError::Decode {
                    message: format!("taxonomy pagination loops back to {next}"),
                });
            }
            url = next;
        }
        debug!(count = terms.len(), "Terms loaded");
        Ok(terms)
    }

    #[instrument(skip_all)]
    async fn create_micro_app(
        &self,
        template: &CreationTemplate,
    ) -> Result<Submission, IntegrationError> {
        let response = self
            .post_document("/jsonapi/node/micro_app", template)?
            .send()
            .await
            .map_err(transport)?;
        let response = ensure_success(response).await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(transport)?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| IntegrationError::Decode {
                message: e.to_string(),
            })?
        };
        debug!(status, "Micro app created");
        Ok(Submission { status, body })
    }
}
