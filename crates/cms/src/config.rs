use std::time::Duration;

/// Default location of the permission catalog document.
pub const DEFAULT_PERMISSIONS_PATH: &str = "/jsonapi/config_pages/micro_app_permissions";

/// Connection settings for the CMS.
#[derive(Clone)]
pub struct CmsConfig {
    /// CMS origin, e.g. `https://devcms.example.org`. A trailing slash is ignored.
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Path of the permission catalog, relative to `base_url`.
    pub permissions_path: String,
    /// Skip TLS certificate verification (self-signed development hosts).
    pub accept_invalid_certs: bool,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl CmsConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            permissions_path: DEFAULT_PERMISSIONS_PATH.to_string(),
            accept_invalid_certs: false,
            timeout: Duration::from_secs(30),
        }
    }

    /// Joins `path` (which may carry a query string) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl std::fmt::Debug for CmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmsConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("permissions_path", &self.permissions_path)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("timeout", &self.timeout)
            .finish()
    }
}
