/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The static shared secret callers must present in [`API_KEY_HEADER`].
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for an empty key; an empty secret would accept anyone
    /// sending an empty header.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    /// Returns `true` if `presented` is exactly this key.
    pub fn matches(&self, presented: Option<&str>) -> bool {
        presented.is_some_and(|p| p == self.0)
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([redacted])")
    }
}
