use url::Url;

use crate::error::ApiError;

/// Backend used when no `BACKEND_URL` was set at build time.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Client configuration, built once and handed to everything that talks to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    backend_url: String,
}

impl ClientConfig {
    /// Validate `backend_url` and normalize it to have no trailing slash.
    pub fn new(backend_url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(backend_url)
            .map_err(|e| ApiError::Config(format!("Invalid backend URL '{}': {}", backend_url, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "Backend URL must be http or https, got '{}'",
                parsed.scheme()
            )));
        }

        Ok(Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build from the `BACKEND_URL` captured at compile time.
    pub fn from_build_env() -> Result<Self, ApiError> {
        Self::new(option_env!("BACKEND_URL").unwrap_or(DEFAULT_BACKEND_URL))
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Absolute URL for `endpoint`.
    ///
    /// Endpoints that are already absolute are returned untouched so the base is
    /// never applied twice.
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        if endpoint.starts_with('/') {
            format!("{}{}", self.backend_url, endpoint)
        } else {
            format!("{}/{}", self.backend_url, endpoint)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_concatenates_once() {
        let config = ClientConfig::new("http://localhost:8080").unwrap();
        assert_eq!(config.resolve("/projects"), "http://localhost:8080/projects");
    }

    #[test]
    fn test_trailing_slash_is_normalized() {
        let config = ClientConfig::new("https://media.example.com/api/").unwrap();
        assert_eq!(config.backend_url(), "https://media.example.com/api");
        assert_eq!(
            config.resolve("/projects/abc"),
            "https://media.example.com/api/projects/abc"
        );
    }

    #[test]
    fn test_absolute_endpoint_is_not_prefixed() {
        let config = ClientConfig::new("http://localhost:8080").unwrap();
        let thumb = "http://localhost:8080/outputs/abc/frames/ffout_thumbnail_0001.webp";
        assert_eq!(config.resolve(thumb), thumb);
    }

    #[test]
    fn test_relative_endpoint_gets_separator() {
        let config = ClientConfig::new("http://localhost:8080").unwrap();
        assert_eq!(config.resolve("projects"), "http://localhost:8080/projects");
    }

    #[test]
    fn test_invalid_urls_are_rejected() {
        assert!(matches!(ClientConfig::new("not a url"), Err(ApiError::Config(_))));
        assert!(matches!(
            ClientConfig::new("ftp://files.example.com"),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn test_build_env_default_is_valid() {
        assert!(ClientConfig::from_build_env().is_ok());
    }
}
