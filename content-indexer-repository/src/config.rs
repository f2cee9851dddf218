//! Access configuration for the search engine.

/// Region used for request signing when none is configured.
pub const DEFAULT_REGION: &str = "eu-west-1";

/// Endpoint and credentials of the search engine.
///
/// Requests are signed with AWS SigV4 only when both the access key and the
/// secret key are non-empty.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

impl AccessConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_key: String::new(),
            secret_key: String::new(),
            region: DEFAULT_REGION.to_string(),
        }
    }

    /// Attach AWS credentials used to sign every request.
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        self.access_key = access_key.into();
        self.secret_key = secret_key.into();
        self.region = region.into();
        self
    }

    pub fn signs_requests(&self) -> bool {
        !self.access_key.is_empty() && !self.secret_key.is_empty()
    }

    /// The endpoint as a URL, defaulting to HTTPS when no scheme is given.
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.contains("://") {
            self.endpoint.clone()
        } else {
            format!("https://{}", self.endpoint)
        }
    }
}
