//! Authenticated request primitive against the configured service URL.
//!
//! One call is exactly one network round trip. Non-2xx statuses are returned
//! to the caller untouched: the same status means different things on
//! different endpoints, so classification happens where the endpoint is known.

pub mod link;
pub mod pagination;

use bytes::Bytes;
use reqwest::{Method, StatusCode};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{classify_response, ClientError, ErrorPhrase, Result};
use crate::validation::validate_service_url;

use self::link::LinkGroup;

pub const ACCEPT_JSON: &str = "application/json";

/// Request payload.
pub enum RequestBody {
    Empty,
    Multipart(reqwest::multipart::Form),
}

/// Raw response: status, body bytes and the parsed `Link` relations.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Bytes,
    pub links: LinkGroup,
}

impl ApiResponse {
    /// Target of the `next` pagination relation, if the server sent one.
    pub fn next_link(&self) -> Option<&str> {
        self.links.next().map(|l| l.uri.as_str())
    }

    /// Pass 2xx responses through; turn anything else into an error,
    /// recognising the endpoint's `known` error phrases.
    pub(crate) fn error_for_status(self, known: &[ErrorPhrase]) -> Result<Self> {
        if self.status.is_success() {
            return Ok(self);
        }
        Err(classify_response(self.status, &self.body, known))
    }
}

/// packagecloud API client.
///
/// Cheap to clone; clones share the connection pool and cancellation token.
#[derive(Clone)]
pub struct Client {
    base_url: Url,
    token: String,
    http: reqwest::Client,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client from an explicit configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let base_url = validate_service_url(&config.service_url, "service URL")?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("packagecloud-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            token: config.token,
            http,
            cancel: CancellationToken::new(),
        })
    }

    /// Builder: abort in-flight requests and pagination when `token` is
    /// cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolve a path or absolute URL against the service URL.
    pub fn resolve(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint)?)
    }

    /// Issue one authenticated request and read the whole body.
    ///
    /// The token is sent as the basic-auth username with an empty password.
    /// Transport failures are returned as-is; there is no retry.
    pub async fn request(
        &self,
        method: Method,
        url: Url,
        body: RequestBody,
        accept: &str,
    ) -> Result<ApiResponse> {
        tracing::debug!(method = %method, url = %url, "API request");

        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .header(reqwest::header::ACCEPT, accept)
            .basic_auth(&self.token, None::<&str>);

        if let RequestBody::Multipart(form) = body {
            builder = builder.multipart(form);
        }

        let response = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(ClientError::Cancelled),
            response = builder.send() => response?,
        };

        let status = response.status();
        let links = LinkGroup::from_headers(response.headers());

        let body = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(ClientError::Cancelled),
            body = response.bytes() => body?,
        };

        tracing::debug!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            bytes = body.len(),
            "API response"
        );

        Ok(ApiResponse {
            status,
            body,
            links,
        })
    }

    /// GET a JSON endpoint and fail on any non-2xx status.
    pub(crate) async fn get_json(&self, url: Url, known: &[ErrorPhrase]) -> Result<ApiResponse> {
        self.request(Method::GET, url, RequestBody::Empty, ACCEPT_JSON)
            .await?
            .error_for_status(known)
    }
}
