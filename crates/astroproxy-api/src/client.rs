// Async HTTP client for the AstroProxy REST API.
//
// Base path: /api/v1/
// Auth: `token` query parameter on every request

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::params::{Params, TOKEN_PARAM};
use crate::transport::TransportConfig;
use crate::types::{NetworkType, Ordering, PortSpec, PortUpdate};

/// Production endpoint of the provider.
pub const DEFAULT_BASE_URL: &str = "https://astroproxy.com";

/// Version segment prepended to every request path.
pub const API_PREFIX: &str = "/api/v1";

// ── Config ───────────────────────────────────────────────────────────

/// Everything needed to build an [`AstroProxyClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub api_key: SecretString,
    pub transport: TransportConfig,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the AstroProxy API.
///
/// Owns a single `reqwest` session bound to the base URL. The session is
/// shared by all calls, including concurrent ones, and must be released
/// with [`close`](Self::close) once the client is no longer needed.
///
/// Every method issues exactly one HTTP request and returns the decoded
/// JSON body verbatim. There are no retries and no schema checks.
#[derive(Debug)]
pub struct AstroProxyClient {
    session: RwLock<Option<reqwest::Client>>,
    base_url: Url,
    api_key: SecretString,
}

impl AstroProxyClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Client for the production endpoint with default transport settings.
    pub fn new(api_key: SecretString) -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, &TransportConfig::default())
    }

    /// Client for an arbitrary base URL (staging, mock servers).
    pub fn with_base_url(
        base_url: &str,
        api_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(http, base_url, api_key)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        http: reqwest::Client,
        base_url: &str,
        api_key: SecretString,
    ) -> Result<Self, Error> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::MissingApiKey);
        }
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self {
            session: RwLock::new(Some(http)),
            base_url,
            api_key,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        Self::with_base_url(
            config.base_url.as_str(),
            config.api_key.clone(),
            &config.transport,
        )
    }

    /// Strip a trailing slash and any trailing `/api/v1`, so the version
    /// prefix is applied exactly once. Query and fragment are dropped.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        url.set_query(None);
        url.set_fragment(None);

        let path = url.path().trim_end_matches('/');
        let path = path.strip_suffix(API_PREFIX).unwrap_or(path).to_owned();
        url.set_path(&path);

        Ok(url)
    }

    /// The provider base URL (without the version prefix).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Release the HTTP session.
    ///
    /// Returns `true` if this call released it and `false` if it was
    /// already closed. Later requests fail with [`Error::SessionClosed`].
    pub async fn close(&self) -> bool {
        let released = self.session.write().await.take().is_some();
        if released {
            debug!(base_url = %self.base_url, "session closed");
        } else {
            debug!("close called on an already closed session");
        }
        released
    }

    pub async fn is_closed(&self) -> bool {
        self.session.read().await.is_none()
    }

    async fn session(&self) -> Result<reqwest::Client, Error> {
        self.session.read().await.clone().ok_or(Error::SessionClosed)
    }

    // ── Request pipeline ─────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{API_PREFIX}{path}"))?)
    }

    /// Assemble and send one request.
    ///
    /// The token always travels in the query string. Payload fields go to
    /// the query string for GET/DELETE and to a form body for POST/PATCH.
    async fn request(&self, method: Method, path: &str, params: Params) -> Result<Value, Error> {
        let http = self.session().await?;
        let url = self.url(path)?;
        let fields = params.into_pairs();

        let names: Vec<&str> = fields.iter().map(|(k, _)| *k).collect();
        debug!("{method} {url} fields={names:?}");

        let token = [(TOKEN_PARAM, self.api_key.expose_secret())];
        let mut builder = http.request(method.clone(), url).query(&token);
        if !fields.is_empty() {
            builder = if method == Method::GET || method == Method::DELETE {
                builder.query(&fields)
            } else {
                builder.form(&fields)
            };
        }

        let resp = builder.send().await?;
        Self::handle_response(resp).await
    }

    async fn handle_response(resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        trace!(status = status.as_u16(), "response received");

        // Raw bytes: JSON must be valid UTF-8, so no lossy decoding before parsing.
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Account ──────────────────────────────────────────────────────

    pub async fn get_balance(&self) -> Result<Value, Error> {
        self.request(Method::GET, "/balance", Params::new()).await
    }

    // ── Ports ────────────────────────────────────────────────────────

    pub async fn list_ports(&self, ordering: Ordering) -> Result<Value, Error> {
        self.request(Method::GET, "/ports", ordering.to_params())
            .await
    }

    /// Rent a new port. The response carries the port and its price.
    pub async fn create_port(&self, spec: &PortSpec) -> Result<Value, Error> {
        self.request(Method::POST, "/ports", spec.to_params()).await
    }

    /// Price a port without creating it.
    pub async fn calculate_cost(&self, spec: &PortSpec) -> Result<Value, Error> {
        self.request(Method::POST, "/calculate", spec.to_params())
            .await
    }

    pub async fn delete_port(&self, port_id: u64) -> Result<Value, Error> {
        self.request(Method::DELETE, &format!("/ports/{port_id}"), Params::new())
            .await
    }

    pub async fn update_port(&self, port_id: u64, update: &PortUpdate) -> Result<Value, Error> {
        self.request(
            Method::PATCH,
            &format!("/ports/{port_id}"),
            update.to_params(),
        )
        .await
    }

    /// Extend a port by `volume` GB.
    pub async fn renew_port(&self, port_id: u64, volume: f64) -> Result<Value, Error> {
        self.request(
            Method::POST,
            &format!("/ports/{port_id}/renew"),
            Params::new().set("volume", volume),
        )
        .await
    }

    /// Force a new egress IP on the port.
    pub async fn rotate_ip(&self, port_id: u64) -> Result<Value, Error> {
        self.request(
            Method::GET,
            &format!("/ports/{port_id}/newip"),
            Params::new(),
        )
        .await
    }

    // ── Geo / network metadata ───────────────────────────────────────

    pub async fn list_countries(&self) -> Result<Value, Error> {
        self.request(Method::GET, "/countries", Params::new()).await
    }

    pub async fn list_cities(&self, country: &str) -> Result<Value, Error> {
        self.request(Method::GET, "/cities", Params::new().set("country", country))
            .await
    }

    pub async fn list_operators(
        &self,
        country: &str,
        city: &str,
        network: NetworkType,
    ) -> Result<Value, Error> {
        let params = Params::new()
            .set("country", country)
            .set("city", city)
            .set_token("network", &network);
        self.request(Method::GET, "/operators", params).await
    }

    /// Full country → city → operator tree.
    pub async fn list_all(&self) -> Result<Value, Error> {
        self.request(Method::GET, "/lists", Params::new()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> AstroProxyClient {
        AstroProxyClient::from_reqwest(
            reqwest::Client::new(),
            base,
            "key".to_string().into(),
        )
        .unwrap()
    }

    #[test]
    fn prefix_is_applied_once() {
        for base in [
            "https://astroproxy.com",
            "https://astroproxy.com/",
            "https://astroproxy.com/api/v1",
            "https://astroproxy.com/api/v1/",
        ] {
            let url = client(base).url("/balance").unwrap();
            assert_eq!(url.as_str(), "https://astroproxy.com/api/v1/balance", "base {base}");
        }
    }

    #[test]
    fn base_path_is_kept() {
        let url = client("http://localhost:8080/proxy/").url("/ports/7/newip").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/api/v1/ports/7/newip");
    }

    #[test]
    fn query_and_fragment_are_dropped() {
        let url = client("https://astroproxy.com/?x=1#top").url("/balance").unwrap();
        assert_eq!(url.as_str(), "https://astroproxy.com/api/v1/balance");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let result = AstroProxyClient::from_reqwest(
            reqwest::Client::new(),
            DEFAULT_BASE_URL,
            String::new().into(),
        );
        assert!(matches!(result, Err(Error::MissingApiKey)));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = AstroProxyClient::from_reqwest(
            reqwest::Client::new(),
            "not a url",
            "key".to_string().into(),
        );
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn debug_does_not_leak_key() {
        let rendered = format!("{:?}", client(DEFAULT_BASE_URL));
        assert!(!rendered.contains("\"key\""));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let client = client(DEFAULT_BASE_URL);
        assert!(!client.is_closed().await);
        assert!(client.close().await);
        assert!(!client.close().await);
        assert!(client.is_closed().await);
        assert!(matches!(client.get_balance().await, Err(Error::SessionClosed)));
    }
}
