//! REST client for the WenShop backend.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`
//! - Every response is wrapped in `{ "success": bool, "data": T, "message"?: string }`
//! - The backend is the source of truth; product reads are cached in memory via
//!   `moka` for a configurable TTL
//! - No retries: a failed call surfaces immediately as an [`ApiError`]
//!
//! # Endpoints
//!
//! ```text
//! GET  /products                 - full catalog
//! GET  /products/{id}            - single product
//! GET  /products/featured/list   - featured products
//! POST /auth/login               - returns { token, user }
//! POST /auth/register            - returns { token, user }
//! ```

mod cache;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use wenshop_core::{LoginCredentials, Product, ProductId, RegisterData, User};

use crate::config::ApiConfig;

use cache::{CacheKey, CacheValue};

/// Message used when the backend rejects a request without explaining why.
const DEFAULT_BACKEND_MESSAGE: &str = "Erro de autenticação";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an error status or `success: false`.
    #[error("API error: {status} - {message}")]
    Backend { status: u16, message: String },

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The body was not the expected JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The envelope reported success but carried no data.
    #[error("Response for {0} has no data")]
    MissingData(String),
}

impl ApiError {
    /// Message safe to show to shoppers.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend { message, .. } => message.clone(),
            Self::Http(_) => "Erro de rede. Por favor, tente novamente.".to_string(),
            Self::NotFound(_) => "Recurso não encontrado.".to_string(),
            Self::Parse(_) | Self::MissingData(_) => {
                "Resposta inesperada do servidor. Tente novamente.".to_string()
            }
        }
    }
}

/// Token and user returned by the login and register endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawAuthSession")]
pub struct AuthSession {
    pub token: SecretString,
    pub user: User,
}

#[derive(Deserialize)]
struct RawAuthSession {
    token: String,
    user: User,
}

impl From<RawAuthSession> for AuthSession {
    fn from(raw: RawAuthSession) -> Self {
        Self {
            token: SecretString::from(raw.token),
            user: raw.user,
        }
    }
}

/// Response envelope used by every endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: Option<bool>,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the WenShop REST backend.
///
/// Cheap to clone; clones share the HTTP connection pool and product cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.product_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Send a request and unwrap the response envelope.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let request = match token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            tracing::warn!(path, error = %e, "Backend request failed");
            ApiError::Http(e)
        })?;
        let status = response.status();
        let body = response.text().await?;

        decode_response(status, &body, path)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Fetch the full catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    #[instrument(skip(self, token))]
    pub async fn list_products(
        &self,
        token: Option<&SecretString>,
    ) -> Result<Vec<Product>, ApiError> {
        self.cached_list(CacheKey::Products, "/products", token).await
    }

    /// Fetch the featured products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    #[instrument(skip(self, token))]
    pub async fn featured_products(
        &self,
        token: Option<&SecretString>,
    ) -> Result<Vec<Product>, ApiError> {
        self.cached_list(CacheKey::Featured, "/products/featured/list", token)
            .await
    }

    async fn cached_list(
        &self,
        key: CacheKey,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            debug!(?key, "Cache hit for product list");
            return Ok(products.as_ref().clone());
        }

        let products: Vec<Product> = self
            .execute(self.inner.client.get(self.url(path)), path, token)
            .await?;

        self.inner
            .cache
            .insert(key, CacheValue::Products(Arc::new(products.clone())))
            .await;

        Ok(products)
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for unknown ids, or another error if the
    /// request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn get_product(
        &self,
        id: ProductId,
        token: Option<&SecretString>,
    ) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let path = format!("/products/{id}");
        let product: Product = self
            .execute(self.inner.client.get(self.url(&path)), &path, token)
            .await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Reach the backend without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    pub async fn ping(&self) -> Result<(), ApiError> {
        let path = "/products";
        self.execute::<serde_json::Value>(self.inner.client.get(self.url(path)), path, None)
            .await
            .map(|_| ())
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] when the backend rejects the credentials.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, ApiError> {
        let path = "/auth/login";
        self.execute(
            self.inner.client.post(self.url(path)).json(credentials),
            path,
            None,
        )
        .await
    }

    /// Create an account and receive a token for it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] when the backend rejects the registration.
    #[instrument(skip(self, data), fields(email = %data.email))]
    pub async fn register(&self, data: &RegisterData) -> Result<AuthSession, ApiError> {
        let path = "/auth/register";
        self.execute(
            self.inner.client.post(self.url(path)).json(data),
            path,
            None,
        )
        .await
    }
}

/// Map a status and body onto the envelope's data or an [`ApiError`].
fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
    path: &str,
) -> Result<T, ApiError> {
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(path.to_string()));
    }

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(body)
            .unwrap_or_default()
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_MESSAGE.to_string());
        tracing::warn!(
            path,
            status = %status,
            body = %body.chars().take(200).collect::<String>(),
            "Backend returned non-success status"
        );
        return Err(ApiError::Backend {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            path,
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse backend response"
        );
        ApiError::Parse(e)
    })?;

    if envelope.success == Some(false) {
        return Err(ApiError::Backend {
            status: status.as_u16(),
            message: envelope
                .message
                .unwrap_or_else(|| DEFAULT_BACKEND_MESSAGE.to_string()),
        });
    }

    envelope
        .data
        .ok_or_else(|| ApiError::MissingData(path.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    const PRODUCT_JSON: &str = r#"{"id":1,"name":"Mouse","description":"Sem fio","price":89.9,"imageUrl":"/m.jpg","category":"acessorios","stock":3}"#;

    #[test]
    fn test_decode_product_list() {
        let body = format!(r#"{{"success":true,"data":[{PRODUCT_JSON}]}}"#);
        let products: Vec<Product> = decode_response(StatusCode::OK, &body, "/products").unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Mouse");
    }

    #[test]
    fn test_decode_without_success_flag() {
        let body = format!(r#"{{"data":{PRODUCT_JSON}}}"#);
        let product: Product = decode_response(StatusCode::OK, &body, "/products/1").unwrap();
        assert_eq!(product.id, ProductId::new(1));
    }

    #[test]
    fn test_decode_not_found() {
        let err = decode_response::<Product>(StatusCode::NOT_FOUND, "", "/products/9").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref p) if p == "/products/9"));
    }

    #[test]
    fn test_decode_backend_message() {
        let err = decode_response::<AuthSession>(
            StatusCode::UNAUTHORIZED,
            r#"{"success":false,"message":"Senha incorreta"}"#,
            "/auth/login",
        )
        .unwrap_err();
        assert_eq!(err.user_message(), "Senha incorreta");
    }

    #[test]
    fn test_decode_backend_error_without_body() {
        let err = decode_response::<AuthSession>(StatusCode::BAD_GATEWAY, "<html>", "/auth/login")
            .unwrap_err();
        assert!(matches!(err, ApiError::Backend { status: 502, .. }));
        assert_eq!(err.user_message(), DEFAULT_BACKEND_MESSAGE);
    }

    #[test]
    fn test_decode_success_false_with_ok_status() {
        let err = decode_response::<Vec<Product>>(
            StatusCode::OK,
            r#"{"success":false,"message":"Manutenção"}"#,
            "/products",
        )
        .unwrap_err();
        assert_eq!(err.user_message(), "Manutenção");
    }

    #[test]
    fn test_decode_missing_data() {
        let err = decode_response::<Vec<Product>>(StatusCode::OK, r#"{"success":true}"#, "/products")
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingData(_)));
    }

    #[test]
    fn test_decode_malformed_json() {
        let err = decode_response::<Vec<Product>>(StatusCode::OK, "not json", "/products")
            .unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn test_decode_auth_session() {
        let body = r#"{"success":true,"data":{"token":"jwt-1","user":{"id":5,"name":"Ana","email":"ana@x.com"}}}"#;
        let session: AuthSession = decode_response(StatusCode::OK, body, "/auth/login").unwrap();
        assert_eq!(session.token.expose_secret(), "jwt-1");
        assert_eq!(session.user.name, "Ana");
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let config = ApiConfig::new("http://localhost:3001/").unwrap();
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/products"), "http://localhost:3001/products");
    }
}
