//! Integration tests for WenShop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p wenshop-integration-tests
//! ```
//!
//! Each test starts a mock REST backend and a storefront on ephemeral ports,
//! then drives the storefront over HTTP with a cookie-keeping client. No
//! external services are needed.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use wenshop_storefront::config::StorefrontConfig;
use wenshop_storefront::state::AppState;

/// Email of the account every mock backend starts with.
pub const SEEDED_EMAIL: &str = "ana@wenshop.com";

/// Password of the seeded account.
pub const SEEDED_PASSWORD: &str = "123456";

// =============================================================================
// Mock backend
// =============================================================================

#[derive(Debug, Clone)]
struct MockUser {
    id: i64,
    name: String,
    email: String,
    password: String,
}

struct BackendState {
    products: Vec<Value>,
    featured_available: bool,
    users: Mutex<Vec<MockUser>>,
    product_auth_headers: Mutex<Vec<Option<String>>>,
}

/// An in-process stand-in for the WenShop REST backend.
#[derive(Clone)]
pub struct MockBackend {
    state: Arc<BackendState>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Backend with the standard catalog and one seeded account.
    #[must_use]
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Backend whose featured endpoint fails.
    #[must_use]
    pub fn without_featured() -> Self {
        Self::build(false)
    }

    fn build(featured_available: bool) -> Self {
        Self {
            state: Arc::new(BackendState {
                products: catalog(),
                featured_available,
                users: Mutex::new(vec![MockUser {
                    id: 1,
                    name: "Ana Souza".to_string(),
                    email: SEEDED_EMAIL.to_string(),
                    password: SEEDED_PASSWORD.to_string(),
                }]),
                product_auth_headers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// `Authorization` headers seen on product detail requests, in order.
    ///
    /// # Panics
    ///
    /// Panics if the record lock is poisoned.
    #[must_use]
    pub fn product_auth_headers(&self) -> Vec<Option<String>> {
        self.state
            .product_auth_headers
            .lock()
            .expect("auth header lock poisoned")
            .clone()
    }

    fn router(&self) -> Router {
        let api = Router::new()
            .route("/products", get(list_products))
            .route("/products/featured/list", get(featured_products))
            .route("/products/{id}", get(get_product))
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .with_state(self.clone());

        Router::new().nest("/api", api)
    }

    /// Serve on an ephemeral port and return the API base URL.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn spawn(&self) -> String {
        let addr = serve(self.router()).await;
        format!("http://{addr}/api")
    }
}

fn product(id: i64, name: &str, description: &str, price: f64, category: &str, stock: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": description,
        "price": price,
        "imageUrl": format!("https://images.wenshop.test/{id}.jpg"),
        "category": category,
        "stock": stock,
    })
}

fn catalog() -> Vec<Value> {
    vec![
        product(1, "iPhone 15", "Smartphone Apple com câmera de 48MP", 7999.0, "smartphones", 10),
        product(2, "Galaxy S24", "Tela AMOLED de 6,2 polegadas", 5499.9, "smartphones", 5),
        product(3, "MacBook Air", "Chip M3 e bateria para o dia todo", 9999.9, "laptops", 3),
        product(4, "Headset Gamer", "Som surround 7.1", 299.9, "acessorios", 0),
        product(5, "Controle Pro", "Controle sem fio para console", 399.9, "games", 8),
        product(6, "Cabo USB-C 1m", "Carregamento rápido", 49.9, "acessorios", 50),
        product(7, "Cabo USB-C 2m", "Carregamento rápido", 59.9, "acessorios", 50),
        product(8, "Cabo HDMI", "Suporte a 4K", 39.9, "acessorios", 50),
        product(9, "Cabo Lightning", "Certificado MFi", 69.9, "acessorios", 50),
        product(10, "Cabo de Rede", "Cat 6", 29.9, "acessorios", 50),
        product(11, "Cabo P2", "Áudio estéreo", 19.9, "acessorios", 50),
    ]
}

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

async fn list_products(State(backend): State<MockBackend>) -> Response {
    ok(Value::Array(backend.state.products.clone()))
}

async fn featured_products(State(backend): State<MockBackend>) -> Response {
    if !backend.state.featured_available {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Erro interno");
    }

    let featured: Vec<Value> = backend
        .state
        .products
        .iter()
        .filter(|p| matches!(p["id"].as_i64(), Some(3 | 5)))
        .cloned()
        .collect();
    ok(Value::Array(featured))
}

async fn get_product(
    State(backend): State<MockBackend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    if let Ok(mut seen) = backend.state.product_auth_headers.lock() {
        seen.push(auth);
    }

    backend
        .state
        .products
        .iter()
        .find(|p| p["id"].as_i64() == Some(id))
        .map_or_else(
            || fail(StatusCode::NOT_FOUND, "Produto não encontrado"),
            |p| ok(p.clone()),
        )
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct RegisterBody {
    name: String,
    email: String,
    password: String,
}

fn session_payload(user: &MockUser) -> Value {
    json!({
        "token": format!("token-{}", user.id),
        "user": { "id": user.id, "name": user.name, "email": user.email },
    })
}

async fn login(State(backend): State<MockBackend>, Json(body): Json<LoginBody>) -> Response {
    let Ok(users) = backend.state.users.lock() else {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Erro interno");
    };

    users
        .iter()
        .find(|u| u.email == body.email && u.password == body.password)
        .map_or_else(
            || fail(StatusCode::UNAUTHORIZED, "Credenciais inválidas"),
            |user| ok(session_payload(user)),
        )
}

async fn register(State(backend): State<MockBackend>, Json(body): Json<RegisterBody>) -> Response {
    let Ok(mut users) = backend.state.users.lock() else {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Erro interno");
    };

    if users.iter().any(|u| u.email == body.email) {
        return fail(StatusCode::BAD_REQUEST, "Email já cadastrado");
    }

    let user = MockUser {
        id: i64::try_from(users.len()).unwrap_or(i64::MAX - 1) + 1,
        name: body.name,
        email: body.email,
        password: body.password,
    };
    let payload = session_payload(&user);
    users.push(user);

    (StatusCode::CREATED, Json(json!({ "success": true, "data": payload }))).into_response()
}

// =============================================================================
// Test context
// =============================================================================

/// A running storefront plus the client and backend used to exercise it.
pub struct TestContext {
    /// Cookie-keeping client that does not follow redirects.
    pub client: Client,
    /// Storefront root, e.g. `http://127.0.0.1:41234`.
    pub base_url: String,
    /// The backend the storefront talks to.
    pub backend: MockBackend,
}

impl TestContext {
    /// Storefront against a fresh standard backend.
    pub async fn start() -> Self {
        Self::with_backend(MockBackend::new()).await
    }

    /// Storefront against `backend`.
    ///
    /// # Panics
    ///
    /// Panics if either server fails to start.
    pub async fn with_backend(backend: MockBackend) -> Self {
        let api_url = backend.spawn().await;
        Self::with_api_url(&api_url, backend).await
    }

    /// Storefront whose backend refuses connections.
    pub async fn unreachable_backend() -> Self {
        Self::with_api_url("http://127.0.0.1:1/api", MockBackend::new()).await
    }

    async fn with_api_url(api_url: &str, backend: MockBackend) -> Self {
        let config = StorefrontConfig::from_lookup(|key| match key {
            "WENSHOP_API_URL" => Some(api_url.to_string()),
            "WENSHOP_API_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        })
        .expect("test configuration is valid");

        let state = AppState::new(config).expect("failed to build storefront state");
        let addr = serve(wenshop_storefront::app(state)).await;

        let client = Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            backend,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a page, returning status and body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed");
        let status = response.status();
        (status, response.text().await.expect("readable body"))
    }

    /// POST a form as a regular browser would.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// POST a form as htmx would.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn htmx_post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Sign in with the seeded account.
    pub async fn login_seeded(&self) -> reqwest::Response {
        self.post_form(
            "/login",
            &[("email", SEEDED_EMAIL), ("password", SEEDED_PASSWORD)],
        )
        .await
    }
}

/// Serve `app` on an ephemeral local port.
async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ephemeral port");
    let addr = listener.local_addr().expect("bound listener has an address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });

    addr
}
