//! Integration test support for TechStore.
//!
//! [`MockCatalog`] is an in-process stand-in for the remote catalog service.
//! It serves one collection at `/productos` with the same verbs and JSON
//! shapes as the real service, and records every request it receives so that
//! tests can assert on the traffic the stores generate.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p techstore-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

use techstore_storefront::config::CatalogConfig;

const COLLECTION: &str = "/productos";

/// Ids handed out by the mock start here so they never collide with seeds.
const FIRST_GENERATED_ID: u64 = 1000;

type Reply = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

// =============================================================================
// Mock service
// =============================================================================

/// A running mock catalog service. Stopped when dropped.
pub struct MockCatalog {
    addr: SocketAddr,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

#[derive(Default)]
struct MockState {
    records: Mutex<Vec<Value>>,
    requests: Mutex<Vec<String>>,
    next_id: AtomicU64,
    failing: AtomicBool,
    delay_ms: AtomicU64,
}

impl MockCatalog {
    /// Start serving the given wire records on an ephemeral local port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(records: Vec<Value>) -> Self {
        let state = Arc::new(MockState {
            records: Mutex::new(records),
            next_id: AtomicU64::new(FIRST_GENERATED_ID),
            ..MockState::default()
        });

        let app = Router::new()
            .route(COLLECTION, get(list).post(create))
            .route("/productos/{id}", get(fetch).put(replace).delete(remove))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock catalog");
        let addr = listener
            .local_addr()
            .expect("Mock catalog has no local address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// The collection URL.
    ///
    /// # Panics
    ///
    /// Panics if the bound address does not form a URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}{COLLECTION}", self.addr)).expect("Invalid mock URL")
    }

    /// Client settings pointing at this service.
    #[must_use]
    pub fn config(&self, timeout: Duration) -> CatalogConfig {
        CatalogConfig {
            base_url: self.base_url(),
            timeout,
        }
    }

    /// Answer every subsequent request with a 500.
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Wait this long before answering each request.
    pub fn set_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.state.delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Snapshot of the stored records.
    #[must_use]
    pub fn records(&self) -> Vec<Value> {
        self.state.records().clone()
    }

    /// One stored record by id.
    #[must_use]
    pub fn record(&self, id: &str) -> Option<Value> {
        self.state
            .records()
            .iter()
            .find(|r| id_of(r).as_deref() == Some(id))
            .cloned()
    }

    /// Requests received so far, as `"METHOD /path"`.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests other than reads.
    #[must_use]
    pub fn write_requests(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| !r.starts_with("GET "))
            .collect()
    }
}

impl Drop for MockCatalog {
    fn drop(&mut self) {
        self.server.abort();
    }
}

impl MockState {
    fn records(&self) -> MutexGuard<'_, Vec<Value>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log the request, apply the configured delay and failure mode.
    async fn enter(&self, request: String) -> Result<(), (StatusCode, Json<Value>)> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!("Internal Server Error")),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn list(State(state): State<Arc<MockState>>) -> Reply {
    state.enter(format!("GET {COLLECTION}")).await?;
    let records = state.records().clone();
    Ok((StatusCode::OK, Json(Value::Array(records))))
}

async fn create(State(state): State<Arc<MockState>>, Json(mut body): Json<Value>) -> Reply {
    state.enter(format!("POST {COLLECTION}")).await?;

    let Value::Object(fields) = &mut body else {
        return Err(bad_request("expected an object"));
    };
    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    fields.insert("id".to_string(), Value::String(id.to_string()));

    state.records().push(body.clone());
    Ok((StatusCode::CREATED, Json(body)))
}

async fn fetch(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Reply {
    state.enter(format!("GET {COLLECTION}/{id}")).await?;
    let records = state.records();
    records
        .iter()
        .find(|r| id_of(r).as_deref() == Some(id.as_str()))
        .map(|r| (StatusCode::OK, Json(r.clone())))
        .ok_or_else(not_found)
}

/// Merge the body into the stored record, as the real service does.
async fn replace(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    state.enter(format!("PUT {COLLECTION}/{id}")).await?;

    let Value::Object(fields) = body else {
        return Err(bad_request("expected an object"));
    };
    let mut records = state.records();
    let record = records
        .iter_mut()
        .find(|r| id_of(r).as_deref() == Some(id.as_str()))
        .ok_or_else(not_found)?;

    if let Value::Object(stored) = &mut *record {
        for (key, value) in fields {
            if key != "id" {
                stored.insert(key, value);
            }
        }
    }
    Ok((StatusCode::OK, Json(record.clone())))
}

async fn remove(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Reply {
    state.enter(format!("DELETE {COLLECTION}/{id}")).await?;

    let mut records = state.records();
    let index = records
        .iter()
        .position(|r| id_of(r).as_deref() == Some(id.as_str()))
        .ok_or_else(not_found)?;
    let removed = records.remove(index);
    Ok((StatusCode::OK, Json(removed)))
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!("Not found")))
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!(message)))
}

/// Record ids may be strings or numbers.
fn id_of(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A complete wire record.
#[must_use]
pub fn product(id: &str, name: &str, category: &str, price: f64, stock: u32) -> Value {
    json!({
        "id": id,
        "nombre": name,
        "descripcion": format!("{name} - tested and ready to ship"),
        "precio": price,
        "categoria": category,
        "marca": "TechBrand",
        "imagen": format!("https://img.example/{id}.png"),
        "stock": stock,
        "puntuacion": 4.5,
        "disponible": true
    })
}

/// `count` records with ids `1..=count`, alternating two categories.
#[must_use]
pub fn numbered_products(count: u32) -> Vec<Value> {
    (1..=count)
        .map(|n| {
            let category = if n % 2 == 0 { "laptops" } else { "phones" };
            product(
                &n.to_string(),
                &format!("Product {n}"),
                category,
                f64::from(n) * 100.0,
                n,
            )
        })
        .collect()
}
