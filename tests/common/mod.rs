#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use payhook::services::provider::PollSettings;

pub const PAYSTACK_KEY: &str = "sk_test_paystack_fake";
pub const KORAPAY_KEY: &str = "sk_test_korapay_fake";
pub const MISSING_REFERENCE: &str = "missing";

/// Scripted stand-in for a provider API. Each status lookup returns the next
/// entry of `statuses`, repeating the last one once exhausted.
pub struct FakeProvider {
    statuses: Vec<&'static str>,
    lookups: AtomicUsize,
    last_request: Mutex<Option<Value>>,
    last_authorization: Mutex<Option<String>>,
}

impl FakeProvider {
    pub fn new(statuses: Vec<&'static str>) -> Arc<Self> {
        Arc::new(FakeProvider {
            statuses,
            lookups: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            last_authorization: Mutex::new(None),
        })
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<Value> {
        self.last_request.lock().unwrap().clone()
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.last_authorization.lock().unwrap().clone()
    }

    fn next_status(&self) -> &'static str {
        let n = self.lookups.fetch_add(1, Ordering::SeqCst);
        self.statuses[n.min(self.statuses.len() - 1)]
    }

    fn record(&self, headers: &HeaderMap, body: Option<Value>) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        *self.last_authorization.lock().unwrap() = auth;
        if body.is_some() {
            *self.last_request.lock().unwrap() = body;
        }
    }
}

/// Answers every path with a success envelope and remembers what was asked.
#[derive(Default)]
pub struct RequestRecorder {
    uris: Mutex<Vec<String>>,
}

impl RequestRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn uris(&self) -> Vec<String> {
        self.uris.lock().unwrap().clone()
    }
}

/// Base URL carries a `/v1` prefix so escapes above it are visible.
pub async fn spawn_recorder(recorder: Arc<RequestRecorder>) -> String {
    let router = Router::new().fallback(record_any).with_state(recorder);
    format!("{}/v1", serve(router).await)
}

async fn record_any(State(recorder): State<Arc<RequestRecorder>>, uri: Uri) -> Json<Value> {
    recorder.uris.lock().unwrap().push(uri.to_string());
    Json(json!({
        "status": true,
        "message": "ok",
        "data": {"status": "success", "reference": "recorded"}
    }))
}

pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub async fn spawn_paystack(fake: Arc<FakeProvider>) -> String {
    let router = Router::new()
        .route("/transaction/initialize", post(paystack_initialize))
        .route("/transaction/verify/:reference", get(paystack_verify))
        .with_state(fake);
    serve(router).await
}

pub async fn spawn_korapay(fake: Arc<FakeProvider>) -> String {
    let router = Router::new()
        .route("/charges/initialize", post(korapay_initialize))
        .route("/charges/:reference", get(korapay_charge))
        .with_state(fake);
    serve(router).await
}

async fn paystack_initialize(
    State(fake): State<Arc<FakeProvider>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let reference = body["reference"].clone();
    fake.record(&headers, Some(body));
    Json(json!({
        "status": true,
        "message": "Authorization URL created",
        "data": {
            "authorization_url": "https://checkout.paystack.com/0peioxfhpn",
            "access_code": "0peioxfhpn",
            "reference": reference
        }
    }))
}

async fn paystack_verify(
    State(fake): State<Arc<FakeProvider>>,
    headers: HeaderMap,
    Path(reference): Path<String>,
) -> (StatusCode, Json<Value>) {
    fake.record(&headers, None);
    if reference == MISSING_REFERENCE {
        fake.lookups.fetch_add(1, Ordering::SeqCst);
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"status": false, "message": "Transaction reference not found"})),
        );
    }

    let status = fake.next_status();
    (
        StatusCode::OK,
        Json(json!({
            "status": true,
            "message": "Verification successful",
            "data": {
                "id": 4099260516u64,
                "status": status,
                "reference": reference,
                "amount": 200000,
                "currency": "NGN",
                "fees": 3000,
                "customer": {"email": "chidi@example.com", "first_name": "Chidi", "last_name": "Okeke"}
            }
        })),
    )
}

async fn korapay_initialize(
    State(fake): State<Arc<FakeProvider>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let reference = body["reference"].clone();
    fake.record(&headers, Some(body));
    Json(json!({
        "status": true,
        "message": "Charge created successfully",
        "data": {
            "reference": reference,
            "checkout_url": "https://checkout.korapay.com/pay/KPY-CA-abc"
        }
    }))
}

async fn korapay_charge(
    State(fake): State<Arc<FakeProvider>>,
    headers: HeaderMap,
    Path(reference): Path<String>,
) -> (StatusCode, Json<Value>) {
    fake.record(&headers, None);
    if reference == MISSING_REFERENCE {
        fake.lookups.fetch_add(1, Ordering::SeqCst);
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"status": false, "message": "Charge not found"})),
        );
    }

    let status = fake.next_status();
    (
        StatusCode::OK,
        Json(json!({
            "status": true,
            "message": "Charge retrieved successfully",
            "data": {
                "reference": reference,
                "status": status,
                "amount": "1000.00",
                "fee": "15.00",
                "currency": "NGN",
                "customer": {"name": "Ada Obi", "email": "ada@example.com"}
            }
        })),
    )
}

pub fn fast_poll(max_attempts: Option<u32>) -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(5),
        max_attempts,
    }
}

pub fn timeout() -> Duration {
    Duration::from_secs(5)
}
