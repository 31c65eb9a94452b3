//! Fake ship service for integration tests.
//!
//! Serves the same routes as the real service from an in-memory list and
//! rejects requests without a bearer token.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::sync::Mutex;

use shipdeck::{HttpShipStore, LaunchYear, Ship, ShipQuery, TokenSession};

pub const TOKEN: &str = "test-token";

#[derive(Debug, Clone, Default)]
pub struct FakeService {
    pub ships: Arc<Mutex<Vec<Ship>>>,
    /// Authorization header of every request, in arrival order.
    pub auth_headers: Arc<Mutex<Vec<Option<String>>>>,
    /// When set, every `/ships` route answers with this status.
    pub fail_with: Arc<Mutex<Option<StatusCode>>>,
}

impl FakeService {
    pub async fn ship(&self, id: &str) -> Option<Ship> {
        self.ships.lock().await.iter().find(|s| s.id == id).cloned()
    }

    pub async fn fail(&self, status: StatusCode) {
        *self.fail_with.lock().await = Some(status);
    }
}

pub fn victory() -> Ship {
    Ship {
        id: "1".to_string(),
        name: "Victory".to_string(),
        ship_type: "Ship of the line".to_string(),
        launch_year: LaunchYear::Year(1765),
        country: "UK".to_string(),
        length: "69 m".to_string(),
        notable_events: vec!["Battle of Trafalgar".to_string()],
    }
}

pub fn vasa() -> Ship {
    Ship {
        id: "2".to_string(),
        name: "Vasa".to_string(),
        ship_type: "Galleon".to_string(),
        launch_year: LaunchYear::Year(1627),
        country: "Sweden".to_string(),
        length: "69 m".to_string(),
        notable_events: vec!["Sank on maiden voyage".to_string()],
    }
}

async fn guard(service: &FakeService, headers: &HeaderMap) -> Result<(), Response> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    service.auth_headers.lock().await.push(auth.clone());

    if auth.as_deref() != Some(format!("Bearer {TOKEN}").as_str()) {
        return Err(StatusCode::UNAUTHORIZED.into_response());
    }
    if let Some(status) = *service.fail_with.lock().await {
        return Err(status.into_response());
    }
    Ok(())
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"detail": "Ship not found"})),
    )
        .into_response()
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({"message": "Online"}))
}

async fn list_ships(
    State(service): State<FakeService>,
    headers: HeaderMap,
    Query(query): Query<ShipQuery>,
) -> Response {
    if let Err(rejection) = guard(&service, &headers).await {
        return rejection;
    }
    let ships: Vec<Ship> = service
        .ships
        .lock()
        .await
        .iter()
        .filter(|s| query.accepts(s))
        .cloned()
        .collect();
    Json(ships).into_response()
}

async fn create_ship(
    State(service): State<FakeService>,
    headers: HeaderMap,
    Json(ship): Json<Ship>,
) -> Response {
    if let Err(rejection) = guard(&service, &headers).await {
        return rejection;
    }
    let mut ships = service.ships.lock().await;
    if ships.iter().any(|s| s.id == ship.id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"detail": "Ship with this ID already exists"})),
        )
            .into_response();
    }
    ships.push(ship.clone());
    Json(ship).into_response()
}

async fn read_ship(
    State(service): State<FakeService>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(rejection) = guard(&service, &headers).await {
        return rejection;
    }
    match service.ship(&id).await {
        Some(ship) => Json(ship).into_response(),
        None => not_found(),
    }
}

async fn update_ship(
    State(service): State<FakeService>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(ship): Json<Ship>,
) -> Response {
    if let Err(rejection) = guard(&service, &headers).await {
        return rejection;
    }
    let mut ships = service.ships.lock().await;
    match ships.iter_mut().find(|s| s.id == id) {
        Some(slot) => {
            *slot = ship.clone();
            Json(ship).into_response()
        }
        None => not_found(),
    }
}

async fn delete_ship(
    State(service): State<FakeService>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(rejection) = guard(&service, &headers).await {
        return rejection;
    }
    let mut ships = service.ships.lock().await;
    let before = ships.len();
    ships.retain(|s| s.id != id);
    if ships.len() == before {
        return not_found();
    }
    Json(serde_json::Value::Null).into_response()
}

/// Start the fake service on an ephemeral port and return its base URL.
pub async fn spawn_service(ships: Vec<Ship>) -> (String, FakeService) {
    let service = FakeService {
        ships: Arc::new(Mutex::new(ships)),
        ..FakeService::default()
    };
    let app = Router::new()
        .route("/", get(root))
        .route("/ships", get(list_ships).post(create_ship))
        .route(
            "/ships/{id}",
            get(read_ship).put(update_ship).delete(delete_ship),
        )
        .with_state(service.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve app");
    });

    (format!("http://{addr}"), service)
}

pub fn session(token: Option<&str>) -> Arc<TokenSession> {
    Arc::new(TokenSession::new(token.map(str::to_string), None))
}

pub fn http_store(base_url: &str, session: Arc<TokenSession>) -> HttpShipStore {
    HttpShipStore::new(base_url, Duration::from_secs(5), session).expect("build store")
}
