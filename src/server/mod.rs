//! HTTP server module - the workout document over JSON
//!
//! `GET /api/workout` returns the document, `POST /api/workout` replaces it,
//! `POST /api/week` (file-backed store only) patches `currentWeek`.
//!
//! Bodies are stored as posted: any JSON is accepted and comes back unchanged.
//! Store calls block, so they run on tokio's blocking pool.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::program::Week;
use crate::store::{DocumentStore, FileStore, MemoryStore};

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn DocumentStore>,
    week_route: bool,
}

impl AppState {
    /// File-backed store, with the week endpoint
    pub fn file(store: FileStore) -> Self {
        Self { store: Arc::new(store), week_route: true }
    }

    /// One in-memory document for the life of the process, no week endpoint
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self { store, week_route: false }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    fn new(message: &str) -> Json<Self> {
        Json(Self { message: message.to_string() })
    }
}

#[derive(Debug, Deserialize)]
pub struct WeekUpdate {
    pub week: u32,
}

/// Storage failure, answered with 500 and a generic message
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
}

impl ApiError {
    fn storage(message: &'static str, cause: anyhow::Error) -> Self {
        error!("{}: {:#}", message, cause);
        Self { message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let mut router = Router::new().route("/api/workout", get(get_workout).post(post_workout));
    if state.week_route {
        router = router.route("/api/week", post(post_week));
    }
    router.layer(CorsLayer::permissive()).with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running on http://{addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Run a store call off the async workers
async fn blocking<T, F>(f: F) -> anyhow::Result<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

async fn get_workout(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let store = state.store.clone();
    let document = blocking(move || store.load_value())
        .await
        .map_err(|e| ApiError::storage("Failed to read workout data", e))?;
    Ok(Json(document))
}

async fn post_workout(
    State(state): State<AppState>,
    Json(document): Json<Value>,
) -> Result<Json<Ack>, ApiError> {
    let store = state.store.clone();
    blocking(move || store.save_value(&document))
        .await
        .map_err(|e| ApiError::storage("Failed to update workout data", e))?;
    info!("Workout data replaced");
    Ok(Ack::new("Workout data updated successfully"))
}

async fn post_week(
    State(state): State<AppState>,
    Json(update): Json<WeekUpdate>,
) -> Result<Json<Ack>, ApiError> {
    let week = Week::clamped(update.week);
    let store = state.store.clone();
    blocking(move || store.set_current_week(week.get()))
        .await
        .map_err(|e| ApiError::storage("Failed to update week", e))?;
    info!("Current week set to {}", week);
    Ok(Ack::new("Week updated successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::store::{seed_document, seed_value, WorkoutDocument};
    use serde_json::json;

    fn memory_app() -> (Arc<MemoryStore>, Router) {
        let store = Arc::new(MemoryStore::seeded().unwrap());
        (store.clone(), router(AppState::memory(store)))
    }

    fn file_app() -> (TempDir, FileStore, Router) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("workout_data.json");
        let store = FileStore::new(&path);
        store.ensure_seeded().unwrap();
        let app = router(AppState::file(FileStore::new(&path)));
        (dir, store, app)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &impl Serialize) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_workout() {
        let (_store, app) = memory_app();
        let response = app.oneshot(get_request("/api/workout")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let doc: WorkoutDocument = serde_json::from_value(body).unwrap();
        assert_eq!(doc, seed_document().unwrap());
    }

    #[tokio::test]
    async fn test_post_then_get_roundtrip() {
        let (_store, app) = memory_app();
        let mut doc = seed_document().unwrap();
        doc.current_week = 8;
        doc.workout_days[2].exercises[1].achieved_reps = 12.0;
        doc.selected_accessories = vec!["T-bar rows".to_string()];

        let response = app.clone().oneshot(post_json("/api/workout", &doc)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "Workout data updated successfully" })
        );

        let response = app.oneshot(get_request("/api/workout")).await.unwrap();
        let fetched: WorkoutDocument = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(fetched, doc);
    }

    #[tokio::test]
    async fn test_post_keeps_fractions_and_unknown_keys() {
        let (store, app) = memory_app();
        let mut posted = seed_value().unwrap();
        posted["workoutDays"][0]["exercises"][0]["achievedReps"] = json!(8.5);
        posted["workoutDays"][0]["exercises"][0]["lastSetReps"] = json!(7.5);
        posted["workoutDays"][1]["notes"] = json!("light day");
        posted["theme"] = json!({ "dark": true });

        let response = app.clone().oneshot(post_json("/api/workout", &posted)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get_request("/api/workout")).await.unwrap();
        assert_eq!(body_json(response).await, posted);
        assert_eq!(store.load_value().unwrap(), posted);
    }

    #[tokio::test]
    async fn test_post_accepts_any_json() {
        let (_store, app) = memory_app();
        let posted = json!({ "currentWeek": "x", "list": [1, 2] });

        let response = app.clone().oneshot(post_json("/api/workout", &posted)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get_request("/api/workout")).await.unwrap();
        assert_eq!(body_json(response).await, posted);
    }

    #[tokio::test]
    async fn test_week_patch_keeps_unknown_keys() {
        let (_dir, store, app) = file_app();
        let mut stored = seed_value().unwrap();
        stored["theme"] = json!("dark");
        store.save_value(&stored).unwrap();

        let response = app
            .oneshot(post_json("/api/week", &json!({ "week": 5 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        stored["currentWeek"] = json!(5);
        assert_eq!(store.load_value().unwrap(), stored);
    }

    #[tokio::test]
    async fn test_memory_variant_has_no_week_route() {
        let (_store, app) = memory_app();
        let response = app
            .oneshot(post_json("/api/week", &serde_json::json!({ "week": 3 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_week_patch_only_touches_week() {
        let (_dir, store, app) = file_app();
        let response = app
            .oneshot(post_json("/api/week", &serde_json::json!({ "week": 3 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "Week updated successfully" })
        );

        let stored = store.load().unwrap();
        let seed = seed_document().unwrap();
        assert_eq!(stored.current_week, 3);
        assert_eq!(stored.workout_days, seed.workout_days);
    }

    #[tokio::test]
    async fn test_week_patch_is_clamped() {
        let (_dir, store, app) = file_app();
        let response = app
            .oneshot(post_json("/api/week", &serde_json::json!({ "week": 40 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.load().unwrap().current_week, 21);
    }

    #[tokio::test]
    async fn test_file_post_persists() {
        let (_dir, store, app) = file_app();
        let mut doc = seed_document().unwrap();
        doc.initial_weights[0].max_weight = 160.0;

        let response = app.oneshot(post_json("/api/workout", &doc)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.load().unwrap(), doc);
    }

    #[tokio::test]
    async fn test_read_failure_is_500() {
        let dir = TempDir::new().unwrap();
        let app = router(AppState::file(FileStore::new(dir.path().join("missing.json"))));

        let response = app.oneshot(get_request("/api/workout")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Failed to read workout data" })
        );
    }

    #[tokio::test]
    async fn test_write_failure_is_500() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_such_dir").join("workout_data.json");
        let app = router(AppState::file(FileStore::new(path)));

        let doc = seed_document().unwrap();
        let response = app.clone().oneshot(post_json("/api/workout", &doc)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Failed to update workout data" })
        );

        let response = app
            .oneshot(post_json("/api/week", &serde_json::json!({ "week": 2 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Failed to update week" })
        );
    }

    #[tokio::test]
    async fn test_malformed_body_rejected() {
        let (store, app) = memory_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/workout")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
        assert_eq!(store.load_value().unwrap(), seed_value().unwrap());
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let (_store, app) = memory_app();
        let request = Request::builder()
            .uri("/api/workout")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
