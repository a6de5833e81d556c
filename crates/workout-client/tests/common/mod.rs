//! Stub workout store served over HTTP for client tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::net::TcpListener;
use workout_client::api::{ErrorBody, MixRequest, MixResponse, WorkoutListResponse};
use workout_client::{ClientConfig, StoreClient};
use workout_core::{
    Block, BlockStructure, Exercise, VersionToken, VersionedWorkout, Workout, WorkoutId,
    WorkoutStructure,
};
use workout_ops::{decode_operations, MemoryStore, StoreError, WorkoutStore};

pub const SEED_VERSION: &str = "2026-01-01T00:00:00Z";

struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self
            .0
            .status()
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorBody::from_error(&self.0))).into_response()
    }
}

#[derive(Deserialize)]
struct RawApplyRequest {
    operations: Vec<serde_json::Value>,
    updated_at: VersionToken,
}

async fn get_workout(
    State(store): State<Arc<MemoryStore>>,
    Path(id): Path<WorkoutId>,
) -> Result<Json<VersionedWorkout>, ApiError> {
    Ok(Json(store.get_workout(&id).await?))
}

async fn list_workouts(
    State(store): State<Arc<MemoryStore>>,
) -> Result<Json<WorkoutListResponse>, ApiError> {
    let workouts = store.list_workouts().await?;
    Ok(Json(WorkoutListResponse { workouts }))
}

async fn apply_operations(
    State(store): State<Arc<MemoryStore>>,
    Path(id): Path<WorkoutId>,
    Json(req): Json<RawApplyRequest>,
) -> Result<Json<VersionedWorkout>, ApiError> {
    let operations = match decode_operations(req.operations) {
        Ok(operations) => operations,
        Err(invalid) => {
            // a stale version is reported before anything about the batch
            let current = store.get_workout(&id).await?;
            if !current.is_at(&req.updated_at) {
                return Err(StoreError::Conflict {
                    current: Box::new(current),
                }
                .into());
            }
            return Err(StoreError::from(invalid).into());
        }
    };

    let updated = store
        .apply_operations(&id, &operations, &req.updated_at)
        .await?;
    Ok(Json(updated))
}

async fn mix(
    State(store): State<Arc<MemoryStore>>,
    Json(req): Json<MixRequest>,
) -> Result<Json<MixResponse>, ApiError> {
    let preview = store.mix(&req.sources, &req.title).await?;
    Ok(Json(MixResponse { preview }))
}

pub struct TestStore {
    pub store: Arc<MemoryStore>,
    pub client: StoreClient,
    pub base_url: String,
}

/// Serve a fresh `MemoryStore` on an ephemeral port
pub async fn spawn() -> TestStore {
    let store = Arc::new(MemoryStore::new());

    let app = Router::new()
        .route("/workouts", get(list_workouts))
        .route("/workouts/mix", post(mix))
        .route("/workouts/{id}", get(get_workout))
        .route("/workouts/{id}/operations", post(apply_operations))
        .with_state(Arc::clone(&store));

    let base_url = serve(app).await;
    let client = StoreClient::new(ClientConfig::new(&base_url).unwrap()).unwrap();
    TestStore {
        store,
        client,
        base_url,
    }
}

/// Serve a store that answers every operations call with `status` and `body` as given
pub async fn spawn_fixed(status: u16, body: serde_json::Value) -> StoreClient {
    let status = StatusCode::from_u16(status).unwrap();
    let app = Router::new().route(
        "/workouts/{id}/operations",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );

    let base_url = serve(app).await;
    StoreClient::new(ClientConfig::new(&base_url).unwrap()).unwrap()
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base_url
}

impl TestStore {
    /// Store `workout` at `SEED_VERSION`
    pub async fn seed(&self, workout: Workout) -> VersionedWorkout {
        self.store.insert_at(workout, seed_time()).await
    }
}

pub fn seed_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(SEED_VERSION)
        .unwrap()
        .with_timezone(&Utc)
}

/// Two blocks: "Warmup" (2 exercises) and "Strength" (3 exercises)
pub fn strength_workout(id: &str) -> Workout {
    Workout::new(
        id,
        WorkoutStructure::new("Strength day", "manual")
            .with_block(
                Block::new("Warmup", BlockStructure::Circuit)
                    .with_exercise(Exercise::timed("Jumping jacks", 60))
                    .with_exercise(Exercise::timed("Arm circles", 30)),
            )
            .with_block(
                Block::new("Strength", BlockStructure::Sets)
                    .with_exercise(Exercise::reps("Squat", 5, 5).with_load("100kg"))
                    .with_exercise(Exercise::reps("Bench", 5, 5).with_load("80kg"))
                    .with_exercise(Exercise::reps("Row", 5, 5).with_rest(90)),
            ),
    )
}

/// Two blocks: "Intervals" (2 exercises) and "Finisher" (1 exercise)
pub fn conditioning_workout(id: &str) -> Workout {
    Workout::new(
        id,
        WorkoutStructure::new("Engine", "manual")
            .with_block(
                Block::new("Intervals", BlockStructure::Emom)
                    .with_exercise(Exercise::distance("Row", 250.0))
                    .with_exercise(Exercise::reps("Burpee", 1, 10)),
            )
            .with_block(
                Block::new("Finisher", BlockStructure::ForTime)
                    .with_exercise(Exercise::distance("Run", 1600.0)),
            ),
    )
}
