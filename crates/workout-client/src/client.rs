use reqwest::{Client, Method, Url};
use serde::{de::DeserializeOwned, Serialize};
use workout_core::{MixPreview, MixSelection, VersionToken, VersionedWorkout, WorkoutId, WorkoutSummary};
use workout_ops::{Operation, StoreError, WorkoutStore};

use crate::api::{
    decode_error, ApplyOperationsRequest, Call, MixRequest, MixResponse, WorkoutListResponse,
};
use crate::config::ClientConfig;

/// HTTP client for a remote workout store.
///
/// Stateless: every call is one request, the store decides conflicts and
/// nothing is retried here.
#[derive(Debug, Clone)]
pub struct StoreClient {
    client: Client,
    config: ClientConfig,
}

impl StoreClient {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.config.base_url.clone();
        // base URLs are checked by ClientConfig::new
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn request<B, R>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        call: Call<'_>,
    ) -> Result<R, StoreError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(segments);
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(network)?;
        let status = response.status();
        let text = response.text().await.map_err(network)?;

        if !status.is_success() {
            let err = decode_error(status.as_u16(), text, call);
            tracing::debug!("Store answered {}: {}", status, err);
            return Err(err);
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Undecodable store response: {}", e);
            StoreError::UnexpectedResponse {
                status: status.as_u16(),
                body: text,
            }
        })
    }
}

fn network(err: reqwest::Error) -> StoreError {
    StoreError::Network(Box::new(err))
}

impl WorkoutStore for StoreClient {
    async fn get_workout(&self, id: &WorkoutId) -> Result<VersionedWorkout, StoreError> {
        self.request::<(), _>(
            Method::GET,
            &["workouts", id.as_str()],
            None,
            Call::Read(id),
        )
        .await
    }

    async fn list_workouts(&self) -> Result<Vec<WorkoutSummary>, StoreError> {
        let response: WorkoutListResponse = self
            .request::<(), _>(Method::GET, &["workouts"], None, Call::List)
            .await?;
        Ok(response.workouts)
    }

    async fn apply_operations(
        &self,
        id: &WorkoutId,
        operations: &[Operation],
        expected_version: &VersionToken,
    ) -> Result<VersionedWorkout, StoreError> {
        let body = ApplyOperationsRequest {
            operations: operations.to_vec(),
            updated_at: expected_version.clone(),
        };

        let result: Result<VersionedWorkout, StoreError> = self
            .request(
                Method::POST,
                &["workouts", id.as_str(), "operations"],
                Some(&body),
                Call::Apply(id),
            )
            .await;

        match &result {
            Ok(updated) => tracing::info!(
                "Workout {} moved from {} to {}",
                id,
                expected_version,
                updated.updated_at
            ),
            Err(StoreError::Conflict { current }) => tracing::warn!(
                "Workout {} changed remotely: expected {}, store has {}",
                id,
                expected_version,
                current.updated_at
            ),
            Err(_) => {}
        }

        result
    }

    async fn mix(&self, selections: &[MixSelection], title: &str) -> Result<MixPreview, StoreError> {
        let body = MixRequest {
            sources: selections.to_vec(),
            title: title.to_string(),
        };

        let response: MixResponse = self
            .request(Method::POST, &["workouts", "mix"], Some(&body), Call::Mix)
            .await?;
        Ok(response.preview)
    }
}
