use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::config::Config;
use crate::models::{Group, Location, Training, TrainingType};

mod error;
mod retry;

pub use error::ApiError;
pub use retry::RetryPolicy;

/// Training payload nested inside create/modify requests. Timestamps are
/// the preformatted "date hour" strings the backend parses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrainingData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub start_time: String,
    pub end_time: String,
    #[serde(rename = "type")]
    pub kind: TrainingType,
}

/// Body of POST training/new and POST training/modify.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTrainingRequest {
    pub location_id: i64,
    pub raw_training_data: RawTrainingData,
}

/// Body of POST training/addGroup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddGroupRequest {
    pub group_id: i64,
    pub training_id: i64,
}

/// The roster API surface the training workflow drives. Kept as a trait
/// so the workflow can be exercised against a fake without a network.
#[async_trait]
pub trait RosterApi: Send + Sync {
    async fn locations(&self) -> Result<Vec<Location>, ApiError>;
    async fn groups(&self) -> Result<Vec<Group>, ApiError>;
    async fn trainings(&self) -> Result<Vec<Training>, ApiError>;
    async fn create_training(&self, request: &SaveTrainingRequest) -> Result<Training, ApiError>;
    async fn add_group(&self, group_id: i64, training_id: i64) -> Result<(), ApiError>;
    async fn modify_training(&self, request: &SaveTrainingRequest) -> Result<(), ApiError>;
}

/// HTTP client for the roster backend
pub struct ApiClient {
    client: Client,
    base_url: String,
    retry_policy: RetryPolicy,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_retry_policy(config, RetryPolicy::default())
    }

    /// Create a new API client with a custom retry policy
    pub fn with_retry_policy(config: &Config, retry_policy: RetryPolicy) -> Result<Self> {
        let timeout = Duration::from_secs(config.api.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            retry_policy,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// GET a JSON resource, retrying transient failures.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);

        self.retry_policy
            .run(|| async {
                tracing::debug!("GET {}", url);

                let response = self.client.get(&url).send().await?;
                let status = response.status();

                if status.is_success() {
                    Ok(response.json::<T>().await?)
                } else {
                    let error_text = response.text().await.unwrap_or_default();
                    Err(ApiError::from_status(status, error_text))
                }
            })
            .await
    }

    /// POST a JSON body and decode the response. Writes are not retried:
    /// a create or association that actually landed must not be repeated.
    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);

        tracing::debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, error_text))
        }
    }

    /// POST a JSON body, ignoring the response payload.
    async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = self.url(path);

        tracing::debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, error_text))
        }
    }
}

#[async_trait]
impl RosterApi for ApiClient {
    async fn locations(&self) -> Result<Vec<Location>, ApiError> {
        self.get_json("location").await
    }

    async fn groups(&self) -> Result<Vec<Group>, ApiError> {
        self.get_json("group").await
    }

    async fn trainings(&self) -> Result<Vec<Training>, ApiError> {
        self.get_json("training").await
    }

    async fn create_training(&self, request: &SaveTrainingRequest) -> Result<Training, ApiError> {
        let training: Training = self.post_json("training/new", request).await?;

        tracing::info!("Created training {}", training.id);
        Ok(training)
    }

    async fn add_group(&self, group_id: i64, training_id: i64) -> Result<(), ApiError> {
        let request = AddGroupRequest {
            group_id,
            training_id,
        };

        self.post_unit("training/addGroup", &request).await?;

        tracing::debug!("Associated group {} with training {}", group_id, training_id);
        Ok(())
    }

    async fn modify_training(&self, request: &SaveTrainingRequest) -> Result<(), ApiError> {
        self.post_unit("training/modify", request).await?;

        tracing::info!("Modified training {:?}", request.raw_training_data.id);
        Ok(())
    }
}
