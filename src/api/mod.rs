//! Resolver client - HTTP calls to the workout generation service

pub mod types;

use std::future::Future;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::matrix::Matrix;
use crate::scaler::ScaledVector;

pub use types::{GenerateResponse, ShuffleResponse, SpaceOutResponse};
use types::{GenerateRequest, ShuffleRequest, SpaceOutRequest};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

const GENERATE: &str = "/api/gmra";
const SHUFFLE: &str = "/api/shuffle";
const SPACE_OUT: &str = "/api/spaceout";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: &'static str, status: u16 },
    #[error("request cancelled")]
    Cancelled,
}

/// Client for the resolver service
#[derive(Debug, Clone)]
pub struct ResolverClient {
    http: Client,
    base_url: String,
}

impl ResolverClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve per-muscle exercise counts into a selection matrix
    pub async fn generate(
        &self,
        demand: &ScaledVector,
        amount: u32,
    ) -> Result<GenerateResponse, ApiError> {
        self.post(GENERATE, &GenerateRequest { demand, amount }).await
    }

    /// Ask for the most similar unused exercise to the one at `index`
    pub async fn shuffle(
        &self,
        index: usize,
        matrix: &Matrix,
        exercise_name: &str,
    ) -> Result<ShuffleResponse, ApiError> {
        let body = ShuffleRequest {
            muscle_index: index,
            matrix,
            muscle_name: exercise_name,
        };
        self.post(SHUFFLE, &body).await
    }

    /// Reorder exercise rows so consecutive exercises overlap as little as possible
    pub async fn space_out(
        &self,
        matrix: &Matrix,
        rows: &[usize],
    ) -> Result<SpaceOutResponse, ApiError> {
        self.post(SPACE_OUT, &SpaceOutRequest { matrix, rows }).await
    }

    async fn post<B, R>(&self, endpoint: &'static str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Http { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} returned {}", endpoint, status);
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|source| ApiError::Http { endpoint, source })
    }
}

/// Run a request until it completes or `token` is cancelled
pub async fn cancellable<T, F>(token: &CancellationToken, request: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    tokio::select! {
        _ = token.cancelled() => Err(ApiError::Cancelled),
        result = request => result,
    }
}
