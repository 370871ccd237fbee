//! Recency-token provider trait and adapters.
//!
//! A recency token is the recent blockhash that anchors a transfer's validity
//! window. The trait is injected so tests run against a static value while
//! production code fetches from a JSON-RPC node.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use solana_hash::{Hash, ParseHashError};
use thiserror::Error;

/// Errors surfaced while fetching a recent blockhash.
#[derive(Debug, Error)]
pub enum RecencyError {
    /// Invalid provider configuration.
    #[error("blockhash provider configuration invalid: {message}")]
    Config {
        /// Human-readable description.
        message: String,
    },
    /// Node could not be reached within the transport timeout.
    #[error("blockhash endpoint unreachable: {message}")]
    Unreachable {
        /// Human-readable description.
        message: String,
    },
    /// Node answered with a JSON-RPC error.
    #[error("blockhash rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Human-readable message.
        message: String,
    },
    /// Node returned a value that does not decode to a blockhash.
    #[error("invalid blockhash value `{value}`: {source}")]
    InvalidValue {
        /// Returned raw value.
        value: String,
        /// Underlying decode error.
        source: ParseHashError,
    },
}

/// Source of a fresh recency token (recent blockhash).
#[async_trait]
pub trait RecencyTokenProvider: Send + Sync {
    /// Returns the newest blockhash known to the network.
    async fn latest_blockhash(&self) -> Result<Hash, RecencyError>;
}

/// In-memory provider for tests and static configurations.
#[derive(Debug, Clone)]
pub struct StaticRecencyProvider {
    /// Optional static blockhash.
    value: Option<Hash>,
}

impl StaticRecencyProvider {
    /// Creates a provider with an optional static blockhash.
    #[must_use]
    pub const fn new(value: Option<Hash>) -> Self {
        Self { value }
    }
}

#[async_trait]
impl RecencyTokenProvider for StaticRecencyProvider {
    async fn latest_blockhash(&self) -> Result<Hash, RecencyError> {
        self.value.ok_or_else(|| RecencyError::Unreachable {
            message: "no static blockhash configured".to_owned(),
        })
    }
}

/// JSON-RPC envelope.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    /// Result value for successful calls.
    result: Option<T>,
    /// Error payload for failed calls.
    error: Option<JsonRpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    /// JSON-RPC error code.
    code: i64,
    /// Human-readable message.
    message: String,
}

/// `getLatestBlockhash` result payload.
#[derive(Debug, Deserialize)]
struct BlockhashResult {
    /// Context-wrapped value.
    value: BlockhashValue,
}

/// `getLatestBlockhash` value object.
#[derive(Debug, Deserialize)]
struct BlockhashValue {
    /// Base-58 blockhash string.
    blockhash: String,
}

/// Provider that fetches the recent blockhash via `getLatestBlockhash`.
#[derive(Debug, Clone)]
pub struct RpcRecencyProvider {
    /// HTTP client used for RPC calls.
    client: reqwest::Client,
    /// Target JSON-RPC endpoint URL.
    rpc_url: String,
    /// Commitment level passed to the node.
    commitment: String,
}

impl RpcRecencyProvider {
    /// Creates a JSON-RPC recency provider with a bounded request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RecencyError::Config`] when HTTP client creation fails.
    pub fn new(rpc_url: impl Into<String>) -> Result<Self, RecencyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|error| RecencyError::Config {
                message: error.to_string(),
            })?;
        Ok(Self {
            client,
            rpc_url: rpc_url.into(),
            commitment: "confirmed".to_owned(),
        })
    }

    /// Sets the commitment level requested from the node.
    #[must_use]
    pub fn with_commitment(mut self, commitment: impl Into<String>) -> Self {
        self.commitment = commitment.into();
        self
    }
}

#[async_trait]
impl RecencyTokenProvider for RpcRecencyProvider {
    async fn latest_blockhash(&self) -> Result<Hash, RecencyError> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getLatestBlockhash",
            "params": [{ "commitment": self.commitment }]
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&payload)
            .send()
            .await
            .map_err(|error| RecencyError::Unreachable {
                message: error.to_string(),
            })?;

        let response =
            response
                .error_for_status()
                .map_err(|error| RecencyError::Unreachable {
                    message: error.to_string(),
                })?;

        let parsed: JsonRpcResponse<BlockhashResult> =
            response
                .json()
                .await
                .map_err(|error| RecencyError::Unreachable {
                    message: error.to_string(),
                })?;

        if let Some(result) = parsed.result {
            let value = result.value.blockhash;
            let blockhash = value
                .parse()
                .map_err(|source| RecencyError::InvalidValue { value, source })?;
            tracing::debug!(%blockhash, "fetched recent blockhash");
            return Ok(blockhash);
        }
        if let Some(error) = parsed.error {
            return Err(RecencyError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Err(RecencyError::Unreachable {
            message: "rpc returned neither result nor error".to_owned(),
        })
    }
}
