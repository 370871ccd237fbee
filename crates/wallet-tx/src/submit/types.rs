//! Shared submission types, errors, and the transport trait.

use async_trait::async_trait;
use solana_signature::Signature;
use thiserror::Error;

/// RPC submit tuning.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RpcSubmitConfig {
    /// Skip preflight simulation when true.
    pub skip_preflight: bool,
    /// Optional preflight commitment string.
    pub preflight_commitment: Option<String>,
}

impl Default for RpcSubmitConfig {
    fn default() -> Self {
        // Preflight stays on so stale blockhashes and balance shortfalls
        // surface as typed errors at submit time.
        Self {
            skip_preflight: false,
            preflight_commitment: None,
        }
    }
}

/// Submission-level errors.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Signed transaction could not be encoded to wire bytes.
    #[error("failed to encode signed transaction: {source}")]
    Encode {
        /// Bincode encode error.
        source: Box<bincode::ErrorKind>,
    },
    /// Network rejected the recent blockhash as stale.
    #[error("recent blockhash expired; rebuild the transfer and sign again")]
    BlockhashExpired,
    /// Sender balance cannot cover the amount plus network fee.
    #[error("sender balance cannot cover the transfer amount plus network fee")]
    InsufficientFunds,
    /// Endpoint could not be reached.
    #[error("submission endpoint unreachable: {message}")]
    Unreachable {
        /// Human-readable description.
        message: String,
    },
    /// Invalid transport configuration.
    #[error("transport configuration invalid: {message}")]
    Config {
        /// Human-readable description.
        message: String,
    },
    /// Any other RPC-reported failure, preserved for diagnostics.
    #[error("transaction submission failed with rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Human-readable message.
        message: String,
    },
}

/// Summary of a submission accepted into the pending pool.
///
/// Acceptance does not guarantee finality; confirmation tracking is a caller
/// concern.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SubmissionResult {
    /// First signature parsed from the submitted transaction.
    pub signature: Option<Signature>,
    /// Network-assigned transaction id returned by the endpoint.
    pub transaction_id: String,
}

/// Transport that forwards wire bytes to the network endpoint.
#[async_trait]
pub trait SubmitTransport: Send + Sync {
    /// Submits transaction bytes and returns the network transaction id.
    async fn submit(
        &self,
        tx_bytes: &[u8],
        config: &RpcSubmitConfig,
    ) -> Result<String, SubmitError>;
}
