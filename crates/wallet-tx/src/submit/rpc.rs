//! JSON-RPC submit transport implementation.

use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use serde::{Deserialize, Serialize};

use super::{RpcSubmitConfig, SubmitError, SubmitTransport};

/// JSON-RPC transport that submits encoded transactions via `sendTransaction`.
#[derive(Debug, Clone)]
pub struct JsonRpcTransport {
    /// HTTP client used for RPC calls.
    client: reqwest::Client,
    /// Target JSON-RPC endpoint URL.
    rpc_url: String,
}

impl JsonRpcTransport {
    /// Creates a JSON-RPC transport with a bounded request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Config`] when HTTP client creation fails.
    pub fn new(rpc_url: impl Into<String>) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|error| SubmitError::Config {
                message: error.to_string(),
            })?;
        Ok(Self {
            client,
            rpc_url: rpc_url.into(),
        })
    }
}

/// JSON-RPC envelope.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    /// Result value for successful calls.
    result: Option<String>,
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

/// Maps a node-reported submit error to the typed taxonomy.
///
/// The node reports a stale blockhash and balance shortfalls through
/// preflight simulation messages; anything unrecognized keeps its code and
/// message for diagnostics.
fn classify_rpc_error(code: i64, message: &str) -> SubmitError {
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("blockhash not found") {
        return SubmitError::BlockhashExpired;
    }
    if lowered.contains("insufficient lamports")
        || lowered.contains("insufficient funds")
        || lowered.contains("found no record of a prior credit")
    {
        return SubmitError::InsufficientFunds;
    }
    SubmitError::Rpc {
        code,
        message: message.to_owned(),
    }
}

#[async_trait]
impl SubmitTransport for JsonRpcTransport {
    async fn submit(
        &self,
        tx_bytes: &[u8],
        config: &RpcSubmitConfig,
    ) -> Result<String, SubmitError> {
        #[derive(Debug, Serialize)]
        struct RpcConfig<'config> {
            /// Transaction encoding format.
            encoding: &'config str,
            /// Preflight skip flag.
            #[serde(rename = "skipPreflight")]
            skip_preflight: bool,
            /// Optional preflight commitment.
            #[serde(
                rename = "preflightCommitment",
                skip_serializing_if = "Option::is_none"
            )]
            preflight_commitment: Option<&'config str>,
        }

        let encoded_tx = BASE64_STANDARD.encode(tx_bytes);
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "sendTransaction",
            "params": [
                encoded_tx,
                RpcConfig {
                    encoding: "base64",
                    skip_preflight: config.skip_preflight,
                    preflight_commitment: config.preflight_commitment.as_deref(),
                }
            ]
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&payload)
            .send()
            .await
            .map_err(|error| SubmitError::Unreachable {
                message: error.to_string(),
            })?;

        let response = response
            .error_for_status()
            .map_err(|error| SubmitError::Unreachable {
                message: error.to_string(),
            })?;

        let parsed: JsonRpcResponse =
            response
                .json()
                .await
                .map_err(|error| SubmitError::Unreachable {
                    message: error.to_string(),
                })?;

        if let Some(transaction_id) = parsed.result {
            return Ok(transaction_id);
        }
        if let Some(error) = parsed.error {
            let classified = classify_rpc_error(error.code, &error.message);
            tracing::warn!(code = error.code, message = %error.message, "sendTransaction rejected");
            return Err(classified);
        }

        Err(SubmitError::Unreachable {
            message: "rpc returned neither result nor error".to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_blockhash_classifies_as_expired() {
        let error = classify_rpc_error(
            -32002,
            "Transaction simulation failed: Blockhash not found",
        );
        assert!(matches!(error, SubmitError::BlockhashExpired));
    }

    #[test]
    fn balance_shortfall_classifies_as_insufficient_funds() {
        let error = classify_rpc_error(
            -32002,
            "Transaction simulation failed: Transfer: insufficient lamports 5000, need 1000000",
        );
        assert!(matches!(error, SubmitError::InsufficientFunds));

        let error = classify_rpc_error(
            -32002,
            "Transaction simulation failed: Attempt to debit an account but found no record of a prior credit.",
        );
        assert!(matches!(error, SubmitError::InsufficientFunds));
    }

    #[test]
    fn unrecognized_errors_keep_code_and_message() {
        let error = classify_rpc_error(-32603, "Internal error");
        assert!(matches!(
            error,
            SubmitError::Rpc { code: -32603, ref message } if message == "Internal error"
        ));
    }
}
