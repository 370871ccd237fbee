//! Caller-facing client composing build, sign, and submit.

use std::sync::Arc;

use solana_signature::Signature;
use thiserror::Error;
use tracing::debug;

use super::{RpcSubmitConfig, SubmissionResult, SubmitError, SubmitTransport};
use crate::{
    builder::{BuildError, TransferBuilder, UnsignedTransfer},
    providers::RecencyTokenProvider,
    signing::{SignError, SignedTransfer, WalletHandle, WalletSigner},
};

/// Top-level errors surfaced by the composed send path.
///
/// Every variant renders a distinct human-readable message; underlying
/// signer/network failures are carried as messages, never as panics.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Transfer could not be built.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// Delegated signing failed.
    #[error(transparent)]
    Sign(#[from] SignError),
    /// Network submission failed.
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl TransferError {
    /// True when the caller may retry, rebuilding the transfer first.
    ///
    /// An expired blockhash requires a fresh build-and-sign pass; the old
    /// unsigned/signed pair must be discarded, never resubmitted.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Build(BuildError::Recency { .. })
                | Self::Submit(SubmitError::BlockhashExpired | SubmitError::Unreachable { .. })
        )
    }
}

/// Client that orchestrates one transfer attempt end to end.
///
/// Each call is a single-flight request/response; no retry loop or shared
/// mutable state lives here. Retries are caller policy.
pub struct WalletTxClient {
    /// Recency token source used by the build path.
    recency_provider: Arc<dyn RecencyTokenProvider>,
    /// Delegated signer capability.
    signer: Arc<dyn WalletSigner>,
    /// Submit transport.
    transport: Arc<dyn SubmitTransport>,
    /// RPC tuning.
    rpc_config: RpcSubmitConfig,
}

impl WalletTxClient {
    /// Creates a client from injected capabilities.
    #[must_use]
    pub fn new(
        recency_provider: Arc<dyn RecencyTokenProvider>,
        signer: Arc<dyn WalletSigner>,
        transport: Arc<dyn SubmitTransport>,
    ) -> Self {
        Self {
            recency_provider,
            signer,
            transport,
            rpc_config: RpcSubmitConfig::default(),
        }
    }

    /// Sets RPC submit tuning.
    #[must_use]
    pub fn with_rpc_config(mut self, config: RpcSubmitConfig) -> Self {
        self.rpc_config = config;
        self
    }

    /// Builds an unsigned transfer with a freshly fetched recency token.
    ///
    /// Input validation runs before the blockhash fetch, so malformed
    /// addresses and non-positive amounts never touch the network.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] on invalid input or when the node cannot be
    /// reached.
    pub async fn build_transfer(
        &self,
        sender: &str,
        recipient: &str,
        amount_sol: f64,
    ) -> Result<UnsignedTransfer, BuildError> {
        let builder = TransferBuilder::new(sender, recipient, amount_sol)?;
        let blockhash = self
            .recency_provider
            .latest_blockhash()
            .await
            .map_err(|source| BuildError::Recency { source })?;
        debug!(sender, recipient, lamports = builder.lamports(), "built transfer");
        Ok(builder.build_unsigned(blockhash))
    }

    /// Signs an unsigned transfer through the delegated signer.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::Unavailable`] when no wallet matches the handle
    /// and [`SignError::Rejected`] when the owner declines.
    pub async fn sign_transaction(
        &self,
        unsigned: &UnsignedTransfer,
        wallet: &WalletHandle,
    ) -> Result<SignedTransfer, SignError> {
        self.signer.sign_transfer(unsigned, wallet).await
    }

    /// Submits a signed transfer to the network.
    ///
    /// Success means acceptance into the pending pool, not finality.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError`] on encode, transport, or node-reported
    /// failure; a stale blockhash classifies as
    /// [`SubmitError::BlockhashExpired`].
    pub async fn submit(&self, signed: &SignedTransfer) -> Result<SubmissionResult, SubmitError> {
        let tx_bytes = signed
            .to_wire_bytes()
            .map_err(|source| SubmitError::Encode { source })?;
        let transaction_id = self.transport.submit(&tx_bytes, &self.rpc_config).await?;
        debug!(%transaction_id, "transfer accepted into pending pool");
        Ok(SubmissionResult {
            signature: signed.signature(),
            transaction_id,
        })
    }

    /// Builds, signs, and submits a transfer in one call.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError`] from whichever stage fails first; validation
    /// failures never invoke the signer or the network.
    pub async fn send_transfer(
        &self,
        sender: &str,
        recipient: &str,
        amount_sol: f64,
        wallet: &WalletHandle,
    ) -> Result<SubmissionResult, TransferError> {
        let unsigned = self.build_transfer(sender, recipient, amount_sol).await?;
        let signed = self.sign_transaction(&unsigned, wallet).await?;
        Ok(self.submit(&signed).await?)
    }

    /// Signs a textual message through the delegated signer.
    ///
    /// No network step and no recency dependency; the returned
    /// [`Signature`] displays in base-58.
    ///
    /// # Errors
    ///
    /// Returns [`SignError`] when the signer is unavailable or the owner
    /// declines.
    pub async fn sign_message(
        &self,
        message: &str,
        wallet: &WalletHandle,
    ) -> Result<Signature, SignError> {
        self.signer.sign_message(message.as_bytes(), wallet).await
    }
}
