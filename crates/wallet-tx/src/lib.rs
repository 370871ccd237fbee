#![forbid(unsafe_code)]

//! Core transfer flow for a delegated-custody wallet: building, signing, and
//! submitting native-asset transfers against a JSON-RPC node.
//!
//! Key custody and authorization live behind the injected
//! [`WalletSigner`] capability; this crate owns validation, amount
//! conversion, recency-token handling, wire encoding, and submit error
//! classification.

/// Transfer builder and amount conversion helpers.
pub mod builder;
/// Recency-token provider trait and adapters.
pub mod providers;
/// Delegated signing boundary types.
pub mod signing;
/// Submission client and transport.
pub mod submit;

pub use builder::{
    BuildError, LAMPORTS_PER_SOL, TransferBuilder, UnsignedTransfer, parse_address,
    sol_to_lamports,
};
pub use providers::{RecencyError, RecencyTokenProvider, RpcRecencyProvider, StaticRecencyProvider};
pub use signing::{KeypairWalletSigner, SignError, SignedTransfer, WalletHandle, WalletSigner};
pub use submit::{
    JsonRpcTransport, RpcSubmitConfig, SubmissionResult, SubmitError, SubmitTransport,
    TransferError, WalletTxClient,
};
