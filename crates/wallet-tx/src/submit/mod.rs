//! Transaction submission client and transport.

/// Caller-facing client composing build, sign, and submit.
mod client;
/// JSON-RPC transport implementation.
mod rpc;
/// Shared submission types, errors, and the transport trait.
mod types;

pub use client::{TransferError, WalletTxClient};
pub use rpc::JsonRpcTransport;
pub use types::{RpcSubmitConfig, SubmissionResult, SubmitError, SubmitTransport};
