//! Delegated signing boundary: wallet handles, the signer capability, and
//! signed transfer wrappers.
//!
//! Key custody lives behind [`WalletSigner`]; this crate never sees private
//! key material except through the local [`KeypairWalletSigner`] adapter used
//! for demos and tests.

use std::{collections::HashMap, fmt};

use async_trait::async_trait;
use solana_keypair::Keypair;
use solana_signature::Signature;
use solana_signer::Signer;
use solana_transaction::versioned::VersionedTransaction;
use thiserror::Error;

use crate::builder::UnsignedTransfer;

/// Opaque handle naming one wallet held by the custody provider.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct WalletHandle(String);

impl WalletHandle {
    /// Creates a wallet handle.
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signing-layer errors.
#[derive(Debug, Error)]
pub enum SignError {
    /// No connected wallet matches the handle.
    #[error("no connected wallet matches handle `{handle}`")]
    Unavailable {
        /// Requested wallet handle.
        handle: WalletHandle,
    },
    /// Owning user declined the signing prompt.
    #[error("wallet owner declined the signing request for `{handle}`")]
    Rejected {
        /// Requested wallet handle.
        handle: WalletHandle,
    },
    /// Signer failed for another reason.
    #[error("signer failure: {message}")]
    Signing {
        /// Underlying signer message.
        message: String,
    },
}

/// Signed transfer ready for wire encoding and submission.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SignedTransfer {
    /// Fully signed transaction.
    transaction: VersionedTransaction,
}

impl SignedTransfer {
    /// Wraps a signed transaction.
    #[must_use]
    pub const fn new(transaction: VersionedTransaction) -> Self {
        Self { transaction }
    }

    /// Returns the signed transaction.
    #[must_use]
    pub const fn transaction(&self) -> &VersionedTransaction {
        &self.transaction
    }

    /// Returns the fee-payer signature when present.
    #[must_use]
    pub fn signature(&self) -> Option<Signature> {
        self.transaction.signatures.first().copied()
    }

    /// Serializes to the canonical wire encoding.
    ///
    /// # Errors
    ///
    /// Returns the bincode error when encoding fails.
    pub fn to_wire_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(&self.transaction)
    }

    /// Reconstructs a signed transfer from wire bytes.
    ///
    /// # Errors
    ///
    /// Returns the bincode error when the bytes do not decode to a
    /// transaction.
    pub fn from_wire_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        let transaction = bincode::deserialize(bytes)?;
        Ok(Self { transaction })
    }
}

/// External signer capability scoped by wallet handle.
///
/// Implementations enforce that only the authenticated owner of the handle
/// can produce a valid signature; this crate only delegates.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Signs an unsigned transfer on behalf of the wallet owner.
    async fn sign_transfer(
        &self,
        unsigned: &UnsignedTransfer,
        wallet: &WalletHandle,
    ) -> Result<SignedTransfer, SignError>;

    /// Signs arbitrary message bytes on behalf of the wallet owner.
    async fn sign_message(
        &self,
        message: &[u8],
        wallet: &WalletHandle,
    ) -> Result<Signature, SignError>;
}

/// In-memory signer backed by local keypairs.
///
/// Signatures are deterministic ed25519, so repeated `sign_message` calls for
/// the same wallet and payload yield identical output.
#[derive(Default)]
pub struct KeypairWalletSigner {
    /// Keypairs by wallet handle.
    wallets: HashMap<WalletHandle, Keypair>,
}

impl KeypairWalletSigner {
    /// Creates an empty signer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a wallet keypair under a handle.
    #[must_use]
    pub fn with_wallet(mut self, handle: WalletHandle, keypair: Keypair) -> Self {
        let _ = self.wallets.insert(handle, keypair);
        self
    }

    /// Looks up the keypair for a handle.
    fn wallet(&self, handle: &WalletHandle) -> Result<&Keypair, SignError> {
        self.wallets.get(handle).ok_or_else(|| SignError::Unavailable {
            handle: handle.clone(),
        })
    }
}

#[async_trait]
impl WalletSigner for KeypairWalletSigner {
    async fn sign_transfer(
        &self,
        unsigned: &UnsignedTransfer,
        wallet: &WalletHandle,
    ) -> Result<SignedTransfer, SignError> {
        let keypair = self.wallet(wallet)?;
        let transaction = VersionedTransaction::try_new(unsigned.message().clone(), &[keypair])
            .map_err(|source| SignError::Signing {
                message: source.to_string(),
            })?;
        Ok(SignedTransfer::new(transaction))
    }

    async fn sign_message(
        &self,
        message: &[u8],
        wallet: &WalletHandle,
    ) -> Result<Signature, SignError> {
        Ok(self.wallet(wallet)?.sign_message(message))
    }
}
