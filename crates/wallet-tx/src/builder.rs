//! High-level transfer builder APIs.

use solana_hash::Hash;
use solana_message::{Message, VersionedMessage};
use solana_pubkey::{ParsePubkeyError, Pubkey};
use solana_system_interface::instruction as system_instruction;
use thiserror::Error;

use crate::providers::RecencyError;

/// Lamports per one whole SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Builder-layer errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Input did not decode to a valid on-chain address.
    #[error("invalid address `{value}`: {source}")]
    InvalidAddress {
        /// Rejected input value.
        value: String,
        /// Underlying decode error.
        source: ParsePubkeyError,
    },
    /// Amount was not a strictly positive lamport quantity.
    #[error("invalid transfer amount {value}: must be strictly positive in base units")]
    InvalidAmount {
        /// Rejected decimal amount.
        value: f64,
    },
    /// Recent blockhash could not be fetched from the network.
    #[error("failed to fetch recent blockhash: {source}")]
    Recency {
        /// Provider-layer failure.
        source: RecencyError,
    },
}

/// Parses a base-58 address string.
///
/// # Errors
///
/// Returns [`BuildError::InvalidAddress`] when the input does not decode to a
/// valid public key.
pub fn parse_address(value: &str) -> Result<Pubkey, BuildError> {
    value.parse().map_err(|source| BuildError::InvalidAddress {
        value: value.to_owned(),
        source,
    })
}

/// Converts a decimal SOL amount to lamports by flooring excess precision.
///
/// # Errors
///
/// Returns [`BuildError::InvalidAmount`] when the amount is non-finite,
/// non-positive, floors to zero lamports, or exceeds the `u64` range.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn sol_to_lamports(amount_sol: f64) -> Result<u64, BuildError> {
    if !amount_sol.is_finite() || amount_sol <= 0.0 {
        return Err(BuildError::InvalidAmount { value: amount_sol });
    }
    let lamports = (amount_sol * LAMPORTS_PER_SOL as f64).floor();
    if lamports < 1.0 || lamports >= u64::MAX as f64 {
        return Err(BuildError::InvalidAmount { value: amount_sol });
    }
    Ok(lamports as u64)
}

/// Unsigned transfer wrapper.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnsignedTransfer {
    /// Legacy-versioned message ready to sign.
    message: VersionedMessage,
}

impl UnsignedTransfer {
    /// Returns the message payload.
    #[must_use]
    pub const fn message(&self) -> &VersionedMessage {
        &self.message
    }

    /// Returns the embedded recent blockhash.
    #[must_use]
    pub fn recent_blockhash(&self) -> &Hash {
        self.message.recent_blockhash()
    }

    /// Returns the fee payer account when present.
    #[must_use]
    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.message.static_account_keys().first()
    }

    /// Returns the number of compiled instructions.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.message.instructions().len()
    }

    /// Returns the canonical message bytes a signer signs over.
    #[must_use]
    pub fn message_bytes(&self) -> Vec<u8> {
        self.message.serialize()
    }
}

/// Builder for single-instruction native transfers.
#[derive(Debug, Clone)]
pub struct TransferBuilder {
    /// Sender account, also the fee payer.
    sender: Pubkey,
    /// Recipient account.
    recipient: Pubkey,
    /// Transfer amount in lamports.
    lamports: u64,
}

impl TransferBuilder {
    /// Validates inputs and creates a transfer builder.
    ///
    /// Validation happens before any network interaction: malformed addresses
    /// and non-positive amounts are rejected here.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidAddress`] or [`BuildError::InvalidAmount`]
    /// on rejected input.
    pub fn new(sender: &str, recipient: &str, amount_sol: f64) -> Result<Self, BuildError> {
        let sender = parse_address(sender)?;
        let recipient = parse_address(recipient)?;
        let lamports = sol_to_lamports(amount_sol)?;
        Ok(Self {
            sender,
            recipient,
            lamports,
        })
    }

    /// Returns the sender/fee-payer account.
    #[must_use]
    pub const fn sender(&self) -> &Pubkey {
        &self.sender
    }

    /// Returns the recipient account.
    #[must_use]
    pub const fn recipient(&self) -> &Pubkey {
        &self.recipient
    }

    /// Returns the transfer amount in lamports.
    #[must_use]
    pub const fn lamports(&self) -> u64 {
        self.lamports
    }

    /// Builds an unsigned transfer anchored to a recent blockhash.
    #[must_use]
    pub fn build_unsigned(self, recent_blockhash: Hash) -> UnsignedTransfer {
        let instruction =
            system_instruction::transfer(&self.sender, &self.recipient, self.lamports);
        let message =
            Message::new_with_blockhash(&[instruction], Some(&self.sender), &recent_blockhash);
        UnsignedTransfer {
            message: VersionedMessage::Legacy(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use solana_keypair::Keypair;
    use solana_signer::Signer;

    use super::*;

    #[test]
    fn sol_amount_converts_to_base_units_with_floor() {
        assert!(matches!(sol_to_lamports(0.001), Ok(1_000_000)));
        assert!(matches!(sol_to_lamports(1.0), Ok(LAMPORTS_PER_SOL)));
        // Precision past one lamport truncates, never rounds.
        assert!(matches!(sol_to_lamports(0.000_000_001_9), Ok(1)));
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        for amount in [0.0, -1.0, -0.001, f64::NAN, f64::INFINITY] {
            let result = sol_to_lamports(amount);
            assert!(matches!(result, Err(BuildError::InvalidAmount { .. })));
        }
    }

    #[test]
    fn sub_lamport_amount_is_rejected() {
        let result = sol_to_lamports(0.000_000_000_1);
        assert!(matches!(result, Err(BuildError::InvalidAmount { .. })));
    }

    #[test]
    fn malformed_recipient_is_rejected() {
        let sender = Keypair::new().pubkey().to_string();
        let result = TransferBuilder::new(&sender, "not-a-base58-address!", 1.0);
        assert!(matches!(result, Err(BuildError::InvalidAddress { .. })));
    }

    #[test]
    fn build_unsigned_sets_fee_payer_and_single_transfer_instruction() {
        let sender = Keypair::new().pubkey();
        let recipient = Keypair::new().pubkey();
        let builder_result =
            TransferBuilder::new(&sender.to_string(), &recipient.to_string(), 0.001);
        assert!(builder_result.is_ok());
        if let Ok(builder) = builder_result {
            assert_eq!(builder.lamports(), 1_000_000);
            let unsigned = builder.build_unsigned(Hash::new_from_array([7_u8; 32]));

            assert_eq!(unsigned.instruction_count(), 1);
            assert_eq!(unsigned.fee_payer(), Some(&sender));
            assert_eq!(
                unsigned.recent_blockhash(),
                &Hash::new_from_array([7_u8; 32])
            );

            let keys = unsigned.message().static_account_keys();
            let instruction = unsigned.message().instructions().first();
            assert!(instruction.is_some());
            if let Some(instruction) = instruction {
                let program = keys.get(usize::from(instruction.program_id_index));
                assert_eq!(program, Some(&solana_system_interface::program::ID));
                // System transfer data: 4-byte tag (2) then lamports LE.
                assert_eq!(instruction.data.first().copied(), Some(2_u8));
                assert_eq!(
                    instruction.data.get(4..12),
                    Some(1_000_000_u64.to_le_bytes().as_slice())
                );
            }
        }
    }
}
