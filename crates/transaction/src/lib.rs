//! Transaction construction, canonical encoding and signing.
//!
//! Every transaction starts as a mutable [`request`] that describes itself as
//! an ordered sequence of RLP items. Attaching a signature consumes the
//! request and produces an immutable [`signed`] transaction whose encoding,
//! hash and sender are fixed for the rest of its lifetime.

mod access_list;
mod maybe_signed;
mod recovery;
/// Types for unsigned transactions.
pub mod request;
/// Types for signed transactions.
pub mod signed;
#[cfg(test)]
mod test_utils;

use txcore_primitives::{Address, B256, Bytes, ChainId, keccak256};
use txcore_rlp::Item;
pub use txcore_signer::{SecretKey, Signature, SignatureComponentError, SignatureComponents};
use txcore_signer::{SignatureError, SignatureWithRecoveryId};

pub use self::{
    access_list::AccessListItem,
    maybe_signed::MaybeSigned,
    recovery::Recovery,
    request::Request,
    signed::{Signed, transaction_with_data},
};

/// An error that occurs while building, signing or decoding a transaction.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The input violates the canonical encoding rules or the field layout.
    #[error("Malformed transaction encoding: {0}")]
    MalformedEncoding(#[from] alloy_rlp::Error),
    /// The `r` or `s` value cannot be part of a valid signature.
    #[error(transparent)]
    InvalidSignatureComponent(#[from] SignatureComponentError),
    /// The recovery ID must be 0 or 1.
    #[error("Invalid recovery ID {0}, expected 0 or 1")]
    InvalidRecoveryId(u8),
    /// Neither recovery ID recovers the expected sender.
    #[error("Signature does not recover to the expected sender {0}")]
    SignerMismatch(Address),
    /// Signing or recovery failed.
    #[error(transparent)]
    Signature(SignatureError),
    /// The operation requires a signed transaction.
    #[error("Transaction is not signed")]
    UnsignedState,
    /// The transaction already carries a signature.
    #[error("Transaction is already signed")]
    AlreadySigned,
    /// Only intra-shard transactions have a non-sharded counterpart.
    #[error(
        "Cannot convert cross-shard transaction from shard {shard_id} to shard {to_shard_id}"
    )]
    UnsupportedCrossShardConversion {
        /// The sending shard
        shard_id: u32,
        /// The receiving shard
        to_shard_id: u32,
    },
    /// The transaction type is always bound to a chain, but the chain ID is
    /// zero.
    #[error("Transaction type {0} requires a non-zero chain ID")]
    MissingChainId(u8),
    /// The EIP-2718 transaction type is not supported.
    #[error("Unknown transaction type: {0}")]
    UnknownType(u8),
    /// The V-value is neither 27/28 nor EIP-155 encoded.
    #[error("Invalid V-value: {0}")]
    InvalidV(u64),
}

impl From<SignatureError> for TransactionError {
    fn from(value: SignatureError) -> Self {
        match value {
            SignatureError::InvalidComponent(error) => Self::InvalidSignatureComponent(error),
            error => Self::Signature(error),
        }
    }
}

/// How the payload that is signed is framed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SigningEnvelope {
    /// An untyped RLP list. A non-zero chain ID is appended as
    /// `[chain_id, 0, 0]` (EIP-155).
    Eip155 {
        /// The chain ID, or zero for no replay protection
        chain_id: ChainId,
    },
    /// An RLP list prefixed with an EIP-2718 transaction type.
    Typed(u8),
}

/// Trait for transactions that have not been signed yet.
pub trait UnsignedTransaction: Sized {
    /// The transaction produced by attaching a signature.
    type Signed: SignedTransaction;

    /// The variant-specific fields, in encoding order.
    fn unsigned_fields(&self) -> Vec<Item>;

    /// The framing of the signed payload.
    fn signing_envelope(&self) -> SigningEnvelope;

    /// Attaches validated signature components, recovering the sender.
    fn attach_signature(
        self,
        components: SignatureComponents,
        recovery: Recovery,
    ) -> Result<Self::Signed, TransactionError>;

    /// Serializes the payload that is hashed for signing.
    fn unsigned_serialize(&self) -> Bytes {
        let mut fields = self.unsigned_fields();

        match self.signing_envelope() {
            SigningEnvelope::Eip155 { chain_id } => {
                if chain_id != 0 {
                    fields.extend([Item::from(chain_id), Item::empty(), Item::empty()]);
                }

                txcore_rlp::encode(&fields)
            }
            SigningEnvelope::Typed(transaction_type) => {
                txcore_rlp::enveloped(transaction_type, &fields)
            }
        }
    }

    /// The digest that is signed.
    fn signing_hash(&self) -> B256 {
        keccak256(self.unsigned_serialize())
    }

    /// Attaches a signature given as big-endian `r` and `s` values.
    fn populate_signature(
        self,
        r: &[u8],
        s: &[u8],
        recovery: Recovery,
    ) -> Result<Self::Signed, TransactionError> {
        let components = SignatureComponents::new(r, s)?;
        self.attach_signature(components, recovery)
    }

    /// Signs the transaction with the provided secret key.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    fn sign(self, secret_key: &SecretKey) -> Result<Self::Signed, TransactionError> {
        let signature = SignatureWithRecoveryId::new(self.signing_hash(), secret_key)?;
        let components = SignatureComponents::from_values(signature.r, signature.s)?;
        let recovery_id = signature.recovery_id()?.to_byte();

        self.attach_signature(components, Recovery::Id(recovery_id))
    }
}

/// Trait for transactions that have been signed.
pub trait SignedTransaction {
    /// The canonical encoding of the signed transaction.
    fn serialize(&self) -> &Bytes;

    /// The hash of the signed transaction.
    fn transaction_hash(&self) -> &B256;

    /// The sender, recovered when the signature was attached.
    fn from_address(&self) -> &Address;

    /// Returns the [`Signature`] of the transaction.
    fn signature(&self) -> &dyn Signature;

    /// Serializes the payload that was hashed for signing.
    fn unsigned_serialize(&self) -> Bytes;

    /// The digest that was signed.
    fn signing_hash(&self) -> B256 {
        keccak256(self.unsigned_serialize())
    }
}

/// Returns the name of the chain for diagnostics.
fn display_chain(chain_id: ChainId) -> &'static str {
    txcore_chains::chain_name(chain_id).unwrap_or("unknown chain")
}
