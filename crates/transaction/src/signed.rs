mod eip1559;
mod harmony;
mod legacy;

use txcore_primitives::{Address, B256, Bytes, ChainId};
use txcore_rlp::Item;
use txcore_signer::{v_to_chain_id, v_to_recovery_id};

pub use self::{eip1559::Eip1559, harmony::Harmony, legacy::Legacy};
use crate::{Signature, SignedTransaction, TransactionError, request};

/// Number of fields in a signed legacy transaction.
const LEGACY_FIELD_COUNT: usize = 9;
/// Number of fields in a signed Harmony transaction.
const HARMONY_FIELD_COUNT: usize = 11;

/// Container type for various signed transaction types.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "camelCase"))]
pub enum Signed {
    /// A legacy transaction, with or without EIP-155 replay protection
    Legacy(Legacy),
    /// An EIP-1559 transaction
    Eip1559(Eip1559),
    /// A Harmony sharded transaction
    Harmony(Harmony),
}

impl Signed {
    /// Decodes a signed transaction of any supported type.
    ///
    /// Typed transactions are recognised by their EIP-2718 type byte. Untyped
    /// transactions are told apart by their number of fields.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn decode(bytes: &[u8]) -> Result<Self, TransactionError> {
        let transaction = match txcore_rlp::typed_payload(bytes)? {
            (Some(Eip1559::TYPE), _) => Eip1559::decode(bytes).map(Self::Eip1559),
            (Some(transaction_type), _) => {
                log::debug!("Rejected transaction of unknown type {transaction_type}");
                Err(TransactionError::UnknownType(transaction_type))
            }
            (None, payload) => {
                let items = txcore_rlp::decode(payload)?;
                match items.len() {
                    LEGACY_FIELD_COUNT => Legacy::from_items(items).map(Self::Legacy),
                    HARMONY_FIELD_COUNT => Harmony::from_items(items).map(Self::Harmony),
                    got => Err(TransactionError::MalformedEncoding(
                        alloy_rlp::Error::ListLengthMismatch {
                            expected: LEGACY_FIELD_COUNT,
                            got,
                        },
                    )),
                }
            }
        };

        transaction.inspect_err(|error| log::debug!("Rejected transaction: {error}"))
    }

    /// Returns the EIP-2718 type of the transaction, if it is typed.
    pub fn transaction_type(&self) -> Option<u8> {
        match self {
            Signed::Legacy(_) | Signed::Harmony(_) => None,
            Signed::Eip1559(_) => Some(Eip1559::TYPE),
        }
    }

    /// Returns the chain ID, or zero when the transaction is not
    /// replay-protected.
    pub fn chain_id(&self) -> ChainId {
        match self {
            Signed::Legacy(transaction) => transaction.chain_id(),
            Signed::Eip1559(transaction) => transaction.chain_id(),
            Signed::Harmony(transaction) => transaction.chain_id(),
        }
    }

    /// Returns an editable, unsigned copy of the transaction.
    pub fn into_request(self) -> request::Request {
        match self {
            Signed::Legacy(transaction) => request::Request::Legacy(transaction.into_request()),
            Signed::Eip1559(transaction) => request::Request::Eip1559(transaction.into_request()),
            Signed::Harmony(transaction) => request::Request::Harmony(transaction.into_request()),
        }
    }
}

/// Decodes a signed transaction from its canonical encoding.
pub fn transaction_with_data(bytes: &[u8]) -> Result<Signed, TransactionError> {
    Signed::decode(bytes)
}

impl SignedTransaction for Signed {
    fn serialize(&self) -> &Bytes {
        match self {
            Signed::Legacy(transaction) => transaction.serialize(),
            Signed::Eip1559(transaction) => transaction.serialize(),
            Signed::Harmony(transaction) => transaction.serialize(),
        }
    }

    fn transaction_hash(&self) -> &B256 {
        match self {
            Signed::Legacy(transaction) => transaction.transaction_hash(),
            Signed::Eip1559(transaction) => transaction.transaction_hash(),
            Signed::Harmony(transaction) => transaction.transaction_hash(),
        }
    }

    fn from_address(&self) -> &Address {
        match self {
            Signed::Legacy(transaction) => transaction.from_address(),
            Signed::Eip1559(transaction) => transaction.from_address(),
            Signed::Harmony(transaction) => transaction.from_address(),
        }
    }

    fn signature(&self) -> &dyn Signature {
        match self {
            Signed::Legacy(transaction) => transaction.signature(),
            Signed::Eip1559(transaction) => transaction.signature(),
            Signed::Harmony(transaction) => transaction.signature(),
        }
    }

    fn unsigned_serialize(&self) -> Bytes {
        match self {
            Signed::Legacy(transaction) => transaction.unsigned_serialize(),
            Signed::Eip1559(transaction) => transaction.unsigned_serialize(),
            Signed::Harmony(transaction) => transaction.unsigned_serialize(),
        }
    }
}

impl From<Legacy> for Signed {
    fn from(value: Legacy) -> Self {
        Self::Legacy(value)
    }
}

impl From<Eip1559> for Signed {
    fn from(value: Eip1559) -> Self {
        Self::Eip1559(value)
    }
}

impl From<Harmony> for Signed {
    fn from(value: Harmony) -> Self {
        Self::Harmony(value)
    }
}

/// Encodes the unsigned fields followed by `[v, r, s]`.
fn encode_with_v(mut fields: Vec<Item>, signature: &dyn Signature) -> Bytes {
    fields.extend([
        Item::from(signature.v()),
        Item::from(signature.r()),
        Item::from(signature.s()),
    ]);

    txcore_rlp::encode(&fields)
}

/// Splits a legacy V-value into the chain ID (zero when not replay-protected)
/// and the recovery ID.
fn split_v(v: u64) -> Result<(ChainId, u8), TransactionError> {
    let recovery_id = v_to_recovery_id(v).ok_or(TransactionError::InvalidV(v))?;

    match v_to_chain_id(v) {
        // Zero means no replay protection and is never folded into V.
        Some(0) => Err(TransactionError::InvalidV(v)),
        Some(chain_id) => Ok((chain_id, recovery_id)),
        None => Ok((0, recovery_id)),
    }
}
