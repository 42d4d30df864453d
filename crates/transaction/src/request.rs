mod eip1559;
mod harmony;
mod legacy;

use txcore_primitives::{Address, Bytes, TxKind};
use txcore_rlp::Item;

pub(crate) use self::eip1559::effective_gas_price as eip1559_effective_gas_price;
pub use self::{eip1559::Eip1559, harmony::Harmony, legacy::Legacy};
use crate::{
    Recovery, SignatureComponents, SigningEnvelope, TransactionError, UnsignedTransaction, signed,
};

/// Container type for various unsigned transaction types.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "camelCase"))]
pub enum Request {
    /// A legacy transaction, with or without EIP-155 replay protection
    Legacy(Legacy),
    /// An EIP-1559 transaction
    Eip1559(Eip1559),
    /// A Harmony sharded transaction
    Harmony(Harmony),
}

impl Request {
    /// Returns the EIP-2718 type of the transaction, if it is typed.
    pub fn transaction_type(&self) -> Option<u8> {
        match self {
            Request::Legacy(_) | Request::Harmony(_) => None,
            Request::Eip1559(_) => Some(Eip1559::TYPE),
        }
    }

    /// Returns the chain ID, or zero when the transaction is not
    /// replay-protected.
    pub fn chain_id(&self) -> u64 {
        match self {
            Request::Legacy(transaction) => transaction.chain_id,
            Request::Eip1559(transaction) => transaction.chain_id,
            Request::Harmony(transaction) => transaction.chain_id,
        }
    }

    /// Returns the nonce of the transaction.
    pub fn nonce(&self) -> u64 {
        match self {
            Request::Legacy(transaction) => transaction.nonce,
            Request::Eip1559(transaction) => transaction.nonce,
            Request::Harmony(transaction) => transaction.nonce,
        }
    }

    /// Returns the input data of the transaction.
    pub fn input(&self) -> &Bytes {
        match self {
            Request::Legacy(transaction) => &transaction.input,
            Request::Eip1559(transaction) => &transaction.input,
            Request::Harmony(transaction) => &transaction.input,
        }
    }

    /// Replaces the input data of the transaction.
    pub fn set_input(&mut self, input: Bytes) {
        match self {
            Request::Legacy(transaction) => transaction.input = input,
            Request::Eip1559(transaction) => transaction.input = input,
            Request::Harmony(transaction) => transaction.input = input,
        }
    }
}

impl UnsignedTransaction for Request {
    type Signed = signed::Signed;

    fn unsigned_fields(&self) -> Vec<Item> {
        match self {
            Request::Legacy(transaction) => transaction.unsigned_fields(),
            Request::Eip1559(transaction) => transaction.unsigned_fields(),
            Request::Harmony(transaction) => transaction.unsigned_fields(),
        }
    }

    fn signing_envelope(&self) -> SigningEnvelope {
        match self {
            Request::Legacy(transaction) => transaction.signing_envelope(),
            Request::Eip1559(transaction) => transaction.signing_envelope(),
            Request::Harmony(transaction) => transaction.signing_envelope(),
        }
    }

    fn attach_signature(
        self,
        components: SignatureComponents,
        recovery: Recovery,
    ) -> Result<Self::Signed, TransactionError> {
        match self {
            Request::Legacy(transaction) => transaction
                .attach_signature(components, recovery)
                .map(signed::Signed::Legacy),
            Request::Eip1559(transaction) => transaction
                .attach_signature(components, recovery)
                .map(signed::Signed::Eip1559),
            Request::Harmony(transaction) => transaction
                .attach_signature(components, recovery)
                .map(signed::Signed::Harmony),
        }
    }
}

impl From<Legacy> for Request {
    fn from(value: Legacy) -> Self {
        Self::Legacy(value)
    }
}

impl From<Eip1559> for Request {
    fn from(value: Eip1559) -> Self {
        Self::Eip1559(value)
    }
}

impl From<Harmony> for Request {
    fn from(value: Harmony) -> Self {
        Self::Harmony(value)
    }
}

/// Encodes the recipient, or the empty string for contract creation.
pub(crate) fn kind_to_item(kind: TxKind) -> Item {
    Item::from(kind.to().copied())
}

pub(crate) fn kind_from_recipient(recipient: Option<Address>) -> TxKind {
    recipient.map_or(TxKind::Create, TxKind::Call)
}
