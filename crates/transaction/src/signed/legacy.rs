use std::sync::OnceLock;

use txcore_primitives::{Address, B256, Bytes, ChainId, TxKind, U256, keccak256};
use txcore_rlp::{Fields, Item};
use txcore_signer::{RecoveredSignature, SignatureWithRecoveryId};

use super::{LEGACY_FIELD_COUNT, encode_with_v, split_v};
use crate::{
    Recovery, Signature, SignatureComponents, SignedTransaction, TransactionError,
    UnsignedTransaction, request, request::kind_from_recipient,
};

/// A signed legacy transaction.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Legacy {
    #[cfg_attr(feature = "serde", serde(flatten))]
    request: request::Legacy,
    #[cfg_attr(feature = "serde", serde(flatten))]
    signature: RecoveredSignature<SignatureWithRecoveryId>,
    /// Cached transaction hash
    #[cfg_attr(feature = "serde", serde(skip))]
    hash: OnceLock<B256>,
    /// Cached RLP-encoding
    #[cfg_attr(feature = "serde", serde(skip))]
    rlp_encoding: OnceLock<Bytes>,
}

impl Legacy {
    /// The type identifier for a legacy transaction.
    pub const TYPE: u8 = request::Legacy::TYPE;

    pub(crate) fn new(
        request: request::Legacy,
        signature: RecoveredSignature<SignatureWithRecoveryId>,
    ) -> Self {
        Self {
            request,
            signature,
            hash: OnceLock::new(),
            rlp_encoding: OnceLock::new(),
        }
    }

    /// Decodes a signed legacy transaction, recovering its sender.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn decode(bytes: &[u8]) -> Result<Self, TransactionError> {
        let items = txcore_rlp::decode(bytes)?;
        Self::from_items(items)
            .inspect_err(|error| log::debug!("Rejected legacy transaction: {error}"))
    }

    pub(super) fn from_items(items: Vec<Item>) -> Result<Self, TransactionError> {
        let mut fields = Fields::with_len(items, LEGACY_FIELD_COUNT)?;

        let nonce = fields.next_u64()?;
        let gas_price = fields.next_u256()?;
        let gas_limit = fields.next_u256()?;
        let kind = kind_from_recipient(fields.next_optional_address()?);
        let value = fields.next_u256()?;
        let input = fields.next_bytes()?;
        let v = fields.next_u64()?;
        let r = fields.next_u256()?;
        let s = fields.next_u256()?;
        fields.finish()?;

        let (chain_id, recovery_id) = split_v(v)?;
        let request = request::Legacy {
            nonce,
            gas_price,
            gas_limit,
            kind,
            value,
            input,
            chain_id,
        };

        let components = SignatureComponents::from_values(r, s)?;
        request.attach_signature(components, Recovery::Id(recovery_id))
    }

    /// Returns the unsigned transaction that was signed.
    pub fn as_request(&self) -> &request::Legacy {
        &self.request
    }

    /// Returns an editable, unsigned copy of the transaction.
    pub fn into_request(self) -> request::Legacy {
        self.request
    }

    pub fn nonce(&self) -> u64 {
        self.request.nonce
    }

    pub fn gas_price(&self) -> &U256 {
        &self.request.gas_price
    }

    pub fn gas_limit(&self) -> &U256 {
        &self.request.gas_limit
    }

    pub fn kind(&self) -> TxKind {
        self.request.kind
    }

    pub fn value(&self) -> &U256 {
        &self.request.value
    }

    pub fn input(&self) -> &Bytes {
        &self.request.input
    }

    /// Returns the chain ID, or zero when the transaction is not
    /// replay-protected.
    pub fn chain_id(&self) -> ChainId {
        self.request.chain_id
    }
}

impl SignedTransaction for Legacy {
    fn serialize(&self) -> &Bytes {
        self.rlp_encoding
            .get_or_init(|| encode_with_v(self.request.unsigned_fields(), &self.signature))
    }

    fn transaction_hash(&self) -> &B256 {
        self.hash.get_or_init(|| keccak256(self.serialize()))
    }

    fn from_address(&self) -> &Address {
        self.signature.caller()
    }

    fn signature(&self) -> &dyn Signature {
        &self.signature
    }

    fn unsigned_serialize(&self) -> Bytes {
        self.request.unsigned_serialize()
    }
}

impl PartialEq for Legacy {
    fn eq(&self, other: &Self) -> bool {
        self.request == other.request && self.signature == other.signature
    }
}

impl Eq for Legacy {}
