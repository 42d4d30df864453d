use std::sync::OnceLock;

use txcore_primitives::{Address, B256, Bytes, ChainId, TxKind, U256, keccak256};
use txcore_rlp::{Fields, Item};
use txcore_signer::{RecoveredSignature, SignatureWithYParity};

use crate::{
    AccessListItem, Recovery, Signature, SignatureComponents, SignedTransaction,
    TransactionError, UnsignedTransaction, request, request::eip1559_effective_gas_price,
};

/// A signed EIP-1559 transaction.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Eip1559 {
    #[cfg_attr(feature = "serde", serde(flatten))]
    request: request::Eip1559,
    #[cfg_attr(feature = "serde", serde(flatten))]
    signature: RecoveredSignature<SignatureWithYParity>,
    /// Cached transaction hash
    #[cfg_attr(feature = "serde", serde(skip))]
    hash: OnceLock<B256>,
    /// Cached RLP-encoding
    #[cfg_attr(feature = "serde", serde(skip))]
    rlp_encoding: OnceLock<Bytes>,
}

impl Eip1559 {
    /// The type identifier for an EIP-1559 transaction.
    pub const TYPE: u8 = request::Eip1559::TYPE;

    pub(crate) fn new(
        request: request::Eip1559,
        signature: RecoveredSignature<SignatureWithYParity>,
    ) -> Self {
        Self {
            request,
            signature,
            hash: OnceLock::new(),
            rlp_encoding: OnceLock::new(),
        }
    }

    /// Decodes a signed EIP-1559 transaction, including its type byte, and
    /// recovers its sender.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn decode(bytes: &[u8]) -> Result<Self, TransactionError> {
        Self::decode_enveloped(bytes)
            .inspect_err(|error| log::debug!("Rejected EIP-1559 transaction: {error}"))
    }

    fn decode_enveloped(bytes: &[u8]) -> Result<Self, TransactionError> {
        let payload = match txcore_rlp::typed_payload(bytes)? {
            (Some(Self::TYPE), payload) => payload,
            (Some(transaction_type), _) => {
                return Err(TransactionError::UnknownType(transaction_type));
            }
            (None, _) => return Err(alloy_rlp::Error::Custom("missing transaction type").into()),
        };

        let items = txcore_rlp::decode(payload)?;
        let mut fields = Fields::with_len(items, 12)?;

        let request = request::Eip1559::decode_fields(&mut fields)?;
        let y_parity = fields.next_bool()?;
        let r = fields.next_u256()?;
        let s = fields.next_u256()?;
        fields.finish()?;

        let components = SignatureComponents::from_values(r, s)?;
        request.attach_signature(components, Recovery::Id(u8::from(y_parity)))
    }

    /// Returns the unsigned transaction that was signed.
    pub fn as_request(&self) -> &request::Eip1559 {
        &self.request
    }

    /// Returns an editable, unsigned copy of the transaction.
    pub fn into_request(self) -> request::Eip1559 {
        self.request
    }

    pub fn chain_id(&self) -> ChainId {
        self.request.chain_id
    }

    pub fn nonce(&self) -> u64 {
        self.request.nonce
    }

    pub fn max_priority_fee_per_gas(&self) -> &U256 {
        &self.request.max_priority_fee_per_gas
    }

    pub fn max_fee_per_gas(&self) -> &U256 {
        &self.request.max_fee_per_gas
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

    pub fn access_list(&self) -> &[AccessListItem] {
        &self.request.access_list
    }

    /// Returns the gas price paid per unit of gas, given the block's base fee.
    pub fn effective_gas_price(&self, block_base_fee: U256) -> U256 {
        eip1559_effective_gas_price(
            self.request.max_fee_per_gas,
            self.request.max_priority_fee_per_gas,
            block_base_fee,
        )
    }
}

impl SignedTransaction for Eip1559 {
    fn serialize(&self) -> &Bytes {
        self.rlp_encoding.get_or_init(|| {
            let mut fields = self.request.unsigned_fields();
            fields.extend([
                Item::from(self.signature.y_parity().unwrap_or_default()),
                Item::from(self.signature.r()),
                Item::from(self.signature.s()),
            ]);

            txcore_rlp::enveloped(Self::TYPE, &fields)
        })
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

impl PartialEq for Eip1559 {
    fn eq(&self, other: &Self) -> bool {
        self.request == other.request && self.signature == other.signature
    }
}

impl Eq for Eip1559 {}
