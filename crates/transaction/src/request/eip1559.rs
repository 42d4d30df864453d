use txcore_primitives::{Bytes, ChainId, TxKind, U256};
use txcore_rlp::{Fields, Item};
use txcore_signer::SignatureWithYParity;

use super::{kind_from_recipient, kind_to_item};
use crate::{
    AccessListItem, Recovery, SignatureComponents, SigningEnvelope, TransactionError,
    UnsignedTransaction,
    access_list::{decode_access_list, encode_access_list},
    display_chain,
    recovery::recover_signature,
    signed,
};

/// An unsigned EIP-1559 transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Eip1559 {
    // The order of these fields determines encoding order.
    pub chain_id: ChainId,
    pub nonce: u64,
    pub max_priority_fee_per_gas: U256,
    pub max_fee_per_gas: U256,
    pub gas_limit: U256,
    pub kind: TxKind,
    pub value: U256,
    pub input: Bytes,
    pub access_list: Vec<AccessListItem>,
}

impl Eip1559 {
    /// The type identifier for an EIP-1559 transaction.
    pub const TYPE: u8 = 2;

    /// Returns the gas price paid per unit of gas, given the block's base fee.
    pub fn effective_gas_price(&self, block_base_fee: U256) -> U256 {
        effective_gas_price(
            self.max_fee_per_gas,
            self.max_priority_fee_per_gas,
            block_base_fee,
        )
    }

    /// Decodes the payload produced by
    /// [`UnsignedTransaction::unsigned_serialize`].
    pub fn decode_unsigned(bytes: &[u8]) -> Result<Self, TransactionError> {
        let payload = match txcore_rlp::typed_payload(bytes)? {
            (Some(Self::TYPE), payload) => payload,
            (Some(transaction_type), _) => {
                return Err(TransactionError::UnknownType(transaction_type));
            }
            (None, _) => return Err(alloy_rlp::Error::Custom("missing transaction type").into()),
        };

        let items = txcore_rlp::decode(payload)?;
        let mut fields = Fields::with_len(items, 9)?;
        let transaction = Self::decode_fields(&mut fields)?;
        fields.finish()?;

        transaction.check_chain_id()?;
        Ok(transaction)
    }

    fn check_chain_id(&self) -> Result<(), TransactionError> {
        if self.chain_id == 0 {
            log::warn!("Rejected EIP-1559 transaction without chain ID");
            return Err(TransactionError::MissingChainId(Self::TYPE));
        }

        Ok(())
    }

    /// Consumes the nine unsigned fields.
    pub(crate) fn decode_fields(fields: &mut Fields) -> alloy_rlp::Result<Self> {
        Ok(Self {
            chain_id: fields.next_u64()?,
            nonce: fields.next_u64()?,
            max_priority_fee_per_gas: fields.next_u256()?,
            max_fee_per_gas: fields.next_u256()?,
            gas_limit: fields.next_u256()?,
            kind: kind_from_recipient(fields.next_optional_address()?),
            value: fields.next_u256()?,
            input: fields.next_bytes()?,
            access_list: decode_access_list(fields.next_list()?)?,
        })
    }
}

pub(crate) fn effective_gas_price(
    max_fee_per_gas: U256,
    max_priority_fee_per_gas: U256,
    block_base_fee: U256,
) -> U256 {
    max_fee_per_gas.min(block_base_fee.saturating_add(max_priority_fee_per_gas))
}

impl UnsignedTransaction for Eip1559 {
    type Signed = signed::Eip1559;

    fn unsigned_fields(&self) -> Vec<Item> {
        vec![
            Item::from(self.chain_id),
            Item::from(self.nonce),
            Item::from(self.max_priority_fee_per_gas),
            Item::from(self.max_fee_per_gas),
            Item::from(self.gas_limit),
            kind_to_item(self.kind),
            Item::from(self.value),
            Item::from(self.input.clone()),
            encode_access_list(&self.access_list),
        ]
    }

    fn signing_envelope(&self) -> SigningEnvelope {
        SigningEnvelope::Typed(Self::TYPE)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    fn attach_signature(
        self,
        components: SignatureComponents,
        recovery: Recovery,
    ) -> Result<Self::Signed, TransactionError> {
        self.check_chain_id()?;

        let signature = recover_signature(
            components,
            recovery,
            self.signing_hash(),
            SignatureWithYParity::with_components,
        )?;

        log::debug!(
            "Signed EIP-1559 transaction from {} on {}",
            signature.caller(),
            display_chain(self.chain_id)
        );

        Ok(signed::Eip1559::new(self, signature))
    }
}

impl From<&signed::Eip1559> for Eip1559 {
    fn from(value: &signed::Eip1559) -> Self {
        value.as_request().clone()
    }
}

#[cfg(test)]
mod tests {
    use txcore_primitives::{Address, B256, address};

    use super::*;

    fn dummy_request() -> Eip1559 {
        Eip1559 {
            chain_id: 1,
            nonce: 1,
            max_priority_fee_per_gas: U256::from(2u64),
            max_fee_per_gas: U256::from(5u64),
            gas_limit: U256::from(3u64),
            kind: TxKind::Call(address!("0xc014ba5ec014ba5ec014ba5ec014ba5ec014ba5e")),
            value: U256::from(4),
            input: Bytes::from_static(&[0x12, 0x34]),
            access_list: vec![AccessListItem {
                address: Address::ZERO,
                storage_keys: vec![B256::ZERO, B256::with_last_byte(1)],
            }],
        }
    }

    #[test]
    fn unsigned_serialize_is_typed() {
        let encoded = dummy_request().unsigned_serialize();
        assert_eq!(encoded.first(), Some(&Eip1559::TYPE));
    }

    #[test]
    fn decode_unsigned_round_trip() -> anyhow::Result<()> {
        let request = dummy_request();
        let decoded = Eip1559::decode_unsigned(&request.unsigned_serialize())?;

        assert_eq!(decoded, request);
        Ok(())
    }

    #[test]
    fn decode_unsigned_checks_type() {
        let mut encoded = dummy_request().unsigned_serialize().to_vec();
        encoded[0] = 0x01;

        assert!(matches!(
            Eip1559::decode_unsigned(&encoded),
            Err(TransactionError::UnknownType(0x01))
        ));
        assert!(matches!(
            Eip1559::decode_unsigned(&encoded[1..]),
            Err(TransactionError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn zero_chain_id_is_rejected() -> anyhow::Result<()> {
        let request = Eip1559 {
            chain_id: 0,
            ..dummy_request()
        };
        let secret_key = txcore_test_utils::secret_key::secret_key_from_str(
            txcore_test_utils::secret_key::HARDHAT_SECRET_KEY,
        )?;

        assert!(matches!(
            request.clone().sign(&secret_key),
            Err(TransactionError::MissingChainId(Eip1559::TYPE))
        ));
        assert!(matches!(
            Eip1559::decode_unsigned(&request.unsigned_serialize()),
            Err(TransactionError::MissingChainId(Eip1559::TYPE))
        ));
        Ok(())
    }

    #[test]
    fn effective_gas_price_is_capped() {
        let request = Eip1559 {
            max_priority_fee_per_gas: U256::from(2u64),
            max_fee_per_gas: U256::from(10u64),
            ..dummy_request()
        };

        assert_eq!(request.effective_gas_price(U256::from(5u64)), U256::from(7u64));
        assert_eq!(request.effective_gas_price(U256::from(9u64)), U256::from(10u64));
        assert_eq!(request.effective_gas_price(U256::MAX), U256::from(10u64));
    }
}
