use txcore_primitives::{Bytes, ChainId, TxKind, U256};
use txcore_rlp::{Fields, Item};
use txcore_signer::SignatureWithRecoveryId;

use super::{kind_from_recipient, kind_to_item};
use crate::{
    Recovery, SignatureComponents, SigningEnvelope, TransactionError, UnsignedTransaction,
    display_chain, recovery::recover_signature, signed,
};

/// An unsigned legacy transaction.
///
/// A non-zero `chain_id` binds the signature to that chain (EIP-155).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Legacy {
    // The order of these fields determines encoding order.
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: U256,
    pub kind: TxKind,
    pub value: U256,
    pub input: Bytes,
    /// Zero signs without replay protection.
    pub chain_id: ChainId,
}

impl Legacy {
    /// The type identifier for a legacy transaction.
    pub const TYPE: u8 = 0;

    /// Decodes the payload produced by
    /// [`UnsignedTransaction::unsigned_serialize`].
    pub fn decode_unsigned(bytes: &[u8]) -> Result<Self, TransactionError> {
        let items = txcore_rlp::decode(bytes)?;
        let mut fields = Fields::with_any_len(items, &[6, 9])?;

        let mut transaction = Self {
            nonce: fields.next_u64()?,
            gas_price: fields.next_u256()?,
            gas_limit: fields.next_u256()?,
            kind: kind_from_recipient(fields.next_optional_address()?),
            value: fields.next_u256()?,
            input: fields.next_bytes()?,
            chain_id: 0,
        };

        if fields.remaining() > 0 {
            transaction.chain_id = decode_eip155_suffix(&mut fields)?;
        }
        fields.finish()?;

        Ok(transaction)
    }
}

/// Decodes the `[chain_id, 0, 0]` suffix of a replay-protected signing
/// payload.
pub(crate) fn decode_eip155_suffix(fields: &mut Fields) -> alloy_rlp::Result<ChainId> {
    let chain_id = fields.next_u64()?;
    if chain_id == 0 {
        return Err(alloy_rlp::Error::Custom("EIP-155 suffix with zero chain ID"));
    }

    fields.next_empty()?;
    fields.next_empty()?;

    Ok(chain_id)
}

impl UnsignedTransaction for Legacy {
    type Signed = signed::Legacy;

    fn unsigned_fields(&self) -> Vec<Item> {
        vec![
            Item::from(self.nonce),
            Item::from(self.gas_price),
            Item::from(self.gas_limit),
            kind_to_item(self.kind),
            Item::from(self.value),
            Item::from(self.input.clone()),
        ]
    }

    fn signing_envelope(&self) -> SigningEnvelope {
        SigningEnvelope::Eip155 {
            chain_id: self.chain_id,
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    fn attach_signature(
        self,
        components: SignatureComponents,
        recovery: Recovery,
    ) -> Result<Self::Signed, TransactionError> {
        let chain_id = (self.chain_id != 0).then_some(self.chain_id);
        let signature =
            recover_signature(components, recovery, self.signing_hash(), |components, id| {
                SignatureWithRecoveryId::with_components(components, id, chain_id)
            })?;

        log::debug!(
            "Signed legacy transaction from {} on {}",
            signature.caller(),
            display_chain(self.chain_id)
        );

        Ok(signed::Legacy::new(self, signature))
    }
}

impl From<&signed::Legacy> for Legacy {
    fn from(value: &signed::Legacy) -> Self {
        value.as_request().clone()
    }
}

#[cfg(test)]
mod tests {
    use txcore_primitives::{Address, address};

    use super::*;

    fn example_request() -> Legacy {
        Legacy {
            nonce: 0,
            gas_price: U256::from(20_000_000_000u64),
            gas_limit: U256::from(21_000u64),
            kind: TxKind::Call(address!("0x0000000000000000000000000000000000000001")),
            value: U256::from(1_000_000_000_000_000_000u128),
            input: Bytes::new(),
            chain_id: 1,
        }
    }

    #[test]
    fn unsigned_serialize_is_deterministic() {
        let request = example_request();

        assert_eq!(request.unsigned_serialize(), request.unsigned_serialize());
        assert_eq!(request.signing_hash(), request.clone().signing_hash());
    }

    #[test]
    fn eip155_suffix_adds_three_items() -> anyhow::Result<()> {
        let protected = example_request();
        let unprotected = Legacy {
            chain_id: 0,
            ..protected.clone()
        };

        let protected_items = txcore_rlp::decode(&protected.unsigned_serialize())?;
        let unprotected_items = txcore_rlp::decode(&unprotected.unsigned_serialize())?;

        assert_eq!(protected_items.len(), unprotected_items.len() + 3);
        assert_eq!(protected_items[..6], unprotected_items[..]);
        assert_eq!(
            protected_items[6..],
            [Item::from(&[0x01u8][..]), Item::empty(), Item::empty()]
        );
        Ok(())
    }

    #[test]
    fn example_unsigned_serialization() -> anyhow::Result<()> {
        let expected = hex::decode(
            "ec808504a817c800825208940000000000000000000000000000000000000001880de0b6b3a764000080018080",
        )?;

        let encoded = example_request().unsigned_serialize();
        assert_eq!(&encoded[..], &expected[..]);

        let items = txcore_rlp::decode(&encoded)?;
        let payload_length: usize = items.iter().map(alloy_rlp::Encodable::length).sum();
        assert_eq!(encoded.len(), 1 + payload_length);

        Ok(())
    }

    #[test]
    fn decode_unsigned_reconstructs_fields() -> anyhow::Result<()> {
        let request = example_request();
        let decoded = Legacy::decode_unsigned(&request.unsigned_serialize())?;
        assert_eq!(decoded, request);

        let unprotected = Legacy {
            chain_id: 0,
            kind: TxKind::Create,
            ..request
        };
        let decoded = Legacy::decode_unsigned(&unprotected.unsigned_serialize())?;
        assert_eq!(decoded, unprotected);

        Ok(())
    }

    #[test]
    fn decode_unsigned_rejects_zero_chain_suffix() {
        let mut fields = example_request().unsigned_fields();
        fields.extend([Item::from(0u64), Item::empty(), Item::empty()]);
        let encoded = txcore_rlp::encode(&fields);

        assert!(matches!(
            Legacy::decode_unsigned(&encoded),
            Err(TransactionError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn decode_unsigned_rejects_wrong_length() {
        let mut fields = example_request().unsigned_fields();
        fields.push(Item::from(1u64));
        let encoded = txcore_rlp::encode(&fields);

        assert!(matches!(
            Legacy::decode_unsigned(&encoded),
            Err(TransactionError::MalformedEncoding(
                alloy_rlp::Error::ListLengthMismatch { got: 7, .. }
            ))
        ));
    }

    #[test]
    fn contract_creation_encodes_empty_recipient() {
        let request = Legacy {
            kind: TxKind::Create,
            ..example_request()
        };
        let items = txcore_rlp::decode(&request.unsigned_serialize()).unwrap();
        assert_eq!(items[3], Item::empty());
        assert_eq!(items[3].as_optional_address().unwrap(), None::<Address>);
    }
}
