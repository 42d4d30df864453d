use txcore_primitives::{Bytes, ChainId, TxKind, U256};
use txcore_rlp::{Fields, Item};
use txcore_signer::SignatureWithRecoveryId;

use super::{Legacy, kind_from_recipient, kind_to_item, legacy::decode_eip155_suffix};
use crate::{
    Recovery, SignatureComponents, SigningEnvelope, TransactionError, UnsignedTransaction,
    display_chain, recovery::recover_signature, signed,
};

/// An unsigned Harmony transaction.
///
/// Harmony extends the legacy layout with the sending and receiving shard.
/// A transaction with equal shards is intra-shard; otherwise it moves value
/// across shards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Harmony {
    // The order of these fields determines encoding order. The shard IDs
    // follow the gas fields, as in Harmony's consensus encoding.
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: U256,
    pub shard_id: u32,
    pub to_shard_id: u32,
    pub kind: TxKind,
    pub value: U256,
    pub input: Bytes,
    /// Zero signs without replay protection.
    pub chain_id: ChainId,
}

impl Harmony {
    /// Whether the transaction stays within a single shard.
    pub fn is_intra_shard(&self) -> bool {
        self.shard_id == self.to_shard_id
    }

    /// Converts an intra-shard transaction into the equivalent legacy
    /// transaction.
    pub fn convert_to_eth(&self) -> Result<Legacy, TransactionError> {
        if !self.is_intra_shard() {
            return Err(TransactionError::UnsupportedCrossShardConversion {
                shard_id: self.shard_id,
                to_shard_id: self.to_shard_id,
            });
        }

        Ok(Legacy {
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            kind: self.kind,
            value: self.value,
            input: self.input.clone(),
            chain_id: self.chain_id,
        })
    }

    /// Decodes the payload produced by
    /// [`UnsignedTransaction::unsigned_serialize`].
    pub fn decode_unsigned(bytes: &[u8]) -> Result<Self, TransactionError> {
        let items = txcore_rlp::decode(bytes)?;
        let mut fields = Fields::with_any_len(items, &[8, 11])?;

        let mut transaction = Self::decode_fields(&mut fields)?;
        if fields.remaining() > 0 {
            transaction.chain_id = decode_eip155_suffix(&mut fields)?;
        }
        fields.finish()?;

        Ok(transaction)
    }

    /// Consumes the eight unsigned fields. The chain ID is left at zero.
    pub(crate) fn decode_fields(fields: &mut Fields) -> alloy_rlp::Result<Self> {
        Ok(Self {
            nonce: fields.next_u64()?,
            gas_price: fields.next_u256()?,
            gas_limit: fields.next_u256()?,
            shard_id: next_shard(fields)?,
            to_shard_id: next_shard(fields)?,
            kind: kind_from_recipient(fields.next_optional_address()?),
            value: fields.next_u256()?,
            input: fields.next_bytes()?,
            chain_id: 0,
        })
    }
}

fn next_shard(fields: &mut Fields) -> alloy_rlp::Result<u32> {
    let shard = fields.next_u64()?;
    u32::try_from(shard).map_err(|_error| alloy_rlp::Error::Overflow)
}

impl UnsignedTransaction for Harmony {
    type Signed = signed::Harmony;

    fn unsigned_fields(&self) -> Vec<Item> {
        vec![
            Item::from(self.nonce),
            Item::from(self.gas_price),
            Item::from(self.gas_limit),
            Item::from(u64::from(self.shard_id)),
            Item::from(u64::from(self.to_shard_id)),
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
            "Signed Harmony transaction from {} on {}, shard {} to {}",
            signature.caller(),
            display_chain(self.chain_id),
            self.shard_id,
            self.to_shard_id,
        );

        Ok(signed::Harmony::new(self, signature))
    }
}

impl From<&signed::Harmony> for Harmony {
    fn from(value: &signed::Harmony) -> Self {
        value.as_request().clone()
    }
}
