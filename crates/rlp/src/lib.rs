//! Canonical RLP encoding of heterogeneous field sequences.
//!
//! Every transaction variant describes itself as an ordered sequence of
//! [`Item`]s. This crate turns such a sequence into its unique canonical byte
//! representation and back. Decoding is strict: non-minimal length prefixes,
//! single bytes wrapped in a prefix, leading zeros in integers and trailing
//! bytes are all rejected instead of being normalised.

mod envelope;
mod fields;
mod item;

pub use alloy_rlp::{Error, Result};

pub use self::{
    envelope::{enveloped, typed_payload},
    fields::Fields,
    item::Item,
};

/// Maximum nesting depth accepted by the decoder.
pub const MAX_DEPTH: usize = 16;

/// Encodes the provided items as a single RLP list.
pub fn encode(items: &[Item]) -> txcore_primitives::Bytes {
    let mut out = Vec::with_capacity(Item::list_length(items));
    Item::encode_list(items, &mut out);
    out.into()
}

/// Decodes a single RLP list into its items.
///
/// The input must consist of exactly one list; a top-level string or bytes
/// following the list are errors.
pub fn decode(mut bytes: &[u8]) -> Result<Vec<Item>> {
    let item = <Item as alloy_rlp::Decodable>::decode(&mut bytes)?;
    if !bytes.is_empty() {
        return Err(Error::UnexpectedLength);
    }

    match item {
        Item::List(items) => Ok(items),
        Item::Uint(_) | Item::Bytes(_) => Err(Error::UnexpectedString),
    }
}
