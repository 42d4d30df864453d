use alloy_rlp::{EMPTY_LIST_CODE, Error};
use txcore_primitives::Bytes;

use crate::Item;

/// RLP-encodes the items as a list and prepends it with the provided
/// EIP-2718 transaction type.
pub fn enveloped(transaction_type: u8, items: &[Item]) -> Bytes {
    let mut out = Vec::with_capacity(1 + Item::list_length(items));
    out.push(transaction_type);
    Item::encode_list(items, &mut out);
    out.into()
}

/// Splits an encoded transaction into its EIP-2718 type and the RLP payload.
///
/// Untyped (legacy) transactions start with a list header and yield `None`.
pub fn typed_payload(bytes: &[u8]) -> alloy_rlp::Result<(Option<u8>, &[u8])> {
    let (first, rest) = bytes.split_first().ok_or(Error::InputTooShort)?;

    if *first >= EMPTY_LIST_CODE {
        Ok((None, bytes))
    } else if *first <= 0x7f {
        Ok((Some(*first), rest))
    } else {
        Err(Error::UnexpectedString)
    }
}
