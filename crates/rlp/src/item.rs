use alloy_rlp::{BufMut, Decodable, Encodable, Error, Header};
use txcore_primitives::{Address, B256, Bytes, U256};

use crate::MAX_DEPTH;

/// A single element of an RLP sequence.
///
/// Integers are kept apart from byte strings when encoding so that their
/// minimal big-endian form is computed in one place. A decoded item is always
/// either [`Item::Bytes`] or [`Item::List`]; use the `as_*` accessors to
/// interpret a string as a typed value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    /// Unsigned integer, encoded without leading zeros.
    Uint(U256),
    /// Raw byte string.
    Bytes(Bytes),
    /// Nested sequence.
    List(Vec<Item>),
}

impl Item {
    /// The empty byte string, used for absent recipients and signature
    /// placeholders.
    pub const fn empty() -> Self {
        Self::Bytes(Bytes::new())
    }

    /// Writes the items as a list, including the list header.
    pub fn encode_list(items: &[Item], out: &mut dyn BufMut) {
        Header {
            list: true,
            payload_length: Self::payload_length(items),
        }
        .encode(out);

        for item in items {
            item.encode(out);
        }
    }

    /// The encoded length of a list holding the items.
    pub fn list_length(items: &[Item]) -> usize {
        let payload_length = Self::payload_length(items);
        Header {
            list: true,
            payload_length,
        }
        .length()
            + payload_length
    }

    fn payload_length(items: &[Item]) -> usize {
        items.iter().map(Encodable::length).sum()
    }

    fn decode_with_depth(buf: &mut &[u8], depth: usize) -> alloy_rlp::Result<Self> {
        if depth > MAX_DEPTH {
            return Err(Error::Custom("list nesting too deep"));
        }

        let header = Header::decode(buf)?;
        let remaining = *buf;
        let (mut payload, rest) = remaining
            .split_at_checked(header.payload_length)
            .ok_or(Error::InputTooShort)?;
        *buf = rest;

        if header.list {
            let mut items = Vec::new();
            while !payload.is_empty() {
                items.push(Self::decode_with_depth(&mut payload, depth + 1)?);
            }

            Ok(Self::List(items))
        } else {
            Ok(Self::Bytes(Bytes::copy_from_slice(payload)))
        }
    }

    /// Interprets the item as a byte string.
    pub fn as_bytes(&self) -> alloy_rlp::Result<Bytes> {
        match self {
            Item::Bytes(bytes) => Ok(bytes.clone()),
            Item::Uint(value) => Ok(trimmed_be_bytes(value).into()),
            Item::List(_) => Err(Error::UnexpectedList),
        }
    }

    /// Interprets the item as a canonical unsigned integer.
    pub fn as_u256(&self) -> alloy_rlp::Result<U256> {
        match self {
            Item::Uint(value) => Ok(*value),
            Item::Bytes(bytes) => {
                let bytes = canonical_integer_bytes(bytes, 32)?;
                U256::try_from_be_slice(bytes).ok_or(Error::Overflow)
            }
            Item::List(_) => Err(Error::UnexpectedList),
        }
    }

    /// Interprets the item as a canonical unsigned integer that fits in 64
    /// bits.
    pub fn as_u64(&self) -> alloy_rlp::Result<u64> {
        let value = self.as_u256()?;
        u64::try_from(value).map_err(|_error| Error::Overflow)
    }

    /// Interprets the item as a boolean, i.e. the integer 0 or 1.
    pub fn as_bool(&self) -> alloy_rlp::Result<bool> {
        match self.as_u64()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(Error::Custom("invalid boolean value")),
        }
    }

    /// Interprets the item as a 32-byte hash.
    pub fn as_b256(&self) -> alloy_rlp::Result<B256> {
        let bytes = self.as_bytes()?;
        B256::try_from(&bytes[..]).map_err(|_error| Error::UnexpectedLength)
    }

    /// Interprets the item as a 20-byte address.
    pub fn as_address(&self) -> alloy_rlp::Result<Address> {
        let bytes = self.as_bytes()?;
        Address::try_from(&bytes[..]).map_err(|_error| Error::UnexpectedLength)
    }

    /// Interprets the item as an optional address. The empty string is
    /// `None`.
    pub fn as_optional_address(&self) -> alloy_rlp::Result<Option<Address>> {
        let bytes = self.as_bytes()?;
        if bytes.is_empty() {
            Ok(None)
        } else {
            Address::try_from(&bytes[..])
                .map(Some)
                .map_err(|_error| Error::UnexpectedLength)
        }
    }
}

fn trimmed_be_bytes(value: &U256) -> Vec<u8> {
    value
        .to_be_bytes::<32>()
        .into_iter()
        .skip_while(|byte| *byte == 0)
        .collect()
}

fn canonical_integer_bytes(bytes: &[u8], max_len: usize) -> alloy_rlp::Result<&[u8]> {
    if bytes.first() == Some(&0) {
        return Err(Error::LeadingZero);
    }

    if bytes.len() > max_len {
        return Err(Error::Overflow);
    }

    Ok(bytes)
}

impl Encodable for Item {
    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            Item::Uint(value) => <[u8] as Encodable>::encode(&trimmed_be_bytes(value), out),
            Item::Bytes(bytes) => <[u8] as Encodable>::encode(bytes, out),
            Item::List(items) => Self::encode_list(items, out),
        }
    }

    fn length(&self) -> usize {
        match self {
            Item::Uint(value) => <[u8] as Encodable>::length(&trimmed_be_bytes(value)),
            Item::Bytes(bytes) => <[u8] as Encodable>::length(bytes),
            Item::List(items) => Self::list_length(items),
        }
    }
}

impl Decodable for Item {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Self::decode_with_depth(buf, 0)
    }
}

impl From<u64> for Item {
    fn from(value: u64) -> Self {
        Self::Uint(U256::from(value))
    }
}

impl From<U256> for Item {
    fn from(value: U256) -> Self {
        Self::Uint(value)
    }
}

impl From<bool> for Item {
    fn from(value: bool) -> Self {
        Self::Uint(U256::from(u8::from(value)))
    }
}

impl From<Bytes> for Item {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<u8>> for Item {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value.into())
    }
}

impl From<&[u8]> for Item {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(value))
    }
}

impl From<Address> for Item {
    fn from(value: Address) -> Self {
        Self::Bytes(Bytes::copy_from_slice(value.as_slice()))
    }
}

impl From<Option<Address>> for Item {
    fn from(value: Option<Address>) -> Self {
        value.map_or_else(Self::empty, Self::from)
    }
}

impl From<B256> for Item {
    fn from(value: B256) -> Self {
        Self::Bytes(Bytes::copy_from_slice(value.as_slice()))
    }
}

impl From<Vec<Item>> for Item {
    fn from(value: Vec<Item>) -> Self {
        Self::List(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_one(bytes: &[u8]) -> Item {
        let mut buf = bytes;
        let item = Item::decode(&mut buf).unwrap();
        assert!(buf.is_empty());
        item
    }

    #[test]
    fn integer_accessors_reject_leading_zero() {
        let item = decode_one(&[0x82, 0x00, 0x01]);
        assert_eq!(item.as_u64(), Err(Error::LeadingZero));
        assert_eq!(item.as_u256(), Err(Error::LeadingZero));
    }

    #[test]
    fn integer_accessors_reject_overflow() {
        let item = decode_one(&[0x89, 0x01, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(item.as_u64(), Err(Error::Overflow));
        assert_eq!(item.as_u256().unwrap(), U256::from(1u64) << 64);
    }

    #[test]
    fn empty_string_is_zero_and_none() {
        let item = decode_one(&[0x80]);
        assert_eq!(item.as_u64().unwrap(), 0);
        assert_eq!(item.as_optional_address().unwrap(), None);
        assert!(!item.as_bool().unwrap());
    }

    #[test]
    fn address_requires_twenty_bytes() {
        let item = Item::from(vec![0x11u8; 19]);
        assert_eq!(item.as_optional_address(), Err(Error::UnexpectedLength));

        let address = Address::repeat_byte(0x22);
        assert_eq!(
            Item::from(address).as_optional_address().unwrap(),
            Some(address)
        );
    }

    #[test]
    fn list_is_not_an_integer() {
        assert_eq!(Item::List(vec![]).as_u64(), Err(Error::UnexpectedList));
        assert_eq!(Item::List(vec![]).as_bytes(), Err(Error::UnexpectedList));
    }

    #[test]
    fn integer_and_bytes_encode_identically() {
        let integer = Item::from(0x0400u64);
        let bytes = Item::from(vec![0x04, 0x00]);

        assert_eq!(alloy_rlp::encode(&integer), alloy_rlp::encode(&bytes));
        assert_eq!(integer.length(), 3);
    }
}
