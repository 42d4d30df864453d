use alloy_rlp::Error;
use txcore_primitives::{Address, Bytes, U256};

use crate::Item;

/// Cursor over the decoded items of a list whose length has already been
/// checked.
///
/// Every `next_*` call consumes one item; [`Fields::finish`] asserts that
/// nothing is left over.
#[derive(Debug)]
pub struct Fields {
    items: std::vec::IntoIter<Item>,
}

impl Fields {
    /// Constructs a cursor, requiring exactly `expected` items.
    pub fn with_len(items: Vec<Item>, expected: usize) -> alloy_rlp::Result<Self> {
        if items.len() != expected {
            return Err(Error::ListLengthMismatch {
                expected,
                got: items.len(),
            });
        }

        Ok(Self {
            items: items.into_iter(),
        })
    }

    /// Constructs a cursor, requiring one of the `accepted` lengths.
    pub fn with_any_len(items: Vec<Item>, accepted: &[usize]) -> alloy_rlp::Result<Self> {
        if accepted.contains(&items.len()) {
            Ok(Self {
                items: items.into_iter(),
            })
        } else {
            Err(Error::ListLengthMismatch {
                expected: accepted.iter().copied().max().unwrap_or_default(),
                got: items.len(),
            })
        }
    }

    /// Number of items that have not been consumed yet.
    pub fn remaining(&self) -> usize {
        self.items.len()
    }

    /// Consumes the next item.
    pub fn next_item(&mut self) -> alloy_rlp::Result<Item> {
        self.items.next().ok_or(Error::InputTooShort)
    }

    pub fn next_u64(&mut self) -> alloy_rlp::Result<u64> {
        self.next_item()?.as_u64()
    }

    pub fn next_u256(&mut self) -> alloy_rlp::Result<U256> {
        self.next_item()?.as_u256()
    }

    pub fn next_bool(&mut self) -> alloy_rlp::Result<bool> {
        self.next_item()?.as_bool()
    }

    pub fn next_bytes(&mut self) -> alloy_rlp::Result<Bytes> {
        self.next_item()?.as_bytes()
    }

    pub fn next_address(&mut self) -> alloy_rlp::Result<Address> {
        self.next_item()?.as_address()
    }

    pub fn next_optional_address(&mut self) -> alloy_rlp::Result<Option<Address>> {
        self.next_item()?.as_optional_address()
    }

    /// Consumes the next item, which must be a list.
    pub fn next_list(&mut self) -> alloy_rlp::Result<Vec<Item>> {
        match self.next_item()? {
            Item::List(items) => Ok(items),
            Item::Uint(_) | Item::Bytes(_) => Err(Error::UnexpectedString),
        }
    }

    /// Consumes the next item, which must be the empty string.
    pub fn next_empty(&mut self) -> alloy_rlp::Result<()> {
        if self.next_bytes()?.is_empty() {
            Ok(())
        } else {
            Err(Error::Custom("expected an empty placeholder"))
        }
    }

    /// Verifies that all items were consumed.
    pub fn finish(self) -> alloy_rlp::Result<()> {
        if self.items.as_slice().is_empty() {
            Ok(())
        } else {
            Err(Error::UnexpectedLength)
        }
    }
}
