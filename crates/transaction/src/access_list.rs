use txcore_primitives::{Address, B256};
use txcore_rlp::{Fields, Item};

/// An EIP-2930 access list entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AccessListItem {
    /// Account addresses that would be loaded at the start of execution
    pub address: Address,
    /// Keys of storage that would be loaded at the start of execution
    pub storage_keys: Vec<B256>,
}

impl From<&AccessListItem> for Item {
    fn from(value: &AccessListItem) -> Self {
        let storage_keys = value.storage_keys.iter().copied().map(Item::from).collect();

        Item::List(vec![Item::from(value.address), Item::List(storage_keys)])
    }
}

impl TryFrom<Item> for AccessListItem {
    type Error = alloy_rlp::Error;

    fn try_from(value: Item) -> Result<Self, Self::Error> {
        let items = match value {
            Item::List(items) => items,
            Item::Uint(_) | Item::Bytes(_) => return Err(alloy_rlp::Error::UnexpectedString),
        };

        let mut fields = Fields::with_len(items, 2)?;
        let address = fields.next_address()?;
        let storage_keys = fields
            .next_list()?
            .iter()
            .map(Item::as_b256)
            .collect::<alloy_rlp::Result<Vec<_>>>()?;
        fields.finish()?;

        Ok(Self {
            address,
            storage_keys,
        })
    }
}

pub(crate) fn encode_access_list(access_list: &[AccessListItem]) -> Item {
    Item::List(access_list.iter().map(Item::from).collect())
}

pub(crate) fn decode_access_list(items: Vec<Item>) -> alloy_rlp::Result<Vec<AccessListItem>> {
    items.into_iter().map(AccessListItem::try_from).collect()
}
