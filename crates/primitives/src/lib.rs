//! Primitive value types shared by the transaction crates.
//!
//! Addresses, hashes and arbitrary-precision integers are consumed as opaque
//! values; their arithmetic and formatting live in `alloy-primitives`.

pub use alloy_primitives::{
    Address, B256, Bytes, ChainId, Signature as PrimitiveSignature, TxKind, U256, address, b256,
    bytes, hex, keccak256,
};
