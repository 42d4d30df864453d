// Part of this code was adapted from ethers-rs and is distributed under their
// licenss:
// - https://github.com/gakonst/ethers-rs/blob/cba6f071aedafb766e82e4c2f469ed5e4638337d/LICENSE-APACHE
// - https://github.com/gakonst/ethers-rs/blob/cba6f071aedafb766e82e4c2f469ed5e4638337d/LICENSE-MIT
// For the original context see: https://github.com/gakonst/ethers-rs/blob/cba6f071aedafb766e82e4c2f469ed5e4638337d/ethers-core/src/types/signature.rs

//! Ethereum signature types
//!
//! The signing and recovery primitives are thin wrappers around `k256`. The
//! transaction crates never hold secret keys themselves; they only consume
//! the `(r, s, recovery)` values produced here or by an external signer.

mod components;
mod recovered;
mod recovery_id;
mod y_parity;

pub use k256::SecretKey;
use k256::{FieldBytes, PublicKey, elliptic_curve::sec1::ToEncodedPoint};
use sha3::{Digest, Keccak256};
use txcore_primitives::{Address, B256, ChainId, U256};

pub use self::{
    components::{Component, SignatureComponentError, SignatureComponents},
    recovered::RecoveredSignature,
    recovery_id::SignatureWithRecoveryId,
    y_parity::SignatureWithYParity,
};

/// An error involving a signature.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// Invalid secret key.
    #[error("Expected 32 byte secret key")]
    InvalidSecretKeyLength,
    /// When parsing a secret key from string to hex
    #[error("Invalid hex")]
    InvalidSecretKeyHex,
    /// Invalid `r` or `s` component.
    #[error(transparent)]
    InvalidComponent(#[from] SignatureComponentError),
    /// The recovery ID must be 0 or 1.
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u64),
    /// The chain ID is too large to be folded into a `v` value.
    #[error("Chain ID {0} cannot be folded into a V-value")]
    ChainIdOverflow(ChainId),
    /// ECDSA error
    #[error(transparent)]
    ECDSAError(#[from] k256::ecdsa::signature::Error),
    /// Elliptic curve error
    #[error(transparent)]
    EllipticCurveError(#[from] k256::elliptic_curve::Error),
}

/// Trait for an ECDSA signature.
pub trait Signature {
    /// Returns the signature's R-value.
    fn r(&self) -> U256;

    /// Returns the signature's S-value.
    fn s(&self) -> U256;

    /// Returns the signature's V-value.
    fn v(&self) -> u64;

    /// Signals whether the signature internally uses a boolean Y-parity instead
    /// of the V-value.
    ///
    /// This applies to EIP-1559 transaction signatures.
    fn y_parity(&self) -> Option<bool>;
}

/// Trait for a signature with a recoverable address.
pub trait Recoverable {
    /// Recovers the Ethereum address which was used to sign the provided
    /// digest.
    fn recover_address(&self, hash: B256) -> Result<Address, SignatureError>;
}

/// Converts a [`PublicKey`] to an [`Address`].
pub fn public_key_to_address(public_key: PublicKey) -> Address {
    let public_key = public_key.to_encoded_point(/* compress = */ false);
    // First byte is header value
    let pk_bytes = public_key.as_bytes().get(1..).unwrap_or_default();
    let hash = Keccak256::digest(pk_bytes);
    // Only take the lower 160 bits of the hash
    Address::from_slice(hash.get(12..).unwrap_or_default())
}

/// Converts a [`SecretKey`] to the [`Address`] that owns it.
pub fn secret_key_to_address(secret_key: &SecretKey) -> Address {
    public_key_to_address(secret_key.public_key())
}

/// It's dangerous to represent secret keys as native string types, because the
/// native string types have debug, display and serialization implementations
/// that can result in the secrets accidentally leaking to logs. It's marked as
/// deprecated, because it should be only created in exactly one place in the
/// production code.
#[deprecated]
pub struct DangerousSecretKeyStr<'a>(pub &'a str);

// It's marked as deprecated to be thoughtful abouts its usage.
#[allow(deprecated)]
/// Converts a hex string to a secret key.
pub fn secret_key_from_str(
    secret_key: DangerousSecretKeyStr<'_>,
) -> Result<SecretKey, SignatureError> {
    #[allow(deprecated)]
    let str_key = secret_key.0;
    let secret_key = hex::decode(str_key.strip_prefix("0x").unwrap_or(str_key))
        // Hex error can leak character, so use opaque one.
        .map_err(|_err| SignatureError::InvalidSecretKeyHex)?;
    let secret_key = FieldBytes::from_exact_iter(secret_key.into_iter())
        .ok_or(SignatureError::InvalidSecretKeyLength)?;
    SecretKey::from_bytes(&secret_key).map_err(SignatureError::EllipticCurveError)
}

/// Folds a recovery ID into a legacy V-value.
///
/// Without a chain ID, this is `27 + recovery_id`. With a chain ID (EIP-155),
/// this is `chain_id * 2 + 35 + recovery_id`.
pub fn to_v(recovery_id: u8, chain_id: Option<ChainId>) -> Result<u64, SignatureError> {
    if recovery_id > 1 {
        return Err(SignatureError::InvalidRecoveryId(recovery_id.into()));
    }

    match chain_id {
        None => Ok(27 + u64::from(recovery_id)),
        Some(chain_id) => chain_id
            .checked_mul(2)
            .and_then(|v| v.checked_add(35 + u64::from(recovery_id)))
            .ok_or(SignatureError::ChainIdOverflow(chain_id)),
    }
}

/// Extracts the chain ID from a legacy V-value, if it is EIP-155 encoded.
pub fn v_to_chain_id(v: u64) -> Option<ChainId> {
    if v >= 35 { Some((v - 35) / 2) } else { None }
}

/// Extracts the recovery ID from a legacy V-value.
///
/// Returns `None` for V-values that are neither `27`/`28` nor EIP-155
/// encoded.
pub fn v_to_recovery_id(v: u64) -> Option<u8> {
    match v {
        27 => Some(0),
        28 => Some(1),
        v if v >= 35 => Some(((v - 35) % 2) as u8),
        _ => None,
    }
}
