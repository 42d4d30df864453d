use k256::{
    FieldBytes, SecretKey,
    ecdsa::{
        RecoveryId, Signature as ECDSASignature, SigningKey, VerifyingKey,
        signature::hazmat::PrehashSigner,
    },
};
use txcore_primitives::{Address, B256, ChainId, U256};

use crate::{
    Recoverable, Signature, SignatureComponents, SignatureError, public_key_to_address, to_v,
    v_to_recovery_id,
};

/// An ECDSA signature with a legacy V-value.
///
/// The V-value folds the recovery ID together with the chain ID, if any
/// (EIP-155).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignatureWithRecoveryId {
    /// R value
    pub r: U256,
    /// S Value
    pub s: U256,
    /// V value
    pub v: u64,
}

impl SignatureWithRecoveryId {
    /// Signs the provided digest with the secret key.
    ///
    /// The resulting V-value is `27` or `28`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn new(hash: B256, secret_key: &SecretKey) -> Result<Self, SignatureError> {
        let signing_key: SigningKey = secret_key.into();
        let (signature, recovery_id) = PrehashSigner::<(ECDSASignature, RecoveryId)>::sign_prehash(
            &signing_key,
            hash.as_slice(),
        )
        .map_err(SignatureError::ECDSAError)?;

        let r = U256::from_be_bytes::<32>(Into::<FieldBytes>::into(signature.r()).into());
        let s = U256::from_be_bytes::<32>(Into::<FieldBytes>::into(signature.s()).into());
        let v = 27 + u64::from(recovery_id.to_byte());

        Ok(Self { r, s, v })
    }

    /// Binds validated `(r, s)` components to a recovery ID, folding in the
    /// chain ID when provided.
    pub fn with_components(
        components: SignatureComponents,
        recovery_id: u8,
        chain_id: Option<ChainId>,
    ) -> Result<Self, SignatureError> {
        Ok(Self {
            r: components.r(),
            s: components.s(),
            v: to_v(recovery_id, chain_id)?,
        })
    }

    /// Returns whether the V value has odd Y parity.
    pub fn odd_y_parity(&self) -> bool {
        v_to_recovery_id(self.v) == Some(1)
    }

    /// Recovers the Ethereum address which was used to sign the given digest.
    pub fn recover(&self, hash: B256) -> Result<Address, SignatureError> {
        let (signature, recovery_id) = self.as_signature()?;

        let verifying_key =
            VerifyingKey::recover_from_prehash(hash.as_slice(), &signature, recovery_id)
                .map_err(SignatureError::ECDSAError)?;

        Ok(public_key_to_address(verifying_key.into()))
    }

    /// Retrieves the recovery signature.
    fn as_signature(&self) -> Result<(ECDSASignature, RecoveryId), SignatureError> {
        let recovery_id = self.recovery_id()?;
        let signature = {
            let mut bytes = [0u8; 64];
            let (r_bytes, s_bytes) = bytes.split_at_mut(32);
            r_bytes.copy_from_slice(&self.r.to_be_bytes::<32>());
            s_bytes.copy_from_slice(&self.s.to_be_bytes::<32>());
            ECDSASignature::from_slice(&bytes).map_err(SignatureError::ECDSAError)?
        };

        Ok((signature, recovery_id))
    }

    /// Retrieve the recovery ID.
    pub fn recovery_id(&self) -> Result<RecoveryId, SignatureError> {
        let standard_v = v_to_recovery_id(self.v).ok_or(SignatureError::InvalidRecoveryId(self.v))?;
        RecoveryId::try_from(standard_v).map_err(SignatureError::ECDSAError)
    }
}

impl Recoverable for SignatureWithRecoveryId {
    fn recover_address(&self, hash: B256) -> Result<Address, SignatureError> {
        self.recover(hash)
    }
}

impl Signature for SignatureWithRecoveryId {
    fn r(&self) -> U256 {
        self.r
    }

    fn s(&self) -> U256 {
        self.s
    }

    fn v(&self) -> u64 {
        self.v
    }

    fn y_parity(&self) -> Option<bool> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DangerousSecretKeyStr, secret_key_from_str, secret_key_to_address};

    #[allow(deprecated)]
    fn secret_key() -> SecretKey {
        secret_key_from_str(DangerousSecretKeyStr(
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        ))
        .unwrap()
    }

    #[test]
    fn sign_and_recover() {
        let secret_key = secret_key();
        let hash = B256::repeat_byte(0x42);

        let signature = SignatureWithRecoveryId::new(hash, &secret_key).unwrap();
        assert!(signature.v == 27 || signature.v == 28);

        let recovered = signature.recover(hash).unwrap();
        assert_eq!(recovered, secret_key_to_address(&secret_key));
    }

    #[test]
    fn chain_id_does_not_change_recovery() {
        let secret_key = secret_key();
        let hash = B256::repeat_byte(0x01);

        let signature = SignatureWithRecoveryId::new(hash, &secret_key).unwrap();
        let components = SignatureComponents::from_values(signature.r, signature.s).unwrap();
        let recovery_id = signature.recovery_id().unwrap().to_byte();
        let eip155 =
            SignatureWithRecoveryId::with_components(components, recovery_id, Some(1_666_600_000))
                .unwrap();

        assert_eq!(eip155.v, 2 * 1_666_600_000 + 35 + u64::from(recovery_id));
        assert_eq!(eip155.odd_y_parity(), signature.odd_y_parity());
        assert_eq!(eip155.recover(hash).unwrap(), signature.recover(hash).unwrap());
    }

    #[test]
    fn unsupported_v_has_no_recovery_id() {
        let signature = SignatureWithRecoveryId {
            r: U256::from(1),
            s: U256::from(1),
            v: 29,
        };

        assert!(matches!(
            signature.recovery_id(),
            Err(SignatureError::InvalidRecoveryId(29))
        ));
    }
}
