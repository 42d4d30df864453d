use txcore_primitives::{Address, B256, U256};

use crate::{Recoverable, Signature, SignatureError};

/// A signature together with the address it recovers to.
///
/// Recovery is an expensive operation, so it happens once when the signature
/// is attached and the result travels with the signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoveredSignature<SignatureT: Signature> {
    signature: SignatureT,
    address: Address,
}

impl<SignatureT: Signature> RecoveredSignature<SignatureT> {
    /// Returns the Ethereum address of the signer.
    pub fn caller(&self) -> &Address {
        &self.address
    }

    /// Returns the inner signature.
    pub fn signature(&self) -> &SignatureT {
        &self.signature
    }
}

impl<SignatureT: Recoverable + Signature> RecoveredSignature<SignatureT> {
    /// Recovers the signer of the provided digest.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn recover(signature: SignatureT, hash: B256) -> Result<Self, SignatureError> {
        let address = signature.recover_address(hash)?;

        Ok(Self { signature, address })
    }
}

impl<SignatureT: Signature> Signature for RecoveredSignature<SignatureT> {
    fn r(&self) -> U256 {
        self.signature.r()
    }

    fn s(&self) -> U256 {
        self.signature.s()
    }

    fn v(&self) -> u64 {
        self.signature.v()
    }

    fn y_parity(&self) -> Option<bool> {
        self.signature.y_parity()
    }
}

#[cfg(feature = "serde")]
impl<SignatureT: Signature> serde::Serialize for RecoveredSignature<SignatureT> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("r", &self.r())?;
        map.serialize_entry("s", &self.s())?;
        // Always serialize the V-value, even when the Y-parity is known.
        map.serialize_entry("v", &self.v())?;

        if let Some(y_parity) = self.y_parity() {
            map.serialize_entry("yParity", &y_parity)?;
        }
        map.serialize_entry("from", &self.address)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use k256::SecretKey;

    use super::*;
    use crate::{
        DangerousSecretKeyStr, SignatureWithRecoveryId, SignatureWithYParity, secret_key_from_str,
        secret_key_to_address,
    };

    #[allow(deprecated)]
    fn secret_key() -> SecretKey {
        secret_key_from_str(DangerousSecretKeyStr(
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        ))
        .unwrap()
    }

    #[test]
    fn recovers_caller() {
        let secret_key = secret_key();
        let hash = B256::repeat_byte(0xab);

        let signature = SignatureWithRecoveryId::new(hash, &secret_key).unwrap();
        let recovered = RecoveredSignature::recover(signature, hash).unwrap();

        assert_eq!(*recovered.caller(), secret_key_to_address(&secret_key));
        assert_eq!(recovered.v(), signature.v);
        assert_eq!(recovered.r(), signature.r);
        assert_eq!(recovered.y_parity(), None);
    }

    #[test]
    fn delegates_y_parity() {
        let secret_key = secret_key();
        let hash = B256::repeat_byte(0xcd);

        let signature = SignatureWithYParity::from(SignatureWithRecoveryId::new(hash, &secret_key).unwrap());
        let recovered = RecoveredSignature::recover(signature, hash).unwrap();

        assert_eq!(recovered.y_parity(), signature.y_parity());
        assert_eq!(*recovered.caller(), secret_key_to_address(&secret_key));
    }
}
