use txcore_primitives::{Address, B256, PrimitiveSignature, U256};

use crate::{
    Recoverable, Signature, SignatureComponents, SignatureError, SignatureWithRecoveryId,
};

/// An ECDSA signature with Y-parity.
///
/// Typed transactions carry the parity bit directly instead of a V-value.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignatureWithYParity(PrimitiveSignature);

impl SignatureWithYParity {
    /// Binds validated `(r, s)` components to a recovery ID, which must be
    /// 0 or 1.
    pub fn with_components(
        components: SignatureComponents,
        recovery_id: u8,
    ) -> Result<Self, SignatureError> {
        let y_parity = match recovery_id {
            0 => false,
            1 => true,
            _ => return Err(SignatureError::InvalidRecoveryId(recovery_id.into())),
        };

        Ok(Self(PrimitiveSignature::new(
            components.r(),
            components.s(),
            y_parity,
        )))
    }
}

impl From<SignatureWithRecoveryId> for SignatureWithYParity {
    fn from(value: SignatureWithRecoveryId) -> Self {
        Self(PrimitiveSignature::new(
            value.r,
            value.s,
            value.odd_y_parity(),
        ))
    }
}

impl Recoverable for SignatureWithYParity {
    fn recover_address(&self, hash: B256) -> Result<Address, SignatureError> {
        let ecdsa = SignatureWithRecoveryId {
            r: self.0.r(),
            s: self.0.s(),
            v: 27 + u64::from(self.0.v()),
        };

        ecdsa.recover(hash)
    }
}

impl Signature for SignatureWithYParity {
    fn r(&self) -> U256 {
        self.0.r()
    }

    fn s(&self) -> U256 {
        self.0.s()
    }

    fn v(&self) -> u64 {
        u64::from(self.0.v())
    }

    fn y_parity(&self) -> Option<bool> {
        Some(self.0.v())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DangerousSecretKeyStr, SecretKey, secret_key_from_str, secret_key_to_address};

    #[allow(deprecated)]
    fn secret_key() -> SecretKey {
        secret_key_from_str(DangerousSecretKeyStr(
            "e331b6d69882b4cb4ea581d88e0b604039a3de5967688d3dcffdd2270c0fd109",
        ))
        .unwrap()
    }

    #[test]
    fn parity_matches_recovery_id() {
        let secret_key = secret_key();
        let hash = B256::repeat_byte(0x07);

        let with_id = SignatureWithRecoveryId::new(hash, &secret_key).unwrap();
        let with_parity = SignatureWithYParity::from(with_id);

        assert_eq!(with_parity.y_parity(), Some(with_id.odd_y_parity()));
        assert_eq!(with_parity.v(), u64::from(with_id.odd_y_parity()));
        assert_eq!(
            with_parity.recover_address(hash).unwrap(),
            secret_key_to_address(&secret_key)
        );
    }

    #[test]
    fn components_require_binary_recovery_id() {
        let components = SignatureComponents::from_values(U256::from(1), U256::from(2)).unwrap();

        let signature = SignatureWithYParity::with_components(components, 1).unwrap();
        assert_eq!(signature.r(), U256::from(1));
        assert_eq!(signature.s(), U256::from(2));
        assert_eq!(signature.y_parity(), Some(true));

        assert!(matches!(
            SignatureWithYParity::with_components(components, 2),
            Err(SignatureError::InvalidRecoveryId(2))
        ));
    }
}
