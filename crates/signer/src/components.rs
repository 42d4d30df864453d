use core::fmt;

use txcore_primitives::U256;

/// Order of the secp256k1 group, big-endian.
const SECP256K1_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// Identifies the `r` or `s` half of a signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Component {
    R,
    S,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::R => f.write_str("r"),
            Component::S => f.write_str("s"),
        }
    }
}

/// An invalid `r` or `s` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignatureComponentError {
    #[error("signature component {0} is empty")]
    Empty(Component),
    #[error("signature component {component} is {length} bytes long, expected at most 32")]
    TooLong { component: Component, length: usize },
    #[error("signature component {0} is zero")]
    Zero(Component),
    #[error("signature component {0} is not below the curve order")]
    OutOfRange(Component),
}

/// A validated `(r, s)` pair, not yet bound to a recovery ID.
///
/// Both values are non-zero and below the secp256k1 group order, as required
/// for a signature to be recoverable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SignatureComponents {
    r: U256,
    s: U256,
}

impl SignatureComponents {
    /// Validates big-endian `r` and `s` values, as returned by an external
    /// signer.
    pub fn new(r: &[u8], s: &[u8]) -> Result<Self, SignatureComponentError> {
        Ok(Self {
            r: parse_component(r, Component::R)?,
            s: parse_component(s, Component::S)?,
        })
    }

    /// Validates `r` and `s` values that are already integers.
    pub fn from_values(r: U256, s: U256) -> Result<Self, SignatureComponentError> {
        Ok(Self {
            r: check_range(r, Component::R)?,
            s: check_range(s, Component::S)?,
        })
    }

    pub fn r(&self) -> U256 {
        self.r
    }

    pub fn s(&self) -> U256 {
        self.s
    }
}

fn parse_component(bytes: &[u8], component: Component) -> Result<U256, SignatureComponentError> {
    if bytes.is_empty() {
        return Err(SignatureComponentError::Empty(component));
    }

    let too_long = SignatureComponentError::TooLong {
        component,
        length: bytes.len(),
    };
    if bytes.len() > 32 {
        return Err(too_long);
    }

    let value = U256::try_from_be_slice(bytes).ok_or(too_long)?;

    check_range(value, component)
}

fn check_range(value: U256, component: Component) -> Result<U256, SignatureComponentError> {
    if value.is_zero() {
        return Err(SignatureComponentError::Zero(component));
    }

    if value.to_be_bytes::<32>() >= SECP256K1_ORDER {
        return Err(SignatureComponentError::OutOfRange(component));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_short_components() {
        let components = SignatureComponents::new(&[0x01], &[0x02, 0x03]).unwrap();
        assert_eq!(components.r(), U256::from(1));
        assert_eq!(components.s(), U256::from(0x0203));
    }

    #[test]
    fn rejects_empty_components() {
        assert_eq!(
            SignatureComponents::new(&[], &[0x01]),
            Err(SignatureComponentError::Empty(Component::R))
        );
        assert_eq!(
            SignatureComponents::new(&[0x01], &[]),
            Err(SignatureComponentError::Empty(Component::S))
        );
    }

    #[test]
    fn rejects_oversized_components() {
        assert_eq!(
            SignatureComponents::new(&[0x01; 33], &[0x01]),
            Err(SignatureComponentError::TooLong {
                component: Component::R,
                length: 33
            })
        );
    }

    #[test]
    fn rejects_zero_components() {
        assert_eq!(
            SignatureComponents::new(&[0x00; 32], &[0x01]),
            Err(SignatureComponentError::Zero(Component::R))
        );
        assert_eq!(
            SignatureComponents::new(&[0x01], &[0x00]),
            Err(SignatureComponentError::Zero(Component::S))
        );
    }

    #[test]
    fn rejects_components_above_curve_order() {
        assert_eq!(
            SignatureComponents::new(&SECP256K1_ORDER, &[0x01]),
            Err(SignatureComponentError::OutOfRange(Component::R))
        );
        assert_eq!(
            SignatureComponents::new(&[0x01], &[0xff; 32]),
            Err(SignatureComponentError::OutOfRange(Component::S))
        );

        let mut below_order = SECP256K1_ORDER;
        below_order[31] -= 1;
        assert!(SignatureComponents::new(&below_order, &below_order).is_ok());
    }
}
