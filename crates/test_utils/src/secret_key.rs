use txcore_primitives::Address;
#[allow(deprecated)]
// This is test code, it's ok to use `DangerousSecretKeyStr`
use txcore_signer::{DangerousSecretKeyStr, public_key_to_address};
pub use txcore_signer::{SecretKey, SignatureError};

/// The first account that `hardhat node` shows on startup.
pub const HARDHAT_SECRET_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Converts a hex string to a secret key.
pub fn secret_key_from_str(secret_key: &str) -> Result<SecretKey, SignatureError> {
    // This is test code, it's ok to use `DangerousSecretKeyStr`
    #[allow(deprecated)]
    txcore_signer::secret_key_from_str(DangerousSecretKeyStr(secret_key))
}

/// Converts a secret key in a hex string format to an address.
///
/// Note that this function is in `txcore_test_utils` to restrict
/// opportunities for misuse. In production code there should be only one
/// place where secret keys are parsed from string to avoid potential leakage
/// into logs and error messages.
///
/// # Examples
///
/// ```
/// use txcore_test_utils::secret_key::{HARDHAT_SECRET_KEY, secret_key_to_address};
///
/// let address = secret_key_to_address(HARDHAT_SECRET_KEY).unwrap();
/// ```
pub fn secret_key_to_address(secret_key: &str) -> Result<Address, SignatureError> {
    let secret_key = secret_key_from_str(secret_key)?;
    Ok(public_key_to_address(secret_key.public_key()))
}
