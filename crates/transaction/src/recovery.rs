use txcore_primitives::{Address, B256};
use txcore_signer::{
    Recoverable, RecoveredSignature, Signature, SignatureComponents, SignatureError,
};

use crate::TransactionError;

/// Determines the recovery ID of an externally produced signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recovery {
    /// The recovery ID reported by the signer, 0 or 1.
    Id(u8),
    /// The expected sender. Both recovery IDs are tried and the one that
    /// recovers this address is kept.
    Sender(Address),
}

/// Binds the components to a recovery ID and recovers the sender of `hash`.
pub(crate) fn recover_signature<SignatureT>(
    components: SignatureComponents,
    recovery: Recovery,
    hash: B256,
    bind: impl Fn(SignatureComponents, u8) -> Result<SignatureT, SignatureError>,
) -> Result<RecoveredSignature<SignatureT>, TransactionError>
where
    SignatureT: Recoverable + Signature,
{
    match recovery {
        Recovery::Id(recovery_id) => {
            if recovery_id > 1 {
                return Err(TransactionError::InvalidRecoveryId(recovery_id));
            }

            let signature = bind(components, recovery_id)?;
            RecoveredSignature::recover(signature, hash).map_err(|error| {
                log::warn!("Failed to recover transaction sender: {error}");
                TransactionError::from(error)
            })
        }
        Recovery::Sender(expected) => {
            for recovery_id in 0..=1 {
                let signature = bind(components, recovery_id)?;
                match RecoveredSignature::recover(signature, hash) {
                    Ok(recovered) if *recovered.caller() == expected => return Ok(recovered),
                    Ok(recovered) => log::debug!(
                        "Recovery ID {recovery_id} recovers {}, expected {expected}",
                        recovered.caller()
                    ),
                    Err(error) => log::debug!("Recovery ID {recovery_id} is unrecoverable: {error}"),
                }
            }

            log::warn!("Signature does not recover to {expected}");
            Err(TransactionError::SignerMismatch(expected))
        }
    }
}
