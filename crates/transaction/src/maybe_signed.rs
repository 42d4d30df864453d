use txcore_primitives::{Address, B256, Bytes};

use crate::{
    Recovery, Request, SecretKey, Signed, SignedTransaction, TransactionError,
    UnsignedTransaction,
};

/// A transaction that may or may not carry a signature yet.
///
/// Operations that only make sense in one state fail with
/// [`TransactionError::UnsignedState`] or [`TransactionError::AlreadySigned`]
/// in the other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MaybeSigned {
    Unsigned(Request),
    Signed(Signed),
}

impl MaybeSigned {
    /// Whether a signature is attached.
    pub fn is_signed(&self) -> bool {
        matches!(self, MaybeSigned::Signed(_))
    }

    /// Serializes the payload that is hashed for signing.
    pub fn unsigned_serialize(&self) -> Bytes {
        match self {
            MaybeSigned::Unsigned(request) => request.unsigned_serialize(),
            MaybeSigned::Signed(signed) => signed.unsigned_serialize(),
        }
    }

    /// The digest that is signed.
    pub fn signing_hash(&self) -> B256 {
        match self {
            MaybeSigned::Unsigned(request) => request.signing_hash(),
            MaybeSigned::Signed(signed) => signed.signing_hash(),
        }
    }

    /// The canonical encoding of the signed transaction.
    pub fn serialize(&self) -> Result<&Bytes, TransactionError> {
        self.as_signed().map(SignedTransaction::serialize)
    }

    /// The hash of the signed transaction.
    pub fn transaction_hash(&self) -> Result<&B256, TransactionError> {
        self.as_signed().map(SignedTransaction::transaction_hash)
    }

    /// The sender of the signed transaction.
    pub fn from_address(&self) -> Result<&Address, TransactionError> {
        self.as_signed().map(SignedTransaction::from_address)
    }

    /// Attaches a signature given as big-endian `r` and `s` values.
    pub fn populate_signature(
        self,
        r: &[u8],
        s: &[u8],
        recovery: Recovery,
    ) -> Result<Signed, TransactionError> {
        self.into_unsigned()?.populate_signature(r, s, recovery)
    }

    /// Signs the transaction with the provided secret key.
    pub fn sign(self, secret_key: &SecretKey) -> Result<Signed, TransactionError> {
        self.into_unsigned()?.sign(secret_key)
    }

    /// Returns an editable, unsigned copy of the transaction, dropping the
    /// signature if there is one.
    pub fn into_request(self) -> Request {
        match self {
            MaybeSigned::Unsigned(request) => request,
            MaybeSigned::Signed(signed) => signed.into_request(),
        }
    }

    fn as_signed(&self) -> Result<&Signed, TransactionError> {
        match self {
            MaybeSigned::Unsigned(_) => Err(TransactionError::UnsignedState),
            MaybeSigned::Signed(signed) => Ok(signed),
        }
    }

    fn into_unsigned(self) -> Result<Request, TransactionError> {
        match self {
            MaybeSigned::Unsigned(request) => Ok(request),
            MaybeSigned::Signed(_) => Err(TransactionError::AlreadySigned),
        }
    }
}

impl From<Request> for MaybeSigned {
    fn from(value: Request) -> Self {
        Self::Unsigned(value)
    }
}

impl From<Signed> for MaybeSigned {
    fn from(value: Signed) -> Self {
        Self::Signed(value)
    }
}
