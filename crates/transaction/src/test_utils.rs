/// Generates tests for the signing life-cycle of a transaction type.
///
/// The invoking module must provide `dummy_request()` and
/// `dummy_secret_key()`.
macro_rules! test_signing_properties {
    ($signed:ty) => {
        #[test]
        fn round_trip() -> anyhow::Result<()> {
            let signed = dummy_request().sign(&dummy_secret_key())?;
            let decoded = <$signed>::decode(signed.serialize())?;

            assert_eq!(decoded, signed);
            assert_eq!(decoded.serialize(), signed.serialize());
            assert_eq!(decoded.from_address(), signed.from_address());
            Ok(())
        }

        #[test]
        fn decodes_through_dispatch() -> anyhow::Result<()> {
            let signed = dummy_request().sign(&dummy_secret_key())?;
            let decoded = $crate::transaction_with_data(signed.serialize())?;

            assert_eq!(decoded, $crate::Signed::from(signed));
            Ok(())
        }

        #[test]
        fn hash_is_keccak_of_encoding() -> anyhow::Result<()> {
            let signed = dummy_request().sign(&dummy_secret_key())?;

            assert_eq!(
                *signed.transaction_hash(),
                txcore_primitives::keccak256(signed.serialize())
            );
            assert_eq!(signed.transaction_hash(), signed.transaction_hash());
            Ok(())
        }

        #[test]
        fn recovers_signer() -> anyhow::Result<()> {
            let secret_key = dummy_secret_key();
            let signed = dummy_request().sign(&secret_key)?;

            assert_eq!(
                *signed.from_address(),
                txcore_signer::secret_key_to_address(&secret_key)
            );
            Ok(())
        }

        #[test]
        fn recovery_id_derived_from_sender() -> anyhow::Result<()> {
            let secret_key = dummy_secret_key();
            let signed = dummy_request().sign(&secret_key)?;

            let r = signed.signature().r().to_be_bytes::<32>();
            let s = signed.signature().s().to_be_bytes::<32>();
            let sender = txcore_signer::secret_key_to_address(&secret_key);
            let populated =
                dummy_request().populate_signature(&r, &s, $crate::Recovery::Sender(sender))?;

            assert_eq!(populated, signed);
            Ok(())
        }

        #[test]
        fn unsigned_payload_survives_signing() -> anyhow::Result<()> {
            let request = dummy_request();
            let signed = request.clone().sign(&dummy_secret_key())?;

            assert_eq!(signed.unsigned_serialize(), request.unsigned_serialize());
            assert_eq!(
                SignedTransaction::signing_hash(&signed),
                UnsignedTransaction::signing_hash(&request)
            );
            assert_eq!(signed.into_request(), request);
            Ok(())
        }

        #[test]
        fn invalid_components_are_rejected() {
            let zero = [0u8; 32];
            let one = [1u8];

            assert!(matches!(
                dummy_request().populate_signature(&zero, &one, $crate::Recovery::Id(0)),
                Err($crate::TransactionError::InvalidSignatureComponent(_))
            ));
            assert!(matches!(
                dummy_request().populate_signature(&one, &[], $crate::Recovery::Id(0)),
                Err($crate::TransactionError::InvalidSignatureComponent(_))
            ));
            assert!(matches!(
                dummy_request().populate_signature(&one, &[1u8; 33], $crate::Recovery::Id(0)),
                Err($crate::TransactionError::InvalidSignatureComponent(_))
            ));
        }

        #[test]
        fn signed_state_is_gated() -> anyhow::Result<()> {
            let unsigned = $crate::MaybeSigned::from($crate::Request::from(dummy_request()));
            assert!(matches!(
                unsigned.serialize(),
                Err($crate::TransactionError::UnsignedState)
            ));
            assert!(matches!(
                unsigned.transaction_hash(),
                Err($crate::TransactionError::UnsignedState)
            ));
            assert!(matches!(
                unsigned.from_address(),
                Err($crate::TransactionError::UnsignedState)
            ));

            let signed = unsigned.sign(&dummy_secret_key())?;
            let signed = $crate::MaybeSigned::from(signed);
            assert!(signed.serialize().is_ok());
            assert!(matches!(
                signed.sign(&dummy_secret_key()),
                Err($crate::TransactionError::AlreadySigned)
            ));
            Ok(())
        }
    };
}

// Needs to be `pub(crate)`, otherwise export doesn't work.
pub(crate) use test_signing_properties;
