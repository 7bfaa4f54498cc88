//! This module holds `MarkedDigest` types used by Bitcoin transactions.
//! Currently we represent only `TXID`s and `WTXID`s. In the future we may
//! also represent sighash digests this way.

use txsig_core::mark_hash256;

mark_hash256!(
    /// A marked Hash256Digest representing transaction IDs
    TXID
);
mark_hash256!(
    /// A marked Hash256Digest representing witness transaction IDs
    WTXID
);

#[cfg(test)]
mod test {
    use super::*;
    use txsig_core::ser::ByteFormat;

    #[test]
    fn it_serializes_and_derializes_hash256digests() {
        let cases = [(
            TXID::default(),
            "0000000000000000000000000000000000000000000000000000000000000000",
        )];
        for case in cases.iter() {
            let digest = TXID::deserialize_hex(case.1).unwrap();
            assert_eq!(digest.serialized_length(), 32);
            assert_eq!(digest, case.0);
            assert_eq!(digest.serialize_hex(), case.1);
            assert_eq!(case.0.serialize_hex(), case.1);
        }
    }

    #[test]
    fn it_converts_between_display_and_wire_order() {
        let be = "03ee4f7a4e68f802303bc659f8f817964b4b74fe046facc3ae1be4679d622c45";
        let txid = TXID::from_be_hex(be).unwrap();
        assert_eq!(txid.to_be_hex(), be);
        assert_ne!(txid.serialize_hex(), be);
        assert_eq!(txid.reversed().serialize_hex(), be);
    }
}
