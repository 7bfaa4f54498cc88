//! BIP-341 (taproot) sighash calculation, including the BIP-342 tapscript
//! signature message extension for script-path spends.
//!
//! The taproot signature message differs from BIP-143 in three ways: the
//! per-transaction field hashes are single SHA-256 rather than double, the
//! message commits to every spent prevout's value and scriptPubkey (not only
//! the signed input's), and the final digest is a `TapSighash`-tagged hash
//! rather than a double SHA-256.

use std::io::Write;

use txsig_core::{
    hashes::{Hash256Digest, MarkedDigestWriter, Sha256Writer, TaggedSha256Writer},
    ser::ByteFormat,
};

use crate::{
    defaults::LEAF_VERSION_TAPSCRIPT,
    types::{
        script::{Script, ScriptPubkey},
        transactions::{Sighash, TxError, TxResult, WitnessTx},
    },
};

const TAP_SIGHASH_TAG: &[u8] = b"TapSighash";
const TAP_LEAF_TAG: &[u8] = b"TapLeaf";

/// The spend path being signed for. Key-path spends sign the tweaked output
/// key directly; script-path spends commit additionally to the tapleaf being
/// executed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TapSpendPath<'a> {
    /// A key-path spend.
    Key,
    /// A script-path spend of the given tapleaf.
    Script {
        /// The tapscript being executed.
        leaf_script: &'a Script,
        /// The leaf version byte. `LEAF_VERSION_TAPSCRIPT` unless a future
        /// soft fork defines another.
        leaf_version: u8,
    },
}

impl<'a> TapSpendPath<'a> {
    /// A script-path spend of `leaf_script` at the current tapscript leaf
    /// version.
    pub fn tapscript(leaf_script: &'a Script) -> Self {
        TapSpendPath::Script {
            leaf_script,
            leaf_version: LEAF_VERSION_TAPSCRIPT,
        }
    }

    /// The BIP-341 extension flag: 0 for key path, 1 for script path.
    pub fn ext_flag(&self) -> u8 {
        match self {
            TapSpendPath::Key => 0,
            TapSpendPath::Script { .. } => 1,
        }
    }
}

/// Arguments required to serialize the transaction to create the BIP-341
/// sighash digest.
///
/// Because every spent prevout is committed, the caller must supply the
/// scriptPubkey and value of ALL the transaction's prevouts, in input order,
/// not just the one being signed.
///
/// The sighash modes commit as in BIP-143, with the taproot differences that
/// the flag byte 0x00 (`Sighash::Default`) behaves as ALL while itself being
/// committed, and the annex is never present.
///
/// For BIP-341 sighash documentation, see here:
///
/// - <https://github.com/bitcoin/bips/blob/master/bip-0341.mediawiki>
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaprootSighashArgs<'a> {
    /// The index of the input we'd like to sign
    pub index: usize,
    /// The sighash mode to use. `Sighash::Default` commits a zero flag byte.
    pub sighash_flag: Sighash,
    /// The scriptPubkeys of ALL prevouts being spent, in input order.
    pub prevout_scripts: &'a [ScriptPubkey],
    /// The values of ALL prevouts being spent, in input order.
    pub prevout_values: &'a [u64],
    /// Key-path or script-path spend.
    pub spend_path: TapSpendPath<'a>,
}

impl WitnessTx {
    /// Calculates the BIP-341 sighash given the sighash args. See the
    /// `TaprootSighashArgs` documentation for more in-depth discussion of
    /// sighash.
    pub fn taproot_sighash(&self, args: &TaprootSighashArgs) -> TxResult<Hash256Digest> {
        let mut w = TaggedSha256Writer::new(TAP_SIGHASH_TAG);
        self.write_taproot_sighash_preimage(&mut w, args)?;
        Ok(w.finish())
    }

    /// Writes the BIP-341 signature message (epoch included) to the provided
    /// `writer`. The digest is the `TapSighash`-tagged hash of these bytes.
    pub fn write_taproot_sighash_preimage<W>(
        &self,
        writer: &mut W,
        args: &TaprootSighashArgs,
    ) -> TxResult<()>
    where
        W: Write,
    {
        if args.prevout_scripts.len() != self.legacy_tx.vin.len()
            || args.prevout_values.len() != self.legacy_tx.vin.len()
        {
            return Err(TxError::PrevoutMismatch {
                inputs: self.legacy_tx.vin.len(),
                scripts: args.prevout_scripts.len(),
                values: args.prevout_values.len(),
            });
        }

        // epoch, hash type, then data about the transaction
        writer.write_all(&[0u8])?;
        writer.write_all(&[args.sighash_flag as u8])?;
        Self::write_u32_le(writer, self.legacy_tx.version)?;
        Self::write_u32_le(writer, self.legacy_tx.locktime)?;

        if !args.sighash_flag.is_anyone_can_pay() {
            self.sha_prevouts()?.write_to(writer)?;
            self.sha_amounts(args.prevout_values)?.write_to(writer)?;
            self.sha_scriptpubkeys(args.prevout_scripts)?
                .write_to(writer)?;
            self.sha_sequences()?.write_to(writer)?;
        }

        if !(args.sighash_flag.is_none() || args.sighash_flag.is_single()) {
            self.sha_outputs()?.write_to(writer)?;
        }

        // data about this input; the annex is never present, so the
        // spend_type low bit stays 0
        let spend_type = 2 * args.spend_path.ext_flag();
        writer.write_all(&[spend_type])?;

        if args.sighash_flag.is_anyone_can_pay() {
            let input = &self.legacy_tx.vin[args.index];
            input.outpoint.write_to(writer)?;
            Self::write_u64_le(writer, args.prevout_values[args.index])?;
            args.prevout_scripts[args.index].write_to(writer)?;
            Self::write_u32_le(writer, input.sequence)?;
        } else {
            Self::write_u32_le(writer, args.index as u32)?;
        }

        // data about this output
        if args.sighash_flag.is_single() {
            let output = self
                .legacy_tx
                .vout
                .get(args.index)
                .ok_or(TxError::SighashSingleBug)?;
            let mut w = Sha256Writer::default();
            output.write_to(&mut w)?;
            w.finish().write_to(writer)?;
        }

        if let TapSpendPath::Script {
            leaf_script,
            leaf_version,
        } = args.spend_path
        {
            // committing the tapleaf hash makes it safe to reuse a key in
            // separate scripts of the same output
            tapleaf_hash(leaf_script, leaf_version).write_to(writer)?;
            // key version: the type of public key used for this signature
            writer.write_all(&[0u8])?;
            // code separator position; OP_CODESEPARATOR tracking is not
            // supported, so always the sentinel
            writer.write_all(&0xffff_ffffu32.to_le_bytes())?;
        }

        Ok(())
    }

    /// The single SHA-256 of the serialization of all input outpoints.
    fn sha_prevouts(&self) -> TxResult<Hash256Digest> {
        let mut w = Sha256Writer::default();
        for input in self.legacy_tx.vin.iter() {
            input.outpoint.write_to(&mut w)?;
        }
        Ok(w.finish())
    }

    /// The single SHA-256 of the serialization of all spent prevout values.
    fn sha_amounts(&self, prevout_values: &[u64]) -> TxResult<Hash256Digest> {
        let mut w = Sha256Writer::default();
        for value in prevout_values.iter() {
            Self::write_u64_le(&mut w, *value)?;
        }
        Ok(w.finish())
    }

    /// The single SHA-256 of the serialization of all spent prevout
    /// scriptPubkeys, each with its length prefix.
    fn sha_scriptpubkeys(&self, prevout_scripts: &[ScriptPubkey]) -> TxResult<Hash256Digest> {
        let mut w = Sha256Writer::default();
        for script in prevout_scripts.iter() {
            script.write_to(&mut w)?;
        }
        Ok(w.finish())
    }

    /// The single SHA-256 of the serialization of all input sequences.
    fn sha_sequences(&self) -> TxResult<Hash256Digest> {
        let mut w = Sha256Writer::default();
        for input in self.legacy_tx.vin.iter() {
            Self::write_u32_le(&mut w, input.sequence)?;
        }
        Ok(w.finish())
    }

    /// The single SHA-256 of the serialization of all outputs.
    fn sha_outputs(&self) -> TxResult<Hash256Digest> {
        let mut w = Sha256Writer::default();
        for output in self.legacy_tx.vout.iter() {
            output.write_to(&mut w)?;
        }
        Ok(w.finish())
    }
}

/// The BIP-342 tapleaf hash: the `TapLeaf`-tagged hash of the leaf version
/// and the length-prefixed script.
pub fn tapleaf_hash(leaf_script: &Script, leaf_version: u8) -> Hash256Digest {
    let mut w = TaggedSha256Writer::new(TAP_LEAF_TAG);
    w.write_all(&[leaf_version]).expect("no IOError from SHA2");
    leaf_script.write_to(&mut w).expect("no IOError from SHA2");
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        script::Witness,
        txin::{BitcoinTxIn, Outpoint},
        txout::TxOut,
    };
    use crate::TXID;
    use sha2::{Digest, Sha256};
    use txsig_core::hashes::tagged_hash;

    // The BIP-341 wallet test vectors' `keyPathSpending` transaction: nine
    // inputs spending a mix of taproot, P2PKH, and P2WPKH prevouts, with a
    // published sighash for every taproot input.
    fn published_keypath_tx() -> (WitnessTx, Vec<ScriptPubkey>, Vec<u64>) {
        let inputs: [(&str, u32, u32); 9] = [
            (
                "7de20cbff686da83a54981d2b9bab3586f4ca7e48f57f5b55963115f3b334e9c",
                1,
                0x0000_0000,
            ),
            (
                "d7b7cab57b1393ace2d064f4d4a2cb8af6def61273e127517d44759b6dafdd99",
                0,
                0xffff_ffff,
            ),
            (
                "f8e1f583384333689228c5d28eac13366be082dc57441760d957275419a41842",
                0,
                0xffff_ffff,
            ),
            (
                "f0689180aa63b30cb162a73c6d2a38b7eeda2a83ece74310fda0843ad604853b",
                1,
                0xffff_fffe,
            ),
            (
                "aa5202bdf6d8ccd2ee0f0202afbbb7461d9264a25e5bfd3c5a52ee1239e0ba6c",
                1,
                0xffff_fffe,
            ),
            (
                "956149bdc66faa968eb2be2d2faa29718acbfe3941215893a2a3446d32acd050",
                0,
                0x0000_0000,
            ),
            (
                "e664b9773b88c09c32cb70a2a3e4da0ced63b7ba3b22f848531bbb1d5d5f4c94",
                1,
                0x0000_0000,
            ),
            (
                "e9aa6b8e6c9de67619e6a3924ae25696bb7b694bb677a632a74ef7eadfd4eabf",
                0,
                0xffff_ffff,
            ),
            (
                "a778eb6a263dc090464cd125c466b5a99667720b1c110468831d058aa1b82af1",
                1,
                0xffff_ffff,
            ),
        ];
        // txids as they appear in the raw serialization, i.e. wire order
        let vin: Vec<BitcoinTxIn> = inputs
            .iter()
            .map(|(txid, idx, sequence)| {
                BitcoinTxIn::new(
                    Outpoint::new(TXID::deserialize_hex(txid).unwrap(), *idx),
                    vec![],
                    *sequence,
                )
            })
            .collect();

        let vout = vec![
            TxOut::new(
                1_000_000_000,
                hex::decode("76a91406afd46bcdfd22ef94ac122aa11f241244a37ecc88ac").unwrap(),
            ),
            TxOut::new(
                3_410_000_000,
                hex::decode("ac9a87f5594be208f8532db38cff670c450ed2fea8fcdefcc9a663f78bab962b")
                    .unwrap(),
            ),
        ];
        let tx = WitnessTx::new(2, vin, vout, Vec::<Witness>::new(), 500_000_000);

        let utxos_spent: [(&str, u64); 9] = [
            (
                "512053a1f6e454df1aa2776a2814a721372d6258050de330b3c6d10ee8f4e0dda343",
                420_000_000,
            ),
            (
                "5120147c9c57132f6e7ecddba9800bb0c4449251c92a1e60371ee77557b6620f3ea3",
                462_000_000,
            ),
            (
                "76a914751e76e8199196d454941c45d1b3a323f1433bd688ac",
                294_000_000,
            ),
            (
                "5120e4d810fd50586274face62b8a807eb9719cef49c04177cc6b76a9a4251d5450e",
                504_000_000,
            ),
            (
                "512091b64d5324723a985170e4dc5a0f84c041804f2cd12660fa5dec09fc21783605",
                630_000_000,
            ),
            (
                "00147dd65592d0ab2fe0d0257d571abf032cd9db93dc",
                378_000_000,
            ),
            (
                "512075169f4001aa68f15bbed28b218df1d0a62cbbcf1188c6665110c293c907b831",
                672_000_000,
            ),
            (
                "5120712447206d7a5238acc7ff53fbe94a3b64539ad291c7cdbc490b7577e4b17df5",
                546_000_000,
            ),
            (
                "512077e30a5522dd9f894c3f8b8bd4c4b2cf82ca7da8a3ea6a239655c39c050ab220",
                588_000_000,
            ),
        ];
        let prevout_scripts = utxos_spent
            .iter()
            .map(|(script, _)| ScriptPubkey::new(hex::decode(script).unwrap()))
            .collect();
        let prevout_values = utxos_spent.iter().map(|(_, value)| *value).collect();

        (tx, prevout_scripts, prevout_values)
    }

    #[test]
    fn it_matches_the_published_keypath_sighashes() {
        let (tx, prevout_scripts, prevout_values) = published_keypath_tx();

        // every `inputSpending` entry of the vector set: input index, hash
        // type, and the published sigHash
        let cases: &[(usize, Sighash, &str)] = &[
            (
                0,
                Sighash::Single,
                "2514a6272f85cfa0f45eb907fcb0d121b808ed37c6ea160a5a9046ed5526d555",
            ),
            (
                1,
                Sighash::SingleACP,
                "325a644af47e8a5a2591cda0ab0723978537318f10e6a63d4eed783b96a71a4d",
            ),
            (
                3,
                Sighash::All,
                "bf013ea93474aa67815b1b6cc441d23b64fa310911d991e713cd34c7f5d46669",
            ),
            (
                4,
                Sighash::Default,
                "4f900a0bae3f1446fd48490c2958b5a023228f01661cda3496a11da502a7f7ef",
            ),
            (
                6,
                Sighash::None,
                "15f25c298eb5cdc7eb1d638dd2d45c97c4c59dcaec6679cfc16ad84f30876b85",
            ),
            (
                7,
                Sighash::NoneACP,
                "cd292de50313804dabe4685e83f923d2969577191a3e1d2882220dca88cbeb10",
            ),
            (
                8,
                Sighash::AllACP,
                "cccb739eca6c13a8a89e6e5cd317ffe55669bbda23f2fd37b0f18755e008edd2",
            ),
        ];

        for (index, sighash_flag, expected) in cases.iter() {
            let args = TaprootSighashArgs {
                index: *index,
                sighash_flag: *sighash_flag,
                prevout_scripts: &prevout_scripts,
                prevout_values: &prevout_values,
                spend_path: TapSpendPath::Key,
            };
            assert_eq!(
                tx.taproot_sighash(&args).unwrap(),
                Hash256Digest::deserialize_hex(expected).unwrap(),
                "input {}",
                index
            );
        }
    }

    #[test]
    fn it_matches_the_published_tapleaf_hashes() {
        // (script, leafHash) pairs from the BIP-341 `scriptPubKey` vectors
        let cases = [
            (
                "20d85a959b0290bf19bb89ed43c916be835475d013da4b362117393e25a48229b8ac",
                "5b75adecf53548f3ec6ad7d78383bf84cc57b55a3127c72b9a2481752dd88b21",
            ),
            (
                "20b617298552a72ade070667e86ca63b8f5789a9fe8731ef91202a91c9f3459007ac",
                "c525714a7f49c28aedbbba78c005931a81c234b2f6c99a73e4d06082adc8bf2b",
            ),
        ];
        for (script_hex, leaf_hash) in cases.iter() {
            let script = Script::new(hex::decode(script_hex).unwrap());
            assert_eq!(
                tapleaf_hash(&script, LEAF_VERSION_TAPSCRIPT),
                Hash256Digest::deserialize_hex(leaf_hash).unwrap()
            );
        }
    }

    #[test]
    fn it_extends_the_published_message_for_script_path() {
        let (tx, prevout_scripts, prevout_values) = published_keypath_tx();

        // input 1's prevout was derived from this leaf in the vector set, so
        // its script-path message must end with the published tapleaf hash
        let leaf_script = Script::new(
            hex::decode("20d85a959b0290bf19bb89ed43c916be835475d013da4b362117393e25a48229b8ac")
                .unwrap(),
        );
        let published_leaf_hash =
            hex::decode("5b75adecf53548f3ec6ad7d78383bf84cc57b55a3127c72b9a2481752dd88b21")
                .unwrap();

        let mut args = TaprootSighashArgs {
            index: 1,
            sighash_flag: Sighash::Default,
            prevout_scripts: &prevout_scripts,
            prevout_values: &prevout_values,
            spend_path: TapSpendPath::Key,
        };
        let mut key_msg = vec![];
        tx.write_taproot_sighash_preimage(&mut key_msg, &args)
            .unwrap();

        args.spend_path = TapSpendPath::tapscript(&leaf_script);
        let mut script_msg = vec![];
        tx.write_taproot_sighash_preimage(&mut script_msg, &args)
            .unwrap();

        let mut expected = key_msg.clone();
        expected[key_msg.len() - 5] = 0x02; // spend_type with ext_flag 1
        expected.extend_from_slice(&published_leaf_hash);
        expected.push(0x00); // key version
        expected.extend_from_slice(&[0xff; 4]); // code separator position
        assert_eq!(script_msg, expected);
    }

    fn demo_tx() -> (WitnessTx, Vec<ScriptPubkey>, Vec<u64>) {
        let txid = TXID::from_be_hex(
            "d2941b532f6d3d54d596345b50972b3995982939884037a52aab799ec84292ee",
        )
        .unwrap();
        let vin = vec![BitcoinTxIn::new(Outpoint::new(txid, 0), vec![], 0xffff_fffd)];
        let vout = vec![TxOut::new(
            119_000,
            hex::decode("5120a60869f0dbcf1dc659c9cecbaf8050135ea9e8cdc487053f1dc6880949dc684c")
                .unwrap(),
        )];
        let tx = WitnessTx::new(2, vin, vout, Vec::<Witness>::new(), 0);

        let prevout_scripts = vec![ScriptPubkey::new(
            hex::decode("512053a1f6e454df1aa2776a2814a721372d6258050de330b3c6d10ee8f4e0dda343")
                .unwrap(),
        )];
        let prevout_values = vec![120_000u64];
        (tx, prevout_scripts, prevout_values)
    }

    #[test]
    fn it_matches_an_independent_message_construction() {
        let (tx, prevout_scripts, prevout_values) = demo_tx();

        let args = TaprootSighashArgs {
            index: 0,
            sighash_flag: Sighash::Default,
            prevout_scripts: &prevout_scripts,
            prevout_values: &prevout_values,
            spend_path: TapSpendPath::Key,
        };

        // flat construction of the same message, field by field
        let mut msg: Vec<u8> = vec![];
        msg.push(0x00); // epoch
        msg.push(0x00); // hash type
        msg.extend(2u32.to_le_bytes());
        msg.extend(0u32.to_le_bytes());

        let mut outpoint = vec![];
        tx.inputs()[0].outpoint.write_to(&mut outpoint).unwrap();
        msg.extend_from_slice(&Sha256::digest(&outpoint));

        msg.extend_from_slice(&Sha256::digest(120_000u64.to_le_bytes()));

        let mut spks = vec![];
        prevout_scripts[0].write_to(&mut spks).unwrap();
        msg.extend_from_slice(&Sha256::digest(&spks));

        msg.extend_from_slice(&Sha256::digest(0xffff_fffdu32.to_le_bytes()));

        let mut outputs = vec![];
        tx.outputs()[0].write_to(&mut outputs).unwrap();
        msg.extend_from_slice(&Sha256::digest(&outputs));

        msg.push(0x00); // spend_type
        msg.extend(0u32.to_le_bytes()); // input index

        let expected = tagged_hash(b"TapSighash", &msg);
        assert_eq!(tx.taproot_sighash(&args).unwrap(), expected);

        // and the engine's message bytes are exactly the flat ones
        let mut preimage = vec![];
        tx.write_taproot_sighash_preimage(&mut preimage, &args)
            .unwrap();
        assert_eq!(preimage, msg);
    }

    #[test]
    fn it_commits_to_the_sighash_flag_byte() {
        let (tx, prevout_scripts, prevout_values) = demo_tx();

        let mut args = TaprootSighashArgs {
            index: 0,
            sighash_flag: Sighash::Default,
            prevout_scripts: &prevout_scripts,
            prevout_values: &prevout_values,
            spend_path: TapSpendPath::Key,
        };
        let default = tx.taproot_sighash(&args).unwrap();

        // DEFAULT and ALL have identical commitment scope, but the flag
        // byte itself is committed
        args.sighash_flag = Sighash::All;
        let all = tx.taproot_sighash(&args).unwrap();
        assert_ne!(default, all);
    }

    #[test]
    fn it_distinguishes_anyone_can_pay_and_spend_paths() {
        let (tx, prevout_scripts, prevout_values) = demo_tx();

        let mut args = TaprootSighashArgs {
            index: 0,
            sighash_flag: Sighash::All,
            prevout_scripts: &prevout_scripts,
            prevout_values: &prevout_values,
            spend_path: TapSpendPath::Key,
        };
        let all = tx.taproot_sighash(&args).unwrap();

        args.sighash_flag = Sighash::AllACP;
        let all_anyonecanpay = tx.taproot_sighash(&args).unwrap();
        assert_ne!(all, all_anyonecanpay);

        let leaf_script = Script::new(
            hex::decode("20b617298552a72ade070667e86ca63b8f5789a9fe8731ef91202a91c9f3459007ac")
                .unwrap(),
        );
        args.sighash_flag = Sighash::All;
        args.spend_path = TapSpendPath::tapscript(&leaf_script);
        let script_path = tx.taproot_sighash(&args).unwrap();
        assert_ne!(all, script_path);

        // the script-path message is the key-path message plus the
        // extension: tapleaf hash, key version, codesep position
        let mut key_msg = vec![];
        args.spend_path = TapSpendPath::Key;
        tx.write_taproot_sighash_preimage(&mut key_msg, &args)
            .unwrap();
        let mut script_msg = vec![];
        args.spend_path = TapSpendPath::tapscript(&leaf_script);
        tx.write_taproot_sighash_preimage(&mut script_msg, &args)
            .unwrap();
        assert_eq!(script_msg.len(), key_msg.len() + 32 + 1 + 4);
        assert_eq!(script_msg[..key_msg.len() - 5], key_msg[..key_msg.len() - 5]);
        // spend_type reflects the extension flag
        assert_eq!(key_msg[key_msg.len() - 5], 0x00);
        assert_eq!(script_msg[key_msg.len() - 5], 0x02);
        assert_eq!(&script_msg[script_msg.len() - 4..], &[0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn it_drops_the_outputs_commitment_for_none() {
        let (tx, prevout_scripts, prevout_values) = demo_tx();

        let mut args = TaprootSighashArgs {
            index: 0,
            sighash_flag: Sighash::All,
            prevout_scripts: &prevout_scripts,
            prevout_values: &prevout_values,
            spend_path: TapSpendPath::Key,
        };

        let mut all_msg = vec![];
        tx.write_taproot_sighash_preimage(&mut all_msg, &args)
            .unwrap();

        args.sighash_flag = Sighash::None;
        let mut none_msg = vec![];
        tx.write_taproot_sighash_preimage(&mut none_msg, &args)
            .unwrap();

        // sha_outputs is omitted
        assert_eq!(none_msg.len() + 32, all_msg.len());
    }

    #[test]
    fn it_commits_one_output_for_single() {
        let (tx, prevout_scripts, prevout_values) = demo_tx();

        let args = TaprootSighashArgs {
            index: 0,
            sighash_flag: Sighash::Single,
            prevout_scripts: &prevout_scripts,
            prevout_values: &prevout_values,
            spend_path: TapSpendPath::Key,
        };
        let mut msg = vec![];
        tx.write_taproot_sighash_preimage(&mut msg, &args).unwrap();

        // the trailing 32 bytes are the single SHA-256 of output 0
        let mut output = vec![];
        tx.outputs()[0].write_to(&mut output).unwrap();
        assert_eq!(msg[msg.len() - 32..], Sha256::digest(&output)[..]);
    }

    #[test]
    fn it_rejects_taproot_single_without_a_matching_output() {
        let txid = TXID::default();
        let vin = vec![
            BitcoinTxIn::new(Outpoint::new(txid, 0), vec![], 0xffff_ffff),
            BitcoinTxIn::new(Outpoint::new(txid, 1), vec![], 0xffff_ffff),
        ];
        let vout = vec![TxOut::new(50_000, vec![])];
        let tx = WitnessTx::new(2, vin, vout, Vec::<Witness>::new(), 0);

        let prevout_scripts = vec![ScriptPubkey::null(), ScriptPubkey::null()];
        let prevout_values = vec![60_000u64, 70_000];

        let args = TaprootSighashArgs {
            index: 1,
            sighash_flag: Sighash::Single,
            prevout_scripts: &prevout_scripts,
            prevout_values: &prevout_values,
            spend_path: TapSpendPath::Key,
        };

        match tx.taproot_sighash(&args) {
            Err(TxError::SighashSingleBug) => {}
            r => panic!("expected sighash single bug, got {:?}", r),
        }
    }

    #[test]
    fn it_rejects_mismatched_prevout_slices() {
        let (tx, prevout_scripts, _) = demo_tx();
        let short_values: Vec<u64> = vec![];

        let args = TaprootSighashArgs {
            index: 0,
            sighash_flag: Sighash::Default,
            prevout_scripts: &prevout_scripts,
            prevout_values: &short_values,
            spend_path: TapSpendPath::Key,
        };

        match tx.taproot_sighash(&args) {
            Err(TxError::PrevoutMismatch {
                inputs,
                scripts,
                values,
            }) => {
                assert_eq!((inputs, scripts, values), (1, 1, 0));
            }
            r => panic!("expected prevout mismatch, got {:?}", r),
        }
    }

    #[test]
    fn it_hashes_tapleaves() {
        let script = Script::new(
            hex::decode("20b617298552a72ade070667e86ca63b8f5789a9fe8731ef91202a91c9f3459007ac")
                .unwrap(),
        );

        // flat construction: tagged hash of version byte plus the
        // length-prefixed script
        let tag_digest = Sha256::digest(b"TapLeaf");
        let mut flat = Sha256::new();
        flat.update(tag_digest);
        flat.update(tag_digest);
        flat.update([LEAF_VERSION_TAPSCRIPT]);
        let mut prefixed = vec![];
        script.write_to(&mut prefixed).unwrap();
        flat.update(&prefixed);

        let expected: [u8; 32] = flat.finalize().into();
        assert_eq!(
            tapleaf_hash(&script, LEAF_VERSION_TAPSCRIPT),
            Hash256Digest::from(expected)
        );
    }
}
