//! Bitcoin transaction types and associated sighash arguments.

use std::io::{Error as IOError, Read, Write};
use thiserror::Error;

use txsig_core::{
    hashes::{Hash256Digest, Hash256Writer, MarkedDigestWriter},
    ser::{self, ByteFormat, SerError},
};

use crate::{
    hashes::{TXID, WTXID},
    types::{
        script::{Script, ScriptSig, Witness},
        txin::{BitcoinTxIn, Vin},
        txout::{TxOut, Vout},
    },
};

/// Wrapper enum for returning values that may be EITHER a Witness OR a
/// Legacy tx and the type is not known in advance. This wrapper must be
/// explicitly downcast before the tx object can be used.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BitcoinTx {
    /// Witness
    Witness(WitnessTx),
    /// Legacy
    Legacy(LegacyTx),
}

impl BitcoinTx {
    /// Deserialize a hex string. Determine type information from the segwit
    /// marker `0001` immediately following the version bytes. This produces
    /// a `BitcoinTx` enum that must be explicitly cast to the desired type
    /// via `into_witness` or `into_legacy`.
    ///
    /// # Note
    ///
    /// Casting directly to legacy will drop witness information if the tx
    /// is witness.
    pub fn from_hex(hex: &str) -> Result<BitcoinTx, TxError> {
        if hex.len() >= 12 && &hex[8..12] == "0001" {
            WitnessTx::deserialize_hex(hex).map(BitcoinTx::Witness)
        } else {
            LegacyTx::deserialize_hex(hex).map(BitcoinTx::Legacy)
        }
    }

    /// True if the wrapped tx is a witness transaction. False otherwise.
    pub fn is_witness(&self) -> bool {
        matches!(self, BitcoinTx::Witness(_))
    }

    /// True if the wrapped tx is a legacy transaction. False otherwise.
    pub fn is_legacy(&self) -> bool {
        matches!(self, BitcoinTx::Legacy(_))
    }

    /// Consume the wrapper and convert it to a legacy tx. `into_witness`
    /// should be preferred, as it will never drop information.
    pub fn into_legacy(self) -> LegacyTx {
        match self {
            BitcoinTx::Witness(tx) => tx.into_legacy(),
            BitcoinTx::Legacy(tx) => tx,
        }
    }

    /// Consume the wrapper and convert it to a witness tx.
    pub fn into_witness(self) -> WitnessTx {
        match self {
            BitcoinTx::Witness(tx) => tx,
            BitcoinTx::Legacy(tx) => tx.into_witness(),
        }
    }

    /// The witness-independent transaction ID.
    pub fn txid(&self) -> TXID {
        match self {
            BitcoinTx::Witness(tx) => tx.txid(),
            BitcoinTx::Legacy(tx) => tx.txid(),
        }
    }
}

/// An Error type for transaction objects
#[derive(Debug, Error)]
pub enum TxError {
    /// Serialization-related errors
    #[error(transparent)]
    SerError(#[from] SerError),

    /// IOError bubbled up from a `Write` passed to a `ByteFormat::write_to`
    /// implementation.
    #[error(transparent)]
    IOError(#[from] IOError),

    /// Satoshi's sighash single bug. A legacy SIGHASH_SINGLE commitment to
    /// an input index with no matching output.
    #[error("SIGHASH_SINGLE bug: no output at the signed input's index")]
    SighashSingleBug,

    /// Caller provided an unknown sighash type to `Sighash::from_u8`
    #[error("Unknown Sighash: {}", .0)]
    UnknownSighash(u8),

    /// Got an unknown flag where we expected a witness flag. May indicate a
    /// non-witness transaction.
    #[error("Witness flag not as expected. Got {:?}. Expected {:?}.", .0, [0u8, 1u8])]
    BadWitnessFlag([u8; 2]),

    /// A relative timelock value outside [1, 0xffff].
    #[error("Relative timelock of {} is not between 1 and 65535", .0)]
    SequenceOutOfRange(u32),

    /// An RBF sequence has no in-script representation.
    #[error("RBF is not to be included in a script")]
    RbfInScript,

    /// Taproot sighash requires one prevout script and one prevout value
    /// per input.
    #[error(
        "Prevout mismatch: {inputs} inputs, but {scripts} prevout scripts and {values} prevout values"
    )]
    PrevoutMismatch {
        /// Number of inputs in the transaction.
        inputs: usize,
        /// Number of prevout scriptPubkeys provided.
        scripts: usize,
        /// Number of prevout values provided.
        values: usize,
    },
}

/// Type alias for result with TxError
pub type TxResult<T> = Result<T, TxError>;

/// All possible Sighash modes
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sighash {
    /// The taproot default. Semantically ALL, but the flag byte itself is 0.
    Default = 0x00,
    /// Sign ALL inputs and ALL outputs
    All = 0x01,
    /// Sign ALL inputs and NO outputs
    None = 0x02,
    /// Sign ALL inputs and ONE output
    Single = 0x03,
    /// Sign ONE input and ALL outputs
    AllACP = 0x81,
    /// Sign ONE input and NO outputs
    NoneACP = 0x82,
    /// Sign ONE input and ONE output
    SingleACP = 0x83,
}

impl Sighash {
    /// Convert a u8 into a Sighash flag or an error.
    pub fn from_u8(flag: u8) -> Result<Sighash, TxError> {
        match flag {
            0x00 => Ok(Sighash::Default),
            0x01 => Ok(Sighash::All),
            0x02 => Ok(Sighash::None),
            0x03 => Ok(Sighash::Single),
            0x81 => Ok(Sighash::AllACP),
            0x82 => Ok(Sighash::NoneACP),
            0x83 => Ok(Sighash::SingleACP),
            _ => Err(TxError::UnknownSighash(flag)),
        }
    }

    /// The flag with the modifier bits masked off.
    pub fn base_flag(&self) -> u8 {
        *self as u8 & 0x1f
    }

    /// True if the ANYONECANPAY bit is set.
    pub fn is_anyone_can_pay(&self) -> bool {
        *self as u8 & 0x80 == 0x80
    }

    /// True if the base flag is SIGHASH_SINGLE.
    pub fn is_single(&self) -> bool {
        self.base_flag() == Sighash::Single as u8
    }

    /// True if the base flag is SIGHASH_NONE.
    pub fn is_none(&self) -> bool {
        self.base_flag() == Sighash::None as u8
    }
}

/// Arguments required to serialize the transaction to create the sighash
/// digest. Used in `legacy_sighash` to abstract the sighash serialization
/// logic from the hasher used.
///
/// SIGHASH_ALL commits to ALL inputs, and ALL outputs. It indicates that no
/// further modification of the transaction is allowed without invalidating
/// the signature.
///
/// SIGHASH_ALL + ANYONECANPAY commits to ONE input and ALL outputs. It
/// indicates that anyone may add additional value to the transaction, but
/// that no one may modify the payments made. Any extra value added above the
/// sum of output values will be given to miners as part of the tx fee.
///
/// SIGHASH_NONE commits to ALL inputs and NO outputs. The sequence fields of
/// the other inputs are excluded as well, so counterparties may both reroute
/// the funds and replace their inputs.
///
/// SIGHASH_SINGLE commits to ALL inputs, and ONE output. It indicates that
/// anyone may append additional outputs to the transaction to reroute funds
/// from the inputs. Additional inputs cannot be added without invalidating
/// the signature. It is logically difficult to use securely, as it consents
/// to funds being moved, without specifying their destination.
///
/// SIGHASH_SINGLE commits specifically to the output at the same index as
/// the input being signed. If there is no output at that index, the
/// protocol's behavior is the famous "sighash single bug" and we refuse to
/// produce a digest.
///
/// SIGHASH_SINGLE + ANYONECANPAY commits to ONE input and ONE output. It
/// indicates that anyone may add additional value to the transaction, and
/// route value to any other location. The signed input and output must be
/// included in the fully-formed transaction at the same index in their
/// respective vectors.
///
/// For Legacy sighash documentation, see here:
///
/// - <https://en.bitcoin.it/wiki/OP_CHECKSIG#Hashtype_SIGHASH_ALL_.28default.29>
///
/// # Note
///
/// After signing the digest, you MUST append the sighash indicator byte to
/// the resulting signature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LegacySighashArgs {
    /// The index of the input we'd like to sign
    pub index: usize,
    /// The sighash mode to use.
    pub sighash_flag: Sighash,
    /// The script used in the prevout, which must be signed. In complex
    /// cases involving `OP_CODESEPARATOR` this must be the subset of the
    /// script containing the `OP_CHECKSIG` currently being executed.
    /// `OP_CODESEPARATOR` bytes that remain in the script are committed
    /// verbatim; they are not stripped.
    pub prevout_script: Script,
}

/// A Legacy (non-witness) Transaction.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Eq, PartialEq, Default)]
pub struct LegacyTx {
    /// The version number. Usually 1 or 2.
    pub(crate) version: u32,
    /// The vector of inputs
    pub(crate) vin: Vin,
    /// The vector of outputs
    pub(crate) vout: Vout,
    /// The nLocktime field.
    pub(crate) locktime: u32,
}

impl LegacyTx {
    /// Instantiate a new LegacyTx from its parts.
    pub fn new<I, O>(version: u32, vin: I, vout: O, locktime: u32) -> Self
    where
        I: Into<Vin>,
        O: Into<Vout>,
    {
        Self {
            version,
            vin: vin.into(),
            vout: vout.into(),
            locktime,
        }
    }

    /// Returns a reference to the transaction's inputs.
    pub fn inputs(&self) -> &[BitcoinTxIn] {
        &self.vin
    }

    /// Returns a reference to the transaction's outputs.
    pub fn outputs(&self) -> &[TxOut] {
        &self.vout
    }

    /// Returns the transaction version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns the transaction locktime.
    pub fn locktime(&self) -> u32 {
        self.locktime
    }

    /// Calculates the double-sha256 of the serialized transaction.
    pub fn txid(&self) -> TXID {
        let mut w = Hash256Writer::default();
        self.write_to(&mut w).expect("no IOError from SHA2");
        w.finish_marked()
    }

    /// The wtxid of a transaction without witnesses is its txid.
    pub fn wtxid(&self) -> WTXID {
        let mut w = Hash256Writer::default();
        self.write_to(&mut w).expect("no IOError from SHA2");
        w.finish_marked()
    }

    /// The serialized length of the transaction.
    pub fn size(&self) -> usize {
        self.serialized_length()
    }

    /// The virtual size of the transaction. Identical to `size` for
    /// non-witness transactions.
    pub fn vsize(&self) -> usize {
        self.size()
    }

    /// Consume the tx and convert it to a witness tx with empty witnesses.
    pub fn into_witness(self) -> WitnessTx {
        WitnessTx::from_legacy(self)
    }

    /// Calculates the Legacy sighash given the sighash args.
    pub fn legacy_sighash(&self, args: &LegacySighashArgs) -> TxResult<Hash256Digest> {
        let mut w = Hash256Writer::default();
        self.write_legacy_sighash_preimage(&mut w, args)?;
        Ok(w.finish())
    }

    /// Writes the Legacy sighash preimage to the provided writer. See the
    /// `LegacySighashArgs` documentation for more in-depth discussion of
    /// sighash.
    pub fn write_legacy_sighash_preimage<W: Write>(
        &self,
        writer: &mut W,
        args: &LegacySighashArgs,
    ) -> TxResult<()> {
        let mut copy_tx: Self = self.legacy_sighash_prep(args.index, &args.prevout_script);

        if args.sighash_flag.is_none() {
            Self::legacy_sighash_none(&mut copy_tx, args.index);
        } else if args.sighash_flag.is_single() {
            if args.index >= self.vout.len() {
                return Err(TxError::SighashSingleBug);
            }
            Self::legacy_sighash_single(&mut copy_tx, args.index);
        }

        if args.sighash_flag.is_anyone_can_pay() {
            Self::legacy_sighash_anyone_can_pay(&mut copy_tx, args.index);
        }

        copy_tx.write_to(writer)?;
        Self::write_u32_le(writer, args.sighash_flag as u32)?;

        Ok(())
    }

    /// Performs the sighash setup described here:
    /// <https://en.bitcoin.it/wiki/OP_CHECKSIG#How_it_works>
    ///
    /// Every input's script_sig is emptied, and the being-signed input's
    /// script_sig is replaced with the prevout script.
    ///
    /// OP_CODESEPARATOR removal is NOT performed here.
    fn legacy_sighash_prep(&self, index: usize, prevout_script: &Script) -> Self {
        let mut copy_tx = self.clone();

        for (i, input) in copy_tx.vin.iter_mut().enumerate() {
            input.script_sig = if i == index {
                ScriptSig::from(prevout_script.items())
            } else {
                ScriptSig::null()
            };
        }
        copy_tx
    }

    /// Modifies copy_tx according to legacy SIGHASH_NONE semantics: no
    /// outputs are committed, and the other inputs' sequences are zeroed so
    /// they remain replaceable.
    fn legacy_sighash_none(copy_tx: &mut Self, index: usize) {
        copy_tx.vout = vec![];
        Self::zero_other_sequences(copy_tx, index);
    }

    /// Modifies copy_tx according to legacy SIGHASH_SINGLE semantics: keep
    /// only the output at the signed index, padding the earlier positions
    /// with null (-1 satoshi, empty script) placeholders.
    fn legacy_sighash_single(copy_tx: &mut Self, index: usize) {
        let mut tx_outs: Vec<TxOut> = (0..index).map(|_| TxOut::null()).collect();
        tx_outs.push(copy_tx.vout[index].clone());
        copy_tx.vout = tx_outs;
        Self::zero_other_sequences(copy_tx, index);
    }

    /// Modifies copy_tx according to legacy SIGHASH_ANYONECANPAY semantics:
    /// only the signed input is committed.
    fn legacy_sighash_anyone_can_pay(copy_tx: &mut Self, index: usize) {
        copy_tx.vin = vec![copy_tx.vin[index].clone()];
    }

    fn zero_other_sequences(copy_tx: &mut Self, index: usize) {
        for (i, input) in copy_tx.vin.iter_mut().enumerate() {
            if i != index {
                input.sequence = 0;
            }
        }
    }
}

impl ByteFormat for LegacyTx {
    type Error = TxError;

    fn serialized_length(&self) -> usize {
        let mut len = 4; // version
        len += ser::prefix_byte_len(self.vin.len() as u64) as usize;
        len += self.vin.serialized_length();
        len += ser::prefix_byte_len(self.vout.len() as u64) as usize;
        len += self.vout.serialized_length();
        len += 4; // locktime
        len
    }

    fn read_from<R>(reader: &mut R, _limit: usize) -> Result<Self, Self::Error>
    where
        R: Read,
        Self: std::marker::Sized,
    {
        let version = Self::read_u32_le(reader)?;
        let vin = Self::read_prefix_vec(reader)?;
        let vout = Self::read_prefix_vec(reader)?;
        let locktime = Self::read_u32_le(reader)?;
        Ok(Self {
            version,
            vin,
            vout,
            locktime,
        })
    }

    fn write_to<W>(&self, writer: &mut W) -> Result<usize, Self::Error>
    where
        W: Write,
    {
        let mut len = Self::write_u32_le(writer, self.version())?;
        len += Self::write_prefix_vec(writer, &self.vin)?;
        len += Self::write_prefix_vec(writer, &self.vout)?;
        len += Self::write_u32_le(writer, self.locktime())?;
        Ok(len)
    }
}

/// Arguments required to serialize the transaction to create the BIP143
/// (witness) sighash digest. Used in `witness_sighash` to abstract the
/// sighash serialization logic from the hash used.
///
/// The sighash modes commit as described on `LegacySighashArgs`, with two
/// BIP143 differences: the prevout's value is committed alongside the
/// script, and a SIGHASH_SINGLE whose input index has no matching output
/// commits 32 zero bytes in place of the outputs hash rather than failing.
///
/// For BIP143 sighash documentation, see here:
///
/// - <https://github.com/bitcoin/bips/blob/master/bip-0143.mediawiki>
///
/// # Note
///
/// After signing the digest, you MUST append the sighash indicator byte to
/// the resulting signature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WitnessSighashArgs {
    /// The index of the input we'd like to sign
    pub index: usize,
    /// The sighash mode to use.
    pub sighash_flag: Sighash,
    /// The script code being executed. For P2WPKH this is the canonical
    /// P2PKH script template; for P2WSH it is the witness script.
    pub prevout_script: Script,
    /// The value of the prevout.
    pub prevout_value: u64,
}

/// A witness transaction. Any transaction that contains 1 or more witnesses.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Eq, PartialEq, Default)]
pub struct WitnessTx {
    pub(crate) legacy_tx: LegacyTx,
    pub(crate) witnesses: Vec<Witness>,
}

impl WitnessTx {
    /// Instantiate a new WitnessTx. Since witnesses correspond to inputs,
    /// the witness vector is resized to the input vector's length: extras
    /// are trimmed, missing entries are filled with empty witnesses.
    pub fn new<I, O, W>(version: u32, vin: I, vout: O, witnesses: W, locktime: u32) -> Self
    where
        I: Into<Vin>,
        O: Into<Vout>,
        W: Into<Vec<Witness>>,
    {
        let vins = vin.into();
        let mut wits = witnesses.into();
        if wits.len() != vins.len() {
            wits.resize(vins.len(), Witness::default());
        }

        let legacy_tx = LegacyTx::new(version, vins, vout, locktime);
        Self {
            legacy_tx,
            witnesses: wits,
        }
    }

    /// Consumes a `LegacyTx` and instantiates a new `WitnessTx` with empty
    /// witnesses
    pub fn from_legacy(legacy_tx: LegacyTx) -> Self {
        let witnesses = (0..legacy_tx.inputs().len())
            .map(|_| Witness::default())
            .collect();
        Self {
            legacy_tx,
            witnesses,
        }
    }

    /// Returns a reference to the transaction's inputs.
    pub fn inputs(&self) -> &[BitcoinTxIn] {
        &self.legacy_tx.vin
    }

    /// Returns a reference to the transaction's outputs.
    pub fn outputs(&self) -> &[TxOut] {
        &self.legacy_tx.vout
    }

    /// Returns a reference to the transaction's witnesses. Always the same
    /// length as the input vector.
    pub fn witnesses(&self) -> &[Witness] {
        &self.witnesses
    }

    /// Returns a mutable reference to the transaction's witnesses, for
    /// attaching spend authorization after signing.
    pub fn witnesses_mut(&mut self) -> &mut [Witness] {
        &mut self.witnesses
    }

    /// Returns the transaction version.
    pub fn version(&self) -> u32 {
        self.legacy_tx.version
    }

    /// Returns the transaction locktime.
    pub fn locktime(&self) -> u32 {
        self.legacy_tx.locktime
    }

    /// Returns a reference to the tx as a legacy tx (i.e. the witness tx
    /// minus its witness section).
    pub fn as_legacy(&self) -> &LegacyTx {
        &self.legacy_tx
    }

    /// Consume the tx and convert it to a legacy tx, dropping the witnesses.
    pub fn into_legacy(self) -> LegacyTx {
        self.legacy_tx
    }

    /// Calculates the witness-independent txid of the transaction by
    /// hashing the legacy serialization.
    pub fn txid(&self) -> TXID {
        self.legacy_tx.txid()
    }

    /// Calculates the witness txid of the transaction.
    pub fn wtxid(&self) -> WTXID {
        let mut w = Hash256Writer::default();
        self.write_to(&mut w).expect("no IOError from SHA2");
        w.finish_marked()
    }

    /// The serialized length of the transaction, witness section included.
    pub fn size(&self) -> usize {
        self.serialized_length()
    }

    /// The virtual size of the transaction: the marker, flag, and witness
    /// section are discounted to a quarter of their serialized weight,
    /// rounded up.
    pub fn vsize(&self) -> usize {
        let size = self.size();
        let witness_weight = 2 + self.witness_section_length(); // marker + flag
        let base_size = size - witness_weight;
        base_size + (witness_weight + 3) / 4
    }

    fn witness_section_length(&self) -> usize {
        self.witnesses
            .iter()
            .map(|wit| ser::prefix_byte_len(wit.len() as u64) as usize + wit.serialized_length())
            .sum()
    }

    /// Calculates the Legacy sighash of a witness transaction, e.g. for
    /// signing a non-witness input of a mixed transaction.
    pub fn legacy_sighash(&self, args: &LegacySighashArgs) -> TxResult<Hash256Digest> {
        self.legacy_tx.legacy_sighash(args)
    }

    /// Writes the Legacy sighash preimage to the provided writer.
    pub fn write_legacy_sighash_preimage<W: Write>(
        &self,
        writer: &mut W,
        args: &LegacySighashArgs,
    ) -> TxResult<()> {
        self.legacy_tx.write_legacy_sighash_preimage(writer, args)
    }

    /// Calculates the BIP143 sighash given the sighash args. See the
    /// `WitnessSighashArgs` documentation for more in-depth discussion of
    /// sighash.
    pub fn witness_sighash(&self, args: &WitnessSighashArgs) -> TxResult<Hash256Digest> {
        let mut w = Hash256Writer::default();
        self.write_witness_sighash_preimage(&mut w, args)?;
        Ok(w.finish())
    }

    /// Writes the BIP143 sighash preimage to the provided `writer`. See the
    /// `WitnessSighashArgs` documentation for more in-depth discussion of
    /// sighash.
    pub fn write_witness_sighash_preimage<W>(
        &self,
        writer: &mut W,
        args: &WitnessSighashArgs,
    ) -> TxResult<()>
    where
        W: Write,
    {
        let input = &self.legacy_tx.vin[args.index];

        Self::write_u32_le(writer, self.legacy_tx.version)?;
        self.hash_prevouts(args.sighash_flag)?.write_to(writer)?;
        self.hash_sequence(args.sighash_flag)?.write_to(writer)?;
        input.outpoint.write_to(writer)?;
        args.prevout_script.write_to(writer)?;
        Self::write_u64_le(writer, args.prevout_value)?;
        Self::write_u32_le(writer, input.sequence)?;
        self.hash_outputs(args.index, args.sighash_flag)?
            .write_to(writer)?;
        Self::write_u32_le(writer, self.legacy_tx.locktime)?;
        Self::write_u32_le(writer, args.sighash_flag as u32)?;
        Ok(())
    }

    /// Calculates `hash_prevouts` according to BIP143 semantics.
    ///
    /// For BIP143 (Witness and Compatibility sighash) documentation, see
    /// here:
    ///
    /// - <https://github.com/bitcoin/bips/blob/master/bip-0143.mediawiki>
    ///
    /// TODO: memoize
    fn hash_prevouts(&self, sighash_flag: Sighash) -> TxResult<Hash256Digest> {
        if sighash_flag.is_anyone_can_pay() {
            Ok(Hash256Digest::default())
        } else {
            let mut w = Hash256Writer::default();
            for input in self.legacy_tx.vin.iter() {
                input.outpoint.write_to(&mut w)?;
            }
            Ok(w.finish())
        }
    }

    /// Calculates `hash_sequence` according to BIP143 semantics.
    ///
    /// TODO: memoize
    fn hash_sequence(&self, sighash_flag: Sighash) -> TxResult<Hash256Digest> {
        if sighash_flag.is_anyone_can_pay() || sighash_flag.is_single() || sighash_flag.is_none() {
            Ok(Hash256Digest::default())
        } else {
            let mut w = Hash256Writer::default();
            for input in self.legacy_tx.vin.iter() {
                Self::write_u32_le(&mut w, input.sequence)?;
            }
            Ok(w.finish())
        }
    }

    /// Calculates `hash_outputs` according to BIP143 semantics. A
    /// SIGHASH_SINGLE with no output at the signed index commits 32 zero
    /// bytes.
    ///
    /// TODO: memoize
    fn hash_outputs(&self, index: usize, sighash_flag: Sighash) -> TxResult<Hash256Digest> {
        if sighash_flag.is_single() {
            match self.legacy_tx.vout.get(index) {
                Some(output) => {
                    let mut w = Hash256Writer::default();
                    output.write_to(&mut w)?;
                    Ok(w.finish())
                }
                None => Ok(Hash256Digest::default()),
            }
        } else if sighash_flag.is_none() {
            Ok(Hash256Digest::default())
        } else {
            let mut w = Hash256Writer::default();
            for output in self.legacy_tx.vout.iter() {
                output.write_to(&mut w)?;
            }
            Ok(w.finish())
        }
    }
}

impl ByteFormat for WitnessTx {
    type Error = TxError;

    fn serialized_length(&self) -> usize {
        let mut len = 4; // version
        len += 2; // Segwit Flag
        len += ser::prefix_byte_len(self.legacy_tx.vin.len() as u64) as usize;
        len += self.legacy_tx.vin.serialized_length();
        len += ser::prefix_byte_len(self.legacy_tx.vout.len() as u64) as usize;
        len += self.legacy_tx.vout.serialized_length();
        len += self.witness_section_length();
        len += 4; // locktime
        len
    }

    fn read_from<R>(reader: &mut R, _limit: usize) -> Result<Self, Self::Error>
    where
        R: Read,
        Self: std::marker::Sized,
    {
        let version = Self::read_u32_le(reader)?;
        let mut flag = [0u8; 2];
        reader.read_exact(&mut flag)?;
        if flag != [0u8, 1u8] {
            return Err(TxError::BadWitnessFlag(flag));
        };
        let vin = Self::read_prefix_vec(reader)?;
        let vout = Self::read_prefix_vec(reader)?;
        let mut witnesses = vec![];
        for _ in vin.iter() {
            witnesses.push(Self::read_prefix_vec(reader)?);
        }
        let locktime = Self::read_u32_le(reader)?;

        let legacy_tx = LegacyTx {
            version,
            vin,
            vout,
            locktime,
        };

        Ok(Self {
            legacy_tx,
            witnesses,
        })
    }

    fn write_to<W>(&self, writer: &mut W) -> Result<usize, Self::Error>
    where
        W: Write,
    {
        let mut len = Self::write_u32_le(writer, self.version())?;
        len += writer.write(&[0u8, 1u8])?;

        len += Self::write_prefix_vec(writer, &self.legacy_tx.vin)?;
        len += Self::write_prefix_vec(writer, &self.legacy_tx.vout)?;
        for wit in self.witnesses.iter() {
            len += Self::write_prefix_vec(writer, wit)?;
        }
        len += Self::write_u32_le(writer, self.locktime())?;
        Ok(len)
    }
}
