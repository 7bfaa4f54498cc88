//! Simple types for Bitcoin Script and Witness stack datastructures, each of
//! which is treated as an opaque, wrapped byte vector.
//!
//! We do not handle assembly, disassembly, or Script execution here. Scripts
//! are opaque byte vectors with no semantics: an external script builder
//! produces the bytes, and the sighash engines commit to them verbatim.
//!
//! Scripts can be freely converted between each other using `From` and
//! `Into`. This merely rewraps the underlying byte vector in the new type.

use txsig_core::{impl_script_conversion, wrap_prefixed_byte_vector};

wrap_prefixed_byte_vector!(
    /// A Script is a wrapped byte vector for use as an opaque script in
    /// sighash argument structs.
    ///
    /// `Script::null()` and `Script::default()` return the empty byte vector
    /// with a 0 prefix, which represents numerical 0, boolean `false`, or
    /// the null bytestring.
    Script
);
wrap_prefixed_byte_vector!(
    /// A ScriptSig is a wrapped byte vector for use in the input script_sig.
    ///
    /// `ScriptSig::null()` and `ScriptSig::default()` return the empty byte
    /// vector with a 0 prefix.
    ScriptSig
);
wrap_prefixed_byte_vector!(
    /// A WitnessStackItem is a wrapped byte vector intended for use in
    /// witnesses. Each input's `Witness` is an unwrapped `Vec` of these.
    ///
    /// `WitnessStackItem::null()` and `WitnessStackItem::default()` return
    /// the empty byte vector with a 0 prefix.
    WitnessStackItem
);
wrap_prefixed_byte_vector!(
    /// A ScriptPubkey is a wrapped byte vector locking a Bitcoin TxOut.
    ///
    /// `ScriptPubkey::null()` and `ScriptPubkey::default()` return the empty
    /// byte vector with a 0 prefix.
    ScriptPubkey
);

impl_script_conversion!(Script, ScriptPubkey);
impl_script_conversion!(Script, ScriptSig);
impl_script_conversion!(Script, WitnessStackItem);
impl_script_conversion!(ScriptPubkey, ScriptSig);
impl_script_conversion!(ScriptPubkey, WitnessStackItem);
impl_script_conversion!(ScriptSig, WitnessStackItem);

/// A Witness is an ordered `Vec` of `WitnessStackItem`s corresponding to a
/// single input.
///
/// # Note
///
/// The transaction's witness section is composed of many of these
/// `Witness`es in an UNPREFIXED vector.
pub type Witness = Vec<WitnessStackItem>;

/// A TxWitness is the UNPREFIXED vector of witnesses
pub type TxWitness = Vec<Witness>;
