//! Semantic encoders for the nSequence and nLockTime fields.
//!
//! The sequence field overloads several meanings: in version 2+ transactions
//! the low 16 bits of a non-final sequence encode a relative timelock
//! (BIP-68), bit 22 selects 512-second units over block-height units, and
//! sequences below 0xffff_fffe signal opt-in replace-by-fee (BIP-125). The
//! `Sequence` type captures the intent and produces the 4-byte field; the
//! same intent can also be rendered as the integer pushed inside a
//! `CHECKSEQUENCEVERIFY` script.

use crate::{
    defaults::{ABSOLUTE_TIMELOCK_SEQUENCE, REPLACE_BY_FEE_SEQUENCE},
    types::transactions::{TxError, TxResult},
};

/// Bit 22 of the sequence. Set when a relative timelock is denominated in
/// 512-second increments rather than blocks.
const SEQUENCE_TIME_TYPE_FLAG: u32 = 1 << 22;

/// The semantic intent of an input's sequence field.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Sequence {
    /// Enable the transaction-level absolute locktime. The wrapped value is
    /// the height or timestamp a `CHECKLOCKTIMEVERIFY` script compares
    /// against; it does not appear in the sequence field itself.
    Absolute(u32),
    /// Signal opt-in replace-by-fee.
    ReplaceByFee,
    /// A BIP-68 relative timelock. `value` is in blocks when `in_blocks` is
    /// true, in 512-second increments otherwise.
    Relative {
        /// The lock duration. Valid range is [1, 0xffff].
        value: u32,
        /// Block-height units if true, 512-second units if false.
        in_blocks: bool,
    },
}

impl Sequence {
    /// A relative timelock of `value` blocks. Rejects values outside
    /// [1, 0xffff], which do not fit the 16-bit lock field.
    pub fn relative_blocks(value: u32) -> TxResult<Self> {
        Self::check_relative_range(value)?;
        Ok(Sequence::Relative {
            value,
            in_blocks: true,
        })
    }

    /// A relative timelock of `value` 512-second increments. Rejects values
    /// outside [1, 0xffff].
    pub fn relative_time(value: u32) -> TxResult<Self> {
        Self::check_relative_range(value)?;
        Ok(Sequence::Relative {
            value,
            in_blocks: false,
        })
    }

    fn check_relative_range(value: u32) -> TxResult<()> {
        if !(1..=0xffff).contains(&value) {
            return Err(TxError::SequenceOutOfRange(value));
        }
        Ok(())
    }

    /// Render the sequence as the 4-byte-LE integer carried in the input's
    /// sequence field.
    pub fn for_input_sequence(&self) -> u32 {
        match self {
            Sequence::Absolute(_) => ABSOLUTE_TIMELOCK_SEQUENCE,
            Sequence::ReplaceByFee => REPLACE_BY_FEE_SEQUENCE,
            Sequence::Relative { value, in_blocks } => {
                // bit 31 stays clear, so the relative lock is enabled
                let mut seq = *value;
                if !in_blocks {
                    seq |= SEQUENCE_TIME_TYPE_FLAG;
                }
                seq
            }
        }
    }

    /// Render the sequence as the integer a timelock script compares
    /// against. RBF has no script form.
    pub fn for_script(&self) -> TxResult<u32> {
        match self {
            Sequence::ReplaceByFee => Err(TxError::RbfInScript),
            Sequence::Absolute(value) => Ok(*value),
            Sequence::Relative { value, in_blocks } => {
                let mut script_integer = *value;
                if !in_blocks {
                    script_integer |= SEQUENCE_TIME_TYPE_FLAG;
                }
                Ok(script_integer)
            }
        }
    }
}

/// The transaction-level absolute locktime: a block height below 500,000,000
/// or a Unix timestamp above.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Locktime(pub u32);

impl Locktime {
    /// Render the locktime as the 4 LE bytes carried in the transaction.
    pub fn for_transaction(&self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl From<u32> for Locktime {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_encodes_relative_timelock_sequences() {
        let cases = [
            (Sequence::relative_time(1).unwrap(), [0x01, 0x00, 0x40, 0x00]),
            (
                Sequence::relative_blocks(100).unwrap(),
                [0x64, 0x00, 0x00, 0x00],
            ),
            (
                Sequence::relative_blocks(0xffff).unwrap(),
                [0xff, 0xff, 0x00, 0x00],
            ),
            (
                Sequence::relative_time(0xffff).unwrap(),
                [0xff, 0xff, 0x40, 0x00],
            ),
        ];
        for (seq, wire) in cases.iter() {
            assert_eq!(seq.for_input_sequence().to_le_bytes(), *wire);
        }
    }

    #[test]
    fn it_encodes_absolute_and_rbf_sequences() {
        assert_eq!(
            Sequence::Absolute(500_000).for_input_sequence(),
            0xffff_fffe
        );
        assert_eq!(Sequence::ReplaceByFee.for_input_sequence(), 0xffff_fffd);
    }

    #[test]
    fn it_rejects_out_of_range_relative_values() {
        for value in [0u32, 0x10000, u32::MAX] {
            match Sequence::relative_blocks(value) {
                Err(TxError::SequenceOutOfRange(v)) => assert_eq!(v, value),
                r => panic!("expected out of range, got {:?}", r),
            }
            assert!(Sequence::relative_time(value).is_err());
        }
    }

    #[test]
    fn it_renders_script_integers() {
        assert_eq!(Sequence::Absolute(500_000).for_script().unwrap(), 500_000);
        assert_eq!(
            Sequence::relative_time(5).unwrap().for_script().unwrap(),
            0x0040_0005
        );
        assert_eq!(
            Sequence::relative_blocks(5).unwrap().for_script().unwrap(),
            5
        );
        match Sequence::ReplaceByFee.for_script() {
            Err(TxError::RbfInScript) => {}
            r => panic!("expected rbf rejection, got {:?}", r),
        }
    }

    #[test]
    fn it_renders_locktime_bytes() {
        assert_eq!(Locktime::from(0).for_transaction(), [0u8; 4]);
        assert_eq!(
            Locktime::from(0x0006_4319).for_transaction(),
            [0x19, 0x43, 0x06, 0x00]
        );
    }
}
