//! Protocol default values consumed when building transactions.

/// The default transaction version. Version 2 enables BIP-68 relative
/// locktime semantics.
pub const DEFAULT_TX_VERSION: u32 = 2;

/// The default transaction locktime. Zero disables the absolute locktime.
pub const DEFAULT_TX_LOCKTIME: u32 = 0;

/// The default input sequence. Disables both locktime and RBF signaling.
pub const DEFAULT_SEQUENCE: u32 = 0xffff_ffff;

/// The zero sequence, used for inputs whose sequence is excluded from a
/// legacy sighash commitment.
pub const EMPTY_SEQUENCE: u32 = 0;

/// The sequence that enables the transaction-level absolute locktime while
/// opting out of RBF-via-sequence.
pub const ABSOLUTE_TIMELOCK_SEQUENCE: u32 = 0xffff_fffe;

/// The highest sequence that signals opt-in replace-by-fee (BIP-125).
pub const REPLACE_BY_FEE_SEQUENCE: u32 = 0xffff_fffd;

/// The tapscript leaf version (BIP-342).
pub const LEAF_VERSION_TAPSCRIPT: u8 = 0xc0;
