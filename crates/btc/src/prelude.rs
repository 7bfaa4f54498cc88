//! Common imports for working with transactions and sighashes.

pub use crate::{
    defaults::*,
    hashes::{TXID, WTXID},
    types::*,
};

pub use txsig_core::{
    hashes::{Hash256Digest, Hash256Writer, MarkedDigest, MarkedDigestWriter},
    ser::ByteFormat,
};
