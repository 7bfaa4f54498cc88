//! Bitcoin transaction types and sighash calculation. Builds, serializes,
//! and parses legacy and witness transactions, and produces the signing
//! digest for every signature scheme standardized on the Bitcoin network:
//! pre-segwit ECDSA, segwit v0 (BIP-143), and taproot (BIP-341/342).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod defaults;
pub mod hashes;
pub mod prelude;
pub mod types;

pub use defaults::*;
pub use hashes::*;
pub use types::*;
