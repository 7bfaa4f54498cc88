//! # txsig Core
//!
//! `txsig-core` contains the serialization and hashing tooling used by the
//! `txsig-btc` crate.
//!
//! ## Crate Layout
//!
//! ### Hashes
//!
//! The hashes module provides a 32-byte digest type, streaming hash writers
//! for Bitcoin-style double-sha2, plain sha2, and BIP-340 tagged sha2, and
//! tooling for newtyping digests. The newtypes are called "marked" digests,
//! and are intended to prevent type confusion between TXIDs, WTXIDs, and
//! sighash digests of the same length.
//!
//! ### ByteFormat trait
//!
//! The `ByteFormat` trait is a simple serialization API using
//! `std::io::{Read, Write}`. Implementers define the binary serialization
//! format of the type. Transaction types must implement `ByteFormat`, as the
//! txid and sighash logic assumes access to the `write_to` method.
//!
//! `ByteFormat` has an associated `Error` type. Most basic types can simply
//! use the provided `SerError`. However, more complex (de)serialization will
//! want to implement a custom error type to handle (e.g.) invalid
//! transactions. These types must be easily instantiated from a `SerError`
//! or an `std::io::Error`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

#[macro_use]
pub mod macros;

pub mod hashes;
pub mod ser;
