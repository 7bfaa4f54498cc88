//! Holds utilities for working with cryptographic digests, and
//! disambiguating digests via marker types.
//!
//! We want to wrap hashes in marked newtypes in order to prevent
//! type-confusion between TXIDs, WTXIDs, and other digests with the same
//! length.

use sha2::{Digest as Sha2Digest, Sha256};
use std::io::{Read, Result as IOResult, Write};

use crate::ser::{ByteFormat, SerError, SerResult};

/// Output of a 32-byte hash function, e.g. Bitcoin's double-sha2 or a
/// BIP-340 tagged sha2.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Hash256Digest([u8; 32]);

impl Hash256Digest {
    /// Returns a new digest with the byte order reversed. Bitcoin tools
    /// display txids in the reverse of their wire byte order.
    pub fn reversed(&self) -> Self {
        let mut buf = self.0;
        buf.reverse();
        Self(buf)
    }
}

impl_hex_serde!(Hash256Digest);

impl From<[u8; 32]> for Hash256Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<Hash256Digest> for [u8; 32] {
    fn from(digest: Hash256Digest) -> Self {
        digest.0
    }
}

impl AsRef<[u8; 32]> for Hash256Digest {
    fn as_ref(&self) -> &[u8; 32] {
        &self.0
    }
}

impl AsMut<[u8; 32]> for Hash256Digest {
    fn as_mut(&mut self) -> &mut [u8; 32] {
        &mut self.0
    }
}

impl ByteFormat for Hash256Digest {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        32
    }

    fn read_from<R>(reader: &mut R, _limit: usize) -> SerResult<Self>
    where
        R: Read,
        Self: std::marker::Sized,
    {
        let mut buf = Hash256Digest::default();
        reader.read_exact(buf.as_mut())?;
        Ok(buf)
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        Ok(writer.write(self.as_ref())?)
    }
}

/// A digest newtyped for a specific purpose, e.g. a TXID. Wrapping prevents
/// accidental mixups between digests of the same width.
pub trait MarkedDigest: Copy + Default {
    /// The underlying digest type.
    type Digest;

    /// Wrap a digest in the marked type.
    fn new(hash: Self::Digest) -> Self;

    /// Return the underlying digest.
    fn internal(&self) -> Self::Digest;

    /// Return the digest bytes as a vector.
    fn bytes(&self) -> Vec<u8>;
}

/// A hasher exposing a `Write` interface. Bytes written to it are absorbed
/// into the hash state; `finish` consumes the hasher and produces the
/// digest.
pub trait MarkedDigestWriter<T>: Default + Write {
    /// Consume the writer, producing the digest.
    fn finish(self) -> T;

    /// Consume the writer, producing a marked digest.
    fn finish_marked<M: MarkedDigest<Digest = T>>(self) -> M {
        M::new(self.finish())
    }
}

/// A struct that exposes a Bitcoin-style Hash256 `Write` interface by
/// wrapping an internal SHA2 instance.
///
/// ```
/// # use std::io::{Result, Write};
/// use txsig_core::hashes::{Hash256Writer, MarkedDigestWriter};
///
/// # fn main() -> Result<()> {
/// let mut w = Hash256Writer::default();
/// # let data = [0u8; 32];
///
/// // Writing more than once will update the hasher.
/// w.write(&data)?;
///
/// // Call finish to consume the hasher and produce the digest.
/// let digest = w.finish();
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct Hash256Writer {
    internal: Sha256,
}

impl Write for Hash256Writer {
    fn write(&mut self, buf: &[u8]) -> IOResult<usize> {
        self.internal.update(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> IOResult<()> {
        Ok(())
    }
}

impl MarkedDigestWriter<Hash256Digest> for Hash256Writer {
    fn finish(self) -> Hash256Digest {
        let first = self.internal.finalize();
        let second = Sha256::digest(first);
        let mut digest = Hash256Digest::default();
        digest.as_mut().copy_from_slice(&second[..]);
        digest
    }
}

/// A single-round SHA-256 `Write` interface. The BIP-341 field hashes use
/// single sha2 where BIP-143 uses double.
#[derive(Default)]
pub struct Sha256Writer {
    internal: Sha256,
}

impl Write for Sha256Writer {
    fn write(&mut self, buf: &[u8]) -> IOResult<usize> {
        self.internal.update(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> IOResult<()> {
        Ok(())
    }
}

impl MarkedDigestWriter<Hash256Digest> for Sha256Writer {
    fn finish(self) -> Hash256Digest {
        let result = self.internal.finalize();
        let mut digest = Hash256Digest::default();
        digest.as_mut().copy_from_slice(&result[..]);
        digest
    }
}

/// A BIP-340 tagged-hash `Write` interface:
/// `SHA256(SHA256(tag) || SHA256(tag) || data)`.
///
/// The internal hasher is seeded with the doubled tag hash at construction,
/// so writes stream straight into the tagged message.
pub struct TaggedSha256Writer {
    internal: Sha256,
}

impl TaggedSha256Writer {
    /// Instantiate a writer for the given domain-separation tag.
    pub fn new(tag: &[u8]) -> Self {
        let tag_digest = Sha256::digest(tag);
        let mut internal = Sha256::new();
        internal.update(tag_digest);
        internal.update(tag_digest);
        Self { internal }
    }

    /// Consume the writer, producing the tagged digest.
    pub fn finish(self) -> Hash256Digest {
        let result = self.internal.finalize();
        let mut digest = Hash256Digest::default();
        digest.as_mut().copy_from_slice(&result[..]);
        digest
    }
}

impl Write for TaggedSha256Writer {
    fn write(&mut self, buf: &[u8]) -> IOResult<usize> {
        self.internal.update(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> IOResult<()> {
        Ok(())
    }
}

/// Convenience function for one-shot BIP-340 tagged hashing.
pub fn tagged_hash(tag: &[u8], data: &[u8]) -> Hash256Digest {
    let mut w = TaggedSha256Writer::new(tag);
    w.write(data).expect("no IOError from SHA2");
    w.finish()
}
