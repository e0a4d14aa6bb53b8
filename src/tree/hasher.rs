//! Digest computation for documents and Merkle roots

use crate::document::Document;
use crate::error::CatalogError;
use crate::tree::canonical;
use crate::types::{HashFunction, HashMethod, Ordering};
use sha2::{Digest, Sha256, Sha384, Sha512};
use tracing::trace;

impl HashFunction {
    /// Raw digest of arbitrary bytes
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            HashFunction::Sha256 => Sha256::digest(data).to_vec(),
            HashFunction::Sha384 => Sha384::digest(data).to_vec(),
            HashFunction::Sha512 => Sha512::digest(data).to_vec(),
            HashFunction::Blake3 => blake3::hash(data).as_bytes().to_vec(),
        }
    }

    /// Lowercase hex digest of arbitrary bytes
    pub fn digest_hex(self, data: &[u8]) -> String {
        hex::encode(self.digest(data))
    }
}

/// Compute `merkle:object_hash` for a document
///
/// object_hash = hex(H(canonical(document, method.fields)))
pub fn compute_object_hash(document: &Document, method: &HashMethod) -> String {
    let bytes = canonical::canonicalize(document, &method.selector());
    method.function.digest_hex(&bytes)
}

/// Combine two hex digests into their parent: H(bytes(left) || bytes(right))
pub fn combine_pair(function: HashFunction, left: &str, right: &str) -> Result<String, CatalogError> {
    let mut buf = decode(left)?;
    buf.extend(decode(right)?);
    Ok(function.digest_hex(&buf))
}

/// Compute `merkle:root` from a node's own hash and its children's hashes
///
/// The hashes are ordered per `ordering`, then reduced pairwise level by level.
/// An odd trailing hash is paired with itself; a single hash is its own root.
pub fn compute_merkle_root(
    mut hashes: Vec<String>,
    function: HashFunction,
    ordering: Ordering,
) -> Result<String, CatalogError> {
    if hashes.is_empty() {
        return Err(CatalogError::EmptyHashSet);
    }
    ordering.apply(&mut hashes);
    trace!(count = hashes.len(), "Initial hashes for merkle root");

    let mut level = hashes;
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            let left = &pair[0];
            let right = pair.get(1).unwrap_or(left);
            next.push(combine_pair(function, left, right)?);
        }
        level = next;
    }

    // `level` holds exactly one hash here.
    level.pop().ok_or(CatalogError::EmptyHashSet)
}

fn decode(hash: &str) -> Result<Vec<u8>, CatalogError> {
    hex::decode(hash).map_err(|_| CatalogError::InvalidDigest(hash.to_string()))
}
