//! File digests attached to filename facts
//!
//! A [`FileDigest`] is rendered as `algorithm:hex`. Only SHA-256 and BLAKE3
//! can be computed locally; other algorithms (e.g. SHA-1 sums reported by a
//! package repository) are carried through for comparison only.

use crate::error::{ArtifactError, ArtifactResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Hash algorithm of a [`FileDigest`]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DigestAlgorithm {
    /// SHA-256
    Sha256,
    /// BLAKE3
    Blake3,
    /// Any other algorithm name, upper-cased
    Other(String),
}

impl DigestAlgorithm {
    /// Name used in the `algorithm:hex` rendering
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3",
            Self::Other(name) => name,
        }
    }

    fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Self::Sha256,
            "blake3" => Self::Blake3,
            other => Self::Other(other.to_ascii_uppercase()),
        }
    }
}

impl Display for DigestAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Digest of a file's bytes
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileDigest {
    algorithm: DigestAlgorithm,
    value: String,
}

impl FileDigest {
    /// Create digest from an algorithm and a hex value
    ///
    /// # Errors
    /// Returns [`ArtifactError::InvalidDigest`] if `value` is blank or not hex
    pub fn new(algorithm: DigestAlgorithm, value: &str) -> ArtifactResult<Self> {
        let value = value.trim().to_ascii_lowercase();
        if value.is_empty() {
            return Err(ArtifactError::invalid_digest(value, "empty digest value"));
        }
        hex::decode(&value).map_err(|e| ArtifactError::invalid_digest(&value, e.to_string()))?;
        Ok(Self { algorithm, value })
    }

    /// SHA-256 of `data`
    #[must_use]
    pub fn sha256(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self {
            algorithm: DigestAlgorithm::Sha256,
            value: hex::encode(hash),
        }
    }

    /// BLAKE3 of `data`
    #[must_use]
    pub fn blake3(data: &[u8]) -> Self {
        let hash = blake3::hash(data);
        Self {
            algorithm: DigestAlgorithm::Blake3,
            value: hex::encode(hash.as_bytes()),
        }
    }

    /// Compute a digest with `algorithm`
    ///
    /// # Errors
    /// Returns [`ArtifactError::UnknownFormat`] for algorithms that cannot be computed locally
    pub fn compute(algorithm: &DigestAlgorithm, data: &[u8]) -> ArtifactResult<Self> {
        match algorithm {
            DigestAlgorithm::Sha256 => Ok(Self::sha256(data)),
            DigestAlgorithm::Blake3 => Ok(Self::blake3(data)),
            DigestAlgorithm::Other(name) => Err(ArtifactError::UnknownFormat(format!(
                "digest algorithm {name}"
            ))),
        }
    }

    /// Algorithm
    #[inline]
    #[must_use]
    pub fn algorithm(&self) -> &DigestAlgorithm {
        &self.algorithm
    }

    /// Lower-case hex value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// True if `data` hashes to this digest
    #[must_use]
    pub fn verify(&self, data: &[u8]) -> bool {
        Self::compute(&self.algorithm, data).is_ok_and(|computed| computed == *self)
    }
}

impl Display for FileDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.value)
    }
}

impl FromStr for FileDigest {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (algorithm, value) = s
            .split_once(':')
            .ok_or_else(|| ArtifactError::invalid_digest(s, "expected algorithm:hex"))?;
        Self::new(DigestAlgorithm::parse(algorithm), value)
    }
}

impl Serialize for FileDigest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FileDigest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
