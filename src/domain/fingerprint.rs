//! Content fingerprinting for optimistic concurrency over the dataset.
//!
//! Several sessions may each hold the dataset in memory; nothing locks the
//! store. Instead every session fingerprints what it loaded and compares
//! against a fresh reload before acting: on divergence it discards its copy
//! and adopts the stored one (last writer wins, at full-reload granularity).

use std::fmt;
use std::fmt::Write as _;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::entities::Company;

/// Bumped whenever the canonical serialization changes shape, so a schema
/// migration never masquerades as an external edit.
pub const FINGERPRINT_SCHEMA: u32 = 1;

/// The canonical form that gets hashed: a versioned envelope around the
/// companies, serialized with declared field order.
#[derive(Serialize)]
struct CanonicalDataset<'a> {
    schema: u32,
    companies: &'a [Company],
}

/// Stable content hash of a dataset. Equal exactly when the datasets are
/// structurally identical, element order included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SHA-256 over the canonical serialization of the dataset.
pub fn fingerprint(companies: &[Company]) -> Result<Fingerprint, serde_json::Error> {
    let canonical = serde_json::to_vec(&CanonicalDataset {
        schema: FINGERPRINT_SCHEMA,
        companies,
    })?;
    let digest = Sha256::digest(&canonical);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    Ok(Fingerprint(hex))
}

/// True when the persisted dataset no longer matches what this session
/// last observed.
pub fn has_diverged(last_known: &Fingerprint, current: &Fingerprint) -> bool {
    last_known != current
}

/// The last fingerprint one session observed. The reload-compare-adopt dance
/// around every read/write boundary goes through here.
#[derive(Clone, Debug, Default)]
pub struct SessionVersion {
    last_seen: Option<Fingerprint>,
}

impl SessionVersion {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `current` differs from the previously observed token.
    /// A session that has observed nothing yet has nothing to lose.
    pub fn diverged_from(&self, current: &Fingerprint) -> bool {
        self.last_seen
            .as_ref()
            .map(|last| has_diverged(last, current))
            .unwrap_or(false)
    }

    /// Record `current` as the session's known-good token.
    pub fn observe(&mut self, current: Fingerprint) {
        self.last_seen = Some(current);
    }

    pub fn last_seen(&self) -> Option<&Fingerprint> {
        self.last_seen.as_ref()
    }
}
