//! Change detection over transformed datasets.

use std::fmt;

use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::documents::DocumentSet;

/// SHA-256 over the serialized document set of one run.
///
/// Document key sets are ordered and payload maps are sorted, so equal
/// datasets always serialize to equal bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(documents: &DocumentSet) -> serde_json::Result<Self> {
        let bytes = serde_json::to_vec(documents)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(Self(format!("{:x}", hasher.finalize())))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough for logs.
        f.write_str(&self.0[..12.min(self.0.len())])
    }
}

/// Remembers the fingerprint of the last successfully synchronized run.
///
/// Lives as long as its owning store; nothing is persisted, so the first
/// run after a restart always writes.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last: Mutex<Option<Fingerprint>>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing was recorded yet or `fingerprint` differs from it.
    pub fn has_changed(&self, fingerprint: &Fingerprint) -> bool {
        self.last.lock().as_ref() != Some(fingerprint)
    }

    /// Record a fingerprint. Call only after the write succeeded.
    pub fn record(&self, fingerprint: Fingerprint) {
        *self.last.lock() = Some(fingerprint);
    }

    pub fn last(&self) -> Option<Fingerprint> {
        self.last.lock().clone()
    }
}
