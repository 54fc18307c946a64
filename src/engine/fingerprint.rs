//! SSZ encoding of transition steps for log fingerprints.
//!
//! Fixed layout per step (little-endian):
//!
//! ```text
//! receiver_id: u64 | accepted_proposer_id: u64 | displaced: bool | displaced_proposer_id: u64
//! ```
//!
//! 25 bytes per step. `displaced_proposer_id` is 0 when `displaced` is false.

use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

use crate::error::InternalConsistencyError;
use crate::types::TransitionStep;

/// SSZ mirror of [`TransitionStep`]
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub(crate) struct StepRecord {
    pub receiver_id: u64,
    pub accepted_proposer_id: u64,
    pub displaced: bool,
    pub displaced_proposer_id: u64,
}

impl From<&TransitionStep> for StepRecord {
    fn from(step: &TransitionStep) -> Self {
        Self {
            receiver_id: step.receiver_id as u64,
            accepted_proposer_id: step.accepted_proposer_id as u64,
            displaced: step.displaced_proposer_id.is_some(),
            displaced_proposer_id: step.displaced_proposer_id.unwrap_or(0) as u64,
        }
    }
}

/// SHA-256 over the concatenated SSZ encoding of every step, in order
pub(crate) fn fingerprint<'a, I>(steps: I) -> Result<[u8; 32], InternalConsistencyError>
where
    I: IntoIterator<Item = &'a TransitionStep>,
{
    let mut hasher = Sha256::new();
    for step in steps {
        let bytes = ssz_rs::serialize(&StepRecord::from(step))
            .map_err(|e| InternalConsistencyError::Encoding(format!("{:?}", e)))?;
        hasher.update(&bytes);
    }

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&hasher.finalize());
    Ok(hash)
}
