//! Expansion of declared endpoints into the concrete request stream.
mod expand;


pub use expand::expand_endpoints;

use crate::config::HttpMethod;

/// One concrete request to execute. Generated in declaration order and
/// consumed by the scheduler through [`RequestCycle`].
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// Aggregation label: the endpoint path, suffixed with `#<block>` when
    /// per-block labels are enabled.
    pub label: String,
    pub method: HttpMethod,
    pub url: String,
    pub payload: Option<serde_json::Value>,
}

/// The ordered descriptor sequence with modulo indexing, so a run of
/// `total-requests` larger than the sequence wraps back to the start.
#[derive(Debug)]
pub struct RequestCycle {
    descriptors: Vec<RequestDescriptor>,
}

impl RequestCycle {
    #[must_use]
    pub fn new(descriptors: Vec<RequestDescriptor>) -> Option<Self> {
        if descriptors.is_empty() {
            return None;
        }
        Some(Self { descriptors })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Returns the descriptor for the given dispatch sequence number,
    /// wrapping at the end of the sequence.
    #[must_use]
    pub fn get(&self, seq: u64) -> Option<&RequestDescriptor> {
        let len = u64::try_from(self.descriptors.len()).unwrap_or(u64::MAX);
        let index = usize::try_from(seq.checked_rem(len).unwrap_or(0)).unwrap_or(0);
        self.descriptors.get(index)
    }
}
