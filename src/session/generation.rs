//! Request generations for fetch results
//!
//! Each view owns a tracker. Issuing a request bumps the generation; a
//! response is applied only when it carries the latest one.

/// Monotonic generation number attached to a fetch request
pub type Generation = u64;

#[derive(Debug, Clone, Default)]
pub struct GenerationTracker {
    latest: Generation,
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding all earlier ones
    pub fn issue(&mut self) -> Generation {
        self.latest += 1;
        self.latest
    }

    pub fn latest(&self) -> Generation {
        self.latest
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation != 0 && generation == self.latest
    }
}
