//! Animation-frame batching of geometry updates
//!
//! Scroll and resize events fire far more often than frames. Only the first
//! trigger after a frame asks the glue for `requestAnimationFrame`; the rest
//! are dropped until that frame runs.

#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    pending: bool,
    dropped: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger; true when the caller must request a frame
    pub fn request(&mut self) -> bool {
        if self.pending {
            self.dropped += 1;
            return false;
        }
        self.pending = true;
        true
    }

    /// Called from the frame callback; true when work was pending
    pub fn begin_frame(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Triggers absorbed by an already pending frame
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_frame_per_burst() {
        let mut s = FrameScheduler::new();
        assert!(s.request());
        assert!(!s.request());
        assert!(!s.request());
        assert_eq!(s.dropped(), 2);

        assert!(s.begin_frame());
        assert!(!s.begin_frame());
        assert!(s.request());
    }
}
