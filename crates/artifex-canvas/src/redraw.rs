/// Receives "the canvas changed" notifications.
///
/// Implementations must coalesce: several requests between two frames still
/// result in a single frame.
pub trait RedrawScheduler {
    fn request_redraw(&mut self);
}

/// Pending-redraw flag polled by the host once per event batch.
#[derive(Debug, Default, Clone)]
pub struct RedrawFlag {
    pending: bool,
    requests: u64,
}

impl RedrawFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a redraw was requested since the last call, and resets it.
    #[inline]
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Total number of requests received, coalesced or not.
    #[inline]
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

impl RedrawScheduler for RedrawFlag {
    #[inline]
    fn request_redraw(&mut self) {
        self.pending = true;
        self.requests = self.requests.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn many_requests_coalesce_into_one_take() {
        let mut flag = RedrawFlag::new();
        for _ in 0..10 {
            flag.request_redraw();
        }
        assert_eq!(flag.requests(), 10);
        assert!(flag.take());
        assert!(!flag.take());
        assert!(!flag.is_pending());
    }

    #[test]
    fn fresh_flag_has_nothing_pending() {
        let mut flag = RedrawFlag::default();
        assert!(!flag.take());
    }
}
