/// Leading and trailing edge rate limiter driven by host timestamps.
///
/// The first event of a burst is handled immediately; later events inside the interval are
/// folded into one trailing call reported by [`Self::poll`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Throttle {
    interval_ms: u64,
    last_fire_ms: Option<u64>,
    pending: bool,
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fire_ms: None,
            pending: false,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Records an event. Returns `true` when it should be handled now.
    pub fn hit(&mut self, now_ms: u64) -> bool {
        match self.last_fire_ms {
            Some(last) if now_ms.saturating_sub(last) < self.interval_ms => {
                self.pending = true;
                false
            }
            _ => {
                self.fire(now_ms);
                true
            }
        }
    }

    /// Returns `true` once the interval has elapsed with events folded since the last call.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if !self.pending {
            return false;
        }
        let ready = self
            .last_fire_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.interval_ms);
        if ready {
            self.fire(now_ms);
        }
        ready
    }

    pub fn reset(&mut self) {
        self.last_fire_ms = None;
        self.pending = false;
    }

    fn fire(&mut self, now_ms: u64) {
        self.last_fire_ms = Some(now_ms);
        self.pending = false;
    }
}
