/// Fires once after a quiet period following the last trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debounce {
    delay_ms: u64,
    last_event_ms: Option<u64>,
}

impl Debounce {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            last_event_ms: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn is_pending(&self) -> bool {
        self.last_event_ms.is_some()
    }

    pub fn trigger(&mut self, now_ms: u64) {
        self.last_event_ms = Some(now_ms);
    }

    /// Returns `true` once `delay_ms` has passed since the last trigger.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let Some(last) = self.last_event_ms else {
            return false;
        };
        if now_ms.saturating_sub(last) < self.delay_ms {
            return false;
        }
        self.last_event_ms = None;
        true
    }

    pub fn cancel(&mut self) {
        self.last_event_ms = None;
    }
}
