//! Single-slot render debouncer.
//!
//! Time is supplied by the caller as milliseconds on any monotonic clock,
//! which keeps scheduling deterministic and testable. At most one render is
//! pending; scheduling another replaces it.

use tracing::trace;

/// Quiet period after the last edit before a render fires.
pub const QUIET_PERIOD_MS: u64 = 150;

/// A pending render: identity plus the time it becomes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledRender {
    pub id: u64,
    pub due_at: u64,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet_period: u64,
    pending: Option<ScheduledRender>,
    next_id: u64,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(QUIET_PERIOD_MS)
    }
}

impl Debouncer {
    pub fn new(quiet_period: u64) -> Self {
        Self {
            quiet_period,
            pending: None,
            next_id: 0,
        }
    }

    pub fn quiet_period(&self) -> u64 {
        self.quiet_period
    }

    /// Schedule a render `quiet_period` after `now`, replacing any pending one.
    pub fn schedule(&mut self, now: u64) -> ScheduledRender {
        self.next_id += 1;
        let task = ScheduledRender {
            id: self.next_id,
            due_at: now.saturating_add(self.quiet_period),
        };
        if let Some(replaced) = self.pending.replace(task) {
            trace!(replaced = replaced.id, id = task.id, "pending render replaced");
        }
        task
    }

    /// Drop the pending render, returning it.
    pub fn cancel(&mut self) -> Option<ScheduledRender> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<ScheduledRender> {
        self.pending
    }

    /// Take the pending render if it is due at `now`.
    pub fn take_due(&mut self, now: u64) -> Option<ScheduledRender> {
        match self.pending {
            Some(task) if task.due_at <= now => self.pending.take(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_due_before_quiet_period() {
        let mut debouncer = Debouncer::default();
        debouncer.schedule(1000);
        assert!(debouncer.take_due(1149).is_none());
        assert!(debouncer.pending().is_some());
        assert_eq!(debouncer.take_due(1150).map(|t| t.due_at), Some(1150));
        assert!(debouncer.pending().is_none());
    }

    #[test]
    fn test_rapid_edits_coalesce() {
        let mut debouncer = Debouncer::default();
        for t in 0..10 {
            debouncer.schedule(t * 20);
        }
        let mut fired = 0;
        for now in 0..1000 {
            if debouncer.take_due(now).is_some() {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_schedule_replaces() {
        let mut debouncer = Debouncer::new(100);
        let first = debouncer.schedule(0);
        let second = debouncer.schedule(50);
        assert_ne!(first.id, second.id);
        assert_eq!(debouncer.pending(), Some(second));
        assert!(debouncer.take_due(100).is_none());
        assert_eq!(debouncer.take_due(150), Some(second));
    }

    #[test]
    fn test_cancel() {
        let mut debouncer = Debouncer::default();
        let task = debouncer.schedule(0);
        assert_eq!(debouncer.cancel(), Some(task));
        assert!(debouncer.take_due(u64::MAX).is_none());
        assert!(debouncer.cancel().is_none());
    }
}
