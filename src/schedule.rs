//! Once-per-tick coalescing.
//!
//! High-frequency inputs (pointer moves during a drag, resize notifications)
//! are recorded here and handled by the grid's `on_tick`, which the host
//! calls once per display frame. Scheduling again before the tick replaces
//! the arguments; cancelling drops them.

/// A pending invocation carrying the most recent arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Coalesced<A> {
    pending: Option<A>,
    collapsed: u64,
}

impl<A> Default for Coalesced<A> {
    fn default() -> Self {
        Self { pending: None, collapsed: 0 }
    }
}

impl<A> Coalesced<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request an invocation on the next tick; later arguments win.
    pub fn schedule(&mut self, args: A) {
        if self.pending.replace(args).is_some() {
            self.collapsed += 1;
        }
    }

    /// Prevent the pending invocation from firing.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Take the arguments for this tick's invocation.
    pub fn take(&mut self) -> Option<A> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// How many calls were folded into a later one.
    pub fn collapsed(&self) -> u64 {
        self.collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_arguments_win() {
        let mut c = Coalesced::new();
        c.schedule(1);
        c.schedule(2);
        c.schedule(3);
        assert_eq!(c.collapsed(), 2);
        assert_eq!(c.take(), Some(3));
        assert_eq!(c.take(), None);
    }

    #[test]
    fn test_cancel() {
        let mut c = Coalesced::new();
        c.schedule("resize");
        assert!(c.cancel());
        assert!(!c.is_pending());
        assert!(!c.cancel());
    }
}
