//! Explicit lifecycle tagging shared by axes, panes and the composite grid.
//!
//! Components embed a [`Lifecycle`] value and implement the small capability
//! traits they need instead of inheriting from a common base.

use crate::error::Result;
use crate::types::PixelRect;

/// Where a component is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Initialized,
    Disposed,
}

/// Lifecycle tag embedded in each component.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_disposed(&self) -> bool {
        self.state == LifecycleState::Disposed
    }

    pub fn is_initialized(&self) -> bool {
        self.state == LifecycleState::Initialized
    }

    /// Move to `Initialized`. Returns `false` if already initialized or disposed.
    pub fn mark_initialized(&mut self) -> bool {
        if self.state != LifecycleState::Uninitialized {
            return false;
        }
        self.state = LifecycleState::Initialized;
        true
    }

    /// Move to `Disposed`. Returns `false` if this was already disposed, so
    /// callers can make disposal idempotent with a single check.
    pub fn mark_disposed(&mut self) -> bool {
        if self.state == LifecycleState::Disposed {
            return false;
        }
        self.state = LifecycleState::Disposed;
        true
    }
}

/// Components with a one-time setup step.
pub trait Initializable {
    fn initialize(&mut self) -> Result<()>;
}

/// Components positioned inside a parent rectangle.
pub trait Arrangeable {
    fn arrange(&mut self, rect: PixelRect);
}

/// Components that release resources. Disposal must be idempotent.
pub trait Disposable {
    fn dispose(&mut self);
    fn is_disposed(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        let mut lc = Lifecycle::new();
        assert_eq!(lc.state(), LifecycleState::Uninitialized);
        assert!(lc.mark_initialized());
        assert!(!lc.mark_initialized());
        assert!(lc.mark_disposed());
        assert!(!lc.mark_disposed());
        assert!(!lc.mark_initialized());
        assert!(lc.is_disposed());
    }
}
