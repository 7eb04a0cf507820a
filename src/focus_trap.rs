//! Keyboard ownership between several grids on one page.
//!
//! The host owns one [`FocusTrapManager`] and registers every grid with it.
//! Activated traps form a stack; only the top trap receives navigation keys,
//! and deactivating it hands ownership back to the one beneath.

use serde::{Deserialize, Serialize};

/// Handle for a registered trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrapId(u32);

impl TrapId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for TrapId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone)]
struct Trap {
    id: TrapId,
    name: String,
}

#[derive(Debug, Clone, Default)]
pub struct FocusTrapManager {
    traps: Vec<Trap>,
    /// Active traps, bottom first.
    stack: Vec<TrapId>,
    next_id: u32,
}

impl FocusTrapManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>) -> TrapId {
        let id = TrapId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let name = name.into();
        tracing::debug!(id = id.0, %name, "focus trap registered");
        self.traps.push(Trap { id, name });
        id
    }

    /// Forget a trap, deactivating it first. Returns whether it was known.
    pub fn unregister(&mut self, id: TrapId) -> bool {
        let before = self.traps.len();
        self.traps.retain(|t| t.id != id);
        self.stack.retain(|&t| t != id);
        self.traps.len() != before
    }

    /// Put a trap on top of the stack, moving it there if already active.
    pub fn activate(&mut self, id: TrapId) -> bool {
        if !self.is_registered(id) {
            return false;
        }
        self.stack.retain(|&t| t != id);
        self.stack.push(id);
        tracing::debug!(id = id.0, depth = self.stack.len(), "focus trap activated");
        true
    }

    /// Take a trap off the stack wherever it sits.
    pub fn deactivate(&mut self, id: TrapId) -> bool {
        let before = self.stack.len();
        self.stack.retain(|&t| t != id);
        before != self.stack.len()
    }

    /// The trap currently owning the keyboard.
    pub fn active(&self) -> Option<TrapId> {
        self.stack.last().copied()
    }

    pub fn is_active(&self, id: TrapId) -> bool {
        self.stack.contains(&id)
    }

    pub fn is_registered(&self, id: TrapId) -> bool {
        self.traps.iter().any(|t| t.id == id)
    }

    /// Whether `id` may handle keyboard input: no trap is active, or `id`
    /// is the top one.
    pub fn allows(&self, id: TrapId) -> bool {
        self.active().map_or(true, |top| top == id)
    }

    pub fn name(&self, id: TrapId) -> Option<&str> {
        self.traps.iter().find(|t| t.id == id).map(|t| t.name.as_str())
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn len(&self) -> usize {
        self.traps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_active_trap_allows_everyone() {
        let mut traps = FocusTrapManager::new();
        let a = traps.register("left");
        let b = traps.register("right");
        assert!(traps.allows(a) && traps.allows(b));
        assert_eq!(traps.active(), None);
        assert_eq!(traps.name(b), Some("right"));
    }

    #[test]
    fn test_stack_is_lifo() {
        let mut traps = FocusTrapManager::new();
        let a = traps.register("grid");
        let b = traps.register("popup");
        assert!(traps.activate(a));
        assert!(traps.activate(b));
        assert!(traps.allows(b));
        assert!(!traps.allows(a));
        assert!(traps.deactivate(b));
        assert!(traps.allows(a));
        assert!(!traps.deactivate(b));
    }

    #[test]
    fn test_reactivation_moves_to_top() {
        let mut traps = FocusTrapManager::new();
        let a = traps.register("a");
        let b = traps.register("b");
        traps.activate(a);
        traps.activate(b);
        traps.activate(a);
        assert_eq!(traps.active(), Some(a));
        assert_eq!(traps.depth(), 2);
    }

    #[test]
    fn test_unregister_releases_keyboard() {
        let mut traps = FocusTrapManager::new();
        let a = traps.register("a");
        let b = traps.register("b");
        traps.activate(a);
        assert!(traps.unregister(a));
        assert!(!traps.is_active(a));
        assert!(traps.allows(b));
        assert!(!traps.activate(a));
        assert!(!traps.unregister(a));
        assert_eq!(traps.len(), 1);
    }
}
