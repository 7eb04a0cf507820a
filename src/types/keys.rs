use serde::{Deserialize, Serialize};

/// Logical navigation keys understood by the navigation controller.
///
/// `First`/`Last` jump to the first/last row (Ctrl+Home / Ctrl+End on most
/// platforms); `Home`/`End` jump along the current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavKey {
    Home,
    End,
    PageUp,
    PageDown,
    First,
    Last,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
}

impl NavKey {
    /// Map a DOM `KeyboardEvent.key` value plus the ctrl flag to a navigation key.
    pub fn from_dom_key(key: &str, ctrl: bool) -> Option<NavKey> {
        let nav = match key {
            "Home" if ctrl => NavKey::First,
            "End" if ctrl => NavKey::Last,
            "Home" => NavKey::Home,
            "End" => NavKey::End,
            "PageUp" => NavKey::PageUp,
            "PageDown" => NavKey::PageDown,
            "ArrowLeft" => NavKey::ArrowLeft,
            "ArrowRight" => NavKey::ArrowRight,
            "ArrowUp" => NavKey::ArrowUp,
            "ArrowDown" => NavKey::ArrowDown,
            _ => return None,
        };
        Some(nav)
    }

    /// Whether the key moves along the column axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, NavKey::Home | NavKey::End | NavKey::ArrowLeft | NavKey::ArrowRight)
    }

    /// Whether the key travels towards higher indices.
    pub fn is_forward(self) -> bool {
        matches!(
            self,
            NavKey::End | NavKey::PageDown | NavKey::Last | NavKey::ArrowRight | NavKey::ArrowDown
        )
    }
}

/// Snapshot of modifier keys at the time of an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false, alt: false, meta: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true, ctrl: false, alt: false, meta: false };
    pub const CTRL: Modifiers = Modifiers { shift: false, ctrl: true, alt: false, meta: false };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn is_additive(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dom_key() {
        assert_eq!(NavKey::from_dom_key("Home", false), Some(NavKey::Home));
        assert_eq!(NavKey::from_dom_key("Home", true), Some(NavKey::First));
        assert_eq!(NavKey::from_dom_key("End", true), Some(NavKey::Last));
        assert_eq!(NavKey::from_dom_key("ArrowDown", false), Some(NavKey::ArrowDown));
        assert_eq!(NavKey::from_dom_key("a", false), None);
    }

    #[test]
    fn test_direction() {
        assert!(NavKey::ArrowRight.is_horizontal());
        assert!(NavKey::ArrowRight.is_forward());
        assert!(!NavKey::PageUp.is_horizontal());
        assert!(!NavKey::PageUp.is_forward());
    }
}
