//! Batched change notification.
//!
//! Every public grid mutation runs inside a [`Batch`]. Batches nest; changes
//! recorded while any batch is open are collected and flushed to listeners
//! once, when the outermost batch is dropped and something actually
//! changed. Dropping the guard is the only way to end a batch, so early
//! returns and `?` still flush.
//!
//! Listeners must not mutate the grid from inside a callback; defer such
//! work to the next tick.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::pane::PaneId;
use crate::types::Bounds;

/// Grid properties whose changes are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    Merges,
    SelectionMode,
    SelectionUnit,
    AxisItems,
    Layout,
    Scroll,
}

/// A focused cell: its rectangle and the pane that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusTarget {
    pub pane: PaneId,
    pub bounds: Bounds,
}

/// Notification delivered to listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GridEvent {
    /// Properties that changed during one batch, deduplicated and sorted.
    PropertiesChanged { properties: Vec<Property> },
    SelectionChanged,
    FocusChanged { previous: Option<FocusTarget>, next: Option<FocusTarget> },
}

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&GridEvent)>;

#[derive(Default)]
struct Pending {
    properties: Vec<Property>,
    selection: bool,
    focus: Option<(Option<FocusTarget>, Option<FocusTarget>)>,
}

impl Pending {
    fn is_empty(&self) -> bool {
        self.properties.is_empty() && !self.selection && self.focus.is_none()
    }

    fn into_events(mut self) -> Vec<GridEvent> {
        let mut events = Vec::new();
        if !self.properties.is_empty() {
            self.properties.sort();
            self.properties.dedup();
            events.push(GridEvent::PropertiesChanged { properties: self.properties });
        }
        if self.selection {
            events.push(GridEvent::SelectionChanged);
        }
        if let Some((previous, next)) = self.focus {
            if previous != next {
                events.push(GridEvent::FocusChanged { previous, next });
            }
        }
        events
    }
}

/// Collects changes and dispatches them to listeners.
#[derive(Default)]
pub struct ChangeNotifier {
    depth: Cell<u32>,
    pending: RefCell<Pending>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<u64>,
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("depth", &self.depth.get())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl ChangeNotifier {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn subscribe(&self, listener: impl FnMut(&GridEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.listeners.borrow_mut().push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(l, _)| *l != id);
        listeners.len() != before
    }

    /// Open a (possibly nested) batch.
    pub fn begin_batch(self: &Rc<Self>) -> Batch {
        self.depth.set(self.depth.get() + 1);
        Batch { notifier: Rc::clone(self) }
    }

    pub fn depth(&self) -> u32 {
        self.depth.get()
    }

    pub fn property_changed(&self, property: Property) {
        self.pending.borrow_mut().properties.push(property);
        self.flush_if_idle();
    }

    pub fn selection_changed(&self) {
        self.pending.borrow_mut().selection = true;
        self.flush_if_idle();
    }

    /// Record a focus move. Several moves in one batch collapse to the first
    /// `previous` and the last `next`.
    pub fn focus_changed(&self, previous: Option<FocusTarget>, next: Option<FocusTarget>) {
        {
            let mut pending = self.pending.borrow_mut();
            let first = pending.focus.map_or(previous, |(p, _)| p);
            pending.focus = Some((first, next));
        }
        self.flush_if_idle();
    }

    fn end_batch(&self) {
        let depth = self.depth.get().saturating_sub(1);
        self.depth.set(depth);
        self.flush_if_idle();
    }

    fn flush_if_idle(&self) {
        if self.depth.get() > 0 || self.pending.borrow().is_empty() {
            return;
        }
        let events = std::mem::take(&mut *self.pending.borrow_mut()).into_events();
        if events.is_empty() {
            return;
        }
        let mut listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        for event in &events {
            for (_, listener) in listeners.iter_mut() {
                listener(event);
            }
        }
        // Keep anything subscribed during dispatch.
        let mut current = self.listeners.borrow_mut();
        listeners.append(&mut current);
        *current = listeners;
    }
}

/// Scoped batch. Dropping it closes the batch.
#[must_use = "the batch closes as soon as the guard is dropped"]
pub struct Batch {
    notifier: Rc<ChangeNotifier>,
}

impl Drop for Batch {
    fn drop(&mut self) {
        self.notifier.end_batch();
    }
}
