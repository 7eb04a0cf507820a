//! `GridView` - the JavaScript entry point.
//!
//! Wraps a [`CompositeGrid`] driving a [`RenderQueue`]. The host feeds input
//! events in, calls `tick` once per animation frame, then drains the queued
//! cell commands and paints them however it likes. Change notifications go
//! to a registered callback, or queue up for `takeEvents` when none is set.
//!
//! ```javascript
//! import init, { GridView } from 'panegrid';
//! await init();
//! const view = new GridView(JSON.stringify(config), width, height, 12);
//! view.setEventCallback((event) => console.log(event.type));
//! view.keyDown('ArrowRight', false, false, false);
//! paint(view.takeCommands());
//! ```

use std::cell::RefCell;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::error::Result;
use crate::focus_trap::FocusTrapManager;
use crate::grid::CompositeGrid;
use crate::lifecycle::Disposable;
use crate::notify::GridEvent;
use crate::render::{RenderCommand, RenderQueue};
use crate::types::{Bounds, GridConfig, Merge, Modifiers, NavKey, Point, SelectionMode, SelectionUnit, Size};

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| js_error(format!("Serialization error: {e}")))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> std::result::Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(js_error)
}

fn modifiers(shift: bool, ctrl: bool, meta: bool) -> Modifiers {
    Modifiers { shift, ctrl, alt: false, meta }
}

/// The grid exported to JavaScript.
#[wasm_bindgen]
pub struct GridView {
    grid: CompositeGrid<RenderQueue>,
    events: Rc<RefCell<Vec<GridEvent>>>,
    #[cfg(target_arch = "wasm32")]
    callback: Option<Function>,
}

impl GridView {
    /// Build a view from a JSON [`GridConfig`].
    pub fn from_json(config: &str, width: f64, height: f64, scrollbar: f64) -> Result<Self> {
        let config = GridConfig::from_json(config)?;
        let renderer = RenderQueue::new(Size::new(width, height), scrollbar);
        let grid = CompositeGrid::new(&config, renderer)?;
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        grid.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        tracing::debug!(rows = grid.row_count(), cols = grid.col_count(), "grid view created");
        Ok(Self {
            grid,
            events,
            #[cfg(target_arch = "wasm32")]
            callback: None,
        })
    }

    pub fn grid(&self) -> &CompositeGrid<RenderQueue> {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut CompositeGrid<RenderQueue> {
        &mut self.grid
    }

    /// Hand queued notifications to the callback, if one is registered.
    fn flush(&self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(callback) = &self.callback {
            let events = std::mem::take(&mut *self.events.borrow_mut());
            for event in &events {
                match serde_wasm_bindgen::to_value(event) {
                    Ok(value) => {
                        let _ = callback.call1(&JsValue::NULL, &value);
                    }
                    Err(e) => tracing::warn!(error = %e, "event serialization failed"),
                }
            }
        }
    }

    fn after<T>(&self, result: T) -> T {
        self.flush();
        result
    }

    fn drained_events(&self) -> Vec<GridEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    fn drained_commands(&mut self) -> Vec<RenderCommand> {
        self.grid.renderer_mut().drain()
    }
}

#[wasm_bindgen]
impl GridView {
    #[wasm_bindgen(constructor)]
    pub fn new(config: &str, width: f64, height: f64, scrollbar: f64) -> std::result::Result<GridView, JsValue> {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();
        Self::from_json(config, width, height, scrollbar).map_err(js_error)
    }

    /// Receive change notifications as they happen. Pass `undefined` to go
    /// back to queueing them for `takeEvents`.
    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen(js_name = "setEventCallback")]
    pub fn set_event_callback(&mut self, callback: Option<Function>) {
        self.callback = callback;
        self.flush();
    }

    /// Record a new viewport size; applied on the next `tick`.
    pub fn resize(&mut self, width: f64, height: f64) {
        let size = Size::new(width, height);
        self.grid.renderer_mut().set_viewport(size);
        self.grid.request_resize(size);
    }

    /// Run coalesced drag, resize and autoscroll work. Call once per frame.
    pub fn tick(&mut self) -> bool {
        let ran = self.grid.on_tick();
        self.after(ran)
    }

    #[wasm_bindgen(js_name = "pointerDown")]
    pub fn pointer_down(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, meta: bool) -> bool {
        let hit = self.grid.pointer_down(Point::new(x, y), modifiers(shift, ctrl, meta));
        self.after(hit)
    }

    #[wasm_bindgen(js_name = "pointerMove")]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.grid.pointer_move(Point::new(x, y))
    }

    #[wasm_bindgen(js_name = "pointerUp")]
    pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
        let handled = self.grid.pointer_up(Point::new(x, y));
        self.after(handled)
    }

    /// Scroll by a wheel delta. Returns the native `[left, top]` offsets.
    pub fn wheel(&mut self, dx: f64, dy: f64) -> Vec<f64> {
        let native = self.grid.wheel(dx, dy);
        self.after(vec![native.x, native.y])
    }

    /// The host's scroll track reported new native offsets.
    #[wasm_bindgen(js_name = "nativeScroll")]
    pub fn native_scroll(&mut self, left: f64, top: f64) -> bool {
        let moved = self.grid.native_scroll(Point::new(left, top));
        self.after(moved)
    }

    /// Handle a DOM `KeyboardEvent.key`. Returns `true` when the key was
    /// consumed and its default action should be prevented.
    #[wasm_bindgen(js_name = "keyDown")]
    pub fn key_down(&mut self, key: &str, shift: bool, ctrl: bool, meta: bool) -> bool {
        let Some(nav) = NavKey::from_dom_key(key, ctrl || meta) else {
            return false;
        };
        let moved = self.grid.key_down(nav, modifiers(shift, ctrl, meta));
        self.after(moved)
    }

    pub fn focus(&mut self, row: u32, col: u32) -> bool {
        let focused = self.grid.focus(row, col);
        self.after(focused)
    }

    pub fn select(&mut self, row_begin: u32, row_end: u32, col_begin: u32, col_end: u32) {
        self.grid.select(Bounds::new(row_begin, row_end, col_begin, col_end));
        self.flush();
    }

    pub fn unselect(&mut self, row_begin: u32, row_end: u32, col_begin: u32, col_end: u32) {
        self.grid.unselect(Bounds::new(row_begin, row_end, col_begin, col_end));
        self.flush();
    }

    #[wasm_bindgen(js_name = "clearSelection")]
    pub fn clear_selection(&mut self) {
        self.grid.clear_selection();
        self.flush();
    }

    /// Scroll the body to a logical offset. Returns native `[left, top]`.
    #[wasm_bindgen(js_name = "scrollTo")]
    pub fn scroll_to(&mut self, x: f64, y: f64) -> Vec<f64> {
        let native = self.grid.scroll_to(Point::new(x, y));
        self.after(vec![native.x, native.y])
    }

    /// Native scroll track `[width, height]` for the host's spacer element.
    #[wasm_bindgen(js_name = "trackSize")]
    pub fn track_size(&self) -> Vec<f64> {
        let track = self.grid.scroll_state().track_size();
        vec![track.width, track.height]
    }

    /// Replace the data merges with an array of `{row, rowSpan, col, colSpan}`.
    #[wasm_bindgen(js_name = "setMerges")]
    pub fn set_merges(&mut self, merges: JsValue) -> std::result::Result<(), JsValue> {
        let merges: Vec<Merge> = from_js(merges)?;
        let result = self.grid.set_merges(&merges).map_err(js_error);
        self.after(result)
    }

    #[wasm_bindgen(js_name = "setHeaderMerges")]
    pub fn set_header_merges(&mut self, column_header: JsValue, row_header: JsValue) -> std::result::Result<(), JsValue> {
        let column_header: Vec<Merge> = from_js(column_header)?;
        let row_header: Vec<Merge> = from_js(row_header)?;
        let result = self.grid.set_header_merges(&column_header, &row_header).map_err(js_error);
        self.after(result)
    }

    /// `"None"`, `"Single"` or `"Extended"`.
    #[wasm_bindgen(js_name = "setSelectionMode")]
    pub fn set_selection_mode(&mut self, mode: JsValue) -> std::result::Result<(), JsValue> {
        let mode: SelectionMode = from_js(mode)?;
        self.grid.set_selection_mode(mode);
        self.flush();
        Ok(())
    }

    /// `"Row"`, `"Column"` or `"Cell"`.
    #[wasm_bindgen(js_name = "setSelectionUnit")]
    pub fn set_selection_unit(&mut self, unit: JsValue) -> std::result::Result<(), JsValue> {
        let unit: SelectionUnit = from_js(unit)?;
        self.grid.set_selection_unit(unit);
        self.flush();
        Ok(())
    }

    #[wasm_bindgen(js_name = "setFrozen")]
    pub fn set_frozen(&mut self, rows: u32, cols: u32) -> std::result::Result<(), JsValue> {
        let result = self.grid.set_frozen(rows, cols).map_err(js_error);
        self.after(result)
    }

    #[wasm_bindgen(js_name = "resizeRow")]
    pub fn resize_row(&mut self, index: u32, size: f64) -> std::result::Result<(), JsValue> {
        let result = self.grid.resize_row(index, size).map_err(js_error);
        self.after(result)
    }

    #[wasm_bindgen(js_name = "resizeColumn")]
    pub fn resize_col(&mut self, index: u32, size: f64) -> std::result::Result<(), JsValue> {
        let result = self.grid.resize_col(index, size).map_err(js_error);
        self.after(result)
    }

    #[wasm_bindgen(js_name = "setRowCount")]
    pub fn set_row_count(&mut self, count: u32) -> std::result::Result<(), JsValue> {
        let result = self.grid.set_row_count(count).map_err(js_error);
        self.after(result)
    }

    #[wasm_bindgen(js_name = "setColumnCount")]
    pub fn set_col_count(&mut self, count: u32) -> std::result::Result<(), JsValue> {
        let result = self.grid.set_col_count(count).map_err(js_error);
        self.after(result)
    }

    /// Drain queued cell commands as an array of `{op, handle, ...}` objects.
    #[wasm_bindgen(js_name = "takeCommands")]
    pub fn take_commands(&mut self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.drained_commands())
    }

    /// Same as `takeCommands`, as a JSON string.
    #[wasm_bindgen(js_name = "takeCommandsJson")]
    pub fn take_commands_json(&mut self) -> std::result::Result<String, JsValue> {
        serde_json::to_string(&self.drained_commands()).map_err(js_error)
    }

    /// Drain notifications queued while no callback was registered.
    #[wasm_bindgen(js_name = "takeEvents")]
    pub fn take_events(&mut self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.drained_events())
    }

    #[wasm_bindgen(js_name = "takeEventsJson")]
    pub fn take_events_json(&mut self) -> std::result::Result<String, JsValue> {
        serde_json::to_string(&self.drained_events()).map_err(js_error)
    }

    /// Focus, selection and scroll state.
    pub fn state(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.grid.snapshot())
    }

    #[wasm_bindgen(js_name = "stateJson")]
    pub fn state_json(&self) -> std::result::Result<String, JsValue> {
        serde_json::to_string(&self.grid.snapshot()).map_err(js_error)
    }

    /// Selection outline pieces in viewport pixels.
    #[wasm_bindgen(js_name = "selectionOverlay")]
    pub fn selection_overlay(&mut self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.grid.selection_overlay())
    }

    /// Release every cell. Further calls are no-ops.
    pub fn dispose(&mut self) {
        self.grid.dispose();
        self.flush();
    }
}

/// Keyboard arbitration between several grids on one page.
#[wasm_bindgen]
#[derive(Default)]
pub struct FocusTraps {
    inner: FocusTrapManager,
}

#[wasm_bindgen]
impl FocusTraps {
    #[wasm_bindgen(constructor)]
    pub fn new() -> FocusTraps {
        Self::default()
    }

    pub fn register(&mut self, name: &str) -> u32 {
        self.inner.register(name).get()
    }

    pub fn unregister(&mut self, id: u32) -> bool {
        self.inner.unregister(id.into())
    }

    pub fn activate(&mut self, id: u32) -> bool {
        self.inner.activate(id.into())
    }

    pub fn deactivate(&mut self, id: u32) -> bool {
        self.inner.deactivate(id.into())
    }

    /// Whether the trap may handle keyboard input right now.
    pub fn allows(&self, id: u32) -> bool {
        self.inner.allows(id.into())
    }

    pub fn active(&self) -> Option<u32> {
        self.inner.active().map(|id| id.get())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "rows": { "uniform": { "count": 200, "size": 20 } },
        "cols": { "fixed": { "sizes": [60, 60, 60, 60, 60, 60, 60, 60, 60, 60] } },
        "frozenRows": 1,
        "frozenCols": 1,
        "merges": [{ "row": 2, "rowSpan": 2, "col": 2, "colSpan": 2 }]
    }"#;

    fn view() -> GridView {
        GridView::from_json(CONFIG, 300.0, 200.0, 10.0).unwrap()
    }

    #[test]
    fn test_construction_renders_cells() {
        let mut view = view();
        let commands: Vec<RenderCommand> = serde_json::from_str(&view.take_commands_json().unwrap()).unwrap();
        assert!(commands.iter().any(|c| matches!(c, RenderCommand::Create { .. })));
        assert_eq!(view.take_commands_json().unwrap(), "[]");
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(GridView::from_json("{}", 100.0, 100.0, 10.0).is_err());
    }

    #[test]
    fn test_key_down_queues_focus_event() {
        let mut view = view();
        view.take_events_json().unwrap();
        assert!(view.focus(1, 1));
        assert!(view.key_down("ArrowRight", false, false, false));
        assert!(!view.key_down("Tab", false, false, false));
        let events: Vec<GridEvent> = serde_json::from_str(&view.take_events_json().unwrap()).unwrap();
        assert!(events.iter().any(|e| matches!(e, GridEvent::FocusChanged { .. })));
        let state = view.grid().snapshot();
        assert_eq!(state.active, Some((1, 2)));
    }

    #[test]
    fn test_state_json_is_camel_case() {
        let view = view();
        let json = view.state_json().unwrap();
        assert!(json.contains("\"nativeScroll\""));
        assert!(json.contains("\"selection\":[]"));
    }

    #[test]
    fn test_resize_waits_for_tick() {
        let mut view = view();
        view.resize(600.0, 400.0);
        assert_eq!(view.grid().layout().viewport, Size::new(300.0, 200.0));
        assert!(view.tick());
        assert_eq!(view.grid().layout().viewport, Size::new(600.0, 400.0));
    }

    #[test]
    fn test_focus_traps_wrapper() {
        let mut traps = FocusTraps::new();
        let a = traps.register("a");
        let b = traps.register("b");
        traps.activate(b);
        assert_eq!(traps.active(), Some(b));
        assert!(!traps.allows(a));
    }
}
