/// Abstract input signals for the placement cursor
///
/// The cursor never talks to a concrete input backend. The host loop
/// fills one of these per tick: continuous queries (pointer position,
/// scroll delta) plus edge-detected action flags that the input layer has
/// already debounced.

use glam::Vec2;

#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    /// Pointer position in screen pixels, y down.
    pub pointer: Vec2,
    /// Scroll wheel movement this tick.
    pub scroll_delta: f32,
    /// Primary click happened this tick.
    pub primary_click: bool,
    /// Cancel action happened this tick.
    pub cancel: bool,
    /// Drag action was performed this tick.
    pub drag: bool,
    /// Snap toggle action happened this tick.
    pub toggle_snap: bool,
    /// The pointer is over a blocking UI surface.
    pub pointer_over_ui: bool,
}

impl InputState {
    /// Clear one-tick signals; call after the cursor has consumed the
    /// frame. Pointer position and UI hover persist.
    pub fn end_tick(&mut self) {
        self.scroll_delta = 0.0;
        self.primary_click = false;
        self.cancel = false;
        self.drag = false;
        self.toggle_snap = false;
    }
}
