use egui::{Context, Pos2, Rect};

/// Represents the location where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// The position in canvas coordinates (origin at the canvas top-left)
    pub position: Pos2,
    /// Whether this position is within the canvas bounds
    pub is_in_canvas: bool,
}

/// Pointer events in canvas coordinates, as consumed by the board
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button was pressed
    PointerDown { location: InputLocation },
    /// Pointer moved while the primary button is held
    PointerMove { location: InputLocation },
    /// Primary button was released
    PointerUp { location: InputLocation },
    /// Pointer left the canvas while the primary button is held
    PointerLeave { last_known_location: InputLocation },
}

/// Primary-button pointer state for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    /// Latest pointer position in screen coordinates
    pub pos: Option<Pos2>,
    pub pressed: bool,
    pub released: bool,
    /// The pointer is over the canvas and no other layer (popup, window) covers it
    pub on_canvas: bool,
}

/// Handles converting raw egui input into canvas-local InputEvents
#[derive(Debug, Clone)]
pub struct InputHandler {
    canvas_rect: Rect,
    last_pointer_pos: Option<Pos2>,
    /// Set between a press inside the canvas and the matching release or leave
    tracking: bool,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            canvas_rect,
            last_pointer_pos: None,
            tracking: false,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    /// Creates a canvas-local InputLocation from a screen position
    fn make_location(&self, pos: Pos2) -> InputLocation {
        InputLocation {
            position: (pos - self.canvas_rect.min).to_pos2(),
            is_in_canvas: self.canvas_rect.contains(pos),
        }
    }

    /// Reads this frame's primary-button state from egui.
    /// `on_canvas` comes from the canvas response (`Response::contains_pointer`).
    pub fn process_input(&mut self, ctx: &Context, on_canvas: bool) -> Vec<InputEvent> {
        let sample = ctx.input(|input| PointerSample {
            pos: input.pointer.latest_pos(),
            pressed: input.pointer.primary_pressed(),
            released: input.pointer.primary_released(),
            on_canvas,
        });
        self.process_sample(sample)
    }

    /// Turns one frame of pointer state into events
    pub fn process_sample(&mut self, sample: PointerSample) -> Vec<InputEvent> {
        let mut events = Vec::new();

        // Only a press the canvas itself receives opens a drag.
        if sample.pressed && sample.on_canvas {
            if let Some(pos) = sample.pos {
                let location = self.make_location(pos);
                if location.is_in_canvas {
                    events.push(InputEvent::PointerDown { location });
                    self.tracking = true;
                    self.last_pointer_pos = Some(pos);
                }
            }
        }

        if self.tracking && sample.pos != self.last_pointer_pos {
            match sample.pos.map(|pos| (pos, self.make_location(pos))) {
                Some((pos, location)) if location.is_in_canvas => {
                    events.push(InputEvent::PointerMove { location });
                    self.last_pointer_pos = Some(pos);
                }
                _ => {
                    let last = self.last_pointer_pos.unwrap_or(self.canvas_rect.min);
                    events.push(InputEvent::PointerLeave {
                        last_known_location: self.make_location(last),
                    });
                    self.tracking = false;
                }
            }
        }

        if sample.released && self.tracking {
            let pos = sample
                .pos
                .or(self.last_pointer_pos)
                .unwrap_or(self.canvas_rect.min);
            events.push(InputEvent::PointerUp {
                location: self.make_location(pos),
            });
            self.tracking = false;
        }

        if !self.tracking {
            self.last_pointer_pos = None;
        }
        events
    }
}
