use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

use crate::geometry::Point;

/// Where an input event happened, in canvas pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    pub position: Point,
    /// Whether this position is within the canvas bounds
    pub is_in_canvas: bool,
}

/// Pointer and keyboard input, already mapped onto the canvas
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button was pressed
    PointerDown { location: InputLocation },
    /// Primary button was released
    PointerUp { location: InputLocation },
    /// Pointer moved
    PointerMove {
        location: InputLocation,
        primary_down: bool,
    },
    /// Pointer left the window
    PointerLeave,
    KeyDown { key: Key, modifiers: Modifiers },
}

/// Converts raw egui input into canvas-space [`InputEvent`]s
#[derive(Debug, Clone)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Rect,
    canvas_size: [u32; 2],
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(Rect::NOTHING, [0, 0])
    }
}

impl InputHandler {
    pub fn new(canvas_rect: Rect, canvas_size: [u32; 2]) -> Self {
        Self {
            last_pointer_pos: None,
            canvas_rect,
            canvas_size,
        }
    }

    /// Update where the canvas is shown and how many pixels it has
    pub fn set_canvas_rect(&mut self, rect: Rect, canvas_size: [u32; 2]) {
        self.canvas_rect = rect;
        self.canvas_size = canvas_size;
    }

    /// Maps a screen position onto canvas pixels
    pub fn make_location(&self, pos: Pos2) -> InputLocation {
        let rect = self.canvas_rect;
        let scale_x = if rect.width() > 0.0 { self.canvas_size[0] as f32 / rect.width() } else { 1.0 };
        let scale_y = if rect.height() > 0.0 { self.canvas_size[1] as f32 / rect.height() } else { 1.0 };
        InputLocation {
            position: Point::new((pos.x - rect.min.x) * scale_x, (pos.y - rect.min.y) * scale_y),
            is_in_canvas: rect.contains(pos),
        }
    }

    /// Process raw egui input and generate our InputEvents
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos();

            if let Some(pos) = hover {
                if input.pointer.button_pressed(PointerButton::Primary) {
                    events.push(InputEvent::PointerDown {
                        location: self.make_location(pos),
                    });
                }
                if Some(pos) != self.last_pointer_pos {
                    events.push(InputEvent::PointerMove {
                        location: self.make_location(pos),
                        primary_down: input.pointer.primary_down(),
                    });
                }
                if input.pointer.button_released(PointerButton::Primary) {
                    events.push(InputEvent::PointerUp {
                        location: self.make_location(pos),
                    });
                }
            } else if self.last_pointer_pos.is_some() {
                events.push(InputEvent::PointerLeave);
            }
            self.last_pointer_pos = hover;

            for event in &input.raw.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } = event
                {
                    events.push(InputEvent::KeyDown {
                        key: *key,
                        modifiers: *modifiers,
                    });
                }
            }
        });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_scales_to_canvas_pixels() {
        let rect = Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(200.0, 100.0));
        let handler = InputHandler::new(rect, [400, 200]);

        let inside = handler.make_location(egui::pos2(150.0, 75.0));
        assert_eq!(inside.position, Point::new(100.0, 50.0));
        assert!(inside.is_in_canvas);

        let outside = handler.make_location(egui::pos2(90.0, 75.0));
        assert_eq!(outside.position, Point::new(-20.0, 50.0));
        assert!(!outside.is_in_canvas);
    }
}
