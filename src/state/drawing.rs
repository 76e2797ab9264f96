//! In-progress actions.
//!
//! There is at most one stroke and one shape in flight. The tool mode picks
//! which of the two a pointer-down starts; switching tools finishes whatever
//! is in flight so the two never overlap in practice.

use crate::geometry::Point;
use crate::history::HistoryEntry;
use crate::renderer::{draw_shape, draw_stroke};
use crate::shape::MutableShape;
use crate::stroke::MutableStroke;
use crate::surface::DrawSurface;

use super::config::{ToolConfig, ToolMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Idle,
    Active,
}

#[derive(Debug, Clone, Default)]
pub struct DrawingState {
    stroke: Option<MutableStroke>,
    shape: Option<MutableShape>,
}

impl DrawingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self, mode: ToolMode) -> ActionPhase {
        let active = match mode {
            ToolMode::Stroke => self.stroke.is_some(),
            ToolMode::Shape => self.shape.is_some(),
        };
        if active { ActionPhase::Active } else { ActionPhase::Idle }
    }

    pub fn is_active(&self) -> bool {
        self.stroke.is_some() || self.shape.is_some()
    }

    pub fn stroke(&self) -> Option<&MutableStroke> {
        self.stroke.as_ref()
    }

    pub fn shape(&self) -> Option<&MutableShape> {
        self.shape.as_ref()
    }

    /// Starts an action of the configured kind at `point`.
    ///
    /// Returns `false` if one is already in flight.
    pub fn begin(&mut self, config: &ToolConfig, point: Point) -> bool {
        match config.mode {
            ToolMode::Stroke if self.stroke.is_none() => {
                let mut stroke = config.begin_stroke();
                stroke.add_point(point);
                self.stroke = Some(stroke);
            }
            ToolMode::Shape if self.shape.is_none() => {
                self.shape = Some(config.begin_shape(point));
            }
            _ => return false,
        }
        log::debug!("Began {:?} action at {:?}", config.mode, point);
        true
    }

    /// Feeds a pointer position to the live action, if any.
    pub fn update(&mut self, mode: ToolMode, point: Point) {
        match mode {
            ToolMode::Stroke => {
                if let Some(stroke) = &mut self.stroke {
                    stroke.add_point(point);
                }
            }
            ToolMode::Shape => {
                if let Some(shape) = &mut self.shape {
                    shape.set_end(point);
                }
            }
        }
    }

    /// Ends the live action. Degenerate actions are dropped.
    pub fn finish(&mut self, mode: ToolMode) -> Option<HistoryEntry> {
        match mode {
            ToolMode::Stroke => self.stroke.take()?.finish().map(HistoryEntry::from),
            ToolMode::Shape => self.shape.take()?.finish().map(HistoryEntry::from),
        }
    }

    /// Ends every action in flight, in stroke-then-shape order.
    pub fn finish_all(&mut self) -> Vec<HistoryEntry> {
        [ToolMode::Stroke, ToolMode::Shape]
            .into_iter()
            .filter_map(|mode| self.finish(mode))
            .collect()
    }

    /// Draws the actions in flight.
    pub fn draw_preview(&self, surface: &mut dyn DrawSurface) {
        if let Some(stroke) = &self.stroke {
            draw_stroke(surface, &stroke.to_stroke());
        }
        if let Some(shape) = &self.shape {
            if !shape.shape().is_degenerate() {
                draw_shape(surface, shape.shape());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    fn shape_config() -> ToolConfig {
        ToolConfig {
            mode: ToolMode::Shape,
            ..ToolConfig::default()
        }
    }

    #[test]
    fn test_stroke_lifecycle() {
        let config = ToolConfig::default();
        let mut state = DrawingState::new();
        assert_eq!(state.phase(ToolMode::Stroke), ActionPhase::Idle);

        assert!(state.begin(&config, Point::new(0.0, 0.0)));
        assert!(!state.begin(&config, Point::new(5.0, 5.0)));
        assert_eq!(state.phase(ToolMode::Stroke), ActionPhase::Active);

        state.update(ToolMode::Stroke, Point::new(20.0, 0.0));
        let entry = state.finish(ToolMode::Stroke);
        assert!(matches!(entry, Some(HistoryEntry::Stroke(ref s)) if s.points().len() == 2));
        assert!(!state.is_active());
    }

    #[test]
    fn test_shape_lifecycle() {
        let mut state = DrawingState::new();
        state.begin(&shape_config(), Point::new(10.0, 10.0));
        state.update(ToolMode::Shape, Point::new(40.0, 30.0));

        match state.finish(ToolMode::Shape) {
            Some(HistoryEntry::Shape(shape)) => assert_eq!(shape.extent(), (30.0, 20.0)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_click_without_drag_is_dropped() {
        let mut state = DrawingState::new();
        state.begin(&ToolConfig::default(), Point::new(3.0, 3.0));
        assert!(state.finish(ToolMode::Stroke).is_none());

        state.begin(&shape_config(), Point::new(3.0, 3.0));
        assert!(state.finish(ToolMode::Shape).is_none());
        assert_eq!(state.phase(ToolMode::Shape), ActionPhase::Idle);
    }

    #[test]
    fn test_preview_skips_empty_shape() {
        let mut state = DrawingState::new();
        state.begin(&shape_config(), Point::new(3.0, 3.0));
        let mut surface = RecordingSurface::new(10, 10);
        state.draw_preview(&mut surface);
        assert!(surface.calls().is_empty());

        state.update(ToolMode::Shape, Point::new(8.0, 8.0));
        state.draw_preview(&mut surface);
        assert_eq!(surface.primitives().len(), 1);
    }
}
