use image::Rgba;
use uuid::Uuid;

use super::HistoryEntry;
use crate::renderer::render_entry;
use crate::shape::Shape;
use crate::state::PersistenceResult;
use crate::stroke::Stroke;
use crate::surface::DrawSurface;

/// Ordered record of finalized actions.
///
/// The permanent layer is always equal to [`HistoryLog::replay`] of this log,
/// so undo and restore can rebuild it from scratch.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLog {
    document_id: Uuid,
    entries: Vec<HistoryEntry>,
    // Derived; rebuilt whenever entries are removed or replaced
    stroke_indices: Vec<usize>,
    shape_indices: Vec<usize>,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::with_entries(Uuid::new_v4(), Vec::new())
    }

    pub fn with_entries(document_id: Uuid, entries: Vec<HistoryEntry>) -> Self {
        let mut log = Self {
            document_id,
            entries,
            stroke_indices: Vec::new(),
            shape_indices: Vec::new(),
        };
        log.reindex();
        log
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Appends a finalized action.
    pub fn push(&mut self, entry: impl Into<HistoryEntry>) {
        let entry = entry.into();
        let index = self.entries.len();
        match entry {
            HistoryEntry::Stroke(_) => self.stroke_indices.push(index),
            HistoryEntry::Shape(_) => self.shape_indices.push(index),
        }
        self.entries.push(entry);
    }

    /// Removes the most recent entry.
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        let entry = self.entries.pop()?;
        self.reindex();
        Some(entry)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.stroke_indices.clear();
        self.shape_indices.clear();
    }

    /// Committed strokes in insertion order.
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> + '_ {
        self.stroke_indices.iter().filter_map(|&i| match &self.entries[i] {
            HistoryEntry::Stroke(stroke) => Some(stroke),
            HistoryEntry::Shape(_) => None,
        })
    }

    /// Committed shapes in insertion order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.shape_indices.iter().filter_map(|&i| match &self.entries[i] {
            HistoryEntry::Shape(shape) => Some(shape),
            HistoryEntry::Stroke(_) => None,
        })
    }

    /// Clears `surface` to `background` and draws every entry in order.
    pub fn replay(&self, surface: &mut dyn DrawSurface, background: Rgba<u8>) {
        surface.clear(background);
        for entry in &self.entries {
            render_entry(surface, entry);
        }
    }

    pub fn to_json(&self) -> PersistenceResult<String> {
        super::encode(self.document_id, &self.entries)
    }

    pub fn from_json(json: &str) -> PersistenceResult<Self> {
        let (document_id, entries) = super::decode(json)?;
        Ok(Self::with_entries(document_id, entries))
    }

    fn reindex(&mut self) {
        self.stroke_indices.clear();
        self.shape_indices.clear();
        for (index, entry) in self.entries.iter().enumerate() {
            match entry {
                HistoryEntry::Stroke(_) => self.stroke_indices.push(index),
                HistoryEntry::Shape(_) => self.shape_indices.push(index),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::geometry::Point;
    use crate::shape::ShapeType;
    use crate::stroke::StrokeType;
    use crate::surface::{DrawCall, RecordingSurface};

    fn stroke(x: f32) -> Stroke {
        Stroke::new(
            StrokeType::Pencil,
            2.0,
            Rgb::BLACK,
            vec![Point::new(x, 0.0), Point::new(x + 10.0, 0.0)],
        )
    }

    fn shape() -> Shape {
        let mut shape = Shape::new(
            ShapeType::Circle,
            1.0,
            Rgb::BLACK,
            Rgb::WHITE,
            Point::new(0.0, 0.0),
        );
        shape.end = Point::new(20.0, 20.0);
        shape
    }

    #[test]
    fn test_derived_lists_follow_entries() {
        let mut log = HistoryLog::new();
        log.push(stroke(0.0));
        log.push(shape());
        log.push(stroke(5.0));

        assert_eq!(log.len(), 3);
        assert_eq!(log.strokes().count(), 2);
        assert_eq!(log.shapes().count(), 1);

        assert_eq!(log.pop(), Some(HistoryEntry::Stroke(stroke(5.0))));
        assert_eq!(log.strokes().collect::<Vec<_>>(), vec![&stroke(0.0)]);

        log.pop();
        assert_eq!(log.shapes().count(), 0);
    }

    #[test]
    fn test_pop_empty_is_noop() {
        let mut log = HistoryLog::new();
        assert!(log.pop().is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn test_replay_clears_then_draws_in_order() {
        let mut log = HistoryLog::new();
        log.push(shape());
        log.push(stroke(0.0));

        let mut surface = RecordingSurface::new(50, 50);
        log.replay(&mut surface, Rgba([255, 255, 255, 255]));

        let calls = surface.calls();
        assert_eq!(calls[0], DrawCall::Clear(Rgba([255, 255, 255, 255])));
        let first_primitive = surface.primitives()[0].clone();
        assert!(matches!(first_primitive, DrawCall::Ellipse { width, .. } if width == 20.0));
    }

    #[test]
    fn test_json_round_trip() {
        let mut log = HistoryLog::new();
        log.push(stroke(1.5));
        log.push(shape());

        let restored = HistoryLog::from_json(&log.to_json().unwrap()).unwrap();
        assert_eq!(restored, log);
        assert_eq!(restored.shapes().count(), 1);
    }
}
