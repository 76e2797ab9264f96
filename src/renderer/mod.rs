mod shape;
mod stroke;

pub use shape::draw_shape;
pub use stroke::draw_stroke;

use crate::history::HistoryEntry;
use crate::surface::DrawSurface;

/// Draws one committed history entry.
pub fn render_entry(surface: &mut dyn DrawSurface, entry: &HistoryEntry) {
    match entry {
        HistoryEntry::Stroke(stroke) => draw_stroke(surface, stroke),
        HistoryEntry::Shape(shape) => draw_shape(surface, shape),
    }
}
