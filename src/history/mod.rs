mod log;

pub use self::log::HistoryLog;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shape::Shape;
use crate::state::{PersistenceError, PersistenceResult};
use crate::stroke::Stroke;

/// Current layout version of the persisted history document.
pub const FORMAT_VERSION: u32 = 1;

/// A finalized action, as stored in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", content = "data", rename_all = "lowercase")]
pub enum HistoryEntry {
    Stroke(Stroke),
    Shape(Shape),
}

impl HistoryEntry {
    pub fn kind(&self) -> &'static str {
        match self {
            HistoryEntry::Stroke(_) => "stroke",
            HistoryEntry::Shape(_) => "shape",
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            HistoryEntry::Stroke(stroke) => stroke.is_valid(),
            HistoryEntry::Shape(shape) => shape.is_valid(),
        }
    }
}

impl From<Stroke> for HistoryEntry {
    fn from(stroke: Stroke) -> Self {
        HistoryEntry::Stroke(stroke)
    }
}

impl From<Shape> for HistoryEntry {
    fn from(shape: Shape) -> Self {
        HistoryEntry::Shape(shape)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a> {
    version: u32,
    document_id: Uuid,
    entries: &'a [HistoryEntry],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    version: u32,
    document_id: Option<Uuid>,
    entries: Vec<HistoryEntry>,
}

// Older saves stored the entry array on its own
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredHistory {
    Envelope(Envelope),
    Legacy(Vec<HistoryEntry>),
}

pub(crate) fn encode(document_id: Uuid, entries: &[HistoryEntry]) -> PersistenceResult<String> {
    let envelope = EnvelopeRef {
        version: FORMAT_VERSION,
        document_id,
        entries,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decodes a stored history document into its id and entries.
///
/// Legacy documents carry no id; a fresh one is assigned.
pub(crate) fn decode(json: &str) -> PersistenceResult<(Uuid, Vec<HistoryEntry>)> {
    let (document_id, entries) = match serde_json::from_str::<StoredHistory>(json)? {
        StoredHistory::Envelope(envelope) => {
            if envelope.version != FORMAT_VERSION {
                return Err(PersistenceError::InvalidState(format!(
                    "unsupported history version {}",
                    envelope.version
                )));
            }
            (envelope.document_id.unwrap_or_else(Uuid::new_v4), envelope.entries)
        }
        StoredHistory::Legacy(entries) => {
            ::log::debug!("Upgrading legacy history with {} entries", entries.len());
            (Uuid::new_v4(), entries)
        }
    };

    if let Some(index) = entries.iter().position(|entry| !entry.is_valid()) {
        return Err(PersistenceError::InvalidState(format!(
            "history entry {index} has invalid geometry"
        )));
    }

    Ok((document_id, entries))
}
