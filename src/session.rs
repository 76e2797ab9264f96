//! The drawing session: one object owning every piece of mutable canvas state.
//!
//! Hosts feed it intents and pointer events and read back a composed frame.
//! Nothing in here returns an error to the caller. Failures are logged and the
//! operation does nothing, so a bad message or a broken store can never take
//! the frame loop down.

use image::RgbaImage;

use crate::compositor::Compositor;
use crate::error::PictureError;
use crate::event::{Intent, IntentBus, ToolSelection};
use crate::geometry::Point;
use crate::history::{HistoryEntry, HistoryLog};
use crate::pattern::{PatternParams, draw_pattern};
use crate::renderer::render_entry;
use crate::state::{BlobStore, CanvasConfig, DrawingState, ToolConfig, ToolMode};
use crate::surface::DrawSurface;

pub struct DrawingSession {
    canvas_config: CanvasConfig,
    config: ToolConfig,
    drawing: DrawingState,
    history: HistoryLog,
    compositor: Option<Compositor>,
    store: Box<dyn BlobStore>,
    restored: bool,
}

impl std::fmt::Debug for DrawingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingSession")
            .field("canvas_config", &self.canvas_config)
            .field("config", &self.config)
            .field("history", &format!("<{} entries>", self.history.len()))
            .field("attached", &self.compositor.is_some())
            .finish()
    }
}

impl DrawingSession {
    /// Creates a session with no canvas attached. History is restored from
    /// `store` when the canvas is attached.
    pub fn new(canvas_config: CanvasConfig, store: Box<dyn BlobStore>) -> Self {
        Self {
            canvas_config,
            config: ToolConfig::default(),
            drawing: DrawingState::new(),
            history: HistoryLog::new(),
            compositor: None,
            store,
            restored: false,
        }
    }

    /// Starts from previously saved tool settings instead of the defaults.
    pub fn with_tool_config(mut self, config: ToolConfig) -> Self {
        self.config = config;
        self
    }

    pub fn canvas_config(&self) -> &CanvasConfig {
        &self.canvas_config
    }

    pub fn tool_config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn drawing(&self) -> &DrawingState {
        &self.drawing
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn compositor(&self) -> Option<&Compositor> {
        self.compositor.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.compositor.is_some()
    }

    pub fn store(&self) -> &dyn BlobStore {
        self.store.as_ref()
    }

    /// Creates the canvas layers at the configured size.
    ///
    /// The first attach restores history from storage; later attaches (for
    /// example after a resize) repaint from the history already in memory.
    pub fn attach_canvas(&mut self) {
        let (width, height) = (self.canvas_config.width, self.canvas_config.height);
        log::info!("Attaching {width}x{height} canvas");

        self.finalize_all();
        self.compositor = Some(Compositor::new(
            width,
            height,
            self.canvas_config.background_rgba(),
        ));

        if self.restored {
            self.repaint();
        } else {
            self.restore();
        }
    }

    /// Attaches the canvas at a new size.
    pub fn attach_canvas_sized(&mut self, width: u32, height: u32) {
        self.canvas_config.width = width;
        self.canvas_config.height = height;
        self.attach_canvas();
    }

    /// Applies every intent queued on `bus`, oldest first.
    pub fn process(&mut self, bus: &IntentBus) {
        for intent in bus.drain() {
            self.apply(intent);
        }
    }

    pub fn apply(&mut self, intent: Intent) {
        log::debug!("Applying intent {}", intent.name());
        match intent {
            Intent::SetPenSize(size) => {
                if let Some(size) = positive(size, "pen size") {
                    self.config.pen_size = size;
                }
            }
            Intent::SetPenColor(color) => self.config.pen_color = color,
            Intent::SetBrushType(stroke_type) => {
                self.select_tool(ToolSelection::Stroke(Some(stroke_type)));
            }
            Intent::SetTool(selection) => self.select_tool(selection),
            Intent::SetShape(shape_type) => {
                if shape_type != self.config.shape_type {
                    self.finalize(ToolMode::Shape);
                }
                self.config.shape_type = shape_type;
            }
            Intent::SetShapeStrokeSize(size) => {
                if let Some(size) = positive(size, "shape stroke size") {
                    self.config.shape_stroke_size = size;
                }
            }
            Intent::SetShapeStrokeColor(color) => self.config.shape_stroke_color = color,
            Intent::SetShapeFillColor(color) => self.config.shape_fill_color = color,
            Intent::AddPicture(bytes) => {
                if let Err(err) = self.add_picture(&bytes) {
                    log::warn!("Ignoring picture: {err}");
                }
            }
            Intent::Clear => self.clear_all(),
            Intent::Undo => self.undo(),
            Intent::Redo => log::info!("Redo requested; not supported"),
            Intent::SketchPattern(params) => self.sketch_pattern(&params),
        }
    }

    // Switching mode or sub-type commits whatever is being drawn first
    fn select_tool(&mut self, selection: ToolSelection) {
        let changes_mode = selection.mode() != self.config.mode;
        match selection {
            ToolSelection::Stroke(stroke_type) => {
                let stroke_type = stroke_type.unwrap_or(self.config.stroke_type);
                if changes_mode || stroke_type != self.config.stroke_type {
                    self.finalize_all();
                }
                self.config.stroke_type = stroke_type;
            }
            ToolSelection::Shape(shape_type) => {
                let shape_type = shape_type.unwrap_or(self.config.shape_type);
                if changes_mode || shape_type != self.config.shape_type {
                    self.finalize_all();
                }
                self.config.shape_type = shape_type;
            }
        }
        self.config.mode = selection.mode();
    }

    pub fn pointer_down(&mut self, point: Point) {
        if !self.is_attached() {
            log::warn!("Pointer down before a canvas is attached");
            return;
        }
        if !self.canvas_config.contains(point) {
            return;
        }
        self.drawing.begin(&self.config, point);
    }

    pub fn pointer_move(&mut self, point: Point) {
        if !self.drawing.is_active() {
            return;
        }
        if self.canvas_config.contains(point) {
            self.drawing.update(self.config.mode, point);
        } else {
            log::debug!("Pointer left the canvas at {point:?}");
            self.finalize_all();
        }
    }

    /// Ends the live action. A shape takes the release position as its end;
    /// a stroke keeps only the points it already has.
    pub fn pointer_up(&mut self, point: Point) {
        if self.config.mode == ToolMode::Shape && self.canvas_config.contains(point) {
            self.drawing.update(ToolMode::Shape, point);
        }
        self.finalize_all();
    }

    pub fn pointer_leave(&mut self) {
        self.finalize_all();
    }

    /// Redraws the preview layer and composes the frame.
    ///
    /// Returns `None` until a canvas is attached.
    pub fn frame(&mut self) -> Option<&RgbaImage> {
        let compositor = self.compositor.as_mut()?;
        let preview = compositor.begin_frame();
        self.drawing.draw_preview(preview);
        Some(compositor.composite())
    }

    /// Removes the last entry and rebuilds the permanent layer from history.
    pub fn undo(&mut self) {
        if !self.is_attached() {
            log::warn!("Undo before a canvas is attached");
            return;
        }
        let Some(entry) = self.history.pop() else {
            log::debug!("Nothing to undo");
            return;
        };
        log::info!("Undid {} ({} entries left)", entry.kind(), self.history.len());
        self.repaint();
        self.persist();
    }

    /// Empties history and the permanent layer.
    pub fn clear_all(&mut self) {
        let Some(compositor) = &mut self.compositor else {
            log::warn!("Clear before a canvas is attached");
            return;
        };
        compositor.reset_permanent();
        self.history.clear();
        log::info!("Cleared canvas");
        self.persist();
    }

    /// Decodes `bytes` and blits the image at the canvas origin.
    ///
    /// The picture is not part of history, so the next undo, clear or
    /// restore paints over it.
    pub fn add_picture(&mut self, bytes: &[u8]) -> Result<(), PictureError> {
        let Some(compositor) = &mut self.compositor else {
            log::warn!("Picture dropped before a canvas is attached");
            return Ok(());
        };
        if bytes.is_empty() {
            return Err(PictureError::Empty);
        }
        let picture = image::load_from_memory(bytes)?.to_rgba8();
        log::info!("Placing {}x{} picture", picture.width(), picture.height());
        compositor.permanent_mut().image(&picture, Point::new(0.0, 0.0));
        Ok(())
    }

    pub fn sketch_pattern(&mut self, params: &PatternParams) {
        let Some(compositor) = &mut self.compositor else {
            log::warn!("Pattern requested before a canvas is attached");
            return;
        };
        draw_pattern(compositor.permanent_mut(), params);
    }

    /// Writes the whole history under the configured key. Failures are logged.
    pub fn persist(&mut self) {
        let result = self
            .history
            .to_json()
            .and_then(|json| self.store.set(&self.canvas_config.storage_key, json));
        if let Err(err) = result {
            log::error!("Failed to persist history: {err}");
        }
    }

    fn restore(&mut self) {
        self.restored = true;
        let key = &self.canvas_config.storage_key;
        self.history = match self.store.get(key) {
            Ok(Some(json)) => match HistoryLog::from_json(&json) {
                Ok(history) => {
                    log::info!(
                        "Restored {} entries for document {}",
                        history.len(),
                        history.document_id()
                    );
                    history
                }
                Err(err) => {
                    log::error!("Discarding stored history: {err}");
                    HistoryLog::new()
                }
            },
            Ok(None) => {
                log::debug!("No stored history under {key:?}");
                HistoryLog::new()
            }
            Err(err) => {
                log::error!("Failed to read stored history: {err}");
                HistoryLog::new()
            }
        };
        self.repaint();
    }

    fn repaint(&mut self) {
        if let Some(compositor) = &mut self.compositor {
            let background = compositor.background();
            let permanent = compositor.permanent_mut();
            permanent.reset_style();
            self.history.replay(permanent, background);
        }
    }

    fn finalize(&mut self, mode: ToolMode) {
        if let Some(entry) = self.drawing.finish(mode) {
            self.commit(entry);
        }
    }

    fn finalize_all(&mut self) {
        for entry in self.drawing.finish_all() {
            self.commit(entry);
        }
    }

    // Draws the entry once onto the permanent layer, then records it
    fn commit(&mut self, entry: HistoryEntry) {
        if let Some(compositor) = &mut self.compositor {
            render_entry(compositor.permanent_mut(), &entry);
        }
        log::info!("Committed {} #{}", entry.kind(), self.history.len());
        self.history.push(entry);
        self.persist();
    }
}

fn positive(value: f32, what: &str) -> Option<f32> {
    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        log::warn!("Ignoring {what} {value}");
        None
    }
}
