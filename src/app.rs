use crate::color::Rgb;
use crate::event::{Intent, IntentBus};
use crate::file_handler::FileHandler;
use crate::input::{InputEvent, InputHandler};
use crate::panels::{central_panel, tools_panel};
use crate::session::DrawingSession;
use crate::pattern::PatternParams;
use crate::state::{BlobStore, CanvasConfig, ToolConfig};

pub const APP_ID: &str = "sketch_canvas";

/// We derive Deserialize/Serialize so we can persist tool settings on shutdown.
/// Drawn work is persisted separately by the session's blob store.
#[derive(serde::Deserialize, serde::Serialize, Default)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct PaintApp {
    canvas: CanvasConfig,
    tools: ToolConfig,
    #[serde(skip)]
    session: Option<DrawingSession>,
    #[serde(skip)]
    bus: IntentBus,
    #[serde(skip)]
    input: InputHandler,
    #[serde(skip)]
    file_handler: FileHandler,
    #[serde(skip)]
    texture: Option<egui::TextureHandle>,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        let mut session = DrawingSession::new(app.canvas.clone(), default_store())
            .with_tool_config(app.tools.clone());
        session.attach_canvas();
        app.session = Some(session);
        app
    }

    pub fn session(&self) -> Option<&DrawingSession> {
        self.session.as_ref()
    }

    pub fn tool_config(&self) -> ToolConfig {
        self.session
            .as_ref()
            .map(|session| session.tool_config().clone())
            .unwrap_or_else(|| self.tools.clone())
    }

    /// Queue an intent for the next time the canvas is updated
    pub fn emit(&self, intent: Intent) {
        self.bus.emit(intent);
    }

    /// Apply everything the panels queued since the last frame
    pub fn process_intents(&mut self) {
        if let Some(session) = &mut self.session {
            session.process(&self.bus);
        }
    }

    pub fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        for intent in self.file_handler.check_for_dropped_files(ctx) {
            self.bus.emit(intent);
        }
    }

    /// Feed this frame's pointer input to the session
    pub fn handle_input(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect) {
        let Some(session) = &mut self.session else {
            return;
        };
        let canvas = session.canvas_config();
        self.input
            .set_canvas_rect(canvas_rect, [canvas.width, canvas.height]);

        for event in self.input.process_input(ctx) {
            match event {
                InputEvent::PointerDown { location } => session.pointer_down(location.position),
                InputEvent::PointerMove {
                    location,
                    primary_down: true,
                } => session.pointer_move(location.position),
                InputEvent::PointerMove { .. } => {}
                InputEvent::PointerUp { location } => session.pointer_up(location.position),
                InputEvent::PointerLeave => session.pointer_leave(),
                // Typing into a panel widget is not a shortcut
                InputEvent::KeyDown { .. } if ctx.wants_keyboard_input() => {}
                InputEvent::KeyDown { key, modifiers } => {
                    if let Some(intent) = shortcut_intent(key, modifiers, session.tool_config()) {
                        session.apply(intent);
                    }
                }
            }
        }
    }

    /// Compose the frame and paint it into `rect`
    pub fn paint_canvas(&mut self, ui: &egui::Ui, rect: egui::Rect) {
        let Some(session) = &mut self.session else {
            return;
        };
        if session.frame().is_none() {
            return;
        }
        let Some(image) = session.compositor().map(|c| c.to_color_image()) else {
            return;
        };

        if let Some(texture) = &mut self.texture {
            texture.set(image, egui::TextureOptions::NEAREST);
        } else {
            self.texture = Some(ui.ctx().load_texture(
                "canvas",
                image,
                egui::TextureOptions::NEAREST,
            ));
        }
        let Some(texture) = &self.texture else {
            return;
        };
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        ui.painter()
            .image(texture.id(), rect, uv, egui::Color32::WHITE);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_store() -> Box<dyn BlobStore> {
    use crate::state::{FileStore, MemoryStore, ThreadedStore};

    let Some(dir) = eframe::storage_dir(APP_ID) else {
        log::warn!("No storage directory; drawings will not be saved");
        return Box::new(MemoryStore::new());
    };
    match ThreadedStore::new(FileStore::new(dir)) {
        Ok(store) => Box::new(store),
        Err(err) => {
            log::error!("Failed to start storage worker: {err}");
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn default_store() -> Box<dyn BlobStore> {
    Box::new(crate::state::LocalStorage)
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.tools = self.tool_config();
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}

/// Keyboard shortcuts on the canvas. Sizes that would drop below 1 are
/// left for the session to reject.
pub fn shortcut_intent(
    key: egui::Key,
    modifiers: egui::Modifiers,
    tools: &ToolConfig,
) -> Option<Intent> {
    use egui::Key;

    if modifiers.command {
        return (key == Key::Z).then_some(Intent::Undo);
    }
    match key {
        Key::C => Some(Intent::Clear),
        Key::P => Some(Intent::SketchPattern(PatternParams::default())),
        Key::R => Some(Intent::SetPenColor(Rgb::new(255, 0, 0))),
        Key::B => Some(Intent::SetPenColor(Rgb::new(0, 0, 255))),
        Key::ArrowLeft => Some(Intent::SetPenSize(tools.pen_size - 1.0)),
        Key::ArrowRight => Some(Intent::SetPenSize(tools.pen_size + 1.0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Key, Modifiers};

    #[test]
    fn test_shortcuts() {
        let tools = ToolConfig::default();
        let plain = Modifiers::NONE;

        assert_eq!(shortcut_intent(Key::Z, Modifiers::COMMAND, &tools), Some(Intent::Undo));
        assert_eq!(shortcut_intent(Key::C, Modifiers::COMMAND, &tools), None);
        assert_eq!(shortcut_intent(Key::Z, plain, &tools), None);
        assert_eq!(shortcut_intent(Key::C, plain, &tools), Some(Intent::Clear));
        assert!(matches!(
            shortcut_intent(Key::P, plain, &tools),
            Some(Intent::SketchPattern(params)) if params.seed.is_none()
        ));
        assert_eq!(
            shortcut_intent(Key::B, plain, &tools),
            Some(Intent::SetPenColor(Rgb::new(0, 0, 255)))
        );
        assert_eq!(
            shortcut_intent(Key::ArrowRight, plain, &tools),
            Some(Intent::SetPenSize(tools.pen_size + 1.0))
        );
        assert_eq!(
            shortcut_intent(Key::ArrowLeft, plain, &tools),
            Some(Intent::SetPenSize(tools.pen_size - 1.0))
        );
    }
}
