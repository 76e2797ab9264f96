use crate::PaintApp;
use crate::color::Rgb;
use crate::event::{Intent, ToolSelection};
use crate::pattern::PatternParams;
use crate::shape::ShapeType;
use crate::state::ToolMode;
use crate::stroke::StrokeType;

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            let config = app.tool_config();

            ui.heading("Pen");
            for stroke_type in StrokeType::ALL {
                let is_selected =
                    config.mode == ToolMode::Stroke && config.stroke_type == stroke_type;
                if ui.selectable_label(is_selected, stroke_type.name()).clicked() {
                    log::info!("Stroke tool selected from UI: {stroke_type}");
                    app.emit(Intent::SetTool(ToolSelection::Stroke(Some(stroke_type))));
                }
            }

            let mut pen_size = config.pen_size;
            if ui
                .add(egui::Slider::new(&mut pen_size, 1.0..=64.0).text("Size"))
                .changed()
            {
                app.emit(Intent::SetPenSize(pen_size));
            }
            if let Some(color) = color_button(ui, "Color", config.pen_color) {
                app.emit(Intent::SetPenColor(color));
            }

            ui.separator();
            ui.heading("Shapes");
            for shape_type in ShapeType::ALL {
                let is_selected = config.mode == ToolMode::Shape && config.shape_type == shape_type;
                if ui.selectable_label(is_selected, shape_type.name()).clicked() {
                    log::info!("Shape tool selected from UI: {shape_type}");
                    app.emit(Intent::SetTool(ToolSelection::Shape(Some(shape_type))));
                }
            }

            let mut stroke_size = config.shape_stroke_size;
            if ui
                .add(egui::Slider::new(&mut stroke_size, 1.0..=32.0).text("Outline"))
                .changed()
            {
                app.emit(Intent::SetShapeStrokeSize(stroke_size));
            }
            if let Some(color) = color_button(ui, "Outline color", config.shape_stroke_color) {
                app.emit(Intent::SetShapeStrokeColor(color));
            }
            if let Some(color) = color_button(ui, "Fill color", config.shape_fill_color) {
                app.emit(Intent::SetShapeFillColor(color));
            }

            ui.separator();
            ui.horizontal(|ui| {
                let can_undo = app.session().is_some_and(|s| !s.history().is_empty());
                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.emit(Intent::Undo);
                }
                if ui.button("Clear").clicked() {
                    app.emit(Intent::Clear);
                }
            });
            if ui.button("Pattern").clicked() {
                app.emit(Intent::SketchPattern(PatternParams::default()));
            }

            if let Some(session) = app.session() {
                ui.separator();
                let history = session.history();
                ui.label(format!(
                    "{} strokes, {} shapes",
                    history.strokes().count(),
                    history.shapes().count()
                ));
            }
        });
}

fn color_button(ui: &mut egui::Ui, label: &str, current: Rgb) -> Option<Rgb> {
    let mut rgb = current.to_array();
    let changed = ui
        .horizontal(|ui| {
            let changed = ui.color_edit_button_srgb(&mut rgb).changed();
            ui.label(label);
            changed
        })
        .inner;
    changed.then_some(Rgb::from(rgb))
}
