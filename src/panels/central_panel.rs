use crate::PaintApp;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    // Settings changes from the tools panel land before this frame's input
    app.process_intents();

    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(canvas) = app.session().map(|s| s.canvas_config().clone()) else {
            ui.label("Canvas unavailable");
            return;
        };

        egui::ScrollArea::both().show(ui, |ui| {
            let size = egui::vec2(canvas.width as f32, canvas.height as f32);
            let (canvas_rect, _response) = ui.allocate_exact_size(size, egui::Sense::drag());

            app.handle_input(ctx, canvas_rect);
            app.paint_canvas(ui, canvas_rect);
        });
    });

    // Keep the preview live while drawing
    if app.session().is_some_and(|s| s.drawing().is_active()) {
        ctx.request_repaint();
    }
}
