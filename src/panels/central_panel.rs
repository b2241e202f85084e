use crate::WhiteboardApp;

pub fn central_panel(app: &mut WhiteboardApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            // Create a painting area that fills the remaining space
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::drag());
            // Handle input before drawing so this frame shows the latest point
            app.handle_input(ctx, &response);
            app.render(&painter, response.rect);

            if app.board().is_drawing() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
            }
        });
}
