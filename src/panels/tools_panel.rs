use egui::color_picker::{Alpha, color_edit_button_srgba};

use crate::WhiteboardApp;
use crate::tools::Tool;

pub fn tools_panel(app: &mut WhiteboardApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("tools_panel").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            let active_tool = app.board().config().tool();
            for tool in Tool::ALL {
                if ui.selectable_label(active_tool == tool, tool.name()).clicked() {
                    log::info!("Tool selected from UI: {}", tool.name());
                    app.board_mut().set_tool(tool);
                }
            }
            ui.separator();

            // Color picker
            ui.label("Color:");
            let mut color = app.board().config().color();
            if color_edit_button_srgba(ui, &mut color, Alpha::Opaque).changed() {
                app.board_mut().set_color(color);
            }

            // Brush size
            ui.label("Brush Size:");
            let mut brush_size = app.board().config().brush_size();
            let response = ui.add(
                egui::DragValue::new(&mut brush_size)
                    .range(1.0..=100.0)
                    .speed(0.25),
            );
            if response.changed() {
                app.set_brush_size(brush_size);
            }

            ui.label("Background:");
            let mut background = app.board().settings().background;
            if color_edit_button_srgba(ui, &mut background, Alpha::Opaque).changed() {
                app.set_background(background);
            }
            ui.separator();

            // Undo/Redo section
            let can_undo = app.board().can_undo();
            let can_redo = app.board().can_redo();
            if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                app.undo();
            }
            if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                app.redo();
            }
            ui.separator();

            if ui.button("Clear").clicked() {
                app.clear();
            }
            if ui.button("Save").clicked() {
                app.save_drawing();
            }

            let history = app.board().history();
            ui.separator();
            ui.label(format!(
                "Strokes: {} / {}",
                history.visible_strokes().len(),
                history.entries().len()
            ));
            if let Some(status) = app.status() {
                ui.separator();
                ui.label(status);
            }
        });
    });
}
