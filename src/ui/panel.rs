//! The viewer control panel.

use crate::gfx::scene::Scene;

/// Commands emitted by the panel, applied by the app after the UI pass so
/// the scene is not mutated mid-frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    RotateX,
    RotateY,
    RotateZ,
    Reload,
}

/// Draws the control panel: rotate buttons, reload, and a model status
/// line. Rotate clicks are emitted even with no model loaded; the scene
/// treats them as no-ops.
pub fn control_panel(ui: &imgui::Ui, scene: &Scene, commands: &mut Vec<ViewerCommand>) {
    ui.window("Model Controls")
        .size([260.0, 0.0], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .resizable(false)
        .build(|| {
            match scene.model() {
                Some(model) => {
                    ui.text(format!("Model: {}", model.name));
                    ui.text(format!(
                        "{} triangles, {} vertices",
                        model.triangle_count(),
                        model.vertex_count()
                    ));
                }
                None => {
                    ui.text_disabled("No model loaded");
                }
            }

            ui.separator();

            if ui.button("Rotate X") {
                commands.push(ViewerCommand::RotateX);
            }
            ui.same_line();
            if ui.button("Rotate Y") {
                commands.push(ViewerCommand::RotateY);
            }
            ui.same_line();
            if ui.button("Rotate Z") {
                commands.push(ViewerCommand::RotateZ);
            }

            ui.separator();

            if ui.button("Reload Model") {
                commands.push(ViewerCommand::Reload);
            }
        });
}
