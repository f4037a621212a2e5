use egui::Context as EguiContext;
use shellplanet_common::{MAX_SHELL_COUNT, ShellParams, UI_MIN_SHELL_COUNT};
use shellplanet_render::AppState;

/// Parameter overlay. Edits land in `state` and take effect next frame.
pub fn draw_ui(ctx: &EguiContext, state: &mut AppState, supports_wireframe: bool) {
    if !state.show_ui {
        return;
    }

    egui::SidePanel::left("parameters")
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading("Shell Planet");
            ui.separator();

            let eye = state.camera.position();
            ui.label(format!("Camera: ({:.2}, {:.2}, {:.2})", eye.x, eye.y, eye.z));
            ui.label(format!(
                "Orbit: distance {:.2}  angle {:.2} rad",
                state.orbit.distance(),
                state.orbit.angle()
            ));
            let dt = state.frame_time();
            let fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
            ui.label(format!("Frame: {:.2} ms ({fps:.0} fps)", dt * 1000.0));
            ui.add_enabled(
                supports_wireframe,
                egui::Checkbox::new(&mut state.wireframe, "Wireframe (W / F)"),
            );
            ui.separator();

            let p = &mut state.shells;
            ui.heading("Shells");
            ui.add(
                egui::Slider::new(&mut p.shell_count, UI_MIN_SHELL_COUNT..=MAX_SHELL_COUNT)
                    .text("count"),
            );
            ui.add(egui::Slider::new(&mut p.shell_thickness, 0.01..=0.5).text("thickness"));
            ui.add(egui::Slider::new(&mut p.density, 10.0..=400.0).text("density"));
            ui.add(egui::Slider::new(&mut p.wind_strength, 0.0..=0.1).text("wind"));
            ui.horizontal(|ui| {
                ui.label("Root");
                ui.color_edit_button_rgb(&mut p.base_color);
                ui.label("Tip");
                ui.color_edit_button_rgb(&mut p.tip_color);
            });

            ui.separator();
            ui.heading("Terrain");
            ui.add(egui::Slider::new(&mut p.planet_radius, 0.5..=2.0).text("radius"));
            ui.add(egui::Slider::new(&mut p.terrain_frequency, 0.5..=8.0).text("frequency"));
            ui.add(egui::Slider::new(&mut p.terrain_octaves, 1..=8).text("octaves"));
            ui.add(egui::Slider::new(&mut p.terrain_seed, 0.0..=100.0).text("seed"));
            ui.add(egui::Slider::new(&mut p.sea_level, 0.0..=1.0).text("sea level"));
            ui.horizontal(|ui| {
                ui.label("Water");
                ui.color_edit_button_rgb(&mut p.water_color);
            });

            ui.separator();
            if ui.button("Reset parameters").clicked() {
                *p = ShellParams::default();
            }

            ui.separator();
            ui.small("Scroll: zoom / orbit | W/F: wireframe | F1: panel | Esc/Q: quit");
        });
}
