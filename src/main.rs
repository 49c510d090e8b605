mod app;
mod ui_theme;

use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Photo Editor")
            .with_inner_size([1000.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Photo Editor",
        options,
        Box::new(|_cc| Ok(Box::new(app::EditorApp::new()))),
    )
}
