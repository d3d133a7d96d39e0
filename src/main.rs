//! Life Quests - a personal timeline journal rendered as zoomable questlines.

mod core;
mod gui;

use gui::LifeQuestsApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "My Questlines",
        options,
        Box::new(|cc| Ok(Box::new(LifeQuestsApp::new(cc)))),
    )
}
