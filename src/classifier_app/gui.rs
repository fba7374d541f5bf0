use crate::classifier_app::main::ClassifierApp;
use crate::classifier_app::render::{render, View};
use crate::config::Config;
use eframe::egui;

pub const WINDOW_TITLE: &str = "Alzheimer's MRI Classifier";

struct ClassifierWindow {
    app: ClassifierApp,
    config: Config,
    view: View,
}

impl eframe::App for ClassifierWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Worker results only ever reach the state here, on the UI thread.
        self.app.drain();

        let events = render(ctx, self.app.state(), &self.config, &mut self.view);
        for event in events {
            self.app.dispatch(event);
        }

        // Keep polling while a worker is busy so its result, the preview and
        // the loader animation show up without user input.
        if self.app.state().awaiting_worker() {
            ctx.request_repaint_after(self.config.tick_rate);
        }
    }
}

/// Blocks until the window is closed.
pub fn run(config: Config, app: ClassifierApp) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([700.0, 550.0]),
        ..Default::default()
    };

    let window = ClassifierWindow {
        app,
        config,
        view: View::default(),
    };

    eframe::run_native(WINDOW_TITLE, options, Box::new(|_cc| Box::new(window)))
}
