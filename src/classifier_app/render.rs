use crate::classifier_app::core::{Event, Phase, State, ThemeMode};
use crate::classifier_app::theme::Palette;
use crate::config::Config;
use crate::inference_pipeline::Diagnosis;
use eframe::egui;
use std::path::PathBuf;
use std::time::Duration;

const LOADER_SIZE: f32 = 200.0;
const LOADER_DOTS: usize = 8;

/// Extensions offered by the file-open dialog.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Widget-side state that is not part of the app state: the uploaded preview
/// texture.
#[derive(Default)]
pub struct View {
    texture: Option<(u64, egui::TextureHandle)>,
}

/// Draws one frame and returns the user intents it collected.
pub fn render(ctx: &egui::Context, state: &State, config: &Config, view: &mut View) -> Vec<Event> {
    let palette = Palette::for_mode(state.theme);
    let mut events = Vec::new();

    ctx.set_visuals(match state.theme {
        ThemeMode::Dark => egui::Visuals::dark(),
        ThemeMode::Light => egui::Visuals::light(),
    });

    sync_texture(ctx, state, view);

    events.extend(upload_event(state, dropped_file(ctx)));

    egui::TopBottomPanel::top("controls")
        .frame(egui::Frame::none().fill(palette.main).inner_margin(10.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.add(flat_button("Reset", &palette)).clicked() {
                    events.push(Event::ResetRequested);
                }
                if ui.add(flat_button("Toggle Theme", &palette)).clicked() {
                    events.push(Event::ThemeToggled);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let upload = egui::Button::new(
                        egui::RichText::new("Upload MRI Image")
                            .strong()
                            .color(egui::Color32::WHITE),
                    )
                    .fill(palette.upload_button);

                    if ui.add_enabled(!state.is_predicting(), upload).clicked() {
                        events.extend(upload_event(state, pick_image_file()));
                    }

                    ui.label(egui::RichText::new("or drop a scan here").color(palette.subtle));
                });
            });
        });

    let background = if state.is_predicting() {
        palette.loader_background
    } else {
        palette.container
    };

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(background).inner_margin(20.0))
        .show(ctx, |ui| match &state.phase {
            Phase::Predicting { started, .. } => {
                render_loader(ui, &palette, started.elapsed(), config.loader_fill_duration)
            }
            phase => render_content(ui, &palette, phase, view),
        });

    events
}

fn flat_button(text: &str, palette: &Palette) -> egui::Button<'static> {
    egui::Button::new(
        egui::RichText::new(text.to_string())
            .strong()
            .color(palette.button_text),
    )
    .fill(palette.container)
}

/// Blocks the UI thread until the native dialog closes. `None` when cancelled.
fn pick_image_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select MRI Image")
        .add_filter("image", &IMAGE_EXTENSIONS)
        .pick_file()
}

/// Turns a picked or dropped file into an upload, unless nothing was chosen
/// or a prediction is still running.
pub fn upload_event(state: &State, picked: Option<PathBuf>) -> Option<Event> {
    match picked {
        Some(path) if !state.is_predicting() => Some(Event::UploadRequested(path)),
        _ => None,
    }
}

fn dropped_file(ctx: &egui::Context) -> Option<PathBuf> {
    ctx.input(|i| i.raw.dropped_files.iter().find_map(|file| file.path.clone()))
}

fn sync_texture(ctx: &egui::Context, state: &State, view: &mut View) {
    match &state.preview {
        None => view.texture = None,
        Some(preview) => {
            let stale = !matches!(&view.texture, Some((session, _)) if *session == state.session);
            if stale {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [preview.width, preview.height],
                    &preview.rgba,
                );
                let texture = ctx.load_texture(
                    format!("preview-{}", state.session),
                    image,
                    egui::TextureOptions::LINEAR,
                );
                view.texture = Some((state.session, texture));
            }
        }
    }
}

fn render_content(ui: &mut egui::Ui, palette: &Palette, phase: &Phase, view: &View) {
    ui.vertical_centered(|ui| {
        ui.add_space(15.0);

        if let Some((_, texture)) = &view.texture {
            ui.image((texture.id(), texture.size_vec2()));
            ui.add_space(10.0);
        }

        match phase {
            Phase::Showing { diagnosis, .. } => {
                ui.label(
                    egui::RichText::new(result_text(diagnosis))
                        .size(20.0)
                        .strong()
                        .color(palette.accent),
                );
                ui.add_space(5.0);
                ui.label(
                    egui::RichText::new(diagnosis.description)
                        .size(11.0)
                        .color(palette.subtle),
                );
            }
            Phase::Failed { message, .. } => {
                ui.label(
                    egui::RichText::new(message)
                        .size(14.0)
                        .strong()
                        .color(palette.error),
                );
            }
            Phase::Idle | Phase::Predicting { .. } => {}
        }
    });
}

fn render_loader(ui: &mut egui::Ui, palette: &Palette, elapsed: Duration, fill: Duration) {
    ui.vertical_centered(|ui| {
        ui.add_space((ui.available_height() - LOADER_SIZE - 40.0).max(0.0) / 2.0);

        let (rect, _) =
            ui.allocate_exact_size(egui::vec2(LOADER_SIZE, LOADER_SIZE), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, palette.loader_background);

        let time = ui.input(|i| i.time);
        for (dx, dy, radius) in loader_dots(time) {
            painter.circle_filled(
                rect.center() + egui::vec2(dx, dy),
                radius,
                palette.loader_dots,
            );
        }

        ui.add_space(10.0);
        ui.add(egui::ProgressBar::new(loader_progress(elapsed, fill)).desired_width(180.0));
    });
}

/// Offsets from the loader center and radius of each pulsing dot at `time`
/// seconds.
pub fn loader_dots(time: f64) -> [(f32, f32, f32); LOADER_DOTS] {
    let mut dots = [(0.0, 0.0, 0.0); LOADER_DOTS];
    for (i, dot) in dots.iter_mut().enumerate() {
        let phase = i as f64;
        let angle = (i as f64) * std::f64::consts::TAU / LOADER_DOTS as f64;
        let distance = 40.0 + 10.0 * (time * 2.0 + phase).sin();
        let radius = 8.0 + 4.0 * (time * 3.0 + phase).sin();
        *dot = (
            (distance * angle.cos()) as f32,
            (distance * angle.sin()) as f32,
            radius as f32,
        );
    }
    dots
}

pub fn loader_progress(elapsed: Duration, fill: Duration) -> f32 {
    if fill.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / fill.as_secs_f32()).min(1.0)
}

pub fn result_text(diagnosis: &Diagnosis) -> String {
    format!(
        "Prediction: {}\nConfidence: {:?}%",
        diagnosis.name, diagnosis.prediction.confidence
    )
}
