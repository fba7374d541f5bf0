use crate::classifier_app::core::ThemeMode;
use eframe::egui::Color32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub main: Color32,
    pub container: Color32,
    pub accent: Color32,
    pub subtle: Color32,
    pub button_text: Color32,
    pub loader_background: Color32,
    pub loader_dots: Color32,
    pub upload_button: Color32,
    pub error: Color32,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self {
                main: Color32::from_rgb(0x1E, 0x2A, 0x38),
                container: Color32::from_rgb(0x3A, 0x61, 0x7E),
                accent: Color32::from_rgb(0x00, 0xFF, 0xAA),
                subtle: Color32::from_rgb(0xB0, 0xE0, 0xE6),
                button_text: Color32::WHITE,
                ..Self::shared()
            },
            ThemeMode::Light => Self {
                main: Color32::from_rgb(0xF0, 0xF0, 0xF0),
                container: Color32::WHITE,
                accent: Color32::from_rgb(0x22, 0x22, 0x22),
                subtle: Color32::from_rgb(0x44, 0x44, 0x44),
                button_text: Color32::BLACK,
                ..Self::shared()
            },
        }
    }

    fn shared() -> Self {
        Self {
            main: Color32::BLACK,
            container: Color32::BLACK,
            accent: Color32::WHITE,
            subtle: Color32::WHITE,
            button_text: Color32::WHITE,
            loader_background: Color32::from_rgb(0x01, 0x08, 0x1D),
            loader_dots: Color32::from_rgb(0x00, 0xFF, 0xAA),
            upload_button: Color32::from_rgb(0x4C, 0xAF, 0x50),
            error: Color32::from_rgb(0xFF, 0x6B, 0x6B),
        }
    }
}
