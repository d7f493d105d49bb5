use egui::{Color32, Vec2};

pub const INSTRUCTION: &str = "Hey! Select the top and bottom of the rule!";

pub struct Settings {
    // Camera
    pub camera_index: i32,

    // Live preview
    pub preview_title: String,
    pub preview_size: Vec2,
    pub quit_key: char,

    // Endpoint picking
    pub picker_title: String,
    pub picker_size: Vec2,
    pub marker_color: Color32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera_index: 0,
            preview_title: "original".to_string(),
            preview_size: egui::vec2(800.0, 600.0),
            quit_key: 'q',
            picker_title: "pick the rule endpoints".to_string(),
            picker_size: egui::vec2(1280.0, 800.0),
            marker_color: Color32::from_rgb(0, 120, 255),
        }
    }
}
