use egui::{Pos2, Rect, Vec2};

/// Places an image of fixed pixel size inside a view, scaled to fit and
/// centered, and converts positions between the two.
pub struct Canvas {
    width: f32,
    height: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn get_zoom(&self, view_rect: Rect) -> f32 {
        let zoom_x = view_rect.width() / self.width;
        let zoom_y = view_rect.height() / self.height;
        zoom_x.min(zoom_y)
    }

    pub fn get_screen_rect(&self, view_rect: Rect) -> Rect {
        let size = Vec2::new(self.width, self.height) * self.get_zoom(view_rect);
        Rect::from_center_size(view_rect.center(), size)
    }

    pub fn screen_to_canvas_pos(&self, screen_pos: Pos2, view_rect: Rect) -> Pos2 {
        let screen_rect = self.get_screen_rect(view_rect);
        let normalized_pos = (screen_pos - screen_rect.min) / self.get_zoom(view_rect);
        Pos2::new(normalized_pos.x, normalized_pos.y)
    }

    pub fn canvas_to_screen_pos(&self, canvas_pos: Pos2, view_rect: Rect) -> Pos2 {
        let screen_rect = self.get_screen_rect(view_rect);
        screen_rect.min + canvas_pos.to_vec2() * self.get_zoom(view_rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> Rect {
        Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(800.0, 800.0))
    }

    #[test]
    fn test_wide_image_fits_width_and_is_centered() {
        let canvas = Canvas::new(1600.0, 800.0);
        assert_eq!(canvas.get_zoom(view()), 0.5);

        let rect = canvas.get_screen_rect(view());
        assert_eq!(rect.min, Pos2::new(10.0, 220.0));
        assert_eq!(rect.max, Pos2::new(810.0, 620.0));
    }

    #[test]
    fn test_corners_map_to_image_corners() {
        let canvas = Canvas::new(640.0, 480.0);
        let rect = canvas.get_screen_rect(view());

        let top_left = canvas.screen_to_canvas_pos(rect.min, view());
        let bottom_right = canvas.screen_to_canvas_pos(rect.max, view());
        assert!(top_left.distance(Pos2::ZERO) < 1e-3);
        assert!(bottom_right.distance(Pos2::new(640.0, 480.0)) < 1e-3);
    }

    #[test]
    fn test_screen_and_canvas_positions_invert() {
        let canvas = Canvas::new(640.0, 480.0);
        let pos = Pos2::new(100.0, 200.0);
        let screen = canvas.canvas_to_screen_pos(pos, view());
        let back = canvas.screen_to_canvas_pos(screen, view());
        assert!(back.distance(pos) < 1e-3);
    }

    #[test]
    fn test_positions_outside_the_image_are_not_clamped() {
        let canvas = Canvas::new(640.0, 480.0);
        let pos = canvas.screen_to_canvas_pos(Pos2::new(10.0, 20.0), view());
        assert!(pos.y < 0.0);
    }
}
