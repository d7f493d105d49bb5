use crate::canvas::Canvas;
use crate::display;
use crate::error::Result;
use crate::rule::{Frame, Point, RuleRect};
use crate::settings::{Settings, INSTRUCTION};
use egui::{Color32, Context, Stroke};
use egui_extras::RetainedImage;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

const CLICKS_PER_PICK: usize = 2;

/// Shows a frame and collects clicks on it, in image pixel coordinates.
pub trait PointSource {
    /// Blocks until `count` clicks are registered or the user gives up.
    /// Giving up yields whatever was clicked so far, possibly nothing.
    fn collect(&mut self, frame: &Frame, count: usize) -> Result<Vec<Point>>;
}

/// Asks for the two ends of the ruler until the user provides them.
///
/// Attempts with fewer than two clicks print an instruction to `out` and are
/// repeated. Extra clicks beyond the first two are ignored.
pub fn pick_rule_rect<P, W>(source: &mut P, frame: &Frame, out: &mut W) -> Result<RuleRect>
where
    P: PointSource + ?Sized,
    W: Write + ?Sized,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        let clicks = source.collect(frame, CLICKS_PER_PICK)?;

        match clicks.as_slice() {
            [top, bottom, rest @ ..] => {
                if !rest.is_empty() {
                    tracing::warn!("Ignoring {} extra clicks", rest.len());
                }
                let rect = RuleRect::from_clicks(*top, *bottom);
                tracing::debug!(
                    "Attempt {} picked top {} and bottom {}",
                    attempt,
                    rect.top(),
                    rect.bottom()
                );
                return Ok(rect);
            }
            partial => {
                let missing = CLICKS_PER_PICK - partial.len();
                tracing::info!("Attempt {} ended {} clicks short", attempt, missing);
                writeln!(out, "{}", INSTRUCTION)?;
            }
        }
    }
}

pub struct WindowPointSource {
    title: String,
    size: egui::Vec2,
    marker_color: Color32,
}

impl WindowPointSource {
    pub fn new(settings: &Settings) -> Self {
        Self {
            title: settings.picker_title.clone(),
            size: settings.picker_size,
            marker_color: settings.marker_color,
        }
    }
}

impl PointSource for WindowPointSource {
    fn collect(&mut self, frame: &Frame, count: usize) -> Result<Vec<Point>> {
        let clicks = Rc::new(RefCell::new(Vec::new()));
        let app = PickerApp::new(frame, count, self.marker_color, Rc::clone(&clicks));

        eframe::run_native(
            &self.title,
            display::native_options(self.size),
            Box::new(move |_cc| Box::new(app)),
        )?;

        let points = clicks.take();
        Ok(points)
    }
}

const CROSSHAIR_ARM: f32 = 10.0;

fn crosshair_segments(center: egui::Pos2) -> [[egui::Pos2; 2]; 2] {
    let horizontal = egui::vec2(CROSSHAIR_ARM, 0.0);
    let vertical = egui::vec2(0.0, CROSSHAIR_ARM);
    [
        [center - horizontal, center + horizontal],
        [center - vertical, center + vertical],
    ]
}

fn draw_crosshair(painter: &egui::Painter, center: egui::Pos2) {
    let stroke = Stroke::new(1.0, Color32::RED);
    for segment in crosshair_segments(center) {
        painter.line_segment(segment, stroke);
    }
}

struct PickerApp {
    image: RetainedImage,
    canvas: Canvas,
    wanted: usize,
    marker_color: Color32,
    clicks: Rc<RefCell<Vec<Point>>>,
}

impl PickerApp {
    fn new(
        frame: &Frame,
        wanted: usize,
        marker_color: Color32,
        clicks: Rc<RefCell<Vec<Point>>>,
    ) -> Self {
        Self {
            image: RetainedImage::from_color_image("frame", frame.to_color_image()),
            canvas: Canvas::new(frame.width() as f32, frame.height() as f32),
            wanted,
            marker_color,
            clicks,
        }
    }

    fn draw_canvas(&self, ui: &mut egui::Ui) -> egui::Response {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click());
        let view_rect = response.rect;
        painter.rect_filled(view_rect, 0.0, Color32::from_rgb(20, 20, 20));

        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        painter.image(
            self.image.texture_id(ui.ctx()),
            self.canvas.get_screen_rect(view_rect),
            uv,
            Color32::WHITE,
        );

        for point in self.clicks.borrow().iter() {
            let image_pos = egui::pos2(point.x, point.y);
            let screen_pos = self.canvas.canvas_to_screen_pos(image_pos, view_rect);
            painter.circle_filled(screen_pos, 5.0, self.marker_color);
            painter.text(
                screen_pos + egui::vec2(10.0, 0.0),
                egui::Align2::LEFT_CENTER,
                point.to_string(),
                egui::FontId::default(),
                Color32::WHITE,
            );
        }

        if let Some(mouse_pos) = response.hover_pos() {
            draw_crosshair(&painter, mouse_pos);
        }

        response
    }

    fn handle_click(&mut self, response: &egui::Response) {
        if !response.clicked() {
            return;
        }
        if let Some(pos) = response.interact_pointer_pos() {
            let image_pos = self.canvas.screen_to_canvas_pos(pos, response.rect);
            let point = Point::from(image_pos);
            tracing::debug!("Click at {}", point);
            self.clicks.borrow_mut().push(point);
        }
    }
}

impl eframe::App for PickerApp {
    fn update(&mut self, ctx: &Context, frame: &mut eframe::Frame) {
        let registered = self.clicks.borrow().len();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Pick Rule Endpoints");
                ui.separator();
                ui.label(format!(
                    "Click the top and the bottom of the rule ({}/{})",
                    registered, self.wanted
                ));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let response = self.draw_canvas(ui);
            self.handle_click(&response);
        });

        if self.clicks.borrow().len() >= self.wanted {
            frame.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::collections::VecDeque;

    struct ScriptedClicks {
        attempts: VecDeque<Vec<Point>>,
        requested: Vec<usize>,
    }

    impl ScriptedClicks {
        fn new(attempts: Vec<Vec<(f32, f32)>>) -> Self {
            let attempts = attempts
                .into_iter()
                .map(|clicks| clicks.into_iter().map(|(x, y)| Point::new(x, y)).collect())
                .collect();
            Self {
                attempts,
                requested: Vec::new(),
            }
        }
    }

    impl PointSource for ScriptedClicks {
        fn collect(&mut self, _frame: &Frame, count: usize) -> Result<Vec<Point>> {
            self.requested.push(count);
            Ok(self.attempts.pop_front().expect("picker asked for more attempts than scripted"))
        }
    }

    fn still() -> Frame {
        Frame::new(RgbImage::new(320, 240)).unwrap()
    }

    fn output_lines(out: &[u8]) -> Vec<String> {
        String::from_utf8(out.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_prints_top_then_bottom() {
        let mut source = ScriptedClicks::new(vec![vec![(100.0, 200.0), (100.0, 50.0)]]);
        let mut out = Vec::new();

        let rect = pick_rule_rect(&mut source, &still(), &mut out).unwrap();

        assert_eq!(rect.to_string(), "top: (100.0, 50.0), bottom: (100.0, 200.0)");
        assert!(out.is_empty());
        assert_eq!(source.requested, vec![2]);
    }

    #[test]
    fn test_retries_after_empty_attempts() {
        let mut source = ScriptedClicks::new(vec![vec![], vec![], vec![(10.0, 50.0), (20.0, 5.0)]]);
        let mut out = Vec::new();

        let rect = pick_rule_rect(&mut source, &still(), &mut out).unwrap();

        assert_eq!(rect.top(), Point::new(20.0, 5.0));
        assert_eq!(rect.bottom(), Point::new(10.0, 50.0));
        assert_eq!(output_lines(&out), vec![INSTRUCTION, INSTRUCTION]);
        assert!(source.attempts.is_empty());
    }

    #[test]
    fn test_single_click_is_retried() {
        let mut source =
            ScriptedClicks::new(vec![vec![(5.0, 5.0)], vec![(10.0, 5.0), (20.0, 50.0)]]);
        let mut out = Vec::new();

        let rect = pick_rule_rect(&mut source, &still(), &mut out).unwrap();

        assert_eq!(rect.top(), Point::new(10.0, 5.0));
        assert_eq!(rect.bottom(), Point::new(20.0, 50.0));
        assert_eq!(output_lines(&out), vec![INSTRUCTION]);
    }

    #[test]
    fn test_extra_clicks_are_ignored() {
        let mut source = ScriptedClicks::new(vec![vec![(1.0, 9.0), (2.0, 3.0), (3.0, 1.0)]]);
        let mut out = Vec::new();

        let rect = pick_rule_rect(&mut source, &still(), &mut out).unwrap();

        assert_eq!(rect.top(), Point::new(2.0, 3.0));
        assert_eq!(rect.bottom(), Point::new(1.0, 9.0));
        assert!(out.is_empty());
    }

    #[test]
    fn test_clicks_outside_the_image_are_kept() {
        let mut source = ScriptedClicks::new(vec![vec![(-15.0, 400.0), (500.0, -2.0)]]);
        let mut out = Vec::new();

        let rect = pick_rule_rect(&mut source, &still(), &mut out).unwrap();

        assert_eq!(rect.top(), Point::new(500.0, -2.0));
        assert_eq!(rect.bottom(), Point::new(-15.0, 400.0));
    }

    #[test]
    fn test_crosshair_is_centered_on_pointer() {
        let center = egui::pos2(40.0, 25.0);
        let [horizontal, vertical] = crosshair_segments(center);

        assert_eq!(horizontal, [egui::pos2(30.0, 25.0), egui::pos2(50.0, 25.0)]);
        assert_eq!(vertical, [egui::pos2(40.0, 15.0), egui::pos2(40.0, 35.0)]);
    }
}
