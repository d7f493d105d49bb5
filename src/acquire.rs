use crate::camera::{FrameSource, OpenCvCamera};
use crate::canvas::Canvas;
use crate::display;
use crate::error::{Error, Result};
use crate::rule::Frame;
use crate::settings::Settings;
use egui::{Color32, Context, Rect, TextureHandle, TextureOptions};
use std::cell::RefCell;
use std::rc::Rc;

type Outcome = Rc<RefCell<Option<Result<Frame>>>>;

#[derive(Debug, PartialEq)]
pub enum Step {
    // A new frame was fetched and is available through `latest`
    Continue,
    Done(Frame),
}

pub struct Acquisition<S: FrameSource> {
    source: Option<S>,
    latest: Option<Frame>,
    fetched: usize,
}

impl<S: FrameSource> Acquisition<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Some(source),
            latest: None,
            fetched: 0,
        }
    }

    /// Runs one repaint of the preview loop. `quit` is whether the quit key
    /// was typed while the latest frame was on screen; it is ignored until a
    /// frame has been shown. Ending, either way, drops the source.
    pub fn step(&mut self, quit: bool) -> Result<Step> {
        if quit {
            if let Some(frame) = self.latest.take() {
                self.release();
                return Ok(Step::Done(frame));
            }
        }

        let source = self.source.as_mut().ok_or(Error::AcquisitionAborted)?;
        match source.next_frame() {
            Ok(frame) => {
                self.fetched += 1;
                if self.fetched == 1 {
                    tracing::info!("First frame is {}x{}", frame.width(), frame.height());
                }
                self.latest = Some(frame);
                Ok(Step::Continue)
            }
            Err(err) => {
                tracing::error!("Stopping preview after {} frames: {}", self.fetched, err);
                self.latest = None;
                self.release();
                Err(err)
            }
        }
    }

    pub fn latest(&self) -> Option<&Frame> {
        self.latest.as_ref()
    }

    pub fn fetched(&self) -> usize {
        self.fetched
    }

    pub fn is_released(&self) -> bool {
        self.source.is_none()
    }

    fn release(&mut self) {
        if self.source.take().is_some() {
            tracing::debug!("Released frame source after {} frames", self.fetched);
        }
    }
}

/// True when the typed text of this repaint contains the quit character.
/// Text events keep the case, so `Q` does not match `q`.
pub fn quit_requested(events: &[egui::Event], quit_key: char) -> bool {
    events.iter().any(|event| match event {
        egui::Event::Text(text) => text.chars().any(|c| c == quit_key),
        _ => false,
    })
}

// An empty slot means the window was closed before a frame was chosen
fn take_outcome(outcome: &Outcome) -> Result<Frame> {
    let result = outcome.borrow_mut().take();
    result.unwrap_or(Err(Error::AcquisitionAborted))
}

struct PreviewApp<S: FrameSource> {
    acquisition: Acquisition<S>,
    texture: Option<TextureHandle>,
    quit_key: char,
    outcome: Outcome,
}

impl<S: FrameSource> PreviewApp<S> {
    fn new(acquisition: Acquisition<S>, quit_key: char, outcome: Outcome) -> Self {
        Self {
            acquisition,
            texture: None,
            quit_key,
            outcome,
        }
    }

    fn close_with(&mut self, result: Result<Frame>, frame: &mut eframe::Frame) {
        *self.outcome.borrow_mut() = Some(result);
        frame.close();
    }

    fn upload(&mut self, ctx: &Context, image: egui::ColorImage) {
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::default()),
            None => {
                let texture = ctx.load_texture("preview", image, TextureOptions::default());
                self.texture = Some(texture);
            }
        }
    }
}

impl<S: FrameSource> eframe::App for PreviewApp<S> {
    fn update(&mut self, ctx: &Context, frame: &mut eframe::Frame) {
        if self.acquisition.is_released() {
            return;
        }

        let quit = ctx.input(|i| quit_requested(&i.events, self.quit_key));
        match self.acquisition.step(quit) {
            Ok(Step::Continue) => {}
            Ok(Step::Done(latest)) => {
                self.close_with(Ok(latest), frame);
                return;
            }
            Err(err) => {
                self.close_with(Err(err), frame);
                return;
            }
        }

        let Some(image) = self.acquisition.latest().map(Frame::to_color_image) else {
            return;
        };
        let canvas = Canvas::new(image.size[0] as f32, image.size[1] as f32);
        self.upload(ctx, image);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Live Preview");
                ui.separator();
                ui.label(format!("Press '{}' to use the current frame", self.quit_key));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::hover());
            if let Some(texture) = &self.texture {
                let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                let rect = canvas.get_screen_rect(response.rect);
                painter.image(texture.id(), rect, uv, Color32::WHITE);
            }
        });

        ctx.request_repaint();
    }
}

/// Shows the live camera feed until the quit key is typed and returns the
/// frame on screen at that moment. The camera is released and the window
/// closed before this returns.
pub fn acquire_frame(settings: &Settings) -> Result<Frame> {
    let camera = OpenCvCamera::open(settings.camera_index)?;
    let outcome: Outcome = Rc::new(RefCell::new(None));
    let app_outcome = Rc::clone(&outcome);
    let quit_key = settings.quit_key;

    eframe::run_native(
        &settings.preview_title,
        display::native_options(settings.preview_size),
        Box::new(move |_cc| {
            let acquisition = Acquisition::new(camera);
            Box::new(PreviewApp::new(acquisition, quit_key, app_outcome))
        }),
    )?;

    take_outcome(&outcome)
}
