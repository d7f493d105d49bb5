//! Process-wide choice of the rendering backend used by every window.

use eframe::Renderer;
use once_cell::sync::OnceCell;

static RENDERER: OnceCell<Renderer> = OnceCell::new();

/// Selects the backend. Only the first call has any effect.
pub fn init(renderer: Renderer) -> bool {
    match RENDERER.set(renderer) {
        Ok(()) => {
            tracing::debug!("display backend set to {:?}", renderer);
            true
        }
        Err(_) => {
            tracing::warn!(
                "display backend already set to {:?}, ignoring {:?}",
                renderer_in_use(),
                renderer
            );
            false
        }
    }
}

pub fn renderer_in_use() -> Renderer {
    RENDERER.get().copied().unwrap_or_default()
}

// Blocking window that hands control back on close
pub fn native_options(size: egui::Vec2) -> eframe::NativeOptions {
    eframe::NativeOptions {
        initial_window_size: Some(size),
        min_window_size: Some(egui::vec2(320.0, 240.0)),
        renderer: renderer_in_use(),
        run_and_return: true,
        ..Default::default()
    }
}
