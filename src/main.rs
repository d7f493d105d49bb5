mod acquire;
mod camera;
mod canvas;
mod display;
mod error;
mod picker;
mod rule;
mod settings;

use picker::WindowPointSource;
use settings::Settings;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn main() -> error::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    display::init(eframe::Renderer::Glow);
    let settings = Settings::default();

    let frame = acquire::acquire_frame(&settings)?;

    let mut source = WindowPointSource::new(&settings);
    let mut out = io::stdout().lock();
    let rule_rect = picker::pick_rule_rect(&mut source, &frame, &mut out)?;
    writeln!(out, "{}", rule_rect)?;

    Ok(())
}
