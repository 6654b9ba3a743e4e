mod capture;
mod frame;
#[cfg(test)]
mod mock;
mod output;
mod session;

use anyhow::{Context, Result};
use capture::{ColorMode, WebcamCapture};
use clap::Parser;
use output::WindowDisplay;
use session::SessionConfig;
use std::io;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera device index
    #[arg(default_value_t = 0)]
    device: u32,

    /// Title of the preview window
    #[arg(long, default_value = "Live")]
    window: String,

    /// Milliseconds to wait for a key press after each frame
    #[arg(long, default_value_t = 5)]
    wait_ms: u64,

    /// Capture single-channel luma frames instead of RGB
    #[arg(long)]
    gray: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            device: self.device,
            window: self.window.clone(),
            key_wait: Duration::from_millis(self.wait_ms),
        }
    }

    fn color_mode(&self) -> ColorMode {
        if self.gray {
            ColorMode::Gray
        } else {
            ColorMode::Rgb
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Stdout carries the user-facing lines only.
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    tracing::info!("Camview starting");
    tracing::info!("Device: {}", args.device);
    tracing::info!("Key wait: {}ms", args.wait_ms);

    let config = args.session_config();
    let mode = args.color_mode();
    let mut display = WindowDisplay::new();

    let termination = session::run(
        &config,
        |index| WebcamCapture::open(index, mode),
        &mut display,
        &mut io::stdout(),
        &mut io::stderr(),
    )
    .context("Capture session failed")?;

    drop(display);
    std::process::exit(termination.exit_code());
}
