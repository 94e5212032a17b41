//! Heartwise: Heart disease prediction from a clinical form.
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use heartwise::adapters::sanitize::SanitizingMakeWriter;
use heartwise::config::{LogMode, Settings};
use heartwise::tui::App;

fn main() -> Result<()> {
    let settings = Settings::from_env()?;

    // Writing logs to the terminal would corrupt the TUI (alternate screen).
    // auto: file when stdout is a TTY, stdout otherwise.
    let use_file = match settings.log_mode {
        LogMode::File => true,
        LogMode::Stdout => false,
        LogMode::Auto => std::io::stdout().is_terminal(),
    };

    let (writer, _guard) = if use_file {
        if let Some(parent) = settings.log_file.parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&settings.log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!(
        "Starting Heartwise (model path {:?}, scaling {:?})...",
        settings.model_path,
        settings.scaling
    );

    let mut app = App::new(&settings)?;
    app.run()?;

    tracing::info!("Heartwise shutdown complete.");
    Ok(())
}
