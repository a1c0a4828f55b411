/// Logger initialisation for the terminal viewer
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Once;

use meshview_core::config::LoggingSettings;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "meshview_core=debug"). The terminal is in raw mode while the viewer runs,
/// so `file` redirects output away from stderr.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub file: Option<PathBuf>,
}

impl From<&LoggingSettings> for LoggingConfig {
    fn from(settings: &LoggingSettings) -> Self {
        Self {
            env_filter: settings.filter.clone(),
            file: settings.file.clone(),
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) -> io::Result<()> {
    let mut result = Ok(());
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = &config.env_filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Warn);
        }

        if let Some(path) = &config.file {
            match File::create(path) {
                Ok(file) => {
                    builder.target(env_logger::Target::Pipe(Box::new(file)));
                    builder.write_style(env_logger::WriteStyle::Never);
                }
                Err(e) => {
                    result = Err(e);
                    return;
                }
            }
        }

        builder.init();
        log::debug!("logging initialized");
    });
    result
}
