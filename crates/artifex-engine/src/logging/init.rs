use std::sync::Once;

/// `env_logger` settings.
///
/// `env_filter` uses `env_logger` directive syntax, e.g.
/// `"info,artifex_canvas=debug"`. When unset, `RUST_LOG` is consulted.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: Option<String>) -> Self {
        Self {
            env_filter: filter,
            ..Self::default()
        }
    }

    /// Explicit filter, else `RUST_LOG`, else `None` for the built-in default.
    fn directives(&self) -> Option<String> {
        self.env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .filter(|f| !f.trim().is_empty())
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls do nothing.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        match config.directives() {
            Some(directives) => {
                builder.parse_filters(&directives);
            }
            None => {
                // wgpu internals log every resource at info.
                builder
                    .filter_level(log::LevelFilter::Info)
                    .filter_module("wgpu_core", log::LevelFilter::Warn)
                    .filter_module("wgpu_hal", log::LevelFilter::Warn)
                    .filter_module("naga", log::LevelFilter::Warn);
            }
        }
        builder.write_style(config.write_style);

        // A logger may already be installed (test harness); keep it.
        if builder.try_init().is_ok() {
            log::debug!("logger installed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let cfg = LoggingConfig::with_filter(Some("warn".into()));
        assert_eq!(cfg.directives().as_deref(), Some("warn"));
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::with_filter(Some("trace".into())));
    }
}
