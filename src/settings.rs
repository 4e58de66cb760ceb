// config lets you read a separate config file
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::view::TimelineOptions;

pub const DEFAULT_CONFIG: &str = "sparqline";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Address the HTTP server binds to.
    pub listen: String,
    /// Log filter used when `RUST_LOG` is unset.
    pub log: String,
    /// Options every rendered timeline starts from; request options override them.
    #[serde(default)]
    pub timeline_options: TimelineOptions,
}

impl Settings {
    /// Defaults, then the optional config file, then `SPARQLINE_*` environment variables.
    /// The file name can be changed with `SPARQLINE_CONFIG`.
    pub fn load() -> Result<Settings> {
        let path = std::env::var("SPARQLINE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Settings> {
        let settings = Config::builder()
            .set_default("listen", "127.0.0.1:7878")?
            .set_default("log", "info")?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("SPARQLINE").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Configured options with `request` laid over them.
    pub fn timeline_options_with(&self, request: Option<&TimelineOptions>) -> TimelineOptions {
        let mut options = self.timeline_options.clone();
        if let Some(request) = request {
            for (key, value) in request {
                options.insert(key.clone(), value.clone());
            }
        }
        options
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self { listen: "127.0.0.1:7878".into(), log: "info".into(), timeline_options: TimelineOptions::new() }
    }
}
