use anyhow::Result;
use serde::Deserialize;

use crate::shrink::ShrinkConfig;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub shrink: ShrinkConfig,
}

impl Config {
    /// Load settings from a TOML file. A missing file falls back to the
    /// defaults, so the tool works without any configuration on disk.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let cfg = Config::load("config/does-not-exist").unwrap();
        assert_eq!(cfg.shrink.max_window_chars, 4000);
        assert_eq!(cfg.shrink.target_segment_count, 20);
    }
}
