use std::{fs, path::Path};

use anyhow::{Context, Result};
use landers_system_formation as formation;
use landers_system_projectile_director as director;
use landers_system_surveyor as surveyor;
use serde::Deserialize;

/// Complete tuning surface of a headless session, loaded from TOML.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) formation: formation::Config,
    pub(crate) director: director::Config,
    pub(crate) surveyor: surveyor::Config,
    pub(crate) session: SessionConfig,
}

/// Behaviour of the stand-in services and the scripted player.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct SessionConfig {
    /// Seconds between shot-clock ticks.
    pub(crate) shot_interval: f32,
    /// Number of handler ids the shot clock rotates between.
    pub(crate) handler_count: u32,
    /// Frames between scripted kills; zero disables them.
    pub(crate) kill_every: u32,
    /// Frames between scripted bounces; zero disables them.
    pub(crate) bounce_every: u32,
    /// Frames between scripted surveyor hits; zero disables them.
    pub(crate) surveyor_every: u32,
    /// Seed of the scripted player and the shot clock.
    pub(crate) seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            shot_interval: 0.75,
            handler_count: 1,
            kill_every: 20,
            bounce_every: 400,
            surveyor_every: 0,
            seed: 0x1a4d_e25e_55e0_0001,
        }
    }
}

impl Settings {
    /// Reads and validates settings from the TOML file at `path`.
    pub(crate) fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid settings in {}", path.display()))
    }

    /// Parses and validates settings from TOML text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let settings: Self = toml::from_str(contents).context("failed to parse settings toml")?;
        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.formation
            .validate()
            .context("invalid [formation] section")?;
        self.director.validate().context("invalid [director] section")?;
        anyhow::ensure!(
            self.session.shot_interval.is_finite() && self.session.shot_interval > 0.0,
            "[session] shot_interval must be positive, got {}",
            self.session.shot_interval
        );
        anyhow::ensure!(
            self.session.handler_count > 0,
            "[session] handler_count must be at least 1"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let settings = Settings::parse("").expect("defaults are valid");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn sections_override_defaults() {
        let settings = Settings::parse(
            r#"
            [formation]
            rows = 2
            columns = 4

            [director]
            handler_id = 2
            dwell_min = 1
            dwell_max = 3

            [session]
            handler_count = 3
            kill_every = 0
            "#,
        )
        .expect("valid settings");

        assert_eq!(settings.formation.capacity(), 8);
        assert_eq!(settings.director.handler_id.get(), 2);
        assert_eq!(settings.session.handler_count, 3);
        assert_eq!(settings.session.kill_every, 0);
        assert_eq!(settings.surveyor.points, 1_000);
    }

    #[test]
    fn bundled_sample_is_valid() {
        let settings = Settings::parse(include_str!("../../../landers.toml"))
            .expect("sample settings are valid");
        assert_eq!(settings.session.handler_count, 2);
        assert_eq!(settings.session.surveyor_every, 900);
    }

    #[test]
    fn invalid_sections_are_reported() {
        let error = Settings::parse("[formation]\nrows = 0\n").expect_err("zero rows");
        assert!(format!("{error:#}").contains("[formation]"));

        let error = Settings::parse("[director]\ndwell_min = 9\ndwell_max = 2\n")
            .expect_err("empty dwell range");
        assert!(format!("{error:#}").contains("dwell range"));

        let error = Settings::parse("[session]\nshot_interval = 0.0\n").expect_err("zero interval");
        assert!(format!("{error:#}").contains("shot_interval"));
    }
}
