use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use strata_blocks::Palette;
use strata_runtime::MAX_RENDER_DISTANCE;
use strata_world::WorldGenParams;
use strata_world::worldgen::load_params_from_path;

/// Engine settings loaded from TOML. Every field is optional in the file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Chunks loaded in each direction around the player's chunk.
    #[serde(default = "default_render_distance")]
    pub render_distance: i32,
    #[serde(default = "default_rebuild_budget_ms")]
    pub rebuild_budget_ms: f32,
    /// Fixed world seed; a fresh one is picked per session when absent.
    #[serde(default)]
    pub seed: Option<i32>,
    /// Worldgen parameter file, resolved relative to this config's directory.
    #[serde(default)]
    pub worldgen: Option<PathBuf>,
    /// Block color overrides, resolved like `worldgen`.
    #[serde(default)]
    pub palette: Option<PathBuf>,
}
fn default_render_distance() -> i32 {
    3
}
fn default_rebuild_budget_ms() -> f32 {
    4.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_distance: default_render_distance(),
            rebuild_budget_ms: default_rebuild_budget_ms(),
            seed: None,
            worldgen: None,
            palette: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: EngineConfig = toml::from_str(s)?;
        if !(0..=MAX_RENDER_DISTANCE).contains(&cfg.render_distance) {
            return Err(format!(
                "render_distance must be in 0..={MAX_RENDER_DISTANCE}, got {}",
                cfg.render_distance
            )
            .into());
        }
        if !cfg.rebuild_budget_ms.is_finite() || cfg.rebuild_budget_ms < 0.0 {
            return Err(format!("rebuild_budget_ms must be >= 0, got {}", cfg.rebuild_budget_ms).into());
        }
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        let mut cfg = Self::from_toml_str(&s)?;
        if let Some(dir) = path.parent() {
            for p in [&mut cfg.worldgen, &mut cfg.palette].into_iter().flatten() {
                if p.is_relative() {
                    *p = dir.join(&*p);
                }
            }
        }
        Ok(cfg)
    }

    /// Command-line override; out-of-range values are clamped rather than rejected.
    pub fn set_render_distance(&mut self, r: i32) {
        self.render_distance = r.clamp(0, MAX_RENDER_DISTANCE);
    }

    pub fn rebuild_budget(&self) -> Duration {
        Duration::from_micros((self.rebuild_budget_ms.max(0.0) * 1000.0).round() as u64)
    }

    /// Worldgen parameters from the referenced file, or the built-in defaults.
    pub fn worldgen_params(&self) -> Result<WorldGenParams, Box<dyn Error>> {
        match &self.worldgen {
            Some(path) => load_params_from_path(path),
            None => Ok(WorldGenParams::default()),
        }
    }

    pub fn palette(&self) -> Result<Palette, Box<dyn Error>> {
        match &self.palette {
            Some(path) => Palette::from_path(path),
            None => Ok(Palette::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.rebuild_budget(), Duration::from_millis(4));
    }

    #[test]
    fn fields_override_defaults() {
        let cfg = EngineConfig::from_toml_str(
            "render_distance = 1\nrebuild_budget_ms = 8.0\nseed = 42\nworldgen = \"wg.toml\"\npalette = \"colors.toml\"\n",
        )
        .unwrap();
        assert_eq!(cfg.render_distance, 1);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.worldgen, Some(PathBuf::from("wg.toml")));
        assert_eq!(cfg.palette, Some(PathBuf::from("colors.toml")));
        assert_eq!(cfg.rebuild_budget(), Duration::from_millis(8));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(EngineConfig::from_toml_str("render_distance = -1").is_err());
        assert!(EngineConfig::from_toml_str("render_distance = 1000").is_err());
        assert!(EngineConfig::from_toml_str("render_distance = 2147483647").is_err());
        assert!(EngineConfig::from_toml_str("rebuild_budget_ms = -2.0").is_err());
        assert!(EngineConfig::from_toml_str("seed = \"abc\"").is_err());
    }

    #[test]
    fn missing_worldgen_falls_back_to_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.worldgen_params().unwrap(), WorldGenParams::default());
        let bad = EngineConfig {
            worldgen: Some(PathBuf::from("/nonexistent/strata-worldgen.toml")),
            ..EngineConfig::default()
        };
        assert!(bad.worldgen_params().is_err());
    }

    #[test]
    fn render_distance_override_is_clamped() {
        let mut cfg = EngineConfig::default();
        cfg.set_render_distance(i32::MAX);
        assert_eq!(cfg.render_distance, MAX_RENDER_DISTANCE);
        cfg.set_render_distance(-5);
        assert_eq!(cfg.render_distance, 0);
        cfg.set_render_distance(7);
        assert_eq!(cfg.render_distance, 7);
        let at_cap = format!("render_distance = {MAX_RENDER_DISTANCE}");
        assert_eq!(EngineConfig::from_toml_str(&at_cap).unwrap().render_distance, MAX_RENDER_DISTANCE);
    }
}
