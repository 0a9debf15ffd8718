use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub height: Height,
    #[serde(default)]
    pub biomes: Biomes,
    #[serde(default)]
    pub surface: Surface,
    #[serde(default)]
    pub trees: Trees,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Height {
    #[serde(default = "default_height_freq")]
    pub frequency: f32,
    #[serde(default = "default_base_height")]
    pub base: f32,
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
}
fn default_height_freq() -> f32 {
    0.02
}
fn default_base_height() -> f32 {
    10.0
}
fn default_amplitude() -> f32 {
    5.0
}
impl Default for Height {
    fn default() -> Self {
        Self {
            frequency: default_height_freq(),
            base: default_base_height(),
            amplitude: default_amplitude(),
        }
    }
}

/// Climate noise and the ordered biome decision thresholds (noise values are in -1..1).
#[derive(Clone, Debug, Deserialize)]
pub struct Biomes {
    #[serde(default = "default_climate_freq")]
    pub frequency: f32,
    #[serde(default = "default_snow_temp_max")]
    pub snow_temp_max: f32,
    #[serde(default = "default_desert_temp_min")]
    pub desert_temp_min: f32,
    #[serde(default = "default_desert_moisture_max")]
    pub desert_moisture_max: f32,
    #[serde(default = "default_plains_moisture_max")]
    pub plains_moisture_max: f32,
    #[serde(default = "default_forest_moisture_min")]
    pub forest_moisture_min: f32,
    #[serde(default = "default_snow_offset")]
    pub snow_height_offset: f32,
    #[serde(default = "default_desert_offset")]
    pub desert_height_offset: f32,
}
fn default_climate_freq() -> f32 {
    0.005
}
fn default_snow_temp_max() -> f32 {
    -0.3
}
fn default_desert_temp_min() -> f32 {
    0.4
}
fn default_desert_moisture_max() -> f32 {
    -0.2
}
fn default_plains_moisture_max() -> f32 {
    -0.3
}
fn default_forest_moisture_min() -> f32 {
    0.3
}
fn default_snow_offset() -> f32 {
    3.0
}
fn default_desert_offset() -> f32 {
    -2.0
}
impl Default for Biomes {
    fn default() -> Self {
        Self {
            frequency: default_climate_freq(),
            snow_temp_max: default_snow_temp_max(),
            desert_temp_min: default_desert_temp_min(),
            desert_moisture_max: default_desert_moisture_max(),
            plains_moisture_max: default_plains_moisture_max(),
            forest_moisture_min: default_forest_moisture_min(),
            snow_height_offset: default_snow_offset(),
            desert_height_offset: default_desert_offset(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Surface {
    #[serde(default = "default_subsoil_depth")]
    pub subsoil_depth: i32,
}
fn default_subsoil_depth() -> i32 {
    3
}
impl Default for Surface {
    fn default() -> Self {
        Self {
            subsoil_depth: default_subsoil_depth(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Trees {
    #[serde(default = "default_tree_prob")]
    pub probability: f32,
    #[serde(default = "default_trunk_height")]
    pub trunk_height: i32,
}
fn default_tree_prob() -> f32 {
    0.03
}
fn default_trunk_height() -> i32 {
    4
}
impl Default for Trees {
    fn default() -> Self {
        Self {
            probability: default_tree_prob(),
            trunk_height: default_trunk_height(),
        }
    }
}

/// Flattened worldgen parameters consumed by the generator.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldGenParams {
    pub height_frequency: f32,
    pub base_height: f32,
    pub height_amplitude: f32,
    pub climate_frequency: f32,
    pub snow_temp_max: f32,
    pub desert_temp_min: f32,
    pub desert_moisture_max: f32,
    pub plains_moisture_max: f32,
    pub forest_moisture_min: f32,
    pub snow_height_offset: f32,
    pub desert_height_offset: f32,
    pub subsoil_depth: i32,
    pub tree_probability: f32,
    pub trunk_height: i32,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default())
    }
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        Self {
            height_frequency: cfg.height.frequency,
            base_height: cfg.height.base,
            height_amplitude: cfg.height.amplitude,
            climate_frequency: cfg.biomes.frequency,
            snow_temp_max: cfg.biomes.snow_temp_max,
            desert_temp_min: cfg.biomes.desert_temp_min,
            desert_moisture_max: cfg.biomes.desert_moisture_max,
            plains_moisture_max: cfg.biomes.plains_moisture_max,
            forest_moisture_min: cfg.biomes.forest_moisture_min,
            snow_height_offset: cfg.biomes.snow_height_offset,
            desert_height_offset: cfg.biomes.desert_height_offset,
            subsoil_depth: cfg.surface.subsoil_depth.max(0),
            tree_probability: cfg.trees.probability.clamp(0.0, 1.0),
            trunk_height: cfg.trees.trunk_height.max(1),
        }
    }
}

pub fn params_from_toml_str(s: &str) -> Result<WorldGenParams, Box<dyn Error>> {
    let cfg: WorldGenConfig = toml::from_str(s)?;
    Ok(WorldGenParams::from_config(&cfg))
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    params_from_toml_str(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let p = params_from_toml_str("").unwrap();
        assert_eq!(p, WorldGenParams::default());
        assert_eq!(p.subsoil_depth, 3);
        assert_eq!(p.trunk_height, 4);
    }

    #[test]
    fn partial_sections_override_single_fields() {
        let p = params_from_toml_str(
            r#"
            [height]
            base = 6.0

            [trees]
            probability = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(p.base_height, 6.0);
        assert_eq!(p.height_amplitude, 5.0);
        assert_eq!(p.tree_probability, 1.0);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(params_from_toml_str("[height\nbase = 1").is_err());
        assert!(params_from_toml_str("[height]\nbase = \"tall\"").is_err());
    }
}
