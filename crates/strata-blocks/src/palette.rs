use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::types::BlockType;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Result<Rgb, Box<dyn Error>> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("invalid color '{s}': expected #RRGGBB").into());
        }
        let r = u8::from_str_radix(&hex[0..2], 16)?;
        let g = u8::from_str_radix(&hex[2..4], 16)?;
        let b = u8::from_str_radix(&hex[4..6], 16)?;
        Ok(Rgb(r, g, b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Flat color or a vertical two-band gradient (top band above `split`, in 0..1 from the top).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Swatch {
    Color(Rgb),
    Gradient { top: Rgb, bottom: Rgb, split: f32 },
}

impl Swatch {
    /// Color at vertical fraction `t` (0 = top edge, 1 = bottom edge).
    pub fn color_at(&self, t: f32) -> Rgb {
        match *self {
            Swatch::Color(c) => c,
            Swatch::Gradient { top, bottom, split } => {
                if t < split {
                    top
                } else {
                    bottom
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlockInfo {
    pub name: &'static str,
    pub swatch: Swatch,
    pub opacity: f32,
}

#[derive(Clone, Debug)]
pub struct Palette {
    entries: Vec<BlockInfo>,
}

impl Default for Palette {
    fn default() -> Self {
        let entries = BlockType::ALL
            .into_iter()
            .map(|b| BlockInfo {
                name: b.name(),
                swatch: default_swatch(b),
                opacity: if b.is_liquid() { 0.6 } else { 1.0 },
            })
            .collect();
        Self { entries }
    }
}

fn default_swatch(b: BlockType) -> Swatch {
    match b {
        BlockType::Dirt => Swatch::Color(Rgb(0x8B, 0x73, 0x55)),
        BlockType::Grass => Swatch::Gradient {
            top: Rgb(0x22, 0x8B, 0x22),
            bottom: Rgb(0x8B, 0x73, 0x55),
            split: 0.7,
        },
        BlockType::Stone => Swatch::Color(Rgb(0x80, 0x80, 0x80)),
        BlockType::Wood => Swatch::Color(Rgb(0x8B, 0x45, 0x13)),
        BlockType::Sand => Swatch::Color(Rgb(0xFF, 0xD7, 0x00)),
        BlockType::Water => Swatch::Color(Rgb(0x41, 0x69, 0xE1)),
        BlockType::Snow => Swatch::Color(Rgb(0xFF, 0xFF, 0xFF)),
        BlockType::DarkGrass => Swatch::Color(Rgb(0x2F, 0x4F, 0x2F)),
    }
}

impl Palette {
    #[inline]
    pub fn get(&self, b: BlockType) -> &BlockInfo {
        &self.entries[b.index()]
    }

    /// Default palette with the swatches named in `toml_str` replaced.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: PaletteConfig = toml::from_str(toml_str)?;
        let mut palette = Palette::default();
        // Sort by kind so the first reported error is stable across runs.
        let mut entries: Vec<(BlockType, SwatchEntry)> = cfg.blocks.into_iter().collect();
        entries.sort_by_key(|(b, _)| *b);
        for (b, entry) in entries {
            let swatch = match entry {
                SwatchEntry::Hex(s) => Swatch::Color(Rgb::from_hex(&s)?),
                SwatchEntry::Gradient { top, bottom, split } => Swatch::Gradient {
                    top: Rgb::from_hex(&top)?,
                    bottom: Rgb::from_hex(&bottom)?,
                    split: split.unwrap_or(0.5).clamp(0.0, 1.0),
                },
            };
            palette.entries[b.index()].swatch = swatch;
        }
        Ok(palette)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

// --- Config ---

#[derive(Deserialize)]
struct PaletteConfig {
    #[serde(default)]
    blocks: HashMap<BlockType, SwatchEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SwatchEntry {
    // Simple: dirt = "#8B7355"
    Hex(String),
    // Banded: grass = { top = "#228B22", bottom = "#8B7355", split = 0.7 }
    Gradient {
        top: String,
        bottom: String,
        split: Option<f32>,
    },
}
