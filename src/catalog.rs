//! Static style and mode catalog.
//!
//! Each style maps a user-facing label to the English descriptor fragment the
//! vision backend is told to write its prompt in. The fragments are tuned for
//! the flux renderer and are embedded verbatim into the instruction text.

use crate::error::{Result, SketchError};

/// Visual style for the regenerated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// 3D animated film look (glossy render, studio lighting).
    PixarFilm,
    /// Hand-drawn anime look.
    GhibliAnime,
    /// Plastic brick toy world.
    LegoBricks,
    /// Needle-felted craft look.
    FeltCraft,
}

impl Style {
    /// All catalog entries, in display order.
    pub fn all() -> &'static [Style] {
        &[
            Style::PixarFilm,
            Style::GhibliAnime,
            Style::LegoBricks,
            Style::FeltCraft,
        ]
    }

    /// User-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Style::PixarFilm => "3D animated film",
            Style::GhibliAnime => "Ghibli anime",
            Style::LegoBricks => "Lego bricks",
            Style::FeltCraft => "Felt toy",
        }
    }

    /// English style descriptor embedded verbatim into the instruction.
    pub fn descriptor(&self) -> &'static str {
        match self {
            Style::PixarFilm => {
                "3D Disney Pixar style render, C4D, octane render, cute, glossy texture, \
                 soft studio lighting, vivid colors, 8k"
            }
            Style::GhibliAnime => {
                "Studio Ghibli anime style, Hayao Miyazaki, vibrant colors, detailed \
                 background, hand-drawn feel"
            }
            Style::LegoBricks => {
                "lego bricks style, 3d render, plastic texture, toy world, macro \
                 photography, tilt-shift"
            }
            Style::FeltCraft => {
                "felt texture, needle felting style, fuzzy, soft, craft, stop motion \
                 animation style"
            }
        }
    }

    /// Parse a label (case-insensitive) back into a catalog entry.
    pub fn parse(label: &str) -> Result<Self> {
        let normalized = label.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|s| s.label().to_lowercase() == normalized)
            .ok_or_else(|| SketchError::ConfigError(format!("unknown style '{}'", label)))
    }
}

/// Output mode: one repainted image, or a four-panel comic strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Single-image enhancement of the sketch.
    SingleImage,
    /// Four-panel comic featuring the sketched character.
    ComicStrip,
}

impl Mode {
    /// All modes, in display order.
    pub fn all() -> &'static [Mode] {
        &[Mode::SingleImage, Mode::ComicStrip]
    }

    /// User-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::SingleImage => "Single-image repaint",
            Mode::ComicStrip => "Four-panel comic",
        }
    }

    /// Parse a label (case-insensitive) back into a mode.
    pub fn parse(label: &str) -> Result<Self> {
        let normalized = label.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|m| m.label().to_lowercase() == normalized)
            .ok_or_else(|| SketchError::ConfigError(format!("unknown mode '{}'", label)))
    }
}
