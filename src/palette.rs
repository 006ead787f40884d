//! Shape colours
//!
//! The sketch draws from a fixed seven-colour palette.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Palette colours available to new shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Colour {
    Red,
    Green,
    Blue,
    Orange,
    Yellow,
    Indigo,
    Violet,
}

impl Colour {
    pub const ALL: [Colour; 7] = [
        Colour::Red,
        Colour::Green,
        Colour::Blue,
        Colour::Orange,
        Colour::Yellow,
        Colour::Indigo,
        Colour::Violet,
    ];

    /// Pick a palette colour uniformly at random
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// sRGB-encoded RGBA (CSS colour values) for the vertex buffer
    pub fn rgba(self) -> [f32; 4] {
        match self {
            Colour::Red => [1.0, 0.0, 0.0, 1.0],
            Colour::Green => [0.0, 0.5, 0.0, 1.0],
            Colour::Blue => [0.0, 0.0, 1.0, 1.0],
            Colour::Orange => [1.0, 0.65, 0.0, 1.0],
            Colour::Yellow => [1.0, 1.0, 0.0, 1.0],
            Colour::Indigo => [0.29, 0.0, 0.51, 1.0],
            Colour::Violet => [0.93, 0.51, 0.93, 1.0],
        }
    }
}

/// Colour used for merge preview lines
pub const PREVIEW_LINE: [f32; 4] = [1.0, 1.0, 1.0, 0.5];
