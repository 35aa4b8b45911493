use std::fmt;

use serde::{Deserialize, Serialize};

/// Which prompt template and sampling temperature a generation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// First draft: energetic template, primitives ignored.
    Raw,
    /// Regeneration: constraints injected from high-weight primitives.
    Optimized,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Raw => "raw",
            GenerationMode::Optimized => "optimized",
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            GenerationMode::Raw => 0.9,
            GenerationMode::Optimized => 0.7,
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
