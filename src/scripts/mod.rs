//! Scene scripts
//!
//! A script builds a scene by creating models and committing keyframes for
//! every frame of the scene's length. Scripts draw all their randomness from
//! the RNG they are handed, so a seeded RNG reproduces a run exactly.

mod buildings;
mod preview;
mod rotating_wall;

pub use buildings::Buildings;
pub use preview::Preview;
pub use rotating_wall::RotatingWall;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use scenescript_core::{Scene, SceneError};

/// A procedural scene script
pub trait SceneScript {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Populate `scene`, committing keyframes over its whole length
    fn run(&self, scene: &mut Scene, rng: &mut dyn RngCore) -> Result<(), SceneError>;
}

/// Selects one of the bundled scripts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptKind {
    #[default]
    Buildings,
    RotatingWall,
    Preview,
}

impl ScriptKind {
    /// Instantiate the script
    pub fn script(self) -> Box<dyn SceneScript> {
        match self {
            ScriptKind::Buildings => Box::new(Buildings),
            ScriptKind::RotatingWall => Box::new(RotatingWall),
            ScriptKind::Preview => Box::new(Preview),
        }
    }
}

impl FromStr for ScriptKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buildings" => Ok(ScriptKind::Buildings),
            "rotating_wall" | "wall" => Ok(ScriptKind::RotatingWall),
            "preview" => Ok(ScriptKind::Preview),
            other => Err(format!("unknown script '{}'", other)),
        }
    }
}
