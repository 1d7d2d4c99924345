//! Scene scripts for a keyframed 3D scene engine
//!
//! - [`config`] - Layered TOML/env configuration
//! - [`bootstrap`] - Engine environment variables
//! - [`scripts`] - The bundled scene scripts
//! - [`run`] - Build a scene from a config, run its script, and export it

pub mod bootstrap;
pub mod config;
pub mod scripts;

mod app;

pub use app::{replay, run, AppError, ReplaySummary, ScriptRun};
