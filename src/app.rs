//! Running a configured script end to end

use rand::rngs::StdRng;
use rand::SeedableRng;

use scenescript_core::{Playhead, Scene, SceneError, SceneStats};

use crate::bootstrap::{self, BootstrapError};
use crate::config::AppConfig;

/// Error running a configured script
#[derive(Debug)]
pub enum AppError {
    Bootstrap(BootstrapError),
    Scene(SceneError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Bootstrap(e) => write!(f, "{}", e),
            AppError::Scene(e) => write!(f, "Script failed: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Bootstrap(e) => Some(e),
            AppError::Scene(e) => Some(e),
        }
    }
}

impl From<BootstrapError> for AppError {
    fn from(e: BootstrapError) -> Self {
        AppError::Bootstrap(e)
    }
}

impl From<SceneError> for AppError {
    fn from(e: SceneError) -> Self {
        AppError::Scene(e)
    }
}

/// Outcome of a replay pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Frames visited
    pub frames: u32,
    /// Frames on which the world changed
    pub world_updates: usize,
    /// Model property-group updates across all frames
    pub model_updates: usize,
}

/// A finished script run
pub struct ScriptRun {
    pub scene: Scene,
    pub stats: SceneStats,
    pub replay: Option<ReplaySummary>,
}

/// Bootstrap, build the scene, run the configured script, then optionally
/// replay and export it
pub fn run(config: &AppConfig) -> Result<ScriptRun, AppError> {
    bootstrap::bootstrap(&config.bootstrap)?;

    let mut scene = Scene::new(config.scene.length, config.assets.to_manifest());
    let mut rng = match config.scene.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let script = config.scene.script.script();
    log::info!("Running '{}' over {} frames", script.name(), scene.length());
    script.run(&mut scene, &mut rng)?;

    let stats = scene.stats();
    log::info!(
        "Committed {} keyframes ({} world) across {} models",
        stats.commits,
        stats.world_keyframes,
        stats.models
    );

    let replay = config.scene.replay.then(|| replay(&mut scene));

    if let Some(path) = &config.scene.output {
        scene.recording().save(path)?;
        log::info!("Saved recording to {}", path);
    }

    Ok(ScriptRun { scene, stats, replay })
}

/// Step a playhead once through the scene, applying every frame
pub fn replay(scene: &mut Scene) -> ReplaySummary {
    let mut playhead = Playhead::new(scene.length());
    let mut summary = ReplaySummary::default();

    loop {
        let frame = playhead.frame();
        let changes = scene.apply_frame(frame);
        if changes.world {
            summary.world_updates += 1;
        }
        summary.model_updates += changes.models.len();
        summary.frames += 1;
        log::trace!("Frame {}: {} models changed", frame, changes.models.len());

        if playhead.tick() == 0 {
            break;
        }
    }

    log::info!(
        "Replayed {} frames over {} models: {} world updates, {} model updates",
        summary.frames,
        scene.model_count(),
        summary.world_updates,
        summary.model_updates
    );
    for (_, model) in scene.models() {
        let keyframes = model.keyframes();
        log::debug!(
            "{}: {} transform keys, {} instance keys, {} faces keyed",
            model.name,
            keyframes.transforms.len(),
            keyframes.as_instance.len(),
            keyframes.modified_faces().count()
        );
    }
    summary
}
