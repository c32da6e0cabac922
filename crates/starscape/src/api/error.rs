use thiserror::Error;

use crate::game::Phase;

/// Failure to obtain a 2D drawing surface for a procedural texture.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextureError {
    #[error("drawing surface {width}x{height} has no pixels")]
    EmptySurface { width: u32, height: u32 },
    #[error("drawing surface {width}x{height} exceeds the {max}px limit")]
    SurfaceTooLarge { width: u32, height: u32, max: u32 },
}

/// Errors raised by the animated scene.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// Textures are mandatory; the scene cannot be built without them.
    #[error("texture generation failed: {0}")]
    Texture(#[from] TextureError),
    #[error("shooting star limit of {limit} reached")]
    EffectLimit { limit: usize },
    #[error("frame delta {0} is not finite")]
    NonFiniteDelta(f32),
    #[error("scene has been torn down")]
    TornDown,
    #[error("invalid scene config: {0}")]
    Config(&'static str),
}

/// A mini-game operation was requested in a phase that does not allow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("`{op}` is not valid while the game is {phase:?}")]
    WrongPhase { op: &'static str, phase: Phase },
}

/// Failure of the durable key-value store backing the best score.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("storage rejected write to `{key}`: {reason}")]
    Rejected { key: String, reason: String },
}
