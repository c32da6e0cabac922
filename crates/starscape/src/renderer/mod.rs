pub mod camera;
pub mod instance;

pub use camera::{CameraUniform, PerspectiveCamera};
pub use instance::{BodyInstance, StreakInstance};
