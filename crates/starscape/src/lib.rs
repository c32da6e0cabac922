pub mod api;
pub mod bridge;
pub mod core;
pub mod extensions;
pub mod game;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod systems;
pub mod texture;

// Re-export key types at crate root for convenience
pub use api::config::{CollectorConfig, SceneConfig};
pub use api::error::{GameError, SceneError, StoreError, TextureError};
pub use api::types::{HostEvent, ResourceId, TargetId, Viewport};
pub use bridge::protocol::{write_commands, FrameLayout, HEADER_FLOATS, PROTOCOL_VERSION};
pub use core::driver::{FrameDriver, FrameStats};
pub use core::resources::{ResourceCommand, ResourceDesc, ResourceKind, ResourceTable};
pub use core::time::FrameClock;
pub use extensions::{format_thousands, AnimatedCounter, Easing};
pub use game::store::{parse_best_score, MemoryStore, ScoreStore};
pub use game::{GameSession, Phase, PlayArea, Target};
pub use input::queue::{InputEvent, InputQueue, InputState};
pub use renderer::camera::PerspectiveCamera;
pub use renderer::instance::{BodyInstance, StreakInstance};
pub use scene::bodies::{Body, BodyKind, BodySpec, BODY_TABLE};
pub use scene::lights::{Light, LightState};
pub use scene::starfield::{twinkle_size, StarCloud};
pub use scene::{MeshHandles, Scene, CLEAR_COLOR};
pub use systems::parallax::{ParallaxRig, PointerOffset};
pub use systems::rng::Rng;
pub use systems::shooting_stars::{ShootingStar, ShootingStarSpawner, SpawnRegion};
pub use texture::{generate as generate_texture, Texture, TextureKind};
