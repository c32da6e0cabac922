//! The animated backdrop: star cloud, orbiting bodies, nebula shell and
//! shooting stars, plus every graphics resource they own.

pub mod bodies;
pub mod lights;
pub mod starfield;

use serde::Serialize;

use crate::api::config::SceneConfig;
use crate::api::error::SceneError;
use crate::api::types::{ResourceId, Viewport};
use crate::core::resources::{Blending, GeometryDesc, MaterialDesc, ResourceTable, Side};
use crate::renderer::camera::PerspectiveCamera;
use crate::systems::parallax::{ParallaxRig, PointerOffset};
use crate::systems::rng::Rng;
use crate::systems::shooting_stars::{ShootingStar, ShootingStarSpawner};
use crate::texture::{generate, Texture, TextureKind};

use bodies::{wrap_angle, Body, BodyHandles, BodyKind};
use lights::LightState;
use starfield::StarCloud;

pub const CLEAR_COLOR: u32 = 0x000510;

const STAR_POINT_SIZE: f32 = 2.0;

const NEBULA_RADIUS: f32 = 800.0;
const NEBULA_SEGMENTS: u32 = 32;
const NEBULA_OPACITY: f32 = 0.6;
/// Radians per second about y.
const NEBULA_SPIN: f32 = 0.01;

/// Resources shared by a single mesh: geometry, material and its texture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeshHandles {
    pub geometry: ResourceId,
    pub material: ResourceId,
    pub texture: ResourceId,
}

#[derive(Debug, Serialize)]
struct BodyManifest {
    kind: BodyKind,
    size: f32,
    handles: BodyHandles,
}

/// One-shot scene description for the host: handles, lights and camera.
#[derive(Debug, Serialize)]
struct SceneManifest<'a> {
    star_count: usize,
    stars: MeshHandles,
    bodies: Vec<BodyManifest>,
    nebula: MeshHandles,
    streak_texture: ResourceId,
    lights: &'a LightState,
    camera: PerspectiveCamera,
    clear_color: u32,
    pixel_ratio: f32,
}

pub struct Scene {
    config: SceneConfig,
    viewport: Viewport,
    camera: PerspectiveCamera,
    resources: ResourceTable,
    stars: StarCloud,
    star_handles: MeshHandles,
    bodies: Vec<Body>,
    nebula: MeshHandles,
    /// Kept in `[0, 2pi)`.
    nebula_rotation: f32,
    streak_texture: ResourceId,
    shooting_stars: ShootingStarSpawner,
    parallax: ParallaxRig,
    lights: LightState,
    rng: Rng,
    /// Elapsed simulated seconds.
    time: f64,
    torn_down: bool,
}

impl Scene {
    /// Build the full scene for `viewport`.
    ///
    /// Every texture is synthesized before any resource is allocated, so a
    /// texture failure leaves nothing behind.
    pub fn initialize(viewport: Viewport, config: SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;
        let mut rng = Rng::new(config.seed);

        let star_texture = generate(TextureKind::Star, &config, &mut rng)?;
        let planet_textures = BodyKind::ALL
            .iter()
            .map(|&kind| generate(TextureKind::Planet(kind), &config, &mut rng).map(|t| (kind, t)))
            .collect::<Result<Vec<(BodyKind, Texture)>, _>>()?;
        let nebula_texture = generate(TextureKind::Nebula, &config, &mut rng)?;
        let streak_texture = generate(TextureKind::Streak, &config, &mut rng)?;

        let stars = StarCloud::generate(config.star_count, &mut rng);
        let mut resources = ResourceTable::new();

        let texture = resources.create_texture(star_texture);
        let star_handles = MeshHandles {
            geometry: resources.create_geometry(GeometryDesc::Points { count: stars.len() }),
            material: resources.create_material(MaterialDesc::Points {
                map: texture,
                size: STAR_POINT_SIZE,
                blending: Blending::Additive,
                size_attenuation: true,
            }),
            texture,
        };

        let bodies = planet_textures
            .into_iter()
            .map(|(kind, texture)| Body::new(kind, allocate_body(&mut resources, kind, texture)))
            .collect::<Vec<_>>();

        let texture = resources.create_texture(nebula_texture);
        let nebula = MeshHandles {
            geometry: resources.create_geometry(GeometryDesc::Sphere {
                radius: NEBULA_RADIUS,
                segments: NEBULA_SEGMENTS,
            }),
            material: resources.create_material(MaterialDesc::Basic {
                map: Some(texture),
                color: 0xffffff,
                opacity: NEBULA_OPACITY,
                blending: Blending::Normal,
                side: Side::Back,
            }),
            texture,
        };

        let streak_texture = resources.create_texture(streak_texture);
        let mut shooting_stars = ShootingStarSpawner::new(&config, streak_texture);
        shooting_stars.spawn(&mut rng, &mut resources)?;

        let viewport = viewport.with_pixel_ratio(viewport.pixel_ratio.min(config.max_pixel_ratio));
        log::info!(
            "scene initialized: {} stars, {} bodies, {} resources",
            stars.len(),
            bodies.len(),
            resources.live_count()
        );

        Ok(Self {
            camera: PerspectiveCamera::new(viewport.aspect()),
            parallax: ParallaxRig::from_config(&config),
            lights: LightState::backdrop(),
            config,
            viewport,
            resources,
            stars,
            star_handles,
            bodies,
            nebula,
            nebula_rotation: 0.0,
            streak_texture,
            shooting_stars,
            rng,
            time: 0.0,
            torn_down: false,
        })
    }

    /// Track a new viewport size. Only the camera and output size change;
    /// no scene content is reallocated.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), SceneError> {
        if self.torn_down {
            return Err(SceneError::TornDown);
        }
        self.viewport = viewport.with_pixel_ratio(viewport.pixel_ratio.min(self.config.max_pixel_ratio));
        self.camera.set_aspect(self.viewport.aspect());
        Ok(())
    }

    /// Release every resource exactly once. Later calls are no-ops returning 0.
    pub fn teardown(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }
        self.torn_down = true;
        self.shooting_stars.clear();
        self.bodies.clear();
        let released = self.resources.release_all();
        log::info!("scene torn down: {} resources released", released);
        released
    }

    /// Advance the simulation by `delta` seconds.
    ///
    /// The delta is clamped to `[0, max_frame_delta]`. Spawner errors are
    /// returned after the rest of the frame has been applied.
    pub fn tick(&mut self, delta: f32, pointer: PointerOffset) -> Result<(), SceneError> {
        if self.torn_down {
            return Err(SceneError::TornDown);
        }
        if !delta.is_finite() {
            return Err(SceneError::NonFiniteDelta(delta));
        }
        let delta = delta.clamp(0.0, self.config.max_frame_delta);
        self.time += delta as f64;

        self.parallax.step(pointer);
        self.stars.update(self.time);
        for body in &mut self.bodies {
            body.advance(delta);
        }
        self.nebula_rotation = wrap_angle(self.nebula_rotation + delta * NEBULA_SPIN);

        self.shooting_stars.tick(delta, &mut self.rng, &mut self.resources)
    }

    /// Stop spawning new shooting stars; live ones retire on their own.
    pub fn halt_spawning(&mut self) {
        if !self.shooting_stars.is_halted() {
            log::warn!("shooting star spawning halted");
        }
        self.shooting_stars.halt();
    }

    pub fn is_spawning_halted(&self) -> bool {
        self.shooting_stars.is_halted()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn resources(&self) -> &ResourceTable {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceTable {
        &mut self.resources
    }

    pub fn stars(&self) -> &StarCloud {
        &self.stars
    }

    pub fn star_handles(&self) -> MeshHandles {
        self.star_handles
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn nebula_handles(&self) -> MeshHandles {
        self.nebula
    }

    pub fn nebula_rotation(&self) -> f32 {
        self.nebula_rotation
    }

    pub fn streak_texture(&self) -> ResourceId {
        self.streak_texture
    }

    pub fn shooting_stars(&self) -> &[ShootingStar] {
        self.shooting_stars.active()
    }

    pub fn parallax(&self) -> &ParallaxRig {
        &self.parallax
    }

    pub fn lights(&self) -> &LightState {
        &self.lights
    }

    /// Accumulated simulated seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// JSON description of the static scene layout for the host renderer.
    pub fn manifest_json(&self) -> Result<String, serde_json::Error> {
        let manifest = SceneManifest {
            star_count: self.stars.len(),
            stars: self.star_handles,
            bodies: self
                .bodies
                .iter()
                .map(|b| BodyManifest {
                    kind: b.kind,
                    size: b.spec().size,
                    handles: b.handles,
                })
                .collect(),
            nebula: self.nebula,
            streak_texture: self.streak_texture,
            lights: &self.lights,
            camera: self.camera,
            clear_color: CLEAR_COLOR,
            pixel_ratio: self.viewport.pixel_ratio,
        };
        serde_json::to_string(&manifest)
    }
}

fn allocate_body(resources: &mut ResourceTable, kind: BodyKind, texture: Texture) -> BodyHandles {
    let spec = kind.spec();
    let texture = resources.create_texture(texture);
    let geometry = resources.create_geometry(GeometryDesc::Sphere {
        radius: spec.size,
        segments: bodies::SPHERE_SEGMENTS,
    });
    let material = resources.create_material(MaterialDesc::Standard {
        map: texture,
        emissive: spec.emissive,
        emissive_intensity: 0.2,
        metalness: 0.1,
        roughness: 0.8,
    });

    let (ring_geometry, ring_material) = if kind.has_ring() {
        let g = resources.create_geometry(GeometryDesc::Ring {
            inner: spec.size * bodies::RING_INNER_SCALE,
            outer: spec.size * bodies::RING_OUTER_SCALE,
            segments: bodies::RING_SEGMENTS,
        });
        let m = resources.create_material(MaterialDesc::Basic {
            map: None,
            color: bodies::RING_COLOR,
            opacity: bodies::RING_OPACITY,
            blending: Blending::Normal,
            side: Side::Double,
        });
        (Some(g), Some(m))
    } else {
        (None, None)
    };

    BodyHandles {
        geometry,
        material,
        texture,
        ring_geometry,
        ring_material,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::TextureError;
    use crate::core::resources::{ResourceCommand, ResourceKind};

    /// Resources held by a fresh scene: star cloud 3, planets 9 x 3,
    /// Saturn's ring 2, nebula 3, streak texture 1, initial shooting star 2.
    const INITIAL_RESOURCES: usize = 38;

    pub(crate) fn small_config() -> SceneConfig {
        SceneConfig {
            star_count: 120,
            star_texture_size: 16,
            planet_texture_size: 32,
            nebula_texture_size: 32,
            streak_texture_size: [32, 4],
            ..SceneConfig::default()
        }
    }

    fn scene() -> Scene {
        Scene::initialize(Viewport::new(1280.0, 720.0), small_config()).unwrap()
    }

    #[test]
    fn initialize_allocates_one_live_set() {
        let s = scene();
        assert_eq!(s.resources().live_count(), INITIAL_RESOURCES);
        assert_eq!(s.resources().live_count_of(ResourceKind::Texture), 12);
        assert_eq!(s.bodies().len(), 9);
        assert_eq!(s.stars().len(), 120);
        assert_eq!(s.shooting_stars().len(), 1);
        assert_eq!(s.resources().commands().len(), INITIAL_RESOURCES);
    }

    #[test]
    fn only_saturn_gets_ring_handles() {
        let s = scene();
        for b in s.bodies() {
            assert_eq!(b.handles.ring_geometry.is_some(), b.kind == BodyKind::Saturn);
        }
    }

    #[test]
    fn texture_failure_is_fatal_and_allocates_nothing() {
        let config = SceneConfig {
            nebula_texture_size: 0,
            ..small_config()
        };
        let err = Scene::initialize(Viewport::new(800.0, 600.0), config).err();
        assert!(matches!(err, Some(SceneError::Texture(TextureError::EmptySurface { .. }))));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SceneConfig {
            max_shooting_stars: 0,
            ..small_config()
        };
        assert!(matches!(
            Scene::initialize(Viewport::new(800.0, 600.0), config),
            Err(SceneError::Config(_))
        ));
    }

    #[test]
    fn teardown_releases_everything_once() {
        let mut s = scene();
        assert_eq!(s.teardown(), INITIAL_RESOURCES);
        assert_eq!(s.teardown(), 0);
        assert_eq!(s.resources().live_count(), 0);
        assert_eq!(s.resources().released_total(), s.resources().allocated_total());
        let releases = s
            .resources()
            .commands()
            .iter()
            .filter(|c| matches!(c, ResourceCommand::Release(_)))
            .count();
        assert_eq!(releases, INITIAL_RESOURCES);
    }

    #[test]
    fn repeated_mount_cycles_do_not_leak() {
        for cycle in 0..5 {
            let mut s = scene();
            for _ in 0..400 {
                s.tick(1.0 / 60.0, PointerOffset { x: 0.3, y: -0.2 }).unwrap();
            }
            assert!(s.resources().live_count() >= 36, "cycle {cycle}");
            s.teardown();
            assert_eq!(s.resources().live_count(), 0, "cycle {cycle}");
            assert_eq!(s.resources().released_total(), s.resources().allocated_total());
        }
    }

    #[test]
    fn resize_only_touches_camera_and_viewport() {
        let mut s = scene();
        s.resources_mut().drain_commands();
        s.resize(Viewport::new(500.0, 1000.0).with_pixel_ratio(3.0)).unwrap();
        assert!(s.resources().commands().is_empty());
        assert_eq!(s.camera().aspect, 0.5);
        assert_eq!(s.viewport().pixel_ratio, 2.0);
        assert_eq!(s.resources().live_count(), INITIAL_RESOURCES);
    }

    #[test]
    fn tick_after_teardown_is_an_error() {
        let mut s = scene();
        s.teardown();
        assert_eq!(s.tick(0.016, PointerOffset::ORIGIN), Err(SceneError::TornDown));
        assert_eq!(s.resize(Viewport::new(1.0, 1.0)), Err(SceneError::TornDown));
    }

    #[test]
    fn non_finite_delta_is_rejected() {
        let mut s = scene();
        assert!(matches!(
            s.tick(f32::NAN, PointerOffset::ORIGIN),
            Err(SceneError::NonFiniteDelta(_))
        ));
        assert_eq!(s.time(), 0.0);
    }

    #[test]
    fn long_stall_is_clamped() {
        let mut s = scene();
        s.tick(10.0, PointerOffset::ORIGIN).unwrap();
        assert_eq!(s.time(), 0.25);
        s.tick(-1.0, PointerOffset::ORIGIN).unwrap();
        assert_eq!(s.time(), 0.25);
    }

    #[test]
    fn tick_moves_bodies_and_nebula() {
        let mut s = scene();
        let before: Vec<f64> = s.bodies().iter().map(|b| b.orbit_travel).collect();
        s.tick(0.1, PointerOffset::ORIGIN).unwrap();
        for (b, p) in s.bodies().iter().zip(before) {
            assert!(b.orbit_travel > p);
        }
        assert!(s.nebula_rotation() > 0.0);
    }

    #[test]
    fn clock_and_twinkle_advance_on_a_long_running_page() {
        let mut s = scene();
        s.time = 131_072.0;
        s.nebula_rotation = wrap_angle(131_072.0 * NEBULA_SPIN);
        s.tick(1.0 / 144.0, PointerOffset::ORIGIN).unwrap();
        let (time, nebula, sizes) = (s.time(), s.nebula_rotation(), s.stars().sizes.clone());
        s.tick(1.0 / 144.0, PointerOffset::ORIGIN).unwrap();
        assert!(s.time() > time);
        assert_ne!(s.nebula_rotation(), nebula);
        assert_ne!(s.stars().sizes, sizes);
    }

    #[test]
    fn pointer_tilts_groups() {
        let mut s = scene();
        s.tick(0.016, PointerOffset { x: 1.0, y: 0.0 }).unwrap();
        assert!(s.parallax().stars.rotation.y > 0.0);
        assert!(s.parallax().planets.rotation.y > s.parallax().stars.rotation.y);
    }

    #[test]
    fn halted_spawner_drains_to_zero() {
        let mut s = scene();
        s.halt_spawning();
        for _ in 0..200 {
            s.tick(0.25, PointerOffset::ORIGIN).unwrap();
        }
        assert!(s.shooting_stars().is_empty());
        assert_eq!(s.resources().live_count(), INITIAL_RESOURCES - 2);
    }

    #[test]
    fn manifest_names_every_body() {
        let s = scene();
        let json = s.manifest_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["bodies"].as_array().map(|a| a.len()), Some(9));
        assert_eq!(value["bodies"][5]["kind"], "saturn");
        assert_eq!(value["clear_color"], CLEAR_COLOR);
        assert_eq!(value["star_count"], 120);
    }
}
