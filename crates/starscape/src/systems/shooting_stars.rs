//! Ephemeral shooting stars: spawned on a fixed interval from one of four
//! edge regions, advanced every frame and retired the tick their life runs out.

use glam::Vec3;

use crate::api::config::SceneConfig;
use crate::api::error::SceneError;
use crate::api::types::ResourceId;
use crate::core::resources::{Blending, GeometryDesc, MaterialDesc, ResourceTable, Side};
use crate::systems::rng::Rng;

pub const STREAK_LENGTH: f32 = 30.0;
pub const STREAK_WIDTH: f32 = 0.8;

/// Life drains at half the frame delta.
const LIFE_DECAY: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnRegion {
    Top,
    Right,
    Left,
    Diagonal,
}

impl SpawnRegion {
    pub const ALL: [SpawnRegion; 4] = [
        SpawnRegion::Top,
        SpawnRegion::Right,
        SpawnRegion::Left,
        SpawnRegion::Diagonal,
    ];

    pub fn pick(rng: &mut Rng) -> Self {
        Self::ALL[rng.next_int(Self::ALL.len() as u32) as usize]
    }

    /// Random start point inside this region.
    pub fn origin(self, rng: &mut Rng) -> Vec3 {
        let (x, y) = match self {
            SpawnRegion::Top => (rng.centered(150.0), 200.0),
            SpawnRegion::Right => (250.0, rng.centered(100.0)),
            SpawnRegion::Left => (-250.0, rng.centered(100.0)),
            SpawnRegion::Diagonal => (rng.range(200.0, 300.0), rng.range(150.0, 250.0)),
        };
        Vec3::new(x, y, rng.range(-150.0, -50.0))
    }
}

/// Initial kinematics for a new shooting star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub position: Vec3,
    pub velocity: Vec3,
    /// In-plane orientation of the streak.
    pub angle: f32,
}

impl Launch {
    /// Start in `region` and head down and inward at a speed drawn from `speed`.
    pub fn from_region(region: SpawnRegion, speed: [f32; 2], rng: &mut Rng) -> Self {
        let position = region.origin(rng);
        let target = Vec3::new(
            position.x - 150.0 - rng.next_f32() * 100.0,
            position.y - 200.0 - rng.next_f32() * 50.0,
            position.z - 20.0 - rng.next_f32() * 20.0,
        );
        let dir = (target - position).normalize_or_zero();
        let velocity = dir * rng.range(speed[0], speed[1]);
        Self {
            position,
            velocity,
            angle: dir.y.atan2(dir.x),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShootingStar {
    pub position: Vec3,
    /// World units per 60 Hz frame.
    pub velocity: Vec3,
    pub angle: f32,
    pub life: f32,
    pub max_life: f32,
    pub geometry: ResourceId,
    pub material: ResourceId,
}

impl ShootingStar {
    /// Move and age by `delta` seconds. Returns false once life is spent.
    pub fn advance(&mut self, delta: f32) -> bool {
        self.position += self.velocity * delta * 60.0;
        self.life -= delta * LIFE_DECAY;
        self.life > 0.0
    }

    /// Square-root fade: bright for most of the life, then a quick drop.
    pub fn opacity(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).max(0.0).sqrt()
    }
}

/// Owns the active shooting-star set and its spawn timer.
pub struct ShootingStarSpawner {
    active: Vec<ShootingStar>,
    timer: f32,
    interval: f32,
    max_life: f32,
    speed: [f32; 2],
    limit: usize,
    halted: bool,
    streak_texture: ResourceId,
    spawned_total: u64,
    retired_total: u64,
}

impl ShootingStarSpawner {
    pub fn new(config: &SceneConfig, streak_texture: ResourceId) -> Self {
        Self {
            active: Vec::with_capacity(config.max_shooting_stars),
            timer: 0.0,
            interval: config.shooting_star_interval,
            max_life: config.shooting_star_life,
            speed: config.shooting_star_speed,
            limit: config.max_shooting_stars,
            halted: false,
            streak_texture,
            spawned_total: 0,
            retired_total: 0,
        }
    }

    /// Create one shooting star with its own plane and material.
    pub fn spawn(&mut self, rng: &mut Rng, resources: &mut ResourceTable) -> Result<(), SceneError> {
        if self.active.len() >= self.limit {
            return Err(SceneError::EffectLimit { limit: self.limit });
        }
        let region = SpawnRegion::pick(rng);
        let launch = Launch::from_region(region, self.speed, rng);

        let geometry = resources.create_geometry(GeometryDesc::Plane {
            width: STREAK_LENGTH,
            height: STREAK_WIDTH,
        });
        let material = resources.create_material(MaterialDesc::Basic {
            map: Some(self.streak_texture),
            color: 0xffffff,
            opacity: 1.0,
            blending: Blending::Additive,
            side: Side::Double,
        });

        self.active.push(ShootingStar {
            position: launch.position,
            velocity: launch.velocity,
            angle: launch.angle,
            life: self.max_life,
            max_life: self.max_life,
            geometry,
            material,
        });
        self.spawned_total += 1;
        log::debug!("shooting star spawned from {:?} ({} active)", region, self.active.len());
        Ok(())
    }

    /// Spawn when the interval has elapsed, then advance every active star and
    /// retire those whose life reached zero, releasing their resources.
    ///
    /// A failed spawn is reported after the active set has been advanced.
    pub fn tick(&mut self, delta: f32, rng: &mut Rng, resources: &mut ResourceTable) -> Result<(), SceneError> {
        self.timer += delta;
        let mut spawned = Ok(());
        if !self.halted && self.timer > self.interval {
            self.timer = 0.0;
            spawned = self.spawn(rng, resources);
        }

        let mut retired = 0u64;
        self.active.retain_mut(|star| {
            if star.advance(delta) {
                return true;
            }
            resources.release(star.geometry);
            resources.release(star.material);
            retired += 1;
            false
        });
        if retired > 0 {
            self.retired_total += retired;
            log::debug!("{} shooting star(s) retired ({} active)", retired, self.active.len());
        }
        spawned
    }

    /// Stop creating new stars; existing ones keep retiring normally.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn active(&self) -> &[ShootingStar] {
        &self.active
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    pub fn retired_total(&self) -> u64 {
        self.retired_total
    }

    /// Forget every active star. Their resources are released with the table.
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resources::ResourceKind;

    fn setup() -> (ShootingStarSpawner, ResourceTable, Rng) {
        let resources = ResourceTable::new();
        let spawner = ShootingStarSpawner::new(&SceneConfig::default(), ResourceId(999));
        (spawner, resources, Rng::new(21))
    }

    #[test]
    fn launch_heads_down_and_inward() {
        let mut rng = Rng::new(3);
        for _ in 0..200 {
            let region = SpawnRegion::pick(&mut rng);
            let l = Launch::from_region(region, [3.0, 5.0], &mut rng);
            assert!(l.velocity.x < 0.0 && l.velocity.y < 0.0 && l.velocity.z < 0.0);
            let speed = l.velocity.length();
            assert!((3.0..=5.0 + 1e-4).contains(&speed), "speed {speed}");
            assert!((-150.0..=-50.0).contains(&l.position.z));
        }
    }

    #[test]
    fn region_bounds() {
        let mut rng = Rng::new(17);
        for _ in 0..100 {
            let p = SpawnRegion::Top.origin(&mut rng);
            assert!(p.x.abs() <= 150.0 && p.y == 200.0);
            let p = SpawnRegion::Left.origin(&mut rng);
            assert!(p.x == -250.0 && p.y.abs() <= 100.0);
            let p = SpawnRegion::Diagonal.origin(&mut rng);
            assert!((200.0..=300.0).contains(&p.x) && (150.0..=250.0).contains(&p.y));
        }
    }

    #[test]
    fn all_regions_are_reachable() {
        let mut rng = Rng::new(5);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let r = SpawnRegion::pick(&mut rng);
            seen[SpawnRegion::ALL.iter().position(|x| *x == r).unwrap_or(0)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn spawns_after_interval_and_resets_timer() {
        let (mut spawner, mut resources, mut rng) = setup();
        for _ in 0..12 {
            spawner.tick(0.25, &mut rng, &mut resources).unwrap();
        }
        assert_eq!(spawner.spawned_total(), 0, "3.0s elapsed is not past the interval");
        spawner.tick(0.25, &mut rng, &mut resources).unwrap();
        assert_eq!(spawner.spawned_total(), 1);
        assert_eq!(resources.live_count_of(ResourceKind::Geometry), 1);
        assert_eq!(resources.live_count_of(ResourceKind::Material), 1);
    }

    #[test]
    fn life_decreases_and_removal_is_same_tick() {
        let (mut spawner, mut resources, mut rng) = setup();
        spawner.spawn(&mut rng, &mut resources).unwrap();
        let delta = 0.25;
        let mut last = spawner.active()[0].life;
        let mut ticks = 0;
        loop {
            spawner.tick(delta, &mut rng, &mut resources).unwrap();
            ticks += 1;
            match spawner.active().first() {
                Some(star) => {
                    assert!(star.life < last);
                    assert!(star.life > 0.0, "star with spent life still active");
                    last = star.life;
                }
                None => break,
            }
        }
        // 1.5 life at 0.125 per tick.
        assert_eq!(ticks, 12);
        assert_eq!(resources.live_count(), 0);
        assert_eq!(spawner.retired_total(), 1);
    }

    #[test]
    fn opacity_fades_with_square_root() {
        let mut star = ShootingStar {
            position: Vec3::ZERO,
            velocity: Vec3::X,
            angle: 0.0,
            life: 1.5,
            max_life: 1.5,
            geometry: ResourceId(0),
            material: ResourceId(1),
        };
        assert_eq!(star.opacity(), 1.0);
        star.life = 0.375;
        assert!((star.opacity() - 0.5).abs() < 1e-6);
        star.life = -0.1;
        assert_eq!(star.opacity(), 0.0);
    }

    #[test]
    fn advance_scales_to_sixty_hz() {
        let mut star = ShootingStar {
            position: Vec3::ZERO,
            velocity: Vec3::new(-2.0, -1.0, 0.0),
            angle: 0.0,
            life: 1.5,
            max_life: 1.5,
            geometry: ResourceId(0),
            material: ResourceId(1),
        };
        assert!(star.advance(0.5));
        assert_eq!(star.position, Vec3::new(-60.0, -30.0, 0.0));
        assert!((star.life - 1.25).abs() < 1e-6);
    }

    #[test]
    fn limit_is_an_error_and_halt_stops_spawning() {
        let config = SceneConfig {
            max_shooting_stars: 1,
            shooting_star_interval: 0.05,
            ..SceneConfig::default()
        };
        let mut spawner = ShootingStarSpawner::new(&config, ResourceId(0));
        let mut resources = ResourceTable::new();
        let mut rng = Rng::new(1);
        spawner.spawn(&mut rng, &mut resources).unwrap();
        let err = spawner.tick(0.1, &mut rng, &mut resources);
        assert_eq!(err, Err(SceneError::EffectLimit { limit: 1 }));

        spawner.halt();
        for _ in 0..100 {
            spawner.tick(0.1, &mut rng, &mut resources).unwrap();
        }
        assert!(spawner.active().is_empty());
        assert_eq!(spawner.spawned_total(), 1);
        assert_eq!(resources.live_count(), 0);
    }
}
