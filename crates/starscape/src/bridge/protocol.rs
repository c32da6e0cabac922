//! Frame buffer layout shared with the host renderer.
//! Must stay in sync with the host's reader.
//!
//! Layout (all values f32):
//! ```text
//! [Header: 32 floats]
//! [Star sizes: star_count floats]
//! [Bodies: body_count × 12 floats]
//! [Streaks: max_streaks × 8 floats]
//! ```
//!
//! Star positions and colours never change after init and are exposed as
//! separate static buffers. Counts and capacities are written into the
//! header every frame so the host can compute offsets itself.

use crate::core::resources::ResourceCommand;
use crate::renderer::camera::CameraUniform;
use crate::renderer::instance::{BodyInstance, StreakInstance};
use crate::scene::Scene;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 32;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_TIME: usize = 2;
pub const HEADER_STAR_COUNT: usize = 3;
pub const HEADER_BODY_COUNT: usize = 4;
pub const HEADER_STREAK_COUNT: usize = 5;
pub const HEADER_MAX_STREAKS: usize = 6;
pub const HEADER_STAR_ROT_X: usize = 7;
pub const HEADER_STAR_ROT_Y: usize = 8;
pub const HEADER_PLANET_ROT_X: usize = 9;
pub const HEADER_PLANET_ROT_Y: usize = 10;
pub const HEADER_NEBULA_ROT_Y: usize = 11;
pub const HEADER_ASPECT: usize = 12;
pub const HEADER_VIEWPORT_WIDTH: usize = 13;
pub const HEADER_VIEWPORT_HEIGHT: usize = 14;
pub const HEADER_PIXEL_RATIO: usize = 15;
/// Start of the camera view-projection matrix, 16 floats column-major.
pub const HEADER_VIEW_PROJ: usize = 16;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Section sizes and offsets, fixed for the lifetime of one scene.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    pub star_count: usize,
    pub body_count: usize,
    pub max_streaks: usize,

    pub star_sizes_offset: usize,
    pub bodies_offset: usize,
    pub streaks_offset: usize,

    pub total_floats: usize,
}

impl FrameLayout {
    pub fn new(star_count: usize, body_count: usize, max_streaks: usize) -> Self {
        let star_sizes_offset = HEADER_FLOATS;
        let bodies_offset = star_sizes_offset + star_count;
        let streaks_offset = bodies_offset + body_count * BodyInstance::FLOATS;
        let total_floats = streaks_offset + max_streaks * StreakInstance::FLOATS;
        Self {
            star_count,
            body_count,
            max_streaks,
            star_sizes_offset,
            bodies_offset,
            streaks_offset,
            total_floats,
        }
    }

    pub fn for_scene(scene: &Scene) -> Self {
        Self::new(
            scene.stars().len(),
            scene.bodies().len(),
            scene.config().max_shooting_stars,
        )
    }

    pub fn total_bytes(&self) -> usize {
        self.total_floats * 4
    }

    /// Serialize the current scene state into `buf`, resizing it to fit.
    /// Streaks beyond `max_streaks` are dropped from the frame.
    pub fn write_frame(&self, scene: &Scene, frame_counter: u64, buf: &mut Vec<f32>) {
        buf.clear();
        buf.resize(self.total_floats, 0.0);

        let viewport = scene.viewport();
        let parallax = scene.parallax();
        let stars = scene.stars();
        let streaks = scene.shooting_stars();
        let streak_count = streaks.len().min(self.max_streaks);
        let star_count = stars.len().min(self.star_count);
        let body_count = scene.bodies().len().min(self.body_count);

        let header = &mut buf[..HEADER_FLOATS];
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_FRAME_COUNTER] = frame_counter as f32;
        header[HEADER_TIME] = scene.time() as f32;
        header[HEADER_STAR_COUNT] = star_count as f32;
        header[HEADER_BODY_COUNT] = body_count as f32;
        header[HEADER_STREAK_COUNT] = streak_count as f32;
        header[HEADER_MAX_STREAKS] = self.max_streaks as f32;
        header[HEADER_STAR_ROT_X] = parallax.stars.rotation.x;
        header[HEADER_STAR_ROT_Y] = parallax.stars.rotation.y;
        header[HEADER_PLANET_ROT_X] = parallax.planets.rotation.x;
        header[HEADER_PLANET_ROT_Y] = parallax.planets.rotation.y;
        header[HEADER_NEBULA_ROT_Y] = scene.nebula_rotation();
        header[HEADER_ASPECT] = scene.camera().aspect;
        header[HEADER_VIEWPORT_WIDTH] = viewport.width;
        header[HEADER_VIEWPORT_HEIGHT] = viewport.height;
        header[HEADER_PIXEL_RATIO] = viewport.pixel_ratio;
        let camera = scene.camera().uniform();
        header[HEADER_VIEW_PROJ..HEADER_VIEW_PROJ + CameraUniform::FLOATS]
            .copy_from_slice(bytemuck::cast_slice(std::slice::from_ref(&camera)));

        buf[self.star_sizes_offset..self.star_sizes_offset + star_count]
            .copy_from_slice(&stars.sizes[..star_count]);

        for (i, body) in scene.bodies().iter().take(body_count).enumerate() {
            let at = self.bodies_offset + i * BodyInstance::FLOATS;
            let inst = BodyInstance::from_body(body);
            buf[at..at + BodyInstance::FLOATS].copy_from_slice(bytemuck::cast_slice(std::slice::from_ref(&inst)));
        }

        for (i, star) in streaks.iter().take(streak_count).enumerate() {
            let at = self.streaks_offset + i * StreakInstance::FLOATS;
            let inst = StreakInstance::from_star(star);
            buf[at..at + StreakInstance::FLOATS].copy_from_slice(bytemuck::cast_slice(std::slice::from_ref(&inst)));
        }
    }
}

/// Flatten resource commands for the host: `ResourceCommand::FLOATS` each.
pub fn write_commands(commands: &[ResourceCommand], buf: &mut Vec<f32>) {
    buf.clear();
    buf.reserve(commands.len() * ResourceCommand::FLOATS);
    for cmd in commands {
        buf.extend_from_slice(&cmd.to_floats());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::SceneConfig;
    use crate::api::types::{ResourceId, Viewport};
    use crate::core::resources::ResourceKind;
    use crate::systems::parallax::PointerOffset;

    fn scene() -> Scene {
        let config = SceneConfig {
            star_count: 25,
            star_texture_size: 8,
            planet_texture_size: 8,
            nebula_texture_size: 8,
            streak_texture_size: [8, 2],
            max_shooting_stars: 4,
            ..SceneConfig::default()
        };
        Scene::initialize(Viewport::new(800.0, 400.0), config).unwrap()
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = FrameLayout::new(100, 9, 16);
        assert_eq!(layout.star_sizes_offset, HEADER_FLOATS);
        assert_eq!(layout.bodies_offset, HEADER_FLOATS + 100);
        assert_eq!(layout.streaks_offset, layout.bodies_offset + 9 * 12);
        assert_eq!(layout.total_floats, layout.streaks_offset + 16 * 8);
        assert_eq!(layout.total_bytes(), layout.total_floats * 4);
    }

    #[test]
    fn header_reflects_scene() {
        let mut s = scene();
        s.tick(0.5, PointerOffset { x: 1.0, y: 0.0 }).unwrap();
        let layout = FrameLayout::for_scene(&s);
        let mut buf = Vec::new();
        layout.write_frame(&s, 7, &mut buf);

        assert_eq!(buf.len(), layout.total_floats);
        assert_eq!(buf[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(buf[HEADER_FRAME_COUNTER], 7.0);
        assert_eq!(buf[HEADER_TIME], 0.25);
        assert_eq!(buf[HEADER_STAR_COUNT], 25.0);
        assert_eq!(buf[HEADER_BODY_COUNT], 9.0);
        assert_eq!(buf[HEADER_STREAK_COUNT], 1.0);
        assert_eq!(buf[HEADER_ASPECT], 2.0);
        assert!(buf[HEADER_STAR_ROT_Y] > 0.0);
    }

    #[test]
    fn header_carries_view_projection() {
        let mut s = scene();
        let layout = FrameLayout::for_scene(&s);
        let mut buf = Vec::new();
        layout.write_frame(&s, 0, &mut buf);
        let expected = s.camera().projection_matrix() * s.camera().view_matrix();
        let written = &buf[HEADER_VIEW_PROJ..HEADER_VIEW_PROJ + 16];
        assert_eq!(written, expected.to_cols_array().as_slice());

        s.resize(Viewport::new(400.0, 800.0)).unwrap();
        layout.write_frame(&s, 1, &mut buf);
        assert_ne!(&buf[HEADER_VIEW_PROJ..HEADER_VIEW_PROJ + 16], expected.to_cols_array().as_slice());
    }

    #[test]
    fn sections_hold_instance_data() {
        let s = scene();
        let layout = FrameLayout::for_scene(&s);
        let mut buf = Vec::new();
        layout.write_frame(&s, 0, &mut buf);

        assert_eq!(buf[layout.star_sizes_offset], s.stars().sizes[0]);
        let saturn = &s.bodies()[5];
        let at = layout.bodies_offset + 5 * BodyInstance::FLOATS;
        assert_eq!(buf[at], saturn.handles.geometry.0 as f32);
        assert_eq!(buf[at + 7], ResourceId::to_wire(saturn.handles.ring_geometry));
        let streak = &s.shooting_stars()[0];
        assert_eq!(buf[layout.streaks_offset], streak.geometry.0 as f32);
        assert_eq!(buf[layout.streaks_offset + 6], 1.0);
    }

    #[test]
    fn commands_flatten_in_order() {
        let cmds = [
            ResourceCommand::Create(ResourceId(3), ResourceKind::Texture),
            ResourceCommand::Release(ResourceId(3)),
        ];
        let mut buf = vec![9.0; 3];
        write_commands(&cmds, &mut buf);
        assert_eq!(buf, vec![1.0, 3.0, 2.0, 0.0, 2.0, 3.0, -1.0, 0.0]);
    }
}
