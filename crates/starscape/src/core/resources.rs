use serde::Serialize;

use crate::api::types::ResourceId;
use crate::texture::Texture;

/// Broad class of a graphics resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Geometry,
    Material,
    Texture,
}

impl ResourceKind {
    /// Wire encoding used in the command buffer.
    pub fn code(self) -> f32 {
        match self {
            ResourceKind::Geometry => 0.0,
            ResourceKind::Material => 1.0,
            ResourceKind::Texture => 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Blending {
    Normal,
    Additive,
}

/// Which faces of a mesh are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Front,
    Back,
    Double,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum GeometryDesc {
    /// Batched point cloud; per-point data lives in the star buffers.
    Points { count: usize },
    Sphere { radius: f32, segments: u32 },
    Ring { inner: f32, outer: f32, segments: u32 },
    Plane { width: f32, height: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "material", rename_all = "snake_case")]
pub enum MaterialDesc {
    Points {
        map: ResourceId,
        size: f32,
        blending: Blending,
        size_attenuation: bool,
    },
    /// Lit surface material.
    Standard {
        map: ResourceId,
        emissive: u32,
        emissive_intensity: f32,
        metalness: f32,
        roughness: f32,
    },
    /// Unlit material.
    Basic {
        map: Option<ResourceId>,
        color: u32,
        opacity: f32,
        blending: Blending,
        side: Side,
    },
}

/// Everything the host needs to build a resource on its side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceDesc {
    Geometry(GeometryDesc),
    Material(MaterialDesc),
    /// Pixel data is read separately through `ResourceTable::texture`.
    Texture { label: &'static str, width: u32, height: u32 },
}

impl ResourceDesc {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceDesc::Geometry(_) => ResourceKind::Geometry,
            ResourceDesc::Material(_) => ResourceKind::Material,
            ResourceDesc::Texture { .. } => ResourceKind::Texture,
        }
    }
}

/// Lifecycle notification for the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceCommand {
    Create(ResourceId, ResourceKind),
    Release(ResourceId),
}

impl ResourceCommand {
    /// Floats per command on the wire: op, id, kind, reserved.
    pub const FLOATS: usize = 4;

    pub fn to_floats(self) -> [f32; 4] {
        match self {
            ResourceCommand::Create(id, kind) => [1.0, id.0 as f32, kind.code(), 0.0],
            ResourceCommand::Release(id) => [2.0, id.0 as f32, -1.0, 0.0],
        }
    }
}

struct Resource {
    id: ResourceId,
    desc: ResourceDesc,
    texture: Option<Texture>,
}

/// Allocation ledger for every graphics resource the scene owns.
///
/// Flat Vec storage; resource counts stay in the dozens. Every allocation and
/// release is queued as a `ResourceCommand` for the host to mirror, and a
/// resource can only be released once.
pub struct ResourceTable {
    entries: Vec<Resource>,
    commands: Vec<ResourceCommand>,
    next_id: u32,
    allocated_total: usize,
    released_total: usize,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(64),
            commands: Vec::with_capacity(64),
            next_id: 1,
            allocated_total: 0,
            released_total: 0,
        }
    }

    fn insert(&mut self, desc: ResourceDesc, texture: Option<Texture>) -> ResourceId {
        let id = ResourceId(self.next_id);
        self.next_id += 1;
        self.commands.push(ResourceCommand::Create(id, desc.kind()));
        self.entries.push(Resource { id, desc, texture });
        self.allocated_total += 1;
        id
    }

    pub fn create_geometry(&mut self, desc: GeometryDesc) -> ResourceId {
        self.insert(ResourceDesc::Geometry(desc), None)
    }

    pub fn create_material(&mut self, desc: MaterialDesc) -> ResourceId {
        self.insert(ResourceDesc::Material(desc), None)
    }

    pub fn create_texture(&mut self, texture: Texture) -> ResourceId {
        let desc = ResourceDesc::Texture {
            label: texture.label(),
            width: texture.width(),
            height: texture.height(),
        };
        self.insert(desc, Some(texture))
    }

    /// Release a resource. Returns false if it was never allocated or is already gone.
    pub fn release(&mut self, id: ResourceId) -> bool {
        match self.entries.iter().position(|r| r.id == id) {
            Some(idx) => {
                self.entries.swap_remove(idx);
                self.commands.push(ResourceCommand::Release(id));
                self.released_total += 1;
                true
            }
            None => false,
        }
    }

    /// Release every live resource, newest first. Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        let mut ids: Vec<ResourceId> = self.entries.iter().map(|r| r.id).collect();
        ids.sort_unstable_by(|a, b| b.cmp(a));
        ids.into_iter().filter(|id| self.release(*id)).count()
    }

    pub fn is_live(&self, id: ResourceId) -> bool {
        self.entries.iter().any(|r| r.id == id)
    }

    pub fn desc(&self, id: ResourceId) -> Option<&ResourceDesc> {
        self.entries.iter().find(|r| r.id == id).map(|r| &r.desc)
    }

    pub fn texture(&self, id: ResourceId) -> Option<&Texture> {
        self.entries
            .iter()
            .find(|r| r.id == id)
            .and_then(|r| r.texture.as_ref())
    }

    /// JSON descriptor for the host, or None if the resource is not live.
    pub fn describe_json(&self, id: ResourceId) -> Option<String> {
        self.desc(id).and_then(|d| serde_json::to_string(d).ok())
    }

    pub fn live_count(&self) -> usize {
        self.entries.len()
    }

    pub fn live_count_of(&self, kind: ResourceKind) -> usize {
        self.entries.iter().filter(|r| r.desc.kind() == kind).count()
    }

    pub fn allocated_total(&self) -> usize {
        self.allocated_total
    }

    pub fn released_total(&self) -> usize {
        self.released_total
    }

    /// Pending lifecycle commands, oldest first.
    pub fn commands(&self) -> &[ResourceCommand] {
        &self.commands
    }

    /// Take all pending commands, leaving the queue empty.
    pub fn drain_commands(&mut self) -> Vec<ResourceCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Default for ResourceTable {
    fn default() -> Self {
        Self::new()
    }
}
