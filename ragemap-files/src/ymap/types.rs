//! Typed model of a `CMapData` (`.ymap.xml`) document.

use glam::{Quat, Vec3};

use crate::common::entity::EntityDef;

#[derive(Debug, Clone, Default)]
pub struct MapDocument {
    pub name: String,
    pub parent: String,
    pub flags: u32,
    pub content_flags: u32,
    /// Recomputed on write from the entity list; kept as read so a
    /// document can be inspected without re-deriving them.
    pub streaming_extents_min: Vec3,
    pub streaming_extents_max: Vec3,
    pub entities_extents_min: Vec3,
    pub entities_extents_max: Vec3,
    pub entities: Vec<EntityDef>,
    pub occlude_models: Vec<ModelOccluder>,
    pub box_occluders: Vec<BoxOccluder>,
    pub car_generators: Vec<CarGenerator>,
    /// Physics dictionaries streamed in with this map.
    pub physics_dictionaries: Vec<String>,
}

/// An oriented box occluder. The editor works in floats; the on-disk
/// form is fixed-point (0.25-unit center/extent quantization, sin/cos of
/// the Z heading scaled by 32767).
#[derive(Debug, Clone, Default)]
pub struct BoxOccluder {
    pub center: Vec3,
    pub extents: Vec3,
    pub rotation: Quat,
}

/// An occluder mesh. On disk the geometry is a single byte blob:
/// `num_verts_in_bytes` of little-endian f32 triples followed by
/// `num_tris * 3` byte-sized indices.
#[derive(Debug, Clone, Default)]
pub struct ModelOccluder {
    pub bb_min: Vec3,
    pub bb_max: Vec3,
    pub flags: u32,
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct CarGenerator {
    pub position: Vec3,
    /// Heading in radians; the disk form stores it as a scaled
    /// direction pair (`orientX = 5 sin a`, `orientY = 5 cos a`).
    pub heading: f32,
    pub perpendicular_length: f32,
    pub car_model: String,
    pub flags: u32,
    pub body_color_remap: [i8; 4],
    pub pop_group: String,
    pub livery: i8,
}

impl Default for CarGenerator {
    fn default() -> Self {
        CarGenerator {
            position: Vec3::ZERO,
            heading: 0.0,
            perpendicular_length: 2.3,
            car_model: String::new(),
            flags: 0,
            body_color_remap: [-1; 4],
            pop_group: String::new(),
            livery: -1,
        }
    }
}
