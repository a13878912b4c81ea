//! Typed model of a `NavMesh` (`.ynv.xml`) document.

use std::collections::HashMap;
use std::f32::consts::PI;

use bitflags::bitflags;
use glam::Vec3;
use num_enum::FromPrimitive;

use crate::ynv::grid::{grid_cell_index, grid_cell_of_position, STANDALONE_CELL};

bitflags! {
    /// What the document contributes to its streaming sector.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NavContentFlags: u32 {
        const POLYGONS = 1;
        const PORTALS = 2;
        const VEHICLE = 4;
        const UNKNOWN_8 = 8;
        const UNKNOWN_16 = 16;
    }
}

impl NavContentFlags {
    const TOKENS: [(NavContentFlags, &'static str); 5] = [
        (NavContentFlags::POLYGONS, "Polygons"),
        (NavContentFlags::PORTALS, "Portals"),
        (NavContentFlags::VEHICLE, "Vehicle"),
        (NavContentFlags::UNKNOWN_8, "Unknown8"),
        (NavContentFlags::UNKNOWN_16, "Unknown16"),
    ];

    pub fn from_tokens(tokens: &[String]) -> NavContentFlags {
        let mut flags = NavContentFlags::empty();
        for token in tokens {
            // integer form is accepted as well
            if let Ok(bits) = token.parse::<u32>() {
                flags |= NavContentFlags::from_bits_retain(bits);
                continue;
            }
            if let Some((flag, _)) = Self::TOKENS
                .iter()
                .copied()
                .find(|(_, name)| *name == token.as_str())
            {
                flags |= flag;
            }
        }
        flags
    }

    pub fn to_tokens(self) -> Vec<String> {
        Self::TOKENS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| (*name).to_owned())
            .collect()
    }
}

bitflags! {
    /// First packed polygon flag group (`data0`). The low byte carries
    /// the surface bits, the high byte placement bits; unknown bits are
    /// retained.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PolyFlags0: u16 {
        const IS_SMALL = 0x0001;
        const IS_LARGE = 0x0002;
        const IS_PAVEMENT = 0x0004;
        const IS_IN_SHELTER = 0x0008;
        const TOO_STEEP = 0x0040;
        const IS_WATER = 0x0080;
        const IS_NEAR_CAR_NODE = 0x2000;
        const IS_INTERIOR = 0x4000;
        const IS_ISOLATED = 0x8000;
    }
}

bitflags! {
    /// Second packed polygon flag group (`data1`). The high byte is an
    /// unnamed audio-related group, kept raw.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PolyFlags1: u16 {
        const IS_NETWORK_SPAWN_CANDIDATE = 0x0001;
        const IS_ROAD = 0x0002;
        const LIES_ALONG_EDGE = 0x0004;
        const IS_TRAIN_TRACK = 0x0008;
        const IS_SHALLOW_WATER = 0x0010;
    }
}

/// `data2` bit 0: the polygon stitches into DLC content.
pub const POLY_FLAG_DLC_STITCH: u8 = 0x01;

/// Sentinel for "no neighbor" in per-edge adjacency (14-bit fields).
pub const ADJ_NONE: u16 = 0x3FFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEdge {
    /// Grid cell index of the neighboring polygon's mesh.
    pub cell: u16,
    /// Polygon index within that mesh.
    pub poly: u16,
    pub flag_a: u8,
    pub flag_b: u8,
}

impl Default for NavEdge {
    fn default() -> Self {
        NavEdge {
            cell: ADJ_NONE,
            poly: ADJ_NONE,
            flag_a: 0,
            flag_b: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavPolygon {
    /// Vertex ring, 3..N entries. DLC-stitch triangles are padded to 4
    /// slots in memory and trimmed again on export.
    pub vertices: Vec<Vec3>,
    /// One edge record per ring vertex.
    pub edges: Vec<NavEdge>,
    /// Packed flag triplet (`data0`, `data1`, `data2`).
    pub flags0: u16,
    pub flags1: u16,
    pub flags2: u8,
}

impl NavPolygon {
    pub fn general_flags(&self) -> PolyFlags0 {
        PolyFlags0::from_bits_retain(self.flags0)
    }

    pub fn set_general_flags(&mut self, flags: PolyFlags0) {
        self.flags0 = flags.bits();
    }

    pub fn usage_flags(&self) -> PolyFlags1 {
        PolyFlags1::from_bits_retain(self.flags1)
    }

    pub fn set_usage_flags(&mut self, flags: PolyFlags1) {
        self.flags1 = flags.bits();
    }

    pub fn is_dlc_stitch(&self) -> bool {
        self.flags2 & POLY_FLAG_DLC_STITCH != 0
    }

    pub fn centroid(&self) -> Vec3 {
        if self.vertices.is_empty() {
            return Vec3::ZERO;
        }
        self.vertices.iter().copied().sum::<Vec3>() / self.vertices.len() as f32
    }

    pub fn distinct_vertex_count(&self) -> usize {
        let mut count = 0;
        for (i, v) in self.vertices.iter().enumerate() {
            if !self.vertices[..i].contains(v) {
                count += 1;
            }
        }
        count
    }
}

#[repr(u8)]
#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverKind {
    LowWall = 0,
    LowWallToLeft = 1,
    LowWallToRight = 2,
    WallToLeft = 3,
    WallToRight = 4,
    WallToNeither = 5,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavCoverPoint {
    /// Raw kind byte; unknown values survive a round trip.
    pub kind: u8,
    /// Serialized angle in radians.
    pub angle: f32,
    pub position: Vec3,
}

impl NavCoverPoint {
    pub fn cover_kind(&self) -> CoverKind {
        CoverKind::from_primitive(self.kind)
    }

    /// The editor shows the cone heading rotated by pi relative to the
    /// serialized angle.
    pub fn editor_heading(&self) -> f32 {
        wrap_angle(self.angle + PI)
    }

    pub fn set_editor_heading(&mut self, heading: f32) {
        self.angle = wrap_angle(heading - PI);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavLink {
    pub kind: u8,
    pub angle: f32,
    pub position_from: Vec3,
    pub position_to: Vec3,
    pub poly_from: u32,
    pub poly_to: u32,
}

#[derive(Debug, Clone, Default)]
pub struct NavMesh {
    pub content_flags: NavContentFlags,
    /// Grid cell index, or [`STANDALONE_CELL`] for non-map meshes.
    pub area_id: u16,
    pub bb_min: Vec3,
    pub bb_max: Vec3,
    pub polygons: Vec<NavPolygon>,
    pub links: Vec<NavLink>,
    pub cover_points: Vec<NavCoverPoint>,
}

impl NavMesh {
    /// A vehicle navmesh outside the world grid.
    pub fn new_standalone() -> NavMesh {
        NavMesh {
            content_flags: NavContentFlags::POLYGONS | NavContentFlags::VEHICLE,
            area_id: STANDALONE_CELL,
            ..Default::default()
        }
    }

    pub fn is_standalone(&self) -> bool {
        self.area_id == STANDALONE_CELL
    }

    /// Groups polygon indices by the grid cell containing their
    /// centroid. Polygons outside the grid land under the standalone
    /// sentinel. This is the partition map exports use to hand polygons
    /// to their owning cell.
    pub fn polygons_by_cell(&self) -> HashMap<u32, Vec<usize>> {
        let mut cells: HashMap<u32, Vec<usize>> = HashMap::new();
        for (index, polygon) in self.polygons.iter().enumerate() {
            let cell = match grid_cell_of_position(polygon.centroid()) {
                Some((cell_x, cell_y)) => grid_cell_index(cell_x, cell_y),
                None => STANDALONE_CELL as u32,
            };
            cells.entry(cell).or_default().push(index);
        }
        cells
    }

    pub fn recompute_bounds(&mut self) {
        let mut min = Vec3::MAX;
        let mut max = Vec3::MIN;
        let mut any = false;
        for polygon in &self.polygons {
            for vertex in &polygon.vertices {
                min = min.min(*vertex);
                max = max.max(*vertex);
                any = true;
            }
        }
        if any {
            self.bb_min = min;
            self.bb_max = max;
        } else {
            self.bb_min = Vec3::ZERO;
            self.bb_max = Vec3::ZERO;
        }
    }
}

fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle;
    while a > PI {
        a -= 2.0 * PI;
    }
    while a < -PI {
        a += 2.0 * PI;
    }
    a
}
