//! The compact cable representation and its expanded vertex-buffer form.

use glam::{Vec2, Vec3};

pub const DEFAULT_CABLE_RADIUS: f32 = 0.02;

/// One control point of a cable polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CablePoint {
    pub position: Vec3,
    pub radius: f32,
    /// Diffuse blend factor in [0, 1].
    pub diffuse_factor: f32,
    /// Micromovement scale, >= 0.
    pub um_scale: f32,
    /// Phase offsets in [0, 1]^2.
    pub phase: Vec2,
    pub material_index: u16,
}

impl Default for CablePoint {
    fn default() -> Self {
        CablePoint {
            position: Vec3::ZERO,
            radius: DEFAULT_CABLE_RADIUS,
            diffuse_factor: 1.0,
            um_scale: 0.0,
            phase: Vec2::ZERO,
            material_index: 0,
        }
    }
}

/// A maximal chain of connected cable points. Pieces never share a
/// vertex chain with another piece.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CablePiece {
    pub points: Vec<CablePoint>,
}

/// One expanded vertex. `normal` carries the tangent frame; the signed
/// radius lives in `texcoord.x`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CableVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub colour: [u8; 4],
    pub texcoord: Vec2,
}

/// Triangulated cable geometry as exchanged with the host scene.
#[derive(Debug, Clone, Default)]
pub struct CableGeometry {
    pub vertices: Vec<CableVertex>,
    pub indices: Vec<u32>,
    /// Material index per triangle.
    pub triangle_materials: Vec<u16>,
}
