//! Per-edge adjacency recomputation.
//!
//! For every directed edge (a, b) of a polygon, the neighbor is the
//! polygon of the same mesh that owns the reversed edge (b, a). Matching
//! is done on positions quantized to 1/128 units so vertices that came
//! through a float round trip still line up.

use std::collections::HashMap;

use glam::Vec3;

use crate::ynv::types::{NavEdge, NavMesh, ADJ_NONE};

type VertKey = (i64, i64, i64);

fn vert_key(v: Vec3) -> VertKey {
    (
        (v.x * 128.0).round() as i64,
        (v.y * 128.0).round() as i64,
        (v.z * 128.0).round() as i64,
    )
}

pub fn recompute_adjacency(mesh: &mut NavMesh) {
    let own_cell = if mesh.is_standalone() {
        ADJ_NONE
    } else {
        mesh.area_id & ADJ_NONE
    };

    let mut edge_owner: HashMap<(VertKey, VertKey), u16> = HashMap::new();
    for (poly_index, polygon) in mesh.polygons.iter().enumerate() {
        let ring = &polygon.vertices;
        for i in 0..ring.len() {
            let a = vert_key(ring[i]);
            let b = vert_key(ring[(i + 1) % ring.len()]);
            if a == b {
                // collapsed stitch edges own nothing
                continue;
            }
            edge_owner.insert((a, b), poly_index as u16);
        }
    }

    for poly_index in 0..mesh.polygons.len() {
        let ring_len = mesh.polygons[poly_index].vertices.len();
        let mut edges: Vec<NavEdge> = Vec::with_capacity(ring_len);
        for i in 0..ring_len {
            let ring = &mesh.polygons[poly_index].vertices;
            let a = vert_key(ring[i]);
            let b = vert_key(ring[(i + 1) % ring.len()]);
            let neighbor = edge_owner
                .get(&(b, a))
                .copied()
                .filter(|&n| n as usize != poly_index);
            let previous = mesh.polygons[poly_index].edges.get(i).copied().unwrap_or_default();
            edges.push(NavEdge {
                cell: if neighbor.is_some() { own_cell } else { ADJ_NONE },
                poly: neighbor.unwrap_or(ADJ_NONE),
                ..previous
            });
        }
        mesh.polygons[poly_index].edges = edges;
    }
}

impl NavMesh {
    /// See [`recompute_adjacency`].
    pub fn recompute_adjacency(&mut self) {
        recompute_adjacency(self);
    }
}
