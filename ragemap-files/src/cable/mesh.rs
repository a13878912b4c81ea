//! Expansion of cable pieces into triangulated geometry and the inverse
//! piece discovery over a vertex buffer.
//!
//! Every segment becomes two triangles over six emitted vertices. The
//! first triangle of a segment repeats its first point on both ends
//! ("forward" triangle); the rebuild pass keys on that shape to recover
//! the directed successor of every point.

use std::collections::HashMap;

use glam::{Vec2, Vec3};

use crate::cable::types::{CableGeometry, CablePiece, CablePoint, CableVertex};

/// Expands pieces into a vertex/index buffer. Pieces with fewer than two
/// points emit nothing.
pub fn emit(pieces: &[CablePiece]) -> CableGeometry {
    let mut geometry = CableGeometry::default();

    for piece in pieces {
        if piece.points.len() < 2 {
            continue;
        }
        let tangents = point_tangents(&piece.points);
        let start = piece.points[0].position;
        let end = piece.points[piece.points.len() - 1].position;

        for segment in 0..piece.points.len() - 1 {
            let p0 = &piece.points[segment];
            let p1 = &piece.points[segment + 1];
            let t0 = tangents[segment];
            let t1 = tangents[segment + 1];

            let v0_neg = cable_vertex(p0, t0, -p0.radius, start, end);
            let v0_pos = cable_vertex(p0, t0, p0.radius, start, end);
            let v1_neg = cable_vertex(p1, t1, -p1.radius, start, end);
            let v1_pos = cable_vertex(p1, t1, p1.radius, start, end);

            let base = geometry.vertices.len() as u32;
            // forward triangle: repeats p0 so the rebuild can recover
            // the directed successor
            geometry.vertices.push(v0_neg);
            geometry.vertices.push(v1_neg);
            geometry.vertices.push(v0_pos);
            geometry.vertices.push(v0_pos);
            geometry.vertices.push(v1_neg);
            geometry.vertices.push(v1_pos);
            geometry.indices.extend(base..base + 6);
            geometry.triangle_materials.push(p0.material_index);
            geometry.triangle_materials.push(p0.material_index);
        }
    }

    geometry
}

/// Recovers pieces from triangulated cable geometry. Inverse of [`emit`]
/// up to f32 precision, provided the buffer follows the cable layout.
pub fn build(geometry: &CableGeometry) -> Vec<CablePiece> {
    // unique-ize by (position, tangent): two cables meeting at a point
    // differ in tangent and must stay distinct chains
    let mut unique_by_key: HashMap<VertexKey, u32> = HashMap::new();
    let mut unique_vertices: Vec<CableVertex> = Vec::new();
    let mut unique_of: Vec<u32> = Vec::with_capacity(geometry.vertices.len());
    for vertex in &geometry.vertices {
        let key = vertex_key(vertex);
        let unique = *unique_by_key.entry(key).or_insert_with(|| {
            unique_vertices.push(*vertex);
            (unique_vertices.len() - 1) as u32
        });
        unique_of.push(unique);
    }

    let mut next_map: HashMap<u32, u32> = HashMap::new();
    let mut prev_map: HashMap<u32, u32> = HashMap::new();
    let mut material_of: HashMap<u32, u16> = HashMap::new();
    for (triangle, corners) in geometry.indices.chunks_exact(3).enumerate() {
        let a = unique_of[corners[0] as usize];
        let b = unique_of[corners[1] as usize];
        let c = unique_of[corners[2] as usize];
        if a == c && a != b {
            next_map.insert(a, b);
            prev_map.insert(b, a);
            if let Some(&material) = geometry.triangle_materials.get(triangle) {
                material_of.insert(a, material);
            }
        }
    }

    let mut pieces = Vec::new();
    for start in 0..unique_vertices.len() as u32 {
        if prev_map.contains_key(&start) || !next_map.contains_key(&start) {
            continue;
        }
        // maximal chain from an unreferenced head
        let mut chain = vec![start];
        let mut cursor = start;
        while let Some(&next) = next_map.get(&cursor) {
            chain.push(next);
            cursor = next;
            if chain.len() > unique_vertices.len() {
                break; // malformed cycle guard
            }
        }

        let chord_start = unique_vertices[chain[0] as usize].position;
        let chord_end = unique_vertices[*chain.last().unwrap() as usize].position;
        let mut points = Vec::with_capacity(chain.len());
        let mut last_material = 0u16;
        for &unique in &chain {
            let vertex = &unique_vertices[unique as usize];
            if let Some(&material) = material_of.get(&unique) {
                last_material = material;
            }
            points.push(recover_point(vertex, chord_start, chord_end, last_material));
        }
        pieces.push(CablePiece { points });
    }

    pieces
}

fn recover_point(vertex: &CableVertex, start: Vec3, end: Vec3, material: u16) -> CablePoint {
    let distance = distance_point_to_line(start, end, vertex.position);
    CablePoint {
        position: vertex.position,
        radius: vertex.texcoord.x.abs(),
        diffuse_factor: vertex.colour[3] as f32 / 255.0,
        um_scale: if distance > 0.0 {
            vertex.texcoord.y / distance
        } else {
            0.0
        },
        phase: Vec2::new(
            vertex.colour[0] as f32 / 255.0,
            vertex.colour[1] as f32 / 255.0,
        ),
        material_index: material,
    }
}

fn cable_vertex(point: &CablePoint, tangent: Vec3, signed_radius: f32, start: Vec3, end: Vec3) -> CableVertex {
    let distance = distance_point_to_line(start, end, point.position);
    CableVertex {
        position: point.position,
        normal: tangent,
        colour: [
            (point.phase.x * 255.0).round() as u8,
            (point.phase.y * 255.0).round() as u8,
            0,
            (point.diffuse_factor * 255.0).round() as u8,
        ],
        texcoord: Vec2::new(signed_radius, distance * point.um_scale),
    }
}

/// Tangent per point: towards the successor at the head, from the
/// predecessor at the tail, across both neighbors in between.
fn point_tangents(points: &[CablePoint]) -> Vec<Vec3> {
    let last = points.len() - 1;
    points
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let direction = if i == 0 {
                points[1].position - points[0].position
            } else if i == last {
                points[last].position - points[last - 1].position
            } else {
                points[i + 1].position - points[i - 1].position
            };
            direction.normalize_or_zero()
        })
        .collect()
}

/// Distance from `p` to the infinite line through `a` and `b`; falls
/// back to the point distance when the chord collapses.
pub fn distance_point_to_line(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    let chord = b - a;
    let length = chord.length();
    if length <= f32::EPSILON {
        return (p - a).length();
    }
    (p - a).cross(chord).length() / length
}

type VertexKey = ([u32; 3], [u32; 3]);

fn vertex_key(vertex: &CableVertex) -> VertexKey {
    (
        [
            vertex.position.x.to_bits(),
            vertex.position.y.to_bits(),
            vertex.position.z.to_bits(),
        ],
        [
            vertex.normal.x.to_bits(),
            vertex.normal.y.to_bits(),
            vertex.normal.z.to_bits(),
        ],
    )
}
