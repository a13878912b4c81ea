use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

use crate::ynv::grid::{
    grid_cell_bounds, grid_cell_index, grid_cell_neighbors, grid_cell_of, grid_cell_of_position,
    GRID_DIM, STANDALONE_CELL,
};
use crate::ynv::reader::NavReader;
use crate::ynv::types::{
    NavContentFlags, NavCoverPoint, NavEdge, NavMesh, NavPolygon, PolyFlags0, PolyFlags1, ADJ_NONE,
    POLY_FLAG_DLC_STITCH,
};
use crate::ynv::writer::{encode_flag_fields, NavWriter};
use crate::AbortSignal;

fn quad(origin: Vec3, size: f32) -> NavPolygon {
    NavPolygon {
        vertices: vec![
            origin,
            origin + Vec3::new(size, 0.0, 0.0),
            origin + Vec3::new(size, size, 0.0),
            origin + Vec3::new(0.0, size, 0.0),
        ],
        edges: vec![NavEdge::default(); 4],
        ..Default::default()
    }
}

#[test]
fn grid_identity() {
    for cell_x in 0..GRID_DIM {
        for cell_y in 0..GRID_DIM {
            let (cx, cy) = grid_cell_of(cell_x * 3, cell_y * 3);
            assert_eq!(grid_cell_index(cx, cy), cell_y * 100 + cell_x);
        }
    }
}

#[test]
fn grid_bounds_and_position_lookup() {
    let (min, max) = grid_cell_bounds(0, 0);
    assert_eq!(min, Vec3::new(-6000.0, -6000.0, 0.0));
    assert_eq!(max, Vec3::new(-5850.0, -5850.0, 0.0));
    assert_eq!(grid_cell_of_position(Vec3::new(-5999.0, -5999.0, 10.0)), Some((0, 0)));
    assert_eq!(grid_cell_of_position(Vec3::new(0.0, 0.0, 0.0)), Some((40, 40)));
    assert_eq!(grid_cell_of_position(Vec3::new(99999.0, 0.0, 0.0)), None);
}

#[test]
fn grid_neighbors_clip_at_the_border() {
    assert_eq!(grid_cell_neighbors(0, 0), vec![(1, 0), (0, 1)]);
    assert_eq!(grid_cell_neighbors(99, 99), vec![(98, 99), (99, 98)]);
    assert_eq!(
        grid_cell_neighbors(50, 50),
        vec![(49, 50), (51, 50), (50, 49), (50, 51)]
    );
}

#[test]
fn standalone_mesh_defaults() {
    let mesh = NavMesh::new_standalone();
    assert_eq!(mesh.area_id, STANDALONE_CELL);
    assert!(mesh.content_flags.contains(NavContentFlags::VEHICLE));
    assert!(mesh.is_standalone());
}

#[test]
fn content_flag_tokens_round_trip() {
    let tokens = vec!["Polygons".to_owned(), "Vehicle".to_owned()];
    let flags = NavContentFlags::from_tokens(&tokens);
    assert_eq!(flags, NavContentFlags::POLYGONS | NavContentFlags::VEHICLE);
    assert_eq!(flags.to_tokens(), tokens);
}

#[test]
fn flag_line_round_trips_through_the_codec() -> Result<(), anyhow::Error> {
    let mut mesh = NavMesh::new_standalone();
    let mut polygon = quad(Vec3::new(2.0, 3.0, 0.0), 4.0);
    polygon.set_general_flags(PolyFlags0::IS_PAVEMENT | PolyFlags0::IS_INTERIOR);
    polygon.set_usage_flags(PolyFlags1::IS_ROAD);
    polygon.flags2 = 0;
    mesh.polygons.push(polygon);
    mesh.recompute_bounds();

    let mut out = Vec::new();
    NavWriter::write(&mesh, &mut out)?;
    let reread = NavReader::read(out.as_slice(), &AbortSignal::new())?;

    assert_eq!(reread.polygons[0].flags0, mesh.polygons[0].flags0);
    assert_eq!(reread.polygons[0].flags1, mesh.polygons[0].flags1);
    assert_eq!(
        encode_flag_fields(&reread.polygons[0], &reread),
        encode_flag_fields(&mesh.polygons[0], &mesh)
    );
    assert!(reread.polygons[0]
        .general_flags()
        .contains(PolyFlags0::IS_INTERIOR));
    Ok(())
}

#[test]
fn stitch_triangles_are_padded_and_trimmed() -> Result<(), anyhow::Error> {
    let mut mesh = NavMesh::new_standalone();
    let mut polygon = NavPolygon {
        vertices: vec![
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        edges: vec![NavEdge::default(); 4],
        ..Default::default()
    };
    polygon.flags2 = POLY_FLAG_DLC_STITCH;
    mesh.polygons.push(polygon);
    mesh.recompute_bounds();

    let tree = NavWriter::to_tree(&mesh)?;
    let item = tree.expect_child("Polygons")?.items().next().unwrap();
    let written_ring = item.expect_child("Vertices")?.text.lines().count();
    assert_eq!(written_ring, 3, "duplicate slot dropped on export");

    let reread = NavReader::from_tree(&tree, &AbortSignal::new())?;
    assert_eq!(reread.polygons[0].vertices.len(), 4, "padded back on read");
    assert_eq!(reread.polygons[0].vertices[3], reread.polygons[0].vertices[2]);
    Ok(())
}

#[test]
fn adjacency_links_shared_edges_both_ways() {
    let mut mesh = NavMesh {
        area_id: 4140, // cell (40, 41)
        content_flags: NavContentFlags::POLYGONS,
        ..Default::default()
    };
    mesh.polygons.push(quad(Vec3::ZERO, 2.0));
    // shares the edge x=2 with the first quad, reversed direction
    mesh.polygons.push(NavPolygon {
        vertices: vec![
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(4.0, 2.0, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
        ],
        edges: vec![NavEdge::default(); 4],
        ..Default::default()
    });
    mesh.recompute_bounds();
    mesh.recompute_adjacency();

    let first = &mesh.polygons[0];
    let shared = first
        .edges
        .iter()
        .find(|e| e.poly != ADJ_NONE)
        .expect("one shared edge");
    assert_eq!(shared.poly, 1);
    assert_eq!(shared.cell, 4140);
    assert_eq!(first.edges.iter().filter(|e| e.poly == ADJ_NONE).count(), 3);

    let second = &mesh.polygons[1];
    let back = second.edges.iter().find(|e| e.poly != ADJ_NONE).expect("back edge");
    assert_eq!(back.poly, 0);
}

#[test]
fn polygons_partition_by_centroid_cell() {
    let mut mesh = NavMesh::default();
    // centroid near the world origin sits in cell (40, 40)
    mesh.polygons.push(quad(Vec3::new(0.0, 0.0, 0.0), 2.0));
    // one cell to the east
    mesh.polygons.push(quad(Vec3::new(150.0, 0.0, 0.0), 2.0));
    // outside the grid entirely
    mesh.polygons.push(quad(Vec3::new(50000.0, 0.0, 0.0), 2.0));

    let cells = mesh.polygons_by_cell();
    assert_eq!(cells[&grid_cell_index(40, 40)], vec![0]);
    assert_eq!(cells[&grid_cell_index(41, 40)], vec![1]);
    assert_eq!(cells[&(STANDALONE_CELL as u32)], vec![2]);
}

#[test]
fn cover_point_editor_heading_is_pi_rotated() {
    let mut cover = NavCoverPoint {
        kind: 1,
        angle: FRAC_PI_2,
        position: Vec3::ZERO,
    };
    assert!((cover.editor_heading() - (FRAC_PI_2 - PI)).abs() < 1e-6);
    cover.set_editor_heading(0.0);
    assert!((cover.angle.abs() - PI).abs() < 1e-6);
}

#[test]
fn scenario_standalone_round_trip() -> Result<(), anyhow::Error> {
    let mut mesh = NavMesh::new_standalone();
    mesh.polygons.push(quad(Vec3::ZERO, 1.0));
    mesh.recompute_bounds();
    mesh.recompute_adjacency();

    let mut out = Vec::new();
    NavWriter::write(&mesh, &mut out)?;
    let reread = NavReader::read(out.as_slice(), &AbortSignal::new())?;
    assert_eq!(reread.area_id, 10000);
    assert!(reread.content_flags.contains(NavContentFlags::VEHICLE));
    assert!(reread.polygons[0].edges.iter().all(|e| e.poly == ADJ_NONE));
    assert_eq!(reread.bb_min, Vec3::ZERO);
    assert_eq!(reread.bb_max, Vec3::new(1.0, 1.0, 0.0));
    Ok(())
}
