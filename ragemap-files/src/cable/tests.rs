use glam::{Vec2, Vec3};

use crate::cable::mesh::{build, distance_point_to_line, emit};
use crate::cable::types::{CablePiece, CablePoint, DEFAULT_CABLE_RADIUS};

fn straight_piece(y: f32, points: usize) -> CablePiece {
    CablePiece {
        points: (0..points)
            .map(|i| CablePoint {
                position: Vec3::new(i as f32, y, 0.0),
                ..Default::default()
            })
            .collect(),
    }
}

#[test]
fn two_point_expansion() {
    let piece = CablePiece {
        points: vec![
            CablePoint {
                position: Vec3::ZERO,
                ..Default::default()
            },
            CablePoint {
                position: Vec3::new(1.0, 0.0, 0.0),
                ..Default::default()
            },
        ],
    };
    let geometry = emit(&[piece]);

    assert_eq!(geometry.vertices.len(), 6);
    assert_eq!(geometry.indices.len(), 6);
    assert_eq!(geometry.triangle_materials.len(), 2);
    for vertex in &geometry.vertices {
        assert!((vertex.normal - Vec3::X).length() < 1e-6);
        assert!(
            (vertex.texcoord.x - DEFAULT_CABLE_RADIUS).abs() < 1e-7
                || (vertex.texcoord.x + DEFAULT_CABLE_RADIUS).abs() < 1e-7
        );
        assert_eq!(vertex.texcoord.y, 0.0);
        assert_eq!(vertex.colour, [0, 0, 0, 255]);
    }
}

#[test]
fn empty_and_single_point_pieces_emit_nothing() {
    let pieces = vec![
        CablePiece::default(),
        CablePiece {
            points: vec![CablePoint::default()],
        },
    ];
    let geometry = emit(&pieces);
    assert!(geometry.vertices.is_empty());
    assert!(geometry.indices.is_empty());
}

#[test]
fn build_inverts_emit_on_piece_geometry() {
    let mut sagging = straight_piece(0.0, 4);
    // give the interior points some micromovement and colour so all
    // five attributes are exercised
    sagging.points[1].position.z = -0.25;
    sagging.points[2].position.z = -0.25;
    for point in &mut sagging.points {
        point.um_scale = 0.5;
        point.phase = Vec2::new(0.25, 0.75);
        point.diffuse_factor = 0.5;
        point.material_index = 3;
    }
    // endpoints sit on the chord, their um contribution is zero by
    // definition
    sagging.points[0].um_scale = 0.0;
    sagging.points[3].um_scale = 0.0;

    let pieces = vec![sagging, straight_piece(5.0, 3)];
    let rebuilt = build(&emit(&pieces));

    assert_eq!(rebuilt.len(), 2);
    let (a, b) = if rebuilt[0].points[0].position.y == 0.0 {
        (&rebuilt[0], &rebuilt[1])
    } else {
        (&rebuilt[1], &rebuilt[0])
    };

    assert_eq!(a.points.len(), 4);
    assert_eq!(b.points.len(), 3);
    for (original, recovered) in pieces[0].points.iter().zip(&a.points) {
        assert!((original.position - recovered.position).length() < 1e-6);
        assert!((original.radius - recovered.radius).abs() < 1e-6);
        assert!((original.diffuse_factor - recovered.diffuse_factor).abs() < 0.005);
        assert!((original.phase - recovered.phase).length() < 0.005);
        assert!((original.um_scale - recovered.um_scale).abs() < 1e-3);
        assert_eq!(recovered.material_index, 3);
    }
}

#[test]
fn cables_meeting_at_a_point_stay_distinct_pieces() {
    // both pieces end at the origin but arrive from different
    // directions, so the shared position has two distinct tangents
    let towards_origin_x = CablePiece {
        points: vec![
            CablePoint {
                position: Vec3::new(-2.0, 0.0, 0.0),
                ..Default::default()
            },
            CablePoint {
                position: Vec3::ZERO,
                ..Default::default()
            },
        ],
    };
    let towards_origin_y = CablePiece {
        points: vec![
            CablePoint {
                position: Vec3::new(0.0, -2.0, 0.0),
                ..Default::default()
            },
            CablePoint {
                position: Vec3::ZERO,
                ..Default::default()
            },
        ],
    };
    let rebuilt = build(&emit(&[towards_origin_x, towards_origin_y]));
    assert_eq!(rebuilt.len(), 2);
    assert!(rebuilt.iter().all(|piece| piece.points.len() == 2));
}

#[test]
fn point_to_line_distance() {
    let a = Vec3::ZERO;
    let b = Vec3::new(2.0, 0.0, 0.0);
    assert_eq!(distance_point_to_line(a, b, Vec3::new(1.0, 3.0, 0.0)), 3.0);
    assert_eq!(distance_point_to_line(a, b, Vec3::new(1.0, 0.0, 0.0)), 0.0);
    // collapsed chord falls back to point distance
    assert_eq!(distance_point_to_line(a, a, Vec3::new(0.0, 4.0, 0.0)), 4.0);
}
