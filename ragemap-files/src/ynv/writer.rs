use std::io::Write;

use ragemap_xml::schema::{fmt_f32, join_tokens, write_text, write_value, write_vec3};
use ragemap_xml::Element;

use crate::ynv::types::{NavMesh, NavPolygon, ADJ_NONE, POLY_FLAG_DLC_STITCH};
use crate::CodecError;

pub struct NavWriter {}

impl NavWriter {
    pub fn write<W: Write>(mesh: &NavMesh, out: W) -> Result<(), CodecError> {
        let tree = NavWriter::to_tree(mesh)?;
        ragemap_xml::write_document(&tree, out)?;
        Ok(())
    }

    pub fn to_tree(mesh: &NavMesh) -> Result<Element, CodecError> {
        if mesh.polygons.len() > ADJ_NONE as usize {
            return Err(CodecError::Integrity {
                what: "Polygons",
                reason: format!(
                    "{} polygons exceed the 14-bit adjacency index space",
                    mesh.polygons.len()
                ),
            });
        }

        let mut root = Element::new("NavMesh");
        write_text(&mut root, "ContentFlags", &join_tokens(&mesh.content_flags.to_tokens()));
        write_value(&mut root, "AreaID", &mesh.area_id);
        write_vec3(&mut root, "BBMin", mesh.bb_min);
        write_vec3(&mut root, "BBMax", mesh.bb_max);
        write_vec3(&mut root, "BBSize", mesh.bb_max - mesh.bb_min);

        let mut polygons = Element::new("Polygons");
        for polygon in &mesh.polygons {
            polygons.push(NavWriter::polygon_to_element(polygon, mesh)?);
        }
        root.push(polygons);

        let mut links = Element::new("Portals");
        for link in &mesh.links {
            let mut item = Element::new("Item");
            write_value(&mut item, "Type", &link.kind);
            write_value(&mut item, "Angle", &link.angle);
            write_vec3(&mut item, "PositionFrom", link.position_from);
            write_vec3(&mut item, "PositionTo", link.position_to);
            write_value(&mut item, "PolyFrom", &link.poly_from);
            write_value(&mut item, "PolyTo", &link.poly_to);
            links.push(item);
        }
        root.push(links);

        let mut points = Element::new("Points");
        for cover in &mesh.cover_points {
            let mut item = Element::new("Item");
            write_value(&mut item, "Type", &cover.kind);
            write_value(&mut item, "Angle", &cover.angle);
            write_vec3(&mut item, "Position", cover.position);
            points.push(item);
        }
        root.push(points);

        Ok(root)
    }

    fn polygon_to_element(polygon: &NavPolygon, mesh: &NavMesh) -> Result<Element, CodecError> {
        if polygon.vertices.len() < 3 {
            return Err(CodecError::Integrity {
                what: "Polygons",
                reason: format!("polygon ring has {} vertices", polygon.vertices.len()),
            });
        }

        // drop the editing pad of stitch triangles
        let mut ring_len = polygon.vertices.len();
        if polygon.flags2 & POLY_FLAG_DLC_STITCH != 0
            && ring_len == 4
            && polygon.distinct_vertex_count() == 3
        {
            ring_len = 3;
        }

        let mut item = Element::new("Item");

        let (cx, cy) = NavWriter::pack_centroid(polygon, mesh);
        let flags_line = format!(
            "{} {} {} {} {} {} {}",
            polygon.flags0 & 0xFF,
            polygon.flags0 >> 8,
            polygon.flags1 & 0xFF,
            polygon.flags1 >> 8,
            cx,
            cy,
            polygon.flags2,
        );
        write_text(&mut item, "Flags", &flags_line);

        let vertices_text = polygon.vertices[..ring_len]
            .iter()
            .map(|v| format!("{}, {}, {}", fmt_f32(v.x), fmt_f32(v.y), fmt_f32(v.z)))
            .collect::<Vec<_>>()
            .join("\n");
        write_text(&mut item, "Vertices", &vertices_text);

        let edges_text = (0..ring_len)
            .map(|i| {
                let edge = polygon.edges.get(i).copied().unwrap_or_default();
                format!("{}:{}; {}:{}", edge.cell, edge.poly, edge.flag_a, edge.flag_b)
            })
            .collect::<Vec<_>>()
            .join("\n");
        write_text(&mut item, "Edges", &edges_text);

        Ok(item)
    }

    /// Packs the polygon centroid into the low-res byte pair of the flag
    /// line: snapped to the 0.25-unit grid, then mapped over the mesh
    /// bounds into [0, 255].
    fn pack_centroid(polygon: &NavPolygon, mesh: &NavMesh) -> (u8, u8) {
        let centroid = polygon.centroid();
        let size = mesh.bb_max - mesh.bb_min;
        let pack = |value: f32, min: f32, extent: f32| -> u8 {
            if extent <= 0.0 {
                return 0;
            }
            let snapped = ((value - min) / 0.25).round() * 0.25;
            ((snapped / extent) * 255.0).round().clamp(0.0, 255.0) as u8
        };
        (
            pack(centroid.x, mesh.bb_min.x, size.x),
            pack(centroid.y, mesh.bb_min.y, size.y),
        )
    }
}

/// Lowers a mesh to the serialized flag-line fields without writing, the
/// decode counterpart being the reader's field split. Exposed for
/// round-trip verification.
pub fn encode_flag_fields(polygon: &NavPolygon, mesh: &NavMesh) -> [u16; 7] {
    let (cx, cy) = NavWriter::pack_centroid(polygon, mesh);
    [
        polygon.flags0 & 0xFF,
        polygon.flags0 >> 8,
        polygon.flags1 & 0xFF,
        polygon.flags1 >> 8,
        cx as u16,
        cy as u16,
        polygon.flags2 as u16,
    ]
}
