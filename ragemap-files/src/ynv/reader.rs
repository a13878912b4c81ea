use std::io::BufRead;

use glam::Vec3;
use log::warn;
use ragemap_xml::schema::{read_text, read_value_or, read_vec3_or, split_tokens};
use ragemap_xml::{Element, XmlError};

use crate::ynv::types::{
    NavContentFlags, NavCoverPoint, NavEdge, NavLink, NavMesh, NavPolygon, POLY_FLAG_DLC_STITCH,
};
use crate::{AbortSignal, CodecError};

pub struct NavReader {}

impl NavReader {
    pub fn read<R: BufRead>(rdr: R, abort: &AbortSignal) -> Result<NavMesh, CodecError> {
        let root = ragemap_xml::read_document(rdr)?;
        NavReader::from_tree(&root, abort)
    }

    pub fn from_tree(root: &Element, abort: &AbortSignal) -> Result<NavMesh, CodecError> {
        if root.name != "NavMesh" {
            return Err(XmlError::schema(&root.name, "expected a NavMesh document").into());
        }

        let tokens = split_tokens(&read_text(root, "ContentFlags"));
        let content_flags = NavContentFlags::from_tokens(&tokens);

        let mut polygons = Vec::new();
        if let Some(container) = root.child("Polygons") {
            for item in container.items() {
                abort.check()?;
                polygons.push(NavReader::read_polygon(item)?);
            }
        }

        let mut links = Vec::new();
        if let Some(container) = root.child("Portals") {
            for item in container.items() {
                links.push(NavReader::read_link(item)?);
            }
        }

        let mut cover_points = Vec::new();
        if let Some(container) = root.child("Points") {
            for item in container.items() {
                cover_points.push(NavReader::read_cover_point(item)?);
            }
        }

        Ok(NavMesh {
            content_flags,
            area_id: read_value_or(root, "AreaID", 0u16)?,
            bb_min: read_vec3_or(root, "BBMin", Vec3::ZERO)?,
            bb_max: read_vec3_or(root, "BBMax", Vec3::ZERO)?,
            polygons,
            links,
            cover_points,
        })
    }

    fn read_polygon(item: &Element) -> Result<NavPolygon, CodecError> {
        let flags_line = read_text(item, "Flags");
        let fields: Vec<u16> = flags_line
            .split_whitespace()
            .map(|token| {
                token.parse::<u16>().map_err(|_| {
                    XmlError::schema("Flags", format!("ill-typed flag field \"{}\"", token))
                })
            })
            .collect::<Result<_, _>>()?;
        if fields.len() != 7 {
            return Err(XmlError::schema(
                "Flags",
                format!("expected 7 flag fields, found {}", fields.len()),
            )
            .into());
        }
        if let Some(field) = fields.iter().find(|&&f| f > 255) {
            return Err(XmlError::schema("Flags", format!("flag field {} exceeds a byte", field)).into());
        }
        // f0 f1 f2 f3 cx cy f4; the packed centroid is re-derived from
        // the geometry on export
        let flags0 = fields[0] | (fields[1] << 8);
        let flags1 = fields[2] | (fields[3] << 8);
        let flags2 = fields[6] as u8;

        let mut vertices = Vec::new();
        if let Some(verts) = item.child("Vertices") {
            for line in verts.text.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                vertices.push(NavReader::parse_vertex_line(line)?);
            }
        }

        let mut edges = Vec::new();
        if let Some(container) = item.child("Edges") {
            for line in container.text.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                edges.push(NavReader::parse_edge_line(line)?);
            }
        }
        if edges.len() != vertices.len() {
            warn!(
                "polygon has {} edge records for {} vertices",
                edges.len(),
                vertices.len()
            );
            edges.resize(vertices.len(), NavEdge::default());
        }

        let mut polygon = NavPolygon {
            vertices,
            edges,
            flags0,
            flags1,
            flags2,
        };

        // stitch triangles are padded to quadrilaterals while editing
        if polygon.flags2 & POLY_FLAG_DLC_STITCH != 0 && polygon.vertices.len() == 3 {
            let last_vertex = polygon.vertices[2];
            let last_edge = polygon.edges[2];
            polygon.vertices.push(last_vertex);
            polygon.edges.push(last_edge);
        }

        Ok(polygon)
    }

    fn parse_vertex_line(line: &str) -> Result<Vec3, CodecError> {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(XmlError::schema("Vertices", format!("bad vertex line \"{}\"", line)).into());
        }
        let component = |text: &str| -> Result<f32, XmlError> {
            text.parse::<f32>()
                .map_err(|_| XmlError::schema("Vertices", format!("ill-typed component \"{}\"", text)))
        };
        Ok(Vec3::new(
            component(parts[0])?,
            component(parts[1])?,
            component(parts[2])?,
        ))
    }

    /// One edge record per line: `cell:poly; flagA:flagB`.
    fn parse_edge_line(line: &str) -> Result<NavEdge, CodecError> {
        let bad = || XmlError::schema("Edges", format!("bad edge line \"{}\"", line));
        let (adjacency, flags) = line.split_once(';').ok_or_else(bad)?;
        let (cell, poly) = adjacency.trim().split_once(':').ok_or_else(bad)?;
        let (flag_a, flag_b) = flags.trim().split_once(':').ok_or_else(bad)?;
        Ok(NavEdge {
            cell: cell.trim().parse().map_err(|_| bad())?,
            poly: poly.trim().parse().map_err(|_| bad())?,
            flag_a: flag_a.trim().parse().map_err(|_| bad())?,
            flag_b: flag_b.trim().parse().map_err(|_| bad())?,
        })
    }

    fn read_link(item: &Element) -> Result<NavLink, CodecError> {
        Ok(NavLink {
            kind: read_value_or(item, "Type", 0)?,
            angle: read_value_or(item, "Angle", 0.0)?,
            position_from: read_vec3_or(item, "PositionFrom", Vec3::ZERO)?,
            position_to: read_vec3_or(item, "PositionTo", Vec3::ZERO)?,
            poly_from: read_value_or(item, "PolyFrom", 0)?,
            poly_to: read_value_or(item, "PolyTo", 0)?,
        })
    }

    fn read_cover_point(item: &Element) -> Result<NavCoverPoint, CodecError> {
        Ok(NavCoverPoint {
            kind: read_value_or(item, "Type", 0)?,
            angle: read_value_or(item, "Angle", 0.0)?,
            position: read_vec3_or(item, "Position", Vec3::ZERO)?,
        })
    }
}
