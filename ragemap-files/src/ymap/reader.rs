use std::io::{BufRead, Cursor};

use byteorder::{LittleEndian, ReadBytesExt};
use glam::{Quat, Vec3};
use log::warn;
use ragemap_xml::schema::{read_text, read_value_or, read_vec3_or};
use ragemap_xml::{Element, XmlError};

use crate::common::entity::EntityDef;
use crate::ymap::types::{BoxOccluder, CarGenerator, MapDocument, ModelOccluder};
use crate::{AbortSignal, CodecError};

pub struct MapReader {}

impl MapReader {
    pub fn read<R: BufRead>(rdr: R, abort: &AbortSignal) -> Result<MapDocument, CodecError> {
        let root = ragemap_xml::read_document(rdr)?;
        MapReader::from_tree(&root, abort)
    }

    pub fn from_tree(root: &Element, abort: &AbortSignal) -> Result<MapDocument, CodecError> {
        if root.name != "CMapData" {
            return Err(XmlError::schema(&root.name, "expected a CMapData document").into());
        }

        let mut entities = Vec::new();
        if let Some(container) = root.child("entities") {
            for item in container.items() {
                abort.check()?;
                let mut entity = EntityDef::from_element(item)?;
                // placement rotations are stored inverted on disk
                entity.rotation = entity.rotation.inverse();
                entities.push(entity);
            }
        }

        let mut occlude_models = Vec::new();
        if let Some(container) = root.child("occludeModels") {
            for item in container.items() {
                abort.check()?;
                occlude_models.push(MapReader::read_occlude_model(item)?);
            }
        }

        let mut box_occluders = Vec::new();
        if let Some(container) = root.child("boxOccluders") {
            for item in container.items() {
                box_occluders.push(MapReader::read_box_occluder(item)?);
            }
        }

        let mut car_generators = Vec::new();
        if let Some(container) = root.child("carGenerators") {
            for item in container.items() {
                car_generators.push(MapReader::read_car_generator(item)?);
            }
        }

        let mut physics_dictionaries = Vec::new();
        if let Some(container) = root.child("physicsDictionaries") {
            for item in container.items() {
                physics_dictionaries.push(item.text.trim().to_owned());
            }
        }

        Ok(MapDocument {
            name: read_text(root, "name"),
            parent: read_text(root, "parent"),
            flags: read_value_or(root, "flags", 0)?,
            content_flags: read_value_or(root, "contentFlags", 0)?,
            streaming_extents_min: read_vec3_or(root, "streamingExtentsMin", Vec3::ZERO)?,
            streaming_extents_max: read_vec3_or(root, "streamingExtentsMax", Vec3::ZERO)?,
            entities_extents_min: read_vec3_or(root, "entitiesExtentsMin", Vec3::ZERO)?,
            entities_extents_max: read_vec3_or(root, "entitiesExtentsMax", Vec3::ZERO)?,
            entities,
            occlude_models,
            box_occluders,
            car_generators,
            physics_dictionaries,
        })
    }

    /// Splits the byte blob at `numVertsInBytes`: the prefix holds
    /// little-endian f32 triples, the suffix byte-sized triangle indices.
    fn read_occlude_model(item: &Element) -> Result<ModelOccluder, CodecError> {
        let data = decode_hex_blob(&read_text(item, "verts"))
            .map_err(|reason| XmlError::schema("verts", reason))?;
        let num_verts_in_bytes: usize = read_value_or(item, "numVertsInBytes", 0u32)? as usize;
        let num_tris: u32 = read_value_or(item, "numTris", 0)?;
        if num_tris & 0x8000 == 0 {
            warn!("occluder model without float-format bit in numTris");
        }
        if num_verts_in_bytes > data.len() || num_verts_in_bytes % 12 != 0 {
            return Err(XmlError::schema("verts", "vertex byte count does not match blob").into());
        }

        let mut rdr = Cursor::new(&data[..num_verts_in_bytes]);
        let mut vertices = Vec::with_capacity(num_verts_in_bytes / 12);
        for _ in 0..num_verts_in_bytes / 12 {
            vertices.push(Vec3::new(
                rdr.read_f32::<LittleEndian>()?,
                rdr.read_f32::<LittleEndian>()?,
                rdr.read_f32::<LittleEndian>()?,
            ));
        }
        let indices = data[num_verts_in_bytes..].to_vec();

        Ok(ModelOccluder {
            bb_min: read_vec3_or(item, "bmin", Vec3::ZERO)?,
            bb_max: read_vec3_or(item, "bmax", Vec3::ZERO)?,
            flags: read_value_or(item, "flags", 0)?,
            vertices,
            indices,
        })
    }

    fn read_box_occluder(item: &Element) -> Result<BoxOccluder, CodecError> {
        let center = Vec3::new(
            read_value_or(item, "iCenterX", 0i16)? as f32,
            read_value_or(item, "iCenterY", 0i16)? as f32,
            read_value_or(item, "iCenterZ", 0i16)? as f32,
        ) * 0.25;
        let extents = Vec3::new(
            read_value_or(item, "iLength", 0i16)? as f32,
            read_value_or(item, "iWidth", 0i16)? as f32,
            read_value_or(item, "iHeight", 0i16)? as f32,
        ) * 0.25;
        let sin = read_value_or(item, "iSinZ", 0i16)? as f32;
        let cos = read_value_or(item, "iCosZ", 0i16)? as f32;
        let heading = if sin == 0.0 && cos == 0.0 {
            0.0
        } else {
            sin.atan2(cos)
        };
        Ok(BoxOccluder {
            center,
            extents,
            rotation: Quat::from_rotation_z(heading),
        })
    }

    fn read_car_generator(item: &Element) -> Result<CarGenerator, CodecError> {
        let orient_x: f32 = read_value_or(item, "orientX", 0.0)?;
        let orient_y: f32 = read_value_or(item, "orientY", 0.0)?;
        Ok(CarGenerator {
            position: read_vec3_or(item, "position", Vec3::ZERO)?,
            heading: orient_x.atan2(orient_y),
            perpendicular_length: read_value_or(item, "perpendicularLength", 0.0)?,
            car_model: read_text(item, "carModel"),
            flags: read_value_or(item, "flags", 0)?,
            body_color_remap: [
                read_value_or(item, "bodyColorRemap1", -1)?,
                read_value_or(item, "bodyColorRemap2", -1)?,
                read_value_or(item, "bodyColorRemap3", -1)?,
                read_value_or(item, "bodyColorRemap4", -1)?,
            ],
            pop_group: read_text(item, "popGroup"),
            livery: read_value_or(item, "livery", -1)?,
        })
    }
}

pub(crate) fn decode_hex_blob(text: &str) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::new();
    let mut nibbles = text.chars().filter(|c| !c.is_whitespace());
    while let Some(high) = nibbles.next() {
        let low = nibbles
            .next()
            .ok_or_else(|| "odd number of hex digits in blob".to_owned())?;
        let high = high
            .to_digit(16)
            .ok_or_else(|| format!("invalid hex digit {}", high))?;
        let low = low
            .to_digit(16)
            .ok_or_else(|| format!("invalid hex digit {}", low))?;
        bytes.push(((high << 4) | low) as u8);
    }
    Ok(bytes)
}
