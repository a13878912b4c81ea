use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use glam::Vec3;
use log::warn;
use ragemap_xml::schema::{write_text, write_value, write_vec3};
use ragemap_xml::Element;

use crate::ymap::types::{BoxOccluder, CarGenerator, MapDocument, ModelOccluder};
use crate::{CodecError, MAX_OCCLUDER_VERTS};

/// Bounding box provider for archetypes referenced by entities; used to
/// grow the streaming extents beyond bare positions. The box is
/// archetype-local (min, max).
pub type ArchetypeBounds<'a> = &'a dyn Fn(&str) -> Option<(Vec3, Vec3)>;

pub struct MapWriter {}

impl MapWriter {
    pub fn write<W: Write>(doc: &MapDocument, out: W) -> Result<(), CodecError> {
        let tree = MapWriter::to_tree(doc)?;
        ragemap_xml::write_document(&tree, out)?;
        Ok(())
    }

    pub fn to_tree(doc: &MapDocument) -> Result<Element, CodecError> {
        MapWriter::to_tree_with_bounds(doc, &|_| None)
    }

    pub fn to_tree_with_bounds(
        doc: &MapDocument,
        bounds: ArchetypeBounds,
    ) -> Result<Element, CodecError> {
        let mut root = Element::new("CMapData");
        write_text(&mut root, "name", &doc.name);
        write_text(&mut root, "parent", &doc.parent);
        write_value(&mut root, "flags", &doc.flags);
        write_value(&mut root, "contentFlags", &doc.content_flags);

        let extents = MapWriter::compute_extents(doc, bounds);
        write_vec3(&mut root, "streamingExtentsMin", extents.streaming_min);
        write_vec3(&mut root, "streamingExtentsMax", extents.streaming_max);
        write_vec3(&mut root, "entitiesExtentsMin", extents.entities_min);
        write_vec3(&mut root, "entitiesExtentsMax", extents.entities_max);

        let mut entities = Element::new("entities");
        for entity in &doc.entities {
            let mut stored = entity.clone();
            // inverse of the load-time inversion
            stored.rotation = stored.rotation.inverse();
            entities.push(stored.to_element());
        }
        root.push(entities);

        let mut occlude_models = Element::new("occludeModels");
        for occluder in &doc.occlude_models {
            match MapWriter::occlude_model_to_element(occluder) {
                Ok(item) => occlude_models.push(item),
                Err(CodecError::TooManyVerts { count }) => {
                    warn!("skipping occluder model with {} vertices", count);
                }
                Err(other) => return Err(other),
            }
        }
        root.push(occlude_models);

        let mut box_occluders = Element::new("boxOccluders");
        for occluder in &doc.box_occluders {
            box_occluders.push(MapWriter::box_occluder_to_element(occluder));
        }
        root.push(box_occluders);

        let mut car_generators = Element::new("carGenerators");
        for generator in &doc.car_generators {
            car_generators.push(MapWriter::car_generator_to_element(generator));
        }
        root.push(car_generators);

        let mut dictionaries = Element::new("physicsDictionaries");
        for dictionary in &doc.physics_dictionaries {
            dictionaries.push(Element::new("Item").with_text(dictionary.clone()));
        }
        root.push(dictionaries);

        Ok(root)
    }

    /// Entity extents are the union of entity bounds; streaming extents
    /// grow each bound by the entity's lod distance.
    fn compute_extents(doc: &MapDocument, bounds: ArchetypeBounds) -> Extents {
        if doc.entities.is_empty() {
            return Extents {
                streaming_min: doc.streaming_extents_min,
                streaming_max: doc.streaming_extents_max,
                entities_min: doc.entities_extents_min,
                entities_max: doc.entities_extents_max,
            };
        }

        let mut ext = Extents {
            streaming_min: Vec3::MAX,
            streaming_max: Vec3::MIN,
            entities_min: Vec3::MAX,
            entities_max: Vec3::MIN,
        };
        for entity in &doc.entities {
            let (bb_min, bb_max) = match bounds(&entity.archetype_name) {
                Some((min, max)) => (entity.position + min, entity.position + max),
                None => (entity.position, entity.position),
            };
            ext.entities_min = ext.entities_min.min(bb_min);
            ext.entities_max = ext.entities_max.max(bb_max);
            ext.streaming_min = ext.streaming_min.min(bb_min - Vec3::splat(entity.lod_dist));
            ext.streaming_max = ext.streaming_max.max(bb_max + Vec3::splat(entity.lod_dist));
        }
        ext
    }

    fn occlude_model_to_element(occluder: &ModelOccluder) -> Result<Element, CodecError> {
        if occluder.vertices.len() > MAX_OCCLUDER_VERTS {
            return Err(CodecError::TooManyVerts {
                count: occluder.vertices.len(),
            });
        }

        let num_verts_in_bytes = (occluder.vertices.len() * 12) as u32;
        let num_tris = (occluder.indices.len() / 3) as u32;
        let data_size = num_verts_in_bytes + num_tris * 3;

        let mut blob = Vec::with_capacity(data_size as usize);
        for vertex in &occluder.vertices {
            blob.write_f32::<LittleEndian>(vertex.x)?;
            blob.write_f32::<LittleEndian>(vertex.y)?;
            blob.write_f32::<LittleEndian>(vertex.z)?;
        }
        blob.extend_from_slice(&occluder.indices);

        let mut item = Element::new("Item");
        write_vec3(&mut item, "bmin", occluder.bb_min);
        write_vec3(&mut item, "bmax", occluder.bb_max);
        write_value(&mut item, "dataSize", &data_size);
        write_text(&mut item, "verts", &encode_hex_blob(&blob));
        write_value(&mut item, "flags", &occluder.flags);
        write_value(&mut item, "numVertsInBytes", &num_verts_in_bytes);
        // bit 15 marks the float vertex format
        write_value(&mut item, "numTris", &(num_tris | 0x8000));
        Ok(item)
    }

    fn box_occluder_to_element(occluder: &BoxOccluder) -> Element {
        let quantize = |v: f32| (v * 4.0).round() as i16;
        let dir = occluder.rotation * Vec3::X * 0.5;

        let mut item = Element::new("Item");
        write_value(&mut item, "iCenterX", &quantize(occluder.center.x));
        write_value(&mut item, "iCenterY", &quantize(occluder.center.y));
        write_value(&mut item, "iCenterZ", &quantize(occluder.center.z));
        write_value(&mut item, "iCosZ", &((dir.x * 32767.0).round() as i16));
        write_value(&mut item, "iLength", &quantize(occluder.extents.x));
        write_value(&mut item, "iWidth", &quantize(occluder.extents.y));
        write_value(&mut item, "iHeight", &quantize(occluder.extents.z));
        write_value(&mut item, "iSinZ", &((dir.y * 32767.0).round() as i16));
        item
    }

    fn car_generator_to_element(generator: &CarGenerator) -> Element {
        let mut item = Element::new("Item");
        write_vec3(&mut item, "position", generator.position);
        write_value(&mut item, "orientX", &(5.0 * generator.heading.sin()));
        write_value(&mut item, "orientY", &(5.0 * generator.heading.cos()));
        write_value(&mut item, "perpendicularLength", &generator.perpendicular_length);
        write_text(&mut item, "carModel", &generator.car_model);
        write_value(&mut item, "flags", &generator.flags);
        write_value(&mut item, "bodyColorRemap1", &generator.body_color_remap[0]);
        write_value(&mut item, "bodyColorRemap2", &generator.body_color_remap[1]);
        write_value(&mut item, "bodyColorRemap3", &generator.body_color_remap[2]);
        write_value(&mut item, "bodyColorRemap4", &generator.body_color_remap[3]);
        write_text(&mut item, "popGroup", &generator.pop_group);
        write_value(&mut item, "livery", &generator.livery);
        item
    }
}

struct Extents {
    streaming_min: Vec3,
    streaming_max: Vec3,
    entities_min: Vec3,
    entities_max: Vec3,
}

/// 64 bytes (128 hex digits) per line, the layout the reference tool uses
/// for vertex blobs.
pub(crate) fn encode_hex_blob(data: &[u8]) -> String {
    let mut text = String::with_capacity(data.len() * 2 + data.len() / 32);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 && i % 64 == 0 {
            text.push('\n');
        }
        text.push_str(&format!("{:02X}", byte));
    }
    text
}
