use std::collections::{HashMap, HashSet};
use std::io::Write;

use log::warn;
use ragemap_xml::schema::{
    fmt_f32, write_text, write_text_list, write_value, write_vec3, write_vec4,
};
use ragemap_xml::Element;

use crate::common::extensions::write_extension_list;
use crate::ytyp::types::{
    Archetype, ArchetypeDef, MloArchetype, MloEntity, MloPortal, MloRoom, MloTimeCycleModifier,
    TypesDocument, LOCATION_PORTAL_BIT,
};
use crate::CodecError;

pub struct TypesWriter {}

impl TypesWriter {
    /// All-or-nothing: the tree is fully built (and validated) before a
    /// single byte goes out.
    pub fn write<W: Write>(doc: &TypesDocument, out: W) -> Result<(), CodecError> {
        let tree = TypesWriter::to_tree(doc)?;
        ragemap_xml::write_document(&tree, out)?;
        Ok(())
    }

    pub fn to_tree(doc: &TypesDocument) -> Result<Element, CodecError> {
        let mut root = Element::new("CMapTypes");
        write_text(&mut root, "name", &doc.name);
        write_extension_list(&mut root, &doc.extensions);

        let mut archetypes = Element::new("archetypes");
        for archetype in &doc.archetypes {
            archetypes.push(TypesWriter::archetype_to_element(archetype)?);
        }
        root.push(archetypes);

        if let Some(composite) = &doc.composite_entity_types {
            root.push(composite.clone());
        }
        Ok(root)
    }

    fn archetype_to_element(archetype: &Archetype) -> Result<Element, CodecError> {
        let mut item = Element::new("Item").with_attr("type", archetype.type_name());
        TypesWriter::write_archetype_def(&mut item, archetype.def());
        match archetype {
            Archetype::Base(_) => {}
            Archetype::Time(time) => write_value(&mut item, "timeFlags", &time.time_flags),
            Archetype::Mlo(mlo) => TypesWriter::write_mlo(&mut item, mlo)?,
        }
        Ok(item)
    }

    fn write_archetype_def(item: &mut Element, def: &ArchetypeDef) {
        write_value(item, "lodDist", &def.lod_dist);
        write_value(item, "flags", &def.flags);
        write_value(item, "specialAttribute", &def.special_attribute);
        write_vec3(item, "bbMin", def.bb_min);
        write_vec3(item, "bbMax", def.bb_max);
        write_vec3(item, "bsCentre", def.bs_center);
        write_value(item, "bsRadius", &def.bs_radius);
        write_value(item, "hdTextureDist", &def.hd_texture_dist);
        write_text(item, "name", &def.name);
        write_text(item, "textureDictionary", &def.texture_dictionary);
        write_text(item, "clipDictionary", &def.clip_dictionary);
        write_text(item, "drawableDictionary", &def.drawable_dictionary);
        write_text(item, "physicsDictionary", &def.physics_dictionary);
        write_text(item, "assetName", &def.asset_name);
        write_text(item, "assetType", def.asset_type.as_str());
        write_extension_list(item, &def.extensions);
    }

    /// The MLO write pipeline: partition entities by owning set, rebuild
    /// the room/portal object lists and portal counts from attachment
    /// keys, then re-encode set locations.
    fn write_mlo(item: &mut Element, mlo: &MloArchetype) -> Result<(), CodecError> {
        TypesWriter::check_unique_ids(mlo)?;

        let room_index: HashMap<u32, usize> =
            mlo.rooms.iter().enumerate().map(|(i, r)| (r.id, i)).collect();
        let portal_index: HashMap<u32, usize> =
            mlo.portals.iter().enumerate().map(|(i, p)| (p.id, i)).collect();

        let top_level: Vec<&MloEntity> = mlo
            .entities
            .iter()
            .filter(|e| e.attached_entity_set_id.is_none())
            .collect();

        write_value(item, "mloFlags", &mlo.mlo_flags);

        let mut rooms = Element::new("rooms");
        for room in &mlo.rooms {
            rooms.push(TypesWriter::room_to_element(room, mlo, &top_level));
        }
        item.push(rooms);

        let mut portals = Element::new("portals");
        for portal in &mlo.portals {
            portals.push(TypesWriter::portal_to_element(portal, &room_index, &top_level));
        }
        item.push(portals);

        let mut entity_sets = Element::new("entitySets");
        for set in &mlo.entity_sets {
            let mut set_item = Element::new("Item");
            write_text(&mut set_item, "name", &set.name);

            let members: Vec<&MloEntity> = mlo
                .entities
                .iter()
                .filter(|e| e.attached_entity_set_id == Some(set.id))
                .collect();

            let locations: Vec<i64> = members
                .iter()
                .map(|entity| TypesWriter::encode_set_location(entity, &room_index, &portal_index))
                .collect();
            write_text_list(&mut set_item, "locations", &locations);

            let mut entities = Element::new("entities");
            for entity in &members {
                entities.push(entity.def.to_element());
            }
            set_item.push(entities);
            entity_sets.push(set_item);
        }
        item.push(entity_sets);

        let mut modifiers = Element::new("timeCycleModifiers");
        for modifier in &mlo.timecycle_modifiers {
            modifiers.push(TypesWriter::timecycle_modifier_to_element(modifier));
        }
        item.push(modifiers);

        let mut entities = Element::new("entities");
        for entity in &top_level {
            entities.push(entity.def.to_element());
        }
        item.push(entities);

        Ok(())
    }

    fn check_unique_ids(mlo: &MloArchetype) -> Result<(), CodecError> {
        let mut seen = HashSet::new();
        for room in &mlo.rooms {
            if !seen.insert(room.id) {
                return Err(CodecError::Integrity {
                    what: "rooms",
                    reason: format!("duplicate stable id {}", room.id),
                });
            }
        }
        seen.clear();
        for portal in &mlo.portals {
            if !seen.insert(portal.id) {
                return Err(CodecError::Integrity {
                    what: "portals",
                    reason: format!("duplicate stable id {}", portal.id),
                });
            }
        }
        seen.clear();
        for set in &mlo.entity_sets {
            if !seen.insert(set.id) {
                return Err(CodecError::Integrity {
                    what: "entitySets",
                    reason: format!("duplicate stable id {}", set.id),
                });
            }
        }
        Ok(())
    }

    /// Top-level entity indices whose attachment matches `predicate`.
    fn attached_indices(top_level: &[&MloEntity], predicate: impl Fn(&MloEntity) -> bool) -> Vec<u32> {
        let mut indices = Vec::new();
        for (i, entity) in top_level.iter().enumerate() {
            if predicate(entity) {
                indices.push(i as u32);
            }
        }
        indices
    }

    fn room_to_element(room: &MloRoom, mlo: &MloArchetype, top_level: &[&MloEntity]) -> Element {
        let mut item = Element::new("Item");
        write_text(&mut item, "name", &room.name);
        write_vec3(&mut item, "bbMin", room.bb_min);
        write_vec3(&mut item, "bbMax", room.bb_max);
        write_value(&mut item, "blend", &room.blend);
        write_text(&mut item, "timecycleName", &room.timecycle);
        write_text(&mut item, "secondaryTimecycleName", &room.secondary_timecycle);
        write_value(&mut item, "flags", &room.flags);
        write_value(&mut item, "portalCount", &mlo.portal_count_of_room(room.id));
        write_value(&mut item, "floorId", &room.floor_id);
        write_value(&mut item, "exteriorVisibiltyDepth", &room.exterior_visibility_depth);
        let attached =
            TypesWriter::attached_indices(top_level, |e| e.attached_room_id == Some(room.id));
        write_text_list(&mut item, "attachedObjects", &attached);
        item
    }

    fn portal_to_element(
        portal: &MloPortal,
        room_index: &HashMap<u32, usize>,
        top_level: &[&MloEntity],
    ) -> Element {
        let resolve = |room_id: Option<u32>, which: &str| -> i32 {
            match room_id {
                Some(id) => match room_index.get(&id) {
                    Some(&index) => index as i32,
                    None => {
                        warn!("portal {} {} references removed room {}", portal.id, which, id);
                        -1
                    }
                },
                None => -1,
            }
        };

        let mut item = Element::new("Item");
        write_value(&mut item, "roomFrom", &resolve(portal.room_from, "roomFrom"));
        write_value(&mut item, "roomTo", &resolve(portal.room_to, "roomTo"));
        write_value(&mut item, "flags", &portal.flags);
        write_value(&mut item, "mirrorPriority", &portal.mirror_priority);
        write_value(&mut item, "opacity", &portal.opacity);
        write_value(&mut item, "audioOcclusion", &portal.audio_occlusion);
        let mut corners = Element::new("corners");
        for corner in portal.corners {
            corners.push(
                Element::new("Item")
                    .with_attr("x", fmt_f32(corner.x))
                    .with_attr("y", fmt_f32(corner.y))
                    .with_attr("z", fmt_f32(corner.z)),
            );
        }
        item.push(corners);
        let attached =
            TypesWriter::attached_indices(top_level, |e| e.attached_portal_id == Some(portal.id));
        write_text_list(&mut item, "attachedObjects", &attached);
        item
    }

    /// Inverse of the MSB decoding: portal attachments carry bit 31.
    /// A dangling attachment is coerced to the unattached sentinel.
    fn encode_set_location(
        entity: &MloEntity,
        room_index: &HashMap<u32, usize>,
        portal_index: &HashMap<u32, usize>,
    ) -> i64 {
        if let Some(portal_id) = entity.attached_portal_id {
            match portal_index.get(&portal_id) {
                Some(&index) => return (index as u32 | LOCATION_PORTAL_BIT) as i64,
                None => warn!("set entity references removed portal {}", portal_id),
            }
        }
        if let Some(room_id) = entity.attached_room_id {
            match room_index.get(&room_id) {
                Some(&index) => return index as i64,
                None => warn!("set entity references removed room {}", room_id),
            }
        }
        -1
    }

    fn timecycle_modifier_to_element(modifier: &MloTimeCycleModifier) -> Element {
        let mut item = Element::new("Item");
        write_text(&mut item, "name", &modifier.name);
        write_vec4(&mut item, "sphere", modifier.sphere);
        write_value(&mut item, "percentage", &modifier.percentage);
        write_value(&mut item, "range", &modifier.range);
        write_value(&mut item, "startHour", &modifier.start_hour);
        write_value(&mut item, "endHour", &modifier.end_hour);
        item
    }
}
