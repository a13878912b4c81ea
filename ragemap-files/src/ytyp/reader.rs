use std::io::BufRead;

use glam::Vec3;
use log::warn;
use ragemap_xml::schema::{read_attr, read_text, read_text_list, read_value_or, read_vec3_or, read_vec4};
use ragemap_xml::{Element, XmlError};

use crate::common::entity::EntityDef;
use crate::common::extensions::read_extension_list;
use crate::ytyp::types::{
    Archetype, ArchetypeDef, AssetType, MloArchetype, MloEntity, MloEntitySet, MloPortal, MloRoom,
    MloTimeCycleModifier, TimeArchetype, TypesDocument, LOCATION_PORTAL_BIT,
};
use crate::{AbortSignal, CodecError};

pub struct TypesReader {}

impl TypesReader {
    pub fn read<R: BufRead>(rdr: R, abort: &AbortSignal) -> Result<TypesDocument, CodecError> {
        let root = ragemap_xml::read_document(rdr)?;
        TypesReader::from_tree(&root, abort)
    }

    pub fn from_tree(root: &Element, abort: &AbortSignal) -> Result<TypesDocument, CodecError> {
        if root.name != "CMapTypes" {
            return Err(XmlError::schema(&root.name, "expected a CMapTypes document").into());
        }

        let mut archetypes = Vec::new();
        if let Some(container) = root.child("archetypes") {
            for item in container.items() {
                abort.check()?;
                match TypesReader::read_archetype(item)? {
                    Some(archetype) => archetypes.push(archetype),
                    None => continue,
                }
            }
        }

        Ok(TypesDocument {
            name: read_text(root, "name"),
            extensions: read_extension_list(root)?,
            archetypes,
            composite_entity_types: root.child("compositeEntityTypes").cloned(),
        })
    }

    fn read_archetype(item: &Element) -> Result<Option<Archetype>, CodecError> {
        let Some(type_name) = item.attr("type") else {
            warn!("archetype item without type attribute, skipping");
            return Ok(None);
        };
        match type_name {
            "CBaseArchetypeDef" => Ok(Some(Archetype::Base(TypesReader::read_archetype_def(item)?))),
            "CTimeArchetypeDef" => Ok(Some(Archetype::Time(TimeArchetype {
                base: TypesReader::read_archetype_def(item)?,
                time_flags: read_value_or(item, "timeFlags", 0)?,
            }))),
            "CMloArchetypeDef" => Ok(Some(Archetype::Mlo(TypesReader::read_mlo(item)?))),
            other => {
                warn!("unknown archetype type {}, skipping item", other);
                Ok(None)
            }
        }
    }

    fn read_archetype_def(item: &Element) -> Result<ArchetypeDef, CodecError> {
        let asset_type_text = read_text(item, "assetType");
        let asset_type = match AssetType::parse(&asset_type_text) {
            Some(at) => at,
            None => {
                if !asset_type_text.is_empty() {
                    warn!("unknown assetType {}, defaulting", asset_type_text);
                }
                AssetType::default()
            }
        };

        Ok(ArchetypeDef {
            name: read_text(item, "name"),
            lod_dist: read_value_or(item, "lodDist", 0.0)?,
            flags: read_value_or(item, "flags", 0)?,
            special_attribute: read_value_or(item, "specialAttribute", 0)?,
            hd_texture_dist: read_value_or(item, "hdTextureDist", 0.0)?,
            bb_min: read_vec3_or(item, "bbMin", Vec3::ZERO)?,
            bb_max: read_vec3_or(item, "bbMax", Vec3::ZERO)?,
            bs_center: read_vec3_or(item, "bsCentre", Vec3::ZERO)?,
            bs_radius: read_value_or(item, "bsRadius", 0.0)?,
            texture_dictionary: read_text(item, "textureDictionary"),
            clip_dictionary: read_text(item, "clipDictionary"),
            drawable_dictionary: read_text(item, "drawableDictionary"),
            physics_dictionary: read_text(item, "physicsDictionary"),
            asset_name: read_text(item, "assetName"),
            asset_type,
            extensions: read_extension_list(item)?,
        })
    }

    /// The MLO read pipeline: rooms first (fresh stable ids), then
    /// portals (room references resolved), then entities (attachment
    /// looked up in the room/portal object lists), then entity sets
    /// (MSB-coded locations), then timecycle modifiers.
    fn read_mlo(item: &Element) -> Result<MloArchetype, CodecError> {
        let mut mlo = MloArchetype::default();
        mlo.base = TypesReader::read_archetype_def(item)?;
        mlo.mlo_flags = read_value_or(item, "mloFlags", 0)?;

        if let Some(rooms) = item.child("rooms") {
            for room_item in rooms.items() {
                let id = mlo.alloc_room_id();
                mlo.rooms.push(TypesReader::read_room(room_item, id)?);
            }
        }

        if let Some(portals) = item.child("portals") {
            for portal_item in portals.items() {
                let id = mlo.alloc_portal_id();
                let portal = TypesReader::read_portal(portal_item, id, &mlo.rooms)?;
                mlo.portals.push(portal);
            }
        }

        if let Some(entities) = item.child("entities") {
            for entity_item in entities.items() {
                let def = EntityDef::from_element(entity_item)?;
                mlo.entities.push(MloEntity {
                    def,
                    ..Default::default()
                });
            }
        }

        // resolve attachment from the room/portal object index lists
        for (portal_index, portal) in mlo.portals.iter().enumerate() {
            for &entity_index in &portal.attached_objects {
                match mlo.entities.get_mut(entity_index as usize) {
                    Some(entity) => entity.attached_portal_id = Some(portal.id),
                    None => warn!(
                        "portal {} references missing entity index {}",
                        portal_index, entity_index
                    ),
                }
            }
        }
        for (room_index, room) in mlo.rooms.iter().enumerate() {
            for &entity_index in &room.attached_objects {
                match mlo.entities.get_mut(entity_index as usize) {
                    Some(entity) => entity.attached_room_id = Some(room.id),
                    None => warn!(
                        "room {} references missing entity index {}",
                        room_index, entity_index
                    ),
                }
            }
        }

        if let Some(sets) = item.child("entitySets") {
            for set_item in sets.items() {
                let id = mlo.alloc_entity_set_id();
                let name = read_text(set_item, "name");
                let locations: Vec<i64> = read_text_list(set_item, "locations")?;

                let mut members = Vec::new();
                if let Some(container) = set_item.child("entities") {
                    for entity_item in container.items() {
                        members.push(EntityDef::from_element(entity_item)?);
                    }
                }
                if members.len() != locations.len() {
                    warn!(
                        "entity set {} has {} locations for {} entities",
                        name,
                        locations.len(),
                        members.len()
                    );
                }

                for (i, def) in members.into_iter().enumerate() {
                    let mut entity = MloEntity {
                        def,
                        attached_entity_set_id: Some(id),
                        ..Default::default()
                    };
                    match locations.get(i) {
                        Some(&location) if location >= 0 => {
                            TypesReader::apply_set_location(&mut entity, location as u32, &mlo);
                        }
                        Some(&location) => {
                            warn!("entity set {} has unattached location {}", name, location);
                        }
                        None => {}
                    }
                    mlo.entities.push(entity);
                }

                mlo.entity_sets.push(MloEntitySet { id, name });
            }
        }

        if let Some(modifiers) = item.child("timeCycleModifiers") {
            for modifier_item in modifiers.items() {
                mlo.timecycle_modifiers
                    .push(TypesReader::read_timecycle_modifier(modifier_item)?);
            }
        }

        Ok(mlo)
    }

    /// MSB set: portal attachment by index; otherwise a room index.
    fn apply_set_location(entity: &mut MloEntity, location: u32, mlo: &MloArchetype) {
        if location & LOCATION_PORTAL_BIT != 0 {
            let portal_index = (location & !LOCATION_PORTAL_BIT) as usize;
            match mlo.portals.get(portal_index) {
                Some(portal) => entity.attached_portal_id = Some(portal.id),
                None => warn!(
                    "entity set location references missing portal index {}",
                    portal_index
                ),
            }
        } else {
            match mlo.rooms.get(location as usize) {
                Some(room) => entity.attached_room_id = Some(room.id),
                None => warn!("entity set location references missing room index {}", location),
            }
        }
    }

    fn read_room(item: &Element, id: u32) -> Result<MloRoom, CodecError> {
        Ok(MloRoom {
            id,
            name: read_text(item, "name"),
            bb_min: read_vec3_or(item, "bbMin", Vec3::ZERO)?,
            bb_max: read_vec3_or(item, "bbMax", Vec3::ZERO)?,
            blend: read_value_or(item, "blend", 1.0)?,
            timecycle: read_text(item, "timecycleName"),
            secondary_timecycle: read_text(item, "secondaryTimecycleName"),
            flags: read_value_or(item, "flags", 0)?,
            portal_count: read_value_or(item, "portalCount", 0)?,
            floor_id: read_value_or(item, "floorId", 0)?,
            exterior_visibility_depth: read_value_or(item, "exteriorVisibiltyDepth", -1)?,
            attached_objects: read_text_list(item, "attachedObjects")?,
        })
    }

    fn read_portal(item: &Element, id: u32, rooms: &[MloRoom]) -> Result<MloPortal, CodecError> {
        let resolve_room = |index: i32, which: &str| -> Option<u32> {
            if index < 0 {
                return None;
            }
            match rooms.get(index as usize) {
                Some(room) => Some(room.id),
                None => {
                    warn!("portal {} {} references missing room index {}", id, which, index);
                    None
                }
            }
        };

        let mut corners = [Vec3::ZERO; 4];
        if let Some(container) = item.child("corners") {
            for (i, corner) in container.items().take(4).enumerate() {
                corners[i] = Vec3::new(
                    read_attr::<f32>(corner, "x")?,
                    read_attr::<f32>(corner, "y")?,
                    read_attr::<f32>(corner, "z")?,
                );
            }
        }

        Ok(MloPortal {
            id,
            room_from: resolve_room(read_value_or(item, "roomFrom", -1)?, "roomFrom"),
            room_to: resolve_room(read_value_or(item, "roomTo", -1)?, "roomTo"),
            flags: read_value_or(item, "flags", 0)?,
            mirror_priority: read_value_or(item, "mirrorPriority", 0)?,
            opacity: read_value_or(item, "opacity", 0.0)?,
            audio_occlusion: read_value_or(item, "audioOcclusion", 0)?,
            corners,
            attached_objects: read_text_list(item, "attachedObjects")?,
        })
    }

    fn read_timecycle_modifier(item: &Element) -> Result<MloTimeCycleModifier, CodecError> {
        Ok(MloTimeCycleModifier {
            name: read_text(item, "name"),
            sphere: read_vec4(item, "sphere")?,
            percentage: read_value_or(item, "percentage", 0.0)?,
            range: read_value_or(item, "range", 0.0)?,
            start_hour: read_value_or(item, "startHour", 0)?,
            end_hour: read_value_or(item, "endHour", 0)?,
        })
    }
}
