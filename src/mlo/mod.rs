//! The MLO interior editing model.
//!
//! Wraps an [`MloArchetype`] with the integrity rules the codecs rely
//! on: stable id allocation, reference coercion on deletion, and the
//! attachment choice lists the embedding UI presents.

pub mod filter;

#[cfg(test)]
mod tests;

use itertools::Itertools;
use log::warn;
use ragemap_files::ytyp::types::{MloArchetype, MloEntity, MloEntitySet, MloPortal, MloRoom};
use ragemap_files::CodecError;

/// One entry of an attachment dropdown. Ids are stable; labels are
/// rebuilt from the current collection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentChoice {
    pub id: u32,
    pub label: String,
}

#[derive(Debug, Default)]
pub struct MloModel {
    archetype: MloArchetype,
    /// Bumped on every mutation; callers invalidate cached choice lists
    /// when it moves.
    generation: u64,
}

impl MloModel {
    pub fn new(archetype: MloArchetype) -> MloModel {
        MloModel {
            archetype,
            generation: 0,
        }
    }

    pub fn archetype(&self) -> &MloArchetype {
        &self.archetype
    }

    pub fn into_inner(self) -> MloArchetype {
        self.archetype
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn touch(&mut self) {
        self.generation += 1;
    }

    /// Adds the room under a fresh stable id and returns it.
    pub fn add_room(&mut self, mut room: MloRoom) -> u32 {
        let id = self.archetype.alloc_room_id();
        room.id = id;
        self.archetype.rooms.push(room);
        self.touch();
        id
    }

    pub fn add_portal(&mut self, mut portal: MloPortal) -> u32 {
        let id = self.archetype.alloc_portal_id();
        portal.id = id;
        self.archetype.portals.push(portal);
        self.touch();
        id
    }

    pub fn add_entity_set(&mut self, name: impl Into<String>) -> u32 {
        let id = self.archetype.alloc_entity_set_id();
        self.archetype.entity_sets.push(MloEntitySet {
            id,
            name: name.into(),
        });
        self.touch();
        id
    }

    pub fn add_entity(&mut self, entity: MloEntity) {
        self.archetype.entities.push(entity);
        self.touch();
    }

    /// Removes the room and coerces every reference to it (portal
    /// sides, entity attachments) to unattached. Entities themselves
    /// are never deleted.
    pub fn delete_room(&mut self, id: u32) -> bool {
        let before = self.archetype.rooms.len();
        self.archetype.rooms.retain(|r| r.id != id);
        if self.archetype.rooms.len() == before {
            warn!("delete_room: no room with id {}", id);
            return false;
        }
        for portal in &mut self.archetype.portals {
            if portal.room_from == Some(id) {
                portal.room_from = None;
            }
            if portal.room_to == Some(id) {
                portal.room_to = None;
            }
        }
        for entity in &mut self.archetype.entities {
            if entity.attached_room_id == Some(id) {
                entity.attached_room_id = None;
            }
        }
        self.touch();
        true
    }

    pub fn delete_portal(&mut self, id: u32) -> bool {
        let before = self.archetype.portals.len();
        self.archetype.portals.retain(|p| p.id != id);
        if self.archetype.portals.len() == before {
            warn!("delete_portal: no portal with id {}", id);
            return false;
        }
        for entity in &mut self.archetype.entities {
            if entity.attached_portal_id == Some(id) {
                entity.attached_portal_id = None;
            }
        }
        self.touch();
        true
    }

    /// Member entities stay in the archetype as top-level entities.
    pub fn delete_entity_set(&mut self, id: u32) -> bool {
        let before = self.archetype.entity_sets.len();
        self.archetype.entity_sets.retain(|s| s.id != id);
        if self.archetype.entity_sets.len() == before {
            warn!("delete_entity_set: no entity set with id {}", id);
            return false;
        }
        for entity in &mut self.archetype.entities {
            if entity.attached_entity_set_id == Some(id) {
                entity.attached_entity_set_id = None;
            }
        }
        self.touch();
        true
    }

    fn entity_mut(&mut self, index: usize) -> Result<&mut MloEntity, CodecError> {
        self.archetype.entities.get_mut(index).ok_or(CodecError::Reference {
            what: "entity",
            id: index as i64,
        })
    }

    /// Attaches an entity to a room; any portal attachment is released.
    pub fn attach_entity_to_room(&mut self, index: usize, room_id: u32) -> Result<(), CodecError> {
        if self.archetype.room(room_id).is_none() {
            return Err(CodecError::Reference {
                what: "room",
                id: room_id as i64,
            });
        }
        let entity = self.entity_mut(index)?;
        entity.attached_room_id = Some(room_id);
        entity.attached_portal_id = None;
        self.touch();
        Ok(())
    }

    pub fn attach_entity_to_portal(&mut self, index: usize, portal_id: u32) -> Result<(), CodecError> {
        if self.archetype.portal(portal_id).is_none() {
            return Err(CodecError::Reference {
                what: "portal",
                id: portal_id as i64,
            });
        }
        let entity = self.entity_mut(index)?;
        entity.attached_portal_id = Some(portal_id);
        entity.attached_room_id = None;
        self.touch();
        Ok(())
    }

    /// Moves an entity into an entity set. The room/portal attachment is
    /// kept; it becomes the set location on export.
    pub fn attach_entity_to_set(&mut self, index: usize, set_id: u32) -> Result<(), CodecError> {
        if self.archetype.entity_set(set_id).is_none() {
            return Err(CodecError::Reference {
                what: "entity set",
                id: set_id as i64,
            });
        }
        self.entity_mut(index)?.attached_entity_set_id = Some(set_id);
        self.touch();
        Ok(())
    }

    /// Clears every attachment key of an entity.
    pub fn detach_entity(&mut self, index: usize) -> Result<(), CodecError> {
        let entity = self.entity_mut(index)?;
        entity.attached_room_id = None;
        entity.attached_portal_id = None;
        entity.attached_entity_set_id = None;
        self.touch();
        Ok(())
    }

    pub fn room_choices(&self) -> Vec<AttachmentChoice> {
        self.archetype
            .rooms
            .iter()
            .map(|room| AttachmentChoice {
                id: room.id,
                label: room.name.clone(),
            })
            .collect()
    }

    pub fn portal_choices(&self) -> Vec<AttachmentChoice> {
        let room_name = |id: Option<u32>| -> String {
            id.and_then(|id| self.archetype.room(id))
                .map(|room| room.name.clone())
                .unwrap_or_else(|| "exterior".to_owned())
        };
        self.archetype
            .portals
            .iter()
            .enumerate()
            .map(|(index, portal)| AttachmentChoice {
                id: portal.id,
                label: format!(
                    "portal {} ({} -> {})",
                    index,
                    room_name(portal.room_from),
                    room_name(portal.room_to)
                ),
            })
            .collect()
    }

    pub fn entity_set_choices(&self) -> Vec<AttachmentChoice> {
        self.archetype
            .entity_sets
            .iter()
            .map(|set| AttachmentChoice {
                id: set.id,
                label: set.name.clone(),
            })
            .collect()
    }

    /// Pre-flight for the strict writer: everything reported here would
    /// fail the export or silently lose data.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for (what, ids) in [
            ("room", self.archetype.rooms.iter().map(|r| r.id).collect_vec()),
            ("portal", self.archetype.portals.iter().map(|p| p.id).collect_vec()),
            ("entity set", self.archetype.entity_sets.iter().map(|s| s.id).collect_vec()),
        ] {
            for id in ids.iter().duplicates() {
                issues.push(format!("duplicate {} id {}", what, id));
            }
        }

        for portal in &self.archetype.portals {
            for (which, room) in [("roomFrom", portal.room_from), ("roomTo", portal.room_to)] {
                if let Some(id) = room {
                    if self.archetype.room(id).is_none() {
                        issues.push(format!("portal {} {} references missing room {}", portal.id, which, id));
                    }
                }
            }
        }

        for (index, entity) in self.archetype.entities.iter().enumerate() {
            if let Some(id) = entity.attached_room_id {
                if self.archetype.room(id).is_none() {
                    issues.push(format!("entity {} references missing room {}", index, id));
                }
            }
            if let Some(id) = entity.attached_portal_id {
                if self.archetype.portal(id).is_none() {
                    issues.push(format!("entity {} references missing portal {}", index, id));
                }
            }
            if let Some(id) = entity.attached_entity_set_id {
                if self.archetype.entity_set(id).is_none() {
                    issues.push(format!("entity {} references missing entity set {}", index, id));
                }
            }
        }

        issues
    }
}

impl From<MloArchetype> for MloModel {
    fn from(archetype: MloArchetype) -> Self {
        MloModel::new(archetype)
    }
}
