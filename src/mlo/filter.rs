//! Entity visibility filtering for interior editing sessions. Filter
//! state lives with the session, never in the document.

use ragemap_files::ytyp::types::{MloArchetype, MloEntity};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AttachmentFilter {
    /// No attachment constraint.
    #[default]
    Any,
    /// Only entities with no room/portal/set attachment.
    Unattached,
    Room(u32),
    Portal(u32),
    /// Members of an entity set, optionally narrowed to one room.
    EntitySet { id: u32, room: Option<u32> },
}

#[derive(Debug, Clone, Default)]
pub struct EntityFilter {
    /// Case-insensitive archetype-name substring.
    pub name_contains: Option<String>,
    pub attachment: AttachmentFilter,
}

impl EntityFilter {
    pub fn matches(&self, entity: &MloEntity) -> bool {
        if let Some(needle) = &self.name_contains {
            let haystack = entity.def.archetype_name.to_ascii_lowercase();
            if !haystack.contains(&needle.to_ascii_lowercase()) {
                return false;
            }
        }
        match &self.attachment {
            AttachmentFilter::Any => true,
            AttachmentFilter::Unattached => {
                entity.attached_room_id.is_none()
                    && entity.attached_portal_id.is_none()
                    && entity.attached_entity_set_id.is_none()
            }
            AttachmentFilter::Room(id) => entity.attached_room_id == Some(*id),
            AttachmentFilter::Portal(id) => entity.attached_portal_id == Some(*id),
            AttachmentFilter::EntitySet { id, room } => {
                entity.attached_entity_set_id == Some(*id)
                    && room.map_or(true, |room_id| entity.attached_room_id == Some(room_id))
            }
        }
    }

    /// Indices of the visible entities, in document order.
    pub fn apply(&self, archetype: &MloArchetype) -> Vec<usize> {
        archetype
            .entities
            .iter()
            .enumerate()
            .filter(|(_, entity)| self.matches(entity))
            .map(|(index, _)| index)
            .collect()
    }
}
