//! Typed model of a `CMapTypes` (`.ytyp.xml`) document.

use bitflags::bitflags;
use glam::{Vec3, Vec4};
use ragemap_xml::Element;

use crate::common::entity::EntityDef;
use crate::common::extensions::Extension;

#[derive(Debug, Clone, Default)]
pub struct TypesDocument {
    pub name: String,
    /// Top-level extension catalog, typically empty.
    pub extensions: Vec<Extension>,
    pub archetypes: Vec<Archetype>,
    /// Opaque passthrough so documents carrying composite entity types
    /// survive a round trip untouched.
    pub composite_entity_types: Option<Element>,
}

impl TypesDocument {
    pub fn archetype(&self, name: &str) -> Option<&Archetype> {
        self.archetypes.iter().find(|a| a.name() == name)
    }

    /// Local-space bounding box of a named archetype, the shape map
    /// exporters feed into extents computation.
    pub fn archetype_bounds(&self, name: &str) -> Option<(Vec3, Vec3)> {
        self.archetype(name)
            .map(|archetype| (archetype.def().bb_min, archetype.def().bb_max))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetType {
    Uninitialized,
    Fragment,
    Drawable,
    DrawableDictionary,
    #[default]
    Assetless,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Uninitialized => "ASSET_TYPE_UNINITIALIZED",
            AssetType::Fragment => "ASSET_TYPE_FRAGMENT",
            AssetType::Drawable => "ASSET_TYPE_DRAWABLE",
            AssetType::DrawableDictionary => "ASSET_TYPE_DRAWABLEDICTIONARY",
            AssetType::Assetless => "ASSET_TYPE_ASSETLESS",
        }
    }

    pub fn parse(text: &str) -> Option<AssetType> {
        match text {
            "ASSET_TYPE_UNINITIALIZED" => Some(AssetType::Uninitialized),
            "ASSET_TYPE_FRAGMENT" => Some(AssetType::Fragment),
            "ASSET_TYPE_DRAWABLE" => Some(AssetType::Drawable),
            "ASSET_TYPE_DRAWABLEDICTIONARY" => Some(AssetType::DrawableDictionary),
            "ASSET_TYPE_ASSETLESS" => Some(AssetType::Assetless),
            _ => None,
        }
    }
}

bitflags! {
    /// 24 hour-of-day bits plus the swap-while-visible bit of a time
    /// archetype. Unknown bits are retained.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TimeFlags: u32 {
        const HOUR_0 = 1 << 0;
        const HOUR_1 = 1 << 1;
        const HOUR_2 = 1 << 2;
        const HOUR_3 = 1 << 3;
        const HOUR_4 = 1 << 4;
        const HOUR_5 = 1 << 5;
        const HOUR_6 = 1 << 6;
        const HOUR_7 = 1 << 7;
        const HOUR_8 = 1 << 8;
        const HOUR_9 = 1 << 9;
        const HOUR_10 = 1 << 10;
        const HOUR_11 = 1 << 11;
        const HOUR_12 = 1 << 12;
        const HOUR_13 = 1 << 13;
        const HOUR_14 = 1 << 14;
        const HOUR_15 = 1 << 15;
        const HOUR_16 = 1 << 16;
        const HOUR_17 = 1 << 17;
        const HOUR_18 = 1 << 18;
        const HOUR_19 = 1 << 19;
        const HOUR_20 = 1 << 20;
        const HOUR_21 = 1 << 21;
        const HOUR_22 = 1 << 22;
        const HOUR_23 = 1 << 23;
        const SWAP_WHILE_VISIBLE = 1 << 24;
    }
}

/// Fields common to all archetype variants.
#[derive(Debug, Clone, Default)]
pub struct ArchetypeDef {
    pub name: String,
    pub lod_dist: f32,
    pub flags: u32,
    pub special_attribute: u8,
    pub hd_texture_dist: f32,
    pub bb_min: Vec3,
    pub bb_max: Vec3,
    pub bs_center: Vec3,
    pub bs_radius: f32,
    pub texture_dictionary: String,
    pub clip_dictionary: String,
    pub drawable_dictionary: String,
    pub physics_dictionary: String,
    pub asset_name: String,
    pub asset_type: AssetType,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone)]
pub enum Archetype {
    Base(ArchetypeDef),
    Time(TimeArchetype),
    Mlo(MloArchetype),
}

impl Archetype {
    pub fn type_name(&self) -> &'static str {
        match self {
            Archetype::Base(_) => "CBaseArchetypeDef",
            Archetype::Time(_) => "CTimeArchetypeDef",
            Archetype::Mlo(_) => "CMloArchetypeDef",
        }
    }

    pub fn def(&self) -> &ArchetypeDef {
        match self {
            Archetype::Base(def) => def,
            Archetype::Time(time) => &time.base,
            Archetype::Mlo(mlo) => &mlo.base,
        }
    }

    pub fn name(&self) -> &str {
        &self.def().name
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimeArchetype {
    pub base: ArchetypeDef,
    pub time_flags: u32,
}

#[derive(Debug, Clone, Default)]
pub struct MloArchetype {
    pub base: ArchetypeDef,
    pub mlo_flags: u32,
    pub rooms: Vec<MloRoom>,
    pub portals: Vec<MloPortal>,
    pub entity_sets: Vec<MloEntitySet>,
    pub timecycle_modifiers: Vec<MloTimeCycleModifier>,
    /// All entities of the interior, both top-level ones and the ones
    /// belonging to an entity set (`attached_entity_set_id`).
    pub entities: Vec<MloEntity>,
    next_room_id: u32,
    next_portal_id: u32,
    next_entity_set_id: u32,
}

impl MloArchetype {
    /// Ids are monotonic within the archetype and never reused.
    pub fn alloc_room_id(&mut self) -> u32 {
        let id = self.next_room_id;
        self.next_room_id += 1;
        id
    }

    pub fn alloc_portal_id(&mut self) -> u32 {
        let id = self.next_portal_id;
        self.next_portal_id += 1;
        id
    }

    pub fn alloc_entity_set_id(&mut self) -> u32 {
        let id = self.next_entity_set_id;
        self.next_entity_set_id += 1;
        id
    }

    pub fn room_index(&self, id: u32) -> Option<usize> {
        self.rooms.iter().position(|r| r.id == id)
    }

    pub fn portal_index(&self, id: u32) -> Option<usize> {
        self.portals.iter().position(|p| p.id == id)
    }

    pub fn entity_set_index(&self, id: u32) -> Option<usize> {
        self.entity_sets.iter().position(|s| s.id == id)
    }

    pub fn room(&self, id: u32) -> Option<&MloRoom> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn portal(&self, id: u32) -> Option<&MloPortal> {
        self.portals.iter().find(|p| p.id == id)
    }

    pub fn entity_set(&self, id: u32) -> Option<&MloEntitySet> {
        self.entity_sets.iter().find(|s| s.id == id)
    }

    /// Number of portals that touch the room, each counted once.
    pub fn portal_count_of_room(&self, room_id: u32) -> u32 {
        self.portals
            .iter()
            .filter(|p| p.room_from == Some(room_id) || p.room_to == Some(room_id))
            .count() as u32
    }
}

#[derive(Debug, Clone, Default)]
pub struct MloRoom {
    /// Stable id, unique per archetype.
    pub id: u32,
    pub name: String,
    pub bb_min: Vec3,
    pub bb_max: Vec3,
    pub blend: f32,
    pub timecycle: String,
    pub secondary_timecycle: String,
    pub flags: u32,
    /// Derived: rebuilt from the portal list at serialization time.
    pub portal_count: u32,
    pub floor_id: i32,
    pub exterior_visibility_depth: i32,
    /// Indices into the serialized top-level entity list; rebuilt on write.
    pub attached_objects: Vec<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct MloPortal {
    /// Stable id, unique per archetype.
    pub id: u32,
    /// Room ids; `None` is the unattached sentinel (-1 on disk).
    pub room_from: Option<u32>,
    pub room_to: Option<u32>,
    pub flags: u32,
    pub mirror_priority: i32,
    pub opacity: f32,
    pub audio_occlusion: u32,
    /// Quad corners in winding order.
    pub corners: [Vec3; 4],
    /// Indices into the serialized top-level entity list; rebuilt on write.
    pub attached_objects: Vec<u32>,
}

/// A toggleable group of entities. The member entities live in
/// [`MloArchetype::entities`] carrying this set's id; `locations` are
/// re-derived from their attachment keys on write.
#[derive(Debug, Clone, Default)]
pub struct MloEntitySet {
    pub id: u32,
    pub name: String,
}

/// Bit 31 of an entity-set location marks a portal attachment.
pub const LOCATION_PORTAL_BIT: u32 = 0x8000_0000;

#[derive(Debug, Clone, Default)]
pub struct MloTimeCycleModifier {
    pub name: String,
    /// Sphere center in xyz, radius in w.
    pub sphere: Vec4,
    pub percentage: f32,
    pub range: f32,
    pub start_hour: u32,
    pub end_hour: u32,
}

#[derive(Debug, Clone, Default)]
pub struct MloEntity {
    pub def: EntityDef,
    pub attached_portal_id: Option<u32>,
    pub attached_room_id: Option<u32>,
    pub attached_entity_set_id: Option<u32>,
}
