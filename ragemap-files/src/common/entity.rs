//! `CEntityDef`, the placement record shared by map documents and MLO
//! interiors.

use glam::{Quat, Vec3};
use log::warn;
use ragemap_xml::schema::{
    read_quat_or, read_text, read_value_or, read_vec3_or, write_quat, write_text, write_value,
    write_vec3,
};
use ragemap_xml::Element;

use crate::CodecError;
use crate::common::extensions::{read_extension_list, write_extension_list, Extension};

pub const ENTITY_TYPE_NAME: &str = "CEntityDef";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LodLevel {
    Hd,
    Lod,
    Slod1,
    Slod2,
    Slod3,
    Slod4,
    #[default]
    OrphanHd,
}

impl LodLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LodLevel::Hd => "LODTYPES_DEPTH_HD",
            LodLevel::Lod => "LODTYPES_DEPTH_LOD",
            LodLevel::Slod1 => "LODTYPES_DEPTH_SLOD1",
            LodLevel::Slod2 => "LODTYPES_DEPTH_SLOD2",
            LodLevel::Slod3 => "LODTYPES_DEPTH_SLOD3",
            LodLevel::Slod4 => "LODTYPES_DEPTH_SLOD4",
            LodLevel::OrphanHd => "LODTYPES_DEPTH_ORPHANHD",
        }
    }

    pub fn parse(text: &str) -> Option<LodLevel> {
        match text {
            "LODTYPES_DEPTH_HD" => Some(LodLevel::Hd),
            "LODTYPES_DEPTH_LOD" => Some(LodLevel::Lod),
            "LODTYPES_DEPTH_SLOD1" => Some(LodLevel::Slod1),
            "LODTYPES_DEPTH_SLOD2" => Some(LodLevel::Slod2),
            "LODTYPES_DEPTH_SLOD3" => Some(LodLevel::Slod3),
            "LODTYPES_DEPTH_SLOD4" => Some(LodLevel::Slod4),
            "LODTYPES_DEPTH_ORPHANHD" => Some(LodLevel::OrphanHd),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityLevel {
    #[default]
    Required,
    OptionalHigh,
    OptionalMedium,
    OptionalLow,
}

impl PriorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::Required => "PRI_REQUIRED",
            PriorityLevel::OptionalHigh => "PRI_OPTIONAL_HIGH",
            PriorityLevel::OptionalMedium => "PRI_OPTIONAL_MEDIUM",
            PriorityLevel::OptionalLow => "PRI_OPTIONAL_LOW",
        }
    }

    pub fn parse(text: &str) -> Option<PriorityLevel> {
        match text {
            "PRI_REQUIRED" => Some(PriorityLevel::Required),
            "PRI_OPTIONAL_HIGH" => Some(PriorityLevel::OptionalHigh),
            "PRI_OPTIONAL_MEDIUM" => Some(PriorityLevel::OptionalMedium),
            "PRI_OPTIONAL_LOW" => Some(PriorityLevel::OptionalLow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityDef {
    pub archetype_name: String,
    pub flags: u32,
    pub guid: u32,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale_xy: f32,
    pub scale_z: f32,
    /// -1 for roots by editor convention, but the value is preserved
    /// exactly as read since the on-disk format also uses 0 as sentinel.
    pub parent_index: i32,
    pub lod_dist: f32,
    pub child_lod_dist: f32,
    pub lod_level: LodLevel,
    /// Stored verbatim, never recomputed from parent_index pointers.
    pub num_children: u32,
    pub priority_level: PriorityLevel,
    pub extensions: Vec<Extension>,
    pub ambient_occlusion_multiplier: u8,
    pub artificial_ambient_occlusion: u8,
    pub tint_value: u8,
}

impl Default for EntityDef {
    fn default() -> Self {
        EntityDef {
            archetype_name: String::new(),
            flags: 0,
            guid: 0,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale_xy: 1.0,
            scale_z: 1.0,
            parent_index: -1,
            lod_dist: 100.0,
            child_lod_dist: 0.0,
            lod_level: LodLevel::OrphanHd,
            num_children: 0,
            priority_level: PriorityLevel::Required,
            extensions: Vec::new(),
            ambient_occlusion_multiplier: 255,
            artificial_ambient_occlusion: 255,
            tint_value: 0,
        }
    }
}

impl EntityDef {
    pub fn from_element(item: &Element) -> Result<EntityDef, CodecError> {
        let lod_level_text = read_text(item, "lodLevel");
        let lod_level = match LodLevel::parse(&lod_level_text) {
            Some(level) => level,
            None => {
                if !lod_level_text.is_empty() {
                    warn!("unknown lodLevel {}, defaulting", lod_level_text);
                }
                LodLevel::default()
            }
        };
        let priority_text = read_text(item, "priorityLevel");
        let priority_level = match PriorityLevel::parse(&priority_text) {
            Some(level) => level,
            None => {
                if !priority_text.is_empty() {
                    warn!("unknown priorityLevel {}, defaulting", priority_text);
                }
                PriorityLevel::default()
            }
        };

        Ok(EntityDef {
            archetype_name: read_text(item, "archetypeName"),
            flags: read_value_or(item, "flags", 0)?,
            guid: read_value_or(item, "guid", 0)?,
            position: read_vec3_or(item, "position", Vec3::ZERO)?,
            rotation: read_quat_or(item, "rotation", Quat::IDENTITY)?,
            scale_xy: read_value_or(item, "scaleXY", 1.0)?,
            scale_z: read_value_or(item, "scaleZ", 1.0)?,
            parent_index: read_value_or(item, "parentIndex", -1)?,
            lod_dist: read_value_or(item, "lodDist", 100.0)?,
            child_lod_dist: read_value_or(item, "childLodDist", 0.0)?,
            lod_level,
            num_children: read_value_or(item, "numChildren", 0)?,
            priority_level,
            extensions: read_extension_list(item)?,
            ambient_occlusion_multiplier: read_value_or(item, "ambientOcclusionMultiplier", 255)?,
            artificial_ambient_occlusion: read_value_or(item, "artificialAmbientOcclusion", 255)?,
            tint_value: read_value_or(item, "tintValue", 0)?,
        })
    }

    pub fn to_element(&self) -> Element {
        let mut item = Element::new("Item").with_attr("type", ENTITY_TYPE_NAME);
        write_text(&mut item, "archetypeName", &self.archetype_name);
        write_value(&mut item, "flags", &self.flags);
        write_value(&mut item, "guid", &self.guid);
        write_vec3(&mut item, "position", self.position);
        write_quat(&mut item, "rotation", self.rotation);
        write_value(&mut item, "scaleXY", &self.scale_xy);
        write_value(&mut item, "scaleZ", &self.scale_z);
        write_value(&mut item, "parentIndex", &self.parent_index);
        write_value(&mut item, "lodDist", &self.lod_dist);
        write_value(&mut item, "childLodDist", &self.child_lod_dist);
        write_text(&mut item, "lodLevel", self.lod_level.as_str());
        write_value(&mut item, "numChildren", &self.num_children);
        write_text(&mut item, "priorityLevel", self.priority_level.as_str());
        write_extension_list(&mut item, &self.extensions);
        write_value(&mut item, "ambientOcclusionMultiplier", &self.ambient_occlusion_multiplier);
        write_value(&mut item, "artificialAmbientOcclusion", &self.artificial_ambient_occlusion);
        write_value(&mut item, "tintValue", &self.tint_value);
        item
    }
}
