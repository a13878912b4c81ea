//! The polymorphic extension catalog attached to archetypes and entities.
//!
//! Every variant keeps the literal game identifier in its dispatch tag so
//! a write reproduces the `type=` attribute bit-exactly. Unknown types
//! are skipped with a warning instead of failing the document.

use glam::{Quat, Vec3, Vec4};
use log::warn;
use ragemap_xml::schema::{
    read_quat_or, read_text, read_value_or, read_vec3_or, read_vec4, write_quat, write_text,
    write_value, write_vec3, write_vec4,
};
use ragemap_xml::{Element, XmlError};

use crate::CodecError;
use crate::common::hash::{format_hash, parse_hash_text};

/// Fields shared by every extension variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionBase {
    pub name: String,
    pub offset_position: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Extension {
    Door(DoorExtension),
    Particle(ParticleExtension),
    AudioCollision(AudioCollisionExtension),
    AudioEmitter(AudioEmitterExtension),
    ExplosionEffect(ExplosionEffectExtension),
    Ladder(LadderExtension),
    Buoyancy(BuoyancyExtension),
    Expression(ExpressionExtension),
    LightEffect(LightEffectExtension),
    LightShaft(LightShaftExtension),
    SpawnPoint(SpawnPointExtension),
    SpawnPointOverride(SpawnPointOverrideExtension),
    WindDisturbance(WindDisturbanceExtension),
    ProcObject(ProcObjectExtension),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoorExtension {
    pub base: ExtensionBase,
    pub enable_limit_angle: bool,
    pub starts_locked: bool,
    pub can_break: bool,
    pub limit_angle: f32,
    pub door_target_ratio: f32,
    pub audio_hash: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleExtension {
    pub base: ExtensionBase,
    pub offset_rotation: Quat,
    pub fx_name: String,
    pub fx_type: i32,
    pub bone_tag: i32,
    pub scale: f32,
    pub probability: i32,
    pub flags: i32,
    pub color: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioCollisionExtension {
    pub base: ExtensionBase,
    pub settings: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioEmitterExtension {
    pub base: ExtensionBase,
    pub offset_rotation: Quat,
    pub effect_hash: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplosionEffectExtension {
    pub base: ExtensionBase,
    pub offset_rotation: Quat,
    pub explosion_name: String,
    pub bone_tag: i32,
    pub explosion_tag: i32,
    pub flags: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LadderExtension {
    pub base: ExtensionBase,
    pub bottom: Vec3,
    pub top: Vec3,
    pub normal: Vec3,
    pub material_type: String,
    pub template: String,
    pub can_get_off_at_top: bool,
    pub can_get_off_at_bottom: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuoyancyExtension {
    pub base: ExtensionBase,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpressionExtension {
    pub base: ExtensionBase,
    pub expression_dictionary_name: String,
    pub expression_name: String,
    pub creature_metadata_name: String,
    pub initialise_on_collision: bool,
}

/// One light instance of a light-effect extension. The field set is the
/// attribute block the engine serializes per light.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightInstance {
    pub position: Vec3,
    pub colour: [u8; 3],
    pub flashiness: u8,
    pub intensity: f32,
    pub flags: u32,
    pub bone_tag: i32,
    pub light_type: u8,
    pub group_id: u8,
    pub time_flags: u32,
    pub falloff: f32,
    pub falloff_exponent: f32,
    pub culling_plane: Vec4,
    pub shadow_blur: u8,
    pub corona_size: f32,
    pub corona_intensity: f32,
    pub corona_z_bias: f32,
    pub direction: Vec3,
    pub tangent: Vec3,
    pub cone_inner_angle: f32,
    pub cone_outer_angle: f32,
    pub extents: Vec3,
    pub projected_texture_hash: u32,
    pub shadow_near_clip: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightEffectExtension {
    pub base: ExtensionBase,
    pub instances: Vec<LightInstance>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightShaftExtension {
    pub base: ExtensionBase,
    pub corner_a: Vec3,
    pub corner_b: Vec3,
    pub corner_c: Vec3,
    pub corner_d: Vec3,
    pub direction: Vec3,
    pub length: f32,
    pub color: u32,
    pub intensity: f32,
    pub flashiness: u8,
    pub flags: u32,
    pub density_type: String,
    pub volume_type: String,
    pub softness: f32,
    pub scale_by_sun_intensity: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnPointExtension {
    pub base: ExtensionBase,
    pub offset_rotation: Quat,
    pub spawn_type: String,
    pub ped_type: String,
    pub group: String,
    pub interior: String,
    pub required_imap: String,
    pub available_in_mp_sp: String,
    pub probability: f32,
    pub time_till_ped_leaves: f32,
    pub radius: f32,
    pub start: u8,
    pub end: u8,
    pub high_pri: bool,
    pub extended_range: bool,
    pub short_range: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnPointOverrideExtension {
    pub base: ExtensionBase,
    pub scenario_type: String,
    pub time_start_override: u8,
    pub time_end_override: u8,
    pub group: String,
    pub model_set: String,
    pub availability_in_mp_sp: String,
    pub scenario_flags: u32,
    pub radius: f32,
    pub time_till_ped_leaves: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindDisturbanceExtension {
    pub base: ExtensionBase,
    pub offset_rotation: Quat,
    pub disturbance_type: i32,
    pub bone_tag: i32,
    pub size: Vec4,
    pub strength: f32,
    pub flags: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcObjectExtension {
    pub base: ExtensionBase,
    pub radius_inner: f32,
    pub radius_outer: f32,
    pub spacing: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub min_scale_z: f32,
    pub max_scale_z: f32,
    pub min_z_offset: f32,
    pub max_z_offset: f32,
    pub object_hash: u32,
    pub flags: u32,
}

impl Extension {
    /// The literal dispatch tag written to the `type=` attribute.
    pub fn type_name(&self) -> &'static str {
        match self {
            Extension::Door(_) => "CExtensionDefDoor",
            Extension::Particle(_) => "CExtensionDefParticleEffect",
            Extension::AudioCollision(_) => "CExtensionDefAudioCollisionSettings",
            Extension::AudioEmitter(_) => "CExtensionDefAudioEmitter",
            Extension::ExplosionEffect(_) => "CExtensionDefExplosionEffect",
            Extension::Ladder(_) => "CExtensionDefLadder",
            Extension::Buoyancy(_) => "CExtensionDefBuoyancy",
            Extension::Expression(_) => "CExtensionDefExpression",
            Extension::LightEffect(_) => "CExtensionDefLightEffect",
            Extension::LightShaft(_) => "CExtensionDefLightShaft",
            Extension::SpawnPoint(_) => "CExtensionDefSpawnPoint",
            Extension::SpawnPointOverride(_) => "CExtensionDefSpawnPointOverride",
            Extension::WindDisturbance(_) => "CExtensionDefWindDisturbance",
            Extension::ProcObject(_) => "CExtensionDefProcObject",
        }
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn base(&self) -> &ExtensionBase {
        match self {
            Extension::Door(e) => &e.base,
            Extension::Particle(e) => &e.base,
            Extension::AudioCollision(e) => &e.base,
            Extension::AudioEmitter(e) => &e.base,
            Extension::ExplosionEffect(e) => &e.base,
            Extension::Ladder(e) => &e.base,
            Extension::Buoyancy(e) => &e.base,
            Extension::Expression(e) => &e.base,
            Extension::LightEffect(e) => &e.base,
            Extension::LightShaft(e) => &e.base,
            Extension::SpawnPoint(e) => &e.base,
            Extension::SpawnPointOverride(e) => &e.base,
            Extension::WindDisturbance(e) => &e.base,
            Extension::ProcObject(e) => &e.base,
        }
    }

    /// Dispatches on the item's `type=` attribute. `Ok(None)` means the
    /// type is unknown and the item was skipped (a warning is logged).
    pub fn from_element(item: &Element) -> Result<Option<Extension>, CodecError> {
        let Some(type_name) = item.attr("type") else {
            warn!("extension item without type attribute, skipping");
            return Ok(None);
        };
        let ext = match type_name {
            "CExtensionDefDoor" => Extension::Door(DoorExtension::from_element(item)?),
            "CExtensionDefParticleEffect" => Extension::Particle(ParticleExtension::from_element(item)?),
            "CExtensionDefAudioCollisionSettings" => {
                Extension::AudioCollision(AudioCollisionExtension::from_element(item)?)
            }
            "CExtensionDefAudioEmitter" => Extension::AudioEmitter(AudioEmitterExtension::from_element(item)?),
            "CExtensionDefExplosionEffect" => {
                Extension::ExplosionEffect(ExplosionEffectExtension::from_element(item)?)
            }
            "CExtensionDefLadder" => Extension::Ladder(LadderExtension::from_element(item)?),
            "CExtensionDefBuoyancy" => Extension::Buoyancy(BuoyancyExtension::from_element(item)?),
            "CExtensionDefExpression" => Extension::Expression(ExpressionExtension::from_element(item)?),
            "CExtensionDefLightEffect" => Extension::LightEffect(LightEffectExtension::from_element(item)?),
            "CExtensionDefLightShaft" => Extension::LightShaft(LightShaftExtension::from_element(item)?),
            "CExtensionDefSpawnPoint" => Extension::SpawnPoint(SpawnPointExtension::from_element(item)?),
            "CExtensionDefSpawnPointOverride" => {
                Extension::SpawnPointOverride(SpawnPointOverrideExtension::from_element(item)?)
            }
            "CExtensionDefWindDisturbance" => {
                Extension::WindDisturbance(WindDisturbanceExtension::from_element(item)?)
            }
            "CExtensionDefProcObject" => Extension::ProcObject(ProcObjectExtension::from_element(item)?),
            other => {
                warn!("unknown extension type {}, skipping item", other);
                return Ok(None);
            }
        };
        Ok(Some(ext))
    }

    pub fn to_element(&self) -> Element {
        let mut item = Element::new("Item").with_attr("type", self.type_name());
        write_text(&mut item, "name", &self.base().name);
        write_vec3(&mut item, "offsetPosition", self.base().offset_position);
        match self {
            Extension::Door(e) => e.write_fields(&mut item),
            Extension::Particle(e) => e.write_fields(&mut item),
            Extension::AudioCollision(e) => e.write_fields(&mut item),
            Extension::AudioEmitter(e) => e.write_fields(&mut item),
            Extension::ExplosionEffect(e) => e.write_fields(&mut item),
            Extension::Ladder(e) => e.write_fields(&mut item),
            Extension::Buoyancy(_) => {}
            Extension::Expression(e) => e.write_fields(&mut item),
            Extension::LightEffect(e) => e.write_fields(&mut item),
            Extension::LightShaft(e) => e.write_fields(&mut item),
            Extension::SpawnPoint(e) => e.write_fields(&mut item),
            Extension::SpawnPointOverride(e) => e.write_fields(&mut item),
            Extension::WindDisturbance(e) => e.write_fields(&mut item),
            Extension::ProcObject(e) => e.write_fields(&mut item),
        }
        item
    }
}

/// Reads the `<extensions>` container, skipping unknown variants.
pub fn read_extension_list(parent: &Element) -> Result<Vec<Extension>, CodecError> {
    let mut extensions = Vec::new();
    if let Some(container) = parent.child("extensions") {
        for item in container.items() {
            if let Some(ext) = Extension::from_element(item)? {
                extensions.push(ext);
            }
        }
    }
    Ok(extensions)
}

pub fn write_extension_list(parent: &mut Element, extensions: &[Extension]) {
    let mut container = Element::new("extensions");
    for ext in extensions {
        container.push(ext.to_element());
    }
    parent.push(container);
}

fn read_base(item: &Element) -> Result<ExtensionBase, XmlError> {
    Ok(ExtensionBase {
        name: read_text(item, "name"),
        offset_position: read_vec3_or(item, "offsetPosition", Vec3::ZERO)?,
    })
}

impl DoorExtension {
    fn from_element(item: &Element) -> Result<Self, XmlError> {
        Ok(DoorExtension {
            base: read_base(item)?,
            enable_limit_angle: read_value_or(item, "enableLimitAngle", false)?,
            starts_locked: read_value_or(item, "startsLocked", false)?,
            can_break: read_value_or(item, "canBreak", false)?,
            limit_angle: read_value_or(item, "limitAngle", 0.0)?,
            door_target_ratio: read_value_or(item, "doorTargetRatio", 0.0)?,
            audio_hash: read_text(item, "audioHash"),
        })
    }

    fn write_fields(&self, item: &mut Element) {
        write_value(item, "enableLimitAngle", &self.enable_limit_angle);
        write_value(item, "startsLocked", &self.starts_locked);
        write_value(item, "canBreak", &self.can_break);
        write_value(item, "limitAngle", &self.limit_angle);
        write_value(item, "doorTargetRatio", &self.door_target_ratio);
        write_text(item, "audioHash", &self.audio_hash);
    }
}

impl ParticleExtension {
    fn from_element(item: &Element) -> Result<Self, XmlError> {
        Ok(ParticleExtension {
            base: read_base(item)?,
            offset_rotation: read_quat_or(item, "offsetRotation", Quat::IDENTITY)?,
            fx_name: read_text(item, "fxName"),
            fx_type: read_value_or(item, "fxType", 0)?,
            bone_tag: read_value_or(item, "boneTag", 0)?,
            scale: read_value_or(item, "scale", 1.0)?,
            probability: read_value_or(item, "probability", 0)?,
            flags: read_value_or(item, "flags", 0)?,
            color: read_value_or(item, "color", 0)?,
        })
    }

    fn write_fields(&self, item: &mut Element) {
        write_quat(item, "offsetRotation", self.offset_rotation);
        write_text(item, "fxName", &self.fx_name);
        write_value(item, "fxType", &self.fx_type);
        write_value(item, "boneTag", &self.bone_tag);
        write_value(item, "scale", &self.scale);
        write_value(item, "probability", &self.probability);
        write_value(item, "flags", &self.flags);
        write_value(item, "color", &self.color);
    }
}

impl AudioCollisionExtension {
    fn from_element(item: &Element) -> Result<Self, XmlError> {
        Ok(AudioCollisionExtension {
            base: read_base(item)?,
            settings: read_text(item, "settings"),
        })
    }

    fn write_fields(&self, item: &mut Element) {
        write_text(item, "settings", &self.settings);
    }
}

impl AudioEmitterExtension {
    fn from_element(item: &Element) -> Result<Self, XmlError> {
        Ok(AudioEmitterExtension {
            base: read_base(item)?,
            offset_rotation: read_quat_or(item, "offsetRotation", Quat::IDENTITY)?,
            effect_hash: parse_hash_text(&read_text(item, "effectHash")),
        })
    }

    fn write_fields(&self, item: &mut Element) {
        write_quat(item, "offsetRotation", self.offset_rotation);
        write_text(item, "effectHash", &format_hash(self.effect_hash));
    }
}

impl ExplosionEffectExtension {
    fn from_element(item: &Element) -> Result<Self, XmlError> {
        Ok(ExplosionEffectExtension {
            base: read_base(item)?,
            offset_rotation: read_quat_or(item, "offsetRotation", Quat::IDENTITY)?,
            explosion_name: read_text(item, "explosionName"),
            bone_tag: read_value_or(item, "boneTag", 0)?,
            explosion_tag: read_value_or(item, "explosionTag", 0)?,
            flags: read_value_or(item, "flags", 0)?,
        })
    }

    fn write_fields(&self, item: &mut Element) {
        write_quat(item, "offsetRotation", self.offset_rotation);
        write_text(item, "explosionName", &self.explosion_name);
        write_value(item, "boneTag", &self.bone_tag);
        write_value(item, "explosionTag", &self.explosion_tag);
        write_value(item, "flags", &self.flags);
    }
}

impl LadderExtension {
    fn from_element(item: &Element) -> Result<Self, XmlError> {
        Ok(LadderExtension {
            base: read_base(item)?,
            bottom: read_vec3_or(item, "bottom", Vec3::ZERO)?,
            top: read_vec3_or(item, "top", Vec3::ZERO)?,
            normal: read_vec3_or(item, "normal", Vec3::Y)?,
            material_type: read_text(item, "materialType"),
            template: read_text(item, "template"),
            can_get_off_at_top: read_value_or(item, "canGetOffAtTop", true)?,
            can_get_off_at_bottom: read_value_or(item, "canGetOffAtBottom", true)?,
        })
    }

    fn write_fields(&self, item: &mut Element) {
        write_vec3(item, "bottom", self.bottom);
        write_vec3(item, "top", self.top);
        write_vec3(item, "normal", self.normal);
        write_text(item, "materialType", &self.material_type);
        write_text(item, "template", &self.template);
        write_value(item, "canGetOffAtTop", &self.can_get_off_at_top);
        write_value(item, "canGetOffAtBottom", &self.can_get_off_at_bottom);
    }
}

impl BuoyancyExtension {
    fn from_element(item: &Element) -> Result<Self, XmlError> {
        Ok(BuoyancyExtension {
            base: read_base(item)?,
        })
    }
}

impl ExpressionExtension {
    fn from_element(item: &Element) -> Result<Self, XmlError> {
        Ok(ExpressionExtension {
            base: read_base(item)?,
            expression_dictionary_name: read_text(item, "expressionDictionaryName"),
            expression_name: read_text(item, "expressionName"),
            creature_metadata_name: read_text(item, "creatureMetadataName"),
            initialise_on_collision: read_value_or(item, "initialiseOnCollision", false)?,
        })
    }

    fn write_fields(&self, item: &mut Element) {
        write_text(item, "expressionDictionaryName", &self.expression_dictionary_name);
        write_text(item, "expressionName", &self.expression_name);
        write_text(item, "creatureMetadataName", &self.creature_metadata_name);
        write_value(item, "initialiseOnCollision", &self.initialise_on_collision);
    }
}

impl LightInstance {
    fn from_element(item: &Element) -> Result<Self, XmlError> {
        let colour = read_vec3_or(item, "colour", Vec3::ZERO)?;
        Ok(LightInstance {
            position: read_vec3_or(item, "position", Vec3::ZERO)?,
            colour: [colour.x as u8, colour.y as u8, colour.z as u8],
            flashiness: read_value_or(item, "flashiness", 0)?,
            intensity: read_value_or(item, "intensity", 0.0)?,
            flags: read_value_or(item, "flags", 0)?,
            bone_tag: read_value_or(item, "boneTag", 0)?,
            light_type: read_value_or(item, "lightType", 1)?,
            group_id: read_value_or(item, "groupId", 0)?,
            time_flags: read_value_or(item, "timeFlags", 0)?,
            falloff: read_value_or(item, "falloff", 0.0)?,
            falloff_exponent: read_value_or(item, "falloffExponent", 0.0)?,
            culling_plane: match item.child("cullingPlane") {
                Some(_) => read_vec4(item, "cullingPlane")?,
                None => Vec4::new(0.0, 0.0, 1.0, 0.0),
            },
            shadow_blur: read_value_or(item, "shadowBlur", 0)?,
            corona_size: read_value_or(item, "coronaSize", 0.0)?,
            corona_intensity: read_value_or(item, "coronaIntensity", 0.0)?,
            corona_z_bias: read_value_or(item, "coronaZBias", 0.0)?,
            direction: read_vec3_or(item, "direction", Vec3::NEG_Z)?,
            tangent: read_vec3_or(item, "tangent", Vec3::X)?,
            cone_inner_angle: read_value_or(item, "coneInnerAngle", 0.0)?,
            cone_outer_angle: read_value_or(item, "coneOuterAngle", 0.0)?,
            extents: read_vec3_or(item, "extents", Vec3::ONE)?,
            projected_texture_hash: parse_hash_text(&read_text(item, "projectedTextureKey")),
            shadow_near_clip: read_value_or(item, "shadowNearClip", 0.01)?,
        })
    }

    fn to_element(&self) -> Element {
        let mut item = Element::new("Item");
        write_vec3(&mut item, "position", self.position);
        write_vec3(
            &mut item,
            "colour",
            Vec3::new(self.colour[0] as f32, self.colour[1] as f32, self.colour[2] as f32),
        );
        write_value(&mut item, "flashiness", &self.flashiness);
        write_value(&mut item, "intensity", &self.intensity);
        write_value(&mut item, "flags", &self.flags);
        write_value(&mut item, "boneTag", &self.bone_tag);
        write_value(&mut item, "lightType", &self.light_type);
        write_value(&mut item, "groupId", &self.group_id);
        write_value(&mut item, "timeFlags", &self.time_flags);
        write_value(&mut item, "falloff", &self.falloff);
        write_value(&mut item, "falloffExponent", &self.falloff_exponent);
        write_vec4(&mut item, "cullingPlane", self.culling_plane);
        write_value(&mut item, "shadowBlur", &self.shadow_blur);
        write_value(&mut item, "coronaSize", &self.corona_size);
        write_value(&mut item, "coronaIntensity", &self.corona_intensity);
        write_value(&mut item, "coronaZBias", &self.corona_z_bias);
        write_vec3(&mut item, "direction", self.direction);
        write_vec3(&mut item, "tangent", self.tangent);
        write_value(&mut item, "coneInnerAngle", &self.cone_inner_angle);
        write_value(&mut item, "coneOuterAngle", &self.cone_outer_angle);
        write_vec3(&mut item, "extents", self.extents);
        write_text(&mut item, "projectedTextureKey", &format_hash(self.projected_texture_hash));
        write_value(&mut item, "shadowNearClip", &self.shadow_near_clip);
        item
    }
}

impl LightEffectExtension {
    fn from_element(item: &Element) -> Result<Self, XmlError> {
        let mut instances = Vec::new();
        if let Some(container) = item.child("instances") {
            for light in container.items() {
                instances.push(LightInstance::from_element(light)?);
            }
        }
        Ok(LightEffectExtension {
            base: read_base(item)?,
            instances,
        })
    }

    fn write_fields(&self, item: &mut Element) {
        let mut container = Element::new("instances");
        for light in &self.instances {
            container.push(light.to_element());
        }
        item.push(container);
    }
}

impl LightShaftExtension {
    fn from_element(item: &Element) -> Result<Self, XmlError> {
        Ok(LightShaftExtension {
            base: read_base(item)?,
            corner_a: read_vec3_or(item, "cornerA", Vec3::ZERO)?,
            corner_b: read_vec3_or(item, "cornerB", Vec3::ZERO)?,
            corner_c: read_vec3_or(item, "cornerC", Vec3::ZERO)?,
            corner_d: read_vec3_or(item, "cornerD", Vec3::ZERO)?,
            direction: read_vec3_or(item, "direction", Vec3::NEG_Z)?,
            length: read_value_or(item, "length", 0.0)?,
            color: read_value_or(item, "color", 0)?,
            intensity: read_value_or(item, "intensity", 0.0)?,
            flashiness: read_value_or(item, "flashiness", 0)?,
            flags: read_value_or(item, "flags", 0)?,
            density_type: read_text(item, "densityType"),
            volume_type: read_text(item, "volumeType"),
            softness: read_value_or(item, "softness", 0.0)?,
            scale_by_sun_intensity: read_value_or(item, "scaleBySunIntensity", false)?,
        })
    }

    fn write_fields(&self, item: &mut Element) {
        write_vec3(item, "cornerA", self.corner_a);
        write_vec3(item, "cornerB", self.corner_b);
        write_vec3(item, "cornerC", self.corner_c);
        write_vec3(item, "cornerD", self.corner_d);
        write_vec3(item, "direction", self.direction);
        write_value(item, "length", &self.length);
        write_value(item, "color", &self.color);
        write_value(item, "intensity", &self.intensity);
        write_value(item, "flashiness", &self.flashiness);
        write_value(item, "flags", &self.flags);
        write_text(item, "densityType", &self.density_type);
        write_text(item, "volumeType", &self.volume_type);
        write_value(item, "softness", &self.softness);
        write_value(item, "scaleBySunIntensity", &self.scale_by_sun_intensity);
    }
}

impl SpawnPointExtension {
    fn from_element(item: &Element) -> Result<Self, XmlError> {
        Ok(SpawnPointExtension {
            base: read_base(item)?,
            offset_rotation: read_quat_or(item, "offsetRotation", Quat::IDENTITY)?,
            spawn_type: read_text(item, "spawnType"),
            ped_type: read_text(item, "pedType"),
            group: read_text(item, "group"),
            interior: read_text(item, "interior"),
            required_imap: read_text(item, "requiredImap"),
            available_in_mp_sp: read_text(item, "availableInMpSp"),
            probability: read_value_or(item, "probability", 0.0)?,
            time_till_ped_leaves: read_value_or(item, "timeTillPedLeaves", 0.0)?,
            radius: read_value_or(item, "radius", 0.0)?,
            start: read_value_or(item, "start", 0)?,
            end: read_value_or(item, "end", 0)?,
            high_pri: read_value_or(item, "highPri", false)?,
            extended_range: read_value_or(item, "extendedRange", false)?,
            short_range: read_value_or(item, "shortRange", false)?,
        })
    }

    fn write_fields(&self, item: &mut Element) {
        write_quat(item, "offsetRotation", self.offset_rotation);
        write_text(item, "spawnType", &self.spawn_type);
        write_text(item, "pedType", &self.ped_type);
        write_text(item, "group", &self.group);
        write_text(item, "interior", &self.interior);
        write_text(item, "requiredImap", &self.required_imap);
        write_text(item, "availableInMpSp", &self.available_in_mp_sp);
        write_value(item, "probability", &self.probability);
        write_value(item, "timeTillPedLeaves", &self.time_till_ped_leaves);
        write_value(item, "radius", &self.radius);
        write_value(item, "start", &self.start);
        write_value(item, "end", &self.end);
        write_value(item, "highPri", &self.high_pri);
        write_value(item, "extendedRange", &self.extended_range);
        write_value(item, "shortRange", &self.short_range);
    }
}

impl SpawnPointOverrideExtension {
    fn from_element(item: &Element) -> Result<Self, XmlError> {
        Ok(SpawnPointOverrideExtension {
            base: read_base(item)?,
            scenario_type: read_text(item, "ScenarioType"),
            time_start_override: read_value_or(item, "iTimeStartOverride", 0)?,
            time_end_override: read_value_or(item, "iTimeEndOverride", 0)?,
            group: read_text(item, "Group"),
            model_set: read_text(item, "ModelSet"),
            availability_in_mp_sp: read_text(item, "AvailabilityInMpSp"),
            scenario_flags: read_value_or(item, "Flags", 0)?,
            radius: read_value_or(item, "Radius", 0.0)?,
            time_till_ped_leaves: read_value_or(item, "TimeTillPedLeaves", 0.0)?,
        })
    }

    fn write_fields(&self, item: &mut Element) {
        write_text(item, "ScenarioType", &self.scenario_type);
        write_value(item, "iTimeStartOverride", &self.time_start_override);
        write_value(item, "iTimeEndOverride", &self.time_end_override);
        write_text(item, "Group", &self.group);
        write_text(item, "ModelSet", &self.model_set);
        write_text(item, "AvailabilityInMpSp", &self.availability_in_mp_sp);
        write_value(item, "Flags", &self.scenario_flags);
        write_value(item, "Radius", &self.radius);
        write_value(item, "TimeTillPedLeaves", &self.time_till_ped_leaves);
    }
}

impl WindDisturbanceExtension {
    fn from_element(item: &Element) -> Result<Self, XmlError> {
        Ok(WindDisturbanceExtension {
            base: read_base(item)?,
            offset_rotation: read_quat_or(item, "offsetRotation", Quat::IDENTITY)?,
            disturbance_type: read_value_or(item, "disturbanceType", 0)?,
            bone_tag: read_value_or(item, "boneTag", 0)?,
            size: match item.child("size") {
                Some(_) => read_vec4(item, "size")?,
                None => Vec4::ZERO,
            },
            strength: read_value_or(item, "strength", 0.0)?,
            flags: read_value_or(item, "flags", 0)?,
        })
    }

    fn write_fields(&self, item: &mut Element) {
        write_quat(item, "offsetRotation", self.offset_rotation);
        write_value(item, "disturbanceType", &self.disturbance_type);
        write_value(item, "boneTag", &self.bone_tag);
        write_vec4(item, "size", self.size);
        write_value(item, "strength", &self.strength);
        write_value(item, "flags", &self.flags);
    }
}

impl ProcObjectExtension {
    fn from_element(item: &Element) -> Result<Self, XmlError> {
        Ok(ProcObjectExtension {
            base: read_base(item)?,
            radius_inner: read_value_or(item, "radiusInner", 0.0)?,
            radius_outer: read_value_or(item, "radiusOuter", 0.0)?,
            spacing: read_value_or(item, "spacing", 0.0)?,
            min_scale: read_value_or(item, "minScale", 1.0)?,
            max_scale: read_value_or(item, "maxScale", 1.0)?,
            min_scale_z: read_value_or(item, "minScaleZ", 1.0)?,
            max_scale_z: read_value_or(item, "maxScaleZ", 1.0)?,
            min_z_offset: read_value_or(item, "minZOffset", 0.0)?,
            max_z_offset: read_value_or(item, "maxZOffset", 0.0)?,
            object_hash: parse_hash_text(&read_text(item, "objectHash")),
            flags: read_value_or(item, "flags", 0)?,
        })
    }

    fn write_fields(&self, item: &mut Element) {
        write_value(item, "radiusInner", &self.radius_inner);
        write_value(item, "radiusOuter", &self.radius_outer);
        write_value(item, "spacing", &self.spacing);
        write_value(item, "minScale", &self.min_scale);
        write_value(item, "maxScale", &self.max_scale);
        write_value(item, "minScaleZ", &self.min_scale_z);
        write_value(item, "maxScaleZ", &self.max_scale_z);
        write_value(item, "minZOffset", &self.min_z_offset);
        write_value(item, "maxZOffset", &self.max_z_offset);
        write_text(item, "objectHash", &format_hash(self.object_hash));
        write_value(item, "flags", &self.flags);
    }
}
