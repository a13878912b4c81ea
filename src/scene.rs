//! The contract between the document core and the host 3D scene. The
//! host editor implements [`SceneAdapter`]; the core only ever talks to
//! the scene through it, exchanging plain value types.

use glam::{Quat, Vec3};
use ragemap_files::cable::types::{CableGeometry, CablePiece};
use ragemap_files::common::entity::EntityDef;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for SceneTransform {
    fn default() -> Self {
        SceneTransform {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

pub trait SceneAdapter {
    type Object;
    type Mesh;

    /// Finds the template object for an archetype, if the host scene
    /// has one loaded.
    fn lookup(&self, archetype_name: &str) -> Option<Self::Object>;

    fn duplicate(&mut self, object: &Self::Object) -> Self::Object;

    fn apply_transform(&mut self, object: &Self::Object, transform: &SceneTransform);

    fn read_transform(&self, object: &Self::Object) -> SceneTransform;

    fn build_cable_mesh(&mut self, pieces: &[CablePiece]) -> Self::Mesh;

    fn extract_cable_mesh(&self, mesh: &Self::Mesh) -> CableGeometry;
}

/// Scene transform of a placement record. The document stores uniform
/// XY scale plus an independent Z scale.
pub fn entity_transform(def: &EntityDef) -> SceneTransform {
    SceneTransform {
        position: def.position,
        rotation: def.rotation,
        scale: Vec3::new(def.scale_xy, def.scale_xy, def.scale_z),
    }
}

/// Writes a scene transform back into a placement record.
pub fn apply_entity_transform(def: &mut EntityDef, transform: &SceneTransform) {
    def.position = transform.position;
    def.rotation = transform.rotation;
    // non-uniform XY collapses to X, matching the packed scale fields
    def.scale_xy = transform.scale.x;
    def.scale_z = transform.scale.z;
}

/// Instantiates an entity in the scene: template lookup, duplicate,
/// transform. `None` when the archetype has no scene object.
pub fn place_entity<A: SceneAdapter>(adapter: &mut A, def: &EntityDef) -> Option<A::Object> {
    let template = adapter.lookup(&def.archetype_name)?;
    let object = adapter.duplicate(&template);
    adapter.apply_transform(&object, &entity_transform(def));
    Some(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use ragemap_files::cable::mesh::{build, emit};
    use ragemap_files::cable::types::CablePoint;

    /// A minimal in-memory host scene for contract tests.
    #[derive(Default)]
    struct MockScene {
        templates: Vec<String>,
        transforms: HashMap<usize, SceneTransform>,
        next_object: usize,
    }

    impl SceneAdapter for MockScene {
        type Object = usize;
        type Mesh = CableGeometry;

        fn lookup(&self, archetype_name: &str) -> Option<usize> {
            self.templates.iter().position(|t| t == archetype_name)
        }

        fn duplicate(&mut self, _object: &usize) -> usize {
            self.next_object += 1;
            self.next_object + self.templates.len()
        }

        fn apply_transform(&mut self, object: &usize, transform: &SceneTransform) {
            self.transforms.insert(*object, *transform);
        }

        fn read_transform(&self, object: &usize) -> SceneTransform {
            self.transforms.get(object).copied().unwrap_or_default()
        }

        fn build_cable_mesh(&mut self, pieces: &[CablePiece]) -> CableGeometry {
            emit(pieces)
        }

        fn extract_cable_mesh(&self, mesh: &CableGeometry) -> CableGeometry {
            mesh.clone()
        }
    }

    #[test]
    fn place_entity_applies_the_packed_scale() {
        let mut scene = MockScene {
            templates: vec!["prop_bench".to_owned()],
            ..Default::default()
        };
        let def = EntityDef {
            archetype_name: "prop_bench".to_owned(),
            position: Vec3::new(1.0, 2.0, 3.0),
            scale_xy: 2.0,
            scale_z: 0.5,
            ..Default::default()
        };
        let object = place_entity(&mut scene, &def).expect("template exists");
        let transform = scene.read_transform(&object);
        assert_eq!(transform.position, def.position);
        assert_eq!(transform.scale, Vec3::new(2.0, 2.0, 0.5));

        assert!(place_entity(&mut scene, &EntityDef::default()).is_none());
    }

    #[test]
    fn transform_round_trip_through_a_placement() {
        let transform = SceneTransform {
            position: Vec3::new(-4.0, 8.0, 0.5),
            rotation: Quat::from_rotation_z(1.1),
            scale: Vec3::new(1.5, 1.5, 2.0),
        };
        let mut def = EntityDef::default();
        apply_entity_transform(&mut def, &transform);
        assert_eq!(entity_transform(&def), transform);
    }

    #[test]
    fn cable_meshes_cross_the_boundary_intact() {
        let mut scene = MockScene::default();
        let piece = CablePiece {
            points: vec![
                CablePoint {
                    position: Vec3::ZERO,
                    ..Default::default()
                },
                CablePoint {
                    position: Vec3::new(0.0, 3.0, 0.0),
                    ..Default::default()
                },
            ],
        };
        let mesh = scene.build_cable_mesh(std::slice::from_ref(&piece));
        let rebuilt = build(&scene.extract_cable_mesh(&mesh));
        assert_eq!(rebuilt.len(), 1);
        assert_eq!(rebuilt[0].points.len(), 2);
        assert_eq!(rebuilt[0].points[1].position, piece.points[1].position);
    }
}
