use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::{Quat, Vec3};
use ragemap_xml::schema::read_value;

use crate::ymap::reader::MapReader;
use crate::ymap::types::{BoxOccluder, CarGenerator, MapDocument, ModelOccluder};
use crate::ymap::writer::MapWriter;
use crate::AbortSignal;

#[test]
fn box_occluder_quantization() -> Result<(), anyhow::Error> {
    let doc = MapDocument {
        box_occluders: vec![BoxOccluder {
            center: Vec3::new(1.25, -2.5, 0.0),
            extents: Vec3::new(2.0, 1.0, 4.0),
            rotation: Quat::from_rotation_z(FRAC_PI_2),
        }],
        ..Default::default()
    };
    let tree = MapWriter::to_tree(&doc)?;
    let item = tree.expect_child("boxOccluders")?.items().next().unwrap();
    assert_eq!(read_value::<i16>(item, "iCenterX")?, 5);
    assert_eq!(read_value::<i16>(item, "iCenterY")?, -10);
    assert_eq!(read_value::<i16>(item, "iCenterZ")?, 0);
    assert_eq!(read_value::<i16>(item, "iLength")?, 8);
    assert_eq!(read_value::<i16>(item, "iWidth")?, 4);
    assert_eq!(read_value::<i16>(item, "iHeight")?, 16);
    assert!((read_value::<i16>(item, "iSinZ")? - 16384).abs() <= 1);
    assert!(read_value::<i16>(item, "iCosZ")?.abs() <= 1);
    Ok(())
}

#[test]
fn car_generator_heading_round_trip() -> Result<(), anyhow::Error> {
    let doc = MapDocument {
        car_generators: vec![CarGenerator {
            heading: FRAC_PI_4,
            car_model: "blista".to_owned(),
            ..Default::default()
        }],
        ..Default::default()
    };
    let tree = MapWriter::to_tree(&doc)?;
    let item = tree.expect_child("carGenerators")?.items().next().unwrap();
    let orient_x = read_value::<f32>(item, "orientX")?;
    let orient_y = read_value::<f32>(item, "orientY")?;
    assert!((orient_x - 3.5355339).abs() < 1e-3);
    assert!((orient_y - 3.5355339).abs() < 1e-3);

    let reread = MapReader::from_tree(&tree, &AbortSignal::new())?;
    assert!((reread.car_generators[0].heading - FRAC_PI_4).abs() < 1e-6);
    assert_eq!(reread.car_generators[0].car_model, "blista");
    Ok(())
}

#[test]
fn occluder_model_blob_round_trip() -> Result<(), anyhow::Error> {
    let doc = MapDocument {
        occlude_models: vec![ModelOccluder {
            bb_min: Vec3::new(-1.0, -1.0, 0.0),
            bb_max: Vec3::new(1.0, 1.0, 2.0),
            flags: 0,
            vertices: vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(0.0, 1.0, 2.0),
            ],
            indices: vec![0, 1, 2],
        }],
        ..Default::default()
    };
    let tree = MapWriter::to_tree(&doc)?;
    let item = tree.expect_child("occludeModels")?.items().next().unwrap();
    assert_eq!(read_value::<u32>(item, "numVertsInBytes")?, 36);
    assert_eq!(read_value::<u32>(item, "dataSize")?, 39);
    assert_eq!(read_value::<u32>(item, "numTris")?, 1 | 0x8000);

    let reread = MapReader::from_tree(&tree, &AbortSignal::new())?;
    assert_eq!(reread.occlude_models[0].vertices, doc.occlude_models[0].vertices);
    assert_eq!(reread.occlude_models[0].indices, doc.occlude_models[0].indices);
    Ok(())
}

#[test]
fn oversized_occluder_model_is_skipped_not_fatal() -> Result<(), anyhow::Error> {
    let doc = MapDocument {
        occlude_models: vec![ModelOccluder {
            vertices: vec![Vec3::ZERO; 300],
            indices: vec![0, 1, 2],
            ..Default::default()
        }],
        ..Default::default()
    };
    let tree = MapWriter::to_tree(&doc)?;
    assert_eq!(tree.expect_child("occludeModels")?.items().count(), 0);
    Ok(())
}

#[test]
fn entity_rotation_is_inverted_on_disk() -> Result<(), anyhow::Error> {
    let rotation = Quat::from_rotation_z(0.7);
    let doc = MapDocument {
        name: "rot_test".to_owned(),
        entities: vec![crate::common::entity::EntityDef {
            archetype_name: "prop_a".to_owned(),
            rotation,
            ..Default::default()
        }],
        ..Default::default()
    };
    let tree = MapWriter::to_tree(&doc)?;
    let item = tree.expect_child("entities")?.items().next().unwrap();
    let stored = ragemap_xml::schema::read_quat(item, "rotation")?;
    assert!((stored.z - rotation.inverse().z).abs() < 1e-6);

    let reread = MapReader::from_tree(&tree, &AbortSignal::new())?;
    let back = reread.entities[0].rotation;
    assert!((back.z - rotation.z).abs() < 1e-6);
    assert!((back.w - rotation.w).abs() < 1e-6);
    Ok(())
}

#[test]
fn extents_use_archetype_bounds_when_available() -> Result<(), anyhow::Error> {
    let doc = MapDocument {
        entities: vec![crate::common::entity::EntityDef {
            archetype_name: "prop_kiosk".to_owned(),
            position: Vec3::new(10.0, 0.0, 0.0),
            lod_dist: 50.0,
            ..Default::default()
        }],
        ..Default::default()
    };
    let bounds = |name: &str| {
        (name == "prop_kiosk").then_some((Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 2.0)))
    };
    let tree = MapWriter::to_tree_with_bounds(&doc, &bounds)?;
    let reread = MapReader::from_tree(&tree, &AbortSignal::new())?;
    assert_eq!(reread.entities_extents_min, Vec3::new(9.0, -1.0, 0.0));
    assert_eq!(reread.entities_extents_max, Vec3::new(11.0, 1.0, 2.0));
    assert_eq!(reread.streaming_extents_min, Vec3::new(-41.0, -51.0, -50.0));
    assert_eq!(reread.streaming_extents_max, Vec3::new(61.0, 51.0, 52.0));
    Ok(())
}

#[test]
fn streaming_extents_grow_by_lod_dist() -> Result<(), anyhow::Error> {
    let doc = MapDocument {
        entities: vec![
            crate::common::entity::EntityDef {
                position: Vec3::new(10.0, 0.0, 0.0),
                lod_dist: 50.0,
                ..Default::default()
            },
            crate::common::entity::EntityDef {
                position: Vec3::new(-10.0, 5.0, 0.0),
                lod_dist: 20.0,
                ..Default::default()
            },
        ],
        ..Default::default()
    };
    let tree = MapWriter::to_tree(&doc)?;
    let reread = MapReader::from_tree(&tree, &AbortSignal::new())?;
    assert_eq!(reread.entities_extents_min, Vec3::new(-10.0, 0.0, 0.0));
    assert_eq!(reread.entities_extents_max, Vec3::new(10.0, 5.0, 0.0));
    assert_eq!(reread.streaming_extents_min, Vec3::new(-40.0, -50.0, -50.0));
    assert_eq!(reread.streaming_extents_max, Vec3::new(60.0, 50.0, 50.0));
    Ok(())
}
