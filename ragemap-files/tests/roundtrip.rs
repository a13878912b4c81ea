//! Whole-document round trips over on-disk fixtures. The equivalence is
//! tree-level: read, write, re-read, write again and compare the two
//! emitted trees (numeric formatting settles after the first pass).

use ragemap_files::ymap::reader::MapReader;
use ragemap_files::ymap::writer::MapWriter;
use ragemap_files::ynv::reader::NavReader;
use ragemap_files::ynv::writer::NavWriter;
use ragemap_files::ytyp::reader::TypesReader;
use ragemap_files::ytyp::types::{Archetype, TimeFlags};
use ragemap_files::ytyp::writer::TypesWriter;
use ragemap_files::AbortSignal;

const YTYP: &str = include_str!("data/corner_store.ytyp.xml");
const YMAP: &str = include_str!("data/corner_store.ymap.xml");
const YNV: &str = include_str!("data/vehicle_lot.ynv.xml");

#[test]
fn ytyp_round_trip_is_stable() -> Result<(), anyhow::Error> {
    let abort = AbortSignal::new();
    let doc = TypesReader::read(YTYP.as_bytes(), &abort)?;
    assert_eq!(doc.name, "corner_store");
    assert_eq!(doc.archetypes.len(), 3);

    let Archetype::Time(sign) = &doc.archetypes[1] else {
        panic!("expected the time archetype second");
    };
    let hours = TimeFlags::from_bits_retain(sign.time_flags);
    assert!(hours.contains(TimeFlags::HOUR_16 | TimeFlags::HOUR_23));
    assert!(!hours.contains(TimeFlags::SWAP_WHILE_VISIBLE));

    let first = TypesWriter::to_tree(&doc)?;
    let reread = TypesReader::from_tree(&first, &abort)?;
    let second = TypesWriter::to_tree(&reread)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn ytyp_mlo_semantics_survive_the_trip() -> Result<(), anyhow::Error> {
    let doc = TypesReader::read(YTYP.as_bytes(), &AbortSignal::new())?;
    let Archetype::Mlo(mlo) = &doc.archetypes[2] else {
        panic!("expected the MLO archetype last");
    };
    assert_eq!(mlo.rooms.len(), 2);
    assert_eq!(mlo.portals.len(), 1);
    // both top-level entities hang off the shop floor
    let shop_floor = &mlo.rooms[1];
    assert!(mlo
        .entities
        .iter()
        .filter(|e| e.attached_entity_set_id.is_none())
        .all(|e| e.attached_room_id == Some(shop_floor.id)));
    // the set member decodes location 1 as that same room
    let member = mlo
        .entities
        .iter()
        .find(|e| e.attached_entity_set_id.is_some())
        .expect("set member");
    assert_eq!(member.attached_room_id, Some(shop_floor.id));
    assert_eq!(mlo.portal_count_of_room(shop_floor.id), 1);
    Ok(())
}

#[test]
fn ymap_round_trip_is_stable() -> Result<(), anyhow::Error> {
    let abort = AbortSignal::new();
    let doc = MapReader::read(YMAP.as_bytes(), &abort)?;
    assert_eq!(doc.entities.len(), 2);
    assert_eq!(doc.occlude_models[0].vertices.len(), 3);
    assert_eq!(doc.physics_dictionaries, vec!["prop_store".to_owned()]);

    let first = MapWriter::to_tree(&doc)?;
    let reread = MapReader::from_tree(&first, &abort)?;
    let second = MapWriter::to_tree(&reread)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn ynv_round_trip_is_stable() -> Result<(), anyhow::Error> {
    let abort = AbortSignal::new();
    let mesh = NavReader::read(YNV.as_bytes(), &abort)?;
    assert_eq!(mesh.area_id, 10000);
    assert_eq!(mesh.polygons.len(), 2);
    assert_eq!(mesh.links.len(), 1);
    assert_eq!(mesh.cover_points.len(), 1);

    let first = NavWriter::to_tree(&mesh)?;
    let reread = NavReader::from_tree(&first, &abort)?;
    let second = NavWriter::to_tree(&reread)?;
    assert_eq!(first, second);
    Ok(())
}
