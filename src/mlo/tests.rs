use glam::Vec3;
use ragemap_files::common::entity::EntityDef;
use ragemap_files::ytyp::types::{MloArchetype, MloEntity, MloPortal, MloRoom};

use crate::mlo::filter::{AttachmentFilter, EntityFilter};
use crate::mlo::MloModel;

fn room(name: &str) -> MloRoom {
    MloRoom {
        name: name.to_owned(),
        bb_min: Vec3::ZERO,
        bb_max: Vec3::new(4.0, 4.0, 3.0),
        ..Default::default()
    }
}

fn entity(name: &str) -> MloEntity {
    MloEntity {
        def: EntityDef {
            archetype_name: name.to_owned(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn model_with_two_rooms() -> (MloModel, u32, u32, u32) {
    let mut model = MloModel::new(MloArchetype::default());
    let room_a = model.add_room(room("lobby"));
    let room_b = model.add_room(room("office"));
    let portal = model.add_portal(MloPortal {
        room_from: Some(room_a),
        room_to: Some(room_b),
        ..Default::default()
    });
    (model, room_a, room_b, portal)
}

#[test]
fn ids_are_monotonic_and_never_reused() {
    let (mut model, room_a, room_b, _) = model_with_two_rooms();
    assert_ne!(room_a, room_b);
    model.delete_room(room_b);
    let room_c = model.add_room(room("archive"));
    assert!(room_c > room_b, "deleted ids must not come back");
}

#[test]
fn deleting_a_room_unattaches_but_never_cascades() {
    let (mut model, room_a, _, portal) = model_with_two_rooms();
    let mut resident = entity("prop_desk");
    resident.attached_room_id = Some(room_a);
    model.add_entity(resident);

    assert!(model.delete_room(room_a));

    let archetype = model.archetype();
    assert_eq!(archetype.rooms.len(), 1);
    assert_eq!(archetype.entities.len(), 1, "entity survives");
    assert_eq!(archetype.entities[0].attached_room_id, None);
    let portal = archetype.portal(portal).expect("portal survives");
    assert_eq!(portal.room_from, None, "portal side coerced to exterior");
    assert!(portal.room_to.is_some());
}

#[test]
fn deleting_an_entity_set_frees_its_members() {
    let mut model = MloModel::new(MloArchetype::default());
    let set = model.add_entity_set("seasonal");
    let mut member = entity("prop_tree");
    member.attached_entity_set_id = Some(set);
    model.add_entity(member);

    assert!(model.delete_entity_set(set));
    assert_eq!(model.archetype().entities.len(), 1);
    assert_eq!(model.archetype().entities[0].attached_entity_set_id, None);
    assert!(!model.delete_entity_set(set), "second delete is a no-op");
}

#[test]
fn choice_lists_track_the_collections() {
    let (mut model, room_a, _, _) = model_with_two_rooms();
    let generation = model.generation();

    let rooms = model.room_choices();
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0].label, "lobby");

    let portals = model.portal_choices();
    assert_eq!(portals.len(), 1);
    assert!(portals[0].label.contains("lobby -> office"));

    model.delete_room(room_a);
    assert!(model.generation() > generation, "mutation bumps the generation");
    assert!(model.portal_choices()[0].label.contains("exterior -> office"));
}

#[test]
fn attachment_operations_validate_their_targets() {
    let (mut model, room_a, _, portal) = model_with_two_rooms();
    let set = model.add_entity_set("decor");
    model.add_entity(entity("prop_chair"));

    model.attach_entity_to_room(0, room_a).unwrap();
    assert_eq!(model.archetype().entities[0].attached_room_id, Some(room_a));

    // a portal attachment releases the room side
    model.attach_entity_to_portal(0, portal).unwrap();
    let attached = &model.archetype().entities[0];
    assert_eq!(attached.attached_portal_id, Some(portal));
    assert_eq!(attached.attached_room_id, None);

    model.attach_entity_to_set(0, set).unwrap();
    assert_eq!(model.archetype().entities[0].attached_entity_set_id, Some(set));

    assert!(model.attach_entity_to_room(0, 999).is_err());
    assert!(model.attach_entity_to_portal(7, portal).is_err(), "no entity 7");

    model.detach_entity(0).unwrap();
    let detached = &model.archetype().entities[0];
    assert_eq!(detached.attached_portal_id, None);
    assert_eq!(detached.attached_entity_set_id, None);
}

#[test]
fn validation_reports_dangling_references() {
    let (model, _, _, _) = model_with_two_rooms();
    assert!(model.validate().is_empty());

    let mut archetype = model.into_inner();
    archetype.entities.push(MloEntity {
        attached_room_id: Some(999),
        ..entity("prop_orphan")
    });
    let duplicate = archetype.rooms[0].clone();
    archetype.rooms.push(duplicate);

    let issues = MloModel::new(archetype).validate();
    assert_eq!(issues.len(), 2);
    assert!(issues.iter().any(|i| i.contains("duplicate room id")));
    assert!(issues.iter().any(|i| i.contains("missing room 999")));
}

#[test]
fn filters_combine_name_and_attachment() {
    let (mut model, room_a, room_b, portal) = model_with_two_rooms();
    let set = model.add_entity_set("decor");

    let mut desk = entity("prop_desk_01");
    desk.attached_room_id = Some(room_a);
    model.add_entity(desk);

    let mut lamp = entity("prop_lamp_02");
    lamp.attached_portal_id = Some(portal);
    model.add_entity(lamp);

    let mut plant = entity("prop_plant_03");
    plant.attached_entity_set_id = Some(set);
    plant.attached_room_id = Some(room_b);
    model.add_entity(plant);

    model.add_entity(entity("prop_loose"));

    let archetype = model.archetype();

    let by_name = EntityFilter {
        name_contains: Some("DESK".to_owned()),
        ..Default::default()
    };
    assert_eq!(by_name.apply(archetype), vec![0]);

    let by_portal = EntityFilter {
        attachment: AttachmentFilter::Portal(portal),
        ..Default::default()
    };
    assert_eq!(by_portal.apply(archetype), vec![1]);

    let in_set_room = EntityFilter {
        attachment: AttachmentFilter::EntitySet {
            id: set,
            room: Some(room_b),
        },
        ..Default::default()
    };
    assert_eq!(in_set_room.apply(archetype), vec![2]);

    let in_set_wrong_room = EntityFilter {
        attachment: AttachmentFilter::EntitySet {
            id: set,
            room: Some(room_a),
        },
        ..Default::default()
    };
    assert!(in_set_wrong_room.apply(archetype).is_empty());

    let unattached = EntityFilter {
        attachment: AttachmentFilter::Unattached,
        ..Default::default()
    };
    assert_eq!(unattached.apply(archetype), vec![3]);
}
