/// Full session round trip: build a store, save it through the encrypted
/// file pipeline, restore into a fresh pool and check the correlation
/// rules hold.

use glam::{Quat, Vec3};
use shopfloor::save::GameData;
use shopfloor::{
    Catalog, EntityKind, EntityPayload, EntityPool, EntityTemplate, PlayerData, RemovalPolicy,
    SaveFile,
};

fn store_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.push(EntityTemplate::new(
        EntityKind::Shelf,
        "shelf",
        Vec3::new(0.5, 1.0, 0.5),
    ));
    catalog.push(EntityTemplate::new(
        EntityKind::Table,
        "table",
        Vec3::new(1.0, 0.5, 1.0),
    ));
    catalog.push(
        EntityTemplate::new(EntityKind::Staff, "staff", Vec3::new(0.4, 0.9, 0.4))
            .with_drag_allowed(false)
            .with_removal(RemovalPolicy::Destroy)
            .with_payload(EntityPayload::Staff {
                name: String::new(),
                parcel: None,
            }),
    );
    catalog
}

fn temp_save(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("shopfloor_it_{name}_{}.save", std::process::id()))
}

#[test]
fn save_and_restore_full_store() {
    let mut pool = EntityPool::new(store_catalog());

    let shelf = pool
        .get_or_create(EntityKind::Shelf, Vec3::new(1.0, 0.0, 2.0), Quat::IDENTITY)
        .unwrap();
    let table = pool
        .get_or_create(EntityKind::Table, Vec3::new(-3.0, 0.0, 0.0), Quat::IDENTITY)
        .unwrap();
    let staff = pool
        .get_or_create(EntityKind::Staff, Vec3::new(0.0, 0.0, -1.0), Quat::IDENTITY)
        .unwrap();

    if let Some(entity) = pool.find_by_id_mut(&staff) {
        entity.payload = EntityPayload::Staff {
            name: "Lan".to_string(),
            parcel: None,
        };
    }
    // Recycle the table: it stays in storage but saves as destroyed.
    pool.remove(&table);
    assert_eq!(pool.len(), 3);

    let mut data = GameData::default();
    data.player = PlayerData {
        name: "Owner".to_string(),
        money: 580.0,
        ..PlayerData::default()
    };
    data.entities = pool.collect();
    assert_eq!(data.entities.len(), 3);

    let path = temp_save("full_store");
    let mut file = SaveFile::new(&path);
    file.save(&data).unwrap();

    let mut reader = SaveFile::new(&path);
    let loaded = reader.load().unwrap().unwrap();
    assert!(reader.is_loaded());
    assert_eq!(loaded.player.money, 580.0);

    // Fresh pool: only the non-destroyed records come back.
    let mut restored = EntityPool::new(store_catalog());
    restored.restore(&loaded.entities);
    assert_eq!(restored.len(), 2);
    assert!(restored
        .entities()
        .iter()
        .all(|e| e.kind != EntityKind::Table));

    // Payload survived the trip; ids did not (regenerated on spawn).
    let restored_staff = restored
        .entities()
        .iter()
        .find(|e| e.kind == EntityKind::Staff)
        .unwrap();
    assert_eq!(
        restored_staff.payload,
        EntityPayload::Staff {
            name: "Lan".to_string(),
            parcel: None,
        }
    );
    assert_ne!(restored_staff.id, staff);
    assert!(!restored.contains_id(&shelf));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn restore_onto_live_pool_rehydrates_by_id() {
    let mut pool = EntityPool::new(store_catalog());
    let shelf = pool
        .get_or_create(EntityKind::Shelf, Vec3::ZERO, Quat::IDENTITY)
        .unwrap();

    let mut records = pool.collect();
    records[0].position = Vec3::new(7.0, 0.0, -2.0);
    records[0].payload = EntityPayload::item(45.0);

    // Same pool, matching id: hydrate in place, no growth.
    pool.restore(&records);
    assert_eq!(pool.len(), 1);
    let entity = pool.find_by_id(&shelf).unwrap();
    assert_eq!(entity.transform.position, Vec3::new(7.0, 0.0, -2.0));
    assert_eq!(entity.payload, EntityPayload::item(45.0));
}

#[test]
fn collect_preserves_storage_order_across_round_trip() {
    let mut pool = EntityPool::new(store_catalog());
    for i in 0..5 {
        pool.get_or_create(
            EntityKind::Shelf,
            Vec3::new(i as f32 * 2.0, 0.0, 0.0),
            Quat::IDENTITY,
        )
        .unwrap();
    }

    let path = temp_save("order");
    let mut file = SaveFile::new(&path);
    let mut data = GameData::default();
    data.entities = pool.collect();
    file.save(&data).unwrap();

    let loaded = SaveFile::new(&path).load().unwrap().unwrap();
    let mut restored = EntityPool::new(store_catalog());
    restored.restore(&loaded.entities);

    let xs: Vec<f32> = restored
        .entities()
        .iter()
        .map(|e| e.transform.position.x)
        .collect();
    assert_eq!(xs, vec![0.0, 2.0, 4.0, 6.0, 8.0]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn nested_item_slots_round_trip() {
    let mut pool = EntityPool::new(store_catalog());
    let shelf = pool
        .get_or_create(EntityKind::Shelf, Vec3::ZERO, Quat::IDENTITY)
        .unwrap();

    // A shelf holding two parcel records in its slot.
    let parcel = |id: &str| shopfloor::EntityRecord {
        id: id.to_string(),
        kind: EntityKind::Parcel,
        is_destroyed: false,
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        yaw_deg: 0.0,
        payload: EntityPayload::item(5.0),
    };
    pool.find_by_id_mut(&shelf).unwrap().payload = EntityPayload::Item {
        price: 120.0,
        slot: vec![parcel("p1"), parcel("p2")],
    };

    let path = temp_save("nested");
    let mut file = SaveFile::new(&path);
    let mut data = GameData::default();
    data.entities = pool.collect();
    file.save(&data).unwrap();

    let loaded = SaveFile::new(&path).load().unwrap().unwrap();
    match &loaded.entities[0].payload {
        EntityPayload::Item { price, slot } => {
            assert_eq!(*price, 120.0);
            assert_eq!(slot.len(), 2);
        }
        other => panic!("expected item payload, got {other:?}"),
    }

    let _ = std::fs::remove_file(&path);
}
