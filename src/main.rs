use anyhow::Result;
use glam::{Quat, Vec2, Vec3};

use shopfloor::save::GameData;
use shopfloor::{
    Camera, Catalog, EngineConfig, EntityKind, EntityPool, EntityTemplate, InputState,
    InteractionScene, LayerMask, RaycastCursor, SaveFile,
};

fn main() -> Result<()> {
    env_logger::init();
    println!("=== Shopfloor Demo ===");

    let config = EngineConfig::load_or_default("config/shopfloor.json");

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

    let mut pool = EntityPool::new(catalog);
    let _pool_sub = pool
        .observers()
        .subscribe(|event| println!("pool changed: {:?}", event));

    let mut scene = InteractionScene::new();
    scene.add_surface(
        "floor",
        Vec3::new(-20.0, -1.0, -20.0),
        Vec3::new(20.0, 0.0, 20.0),
        LayerMask::SURFACES,
    );

    let mut camera = Camera::new(Vec3::new(0.0, 5.0, 0.0));
    camera.set_rotation(-std::f32::consts::FRAC_PI_2, 0.0);
    let viewport = Vec2::new(1280.0, 720.0);

    let mut cursor = RaycastCursor::new(config.cursor.clone().into());
    let mut input = InputState::default();

    // Place a shelf, focus it, drag it onto the snap grid, drop it.
    let shelf = pool
        .get_or_create(EntityKind::Shelf, Vec3::new(0.3, 0.0, 0.2), Quat::IDENTITY)?;
    println!("placed shelf {shelf}");

    input.pointer = viewport * 0.5;
    input.primary_click = true;
    cursor.update(&input, &camera, viewport, &scene, &mut pool);
    input.end_tick();

    input.toggle_snap = true;
    input.drag = true;
    cursor.update(&input, &camera, viewport, &scene, &mut pool);
    input.end_tick();

    cursor.update(&input, &camera, viewport, &scene, &mut pool);
    cursor.fixed_update(&camera);
    if cursor.end_drag() {
        println!("shelf dropped at snapped position");
    }

    // Save, then restore into a fresh pool.
    let mut data = GameData::default();
    data.entities = pool.collect();

    let save_path = std::env::temp_dir().join(&config.save.file_name);
    let mut file = SaveFile::new(&save_path)
        .with_encryption(config.save.encrypt)
        .with_pretty(config.save.pretty);
    file.save(&data)?;

    let mut catalog = Catalog::new();
    catalog.push(EntityTemplate::new(
        EntityKind::Shelf,
        "shelf",
        Vec3::new(0.5, 1.0, 0.5),
    ));
    let mut restored = EntityPool::new(catalog);
    if let Some(loaded) = file.load()? {
        restored.restore(&loaded.entities);
    }
    println!("restored pool holds {} entities", restored.len());

    println!("Demo complete.");
    Ok(())
}
