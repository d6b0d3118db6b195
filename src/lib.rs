//! Item placement and pooling engine for a store sim.
//!
//! Raycast-driven drag/drop placement with grid snapping and quantized
//! rotation, a typed entity pool with deterministic reuse, and an
//! id-correlated save/restore path behind an encrypted save file.

pub mod camera;
pub mod config;
pub mod cursor;
pub mod entity;
pub mod events;
pub mod input;
pub mod persistence;
pub mod pool;
pub mod save;

pub use camera::Camera;
pub use config::EngineConfig;
pub use cursor::{CursorConfig, HitResult, HitTarget, InteractionScene, LayerMask, Ray, RaycastCursor};
pub use entity::{Catalog, EntityId, EntityKind, EntityTemplate, PooledEntity, RemovalPolicy, Transform};
pub use events::{CursorEvent, Observers, PoolEvent, Subscription};
pub use input::InputState;
pub use persistence::{PersistError, SaveFile};
pub use pool::{EntityPool, PoolError};
pub use save::{EntityPayload, EntityRecord, GameData, PlayerData, SettingsData};
