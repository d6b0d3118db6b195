/// Persisted data model
///
/// Plain serializable records for everything the game saves: entity
/// snapshots, player state and settings. Records are matched back to live
/// pool instances by id on load (see `EntityPool::restore`).

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;

/// Per-family payload carried by an entity record.
///
/// Replaces the reflective set-variables/get-data casts of the old save
/// path with a tagged union dispatched at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityPayload {
    /// Store furniture and stock. `slot` holds child records for items
    /// stored on this one (parcels on a shelf, goods in a crate).
    Item {
        price: f32,
        slot: Vec<EntityRecord>,
    },
    /// Staff member, optionally carrying a parcel.
    Staff {
        name: String,
        parcel: Option<Box<EntityRecord>>,
    },
    /// Customer with a shopping cart and checkout state.
    Customer {
        name: String,
        total_pay: f32,
        done_shopping: bool,
        payment_confirmed: bool,
        cart: Vec<EntityRecord>,
    },
}

impl EntityPayload {
    /// Empty item payload, the default for plain furniture templates.
    pub fn item(price: f32) -> Self {
        EntityPayload::Item {
            price,
            slot: Vec::new(),
        }
    }
}

/// Persisted snapshot of a single pooled entity.
///
/// `id` is globally unique among non-destroyed records. Destroyed records
/// are kept so a loaded game knows not to respawn them; they are never
/// re-instantiated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    pub kind: EntityKind,
    pub is_destroyed: bool,
    pub position: Vec3,
    pub rotation: Quat,
    /// Placement yaw in degrees, kept separately from the quaternion so
    /// scroll rotation can keep quantizing it after a reload.
    pub yaw_deg: f32,
    pub payload: EntityPayload,
}

/// Player progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerData {
    pub name: String,
    pub money: f32,
    pub reputation: i32,
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for PlayerData {
    fn default() -> Self {
        Self {
            name: "Player".to_string(),
            money: 1000.0,
            reputation: 0,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Display and audio settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsData {
    pub fullscreen: bool,
    pub quality_index: usize,
    pub master_volume: f32,
    pub resolution_index: usize,
    pub cam_rotation: Quat,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            fullscreen: true,
            quality_index: 2,
            master_volume: 1.0,
            resolution_index: 0,
            cam_rotation: Quat::IDENTITY,
        }
    }
}

/// Everything a save file holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameData {
    pub player: PlayerData,
    pub settings: SettingsData,
    pub entities: Vec<EntityRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_json_round_trip() {
        let record = EntityRecord {
            id: "abc".to_string(),
            kind: EntityKind::Shelf,
            is_destroyed: false,
            position: Vec3::new(1.0, 0.0, -2.0),
            rotation: Quat::IDENTITY,
            yaw_deg: 90.0,
            payload: EntityPayload::Item {
                price: 25.0,
                slot: vec![EntityRecord {
                    id: "child".to_string(),
                    kind: EntityKind::Parcel,
                    is_destroyed: false,
                    position: Vec3::ZERO,
                    rotation: Quat::IDENTITY,
                    yaw_deg: 0.0,
                    payload: EntityPayload::item(5.0),
                }],
            },
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: EntityRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn game_data_defaults() {
        let data = GameData::default();
        assert_eq!(data.player.money, 1000.0);
        assert!(data.entities.is_empty());
    }
}
