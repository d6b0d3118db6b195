/// Entity identity, templates and live pool instances
///
/// A `PooledEntity` is a live store object owned by the pool that created
/// it. Templates play the role of prefabs: an ordered catalog of
/// per-kind blueprints the pool instantiates from when no recyclable
/// instance is available.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cursor::LayerMask;
use crate::save::{EntityPayload, EntityRecord};

/// Category tag for placeable entities; the pool's reuse key and the
/// catalog's lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Shelf,
    Table,
    CashRegister,
    Parcel,
    Plant,
    Staff,
    Customer,
}

/// Unique instance identifier, regenerated every time an instance leaves
/// the recyclable state.
pub type EntityId = String;

pub fn generate_id() -> EntityId {
    Uuid::new_v4().to_string()
}

/// Transform component for positioning entities in 3D space
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// What `EntityPool::remove` does with an instance. Recyclable furniture
/// goes back to the pool; one-shot objects are dropped outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalPolicy {
    Recycle,
    Destroy,
}

/// Blueprint for one entity kind. The pool instantiates from the first
/// catalog template whose kind matches.
#[derive(Debug, Clone)]
pub struct EntityTemplate {
    pub kind: EntityKind,
    pub name: String,
    /// Picking AABB half extents around the entity position.
    pub half_extents: Vec3,
    /// Interaction layer the instance is raycast on.
    pub layer: LayerMask,
    pub drag_allowed: bool,
    pub removal: RemovalPolicy,
    /// Number of outline decorations the instance exposes (may be zero).
    pub outline_count: usize,
    pub payload: EntityPayload,
}

impl EntityTemplate {
    pub fn new(kind: EntityKind, name: &str, half_extents: Vec3) -> Self {
        Self {
            kind,
            name: name.to_string(),
            half_extents,
            layer: LayerMask::ITEMS,
            drag_allowed: true,
            removal: RemovalPolicy::Recycle,
            outline_count: 1,
            payload: EntityPayload::item(0.0),
        }
    }

    pub fn with_layer(mut self, layer: LayerMask) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_drag_allowed(mut self, allowed: bool) -> Self {
        self.drag_allowed = allowed;
        self
    }

    pub fn with_removal(mut self, removal: RemovalPolicy) -> Self {
        self.removal = removal;
        self
    }

    pub fn with_payload(mut self, payload: EntityPayload) -> Self {
        self.payload = payload;
        self
    }
}

/// Ordered template catalog; first match by kind wins.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    templates: Vec<EntityTemplate>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, template: EntityTemplate) {
        self.templates.push(template);
    }

    /// First template matching `kind`, in catalog order.
    pub fn find(&self, kind: EntityKind) -> Option<&EntityTemplate> {
        self.templates.iter().find(|t| t.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Live pool instance.
///
/// `is_recyclable == true` means the instance is deactivated and eligible
/// for reuse; the id is regenerated on every recyclable-to-active
/// transition, so a recycled instance never answers to its old id once
/// reused.
#[derive(Debug, Clone)]
pub struct PooledEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub is_recyclable: bool,
    pub active: bool,
    pub transform: Transform,
    /// Placement yaw in degrees, tracked separately from the quaternion
    /// for scroll-driven quantized rotation.
    pub yaw_deg: f32,
    pub half_extents: Vec3,
    pub layer: LayerMask,
    pub drag_allowed: bool,
    pub removal: RemovalPolicy,
    /// Outline decorations currently switched on (of `outline_count`).
    pub outline_on: bool,
    pub outline_count: usize,
    pub payload: EntityPayload,
}

impl PooledEntity {
    /// Instantiate from a template at the given pose.
    pub fn from_template(template: &EntityTemplate, position: Vec3, rotation: Quat) -> Self {
        Self {
            id: generate_id(),
            kind: template.kind,
            name: template.name.clone(),
            is_recyclable: false,
            active: true,
            transform: Transform::new(position, rotation),
            yaw_deg: 0.0,
            half_extents: template.half_extents,
            layer: template.layer,
            drag_allowed: template.drag_allowed,
            removal: template.removal,
            outline_on: false,
            outline_count: template.outline_count,
            payload: template.payload.clone(),
        }
    }

    pub fn regenerate_id(&mut self) {
        self.id = generate_id();
    }

    /// Picking AABB in world space.
    pub fn aabb(&self) -> (Vec3, Vec3) {
        (
            self.transform.position - self.half_extents,
            self.transform.position + self.half_extents,
        )
    }

    /// Hydrate this instance from a persisted record. The record id is
    /// not copied; identity comes from the pool, not the save file.
    pub fn apply_record(&mut self, record: &EntityRecord) {
        self.transform.position = record.position;
        self.transform.rotation = record.rotation;
        self.yaw_deg = record.yaw_deg;
        self.payload = record.payload.clone();
    }

    /// Snapshot this instance for the save file. Recyclable instances are
    /// written as destroyed so a reload never respawns them.
    pub fn to_record(&self) -> EntityRecord {
        EntityRecord {
            id: self.id.clone(),
            kind: self.kind,
            is_destroyed: self.is_recyclable,
            position: self.transform.position,
            rotation: self.transform.rotation,
            yaw_deg: self.yaw_deg,
            payload: self.payload.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_first_match_wins() {
        let mut catalog = Catalog::new();
        catalog.push(EntityTemplate::new(
            EntityKind::Shelf,
            "shelf_a",
            Vec3::splat(0.5),
        ));
        catalog.push(EntityTemplate::new(
            EntityKind::Shelf,
            "shelf_b",
            Vec3::splat(0.5),
        ));

        assert_eq!(catalog.find(EntityKind::Shelf).unwrap().name, "shelf_a");
        assert!(catalog.find(EntityKind::Customer).is_none());
    }

    #[test]
    fn record_snapshot_reflects_recyclable_state() {
        let template = EntityTemplate::new(EntityKind::Table, "table", Vec3::splat(0.5));
        let mut entity =
            PooledEntity::from_template(&template, Vec3::new(2.0, 0.0, 1.0), Quat::IDENTITY);

        assert!(!entity.to_record().is_destroyed);

        entity.is_recyclable = true;
        entity.active = false;
        assert!(entity.to_record().is_destroyed);
    }

    #[test]
    fn apply_record_keeps_pool_identity() {
        let template = EntityTemplate::new(EntityKind::Table, "table", Vec3::splat(0.5));
        let mut entity = PooledEntity::from_template(&template, Vec3::ZERO, Quat::IDENTITY);
        let own_id = entity.id.clone();

        let mut record = entity.to_record();
        record.id = "someone-else".to_string();
        record.position = Vec3::new(5.0, 0.0, 5.0);
        entity.apply_record(&record);

        assert_eq!(entity.id, own_id);
        assert_eq!(entity.transform.position, Vec3::new(5.0, 0.0, 5.0));
    }
}
