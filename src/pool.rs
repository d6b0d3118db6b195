/// Typed entity pool
///
/// Owns every live store entity and reuses deactivated instances instead
/// of allocating new ones. Also the save/restore correlator: persisted
/// records are matched against pool contents by id on load, and every
/// instance snapshots itself back into a record on save.

use glam::{Quat, Vec3};
use log::{debug, warn};
use thiserror::Error;

use crate::entity::{Catalog, EntityId, EntityKind, PooledEntity, RemovalPolicy};
use crate::events::{Observers, PoolEvent};
use crate::save::EntityRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// No reusable instance and no catalog template for the kind.
    #[error("no template registered for {0:?}, cannot create from pool")]
    Exhausted(EntityKind),
}

pub struct EntityPool {
    catalog: Catalog,
    entities: Vec<PooledEntity>,
    observers: Observers<PoolEvent>,
}

impl EntityPool {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            entities: Vec::new(),
            observers: Observers::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[PooledEntity] {
        &self.entities
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Pool-changed notifications; subscribe here for UI counts etc.
    pub fn observers(&self) -> &Observers<PoolEvent> {
        &self.observers
    }

    /// First instance matching `id`, recyclable or not. Empty ids never
    /// match anything.
    pub fn find_by_id(&self, id: &str) -> Option<&PooledEntity> {
        if id.is_empty() {
            return None;
        }
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut PooledEntity> {
        if id.is_empty() {
            return None;
        }
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }

    /// First recyclable instance of `kind`, in insertion order. Insertion
    /// order is the deterministic tie-break when several are available.
    pub fn find_reusable(&self, kind: EntityKind) -> Option<&PooledEntity> {
        self.entities
            .iter()
            .find(|e| e.kind == kind && e.is_recyclable)
    }

    fn find_reusable_index(&self, kind: EntityKind) -> Option<usize> {
        self.entities
            .iter()
            .position(|e| e.kind == kind && e.is_recyclable)
    }

    /// Reuse a recyclable instance of `kind` or instantiate one from the
    /// catalog. Either way the returned instance is active, carries a
    /// freshly generated id and sits at the requested pose.
    pub fn get_or_create(
        &mut self,
        kind: EntityKind,
        position: Vec3,
        rotation: Quat,
    ) -> Result<EntityId, PoolError> {
        let index = self.get_or_create_index(kind, position, rotation)?;
        Ok(self.entities[index].id.clone())
    }

    fn get_or_create_index(
        &mut self,
        kind: EntityKind,
        position: Vec3,
        rotation: Quat,
    ) -> Result<usize, PoolError> {
        if let Some(index) = self.find_reusable_index(kind) {
            let entity = &mut self.entities[index];
            entity.transform.position = position;
            entity.transform.rotation = rotation;
            entity.is_recyclable = false;
            entity.active = true;
            entity.regenerate_id();
            debug!("reused {:?} from pool as {}", kind, entity.id);
            return Ok(index);
        }

        let Some(template) = self.catalog.find(kind) else {
            warn!("no template registered for {:?}, cannot create from pool", kind);
            return Err(PoolError::Exhausted(kind));
        };

        let entity = PooledEntity::from_template(template, position, rotation);
        debug!("instantiated {:?} from catalog as {}", kind, entity.id);
        self.entities.push(entity);
        self.notify_changed();
        Ok(self.entities.len() - 1)
    }

    /// Remove an instance from active duty, following its own removal
    /// policy: recyclable entities are deactivated and kept for reuse,
    /// one-shot entities leave the backing collection entirely.
    pub fn remove(&mut self, id: &str) {
        let Some(index) = self.entities.iter().position(|e| e.id == id) else {
            return;
        };

        match self.entities[index].removal {
            RemovalPolicy::Recycle => {
                let entity = &mut self.entities[index];
                entity.active = false;
                entity.is_recyclable = true;
                entity.outline_on = false;
            }
            RemovalPolicy::Destroy => {
                self.entities.remove(index);
                self.notify_changed();
            }
        }
    }

    /// Switch an instance's outline decorations on or off. Instances
    /// without outlines ignore this.
    pub fn set_outlines(&mut self, id: &str, on: bool) {
        if let Some(entity) = self.find_by_id_mut(id) {
            if entity.outline_count > 0 {
                entity.outline_on = on;
            }
        }
    }

    /// Reconcile persisted records against pool contents.
    ///
    /// Matched ids are re-hydrated in place; unmatched non-destroyed
    /// records are spawned and hydrated; unmatched destroyed records are
    /// skipped. A record whose kind has no template is dropped with a
    /// warning and processing continues.
    pub fn restore(&mut self, records: &[EntityRecord]) {
        for record in records {
            if let Some(entity) = self.find_by_id_mut(&record.id) {
                entity.apply_record(record);
                continue;
            }

            if record.is_destroyed {
                continue;
            }

            match self.get_or_create_index(record.kind, record.position, record.rotation) {
                Ok(index) => self.entities[index].apply_record(record),
                Err(err) => {
                    warn!("dropping record {}: {}", record.id, err);
                }
            }
        }
    }

    /// Snapshot every live instance into a record, preserving pool
    /// storage order.
    pub fn collect(&self) -> Vec<EntityRecord> {
        self.entities.iter().map(|e| e.to_record()).collect()
    }

    fn notify_changed(&self) {
        self.observers.emit(&PoolEvent::Changed {
            len: self.entities.len(),
        });
    }
}
