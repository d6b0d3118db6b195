/// Raycast placement cursor
///
/// Casts a ray from the pointer every tick, tracks what it hits, and
/// drives the focus/drag state machine: pick up, move with optional grid
/// snapping, rotate in quantized yaw steps, drop when the distance gate
/// allows it.
///
/// Tick order is fixed: raycast, then drag movement, then drag rotation.
/// The distance gate runs on the fixed-timestep tick.

use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::entity::EntityId;
use crate::events::{CursorEvent, Observers};
use crate::input::InputState;
use crate::pool::EntityPool;

/// Interaction layer bitmask. Entities and surfaces are only raycast when
/// their layer intersects the cursor's configured mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ITEMS: LayerMask = LayerMask(1 << 0);
    pub const SURFACES: LayerMask = LayerMask(1 << 1);
    pub const NPCS: LayerMask = LayerMask(1 << 2);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub const fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

/// Ray for 3D picking
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Create a ray from screen coordinates (pixels, y down).
    pub fn from_screen(screen: Vec2, viewport: Vec2, view_matrix: Mat4, proj_matrix: Mat4) -> Self {
        // Normalize screen coordinates to NDC (-1 to 1)
        let ndc_x = (2.0 * screen.x) / viewport.x - 1.0;
        let ndc_y = 1.0 - (2.0 * screen.y) / viewport.y;

        // Clip space, pointing into the screen
        let ray_clip = Vec4::new(ndc_x, ndc_y, -1.0, 1.0);

        // Transform to view space
        let inv_proj = proj_matrix.inverse();
        let ray_view = inv_proj * ray_clip;
        let ray_view = Vec4::new(ray_view.x, ray_view.y, -1.0, 0.0);

        // Transform to world space
        let inv_view = view_matrix.inverse();
        let ray_world = inv_view * ray_view;

        let direction = Vec3::new(ray_world.x, ray_world.y, ray_world.z).normalize();
        let origin = inv_view.w_axis.truncate();

        Self { origin, direction }
    }

    /// Slab test against an axis-aligned box. Returns entry distance and
    /// the outward normal of the entered face.
    pub fn intersect_aabb(&self, min: Vec3, max: Vec3) -> Option<(f32, Vec3)> {
        let mut tmin = 0.0_f32;
        let mut tmax = f32::MAX;
        let mut entry_axis: Option<usize> = None;

        for axis in 0..3 {
            let d = self.direction[axis];
            if d.abs() < 1e-8 {
                if self.origin[axis] < min[axis] || self.origin[axis] > max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (min[axis] - self.origin[axis]) * inv;
            let mut t1 = (max[axis] - self.origin[axis]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > tmin {
                tmin = t0;
                entry_axis = Some(axis);
            }
            tmax = tmax.min(t1);
            if tmin > tmax {
                return None;
            }
        }

        let normal = match entry_axis {
            Some(axis) => {
                let mut n = Vec3::ZERO;
                n[axis] = -self.direction[axis].signum();
                n
            }
            // Ray started inside the box; face the ray back at itself.
            None => -self.direction,
        };

        Some((tmin, normal))
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// What a ray intersection landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Entity(EntityId),
    /// Index into the scene's static surfaces.
    Surface(usize),
}

/// One ray intersection this tick. Recomputed every update; carries no
/// identity across ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
    pub target: HitTarget,
}

impl HitResult {
    pub fn entity(&self) -> Option<&EntityId> {
        match &self.target {
            HitTarget::Entity(id) => Some(id),
            HitTarget::Surface(_) => None,
        }
    }
}

/// Static raycast target: floors, walls, counters.
#[derive(Debug, Clone)]
pub struct StaticSurface {
    pub name: String,
    pub min: Vec3,
    pub max: Vec3,
    pub layer: LayerMask,
}

/// The set of static surfaces rays can land on, besides pool entities.
#[derive(Debug, Clone, Default)]
pub struct InteractionScene {
    surfaces: Vec<StaticSurface>,
}

impl InteractionScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_surface(&mut self, name: &str, min: Vec3, max: Vec3, layer: LayerMask) {
        self.surfaces.push(StaticSurface {
            name: name.to_string(),
            min,
            max,
            layer,
        });
    }

    pub fn surfaces(&self) -> &[StaticSurface] {
        &self.surfaces
    }

    /// Cast a ray against every surface and active pool entity on the
    /// mask, nearest first. `exclude` skips one entity id (the instance
    /// being dragged must not occlude its own placement ray).
    pub fn cast(
        &self,
        ray: &Ray,
        mask: LayerMask,
        range: f32,
        pool: &EntityPool,
        exclude: Option<&str>,
    ) -> Vec<HitResult> {
        let mut hits = Vec::new();

        for (index, surface) in self.surfaces.iter().enumerate() {
            if !mask.intersects(surface.layer) {
                continue;
            }
            if let Some((t, normal)) = ray.intersect_aabb(surface.min, surface.max) {
                if t <= range {
                    hits.push(HitResult {
                        point: ray.point_at(t),
                        normal,
                        distance: t,
                        target: HitTarget::Surface(index),
                    });
                }
            }
        }

        for entity in pool.entities() {
            if !entity.active || !mask.intersects(entity.layer) {
                continue;
            }
            if exclude == Some(entity.id.as_str()) {
                continue;
            }
            let (min, max) = entity.aabb();
            if let Some((t, normal)) = ray.intersect_aabb(min, max) {
                if t <= range {
                    hits.push(HitResult {
                        point: ray.point_at(t),
                        normal,
                        distance: t,
                        target: HitTarget::Entity(entity.id.clone()),
                    });
                }
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

/// Quantize a position to the tile grid, independently per axis.
pub fn snap_position(point: Vec3, tile_size: f32, tile_offset: Vec3) -> Vec3 {
    Vec3::new(
        (point.x / tile_size).round() * tile_size + tile_offset.x,
        (point.y / tile_size).round() * tile_size + tile_offset.y,
        (point.z / tile_size).round() * tile_size + tile_offset.z,
    )
}

/// Quantize the current yaw and the scroll-driven increment to the
/// nearest 10 degrees each, then add them.
pub fn quantize_yaw(current_deg: f32, increment_deg: f32) -> f32 {
    let rounded = (current_deg / 10.0).round() * 10.0;
    let step = (increment_deg / 10.0).round() * 10.0;
    rounded + step
}

/// Cursor tuning parameters.
#[derive(Debug, Clone, Copy)]
pub struct CursorConfig {
    /// Degrees of yaw per scroll unit before quantization.
    pub rotation_speed: f32,
    /// Camera-to-hit distance beyond which placement is blocked.
    pub snap_distance: f32,
    /// Grid cell size for snapping.
    pub tile_size: f32,
    /// Per-axis offset added after snapping.
    pub tile_offset: Vec3,
    /// Layers the cursor raycasts against.
    pub layer_mask: LayerMask,
    /// Maximum raycast distance.
    pub ray_range: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 10.0,
            snap_distance: 6.0,
            tile_size: 1.0,
            tile_offset: Vec3::ZERO,
            layer_mask: LayerMask::ALL,
            ray_range: 100.0,
        }
    }
}

/// Raycast-driven focus and drag state machine.
///
/// States: idle, focused, dragging. Focus moves freely between entities;
/// a drag starts from the focused entity and ends on a drop the distance
/// gate allows.
pub struct RaycastCursor {
    config: CursorConfig,
    pub snapping: bool,
    pub raycast_enabled: bool,
    pub outline_enabled: bool,
    focus: Option<EntityId>,
    drag: Option<EntityId>,
    within_distance: bool,
    hit: Option<HitResult>,
    hits: Vec<HitResult>,
    events: Observers<CursorEvent>,
}

impl RaycastCursor {
    pub fn new(config: CursorConfig) -> Self {
        Self {
            config,
            snapping: false,
            raycast_enabled: true,
            outline_enabled: true,
            focus: None,
            drag: None,
            within_distance: false,
            hit: None,
            hits: Vec::new(),
            events: Observers::new(),
        }
    }

    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    /// Nearest intersection this tick, if any.
    pub fn hit(&self) -> Option<&HitResult> {
        self.hit.as_ref()
    }

    /// All intersections along the ray this tick, nearest first.
    pub fn hits(&self) -> &[HitResult] {
        &self.hits
    }

    pub fn focused(&self) -> Option<&EntityId> {
        self.focus.as_ref()
    }

    pub fn dragging(&self) -> Option<&EntityId> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Result of the last distance-gate evaluation.
    pub fn placement_allowed(&self) -> bool {
        self.within_distance
    }

    /// Focus/drag notifications.
    pub fn events(&self) -> &Observers<CursorEvent> {
        &self.events
    }

    /// Variable-timestep tick: consume input edges, recompute the ray
    /// hit, then move and rotate the dragged entity.
    pub fn update(
        &mut self,
        input: &InputState,
        camera: &Camera,
        viewport: Vec2,
        scene: &InteractionScene,
        pool: &mut EntityPool,
    ) {
        if input.toggle_snap {
            self.snapping = !self.snapping;
        }

        self.update_ray_hit(input, camera, viewport, scene, pool);

        if input.primary_click {
            self.set_focus(input, pool);
        }
        if input.cancel {
            self.cancel_focus(pool);
        }
        if input.drag {
            self.begin_drag(pool);
        }

        self.move_drag(pool);
        self.rotate_drag(input, pool);
    }

    /// Fixed-timestep tick: evaluate the distance gate.
    pub fn fixed_update(&mut self, camera: &Camera) {
        self.within_distance = match &self.hit {
            Some(hit) => camera.position().distance(hit.point) < self.config.snap_distance,
            None => false,
        };
    }

    /// Drop the dragged entity. Refused while the distance gate blocks
    /// placement; the drag stays alive and the last computed position
    /// stands either way.
    pub fn end_drag(&mut self) -> bool {
        let Some(id) = self.drag.clone() else {
            return false;
        };
        if !self.within_distance {
            return false;
        }

        self.drag = None;
        self.events.emit(&CursorEvent::Selected(id));
        true
    }

    fn update_ray_hit(
        &mut self,
        input: &InputState,
        camera: &Camera,
        viewport: Vec2,
        scene: &InteractionScene,
        pool: &EntityPool,
    ) {
        if !self.raycast_enabled {
            return;
        }

        let ray = camera.screen_to_ray(input.pointer, viewport);
        self.hits = scene.cast(
            &ray,
            self.config.layer_mask,
            self.config.ray_range,
            pool,
            self.drag.as_deref(),
        );
        self.hit = self.hits.first().cloned();
    }

    fn set_focus(&mut self, input: &InputState, pool: &mut EntityPool) {
        if self.drag.is_some() || input.pointer_over_ui {
            return;
        }
        let Some(target) = self.hit.as_ref().and_then(|h| h.entity()).cloned() else {
            return;
        };
        if self.focus.as_deref() == Some(target.as_str()) {
            return;
        }

        if let Some(previous) = self.focus.take() {
            pool.set_outlines(&previous, false);
        }
        if self.outline_enabled {
            pool.set_outlines(&target, true);
        }
        self.focus = Some(target.clone());
        self.events.emit(&CursorEvent::Focused(target));
    }

    fn cancel_focus(&mut self, pool: &mut EntityPool) {
        if let Some(previous) = self.focus.take() {
            pool.set_outlines(&previous, false);
        }
    }

    fn begin_drag(&mut self, pool: &EntityPool) {
        if self.drag.is_some() {
            return;
        }
        let Some(focus) = self.focus.clone() else {
            return;
        };
        let Some(entity) = pool.find_by_id(&focus) else {
            return;
        };
        if !entity.drag_allowed || !entity.active {
            return;
        }

        self.drag = Some(focus.clone());
        self.events.emit(&CursorEvent::DragStarted(focus));
    }

    fn move_drag(&mut self, pool: &mut EntityPool) {
        let Some(drag_id) = self.drag.clone() else {
            return;
        };
        let Some(hit_point) = self.hit.as_ref().map(|h| h.point) else {
            return;
        };

        let position = if self.snapping {
            snap_position(hit_point, self.config.tile_size, self.config.tile_offset)
        } else {
            hit_point
        };

        if let Some(entity) = pool.find_by_id_mut(&drag_id) {
            entity.transform.position = position;
        }
    }

    fn rotate_drag(&mut self, input: &InputState, pool: &mut EntityPool) {
        let Some(drag_id) = self.drag.clone() else {
            return;
        };
        let Some(normal) = self.hit.as_ref().map(|h| h.normal) else {
            return;
        };

        let increment = input.scroll_delta * self.config.rotation_speed;
        if let Some(entity) = pool.find_by_id_mut(&drag_id) {
            let yaw = quantize_yaw(entity.yaw_deg, increment);
            entity.yaw_deg = yaw;
            // Up axis follows the hit surface, yaw spins about it.
            entity.transform.rotation =
                Quat::from_rotation_arc(Vec3::Y, normal) * Quat::from_rotation_y(yaw.to_radians());
        }
    }
}
