use std::collections::{BTreeSet, HashMap};

use crate::detection::domain::face_area::FaceArea;
use crate::overlay::domain::drawing_surface::{CircleShape, DrawingSurface, Easing};
use crate::overlay::domain::marker::Marker;
use crate::shared::color::Rgba;
use crate::shared::constants::MOVE_ANIMATION_DURATION;
use crate::shared::overlay_config::OverlayConfig;

/// Per-frame diff between drawn markers and newly detected faces.
///
/// Each list is sorted by tracking id. The three lists are disjoint and
/// together cover every id that is either drawn or detected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub to_add: Vec<i32>,
    pub to_move: Vec<i32>,
    pub to_remove: Vec<i32>,
}

impl ReconcilePlan {
    pub fn compute(drawn_ids: impl IntoIterator<Item = i32>, areas: &[FaceArea]) -> Self {
        let drawn: BTreeSet<i32> = drawn_ids.into_iter().collect();
        let new: BTreeSet<i32> = areas.iter().map(|a| a.tracking_id()).collect();

        Self {
            to_add: new.difference(&drawn).copied().collect(),
            to_move: drawn.intersection(&new).copied().collect(),
            to_remove: drawn.difference(&new).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_move.is_empty() && self.to_remove.is_empty()
    }
}

/// Keeps one circular marker on screen per tracked face.
///
/// Owns the `tracking_id → Marker` map. Must only be driven from the thread
/// that owns the drawing surface; there is no internal locking.
pub struct OverlayReconciler {
    markers: HashMap<i32, Marker>,
    fill: Rgba,
    move_duration: f64,
}

impl OverlayReconciler {
    pub fn new(fill: Rgba, move_duration: f64) -> Self {
        Self {
            markers: HashMap::new(),
            fill,
            move_duration,
        }
    }

    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(config.marker_color, config.move_duration)
    }

    /// Brings the surface in line with this frame's faces.
    ///
    /// Applies adds, then moves, then removes. When `areas` repeats a
    /// tracking id, the first occurrence wins.
    pub fn reconcile(
        &mut self,
        areas: &[FaceArea],
        surface: &mut dyn DrawingSurface,
    ) -> ReconcilePlan {
        let plan = ReconcilePlan::compute(self.markers.keys().copied(), areas);

        let mut by_id: HashMap<i32, &FaceArea> = HashMap::with_capacity(areas.len());
        for area in areas {
            by_id.entry(area.tracking_id()).or_insert(area);
        }

        for id in &plan.to_add {
            if let Some(area) = by_id.get(id) {
                self.add_marker(**area, surface);
            }
        }
        for id in &plan.to_move {
            if let Some(area) = by_id.get(id) {
                self.move_marker(**area, surface);
            }
        }
        for id in &plan.to_remove {
            self.remove_marker(*id, surface);
        }

        log::debug!(
            "Reconciled {} faces: +{} ~{} -{}",
            by_id.len(),
            plan.to_add.len(),
            plan.to_move.len(),
            plan.to_remove.len()
        );
        plan
    }

    /// Removes every marker from the surface.
    pub fn clear(&mut self, surface: &mut dyn DrawingSurface) {
        let mut ids: Vec<i32> = self.markers.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            self.remove_marker(id, surface);
        }
    }

    pub fn marker(&self, tracking_id: i32) -> Option<&Marker> {
        self.markers.get(&tracking_id)
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    /// Tracking ids with a live marker, ascending.
    pub fn tracking_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.markers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    fn add_marker(&mut self, area: FaceArea, surface: &mut dyn DrawingSurface) {
        let bounds = area.bounds();
        let shape = CircleShape {
            radius: (bounds.max_x() - bounds.min_x()) / 2.0,
            fill: self.fill,
        };
        let drawable = surface.add_drawable(&shape, bounds.center());
        self.markers.insert(area.tracking_id(), Marker::new(drawable, shape, area));
    }

    fn move_marker(&mut self, area: FaceArea, surface: &mut dyn DrawingSurface) {
        let id = area.tracking_id();
        let Some(marker) = self.markers.get_mut(&id) else {
            log::error!("No marker for tracking id {id} scheduled to move");
            return;
        };
        let from = marker.relocate(area);
        surface.animate_drawable_position(
            marker.drawable(),
            from,
            marker.position(),
            self.move_duration,
            Easing::Linear,
        );
    }

    fn remove_marker(&mut self, id: i32, surface: &mut dyn DrawingSurface) {
        match self.markers.remove(&id) {
            Some(marker) => surface.remove_drawable(marker.drawable()),
            None => log::error!("No marker for tracking id {id} scheduled for removal"),
        }
    }
}

impl Default for OverlayReconciler {
    fn default() -> Self {
        Self::new(Rgba::default(), MOVE_ANIMATION_DURATION)
    }
}
