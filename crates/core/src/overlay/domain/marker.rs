use crate::detection::domain::face_area::FaceArea;
use crate::overlay::domain::drawing_surface::{CircleShape, DrawableId};
use crate::shared::geometry::Point;

/// An on-screen circle bound to one tracking id.
///
/// `position` is the model value: it jumps to the target as soon as a move
/// is issued, while the surface animates towards it.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    drawable: DrawableId,
    shape: CircleShape,
    position: Point,
    area: FaceArea,
}

impl Marker {
    pub fn new(drawable: DrawableId, shape: CircleShape, area: FaceArea) -> Self {
        Self {
            drawable,
            shape,
            position: area.bounds().center(),
            area,
        }
    }

    pub fn drawable(&self) -> DrawableId {
        self.drawable
    }

    pub fn shape(&self) -> &CircleShape {
        &self.shape
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn area(&self) -> &FaceArea {
        &self.area
    }

    /// Rebinds the marker to this frame's area; returns the previous position.
    pub(crate) fn relocate(&mut self, area: FaceArea) -> Point {
        let from = self.position;
        self.position = area.bounds().center();
        self.area = area;
        from
    }
}
