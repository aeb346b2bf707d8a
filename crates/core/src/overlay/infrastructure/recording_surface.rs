use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::overlay::domain::drawing_surface::{CircleShape, DrawableId, DrawingSurface, Easing};
use crate::shared::color::Rgba;
use crate::shared::geometry::Point;

/// One call made against a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SurfaceCommand {
    Add {
        id: DrawableId,
        radius: f64,
        fill: Rgba,
        position: Point,
    },
    Animate {
        id: DrawableId,
        from: Point,
        to: Point,
        duration: f64,
        easing: Easing,
    },
    Remove {
        id: DrawableId,
    },
}

/// Last animation issued for a drawable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animation {
    pub from: Point,
    pub to: Point,
    pub duration: f64,
    pub easing: Easing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LiveDrawable {
    pub shape: CircleShape,
    pub position: Point,
    pub animation: Option<Animation>,
}

/// Headless surface that keeps the drawable tree in memory and logs every
/// call. Stands in for a real renderer in tests and in the CLI.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_id: u64,
    live: BTreeMap<DrawableId, LiveDrawable>,
    commands: Vec<SurfaceCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Returns and clears the recorded commands, keeping the live drawables.
    pub fn take_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn drawable(&self, id: DrawableId) -> Option<&LiveDrawable> {
        self.live.get(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl DrawingSurface for RecordingSurface {
    fn add_drawable(&mut self, shape: &CircleShape, position: Point) -> DrawableId {
        let id = DrawableId(self.next_id);
        self.next_id += 1;
        self.live.insert(
            id,
            LiveDrawable {
                shape: *shape,
                position,
                animation: None,
            },
        );
        self.commands.push(SurfaceCommand::Add {
            id,
            radius: shape.radius,
            fill: shape.fill,
            position,
        });
        id
    }

    fn animate_drawable_position(
        &mut self,
        drawable: DrawableId,
        from: Point,
        to: Point,
        duration: f64,
        easing: Easing,
    ) {
        match self.live.get_mut(&drawable) {
            Some(live) => {
                live.position = to;
                live.animation = Some(Animation {
                    from,
                    to,
                    duration,
                    easing,
                });
            }
            None => log::warn!("Animating unknown drawable {}", drawable.0),
        }
        self.commands.push(SurfaceCommand::Animate {
            id: drawable,
            from,
            to,
            duration,
            easing,
        });
    }

    fn remove_drawable(&mut self, drawable: DrawableId) {
        if self.live.remove(&drawable).is_none() {
            log::warn!("Removing unknown drawable {}", drawable.0);
        }
        self.commands.push(SurfaceCommand::Remove { id: drawable });
    }
}
