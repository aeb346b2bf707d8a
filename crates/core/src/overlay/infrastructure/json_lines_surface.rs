use std::io::Write;

use thiserror::Error;

use crate::overlay::domain::drawing_surface::{CircleShape, DrawableId, DrawingSurface, Easing};
use crate::overlay::infrastructure::recording_surface::{RecordingSurface, SurfaceCommand};
use crate::shared::geometry::Point;

#[derive(Error, Debug)]
pub enum SurfaceWriteError {
    #[error("Failed to write drawing command: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize drawing command: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Streams every drawing command to `writer` as one JSON line, as soon as
/// it is issued.
///
/// Live drawables are tracked by an inner [`RecordingSurface`] whose command
/// log is drained after each call, so memory stays flat on long streams.
/// [`DrawingSurface`] calls cannot fail, so the first write error is kept,
/// later commands are dropped, and [`JsonLinesSurface::finish`] reports it.
pub struct JsonLinesSurface<W: Write> {
    inner: RecordingSurface,
    writer: W,
    written: usize,
    error: Option<SurfaceWriteError>,
}

impl<W: Write> JsonLinesSurface<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: RecordingSurface::new(),
            writer,
            written: 0,
            error: None,
        }
    }

    /// Commands written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn recording(&self) -> &RecordingSurface {
        &self.inner
    }

    /// Flushes the writer and returns the number of commands written, or
    /// the first error hit while streaming.
    pub fn finish(mut self) -> Result<usize, SurfaceWriteError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.written)
    }

    fn drain(&mut self) {
        let commands = self.inner.take_commands();
        if self.error.is_some() {
            return;
        }
        for command in &commands {
            if let Err(e) = self.write_line(command) {
                log::error!("Drawing command stream broken: {e}");
                self.error = Some(e);
                return;
            }
            self.written += 1;
        }
    }

    fn write_line(&mut self, command: &SurfaceCommand) -> Result<(), SurfaceWriteError> {
        serde_json::to_writer(&mut self.writer, command).map_err(|e| {
            if e.is_io() {
                SurfaceWriteError::Io(e.into())
            } else {
                SurfaceWriteError::Serialize(e)
            }
        })?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> DrawingSurface for JsonLinesSurface<W> {
    fn add_drawable(&mut self, shape: &CircleShape, position: Point) -> DrawableId {
        let id = self.inner.add_drawable(shape, position);
        self.drain();
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
        self.inner.animate_drawable_position(drawable, from, to, duration, easing);
        self.drain();
    }

    fn remove_drawable(&mut self, drawable: DrawableId) {
        self.inner.remove_drawable(drawable);
        self.drain();
    }
}
