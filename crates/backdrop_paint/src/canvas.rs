//! Canvas backends
//!
//! A [`Canvas`] receives the commands recorded for one frame and composites
//! them over whatever it already shows. Nothing is cleared implicitly, so
//! renderers that want fading trails simply paint a translucent rect first.

use std::cell::RefCell;
use std::rc::Rc;

use crate::context::PaintCommand;

/// A 2D drawing surface that accepts one frame of paint commands at a time
pub trait Canvas {
    /// Composite a frame's commands over the current content
    fn submit(&mut self, commands: Vec<PaintCommand>);
}

#[derive(Debug, Default)]
struct Recording {
    frame_sizes: Vec<usize>,
    last_frame: Vec<PaintCommand>,
}

/// Headless canvas that keeps per-frame command counts and the last frame.
///
/// Clones share the same recording, so a caller can keep one clone while a
/// renderer owns another.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames submitted so far
    pub fn frame_count(&self) -> usize {
        self.inner.borrow().frame_sizes.len()
    }

    /// Command count of every submitted frame, in order
    pub fn frame_sizes(&self) -> Vec<usize> {
        self.inner.borrow().frame_sizes.clone()
    }

    /// Commands of the most recent frame
    pub fn last_frame(&self) -> Vec<PaintCommand> {
        self.inner.borrow().last_frame.clone()
    }

    /// Total commands across all frames
    pub fn total_commands(&self) -> usize {
        self.inner.borrow().frame_sizes.iter().sum()
    }

    /// Number of live clones sharing this recording (including `self`)
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    pub fn clear(&self) {
        let mut rec = self.inner.borrow_mut();
        rec.frame_sizes.clear();
        rec.last_frame.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn submit(&mut self, commands: Vec<PaintCommand>) {
        tracing::trace!(commands = commands.len(), "recording canvas frame");
        let mut rec = self.inner.borrow_mut();
        rec.frame_sizes.push(commands.len());
        rec.last_frame = commands;
    }
}
