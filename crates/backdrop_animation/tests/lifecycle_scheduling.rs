//! Integration tests for the lifecycle state machine driving frame callbacks
//!
//! A renderer handle schedules its frame callback on Start and cancels it on
//! Stop. These tests walk that protocol against a real scheduler.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use backdrop_animation::{FrameCallbackId, FrameScheduler};
use backdrop_core::{Lifecycle, LifecycleEvent, LifecycleState};

struct Handle {
    lifecycle: Lifecycle,
    frame: Option<FrameCallbackId>,
    frames: Rc<Cell<u32>>,
}

impl Handle {
    fn new() -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            frame: None,
            frames: Rc::new(Cell::new(0)),
        }
    }

    fn start(&mut self, scheduler: &FrameScheduler) {
        self.lifecycle.send(LifecycleEvent::Start).unwrap();
        let frames = Rc::clone(&self.frames);
        self.frame = Some(scheduler.request(move |_| frames.set(frames.get() + 1)));
    }

    fn stop(&mut self, scheduler: &FrameScheduler) {
        if let Some(id) = self.frame.take() {
            scheduler.cancel(id);
        }
        self.lifecycle.send(LifecycleEvent::Stop).unwrap();
    }
}

#[test]
fn test_switching_handles_keeps_one_callback() {
    let scheduler = FrameScheduler::new();
    let mut first = Handle::new();
    first.start(&scheduler);
    scheduler.tick(0.0);
    scheduler.tick(16.0);

    first.stop(&scheduler);
    let mut second = Handle::new();
    second.start(&scheduler);
    assert_eq!(scheduler.len(), 1);

    scheduler.tick(32.0);
    assert_eq!(first.frames.get(), 2);
    assert_eq!(second.frames.get(), 1);
    assert_eq!(first.lifecycle.current(), LifecycleState::Stopped);
    assert_eq!(Rc::strong_count(&first.frames), 1);
}

#[test]
fn test_stop_from_inside_frame() {
    let scheduler = FrameScheduler::new();
    let slot: Rc<RefCell<Option<FrameCallbackId>>> = Rc::new(RefCell::new(None));

    let handle = scheduler.clone();
    let own = Rc::clone(&slot);
    let id = scheduler.request(move |time| {
        if time.frame == 1 {
            if let Some(id) = own.borrow_mut().take() {
                handle.cancel(id);
            }
        }
    });
    *slot.borrow_mut() = Some(id);

    assert_eq!(scheduler.tick(0.0), 1);
    assert_eq!(scheduler.tick(16.0), 1);
    assert_eq!(scheduler.tick(32.0), 0);
    assert!(scheduler.is_empty());
}
