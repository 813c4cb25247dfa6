//! Frame scheduler
//!
//! Single-threaded and cooperative. Callbacks repeat every tick until
//! cancelled. Each callback sees the time elapsed since its own previous
//! tick, so a renderer started mid-stream does not receive a delta covering
//! time it was not alive for.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct FrameCallbackId;
}

/// Largest delta handed to a callback unless configured otherwise
pub const DEFAULT_MAX_DELTA_MS: f64 = 250.0;

/// Timing information for one callback invocation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Host timestamp of this frame
    pub timestamp_ms: f64,
    /// Milliseconds since this callback's previous frame (0 on its first)
    pub delta_ms: f64,
    /// How many frames this callback has received before this one
    pub frame: u64,
}

type Callback = Rc<RefCell<dyn FnMut(FrameTime)>>;

struct Registration {
    callback: Callback,
    last_timestamp: Option<f64>,
    frames: u64,
}

struct SchedulerState {
    callbacks: SlotMap<FrameCallbackId, Registration>,
    max_delta_ms: f64,
    ticks: u64,
}

/// Shared frame scheduler.
///
/// Cloning yields another handle to the same scheduler, which is how the
/// controller and the host loop both reach it.
#[derive(Clone)]
pub struct FrameScheduler {
    inner: Rc<RefCell<SchedulerState>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::with_max_delta(DEFAULT_MAX_DELTA_MS)
    }

    pub fn with_max_delta(max_delta_ms: f64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerState {
                callbacks: SlotMap::with_key(),
                max_delta_ms: max_delta_ms.max(0.0),
                ticks: 0,
            })),
        }
    }

    pub fn set_max_delta(&self, max_delta_ms: f64) {
        self.inner.borrow_mut().max_delta_ms = max_delta_ms.max(0.0);
    }

    pub fn max_delta(&self) -> f64 {
        self.inner.borrow().max_delta_ms
    }

    /// Register a repeating frame callback
    pub fn request(&self, callback: impl FnMut(FrameTime) + 'static) -> FrameCallbackId {
        let callback: Callback = Rc::new(RefCell::new(callback));
        let id = self.inner.borrow_mut().callbacks.insert(Registration {
            callback,
            last_timestamp: None,
            frames: 0,
        });
        tracing::trace!(?id, "frame callback registered");
        id
    }

    /// Cancel a callback. Returns false if it was not registered.
    ///
    /// Safe to call from inside a running callback; a cancelled callback is
    /// not invoked again, even later in the same tick.
    pub fn cancel(&self, id: FrameCallbackId) -> bool {
        let removed = self.inner.borrow_mut().callbacks.remove(id).is_some();
        if removed {
            tracing::trace!(?id, "frame callback cancelled");
        }
        removed
    }

    pub fn is_scheduled(&self, id: FrameCallbackId) -> bool {
        self.inner.borrow().callbacks.contains_key(id)
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of ticks processed so far
    pub fn ticks(&self) -> u64 {
        self.inner.borrow().ticks
    }

    /// Run one frame. Returns how many callbacks were invoked.
    pub fn tick(&self, timestamp_ms: f64) -> usize {
        // Snapshot so callbacks may request or cancel while we iterate
        let pending: Vec<(FrameCallbackId, Callback)> = {
            let mut state = self.inner.borrow_mut();
            state.ticks += 1;
            state
                .callbacks
                .iter()
                .map(|(id, reg)| (id, Rc::clone(&reg.callback)))
                .collect()
        };

        let mut invoked = 0;
        for (id, callback) in pending {
            let time = {
                let mut state = self.inner.borrow_mut();
                let max_delta = state.max_delta_ms;
                let Some(reg) = state.callbacks.get_mut(id) else {
                    continue;
                };
                let delta_ms = reg
                    .last_timestamp
                    .map(|last| (timestamp_ms - last).clamp(0.0, max_delta))
                    .unwrap_or(0.0);
                let time = FrameTime {
                    timestamp_ms,
                    delta_ms,
                    frame: reg.frames,
                };
                reg.last_timestamp = Some(timestamp_ms);
                reg.frames += 1;
                time
            };

            // A callback that re-enters tick() is skipped rather than aliased
            let Ok(mut f) = callback.try_borrow_mut() else {
                tracing::warn!(?id, "frame callback re-entered, skipping");
                continue;
            };
            (&mut *f)(time);
            invoked += 1;
        }
        invoked
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("FrameScheduler")
            .field("callbacks", &state.callbacks.len())
            .field("max_delta_ms", &state.max_delta_ms)
            .field("ticks", &state.ticks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(scheduler: &FrameScheduler) -> (FrameCallbackId, Rc<RefCell<Vec<FrameTime>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = scheduler.request(move |t| sink.borrow_mut().push(t));
        (id, seen)
    }

    #[test]
    fn test_first_tick_has_zero_delta() {
        let scheduler = FrameScheduler::new();
        let (_, seen) = recorder(&scheduler);

        scheduler.tick(1000.0);
        scheduler.tick(1016.0);

        let seen = seen.borrow();
        assert_eq!(seen[0].delta_ms, 0.0);
        assert_eq!(seen[0].frame, 0);
        assert_eq!(seen[1].delta_ms, 16.0);
        assert_eq!(seen[1].frame, 1);
    }

    #[test]
    fn test_delta_is_clamped() {
        let scheduler = FrameScheduler::with_max_delta(100.0);
        let (_, seen) = recorder(&scheduler);

        scheduler.tick(0.0);
        scheduler.tick(5000.0);
        scheduler.tick(4000.0);

        let deltas: Vec<f64> = seen.borrow().iter().map(|t| t.delta_ms).collect();
        assert_eq!(deltas, vec![0.0, 100.0, 0.0]);
    }

    #[test]
    fn test_late_registration_gets_own_delta() {
        let scheduler = FrameScheduler::new();
        let (_, early) = recorder(&scheduler);
        scheduler.tick(0.0);
        scheduler.tick(16.0);

        let (_, late) = recorder(&scheduler);
        scheduler.tick(32.0);

        assert_eq!(early.borrow()[2].delta_ms, 16.0);
        assert_eq!(late.borrow()[0].delta_ms, 0.0);
    }

    #[test]
    fn test_cancel_stops_callbacks() {
        let scheduler = FrameScheduler::new();
        let (id, seen) = recorder(&scheduler);

        scheduler.tick(0.0);
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(!scheduler.is_scheduled(id));
        assert_eq!(scheduler.tick(16.0), 0);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_cancel_from_earlier_callback_in_same_tick() {
        let scheduler = FrameScheduler::new();
        let victim: Rc<RefCell<Option<FrameCallbackId>>> = Rc::new(RefCell::new(None));

        let handle = scheduler.clone();
        let target = Rc::clone(&victim);
        scheduler.request(move |_| {
            if let Some(id) = target.borrow_mut().take() {
                handle.cancel(id);
            }
        });
        let (id, seen) = recorder(&scheduler);
        *victim.borrow_mut() = Some(id);

        assert_eq!(scheduler.tick(0.0), 1);
        assert!(seen.borrow().is_empty());
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_cancel_releases_captured_state() {
        let scheduler = FrameScheduler::new();
        let state = Rc::new(RefCell::new(0u32));
        let captured = Rc::clone(&state);
        let id = scheduler.request(move |_| *captured.borrow_mut() += 1);

        scheduler.tick(0.0);
        assert_eq!(Rc::strong_count(&state), 2);

        scheduler.cancel(id);
        assert_eq!(Rc::strong_count(&state), 1);
        assert_eq!(*state.borrow(), 1);
    }
}
