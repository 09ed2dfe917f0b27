use std::collections::BTreeMap;

use crate::foundation::ids::LayerId;

/// Cancel handle for one requested tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickHandle(pub u64);

/// "Call me on the next frame" capability.
///
/// A browser-style frame clock, a test virtual clock and a fixed-step export renderer all fit
/// behind this trait. Each layer keeps at most one outstanding request.
pub trait FrameScheduler {
    /// Request a tick for `layer` on the next frame.
    fn request_tick(&mut self, layer: &LayerId) -> TickHandle;

    /// Drop a pending request. Unknown or already-fired handles are ignored.
    fn cancel_tick(&mut self, handle: TickHandle);

    /// Requests due on the current frame, in request order. Each is returned once.
    fn take_due(&mut self) -> Vec<(TickHandle, LayerId)>;
}

/// Fires every pending request on the next frame.
///
/// Determinism rule: due ticks are returned in ascending handle order, i.e. request order.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next: u64,
    pending: BTreeMap<TickHandle, LayerId>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: TickHandle) -> bool {
        self.pending.contains_key(&handle)
    }
}

impl FrameScheduler for FrameQueue {
    fn request_tick(&mut self, layer: &LayerId) -> TickHandle {
        let handle = TickHandle(self.next);
        self.next = self.next.wrapping_add(1);
        self.pending.insert(handle, layer.clone());
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        self.pending.remove(&handle);
    }

    fn take_due(&mut self) -> Vec<(TickHandle, LayerId)> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }
}

/// Deterministic fixed-step time base for tests and offline rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VirtualClock {
    start_ms: f64,
    step_ms: f64,
    frames: u64,
}

impl VirtualClock {
    pub fn new(start_ms: f64, step_ms: f64) -> Self {
        Self {
            start_ms,
            step_ms,
            frames: 0,
        }
    }

    /// Clock stepping one frame at `fps` (clamped to at least 1).
    pub fn from_fps(fps: f64) -> Self {
        Self::new(0.0, 1000.0 / fps.max(1.0))
    }

    pub fn now_ms(&self) -> f64 {
        self.start_ms + self.step_ms * self.frames as f64
    }

    /// Step one frame and return the new time.
    pub fn advance(&mut self) -> f64 {
        self.frames += 1;
        self.now_ms()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playout/scheduler.rs"]
mod tests;
