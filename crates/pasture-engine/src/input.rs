//! Held-direction input snapshot.

use std::collections::HashSet;

use pasture_core::external::{Direction, InputState};

/// The set of directions held during one frame.
///
/// Hosts translate device events into presses and releases, then hand the
/// snapshot to [`FrameLoop::frame`](crate::frame_loop::FrameLoop::frame).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: HashSet<Direction>,
}

impl InputSnapshot {
    /// A snapshot with `directions` held.
    pub fn holding(directions: &[Direction]) -> Self {
        Self {
            held: directions.iter().copied().collect(),
        }
    }

    pub fn press(&mut self, direction: Direction) {
        self.held.insert(direction);
    }

    pub fn release(&mut self, direction: Direction) {
        self.held.remove(&direction);
    }

    /// Release everything.
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

impl InputState for InputSnapshot {
    fn is_down(&self, direction: Direction) -> bool {
        self.held.contains(&direction)
    }
}
