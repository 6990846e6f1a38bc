//! Tick source state shared by every node of a graph.

/// Frame counter and elapsed time, advanced once per [`Graph::advance`].
///
/// Tick `0` is the state before the first advance; nodes started by
/// [`Graph::start`] observe it.
///
/// [`Graph::advance`]: crate::Graph::advance
/// [`Graph::start`]: crate::Graph::start
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clock {
    tick: u64,
    delta: f32,
    elapsed: f64,
}

impl Clock {
    /// Number of completed advances.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Seconds elapsed during the most recent advance.
    #[inline]
    pub fn delta_time(&self) -> f32 {
        self.delta
    }

    /// Total seconds accumulated over all advances.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Moves to the next tick. Negative and NaN deltas count as zero.
    pub(crate) fn advance(&mut self, delta: f32) {
        let delta = delta.max(0.0);
        self.tick = self.tick.wrapping_add(1);
        self.delta = delta;
        self.elapsed += f64::from(delta);
    }
}
