//! GPU timeline fences and the per-submit barrier built on them.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::trace;

/// A fence on a GPU command queue.
///
/// On D3D12 this is an `ID3D12Fence` plus the queue it is signaled on and a
/// Win32 event used for blocking waits.
pub trait GpuTimeline {
    /// Ask the queue to set the fence to `value` once all previously
    /// submitted work has completed.
    fn signal(&mut self, value: u64) -> Result<()>;

    /// The last value the GPU has reached.
    fn completed_value(&self) -> u64;

    /// Block the calling thread until the fence reaches `value`.
    ///
    /// `None` waits indefinitely. A timeout is reported as an error.
    fn wait_for(&mut self, value: u64, timeout: Option<Duration>) -> Result<()>;
}

/// How long a submit may block on the GPU.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Block until the GPU gets there. GPU completion is assumed eventual.
    #[default]
    Infinite,
    /// Give up and fail the submit after this long.
    Timeout(Duration),
}

impl WaitPolicy {
    pub fn timeout(self) -> Option<Duration> {
        match self {
            WaitPolicy::Infinite => None,
            WaitPolicy::Timeout(duration) => Some(duration),
        }
    }
}

/// Monotonic fence counter plus the timeline it is signaled on.
///
/// Each [`barrier`](Self::barrier) signals the next value and waits for it,
/// so value `N + 1` is never signaled before `N` has been observed complete.
pub struct FenceSync {
    timeline: Box<dyn GpuTimeline>,
    next_value: u64,
    policy: WaitPolicy,
}

impl FenceSync {
    pub fn new(timeline: Box<dyn GpuTimeline>, policy: WaitPolicy) -> Self {
        Self {
            timeline,
            next_value: 1,
            policy,
        }
    }

    /// The value the next barrier will signal.
    pub fn next_value(&self) -> u64 {
        self.next_value
    }

    /// The last value a barrier saw complete (0 before the first barrier).
    pub fn last_completed(&self) -> u64 {
        self.next_value - 1
    }

    pub fn policy(&self) -> WaitPolicy {
        self.policy
    }

    /// Signal the next fence value and block until the GPU reaches it.
    ///
    /// The counter only advances once the value is observed complete. After a
    /// failure the same value is signaled again on the next call.
    pub fn barrier(&mut self) -> Result<u64> {
        let value = self.next_value;

        self.timeline
            .signal(value)
            .with_context(|| format!("failed to signal fence value {value}"))?;

        if self.timeline.completed_value() < value {
            trace!("waiting for fence value {value}");
            self.timeline
                .wait_for(value, self.policy.timeout())
                .with_context(|| format!("failed to wait for fence value {value}"))?;
        }

        self.next_value += 1;
        Ok(value)
    }
}
