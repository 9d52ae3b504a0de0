//! Session configuration.

use std::time::Duration;

use anyhow::{bail, Result};

use crate::fence::{GpuTimeline, WaitPolicy};

/// Spout's `SpoutMaxSenderNameLen`, including the terminating NUL.
pub const MAX_SENDER_NAME_LEN: usize = 256;

/// Whether sends are ordered behind a GPU queue fence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Send immediately. Only safe when the host has already waited for the
    /// frame's GPU work.
    None,
    /// Signal and wait on a fence on the host's command queue before each
    /// send. Needs a queue; without one the sender falls back to `None`.
    #[default]
    Queue,
}

impl SyncMode {
    /// Build the fence timeline this mode asks for.
    ///
    /// `queue_timeline` is `None` when the host has no command queue; the
    /// sender then runs unsynchronized. A timeline that fails to build is an
    /// error, never a silent downgrade to unordered sends.
    pub fn timeline<F>(self, queue_timeline: Option<F>) -> Result<Option<Box<dyn GpuTimeline>>>
    where
        F: FnOnce() -> Result<Box<dyn GpuTimeline>>,
    {
        match (self, queue_timeline) {
            (SyncMode::Queue, Some(make)) => make().map(Some),
            _ => Ok(None),
        }
    }
}

/// Outbound session options.
#[derive(Clone, Debug)]
pub struct SenderConfig {
    pub name: String,
    pub sync: SyncMode,
    pub wait: WaitPolicy,
}

impl SenderConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sync: SyncMode::default(),
            wait: WaitPolicy::default(),
        }
    }

    pub fn with_sync(mut self, sync: SyncMode) -> Self {
        self.sync = sync;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.wait = WaitPolicy::Timeout(timeout);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_sender_name(&self.name)
    }
}

/// Inbound session options.
#[derive(Clone, Debug, Default)]
pub struct ReceiverConfig {
    /// Sender to connect to. `None` follows the active sender.
    pub sender_name: Option<String>,
}

impl ReceiverConfig {
    pub fn validate(&self) -> Result<()> {
        match &self.sender_name {
            Some(name) => validate_sender_name(name),
            None => Ok(()),
        }
    }
}

/// Check a sender name against what the native library can store.
pub fn validate_sender_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("sender name is empty");
    }
    if name.len() >= MAX_SENDER_NAME_LEN {
        bail!(
            "sender name is {} bytes, limit is {}",
            name.len(),
            MAX_SENDER_NAME_LEN - 1
        );
    }
    if name.contains('\0') {
        bail!("sender name contains a NUL byte");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Log, MockTimeline};
    use std::cell::Cell;

    type MakeTimeline = fn() -> Result<Box<dyn GpuTimeline>>;

    #[test]
    fn defaults_wait_on_queue_forever() {
        let config = SenderConfig::new("Main");
        assert_eq!(config.sync, SyncMode::Queue);
        assert_eq!(config.wait, WaitPolicy::Infinite);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides() {
        let config = SenderConfig::new("Main")
            .with_sync(SyncMode::None)
            .with_timeout(Duration::from_millis(50));
        assert_eq!(config.sync, SyncMode::None);
        assert_eq!(config.wait, WaitPolicy::Timeout(Duration::from_millis(50)));
    }

    #[test]
    fn name_limits() {
        assert!(validate_sender_name("").is_err());
        assert!(validate_sender_name("a\0b").is_err());
        assert!(validate_sender_name(&"x".repeat(255)).is_ok());
        assert!(validate_sender_name(&"x".repeat(256)).is_err());
    }

    #[test]
    fn receiver_without_name_is_valid() {
        assert!(ReceiverConfig::default().validate().is_ok());
        let config = ReceiverConfig {
            sender_name: Some(String::new()),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn queue_sync_builds_the_timeline() {
        let log = Log::new();
        let timeline = SyncMode::Queue
            .timeline(Some(|| -> Result<Box<dyn GpuTimeline>> {
                Ok(Box::new(MockTimeline::new(&log)))
            }))
            .unwrap();
        assert!(timeline.is_some());
    }

    #[test]
    fn failed_fence_creation_is_an_error() {
        let result = SyncMode::Queue.timeline(Some(|| -> Result<Box<dyn GpuTimeline>> {
            bail!("CreateFence failed")
        }));
        assert!(result.is_err());
    }

    #[test]
    fn missing_queue_sends_unsynchronized() {
        assert!(SyncMode::Queue.timeline(None::<MakeTimeline>).unwrap().is_none());
    }

    #[test]
    fn no_sync_never_creates_a_fence() {
        let called = Cell::new(false);
        let timeline = SyncMode::None
            .timeline(Some(|| -> Result<Box<dyn GpuTimeline>> {
                called.set(true);
                bail!("unused")
            }))
            .unwrap();
        assert!(timeline.is_none());
        assert!(!called.get());
    }
}
