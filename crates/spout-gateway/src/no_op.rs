//! Fallbacks used when no sharing backend can be opened.

use tracing::trace;

use crate::backend::SenderInfo;
use crate::config::validate_sender_name;
use crate::gateway::FrameSender;
use crate::handle::ResourceHandle;
use crate::receiver::{FrameReceiver, Received};

/// Accepts a name and drops every frame.
#[derive(Debug, Default)]
pub struct NoOpSender {
    name: Option<String>,
}

impl NoOpSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl FrameSender for NoOpSender {
    fn set_name(&mut self, name: &str) -> bool {
        if validate_sender_name(name).is_err() {
            return false;
        }
        self.name = Some(name.to_string());
        true
    }

    /// Nothing is ever sent, so this always reports `false`.
    fn submit(&mut self, resource: Option<ResourceHandle>) -> bool {
        trace!("no-op sender dropped {resource:?}");
        false
    }

    fn release(&mut self) {
        self.name = None;
    }

    fn close(&mut self) {
        self.release();
    }
}

/// Never connects to a sender.
#[derive(Debug, Default)]
pub struct NoOpReceiver;

impl NoOpReceiver {
    pub fn new() -> Self {
        Self
    }
}

impl FrameReceiver for NoOpReceiver {
    fn set_sender_name(&mut self, name: &str) -> bool {
        validate_sender_name(name).is_ok()
    }

    fn receive(&mut self) -> Received {
        Received::NoFrame
    }

    fn sender_info(&self) -> Option<SenderInfo> {
        None
    }

    fn texture(&self) -> Option<ResourceHandle> {
        None
    }

    fn release(&mut self) {}

    fn close(&mut self) {}
}
