//! [`ReceiveGateway`]: keeps a receiving texture matched to the sender.

use anyhow::{anyhow, bail, Result};
use tracing::{debug, error, warn};

use crate::backend::{ReceiverBackend, ResourceState, SenderInfo};
use crate::config::{validate_sender_name, ReceiverConfig};
use crate::format::TextureFormat;
use crate::handle::ResourceHandle;

/// Outcome of one [`ReceiveGateway::receive`] poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Received {
    /// No sender, or no receiving texture yet.
    NoFrame,
    /// The receiving texture holds the sender's latest frame.
    Frame,
    /// The sender changed size or format. A new receiving texture was
    /// created; it is filled from the next poll on.
    Resized(SenderInfo),
}

/// Object-safe receiver interface, the counterpart of
/// [`FrameSender`](crate::FrameSender).
pub trait FrameReceiver {
    fn set_sender_name(&mut self, name: &str) -> bool;
    fn receive(&mut self) -> Received;
    fn sender_info(&self) -> Option<SenderInfo>;
    /// The receiving texture hosts should sample from.
    fn texture(&self) -> Option<ResourceHandle>;
    fn release(&mut self);
    fn close(&mut self);
}

/// Inbound sharing session owning one receiving texture.
pub struct ReceiveGateway<B: ReceiverBackend> {
    backend: B,
    backing: Option<B::Backing>,
    info: Option<SenderInfo>,
    /// A receive was attempted since the last release.
    receiving: bool,
    connected: bool,
    closed: bool,
}

impl<B: ReceiverBackend> ReceiveGateway<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            backing: None,
            info: None,
            receiving: false,
            connected: false,
            closed: false,
        }
    }

    pub fn with_config(backend: B, config: &ReceiverConfig) -> Result<Self> {
        config.validate()?;
        let mut gateway = Self::new(backend);
        if let Some(name) = &config.sender_name {
            gateway.set_sender_name(name);
        }
        Ok(gateway)
    }

    /// Follow a named sender. Invalid names are logged and ignored, so the
    /// previous choice stays in effect. Only a [`ReceiverConfig`] without a
    /// name follows the active sender.
    pub fn set_sender_name(&mut self, name: &str) -> bool {
        if let Err(err) = validate_sender_name(name) {
            error!("Invalid sender name to receive from: {err}");
            return false;
        }
        self.backend.set_inbound_name(name);
        true
    }

    /// Poll the sender, logging any failure as [`Received::NoFrame`].
    pub fn receive(&mut self) -> Received {
        match self.try_receive() {
            Ok(received) => received,
            Err(err) => {
                error!("{err:#}");
                Received::NoFrame
            }
        }
    }

    pub fn try_receive(&mut self) -> Result<Received> {
        if self.closed {
            bail!("receiver session is closed");
        }

        self.receiving = true;
        if !self.backend.receive_into(self.backing.as_ref()) {
            if self.connected {
                debug!("sender lost");
                self.connected = false;
            }
            return Ok(Received::NoFrame);
        }
        if !self.connected {
            debug!("connected to sender");
            self.connected = true;
        }

        if !self.backend.is_updated() {
            return Ok(if self.backing.is_some() {
                Received::Frame
            } else {
                Received::NoFrame
            });
        }

        let info = self.backend.sender_info();
        self.backing = None;
        self.info = None;

        if info.is_empty() {
            bail!("sender reported an empty {}x{} texture", info.width, info.height);
        }
        if info.format().is_none() {
            warn!("Unsupported DXGI format {:#x} from sender", info.dxgi_format);
        }

        let backing = self
            .backend
            .create_backing(&info, ResourceState::CopyDest)
            .ok_or_else(|| {
                anyhow!("failed to create {}x{} receiving texture", info.width, info.height)
            })?;
        debug!(
            "receiving texture recreated at {}x{} (format {:#x})",
            info.width, info.height, info.dxgi_format
        );

        self.backing = Some(backing);
        self.info = Some(info);
        Ok(Received::Resized(info))
    }

    pub fn sender_info(&self) -> Option<SenderInfo> {
        self.info
    }

    pub fn width(&self) -> u32 {
        self.info.map_or(0, |info| info.width)
    }

    pub fn height(&self) -> u32 {
        self.info.map_or(0, |info| info.height)
    }

    /// The format hosts should view the receiving texture as. Typeless
    /// senders resolve to their UNORM variant.
    pub fn format(&self) -> Option<TextureFormat> {
        self.info
            .and_then(|info| info.format())
            .map(TextureFormat::resolve_typeless)
    }

    pub fn texture(&self) -> Option<ResourceHandle> {
        self.backing.as_ref().and_then(B::backing_handle)
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Drop the receiving texture and disconnect. The session stays open.
    pub fn release(&mut self) {
        self.backing = None;
        self.info = None;
        self.connected = false;
        if self.receiving {
            self.backend.release_receiver();
            self.receiving = false;
        }
    }

    /// Release, then close the session. Safe to call more than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.release();
        self.backend.close_session();
        self.closed = true;
        debug!("receiver session closed");
    }
}

impl<B: ReceiverBackend> FrameReceiver for ReceiveGateway<B> {
    fn set_sender_name(&mut self, name: &str) -> bool {
        ReceiveGateway::set_sender_name(self, name)
    }

    fn receive(&mut self) -> Received {
        ReceiveGateway::receive(self)
    }

    fn sender_info(&self) -> Option<SenderInfo> {
        ReceiveGateway::sender_info(self)
    }

    fn texture(&self) -> Option<ResourceHandle> {
        ReceiveGateway::texture(self)
    }

    fn release(&mut self) {
        ReceiveGateway::release(self)
    }

    fn close(&mut self) {
        ReceiveGateway::close(self)
    }
}

impl<B: ReceiverBackend> Drop for ReceiveGateway<B> {
    fn drop(&mut self) {
        self.close();
    }
}
