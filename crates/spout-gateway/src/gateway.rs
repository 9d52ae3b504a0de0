//! [`ResourceGateway`]: cached cross-API views and fence-ordered sends.
//!
//! Hosts typically submit the same render target every frame. Wrapping a
//! resource for the sharing library is expensive, so the gateway keeps the
//! view of the last submitted resource and only re-wraps when the resource
//! identity changes.

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, error, trace};

use crate::backend::{ResourceState, SenderBackend};
use crate::config::{validate_sender_name, SenderConfig, SyncMode};
use crate::fence::{FenceSync, GpuTimeline};
use crate::handle::ResourceHandle;

/// The resource last submitted and the view produced from it.
struct CachedView<V> {
    resource: ResourceHandle,
    view: V,
}

/// Object-safe sender interface, so a host binding can hold a gateway or a
/// [`NoOpSender`](crate::NoOpSender) behind one pointer.
pub trait FrameSender {
    fn set_name(&mut self, name: &str) -> bool;
    fn submit(&mut self, resource: Option<ResourceHandle>) -> bool;
    fn release(&mut self);
    fn close(&mut self);
}

/// Outbound sharing session with a one-entry view cache.
///
/// Not synchronized internally: one submit may be in flight at a time. Only
/// one session per sender name should be open at once; the native library
/// keeps the registration process-wide.
pub struct ResourceGateway<B: SenderBackend> {
    backend: B,
    cache: Option<CachedView<B::View>>,
    fence: Option<FenceSync>,
    name: Option<String>,
    /// A send was attempted since the last release, so the native sender
    /// may be registered.
    sending: bool,
    closed: bool,
}

impl<B: SenderBackend> ResourceGateway<B> {
    /// Wrap an open session. `fence` orders every submit behind the GPU.
    pub fn new(backend: B, fence: Option<FenceSync>) -> Self {
        Self {
            backend,
            cache: None,
            fence,
            name: None,
            sending: false,
            closed: false,
        }
    }

    /// Wrap an open session and apply `config`.
    ///
    /// The fence is only attached when `config.sync` asks for it and the
    /// caller could provide a timeline (i.e. a command queue is known).
    pub fn with_config(
        backend: B,
        config: &SenderConfig,
        timeline: Option<Box<dyn GpuTimeline>>,
    ) -> Result<Self> {
        config.validate()?;

        let fence = match (config.sync, timeline) {
            (SyncMode::Queue, Some(timeline)) => Some(FenceSync::new(timeline, config.wait)),
            (SyncMode::Queue, None) => {
                debug!("no command queue for sender '{}', sending unsynchronized", config.name);
                None
            }
            (SyncMode::None, _) => None,
        };

        let mut gateway = Self::new(backend, fence);
        if !gateway.set_name(&config.name) {
            bail!("sharing library rejected sender name '{}'", config.name);
        }
        Ok(gateway)
    }

    /// Register the sender name. The name is kept only if the backend
    /// accepts it.
    pub fn set_name(&mut self, name: &str) -> bool {
        if let Err(err) = validate_sender_name(name) {
            error!("Invalid sender name: {err}");
            return false;
        }
        if !self.backend.set_outbound_name(name) {
            error!("Unable to set sender name '{name}'");
            return false;
        }
        self.name = Some(name.to_string());
        true
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether a sender name has been accepted since the last release.
    pub fn is_initialized(&self) -> bool {
        self.name.is_some()
    }

    /// Share `resource` as the next frame.
    ///
    /// Returns `false` for a null resource, a closed session, a fence
    /// failure, a failed wrap or a failed send. The reason is logged.
    pub fn submit(&mut self, resource: Option<ResourceHandle>) -> bool {
        match self.try_submit(resource) {
            Ok(()) => true,
            Err(err) => {
                error!("{err:#}");
                false
            }
        }
    }

    /// [`submit`](Self::submit) with the failure reason.
    pub fn try_submit(&mut self, resource: Option<ResourceHandle>) -> Result<()> {
        let Some(resource) = resource else {
            bail!("null resource submitted for sending");
        };
        if self.closed {
            bail!("sender session is closed");
        }

        // Prior GPU work writing the resource must land before the library
        // reads it.
        if let Some(fence) = &mut self.fence {
            fence
                .barrier()
                .context("failed to wait for GPU completion before sending")?;
        }

        let entry = match self.cache.take() {
            Some(entry) if entry.resource == resource => {
                trace!("reusing cached view for {resource:?}");
                entry
            }
            stale => {
                // Release strictly before wrapping the replacement.
                if let Some(stale) = stale {
                    debug!("releasing view for {:?}", stale.resource);
                    drop(stale);
                }
                let view = self
                    .backend
                    .create_view(resource, ResourceState::RenderTarget)
                    .ok_or_else(|| anyhow!("failed to wrap {resource:?} for sending"))?;
                debug!("wrapped {resource:?} for sending");
                CachedView { resource, view }
            }
        };

        self.sending = true;
        let sent = self.backend.send_view(&entry.view);
        self.cache = Some(entry);

        if !sent {
            bail!("sharing library failed to send {resource:?}");
        }
        Ok(())
    }

    /// The resource the cached view belongs to.
    pub fn cached_resource(&self) -> Option<ResourceHandle> {
        self.cache.as_ref().map(|entry| entry.resource)
    }

    pub fn has_cached_view(&self) -> bool {
        self.cache.is_some()
    }

    pub fn fence(&self) -> Option<&FenceSync> {
        self.fence.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Drop the cached view and unregister the sender. The session stays
    /// open; the next submit registers the sender again.
    pub fn release(&mut self) {
        if let Some(entry) = self.cache.take() {
            debug!("releasing view for {:?}", entry.resource);
        }
        if self.sending {
            self.backend.release_sender();
            self.sending = false;
        }
        self.name = None;
    }

    /// Release everything, close the session and drop the fence, in that
    /// order. Safe to call more than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.release();
        self.backend.close_session();
        self.fence = None;
        self.closed = true;
        debug!("sender session closed");
    }
}

impl<B: SenderBackend> FrameSender for ResourceGateway<B> {
    fn set_name(&mut self, name: &str) -> bool {
        ResourceGateway::set_name(self, name)
    }

    fn submit(&mut self, resource: Option<ResourceHandle>) -> bool {
        ResourceGateway::submit(self, resource)
    }

    fn release(&mut self) {
        ResourceGateway::release(self)
    }

    fn close(&mut self) {
        ResourceGateway::close(self)
    }
}

impl<B: SenderBackend> Drop for ResourceGateway<B> {
    fn drop(&mut self) {
        self.close();
    }
}
