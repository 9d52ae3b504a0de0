//! Open gateways over a host's D3D12 device.

use anyhow::{Context, Result};
use spout_gateway::{GpuTimeline, ReceiveGateway, ReceiverConfig, ResourceGateway, SenderConfig};

use crate::backend::SpoutDx12;
use crate::device::Dx12Device;
use crate::fence::QueueFence;
use crate::library::SpoutLibrary;

/// Open a sender session named by `config`.
///
/// With [`SyncMode::Queue`](spout_gateway::SyncMode::Queue) and a known
/// command queue, every submit waits on a fence signalled on that queue. If
/// that fence cannot be created the sender is not opened.
pub fn open_sender(device: &Dx12Device, config: &SenderConfig) -> Result<ResourceGateway<SpoutDx12>> {
    config.validate()?;

    let timeline = config
        .sync
        .timeline(device.queue().map(|queue| {
            move || -> Result<Box<dyn GpuTimeline>> {
                Ok(Box::new(QueueFence::new(device.device(), queue.clone())?))
            }
        }))
        .context("failed to create sender fence")?;

    let library = SpoutLibrary::shared()?;
    let backend = SpoutDx12::open(library, device)?;

    ResourceGateway::with_config(backend, config, timeline)
        .with_context(|| format!("failed to open sender '{}'", config.name))
}

/// Open a receiver session following `config.sender_name`, or the active
/// sender when unset.
pub fn open_receiver(device: &Dx12Device, config: &ReceiverConfig) -> Result<ReceiveGateway<SpoutDx12>> {
    let library = SpoutLibrary::shared()?;
    let backend = SpoutDx12::open(library, device)?;
    ReceiveGateway::with_config(backend, config).context("failed to open receiver")
}
