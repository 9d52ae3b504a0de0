//! Backend selection with a no-op fallback.

use std::ffi::c_void;

use spout_gateway::{FrameReceiver, FrameSender, NoOpReceiver, NoOpSender, ReceiverConfig, SenderConfig};
#[cfg(not(target_os = "windows"))]
use tracing::debug;
#[cfg(target_os = "windows")]
use tracing::warn;

/// Open a sender on the host's D3D12 device, or a [`NoOpSender`] carrying
/// `config.name` when that is not possible.
///
/// # Safety
/// `device` and `queue` must be null or live `ID3D12Device*` /
/// `ID3D12CommandQueue*` pointers.
pub unsafe fn create_sender(
    device: *mut c_void,
    queue: *mut c_void,
    config: &SenderConfig,
) -> Box<dyn FrameSender> {
    #[cfg(target_os = "windows")]
    {
        match spout_d3d12::Dx12Device::from_raw(device, queue) {
            Some(device) => match spout_d3d12::open_sender(&device, config) {
                Ok(gateway) => return Box::new(gateway),
                Err(err) => warn!("falling back to no-op sender: {err:#}"),
            },
            None => warn!("no D3D12 device, falling back to no-op sender"),
        }
    }
    #[cfg(not(target_os = "windows"))]
    {
        let _ = (device, queue);
        debug!("Spout is only available on Windows, using no-op sender");
    }

    let mut sender = NoOpSender::new();
    sender.set_name(&config.name);
    Box::new(sender)
}

/// Open a receiver on the host's D3D12 device, or a [`NoOpReceiver`].
///
/// # Safety
/// `device` must be null or a live `ID3D12Device*`.
pub unsafe fn create_receiver(device: *mut c_void, config: &ReceiverConfig) -> Box<dyn FrameReceiver> {
    #[cfg(target_os = "windows")]
    {
        match spout_d3d12::Dx12Device::from_raw(device, std::ptr::null_mut()) {
            Some(device) => match spout_d3d12::open_receiver(&device, config) {
                Ok(gateway) => return Box::new(gateway),
                Err(err) => warn!("falling back to no-op receiver: {err:#}"),
            },
            None => warn!("no D3D12 device, falling back to no-op receiver"),
        }
    }
    #[cfg(not(target_os = "windows"))]
    {
        let _ = (device, config);
        debug!("Spout is only available on Windows, using no-op receiver");
    }

    Box::new(NoOpReceiver::new())
}
