//! Borrowed host D3D12 device and queue.

use std::ffi::c_void;

use windows::core::Interface;
use windows::Win32::Graphics::Direct3D12::{ID3D12CommandQueue, ID3D12Device};

/// The host's D3D12 device, plus the queue its frames are rendered on.
///
/// Both interfaces are AddRef'd copies; the host keeps ownership of its own
/// references.
#[derive(Clone)]
pub struct Dx12Device {
    device: ID3D12Device,
    queue: Option<ID3D12CommandQueue>,
}

impl Dx12Device {
    /// Wrap raw `ID3D12Device*` / `ID3D12CommandQueue*` pointers handed over
    /// by a host. `queue` may be null. Returns `None` for a null device.
    ///
    /// # Safety
    /// Non-null pointers must be live COM interfaces of the stated types.
    pub unsafe fn from_raw(device: *mut c_void, queue: *mut c_void) -> Option<Self> {
        let device = ID3D12Device::from_raw_borrowed(&device)?.clone();
        let queue = ID3D12CommandQueue::from_raw_borrowed(&queue).cloned();
        Some(Self { device, queue })
    }

    pub fn device(&self) -> &ID3D12Device {
        &self.device
    }

    pub fn queue(&self) -> Option<&ID3D12CommandQueue> {
        self.queue.as_ref()
    }

    pub fn as_raw(&self) -> *mut c_void {
        self.device.as_raw()
    }

    pub fn queue_raw(&self) -> *mut c_void {
        self.queue
            .as_ref()
            .map_or(std::ptr::null_mut(), |queue| queue.as_raw())
    }
}
