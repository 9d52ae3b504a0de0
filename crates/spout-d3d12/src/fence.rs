//! [`GpuTimeline`] over an `ID3D12Fence` signalled on the host's queue.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use spout_gateway::GpuTimeline;
use windows::Win32::Foundation::{CloseHandle, HANDLE, WAIT_OBJECT_0, WAIT_TIMEOUT};
use windows::Win32::Graphics::Direct3D12::{
    ID3D12CommandQueue, ID3D12Device, ID3D12Fence, D3D12_FENCE_FLAG_NONE,
};
use windows::Win32::System::Threading::{CreateEventW, WaitForSingleObject, INFINITE};

pub struct QueueFence {
    fence: ID3D12Fence,
    event: HANDLE,
    queue: ID3D12CommandQueue,
}

impl QueueFence {
    pub fn new(device: &ID3D12Device, queue: ID3D12CommandQueue) -> Result<Self> {
        let fence: ID3D12Fence = unsafe { device.CreateFence(0, D3D12_FENCE_FLAG_NONE) }
            .context("CreateFence failed")?;
        let event = unsafe { CreateEventW(None, false, false, None) }
            .context("CreateEventW failed")?;

        Ok(Self {
            fence,
            event,
            queue,
        })
    }
}

impl GpuTimeline for QueueFence {
    fn signal(&mut self, value: u64) -> Result<()> {
        unsafe { self.queue.Signal(&self.fence, value) }.context("queue Signal failed")
    }

    fn completed_value(&self) -> u64 {
        unsafe { self.fence.GetCompletedValue() }
    }

    fn wait_for(&mut self, value: u64, timeout: Option<Duration>) -> Result<()> {
        unsafe { self.fence.SetEventOnCompletion(value, self.event) }
            .context("SetEventOnCompletion failed")?;

        let millis = timeout.map_or(INFINITE, |t| t.as_millis().min(u32::MAX as u128 - 1) as u32);
        let result = unsafe { WaitForSingleObject(self.event, millis) };
        if result == WAIT_OBJECT_0 {
            Ok(())
        } else if result == WAIT_TIMEOUT {
            bail!("fence value {value} not reached within {millis} ms")
        } else {
            bail!("WaitForSingleObject returned {:#x}", result.0)
        }
    }
}

impl Drop for QueueFence {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.event);
        }
    }
}
