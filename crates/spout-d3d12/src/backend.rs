//! [`SpoutDx12`]: one `spoutDX12` session driven through the shim.

use std::ffi::{c_void, CString};
use std::sync::Arc;

use anyhow::{bail, Result};
use spout_gateway::{ReceiverBackend, ResourceHandle, ResourceState, SenderBackend, SenderInfo};
use tracing::{debug, error, warn};
use windows::core::Interface;
use windows::Win32::Graphics::Direct3D11::ID3D11Resource;
use windows::Win32::Graphics::Direct3D12::{ID3D12Device, ID3D12Resource};

use crate::device::Dx12Device;
use crate::library::SpoutLibrary;

/// An open `spoutDX12` instance bound to the host's device.
///
/// The instance can act as a sender, a receiver, or both; the gateways only
/// ever use one side.
pub struct SpoutDx12 {
    library: Arc<SpoutLibrary>,
    instance: *mut c_void,
    device: ID3D12Device,
}

impl SpoutDx12 {
    /// Open a session (`OpenDirectX12`) on `device`.
    pub fn open(library: Arc<SpoutLibrary>, device: &Dx12Device) -> Result<Self> {
        let instance = unsafe { (library.open)(device.as_raw(), device.queue_raw()) };
        if instance.is_null() {
            bail!("failed to open Spout DirectX 12 session");
        }
        debug!("Spout DirectX 12 session opened");

        Ok(Self {
            library,
            instance,
            device: device.device().clone(),
        })
    }

    fn close(&mut self) {
        if self.instance.is_null() {
            return;
        }
        unsafe { (self.library.close)(self.instance) };
        self.instance = std::ptr::null_mut();
        debug!("Spout DirectX 12 session closed");
    }
}

fn c_name(name: &str) -> Option<CString> {
    match CString::new(name) {
        Ok(name) => Some(name),
        Err(_) => {
            error!("sender name contains a NUL byte");
            None
        }
    }
}

impl SenderBackend for SpoutDx12 {
    type View = ID3D11Resource;

    fn set_outbound_name(&mut self, name: &str) -> bool {
        let Some(name) = c_name(name) else {
            return false;
        };
        unsafe { (self.library.set_sender_name)(self.instance, name.as_ptr()) != 0 }
    }

    fn create_view(&mut self, resource: ResourceHandle, state: ResourceState) -> Option<ID3D11Resource> {
        let mut wrapped: *mut c_void = std::ptr::null_mut();
        let ok = unsafe {
            (self.library.wrap_resource)(self.instance, resource.as_raw(), state.d3d12_bits(), &mut wrapped)
        };
        if ok == 0 || wrapped.is_null() {
            warn!("WrapDX12Resource failed for {resource:?}");
            return None;
        }
        // The shim hands over its reference.
        Some(unsafe { ID3D11Resource::from_raw(wrapped) })
    }

    fn send_view(&mut self, view: &ID3D11Resource) -> bool {
        unsafe { (self.library.send_resource)(self.instance, view.as_raw()) != 0 }
    }

    fn release_sender(&mut self) {
        unsafe { (self.library.release_sender)(self.instance) };
    }

    fn close_session(&mut self) {
        self.close();
    }
}

impl ReceiverBackend for SpoutDx12 {
    type Backing = ID3D12Resource;

    fn set_inbound_name(&mut self, name: &str) {
        if let Some(name) = c_name(name) {
            unsafe { (self.library.set_receiver_name)(self.instance, name.as_ptr()) };
        }
    }

    fn receive_into(&mut self, target: Option<&ID3D12Resource>) -> bool {
        let target = target.map_or(std::ptr::null_mut(), |t| t.as_raw());
        unsafe { (self.library.receive_resource)(self.instance, target) != 0 }
    }

    fn is_updated(&self) -> bool {
        unsafe { (self.library.is_updated)(self.instance) != 0 }
    }

    fn sender_info(&self) -> SenderInfo {
        unsafe {
            SenderInfo {
                width: (self.library.sender_width)(self.instance),
                height: (self.library.sender_height)(self.instance),
                dxgi_format: (self.library.sender_format)(self.instance),
            }
        }
    }

    fn create_backing(&mut self, info: &SenderInfo, state: ResourceState) -> Option<ID3D12Resource> {
        let mut texture: *mut c_void = std::ptr::null_mut();
        let ok = unsafe {
            (self.library.create_texture)(
                self.instance,
                self.device.as_raw(),
                info.width,
                info.height,
                state.d3d12_bits(),
                info.dxgi_format,
                &mut texture,
            )
        };
        if ok == 0 || texture.is_null() {
            return None;
        }
        Some(unsafe { ID3D12Resource::from_raw(texture) })
    }

    fn backing_handle(backing: &ID3D12Resource) -> Option<ResourceHandle> {
        ResourceHandle::from_raw(backing.as_raw())
    }

    fn release_receiver(&mut self) {
        unsafe { (self.library.release_receiver)(self.instance) };
    }

    fn close_session(&mut self) {
        self.close();
    }
}

impl Drop for SpoutDx12 {
    fn drop(&mut self) {
        self.close();
    }
}
