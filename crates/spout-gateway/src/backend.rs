//! Seams to the native sharing library.
//!
//! A backend is one open sharing session bound to a GPU device. Opening the
//! session happens when the backend is constructed; [`close_session`] tears
//! it down and must be safe to call more than once.
//!
//! [`close_session`]: SenderBackend::close_session

use crate::format::TextureFormat;
use crate::handle::ResourceHandle;

/// Resource state a cross-API view or receiving texture is created in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceState {
    Common,
    /// The state a render target is left in after the host's frame.
    RenderTarget,
    /// The state a receiving texture needs for the library's copy.
    CopyDest,
}

impl ResourceState {
    /// The matching `D3D12_RESOURCE_STATES` bits.
    pub const fn d3d12_bits(self) -> i32 {
        match self {
            ResourceState::Common => 0,
            ResourceState::RenderTarget => 0x4,
            ResourceState::CopyDest => 0x400,
        }
    }
}

/// What the active sender advertises.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SenderInfo {
    pub width: u32,
    pub height: u32,
    /// Raw `DXGI_FORMAT` value.
    pub dxgi_format: u32,
}

impl SenderInfo {
    pub fn format(&self) -> Option<TextureFormat> {
        TextureFormat::from_dxgi(self.dxgi_format)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Outbound half of a sharing session.
pub trait SenderBackend {
    /// Cross-API view of a submitted resource. Dropping the view releases it.
    type View;

    /// Register the name receivers will look the sender up by.
    fn set_outbound_name(&mut self, name: &str) -> bool;

    /// Wrap `resource` for the sharing library. Expensive; the gateway calls
    /// this once per distinct resource.
    fn create_view(&mut self, resource: ResourceHandle, state: ResourceState) -> Option<Self::View>;

    /// Publish the contents of `view` as the next frame.
    fn send_view(&mut self, view: &Self::View) -> bool;

    /// Unregister the sender. The session stays open.
    fn release_sender(&mut self);

    fn close_session(&mut self);
}

/// Inbound half of a sharing session.
pub trait ReceiverBackend {
    /// A receiving texture owned by the caller. Dropping it releases it.
    type Backing;

    /// Connect to a named sender. An empty name means "the active sender".
    fn set_inbound_name(&mut self, name: &str);

    /// Copy the sender's latest frame into `target`.
    ///
    /// Returns `false` when no sender is available. When it returns `true`
    /// with [`is_updated`](Self::is_updated) set, `target` is stale and must
    /// be recreated from [`sender_info`](Self::sender_info).
    fn receive_into(&mut self, target: Option<&Self::Backing>) -> bool;

    fn is_updated(&self) -> bool;

    fn sender_info(&self) -> SenderInfo;

    fn create_backing(&mut self, info: &SenderInfo, state: ResourceState) -> Option<Self::Backing>;

    /// Identity of a receiving texture, for hosts that import it.
    fn backing_handle(backing: &Self::Backing) -> Option<ResourceHandle>;

    fn release_receiver(&mut self);

    fn close_session(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn d3d12_state_bits() {
        assert_eq!(ResourceState::Common.d3d12_bits(), 0);
        assert_eq!(ResourceState::RenderTarget.d3d12_bits(), 4);
        assert_eq!(ResourceState::CopyDest.d3d12_bits(), 0x400);
    }

    #[test]
    fn sender_info_format_lookup() {
        let info = SenderInfo {
            width: 1920,
            height: 1080,
            dxgi_format: 28,
        };
        assert_eq!(info.format(), Some(TextureFormat::Rgba8Unorm));
        assert!(!info.is_empty());
        assert!(SenderInfo::default().is_empty());
    }
}
