//! Platform-agnostic core of the Spout texture-sharing binding.
//!
//! The native sharing library does the real work: cross-API resource
//! wrapping, the shared-memory handshake and sender discovery. This crate
//! owns the small policy that sits in front of it:
//!
//! - [`ResourceGateway`] caches the cross-API view of the last submitted
//!   resource and orders sends behind a GPU fence.
//! - [`ReceiveGateway`] keeps a receiving texture sized to the active sender.
//! - [`SenderBackend`] / [`ReceiverBackend`] / [`GpuTimeline`] are the seams
//!   platform crates (e.g. `spout-d3d12`) implement.
//! - [`FrameSender`] / [`FrameReceiver`] are object-safe facades so a host
//!   binding can hold a real gateway or a no-op behind one pointer.

pub mod backend;
pub mod config;
pub mod fence;
pub mod format;
pub mod gateway;
pub mod handle;
pub mod no_op;
pub mod receiver;

#[cfg(test)]
pub(crate) mod mock;

pub use backend::{ReceiverBackend, ResourceState, SenderBackend, SenderInfo};
pub use config::{validate_sender_name, ReceiverConfig, SenderConfig, SyncMode, MAX_SENDER_NAME_LEN};
pub use fence::{FenceSync, GpuTimeline, WaitPolicy};
pub use format::TextureFormat;
pub use gateway::{FrameSender, ResourceGateway};
pub use handle::ResourceHandle;
pub use no_op::{NoOpReceiver, NoOpSender};
pub use receiver::{FrameReceiver, ReceiveGateway, Received};
