//! D3D12 backend for the Spout binding (Windows).
//!
//! The native `spoutDX12` class is reached through a small C-ABI shim DLL
//! (see `native/`) whose exports are loaded at runtime, the same way WGL
//! extension entry points are. On other platforms this crate is empty and
//! hosts fall back to the no-op sender/receiver from `spout-gateway`.

#[cfg(target_os = "windows")]
pub mod backend;
#[cfg(target_os = "windows")]
pub mod device;
#[cfg(target_os = "windows")]
pub mod fence;
#[cfg(target_os = "windows")]
pub mod library;
#[cfg(target_os = "windows")]
pub mod session;

#[cfg(target_os = "windows")]
pub use backend::SpoutDx12;
#[cfg(target_os = "windows")]
pub use device::Dx12Device;
#[cfg(target_os = "windows")]
pub use fence::QueueFence;
#[cfg(target_os = "windows")]
pub use library::SpoutLibrary;
#[cfg(target_os = "windows")]
pub use session::{open_receiver, open_sender};
