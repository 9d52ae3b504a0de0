//! Runtime-loaded entry points of the `spoutDX12` C shim.

use std::ffi::{c_char, c_void, CStr};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::OnceCell;
use tracing::debug;
use windows::core::{HSTRING, PCSTR};
use windows::Win32::Foundation::HMODULE;
use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};

/// File name of the shim DLL built from `native/`.
pub const SHIM_DLL: &str = "SpoutDX12Shim.dll";

// =====================================================================
// Shim function pointer types
// =====================================================================

type OpenFn = unsafe extern "C" fn(device: *mut c_void, queue: *mut c_void) -> *mut c_void;
type CloseFn = unsafe extern "C" fn(spout: *mut c_void);
type SetSenderNameFn = unsafe extern "C" fn(spout: *mut c_void, name: *const c_char) -> i32;
type SetReceiverNameFn = unsafe extern "C" fn(spout: *mut c_void, name: *const c_char);
type ReleaseFn = unsafe extern "C" fn(spout: *mut c_void);
type WrapResourceFn = unsafe extern "C" fn(
    spout: *mut c_void,
    dx12_resource: *mut c_void,
    state: i32,
    dx11_resource: *mut *mut c_void,
) -> i32;
type SendResourceFn = unsafe extern "C" fn(spout: *mut c_void, dx11_resource: *mut c_void) -> i32;
type ReceiveResourceFn = unsafe extern "C" fn(spout: *mut c_void, dx12_resource: *mut c_void) -> i32;
type CreateTextureFn = unsafe extern "C" fn(
    spout: *mut c_void,
    device: *mut c_void,
    width: u32,
    height: u32,
    state: i32,
    format: u32,
    dx12_resource: *mut *mut c_void,
) -> i32;
type QueryU32Fn = unsafe extern "C" fn(spout: *mut c_void) -> u32;
type QueryBoolFn = unsafe extern "C" fn(spout: *mut c_void) -> i32;

/// Loaded shim entry points.
///
/// Every function takes the `spoutDX12*` returned by `open` as its first
/// argument. Boolean results are C `int`s.
pub struct SpoutLibrary {
    _module: HMODULE,
    pub(crate) open: OpenFn,
    pub(crate) close: CloseFn,
    pub(crate) set_sender_name: SetSenderNameFn,
    pub(crate) set_receiver_name: SetReceiverNameFn,
    pub(crate) release_sender: ReleaseFn,
    pub(crate) release_receiver: ReleaseFn,
    pub(crate) wrap_resource: WrapResourceFn,
    pub(crate) send_resource: SendResourceFn,
    pub(crate) receive_resource: ReceiveResourceFn,
    pub(crate) create_texture: CreateTextureFn,
    pub(crate) sender_width: QueryU32Fn,
    pub(crate) sender_height: QueryU32Fn,
    pub(crate) sender_format: QueryU32Fn,
    pub(crate) is_updated: QueryBoolFn,
}

// SAFETY: the module handle is never used after loading and the function
// pointers are plain code addresses. The shim itself is only driven from the
// thread owning each session.
unsafe impl Send for SpoutLibrary {}
unsafe impl Sync for SpoutLibrary {}

static SHARED: OnceCell<Arc<SpoutLibrary>> = OnceCell::new();

impl SpoutLibrary {
    /// The process-wide shim, loaded on first use. Stays loaded for the
    /// lifetime of the process.
    pub fn shared() -> Result<Arc<Self>> {
        SHARED
            .get_or_try_init(|| Self::load(SHIM_DLL).map(Arc::new))
            .cloned()
    }

    /// Load the shim from `path` and resolve every entry point.
    pub fn load(path: &str) -> Result<Self> {
        let module = unsafe { LoadLibraryW(&HSTRING::from(path)) }
            .with_context(|| format!("failed to load {path}"))?;

        unsafe {
            let load = |name: &CStr| -> Result<*mut c_void> {
                let addr = GetProcAddress(module, PCSTR(name.as_ptr() as *const u8))
                    .ok_or_else(|| anyhow!("{path} does not export {}", name.to_string_lossy()))?;
                Ok(addr as usize as *mut c_void)
            };

            let library = Self {
                _module: module,
                open: std::mem::transmute::<*mut c_void, OpenFn>(load(c"spoutdx12_open")?),
                close: std::mem::transmute::<*mut c_void, CloseFn>(load(c"spoutdx12_close")?),
                set_sender_name: std::mem::transmute::<*mut c_void, SetSenderNameFn>(load(
                    c"spoutdx12_set_sender_name",
                )?),
                set_receiver_name: std::mem::transmute::<*mut c_void, SetReceiverNameFn>(load(
                    c"spoutdx12_set_receiver_name",
                )?),
                release_sender: std::mem::transmute::<*mut c_void, ReleaseFn>(load(
                    c"spoutdx12_release_sender",
                )?),
                release_receiver: std::mem::transmute::<*mut c_void, ReleaseFn>(load(
                    c"spoutdx12_release_receiver",
                )?),
                wrap_resource: std::mem::transmute::<*mut c_void, WrapResourceFn>(load(
                    c"spoutdx12_wrap_resource",
                )?),
                send_resource: std::mem::transmute::<*mut c_void, SendResourceFn>(load(
                    c"spoutdx12_send_resource",
                )?),
                receive_resource: std::mem::transmute::<*mut c_void, ReceiveResourceFn>(load(
                    c"spoutdx12_receive_resource",
                )?),
                create_texture: std::mem::transmute::<*mut c_void, CreateTextureFn>(load(
                    c"spoutdx12_create_texture",
                )?),
                sender_width: std::mem::transmute::<*mut c_void, QueryU32Fn>(load(
                    c"spoutdx12_sender_width",
                )?),
                sender_height: std::mem::transmute::<*mut c_void, QueryU32Fn>(load(
                    c"spoutdx12_sender_height",
                )?),
                sender_format: std::mem::transmute::<*mut c_void, QueryU32Fn>(load(
                    c"spoutdx12_sender_format",
                )?),
                is_updated: std::mem::transmute::<*mut c_void, QueryBoolFn>(load(
                    c"spoutdx12_is_updated",
                )?),
            };

            debug!("loaded Spout shim from {path}");
            Ok(library)
        }
    }
}
