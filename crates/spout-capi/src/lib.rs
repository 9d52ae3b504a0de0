//! C ABI for hosts that share D3D12 textures through Spout.
//!
//! Handles are opaque heap pointers. Every function accepts a null handle
//! and treats it as a no-op returning `false`/`0`/null.

use std::ffi::{c_char, c_void, CStr};

use spout_gateway::{
    FrameReceiver, FrameSender, ReceiverConfig, Received, ResourceHandle, SenderConfig, SyncMode,
};
use tracing::error;

pub mod logging;
pub mod select;

pub use select::{create_receiver, create_sender};

pub const SPOUT_RECEIVE_NONE: i32 = 0;
pub const SPOUT_RECEIVE_FRAME: i32 = 1;
pub const SPOUT_RECEIVE_RESIZED: i32 = 2;

/// Opaque sender handle.
pub struct SpoutSender(Box<dyn FrameSender>);

/// Opaque receiver handle.
pub struct SpoutReceiver(Box<dyn FrameReceiver>);

/// Borrow a NUL-terminated UTF-8 string. Null yields `Ok(None)`.
unsafe fn c_str<'a>(ptr: *const c_char) -> Result<Option<&'a str>, std::str::Utf8Error> {
    if ptr.is_null() {
        return Ok(None);
    }
    CStr::from_ptr(ptr).to_str().map(Some)
}

// =====================================================================
// Logging
// =====================================================================

/// Install the log subscriber. `level` is an `EnvFilter` directive such as
/// `"debug"` and may be null; `RUST_LOG` takes precedence.
///
/// # Safety
/// `level` must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn spout_init_logging(level: *const c_char) {
    logging::init(c_str(level).ok().flatten());
}

// =====================================================================
// Sender
// =====================================================================

/// Open a sender named `name`. `queue` may be null, which disables GPU
/// synchronization; so does `sync == 0`. Returns null when `device` is null
/// or `name` is not a valid sender name.
///
/// # Safety
/// `device`/`queue` must be null or live D3D12 interfaces and `name` a
/// NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn spout_sender_create(
    device: *mut c_void,
    queue: *mut c_void,
    name: *const c_char,
    sync: i32,
) -> *mut SpoutSender {
    logging::init(None);
    if device.is_null() {
        error!("spout_sender_create: null device");
        return std::ptr::null_mut();
    }

    let name = match c_str(name) {
        Ok(Some(name)) => name,
        _ => {
            error!("spout_sender_create: missing or non UTF-8 name");
            return std::ptr::null_mut();
        }
    };
    let sync = if sync != 0 { SyncMode::Queue } else { SyncMode::None };
    let config = SenderConfig::new(name).with_sync(sync);
    if let Err(err) = config.validate() {
        error!("spout_sender_create: {err:#}");
        return std::ptr::null_mut();
    }

    let sender = create_sender(device, queue, &config);
    Box::into_raw(Box::new(SpoutSender(sender)))
}

/// # Safety
/// `sender` must be null or a live handle; `name` a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn spout_sender_set_name(sender: *mut SpoutSender, name: *const c_char) -> bool {
    let Some(sender) = sender.as_mut() else {
        return false;
    };
    match c_str(name) {
        Ok(Some(name)) => sender.0.set_name(name),
        _ => false,
    }
}

/// Share `resource` (an `ID3D12Resource*` in render-target state) as the
/// next frame.
///
/// # Safety
/// `sender` must be null or a live handle; `resource` null or a live
/// resource on the sender's device.
#[no_mangle]
pub unsafe extern "C" fn spout_sender_send(sender: *mut SpoutSender, resource: *mut c_void) -> bool {
    match sender.as_mut() {
        Some(sender) => sender.0.submit(ResourceHandle::from_raw(resource)),
        None => false,
    }
}

/// Unregister the sender and drop its cached view. The handle stays usable.
///
/// # Safety
/// `sender` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn spout_sender_release(sender: *mut SpoutSender) {
    if let Some(sender) = sender.as_mut() {
        sender.0.release();
    }
}

/// Close the session and free the handle.
///
/// # Safety
/// `sender` must be null or a live handle, not used afterwards.
#[no_mangle]
pub unsafe extern "C" fn spout_sender_destroy(sender: *mut SpoutSender) {
    if sender.is_null() {
        return;
    }
    let mut sender = Box::from_raw(sender);
    sender.0.close();
}

// =====================================================================
// Receiver
// =====================================================================

/// Open a receiver following `name`, or the active sender when `name` is
/// null or empty. Returns null when `device` is null.
///
/// # Safety
/// `device` must be null or a live `ID3D12Device*`; `name` null or a
/// NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn spout_receiver_create(device: *mut c_void, name: *const c_char) -> *mut SpoutReceiver {
    logging::init(None);
    if device.is_null() {
        error!("spout_receiver_create: null device");
        return std::ptr::null_mut();
    }

    let sender_name = match c_str(name) {
        Ok(name) => name.filter(|n| !n.is_empty()).map(str::to_string),
        Err(err) => {
            error!("spout_receiver_create: {err}");
            return std::ptr::null_mut();
        }
    };
    let config = ReceiverConfig { sender_name };
    if let Err(err) = config.validate() {
        error!("spout_receiver_create: {err:#}");
        return std::ptr::null_mut();
    }

    let receiver = create_receiver(device, &config);
    Box::into_raw(Box::new(SpoutReceiver(receiver)))
}

/// Follow the sender called `name`. Null, empty or invalid names are
/// logged and ignored; to follow the active sender, create the receiver
/// without a name.
///
/// # Safety
/// `receiver` must be null or a live handle; `name` null or a
/// NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn spout_receiver_set_name(receiver: *mut SpoutReceiver, name: *const c_char) -> bool {
    let Some(receiver) = receiver.as_mut() else {
        return false;
    };
    match c_str(name) {
        Ok(Some(name)) => receiver.0.set_sender_name(name),
        Ok(None) => {
            error!("spout_receiver_set_name: null name");
            false
        }
        Err(err) => {
            error!("spout_receiver_set_name: {err}");
            false
        }
    }
}

/// Poll the sender. Returns one of the `SPOUT_RECEIVE_*` codes.
///
/// # Safety
/// `receiver` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn spout_receiver_receive(receiver: *mut SpoutReceiver) -> i32 {
    match receiver.as_mut().map(|r| r.0.receive()) {
        Some(Received::Frame) => SPOUT_RECEIVE_FRAME,
        Some(Received::Resized(_)) => SPOUT_RECEIVE_RESIZED,
        Some(Received::NoFrame) | None => SPOUT_RECEIVE_NONE,
    }
}

/// # Safety
/// `receiver` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn spout_receiver_width(receiver: *const SpoutReceiver) -> u32 {
    receiver
        .as_ref()
        .and_then(|r| r.0.sender_info())
        .map_or(0, |info| info.width)
}

/// # Safety
/// `receiver` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn spout_receiver_height(receiver: *const SpoutReceiver) -> u32 {
    receiver
        .as_ref()
        .and_then(|r| r.0.sender_info())
        .map_or(0, |info| info.height)
}

/// Raw `DXGI_FORMAT` of the receiving texture, `0` (unknown) when none.
///
/// # Safety
/// `receiver` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn spout_receiver_format(receiver: *const SpoutReceiver) -> u32 {
    receiver
        .as_ref()
        .and_then(|r| r.0.sender_info())
        .map_or(0, |info| info.dxgi_format)
}

/// The receiving `ID3D12Resource*`, owned by the receiver. Valid until the
/// next resize, release or destroy.
///
/// # Safety
/// `receiver` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn spout_receiver_texture(receiver: *const SpoutReceiver) -> *mut c_void {
    receiver
        .as_ref()
        .and_then(|r| r.0.texture())
        .map_or(std::ptr::null_mut(), ResourceHandle::as_raw)
}

/// # Safety
/// `receiver` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn spout_receiver_release(receiver: *mut SpoutReceiver) {
    if let Some(receiver) = receiver.as_mut() {
        receiver.0.release();
    }
}

/// # Safety
/// `receiver` must be null or a live handle, not used afterwards.
#[no_mangle]
pub unsafe extern "C" fn spout_receiver_destroy(receiver: *mut SpoutReceiver) {
    if receiver.is_null() {
        return;
    }
    let mut receiver = Box::from_raw(receiver);
    receiver.0.close();
}
