//! Opaque GPU resource handles.

use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;

/// An externally owned GPU resource, identified by its pointer.
///
/// The gateways never release the resource behind a handle. They only compare
/// handles across calls to decide whether a cached view is still valid.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle(NonNull<c_void>);

impl ResourceHandle {
    /// Wrap a raw resource pointer. Returns `None` for null.
    pub fn from_raw(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    /// Wrap a resource address as passed through integer-typed host APIs.
    pub fn from_addr(addr: usize) -> Option<Self> {
        Self::from_raw(addr as *mut c_void)
    }

    pub fn as_raw(self) -> *mut c_void {
        self.0.as_ptr()
    }

    pub fn addr(self) -> usize {
        self.0.as_ptr() as usize
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceHandle({:#x})", self.addr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_rejected() {
        assert!(ResourceHandle::from_raw(std::ptr::null_mut()).is_none());
        assert!(ResourceHandle::from_addr(0).is_none());
    }

    #[test]
    fn identity_follows_address() {
        let a = ResourceHandle::from_addr(0x1000).unwrap();
        let b = ResourceHandle::from_addr(0x1000).unwrap();
        let c = ResourceHandle::from_addr(0x2000).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(format!("{a:?}"), "ResourceHandle(0x1000)");
    }
}
