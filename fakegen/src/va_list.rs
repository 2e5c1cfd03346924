use std::ffi::c_void;

use crate::ZeroValue;

/// Opaque handle to the `va_list` of a variadic call.
///
/// Passed as the last argument of a variadic fake. It points into the stack
/// frame of the C shim that forwarded the call, so it is only meaningful while
/// that call is running; recorded copies are for identity checks only.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VaList(*mut c_void);

impl VaList {
    /// A handle that refers to no argument list, for calling variadic fakes
    /// directly from Rust.
    pub fn null() -> Self {
        Self(std::ptr::null_mut())
    }

    /// The raw `va_list *` pointer.
    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }

    /// Whether this is [`VaList::null`].
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl ZeroValue for VaList {
    fn zero() -> Self {
        Self::null()
    }
}
