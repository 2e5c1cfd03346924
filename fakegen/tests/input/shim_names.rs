use std::ffi::c_int;

unsafe extern "C" {
    pub fn logf(ret: c_int, ...) -> c_int;
    pub fn logv(va_args: c_int, ...);
}
