use std::ffi::c_int;

unsafe extern "C" {
    pub fn logv(level: c_int, fakegen_va: c_int, ...);
}
