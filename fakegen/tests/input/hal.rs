use std::ffi::{c_char, c_int};

unsafe extern "C" {
    pub fn hal_init();
    pub fn hal_read(channel: u8, buf: *mut u8, len: usize) -> c_int;
    #[link_name = "hal_write_v2"]
    pub fn hal_write(channel: u8, data: *const u8, len: usize) -> c_int;
    pub fn hal_log(level: c_int, fmt: *const c_char, ...) -> c_int;
    pub fn hal_trace(fmt: *const c_char, ...);
}
