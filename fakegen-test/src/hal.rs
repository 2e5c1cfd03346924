//! Hardware abstraction layer the thermostat is written against.

use std::ffi::{c_char, c_int};

unsafe extern "C" {
    pub fn hal_read_temperature(sensor: u8) -> c_int;
    pub fn hal_heater_set(on: c_int);
    pub fn hal_log(fmt: *const c_char, ...) -> c_int;
}
