//! A thermostat controller written in C, linked against fakes of its
//! hardware abstraction layer instead of real hardware.

use std::ffi::c_int;

pub mod hal;

/// Fakes of every function in [`hal`], generated by the build script.
pub mod fakes {
    use std::ffi::{c_char, c_int};

    include!(concat!(env!("OUT_DIR"), "/hal_fakes.rs"));
}

mod ffi {
    use std::ffi::c_int;

    unsafe extern "C" {
        pub fn thermostat_step(sensor: u8, target: c_int) -> c_int;
        pub fn thermostat_average(sensor: u8, samples: c_int, average: *mut c_int) -> c_int;
    }
}

const THERMOSTAT_OK: c_int = 0;

/// Outcome of a control step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The heater was driven from a valid reading.
    Ok,
    /// The sensor failed and the heater was switched off.
    Fault,
}

/// Read `sensor` once and switch the heater on when below `target`.
pub fn step(sensor: u8, target: i32) -> Status {
    match unsafe { ffi::thermostat_step(sensor, target) } {
        THERMOSTAT_OK => Status::Ok,
        _ => Status::Fault,
    }
}

/// Average of `samples` readings of `sensor`, `None` if any reading failed.
pub fn average(sensor: u8, samples: i32) -> Option<i32> {
    let mut average = 0;
    match unsafe { ffi::thermostat_average(sensor, samples, &mut average) } {
        THERMOSTAT_OK => Some(average),
        _ => None,
    }
}
