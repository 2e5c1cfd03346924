#![warn(missing_docs)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]

//! # fakegen - fake functions for tests
//!
//! A fake stands in for a real function: it records every call, returns
//! programmed values and can delegate to closures. Fakes are defined with
//! [`fake!`], or generated from `extern` blocks by [`FakeGenerator`] in a
//! build script so that C code linked into a test binary calls them.
//!
//! All fake state is thread-local. Tests running on separate threads do not
//! see each other's calls, and C code has to call fakes on the thread of the
//! test that armed them.

#[cfg(test)]
mod tests;

mod ast;
mod fake;
mod ffi_items;
mod generator;
mod macro_expansion;
mod macros;
mod registry;
mod rustc_version;
mod template;
mod translator;
mod va_list;
mod zero;

pub use ast::{Abi, Fn, Parameter};
pub use fake::{CustomFake, Fake, boxed_fake, invoke};
pub use generator::{FakeGenerator, GeneratedFiles, GenerationError};
pub use macro_expansion::expand;
pub use registry::{call_history, call_history_len, reset_history, set_call_history_len};
pub use rustc_version::{RustcVersion, rustc_version};
pub use translator::TranslationError;
pub use va_list::VaList;
pub use zero::ZeroValue;

/// A possible error that can be encountered while generating fakes.
pub type Error = Box<dyn std::error::Error>;
/// A type alias for `std::result::Result` that defaults to our error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
/// A boxed string for representing identifiers.
type BoxStr = Box<str>;

/// Highest number of parameters a fake can take.
pub const MAX_ARGS: usize = 20;
/// Default number of calls whose arguments and return values a fake keeps.
pub const ARG_HISTORY_LEN: usize = 50;
/// Default number of calls kept by the call history shared by all fakes.
pub const CALL_HISTORY_LEN: usize = 50;
