use std::fs;

use fakegen::{FakeGenerator, GenerationError, Result, RustcVersion};
use pretty_assertions::assert_eq;

// Inputs are read relative to the crate root, all files are generated
// relative to the output directory.

/// Create a fake generator configured to useful settings.
///
/// The files will be generated in a unique temporary directory that gets
/// deleted when it goes out of scope.
fn default_generator() -> Result<(FakeGenerator, tempfile::TempDir)> {
    let temp_dir = tempfile::tempdir()?;
    let mut generator = FakeGenerator::new();

    generator
        .out_dir(&temp_dir)
        .rustc_version(RustcVersion::new(1, 88, 0));

    Ok((generator, temp_dir))
}

fn generation_error(crate_path: &str) -> GenerationError {
    let (mut generator, _out_dir) = default_generator().unwrap();
    let err = generator
        .generate_files(crate_path, "out.rs")
        .expect_err("generation should fail");

    match err.downcast::<GenerationError>() {
        Ok(err) => *err,
        Err(err) => panic!("unexpected error: {err}"),
    }
}

const HAL_RS: &str = r#"// Generated by fakegen from `tests/input/hal.rs`. Do not edit.

::fakegen::fake! {

    #[unsafe(no_mangle)]
    pub extern "C" fn hal_init();

    #[unsafe(no_mangle)]
    pub extern "C" fn hal_read(channel: u8, buf: * mut u8, len: usize) -> c_int;

    #[unsafe(export_name = "hal_write_v2")]
    pub extern "C" fn hal_write(channel: u8, data: * const u8, len: usize) -> c_int;

    #[unsafe(export_name = "fakegen_va_hal_log")]
    pub extern "C" fn hal_log(level: c_int, fmt: * const c_char, ...) -> c_int;

    #[unsafe(export_name = "fakegen_va_hal_trace")]
    pub extern "C" fn hal_trace(fmt: * const c_char, ...);
}"#;

const HAL_C: &str = r#"/* Generated by fakegen from `tests/input/hal.rs`. Do not edit. */

#include <stdarg.h>
#include <stdbool.h>
#include <stddef.h>
#include <stdint.h>
#include <hal.h>

int fakegen_va_hal_log(int level, const char* fmt, va_list *fakegen_va);

int hal_log(int level, const char* fmt, ...) {
    va_list fakegen_va;
    va_start(fakegen_va, fmt);
    int fakegen_ret = fakegen_va_hal_log(level, fmt, &fakegen_va);
    va_end(fakegen_va);
    return fakegen_ret;
}

void fakegen_va_hal_trace(const char* fmt, va_list *fakegen_va);

void hal_trace(const char* fmt, ...) {
    va_list fakegen_va;
    va_start(fakegen_va, fmt);
    fakegen_va_hal_trace(fmt, &fakegen_va);
    va_end(fakegen_va);
}"#;

#[test]
fn test_generate_hal() {
    let (mut generator, out_dir) = default_generator().unwrap();
    let files = generator
        .header("hal.h")
        .generate_files("tests/input/hal.rs", "hal_fakes.rs")
        .unwrap();

    assert_eq!(files.rust, out_dir.path().join("hal_fakes.rs"));
    assert_eq!(files.c, out_dir.path().join("hal_fakes.c"));
    assert!(files.has_shims);

    let rust = fs::read_to_string(&files.rust).unwrap();
    assert_eq!(rust.trim_end(), HAL_RS);
    let c = fs::read_to_string(&files.c).unwrap();
    assert_eq!(c.trim_end(), HAL_C);
}

#[test]
fn test_generate_history_len_and_attributes() {
    let (mut generator, _out_dir) = default_generator().unwrap();
    let files = generator
        .arg_history_len(8)
        .function_attributes("__attribute__((weak))")
        .generate_files("tests/input/hal.rs", "hal_fakes.rs")
        .unwrap();

    let rust = fs::read_to_string(&files.rust).unwrap();
    assert!(rust.contains("::fakegen::fake! {\n    history_len = 8;\n"));

    let c = fs::read_to_string(&files.c).unwrap();
    assert!(c.contains("\n__attribute__((weak)) int hal_log(int level, const char* fmt, ...) {\n"));
    assert!(!c.contains("#include <hal.h>"));
}

#[test]
fn test_generate_legacy_attributes() {
    let (mut generator, _out_dir) = default_generator().unwrap();
    let files = generator
        .rustc_version(RustcVersion::new(1, 81, 0))
        .generate_files("tests/input/hal.rs", "hal_fakes.rs")
        .unwrap();

    let rust = fs::read_to_string(&files.rust).unwrap();
    assert!(rust.contains("    #[no_mangle]\n    pub extern \"C\" fn hal_init();"));
    assert!(rust.contains("#[export_name = \"hal_write_v2\"]"));
    assert!(!rust.contains("unsafe("));
}

#[test]
fn test_skip_fn() {
    let (mut generator, _out_dir) = default_generator().unwrap();
    let files = generator
        .skip_fn(|f| f.is_variadic())
        .skip_fn(|f| f.ident() == "hal_init")
        .generate_files("tests/input/hal.rs", "hal_fakes.rs")
        .unwrap();

    assert!(!files.has_shims);

    let rust = fs::read_to_string(&files.rust).unwrap();
    assert!(rust.contains("fn hal_read("));
    assert!(rust.contains("fn hal_write("));
    assert!(!rust.contains("hal_init"));
    assert!(!rust.contains("hal_log"));
    assert!(!rust.contains("hal_trace"));

    let c = fs::read_to_string(&files.c).unwrap();
    assert!(!c.contains("va_start"));
}

#[test]
fn test_too_many_parameters() {
    match generation_error("tests/input/too_many.rs") {
        GenerationError::TooManyParameters { ident, count, max } => {
            assert_eq!(ident, "wide");
            assert_eq!(count, 21);
            assert_eq!(max, fakegen::MAX_ARGS);
        }
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn test_variadic_without_fixed_parameter() {
    assert!(matches!(
        generation_error("tests/input/variadic_no_fixed.rs"),
        GenerationError::VariadicWithoutFixedParameter(ident) if ident == "only_dots"
    ));
}

#[test]
fn test_duplicate_symbol() {
    assert!(matches!(
        generation_error("tests/input/duplicate.rs"),
        GenerationError::DuplicateSymbol(symbol) if symbol == "reset_device"
    ));
}

#[test]
fn test_duplicate_ident() {
    assert!(matches!(
        generation_error("tests/input/duplicate_ident.rs"),
        GenerationError::DuplicateIdent(ident) if ident == "read"
    ));
}

#[test]
fn test_reserved_parameter() {
    match generation_error("tests/input/reserved.rs") {
        GenerationError::ReservedParameter { ident, parameter } => {
            assert_eq!(ident, "logv");
            assert_eq!(parameter, "fakegen_va");
        }
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn test_shim_locals_do_not_shadow_parameters() {
    let (mut generator, _out_dir) = default_generator().unwrap();
    let files = generator
        .generate_files("tests/input/shim_names.rs", "shim_names.rs")
        .unwrap();

    let rust = fs::read_to_string(&files.rust).unwrap();
    assert!(rust.contains("pub extern \"C\" fn logf(ret: c_int, ...) -> c_int;"));
    assert!(rust.contains("pub extern \"C\" fn logv(va_args: c_int, ...);"));

    let c = fs::read_to_string(&files.c).unwrap();
    assert!(c.contains("int fakegen_ret = fakegen_va_logf(ret, &fakegen_va);"));
    assert!(c.contains("void logv(int va_args, ...) {\n    va_list fakegen_va;\n    va_start(fakegen_va, va_args);"));
    assert!(c.contains("fakegen_va_logv(va_args, &fakegen_va);"));
}

#[test]
fn test_diverging() {
    let err = generation_error("tests/input/diverging.rs");

    assert_eq!(err.to_string(), "`panic_handler` never returns and cannot be faked");
}

#[test]
fn test_invalid_syntax() {
    let (mut generator, _out_dir) = default_generator().unwrap();

    let fails = generator
        .generate_files("tests/input/invalid_syntax.rs", "invalid_syntax_out.rs")
        .is_err();

    assert!(fails)
}

#[test]
fn test_missing_file() {
    let (mut generator, _out_dir) = default_generator().unwrap();

    assert!(
        generator
            .generate_files("tests/input/does_not_exist.rs", "out.rs")
            .is_err()
    );
}
