use askama::Template;
use syn::visit::Visit;

use crate::template::{CFakesTemplate, RustFakesTemplate, c_declaration};
use crate::translator::{TranslationError, Translator};
use crate::{Abi, RustcVersion, ffi_items::FfiItems};

const ALL_ITEMS: &str = r#"
use std::ffi::{c_char, c_int, c_void};

pub struct Buffer {
    ptr: *mut c_void,
    len: usize,
}

mod level1 {
    unsafe extern "C" {
        pub fn nested(flag: bool) -> u8;
    }
}

unsafe extern "C" {
    static errno: c_int;

    pub fn malloc(size: usize) -> *mut c_void;
    fn free(ptr: *mut c_void);
    pub fn printf(fmt: *const c_char, ...) -> c_int;
    #[link_name = "real_open"]
    pub fn open(path: *const c_char, _: c_int) -> c_int;
}

extern "Rust" {
    fn rust_abi(x: isize) -> isize;
}
"#;

macro_rules! collect_idents {
    ($items:expr) => {
        $items.iter().map(|a| a.ident()).collect::<Vec<_>>()
    };
}

fn ffi_items(source: &str) -> FfiItems {
    let ast = syn::parse_file(source).unwrap();
    let mut ffi_items = FfiItems::new();
    ffi_items.visit_file(&ast);
    ffi_items
}

#[test]
fn test_extraction_ffi_items() {
    let ffi_items = ffi_items(ALL_ITEMS);

    assert_eq!(
        collect_idents!(ffi_items.foreign_functions()),
        ["nested", "malloc", "free", "printf", "open", "rust_abi"]
    );
}

#[test]
fn test_extraction_fn_details() {
    let ffi_items = ffi_items(ALL_ITEMS);
    let fns = ffi_items.foreign_functions();

    let free = &fns[2];
    assert!(!free.is_public());
    assert!(free.return_type().is_none());

    let printf = &fns[3];
    assert!(printf.is_variadic());
    assert_eq!(collect_idents!(printf.parameters()), ["fmt"]);

    let open = &fns[4];
    assert_eq!(open.link_name(), Some("real_open"));
    assert_eq!(open.symbol(), "real_open");
    assert_eq!(collect_idents!(open.parameters()), ["path", "arg1"]);

    assert_eq!(open.line(), 22);
    assert_eq!(fns[0].abi(), &Abi::C);
    assert_eq!(fns[5].abi(), &Abi::Rust);
}

#[test]
fn test_translation_type_path() {
    let translator = Translator::default();
    let ty: syn::Type = syn::parse_str("std::option::Option<u8>").unwrap();

    assert_eq!(translator.translate_type(&ty).unwrap(), "uint8_t");
}

#[test]
fn test_translation_type_c_aliases() {
    let translator = Translator::default();
    let translate = |s: &str| translator.translate_type(&syn::parse_str(s).unwrap()).unwrap();

    assert_eq!(translate("c_int"), "int");
    assert_eq!(translate("c_uint"), "unsigned int");
    assert_eq!(translate("std::ffi::c_char"), "char");
    assert_eq!(translate("c_schar"), "signed char");
}

#[test]
fn test_translation_type_ptr() {
    let translator = Translator::default();
    let ty: syn::Type = syn::parse_str("*const *mut i32").unwrap();

    assert_eq!(translator.translate_type(&ty).unwrap(), "int32_t*const *");

    let ty: syn::Type = syn::parse_str("*const c_char").unwrap();
    assert_eq!(translator.translate_type(&ty).unwrap(), "const char*");
}

#[test]
fn test_translation_type_unit() {
    let translator = Translator::default();
    let translate = |s: &str| translator.translate_type(&syn::parse_str(s).unwrap()).unwrap();

    assert_eq!(translate("()"), "void");
    assert_eq!(translate("fn()"), "void(*)(void)");
    assert_eq!(translate("Option<unsafe extern \"C\" fn(c_int) -> ()>"), "void(*)(int)");
}

#[test]
fn test_translation_type_reference() {
    let translator = Translator::default();
    let ty: syn::Type = syn::parse_str("&u8").unwrap();

    assert_eq!(translator.translate_type(&ty).unwrap(), "const uint8_t*");
}

#[test]
fn test_translation_type_bare_fn() {
    let translator = Translator::default();
    let ty: syn::Type = syn::parse_str("fn(*mut u8, i16) -> &str").unwrap();

    assert_eq!(
        translator.translate_type(&ty).unwrap(),
        "const char*(*)(uint8_t*, int16_t)"
    );
}

#[test]
fn test_translation_type_array() {
    let translator = Translator::default();
    let ty: syn::Type = syn::parse_str("[&u8; 2 + 2]").unwrap();

    assert_eq!(translator.translate_type(&ty).unwrap(), "const uint8_t*[2 + 2]");
}

#[test]
fn test_translation_unsupported() {
    let translator = Translator::default();
    let ty: syn::Type = syn::parse_str("&mut str").unwrap();

    assert!(matches!(
        translator.translate_type(&ty),
        Err(TranslationError::UnsupportedType { .. })
    ));

    let ty: syn::Type = syn::parse_str("[u8; N << 1]").unwrap();
    assert!(matches!(
        translator.translate_type(&ty),
        Err(TranslationError::UnsupportedExpr(_))
    ));
}

#[test]
fn test_c_declaration() {
    assert_eq!(c_declaration("const char*", "fmt"), "const char* fmt");
    assert_eq!(c_declaration("int(*)(void)", "cb"), "int(*cb)(void)");
    assert_eq!(c_declaration("uint8_t[4]", "buf"), "uint8_t buf[4]");
}

#[test]
fn test_rust_template_attributes() {
    let ffi_items = ffi_items(ALL_ITEMS);
    let fns = ffi_items.foreign_functions().iter().collect::<Vec<_>>();

    let rendered = RustFakesTemplate::new("all.rs", &fns, Some(4), RustcVersion::new(1, 88, 0))
        .render()
        .unwrap();
    assert!(rendered.contains("history_len = 4;"));
    assert!(rendered.contains("#[unsafe(no_mangle)]\n    pub extern \"C\" fn malloc(size: usize) -> * mut c_void;"));
    assert!(rendered.contains("#[unsafe(export_name = \"real_open\")]"));
    assert!(rendered.contains("#[unsafe(export_name = \"fakegen_va_printf\")]"));
    assert!(rendered.contains("pub extern \"C\" fn printf(fmt: * const c_char, ...) -> c_int;"));
    assert!(rendered.contains("pub extern \"Rust\" fn rust_abi(x: isize) -> isize;"));

    let rendered = RustFakesTemplate::new("all.rs", &fns, None, RustcVersion::new(1, 63, 0))
        .render()
        .unwrap();
    assert!(!rendered.contains("history_len"));
    assert!(!rendered.contains("unsafe("));
    assert!(rendered.contains("#[export_name = \"real_open\"]"));
}

#[test]
fn test_c_template_shims() {
    let ffi_items = ffi_items(ALL_ITEMS);
    let fns = ffi_items.foreign_functions().iter().collect::<Vec<_>>();

    let template =
        CFakesTemplate::new("all.rs", &["stdio.h".to_string()], Some("__attribute__((weak))"), &fns)
            .unwrap();
    assert!(!template.is_empty());

    let rendered = template.render().unwrap();
    assert!(rendered.contains("#include <stdio.h>"));
    assert!(rendered.contains("int fakegen_va_printf(const char* fmt, va_list *fakegen_va);"));
    assert!(rendered.contains("__attribute__((weak)) int printf(const char* fmt, ...) {"));
    assert!(rendered.contains("va_start(fakegen_va, fmt);"));
    assert!(rendered.contains("int fakegen_ret = fakegen_va_printf(fmt, &fakegen_va);"));
    assert!(!rendered.contains("malloc"));
}

#[test]
fn test_rustc_version_parse() {
    let version = RustcVersion::parse("rustc 1.88.0 (6b00bc388 2025-06-23)").unwrap();
    assert_eq!(version, RustcVersion::new(1, 88, 0));
    assert_eq!(version.to_string(), "1.88.0");

    let nightly = RustcVersion::parse("rustc 1.90.0-nightly (abcdef012 2025-07-01)").unwrap();
    assert!(nightly > RustcVersion::new(1, 82, 0));

    assert!(RustcVersion::parse("cargo").is_err());
}
