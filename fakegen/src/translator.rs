use std::ops::Deref;

use quote::ToTokens;
use thiserror::Error;

/// An error that occurs when a Rust type cannot be expressed in C.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TranslationError {
    /// The type has no C spelling that the shims could use.
    #[error("unsupported type `{ty}`: {reason}")]
    UnsupportedType {
        /// The type as written in Rust.
        ty: String,
        /// What about it is unsupported.
        reason: &'static str,
    },
    /// The array length is not a literal, a path or a simple sum.
    #[error("unsupported array length expression `{0}`")]
    UnsupportedExpr(String),
}

impl TranslationError {
    fn unsupported(ty: impl ToTokens, reason: &'static str) -> Self {
        Self::UnsupportedType {
            ty: ty.to_token_stream().to_string(),
            reason,
        }
    }
}

#[derive(Debug, Default, Clone)]
/// A Rust to C translator.
pub(crate) struct Translator {}

impl Translator {
    /// Create a new translator.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Return whether a type is a Rust primitive type.
    fn is_rust_primitive(&self, ty: &str) -> bool {
        let rustc_types = [
            "usize", "u8", "u16", "u32", "u64", "isize", "i8", "i16", "i32", "i64", "f32", "f64",
            "bool",
        ];
        ty.starts_with("c_") || rustc_types.contains(&ty)
    }

    /// Translate mutability from Rust to C.
    fn translate_mut(&self, mutability: Option<syn::Token![mut]>) -> &'static str {
        if mutability.is_some() { "" } else { "const " }
    }

    /// Translate a Rust type into its equivalent C type.
    pub(crate) fn translate_type(&self, ty: &syn::Type) -> Result<String, TranslationError> {
        match ty {
            syn::Type::Ptr(ptr) => self.translate_ptr(ptr),
            syn::Type::Path(path) => self.translate_path(path),
            syn::Type::Tuple(tuple) if tuple.elems.is_empty() => Ok("void".to_string()),
            syn::Type::Array(array) => self.translate_array(array),
            syn::Type::Reference(reference) => self.translate_reference(reference),
            syn::Type::BareFn(function) => self.translate_bare_fn(function),
            syn::Type::Paren(paren) => self.translate_type(&paren.elem),
            syn::Type::Never(_) => Err(TranslationError::unsupported(ty, "diverging type")),
            _ => Err(TranslationError::unsupported(ty, "no C equivalent")),
        }
    }

    /// Translate a Rust reference to its C equivalent.
    fn translate_reference(
        &self,
        reference: &syn::TypeReference,
    ) -> Result<String, TranslationError> {
        let path = match reference.elem.deref() {
            syn::Type::Path(path) => path
                .path
                .segments
                .last()
                .ok_or_else(|| TranslationError::unsupported(reference, "empty path"))?,
            syn::Type::Array(array) => {
                return Ok(format!(
                    "{}{}*",
                    self.translate_mut(reference.mutability),
                    self.translate_type(&array.elem)?,
                ));
            }
            _ => return Err(TranslationError::unsupported(reference, "unknown referent")),
        };

        let ident = path.ident.to_string();
        match ident.as_str() {
            "str" => {
                if reference.mutability.is_some() {
                    return Err(TranslationError::unsupported(reference, "`&mut str`"));
                }
                Ok("const char*".to_string())
            }
            c if self.is_rust_primitive(c) => Ok(format!(
                "{}{}*",
                self.translate_mut(reference.mutability),
                self.translate_primitive_type(&path.ident)
            )),
            _ => Err(TranslationError::unsupported(
                reference,
                "references to non primitive types",
            )),
        }
    }

    /// Translate a Rust function pointer type to its C equivalent.
    fn translate_bare_fn(&self, function: &syn::TypeBareFn) -> Result<String, TranslationError> {
        if function.lifetimes.is_some() {
            return Err(TranslationError::unsupported(function, "lifetimes"));
        }
        if function.variadic.is_some() {
            return Err(TranslationError::unsupported(function, "variadic function pointer"));
        }

        let mut parameters = function
            .inputs
            .iter()
            .map(|arg| self.translate_type(&arg.ty))
            .collect::<Result<Vec<_>, _>>()?;
        let return_type = match &function.output {
            syn::ReturnType::Default => "void".to_string(),
            syn::ReturnType::Type(_, ty) => self.translate_type(ty)?,
        };

        if parameters.is_empty() {
            parameters.push("void".to_string());
        }

        if return_type.contains("(*)") {
            Ok(return_type.replace("(*)", &format!("(*(*)({}))", parameters.join(", "))))
        } else {
            Ok(format!("{}(*)({})", return_type, parameters.join(", ")))
        }
    }

    /// Translate a Rust primitive type into its equivalent C type.
    pub(crate) fn translate_primitive_type(&self, ty: &syn::Ident) -> String {
        let ty = ty.to_string();
        match ty.as_str() {
            "usize" => "size_t".to_string(),
            "isize" => "ssize_t".to_string(),
            "u8" => "uint8_t".to_string(),
            "u16" => "uint16_t".to_string(),
            "u32" => "uint32_t".to_string(),
            "u64" => "uint64_t".to_string(),
            "i8" => "int8_t".to_string(),
            "i16" => "int16_t".to_string(),
            "i32" => "int32_t".to_string(),
            "i64" => "int64_t".to_string(),
            "f32" => "float".to_string(),
            "f64" => "double".to_string(),
            "bool" => "bool".to_string(),

            "c_longdouble" | "c_long_double" => "long double".to_string(),
            ty if ty.starts_with("c_") => {
                let ty = &ty[2..].replace("long", " long")[..];
                match ty {
                    "short" => "short".to_string(),
                    s if s.starts_with('u') => format!("unsigned {}", &s[1..]),
                    s if s.starts_with('s') => format!("signed {}", &s[1..]),
                    s => s.to_string(),
                }
            }
            s => s.to_string(),
        }
    }

    /// Translate a Rust path into its C equivalent.
    fn translate_path(&self, path: &syn::TypePath) -> Result<String, TranslationError> {
        // Paths should be fully qualified otherwise they won't properly be translated.
        let last = path
            .path
            .segments
            .last()
            .ok_or_else(|| TranslationError::unsupported(path, "empty path"))?;
        if last.ident == "Option" {
            match &last.arguments {
                syn::PathArguments::AngleBracketed(p) => match p.args.first() {
                    Some(syn::GenericArgument::Type(ty)) => self.translate_type(ty),
                    _ => Err(TranslationError::unsupported(
                        path,
                        "only simple generic types are supported",
                    )),
                },
                _ => Err(TranslationError::unsupported(path, "malformed `Option`")),
            }
        } else {
            Ok(self.translate_primitive_type(&last.ident))
        }
    }

    /// Translate a Rust array declaration into its C equivalent.
    fn translate_array(&self, array: &syn::TypeArray) -> Result<String, TranslationError> {
        Ok(format!(
            "{}[{}]",
            self.translate_type(array.elem.deref())?,
            translate_expr(&array.len)?
        ))
    }

    /// Translate a Rust pointer into its equivalent C pointer.
    fn translate_ptr(&self, ptr: &syn::TypePtr) -> Result<String, TranslationError> {
        let modifier = self.translate_mut(ptr.mutability);
        let inner = ptr.elem.deref();
        match inner {
            syn::Type::BareFn(_) => self.translate_type(inner),
            syn::Type::Ptr(_) => Ok(format!("{}{}*", self.translate_type(inner)?, modifier)),
            syn::Type::Array(arr) => {
                let len = translate_expr(&arr.len)?;
                let ty = self.translate_type(&arr.elem)?;
                Ok(format!("{modifier}{ty} (*)[{len}]"))
            }
            _ => Ok(format!("{}{}*", modifier, self.translate_type(inner)?)),
        }
    }
}

/// Translate a simple Rust expression to C.
///
/// This function is only used for translating expressions inside of
/// array brackets, and will fail for expressions not allowed inside of
/// those brackets.
pub(crate) fn translate_expr(expr: &syn::Expr) -> Result<String, TranslationError> {
    match expr {
        syn::Expr::Lit(l) => match &l.lit {
            syn::Lit::Int(i) => Ok(i.base10_digits().to_string()),
            _ => Err(TranslationError::UnsupportedExpr(
                expr.to_token_stream().to_string(),
            )),
        },
        syn::Expr::Path(p) => p
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .ok_or_else(|| TranslationError::UnsupportedExpr(expr.to_token_stream().to_string())),
        syn::Expr::Cast(c) => translate_expr(c.expr.deref()),
        syn::Expr::Binary(b) => {
            let left = translate_expr(b.left.deref())?;
            let right = translate_expr(b.right.deref())?;

            match b.op {
                syn::BinOp::Add(_) => Ok(format!("{left} + {right}")),
                syn::BinOp::Sub(_) => Ok(format!("{left} - {right}")),
                syn::BinOp::Mul(_) => Ok(format!("{left} * {right}")),
                _ => Err(TranslationError::UnsupportedExpr(
                    expr.to_token_stream().to_string(),
                )),
            }
        }
        _ => Err(TranslationError::UnsupportedExpr(
            expr.to_token_stream().to_string(),
        )),
    }
}
