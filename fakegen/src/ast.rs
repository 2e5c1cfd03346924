//! Foreign items collected from Rust source.

use crate::BoxStr;

/// The calling convention of an `extern` block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Abi {
    /// `extern "C"`, also what a bare `extern` means.
    C,
    /// `extern "Rust"`.
    Rust,
    /// Any other named ABI such as `"system"`.
    Other(BoxStr),
}

impl From<&syn::Abi> for Abi {
    fn from(abi: &syn::Abi) -> Self {
        match abi.name.as_ref().map(|s| s.value()).as_deref() {
            None | Some("C") => Abi::C,
            Some("Rust") => Abi::Rust,
            Some(other) => Abi::Other(other.into()),
        }
    }
}

impl Abi {
    /// The string literal this ABI is written with.
    pub fn as_str(&self) -> &str {
        match self {
            Abi::C => "C",
            Abi::Rust => "Rust",
            Abi::Other(s) => s,
        }
    }
}

/// A parameter of a foreign function.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub(crate) ident: BoxStr,
    pub(crate) ty: syn::Type,
}

impl Parameter {
    /// Name of the parameter, `argN` when the declaration left it out.
    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// Declared type of the parameter.
    pub fn ty(&self) -> &syn::Type {
        &self.ty
    }
}

/// A function declared inside an `extern` block.
#[derive(Debug, Clone)]
pub struct Fn {
    pub(crate) public: bool,
    pub(crate) abi: Abi,
    pub(crate) ident: BoxStr,
    pub(crate) link_name: Option<BoxStr>,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) return_type: Option<syn::Type>,
    pub(crate) variadic: bool,
    pub(crate) line: usize,
}

impl Fn {
    /// Name of the function in Rust.
    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// The symbol the function is linked against, from `#[link_name]` if set.
    pub fn link_name(&self) -> Option<&str> {
        self.link_name.as_deref()
    }

    /// The symbol a fake of this function has to define.
    pub fn symbol(&self) -> &str {
        self.link_name().unwrap_or(self.ident())
    }

    /// ABI of the enclosing `extern` block.
    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// Whether the declaration is `pub` or otherwise visible.
    pub fn is_public(&self) -> bool {
        self.public
    }

    /// Fixed parameters, in order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Declared return type, `None` for functions returning nothing.
    pub fn return_type(&self) -> Option<&syn::Type> {
        self.return_type.as_ref()
    }

    /// Whether the parameter list ends with `...`.
    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// Line of the declaration in the parsed source, 1-based.
    pub fn line(&self) -> usize {
        self.line
    }
}
