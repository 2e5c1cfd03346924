use syn::visit::Visit;

use crate::{Abi, BoxStr, Fn, Parameter};

/// Functions declared in `extern` blocks, in source order.
#[derive(Default, Clone, Debug)]
pub(crate) struct FfiItems {
    foreign_functions: Vec<Fn>,
}

impl FfiItems {
    /// Creates a new blank FfiItems.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Return a list of all foreign functions found.
    pub(crate) fn foreign_functions(&self) -> &Vec<Fn> {
        &self.foreign_functions
    }
}

/// Determine whether an item is visible outside of its module.
fn is_visible(vis: &syn::Visibility) -> bool {
    !matches!(vis, syn::Visibility::Inherited)
}

/// Return the value of `#[link_name = "..."]`, if present.
fn link_name(attrs: &[syn::Attribute]) -> Option<BoxStr> {
    attrs.iter().find_map(|attr| {
        if !attr.path().is_ident("link_name") {
            return None;
        }
        match &attr.meta {
            syn::Meta::NameValue(syn::MetaNameValue {
                value:
                    syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(s),
                        ..
                    }),
                ..
            }) => Some(s.value().into_boxed_str()),
            _ => None,
        }
    })
}

/// Name of a parameter pattern, or `argN` for `_` and other patterns.
fn parameter_ident(pat: &syn::Pat, position: usize) -> BoxStr {
    match pat {
        syn::Pat::Ident(pat_ident) => pat_ident.ident.to_string().into_boxed_str(),
        _ => format!("arg{position}").into_boxed_str(),
    }
}

/// Line a span starts on, available since the source was parsed from text.
fn line(span: proc_macro2::Span) -> usize {
    span.start().line
}

fn visit_foreign_item_fn(abi: &Abi, item: &syn::ForeignItemFn) -> Fn {
    let parameters = item
        .sig
        .inputs
        .iter()
        .enumerate()
        .filter_map(|(position, input)| match input {
            syn::FnArg::Typed(pat_type) => Some(Parameter {
                ident: parameter_ident(&pat_type.pat, position),
                ty: (*pat_type.ty).clone(),
            }),
            // A receiver cannot appear in a foreign function.
            syn::FnArg::Receiver(_) => None,
        })
        .collect();

    let return_type = match &item.sig.output {
        syn::ReturnType::Default => None,
        syn::ReturnType::Type(_, ty) => Some((**ty).clone()),
    };

    Fn {
        public: is_visible(&item.vis),
        abi: abi.clone(),
        ident: item.sig.ident.to_string().into_boxed_str(),
        link_name: link_name(&item.attrs),
        parameters,
        return_type,
        variadic: item.sig.variadic.is_some(),
        line: line(item.sig.ident.span()),
    }
}

impl<'ast> Visit<'ast> for FfiItems {
    fn visit_item_foreign_mod(&mut self, i: &'ast syn::ItemForeignMod) {
        let abi = Abi::from(&i.abi);
        for item in &i.items {
            if let syn::ForeignItem::Fn(f) = item {
                self.foreign_functions.push(visit_foreign_item_fn(&abi, f));
            }
        }
    }
}
