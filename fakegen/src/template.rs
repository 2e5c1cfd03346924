use askama::Template;
use quote::ToTokens;

use crate::translator::{TranslationError, Translator};
use crate::{Abi, Fn, GenerationError, RustcVersion};

/// Prefix of the names generated code introduces next to user parameters.
pub(crate) const RESERVED_PREFIX: &str = "fakegen_";
/// Prefix of the Rust symbol a variadic C shim forwards to.
pub(crate) const VA_FORWARD_PREFIX: &str = "fakegen_va_";

/// Represents the Rust side of the generated fakes.
#[derive(Template, Clone)]
#[template(path = "fakes.rs", escape = "none")]
pub(crate) struct RustFakesTemplate {
    source: String,
    history_len: String,
    fakes: Vec<RustFake>,
}

/// Represents the C side of the generated fakes, one shim per variadic function.
#[derive(Template, Clone)]
#[template(path = "fakes.c", escape = "none")]
pub(crate) struct CFakesTemplate {
    source: String,
    headers: Vec<String>,
    attributes: String,
    shims: Vec<CShim>,
}

/// One item of the generated `fake!` block.
#[derive(Debug, Clone)]
pub(crate) struct RustFake {
    attribute: String,
    signature: String,
}

#[derive(Debug, Clone)]
pub(crate) struct CShim {
    symbol: String,
    forward_symbol: String,
    return_type: String,
    returns_void: bool,
    parameters: String,
    arguments: String,
    last_parameter: String,
}

impl RustFakesTemplate {
    /// Create a new template faking the given functions.
    pub(crate) fn new(
        source: &str,
        fns: &[&Fn],
        history_len: Option<usize>,
        rustc_version: RustcVersion,
    ) -> Self {
        let unsafe_attributes = rustc_version >= RustcVersion::new(1, 82, 0);
        Self {
            source: source.to_string(),
            history_len: history_len
                .map(|len| format!("history_len = {len};"))
                .unwrap_or_default(),
            fakes: fns
                .iter()
                .map(|f| RustFake {
                    attribute: export_attribute(f, unsafe_attributes),
                    signature: rust_signature(f),
                })
                .collect(),
        }
    }
}

impl CFakesTemplate {
    /// Create a new template with shims for the variadic functions in `fns`.
    pub(crate) fn new(
        source: &str,
        headers: &[String],
        attributes: Option<&str>,
        fns: &[&Fn],
    ) -> Result<Self, GenerationError> {
        let translator = Translator::new();
        let shims = fns
            .iter()
            .filter(|f| f.is_variadic())
            .map(|f| c_shim(&translator, f))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: source.to_string(),
            headers: headers.to_vec(),
            attributes: attributes.map(|a| format!("{a} ")).unwrap_or_default(),
            shims,
        })
    }

    /// Whether any shim has to be compiled.
    pub(crate) fn is_empty(&self) -> bool {
        self.shims.is_empty()
    }
}

/// The attribute that gives a fake the symbol C code links against.
///
/// Variadic functions are defined by the C shim, the fake takes the forwarding
/// symbol instead.
fn export_attribute(f: &Fn, unsafe_attributes: bool) -> String {
    let symbol = if f.is_variadic() {
        format!("{VA_FORWARD_PREFIX}{}", f.symbol())
    } else {
        f.symbol().to_string()
    };

    match (symbol == f.ident(), unsafe_attributes) {
        (true, true) => "#[unsafe(no_mangle)]".to_string(),
        (true, false) => "#[no_mangle]".to_string(),
        (false, true) => format!("#[unsafe(export_name = \"{symbol}\")]"),
        (false, false) => format!("#[export_name = \"{symbol}\"]"),
    }
}

/// Render the fake declaration, e.g. `pub extern "C" fn f(a: c_int, ...) -> c_int`.
fn rust_signature(f: &Fn) -> String {
    let mut parameters = f
        .parameters()
        .iter()
        .map(|p| format!("{}: {}", p.ident(), p.ty().to_token_stream()))
        .collect::<Vec<_>>();
    if f.is_variadic() {
        parameters.push("...".to_string());
    }

    let ret = f
        .return_type()
        .map(|ty| format!(" -> {}", ty.to_token_stream()))
        .unwrap_or_default();

    format!(
        "pub extern \"{}\" fn {}({}){}",
        f.abi().as_str(),
        f.ident(),
        parameters.join(", "),
        ret
    )
}

/// Place a declarator name inside a C type, `int(*)(void)` becomes `int(*cb)(void)`.
pub(crate) fn c_declaration(ty: &str, name: &str) -> String {
    if ty.contains("(*)") {
        ty.replacen("(*)", &format!("(*{name})"), 1)
    } else if let Some(bracket) = ty.find('[') {
        format!("{} {}{}", &ty[..bracket], name, &ty[bracket..])
    } else {
        format!("{ty} {name}")
    }
}

fn c_shim(translator: &Translator, f: &Fn) -> Result<CShim, GenerationError> {
    let translation = |source: TranslationError| GenerationError::Translation {
        ident: f.ident().to_string(),
        source,
    };

    debug_assert_eq!(f.abi(), &Abi::C);
    let return_type = match f.return_type() {
        Some(ty) => translator.translate_type(ty).map_err(translation)?,
        None => "void".to_string(),
    };
    if return_type.contains("(*)") || return_type.contains('[') {
        return Err(GenerationError::UnsupportedShimReturn {
            ident: f.ident().to_string(),
            ty: return_type,
        });
    }

    let parameters = f
        .parameters()
        .iter()
        .map(|p| {
            translator
                .translate_type(p.ty())
                .map(|ty| c_declaration(&ty, p.ident()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(translation)?;
    let arguments = f
        .parameters()
        .iter()
        .map(|p| p.ident())
        .collect::<Vec<_>>();
    let last_parameter = arguments
        .last()
        .ok_or_else(|| GenerationError::VariadicWithoutFixedParameter(f.ident().to_string()))?
        .to_string();

    Ok(CShim {
        symbol: f.symbol().to_string(),
        forward_symbol: format!("{VA_FORWARD_PREFIX}{}", f.symbol()),
        returns_void: return_type == "void",
        return_type,
        parameters: parameters.join(", "),
        arguments: arguments.join(", "),
        last_parameter,
    })
}
