use std::{
    collections::HashSet,
    env, fmt,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use askama::Template;
use syn::visit::Visit;
use thiserror::Error;

use crate::{
    Abi, Fn, MAX_ARGS, Result, RustcVersion, TranslationError, expand,
    ffi_items::FfiItems,
    rustc_version,
    template::{CFakesTemplate, RESERVED_PREFIX, RustFakesTemplate},
};

/// An error that makes a foreign function impossible to fake.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    /// More parameters than [`MAX_ARGS`].
    #[error("`{ident}` takes {count} parameters, fakes take at most {max}")]
    TooManyParameters {
        /// The function.
        ident: String,
        /// Parameters it takes, the `va_list` handle included.
        count: usize,
        /// The limit.
        max: usize,
    },
    /// `va_start` needs a named parameter to start from.
    #[error("variadic `{0}` needs at least one fixed parameter")]
    VariadicWithoutFixedParameter(String),
    /// Only C-ABI variadic functions can be forwarded through a shim.
    #[error("variadic `{ident}` uses the \"{abi}\" ABI, only \"C\" can be forwarded")]
    VariadicAbi {
        /// The function.
        ident: String,
        /// Its ABI.
        abi: String,
    },
    /// A fake has to return something.
    #[error("`{0}` never returns and cannot be faked")]
    Diverging(String),
    /// Two declarations resolve to the same symbol.
    #[error("symbol `{0}` would be faked twice")]
    DuplicateSymbol(String),
    /// Two declarations share a Rust name, which one `fake!` block cannot hold.
    #[error("`{0}` is declared more than once")]
    DuplicateIdent(String),
    /// A parameter name collides with names the generated code uses.
    #[error("`{ident}` has a parameter `{parameter}`, names starting with `fakegen_` are reserved")]
    ReservedParameter {
        /// The function.
        ident: String,
        /// The offending parameter.
        parameter: String,
    },
    /// The C shim of a variadic function cannot spell this return type.
    #[error("variadic `{ident}` returns `{ty}`, which a shim cannot return")]
    UnsupportedShimReturn {
        /// The function.
        ident: String,
        /// The translated C return type.
        ty: String,
    },
    /// A type of a variadic function has no C spelling.
    #[error("cannot write the C shim for `{ident}`: {source}")]
    Translation {
        /// The function.
        ident: String,
        /// Why the type could not be translated.
        #[source]
        source: TranslationError,
    },
}

type SkipFn = Box<dyn std::ops::Fn(&Fn) -> bool>;

/// A builder used to generate fakes for the functions of `extern` blocks.
#[non_exhaustive]
#[derive(Default)]
pub struct FakeGenerator {
    headers: Vec<String>,
    target: Option<String>,
    host: Option<String>,
    includes: Vec<PathBuf>,
    out_dir: Option<PathBuf>,
    cfg: Vec<(String, Option<String>)>,
    expand_macros: bool,
    arg_history_len: Option<usize>,
    function_attributes: Option<String>,
    rustc_version: Option<RustcVersion>,
    skips: Vec<SkipFn>,
}

impl fmt::Debug for FakeGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeGenerator")
            .field("headers", &self.headers)
            .field("target", &self.target)
            .field("host", &self.host)
            .field("includes", &self.includes)
            .field("out_dir", &self.out_dir)
            .field("cfg", &self.cfg)
            .field("expand_macros", &self.expand_macros)
            .field("arg_history_len", &self.arg_history_len)
            .field("function_attributes", &self.function_attributes)
            .field("rustc_version", &self.rustc_version)
            .field("skips", &self.skips.len())
            .finish()
    }
}

/// Paths of the files written by [`FakeGenerator::generate_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    /// The `fake!` block, to be `include!`d by the test crate.
    pub rust: PathBuf,
    /// Shims for variadic functions.
    pub c: PathBuf,
    /// Whether the C file defines anything and needs compiling.
    pub has_shims: bool,
}

impl FakeGenerator {
    /// Creates a new blank fake generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header to be included by the generated C shims.
    pub fn header(&mut self, header: &str) -> &mut Self {
        self.headers.push(header.to_string());
        self
    }

    /// Configures the target to compile the C shims for.
    pub fn target(&mut self, target: &str) -> &mut Self {
        self.target = Some(target.to_string());
        self
    }

    /// Configures the host.
    pub fn host(&mut self, host: &str) -> &mut Self {
        self.host = Some(host.to_string());
        self
    }

    /// Add a path to the C compiler header lookup path.
    pub fn include<P: AsRef<Path>>(&mut self, p: P) -> &mut Self {
        self.includes.push(p.as_ref().to_owned());
        self
    }

    /// Configures the output directory of the generated Rust and C code.
    ///
    /// Defaults to `OUT_DIR`.
    pub fn out_dir<P: AsRef<Path>>(&mut self, p: P) -> &mut Self {
        self.out_dir = Some(p.as_ref().to_owned());
        self
    }

    /// Set a `--cfg` flag used when expanding macros.
    pub fn cfg(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        self.cfg
            .push((key.to_string(), value.map(|v| v.to_string())));
        self
    }

    /// Expand macros with `rustc -Zunpretty=expanded` before collecting
    /// functions, for `extern` blocks that are produced by macros.
    pub fn expand_macros(&mut self, expand: bool) -> &mut Self {
        self.expand_macros = expand;
        self
    }

    /// History capacity of every generated fake.
    pub fn arg_history_len(&mut self, len: usize) -> &mut Self {
        self.arg_history_len = Some(len);
        self
    }

    /// Text placed in front of every generated C shim definition, such as
    /// `__attribute__((weak))`.
    pub fn function_attributes(&mut self, attributes: &str) -> &mut Self {
        self.function_attributes = Some(attributes.to_string());
        self
    }

    /// Generate code for this compiler instead of querying `$RUSTC`.
    pub fn rustc_version(&mut self, version: RustcVersion) -> &mut Self {
        self.rustc_version = Some(version);
        self
    }

    /// Do not fake the functions for which `f` returns true.
    pub fn skip_fn(&mut self, f: impl std::ops::Fn(&Fn) -> bool + 'static) -> &mut Self {
        self.skips.push(Box::new(f));
        self
    }

    /// Generate fakes for the `extern` functions of `crate_path`, and compile
    /// the C shims into `lib<stem>.a` when there are variadic functions.
    ///
    /// Meant to be called from a build script.
    pub fn generate<P: AsRef<Path>>(&mut self, crate_path: P, output_file_path: P) -> Result<()> {
        println!("cargo:rerun-if-changed={}", crate_path.as_ref().display());
        let files = self.generate_files(crate_path, output_file_path)?;
        if !files.has_shims {
            return Ok(());
        }

        let target = match &self.target {
            Some(target) => target.clone(),
            None => env::var("TARGET")?,
        };
        let host = match &self.host {
            Some(host) => host.clone(),
            None => env::var("HOST")?,
        };

        let mut cfg = cc::Build::new();
        cfg.file(&files.c);
        cfg.host(&host);
        if target.contains("msvc") {
            cfg.flag("/W3")
                .flag("/WX")
                .flag("/wd4100") // unused parameters
                .flag("/wd4996"); // deprecated functions
        } else {
            cfg.flag("-Wall")
                .flag("-Wextra")
                .flag("-Werror")
                .flag("-Wno-unused-parameter")
                .flag("-Wno-unknown-warning-option")
                .flag("-Wno-deprecated-declarations"); // allow deprecated items
        }

        for p in &self.includes {
            cfg.include(p);
        }

        let stem = files
            .c
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or("output file needs a UTF-8 file name")?;
        let out_dir = files.c.parent().ok_or("output file has no parent")?;
        cfg.target(&target).out_dir(out_dir).try_compile(stem)?;

        Ok(())
    }

    /// Generate the Rust and C files without compiling anything.
    pub fn generate_files<P: AsRef<Path>>(
        &mut self,
        crate_path: P,
        output_file_path: P,
    ) -> Result<GeneratedFiles> {
        let source = if self.expand_macros {
            expand(&crate_path, &self.cfg)?
        } else {
            fs::read_to_string(&crate_path)?
        };
        let ast = syn::parse_file(&source)?;

        let mut ffi_items = FfiItems::new();
        ffi_items.visit_file(&ast);
        let fns = self.select(&ffi_items)?;

        let rustc_version = match self.rustc_version {
            Some(version) => version,
            None => rustc_version()?,
        };

        let output_directory = match &self.out_dir {
            Some(dir) => dir.clone(),
            None => PathBuf::from(env::var_os("OUT_DIR").ok_or("OUT_DIR is not set")?),
        };
        let output_file_path = output_directory.join(output_file_path);
        let source_name = crate_path.as_ref().display().to_string();

        // Generate the Rust side of the fakes.
        let rust = RustFakesTemplate::new(&source_name, &fns, self.arg_history_len, rustc_version);
        File::create(&output_file_path)?.write_all(rust.render()?.as_bytes())?;

        // Generate the C side of the fakes.
        let c_output_path = output_file_path.with_extension("c");
        let c = CFakesTemplate::new(
            &source_name,
            &self.headers,
            self.function_attributes.as_deref(),
            &fns,
        )?;
        File::create(&c_output_path)?.write_all(c.render()?.as_bytes())?;

        Ok(GeneratedFiles {
            rust: output_file_path,
            c: c_output_path,
            has_shims: !c.is_empty(),
        })
    }

    /// The functions to fake, in declaration order.
    fn select<'a>(&self, ffi_items: &'a FfiItems) -> Result<Vec<&'a Fn>, GenerationError> {
        let mut symbols = HashSet::new();
        let mut idents = HashSet::new();
        let mut selected = Vec::new();

        for f in ffi_items.foreign_functions() {
            if self.skips.iter().any(|skip| skip(f)) {
                println!(
                    "cargo:warning=fakegen: skipping `{}` declared on line {}",
                    f.ident(),
                    f.line()
                );
                continue;
            }
            validate(f)?;
            if !idents.insert(f.ident()) {
                return Err(GenerationError::DuplicateIdent(f.ident().to_string()));
            }
            if !symbols.insert(f.symbol()) {
                return Err(GenerationError::DuplicateSymbol(f.symbol().to_string()));
            }
            selected.push(f);
        }

        Ok(selected)
    }
}

/// Check the constraints a fake puts on a function signature.
fn validate(f: &Fn) -> Result<(), GenerationError> {
    // A variadic fake takes the va_list handle as one more argument.
    let count = f.parameters().len() + usize::from(f.is_variadic());
    if count > MAX_ARGS {
        return Err(GenerationError::TooManyParameters {
            ident: f.ident().to_string(),
            count,
            max: MAX_ARGS,
        });
    }
    if let Some(p) = f
        .parameters()
        .iter()
        .find(|p| p.ident().starts_with(RESERVED_PREFIX))
    {
        return Err(GenerationError::ReservedParameter {
            ident: f.ident().to_string(),
            parameter: p.ident().to_string(),
        });
    }
    if matches!(f.return_type(), Some(syn::Type::Never(_))) {
        return Err(GenerationError::Diverging(f.ident().to_string()));
    }
    if f.is_variadic() {
        if f.parameters().is_empty() {
            return Err(GenerationError::VariadicWithoutFixedParameter(
                f.ident().to_string(),
            ));
        }
        if *f.abi() != Abi::C {
            return Err(GenerationError::VariadicAbi {
                ident: f.ident().to_string(),
                abi: f.abi().as_str().to_string(),
            });
        }
    }
    Ok(())
}
