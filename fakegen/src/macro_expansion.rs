use std::env;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use crate::Result;

/// Expand the macros of `crate_path` and pretty print it as a single file.
///
/// `extern` blocks produced by macros only become visible to the generator
/// after expansion. Each `(key, value)` pair of `cfg` is passed as `--cfg`.
pub fn expand<P: AsRef<Path>>(crate_path: P, cfg: &[(String, Option<String>)]) -> Result<String> {
    let crate_path = crate_path.as_ref().canonicalize()?;
    let rustc = env::var_os("RUSTC").unwrap_or_else(|| OsString::from("rustc"));

    let mut cmd = Command::new(rustc);
    // -Zunpretty needs a nightly compiler, or a stable one told to pretend.
    cmd.env("RUSTC_BOOTSTRAP", "1")
        .args(["-Zunpretty=expanded", "--crate-type=lib", "--edition=2024"])
        .args(
            cfg.iter()
                .flat_map(|(key, value)| ["--cfg".to_string(), cfg_flag(key, value.as_deref())]),
        )
        .arg(&crate_path);

    let output = cmd.output()?;
    if !output.status.success() {
        return Err(format!(
            "failed to expand `{}`:\n{}",
            crate_path.display(),
            String::from_utf8_lossy(&output.stderr)
        )
        .into());
    }

    Ok(String::from_utf8(output.stdout)?)
}

/// Spell a cfg as rustc takes it: `unix` or `feature="std"`.
fn cfg_flag(key: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => format!("{key}=\"{value}\""),
        None => key.to_string(),
    }
}
