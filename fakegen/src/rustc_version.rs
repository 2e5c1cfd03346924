use std::{env, fmt::Display, process::Command};

use crate::Result;

/// Represents the version of the rustc compiler the generated code targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RustcVersion {
    major: u8,
    minor: u8,
    patch: u8,
}

impl RustcVersion {
    /// Define a rustc version with the given major.minor.patch.
    pub fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse the output of `rustc --version`.
    pub fn parse(version: &str) -> Result<Self> {
        // eg: rustc 1.87.0-(optionally nightly) (17067e9ac 2025-05-09)
        // Assume the format does not change.
        let numbers = version
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| format!("unexpected rustc version output: {version:?}"))?
            .split('.')
            .take(3)
            .map(|s| {
                s.chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect::<String>()
                    .parse::<u8>()
            })
            .collect::<Result<Vec<u8>, _>>()?;

        match numbers[..] {
            [major, minor, patch] => Ok(Self::new(major, minor, patch)),
            _ => Err(format!("unexpected rustc version output: {version:?}").into()),
        }
    }
}

impl Display for RustcVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Return the version of `$RUSTC`, or of `rustc` when unset.
pub fn rustc_version() -> Result<RustcVersion> {
    let rustc = env::var("RUSTC").unwrap_or_else(|_| String::from("rustc"));

    let output = Command::new(rustc).arg("--version").output()?;

    if !output.status.success() {
        let error = std::str::from_utf8(&output.stderr)?;
        return Err(error.into());
    }

    RustcVersion::parse(std::str::from_utf8(&output.stdout)?)
}
