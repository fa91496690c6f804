//! Run modes and command-line value parsing

use std::fmt;

use crate::core::error::{Error, Result};

/// What a single invocation does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Print the registered template names
    List,
    /// Generate one named template
    Template(String),
    /// Generate every registered template
    All,
}

impl RunMode {
    /// Build the mode from the three mutually exclusive mode flags.
    ///
    /// Exactly one must be set; anything else is `InvalidArguments`.
    pub fn from_flags(list: bool, template: Option<String>, all: bool) -> Result<Self> {
        let given = usize::from(list) + usize::from(template.is_some()) + usize::from(all);
        match (given, template) {
            (1, Some(name)) if name.trim().is_empty() => {
                Err(Error::invalid_arguments("template name cannot be empty"))
            }
            (1, Some(name)) => Ok(Self::Template(name)),
            (1, None) if list => Ok(Self::List),
            (1, None) => Ok(Self::All),
            (0, _) => Err(Error::invalid_arguments(
                "one of --list, --template or --all is required",
            )),
            _ => Err(Error::invalid_arguments(
                "--list, --template and --all are mutually exclusive",
            )),
        }
    }

    /// True for the modes that write files
    pub fn generates(&self) -> bool {
        !matches!(self, Self::List)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Template(name) => write!(f, "template:{name}"),
            Self::All => write!(f, "all"),
        }
    }
}

/// Parse a `KEY=VALUE` template parameter.
///
/// Only the first `=` splits, so values may contain `=`.
pub fn parse_param(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
