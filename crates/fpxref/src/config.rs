use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use fpxref_core::{parse_size, IndexConfig, DEFAULT_SIZE_BUDGET};
use serde::Deserialize;

use crate::cli::SourceArgs;

pub const DEFAULT_CONFIG: &str = "fpxref.toml";

/// Contents of `fpxref.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub budget: Option<SizeValue>,
    #[serde(default)]
    pub input: InputSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSection {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub create_dir: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SizeValue {
    Bytes(u64),
    Text(String),
}

impl SizeValue {
    fn to_bytes(&self) -> Result<u64> {
        match self {
            SizeValue::Bytes(bytes) => Ok(*bytes),
            SizeValue::Text(raw) => Ok(parse_size(raw)?),
        }
    }
}

/// Overrides read from `FPXREF_*` environment variables.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub size_budget: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            input_dir: non_empty("FPXREF_INPUT_DIR").map(PathBuf::from),
            output_dir: non_empty("FPXREF_OUTPUT_DIR").map(PathBuf::from),
            size_budget: non_empty("FPXREF_SIZE_BUDGET"),
        }
    }
}

/// Loads the config file. An explicitly named file must exist; the default
/// one is optional.
pub fn load(explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            if !default.exists() {
                return Ok(FileConfig::default());
            }
            default
        }
    };
    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid config {}", path.display()))
}

pub fn parse(contents: &str) -> Result<FileConfig> {
    toml::from_str(contents).map_err(|e| anyhow!("{e}"))
}

/// Precedence: CLI flag, then environment, then config file, then default.
pub struct Resolver<'a> {
    pub file: &'a FileConfig,
    pub env: &'a EnvOverrides,
}

impl Resolver<'_> {
    pub fn input_dir(&self, source: &SourceArgs) -> Result<PathBuf> {
        source
            .input
            .clone()
            .or_else(|| self.env.input_dir.clone())
            .or_else(|| self.file.input.dir.clone())
            .ok_or_else(|| {
                anyhow!(
                    "input directory not configured \
                     (use --input, FPXREF_INPUT_DIR or [input] dir)"
                )
            })
    }

    pub fn size_budget(&self, source: &SourceArgs) -> Result<u64> {
        if let Some(raw) = source.budget.as_deref() {
            return parse_size(raw).context("invalid --budget");
        }
        if let Some(raw) = self.env.size_budget.as_deref() {
            return parse_size(raw).context("invalid FPXREF_SIZE_BUDGET");
        }
        match &self.file.budget {
            Some(value) => value.to_bytes().context("invalid budget in config"),
            None => Ok(DEFAULT_SIZE_BUDGET),
        }
    }

    pub fn output_dir(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        flag.or_else(|| self.env.output_dir.clone())
            .or_else(|| self.file.output.dir.clone())
            .ok_or_else(|| {
                anyhow!(
                    "output directory not configured \
                     (use --output, FPXREF_OUTPUT_DIR or [output] dir)"
                )
            })
    }

    pub fn index_config(
        &self,
        source: &SourceArgs,
        output: Option<PathBuf>,
        no_create_output: bool,
    ) -> Result<IndexConfig> {
        let create = !no_create_output && self.file.output.create_dir.unwrap_or(true);
        let cfg = IndexConfig::new(
            self.input_dir(source)?,
            self.size_budget(source)?,
            self.output_dir(output)?,
        )
        .create_output_dir(create);
        cfg.validate()?;
        Ok(cfg)
    }
}
