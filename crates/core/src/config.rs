use std::path::PathBuf;

use crate::error::{Result, XrefError};

/// Cumulative size budget used when nothing else is configured.
pub const DEFAULT_SIZE_BUDGET: u64 = 500_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    pub input_dir: PathBuf,
    /// Upper bound on the summed size of the selected metadata files, in bytes.
    pub size_budget: u64,
    pub output_dir: PathBuf,
    /// Create `output_dir` (and parents) when it does not exist yet.
    pub create_output_dir: bool,
}

impl IndexConfig {
    pub fn new(
        input_dir: impl Into<PathBuf>,
        size_budget: u64,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            size_budget,
            output_dir: output_dir.into(),
            create_output_dir: true,
        }
    }

    pub fn create_output_dir(mut self, enabled: bool) -> Self {
        self.create_output_dir = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_dir.as_os_str().is_empty() {
            return Err(XrefError::Config("input_dir must be set".to_string()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(XrefError::Config("output_dir must be set".to_string()));
        }
        Ok(())
    }
}

/// Parses a byte budget such as `500000000`, `500M`, `2.5G` or `64k`.
/// Suffixes are decimal (`K` = 1000).
pub fn parse_size(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(XrefError::Config("size budget is empty".to_string()));
    }
    let invalid = || XrefError::Config(format!("invalid size budget '{trimmed}'"));
    let (number, multiplier) = match trimmed.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => {
            let multiplier: u64 = match c.to_ascii_uppercase() {
                'B' => 1,
                'K' => 1_000,
                'M' => 1_000_000,
                'G' => 1_000_000_000,
                'T' => 1_000_000_000_000,
                _ => return Err(invalid()),
            };
            (trimmed[..idx].trim(), multiplier)
        }
        _ => (trimmed, 1),
    };
    if let Ok(value) = number.parse::<u64>() {
        return value.checked_mul(multiplier).ok_or_else(invalid);
    }
    let value: f64 = number.parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    let bytes = (value * multiplier as f64).round();
    if bytes > u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(bytes as u64)
}
