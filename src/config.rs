// src/config.rs

use crate::common::{check_size, DftError, Result, Sign, TRANS_SIGN};
use crate::fixed::types::FixedFormat;

pub const DEFAULT_N: usize = 32;

/// Environment overrides, applied on top of the defaults and below the
/// command line.
pub const ENV_WIDTH: &str = "DFTGEN_WIDTH";
pub const ENV_FRAC: &str = "DFTGEN_FRAC";
pub const ENV_SIGN: &str = "DFTGEN_SIGN";

/// Everything one pipeline generation depends on. Two generations from equal
/// configs produce byte-identical text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub n: usize,
    pub name: String,
    pub format: FixedFormat,
    pub sign: Sign,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_N, Self::default_name(DEFAULT_N))
    }
}

impl GeneratorConfig {
    pub fn new(n: usize, name: impl Into<String>) -> Self {
        Self {
            n,
            name: name.into(),
            format: FixedFormat::default(),
            sign: TRANS_SIGN,
        }
    }

    pub fn with_format(mut self, format: FixedFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_sign(mut self, sign: Sign) -> Self {
        self.sign = sign;
        self
    }

    /// Module name used when none is given.
    pub fn default_name(n: usize) -> String {
        format!("idft_comp_N{}", n)
    }

    /// Rejects sizes and names the generator cannot turn into a valid module.
    pub fn validate(&self) -> Result<()> {
        check_size(self.n)?;
        if !is_identifier(&self.name) {
            return Err(DftError::InvalidName(self.name.clone()));
        }
        // Re-check in case the fields were assembled by hand
        FixedFormat::new(self.format.width(), self.format.frac())?;
        Ok(())
    }

    /// Applies `DFTGEN_*` overrides from any key/value source.
    pub fn apply_vars<I, K, V>(mut self, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut width = self.format.width();
        let mut frac = self.format.frac();

        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                ENV_WIDTH => width = parse_setting(ENV_WIDTH, value)?,
                ENV_FRAC => frac = parse_setting(ENV_FRAC, value)?,
                ENV_SIGN => self.sign = value.parse()?,
                _ => {}
            }
        }

        self.format = FixedFormat::new(width, frac)?;
        Ok(self)
    }
}

fn parse_setting(key: &'static str, value: &str) -> Result<u32> {
    value.trim().parse().map_err(|_| DftError::InvalidSetting {
        key,
        value: value.to_string(),
    })
}

/// Verilog simple identifier: a letter or underscore, then letters, digits,
/// underscores or dollar signs.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.n, 32);
        assert_eq!(config.name, "idft_comp_N32");
        assert_eq!(config.format, FixedFormat::new(24, 8).unwrap());
        assert_eq!(config.sign, Sign::Positive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            GeneratorConfig::new(12, "dft").validate(),
            Err(DftError::NotPowerOfTwo(12))
        );
        assert_eq!(
            GeneratorConfig::new(1, "dft").validate(),
            Err(DftError::SizeTooSmall(1))
        );
        assert_eq!(
            GeneratorConfig::new(8, "8bad").validate(),
            Err(DftError::InvalidName("8bad".to_string()))
        );
        assert!(GeneratorConfig::new(2, "_x$1").validate().is_ok());
    }

    #[test]
    fn test_apply_vars() {
        let config = GeneratorConfig::new(8, "dft")
            .apply_vars([(ENV_WIDTH, "16"), (ENV_FRAC, "4"), (ENV_SIGN, "-1"), ("PATH", "/bin")])
            .unwrap();
        assert_eq!(config.format, FixedFormat::new(16, 4).unwrap());
        assert_eq!(config.sign, Sign::Negative);

        let untouched = GeneratorConfig::new(8, "dft")
            .apply_vars(Vec::<(String, String)>::new())
            .unwrap();
        assert_eq!(untouched, GeneratorConfig::new(8, "dft"));
    }

    #[test]
    fn test_apply_vars_errors() {
        assert_eq!(
            GeneratorConfig::default().apply_vars([(ENV_WIDTH, "wide")]),
            Err(DftError::InvalidSetting { key: ENV_WIDTH, value: "wide".to_string() })
        );
        // FRAC 23 leaves no room for the integer bit of 1.0 in 24 bits
        assert_eq!(
            GeneratorConfig::default().apply_vars([(ENV_FRAC, "23")]),
            Err(DftError::InvalidFormat { width: 24, frac: 23 })
        );
        assert!(GeneratorConfig::default().apply_vars([(ENV_SIGN, "0")]).is_err());
    }
}
