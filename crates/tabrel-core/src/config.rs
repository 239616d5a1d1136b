//! I/O configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Column delimiter.
    pub delimiter: char,

    /// Separator between a column name and its type in typed headers.
    pub type_delimiter: char,

    /// Whether headers carry `name<type_delimiter>type` annotations.
    pub typed: bool,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            type_delimiter: ':',
            typed: false,
        }
    }
}

impl IoConfig {
    pub fn typed() -> Self {
        Self {
            typed: true,
            ..Self::default()
        }
    }

    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `TABREL_DELIMITER`: single-character column delimiter
    /// - `TABREL_TYPE_DELIMITER`: single-character type annotation separator
    /// - `TABREL_TYPED`: `true`/`false`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("TABREL_DELIMITER") {
            if let Ok(c) = single_char(&s) {
                cfg.delimiter = c;
            }
        }

        if let Ok(s) = std::env::var("TABREL_TYPE_DELIMITER") {
            if let Ok(c) = single_char(&s) {
                cfg.type_delimiter = c;
            }
        }

        if let Ok(s) = std::env::var("TABREL_TYPED") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.typed = v;
            }
        }

        cfg
    }

    /// Reject configurations the readers cannot honour.
    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(Error::Config(format!(
                "delimiter '{}' must be a single ASCII character",
                self.delimiter
            )));
        }
        // The csv layer reserves these for quoting and record boundaries.
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(Error::Config(format!(
                "delimiter {:?} is reserved",
                self.delimiter
            )));
        }
        if self.typed && self.type_delimiter == self.delimiter {
            return Err(Error::Config(
                "type delimiter must differ from the column delimiter".into(),
            ));
        }
        Ok(())
    }
}

/// Parse a one-character option value (`","`, `"\t"`, ...).
pub fn single_char(s: &str) -> Result<char> {
    let unescaped = match s {
        "\\t" => "\t",
        other => other,
    };
    let mut chars = unescaped.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Error::Config(format!("expected a single character, got '{s}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = IoConfig::default();
        assert_eq!(cfg.delimiter, ',');
        assert_eq!(cfg.type_delimiter, ':');
        assert!(!cfg.typed);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn single_char_parsing() {
        assert_eq!(single_char(";").unwrap(), ';');
        assert_eq!(single_char("\\t").unwrap(), '\t');
        assert!(single_char("ab").is_err());
        assert!(single_char("").is_err());
    }

    #[test]
    fn rejects_clashing_delimiters() {
        let cfg = IoConfig {
            delimiter: ':',
            ..IoConfig::typed()
        };
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn rejects_reserved_delimiters() {
        for delimiter in ['"', '\n', '\r'] {
            let cfg = IoConfig {
                delimiter,
                ..IoConfig::default()
            };
            assert!(matches!(cfg.validate(), Err(Error::Config(_))));
        }
        let tab = IoConfig {
            delimiter: '\t',
            ..IoConfig::default()
        };
        assert!(tab.validate().is_ok());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: IoConfig = serde_json::from_str(r#"{"typed": true}"#).unwrap();
        assert_eq!(cfg, IoConfig::typed());
    }
}
