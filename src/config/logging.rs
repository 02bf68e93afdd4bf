use {crate::Result, serde::Deserialize};

///
/// Configuration for logging and tracing.
///
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Format for log output.
    /// The default format is `default`, which is "full" human-readable format.
    /// Other options are `json`, `compact`, and `pretty`.
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Default,
    Compact,
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn test_log_formats_parse_lowercase() {
        for (text, format) in [
            ("json", LogFormat::Json),
            ("default", LogFormat::Default),
            ("compact", LogFormat::Compact),
            ("pretty", LogFormat::Pretty),
        ] {
            let config: Config = format!("[logging]\nformat = \"{text}\"").parse().unwrap();
            assert_eq!(config.logging.format, format);
        }
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        let result = "[logging]\nformat = \"xml\"".parse::<Config>();
        assert!(result.is_err());
    }
}
