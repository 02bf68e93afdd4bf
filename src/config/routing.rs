use {crate::Result, serde::Deserialize};

///
/// Options that change how templates are compiled and how captured values are
/// handed to handlers.
///
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Escape regex metacharacters in literal segments so `/v1.0` only matches
    /// itself. Turning this off copies literals into the compiled expression as-is.
    /// The default is `true`.
    #[serde(default = "RoutingConfig::default_escape_literals")]
    pub escape_literals: bool,

    /// Percent-decode path captures before handing them to handlers, so
    /// `/users/John%20Doe` yields `John Doe`. The default is `true`.
    #[serde(default = "RoutingConfig::default_decode_path_params")]
    pub decode_path_params: bool,
}

impl RoutingConfig {
    /// Sets whether literal segments are escaped.
    pub fn with_escape_literals(mut self, enable: bool) -> Self {
        self.escape_literals = enable;
        self
    }

    /// Sets whether path captures are percent-decoded.
    pub fn with_decode_path_params(mut self, enable: bool) -> Self {
        self.decode_path_params = enable;
        self
    }

    fn default_escape_literals() -> bool {
        true
    }

    fn default_decode_path_params() -> bool {
        true
    }

    pub fn validate(&self) -> Result<()> {
        if !self.escape_literals {
            tracing::warn!(
                "Routing literal escaping is disabled; regex metacharacters in route templates will be interpreted"
            );
        }
        Ok(())
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        RoutingConfig {
            escape_literals: Self::default_escape_literals(),
            decode_path_params: Self::default_decode_path_params(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn test_routing_defaults() {
        let config: Config = "[routing]".parse().unwrap();
        assert!(config.routing.escape_literals);
        assert!(config.routing.decode_path_params);
        assert_eq!(config.routing, RoutingConfig::default());
    }

    #[test]
    fn test_routing_from_toml() {
        let config: Config = r#"
[routing]
escape_literals = false
decode_path_params = false
        "#
        .parse()
        .unwrap();

        assert!(!config.routing.escape_literals);
        assert!(!config.routing.decode_path_params);
        assert!(config.validate().is_ok());
    }
}
