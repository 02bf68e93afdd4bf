use {
    crate::{Error, Result},
    serde::Deserialize,
    std::{net::IpAddr, time::Duration},
};

///
/// Settings of the HTTP listener that hosts the router: where to bind, how long a
/// single request may take, and how long to wait for in-flight requests on shutdown.
///
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// IP address to bind the HTTP server to.
    /// The default `bind_addr` is "127.0.0.1".
    #[serde(default = "HttpConfig::default_bind_addr")]
    pub bind_addr: String,

    /// Port to bind the HTTP server to. Port 0 lets the OS choose.
    /// The default `bind_port` is 3000.
    #[serde(default = "HttpConfig::default_bind_port")]
    pub bind_port: u16,

    /// Maximum time a handler may take before the request is answered with
    /// 408 Request Timeout. By default there is no limit.
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,

    /// Maximum time to wait for in-flight requests once shutdown has started.
    /// The default is 30 seconds.
    #[serde(
        default = "HttpConfig::default_shutdown_timeout",
        with = "humantime_serde"
    )]
    pub shutdown_timeout: Duration,
}

impl HttpConfig {
    ///
    /// Returns the full bind address as a string in the format "IP:PORT".
    ///
    pub fn full_bind_addr(&self) -> String {
        match self.bind_addr.parse::<IpAddr>() {
            Ok(IpAddr::V6(addr)) => format!("[{addr}]:{}", self.bind_port),
            _ => format!("{}:{}", self.bind_addr, self.bind_port),
        }
    }

    fn default_bind_addr() -> String {
        "127.0.0.1".into()
    }

    fn default_bind_port() -> u16 {
        3000
    }

    fn default_shutdown_timeout() -> Duration {
        Duration::from_secs(30)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.trim().is_empty() {
            return Err(Error::invalid_input(
                "HTTP bind_addr is required. Set [http] bind_addr = \"0.0.0.0\" or \"127.0.0.1\" in config.",
            ));
        }

        if self.bind_addr.parse::<IpAddr>().is_err() {
            return Err(Error::invalid_input(
                "HTTP bind_addr must be a valid IP address. Examples: \"127.0.0.1\", \"0.0.0.0\", \"::1\"",
            ));
        }

        if self.request_timeout == Some(Duration::ZERO) {
            return Err(Error::invalid_input(
                "HTTP request_timeout must be > 0. Remove it from [http] to disable the timeout.",
            ));
        }

        if self.shutdown_timeout.is_zero() {
            return Err(Error::invalid_input(
                "HTTP shutdown_timeout must be > 0. Set [http] shutdown_timeout = \"30s\" in config.",
            ));
        }

        Ok(())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            bind_addr: Self::default_bind_addr(),
            bind_port: Self::default_bind_port(),
            request_timeout: None,
            shutdown_timeout: Self::default_shutdown_timeout(),
        }
    }
}
