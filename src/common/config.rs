use crate::common::{data::Error, util::read_env};
use url::Url;

pub const ENV_HOST: &str = "WIREMOCK_HOST";
pub const ENV_PORT: &str = "WIREMOCK_PORT";
pub const ENV_URL_PREFIX: &str = "WIREMOCK_URL_PREFIX";
pub const ENV_SCHEME: &str = "WIREMOCK_SCHEME";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8080;
const ADMIN_PATH: &str = "__admin";

/// Where the mock server's admin API lives. Fixed once a client has been created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Path prefix the server is mounted under, e.g. `/wiremock`. Empty by default.
    pub url_prefix: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            url_prefix: String::new(),
        }
    }
}

impl AdminConfig {
    pub fn new<IntoString: Into<String>>(host: IntoString, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Reads `WIREMOCK_HOST`, `WIREMOCK_PORT`, `WIREMOCK_URL_PREFIX` and `WIREMOCK_SCHEME`,
    /// falling back to `http://localhost:8080` without a prefix.
    pub fn from_env() -> Result<Self, Error> {
        let port = read_env(ENV_PORT, &DEFAULT_PORT.to_string());
        let port = port.parse::<u16>().map_err(|e| {
            Error::InvalidArgument(format!(
                "cannot parse environment variable {} ('{}') to a port number: {}",
                ENV_PORT, port, e
            ))
        })?;

        Ok(Self {
            scheme: read_env(ENV_SCHEME, "http"),
            host: read_env(ENV_HOST, DEFAULT_HOST),
            port,
            url_prefix: read_env(ENV_URL_PREFIX, ""),
        })
    }

    pub fn with_url_prefix<IntoString: Into<String>>(mut self, prefix: IntoString) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    pub fn with_scheme<IntoString: Into<String>>(mut self, scheme: IntoString) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// The base URL of the mock server, including the prefix, without a trailing slash.
    pub fn base_url(&self) -> Result<String, Error> {
        let prefix = self.url_prefix.trim_matches('/');
        let raw = if prefix.is_empty() {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}/{}", self.scheme, self.host, self.port, prefix)
        };

        let url = Url::parse(&raw).map_err(|e| {
            Error::InvalidArgument(format!("'{}' is not a valid server address: {}", raw, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::InvalidArgument(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }

        Ok(url.as_str().trim_end_matches('/').to_string())
    }

    /// The base URL of the admin API (`<base>/__admin`), without a trailing slash.
    pub fn admin_url(&self) -> Result<String, Error> {
        Ok(format!("{}/{}", self.base_url()?, ADMIN_PATH))
    }
}
