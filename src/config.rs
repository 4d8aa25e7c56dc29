use crate::error::{
    BadEnvVarSnafu, InvalidBaseUrlSnafu, ParseServerIpSnafu, ParseUrlSnafu, RosterResult,
};
use dotenvy::var;
use snafu::{ResultExt, ensure};
use std::{env::VarError, net::SocketAddr, sync::Arc};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1";
pub const DEFAULT_SERVER_IP: &str = "127.0.0.1:3000";

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    api_config: Arc<ApiConfig>,
    server_ip: SocketAddr,
}

impl RuntimeConfiguration {
    pub fn new() -> RosterResult<Self> {
        Self::with_api_config(
            ApiConfig::new()?,
            &var_or_default("ROSTER_SERVER_IP", DEFAULT_SERVER_IP)?,
        )
    }

    pub fn with_api_config(api_config: ApiConfig, server_ip: &str) -> RosterResult<Self> {
        let server_ip = server_ip.parse::<SocketAddr>().context(ParseServerIpSnafu {
            original: server_ip.to_string(),
        })?;

        Ok(Self {
            api_config: Arc::new(api_config),
            server_ip,
        })
    }

    pub fn api_config(&self) -> Arc<ApiConfig> {
        self.api_config.clone()
    }

    pub const fn server_ip(&self) -> SocketAddr {
        self.server_ip
    }
}

/// Where the student API lives. Always an absolute `http`/`https` URL with a host and no trailing slash.
#[derive(Debug)]
pub struct ApiConfig {
    base_url: Url,
}

impl ApiConfig {
    pub fn new() -> RosterResult<Self> {
        Self::from_base_url(&var_or_default("ROSTER_API_BASE_URL", DEFAULT_API_BASE_URL)?)
    }

    pub fn from_base_url(original: &str) -> RosterResult<Self> {
        let mut base_url = Url::parse(original).context(ParseUrlSnafu { original })?;
        ensure!(
            matches!(base_url.scheme(), "http" | "https")
                && base_url.has_host()
                && !base_url.cannot_be_a_base(),
            InvalidBaseUrlSnafu { original }
        );

        let trimmed = base_url.path().trim_end_matches('/').to_string();
        base_url.set_path(&trimmed);

        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub const fn url(&self) -> &Url {
        &self.base_url
    }
}

fn var_or_default(name: &'static str, default: &str) -> RosterResult<String> {
    match var(name) {
        Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(default.to_string()),
        other => other.context(BadEnvVarSnafu { name }),
    }
}
