//! Outbound HTTP client for the upstream API.

use crate::config::UpstreamConfig;
use anyhow::Context;
use reqwest::{Client, Proxy};
use std::time::Duration;

pub const USER_AGENT: &str = concat!("chat-relay/", env!("CARGO_PKG_VERSION"));

const PROXY_SCHEMES: [&str; 3] = ["http", "https", "socks5"];

/// The client used for every upstream call, configured from `upstream`.
pub fn build_http_client(upstream: &UpstreamConfig) -> anyhow::Result<Client> {
    build_client(
        upstream.proxy_url.as_deref(),
        Duration::from_secs(upstream.connect_timeout),
        Duration::from_secs(upstream.request_timeout),
    )
}

/// Same as [`build_http_client`] with explicit durations. Without a proxy the
/// connection is direct; `HTTP_PROXY` and friends are not consulted.
pub fn build_client(
    proxy_url: Option<&str>,
    connect_timeout: Duration,
    request_timeout: Duration,
) -> anyhow::Result<Client> {
    let builder = Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(connect_timeout)
        .timeout(request_timeout);

    let builder = match proxy_url {
        Some(url) => {
            validate_proxy_url(url)?;
            builder.proxy(Proxy::all(url)?)
        }
        None => builder.no_proxy(),
    };

    builder.build().context("failed to build upstream HTTP client")
}

/// Accepts `http`, `https` and `socks5` proxy URLs.
pub fn validate_proxy_url(url: &str) -> anyhow::Result<()> {
    let parsed = url::Url::parse(url).with_context(|| format!("invalid proxy URL '{url}'"))?;
    anyhow::ensure!(
        PROXY_SCHEMES.contains(&parsed.scheme()),
        "unsupported proxy scheme '{}' in '{url}', expected one of {}",
        parsed.scheme(),
        PROXY_SCHEMES.join("/")
    );
    Ok(())
}
