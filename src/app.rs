//! Application assembly: config resolution, state, and the two hosts.

use crate::cli::{InvokeArgs, RunArgs};
use anyhow::Context;
use chat_relay_core::config::Config;
use chat_relay_core::envelope::Envelope;
use chat_relay_core::event::InboundEvent;
use chat_relay_core::lifecycle::signal::ShutdownSignal;
use chat_relay_server::AppState;
use chat_relay_server::dispatch::dispatch;
use std::io::Read;

/// Load the YAML config (defaults when unreadable), then overlay environment.
pub fn resolve_config(path: &str) -> Config {
    let mut config = Config::load(path).unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from '{path}': {e}, using defaults");
        Config::default()
    });
    config.apply_env();

    if let Err(e) = config.resolve_secret() {
        tracing::warn!("{e}; every action will fail until it is set");
    }
    config
}

pub struct Application {
    state: AppState,
    addr: String,
}

impl Application {
    /// Build the application from CLI args: resolve config, apply CLI
    /// overrides, and construct the upstream client.
    pub fn build(args: &RunArgs) -> anyhow::Result<Self> {
        let mut config = resolve_config(&args.config);

        if let Some(ref host) = args.host {
            config.host = host.clone();
        }
        if let Some(port) = args.port {
            config.port = port;
        }

        let addr = format!("{}:{}", config.host, config.port);
        tracing::info!(
            upstream = %config.upstream.base_url,
            default_model = %config.default_model,
            allow_origin = %config.resolve_cors_origin(),
            "Configuration resolved"
        );

        let state = AppState::from_config(config).context("failed to build upstream client")?;
        Ok(Self { state, addr })
    }

    /// Serve HTTP until SIGINT/SIGTERM, then drain in-flight requests.
    pub async fn serve(self) -> anyhow::Result<()> {
        let (signal, mut shutdown_rx) = ShutdownSignal::new();
        tokio::spawn(signal.run());

        let app_router = chat_relay_server::build_router(self.state);

        tracing::info!("Starting HTTP server on {}", self.addr);
        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .with_context(|| format!("failed to bind {}", self.addr))?;

        let shutdown = async move {
            let _ = shutdown_rx.wait_for(|v| *v).await;
        };

        axum::serve(listener, app_router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shut down.");
        Ok(())
    }
}

/// Dispatch one trigger event read from a file (or stdin) and return the
/// envelope serialized as JSON.
pub async fn invoke(args: &InvokeArgs) -> anyhow::Result<String> {
    let raw = read_event(&args.event)?;
    let event: InboundEvent =
        serde_json::from_str(&raw).context("trigger event is not valid JSON")?;

    let state = AppState::from_config(resolve_config(&args.config))
        .context("failed to build upstream client")?;
    let envelope: Envelope = dispatch(&state, event).await;

    Ok(serde_json::to_string(&envelope)?)
}

fn read_event(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read event from stdin")?;
        Ok(raw)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("failed to read event '{source}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_invoke_preflight_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"httpMethod":"OPTIONS"}}"#).unwrap();

        let args = InvokeArgs {
            config: "/nonexistent/config.yaml".to_string(),
            event: file.path().to_string_lossy().into_owned(),
            log_level: "warn".to_string(),
        };
        let out = invoke(&args).await.unwrap();
        let envelope: Envelope = serde_json::from_str(&out).unwrap();
        assert_eq!(envelope.status_code, 204);
        assert_eq!(envelope.body, "");
    }

    #[tokio::test]
    async fn test_invoke_missing_action() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"httpMethod":"POST","body":"{{}}"}}"#).unwrap();

        let args = InvokeArgs {
            config: "/nonexistent/config.yaml".to_string(),
            event: file.path().to_string_lossy().into_owned(),
            log_level: "warn".to_string(),
        };
        let out = invoke(&args).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["statusCode"], 400);
        assert_eq!(value["body"], r#"{"error":"action parameter is required"}"#);
    }

    #[tokio::test]
    async fn test_invoke_null_method_still_answers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"httpMethod":null,"queryStringParameters":{{"action":null}},"body":null}}"#
        )
        .unwrap();

        let args = InvokeArgs {
            config: "/nonexistent/config.yaml".to_string(),
            event: file.path().to_string_lossy().into_owned(),
            log_level: "warn".to_string(),
        };
        let out = invoke(&args).await.unwrap();
        let envelope: Envelope = serde_json::from_str(&out).unwrap();
        assert_eq!(envelope.status_code, 400);
        assert_eq!(envelope.body, r#"{"error":"action parameter is required"}"#);
    }

    #[tokio::test]
    async fn test_invoke_rejects_malformed_event() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not an event").unwrap();

        let args = InvokeArgs {
            config: "/nonexistent/config.yaml".to_string(),
            event: file.path().to_string_lossy().into_owned(),
            log_level: "warn".to_string(),
        };
        assert!(invoke(&args).await.is_err());
    }
}
