//! Site Panel Agent - 站点管理面板代理
//!
//! 通过 HTTP 接收站点操作请求，调用系统命令完成站点开通、PHP 切换、
//! 备份、日志查看，并提供系统 / 服务状态查询

pub mod error;
pub mod middleware;
pub mod infra;
pub mod domain;
pub mod config;
pub mod state;
pub mod api;
pub mod services;

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::env::constants::{SERVICE_NAME, VERSION};
use crate::state::{get_shutdown_token, trigger_shutdown, AppState};

/// 命令行传入的运行时配置
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// 覆盖 PORT 环境变量
    pub port_override: Option<u16>,
}

/// 初始化日志并启动 HTTP 服务，直到收到退出信号
pub async fn init_and_run_agent_with_config(runtime: RuntimeConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(service = SERVICE_NAME, version = VERSION, "Starting agent");

    let mut state = AppState::new();
    if let Some(port) = runtime.port_override {
        tracing::info!(port, "Port overridden from command line");
        state.config.port = port;
    }
    let port = state.config.port;

    let app = api::router(Arc::new(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "HTTP server listening");

    tokio::spawn(wait_for_signal());

    axum::serve(listener, app)
        .with_graceful_shutdown(get_shutdown_token().cancelled_owned())
        .await
        .context("HTTP server error")?;

    tracing::info!("Agent stopped");
    Ok(())
}

/// 等待 Ctrl+C / SIGTERM 后触发全局 shutdown
async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }

    trigger_shutdown();
}
