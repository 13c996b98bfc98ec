//! 应用状态

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::EnvConfig;
use crate::infra::{CommandExecutor, CommandRunner};
use crate::services::{ActionDispatcher, StatusQueries};

/// 全局 shutdown token，用于优雅关闭 HTTP 服务
static GLOBAL_SHUTDOWN: std::sync::OnceLock<CancellationToken> = std::sync::OnceLock::new();

/// 获取全局 shutdown token
pub fn get_shutdown_token() -> CancellationToken {
    GLOBAL_SHUTDOWN
        .get_or_init(CancellationToken::new)
        .clone()
}

/// 触发全局 shutdown
pub fn trigger_shutdown() {
    if let Some(token) = GLOBAL_SHUTDOWN.get() {
        token.cancel();
    }
}

/// 应用状态
///
/// 请求之间不共享可变状态，这里只有配置和无状态的服务对象
pub struct AppState {
    /// API 密钥（用于验证请求）
    pub api_key: String,
    /// 环境配置
    pub config: EnvConfig,
    /// 服务启动时间
    pub started_at: DateTime<Utc>,
    /// 站点操作调度器
    pub dispatcher: ActionDispatcher,
    /// 只读状态查询
    pub status: StatusQueries,
}

impl AppState {
    /// 从环境变量创建应用状态
    pub fn new() -> Self {
        let config = EnvConfig::from_env();

        tracing::info!(
            api_key_len = config.api_key.len(),
            port = config.port,
            sites_root = %config.layout.sites_root.display(),
            php_versions = ?config.php_versions,
            elevate_with = ?config.elevate_with,
            "Loaded configuration"
        );

        let runner = CommandRunner::new(config.elevate_with.clone());
        Self::with_executor(config, Arc::new(runner))
    }

    /// 使用指定的命令执行器创建应用状态
    pub fn with_executor(config: EnvConfig, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            api_key: config.api_key.clone(),
            dispatcher: ActionDispatcher::new(executor.clone(), &config),
            status: StatusQueries::new(executor, &config),
            started_at: Utc::now(),
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

