//! 系统信息领域模型

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::site::Website;

/// 解析失败时使用的占位值
pub const UNKNOWN: &str = "Unknown";

/// 系统信息快照，所有字段均为展示用字符串
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SystemInfo {
    pub hostname: String,
    pub kernel: String,
    pub cpu: String,
    /// 单位 MB（`free -m`）
    pub memory_total: String,
    pub memory_used: String,
    pub memory_free: String,
    /// 根分区（`df -h /`）
    pub disk_total: String,
    pub disk_used: String,
    pub disk_free: String,
    pub uptime: String,
    /// 1/5/15 分钟负载，原样保留
    pub load: String,
}

/// 服务运行状态
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum ServiceState {
    Running,
    Stopped,
}

/// 受管理的 systemd 服务
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManagedService {
    /// 显示名称 (e.g., "PHP-FPM 8.1")
    pub name: String,
    /// systemd unit (e.g., "php8.1-fpm")
    pub unit: String,
}

impl ManagedService {
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
        }
    }
}

/// 服务状态
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ServiceStatus {
    pub name: String,
    pub service: String,
    pub status: ServiceState,
}

/// PHP 运行时安装状态
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum PhpStatus {
    Installed,
    #[serde(rename = "Not Installed")]
    NotInstalled,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PhpRuntime {
    pub version: String,
    pub status: PhpStatus,
}

/// 面板首页聚合数据
#[derive(Clone, Debug, Serialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub websites: Vec<Website>,
    pub system: SystemInfo,
    pub php_versions: Vec<PhpRuntime>,
    pub services: Vec<ServiceStatus>,
}
