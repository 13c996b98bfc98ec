//! 网站领域模型

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// 站点域名最大长度
const MAX_DOMAIN_LEN: usize = 253;

/// 一个托管站点（sites 根目录下的一个子目录）
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Website {
    pub domain: String,
    /// PHP 版本，无法确定时为 "Unknown"
    pub php_version: String,
    pub content_path: PathBuf,
    pub logs_path: PathBuf,
}

/// 可查看的日志类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogType {
    NginxAccess,
    NginxError,
    ApacheAccess,
    ApacheError,
}

impl LogType {
    pub const ALL: [LogType; 4] = [
        LogType::NginxAccess,
        LogType::NginxError,
        LogType::ApacheAccess,
        LogType::ApacheError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::NginxAccess => "nginx_access",
            LogType::NginxError => "nginx_error",
            LogType::ApacheAccess => "apache_access",
            LogType::ApacheError => "apache_error",
        }
    }

    /// 站点 logs 目录下的文件名
    pub fn file_name(&self) -> &'static str {
        match self {
            LogType::NginxAccess => "access.log",
            LogType::NginxError => "error.log",
            LogType::ApacheAccess => "apache-access.log",
            LogType::ApacheError => "apache-error.log",
        }
    }
}

impl FromStr for LogType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown log type: {}", s))
    }
}

/// 校验域名是否可以安全地拼接进文件路径
///
/// 只允许 ASCII 字母数字与 `-` `.` `_`，不能以 `.` 或 `-` 开头，不能包含 `..`
pub fn is_valid_domain(domain: &str) -> bool {
    !domain.is_empty()
        && domain.len() <= MAX_DOMAIN_LEN
        && !domain.starts_with('.')
        && !domain.starts_with('-')
        && !domain.contains("..")
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
}
