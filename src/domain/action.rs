//! 站点操作领域模型

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// 操作参数（表单字段名 -> 值）
pub type ActionParams = HashMap<String, String>;

/// 可调度的操作
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    AddWebsite,
    SwitchPhp,
    RemoveWebsite,
    RestartService,
    BackupWebsite,
    ViewLogs,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::AddWebsite,
        Action::SwitchPhp,
        Action::RemoveWebsite,
        Action::RestartService,
        Action::BackupWebsite,
        Action::ViewLogs,
    ];

    /// 转换为字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::AddWebsite => "add_website",
            Action::SwitchPhp => "switch_php",
            Action::RemoveWebsite => "remove_website",
            Action::RestartService => "restart_service",
            Action::BackupWebsite => "backup_website",
            Action::ViewLogs => "view_logs",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }

    /// 是否会修改系统状态
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Action::ViewLogs)
    }
}

/// 操作请求
#[derive(Clone, Debug, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(default)]
    pub params: ActionParams,
}

/// 操作结果，仅由响应渲染消费
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionResult {
    pub success: bool,
    pub output: String,
}

impl ActionResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}

/// 操作失败原因
///
/// 所有错误都在操作边界转换为 `ActionResult { success: false }`，不会向上传播
#[derive(Debug, Error)]
pub enum ActionError {
    /// 必填参数缺失或为空，未执行任何命令
    #[error("{0}")]
    MissingParameter(&'static str),

    /// 参数未通过校验，未执行任何命令
    #[error("{0}")]
    InvalidParameter(String),

    /// 外部命令返回非零退出码，内容为捕获的输出
    #[error("{0}")]
    CommandFailed(String),

    #[error("Log file {0} does not exist")]
    NotFound(String),

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<ActionError> for ActionResult {
    fn from(err: ActionError) -> Self {
        ActionResult::failed(err.to_string())
    }
}
