//! 命令执行器
//!
//! 提供统一的外部命令执行接口：
//! - 参数作为独立的 argv 传递，不经过 shell
//! - stdout/stderr 合并为一段文本返回
//! - 需要提权的命令统一加上提权前缀（默认 `sudo -n`）

use async_trait::async_trait;
use std::fmt;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// 命令所需权限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// 修改系统状态的命令（重启服务、删除文件等）
    Elevated,
    /// 只读查询
    Unprivileged,
}

/// 一次外部命令调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub privilege: Privilege,
}

impl CommandSpec {
    /// 创建只读命令
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            privilege: Privilege::Unprivileged,
        }
    }

    /// 创建需要提权的命令
    pub fn elevated(program: impl Into<String>) -> Self {
        Self {
            privilege: Privilege::Elevated,
            ..Self::new(program)
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// 渲染为可复制到 shell 的命令行，每个参数都经过 [`quote`]
    pub fn render(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// POSIX shell 单引号转义
///
/// 只含安全字符的参数原样返回，其余参数用单引号包裹，内部的 `'` 写成 `'\''`。
/// 不同输入得到不同输出，shell 解析后还原为原参数。
pub fn quote(arg: &str) -> String {
    let is_safe = |c: char| c.is_ascii_alphanumeric() || "_-./:=@%+,".contains(c);

    if !arg.is_empty() && arg.chars().all(is_safe) {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('\'');
    for c in arg.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

/// 命令执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// 退出码（被信号终止时为 None）
    pub exit_code: Option<i32>,
    /// stdout 在前、stderr 在后拼接，去掉末尾空白
    ///
    /// 两个流分别捕获，不保留它们之间的交错顺序
    pub output: String,
}

impl CommandOutput {
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            output: output.into(),
        }
    }

    /// 仅以退出码 0 判定成功
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// 命令执行错误
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to spawn {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// 外部命令执行边界
///
/// 调度器和状态查询只依赖这个 trait，测试中用 `RecordingExecutor` 替换
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError>;
}

/// 基于 tokio::process 的命令执行器
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    /// 提权前缀，例如 `["sudo", "-n"]`；为空时直接执行
    elevate_with: Vec<String>,
}

impl CommandRunner {
    pub fn new(elevate_with: Vec<String>) -> Self {
        Self { elevate_with }
    }

    /// 计算实际执行的 argv（含提权前缀）
    pub fn argv(&self, spec: &CommandSpec) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.elevate_with.len() + spec.args.len() + 1);
        if spec.privilege == Privilege::Elevated {
            argv.extend(self.elevate_with.iter().cloned());
        }
        argv.push(spec.program.clone());
        argv.extend(spec.args.iter().cloned());
        argv
    }
}

#[async_trait]
impl CommandExecutor for CommandRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        let argv = self.argv(spec);
        let program = &argv[0];

        debug!(command = %spec, privilege = ?spec.privilege, "Running command");

        let output = Command::new(program)
            .args(&argv[1..])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| CommandError::SpawnFailed {
                program: program.clone(),
                source,
            })?;

        // stdout 在前，stderr 在后
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let combined = combined.trim_end().to_string();

        debug!(command = %spec, exit_code = ?output.status.code(), "Command finished");

        Ok(CommandOutput {
            exit_code: output.status.code(),
            output: combined,
        })
    }
}
