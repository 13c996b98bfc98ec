//! 基础设施模块
//!
//! 封装外部依赖（命令执行）

pub mod command;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{CommandError, CommandExecutor, CommandOutput, CommandRunner, CommandSpec, Privilege};
