//! 测试替身：记录所有命令调用，并按前缀返回预设输出

use async_trait::async_trait;
use std::sync::Mutex;

use super::command::{CommandError, CommandExecutor, CommandOutput, CommandSpec};

enum Scripted {
    Output(CommandOutput),
    SpawnFailure,
}

/// 记录型命令执行器
///
/// 未匹配任何预设的命令返回 exit 0 与空输出
#[derive(Default)]
pub(crate) struct RecordingExecutor {
    calls: Mutex<Vec<CommandSpec>>,
    scripted: Mutex<Vec<(String, Scripted)>>,
}

impl RecordingExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 渲染后以 `prefix` 开头的命令返回指定结果（先注册的优先）
    pub(crate) fn respond(self, prefix: &str, exit_code: i32, output: &str) -> Self {
        self.scripted.lock().unwrap().push((
            prefix.to_string(),
            Scripted::Output(CommandOutput::new(exit_code, output)),
        ));
        self
    }

    /// 渲染后以 `prefix` 开头的命令模拟启动失败
    pub(crate) fn fail_spawn(self, prefix: &str) -> Self {
        self.scripted
            .lock()
            .unwrap()
            .push((prefix.to_string(), Scripted::SpawnFailure));
        self
    }

    pub(crate) fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn rendered(&self) -> Vec<String> {
        self.calls().iter().map(CommandSpec::render).collect()
    }
}

#[async_trait]
impl CommandExecutor for RecordingExecutor {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(spec.clone());

        let rendered = spec.render();
        let scripted = self.scripted.lock().unwrap();
        match scripted.iter().find(|(prefix, _)| rendered.starts_with(prefix.as_str())) {
            Some((_, Scripted::Output(output))) => Ok(output.clone()),
            Some((_, Scripted::SpawnFailure)) => Err(CommandError::SpawnFailed {
                program: spec.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            }),
            None => Ok(CommandOutput::new(0, "")),
        }
    }
}
