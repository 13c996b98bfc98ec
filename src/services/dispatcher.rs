//! 站点操作调度器
//!
//! 将操作名 + 参数映射为固定的外部命令序列并执行：
//! - 必填参数缺失时直接失败，不执行任何命令
//! - 所有参数都作为独立 argv 传给外部程序
//! - 仅以退出码 0 判定成功；不回滚、不重试

use chrono::{DateTime, Local};
use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, info, warn};

use crate::config::{EnvConfig, ScriptPaths, SiteLayout};
use crate::domain::{is_valid_domain, Action, ActionError, ActionParams, ActionResult, LogType};
use crate::infra::{CommandExecutor, CommandSpec};

/// 备份文件名中的时间戳格式
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// read_tail 每次向前读取的字节数
const TAIL_BLOCK_SIZE: u64 = 8 * 1024;

/// 操作调度器
pub struct ActionDispatcher {
    executor: Arc<dyn CommandExecutor>,
    layout: SiteLayout,
    scripts: ScriptPaths,
    log_tail_lines: usize,
}

impl ActionDispatcher {
    pub fn new(executor: Arc<dyn CommandExecutor>, config: &EnvConfig) -> Self {
        Self {
            executor,
            layout: config.layout.clone(),
            scripts: config.scripts.clone(),
            log_tail_lines: config.log_tail_lines,
        }
    }

    /// 按名称调度，未知操作直接返回失败
    pub async fn dispatch_named(&self, action: &str, params: &ActionParams) -> ActionResult {
        match Action::parse(action) {
            Some(action) => self.dispatch(action, params).await,
            None => {
                warn!(action = %action, "Unknown action requested");
                ActionResult::failed(format!("Unknown action: {}", action))
            }
        }
    }

    /// 执行一个操作，所有错误都在这里转换为失败结果
    pub async fn dispatch(&self, action: Action, params: &ActionParams) -> ActionResult {
        if action.is_mutating() {
            info!(action = action.as_str(), "Dispatching action");
        } else {
            debug!(action = action.as_str(), "Dispatching action");
        }

        let result = match action {
            Action::AddWebsite => self.add_website(params).await,
            Action::SwitchPhp => self.switch_php(params).await,
            Action::RemoveWebsite => self.remove_website(params).await,
            Action::RestartService => self.restart_service(params).await,
            Action::BackupWebsite => self.backup_website(params, Local::now()).await,
            Action::ViewLogs => self.view_logs(params).await,
        };

        match result {
            Ok(output) => ActionResult::ok(output),
            Err(e) => {
                warn!(action = action.as_str(), error = %e, "Action failed");
                e.into()
            }
        }
    }

    // ========== 操作实现 ==========

    async fn add_website(&self, params: &ActionParams) -> Result<String, ActionError> {
        const MISSING: &str = "Domain and PHP version are required";
        let domain = required(params, "domain", MISSING)?;
        let php_version = required(params, "php_version", MISSING)?;
        let domain = checked_domain(domain)?;

        let spec = run_script(&self.scripts.site_config, domain, php_version);
        self.run_checked(&spec).await
    }

    async fn switch_php(&self, params: &ActionParams) -> Result<String, ActionError> {
        const MISSING: &str = "Domain and PHP version are required";
        let domain = required(params, "domain", MISSING)?;
        let php_version = required(params, "php_version", MISSING)?;
        let domain = checked_domain(domain)?;

        let spec = run_script(&self.scripts.php_switch, domain, php_version);
        self.run_checked(&spec).await
    }

    /// 删除站点配置，可选删除站点文件
    ///
    /// 每一步独立执行，前一步失败不影响后续步骤
    async fn remove_website(&self, params: &ActionParams) -> Result<String, ActionError> {
        let domain = checked_domain(required(params, "domain", "Domain is required")?)?;
        let remove_files = params.get("remove_files").map(String::as_str) == Some("yes");

        // Nginx
        self.run_lenient(
            &CommandSpec::elevated("rm")
                .arg("-f")
                .arg(path_arg(&self.layout.nginx_enabled_conf(domain)))
                .arg(path_arg(&self.layout.nginx_available_conf(domain))),
        )
        .await;

        // Apache
        self.run_lenient(&CommandSpec::elevated("a2dissite").arg(SiteLayout::conf_name(domain)))
            .await;
        self.run_lenient(
            &CommandSpec::elevated("rm")
                .arg("-f")
                .arg(path_arg(&self.layout.apache_available_conf(domain))),
        )
        .await;

        let result = if remove_files {
            let spec = CommandSpec::elevated("rm")
                .arg("-rf")
                .arg(path_arg(&self.layout.site_dir(domain)));
            self.run_checked(&spec)
                .await
                .map(|_| format!("Website {} configurations and files removed.", domain))
        } else {
            Ok(format!(
                "Website {} configurations removed. Website files were NOT deleted.",
                domain
            ))
        };

        // Reload web servers
        for server in ["nginx", "apache2"] {
            self.run_lenient(&CommandSpec::elevated("systemctl").args(["reload", server]))
                .await;
        }

        result
    }

    async fn restart_service(&self, params: &ActionParams) -> Result<String, ActionError> {
        let service = required(params, "service", "Service name is required")?;

        // `--` 之后的参数只会被当作 unit 名
        let spec = CommandSpec::elevated("systemctl").args(["restart", "--", service]);
        self.run_checked(&spec).await
    }

    /// 打包站点 public_html 到 `<site>/backup/<domain>-<timestamp>.tar.gz`
    async fn backup_website(
        &self,
        params: &ActionParams,
        now: DateTime<Local>,
    ) -> Result<String, ActionError> {
        let domain = checked_domain(required(params, "domain", "Domain is required")?)?;

        let backup_dir = self.layout.backup_dir(domain);
        let backup_file = backup_path(&self.layout, domain, now);

        // mkdir 失败时 tar 会给出具体错误
        self.run_lenient(&CommandSpec::elevated("mkdir").arg("-p").arg(path_arg(&backup_dir)))
            .await;

        let spec = CommandSpec::elevated("tar")
            .arg("-czf")
            .arg(path_arg(&backup_file))
            .arg("-C")
            .arg(path_arg(&self.layout.site_dir(domain)))
            .arg("public_html");
        self.run_checked(&spec).await?;

        info!(domain = %domain, file = %backup_file.display(), "Backup created");
        Ok(format!("Backup created: {}", backup_file.display()))
    }

    /// 读取站点日志的最后 N 行
    async fn view_logs(&self, params: &ActionParams) -> Result<String, ActionError> {
        const MISSING: &str = "Domain and log type are required";
        let domain = required(params, "domain", MISSING)?;
        let log_type = required(params, "log_type", MISSING)?;
        let domain = checked_domain(domain)?;
        let log_type: LogType = log_type.parse().map_err(ActionError::InvalidParameter)?;

        let log_file = self.layout.logs_dir(domain).join(log_type.file_name());
        let exists = tokio::fs::metadata(&log_file)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !exists {
            return Err(ActionError::NotFound(log_file.display().to_string()));
        }

        read_tail(&log_file, self.log_tail_lines)
            .await
            .map_err(|source| ActionError::ReadFailed {
                path: log_file.display().to_string(),
                source,
            })
    }

    // ========== 命令执行 ==========

    /// 执行命令，非零退出码视为失败
    async fn run_checked(&self, spec: &CommandSpec) -> Result<String, ActionError> {
        let result = self
            .executor
            .run(spec)
            .await
            .map_err(|e| ActionError::CommandFailed(e.to_string()))?;

        info!(command = %spec, exit_code = ?result.exit_code, "Command completed");

        if result.success() {
            Ok(result.output)
        } else {
            Err(ActionError::CommandFailed(result.output))
        }
    }

    /// 执行命令，失败只记录日志
    async fn run_lenient(&self, spec: &CommandSpec) {
        match self.executor.run(spec).await {
            Ok(result) if result.success() => {
                info!(command = %spec, "Command completed");
            }
            Ok(result) => {
                warn!(
                    command = %spec,
                    exit_code = ?result.exit_code,
                    output = %result.output,
                    "Command failed, continuing"
                );
            }
            Err(e) => {
                warn!(command = %spec, error = %e, "Command failed to start, continuing");
            }
        }
    }
}

/// 取必填参数，缺失或为空时返回固定提示
fn required<'a>(
    params: &'a ActionParams,
    key: &str,
    message: &'static str,
) -> Result<&'a str, ActionError> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or(ActionError::MissingParameter(message))
}

fn checked_domain(domain: &str) -> Result<&str, ActionError> {
    if is_valid_domain(domain) {
        Ok(domain)
    } else {
        Err(ActionError::InvalidParameter(format!("Invalid domain: {}", domain)))
    }
}

fn run_script(script: &Path, domain: &str, php_version: &str) -> CommandSpec {
    CommandSpec::elevated("bash")
        .arg(path_arg(script))
        .args([domain, php_version])
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// 取文本最后 `n` 行
pub fn tail_lines(content: &str, n: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

/// 从文件末尾按块向前读取，直到凑够 `n` 行
///
/// 内存占用只与最后 `n` 行的长度有关，与文件大小无关
pub async fn read_tail(path: &Path, n: usize) -> io::Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut pos = file.metadata().await?.len();
    let mut buf: Vec<u8> = Vec::new();
    let mut newlines = 0usize;

    // 多读一个换行，保证最前面的不完整行可以被丢弃
    while pos > 0 && newlines <= n {
        let step = TAIL_BLOCK_SIZE.min(pos);
        pos -= step;

        let mut block = vec![0u8; step as usize];
        file.seek(SeekFrom::Start(pos)).await?;
        file.read_exact(&mut block).await?;

        newlines += block.iter().filter(|b| **b == b'\n').count();
        block.extend_from_slice(&buf);
        buf = block;
    }

    Ok(tail_lines(&String::from_utf8_lossy(&buf), n))
}

fn backup_path(layout: &SiteLayout, domain: &str, now: DateTime<Local>) -> PathBuf {
    layout.backup_dir(domain).join(format!(
        "{}-{}.tar.gz",
        domain,
        now.format(BACKUP_TIMESTAMP_FORMAT)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::command::tests::split_rendered;
    use crate::infra::testing::RecordingExecutor;
    use crate::infra::Privilege;
    use chrono::{NaiveDateTime, TimeZone};
    use std::fs;
    use tempfile::TempDir;

    fn params(pairs: &[(&str, &str)]) -> ActionParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn config_in(root: &Path) -> EnvConfig {
        let mut config = EnvConfig::default();
        config.layout = SiteLayout::rooted_at(root);
        config
    }

    fn dispatcher(executor: &Arc<RecordingExecutor>) -> ActionDispatcher {
        ActionDispatcher::new(executor.clone(), &EnvConfig::default())
    }

    #[tokio::test]
    async fn test_missing_parameters_run_nothing() {
        let cases: [(Action, &[(&str, &str)], &str); 10] = [
            (Action::AddWebsite, &[("domain", "a.com")], "Domain and PHP version are required"),
            (Action::AddWebsite, &[("domain", ""), ("php_version", "8.1")], "Domain and PHP version are required"),
            (Action::SwitchPhp, &[("php_version", "8.1")], "Domain and PHP version are required"),
            (Action::SwitchPhp, &[("domain", "a.com"), ("php_version", "")], "Domain and PHP version are required"),
            (Action::RemoveWebsite, &[("remove_files", "yes")], "Domain is required"),
            (Action::RestartService, &[], "Service name is required"),
            (Action::RestartService, &[("service", "")], "Service name is required"),
            (Action::BackupWebsite, &[("domain", "")], "Domain is required"),
            (Action::ViewLogs, &[("domain", "a.com")], "Domain and log type are required"),
            (Action::ViewLogs, &[("log_type", "nginx_access")], "Domain and log type are required"),
        ];

        for (action, fields, message) in cases {
            let executor = Arc::new(RecordingExecutor::new());
            let result = dispatcher(&executor).dispatch(action, &params(fields)).await;

            assert_eq!(result, ActionResult::failed(message), "{:?}", action);
            assert!(executor.calls().is_empty(), "{:?} ran commands", action);
        }
    }

    #[tokio::test]
    async fn test_invalid_domain_runs_nothing() {
        for action in [
            Action::AddWebsite,
            Action::SwitchPhp,
            Action::RemoveWebsite,
            Action::BackupWebsite,
            Action::ViewLogs,
        ] {
            let executor = Arc::new(RecordingExecutor::new());
            let p = params(&[
                ("domain", "../../etc"),
                ("php_version", "8.1"),
                ("log_type", "nginx_access"),
            ]);
            let result = dispatcher(&executor).dispatch(action, &p).await;

            assert!(!result.success);
            assert_eq!(result.output, "Invalid domain: ../../etc");
            assert!(executor.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let executor = Arc::new(RecordingExecutor::new());
        let result = dispatcher(&executor)
            .dispatch_named("format_disk", &params(&[("domain", "a.com")]))
            .await;

        assert_eq!(result, ActionResult::failed("Unknown action: format_disk"));
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_website_runs_provisioning_script() {
        let executor = Arc::new(RecordingExecutor::new().respond("bash", 0, "Site example.com created"));
        let result = dispatcher(&executor)
            .dispatch_named("add_website", &params(&[("domain", "example.com"), ("php_version", "8.1")]))
            .await;

        assert_eq!(result, ActionResult::ok("Site example.com created"));
        assert_eq!(
            executor.rendered(),
            ["bash /usr/local/bin/site_config.sh example.com 8.1"]
        );
        assert_eq!(executor.calls()[0].privilege, Privilege::Elevated);
    }

    #[tokio::test]
    async fn test_switch_php_failure_returns_output() {
        let executor = Arc::new(RecordingExecutor::new().respond("bash", 1, "PHP 9.9 is not installed"));
        let result = dispatcher(&executor)
            .dispatch(Action::SwitchPhp, &params(&[("domain", "example.com"), ("php_version", "9.9")]))
            .await;

        assert_eq!(result, ActionResult::failed("PHP 9.9 is not installed"));
        assert_eq!(
            executor.rendered(),
            ["bash /usr/local/bin/php_switcher.sh example.com 9.9"]
        );
    }

    #[tokio::test]
    async fn test_remove_website_keeps_files_by_default() {
        let executor = Arc::new(RecordingExecutor::new());
        let result = dispatcher(&executor)
            .dispatch(Action::RemoveWebsite, &params(&[("domain", "example.com")]))
            .await;

        assert_eq!(
            result,
            ActionResult::ok("Website example.com configurations removed. Website files were NOT deleted.")
        );
        assert_eq!(
            executor.rendered(),
            [
                "rm -f /etc/nginx/sites-enabled/example.com.conf /etc/nginx/sites-available/example.com.conf",
                "a2dissite example.com.conf",
                "rm -f /etc/apache2/sites-available/example.com.conf",
                "systemctl reload nginx",
                "systemctl reload apache2",
            ]
        );
        assert!(executor
            .calls()
            .iter()
            .all(|c| c.privilege == Privilege::Elevated));
    }

    #[tokio::test]
    async fn test_remove_website_continues_after_failures() {
        let executor = Arc::new(
            RecordingExecutor::new()
                .respond("rm -f", 1, "rm: cannot remove")
                .fail_spawn("a2dissite")
                .respond("systemctl reload nginx", 1, "nginx: configuration test failed"),
        );
        let result = dispatcher(&executor)
            .dispatch(Action::RemoveWebsite, &params(&[("domain", "example.com"), ("remove_files", "no")]))
            .await;

        assert!(result.success);
        assert_eq!(executor.calls().len(), 5);
    }

    #[tokio::test]
    async fn test_remove_website_with_files() {
        let executor = Arc::new(RecordingExecutor::new());
        let result = dispatcher(&executor)
            .dispatch(Action::RemoveWebsite, &params(&[("domain", "example.com"), ("remove_files", "yes")]))
            .await;

        assert_eq!(
            result,
            ActionResult::ok("Website example.com configurations and files removed.")
        );
        let rendered = executor.rendered();
        assert_eq!(rendered.len(), 6);
        assert_eq!(rendered[3], "rm -rf /sites/example.com");
        assert_eq!(rendered[4], "systemctl reload nginx");
        assert_eq!(rendered[5], "systemctl reload apache2");
    }

    #[tokio::test]
    async fn test_remove_website_file_removal_failure_still_reloads() {
        let executor = Arc::new(
            RecordingExecutor::new().respond("rm -rf", 1, "rm: cannot remove '/sites/example.com': Device busy"),
        );
        let result = dispatcher(&executor)
            .dispatch(Action::RemoveWebsite, &params(&[("domain", "example.com"), ("remove_files", "yes")]))
            .await;

        assert_eq!(
            result,
            ActionResult::failed("rm: cannot remove '/sites/example.com': Device busy")
        );
        assert_eq!(executor.calls().len(), 6);
    }

    #[tokio::test]
    async fn test_restart_service_keeps_argument_boundaries() {
        let hostile = "nginx; rm -rf /";
        let executor = Arc::new(RecordingExecutor::new());
        let result = dispatcher(&executor)
            .dispatch(Action::RestartService, &params(&[("service", hostile)]))
            .await;

        assert!(result.success);
        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "systemctl");
        assert_eq!(calls[0].args, ["restart", "--", hostile]);
        assert_eq!(
            split_rendered(&calls[0].render()),
            ["systemctl", "restart", "--", hostile]
        );
    }

    #[tokio::test]
    async fn test_restart_service_option_like_names_stay_units() {
        for service in ["--version", "-H", "--root=/tmp/x"] {
            let executor = Arc::new(RecordingExecutor::new());
            dispatcher(&executor)
                .dispatch(Action::RestartService, &params(&[("service", service)]))
                .await;

            let calls = executor.calls();
            assert_eq!(calls.len(), 1);
            let args = &calls[0].args;
            let separator = args.iter().position(|a| a == "--").unwrap();
            let unit = args.iter().position(|a| a == service).unwrap();
            assert!(separator < unit, "{service} reached the option parser: {args:?}");
        }
    }

    #[tokio::test]
    async fn test_php_version_metacharacters_stay_one_argument() {
        let hostile = "8.1' && reboot '";
        let executor = Arc::new(RecordingExecutor::new());
        dispatcher(&executor)
            .dispatch(Action::AddWebsite, &params(&[("domain", "example.com"), ("php_version", hostile)]))
            .await;

        let calls = executor.calls();
        assert_eq!(calls[0].args.last().map(String::as_str), Some(hostile));
        assert_eq!(split_rendered(&calls[0].render()).len(), 4);
    }

    #[tokio::test]
    async fn test_backup_website_success_output() {
        let executor = Arc::new(RecordingExecutor::new());
        let before = Local::now();
        let result = dispatcher(&executor)
            .dispatch(Action::BackupWebsite, &params(&[("domain", "example.com")]))
            .await;
        let after = Local::now();

        assert!(result.success);
        let path = result.output.strip_prefix("Backup created: ").unwrap();
        assert!(path.starts_with("/sites/example.com/backup/example.com-"));
        assert!(path.ends_with(".tar.gz"));

        // timestamp lies between the two observations (second precision)
        let stamp = path
            .trim_start_matches("/sites/example.com/backup/example.com-")
            .trim_end_matches(".tar.gz");
        let parsed = NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT).unwrap();
        assert!(parsed >= before.naive_local() - chrono::Duration::seconds(1));
        assert!(parsed <= after.naive_local());

        let rendered = executor.rendered();
        assert_eq!(rendered[0], "mkdir -p /sites/example.com/backup");
        assert_eq!(
            rendered[1],
            format!("tar -czf {} -C /sites/example.com public_html", path)
        );
    }

    #[tokio::test]
    async fn test_backup_website_fixed_clock() {
        let executor = Arc::new(RecordingExecutor::new());
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let output = dispatcher(&executor)
            .backup_website(&params(&[("domain", "example.com")]), now)
            .await
            .unwrap();

        assert_eq!(
            output,
            "Backup created: /sites/example.com/backup/example.com-2024-03-09_14-05-07.tar.gz"
        );
        assert_eq!(
            PathBuf::from(output.trim_start_matches("Backup created: ")),
            backup_path(&SiteLayout::default(), "example.com", now)
        );
    }

    #[tokio::test]
    async fn test_backup_website_archive_failure() {
        let executor = Arc::new(
            RecordingExecutor::new()
                .respond("mkdir", 1, "mkdir: permission denied")
                .respond("tar", 2, "tar: public_html: Cannot stat: No such file or directory"),
        );
        let result = dispatcher(&executor)
            .dispatch(Action::BackupWebsite, &params(&[("domain", "example.com")]))
            .await;

        assert_eq!(
            result,
            ActionResult::failed("tar: public_html: Cannot stat: No such file or directory")
        );
        assert_eq!(executor.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_view_logs_returns_last_lines() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path());
        let logs = config.layout.logs_dir("example.com");
        fs::create_dir_all(&logs).unwrap();

        let content: String = (1..=250).map(|i| format!("GET /page/{} 200\n", i)).collect();
        fs::write(logs.join("access.log"), &content).unwrap();

        let executor = Arc::new(RecordingExecutor::new());
        let dispatcher = ActionDispatcher::new(executor.clone(), &config);
        let result = dispatcher
            .dispatch(Action::ViewLogs, &params(&[("domain", "example.com"), ("log_type", "nginx_access")]))
            .await;

        let expected: Vec<String> = (151..=250).map(|i| format!("GET /page/{} 200", i)).collect();
        assert!(result.success);
        assert_eq!(result.output, expected.join("\n"));
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_view_logs_short_file() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path());
        let logs = config.layout.logs_dir("example.com");
        fs::create_dir_all(&logs).unwrap();
        fs::write(logs.join("apache-error.log"), "[error] one\n[error] two\n").unwrap();

        let executor = Arc::new(RecordingExecutor::new());
        let result = ActionDispatcher::new(executor, &config)
            .dispatch(Action::ViewLogs, &params(&[("domain", "example.com"), ("log_type", "apache_error")]))
            .await;

        assert_eq!(result, ActionResult::ok("[error] one\n[error] two"));
    }

    #[tokio::test]
    async fn test_view_logs_missing_file() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path());
        let executor = Arc::new(RecordingExecutor::new());

        let result = ActionDispatcher::new(executor, &config)
            .dispatch(Action::ViewLogs, &params(&[("domain", "example.com"), ("log_type", "nginx_error")]))
            .await;

        let expected = config.layout.logs_dir("example.com").join("error.log");
        assert_eq!(
            result,
            ActionResult::failed(format!("Log file {} does not exist", expected.display()))
        );
    }

    #[tokio::test]
    async fn test_view_logs_unknown_type() {
        let executor = Arc::new(RecordingExecutor::new());
        let result = dispatcher(&executor)
            .dispatch(Action::ViewLogs, &params(&[("domain", "example.com"), ("log_type", "../../shadow")]))
            .await;

        assert_eq!(result, ActionResult::failed("Unknown log type: ../../shadow"));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_reported() {
        let executor = Arc::new(RecordingExecutor::new().fail_spawn("systemctl"));
        let result = dispatcher(&executor)
            .dispatch(Action::RestartService, &params(&[("service", "nginx")]))
            .await;

        assert!(!result.success);
        assert!(result.output.starts_with("Failed to spawn systemctl"));
    }

    #[tokio::test]
    async fn test_read_tail_large_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("access.log");
        let content: String = (1..=200_000)
            .map(|i| format!("10.0.0.1 - - \"GET /page/{} HTTP/1.1\" 200\n", i))
            .collect();
        fs::write(&path, &content).unwrap();
        assert!(content.len() as u64 > TAIL_BLOCK_SIZE * 100);

        let tail = read_tail(&path, 100).await.unwrap();

        assert_eq!(tail, tail_lines(&content, 100));
        assert!(tail.starts_with("10.0.0.1 - - \"GET /page/199901 "));
        assert!(tail.ends_with("/page/200000 HTTP/1.1\" 200"));
    }

    #[tokio::test]
    async fn test_read_tail_block_boundaries() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("error.log");

        // 单行跨越多个块，且文件末尾没有换行
        let long = "x".repeat(TAIL_BLOCK_SIZE as usize * 3 + 17);
        let content = format!("first\n{}\nmiddle\nlast", long);
        fs::write(&path, &content).unwrap();

        assert_eq!(read_tail(&path, 1).await.unwrap(), "last");
        assert_eq!(read_tail(&path, 3).await.unwrap(), format!("{}\nmiddle\nlast", long));
        assert_eq!(read_tail(&path, 100).await.unwrap(), content);

        fs::write(&path, "").unwrap();
        assert_eq!(read_tail(&path, 100).await.unwrap(), "");
    }

    #[test]
    fn test_tail_lines() {
        assert_eq!(tail_lines("a\nb\nc\n", 2), "b\nc");
        assert_eq!(tail_lines("a\nb", 5), "a\nb");
        assert_eq!(tail_lines("", 100), "");
    }
}
