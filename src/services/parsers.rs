//! 系统命令输出解析
//!
//! 全部为宽松解析：缺失的字段以 "Unknown" 代替，不返回错误

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::{ServiceState, UNKNOWN};

/// 内存用量（`free -m`，单位 MB）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryUsage {
    pub total: String,
    pub used: String,
    pub free: String,
}

/// 根分区用量（`df -h /`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskUsage {
    pub total: String,
    pub used: String,
    pub free: String,
}

fn column(parts: &[&str], idx: usize) -> String {
    parts
        .get(idx)
        .map(|s| s.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn non_empty_or_unknown(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

/// 从 /proc/cpuinfo 取第一个 `model name`
pub fn parse_cpu_model(cpuinfo: &str) -> String {
    cpuinfo
        .lines()
        .find(|line| line.starts_with("model name"))
        .and_then(|line| line.split_once(':'))
        .map(|(_, model)| non_empty_or_unknown(model))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// 解析 `free -m` 的 `Mem:` 行
///
/// ```text
///                total        used        free      shared  buff/cache   available
/// Mem:           15876        8123        1432         512        6321        6890
/// ```
pub fn parse_free(output: &str) -> MemoryUsage {
    let parts: Vec<&str> = output
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("Mem:"))
        .map(|line| line.split_whitespace().collect())
        .unwrap_or_default();

    MemoryUsage {
        total: column(&parts, 1),
        used: column(&parts, 2),
        free: column(&parts, 3),
    }
}

/// 解析 `df -h /` 的最后一行
///
/// ```text
/// Filesystem      Size  Used Avail Use% Mounted on
/// /dev/sda1        50G   21G   27G  44% /
/// ```
pub fn parse_df(output: &str) -> DiskUsage {
    let parts: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .map(|line| line.split_whitespace().collect())
        .unwrap_or_default();

    DiskUsage {
        total: column(&parts, 1),
        used: column(&parts, 2),
        free: column(&parts, 3),
    }
}

/// `uptime -p` 的输出（e.g. "up 3 days, 4 hours"）
pub fn parse_uptime_pretty(output: &str) -> String {
    non_empty_or_unknown(output)
}

/// 从 `uptime` 输出中取 `load average:` 之后的部分
pub fn parse_load_average(output: &str) -> String {
    output
        .split_once("load average:")
        .map(|(_, load)| non_empty_or_unknown(load))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// `systemctl is-active` 输出恰好为 "active" 时才视为运行中
pub fn parse_service_state(output: &str) -> ServiceState {
    if output.trim() == "active" {
        ServiceState::Running
    } else {
        ServiceState::Stopped
    }
}

/// 从 nginx 站点配置中提取 php-fpm socket 对应的版本（如 8.1、8.10）
pub fn parse_php_version_from_nginx(config: &str) -> Option<String> {
    static FPM_SOCK: OnceLock<Regex> = OnceLock::new();
    let re = FPM_SOCK.get_or_init(|| {
        Regex::new(r"php([0-9]+\.[0-9]+)-fpm\.sock").expect("static regex is valid")
    });

    re.captures(config).map(|caps| caps[1].to_string())
}
