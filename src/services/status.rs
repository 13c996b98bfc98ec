//! 只读状态查询
//!
//! 站点列表、系统信息、PHP 运行时、服务状态。每次请求实时查询，不做缓存；
//! 所有命令都以非提权方式执行。

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use sysinfo::System;
use tracing::{debug, warn};

use crate::config::{EnvConfig, SiteLayout};
use crate::domain::{
    Dashboard, ManagedService, PhpRuntime, PhpStatus, ServiceState, ServiceStatus, SystemInfo,
    Website, UNKNOWN,
};
use crate::infra::{CommandExecutor, CommandSpec};

use super::parsers;

/// 状态查询服务
pub struct StatusQueries {
    executor: Arc<dyn CommandExecutor>,
    layout: SiteLayout,
    php_fpm_bin_dir: PathBuf,
    php_versions: Vec<String>,
    services: Vec<ManagedService>,
}

impl StatusQueries {
    pub fn new(executor: Arc<dyn CommandExecutor>, config: &EnvConfig) -> Self {
        Self {
            executor,
            layout: config.layout.clone(),
            php_fpm_bin_dir: config.php_fpm_bin_dir.clone(),
            php_versions: config.php_versions.clone(),
            services: config.managed_services(),
        }
    }

    // ========== 站点 ==========

    /// 列出 sites 根目录下的所有站点（按域名排序）
    ///
    /// 根目录不存在时返回空列表
    pub async fn list_websites(&self) -> io::Result<Vec<Website>> {
        let mut entries = match tokio::fs::read_dir(&self.layout.sites_root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(root = %self.layout.sites_root.display(), "Sites root does not exist");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut websites = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            // 跟随符号链接判断是否为目录
            let is_dir = tokio::fs::metadata(entry.path())
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);
            if !is_dir {
                continue;
            }

            let Ok(domain) = entry.file_name().into_string() else {
                warn!(path = %entry.path().display(), "Skipping non UTF-8 site directory");
                continue;
            };

            websites.push(self.build_website(domain).await);
        }

        websites.sort_by(|a, b| a.domain.cmp(&b.domain));
        Ok(websites)
    }

    /// 查询单个站点，目录不存在时返回 None
    pub async fn website(&self, domain: &str) -> Option<Website> {
        let is_dir = tokio::fs::metadata(self.layout.site_dir(domain))
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

        if is_dir {
            Some(self.build_website(domain.to_string()).await)
        } else {
            None
        }
    }

    async fn build_website(&self, domain: String) -> Website {
        let php_version = self.detect_php_version(&domain).await;
        Website {
            content_path: self.layout.content_dir(&domain),
            logs_path: self.layout.logs_dir(&domain),
            php_version,
            domain,
        }
    }

    /// 优先读取 php_version.txt，其次从 nginx 配置的 fpm socket 推断
    async fn detect_php_version(&self, domain: &str) -> String {
        if let Ok(marker) = tokio::fs::read_to_string(self.layout.php_marker(domain)).await {
            return marker.trim().to_string();
        }

        match tokio::fs::read_to_string(self.layout.nginx_available_conf(domain)).await {
            Ok(config) => parsers::parse_php_version_from_nginx(&config)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            Err(_) => UNKNOWN.to_string(),
        }
    }

    // ========== 系统信息 ==========

    pub async fn system_info(&self) -> SystemInfo {
        let cpuinfo = self.read_output(CommandSpec::new("cat").arg("/proc/cpuinfo")).await;
        let free = self.read_output(CommandSpec::new("free").arg("-m")).await;
        let df = self.read_output(CommandSpec::new("df").args(["-h", "/"])).await;
        let uptime_pretty = self.read_output(CommandSpec::new("uptime").arg("-p")).await;
        let uptime = self.read_output(CommandSpec::new("uptime")).await;

        let memory = parsers::parse_free(&free);
        let disk = parsers::parse_df(&df);

        SystemInfo {
            hostname: System::host_name().unwrap_or_else(|| UNKNOWN.to_string()),
            kernel: System::kernel_version().unwrap_or_else(|| UNKNOWN.to_string()),
            cpu: parsers::parse_cpu_model(&cpuinfo),
            memory_total: memory.total,
            memory_used: memory.used,
            memory_free: memory.free,
            disk_total: disk.total,
            disk_used: disk.used,
            disk_free: disk.free,
            uptime: parsers::parse_uptime_pretty(&uptime_pretty),
            load: parsers::parse_load_average(&uptime),
        }
    }

    /// 执行只读命令并返回输出，启动失败时返回空字符串
    async fn read_output(&self, spec: CommandSpec) -> String {
        match self.executor.run(&spec).await {
            Ok(result) => result.output,
            Err(e) => {
                warn!(command = %spec, error = %e, "Status command failed");
                String::new()
            }
        }
    }

    // ========== PHP ==========

    /// 检查每个 PHP 版本的 php-fpm 可执行文件是否存在
    pub async fn php_versions(&self) -> Vec<PhpRuntime> {
        let mut runtimes = Vec::with_capacity(self.php_versions.len());
        for version in &self.php_versions {
            let binary = self.php_fpm_bin_dir.join(format!("php-fpm{}", version));
            let status = if tokio::fs::metadata(&binary).await.is_ok() {
                PhpStatus::Installed
            } else {
                PhpStatus::NotInstalled
            };
            runtimes.push(PhpRuntime {
                version: version.clone(),
                status,
            });
        }
        runtimes
    }

    // ========== 服务 ==========

    pub async fn service_state(&self, unit: &str) -> ServiceState {
        let spec = CommandSpec::new("systemctl").args(["is-active", unit]);
        match self.executor.run(&spec).await {
            Ok(result) => parsers::parse_service_state(&result.output),
            Err(e) => {
                warn!(unit = %unit, error = %e, "Failed to query service state");
                ServiceState::Stopped
            }
        }
    }

    pub async fn service_statuses(&self) -> Vec<ServiceStatus> {
        let mut statuses = Vec::with_capacity(self.services.len());
        for service in &self.services {
            statuses.push(ServiceStatus {
                name: service.name.clone(),
                service: service.unit.clone(),
                status: self.service_state(&service.unit).await,
            });
        }
        statuses
    }

    // ========== 聚合 ==========

    pub async fn dashboard(&self) -> io::Result<Dashboard> {
        Ok(Dashboard {
            generated_at: chrono::Utc::now(),
            websites: self.list_websites().await?,
            system: self.system_info().await,
            php_versions: self.php_versions().await,
            services: self.service_statuses().await,
        })
    }
}
