//! 环境变量配置加载

use std::env;
use std::path::PathBuf;
use tracing::warn;

use crate::config::layout::SiteLayout;
use crate::domain::ManagedService;

/// 默认 API 密钥，启动时会给出警告
const DEFAULT_API_KEY: &str = "change-me-in-production";

/// 环境配置
#[derive(Clone, Debug)]
pub struct EnvConfig {
    /// API 密钥
    pub api_key: String,
    /// 服务监听端口
    pub port: u16,
    /// 站点目录与 Web 服务器配置路径
    pub layout: SiteLayout,
    /// 站点开通 / PHP 切换脚本
    pub scripts: ScriptPaths,
    /// php-fpm 可执行文件所在目录
    pub php_fpm_bin_dir: PathBuf,
    /// 支持的 PHP 版本
    pub php_versions: Vec<String>,
    /// 提权前缀（为空表示直接执行）
    pub elevate_with: Vec<String>,
    /// view_logs 返回的行数
    pub log_tail_lines: usize,
}

/// 外部开通脚本路径
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptPaths {
    /// `site_config.sh <domain> <php_version>`
    pub site_config: PathBuf,
    /// `php_switcher.sh <domain> <php_version>`
    pub php_switch: PathBuf,
}

impl Default for ScriptPaths {
    fn default() -> Self {
        Self {
            site_config: PathBuf::from("/usr/local/bin/site_config.sh"),
            php_switch: PathBuf::from("/usr/local/bin/php_switcher.sh"),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        let config = Self::from_lookup(|key| env::var(key).ok());

        if env::var("API_KEY").is_ok() && env::var("SITE_PANEL_API_KEY").is_err() {
            warn!("Deprecated environment variable API_KEY detected. Please use SITE_PANEL_API_KEY");
        }
        if config.api_key == DEFAULT_API_KEY {
            warn!("SITE_PANEL_API_KEY is not set, using the default key");
        }

        config
    }

    /// 从任意 key/value 来源加载配置
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let path_or = |key: &str, default: PathBuf| get(key).map(PathBuf::from).unwrap_or(default);

        // API Key - 支持旧名称兼容
        let api_key = get("SITE_PANEL_API_KEY")
            .or_else(|| get("API_KEY"))
            .unwrap_or_else(|| DEFAULT_API_KEY.to_string());

        let port = get("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(constants::DEFAULT_PORT);

        let defaults = SiteLayout::default();
        let layout = SiteLayout {
            sites_root: path_or("SITES_ROOT", defaults.sites_root),
            nginx_sites_available: path_or("NGINX_SITES_AVAILABLE", defaults.nginx_sites_available),
            nginx_sites_enabled: path_or("NGINX_SITES_ENABLED", defaults.nginx_sites_enabled),
            apache_sites_available: path_or("APACHE_SITES_AVAILABLE", defaults.apache_sites_available),
        };

        let default_scripts = ScriptPaths::default();
        let scripts = ScriptPaths {
            site_config: path_or("SITE_CONFIG_SCRIPT", default_scripts.site_config),
            php_switch: path_or("PHP_SWITCH_SCRIPT", default_scripts.php_switch),
        };

        let php_fpm_bin_dir = path_or("PHP_FPM_BIN_DIR", PathBuf::from("/usr/sbin"));

        let php_versions = get("PHP_VERSIONS")
            .map(|v| parse_list(&v, ','))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| {
                constants::DEFAULT_PHP_VERSIONS
                    .iter()
                    .map(|v| v.to_string())
                    .collect()
            });

        // 显式设置为空字符串时关闭提权
        let elevate_with = match lookup("ELEVATE_WITH") {
            Some(v) => parse_list(&v, ' '),
            None => vec!["sudo".to_string(), "-n".to_string()],
        };

        let log_tail_lines = get("LOG_TAIL_LINES")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(constants::DEFAULT_LOG_TAIL_LINES);

        Self {
            api_key,
            port,
            layout,
            scripts,
            php_fpm_bin_dir,
            php_versions,
            elevate_with,
            log_tail_lines,
        }
    }

    /// 状态页展示的服务列表
    pub fn managed_services(&self) -> Vec<ManagedService> {
        let mut services = vec![
            ManagedService::new("Nginx", "nginx"),
            ManagedService::new("Apache", "apache2"),
            ManagedService::new("MySQL", "mysql"),
        ];
        services.extend(self.php_versions.iter().map(|v| {
            ManagedService::new(format!("PHP-FPM {}", v), format!("php{}-fpm", v))
        }));
        services.push(ManagedService::new("Fail2Ban", "fail2ban"));
        services
    }
}

fn parse_list(value: &str, sep: char) -> Vec<String> {
    value
        .split(sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// 常量
pub mod constants {
    /// 默认监听端口
    pub const DEFAULT_PORT: u16 = 9880;

    /// view_logs 默认行数
    pub const DEFAULT_LOG_TAIL_LINES: usize = 100;

    /// 默认 PHP 版本
    pub const DEFAULT_PHP_VERSIONS: [&str; 4] = ["7.4", "8.0", "8.1", "8.2"];

    /// 服务名
    pub const SERVICE_NAME: &str = "site-panel-agent";

    /// 版本号
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
