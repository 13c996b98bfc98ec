//! 站点目录与 Web 服务器配置路径

use std::path::{Path, PathBuf};

/// 文件系统布局
///
/// ```text
/// <sites_root>/<domain>/public_html
/// <sites_root>/<domain>/logs
/// <sites_root>/<domain>/backup
/// <sites_root>/<domain>/php_version.txt
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteLayout {
    pub sites_root: PathBuf,
    pub nginx_sites_available: PathBuf,
    pub nginx_sites_enabled: PathBuf,
    pub apache_sites_available: PathBuf,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            sites_root: PathBuf::from("/sites"),
            nginx_sites_available: PathBuf::from("/etc/nginx/sites-available"),
            nginx_sites_enabled: PathBuf::from("/etc/nginx/sites-enabled"),
            apache_sites_available: PathBuf::from("/etc/apache2/sites-available"),
        }
    }
}

impl SiteLayout {
    /// 以 `root` 为站点根目录、其下 `etc/` 为配置目录的布局，用于测试
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            sites_root: root.join("sites"),
            nginx_sites_available: root.join("etc/nginx/sites-available"),
            nginx_sites_enabled: root.join("etc/nginx/sites-enabled"),
            apache_sites_available: root.join("etc/apache2/sites-available"),
        }
    }

    pub fn site_dir(&self, domain: &str) -> PathBuf {
        self.sites_root.join(domain)
    }

    pub fn content_dir(&self, domain: &str) -> PathBuf {
        self.site_dir(domain).join("public_html")
    }

    pub fn logs_dir(&self, domain: &str) -> PathBuf {
        self.site_dir(domain).join("logs")
    }

    pub fn backup_dir(&self, domain: &str) -> PathBuf {
        self.site_dir(domain).join("backup")
    }

    pub fn php_marker(&self, domain: &str) -> PathBuf {
        self.site_dir(domain).join("php_version.txt")
    }

    /// 站点配置文件名 (`<domain>.conf`)
    pub fn conf_name(domain: &str) -> String {
        format!("{}.conf", domain)
    }

    pub fn nginx_available_conf(&self, domain: &str) -> PathBuf {
        self.nginx_sites_available.join(Self::conf_name(domain))
    }

    pub fn nginx_enabled_conf(&self, domain: &str) -> PathBuf {
        self.nginx_sites_enabled.join(Self::conf_name(domain))
    }

    pub fn apache_available_conf(&self, domain: &str) -> PathBuf {
        self.apache_sites_available.join(Self::conf_name(domain))
    }
}
