//! 系统信息 API
//!
//! 包含 /system/info, /php, /services, /dashboard 端点

use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::domain::{Dashboard, PhpRuntime, ServiceStatus, SystemInfo};
use crate::error::ApiResult;
use crate::middleware::RequireApiKey;
use crate::state::AppState;

/// 创建系统信息路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/system/info", get(get_system_info))
        .route("/php", get(get_php_versions))
        .route("/services", get(get_services))
        .route("/dashboard", get(get_dashboard))
}

/// 获取 CPU / 内存 / 磁盘 / 运行时间 / 负载
///
/// GET /system/info
/// 需要 API Key
async fn get_system_info(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
) -> Json<SystemInfo> {
    Json(state.status.system_info().await)
}

/// 获取 PHP 运行时安装状态
///
/// GET /php
/// 需要 API Key
async fn get_php_versions(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<PhpRuntime>> {
    Json(state.status.php_versions().await)
}

/// 获取受管服务运行状态
///
/// GET /services
/// 需要 API Key
async fn get_services(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ServiceStatus>> {
    Json(state.status.service_statuses().await)
}

/// 面板首页聚合数据
///
/// GET /dashboard
/// 需要 API Key
async fn get_dashboard(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Dashboard>> {
    Ok(Json(state.status.dashboard().await?))
}
