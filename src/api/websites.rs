//! 站点列表 API

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::domain::{is_valid_domain, Website};
use crate::error::{ApiError, ApiResult};
use crate::middleware::RequireApiKey;
use crate::state::AppState;

/// 创建站点路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/websites", get(list_websites))
        .route("/websites/:domain", get(get_website))
}

/// 列出所有站点
///
/// GET /websites
/// 需要 API Key
async fn list_websites(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Website>>> {
    let websites = state.status.list_websites().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list websites");
        ApiError::from(e)
    })?;
    Ok(Json(websites))
}

/// 查询单个站点
///
/// GET /websites/:domain
/// 需要 API Key
async fn get_website(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
    Path(domain): Path<String>,
) -> ApiResult<Json<Website>> {
    if !is_valid_domain(&domain) {
        return Err(ApiError::bad_request(format!("Invalid domain: {}", domain)));
    }

    state
        .status
        .website(&domain)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Website {}", domain)))
}
