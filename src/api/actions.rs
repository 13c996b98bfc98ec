//! 站点操作 API
//!
//! 包含 /actions 端点。每个被调度的操作都返回 200，成功与否由 `success` 字段表示。

use axum::{
    extract::{Path, State},
    routing::post,
    Form, Json, Router,
};
use std::sync::Arc;

use crate::domain::{ActionParams, ActionRequest, ActionResult};
use crate::middleware::RequireApiKey;
use crate::state::AppState;

/// 创建站点操作路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/actions", post(run_action))
        .route("/actions/form", post(run_form_action))
        .route("/actions/:action", post(run_named_action))
}

/// 执行操作
///
/// POST /actions
/// Body: `{"action": "backup_website", "params": {"domain": "example.com"}}`
/// 需要 API Key
async fn run_action(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ActionRequest>,
) -> Json<ActionResult> {
    tracing::info!(action = %request.action, "Action requested");
    Json(
        state
            .dispatcher
            .dispatch_named(&request.action, &request.params)
            .await,
    )
}

/// 执行操作（操作名在路径中，Body 为参数表）
///
/// POST /actions/:action
/// 需要 API Key
async fn run_named_action(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
    Path(action): Path<String>,
    Json(params): Json<ActionParams>,
) -> Json<ActionResult> {
    tracing::info!(action = %action, "Action requested");
    Json(state.dispatcher.dispatch_named(&action, &params).await)
}

/// 执行表单提交的操作（`action` 字段 + 其余表单字段）
///
/// POST /actions/form
/// 需要 API Key
async fn run_form_action(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
    Form(mut fields): Form<ActionParams>,
) -> Json<ActionResult> {
    let action = fields.remove("action").unwrap_or_default();
    tracing::info!(action = %action, "Form action requested");
    Json(state.dispatcher.dispatch_named(&action, &fields).await)
}
