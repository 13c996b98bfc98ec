//! 领域模型模块
//!
//! 纯数据结构，不依赖 axum/tokio

pub mod action;
pub mod site;
pub mod system;

// Re-exports for convenience
pub use action::{Action, ActionError, ActionParams, ActionRequest, ActionResult};
pub use site::{is_valid_domain, LogType, Website};
pub use system::{
    Dashboard, ManagedService, PhpRuntime, PhpStatus, ServiceState, ServiceStatus, SystemInfo,
    UNKNOWN,
};
