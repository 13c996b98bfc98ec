//! 服务层模块
//!
//! 包含核心业务逻辑

pub mod dispatcher;
pub mod parsers;
pub mod status;

pub use dispatcher::ActionDispatcher;
pub use status::StatusQueries;
