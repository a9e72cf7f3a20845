//! 搜索服务模块
//!
//! - SearchService: 在后台线程执行查询，逐上下文上报进度
//! - SearchTask: 任务句柄（状态、进度、停止请求）

mod service;

pub use service::{SearchRequest, SearchService, SearchTask};
