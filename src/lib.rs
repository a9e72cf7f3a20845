//! helpsearch - 帮助文档全文搜索库
//!
//! 模块结构：
//! - kernel::search: 索引数据模型、XML 读写、分词与匹配
//! - kernel::services::ports: 错误、消息与配置契约
//! - kernel::services::adapters: 异步搜索任务、配置文件与目录

pub mod kernel;
