//! 核心层：知识库、匹配与公共抽象
//!
//! 匹配器和意图识别都是只读知识库上的纯函数，不做 I/O，调用之间不保留状态

pub mod config;
pub mod intent;
pub mod knowledge;
pub mod matcher;
pub mod store;
