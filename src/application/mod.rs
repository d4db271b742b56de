//! 应用层：请求编排

pub mod chat;
