//! 接口层：运行时事件循环与 HTTP 接入

pub mod http;
pub mod runtime;
