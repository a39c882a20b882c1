//! 接口层：HTTP API

pub mod http;
