//! 基础设施层（存储、推送发送、请求校验）

pub mod persistence;
pub mod push;
pub mod validator;
