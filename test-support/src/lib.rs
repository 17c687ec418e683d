//! 测试支持 crate
//!
//! 提供 globalmem 外部协作者（数据搬运通道、设备号注册服务）的 Mock 实现

#![no_std]

pub mod mock;
