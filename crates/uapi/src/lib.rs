//! 与用户空间共用定义和声明
//!
//! 包含 globalmem 设备对外暴露的常量与类型：错误码、打开标志、
//! lseek 的 whence 取值以及 ioctl 命令号。

#![no_std]
// uapi 中包含大量与 Linux 兼容的常量定义；逐项补 `///` 噪声较大。
#![allow(missing_docs)]

pub mod errno;
pub mod fcntl;
pub mod ioctl;
