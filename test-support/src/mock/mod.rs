//! Mock 实现模块
//!
//! 注意：这里不直接依赖 `globalmem` crate（避免循环依赖）。
//! `globalmem` crate 在 `cfg(test)` 下为这些类型实现其 trait
//! （`TransferChannel` / `DeviceRegistrationService`）。

pub mod chrdev;
pub mod transfer;
