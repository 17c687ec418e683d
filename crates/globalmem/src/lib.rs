//! globalmem 字符设备
//!
//! 把 N 块固定容量的内存区域以“文件”的形式暴露出来，支持
//! open / read / write / lseek / ioctl(MEM_CLEAR) / release。
//!
//! - [`GlobalMemDevice`] - 单个设备实例，持有定长缓冲区
//! - [`GlobalMemFile`] - 一次打开会话，维护自己的读写位置
//! - [`GlobalMemRegistry`] - 按槽位号管理全部设备实例
//! - [`File`] trait - 统一的文件操作接口
//!
//! # 外部协作者
//!
//! 设备层不直接接触宿主环境，而是通过 trait 抽象：
//! - [`TransferChannel`]: 调用方内存与设备内存之间的数据搬运
//! - [`DeviceRegistrationService`]: 设备号区间的申请、释放与设备挂载
//!
//! # 示例
//! ```
//! use std::sync::Arc;
//! use globalmem::{
//!     DeviceRegistrationService, DirectTransfer, File, GlobalMemConfig, GlobalMemRegistry,
//!     MemError, SeekWhence,
//! };
//!
//! struct Host;
//!
//! impl DeviceRegistrationService for Host {
//!     fn register_region(&self, _first: u64, _count: u32, _name: &str) -> Result<(), MemError> {
//!         Ok(())
//!     }
//!     fn alloc_region(&self, first_minor: u32, _count: u32, _name: &str) -> Result<u64, MemError> {
//!         Ok(globalmem::makedev(240, first_minor))
//!     }
//!     fn unregister_region(&self, _first: u64, _count: u32) {}
//!     fn add_device(&self, _dev: u64, _count: u32) -> Result<(), MemError> {
//!         Ok(())
//!     }
//!     fn del_device(&self, _dev: u64) {}
//! }
//!
//! let registry =
//!     GlobalMemRegistry::init(&GlobalMemConfig::default(), &Host, Arc::new(DirectTransfer))
//!         .unwrap();
//! let file = registry.open(0).unwrap();
//! assert_eq!(file.write(b"HelloWorld"), Ok(10));
//! assert_eq!(file.lseek(-5, SeekWhence::Cur), Ok(5));
//! let mut buf = [0u8; 5];
//! assert_eq!(file.read(&mut buf), Ok(5));
//! assert_eq!(&buf, b"World");
//! registry.release(file);
//! registry.teardown(&Host);
//! ```

#![no_std]

extern crate alloc;

pub mod config;
pub mod dev;
pub mod error;
pub mod ops;

mod device;
mod file;
mod registry;

// Re-export config
pub use config::{DEVICE_NAME, DEVICE_NUM, GLOBALMEM_MAJOR, GLOBALMEM_SIZE, GlobalMemConfig};

// Re-export dev
pub use dev::{major, makedev, minor};

// Re-export error
pub use error::MemError;

// Re-export ops
pub use ops::{
    DeviceRegistrationService, DirectTransfer, TransferChannel, TransferFault, UserAccessGuard,
};

// Re-export device / file / registry
pub use device::GlobalMemDevice;
pub use file::{File, GlobalMemFile, MaintenanceCommand};
pub use registry::GlobalMemRegistry;

// Re-export uapi types for convenience
pub use uapi::fcntl::{OpenFlags, SeekWhence};
pub use uapi::ioctl::MEM_CLEAR;
