//! 设备层错误类型
//!
//! 各错误码对应标准 POSIX errno 值，可通过 [`MemError::to_errno()`] 转换为系统调用返回值。

use uapi::errno::{EACCES, EBUSY, EFAULT, EINVAL, ENODEV, ENOENT, ENOMEM, EOPNOTSUPP};

use crate::ops::TransferFault;

/// globalmem 错误类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemError {
    /// 槽位号不存在 (-ENOENT)
    NotFound,
    /// 与调用方内存之间的数据搬运失败 (-EFAULT)
    TransferFault,
    /// 无效参数，例如越界的 lseek 目标或未知的 whence (-EINVAL)
    InvalidArgument,
    /// 不认识的维护命令 (-EOPNOTSUPP)
    NotSupported,
    /// 打开模式不允许该操作 (-EACCES)
    PermissionDenied,
    /// 设备号不属于本驱动 (-ENODEV)
    NoDevice,
    /// 设备号区间已被占用 (-EBUSY)
    Busy,
    /// 设备内存申请失败 (-ENOMEM)
    NoMemory,
}

impl MemError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        let errno = match self {
            MemError::NotFound => ENOENT,
            MemError::TransferFault => EFAULT,
            MemError::InvalidArgument => EINVAL,
            MemError::NotSupported => EOPNOTSUPP,
            MemError::PermissionDenied => EACCES,
            MemError::NoDevice => ENODEV,
            MemError::Busy => EBUSY,
            MemError::NoMemory => ENOMEM,
        };
        -(errno as isize)
    }
}

impl From<TransferFault> for MemError {
    fn from(_: TransferFault) -> Self {
        MemError::TransferFault
    }
}
