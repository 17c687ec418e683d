//! 外部协作者 trait 定义
//!
//! 设备层需要宿主提供两类能力，这里只定义接口：
//!
//! - [`TransferChannel`]: 在调用方内存与设备内存之间搬运字节（对应 copy_to/from_user）
//! - [`DeviceRegistrationService`]: 设备号区间的申请/释放与设备挂载/卸载
//!
//! 两者都只在调用点按引用传入，不做全局注册。

use crate::MemError;

/// 数据搬运失败
///
/// `uncopied` 为未能完成搬运的字节数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferFault {
    /// 未拷贝的字节数
    pub uncopied: usize,
}

/// 跨边界数据搬运通道
pub trait TransferChannel: Send + Sync {
    /// 把 `src` 拷贝到 `dst`，返回实际拷贝的字节数
    ///
    /// 调用方保证 `dst.len() == src.len()`。失败时 `dst` 中已拷贝部分的内容不确定。
    fn transfer(&self, dst: &mut [u8], src: &[u8]) -> Result<usize, TransferFault>;

    /// 进入用户空间访问模式（可选）
    fn enter_user_access(&self) {}

    /// 退出用户空间访问模式（可选）
    fn exit_user_access(&self) {}
}

/// 用户空间访问保护 guard
///
/// 在作用域结束时自动退出用户空间访问模式，搬运失败的路径也不例外。
pub struct UserAccessGuard<'a> {
    channel: &'a dyn TransferChannel,
}

impl<'a> UserAccessGuard<'a> {
    /// 进入用户空间访问模式
    #[inline]
    pub fn new(channel: &'a dyn TransferChannel) -> Self {
        channel.enter_user_access();
        Self { channel }
    }
}

impl Drop for UserAccessGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.channel.exit_user_access();
    }
}

/// 直接内存拷贝
///
/// 调用方与设备处于同一地址空间时使用（内核内部调用者、宿主测试）。
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectTransfer;

impl TransferChannel for DirectTransfer {
    fn transfer(&self, dst: &mut [u8], src: &[u8]) -> Result<usize, TransferFault> {
        let len = dst.len().min(src.len());
        dst[..len].copy_from_slice(&src[..len]);
        let expected = dst.len().max(src.len());
        if len < expected {
            return Err(TransferFault {
                uncopied: expected - len,
            });
        }
        Ok(len)
    }
}

/// 设备号注册服务
///
/// 宿主负责把 globalmem 的设备号区间接入自己的设备表。
/// 设备号统一使用 [`crate::makedev`] 的编码。
pub trait DeviceRegistrationService: Send + Sync {
    /// 静态注册从 `first` 开始的 `count` 个设备号
    fn register_region(&self, first: u64, count: u32, name: &str) -> Result<(), MemError>;

    /// 动态申请 `count` 个设备号，minor 从 `first_minor` 开始；返回首个设备号
    fn alloc_region(&self, first_minor: u32, count: u32, name: &str) -> Result<u64, MemError>;

    /// 释放设备号区间
    fn unregister_region(&self, first: u64, count: u32);

    /// 把设备挂到宿主上，之后该设备号即可被打开
    fn add_device(&self, dev: u64, count: u32) -> Result<(), MemError>;

    /// 从宿主上摘除设备
    fn del_device(&self, dev: u64);
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_support::mock::transfer::MockTransfer;

    #[test]
    fn test_direct_transfer_copies() {
        let src = *b"abcd";
        let mut dst = [0u8; 4];
        assert_eq!(DirectTransfer.transfer(&mut dst, &src), Ok(4));
        assert_eq!(&dst, b"abcd");
    }

    #[test]
    fn test_direct_transfer_length_mismatch() {
        let src = *b"abcdef";
        let mut dst = [0u8; 4];
        assert_eq!(
            DirectTransfer.transfer(&mut dst, &src),
            Err(TransferFault { uncopied: 2 })
        );
        assert_eq!(&dst, b"abcd");
    }

    #[test]
    fn test_user_access_guard_brackets() {
        let channel = MockTransfer::new();
        {
            let _guard = UserAccessGuard::new(&channel);
            assert!(channel.in_access());
        }
        assert!(!channel.in_access());
        assert_eq!(channel.max_access_depth(), 1);
    }
}
