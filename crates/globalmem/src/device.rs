//! 设备实例：定长内存缓冲区
//!
//! 读写都以调用方给出的偏移为起点，超出容量的部分被截断而不是报错；
//! 偏移本身已越过末尾时返回 0，表示读到/写到了末尾。

use alloc::boxed::Box;
use alloc::vec::Vec;
use log::{debug, info};
use sync::RwLock;

use crate::ops::{TransferChannel, UserAccessGuard};
use crate::MemError;

/// 单个 globalmem 设备
///
/// 缓冲区在创建时清零，长度在整个生命周期内保持为 `capacity`。
/// 读操作持共享锁，写操作与清零持独占锁，锁只覆盖缓冲区访问本身。
pub struct GlobalMemDevice {
    /// 槽位号
    index: usize,
    /// 设备号
    dev: u64,
    /// 容量（字节）
    capacity: usize,
    /// 设备内存
    mem: RwLock<Box<[u8]>>,
    /// 是否已挂到宿主上
    online: bool,
}

impl GlobalMemDevice {
    /// 创建清零的设备实例
    ///
    /// 内存申请失败时返回 [`MemError::NoMemory`]，不会中止进程。
    pub fn new(index: usize, dev: u64, capacity: usize) -> Result<Self, MemError> {
        let mut mem = Vec::new();
        mem.try_reserve_exact(capacity).map_err(|_| MemError::NoMemory)?;
        mem.resize(capacity, 0u8);

        Ok(Self {
            index,
            dev,
            capacity,
            mem: RwLock::new(mem.into_boxed_slice()),
            online: false,
        })
    }

    /// 槽位号
    pub fn index(&self) -> usize {
        self.index
    }

    /// 设备号
    pub fn dev(&self) -> u64 {
        self.dev
    }

    /// 容量（字节）
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 是否已成功挂到宿主上
    pub fn is_online(&self) -> bool {
        self.online
    }

    pub(crate) fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    /// 从 `pos` 开始最多能访问的字节数
    fn clip(&self, pos: usize, len: usize) -> usize {
        if pos >= self.capacity {
            0
        } else {
            len.min(self.capacity - pos)
        }
    }

    /// 从设备内存 `pos` 处读到 `buf`
    ///
    /// # 返回值
    /// 实际读出的字节数；`pos` 已到末尾时为 0
    pub fn read(
        &self,
        pos: usize,
        buf: &mut [u8],
        channel: &dyn TransferChannel,
    ) -> Result<usize, MemError> {
        let count = self.clip(pos, buf.len());
        if count == 0 {
            return Ok(0);
        }

        let copied = {
            let mem = self.mem.read();
            let _access = UserAccessGuard::new(channel);
            channel.transfer(&mut buf[..count], &mem[pos..pos + count])?
        }
        .min(count);

        debug!("globalmem{}: read {} byte(s) from {}", self.index, copied, pos);
        Ok(copied)
    }

    /// 把 `buf` 写入设备内存 `pos` 处，不会超出容量
    ///
    /// # 返回值
    /// 实际写入的字节数；`pos` 已到末尾时为 0
    pub fn write(
        &self,
        pos: usize,
        buf: &[u8],
        channel: &dyn TransferChannel,
    ) -> Result<usize, MemError> {
        let count = self.clip(pos, buf.len());
        if count == 0 {
            return Ok(0);
        }

        let copied = {
            let mut mem = self.mem.write();
            let _access = UserAccessGuard::new(channel);
            channel.transfer(&mut mem[pos..pos + count], &buf[..count])?
        }
        .min(count);

        debug!("globalmem{}: written {} byte(s) from {}", self.index, copied, pos);
        Ok(copied)
    }

    /// 将整个设备内存清零
    pub fn clear(&self) {
        self.mem.write().fill(0);
        info!("globalmem{} is set to zero", self.index);
    }

    /// 复制一份当前内存内容（用于调试）
    pub fn snapshot(&self) -> Vec<u8> {
        self.mem.read().to_vec()
    }
}

impl core::fmt::Debug for GlobalMemDevice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GlobalMemDevice")
            .field("index", &self.index)
            .field("dev", &self.dev)
            .field("capacity", &self.capacity)
            .field("online", &self.online)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::mock::transfer::MockTransfer;

    const CAP: usize = 4096;

    #[test]
    fn test_new_device_is_zeroed() {
        let dev = GlobalMemDevice::new(0, 0, CAP).unwrap();
        let snap = dev.snapshot();
        assert_eq!(snap.len(), CAP);
        assert!(snap.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_oversized_device_fails_cleanly() {
        assert_eq!(
            GlobalMemDevice::new(0, 0, isize::MAX as usize).err(),
            Some(MemError::NoMemory)
        );
    }

    #[test]
    fn test_lock_released_after_io() {
        let channel = MockTransfer::new();
        let dev = GlobalMemDevice::new(0, 0, CAP).unwrap();
        let mut buf = [0u8; 4];
        dev.write(0, b"abcd", &channel).unwrap();
        dev.read(0, &mut buf, &channel).unwrap();
        assert!(!dev.mem.is_locked());
    }

    #[test]
    fn test_read_past_end_returns_zero() {
        let channel = MockTransfer::new();
        let dev = GlobalMemDevice::new(0, 0, CAP).unwrap();
        let mut buf = [0xFFu8; 16];

        assert_eq!(dev.read(CAP, &mut buf, &channel), Ok(0));
        assert_eq!(dev.read(CAP + 100, &mut buf, &channel), Ok(0));
        assert_eq!(dev.read(usize::MAX, &mut buf, &channel), Ok(0));
        // 末尾之后不触发任何搬运
        assert_eq!(channel.transfer_count(), 0);
        assert_eq!(buf, [0xFFu8; 16]);
    }

    #[test]
    fn test_write_clipped_at_capacity() {
        let channel = MockTransfer::new();
        let dev = GlobalMemDevice::new(0, 0, CAP).unwrap();

        assert_eq!(dev.write(CAP - 5, b"0123456789", &channel), Ok(5));
        assert_eq!(dev.write(CAP, b"0123456789", &channel), Ok(0));

        let snap = dev.snapshot();
        assert_eq!(snap.len(), CAP);
        assert_eq!(&snap[CAP - 5..], b"01234");
    }

    #[test]
    fn test_read_clipped_at_capacity() {
        let channel = MockTransfer::new();
        let dev = GlobalMemDevice::new(0, 0, CAP).unwrap();
        dev.write(CAP - 3, b"xyz", &channel).unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(dev.read(CAP - 3, &mut buf, &channel), Ok(3));
        assert_eq!(&buf[..3], b"xyz");
        assert_eq!(&buf[3..], &[0u8; 5]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let channel = MockTransfer::new();
        let dev = GlobalMemDevice::new(3, 0, CAP).unwrap();
        dev.write(100, &[0xAB; 200], &channel).unwrap();

        dev.clear();
        let first = dev.snapshot();
        dev.clear();
        let second = dev.snapshot();

        assert_eq!(first, second);
        assert!(second.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_transfer_fault_is_reported() {
        let channel = MockTransfer::new();
        let dev = GlobalMemDevice::new(0, 0, CAP).unwrap();

        channel.fail_next(2);
        assert_eq!(
            dev.write(0, b"abcdef", &channel),
            Err(MemError::TransferFault)
        );

        let mut buf = [0u8; 4];
        channel.fail_next(0);
        assert_eq!(dev.read(0, &mut buf, &channel), Err(MemError::TransferFault));

        // 失败后 guard 仍然被释放
        assert!(!channel.in_access());
        // 锁也已释放，后续写入正常
        assert_eq!(dev.write(0, b"ok", &channel), Ok(2));
    }

    #[test]
    fn test_fault_never_touches_out_of_range_bytes() {
        let channel = MockTransfer::new();
        let dev = GlobalMemDevice::new(0, 0, CAP).unwrap();
        channel.fail_next(1);
        assert!(dev.write(10, b"zz", &channel).is_err());

        let snap = dev.snapshot();
        assert_eq!(snap[10], b'z');
        assert!(snap[..10].iter().all(|&b| b == 0));
        assert!(snap[11..].iter().all(|&b| b == 0));
    }
}
