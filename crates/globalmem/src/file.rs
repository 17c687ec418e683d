//! 文件抽象层 - 打开会话接口
//!
//! [`File`] 是设备文件的统一操作接口；[`GlobalMemFile`] 是 globalmem 的实现，
//! 每次 open 产生一个，各自维护读写位置，多个会话可以同时指向同一设备。

use sync::SpinLock;
use uapi::fcntl::{OpenFlags, SeekWhence};
use uapi::ioctl::MEM_CLEAR;

use crate::device::GlobalMemDevice;
use crate::ops::TransferChannel;
use crate::MemError;

/// 文件操作的统一接口
pub trait File: Send + Sync {
    /// 检查文件是否可读
    fn readable(&self) -> bool;

    /// 检查文件是否可写
    fn writable(&self) -> bool;

    /// 从当前位置读取数据，成功后位置前移实际读取的字节数
    fn read(&self, buf: &mut [u8]) -> Result<usize, MemError>;

    /// 从当前位置写入数据，成功后位置前移实际写入的字节数
    fn write(&self, buf: &[u8]) -> Result<usize, MemError>;

    /// 设置文件偏移量（可选方法）
    fn lseek(&self, _offset: isize, _whence: SeekWhence) -> Result<usize, MemError> {
        Err(MemError::NotSupported)
    }

    /// 获取当前偏移量（可选方法）
    fn offset(&self) -> usize {
        0
    }

    /// 获取打开标志（可选方法）
    fn flags(&self) -> OpenFlags {
        OpenFlags::empty()
    }

    /// 从指定位置读取数据，不移动偏移量（可选方法，用于 pread64）
    fn read_at(&self, _offset: usize, _buf: &mut [u8]) -> Result<usize, MemError> {
        Err(MemError::NotSupported)
    }

    /// 向指定位置写入数据，不移动偏移量（可选方法，用于 pwrite64）
    fn write_at(&self, _offset: usize, _buf: &[u8]) -> Result<usize, MemError> {
        Err(MemError::NotSupported)
    }

    /// 执行设备特定的控制操作（可选方法，用于 ioctl）
    fn ioctl(&self, _request: u32, _arg: usize) -> Result<isize, MemError> {
        Err(MemError::NotSupported)
    }
}

/// 维护命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceCommand {
    /// 将设备内存清零
    Clear,
}

impl TryFrom<u32> for MaintenanceCommand {
    type Error = MemError;

    fn try_from(request: u32) -> Result<Self, Self::Error> {
        match request {
            MEM_CLEAR => Ok(MaintenanceCommand::Clear),
            _ => Err(MemError::NotSupported),
        }
    }
}

/// globalmem 设备文件
///
/// 借用注册表中的设备与搬运通道，因此不能比注册表活得更久。
pub struct GlobalMemFile<'a> {
    /// 绑定的设备
    device: &'a GlobalMemDevice,

    /// 数据搬运通道
    channel: &'a dyn TransferChannel,

    /// 打开标志位
    flags: OpenFlags,

    /// 当前偏移量，始终位于 `[0, capacity]`
    offset: SpinLock<usize>,
}

impl<'a> GlobalMemFile<'a> {
    /// 创建偏移量为 0 的新会话
    pub fn new(
        device: &'a GlobalMemDevice,
        channel: &'a dyn TransferChannel,
        flags: OpenFlags,
    ) -> Self {
        Self {
            device,
            channel,
            flags,
            offset: SpinLock::new(0),
        }
    }

    /// 绑定的设备
    pub fn device(&self) -> &'a GlobalMemDevice {
        self.device
    }

    /// 以原始 whence 值定位，未知取值返回 [`MemError::InvalidArgument`]
    pub fn lseek_raw(&self, offset: isize, whence: i32) -> Result<usize, MemError> {
        let whence = SeekWhence::try_from(whence).map_err(|_| MemError::InvalidArgument)?;
        self.lseek(offset, whence)
    }

    /// 执行维护命令
    pub fn maintenance(&self, command: MaintenanceCommand) {
        match command {
            MaintenanceCommand::Clear => self.device.clear(),
        }
    }
}

impl File for GlobalMemFile<'_> {
    fn readable(&self) -> bool {
        self.flags.readable()
    }

    fn writable(&self) -> bool {
        self.flags.writable()
    }

    fn read(&self, buf: &mut [u8]) -> Result<usize, MemError> {
        if !self.readable() {
            return Err(MemError::PermissionDenied);
        }

        let mut offset_guard = self.offset.lock();
        let count = self.device.read(*offset_guard, buf, self.channel)?;
        *offset_guard += count;
        Ok(count)
    }

    fn write(&self, buf: &[u8]) -> Result<usize, MemError> {
        if !self.writable() {
            return Err(MemError::PermissionDenied);
        }

        let mut offset_guard = self.offset.lock();
        let count = self.device.write(*offset_guard, buf, self.channel)?;
        *offset_guard += count;
        Ok(count)
    }

    fn lseek(&self, offset: isize, whence: SeekWhence) -> Result<usize, MemError> {
        let mut offset_guard = self.offset.lock();
        let current = *offset_guard as isize;

        let new_offset = match whence {
            SeekWhence::Set => offset,
            SeekWhence::Cur => current
                .checked_add(offset)
                .ok_or(MemError::InvalidArgument)?,
            // 不支持相对末尾定位
            SeekWhence::End => return Err(MemError::InvalidArgument),
        };

        if new_offset < 0 || new_offset as usize > self.device.capacity() {
            return Err(MemError::InvalidArgument);
        }

        *offset_guard = new_offset as usize;
        Ok(new_offset as usize)
    }

    fn offset(&self) -> usize {
        *self.offset.lock()
    }

    fn flags(&self) -> OpenFlags {
        self.flags
    }

    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, MemError> {
        if !self.readable() {
            return Err(MemError::PermissionDenied);
        }
        self.device.read(offset, buf, self.channel)
    }

    fn write_at(&self, offset: usize, buf: &[u8]) -> Result<usize, MemError> {
        if !self.writable() {
            return Err(MemError::PermissionDenied);
        }
        self.device.write(offset, buf, self.channel)
    }

    fn ioctl(&self, request: u32, _arg: usize) -> Result<isize, MemError> {
        self.maintenance(MaintenanceCommand::try_from(request)?);
        Ok(0)
    }
}
