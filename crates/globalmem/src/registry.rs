//! 设备注册表
//!
//! 持有全部 globalmem 设备实例，负责：
//!
//! - 初始化：申请设备号区间、创建清零的设备、逐个挂到宿主
//! - 打开：按槽位号或设备号找到设备并生成新的 [`GlobalMemFile`]
//! - 卸载：摘除设备并释放设备号区间
//!
//! 打开的文件借用注册表，因此 [`GlobalMemRegistry::teardown`] 只能在所有文件关闭后调用。

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use log::{debug, info, warn};
use uapi::fcntl::OpenFlags;

use crate::config::{DEVICE_NAME, GlobalMemConfig};
use crate::dev::{major, makedev, minor};
use crate::device::GlobalMemDevice;
use crate::file::{File, GlobalMemFile};
use crate::ops::{DeviceRegistrationService, TransferChannel};
use crate::MemError;

/// globalmem 设备注册表
pub struct GlobalMemRegistry {
    /// 主设备号
    major: u32,
    /// 每个设备的容量
    capacity: usize,
    /// 按槽位号排列的设备
    devices: Vec<GlobalMemDevice>,
    /// 数据搬运通道
    channel: Arc<dyn TransferChannel>,
}

impl GlobalMemRegistry {
    /// 初始化全部设备
    ///
    /// `config.major` 非 0 时静态注册该 major，否则向宿主动态申请。
    /// 设备号区间申请失败时直接返回错误；单个设备挂载失败只记录日志，
    /// 该槽位仍可通过 [`GlobalMemRegistry::open`] 访问。
    pub fn init(
        config: &GlobalMemConfig,
        registration: &dyn DeviceRegistrationService,
        channel: Arc<dyn TransferChannel>,
    ) -> Result<Self, MemError> {
        config.validate()?;
        let count = config.nr_devs as u32;

        let first = if config.major != 0 {
            let first = makedev(config.major, 0);
            registration.register_region(first, count, DEVICE_NAME)?;
            first
        } else {
            registration.alloc_region(0, count, DEVICE_NAME)?
        };
        let major = major(first);

        let mut devices = match Self::alloc_devices(major, config) {
            Ok(devices) => devices,
            Err(err) => {
                registration.unregister_region(first, count);
                return Err(err);
            }
        };
        for device in devices.iter_mut() {
            Self::setup_device(device, registration);
        }

        info!(
            "globalmem: {} device(s) of {} bytes, major {}",
            config.nr_devs, config.size, major
        );

        Ok(Self {
            major,
            capacity: config.size,
            devices,
            channel,
        })
    }

    fn alloc_devices(
        major: u32,
        config: &GlobalMemConfig,
    ) -> Result<Vec<GlobalMemDevice>, MemError> {
        let mut devices = Vec::new();
        devices
            .try_reserve_exact(config.nr_devs)
            .map_err(|_| MemError::NoMemory)?;
        for index in 0..config.nr_devs {
            devices.push(GlobalMemDevice::new(
                index,
                makedev(major, index as u32),
                config.size,
            )?);
        }
        Ok(devices)
    }

    fn setup_device(device: &mut GlobalMemDevice, registration: &dyn DeviceRegistrationService) {
        match registration.add_device(device.dev(), 1) {
            Ok(()) => device.set_online(true),
            Err(err) => warn!(
                "globalmem: error {} adding globalmem{}",
                err.to_errno(),
                device.index()
            ),
        }
    }

    /// 以读写模式打开槽位
    pub fn open(&self, slot: usize) -> Result<GlobalMemFile<'_>, MemError> {
        self.open_with_flags(slot, OpenFlags::O_RDWR)
    }

    /// 以指定模式打开槽位
    pub fn open_with_flags(
        &self,
        slot: usize,
        flags: OpenFlags,
    ) -> Result<GlobalMemFile<'_>, MemError> {
        let device = self.devices.get(slot).ok_or(MemError::NotFound)?;
        debug!("globalmem{}: open", slot);
        Ok(GlobalMemFile::new(device, &*self.channel, flags))
    }

    /// 按设备号打开
    pub fn open_dev(&self, dev: u64, flags: OpenFlags) -> Result<GlobalMemFile<'_>, MemError> {
        if major(dev) != self.major {
            return Err(MemError::NoDevice);
        }
        self.open_with_flags(minor(dev) as usize, flags)
    }

    /// 关闭文件；设备内容保持不变
    pub fn release(&self, file: GlobalMemFile<'_>) {
        debug!("globalmem{}: release", file.device().index());
        drop(file);
    }

    /// 对文件绑定的设备执行维护命令（ioctl）
    pub fn maintenance(&self, file: &GlobalMemFile<'_>, request: u32) -> Result<(), MemError> {
        file.ioctl(request, 0).map(|_| ())
    }

    /// 摘除所有设备并释放设备号区间
    pub fn teardown(self, registration: &dyn DeviceRegistrationService) {
        for device in self.devices.iter().filter(|device| device.is_online()) {
            registration.del_device(device.dev());
        }
        registration.unregister_region(makedev(self.major, 0), self.devices.len() as u32);
        info!("globalmem: major {} released", self.major);
    }

    /// 主设备号
    pub fn major(&self) -> u32 {
        self.major
    }

    /// 设备数量
    pub fn nr_devs(&self) -> usize {
        self.devices.len()
    }

    /// 每个设备的容量
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 槽位对应的设备号
    pub fn devno(&self, slot: usize) -> Option<u64> {
        self.devices.get(slot).map(GlobalMemDevice::dev)
    }

    /// 槽位对应的设备
    pub fn device(&self, slot: usize) -> Option<&GlobalMemDevice> {
        self.devices.get(slot)
    }
}

impl fmt::Debug for GlobalMemRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let online = self.devices.iter().filter(|device| device.is_online()).count();
        f.debug_struct("GlobalMemRegistry")
            .field("major", &self.major)
            .field("capacity", &self.capacity)
            .field("devices", &self.devices.len())
            .field("online", &online)
            .finish()
    }
}
