//! globalmem 设备的 ioctl 命令号

/// 将整个设备内存清零
pub const MEM_CLEAR: u32 = 0x1;
