//! 文件打开标志与 lseek 参数

use bitflags::bitflags;

bitflags! {
    /// open(2) 标志位（仅保留设备文件关心的部分）
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        const O_RDONLY = 0o0;
        const O_WRONLY = 0o1;
        const O_RDWR = 0o2;
        const O_NONBLOCK = 0o4000;
        const O_CLOEXEC = 0o2000000;
    }
}

impl OpenFlags {
    const O_ACCMODE: u32 = 0o3;

    /// 访问模式是否允许读
    pub fn readable(&self) -> bool {
        let mode = self.bits() & Self::O_ACCMODE;
        mode == Self::O_RDONLY.bits() || mode == Self::O_RDWR.bits()
    }

    /// 访问模式是否允许写
    pub fn writable(&self) -> bool {
        let mode = self.bits() & Self::O_ACCMODE;
        mode == Self::O_WRONLY.bits() || mode == Self::O_RDWR.bits()
    }
}

/// lseek 的参考位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SeekWhence {
    /// 相对文件起始位置 (SEEK_SET)
    Set = 0,
    /// 相对当前位置 (SEEK_CUR)
    Cur = 1,
    /// 相对文件末尾 (SEEK_END)
    End = 2,
}

impl TryFrom<i32> for SeekWhence {
    type Error = i32;

    /// 未知的 whence 原样返回，由调用方决定错误码
    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(SeekWhence::Set),
            1 => Ok(SeekWhence::Cur),
            2 => Ok(SeekWhence::End),
            other => Err(other),
        }
    }
}
