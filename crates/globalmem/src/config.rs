//! globalmem 配置
//!
//! 默认值即驱动的编译期常量；major 号可像模块参数一样在启动命令行中覆盖，
//! 为 0 时改为向宿主动态申请。

use crate::MemError;

/// 每个设备的内存大小（字节）
pub const GLOBALMEM_SIZE: usize = 0x1000;

/// 默认主设备号
pub const GLOBALMEM_MAJOR: u32 = 230;

/// 设备实例数
pub const DEVICE_NUM: usize = 10;

/// 向宿主注册时使用的设备名
pub const DEVICE_NAME: &str = "globalmem";

/// minor 号可用的最大数量（20 位）
const MINOR_LIMIT: usize = 1 << 20;

/// 命令行参数前缀
const CMDLINE_PREFIX: &str = "globalmem.";

/// 设备初始化参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalMemConfig {
    /// 主设备号；0 表示动态分配
    pub major: u32,
    /// 设备实例数
    pub nr_devs: usize,
    /// 每个实例的容量（字节）
    pub size: usize,
}

impl GlobalMemConfig {
    /// 使用驱动默认常量构造
    pub const fn new() -> Self {
        Self {
            major: GLOBALMEM_MAJOR,
            nr_devs: DEVICE_NUM,
            size: GLOBALMEM_SIZE,
        }
    }

    /// 从内核风格命令行解析配置
    ///
    /// 识别 `globalmem.major=`、`globalmem.nr_devs=`、`globalmem.size=`，
    /// 数值可写成十进制或 `0x` 前缀十六进制。其他参数忽略。
    ///
    /// # 示例
    /// ```
    /// use globalmem::GlobalMemConfig;
    ///
    /// let cfg = GlobalMemConfig::parse_cmdline("console=ttyS0 globalmem.major=0").unwrap();
    /// assert_eq!(cfg.major, 0);
    /// assert_eq!(cfg.size, 0x1000);
    /// ```
    pub fn parse_cmdline(cmdline: &str) -> Result<Self, MemError> {
        let mut config = Self::new();
        for token in cmdline.split_whitespace() {
            let Some(param) = token.strip_prefix(CMDLINE_PREFIX) else {
                continue;
            };
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            match key {
                "major" => {
                    config.major =
                        u32::try_from(parse_number(value)?).map_err(|_| MemError::InvalidArgument)?
                }
                "nr_devs" => config.nr_devs = parse_number(value)?,
                "size" => config.size = parse_number(value)?,
                _ => {}
            }
        }
        Ok(config)
    }

    /// 检查参数能否用于初始化
    pub fn validate(&self) -> Result<(), MemError> {
        if self.nr_devs == 0 || self.nr_devs > MINOR_LIMIT {
            return Err(MemError::InvalidArgument);
        }
        // lseek 以 isize 计算目标位置
        if self.size == 0 || self.size > isize::MAX as usize {
            return Err(MemError::InvalidArgument);
        }
        Ok(())
    }
}

impl Default for GlobalMemConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_number(value: &str) -> Result<usize, MemError> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => value.parse::<usize>(),
    };
    parsed.map_err(|_| MemError::InvalidArgument)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_constants() {
        let cfg = GlobalMemConfig::default();
        assert_eq!(cfg.major, 230);
        assert_eq!(cfg.nr_devs, 10);
        assert_eq!(cfg.size, 4096);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_parse_cmdline_overrides() {
        let cfg = GlobalMemConfig::parse_cmdline(
            "root=/dev/vda globalmem.major=231 globalmem.nr_devs=4 globalmem.size=0x200",
        )
        .unwrap();
        assert_eq!(cfg.major, 231);
        assert_eq!(cfg.nr_devs, 4);
        assert_eq!(cfg.size, 0x200);
    }

    #[test]
    fn test_parse_cmdline_ignores_unrelated() {
        let cfg = GlobalMemConfig::parse_cmdline("quiet globalmem.debug globalmem.color=red").unwrap();
        assert_eq!(cfg, GlobalMemConfig::new());
    }

    #[test]
    fn test_parse_cmdline_rejects_garbage() {
        assert_eq!(
            GlobalMemConfig::parse_cmdline("globalmem.size=lots"),
            Err(MemError::InvalidArgument)
        );
        assert_eq!(
            GlobalMemConfig::parse_cmdline("globalmem.major=0x1ffffffff"),
            Err(MemError::InvalidArgument)
        );
    }

    #[test]
    fn test_validate_rejects_empty() {
        let mut cfg = GlobalMemConfig::new();
        cfg.nr_devs = 0;
        assert_eq!(cfg.validate(), Err(MemError::InvalidArgument));

        let mut cfg = GlobalMemConfig::new();
        cfg.size = 0;
        assert_eq!(cfg.validate(), Err(MemError::InvalidArgument));
    }
}
