//! 数据搬运通道的 Mock 实现

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Mock 的跨边界拷贝通道
///
/// 默认行为与普通内存拷贝一致；调用 [`MockTransfer::fail_next`] 后，
/// 下一次搬运会在拷贝 `copied` 字节后失败，模拟用户地址部分不可访问。
pub struct MockTransfer {
    fail_armed: AtomicBool,
    fail_copied: AtomicUsize,
    transfers: AtomicUsize,
    access_depth: AtomicUsize,
    max_access_depth: AtomicUsize,
}

impl MockTransfer {
    pub const fn new() -> Self {
        Self {
            fail_armed: AtomicBool::new(false),
            fail_copied: AtomicUsize::new(0),
            transfers: AtomicUsize::new(0),
            access_depth: AtomicUsize::new(0),
            max_access_depth: AtomicUsize::new(0),
        }
    }

    /// 让下一次搬运在拷贝 `copied` 字节后失败
    pub fn fail_next(&self, copied: usize) {
        self.fail_copied.store(copied, Ordering::SeqCst);
        self.fail_armed.store(true, Ordering::SeqCst);
    }

    /// 取走一次性的失败设定；返回失败前允许拷贝的字节数
    pub fn take_failure(&self) -> Option<usize> {
        if self.fail_armed.swap(false, Ordering::SeqCst) {
            Some(self.fail_copied.load(Ordering::SeqCst))
        } else {
            None
        }
    }

    /// 记录一次搬运
    pub fn record_transfer(&self) {
        self.transfers.fetch_add(1, Ordering::SeqCst);
    }

    /// 成功或失败的搬运总次数
    pub fn transfer_count(&self) -> usize {
        self.transfers.load(Ordering::SeqCst)
    }

    /// 进入用户空间访问模式
    pub fn enter_access(&self) {
        let depth = self.access_depth.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_access_depth.fetch_max(depth, Ordering::SeqCst);
    }

    /// 退出用户空间访问模式
    pub fn exit_access(&self) {
        self.access_depth.fetch_sub(1, Ordering::SeqCst);
    }

    /// 当前是否仍处于用户空间访问模式
    pub fn in_access(&self) -> bool {
        self.access_depth.load(Ordering::SeqCst) != 0
    }

    /// 曾经达到的最大嵌套深度
    pub fn max_access_depth(&self) -> usize {
        self.max_access_depth.load(Ordering::SeqCst)
    }
}

impl Default for MockTransfer {
    fn default() -> Self {
        Self::new()
    }
}
