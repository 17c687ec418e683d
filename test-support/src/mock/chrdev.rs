//! 字符设备号注册服务的 Mock 实现

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};

/// Mock 的字符设备号区间
///
/// 只记录调用次数与参数，支持注入“区间被占用”和“第 n 个设备添加失败”。
pub struct MockChrdevRegion {
    /// 动态分配时返回的 major
    pub dynamic_major: AtomicU32,
    /// 置位后 register/alloc 返回忙
    pub region_busy: AtomicBool,
    /// 第几次 add_device 失败（usize::MAX 表示从不失败）
    pub fail_add_at: AtomicUsize,

    region_first: AtomicU64,
    region_count: AtomicU32,
    region_held: AtomicBool,
    added: AtomicUsize,
    deleted: AtomicUsize,
    add_calls: AtomicUsize,
}

impl MockChrdevRegion {
    pub const fn new() -> Self {
        Self {
            dynamic_major: AtomicU32::new(250),
            region_busy: AtomicBool::new(false),
            fail_add_at: AtomicUsize::new(usize::MAX),
            region_first: AtomicU64::new(0),
            region_count: AtomicU32::new(0),
            region_held: AtomicBool::new(false),
            added: AtomicUsize::new(0),
            deleted: AtomicUsize::new(0),
            add_calls: AtomicUsize::new(0),
        }
    }

    /// 尝试占用区间；已被占用或注入忙时返回 false
    pub fn claim(&self, first: u64, count: u32) -> bool {
        if self.region_busy.load(Ordering::SeqCst) {
            return false;
        }
        if self.region_held.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.region_first.store(first, Ordering::SeqCst);
        self.region_count.store(count, Ordering::SeqCst);
        true
    }

    /// 释放区间
    pub fn release(&self, first: u64, count: u32) {
        if self.region_first.load(Ordering::SeqCst) == first
            && self.region_count.load(Ordering::SeqCst) == count
        {
            self.region_held.store(false, Ordering::SeqCst);
        }
    }

    /// 记录一次设备添加；返回此次是否成功
    pub fn add(&self) -> bool {
        let nth = self.add_calls.fetch_add(1, Ordering::SeqCst);
        if nth == self.fail_add_at.load(Ordering::SeqCst) {
            return false;
        }
        self.added.fetch_add(1, Ordering::SeqCst);
        true
    }

    /// 记录一次设备删除
    pub fn delete(&self) {
        self.deleted.fetch_add(1, Ordering::SeqCst);
    }

    pub fn region_held(&self) -> bool {
        self.region_held.load(Ordering::SeqCst)
    }

    pub fn region_first(&self) -> u64 {
        self.region_first.load(Ordering::SeqCst)
    }

    pub fn region_count(&self) -> u32 {
        self.region_count.load(Ordering::SeqCst)
    }

    pub fn added(&self) -> usize {
        self.added.load(Ordering::SeqCst)
    }

    pub fn deleted(&self) -> usize {
        self.deleted.load(Ordering::SeqCst)
    }
}

impl Default for MockChrdevRegion {
    fn default() -> Self {
        Self::new()
    }
}
