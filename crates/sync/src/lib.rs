//! 同步原语
//!
//! 向设备层提供基于自旋的锁：
//!
//! - [`SpinLock`] - 互斥锁，用于保护文件句柄的读写位置
//! - [`RwLock`] - 读写锁，用于保护设备内存（读共享，写/清零独占）
//!
//! 两者都由 `lock_api` 的通用包装提供 RAII guard，
//! 本 crate 只实现底层的原子状态机。

#![no_std]

mod raw_spin_lock;
mod rwlock;

pub use raw_spin_lock::{RawSpinLock, SpinLock, SpinLockGuard};
pub use rwlock::{RawRwSpinLock, RwLock, RwLockReadGuard, RwLockWriteGuard};
