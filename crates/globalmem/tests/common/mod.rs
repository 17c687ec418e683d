//! Shared host-side fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use globalmem::{
    DeviceRegistrationService, DirectTransfer, GlobalMemConfig, GlobalMemRegistry, MemError,
    makedev,
};

/// In-memory stand-in for the host chrdev table.
#[derive(Default)]
pub struct TestHost {
    pub regions: Mutex<Vec<(u64, u32)>>,
    pub live: Mutex<Vec<u64>>,
}

impl DeviceRegistrationService for TestHost {
    fn register_region(&self, first: u64, count: u32, _name: &str) -> Result<(), MemError> {
        let mut regions = self.regions.lock().unwrap();
        if regions.iter().any(|&(f, _)| f == first) {
            return Err(MemError::Busy);
        }
        regions.push((first, count));
        Ok(())
    }

    fn alloc_region(&self, first_minor: u32, count: u32, name: &str) -> Result<u64, MemError> {
        let first = makedev(511, first_minor);
        self.register_region(first, count, name)?;
        Ok(first)
    }

    fn unregister_region(&self, first: u64, count: u32) {
        self.regions
            .lock()
            .unwrap()
            .retain(|&region| region != (first, count));
    }

    fn add_device(&self, dev: u64, _count: u32) -> Result<(), MemError> {
        self.live.lock().unwrap().push(dev);
        Ok(())
    }

    fn del_device(&self, dev: u64) {
        self.live.lock().unwrap().retain(|&d| d != dev);
    }
}

pub fn registry(host: &TestHost) -> GlobalMemRegistry {
    GlobalMemRegistry::init(&GlobalMemConfig::default(), host, Arc::new(DirectTransfer)).unwrap()
}
