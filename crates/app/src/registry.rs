//! Device registry: the in-memory source of truth for devices and their state.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::{Mutex, OwnedMutexGuard};

use hestia_domain::command::DeviceCommand;
use hestia_domain::device::{Device, DeviceKind, Platform};
use hestia_domain::error::HestiaError;
use hestia_domain::id::DeviceId;

/// Which devices [`DeviceRegistry::list`] returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeviceFilter {
    #[default]
    All,
    Kind(DeviceKind),
    Platform(Platform),
}

impl DeviceFilter {
    fn accepts(self, device: &Device) -> bool {
        match self {
            Self::All => true,
            Self::Kind(kind) => device.kind == kind,
            Self::Platform(platform) => device.platform == platform,
        }
    }
}

#[derive(Default)]
struct Records {
    order: Vec<DeviceId>,
    devices: HashMap<DeviceId, Arc<Mutex<Device>>>,
}

/// Registered devices, one lock per device record.
///
/// The outer map lock is only held to look records up or insert them; all
/// state changes go through the per-device lock, so mutations of different
/// devices never wait on each other.
#[derive(Default)]
pub struct DeviceRegistry {
    records: RwLock<Records>,
}

impl DeviceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new device.
    ///
    /// # Errors
    ///
    /// Returns [`HestiaError::Validation`] if the device breaks a domain
    /// invariant, or [`HestiaError::DuplicateId`] if the id is taken.
    #[tracing::instrument(skip(self, device), fields(device_id = %device.id, device_name = %device.name))]
    pub fn register(&self, device: Device) -> Result<DeviceId, HestiaError> {
        device.validate()?;
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        if records.devices.contains_key(&device.id) {
            return Err(HestiaError::DuplicateId(device.id));
        }
        let id = device.id.clone();
        records.order.push(id.clone());
        records
            .devices
            .insert(id.clone(), Arc::new(Mutex::new(device)));
        tracing::debug!("device registered");
        Ok(id)
    }

    #[must_use]
    pub fn contains(&self, id: &DeviceId) -> bool {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .devices
            .contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply `command` to one device and return the resulting snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`HestiaError::DeviceNotFound`] for an unknown id, or
    /// [`HestiaError::CapabilityUnsupported`] when the device lacks the
    /// capability (the state is left untouched).
    #[tracing::instrument(skip(self), fields(command = %command))]
    pub async fn mutate(&self, id: &DeviceId, command: &DeviceCommand) -> Result<Device, HestiaError> {
        let mut device = self.lock(id).await?;
        device.apply(command)?;
        Ok(Device::clone(&device))
    }

    /// Snapshot of one device.
    ///
    /// # Errors
    ///
    /// Returns [`HestiaError::DeviceNotFound`] for an unknown id.
    pub async fn query(&self, id: &DeviceId) -> Result<Device, HestiaError> {
        let device = self.lock(id).await?;
        Ok(Device::clone(&device))
    }

    /// Snapshots of the devices accepted by `filter`, in registration order.
    pub async fn list(&self, filter: DeviceFilter) -> Vec<Device> {
        let mut devices = Vec::new();
        for record in self.records_in_order() {
            let device = record.lock().await;
            if filter.accepts(&device) {
                devices.push(Device::clone(&device));
            }
        }
        devices
    }

    /// Find a device by exact id, then by case-insensitive name.
    pub async fn find(&self, key: &str) -> Option<Device> {
        let key = key.trim();
        if let Ok(device) = self.query(&DeviceId::from(key)).await {
            return Some(device);
        }
        self.list(DeviceFilter::All)
            .await
            .into_iter()
            .find(|device| device.name.eq_ignore_ascii_case(key))
    }

    /// Exclusive access to one device record.
    ///
    /// Held by the dispatcher across the platform call so that a device's
    /// state only changes once its adapter has accepted the command.
    pub(crate) async fn lock(&self, id: &DeviceId) -> Result<OwnedMutexGuard<Device>, HestiaError> {
        let record = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .devices
            .get(id)
            .cloned()
            .ok_or_else(|| HestiaError::DeviceNotFound(id.clone()))?;
        Ok(record.lock_owned().await)
    }

    fn records_in_order(&self) -> Vec<Arc<Mutex<Device>>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records
            .order
            .iter()
            .filter_map(|id| records.devices.get(id).cloned())
            .collect()
    }
}
