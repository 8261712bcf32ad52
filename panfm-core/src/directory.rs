//! The default [`DeviceDirectory`] binding used by both binaries: resolves a
//! device's IP from the store and its API key from an environment variable
//! named after its `credential_ref`. The real credential store (encrypted
//! secret material, rotation, vaulting) is out of scope here — this is the
//! thin seam the binaries wire `PanOsClient` against, matching
//! `firewall_api.py`'s `get_firewall_config` without reimplementing its
//! encryption layer.

use std::env;

use async_trait::async_trait;
use panfm_contracts::error::Result;
use panfm_contracts::FirewallError;
use panfm_model::DeviceId;

use crate::panos::{DeviceDirectory, ResolvedDevice};
use crate::store::PostgresStore;

pub struct EnvCredentialDirectory {
    store: PostgresStore,
}

impl EnvCredentialDirectory {
    pub fn new(store: PostgresStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DeviceDirectory for EnvCredentialDirectory {
    async fn resolve(&self, device_id: DeviceId) -> Result<ResolvedDevice> {
        let device = self
            .store
            .get_device(device_id)
            .await
            .map_err(|e| FirewallError::Unreachable {
                device: device_id.to_string(),
                source: Box::<dyn std::error::Error + Send + Sync>::from(e.to_string()),
            })?
            .ok_or_else(|| FirewallError::BadResponse {
                device: device_id.to_string(),
                detail: "device not found".to_string(),
            })?;

        if !device.enabled {
            return Err(FirewallError::BadResponse {
                device: device.ip.clone(),
                detail: "device disabled".to_string(),
            });
        }

        let env_key = format!("PANFM_CREDENTIAL_{}", device.credential_ref);
        let api_key = env::var(&env_key).map_err(|_| FirewallError::AuthFailed {
            device: device.ip.clone(),
        })?;

        Ok(ResolvedDevice { ip: device.ip, api_key })
    }
}
