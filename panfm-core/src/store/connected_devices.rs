use chrono::{DateTime, Duration as ChronoDuration, Utc};
use panfm_model::{ConnectedDevice, DeviceId};

use crate::error::Result;
use crate::store::pool::PostgresStore;

impl PostgresStore {
    /// Batch-upserts one collection tick's ARP/connected-device snapshot.
    /// `ON CONFLICT (time, device_id, ip) DO UPDATE` lets a redelivered tick
    /// refresh metadata (hostname, vendor, last_seen) for the same IP
    /// instead of producing a duplicate row.
    pub async fn insert_connected_devices(
        &self,
        device_id: DeviceId,
        devices: &[ConnectedDevice],
    ) -> Result<()> {
        if devices.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for device in devices {
            sqlx::query(
                r#"
                INSERT INTO connected_devices (
                    time, device_id, ip, mac, hostname, interface, zone, ttl,
                    vendor, custom_name, first_seen, last_seen
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ON CONFLICT (time, device_id, ip) DO UPDATE SET
                    mac = EXCLUDED.mac,
                    hostname = EXCLUDED.hostname,
                    interface = EXCLUDED.interface,
                    zone = EXCLUDED.zone,
                    ttl = EXCLUDED.ttl,
                    vendor = EXCLUDED.vendor,
                    custom_name = EXCLUDED.custom_name,
                    last_seen = EXCLUDED.last_seen
                "#,
            )
            .bind(device.time)
            .bind(device_id)
            .bind(&device.ip)
            .bind(&device.mac)
            .bind(&device.hostname)
            .bind(&device.interface)
            .bind(&device.zone)
            .bind(device.ttl)
            .bind(&device.vendor)
            .bind(&device.custom_name)
            .bind(device.first_seen)
            .bind(device.last_seen)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Most recent observation per IP within `max_age`, via `DISTINCT ON`.
    pub async fn get_connected_devices(
        &self,
        device_id: DeviceId,
        max_age: ChronoDuration,
    ) -> Result<Vec<ConnectedDevice>> {
        let cutoff = Utc::now() - max_age;
        let rows: Vec<ConnectedDeviceRow> = sqlx::query_as(
            r#"
            SELECT DISTINCT ON (ip)
                time, device_id, ip, mac, hostname, interface, zone, ttl,
                vendor, custom_name, first_seen, last_seen
            FROM connected_devices
            WHERE device_id = $1 AND time >= $2
            ORDER BY ip, time DESC
            "#,
        )
        .bind(device_id)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// [`Self::get_connected_devices`] enriched with a bandwidth total drawn
    /// from `client_bandwidth` over the trailing `bandwidth_window`.
    pub async fn get_connected_devices_with_bandwidth(
        &self,
        device_id: DeviceId,
        max_age: ChronoDuration,
        bandwidth_window: ChronoDuration,
    ) -> Result<Vec<ConnectedDevice>> {
        let mut devices = self.get_connected_devices(device_id, max_age).await?;
        if devices.is_empty() {
            return Ok(devices);
        }

        let start = Utc::now() - bandwidth_window;
        let rows: Vec<(String, i64, i64, i64)> = sqlx::query_as(
            r#"
            SELECT client_ip,
                COALESCE(SUM(bytes_sent), 0),
                COALESCE(SUM(bytes_received), 0),
                COALESCE(SUM(bytes_total), 0)
            FROM client_bandwidth
            WHERE device_id = $1 AND time > $2
            GROUP BY client_ip
            "#,
        )
        .bind(device_id)
        .bind(start)
        .fetch_all(&self.pool)
        .await?;

        for device in &mut devices {
            if let Some((_, sent, received, total)) = rows.iter().find(|(ip, ..)| *ip == device.ip)
            {
                device.bytes_sent = *sent;
                device.bytes_received = *received;
                device.total_volume = *total;
            }
        }

        Ok(devices)
    }
}

#[derive(sqlx::FromRow)]
struct ConnectedDeviceRow {
    time: DateTime<Utc>,
    device_id: DeviceId,
    ip: String,
    mac: Option<String>,
    hostname: Option<String>,
    interface: Option<String>,
    zone: Option<String>,
    ttl: Option<i32>,
    vendor: Option<String>,
    custom_name: Option<String>,
    first_seen: DateTime<Utc>,
    last_seen: DateTime<Utc>,
}

impl From<ConnectedDeviceRow> for ConnectedDevice {
    fn from(row: ConnectedDeviceRow) -> Self {
        ConnectedDevice {
            time: row.time,
            device_id: row.device_id,
            ip: row.ip,
            mac: row.mac,
            hostname: row.hostname,
            interface: row.interface,
            zone: row.zone,
            ttl: row.ttl,
            vendor: row.vendor,
            custom_name: row.custom_name,
            first_seen: row.first_seen,
            last_seen: row.last_seen,
            bytes_sent: 0,
            bytes_received: 0,
            total_volume: 0,
        }
    }
}
