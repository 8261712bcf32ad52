use chrono::{DateTime, Duration as ChronoDuration, Utc};
use panfm_model::{DeviceId, Sample};
use serde_json::Value;

use crate::error::Result;
use crate::store::pool::PostgresStore;

/// Which hypertable/continuous aggregate a historical query should hit.
/// `Auto` picks based on the requested range, per invariant 4: raw data for
/// ranges of 6 hours or less, the hourly continuous aggregate up to 7 days,
/// the daily aggregate beyond that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Auto,
    Raw,
    Hourly,
    Daily,
}

impl Resolution {
    fn resolve(self, span: ChronoDuration) -> Self {
        match self {
            Self::Auto if span <= ChronoDuration::hours(6) => Self::Raw,
            Self::Auto if span <= ChronoDuration::days(7) => Self::Hourly,
            Self::Auto => Self::Daily,
            explicit => explicit,
        }
    }

    fn table_name(self) -> &'static str {
        match self {
            Self::Raw => "throughput_samples",
            Self::Hourly => "throughput_samples_hourly",
            Self::Daily => "throughput_samples_daily",
            Self::Auto => unreachable!("resolve() must run before table_name()"),
        }
    }
}

/// Result of a historical samples query. Empty ranges still return
/// `status: "success"` with an empty `samples` vec and an explanatory
/// `message` — never a `no_data` status, per the Design Notes.
#[derive(Debug, Clone)]
pub struct SamplesQueryResult {
    pub status: &'static str,
    pub samples: Vec<Sample>,
    pub message: Option<String>,
    pub resolution: Resolution,
}

impl PostgresStore {
    /// Idempotent insert: duplicate samples for the same `(time,
    /// device_id)` are silently dropped, tolerating at-least-once
    /// redelivery from the Collector (invariant 1).
    pub async fn insert_sample(&self, sample: &Sample) -> Result<bool> {
        let top_bandwidth = to_json(&sample.top_bandwidth_client)?;
        let top_internal = to_json(&sample.top_internal_client)?;
        let top_internet = to_json(&sample.top_internet_client)?;
        let top_category_wan = to_json(&sample.top_category_wan)?;
        let top_category_lan = to_json(&sample.top_category_lan)?;
        let top_category_internet = to_json(&sample.top_category_internet)?;

        let result = sqlx::query(
            r#"
            INSERT INTO throughput_samples (
                time, device_id,
                inbound_mbps, outbound_mbps, total_mbps,
                inbound_pps, outbound_pps, total_pps,
                sessions_active, sessions_tcp, sessions_udp, sessions_icmp,
                session_max_capacity, session_utilization_pct,
                cpu_data_plane, cpu_mgmt_plane, memory_used_pct,
                disk_root_pct, disk_logs_pct, disk_var_pct,
                top_bandwidth_client_json, top_internal_client_json, top_internet_client_json,
                internal_mbps, internet_mbps,
                top_category_wan_json, top_category_lan_json, top_category_internet_json,
                app_version, threat_version, wildfire_version, url_version,
                wan_ip, wan_speed, hostname, uptime_seconds, pan_os_version,
                license_expired, license_active,
                threats_count, interface_errors,
                cpu_temp, cpu_temp_max, cpu_temp_alarm
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30,
                $31, $32, $33, $34, $35, $36, $37, $38, $39, $40, $41, $42, $43
            )
            ON CONFLICT (time, device_id) DO NOTHING
            "#,
        )
        .bind(sample.time)
        .bind(sample.device_id)
        .bind(sample.inbound_mbps)
        .bind(sample.outbound_mbps)
        .bind(sample.total_mbps)
        .bind(sample.inbound_pps)
        .bind(sample.outbound_pps)
        .bind(sample.total_pps)
        .bind(sample.sessions.active)
        .bind(sample.sessions.tcp)
        .bind(sample.sessions.udp)
        .bind(sample.sessions.icmp)
        .bind(sample.sessions.max_capacity)
        .bind(sample.sessions.utilization_pct)
        .bind(sample.cpu.data_plane_pct)
        .bind(sample.cpu.mgmt_plane_pct)
        .bind(sample.cpu.memory_used_pct)
        .bind(sample.disk_usage.root_pct)
        .bind(sample.disk_usage.logs_pct)
        .bind(sample.disk_usage.var_pct)
        .bind(top_bandwidth)
        .bind(top_internal)
        .bind(top_internet)
        .bind(sample.internal_mbps)
        .bind(sample.internet_mbps)
        .bind(top_category_wan)
        .bind(top_category_lan)
        .bind(top_category_internet)
        .bind(&sample.database_versions.app_version)
        .bind(&sample.database_versions.threat_version)
        .bind(&sample.database_versions.wildfire_version)
        .bind(&sample.database_versions.url_version)
        .bind(&sample.wan_ip)
        .bind(&sample.wan_speed)
        .bind(&sample.hostname)
        .bind(sample.uptime_seconds)
        .bind(&sample.pan_os_version)
        .bind(sample.license.expired)
        .bind(sample.license.active)
        .bind(sample.threats_count)
        .bind(sample.interface_errors)
        .bind(sample.cpu_temp)
        .bind(sample.cpu_temp_max)
        .bind(sample.cpu_temp_alarm)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_latest_sample(
        &self,
        device_id: DeviceId,
        max_age: ChronoDuration,
    ) -> Result<Option<Sample>> {
        let cutoff = Utc::now() - max_age;
        let row: Option<SampleRow> = sqlx::query_as(
            r#"
            SELECT * FROM throughput_samples
            WHERE device_id = $1 AND time >= $2
            ORDER BY time DESC
            LIMIT 1
            "#,
        )
        .bind(device_id)
        .bind(cutoff)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn query_samples(
        &self,
        device_id: DeviceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        resolution: Resolution,
    ) -> Result<SamplesQueryResult> {
        let span = end - start;
        let resolved = resolution.resolve(span);
        let table = resolved.table_name();

        let sql = format!(
            "SELECT * FROM {table} WHERE device_id = $1 AND time >= $2 AND time < $3 ORDER BY time ASC"
        );
        let rows: Vec<SampleRow> = sqlx::query_as(&sql)
            .bind(device_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        let samples: Vec<Sample> = rows.into_iter().map(Into::into).collect();
        let message = samples
            .is_empty()
            .then(|| format!("no samples in range [{start}, {end})"));

        Ok(SamplesQueryResult {
            status: "success",
            samples,
            message,
            resolution: resolved,
        })
    }

    pub async fn cleanup_old_samples(&self, retention_days: u32) -> Result<u64> {
        let cutoff = Utc::now() - ChronoDuration::days(retention_days as i64);
        let result = sqlx::query("DELETE FROM throughput_samples WHERE time < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn to_json<T: serde::Serialize>(value: &Option<T>) -> Result<Option<Value>> {
    value
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(Into::into)
}

/// Raw row shape for `sqlx::FromRow`, kept separate from [`Sample`] so the
/// domain type stays free of database-specific nullability quirks (e.g.
/// Postgres returns the top-N columns as JSON, not the nested structs
/// directly).
#[derive(sqlx::FromRow)]
struct SampleRow {
    time: DateTime<Utc>,
    device_id: DeviceId,
    inbound_mbps: Option<f64>,
    outbound_mbps: Option<f64>,
    total_mbps: Option<f64>,
    inbound_pps: Option<f64>,
    outbound_pps: Option<f64>,
    total_pps: Option<f64>,
    sessions_active: Option<i64>,
    sessions_tcp: Option<i64>,
    sessions_udp: Option<i64>,
    sessions_icmp: Option<i64>,
    session_max_capacity: Option<i64>,
    session_utilization_pct: Option<f64>,
    cpu_data_plane: Option<f64>,
    cpu_mgmt_plane: Option<f64>,
    memory_used_pct: Option<f64>,
    disk_root_pct: Option<f64>,
    disk_logs_pct: Option<f64>,
    disk_var_pct: Option<f64>,
    top_bandwidth_client_json: Option<Value>,
    top_internal_client_json: Option<Value>,
    top_internet_client_json: Option<Value>,
    internal_mbps: f64,
    internet_mbps: f64,
    top_category_wan_json: Option<Value>,
    top_category_lan_json: Option<Value>,
    top_category_internet_json: Option<Value>,
    app_version: Option<String>,
    threat_version: Option<String>,
    wildfire_version: Option<String>,
    url_version: Option<String>,
    wan_ip: Option<String>,
    wan_speed: Option<String>,
    hostname: Option<String>,
    uptime_seconds: Option<i64>,
    pan_os_version: Option<String>,
    license_expired: bool,
    license_active: bool,
    threats_count: i64,
    interface_errors: i64,
    cpu_temp: Option<f64>,
    cpu_temp_max: Option<f64>,
    cpu_temp_alarm: bool,
}

impl From<SampleRow> for Sample {
    fn from(row: SampleRow) -> Self {
        Sample {
            time: row.time,
            device_id: row.device_id,
            inbound_mbps: row.inbound_mbps.unwrap_or(0.0),
            outbound_mbps: row.outbound_mbps.unwrap_or(0.0),
            total_mbps: row.total_mbps.unwrap_or(0.0),
            inbound_pps: row.inbound_pps.unwrap_or(0.0),
            outbound_pps: row.outbound_pps.unwrap_or(0.0),
            total_pps: row.total_pps.unwrap_or(0.0),
            internal_mbps: row.internal_mbps,
            internet_mbps: row.internet_mbps,
            sessions: panfm_model::Sessions {
                active: row.sessions_active.unwrap_or(0),
                tcp: row.sessions_tcp.unwrap_or(0),
                udp: row.sessions_udp.unwrap_or(0),
                icmp: row.sessions_icmp.unwrap_or(0),
                max_capacity: row.session_max_capacity.unwrap_or(0),
                utilization_pct: row.session_utilization_pct.unwrap_or(0.0),
            },
            cpu: panfm_model::Cpu {
                data_plane_pct: row.cpu_data_plane.unwrap_or(0.0),
                mgmt_plane_pct: row.cpu_mgmt_plane.unwrap_or(0.0),
                memory_used_pct: row.memory_used_pct.unwrap_or(0.0),
            },
            disk_usage: panfm_model::DiskUsage {
                root_pct: row.disk_root_pct.unwrap_or(0.0),
                logs_pct: row.disk_logs_pct.unwrap_or(0.0),
                var_pct: row.disk_var_pct.unwrap_or(0.0),
            },
            database_versions: panfm_model::DatabaseVersions {
                app_version: row.app_version,
                threat_version: row.threat_version,
                wildfire_version: row.wildfire_version,
                url_version: row.url_version,
            },
            license: panfm_model::License {
                expired: row.license_expired,
                active: row.license_active,
            },
            top_bandwidth_client: row
                .top_bandwidth_client_json
                .and_then(|v| serde_json::from_value(v).ok()),
            top_internal_client: row
                .top_internal_client_json
                .and_then(|v| serde_json::from_value(v).ok()),
            top_internet_client: row
                .top_internet_client_json
                .and_then(|v| serde_json::from_value(v).ok()),
            top_category_wan: row
                .top_category_wan_json
                .and_then(|v| serde_json::from_value(v).ok()),
            top_category_lan: row
                .top_category_lan_json
                .and_then(|v| serde_json::from_value(v).ok()),
            top_category_internet: row
                .top_category_internet_json
                .and_then(|v| serde_json::from_value(v).ok()),
            wan_ip: row.wan_ip,
            wan_speed: row.wan_speed,
            hostname: row.hostname,
            uptime_seconds: row.uptime_seconds,
            pan_os_version: row.pan_os_version,
            threats_count: row.threats_count,
            interface_errors: row.interface_errors,
            cpu_temp: row.cpu_temp,
            cpu_temp_max: row.cpu_temp_max,
            cpu_temp_alarm: row.cpu_temp_alarm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_resolution_picks_raw_for_short_ranges() {
        assert_eq!(
            Resolution::Auto.resolve(ChronoDuration::hours(1)),
            Resolution::Raw
        );
    }

    #[test]
    fn auto_resolution_picks_hourly_for_week_ranges() {
        assert_eq!(
            Resolution::Auto.resolve(ChronoDuration::days(3)),
            Resolution::Hourly
        );
    }

    #[test]
    fn auto_resolution_picks_daily_beyond_a_week() {
        assert_eq!(
            Resolution::Auto.resolve(ChronoDuration::days(30)),
            Resolution::Daily
        );
    }

    #[test]
    fn explicit_resolution_is_not_overridden() {
        assert_eq!(
            Resolution::Raw.resolve(ChronoDuration::days(30)),
            Resolution::Raw
        );
    }
}
