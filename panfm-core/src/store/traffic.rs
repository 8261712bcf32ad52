use chrono::{DateTime, Duration as ChronoDuration, Utc};
use panfm_model::{
    AggregatedTrafficFlow, ApplicationSample, CategoryBandwidth, ClientBandwidth, DeviceId,
    TopClientDetail, TrafficFlow,
};

use crate::error::Result;
use crate::store::pool::PostgresStore;

impl PostgresStore {
    /// Accumulating upsert: repeated observations of the same flow key
    /// within the same time bucket add to byte/session counters rather
    /// than overwrite (invariant 5) — this is what makes the Sankey view
    /// correct across multiple collection ticks landing in one bucket.
    pub async fn insert_traffic_flows(&self, device_id: DeviceId, flows: &[TrafficFlow]) -> Result<()> {
        if flows.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for flow in flows {
            sqlx::query(
                r#"
                INSERT INTO traffic_flows (
                    time, device_id, source_ip, dest_ip, dest_port,
                    application, category, protocol,
                    bytes_sent, bytes_received, bytes_total, sessions,
                    source_zone, dest_zone, source_vlan, dest_vlan,
                    source_hostname, dest_hostname
                ) VALUES (
                    $1, $2, $3::inet, $4::inet, $5, $6, $7, $8, $9, $10, $11, $12,
                    $13, $14, $15, $16, $17, $18
                )
                ON CONFLICT (time, device_id, source_ip, dest_ip, dest_port, application)
                DO UPDATE SET
                    bytes_sent = traffic_flows.bytes_sent + EXCLUDED.bytes_sent,
                    bytes_received = traffic_flows.bytes_received + EXCLUDED.bytes_received,
                    bytes_total = traffic_flows.bytes_total + EXCLUDED.bytes_total,
                    sessions = traffic_flows.sessions + EXCLUDED.sessions
                "#,
            )
            .bind(flow.time)
            .bind(device_id)
            .bind(&flow.source_ip)
            .bind(&flow.dest_ip)
            .bind(flow.dest_port)
            .bind(&flow.application)
            .bind(&flow.category)
            .bind(&flow.protocol)
            .bind(flow.bytes_sent)
            .bind(flow.bytes_received)
            .bind(flow.bytes_total)
            .bind(flow.sessions)
            .bind(&flow.source_zone)
            .bind(&flow.dest_zone)
            .bind(&flow.source_vlan)
            .bind(&flow.dest_vlan)
            .bind(&flow.source_hostname)
            .bind(&flow.dest_hostname)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Flows originating from `client_ip`, aggregated by `(dest_ip,
    /// dest_port, application)` for the Sankey view — mirrors the original's
    /// `get_traffic_flows_for_client` query exactly: sum bytes/sessions,
    /// take the latest non-null zone/hostname/category/protocol per group,
    /// top 50 by total bytes.
    pub async fn get_traffic_flows_for_client(
        &self,
        device_id: DeviceId,
        client_ip: &str,
        window: ChronoDuration,
    ) -> Result<Vec<AggregatedTrafficFlow>> {
        let start = Utc::now() - window;
        let rows: Vec<AggregatedTrafficFlowRow> = sqlx::query_as(
            r#"
            SELECT
                source_ip::text AS source_ip,
                dest_ip::text AS dest_ip,
                dest_port,
                application,
                SUM(bytes_total)::bigint AS bytes,
                SUM(sessions)::bigint AS sessions,
                MAX(category) AS category,
                MAX(protocol) AS protocol,
                MAX(dest_zone) AS dest_zone,
                MAX(dest_hostname) AS dest_hostname
            FROM traffic_flows
            WHERE device_id = $1
              AND source_ip = $2::inet
              AND time >= $3
            GROUP BY source_ip, dest_ip, dest_port, application
            ORDER BY bytes DESC
            LIMIT 50
            "#,
        )
        .bind(device_id)
        .bind(client_ip)
        .bind(start)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn insert_application_samples(
        &self,
        device_id: DeviceId,
        samples: &[ApplicationSample],
    ) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for s in samples {
            sqlx::query(
                r#"
                INSERT INTO application_samples (time, device_id, application, category, bytes_total, sessions)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (time, device_id, application) DO NOTHING
                "#,
            )
            .bind(s.time)
            .bind(device_id)
            .bind(&s.application)
            .bind(&s.category)
            .bind(s.bytes_total)
            .bind(s.sessions)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn insert_category_bandwidth(
        &self,
        device_id: DeviceId,
        samples: &[CategoryBandwidth],
    ) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for s in samples {
            sqlx::query(
                r#"
                INSERT INTO category_bandwidth (time, device_id, category, traffic_type, bytes_total)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (time, device_id, category, traffic_type) DO NOTHING
                "#,
            )
            .bind(s.time)
            .bind(device_id)
            .bind(&s.category)
            .bind(&s.traffic_type)
            .bind(s.bytes_total)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn insert_client_bandwidth(
        &self,
        device_id: DeviceId,
        samples: &[ClientBandwidth],
    ) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for s in samples {
            sqlx::query(
                r#"
                INSERT INTO client_bandwidth (
                    time, device_id, client_ip, traffic_type,
                    bytes_sent, bytes_received, bytes_total
                ) VALUES ($1, $2, $3::inet, $4, $5, $6, $7)
                ON CONFLICT (time, device_id, client_ip, traffic_type) DO NOTHING
                "#,
            )
            .bind(s.time)
            .bind(device_id)
            .bind(&s.client_ip)
            .bind(&s.traffic_type)
            .bind(s.bytes_sent)
            .bind(s.bytes_received)
            .bind(s.bytes_total)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn get_top_category(
        &self,
        device_id: DeviceId,
        traffic_type: &str,
        window: ChronoDuration,
    ) -> Result<Option<(String, i64)>> {
        let start = Utc::now() - window;
        let row: Option<(String, i64)> = sqlx::query_as(
            r#"
            SELECT category, SUM(bytes_total)::bigint AS total
            FROM category_bandwidth
            WHERE device_id = $1 AND traffic_type = $2 AND time > $3
            GROUP BY category
            ORDER BY total DESC
            LIMIT 1
            "#,
        )
        .bind(device_id)
        .bind(traffic_type)
        .bind(start)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_top_client(
        &self,
        device_id: DeviceId,
        traffic_type: &str,
        window: ChronoDuration,
    ) -> Result<Option<(String, i64)>> {
        let start = Utc::now() - window;
        let row: Option<(String, i64)> = sqlx::query_as(
            r#"
            SELECT client_ip::text, SUM(bytes_total)::bigint AS total
            FROM client_bandwidth
            WHERE device_id = $1 AND traffic_type = $2 AND time > $3
            GROUP BY client_ip
            ORDER BY total DESC
            LIMIT 1
            "#,
        )
        .bind(device_id)
        .bind(traffic_type)
        .bind(start)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Top `limit` source IPs by bytes over `window`, each paired with its
    /// latest known hostname — used to enrich an alert message with more
    /// than the single top talker.
    pub async fn get_top_clients(
        &self,
        device_id: DeviceId,
        window: ChronoDuration,
        limit: i64,
    ) -> Result<Vec<TopClientDetail>> {
        let start = Utc::now() - window;
        let rows: Vec<TopClientDetailRow> = sqlx::query_as(
            r#"
            SELECT
                source_ip::text AS ip,
                MAX(source_hostname) AS hostname,
                SUM(bytes_total)::bigint AS bytes
            FROM traffic_flows
            WHERE device_id = $1 AND time >= $2
            GROUP BY source_ip
            ORDER BY bytes DESC
            LIMIT $3
            "#,
        )
        .bind(device_id)
        .bind(start)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(sqlx::FromRow)]
struct TrafficFlowRow {
    time: DateTime<Utc>,
    device_id: DeviceId,
    source_ip: String,
    dest_ip: String,
    dest_port: Option<i32>,
    application: String,
    category: Option<String>,
    protocol: Option<String>,
    bytes_sent: i64,
    bytes_received: i64,
    bytes_total: i64,
    sessions: i64,
    source_zone: Option<String>,
    dest_zone: Option<String>,
    source_vlan: Option<String>,
    dest_vlan: Option<String>,
    source_hostname: Option<String>,
    dest_hostname: Option<String>,
}

impl From<TrafficFlowRow> for TrafficFlow {
    fn from(row: TrafficFlowRow) -> Self {
        TrafficFlow {
            time: row.time,
            device_id: row.device_id,
            source_ip: row.source_ip,
            dest_ip: row.dest_ip,
            dest_port: row.dest_port,
            application: row.application,
            category: row.category,
            protocol: row.protocol,
            bytes_sent: row.bytes_sent,
            bytes_received: row.bytes_received,
            bytes_total: row.bytes_total,
            sessions: row.sessions,
            source_zone: row.source_zone,
            dest_zone: row.dest_zone,
            source_vlan: row.source_vlan,
            dest_vlan: row.dest_vlan,
            source_hostname: row.source_hostname,
            dest_hostname: row.dest_hostname,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AggregatedTrafficFlowRow {
    source_ip: String,
    dest_ip: String,
    dest_port: Option<i32>,
    application: String,
    bytes: i64,
    sessions: i64,
    category: Option<String>,
    protocol: Option<String>,
    dest_zone: Option<String>,
    dest_hostname: Option<String>,
}

#[derive(sqlx::FromRow)]
struct TopClientDetailRow {
    ip: String,
    hostname: Option<String>,
    bytes: i64,
}

impl From<TopClientDetailRow> for TopClientDetail {
    fn from(row: TopClientDetailRow) -> Self {
        TopClientDetail { ip: row.ip, hostname: row.hostname, bytes: row.bytes }
    }
}

impl From<AggregatedTrafficFlowRow> for AggregatedTrafficFlow {
    fn from(row: AggregatedTrafficFlowRow) -> Self {
        AggregatedTrafficFlow {
            source_ip: row.source_ip,
            dest_ip: row.dest_ip,
            dest_port: row.dest_port,
            application: row.application,
            bytes: row.bytes,
            sessions: row.sessions,
            category: row.category,
            protocol: row.protocol,
            dest_zone: row.dest_zone,
            dest_hostname: row.dest_hostname,
        }
    }
}
