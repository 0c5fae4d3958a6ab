//! Read operations on the devices table.

use chrono::{DateTime, Utc};
use netwatch_core::{DeviceRecord, DeviceStatus};

use crate::client::{InventoryStore, StoreError};

type DeviceRow = (String, String, String, Option<String>, DateTime<Utc>);

fn from_row(row: DeviceRow) -> Result<DeviceRecord, StoreError> {
    let (ip, status, fingerprint, domain, last_seen) = row;
    let status: DeviceStatus = status
        .parse()
        .map_err(|_| StoreError::InvalidStatus(status))?;
    Ok(DeviceRecord {
        ip,
        status,
        fingerprint,
        domain,
        last_seen,
    })
}

impl InventoryStore {
    /// Fetch a single device by IP.
    pub async fn get_device(&mut self, ip: &str) -> Result<Option<DeviceRecord>, StoreError> {
        let row: Option<DeviceRow> = sqlx::query_as(
            "SELECT ip, status, fingerprint, domain, last_seen FROM devices WHERE ip = ?1",
        )
        .bind(ip)
        .fetch_optional(&mut self.conn)
        .await?;

        row.map(from_row).transpose()
    }

    /// Fetch every device, ordered by IP for stable output.
    pub async fn list_devices(&mut self) -> Result<Vec<DeviceRecord>, StoreError> {
        let rows: Vec<DeviceRow> = sqlx::query_as(
            "SELECT ip, status, fingerprint, domain, last_seen FROM devices ORDER BY ip",
        )
        .fetch_all(&mut self.conn)
        .await?;

        rows.into_iter().map(from_row).collect()
    }

    /// Fetch every known IP.
    pub async fn list_ips(&mut self) -> Result<Vec<String>, StoreError> {
        let ips = sqlx::query_scalar("SELECT ip FROM devices ORDER BY ip")
            .fetch_all(&mut self.conn)
            .await?;
        Ok(ips)
    }
}
