//! Reconciliation: merge one cycle's observations into the devices table.
//!
//! All writes for a cycle run inside a single transaction, so from the
//! caller's perspective the table moves atomically from the previous
//! cycle's state to the new one.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use netwatch_core::Observation;
use sqlx::Connection;

use crate::client::{InventoryStore, StoreError};

/// Per-cycle counts of what reconciliation did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Hosts present in this cycle's scan output.
    pub scanned: u32,
    /// IPs never seen before, inserted this cycle.
    pub inserted: u32,
    /// Known IPs whose fingerprint changed; fingerprint and timestamp rewritten.
    pub updated: u32,
    /// Known IPs whose fingerprint was identical; only status/domain refreshed.
    pub unchanged: u32,
    /// Previously known IPs absent from this scan, transitioned to down.
    pub marked_down: u32,
}

impl InventoryStore {
    /// Merge the observed host set into the devices table.
    ///
    /// Policy per observed IP:
    /// - not in the table: insert with `last_seen = now`;
    /// - in the table with a byte-for-byte different fingerprint: rewrite
    ///   status, fingerprint, domain, and `last_seen`;
    /// - in the table with an identical fingerprint: refresh status and
    ///   domain only, leaving fingerprint and `last_seen` untouched.
    ///
    /// Every previously known IP absent from the observed set is marked
    /// down; its fingerprint, domain, and timestamp are not modified.
    /// Records are never deleted.
    pub async fn reconcile(
        &mut self,
        observations: &[Observation],
        now: DateTime<Utc>,
    ) -> Result<ReconcileSummary, StoreError> {
        let mut summary = ReconcileSummary {
            scanned: observations.len() as u32,
            ..Default::default()
        };

        let mut tx = self.conn.begin().await?;
        let mut seen: HashSet<&str> = HashSet::new();

        for obs in observations {
            seen.insert(obs.ip.as_str());

            let stored: Option<String> =
                sqlx::query_scalar("SELECT fingerprint FROM devices WHERE ip = ?1")
                    .bind(&obs.ip)
                    .fetch_optional(&mut *tx)
                    .await?;

            match stored {
                None => {
                    sqlx::query(
                        "INSERT INTO devices (ip, status, fingerprint, domain, last_seen)
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                    )
                    .bind(&obs.ip)
                    .bind(obs.status.as_str())
                    .bind(&obs.fingerprint)
                    .bind(&obs.domain)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;
                    summary.inserted += 1;
                    tracing::info!(ip = %obs.ip, "Inserted new device");
                }
                Some(ref fp) if *fp != obs.fingerprint => {
                    sqlx::query(
                        "UPDATE devices
                         SET status = ?1, fingerprint = ?2, domain = ?3, last_seen = ?4
                         WHERE ip = ?5",
                    )
                    .bind(obs.status.as_str())
                    .bind(&obs.fingerprint)
                    .bind(&obs.domain)
                    .bind(now)
                    .bind(&obs.ip)
                    .execute(&mut *tx)
                    .await?;
                    summary.updated += 1;
                    tracing::info!(ip = %obs.ip, "Updated device fingerprint");
                }
                Some(_) => {
                    // Fingerprint unchanged: last_seen deliberately not touched.
                    sqlx::query("UPDATE devices SET status = ?1, domain = ?2 WHERE ip = ?3")
                        .bind(obs.status.as_str())
                        .bind(&obs.domain)
                        .bind(&obs.ip)
                        .execute(&mut *tx)
                        .await?;
                    summary.unchanged += 1;
                }
            }
        }

        // Staleness sweep: anything we know about but did not see goes down.
        let known: Vec<String> = sqlx::query_scalar("SELECT ip FROM devices")
            .fetch_all(&mut *tx)
            .await?;

        for ip in known {
            if seen.contains(ip.as_str()) {
                continue;
            }
            let result = sqlx::query(
                "UPDATE devices SET status = 'down' WHERE ip = ?1 AND status <> 'down'",
            )
            .bind(&ip)
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() > 0 {
                summary.marked_down += 1;
                tracing::info!(ip = %ip, "Device absent from scan, marked down");
            }
        }

        tx.commit().await?;

        tracing::debug!(
            scanned = summary.scanned,
            inserted = summary.inserted,
            updated = summary.updated,
            unchanged = summary.unchanged,
            marked_down = summary.marked_down,
            "Reconciliation committed"
        );

        Ok(summary)
    }
}
