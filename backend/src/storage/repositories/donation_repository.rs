use anyhow::{Context, Result};
use async_trait::async_trait;
use shared::BloodType;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::HashMap;

use crate::domain::dates::format_timestamp;
use crate::domain::models::{Donation, InventoryEntry, NewDonation};
use crate::storage::connection::DbConnection;
use crate::storage::repositories::parse_stored_timestamp;
use crate::storage::traits::DonationStorage;

/// Repository for donations and the inventory entries attached to them
#[derive(Clone)]
pub struct DonationRepository {
    db: DbConnection,
}

impl DonationRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_donation(row: &SqliteRow) -> Result<Donation> {
        let donation_date: String = row.try_get("donation_date")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Donation {
            id: row.try_get("id")?,
            donor_id: row.try_get("donor_id")?,
            donation_date: parse_stored_timestamp(&donation_date)?,
            quantity: row.try_get("quantity")?,
            inventory_entries: Vec::new(),
            created_at: parse_stored_timestamp(&created_at)?,
        })
    }

    /// Returns (donation_id, entry)
    fn row_to_inventory_entry(row: &SqliteRow) -> Result<(i64, InventoryEntry)> {
        let blood_type: String = row.try_get("blood_type")?;
        let expiry_date: String = row.try_get("expiry_date")?;

        Ok((
            row.try_get("donation_id")?,
            InventoryEntry {
                id: row.try_get("id")?,
                blood_type: blood_type.parse::<BloodType>()?,
                units: row.try_get("units")?,
                expiry_date: parse_stored_timestamp(&expiry_date)?,
            },
        ))
    }

    /// Attach inventory rows to their donations
    fn attach_inventory(donations: &mut [Donation], inventory_rows: &[SqliteRow]) -> Result<()> {
        let mut by_donation: HashMap<i64, Vec<InventoryEntry>> = HashMap::new();
        for row in inventory_rows {
            let (donation_id, entry) = Self::row_to_inventory_entry(row)?;
            by_donation.entry(donation_id).or_default().push(entry);
        }

        for donation in donations.iter_mut() {
            if let Some(entries) = by_donation.remove(&donation.id) {
                donation.inventory_entries = entries;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DonationStorage for DonationRepository {
    async fn create_donation(&self, donation: &NewDonation) -> Result<Donation> {
        let donation_date = format_timestamp(&donation.donation_date);
        let created_at = format_timestamp(&donation.created_at);

        let mut tx = self.db.pool().begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO donations (donor_id, donation_date, quantity, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(donation.donor_id)
        .bind(&donation_date)
        .bind(donation.quantity)
        .bind(&created_at)
        .execute(&mut *tx)
        .await
        .context("Failed to insert donation")?;

        let donation_id = result.last_insert_rowid();

        for entry in &donation.inventory_entries {
            sqlx::query(
                r#"
                INSERT INTO blood_inventory (donation_id, blood_type, units, expiry_date)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(donation_id)
            .bind(entry.blood_type.as_str())
            .bind(entry.units)
            .bind(format_timestamp(&entry.expiry_date))
            .execute(&mut *tx)
            .await
            .context("Failed to insert inventory entry")?;
        }

        // Stored timestamps are fixed-width, so string comparison orders them
        sqlx::query(
            r#"
            UPDATE donors
            SET last_donated = ?, updated_at = ?
            WHERE id = ? AND (last_donated IS NULL OR last_donated < ?)
            "#,
        )
        .bind(&donation_date)
        .bind(&created_at)
        .bind(donation.donor_id)
        .bind(&donation_date)
        .execute(&mut *tx)
        .await
        .context("Failed to advance donor last_donated")?;

        tx.commit().await.context("Failed to commit donation")?;

        self.find_donation_by_id(donation_id)
            .await?
            .with_context(|| format!("Donation {} missing right after insert", donation_id))
    }

    async fn find_donation_by_id(&self, donation_id: i64) -> Result<Option<Donation>> {
        let row = sqlx::query(
            r#"
            SELECT id, donor_id, donation_date, quantity, created_at
            FROM donations
            WHERE id = ?
            "#,
        )
        .bind(donation_id)
        .fetch_optional(self.db.pool())
        .await
        .context("Failed to fetch donation")?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut donations = vec![Self::row_to_donation(&row)?];

        let inventory_rows = sqlx::query(
            r#"
            SELECT id, donation_id, blood_type, units, expiry_date
            FROM blood_inventory
            WHERE donation_id = ?
            ORDER BY id
            "#,
        )
        .bind(donation_id)
        .fetch_all(self.db.pool())
        .await
        .context("Failed to fetch inventory entries")?;

        Self::attach_inventory(&mut donations, &inventory_rows)?;
        Ok(donations.pop())
    }

    async fn list_donations_for_donor(&self, donor_id: i64) -> Result<Vec<Donation>> {
        let rows = sqlx::query(
            r#"
            SELECT id, donor_id, donation_date, quantity, created_at
            FROM donations
            WHERE donor_id = ?
            "#,
        )
        .bind(donor_id)
        .fetch_all(self.db.pool())
        .await
        .context("Failed to list donations")?;

        let mut donations = rows
            .iter()
            .map(Self::row_to_donation)
            .collect::<Result<Vec<_>>>()?;

        if donations.is_empty() {
            return Ok(donations);
        }

        let inventory_rows = sqlx::query(
            r#"
            SELECT bi.id, bi.donation_id, bi.blood_type, bi.units, bi.expiry_date
            FROM blood_inventory bi
            JOIN donations d ON d.id = bi.donation_id
            WHERE d.donor_id = ?
            ORDER BY bi.id
            "#,
        )
        .bind(donor_id)
        .fetch_all(self.db.pool())
        .await
        .context("Failed to fetch inventory entries")?;

        Self::attach_inventory(&mut donations, &inventory_rows)?;
        Ok(donations)
    }
}
