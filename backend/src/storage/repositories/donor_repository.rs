use anyhow::{Context, Result};
use async_trait::async_trait;
use shared::BloodType;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::dates::format_timestamp;
use crate::domain::models::{Donor, DonorUpdate, NewDonor};
use crate::storage::connection::DbConnection;
use crate::storage::repositories::parse_stored_timestamp;
use crate::storage::traits::DonorStorage;

const DONOR_COLUMNS: &str =
    "id, name, age, blood_type, contact, email, last_donated, created_at, updated_at";

/// Repository for donor operations
#[derive(Clone)]
pub struct DonorRepository {
    db: DbConnection,
}

impl DonorRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_donor(row: &SqliteRow) -> Result<Donor> {
        let blood_type: String = row.try_get("blood_type")?;
        let last_donated: Option<String> = row.try_get("last_donated")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Donor {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            age: row.try_get("age")?,
            blood_type: blood_type.parse::<BloodType>()?,
            contact: row.try_get("contact")?,
            email: row.try_get("email")?,
            last_donated: last_donated.as_deref().map(parse_stored_timestamp).transpose()?,
            created_at: parse_stored_timestamp(&created_at)?,
            updated_at: parse_stored_timestamp(&updated_at)?,
        })
    }
}

#[async_trait]
impl DonorStorage for DonorRepository {
    async fn create_donor(&self, donor: &NewDonor) -> Result<Donor> {
        let created_at = format_timestamp(&donor.created_at);

        let result = sqlx::query(
            r#"
            INSERT INTO donors (name, age, blood_type, contact, email, last_donated, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&donor.name)
        .bind(donor.age)
        .bind(donor.blood_type.as_str())
        .bind(&donor.contact)
        .bind(&donor.email)
        .bind(donor.last_donated.as_ref().map(format_timestamp))
        .bind(&created_at)
        .bind(&created_at)
        .execute(self.db.pool())
        .await
        .context("Failed to insert donor")?;

        let donor_id = result.last_insert_rowid();
        self.find_donor_by_id(donor_id)
            .await?
            .with_context(|| format!("Donor {} missing right after insert", donor_id))
    }

    async fn find_donor_by_id(&self, donor_id: i64) -> Result<Option<Donor>> {
        let row = sqlx::query(&format!("SELECT {} FROM donors WHERE id = ?", DONOR_COLUMNS))
            .bind(donor_id)
            .fetch_optional(self.db.pool())
            .await
            .context("Failed to fetch donor")?;

        row.as_ref().map(Self::row_to_donor).transpose()
    }

    async fn list_donors(&self) -> Result<Vec<Donor>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM donors ORDER BY created_at DESC, id DESC",
            DONOR_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await
        .context("Failed to list donors")?;

        rows.iter().map(Self::row_to_donor).collect()
    }

    async fn update_donor(&self, donor_id: i64, update: &DonorUpdate) -> Result<Option<Donor>> {
        // Untouched columns keep their stored value, so a concurrent donation's
        // last_donated is never overwritten by a patch that did not mention it
        let result = sqlx::query(
            r#"
            UPDATE donors
            SET name = COALESCE(?, name),
                age = COALESCE(?, age),
                blood_type = COALESCE(?, blood_type),
                contact = COALESCE(?, contact),
                email = CASE WHEN ? THEN ? ELSE email END,
                last_donated = CASE WHEN ? THEN ? ELSE last_donated END,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(update.name.as_deref())
        .bind(update.age)
        .bind(update.blood_type.map(|b| b.as_str()))
        .bind(update.contact.as_deref())
        .bind(update.email.is_some())
        .bind(update.email.as_ref().and_then(|email| email.as_deref()))
        .bind(update.last_donated.is_some())
        .bind(update.last_donated.flatten().as_ref().map(format_timestamp))
        .bind(format_timestamp(&update.updated_at))
        .bind(donor_id)
        .execute(self.db.pool())
        .await
        .context("Failed to update donor")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_donor_by_id(donor_id).await
    }

    async fn delete_donor(&self, donor_id: i64) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query(
            r#"
            DELETE FROM blood_inventory
            WHERE donation_id IN (SELECT id FROM donations WHERE donor_id = ?)
            "#,
        )
        .bind(donor_id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete inventory entries")?;

        sqlx::query("DELETE FROM donations WHERE donor_id = ?")
            .bind(donor_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete donations")?;

        let result = sqlx::query("DELETE FROM donors WHERE id = ?")
            .bind(donor_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete donor")?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await.context("Failed to commit donor deletion")?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    async fn setup_test() -> DonorRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        DonorRepository::new(db)
    }

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap()
    }

    fn new_donor(name: &str, created_at: DateTime<Utc>) -> NewDonor {
        NewDonor {
            name: name.to_string(),
            age: 29,
            blood_type: BloodType::AbNegative,
            contact: "0711222333".to_string(),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            last_donated: Some(base_time() - Duration::days(20)),
            created_at,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_donor() {
        let repo = setup_test().await;

        let created = repo.create_donor(&new_donor("Rosa", base_time())).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.name, "Rosa");
        assert_eq!(created.blood_type, BloodType::AbNegative);
        assert_eq!(created.created_at, base_time());
        assert_eq!(created.updated_at, base_time());
        assert_eq!(created.last_donated, Some(base_time() - Duration::days(20)));

        let found = repo.find_donor_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_find_missing_donor() {
        let repo = setup_test().await;
        assert!(repo.find_donor_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_donors_newest_first() {
        let repo = setup_test().await;

        let first = repo.create_donor(&new_donor("First", base_time())).await.unwrap();
        let third = repo
            .create_donor(&new_donor("Third", base_time() + Duration::hours(2)))
            .await
            .unwrap();
        let second = repo
            .create_donor(&new_donor("Second", base_time() + Duration::hours(1)))
            .await
            .unwrap();

        let ids: Vec<i64> = repo.list_donors().await.unwrap().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn test_list_donors_ties_break_on_id() {
        let repo = setup_test().await;

        let a = repo.create_donor(&new_donor("Same", base_time())).await.unwrap();
        let b = repo.create_donor(&new_donor("Time", base_time())).await.unwrap();

        let ids: Vec<i64> = repo.list_donors().await.unwrap().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    fn contact_only(contact: &str, updated_at: DateTime<Utc>) -> DonorUpdate {
        DonorUpdate {
            name: None,
            age: None,
            blood_type: None,
            contact: Some(contact.to_string()),
            email: None,
            last_donated: None,
            updated_at,
        }
    }

    #[tokio::test]
    async fn test_update_donor() {
        let repo = setup_test().await;
        let donor = repo.create_donor(&new_donor("Lena", base_time())).await.unwrap();
        let later = base_time() + Duration::days(1);

        let updated = repo
            .update_donor(
                donor.id,
                &DonorUpdate {
                    name: Some("Lena Berg".to_string()),
                    age: Some(44),
                    blood_type: Some(BloodType::BPositive),
                    contact: Some("0799888777".to_string()),
                    email: Some(None),
                    last_donated: Some(None),
                    updated_at: later,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Lena Berg");
        assert_eq!(updated.age, 44);
        assert_eq!(updated.blood_type, BloodType::BPositive);
        assert_eq!(updated.contact, "0799888777");
        assert_eq!(updated.email, None);
        assert_eq!(updated.last_donated, None);
        assert_eq!(updated.updated_at, later);
        assert_eq!(updated.created_at, donor.created_at);

        let stored = repo.find_donor_by_id(donor.id).await.unwrap();
        assert_eq!(stored, Some(updated));
    }

    #[tokio::test]
    async fn test_update_leaves_unsupplied_columns_alone() {
        let repo = setup_test().await;
        let donor = repo.create_donor(&new_donor("Ivo", base_time())).await.unwrap();

        // Another writer moves last_donated after this patch was validated
        let moved = base_time() - Duration::days(1);
        sqlx::query("UPDATE donors SET last_donated = ? WHERE id = ?")
            .bind(format_timestamp(&moved))
            .bind(donor.id)
            .execute(repo.db.pool())
            .await
            .unwrap();

        let updated = repo
            .update_donor(donor.id, &contact_only("0700111222", base_time() + Duration::hours(3)))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.contact, "0700111222");
        assert_eq!(updated.last_donated, Some(moved));
        assert_eq!(updated.email, donor.email);
        assert_eq!(updated.name, donor.name);
    }

    #[tokio::test]
    async fn test_update_missing_donor_returns_none() {
        let repo = setup_test().await;

        let result = repo.update_donor(404, &contact_only("0700111222", base_time())).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_donor() {
        let repo = setup_test().await;
        let donor = repo.create_donor(&new_donor("Gone", base_time())).await.unwrap();

        assert!(repo.delete_donor(donor.id).await.unwrap());
        assert!(repo.find_donor_by_id(donor.id).await.unwrap().is_none());

        // Second delete finds nothing
        assert!(!repo.delete_donor(donor.id).await.unwrap());
    }
}
