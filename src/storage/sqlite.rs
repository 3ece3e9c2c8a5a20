use crate::model::{DealRecord, StorageError, StoredDeal};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database and creates the schema if it does not exist yet.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS deals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at TEXT NOT NULL,
                product_name TEXT NOT NULL,
                deal_price REAL,
                original_price REAL,
                link TEXT NOT NULL,
                card_offer TEXT,
                platform TEXT NOT NULL,
                category TEXT NOT NULL
            );
            ",
        )?;

        Ok(Self { conn })
    }

    /// Inserts one extracted record. The caller has already checked the
    /// link/price gate, so an empty link only happens on misuse.
    pub fn insert_deal(&self, record: &DealRecord) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO deals (
                created_at, product_name, deal_price, original_price,
                link, card_offer, platform, category
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                Utc::now().to_rfc3339(),
                &record.product_name,
                &record.deal_price,
                &record.original_price,
                record.link.as_deref().unwrap_or(""),
                &record.card_offer,
                record.platform.as_str(),
                &record.category,
            ],
        )?;
        Ok(())
    }

    /// Latest deals, newest first.
    pub fn recent_deals(&self, limit: u32) -> Result<Vec<StoredDeal>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, created_at, product_name, deal_price, original_price,
                    link, card_offer, platform, category
             FROM deals ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit], |row| Self::map_deal(row))?;
        let mut deals = Vec::new();
        for deal in rows {
            deals.push(deal?);
        }

        Ok(deals)
    }

    /// Latest deals in one category, newest first.
    pub fn deals_by_category(
        &self,
        category: &str,
        limit: u32,
    ) -> Result<Vec<StoredDeal>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, created_at, product_name, deal_price, original_price,
                    link, card_offer, platform, category
             FROM deals WHERE category = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![category, limit], |row| Self::map_deal(row))?;
        let mut deals = Vec::new();
        for deal in rows {
            deals.push(deal?);
        }

        Ok(deals)
    }

    fn map_deal(row: &Row) -> Result<StoredDeal, rusqlite::Error> {
        let created_at_str: String = row.get(1)?;
        let created_at: DateTime<Utc> = created_at_str.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(StoredDeal {
            id: row.get(0)?,
            created_at,
            product_name: row.get(2)?,
            deal_price: row.get(3)?,
            original_price: row.get(4)?,
            link: row.get(5)?,
            card_offer: row.get(6)?,
            platform: row.get(7)?,
            category: row.get(8)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Platform;

    fn sample_record(name: &str, category: &str) -> DealRecord {
        DealRecord {
            product_name: name.to_string(),
            deal_price: Some(799.0),
            original_price: Some(1499.0),
            link: Some("https://amazon.in/dp/B000?tag=aff-99".to_string()),
            card_offer: Some("Get extra 10% off with HDFC Card".to_string()),
            platform: Platform::Amazon,
            category: category.to_string(),
        }
    }

    #[test]
    fn insert_and_read_back() {
        let storage = SqliteStorage::new(":memory:").unwrap();
        storage.insert_deal(&sample_record("Wireless Mouse", "electronics")).unwrap();

        let deals = storage.recent_deals(50).unwrap();
        assert_eq!(deals.len(), 1);
        let deal = &deals[0];
        assert_eq!(deal.product_name, "Wireless Mouse");
        assert_eq!(deal.deal_price, Some(799.0));
        assert_eq!(deal.original_price, Some(1499.0));
        assert_eq!(deal.link, "https://amazon.in/dp/B000?tag=aff-99");
        assert_eq!(deal.platform, "Amazon");
        assert_eq!(deal.category, "electronics");
    }

    #[test]
    fn newest_deals_come_first() {
        let storage = SqliteStorage::new(":memory:").unwrap();
        storage.insert_deal(&sample_record("first", "electronics")).unwrap();
        storage.insert_deal(&sample_record("second", "electronics")).unwrap();

        let deals = storage.recent_deals(50).unwrap();
        assert_eq!(deals[0].product_name, "second");
        assert_eq!(deals[1].product_name, "first");
    }

    #[test]
    fn limit_caps_the_result() {
        let storage = SqliteStorage::new(":memory:").unwrap();
        for i in 0..5 {
            storage.insert_deal(&sample_record(&format!("deal-{i}"), "electronics")).unwrap();
        }

        assert_eq!(storage.recent_deals(3).unwrap().len(), 3);
    }

    #[test]
    fn category_filter_only_matches_exactly() {
        let storage = SqliteStorage::new(":memory:").unwrap();
        storage.insert_deal(&sample_record("mouse", "electronics")).unwrap();
        storage.insert_deal(&sample_record("shirt", "fashion")).unwrap();
        storage.insert_deal(&sample_record("keyboard", "electronics")).unwrap();

        let electronics = storage.deals_by_category("electronics", 50).unwrap();
        assert_eq!(electronics.len(), 2);
        assert!(electronics.iter().all(|d| d.category == "electronics"));

        assert!(storage.deals_by_category("grocery", 50).unwrap().is_empty());
    }

    #[test]
    fn optional_fields_round_trip_as_null() {
        let storage = SqliteStorage::new(":memory:").unwrap();
        let record = DealRecord {
            deal_price: Some(49.0),
            link: Some("https://example.com/x".to_string()),
            ..DealRecord::default()
        };
        storage.insert_deal(&record).unwrap();

        let deal = &storage.recent_deals(1).unwrap()[0];
        assert!(deal.original_price.is_none());
        assert!(deal.card_offer.is_none());
        assert_eq!(deal.product_name, "Unknown Product");
        assert_eq!(deal.category, "uncategorized");
    }
}
