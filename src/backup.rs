//! Preserves persisted values that could not be read, so that resetting the store to empty never
//! silently destroys data.

use crate::storage::Storage;
use crate::Result;
use chrono::Local;
use std::sync::Arc;
use tracing::debug;

/// Suffix added to a key to form the backup key prefix for its unreadable values.
pub const CORRUPT: &str = "corrupt";

/// Writes backup copies of raw values into the same `Storage` the store uses, under keys of the
/// form `{key}.corrupt.YYYY-MM-DD-NNN`, keeping only the newest `backup_copies` of them.
#[derive(Clone)]
pub struct Backup {
    storage: Arc<dyn Storage>,
    backup_copies: u32,
}

impl Backup {
    /// Creates a new `Backup` over `storage`, keeping at most `backup_copies` backups per key.
    ///
    /// The backup just written is always kept, even when `backup_copies` is zero.
    pub fn new(storage: Arc<dyn Storage>, backup_copies: u32) -> Self {
        Self {
            storage,
            backup_copies,
        }
    }

    pub fn backup_copies(&self) -> u32 {
        self.backup_copies
    }

    /// Saves `raw` as an unreadable copy of the value held under `key`.
    ///
    /// Automatically rotates old backups, keeping only `backup_copies` of them.
    ///
    /// Returns the key that the backup was written to.
    pub async fn save_corrupt(&self, key: &str, raw: &str) -> Result<String> {
        let prefix = format!("{key}.{CORRUPT}");
        let date = today();
        let seq = self.next_sequence_number(&prefix, &date).await?;
        let backup_key = format!("{prefix}.{date}-{seq:03}");

        self.storage.set(&backup_key, raw).await?;
        debug!("Saved unreadable value of '{key}' to '{backup_key}'");

        self.rotate(&prefix).await?;

        Ok(backup_key)
    }

    /// Returns the backup keys that exist for `key`, oldest first.
    pub async fn list_corrupt(&self, key: &str) -> Result<Vec<String>> {
        let prefix = format!("{key}.{CORRUPT}");
        self.backup_keys(&prefix).await
    }

    /// Scans the storage for existing backups with the given prefix and date, and returns the next
    /// sequence number.
    async fn next_sequence_number(&self, prefix: &str, date: &str) -> Result<u32> {
        let max_seq = self
            .storage
            .keys()
            .await?
            .iter()
            .filter_map(|k| parse_sequence_number(k, prefix, date))
            .max()
            .unwrap_or(0);
        Ok(max_seq + 1)
    }

    /// Returns the backup keys with the given prefix, ordered by date and then sequence number.
    async fn backup_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys: Vec<(&str, u32, String)> = Vec::new();
        let all = self.storage.keys().await?;
        for key in &all {
            if let Some((date, seq)) = parse_backup_key(key, prefix) {
                keys.push((date, seq, key.clone()));
            }
        }
        keys.sort();
        Ok(keys.into_iter().map(|(_, _, key)| key).collect())
    }

    /// Deletes the oldest backups with the given prefix, keeping only `backup_copies` of them.
    async fn rotate(&self, prefix: &str) -> Result<()> {
        let keys = self.backup_keys(prefix).await?;

        let keep = self.backup_copies.max(1) as usize;
        let to_delete = keys.len().saturating_sub(keep);
        for key in keys.into_iter().take(to_delete) {
            debug!("Rotating out backup '{key}'");
            self.storage.remove(&key).await?;
        }

        Ok(())
    }
}

/// Returns today's date in YYYY-MM-DD format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Parses the sequence number from a backup key.
/// Returns None if the key doesn't match `{prefix}.{date}-NNN`.
fn parse_sequence_number(key: &str, prefix: &str, date: &str) -> Option<u32> {
    let expected_start = format!("{prefix}.{date}-");
    key.strip_prefix(&expected_start)?.parse().ok()
}

/// Splits a backup key with the given prefix into its date and sequence number.
/// Returns None if the key doesn't match `{prefix}.YYYY-MM-DD-NNN`.
fn parse_backup_key<'a>(key: &'a str, prefix: &str) -> Option<(&'a str, u32)> {
    let rest = key.strip_prefix(prefix)?.strip_prefix('.')?;
    let (date, seq) = rest.rsplit_once('-')?;
    if date.len() != 10 {
        return None;
    }
    Some((date, seq.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_parse_sequence_number() {
        assert_eq!(
            parse_sequence_number(
                "transactions.corrupt.2025-12-14-001",
                "transactions.corrupt",
                "2025-12-14"
            ),
            Some(1)
        );
        assert_eq!(
            parse_sequence_number(
                "transactions.corrupt.2025-12-14-042",
                "transactions.corrupt",
                "2025-12-14"
            ),
            Some(42)
        );
        // Wrong prefix
        assert_eq!(
            parse_sequence_number(
                "settings.corrupt.2025-12-14-001",
                "transactions.corrupt",
                "2025-12-14"
            ),
            None
        );
        // Wrong date
        assert_eq!(
            parse_sequence_number(
                "transactions.corrupt.2025-12-13-001",
                "transactions.corrupt",
                "2025-12-14"
            ),
            None
        );
    }

    #[test]
    fn test_parse_backup_key() {
        assert_eq!(
            parse_backup_key("transactions.corrupt.2025-12-14-001", "transactions.corrupt"),
            Some(("2025-12-14", 1))
        );
        assert_eq!(
            parse_backup_key("transactions.corrupt.2025-12-14-1000", "transactions.corrupt"),
            Some(("2025-12-14", 1000))
        );
        assert_eq!(parse_backup_key("transactions", "transactions.corrupt"), None);
        assert_eq!(
            parse_backup_key("transactions.corrupt.notes", "transactions.corrupt"),
            None
        );
        assert_eq!(
            parse_backup_key("settings.corrupt.2025-12-14-001", "transactions.corrupt"),
            None
        );
    }

    #[tokio::test]
    async fn test_rotation_orders_sequence_numerically() {
        let storage = MemoryStorage::new();
        let date = today();
        for seq in ["998", "999"] {
            storage
                .set(&format!("transactions.corrupt.{date}-{seq}"), seq)
                .await
                .unwrap();
        }
        let backup = Backup::new(Arc::new(storage.clone()), 2);

        let newest = backup.save_corrupt("transactions", "1000").await.unwrap();
        assert!(newest.ends_with("-1000"));

        let kept = backup.list_corrupt("transactions").await.unwrap();
        assert_eq!(
            kept,
            vec![format!("transactions.corrupt.{date}-999"), newest.clone()]
        );
        assert_eq!(storage.get(&newest).await.unwrap().as_deref(), Some("1000"));
    }

    #[tokio::test]
    async fn test_zero_copies_still_keeps_the_new_backup() {
        let storage = MemoryStorage::new();
        let backup = Backup::new(Arc::new(storage.clone()), 0);

        backup.save_corrupt("transactions", "old").await.unwrap();
        let key = backup.save_corrupt("transactions", "garbage").await.unwrap();

        assert_eq!(backup.list_corrupt("transactions").await.unwrap(), vec![key.clone()]);
        assert_eq!(storage.get(&key).await.unwrap().as_deref(), Some("garbage"));
    }

    #[tokio::test]
    async fn test_save_corrupt_sequences_and_rotates() {
        let storage = MemoryStorage::new();
        let backup = Backup::new(Arc::new(storage.clone()), 2);

        let first = backup.save_corrupt("transactions", "one").await.unwrap();
        let second = backup.save_corrupt("transactions", "two").await.unwrap();
        let third = backup.save_corrupt("transactions", "three").await.unwrap();
        assert!(first.ends_with("-001"));
        assert!(second.ends_with("-002"));
        assert!(third.ends_with("-003"));

        let kept = backup.list_corrupt("transactions").await.unwrap();
        assert_eq!(kept, vec![second.clone(), third.clone()]);
        assert_eq!(storage.get(&first).await.unwrap(), None);
        assert_eq!(storage.get(&third).await.unwrap().as_deref(), Some("three"));
    }
}
