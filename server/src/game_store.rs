use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};

use omok_common::GameId;

use crate::session_record::SessionRecord;

#[derive(Debug)]
pub enum StoreError {
    NotFound(GameId),
    Io(std::io::Error),
    Corrupt { id: GameId, message: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "Game {} not found", id),
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::Corrupt { id, message } => {
                write!(f, "Game {} has an unreadable record: {}", id, message)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

/// Key-value storage for session records.
pub trait GameStore: Clone + Send + Sync + 'static {
    fn put(
        &self,
        id: &GameId,
        record: &SessionRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn get(&self, id: &GameId) -> impl Future<Output = Result<SessionRecord, StoreError>> + Send;

    fn contains(&self, id: &GameId) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

#[derive(Clone, Default)]
pub struct MemoryGameStore {
    records: Arc<Mutex<HashMap<GameId, SessionRecord>>>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryGameStore {
    async fn put(&self, id: &GameId, record: &SessionRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        records.insert(id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &GameId) -> Result<SessionRecord, StoreError> {
        let records = self.records.lock().await;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn contains(&self, id: &GameId) -> Result<bool, StoreError> {
        let records = self.records.lock().await;
        Ok(records.contains_key(id))
    }
}

/// One `<id>.json` file per game. Records are written to `<id>.json.tmp`
/// first and renamed over the old file, so a reader never sees half a record.
#[derive(Clone)]
pub struct FileGameStore {
    directory: PathBuf,
}

impl FileGameStore {
    pub async fn open(directory: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let directory = directory.into();
        tokio::fs::create_dir_all(&directory).await?;
        Ok(Self { directory })
    }

    fn path_for(&self, id: &GameId) -> Result<PathBuf, StoreError> {
        if !id.is_well_formed() {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(self.directory.join(format!("{}.json", id)))
    }
}

impl GameStore for FileGameStore {
    async fn put(&self, id: &GameId, record: &SessionRecord) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        let content = serde_json::to_string(record).map_err(|e| StoreError::Corrupt {
            id: id.clone(),
            message: e.to_string(),
        })?;
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, content).await?;
        tokio::fs::rename(&staging, &path).await?;
        Ok(())
    }

    async fn get(&self, id: &GameId) -> Result<SessionRecord, StoreError> {
        let path = self.path_for(id)?;
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            id: id.clone(),
            message: e.to_string(),
        })
    }

    async fn contains(&self, id: &GameId) -> Result<bool, StoreError> {
        match self.path_for(id) {
            Ok(path) => Ok(tokio::fs::try_exists(path).await?),
            Err(_) => Ok(false),
        }
    }
}

type LockMap = Arc<StdMutex<HashMap<GameId, Arc<Mutex<()>>>>>;

/// Per-game locks so that two requests for the same game never interleave
/// their load, play and save. A game has an entry only while some request
/// holds or waits for its lock.
#[derive(Clone, Default)]
pub struct GameLocks {
    locks: LockMap,
}

impl GameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, id: &GameId) -> GameLockGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(id.clone()).or_default().clone()
        };
        let guard = lock.lock_owned().await;
        GameLockGuard {
            id: id.clone(),
            locks: Arc::clone(&self.locks),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        let locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.len()
    }
}

/// Holds one game's lock. Dropping the last guard or waiter for a game
/// removes its entry from `GameLocks`.
pub struct GameLockGuard {
    id: GameId,
    locks: LockMap,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for GameLockGuard {
    fn drop(&mut self) {
        // release first so the map holds the only other reference
        self.guard.take();
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let unused = locks
            .get(&self.id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if unused {
            locks.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omok_common::games::omok::{Cell, StrategyKind};

    fn temp_directory() -> PathBuf {
        let random_number: u32 = rand::random();
        let name = format!("omok_store_test_{}", random_number);
        std::env::temp_dir().join(name)
    }

    #[tokio::test]
    async fn test_memory_store_put_get() {
        let store = MemoryGameStore::new();
        let id = GameId::new("abc123".to_string());
        assert!(matches!(store.get(&id).await, Err(StoreError::NotFound(_))));
        assert!(!store.contains(&id).await.unwrap());

        let mut record = SessionRecord::new(StrategyKind::Smart);
        record.board[3][4] = Cell::Player2;
        store.put(&id, &record).await.unwrap();

        assert!(store.contains(&id).await.unwrap());
        assert_eq!(store.get(&id).await.unwrap(), record);
    }

    #[tokio::test]
    async fn test_file_store_put_get() {
        let directory = temp_directory();
        let store = FileGameStore::open(&directory).await.unwrap();
        let id = GameId::new("65f1c2a93b7d0".to_string());

        let mut record = SessionRecord::new(StrategyKind::Random);
        record.board[14][0] = Cell::Player1;
        store.put(&id, &record).await.unwrap();

        assert!(directory.join("65f1c2a93b7d0.json").exists());
        assert!(store.contains(&id).await.unwrap());
        assert_eq!(store.get(&id).await.unwrap(), record);

        let _ = std::fs::remove_dir_all(directory);
    }

    #[tokio::test]
    async fn test_file_store_rejects_path_like_ids() {
        let directory = temp_directory();
        let store = FileGameStore::open(&directory).await.unwrap();
        let id = GameId::new("../secrets".to_string());

        assert!(!store.contains(&id).await.unwrap());
        assert!(matches!(store.get(&id).await, Err(StoreError::NotFound(_))));

        let _ = std::fs::remove_dir_all(directory);
    }

    #[tokio::test]
    async fn test_file_store_reports_corrupt_record() {
        let directory = temp_directory();
        let store = FileGameStore::open(&directory).await.unwrap();
        let path = directory.join("broken.json");
        std::fs::write(path, "{ not json").unwrap();

        let id = GameId::new("broken".to_string());
        let result = store.get(&id).await;
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));

        let _ = std::fs::remove_dir_all(directory);
    }

    #[tokio::test]
    async fn test_game_locks_serialize_same_game() {
        let locks = GameLocks::new();
        let id = GameId::new("g1".to_string());
        let other = GameId::new("g2".to_string());

        let guard = locks.acquire(&id).await;
        let other_guard = locks.acquire(&other).await;

        let locks_clone = locks.clone();
        let id_clone = id.clone();
        let waiter = tokio::spawn(async move {
            let _guard = locks_clone.acquire(&id_clone).await;
        });

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());
        drop(guard);
        waiter.await.unwrap();

        assert_eq!(locks.tracked(), 1);
        drop(other_guard);
        assert_eq!(locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_game_locks_forget_released_games() {
        let locks = GameLocks::new();
        for n in 0..10 {
            let id = GameId::new(format!("game{}", n));
            let _guard = locks.acquire(&id).await;
            assert_eq!(locks.tracked(), 1);
        }
        assert_eq!(locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_game_locks_keep_entry_for_waiter() {
        let locks = GameLocks::new();
        let id = GameId::new("busy".to_string());
        let guard = locks.acquire(&id).await;

        let locks_clone = locks.clone();
        let id_clone = id.clone();
        let (acquired_tx, acquired_rx) = tokio::sync::oneshot::channel();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
        let waiter = tokio::spawn(async move {
            let _guard = locks_clone.acquire(&id_clone).await;
            acquired_tx.send(()).unwrap();
            let _ = release_rx.await;
        });

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        drop(guard);
        acquired_rx.await.unwrap();
        assert_eq!(locks.tracked(), 1);

        release_tx.send(()).unwrap();
        waiter.await.unwrap();
        assert_eq!(locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_file_store_overwrites_through_staging_file() {
        let directory = temp_directory();
        let store = FileGameStore::open(&directory).await.unwrap();
        let id = GameId::new("6600aa11bb22c".to_string());

        let mut record = SessionRecord::new(StrategyKind::Smart);
        store.put(&id, &record).await.unwrap();
        record.board[7][7] = Cell::Player1;
        record.over = true;
        store.put(&id, &record).await.unwrap();

        assert_eq!(store.get(&id).await.unwrap(), record);
        assert!(!directory.join("6600aa11bb22c.json.tmp").exists());

        let _ = std::fs::remove_dir_all(directory);
    }

    #[tokio::test]
    async fn test_file_store_ignores_interrupted_write() {
        let directory = temp_directory();
        let store = FileGameStore::open(&directory).await.unwrap();
        let id = GameId::new("77bb00cc11dd2".to_string());

        let record = SessionRecord::new(StrategyKind::Random);
        store.put(&id, &record).await.unwrap();
        // a crash between writing the staging file and the rename
        let staging = directory.join("77bb00cc11dd2.json.tmp");
        std::fs::write(staging, "{\"board\": [[1, 2").unwrap();

        assert!(store.contains(&id).await.unwrap());
        assert_eq!(store.get(&id).await.unwrap(), record);

        let _ = std::fs::remove_dir_all(directory);
    }
}
