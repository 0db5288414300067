use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use agdb::{DbAny, DbKeyValue, DbValue, QueryBuilder};
use parking_lot::RwLock;
use tracing::debug;

use crate::{Error, Result, fs::state_dir, repository::KeyValueStore};

/// Alias of the node whose properties hold every stored key.
const STORAGE: &str = "storage";

/// Key-value storage backed by an agdb database.
///
/// All keys live as properties on a single node aliased `storage`, and every value is stored as
/// a string. Clones share the same underlying database.
#[derive(Debug, Clone)]
pub struct Db {
    db: Arc<RwLock<DbAny>>,
}

impl Db {
    /// Open the database in the Wedge state directory.
    pub fn new() -> Result<Self> {
        Self::open(&state_dir()?.join("data.db"))
    }

    /// Open (or create) a file backed database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::NonUtf8Path(path.to_path_buf()))?;

        let db = Self {
            db: Arc::new(RwLock::new(DbAny::new_file(path_str)?)),
        };
        db.init()?;

        debug!("Opened database at {}", path.display());

        Ok(db)
    }

    /// Create a memory backed database. Nothing survives the process.
    pub fn in_memory() -> Result<Self> {
        let db = Self {
            db: Arc::new(RwLock::new(DbAny::new_memory("wedge")?)),
        };
        db.init()?;

        Ok(db)
    }

    fn init(&self) -> Result<()> {
        let alias_count = self
            .db
            .read()
            .exec(QueryBuilder::select().aliases().query())?
            .result;

        if alias_count == 0 {
            self.db.write().exec_mut(
                // Insert the storage node if it doesn't exist
                QueryBuilder::insert().nodes().aliases([STORAGE]).query(),
            )?;
        }

        Ok(())
    }

    /// Copy the database to `path`.
    pub fn backup(&self, path: &Path) -> Result<()> {
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::NonUtf8Path(path.to_path_buf()))?;

        self.db.write().backup(path_str)?;

        debug!("Backed up database to {}", path.display());

        Ok(())
    }

    /// Back up the database into the state directory under a timestamped name.
    pub fn snapshot(&self) -> Result<PathBuf> {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let path = state_dir()?.join(format!("data-{timestamp}.db.bak"));

        self.backup(&path)?;

        Ok(path)
    }

    fn entries(&self) -> Result<Vec<DbKeyValue>> {
        Ok(self
            .db
            .read()
            .exec(QueryBuilder::select().ids(STORAGE).query())?
            .elements
            .pop()
            .map(|e| e.values)
            .unwrap_or_default())
    }
}

impl KeyValueStore for Db {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let key = DbValue::from(key);

        Ok(self
            .entries()?
            .into_iter()
            .find(|kv| kv.key == key)
            .and_then(|kv| match kv.value {
                DbValue::String(s) => Some(s),
                // Only strings are ever written
                _ => None,
            }))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.write().exec_mut(
            QueryBuilder::insert()
                .values([[(key, value).into()]])
                .ids(STORAGE)
                .query(),
        )?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.get(key)?.is_none() {
            return Ok(());
        }

        self.db
            .write()
            .exec_mut(QueryBuilder::remove().values(key).ids(STORAGE).query())?;

        Ok(())
    }
}
