//! Book store: the CRUD contract used by request handlers.
//!
//! # Responsibility
//! - Open a connection per operation, run one repository call, release it.
//! - Emit metadata-only logging events for every operation.
//!
//! # Invariants
//! - No connection or transaction outlives a single call.
//! - The store does not validate payloads; callers run `validator` first.
//! - Concurrent callers get last-writer-wins semantics.

use crate::config::BookBuddyConfig;
use crate::db::open_db;
use crate::model::book::{Book, BookFilter, BookId, BookPatch, NewBook};
use crate::repo::book_repo::{BookRepository, SqliteBookRepository, StoreError, StoreResult};
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// File-backed book store. Cheap to clone; holds only the database path.
#[derive(Debug, Clone)]
pub struct BookStore {
    db_path: PathBuf,
}

impl BookStore {
    /// Creates a store for `db_path`. Nothing is opened until the first call.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn from_config(config: &BookBuddyConfig) -> Self {
        Self::new(config.db_path.clone())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Ensures the database file and `books` table exist.
    ///
    /// Safe to call any number of times.
    pub fn initialize(&self) -> StoreResult<()> {
        self.with_repo("initialize", |_| Ok(()))
    }

    /// Inserts a record and returns its store-assigned id.
    pub fn add(&self, book: &NewBook) -> StoreResult<BookId> {
        let id = self.with_repo("add", |repo| repo.create_book(book))?;
        info!("event=book_add module=store status=ok book_id={id}");
        Ok(id)
    }

    /// Lists records matching every set filter, in insertion order.
    pub fn list(&self, filter: &BookFilter) -> StoreResult<Vec<Book>> {
        self.with_repo("list", |repo| repo.list_books(filter))
    }

    /// Gets one record; `NotFound` when the id does not exist.
    pub fn get(&self, id: BookId) -> StoreResult<Book> {
        self.with_repo("get", |repo| {
            repo.get_book(id)?.ok_or(StoreError::NotFound(id))
        })
    }

    /// Applies a partial update.
    ///
    /// # Errors
    /// - `NotFound` when the id does not exist (checked first).
    /// - `NoValidFields` when the patch sets no mutable column.
    pub fn update(&self, id: BookId, patch: &BookPatch) -> StoreResult<()> {
        self.with_repo("update", |repo| repo.update_book(id, patch))?;
        info!("event=book_update module=store status=ok book_id={id}");
        Ok(())
    }

    /// Removes a record; `NotFound` when the id does not exist.
    pub fn delete(&self, id: BookId) -> StoreResult<()> {
        self.with_repo("delete", |repo| repo.delete_book(id))?;
        info!("event=book_delete module=store status=ok book_id={id}");
        Ok(())
    }

    fn with_repo<T>(
        &self,
        op: &'static str,
        run: impl FnOnce(&SqliteBookRepository<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let started_at = Instant::now();
        let result = open_db(&self.db_path)
            .map_err(StoreError::from)
            .and_then(|conn| {
                let repo = SqliteBookRepository::try_new(&conn)?;
                run(&repo)
            });

        let duration_ms = started_at.elapsed().as_millis();
        match &result {
            Ok(_) => debug!(
                "event=store_call module=store op={op} status=ok duration_ms={duration_ms}"
            ),
            Err(err @ (StoreError::NotFound(_) | StoreError::NoValidFields)) => debug!(
                "event=store_call module=store op={op} status=rejected duration_ms={duration_ms} reason={err}"
            ),
            Err(err) => error!(
                "event=store_call module=store op={op} status=error duration_ms={duration_ms} error={err}"
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::BookStore;
    use crate::model::book::{BookFilter, BookPatch, NewBook};
    use crate::repo::book_repo::StoreError;

    #[test]
    fn store_creates_database_file_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.db");
        let store = BookStore::new(&path);
        assert!(!path.exists());

        store.initialize().unwrap();
        assert!(path.exists());
        store.initialize().unwrap();
    }

    #[test]
    fn each_call_sees_previous_writes() {
        let dir = tempfile::tempdir().unwrap();
        let store = BookStore::new(dir.path().join("books.db"));

        let id = store
            .add(&NewBook::new("A", "B", 2020, "Fiction").unwrap())
            .unwrap();
        store
            .update(
                id,
                &BookPatch {
                    genre: Some("Mystery".to_string()),
                    ..BookPatch::default()
                },
            )
            .unwrap();

        let listed = store.list(&BookFilter::by_genre("Mystery")).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
    }

    #[test]
    fn missing_parent_directory_is_a_backend_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = BookStore::new(dir.path().join("missing").join("books.db"));

        let err = store.initialize().unwrap_err();
        assert!(matches!(err, StoreError::Db(_)));
        assert!(!err.is_not_found());
    }
}
