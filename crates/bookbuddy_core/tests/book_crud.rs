use bookbuddy_core::db::open_db_in_memory;
use bookbuddy_core::{
    BookFilter, BookPatch, BookRepository, BookStore, NewBook, SqliteBookRepository, StoreError,
};
use rusqlite::Connection;

fn new_book(title: &str, author: &str, year: i32, genre: &str) -> NewBook {
    NewBook::new(title, author, year, genre).unwrap()
}

fn temp_store() -> (tempfile::TempDir, BookStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = BookStore::new(dir.path().join("bookbuddy.db"));
    store.initialize().unwrap();
    (dir, store)
}

#[test]
fn add_then_get_returns_equal_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let draft = new_book("Dune", "Frank Herbert", 1965, "Sci-Fi");
    let id = repo.create_book(&draft).unwrap();

    let loaded = repo.get_book(id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.to_new_book(), draft);
}

#[test]
fn ids_are_monotonic_and_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let first = repo.create_book(&new_book("A", "B", 2000, "Fiction")).unwrap();
    let second = repo.create_book(&new_book("C", "D", 2001, "Fiction")).unwrap();
    assert!(second > first);

    repo.delete_book(second).unwrap();
    let third = repo.create_book(&new_book("E", "F", 2002, "Fiction")).unwrap();
    assert!(third > second);
}

#[test]
fn list_without_filters_preserves_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let titles = ["Zeta", "Alpha", "Mu"];
    for title in titles {
        repo.create_book(&new_book(title, "Author", 2010, "Fiction"))
            .unwrap();
    }

    let listed: Vec<String> = repo
        .list_books(&BookFilter::default())
        .unwrap()
        .into_iter()
        .map(|book| book.title)
        .collect();
    assert_eq!(listed, titles);
}

#[test]
fn list_on_empty_table_is_empty_success() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    assert!(repo.list_books(&BookFilter::default()).unwrap().is_empty());
    assert!(repo
        .list_books(&BookFilter::by_genre("Mystery"))
        .unwrap()
        .is_empty());
}

#[test]
fn list_filters_combine_as_conjunction() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let wanted = repo
        .create_book(&new_book("Poirot", "Agatha Christie", 1934, "Mystery"))
        .unwrap();
    repo.create_book(&new_book("Mary Westmacott", "Agatha Christie", 1930, "Romance"))
        .unwrap();
    repo.create_book(&new_book("Hound", "Arthur Conan Doyle", 1902, "Mystery"))
        .unwrap();

    assert_eq!(
        repo.list_books(&BookFilter::by_genre("Mystery"))
            .unwrap()
            .len(),
        2
    );
    assert_eq!(
        repo.list_books(&BookFilter::by_author("Agatha Christie"))
            .unwrap()
            .len(),
        2
    );

    let both = BookFilter {
        genre: Some("Mystery".to_string()),
        author: Some("Agatha Christie".to_string()),
    };
    let result = repo.list_books(&both).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, wanted);
}

#[test]
fn update_changes_only_supplied_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let id = repo.create_book(&new_book("A", "B", 2020, "Fiction")).unwrap();
    let patch = BookPatch {
        published_year: Some(1999),
        genre: Some("Biography".to_string()),
        ..BookPatch::default()
    };
    repo.update_book(id, &patch).unwrap();

    let loaded = repo.get_book(id).unwrap().unwrap();
    assert_eq!(loaded.title, "A");
    assert_eq!(loaded.author, "B");
    assert_eq!(loaded.published_year, 1999);
    assert_eq!(loaded.genre, "Biography");
}

#[test]
fn update_missing_id_reports_not_found_before_empty_patch() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let err = repo.update_book(42, &BookPatch::default()).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(42)));
}

#[test]
fn update_with_empty_patch_reports_no_valid_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let id = repo.create_book(&new_book("A", "B", 2020, "Fiction")).unwrap();
    let err = repo.update_book(id, &BookPatch::default()).unwrap_err();
    assert!(matches!(err, StoreError::NoValidFields));
    assert_eq!(err.to_string(), "No valid fields to update");
}

#[test]
fn delete_then_get_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let id = repo.create_book(&new_book("A", "B", 2020, "Fiction")).unwrap();
    repo.delete_book(id).unwrap();

    assert!(repo.get_book(id).unwrap().is_none());
    let err = repo.delete_book(id).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn corrupt_row_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    conn.execute(
        "INSERT INTO books (title, author, published_year, genre)
         VALUES ('', 'B', 2020, 'Fiction');",
        [],
    )
    .unwrap();

    let err = repo.list_books(&BookFilter::default()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn null_column_write_is_reported_as_conflict() {
    let conn = open_db_in_memory().unwrap();

    let err: StoreError = conn
        .execute(
            "INSERT INTO books (title, author, published_year, genre)
             VALUES (NULL, 'B', 2020, 'Fiction');",
            [],
        )
        .unwrap_err()
        .into();
    assert!(matches!(err, StoreError::Conflict(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteBookRepository::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_lifecycle_scenario() {
    let (_dir, store) = temp_store();

    let id = store.add(&new_book("A", "B", 2020, "Fiction")).unwrap();
    assert_eq!(id, 1);

    let fetched = store.get(1).unwrap();
    assert_eq!(fetched.title, "A");
    assert_eq!(fetched.author, "B");
    assert_eq!(fetched.published_year, 2020);
    assert_eq!(fetched.genre, "Fiction");

    let patch = BookPatch {
        title: Some("A2".to_string()),
        ..BookPatch::default()
    };
    store.update(1, &patch).unwrap();
    let updated = store.get(1).unwrap();
    assert_eq!(updated.title, "A2");
    assert_eq!(updated.author, "B");
    assert_eq!(updated.published_year, 2020);
    assert_eq!(updated.genre, "Fiction");

    store.delete(1).unwrap();
    assert!(matches!(store.get(1), Err(StoreError::NotFound(1))));
}

#[test]
fn store_list_matches_added_minus_deleted() {
    let (_dir, store) = temp_store();

    let a = store.add(&new_book("A", "X", 2001, "Fiction")).unwrap();
    let b = store.add(&new_book("B", "Y", 2002, "Mystery")).unwrap();
    let c = store.add(&new_book("C", "Z", 2003, "Romance")).unwrap();
    store.delete(b).unwrap();

    let ids: Vec<i64> = store
        .list(&BookFilter::default())
        .unwrap()
        .into_iter()
        .map(|book| book.id)
        .collect();
    assert_eq!(ids, vec![a, c]);
}

#[test]
fn store_instances_share_the_same_file() {
    let (dir, store) = temp_store();
    let id = store.add(&new_book("A", "B", 2020, "Fiction")).unwrap();

    let other = BookStore::new(dir.path().join("bookbuddy.db"));
    assert_eq!(other.get(id).unwrap().title, "A");
}
