use ktech_core::db::{open_db, open_db_in_memory};
use ktech_core::store::settings_store::SettingsStore;
use ktech_core::store::task_store::TaskStore;
use ktech_core::store::{SETTINGS_KEY, TASKS_KEY};
use ktech_core::{KvRepository, Priority, RepoError, Settings, SqliteKvRepository, Task};
use rusqlite::Connection;

fn task(id: &str, title: &str) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        completed: false,
        priority: Priority::Medium,
        due_date: String::new(),
        category: "personal".to_string(),
        favorite: false,
    }
}

#[test]
fn put_get_remove_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();

    assert_eq!(repo.get("userTasks").unwrap(), None);
    repo.put("userTasks", "[]").unwrap();
    repo.put("userTasks", "[1]").unwrap();
    assert_eq!(repo.get("userTasks").unwrap().as_deref(), Some("[1]"));
    assert_eq!(repo.keys().unwrap(), vec!["userTasks".to_string()]);

    assert!(repo.remove("userTasks").unwrap());
    assert!(!repo.remove("userTasks").unwrap());
    assert_eq!(repo.get("userTasks").unwrap(), None);
}

#[test]
fn blank_keys_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();

    assert!(matches!(repo.put("  ", "x"), Err(RepoError::InvalidKey(_))));
    assert!(matches!(repo.get(""), Err(RepoError::InvalidKey(_))));
}

#[test]
fn unmigrated_connection_is_rejected() {
    let conn = Connection::open_in_memory().unwrap();
    let result = SqliteKvRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::SchemaNotReady)));
}

#[test]
fn tasks_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ktech.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteKvRepository::try_new(&conn).unwrap();
        let mut store = TaskStore::load(&repo).unwrap();
        store
            .commit(&repo, vec![task("1", "Buy milk"), task("2", "Walk dog")])
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let store = TaskStore::load(&repo).unwrap();
    let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Buy milk", "Walk dog"]);
}

#[test]
fn unparsable_values_load_as_defaults() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    repo.put(TASKS_KEY, "{not json").unwrap();
    repo.put(SETTINGS_KEY, "42").unwrap();

    let tasks = TaskStore::load(&repo).unwrap();
    assert!(tasks.is_empty());

    let settings = SettingsStore::load(&repo).unwrap();
    assert_eq!(settings.settings(), &Settings::default());
}

#[test]
fn legacy_records_without_favorite_load_as_not_favorite() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    repo.put(
        TASKS_KEY,
        r#"[{"id":"1","title":"Old","description":"","completed":false,"priority":"high","dueDate":"","category":"work"}]"#,
    )
    .unwrap();

    let store = TaskStore::load(&repo).unwrap();
    let loaded = store.get("1").unwrap();
    assert!(!loaded.favorite);
    assert_eq!(loaded.priority, Priority::High);
}

#[test]
fn records_with_blank_titles_are_dropped_on_load() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    repo.put(
        TASKS_KEY,
        r#"[{"id":"1","title":"  "},{"id":"2","title":"Keep"}]"#,
    )
    .unwrap();

    let store = TaskStore::load(&repo).unwrap();
    assert_eq!(store.len(), 1);
    assert!(store.contains("2"));
}

#[test]
fn empty_collection_is_not_written_until_first_task() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();

    let mut store = TaskStore::load(&repo).unwrap();
    store.commit(&repo, Vec::new()).unwrap();
    assert_eq!(repo.get(TASKS_KEY).unwrap(), None);

    store.commit(&repo, vec![task("1", "First")]).unwrap();
    store.commit(&repo, Vec::new()).unwrap();
    assert_eq!(repo.get(TASKS_KEY).unwrap().as_deref(), Some("[]"));
}
