use notekeep_core::{
    InMemoryNoteRepository, JsonFileNoteRepository, Note, NoteCollection, NoteRepository,
    NoteStore, NoteStoreError, RepoError, RepoResult,
};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

fn open_file_store(path: &Path) -> NoteStore<JsonFileNoteRepository> {
    NoteStore::open(JsonFileNoteRepository::new(path)).unwrap()
}

/// Repository whose saves can be switched to fail.
struct FlakyRepository {
    inner: InMemoryNoteRepository,
    fail_saves: Arc<AtomicBool>,
}

impl NoteRepository for FlakyRepository {
    fn load(&self) -> RepoResult<NoteCollection> {
        self.inner.load()
    }

    fn save(&self, notes: &NoteCollection) -> RepoResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepoError::Io {
                op: "write",
                path: "flaky.json".into(),
                source: std::io::Error::other("disk full"),
            });
        }
        self.inner.save(notes)
    }
}

#[test]
fn create_get_update_delete_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_file_store(&dir.path().join("notes.json"));

    store.create("a", "hello").unwrap();
    assert_eq!(store.get_by_name("a").unwrap(), Note::new("a", "hello"));

    store.update("a", "world").unwrap();
    assert_eq!(store.get_by_name("a").unwrap(), Note::new("a", "world"));

    let removed = store.delete("a").unwrap();
    assert_eq!(removed, Note::new("a", "world"));

    let err = store.get_by_name("a").unwrap_err();
    assert!(matches!(err, NoteStoreError::NotFound(name) if name == "a"));
}

#[test]
fn duplicate_create_keeps_original_text() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_file_store(&dir.path().join("notes.json"));

    store.create("x", "1").unwrap();
    let err = store.create("x", "2").unwrap_err();

    assert!(matches!(err, NoteStoreError::AlreadyExists(name) if name == "x"));
    assert_eq!(store.get_by_name("x").unwrap().text, "1");
    assert_eq!(store.len(), 1);
}

#[test]
fn update_and_delete_of_missing_note_report_not_found() {
    let store = NoteStore::open(InMemoryNoteRepository::new()).unwrap();

    let update = store.update("ghost", "boo").unwrap_err();
    assert!(matches!(update, NoteStoreError::NotFound(_)));

    let delete = store.delete("ghost").unwrap_err();
    assert!(matches!(delete, NoteStoreError::NotFound(_)));

    assert!(store.is_empty());
}

#[test]
fn names_are_case_sensitive() {
    let store = NoteStore::open(InMemoryNoteRepository::new()).unwrap();
    store.create("Note", "upper").unwrap();
    store.create("note", "lower").unwrap();

    assert_eq!(store.get_by_name("Note").unwrap().text, "upper");
    assert_eq!(store.get_by_name("note").unwrap().text, "lower");
    assert!(store.get_by_name("NOTE").is_err());
}

#[test]
fn empty_text_is_allowed() {
    let store = NoteStore::open(InMemoryNoteRepository::new()).unwrap();
    store.create("blank", "").unwrap();
    store.update("blank", "").unwrap();
    assert_eq!(store.get_by_name("blank").unwrap().text, "");
}

#[test]
fn get_all_is_idempotent_and_preserves_insertion_order() {
    let store = NoteStore::open(InMemoryNoteRepository::new()).unwrap();
    store.create("c", "3").unwrap();
    store.create("a", "1").unwrap();
    store.create("b", "2").unwrap();
    store.update("c", "33").unwrap();

    let first = store.get_all();
    let second = store.get_all();
    assert_eq!(first, second);

    let names: Vec<&str> = first.iter().map(|note| note.name.as_str()).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
}

#[test]
fn restart_reproduces_committed_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");

    let before = {
        let store = open_file_store(&path);
        store.create("keep", "v1").unwrap();
        store.create("drop", "gone soon").unwrap();
        store.create("edit", "old").unwrap();
        store.update("edit", "new").unwrap();
        store.update("keep", "v2").unwrap();
        store.delete("drop").unwrap();
        store.get_all()
    };

    let reopened = open_file_store(&path);
    assert_eq!(reopened.get_all(), before);
    assert_eq!(
        before,
        vec![Note::new("keep", "v2"), Note::new("edit", "new")]
    );
}

#[test]
fn every_mutation_is_on_disk_before_it_returns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    let store = open_file_store(&path);

    store.create("a", "1").unwrap();
    let on_disk = JsonFileNoteRepository::new(&path).load().unwrap();
    assert_eq!(on_disk.notes(), store.get_all().as_slice());

    store.update("a", "2").unwrap();
    let on_disk = JsonFileNoteRepository::new(&path).load().unwrap();
    assert_eq!(on_disk.get("a").map(|note| note.text.as_str()), Some("2"));

    store.delete("a").unwrap();
    let on_disk = JsonFileNoteRepository::new(&path).load().unwrap();
    assert!(on_disk.is_empty());
}

#[test]
fn concurrent_creates_for_same_name_have_exactly_one_winner() {
    const WRITERS: usize = 16;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    let store = open_file_store(&path);
    let barrier = Barrier::new(WRITERS);

    let results: Vec<Result<Note, NoteStoreError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..WRITERS)
            .map(|writer| {
                let store = &store;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    store.create("shared", format!("writer-{writer}"))
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("writer thread should not panic"))
            .collect()
    });

    let winners: Vec<&Note> = results.iter().filter_map(|result| result.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    let conflicts = results
        .iter()
        .filter(|result| matches!(result, Err(NoteStoreError::AlreadyExists(_))))
        .count();
    assert_eq!(conflicts, WRITERS - 1);

    let all = store.get_all();
    assert_eq!(all.len(), 1);
    assert_eq!(&all[0], winners[0]);

    let reopened = open_file_store(&path);
    assert_eq!(reopened.get_all(), all);
}

#[test]
fn concurrent_mutations_on_distinct_names_are_not_lost() {
    const WRITERS: usize = 8;
    const NOTES_PER_WRITER: usize = 10;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    let store = open_file_store(&path);

    thread::scope(|scope| {
        for writer in 0..WRITERS {
            let store = &store;
            scope.spawn(move || {
                for index in 0..NOTES_PER_WRITER {
                    let name = format!("w{writer}-n{index}");
                    store.create(name.as_str(), "draft").unwrap();
                    store.update(&name, "final").unwrap();
                    // Readers racing the writers must never see a torn state.
                    let snapshot = store.get_all();
                    let collection = NoteCollection::from_notes(snapshot);
                    assert!(collection.is_ok());
                }
            });
        }
    });

    let reopened = open_file_store(&path);
    let all = reopened.get_all();
    assert_eq!(all.len(), WRITERS * NOTES_PER_WRITER);
    assert!(all.iter().all(|note| note.text == "final"));
}

#[test]
fn failed_save_rolls_back_every_mutation_kind() {
    let fail_saves = Arc::new(AtomicBool::new(false));
    let store = NoteStore::open(FlakyRepository {
        inner: InMemoryNoteRepository::new(),
        fail_saves: Arc::clone(&fail_saves),
    })
    .unwrap();
    store.create("a", "committed").unwrap();
    let committed = store.get_all();

    fail_saves.store(true, Ordering::SeqCst);

    let create = store.create("b", "lost").unwrap_err();
    assert!(matches!(create, NoteStoreError::StorageIo(_)));
    let update = store.update("a", "lost").unwrap_err();
    assert!(matches!(update, NoteStoreError::StorageIo(_)));
    let delete = store.delete("a").unwrap_err();
    assert!(matches!(delete, NoteStoreError::StorageIo(_)));

    assert_eq!(store.get_all(), committed);

    // The name stays free after the failed create, so a retry can win.
    fail_saves.store(false, Ordering::SeqCst);
    store.create("b", "retried").unwrap();
    assert_eq!(store.get_by_name("b").unwrap().text, "retried");
}

#[test]
fn failed_file_save_leaves_disk_and_memory_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let store_dir = dir.path().join("store");
    let path = store_dir.join("notes.json");
    let store = open_file_store(&path);
    store.create("a", "1").unwrap();

    // Swap the directory out so the temp file cannot be created next to the target.
    let parked = dir.path().join("parked");
    fs::rename(&store_dir, &parked).unwrap();

    let err = store.create("b", "2").unwrap_err();
    assert!(matches!(err, NoteStoreError::StorageIo(_)));
    assert_eq!(store.get_all(), vec![Note::new("a", "1")]);

    fs::rename(&parked, &store_dir).unwrap();
    let on_disk = JsonFileNoteRepository::new(&path).load().unwrap();
    assert_eq!(on_disk.notes(), &[Note::new("a", "1")]);
}

#[test]
fn open_refuses_corrupt_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    fs::write(&path, "not json at all").unwrap();

    let err = NoteStore::open(JsonFileNoteRepository::new(&path))
        .err()
        .expect("corrupt store must not open");
    assert!(matches!(err, NoteStoreError::CorruptStore(_)));
    assert_eq!(err.code(), "corrupt_store");

    assert_eq!(fs::read_to_string(&path).unwrap(), "not json at all");
}
