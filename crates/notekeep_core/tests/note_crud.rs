use chrono::{DateTime, Duration, TimeZone, Utc};
use notekeep_core::db::open_db_in_memory;
use notekeep_core::{
    Clock, FixedClock, Note, NoteEdit, NoteListProjection, NoteRepository, NoteService,
    NoteServiceError, ProjectionOptions, RepoError, SectionOrder, SqliteNoteRepository,
};
use std::cell::Cell;

struct SteppingClock {
    now: Cell<DateTime<Utc>>,
}

impl SteppingClock {
    fn starting_at(now: DateTime<Utc>) -> Self {
        Self { now: Cell::new(now) }
    }

    fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for &SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

#[test]
fn query_all_orders_by_modification_date_descending() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let oldest = Note::new(at(2024, 1, 1, 9)).with_text("oldest", "");
    let newest = Note::new(at(2024, 6, 1, 9)).with_text("newest", "");
    let middle = Note::new(at(2024, 3, 1, 9)).with_text("middle", "");
    for note in [&oldest, &newest, &middle] {
        repo.insert(note).unwrap();
    }

    let titles: Vec<String> = repo
        .query_all()
        .unwrap()
        .into_iter()
        .map(|note| note.title)
        .collect();
    assert_eq!(titles, vec!["newest", "middle", "oldest"]);
}

#[test]
fn commit_persists_text_and_modification_date_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let mut note = Note::new(at(2024, 6, 1, 9));
    repo.insert(&note).unwrap();

    note.title = "Title".to_string();
    note.content = "Body".to_string();
    note.touch(at(2024, 6, 2, 9));
    repo.commit(&note).unwrap();

    let stored = repo.get(note.id).unwrap().unwrap();
    assert_eq!(stored, note);
    assert_eq!(stored.creation_date, at(2024, 6, 1, 9));
}

#[test]
fn commit_on_missing_note_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let note = Note::new(at(2024, 6, 1, 9));

    let err = repo.commit(&note).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == note.id));
}

#[test]
fn insert_rejects_modification_before_creation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let mut note = Note::new(at(2024, 6, 1, 9));
    note.modification_date = at(2024, 5, 1, 9);

    let err = repo.insert(&note).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.query_all().unwrap().is_empty());
}

#[test]
fn delete_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let note = Note::new(at(2024, 6, 1, 9));
    repo.insert(&note).unwrap();

    assert!(repo.delete(note.id).unwrap());
    assert!(!repo.delete(note.id).unwrap());
    assert_eq!(repo.get(note.id).unwrap(), None);
}

#[test]
fn service_creates_empty_note_stamped_by_clock() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let service = NoteService::with_clock(repo, FixedClock(at(2024, 6, 15, 10)));

    let created = service.create_note().unwrap();
    assert!(created.title.is_empty());
    assert!(created.content.is_empty());
    assert_eq!(created.creation_date, at(2024, 6, 15, 10));
    assert_eq!(created.modification_date, at(2024, 6, 15, 10));
    assert_eq!(service.list_notes().unwrap(), vec![created]);
}

#[test]
fn edit_bumps_modification_date_only_when_text_changes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let clock = SteppingClock::starting_at(at(2024, 6, 15, 10));
    let service = NoteService::with_clock(repo, &clock);
    let created = service.create_note().unwrap();

    clock.advance(Duration::hours(1));
    let edited = service
        .edit_note(
            created.id,
            NoteEdit {
                title: Some("Groceries".to_string()),
                content: None,
            },
        )
        .unwrap();
    assert_eq!(edited.title, "Groceries");
    assert_eq!(edited.modification_date, at(2024, 6, 15, 11));
    assert_eq!(edited.creation_date, at(2024, 6, 15, 10));

    clock.advance(Duration::hours(1));
    let unchanged = service
        .edit_note(
            created.id,
            NoteEdit {
                title: Some("Groceries".to_string()),
                content: Some(String::new()),
            },
        )
        .unwrap();
    assert_eq!(unchanged.modification_date, at(2024, 6, 15, 11));
}

#[test]
fn edit_of_missing_note_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let service = NoteService::new(repo);

    let missing = uuid::Uuid::new_v4();
    let err = service
        .edit_note(
            missing,
            NoteEdit {
                title: Some("x".to_string()),
                content: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(id) if id == missing));
}

#[test]
fn resolve_id_accepts_full_ids_and_unique_prefixes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let service = NoteService::new(repo);
    let created = service.create_note().unwrap();

    assert_eq!(service.resolve_id(&created.id.to_string()).unwrap(), created.id);
    let short = created.short_id();
    assert_eq!(service.resolve_id(&short).unwrap(), created.id);
    assert_eq!(
        service.resolve_id(&short.to_ascii_uppercase()).unwrap(),
        created.id
    );

    let err = service.resolve_id("zzzz").unwrap_err();
    assert!(matches!(err, NoteServiceError::UnknownId(_)));

    service.delete_note(created.id).unwrap();
    let err = service.resolve_id(&created.id.to_string()).unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(_)));
}

#[test]
fn resolve_id_reports_ambiguous_prefix() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let first = Note::with_id(
        uuid::Uuid::parse_str("aaaa0000-0000-4000-8000-000000000001").unwrap(),
        at(2024, 6, 1, 9),
    );
    let second = Note::with_id(
        uuid::Uuid::parse_str("aaaa0000-0000-4000-8000-000000000002").unwrap(),
        at(2024, 6, 1, 9),
    );
    repo.insert(&first).unwrap();
    repo.insert(&second).unwrap();
    let service = NoteService::new(repo);

    let err = service.resolve_id("aaaa").unwrap_err();
    assert!(matches!(err, NoteServiceError::AmbiguousId { matches: 2, .. }));
}

#[test]
fn sections_snapshot_storage_and_apply_search() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let seed = [
        Note::new(at(2024, 6, 15, 9)).with_text("Standup", "say hello world"),
        Note::new(at(2024, 6, 14, 9)).with_text("Groceries", "milk"),
        Note::new(at(2023, 1, 1, 9)).with_text("Hello again", ""),
    ];
    for note in &seed {
        repo.insert(note).unwrap();
    }
    let service = NoteService::with_clock(repo, FixedClock(at(2024, 6, 15, 10)));
    let projection = NoteListProjection::default();

    let all = service.sections_in("", &projection, &Utc).unwrap();
    let labels: Vec<&str> = all.iter().map(|section| section.label).collect();
    assert_eq!(labels, vec!["Earlier", "Today", "Yesterday"]);

    let hits = service.sections_in("HELLO", &projection, &Utc).unwrap();
    let titles: Vec<(&str, Vec<&str>)> = hits
        .iter()
        .map(|section| {
            (
                section.label,
                section.notes.iter().map(|n| n.title.as_str()).collect(),
            )
        })
        .collect();
    assert_eq!(
        titles,
        vec![("Earlier", vec!["Hello again"]), ("Today", vec!["Standup"])]
    );

    let recency = NoteListProjection::new(ProjectionOptions {
        section_order: SectionOrder::Recency,
        ..ProjectionOptions::default()
    });
    let ordered = service.sections_in("", &recency, &Utc).unwrap();
    let labels: Vec<&str> = ordered.iter().map(|section| section.label).collect();
    assert_eq!(labels, vec!["Today", "Yesterday", "Earlier"]);
}

#[test]
fn sections_group_in_host_timezone() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let now = at(2024, 6, 15, 12);
    let fresh = Note::new(now).with_text("fresh", "");
    let old = Note::new(at(2023, 1, 1, 12)).with_text("old", "");
    repo.insert(&fresh).unwrap();
    repo.insert(&old).unwrap();
    let service = NoteService::with_clock(repo, FixedClock(now));

    let sections = service.sections("", &NoteListProjection::default()).unwrap();
    let labels: Vec<&str> = sections.iter().map(|section| section.label).collect();
    assert_eq!(labels, vec!["Earlier", "Today"]);
    assert_eq!(sections[1].notes[0].title, "fresh");

    let hits = service.sections("FRESH", &NoteListProjection::default()).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].notes[0].id, fresh.id);
}
