use std::collections::BTreeMap;
use std::sync::Arc;

use shelf_catalog::{Filter, FilterMatch, FilterMode, Status, TimelineEventType};
use shelf_core::{Primitive, Timestamp};
use shelf_db::Store;
use shelf_lib::{Collaborators, ImageDir, Library, LibraryError, Settings, StaleFlag};

async fn memory_library() -> (Library, Arc<StaleFlag>) {
    let store = Store::open_memory().await.unwrap();
    library_over(store, None)
}

fn library_over(store: Store, images: Option<ImageDir>) -> (Library, Arc<StaleFlag>) {
    let stale = Arc::new(StaleFlag::new());
    let mut collaborators = Collaborators {
        stale: stale.clone(),
        ..Collaborators::default()
    };
    if let Some(images) = images {
        collaborators.assets = Arc::new(images);
    }
    let library = Library::with_store(store, Settings::default(), collaborators);
    (library, stale)
}

async fn text_column(library: &Library, table: &'static str, id: i64, column: &'static str) -> Primitive {
    library
        .store()
        .read_field(table, id, column)
        .await
        .unwrap()
        .unwrap()
}

// ── Factories ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_game_records_added_event() {
    let (mut library, _) = memory_library().await;
    let game = library.add_game(7, "Seven").await.unwrap();
    assert_eq!(game.name(), "Seven");
    assert!(game.added_on().is_set());

    assert_eq!(library.timeline(7).len(), 1);
    assert_eq!(library.timeline(7)[0].kind(), TimelineEventType::GameAdded);
    assert_eq!(library.store().timeline_events_for(7).await.unwrap().len(), 1);
}

#[tokio::test]
async fn add_game_rejects_taken_id() {
    let (mut library, _) = memory_library().await;
    library.add_game(1, "One").await.unwrap();
    let err = library.add_game(1, "Again").await.unwrap_err();
    assert!(matches!(err, LibraryError::IdCollision(1)));
}

#[tokio::test]
async fn duplicate_label_and_tab_names_rejected() {
    let (mut library, _) = memory_library().await;
    library.create_label("Beta").await.unwrap();
    let err = library.create_label("Beta").await.unwrap_err();
    assert!(matches!(err, LibraryError::DuplicateLabel(name) if name == "Beta"));

    library.create_tab("Playing").await.unwrap();
    let err = library.create_tab("Playing").await.unwrap_err();
    assert!(matches!(err, LibraryError::DuplicateTab(_)));
}

#[tokio::test]
async fn created_labels_append_in_order() {
    let (mut library, _) = memory_library().await;
    let first = library.create_label("First").await.unwrap();
    let second = library.create_label("Second").await.unwrap();
    library.flush().await.unwrap();

    assert_eq!(*library.label(first).unwrap().position(), 0);
    assert_eq!(*library.label(second).unwrap().position(), 1);
    assert_eq!(
        text_column(&library, "labels", second, "name").await,
        Primitive::Text("Second".into())
    );
}

// ── Write-through ───────────────────────────────────────────────────────────

#[tokio::test]
async fn later_write_wins_after_flush() {
    let (mut library, _) = memory_library().await;
    library.add_game(1, "Start").await.unwrap();
    let game = library.game_mut(1).unwrap();
    game.set_name("Middle".to_string());
    game.set_name("End".to_string());
    library.flush().await.unwrap();

    assert_eq!(
        text_column(&library, "games", 1, "name").await,
        Primitive::Text("End".into())
    );
}

#[tokio::test]
async fn bulk_setter_calls_keep_last_value() {
    let (mut library, _) = memory_library().await;
    library.add_game(1, "Busy").await.unwrap();
    // Far more changes than the default queue holds, with no await between.
    let game = library.game_mut(1).unwrap();
    for votes in 0..2000 {
        game.set_votes(votes);
    }
    library.flush().await.unwrap();

    assert_eq!(*library.game(1).unwrap().votes(), 1999);
    assert_eq!(
        text_column(&library, "games", 1, "votes").await,
        Primitive::Integer(1999)
    );
}

#[tokio::test]
async fn setters_mark_view_stale() {
    let (mut library, stale) = memory_library().await;
    library.add_game(1, "One").await.unwrap();
    stale.take();

    library.game_mut(1).unwrap().set_status(Status::Completed);
    assert!(stale.take());

    library.game_mut(1).unwrap().selected = true;
    assert!(!stale.is_stale());
}

#[tokio::test]
async fn timestamp_setter_keeps_wrapper_and_persists() {
    let (mut library, _) = memory_library().await;
    library.add_game(1, "One").await.unwrap();
    let held = library.game(1).unwrap().last_launched().clone();

    library
        .game_mut(1)
        .unwrap()
        .set_last_launched(Timestamp::new(1_700_000_000));
    library.flush().await.unwrap();

    assert_eq!(held.value(), 1_700_000_000);
    assert_eq!(
        text_column(&library, "games", 1, "last_launched").await,
        Primitive::Integer(1_700_000_000)
    );
}

#[tokio::test]
async fn add_executable_marks_version_installed() {
    let (mut library, _) = memory_library().await;
    library.add_game(3, "Three").await.unwrap();
    library.game_mut(3).unwrap().set_version("1.0".to_string());

    assert!(library.add_executable(3, "/games/three/run.sh").await.unwrap());
    assert!(!library.add_executable(3, "/games/three/run.sh").await.unwrap());

    let game = library.game(3).unwrap();
    assert_eq!(game.installed(), "1.0");
    assert!(!*game.updated());
    let latest = &library.timeline(3)[0];
    assert_eq!(latest.kind(), TimelineEventType::GameInstalled);
    assert_eq!(latest.arguments(), ["1.0".to_string()]);
}

#[tokio::test]
async fn executables_under_default_dir_are_relative() {
    let store = Store::open_memory().await.unwrap();
    let settings = Settings {
        default_exe_dir: Some("/games".into()),
        ..Settings::default()
    };
    let mut library = Library::with_store(store, settings, Collaborators::default());
    library.add_game(1, "One").await.unwrap();

    library.add_executable(1, "/games/one/start.exe").await.unwrap();
    library.add_executable(1, "https://example.org/play").await.unwrap();

    assert_eq!(
        library.game(1).unwrap().executables(),
        &vec!["one/start.exe".to_string(), "https://example.org/play".to_string()]
    );
}

// ── Renumbering ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn renumber_moves_events_and_labels() {
    let (mut library, _) = memory_library().await;
    let beta = library.create_label("Beta").await.unwrap();
    library.add_game(7, "Seven").await.unwrap();
    library.add_label_to_game(7, beta).unwrap();
    library
        .create_timeline_event(7, TimelineEventType::GameLaunched, vec!["1.0".into()])
        .await
        .unwrap();
    library
        .create_timeline_event(7, TimelineEventType::GameFinished, vec!["1.0".into()])
        .await
        .unwrap();

    library.renumber_game(7, 42).await.unwrap();

    assert!(library.game(7).is_none());
    let game = library.game(42).unwrap();
    assert_eq!(game.id(), 42);
    assert_eq!(game.labels(), &vec![beta]);
    assert!(library.timeline(7).is_empty());
    assert_eq!(library.timeline(42).len(), 3);
    assert!(library.timeline(42).iter().all(|e| e.game_id() == 42));

    let store = library.store();
    assert_eq!(store.timeline_events_for(42).await.unwrap().len(), 3);
    assert!(store.timeline_events_for(7).await.unwrap().is_empty());
}

#[tokio::test]
async fn renumbered_game_writes_to_new_row() {
    let (mut library, _) = memory_library().await;
    library.add_game(1, "One").await.unwrap();
    library.renumber_game(1, 2).await.unwrap();

    library.game_mut(2).unwrap().set_notes("moved".to_string());
    library.flush().await.unwrap();

    assert_eq!(
        text_column(&library, "games", 2, "notes").await,
        Primitive::Text("moved".into())
    );
    assert_eq!(library.store().read_field("games", 1, "notes").await.unwrap(), None);
}

#[tokio::test]
async fn renumber_into_loaded_id_changes_nothing() {
    let (mut library, _) = memory_library().await;
    library.add_game(1, "One").await.unwrap();
    library.add_game(2, "Two").await.unwrap();

    let err = library.renumber_game(1, 2).await.unwrap_err();
    assert!(matches!(err, LibraryError::IdCollision(2)));
    assert_eq!(library.game(1).unwrap().name(), "One");
    assert_eq!(library.timeline(1).len(), 1);
    assert_eq!(library.store().timeline_events_for(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn renumber_into_stored_id_is_a_collision() {
    let store = Store::open_memory().await.unwrap();
    let (mut library, _) = library_over(store.clone(), None);
    library.add_game(1, "One").await.unwrap();
    store.insert(&shelf_catalog::Game::new(9)).await.unwrap();

    let err = library.renumber_game(1, 9).await.unwrap_err();
    assert!(matches!(err, LibraryError::IdCollision(9)));
    assert!(library.game(1).is_some());
}

#[tokio::test]
async fn renumber_same_id_is_noop() {
    let (mut library, _) = memory_library().await;
    library.add_game(5, "Five").await.unwrap();
    library.renumber_game(5, 5).await.unwrap();
    assert!(library.game(5).is_some());
}

#[tokio::test]
async fn renumber_relocates_images() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("7.png"), b"png").unwrap();
    let store = Store::open_memory().await.unwrap();
    let (mut library, _) = library_over(store, Some(ImageDir::new(dir.path())));

    library.add_game(7, "Seven").await.unwrap();
    assert_eq!(library.game(7).unwrap().image(), Some(dir.path().join("7.png").as_path()));

    library.renumber_game(7, 42).await.unwrap();

    assert!(!dir.path().join("7.png").exists());
    assert!(dir.path().join("42.png").exists());
    assert_eq!(library.game(42).unwrap().image(), Some(dir.path().join("42.png").as_path()));
}

// ── Label and tab deletion ──────────────────────────────────────────────────

#[tokio::test]
async fn delete_label_removes_every_reference() {
    let (mut library, _) = memory_library().await;
    let doomed = library.create_label("Doomed").await.unwrap();
    let kept = library.create_label("Kept").await.unwrap();
    for id in [1, 2] {
        library.add_game(id, format!("Game {id}")).await.unwrap();
        library.add_label_to_game(id, doomed).unwrap();
    }
    library.add_label_to_game(2, kept).unwrap();
    library.add_filter(Filter::new(FilterMode::Label, FilterMatch::Label(doomed)));
    library.add_filter(Filter::new(FilterMode::Label, FilterMatch::Label(kept)));

    assert!(library.delete_label(doomed).await.unwrap());
    library.flush().await.unwrap();

    assert!(library.games().all(|g| !g.has_label(doomed)));
    assert_eq!(library.filters().len(), 1);
    assert!(library.label(doomed).is_none());
    assert_eq!(*library.label(kept).unwrap().position(), 0);
    assert_eq!(
        text_column(&library, "games", 1, "labels").await,
        Primitive::Text("[]".into())
    );
    assert_eq!(
        text_column(&library, "games", 2, "labels").await,
        Primitive::Text(format!("[{kept}]"))
    );

    assert!(!library.delete_label(doomed).await.unwrap());
}

#[tokio::test]
async fn delete_tab_clears_games_and_display() {
    let (mut library, _) = memory_library().await;
    let tab = library.create_tab("Playing").await.unwrap();
    library.add_game(1, "One").await.unwrap();
    library.set_game_tab(1, Some(tab)).unwrap();
    library.set_display_tab(Some(tab)).unwrap();
    library.add_filter(Filter::new(FilterMode::Choose, FilterMatch::Tab(tab)));

    assert!(library.delete_tab(tab).await.unwrap());
    library.flush().await.unwrap();

    assert_eq!(*library.game(1).unwrap().tab(), None);
    assert_eq!(library.display_tab(), None);
    assert!(library.filters().is_empty());
    assert_eq!(text_column(&library, "games", 1, "tab").await, Primitive::Null);
    assert!(!library.delete_tab(tab).await.unwrap());
}

#[tokio::test]
async fn delete_tab_compacts_positions() {
    let (mut library, _) = memory_library().await;
    let first = library.create_tab("First").await.unwrap();
    let second = library.create_tab("Second").await.unwrap();
    let third = library.create_tab("Third").await.unwrap();

    assert!(library.delete_tab(first).await.unwrap());
    library.flush().await.unwrap();

    assert_eq!(*library.tab(second).unwrap().position(), 0);
    assert_eq!(*library.tab(third).unwrap().position(), 1);
    assert_eq!(
        text_column(&library, "tabs", third, "position").await,
        Primitive::Integer(1)
    );
}

#[tokio::test]
async fn display_tab_is_saved_to_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    let (library, _) = memory_library().await;
    let mut library = library.with_settings_file(path.clone());
    let tab = library.create_tab("Playing").await.unwrap();

    library.set_display_tab(Some(tab)).unwrap();
    assert_eq!(Settings::load_from(&path).display_tab, Some(tab));

    assert!(library.delete_tab(tab).await.unwrap());
    assert_eq!(library.display_tab(), None);
    assert_eq!(Settings::load_from(&path).display_tab, None);
}

#[tokio::test]
async fn display_tab_restored_from_settings() {
    let store = Store::open_memory().await.unwrap();
    store
        .call(|conn| {
            conn.execute_batch("INSERT INTO tabs (id, name, position) VALUES (6, 'Queue', 0);")?;
            Ok(())
        })
        .await
        .unwrap();
    let settings = Settings {
        display_tab: Some(6),
        ..Settings::default()
    };
    let mut library = Library::with_store(store, settings, Collaborators::default());
    library.load_all().await.unwrap();
    assert_eq!(library.display_tab(), Some(6));

    let store = Store::open_memory().await.unwrap();
    let settings = Settings {
        display_tab: Some(6),
        ..Settings::default()
    };
    let mut library = Library::with_store(store, settings, Collaborators::default());
    library.load_all().await.unwrap();
    assert_eq!(library.display_tab(), None);
    assert_eq!(library.settings().display_tab, None);
}

// ── Label order ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn gapped_positions_survive_create_and_reload() {
    let store = Store::open_memory().await.unwrap();
    store
        .call(|conn| {
            conn.execute_batch(
                "INSERT INTO labels (id, name, position) VALUES (1, 'A', 0);
                 INSERT INTO labels (id, name, position) VALUES (2, 'B', 5);",
            )?;
            Ok(())
        })
        .await
        .unwrap();
    let (mut library, _) = library_over(store, None);
    library.load_all().await.unwrap();
    let created = library.create_label("C").await.unwrap();
    library.flush().await.unwrap();

    let names = |library: &Library| -> Vec<String> { library.labels().map(|l| l.name().clone()).collect() };
    assert_eq!(names(&library), vec!["A", "B", "C"]);
    assert_eq!(
        text_column(&library, "labels", 2, "position").await,
        Primitive::Integer(1)
    );
    assert_eq!(
        text_column(&library, "labels", created, "position").await,
        Primitive::Integer(2)
    );

    library.load_all().await.unwrap();
    assert_eq!(names(&library), vec!["A", "B", "C"]);
    let positions: Vec<i64> = library.labels().map(|l| *l.position()).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[tokio::test]
async fn move_label_reorders_games_and_storage() {
    let (mut library, stale) = memory_library().await;
    let x = library.create_label("X").await.unwrap();
    let y = library.create_label("Y").await.unwrap();
    let z = library.create_label("Z").await.unwrap();
    library.add_game(1, "One").await.unwrap();
    library.add_label_to_game(1, x).unwrap();
    library.add_label_to_game(1, z).unwrap();
    stale.take();

    assert!(library.move_label(z, 0).unwrap());
    assert!(stale.take());
    let order: Vec<_> = library.labels().map(|l| l.id()).collect();
    assert_eq!(order, vec![z, x, y]);
    assert_eq!(library.game(1).unwrap().labels(), &vec![z, x]);

    assert!(!library.move_label(z, 0).unwrap());
    assert!(matches!(
        library.move_label(99, 0),
        Err(LibraryError::UnknownLabel(99))
    ));

    library.load_all().await.unwrap();
    let order: Vec<_> = library.labels().map(|l| l.id()).collect();
    assert_eq!(order, vec![z, x, y]);
    assert_eq!(library.game(1).unwrap().labels(), &vec![z, x]);
}

#[tokio::test]
async fn move_tab_past_end_goes_last() {
    let (mut library, _) = memory_library().await;
    let first = library.create_tab("First").await.unwrap();
    let second = library.create_tab("Second").await.unwrap();

    assert!(library.move_tab(first, 10).unwrap());
    library.flush().await.unwrap();

    let order: Vec<_> = library.tabs().map(|t| t.id()).collect();
    assert_eq!(order, vec![second, first]);
    assert_eq!(
        text_column(&library, "tabs", first, "position").await,
        Primitive::Integer(1)
    );
}

#[tokio::test]
async fn unknown_references_are_rejected() {
    let (mut library, _) = memory_library().await;
    library.add_game(1, "One").await.unwrap();
    assert!(matches!(
        library.add_label_to_game(1, 77),
        Err(LibraryError::UnknownLabel(77))
    ));
    assert!(matches!(
        library.set_game_tab(1, Some(5)),
        Err(LibraryError::UnknownTab(5))
    ));
    assert!(matches!(
        library.add_label_to_game(9, 77),
        Err(LibraryError::UnknownLabel(77))
    ));
}

#[tokio::test]
async fn labels_on_game_follow_label_order() {
    let (mut library, _) = memory_library().await;
    let first = library.create_label("First").await.unwrap();
    let second = library.create_label("Second").await.unwrap();
    library.add_game(1, "One").await.unwrap();
    library.add_label_to_game(1, second).unwrap();
    library.add_label_to_game(1, first).unwrap();
    library.add_label_to_game(1, first).unwrap();

    assert_eq!(library.game(1).unwrap().labels(), &vec![first, second]);
}

// ── Loading ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_purges_orphaned_events() {
    let store = Store::open_memory().await.unwrap();
    store
        .call(|conn| {
            conn.execute_batch(
                "INSERT INTO games (id, name) VALUES (1, 'Kept');
                 INSERT INTO timeline_events (game_id, type) VALUES (1, 1);
                 INSERT INTO timeline_events (game_id, type) VALUES (5, 1);
                 INSERT INTO timeline_events (game_id, type) VALUES (5, 2);",
            )?;
            Ok(())
        })
        .await
        .unwrap();
    let (mut library, _) = library_over(store.clone(), None);

    let report = library.load_all().await.unwrap();
    assert_eq!(report.games, 1);
    assert_eq!(report.events, 1);
    assert_eq!(report.purged_game_ids, vec![5]);
    assert_eq!(report.purged_events, 2);
    assert!(store.orphaned_event_game_ids().await.unwrap().is_empty());

    let again = library.load_all().await.unwrap();
    assert!(again.purged_game_ids.is_empty());
    assert_eq!(again.purged_events, 0);
}

#[tokio::test]
async fn load_drops_dangling_references() {
    let store = Store::open_memory().await.unwrap();
    store
        .call(|conn| {
            conn.execute_batch(
                "INSERT INTO labels (id, name, position) VALUES (3, 'Second', 1);
                 INSERT INTO labels (id, name, position) VALUES (4, 'First', 0);
                 INSERT INTO games (id, labels, tab) VALUES (1, '[3, 99, 4]', 12);",
            )?;
            Ok(())
        })
        .await
        .unwrap();
    let (mut library, _) = library_over(store, None);

    let report = library.load_all().await.unwrap();
    assert_eq!(report.labels, 2);

    let names: Vec<_> = library.labels().map(|l| l.name().clone()).collect();
    assert_eq!(names, vec!["First", "Second"]);
    let game = library.game(1).unwrap();
    assert_eq!(game.labels(), &vec![4, 3]);
    assert_eq!(*game.tab(), None);
}

#[tokio::test]
async fn loaded_entities_write_through() {
    let store = Store::open_memory().await.unwrap();
    store.insert(&shelf_catalog::Game::new(4)).await.unwrap();
    let (mut library, _) = library_over(store, None);
    library.load_all().await.unwrap();

    library.game_mut(4).unwrap().set_rating(5);
    library.flush().await.unwrap();

    assert_eq!(
        text_column(&library, "games", 4, "rating").await,
        Primitive::Integer(5)
    );
}

#[tokio::test]
async fn delete_game_removes_events() {
    let (mut library, _) = memory_library().await;
    library.add_game(1, "One").await.unwrap();
    assert!(library.delete_game(1).await.unwrap());
    assert!(library.game(1).is_none());
    assert_eq!(library.store().count_rows("games").await.unwrap(), 0);
    assert_eq!(library.store().count_rows("timeline_events").await.unwrap(), 0);
    assert!(!library.delete_game(1).await.unwrap());
}

// ── Cookies and lifecycle ───────────────────────────────────────────────────

#[tokio::test]
async fn update_cookies_replaces_everything() {
    let (mut library, _) = memory_library().await;
    library
        .update_cookies(BTreeMap::from([
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]))
        .await
        .unwrap();
    let replacement = BTreeMap::from([("c".to_string(), "3".to_string())]);
    library.update_cookies(replacement.clone()).await.unwrap();

    assert_eq!(library.cookies(), &replacement);
    assert_eq!(library.store().read_cookies().await.unwrap(), replacement);
}

#[tokio::test]
async fn close_then_reopen_keeps_changes() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        database_path: dir.path().join("data").join("library.db"),
        images_path: dir.path().join("images"),
        ..Settings::default()
    };

    let mut library = Library::open(settings.clone()).await.unwrap();
    library.load_all().await.unwrap();
    library.add_game(10, "Ten").await.unwrap();
    library.game_mut(10).unwrap().set_developer("Studio".to_string());
    library.close().await.unwrap();

    let mut library = Library::open(settings).await.unwrap();
    let report = library.load_all().await.unwrap();
    assert_eq!(report.games, 1);
    assert_eq!(library.game(10).unwrap().developer(), "Studio");
    assert_eq!(library.timeline(10).len(), 1);
}
