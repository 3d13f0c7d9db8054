//! Integration tests for the player
//!
//! These drive the player through a simulated media element, one signal at a
//! time, and verify the observable playback scenarios.

use encore_core::{
    PlayerPersistence, RepeatMode, ResourceHandle, ResourceReleaser, Track, TrackId,
};
use encore_playback::{
    LoadState, MediaSignal, NoticeLevel, PlaybackError, Player, PlayerConfig, PlayerEvent,
    SimulatedBackend,
};
use encore_storage::persistence::KEY_CURRENT_INDEX;
use encore_storage::{KeyValuePersistence, KeyValueStore, MemoryStore};
use std::cell::RefCell;
use std::rc::Rc;

// ===== Test Helpers =====

fn create_test_track(id: &str, title: &str, artist: &str) -> Track {
    let mut track = Track::new(
        title,
        artist,
        "Album",
        ResourceHandle::remote(format!("https://music.test/{}.mp3", id)),
    );
    track.id = TrackId::new(id);
    track
}

fn tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter()
        .map(|id| create_test_track(id, &format!("Song {}", id), "Artist"))
        .collect()
}

/// Player whose backend only becomes ready when told to
fn manual_player(ids: &[&str]) -> Player<SimulatedBackend> {
    let mut player = Player::new(SimulatedBackend::new(), PlayerConfig::default()).with_seed(11);
    player.add(tracks(ids));
    player.backend_mut().finish_loading();
    player.pump();
    player.drain_events();
    player
}

/// Player whose backend is ready as soon as a source is set
fn auto_player(ids: &[&str]) -> Player<SimulatedBackend> {
    let mut player =
        Player::new(SimulatedBackend::auto_ready(), PlayerConfig::default()).with_seed(11);
    player.add(tracks(ids));
    player.pump();
    player.drain_events();
    player
}

fn source_of(player: &Player<SimulatedBackend>, id: &str) -> ResourceHandle {
    player
        .tracks()
        .iter()
        .find(|t| t.id.as_str() == id)
        .map(|t| t.source.clone())
        .unwrap()
}

fn notices(events: &[PlayerEvent]) -> Vec<(NoticeLevel, String)> {
    events
        .iter()
        .filter_map(|e| match e {
            PlayerEvent::Notice { level, message } => Some((*level, message.clone())),
            _ => None,
        })
        .collect()
}

fn selected(player: &Player<SimulatedBackend>) -> Option<&str> {
    player.selected_id().map(TrackId::as_str)
}

#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> encore_storage::Result<Option<String>> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> encore_storage::Result<()> {
        self.0.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> encore_storage::Result<()> {
        self.0.borrow_mut().remove(key)
    }
}

#[derive(Clone, Default)]
struct RecordingReleaser(Rc<RefCell<Vec<String>>>);

impl ResourceReleaser for RecordingReleaser {
    fn release(&self, handle: &ResourceHandle) {
        self.0.borrow_mut().push(handle.uri().to_string());
    }
}

struct BrokenPersistence;

impl PlayerPersistence for BrokenPersistence {
    fn load(&mut self) -> encore_core::Result<encore_core::PersistedSettings> {
        Err(encore_core::EncoreError::storage("quota exceeded"))
    }
    fn save_playlist(&mut self, _: &[Track]) -> encore_core::Result<()> {
        Err(encore_core::EncoreError::storage("quota exceeded"))
    }
    fn save_current_index(&mut self, _: Option<usize>) -> encore_core::Result<()> {
        Err(encore_core::EncoreError::storage("quota exceeded"))
    }
    fn save_volume(&mut self, _: f32) -> encore_core::Result<()> {
        Err(encore_core::EncoreError::storage("quota exceeded"))
    }
    fn save_shuffle(&mut self, _: bool) -> encore_core::Result<()> {
        Err(encore_core::EncoreError::storage("quota exceeded"))
    }
    fn save_repeat(&mut self, _: RepeatMode) -> encore_core::Result<()> {
        Err(encore_core::EncoreError::storage("quota exceeded"))
    }
    fn save_theme(&mut self, _: encore_core::Theme) -> encore_core::Result<()> {
        Err(encore_core::EncoreError::storage("quota exceeded"))
    }
}

// ===== Load races and cancellation =====

#[test]
fn later_load_wins_when_ready_arrives_in_order() {
    let mut player = manual_player(&["a", "b", "c"]);

    player.load_track(0, true).unwrap();
    let first = player.session();
    player.load_track(1, true).unwrap();

    player.handle_signal(first, MediaSignal::ReadyToPlay);
    assert!(!player.is_playing());

    player.backend_mut().finish_loading();
    player.pump();

    assert!(player.is_playing());
    assert_eq!(player.backend().started(), &[source_of(&player, "b")]);
    assert_eq!(player.current_index(), Some(1));
}

#[test]
fn later_load_wins_when_ready_arrives_reversed() {
    let mut player = manual_player(&["a", "b", "c"]);

    player.load_track(0, true).unwrap();
    let first = player.session();
    player.load_track(1, true).unwrap();

    player.backend_mut().finish_loading();
    player.pump();
    player.handle_signal(first, MediaSignal::MetadataReady { duration: 99.0 });
    player.handle_signal(first, MediaSignal::ReadyToPlay);

    assert_eq!(player.backend().started(), &[source_of(&player, "b")]);
    assert_ne!(player.state().duration_seconds, Some(99.0));
}

#[test]
fn cancelled_load_never_plays() {
    let mut player = manual_player(&["a", "b"]);

    player.load_track(1, true).unwrap();
    let cancelled = player.session();
    assert!(player.cancel_loading());

    player.handle_signal(cancelled, MediaSignal::ReadyToPlay);

    assert!(!player.is_playing());
    assert!(player.backend().started().is_empty());
    assert_eq!(player.load_state(), &LoadState::Idle);
    assert_eq!(player.current_index(), Some(0));

    let events = player.drain_events();
    assert_eq!(
        notices(&events),
        vec![(NoticeLevel::Info, "Loading cancelled".to_string())]
    );
}

#[test]
fn play_after_cancel_reloads_selection() {
    let mut player = manual_player(&["a", "b"]);
    player.load_track(1, true).unwrap();
    player.cancel_loading();

    player.toggle_play_pause().unwrap();
    player.backend_mut().finish_loading();
    player.pump();

    assert!(player.is_playing());
    assert_eq!(player.backend().started(), &[source_of(&player, "a")]);
}

#[test]
fn cancel_of_first_load_keeps_the_track_selected() {
    let mut player = Player::new(SimulatedBackend::new(), PlayerConfig::default());
    player.add(tracks(&["a"]));

    assert!(player.cancel_loading());
    assert_eq!(selected(&player), Some("a"));
    assert_eq!(player.current_index(), Some(0));
}

#[test]
fn cancel_while_idle_is_noop() {
    let mut player = manual_player(&["a"]);
    let session = player.session();

    assert!(!player.cancel_loading());
    assert_eq!(player.session(), session);
    assert!(!player.has_pending_events());
}

#[test]
fn superseded_error_is_not_reported() {
    let mut player = manual_player(&["a", "b"]);
    player.load_track(0, true).unwrap();
    let first = player.session();
    player.load_track(1, true).unwrap();

    player.handle_signal(
        first,
        MediaSignal::Error {
            reason: "aborted".to_string(),
        },
    );

    assert!(notices(&player.drain_events()).is_empty());
    assert!(matches!(player.load_state(), LoadState::Loading(_)));
}

#[test]
fn late_teardown_error_after_cancel_is_silent() {
    let mut player = manual_player(&["a", "b"]);
    player.load_track(1, true).unwrap();
    assert!(player.cancel_loading());
    player.drain_events();

    player.handle_signal(
        player.session(),
        MediaSignal::Error {
            reason: "source cleared".to_string(),
        },
    );

    assert!(notices(&player.drain_events()).is_empty());
    assert_eq!(player.load_state(), &LoadState::Idle);
    assert_eq!(selected(&player), Some("a"));
}

#[test]
fn late_teardown_error_after_clear_is_silent() {
    let mut player = auto_player(&["a", "b"]);
    player.toggle_play_pause().unwrap();
    player.clear();
    player.drain_events();

    player.handle_signal(
        player.session(),
        MediaSignal::Error {
            reason: "source cleared".to_string(),
        },
    );

    assert!(notices(&player.drain_events()).is_empty());
    assert!(!player.is_playing());
}

#[test]
fn late_teardown_error_after_removing_only_track_is_silent() {
    let mut player = auto_player(&["a"]);
    player.remove(0).unwrap();
    player.drain_events();

    player.handle_signal(
        player.session(),
        MediaSignal::Error {
            reason: "source cleared".to_string(),
        },
    );

    assert!(notices(&player.drain_events()).is_empty());
}

#[test]
fn load_error_after_cancel_is_still_reported() {
    let mut player = manual_player(&["a", "b"]);
    player.load_track(1, true).unwrap();
    player.cancel_loading();
    player.load_track(1, true).unwrap();
    player.drain_events();

    player.handle_signal(
        player.session(),
        MediaSignal::Error {
            reason: "decode failed".to_string(),
        },
    );

    assert_eq!(
        notices(&player.drain_events()),
        vec![(NoticeLevel::Error, "Error playing audio file".to_string())]
    );
}

// ===== End of track =====

#[test]
fn repeat_all_wraps_to_first_track() {
    let mut player = auto_player(&["s1", "s2"]);
    let s2 = source_of(&player, "s2");
    player.backend_mut().set_duration(&s2, 10.0);
    player.set_repeat(RepeatMode::All);

    player.load_track(1, true).unwrap();
    player.pump();
    assert!(player.is_playing());

    player.backend_mut().advance(10.0);
    player.pump();
    player.pump();

    assert_eq!(player.current_index(), Some(0));
    assert!(player.is_playing());
    assert_eq!(player.backend().started().last(), Some(&source_of(&player, "s1")));
}

#[test]
fn last_track_without_repeat_stops_at_start() {
    let mut player = auto_player(&["s1"]);
    let s1 = source_of(&player, "s1");
    player.backend_mut().set_duration(&s1, 5.0);
    player.load_track(0, false).unwrap();
    player.pump();

    player.toggle_play_pause().unwrap();
    player.drain_events();
    player.backend_mut().advance(5.0);
    player.pump();

    assert!(!player.is_playing());
    assert_eq!(player.state().position_seconds, 0.0);
    assert_eq!(player.current_index(), Some(0));
    assert!(player
        .drain_events()
        .contains(&PlayerEvent::StateChanged { playing: false }));
}

#[test]
fn not_last_track_without_repeat_advances() {
    let mut player = auto_player(&["s1", "s2"]);
    let s1 = source_of(&player, "s1");
    player.backend_mut().set_duration(&s1, 5.0);
    player.load_track(0, true).unwrap();
    player.pump();

    player.backend_mut().advance(5.0);
    player.pump();
    player.pump();

    assert_eq!(player.current_index(), Some(1));
    assert!(player.is_playing());
}

#[test]
fn repeat_one_restarts_same_track() {
    let mut player = auto_player(&["s1", "s2"]);
    let s1 = source_of(&player, "s1");
    player.backend_mut().set_duration(&s1, 5.0);
    player.set_repeat(RepeatMode::One);
    player.toggle_play_pause().unwrap();

    player.backend_mut().advance(5.0);
    player.pump();

    assert!(player.is_playing());
    assert_eq!(player.current_index(), Some(0));
    assert_eq!(player.state().position_seconds, 0.0);
    assert_eq!(player.backend().started(), &[s1.clone(), s1]);
}

// ===== Navigation =====

#[test]
fn next_and_previous_wrap_around() {
    let mut player = auto_player(&["a", "b", "c"]);
    player.load_track(2, false).unwrap();

    player.next().unwrap();
    assert_eq!(player.current_index(), Some(0));

    player.previous().unwrap();
    assert_eq!(player.current_index(), Some(2));

    player.previous().unwrap();
    assert_eq!(player.current_index(), Some(1));
}

#[test]
fn previous_without_visible_selection_goes_to_last() {
    let mut player = auto_player(&["a", "b", "c"]);
    player.search("song b");
    assert_eq!(player.current_index(), None);

    player.previous().unwrap();
    assert_eq!(selected(&player), Some("b"));
    assert_eq!(player.current_index(), Some(0));
}

#[test]
fn shuffle_never_repeats_current() {
    let mut player = auto_player(&["a", "b", "c", "d", "e"]);
    player.set_shuffle(true);

    let mut previous = player.current_index();
    for _ in 0..50 {
        player.next().unwrap();
        let current = player.current_index();
        assert_ne!(current, previous);
        previous = current;
    }
}

#[test]
fn navigation_on_empty_playlist_warns() {
    let mut player = Player::new(SimulatedBackend::new(), PlayerConfig::default());

    assert_eq!(player.next(), Err(PlaybackError::EmptyPlaylist));
    assert_eq!(player.previous(), Err(PlaybackError::EmptyPlaylist));
    assert_eq!(
        notices(&player.drain_events()),
        vec![
            (
                NoticeLevel::Warning,
                "No songs in playlist. Add some music first!".to_string()
            );
            2
        ]
    );
}

// ===== Removal, search, clear =====

#[test]
fn removing_only_track_resets_everything() {
    let mut player = auto_player(&["s1"]);
    player.toggle_play_pause().unwrap();
    player.drain_events();

    let removed = player.remove(0).unwrap();
    assert_eq!(removed.id.as_str(), "s1");

    assert_eq!(player.current_index(), None);
    assert!(!player.is_playing());
    assert_eq!(player.state().loaded_resource, None);
    assert_eq!(player.store().visible_len(), 0);
    assert_eq!(player.load_state(), &LoadState::Idle);

    let events = player.drain_events();
    assert!(notices(&events)
        .iter()
        .all(|(level, _)| *level != NoticeLevel::Error));
}

#[test]
fn removing_playing_track_continues_with_successor() {
    let mut player = auto_player(&["a", "b", "c"]);
    player.load_track(1, true).unwrap();
    player.pump();

    player.remove(1);
    player.pump();

    assert_eq!(selected(&player), Some("c"));
    assert_eq!(player.current_index(), Some(1));
    assert!(player.is_playing());
}

#[test]
fn removing_last_selected_track_clamps_to_new_last() {
    let mut player = auto_player(&["a", "b", "c"]);
    player.load_track(2, false).unwrap();
    player.pump();

    player.remove(2);
    player.pump();

    assert_eq!(selected(&player), Some("b"));
    assert!(!player.is_playing());
}

#[test]
fn removing_earlier_track_keeps_selection() {
    let mut player = auto_player(&["a", "b", "c"]);
    player.load_track(2, false).unwrap();

    player.remove(0);

    assert_eq!(player.current_index(), Some(1));
    assert_eq!(selected(&player), Some("c"));
}

#[test]
fn remove_out_of_range_is_ignored() {
    let mut player = auto_player(&["a"]);
    assert!(player.remove(4).is_none());
    assert_eq!(player.tracks().len(), 1);
}

#[test]
fn search_hides_and_restores_selection() {
    let mut player = auto_player(&[]);
    player.add(vec![
        create_test_track("1", "Karma Police", "Radiohead"),
        create_test_track("2", "Teardrop", "Massive Attack"),
        create_test_track("3", "Airbag", "Radiohead"),
    ]);
    player.load_track(2, false).unwrap();

    player.search("RADIOHEAD");
    assert_eq!(player.current_index(), Some(1));

    player.search("massive");
    assert_eq!(player.current_index(), None);

    player.search("nothing matches this");
    assert_eq!(player.store().visible_len(), 0);
    assert_eq!(player.current_index(), None);

    player.search("");
    assert_eq!(player.current_index(), Some(2));
}

#[test]
fn clear_releases_transient_resources() {
    let released = RecordingReleaser::default();
    let mut player = Player::new(SimulatedBackend::auto_ready(), PlayerConfig::default())
        .with_releaser(Box::new(released.clone()));

    let upload = Track::new("Upload", "Unknown Artist", "Unknown Album", ResourceHandle::transient("encore/1"))
        .with_cover(ResourceHandle::transient("encore/2"));
    let second = Track::new("Second", "Unknown Artist", "Unknown Album", ResourceHandle::transient("encore/3"));
    player.add(vec![create_test_track("r", "Remote", "Artist"), upload, second]);
    player.pump();

    player.remove(1);
    assert_eq!(
        *released.0.borrow(),
        vec!["blob:encore/1".to_string(), "blob:encore/2".to_string()]
    );

    player.toggle_play_pause().unwrap();
    player.clear();

    assert_eq!(released.0.borrow().len(), 3);
    assert_eq!(released.0.borrow()[2], "blob:encore/3");
    assert!(player.tracks().is_empty());
    assert!(!player.is_playing());
    assert_eq!(player.selected_id(), None);
    assert!(notices(&player.drain_events())
        .contains(&(NoticeLevel::Success, "Playlist cleared".to_string())));
}

// ===== Transport controls =====

#[test]
fn pause_when_paused_changes_nothing() {
    let mut player = auto_player(&["a"]);
    let before = player.state().clone();

    assert!(!player.pause());
    assert_eq!(player.state(), &before);
    assert!(!player.has_pending_events());
    assert_eq!(player.backend().halt_count(), 0);
}

#[test]
fn scrubbing_suppresses_progress() {
    let mut player = auto_player(&["a"]);
    player.toggle_play_pause().unwrap();
    let session = player.session();
    player.drain_events();

    player.begin_scrub(0.5);
    assert_eq!(player.state().position_seconds, 90.0);
    player.drain_events();

    player.handle_signal(session, MediaSignal::TimeUpdate { position: 3.0 });
    assert!(!player.has_pending_events());
    assert_eq!(player.state().position_seconds, 90.0);

    player.scrub_to(2.0);
    assert_eq!(player.state().position_seconds, 180.0);

    player.end_scrub();
    player.drain_events();
    player.handle_signal(session, MediaSignal::TimeUpdate { position: 91.0 });
    assert_eq!(
        player.drain_events(),
        vec![PlayerEvent::Progress {
            position: 91.0,
            duration: Some(180.0)
        }]
    );
}

#[test]
fn seek_by_steps_and_clamps() {
    let mut player = auto_player(&["a"]);

    assert_eq!(player.skip_forward(), Some(10.0));
    assert_eq!(player.seek_by(500.0), Some(180.0));
    assert_eq!(player.skip_backward(), Some(170.0));
    assert_eq!(player.seek_by(-1000.0), Some(0.0));
}

#[test]
fn stale_time_updates_are_ignored() {
    let mut player = auto_player(&["a", "b"]);
    let old = player.session();
    player.load_track(1, false).unwrap();
    player.pump();
    player.drain_events();

    player.handle_signal(old, MediaSignal::TimeUpdate { position: 42.0 });
    assert_eq!(player.state().position_seconds, 0.0);
    assert!(!player.has_pending_events());
}

// ===== Persistence =====

#[test]
fn state_is_restored_from_persistence() {
    let store = SharedStore::default();

    let mut first = Player::new(SimulatedBackend::auto_ready(), PlayerConfig::default())
        .with_persistence(Box::new(KeyValuePersistence::new(store.clone())));
    first.add(tracks(&["a", "b", "c"]));
    first.load_track(1, false).unwrap();
    first.set_volume(0.3);
    first.set_shuffle(true);
    first.set_repeat(RepeatMode::All);

    let mut second = Player::new(SimulatedBackend::auto_ready(), PlayerConfig::default())
        .with_persistence(Box::new(KeyValuePersistence::new(store)));
    second.restore();
    second.pump();

    assert_eq!(second.tracks().len(), 3);
    assert_eq!(second.current_index(), Some(1));
    assert_eq!(second.volume().level(), 0.3);
    assert!(second.shuffle());
    assert_eq!(second.repeat(), RepeatMode::All);
    assert!(!second.is_playing());
}

#[test]
fn first_run_shows_welcome() {
    let mut player = Player::new(SimulatedBackend::auto_ready(), PlayerConfig::default())
        .with_persistence(Box::new(KeyValuePersistence::new(MemoryStore::new())));
    player.restore();

    assert!(notices(&player.drain_events()).contains(&(
        NoticeLevel::Success,
        "Welcome! Add your music files to get started.".to_string()
    )));
    assert_eq!(player.volume().level(), 0.7);
}

#[test]
fn out_of_range_saved_index_selects_first() {
    let store = SharedStore::default();
    {
        let mut persistence = KeyValuePersistence::new(store.clone());
        persistence.save_playlist(&tracks(&["a", "b"])).unwrap();
        persistence.save_current_index(Some(9)).unwrap();
    }

    let mut player = Player::new(SimulatedBackend::auto_ready(), PlayerConfig::default())
        .with_persistence(Box::new(KeyValuePersistence::new(store)));
    player.restore();

    assert_eq!(player.current_index(), Some(0));
}

#[test]
fn restored_selection_skips_transient_tracks() {
    let store = SharedStore::default();
    let upload = Track::new(
        "Upload",
        "Unknown Artist",
        "Unknown Album",
        ResourceHandle::transient("encore/1"),
    );

    let mut first = Player::new(SimulatedBackend::auto_ready(), PlayerConfig::default())
        .with_persistence(Box::new(KeyValuePersistence::new(store.clone())));
    let mut playlist = vec![upload];
    playlist.extend(tracks(&["a", "b"]));
    first.add(playlist);
    first.load_track(1, false).unwrap();
    assert_eq!(selected(&first), Some("a"));

    let mut second = Player::new(SimulatedBackend::auto_ready(), PlayerConfig::default())
        .with_persistence(Box::new(KeyValuePersistence::new(store)));
    second.restore();

    assert_eq!(second.tracks().len(), 2);
    assert_eq!(selected(&second), Some("a"));
}

#[test]
fn transient_selection_is_not_saved() {
    let store = SharedStore::default();
    let upload = Track::new(
        "Upload",
        "Unknown Artist",
        "Unknown Album",
        ResourceHandle::transient("encore/1"),
    );

    let mut player = Player::new(SimulatedBackend::auto_ready(), PlayerConfig::default())
        .with_persistence(Box::new(KeyValuePersistence::new(store.clone())));
    let mut playlist = tracks(&["a"]);
    playlist.push(upload);
    player.add(playlist);
    player.load_track(1, false).unwrap();

    assert_eq!(store.get(KEY_CURRENT_INDEX).unwrap(), None);
}

#[test]
fn persistence_failures_never_abort_playback() {
    let mut player = Player::new(SimulatedBackend::auto_ready(), PlayerConfig::default())
        .with_persistence(Box::new(BrokenPersistence));
    player.restore();
    player.add(tracks(&["a"]));
    player.pump();

    assert_eq!(player.set_volume(0.2), 0.2);
    player.toggle_play_pause().unwrap();
    assert!(player.is_playing());
}
