use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use mixtape::preview::{
    AudioBackend, AudioSource, PlaybackError, PreviewController, PreviewItem, PreviewMode,
    PreviewState, ViewId,
};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Load(String),
    Loop(String, bool),
    Seek(String, Duration),
    Play(String),
    Pause(String),
}

#[derive(Default)]
struct Shared {
    log: Vec<Event>,
    playing: HashSet<String>,
    max_playing: usize,
}

#[derive(Clone, Default)]
struct FakeBackend {
    shared: Arc<Mutex<Shared>>,
    unplayable: HashSet<String>,
    unloadable: HashSet<String>,
}

impl FakeBackend {
    fn log(&self) -> Vec<Event> {
        self.shared.lock().unwrap().log.clone()
    }

    fn playing(&self) -> HashSet<String> {
        self.shared.lock().unwrap().playing.clone()
    }

    fn max_playing(&self) -> usize {
        self.shared.lock().unwrap().max_playing
    }

    fn position_of(&self, event: &Event) -> usize {
        self.log()
            .iter()
            .position(|e| e == event)
            .unwrap_or_else(|| panic!("{:?} not in log", event))
    }
}

struct FakeSource {
    uri: String,
    shared: Arc<Mutex<Shared>>,
    fail_play: bool,
    position: Duration,
}

impl FakeSource {
    fn record(&self, event: Event) {
        self.shared.lock().unwrap().log.push(event);
    }
}

impl AudioSource for FakeSource {
    fn play(&mut self) -> Result<(), PlaybackError> {
        self.record(Event::Play(self.uri.clone()));
        if self.fail_play {
            return Err(PlaybackError::Output("not allowed".to_string()));
        }
        let mut shared = self.shared.lock().unwrap();
        shared.playing.insert(self.uri.clone());
        shared.max_playing = shared.max_playing.max(shared.playing.len());
        Ok(())
    }

    fn pause(&mut self) {
        self.record(Event::Pause(self.uri.clone()));
        self.shared.lock().unwrap().playing.remove(&self.uri);
    }

    fn set_looping(&mut self, looping: bool) {
        self.record(Event::Loop(self.uri.clone(), looping));
    }

    fn set_position(&mut self, position: Duration) {
        self.record(Event::Seek(self.uri.clone(), position));
        self.position = position;
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn is_playing(&self) -> bool {
        self.shared.lock().unwrap().playing.contains(&self.uri)
    }
}

#[async_trait]
impl AudioBackend for FakeBackend {
    type Source = FakeSource;

    async fn load(&self, uri: &str) -> Result<FakeSource, PlaybackError> {
        self.shared
            .lock()
            .unwrap()
            .log
            .push(Event::Load(uri.to_string()));
        if self.unloadable.contains(uri) {
            return Err(PlaybackError::Decode("bad data".to_string()));
        }
        Ok(FakeSource {
            uri: uri.to_string(),
            shared: Arc::clone(&self.shared),
            fail_play: self.unplayable.contains(uri),
            // Sources start mid-clip to prove the controller rewinds them
            position: Duration::from_secs(7),
        })
    }
}

fn item(id: &str) -> PreviewItem {
    PreviewItem {
        id: id.to_string(),
        title: id.to_uppercase(),
        source: Some(format!("https://p.example.com/{id}.mp3")),
    }
}

fn uri(id: &str) -> String {
    format!("https://p.example.com/{id}.mp3")
}

fn silent_item(id: &str) -> PreviewItem {
    PreviewItem {
        id: id.to_string(),
        title: id.to_string(),
        source: None,
    }
}

fn controller() -> (PreviewController<FakeBackend>, FakeBackend) {
    let backend = FakeBackend::default();
    (PreviewController::new(backend.clone()), backend)
}

#[tokio::test]
async fn test_hover_switch_stops_previous_before_next_starts() {
    let (mut previews, backend) = controller();
    let view = ViewId::next();

    previews.hover(view, &item("a")).await;
    assert_eq!(backend.playing(), HashSet::from([uri("a")]));

    // Straight from A to B without leaving A
    previews.hover(view, &item("b")).await;

    let paused_a = backend.position_of(&Event::Pause(uri("a")));
    let loaded_b = backend.position_of(&Event::Load(uri("b")));
    let played_b = backend.position_of(&Event::Play(uri("b")));
    assert!(paused_a < loaded_b);
    assert!(loaded_b < played_b);

    assert_eq!(backend.playing(), HashSet::from([uri("b")]));
    assert_eq!(backend.max_playing(), 1);
    assert!(matches!(previews.state(), PreviewState::Hovering(s) if s.item_id == "b"));
}

#[tokio::test]
async fn test_hover_does_not_loop_and_leave_stops() {
    let (mut previews, backend) = controller();
    let view = ViewId::next();

    previews.hover(view, &item("a")).await;
    let session = previews.active().unwrap();
    assert_eq!(session.mode, PreviewMode::Hover);
    assert!(!session.is_looping());
    assert!(backend.log().contains(&Event::Loop(uri("a"), false)));

    // Leaving some other item changes nothing
    previews.leave("b");
    assert!(!previews.is_idle());

    previews.leave("a");
    assert!(previews.is_idle());
    assert!(backend.playing().is_empty());
    assert_eq!(backend.log().last(), Some(&Event::Seek(uri("a"), Duration::ZERO)));
}

#[tokio::test]
async fn test_pin_loops_from_start_and_second_click_toggles_off() {
    let (mut previews, backend) = controller();
    let view = ViewId::next();

    assert!(previews.toggle_pin(view, &item("a")).await);

    let session = previews.active().unwrap();
    assert_eq!(session.mode, PreviewMode::Pinned);
    assert!(session.is_looping());
    assert!(session.is_audible());
    assert_eq!(session.audio().unwrap().position(), Duration::ZERO);
    assert_eq!(previews.pinned_by(view), Some("a"));

    let looped = backend.position_of(&Event::Loop(uri("a"), true));
    let rewound = backend.position_of(&Event::Seek(uri("a"), Duration::ZERO));
    let played = backend.position_of(&Event::Play(uri("a")));
    assert!(looped < played);
    assert!(rewound < played);

    // Same item again
    assert!(!previews.toggle_pin(view, &item("a")).await);
    assert!(previews.is_idle());
    assert!(backend.playing().is_empty());

    let log = backend.log();
    assert_eq!(
        &log[log.len() - 2..],
        &[
            Event::Pause(uri("a")),
            Event::Seek(uri("a"), Duration::ZERO)
        ]
    );
}

#[tokio::test]
async fn test_pin_switch_resets_previous() {
    let (mut previews, backend) = controller();
    let view = ViewId::next();

    previews.toggle_pin(view, &item("a")).await;
    assert!(previews.toggle_pin(view, &item("b")).await);

    let paused_a = backend.position_of(&Event::Pause(uri("a")));
    let played_b = backend.position_of(&Event::Play(uri("b")));
    assert!(paused_a < played_b);
    assert_eq!(
        backend.log()[paused_a + 1],
        Event::Seek(uri("a"), Duration::ZERO)
    );

    assert_eq!(previews.pinned_by(view), Some("b"));
    assert_eq!(backend.max_playing(), 1);
}

#[tokio::test]
async fn test_pin_after_hover_of_same_item() {
    let (mut previews, backend) = controller();
    let view = ViewId::next();

    previews.hover(view, &item("a")).await;
    assert!(previews.toggle_pin(view, &item("a")).await);

    assert!(matches!(previews.state(), PreviewState::Pinned(s) if s.item_id == "a"));
    assert_eq!(backend.playing(), HashSet::from([uri("a")]));
    assert_eq!(backend.max_playing(), 1);
}

#[tokio::test]
async fn test_hover_in_pinning_view_is_ignored() {
    let (mut previews, backend) = controller();
    let view = ViewId::next();

    previews.toggle_pin(view, &item("a")).await;
    previews.hover(view, &item("b")).await;
    previews.leave("a");

    assert_eq!(previews.pinned_by(view), Some("a"));
    assert!(!backend.log().contains(&Event::Load(uri("b"))));
    assert_eq!(backend.playing(), HashSet::from([uri("a")]));
}

#[tokio::test]
async fn test_hover_in_child_view_takes_over_pinned_preview() {
    let (mut previews, backend) = controller();
    let parent = ViewId::next();
    let child = ViewId::next();

    previews.toggle_pin(parent, &item("album")).await;
    previews.hover(child, &item("track")).await;

    assert!(backend.position_of(&Event::Pause(uri("album"))) < backend.position_of(&Event::Play(uri("track"))));
    assert_eq!(previews.pinned_by(parent), None);
    assert_eq!(previews.active().map(|s| s.owner), Some(child));
    assert_eq!(backend.playing(), HashSet::from([uri("track")]));
}

#[tokio::test]
async fn test_release_only_stops_own_session() {
    let (mut previews, backend) = controller();
    let parent = ViewId::next();
    let child = ViewId::next();

    previews.hover(child, &item("a")).await;
    previews.release(parent);
    assert!(!previews.is_idle());

    previews.release(child);
    assert!(previews.is_idle());
    assert!(backend.playing().is_empty());
}

#[tokio::test]
async fn test_drop_stops_active_session() {
    let (mut previews, backend) = controller();
    previews.toggle_pin(ViewId::next(), &item("a")).await;
    assert!(!backend.playing().is_empty());

    drop(previews);
    assert!(backend.playing().is_empty());
}

#[tokio::test]
async fn test_items_without_preview_are_not_played() {
    let (mut previews, backend) = controller();
    let view = ViewId::next();

    previews.hover(view, &silent_item("playlist")).await;
    assert!(previews.is_idle());

    assert!(!previews.toggle_pin(view, &silent_item("artist")).await);
    assert!(previews.is_idle());
    assert!(backend.log().is_empty());
}

#[tokio::test]
async fn test_play_failure_keeps_session_active() {
    let mut backend = FakeBackend::default();
    backend.unplayable.insert(uri("a"));
    let mut previews = PreviewController::new(backend.clone());
    let view = ViewId::next();

    assert!(previews.toggle_pin(view, &item("a")).await);

    let session = previews.active().unwrap();
    assert!(!session.is_audible());
    assert_eq!(previews.pinned_by(view), Some("a"));

    // No retry
    let plays = backend
        .log()
        .iter()
        .filter(|e| **e == Event::Play(uri("a")))
        .count();
    assert_eq!(plays, 1);

    // Still toggles off normally
    assert!(!previews.toggle_pin(view, &item("a")).await);
    assert!(previews.is_idle());
}

#[tokio::test]
async fn test_load_failure_keeps_session_active() {
    let mut backend = FakeBackend::default();
    backend.unloadable.insert(uri("a"));
    let mut previews = PreviewController::new(backend.clone());
    let view = ViewId::next();

    previews.hover(view, &item("a")).await;

    let session = previews.active().unwrap();
    assert_eq!(session.item_id, "a");
    assert!(session.audio().is_none());
    assert!(!session.is_audible());

    previews.hover(view, &item("b")).await;
    assert_eq!(backend.playing(), HashSet::from([uri("b")]));
}

#[tokio::test]
async fn test_at_most_one_preview_audible_across_event_sequences() {
    let (mut previews, backend) = controller();
    let views = [ViewId::next(), ViewId::next(), ViewId::next()];
    let items: Vec<PreviewItem> = ["a", "b", "c", "d"].iter().map(|id| item(id)).collect();

    // Small LCG so the sequence is reproducible
    let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = move |n: u64| {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((seed >> 33) % n) as usize
    };

    for _ in 0..500 {
        let view = views[next(views.len() as u64)];
        let target = &items[next(items.len() as u64)];
        match next(6) {
            0 | 1 => previews.hover(view, target).await,
            2 => previews.leave(&target.id),
            3 | 4 => {
                previews.toggle_pin(view, target).await;
            }
            _ => previews.release(view),
        }

        assert!(backend.playing().len() <= 1);
        let audible = previews.active().is_some_and(|s| s.is_audible());
        assert_eq!(audible, backend.playing().len() == 1);
    }

    assert_eq!(backend.max_playing(), 1);
}
