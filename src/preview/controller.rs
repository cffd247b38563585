use std::{mem, time::Duration};

use super::{AudioBackend, AudioSource, PreviewItem, ViewId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewMode {
    Hover,
    Pinned,
}

/// The preview currently owned by the controller.
///
/// `audio` is `None` when loading or starting the preview failed: the session
/// is still active, it is just silent.
pub struct PreviewSession<S> {
    pub item_id: String,
    pub source: String,
    pub mode: PreviewMode,
    pub owner: ViewId,
    audio: Option<S>,
}

impl<S: AudioSource> PreviewSession<S> {
    pub fn is_looping(&self) -> bool {
        self.mode == PreviewMode::Pinned
    }

    pub fn is_audible(&self) -> bool {
        self.audio.as_ref().is_some_and(|a| a.is_playing())
    }

    pub fn audio(&self) -> Option<&S> {
        self.audio.as_ref()
    }

    fn stop(mut self) {
        if let Some(audio) = self.audio.as_mut() {
            audio.pause();
            audio.set_position(Duration::ZERO);
        }
    }
}

pub enum PreviewState<S> {
    Idle,
    Hovering(PreviewSession<S>),
    Pinned(PreviewSession<S>),
}

/// Mediates preview playback so that exactly one preview is ever audible.
///
/// Views never hold audio themselves; they report pointer and selection events
/// here. Starting a preview always stops the active one first, and the stop
/// completes before the new source is even requested.
///
/// Pinning is a toggle per `(view, item)`. While a view has an item pinned,
/// hovering in that same view is ignored; hovering in another view (a detail
/// view opened from the pinned item) takes over and stops the pinned preview.
pub struct PreviewController<B: AudioBackend> {
    backend: B,
    state: PreviewState<B::Source>,
}

impl<B: AudioBackend> PreviewController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: PreviewState::Idle,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> &PreviewState<B::Source> {
        &self.state
    }

    pub fn active(&self) -> Option<&PreviewSession<B::Source>> {
        match &self.state {
            PreviewState::Idle => None,
            PreviewState::Hovering(s) | PreviewState::Pinned(s) => Some(s),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, PreviewState::Idle)
    }

    /// Item pinned by `owner`, if any.
    pub fn pinned_by(&self, owner: ViewId) -> Option<&str> {
        match &self.state {
            PreviewState::Pinned(s) if s.owner == owner => Some(s.item_id.as_str()),
            _ => None,
        }
    }

    /// Pointer entered `item` in view `owner`.
    pub async fn hover(&mut self, owner: ViewId, item: &PreviewItem) {
        match &self.state {
            PreviewState::Pinned(s) if s.owner == owner => return,
            PreviewState::Hovering(s) if s.owner == owner && s.item_id == item.id => return,
            _ => {}
        }

        self.stop_active();

        let Some(source) = item.source.as_deref().filter(|s| !s.is_empty()) else {
            return;
        };
        let audio = self.start(source, false).await;
        self.state = PreviewState::Hovering(PreviewSession {
            item_id: item.id.clone(),
            source: source.to_string(),
            mode: PreviewMode::Hover,
            owner,
            audio,
        });
    }

    /// Pointer left `item`. Only a hover preview of that item is affected.
    pub fn leave(&mut self, item_id: &str) {
        if matches!(&self.state, PreviewState::Hovering(s) if s.item_id == item_id) {
            self.stop_active();
        }
    }

    /// Item clicked in view `owner`: pins it and loops its preview, or unpins
    /// it if it is already the pinned item. Returns whether `item` is pinned
    /// afterwards.
    pub async fn toggle_pin(&mut self, owner: ViewId, item: &PreviewItem) -> bool {
        let same_item = matches!(
            &self.state,
            PreviewState::Pinned(s) if s.owner == owner && s.item_id == item.id
        );

        self.stop_active();
        if same_item {
            return false;
        }

        let Some(source) = item.source.as_deref().filter(|s| !s.is_empty()) else {
            return false;
        };
        let audio = self.start(source, true).await;
        self.state = PreviewState::Pinned(PreviewSession {
            item_id: item.id.clone(),
            source: source.to_string(),
            mode: PreviewMode::Pinned,
            owner,
            audio,
        });
        true
    }

    /// Teardown of view `owner`: stops its session, leaves others alone.
    pub fn release(&mut self, owner: ViewId) {
        if self.active().is_some_and(|s| s.owner == owner) {
            self.stop_active();
        }
    }

    pub fn stop(&mut self) {
        self.stop_active();
    }

    fn stop_active(&mut self) {
        match mem::replace(&mut self.state, PreviewState::Idle) {
            PreviewState::Idle => {}
            PreviewState::Hovering(session) | PreviewState::Pinned(session) => session.stop(),
        }
    }

    async fn start(&self, source: &str, looping: bool) -> Option<B::Source> {
        let mut audio = match self.backend.load(source).await {
            Ok(audio) => audio,
            Err(e) => {
                tracing::warn!(source, error = %e, "failed to load preview");
                return None;
            }
        };

        audio.set_looping(looping);
        audio.set_position(Duration::ZERO);
        if let Err(e) = audio.play() {
            tracing::warn!(source, error = %e, "preview playback failed");
        }
        Some(audio)
    }
}

impl<B: AudioBackend> Drop for PreviewController<B> {
    fn drop(&mut self) {
        self.stop_active();
    }
}
