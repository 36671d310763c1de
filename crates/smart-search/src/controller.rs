//! Component controller: the single entry point for external events
//!
//! Wraps the [`Store`] and executes the effects it returns. Timer and
//! placement completions come back as actions through an internal channel;
//! the embedder drives them with [`SearchController::recv`] (from its own
//! event loop) or [`SearchController::run_for`].

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::sync::{mpsc, watch};

use crate::{
    actions::Action,
    config::SearchConfig,
    debounce::Debouncer,
    effect::{Effect, Notification},
    navigation::{Key, NavCommand},
    placement::{FlipShiftEngine, PlacementEngine, Rect, Size},
    record::Record,
    state::{SearchState, Snapshot},
    store::Store,
};

pub struct SearchController {
    store: Store,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    notification_tx: mpsc::UnboundedSender<Notification>,
    snapshot_tx: watch::Sender<Snapshot>,
    debounce: Debouncer,
    blur_close: Debouncer,
    engine: Arc<dyn PlacementEngine>,
    torn_down: bool,
}

impl SearchController {
    /// Create a controller using the built-in [`FlipShiftEngine`]
    ///
    /// Returns the receiving end of the notification channel.
    pub fn new(
        config: SearchConfig,
        collection: Vec<Record>,
    ) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        Self::with_engine(config, collection, Arc::new(FlipShiftEngine))
    }

    pub fn with_engine(
        config: SearchConfig,
        collection: Vec<Record>,
        engine: Arc<dyn PlacementEngine>,
    ) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let state = SearchState::new(config, collection);
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (notification_tx, notification_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(state.snapshot());

        let controller = Self {
            store: Store::new(state),
            action_tx,
            action_rx,
            notification_tx,
            snapshot_tx,
            debounce: Debouncer::new("debounce"),
            blur_close: Debouncer::new("blur-close"),
            engine,
            torn_down: false,
        };
        (controller, notification_rx)
    }

    pub fn state(&self) -> &SearchState {
        self.store.state()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.state().snapshot()
    }

    /// Receive a fresh snapshot after every transition
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Run an action through the reducer and execute its effects
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, action: Action) {
        if self.torn_down {
            debug!("Dropping {:?}: controller torn down", action);
            return;
        }

        let effects = self.store.dispatch(&action);
        for effect in effects {
            self.execute_effect(effect);
        }
        self.snapshot_tx.send_replace(self.store.state().snapshot());
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleDebounce { generation, delay } => {
                let tx = self.action_tx.clone();
                self.debounce.schedule(delay, move || {
                    let _ = tx.send(Action::DebounceElapsed(generation));
                });
            }

            Effect::CancelDebounce => {
                self.debounce.cancel();
            }

            Effect::ScheduleBlurClose { generation, delay } => {
                let tx = self.action_tx.clone();
                self.blur_close.schedule(delay, move || {
                    let _ = tx.send(Action::BlurGraceElapsed(generation));
                });
            }

            Effect::CancelBlurClose => {
                self.blur_close.cancel();
            }

            Effect::Reposition(request) => {
                // Fire-and-forget: the result comes back as an action
                let engine = self.engine.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let result = engine.compute_placement(
                        request.anchor,
                        request.overlay,
                        request.viewport,
                        &request.options,
                    );
                    let _ = tx.send(Action::PlacementResolved {
                        generation: request.generation,
                        result,
                    });
                });
            }

            Effect::Notify(notification) => {
                debug!("Notify {:?}", notification);
                let _ = self.notification_tx.send(notification);
            }
        }
    }

    /// Wait for the next deferred action (timer or placement completion)
    pub async fn recv(&mut self) -> Option<Action> {
        self.action_rx.recv().await
    }

    /// Dispatch every deferred action that is already queued
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(action) = self.action_rx.try_recv() {
            self.dispatch(action);
            processed += 1;
        }
        processed
    }

    /// Process deferred actions as they arrive for `duration`
    pub async fn run_for(&mut self, duration: Duration) {
        let deadline = tokio::time::Instant::now() + duration;
        loop {
            tokio::select! {
                biased;
                Some(action) = self.action_rx.recv() => self.dispatch(action),
                _ = tokio::time::sleep_until(deadline) => break,
            }
        }
        tokio::task::yield_now().await;
        self.process_pending();
    }

    /// Cancel pending timers; nothing fires or dispatches afterwards
    pub fn teardown(&mut self) {
        let debounce = self.debounce.cancel();
        let blur = self.blur_close.cancel();
        while self.action_rx.try_recv().is_ok() {}
        self.torn_down = true;
        debug!(
            "Controller torn down (pending debounce: {}, pending blur close: {})",
            debounce, blur
        );
    }

    pub fn mount(&mut self, anchor: Rect, overlay: Size, viewport: Rect) {
        self.dispatch(Action::Mount {
            anchor,
            overlay,
            viewport,
        });
    }

    pub fn on_input(&mut self, text: impl Into<String>) {
        self.dispatch(Action::Input(text.into()));
    }

    pub fn on_focus(&mut self) {
        self.dispatch(Action::Focus);
    }

    pub fn on_blur(&mut self) {
        self.dispatch(Action::Blur);
    }

    pub fn on_clear(&mut self) {
        self.dispatch(Action::Clear);
    }

    pub fn on_collection_replaced(&mut self, collection: Vec<Record>) {
        self.dispatch(Action::ReplaceCollection(collection));
    }

    pub fn on_result_pointer_down(&mut self) {
        self.dispatch(Action::ResultPointerDown);
    }

    pub fn on_result_pointer_cancel(&mut self) {
        self.dispatch(Action::ResultPointerCancel);
    }

    pub fn on_result_activate(&mut self, record: Record) {
        self.dispatch(Action::ResultActivate(record));
    }

    /// Handle a key press; returns true if the dropdown consumed it
    pub fn on_key(&mut self, key: Key) -> bool {
        let state = self.store.state();
        let consumed =
            !state.config.disabled && state.visible() && NavCommand::from_key(key).is_some();
        self.dispatch(Action::KeyPress(key));
        consumed
    }

    pub fn on_resize(&mut self, viewport: Rect, anchor: Rect) {
        self.dispatch(Action::Resize { viewport, anchor });
    }

    pub fn on_scroll(&mut self, anchor: Rect) {
        self.dispatch(Action::Scroll { anchor });
    }

    pub fn on_overlay_resized(&mut self, overlay: Size) {
        self.dispatch(Action::OverlayResized(overlay));
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.dispatch(Action::SetLoading(loading));
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.dispatch(Action::SetDisabled(disabled));
    }
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("query", &self.store.state().query)
            .field("results", &self.store.state().results.len())
            .field("engine", &self.engine)
            .field("torn_down", &self.torn_down)
            .finish()
    }
}
