//! Sidebar controller: owns a [`SidebarState`] and performs its effects
//!
//! Asynchronous work (registry fetches, the copy feedback timer) runs on
//! spawned tokio tasks that report back through an event channel. Nothing but
//! [`Sidebar::dispatch`] mutates the state, and it always goes through
//! [`reduce`], which drops results of superseded fetches.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::config::COPY_FEEDBACK_MS;
use crate::preferences::{PreferenceStore, Preferences};
use crate::sidebar::clipboard::Clipboard;
use crate::sidebar::state::{Effect, SidebarEvent, SidebarState, reduce};
use crate::sidebar::view::SidebarView;
use crate::version::registry::Registry;

pub struct Sidebar {
    state: SidebarState,
    preferences: PreferenceStore,
    registry: Arc<dyn Registry>,
    clipboard: Arc<dyn Clipboard>,
    events_tx: mpsc::UnboundedSender<SidebarEvent>,
    events_rx: mpsc::UnboundedReceiver<SidebarEvent>,
    copy_feedback: Duration,
}

impl Sidebar {
    pub fn new(
        registry: Arc<dyn Registry>,
        preferences: PreferenceStore,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut state = SidebarState::new("", Preferences::default());
        state.mounted = false;

        Self {
            state,
            preferences,
            registry,
            clipboard,
            events_tx,
            events_rx,
            copy_feedback: Duration::from_millis(COPY_FEEDBACK_MS),
        }
    }

    /// Overrides how long the "copied" feedback stays on
    pub fn with_copy_feedback(mut self, copy_feedback: Duration) -> Self {
        self.copy_feedback = copy_feedback;
        self
    }

    pub fn state(&self) -> &SidebarState {
        &self.state
    }

    pub fn view(&self) -> SidebarView {
        SidebarView::from_state(&self.state)
    }

    /// Mounts the sidebar for `package_name` and starts fetching its versions.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(&mut self, package_name: &str) {
        info!("Mounting sidebar for {}", package_name);
        let preferences = self.preferences.load();
        self.dispatch(SidebarEvent::Mounted {
            package_name: package_name.to_string(),
            preferences,
        });
    }

    /// Switches to another package; the previous fetch result is discarded.
    pub fn change_package(&mut self, package_name: &str) {
        info!("Switching sidebar to {}", package_name);
        let preferences = self.preferences.load();
        self.dispatch(SidebarEvent::PackageChanged {
            package_name: package_name.to_string(),
            preferences,
        });
    }

    pub fn unmount(&mut self) {
        info!("Unmounting sidebar for {}", self.state.package_name);
        self.dispatch(SidebarEvent::Unmounted);
    }

    /// Applies an event and runs the effects it produces.
    pub fn dispatch(&mut self, event: SidebarEvent) {
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            self.log_event(&event);

            let state = std::mem::replace(
                &mut self.state,
                SidebarState::new("", Preferences::default()),
            );
            let (state, effects) = reduce(state, event);
            self.state = state;

            for effect in effects {
                if let Some(follow_up) = self.run_effect(effect) {
                    queue.push_back(follow_up);
                }
            }
        }
    }

    /// Waits for the next asynchronous event and applies it.
    ///
    /// Returns `false` if no further events can arrive.
    pub async fn next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Applies events that have already arrived without waiting.
    pub fn process_pending(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.dispatch(event);
        }
    }

    /// Waits until the current fetch has finished.
    pub async fn settle(&mut self) {
        while self.state.is_loading() {
            if !self.next_event().await {
                break;
            }
        }
    }

    fn log_event(&self, event: &SidebarEvent) {
        match event {
            SidebarEvent::FetchFailed { generation, error }
                if self.state.accepts_fetch_result(*generation) =>
            {
                error!(
                    "Failed to fetch versions from registry for {}: {}",
                    self.state.package_name, error
                );
            }
            SidebarEvent::FetchSucceeded {
                generation,
                versions,
            } if self.state.accepts_fetch_result(*generation) => {
                info!(
                    "Loaded {} versions for {}",
                    versions.versions.len(),
                    self.state.package_name
                );
            }
            SidebarEvent::FetchSucceeded { generation, .. }
            | SidebarEvent::FetchFailed { generation, .. } => {
                debug!("Discarding stale fetch result (generation {})", generation);
            }
            SidebarEvent::CopyFailed(e) => error!("Failed to copy command: {}", e),
            _ => {}
        }
    }

    /// Runs an effect; synchronous effects may yield a follow-up event.
    fn run_effect(&self, effect: Effect) -> Option<SidebarEvent> {
        match effect {
            Effect::FetchVersions {
                package_name,
                generation,
            } => {
                self.spawn_fetch(package_name, generation);
                None
            }
            Effect::PersistPackageManager(package_manager) => {
                self.preferences.set_package_manager(package_manager);
                None
            }
            Effect::PersistShowBeta(show_beta) => {
                self.preferences.set_show_beta(show_beta);
                None
            }
            Effect::PersistMaxVersions(max_versions) => {
                self.preferences.set_max_versions(max_versions);
                None
            }
            Effect::CopyToClipboard(text) => Some(match self.clipboard.write_text(&text) {
                Ok(()) => SidebarEvent::CopySucceeded,
                Err(e) => SidebarEvent::CopyFailed(e.to_string()),
            }),
            Effect::ScheduleCopyReset => {
                let events_tx = self.events_tx.clone();
                let delay = self.copy_feedback;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = events_tx.send(SidebarEvent::CopyFeedbackExpired);
                });
                None
            }
        }
    }

    fn spawn_fetch(&self, package_name: String, generation: u64) {
        debug!(
            "Fetching versions for {} (generation {})",
            package_name, generation
        );

        let registry = Arc::clone(&self.registry);
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = match registry.fetch_all_versions(&package_name).await {
                Ok(versions) => SidebarEvent::FetchSucceeded {
                    generation,
                    versions,
                },
                Err(e) => SidebarEvent::FetchFailed {
                    generation,
                    error: e.to_string(),
                },
            };
            // The receiver is gone once the sidebar is dropped.
            let _ = events_tx.send(event);
        });
    }
}
