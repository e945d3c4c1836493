//! Reading session - Event loop between a front end and the coordinator
//!
//! A single task owns the [`PlaybackCoordinator`] and the
//! [`PlayerStateMachine`]. UI events arrive on an mpsc channel, device
//! notifications on the device's broadcast channel, and every visible change
//! is published as a [`SessionUpdate`].
//!
//! While a read is in flight the loop keeps consuming device notifications.
//! `Stop` and `Quit` cancel the read by dropping its future, which aborts the
//! HTTP request or kills the synthesizer process, and also discard any reads
//! queued behind it. Other events wait until the read has finished.

use std::collections::VecDeque;

use domain::{PlaybackRequest, ReportedState, SpeakerId, SpeechSettings};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::services::playback_coordinator::PlaybackCoordinator;
use crate::services::player_state_machine::{PlayerStateMachine, ToggleView};

/// Input from the front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Read the given text aloud
    Read(String),
    /// Stop playback
    Stop,
    /// Pause or resume
    Toggle,
    /// Activate another speaker
    ChangeSpeaker(SpeakerId),
    /// Set the rate ordinal
    ChangeRate(u8),
    /// Set the volume percentage
    ChangeVolume(u8),
    /// Select a voice
    ChangeVoice(String),
    /// Select a language
    ChangeLanguage(String),
    /// End the session
    Quit,
}

/// Output to the front end
#[derive(Debug)]
pub enum SessionUpdate {
    /// The pause/resume control changed
    ToggleChanged(ToggleView),
    /// A read was issued
    ReadStarted(PlaybackRequest),
    /// Another speaker is active
    SpeakerChanged {
        /// The new speaker
        speaker: SpeakerId,
        /// Settings after reconciliation
        settings: SpeechSettings,
    },
    /// Rate, volume, voice or language changed
    SettingsChanged(SpeechSettings),
    /// An event could not be handled
    Failed(ApplicationError),
    /// The session ended and the speaker was released
    Closed,
}

/// Handle to a spawned session
#[derive(Debug)]
pub struct SessionHandle {
    /// Send UI events here
    pub events: mpsc::Sender<UiEvent>,
    /// Receive updates here
    pub updates: mpsc::Receiver<SessionUpdate>,
    /// The session task
    pub task: JoinHandle<()>,
}

enum ReadOutcome {
    Finished(Result<PlaybackRequest, ApplicationError>),
    Cancelled,
    Quit,
}

/// The event loop
#[derive(Debug)]
pub struct ReadingSession {
    coordinator: PlaybackCoordinator,
    machine: PlayerStateMachine,
    events: mpsc::Receiver<UiEvent>,
    updates: mpsc::Sender<SessionUpdate>,
    notifications: broadcast::Receiver<ReportedState>,
    device_open: bool,
    deferred: VecDeque<UiEvent>,
}

impl ReadingSession {
    /// Create a session over an existing coordinator
    pub fn new(
        coordinator: PlaybackCoordinator,
        events: mpsc::Receiver<UiEvent>,
        updates: mpsc::Sender<SessionUpdate>,
    ) -> Self {
        let notifications = coordinator.subscribe();
        let mut machine = PlayerStateMachine::new();
        machine.sync(coordinator.player_state());
        Self {
            coordinator,
            machine,
            events,
            updates,
            notifications,
            device_open: true,
            deferred: VecDeque::new(),
        }
    }

    /// Spawn a session on the current runtime
    pub fn spawn(coordinator: PlaybackCoordinator, capacity: usize) -> SessionHandle {
        let (events_tx, events_rx) = mpsc::channel(capacity);
        let (updates_tx, updates_rx) = mpsc::channel(capacity);
        let session = Self::new(coordinator, events_rx, updates_tx);
        SessionHandle {
            events: events_tx,
            updates: updates_rx,
            task: tokio::spawn(session.run()),
        }
    }

    /// Run until `Quit` or until every event sender is dropped
    ///
    /// The coordinator is shut down before `Closed` is published.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        info!("Reading session started");
        self.publish(SessionUpdate::ToggleChanged(self.machine.view()))
            .await;

        loop {
            let event = match self.deferred.pop_front() {
                Some(event) => event,
                None => tokio::select! {
                    event = self.events.recv() => match event {
                        Some(event) => event,
                        None => break,
                    },
                    received = self.notifications.recv(), if self.device_open => {
                        self.forward_notification(received).await;
                        continue;
                    },
                },
            };

            if !self.handle(event).await {
                break;
            }
        }

        self.coordinator.shutdown();
        self.publish(SessionUpdate::Closed).await;
        info!("Reading session closed");
    }

    /// Handle one event; returns `false` when the session should end
    async fn handle(&mut self, event: UiEvent) -> bool {
        debug!(?event, "UI event");
        match event {
            UiEvent::Read(text) => return self.read(&text).await,
            UiEvent::Stop => self.coordinator.stop(),
            UiEvent::Toggle => {
                if let Err(e) = self.coordinator.toggle() {
                    self.publish(SessionUpdate::Failed(e)).await;
                }
            },
            UiEvent::ChangeSpeaker(id) => {
                let update = match self.coordinator.change_speaker(id) {
                    Ok(()) => SessionUpdate::SpeakerChanged {
                        speaker: id,
                        settings: self.coordinator.settings().clone(),
                    },
                    Err(e) => SessionUpdate::Failed(e),
                };
                self.publish(update).await;
            },
            UiEvent::ChangeRate(rate) => {
                let result = self.coordinator.set_rate(rate);
                self.publish_settings(result).await;
            },
            UiEvent::ChangeVolume(volume) => {
                let result = self.coordinator.set_volume(volume);
                self.publish_settings(result).await;
            },
            UiEvent::ChangeVoice(voice) => {
                let result = self.coordinator.set_voice(&voice);
                self.publish_settings(result).await;
            },
            UiEvent::ChangeLanguage(language) => {
                let result = self.coordinator.set_language(&language);
                self.publish_settings(result).await;
            },
            UiEvent::Quit => return false,
        }
        true
    }

    /// Run a read while still serving notifications and cancellations
    async fn read(&mut self, text: &str) -> bool {
        let Self {
            coordinator,
            machine,
            events,
            updates,
            notifications,
            device_open,
            deferred,
        } = &mut *self;

        let outcome = {
            let read = coordinator.read(text);
            tokio::pin!(read);

            loop {
                tokio::select! {
                    result = &mut read => break ReadOutcome::Finished(result),
                    event = events.recv() => match event {
                        Some(UiEvent::Stop) => {
                            discard_queued_reads(deferred);
                            break ReadOutcome::Cancelled;
                        },
                        Some(UiEvent::Quit) | None => {
                            discard_queued_reads(deferred);
                            break ReadOutcome::Quit;
                        },
                        Some(other) => {
                            debug!(?other, "Deferring event until read finishes");
                            deferred.push_back(other);
                        },
                    },
                    received = notifications.recv(), if *device_open => {
                        if let Some(update) = apply_notification(machine, device_open, received) {
                            if updates.send(update).await.is_err() {
                                debug!("Update receiver dropped");
                            }
                        }
                    },
                }
            }
        };

        match outcome {
            ReadOutcome::Finished(Ok(request)) => {
                self.publish(SessionUpdate::ReadStarted(request)).await;
                true
            },
            ReadOutcome::Finished(Err(e)) => {
                self.publish(SessionUpdate::Failed(e)).await;
                true
            },
            ReadOutcome::Cancelled => {
                info!("Read cancelled");
                self.coordinator.stop();
                true
            },
            ReadOutcome::Quit => {
                self.coordinator.stop();
                false
            },
        }
    }

    async fn forward_notification(
        &mut self,
        received: Result<ReportedState, broadcast::error::RecvError>,
    ) {
        if let Some(update) = apply_notification(&mut self.machine, &mut self.device_open, received)
        {
            self.publish(update).await;
        }
    }

    async fn publish_settings(&self, result: Result<(), ApplicationError>) {
        let update = match result {
            Ok(()) => SessionUpdate::SettingsChanged(self.coordinator.settings().clone()),
            Err(e) => SessionUpdate::Failed(e),
        };
        self.publish(update).await;
    }

    async fn publish(&self, update: SessionUpdate) {
        if self.updates.send(update).await.is_err() {
            debug!("Update receiver dropped");
        }
    }
}

/// Drop reads queued behind a cancelled one; a stop outranks them
fn discard_queued_reads(deferred: &mut VecDeque<UiEvent>) {
    let before = deferred.len();
    deferred.retain(|event| !matches!(event, UiEvent::Read(_)));
    let dropped = before - deferred.len();
    if dropped > 0 {
        debug!(dropped, "Discarded reads queued before stop");
    }
}

/// Feed one broadcast result into the state machine
fn apply_notification(
    machine: &mut PlayerStateMachine,
    device_open: &mut bool,
    received: Result<ReportedState, broadcast::error::RecvError>,
) -> Option<SessionUpdate> {
    match received {
        Ok(reported) => Some(match machine.on_notification(reported) {
            Ok(view) => SessionUpdate::ToggleChanged(view),
            Err(e) => SessionUpdate::Failed(e),
        }),
        Err(broadcast::error::RecvError::Lagged(missed)) => {
            warn!(missed, "Missed player notifications");
            None
        },
        Err(broadcast::error::RecvError::Closed) => {
            warn!("Playback device closed its notification channel");
            *device_open = false;
            None
        },
    }
}
