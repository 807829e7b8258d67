//! Event-driven controller tying location, queries, fetches and presentation state together.
//!
//! All state lives on the task that owns the [`Dashboard`]. Fetches and the
//! one-off location lookup run as spawned tasks and report back through an
//! internal channel; nothing else mutates the state.

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    display::TemperatureConversion,
    location::{LocationError, LocationResolver},
    model::{Coordinates, Target, TimeFormat, UnitSystem, WeatherRecord},
    provider::{FetchError, WeatherProvider},
    query::{LocationInput, build_query},
    state::{DashboardState, FetchTicket, PanelView},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardSettings {
    pub units: UnitSystem,
    pub time_format: TimeFormat,
    pub conversion: TemperatureConversion,
    pub search_debounce: Duration,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for DashboardSettings {
    fn from(config: &Config) -> Self {
        Self {
            units: config.units,
            time_format: config.time_format,
            conversion: config.temperature_conversion,
            search_debounce: config.search_debounce(),
        }
    }
}

/// Something the user did on the input surface.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    Search(String),
    SetUnits(UnitSystem),
    ToggleUnits,
    ToggleTimeFormat,
    Quit,
}

/// What a processed background message changed.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Applied(Target),
    Discarded(Target),
    Located(Option<Coordinates>),
}

#[derive(Debug)]
enum Message {
    Fetched {
        ticket: FetchTicket,
        /// `None` when the fetch was cancelled before it resolved.
        outcome: Option<Result<WeatherRecord, FetchError>>,
    },
    Located(Result<Coordinates, LocationError>),
}

enum Event {
    Action(UserAction),
    Background(Message),
}

#[derive(Debug)]
pub struct Dashboard {
    state: DashboardState,
    provider: Arc<dyn WeatherProvider>,
    api_key: String,
    search_debounce: Duration,
    search_cancel: Option<CancellationToken>,
    location_requested: bool,
    pending: usize,
    outbox: mpsc::UnboundedSender<Message>,
    inbox: mpsc::UnboundedReceiver<Message>,
}

impl Dashboard {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        api_key: impl Into<String>,
        settings: DashboardSettings,
    ) -> Self {
        let (outbox, inbox) = mpsc::unbounded_channel();

        Self {
            state: DashboardState::new(settings.units, settings.time_format, settings.conversion),
            provider,
            api_key: api_key.into(),
            search_debounce: settings.search_debounce,
            search_cancel: None,
            location_requested: false,
            pending: 0,
            outbox,
            inbox,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn panel(&self, target: Target) -> PanelView {
        self.state.panel(target)
    }

    /// Number of background tasks that have not reported back yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Start the single location lookup of this session. Returns false if it already ran.
    pub fn locate_once(&mut self, resolver: Arc<dyn LocationResolver>) -> bool {
        if self.location_requested {
            return false;
        }
        self.location_requested = true;
        self.pending += 1;

        let outbox = self.outbox.clone();
        tokio::spawn(async move {
            let result = resolver.locate().await;
            let _ = outbox.send(Message::Located(result));
        });

        true
    }

    pub fn set_search_term(&mut self, term: &str) {
        if self.state.search_term() == term {
            return;
        }

        if let Some(token) = self.search_cancel.take() {
            token.cancel();
        }

        let targets = self.state.set_search_term(term);
        self.dispatch(targets, self.search_debounce);
    }

    pub fn set_unit_system(&mut self, units: UnitSystem) {
        let targets = self.state.set_units(units);
        self.dispatch(targets, Duration::ZERO);
    }

    pub fn toggle_unit_system(&mut self) {
        self.set_unit_system(self.state.units().toggle());
    }

    pub fn toggle_time_format(&mut self) -> TimeFormat {
        self.state.toggle_time_format()
    }

    /// Returns false once the user asked to quit.
    pub fn apply_action(&mut self, action: UserAction) -> bool {
        match action {
            UserAction::Search(term) => self.set_search_term(&term),
            UserAction::SetUnits(units) => self.set_unit_system(units),
            UserAction::ToggleUnits => self.toggle_unit_system(),
            UserAction::ToggleTimeFormat => {
                self.toggle_time_format();
            }
            UserAction::Quit => return false,
        }
        true
    }

    /// Wait for the next background result and fold it into the state.
    ///
    /// Returns `None` when nothing is pending.
    pub async fn next_update(&mut self) -> Option<Update> {
        if self.pending == 0 {
            return None;
        }
        let message = self.inbox.recv().await?;
        Some(self.handle(message))
    }

    /// Process background results until nothing is pending.
    pub async fn settle(&mut self) {
        while self.next_update().await.is_some() {}
    }

    /// Drive the dashboard from a stream of user actions until `Quit` or the stream ends.
    ///
    /// `render` is called once up front and after every change.
    pub async fn run<F>(mut self, mut actions: mpsc::Receiver<UserAction>, mut render: F)
    where
        F: FnMut(&DashboardState),
    {
        render(&self.state);

        loop {
            let event = tokio::select! {
                action = actions.recv() => match action {
                    Some(action) => Event::Action(action),
                    None => break,
                },
                Some(message) = self.inbox.recv() => Event::Background(message),
            };

            match event {
                Event::Action(action) => {
                    if !self.apply_action(action) {
                        break;
                    }
                }
                Event::Background(message) => {
                    self.handle(message);
                }
            }

            render(&self.state);
        }

        if let Some(token) = self.search_cancel.take() {
            token.cancel();
        }
    }

    fn dispatch(&mut self, targets: Vec<Target>, search_delay: Duration) {
        for target in targets {
            match target {
                Target::CurrentLocation => self.spawn_fetch(target, Duration::ZERO),
                Target::SearchedLocation => self.spawn_fetch(target, search_delay),
            }
        }
    }

    fn spawn_fetch(&mut self, target: Target, delay: Duration) {
        let input = match target {
            Target::CurrentLocation => match self.state.coordinates() {
                Some(coords) => LocationInput::Coordinates(coords),
                None => return,
            },
            Target::SearchedLocation => {
                if !self.state.has_search() {
                    return;
                }
                LocationInput::Search(self.state.search_term().to_string())
            }
        };

        let params = build_query(&input, self.state.units(), &self.api_key);
        let ticket = self.state.begin_fetch(target);

        let token = match target {
            Target::CurrentLocation => None,
            Target::SearchedLocation => {
                if let Some(previous) = self.search_cancel.take() {
                    previous.cancel();
                }
                let token = CancellationToken::new();
                self.search_cancel = Some(token.clone());
                Some(token)
            }
        };

        tracing::debug!(slot = target.log_name(), seq = ticket.seq, "dispatching weather fetch");

        self.pending += 1;
        let provider = Arc::clone(&self.provider);
        let outbox = self.outbox.clone();

        tokio::spawn(async move {
            let fetch = async {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                provider.current(&params).await
            };

            let outcome = match token {
                Some(token) => tokio::select! {
                    _ = token.cancelled() => None,
                    result = fetch => Some(result),
                },
                None => Some(fetch.await),
            };

            let _ = outbox.send(Message::Fetched { ticket, outcome });
        });
    }

    fn handle(&mut self, message: Message) -> Update {
        self.pending = self.pending.saturating_sub(1);

        match message {
            Message::Located(Ok(coords)) => {
                let targets = self.state.set_coordinates(coords);
                self.dispatch(targets, Duration::ZERO);
                Update::Located(Some(coords))
            }
            Message::Located(Err(error)) => {
                tracing::warn!(%error, "location unavailable; current-location panel stays empty");
                Update::Located(None)
            }
            Message::Fetched { ticket, outcome: None } => {
                self.state.cancel(ticket);
                Update::Discarded(ticket.target)
            }
            Message::Fetched { ticket, outcome: Some(result) } => {
                if let Err(error) = &result {
                    tracing::warn!(slot = ticket.target.log_name(), %error, "weather fetch failed");
                }

                if self.state.apply(ticket, result) {
                    Update::Applied(ticket.target)
                } else {
                    Update::Discarded(ticket.target)
                }
            }
        }
    }
}
