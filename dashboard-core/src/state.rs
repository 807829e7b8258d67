//! Presentation state: toggles, the two weather slots, and the panel views derived from them.
//!
//! Every fetch is issued a [`FetchTicket`] with a per-slot sequence number. A
//! result is only applied when its sequence number is newer than the last one
//! applied to that slot, so a slow older response can never overwrite a newer one.

use crate::{
    display::{self, TemperatureConversion},
    icon::ConditionKind,
    model::{Coordinates, Target, TimeFormat, UnitSystem, WeatherRecord},
    provider::FetchError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub target: Target,
    pub seq: u64,
}

/// Lifecycle of one weather slot. The last good record survives loading and failure.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SlotState {
    #[default]
    Idle,
    Loading {
        previous: Option<WeatherRecord>,
    },
    Loaded(WeatherRecord),
    Failed {
        error: FetchError,
        previous: Option<WeatherRecord>,
    },
}

impl SlotState {
    pub fn record(&self) -> Option<&WeatherRecord> {
        match self {
            SlotState::Idle => None,
            SlotState::Loaded(record) => Some(record),
            SlotState::Loading { previous } | SlotState::Failed { previous, .. } => {
                previous.as_ref()
            }
        }
    }

    fn take_record(&mut self) -> Option<WeatherRecord> {
        match std::mem::take(self) {
            SlotState::Idle => None,
            SlotState::Loaded(record) => Some(record),
            SlotState::Loading { previous } | SlotState::Failed { previous, .. } => previous,
        }
    }
}

#[derive(Debug, Default)]
pub struct Slot {
    state: SlotState,
    issued: u64,
    applied: u64,
    /// Last resolved state; restored if the newest in-flight fetch is cancelled.
    settled: SlotState,
}

impl Slot {
    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn in_flight(&self) -> bool {
        matches!(self.state, SlotState::Loading { .. })
    }

    fn begin(&mut self, target: Target) -> FetchTicket {
        self.issued += 1;
        let previous = self.state.take_record();
        self.state = SlotState::Loading { previous };
        FetchTicket { target, seq: self.issued }
    }

    fn apply(&mut self, ticket: FetchTicket, result: Result<WeatherRecord, FetchError>) -> bool {
        if ticket.seq <= self.applied {
            return false;
        }
        self.applied = ticket.seq;

        let previous = self.state.take_record();
        self.settled = match result {
            Ok(record) => SlotState::Loaded(record),
            Err(error) => SlotState::Failed { error, previous },
        };

        // Older tickets still in flight will be discarded, so only a newer
        // outstanding one keeps the slot in Loading.
        self.state = if self.issued > self.applied {
            SlotState::Loading { previous: self.settled.record().cloned() }
        } else {
            self.settled.clone()
        };

        true
    }

    /// The newest fetch was superseded before it resolved.
    fn cancel(&mut self, ticket: FetchTicket) {
        if ticket.seq == self.issued && ticket.seq > self.applied {
            self.applied = ticket.seq;
            self.state = self.settled.clone();
        }
    }

    fn reset(&mut self) {
        // Invalidate anything still in flight.
        self.applied = self.issued;
        self.state = SlotState::Idle;
        self.settled = SlotState::Idle;
    }
}

/// Display-ready values for one loaded record.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelData {
    pub city_name: String,
    pub temperature: String,
    pub wind_speed: String,
    pub sunrise: String,
    pub sunset: String,
    pub condition: String,
    pub icon_url: &'static str,
    pub condition_kind: ConditionKind,
    /// Set when the shown record is older than a failed or pending refresh.
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelView {
    NoData(&'static str),
    Loading,
    Failed(String),
    Ready(PanelData),
}

#[derive(Debug)]
pub struct DashboardState {
    units: UnitSystem,
    time_format: TimeFormat,
    conversion: TemperatureConversion,
    coordinates: Option<Coordinates>,
    search_term: String,
    current: Slot,
    searched: Slot,
}

impl DashboardState {
    pub fn new(units: UnitSystem, time_format: TimeFormat, conversion: TemperatureConversion) -> Self {
        Self {
            units,
            time_format,
            conversion,
            coordinates: None,
            search_term: String::new(),
            current: Slot::default(),
            searched: Slot::default(),
        }
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn time_format(&self) -> TimeFormat {
        self.time_format
    }

    pub fn conversion(&self) -> TemperatureConversion {
        self.conversion
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn has_search(&self) -> bool {
        !self.search_term.trim().is_empty()
    }

    pub fn slot(&self, target: Target) -> &Slot {
        match target {
            Target::CurrentLocation => &self.current,
            Target::SearchedLocation => &self.searched,
        }
    }

    fn slot_mut(&mut self, target: Target) -> &mut Slot {
        match target {
            Target::CurrentLocation => &mut self.current,
            Target::SearchedLocation => &mut self.searched,
        }
    }

    /// Coordinates are written once; later calls are ignored.
    pub fn set_coordinates(&mut self, coordinates: Coordinates) -> Vec<Target> {
        if self.coordinates.is_some() {
            return Vec::new();
        }
        self.coordinates = Some(coordinates);
        vec![Target::CurrentLocation]
    }

    pub fn set_search_term(&mut self, term: &str) -> Vec<Target> {
        if self.search_term == term {
            return Vec::new();
        }
        self.search_term = term.to_string();

        if self.has_search() {
            vec![Target::SearchedLocation]
        } else {
            self.searched.reset();
            Vec::new()
        }
    }

    pub fn set_units(&mut self, units: UnitSystem) -> Vec<Target> {
        if self.units == units {
            return Vec::new();
        }
        self.units = units;

        let mut targets = Vec::new();
        if self.coordinates.is_some() {
            targets.push(Target::CurrentLocation);
        }
        if self.has_search() {
            targets.push(Target::SearchedLocation);
        }
        targets
    }

    /// Display only; never triggers a refetch.
    pub fn toggle_time_format(&mut self) -> TimeFormat {
        self.time_format = self.time_format.toggle();
        self.time_format
    }

    pub fn begin_fetch(&mut self, target: Target) -> FetchTicket {
        self.slot_mut(target).begin(target)
    }

    /// Returns false when the ticket was superseded and the result dropped.
    pub fn apply(&mut self, ticket: FetchTicket, result: Result<WeatherRecord, FetchError>) -> bool {
        let applied = self.slot_mut(ticket.target).apply(ticket, result);
        if !applied {
            tracing::debug!(
                slot = ticket.target.log_name(),
                seq = ticket.seq,
                "discarded stale weather response"
            );
        }
        applied
    }

    pub fn cancel(&mut self, ticket: FetchTicket) {
        self.slot_mut(ticket.target).cancel(ticket);
    }

    pub fn record(&self, target: Target) -> Option<&WeatherRecord> {
        self.slot(target).state().record()
    }

    pub fn panel(&self, target: Target) -> PanelView {
        match self.slot(target).state() {
            SlotState::Idle => PanelView::NoData(no_data_message(target)),
            SlotState::Loading { previous: None } => PanelView::Loading,
            SlotState::Failed { error, previous: None } => PanelView::Failed(error.summary().into()),
            SlotState::Loading { previous: Some(record) } => {
                PanelView::Ready(self.panel_data(record, Some("refreshing...".into())))
            }
            SlotState::Failed { error, previous: Some(record) } => PanelView::Ready(
                self.panel_data(record, Some(format!("refresh failed: {}", error.summary()))),
            ),
            SlotState::Loaded(record) => PanelView::Ready(self.panel_data(record, None)),
        }
    }

    fn panel_data(&self, record: &WeatherRecord, note: Option<String>) -> PanelData {
        let temperature = display::display_temperature(record, self.units, self.conversion);
        let condition_kind = ConditionKind::from_description(&record.condition_description);

        PanelData {
            city_name: record.city_name.clone(),
            temperature: display::format_temperature(temperature, self.units),
            wind_speed: display::format_wind(record),
            sunrise: display::format_time(&record.sunrise, self.time_format),
            sunset: display::format_time(&record.sunset, self.time_format),
            condition: record.condition_description.clone(),
            icon_url: condition_kind.icon_url(),
            condition_kind,
            note,
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(UnitSystem::default(), TimeFormat::default(), TemperatureConversion::default())
    }
}

fn no_data_message(target: Target) -> &'static str {
    match target {
        Target::CurrentLocation => "No weather data found for current location.",
        Target::SearchedLocation => "No weather data found for searched location.",
    }
}
