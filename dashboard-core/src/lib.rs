//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Query building and the Weatherbit current-conditions fetcher
//! - Device location resolution
//! - Presentation state and derived display values
//! - The event-driven controller that ties them together
//!
//! It is used by `dashboard-cli`, but can also drive other front ends.

pub mod config;
pub mod dashboard;
pub mod display;
pub mod icon;
pub mod location;
pub mod model;
pub mod provider;
pub mod query;
pub mod state;

pub use config::{Config, GeolocationConfig};
pub use dashboard::{Dashboard, DashboardSettings, Update, UserAction};
pub use display::{TemperatureConversion, format_time};
pub use icon::ConditionKind;
pub use location::{LocationError, LocationResolver};
pub use model::{Coordinates, Target, TimeFormat, UnitSystem, WeatherRecord};
pub use provider::{FetchError, WeatherProvider};
pub use query::{LocationInput, LocationQuery, RequestParams, build_query};
pub use state::{DashboardState, PanelData, PanelView, SlotState};
