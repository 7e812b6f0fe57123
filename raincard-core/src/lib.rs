//! Core library for the `raincard` weather lookup.
//!
//! This crate defines:
//! - Local-time resolution, hourly rain alignment and theme classification
//! - The OpenWeather and Open-Meteo clients behind provider traits
//! - The query orchestrator and the search state machine
//! - Configuration & credentials handling
//!
//! It is used by `raincard-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod hourly;
pub mod localtime;
pub mod model;
pub mod provider;
pub mod query;
pub mod state;
pub mod theme;
pub mod view;

pub use config::{Config, Endpoints};
pub use error::QueryError;
pub use hourly::align_hourly;
pub use localtime::{LocalDateHour, resolve_local_date_and_hour};
pub use model::{CurrentWeather, HourlyRainSlot, WeatherQuery, WeatherReport, round_half_up};
pub use provider::{CurrentWeatherProvider, HourlyForecastProvider};
pub use query::{Clock, FixedClock, SystemClock, WeatherService};
pub use state::{Outcome, SearchState, Ticket};
pub use theme::{Theme, classify_theme};
pub use view::{RainHourView, ViewModel};
