use std::fmt::Debug;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::QueryError,
    hourly::align_hourly,
    localtime::resolve_local_date_and_hour,
    model::{CurrentWeather, HourlyRainSlot, WeatherQuery, WeatherReport},
    provider::{
        CurrentWeatherProvider, CurrentWeatherReply, HourlyForecastProvider,
        openmeteo::OpenMeteoProvider, openweather::OpenWeatherProvider,
    },
};

/// Source of "now".
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Runs a city lookup against the current-weather and hourly-forecast providers.
#[derive(Debug)]
pub struct WeatherService {
    current: Box<dyn CurrentWeatherProvider>,
    hourly: Box<dyn HourlyForecastProvider>,
    clock: Box<dyn Clock>,
}

impl WeatherService {
    pub fn new(
        current: Box<dyn CurrentWeatherProvider>,
        hourly: Box<dyn HourlyForecastProvider>,
    ) -> Self {
        Self { current, hourly, clock: Box::new(SystemClock) }
    }

    /// Providers pointed at the configured endpoints, with the configured language.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Box::new(OpenWeatherProvider::new(
                config.endpoints.openweather.as_str(),
                config.language.as_str(),
            )),
            Box::new(OpenMeteoProvider::new(config.endpoints.open_meteo.as_str())),
        )
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Look up `city_name`. Makes no network call when either input is blank,
    /// one call when the city lookup fails, two otherwise.
    pub async fn execute_query(
        &self,
        city_name: &str,
        credential: &str,
    ) -> Result<WeatherReport, QueryError> {
        let query = WeatherQuery::parse(city_name)?;

        let credential = credential.trim();
        if credential.is_empty() {
            return Err(QueryError::MissingCredential);
        }

        let reply = self
            .current
            .fetch_current(query.city_name(), credential)
            .await
            .map_err(|e| QueryError::UnexpectedError(format!("{e:#}")))?;

        let current = interpret_current(reply)?;
        info!(city = %current.city_name, country = %current.country_code, "current weather resolved");

        let hourly_rain = self.hourly_rain(&current).await;

        Ok(WeatherReport { current, hourly_rain })
    }

    /// Rain slots for the rest of the city's day; empty on any failure.
    async fn hourly_rain(&self, current: &CurrentWeather) -> Vec<HourlyRainSlot> {
        let now = self.clock.now().timestamp();
        let Some(local) = resolve_local_date_and_hour(now, current.timezone_offset_seconds) else {
            warn!(
                offset = current.timezone_offset_seconds,
                "cannot resolve local date, skipping hourly forecast"
            );
            return Vec::new();
        };

        match self
            .hourly
            .fetch_hourly(current.latitude, current.longitude, local.date)
            .await
        {
            Ok(series) => {
                debug!(entries = series.time.len(), date = %local.date_string(), "hourly forecast received");
                align_hourly(&series.time, &series.precipitation_probability)
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "hourly forecast unavailable");
                Vec::new()
            }
        }
    }
}

/// Status first, then the transport verdict, then the payload itself.
fn interpret_current(reply: CurrentWeatherReply) -> Result<CurrentWeather, QueryError> {
    match reply.status {
        Some(200) => {}
        Some(404) => return Err(QueryError::CityNotFound),
        Some(401) => return Err(QueryError::InvalidOrPendingCredential),
        _ => {
            return Err(QueryError::ProviderError(
                reply
                    .message
                    .unwrap_or_else(|| QueryError::PROVIDER_FALLBACK.to_string()),
            ));
        }
    }

    if !reply.transport_ok {
        return Err(QueryError::HttpError);
    }

    reply.weather.ok_or_else(|| {
        QueryError::UnexpectedError("Weather provider returned an incomplete response.".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::HourlySeries;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone};
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    fn sao_paulo() -> CurrentWeather {
        CurrentWeather {
            city_name: "São Paulo".into(),
            country_code: "BR".into(),
            temp_c: 24.0,
            feels_like_c: 25.0,
            humidity_pct: 70,
            wind_speed_kmh: 11,
            condition_main: "Clear".into(),
            condition_description: "céu limpo".into(),
            latitude: -23.5,
            longitude: -46.6,
            timezone_offset_seconds: -10_800,
        }
    }

    fn ok_reply() -> CurrentWeatherReply {
        CurrentWeatherReply {
            transport_ok: true,
            status: Some(200),
            message: None,
            weather: Some(sao_paulo()),
        }
    }

    fn status_reply(transport_ok: bool, status: Option<i64>, message: Option<&str>) -> CurrentWeatherReply {
        CurrentWeatherReply {
            transport_ok,
            status,
            message: message.map(str::to_string),
            weather: None,
        }
    }

    #[derive(Debug)]
    struct FakeCurrent {
        reply: Result<CurrentWeatherReply, String>,
        calls: Arc<AtomicUsize>,
        seen: Arc<Mutex<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl CurrentWeatherProvider for FakeCurrent {
        async fn fetch_current(
            &self,
            city: &str,
            credential: &str,
        ) -> anyhow::Result<CurrentWeatherReply> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push((city.to_string(), credential.to_string()));
            self.reply.clone().map_err(|e| anyhow!(e))
        }
    }

    #[derive(Debug)]
    struct FakeHourly {
        series: Result<HourlySeries, String>,
        calls: Arc<AtomicUsize>,
        requests: Arc<Mutex<Vec<(f64, f64, NaiveDate)>>>,
    }

    #[async_trait]
    impl HourlyForecastProvider for FakeHourly {
        async fn fetch_hourly(
            &self,
            latitude: f64,
            longitude: f64,
            date: NaiveDate,
        ) -> anyhow::Result<HourlySeries> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push((latitude, longitude, date));
            self.series.clone().map_err(|e| anyhow!(e))
        }
    }

    struct Harness {
        service: WeatherService,
        current_calls: Arc<AtomicUsize>,
        hourly_calls: Arc<AtomicUsize>,
        seen: Arc<Mutex<Vec<(String, String)>>>,
        hourly_requests: Arc<Mutex<Vec<(f64, f64, NaiveDate)>>>,
    }

    fn harness(
        reply: Result<CurrentWeatherReply, String>,
        series: Result<HourlySeries, String>,
    ) -> Harness {
        let current_calls = Arc::new(AtomicUsize::new(0));
        let hourly_calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let hourly_requests = Arc::new(Mutex::new(Vec::new()));

        // 2024-03-01T02:00:00Z, which is 23:00 on Feb 29th in São Paulo.
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 2, 0, 0).unwrap();

        let service = WeatherService::new(
            Box::new(FakeCurrent { reply, calls: current_calls.clone(), seen: seen.clone() }),
            Box::new(FakeHourly { series, calls: hourly_calls.clone(), requests: hourly_requests.clone() }),
        )
        .with_clock(FixedClock(now));

        Harness { service, current_calls, hourly_calls, seen, hourly_requests }
    }

    fn two_entry_series() -> HourlySeries {
        HourlySeries {
            time: vec!["2024-02-29T05:00".into(), "2024-02-29T23:00".into()],
            precipitation_probability: vec![Some(30.0), Some(77.0)],
        }
    }

    #[tokio::test]
    async fn empty_city_makes_no_network_call() {
        let h = harness(Ok(ok_reply()), Ok(two_entry_series()));

        let err = h.service.execute_query("   ", "KEY").await.unwrap_err();

        assert_eq!(err, QueryError::EmptyInput);
        assert_eq!(h.current_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.hourly_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_credential_makes_no_network_call() {
        let h = harness(Ok(ok_reply()), Ok(two_entry_series()));

        let err = h.service.execute_query("São Paulo", " ").await.unwrap_err();

        assert_eq!(err, QueryError::MissingCredential);
        assert_eq!(h.current_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn city_not_found_on_404() {
        let h = harness(Ok(status_reply(false, Some(404), Some("city not found"))), Ok(two_entry_series()));

        let err = h.service.execute_query("Atlantis", "KEY").await.unwrap_err();

        assert_eq!(err, QueryError::CityNotFound);
        assert_eq!(h.current_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.hourly_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_credential_on_401() {
        let h = harness(Ok(status_reply(false, Some(401), Some("Invalid API key"))), Ok(two_entry_series()));

        let err = h.service.execute_query("Lisbon", "KEY").await.unwrap_err();
        assert_eq!(err, QueryError::InvalidOrPendingCredential);
    }

    #[tokio::test]
    async fn other_status_carries_provider_message() {
        let h = harness(Ok(status_reply(false, Some(429), Some("rate limited"))), Ok(two_entry_series()));
        let err = h.service.execute_query("Lisbon", "KEY").await.unwrap_err();
        assert_eq!(err, QueryError::ProviderError("rate limited".into()));

        let h = harness(Ok(status_reply(true, None, None)), Ok(two_entry_series()));
        let err = h.service.execute_query("Lisbon", "KEY").await.unwrap_err();
        assert_eq!(err, QueryError::ProviderError(QueryError::PROVIDER_FALLBACK.into()));
    }

    #[tokio::test]
    async fn transport_failure_overrides_body_status() {
        let mut reply = ok_reply();
        reply.transport_ok = false;
        let h = harness(Ok(reply), Ok(two_entry_series()));

        let err = h.service.execute_query("São Paulo", "KEY").await.unwrap_err();
        assert_eq!(err, QueryError::HttpError);
        assert_eq!(h.hourly_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unreachable_provider_is_unexpected() {
        let h = harness(Err("connection refused".into()), Ok(two_entry_series()));

        let err = h.service.execute_query("São Paulo", "KEY").await.unwrap_err();
        assert_eq!(err, QueryError::UnexpectedError("connection refused".into()));
    }

    #[tokio::test]
    async fn incomplete_success_body_is_unexpected() {
        let h = harness(Ok(status_reply(true, Some(200), None)), Ok(two_entry_series()));

        let err = h.service.execute_query("São Paulo", "KEY").await.unwrap_err();
        assert!(matches!(err, QueryError::UnexpectedError(_)));
    }

    #[tokio::test]
    async fn hourly_failure_still_returns_current_weather() {
        let h = harness(Ok(ok_reply()), Err("timeout".into()));

        let report = h.service.execute_query("São Paulo", "KEY").await.unwrap();

        assert_eq!(report.current, sao_paulo());
        assert!(report.hourly_rain.is_empty());
        assert_eq!(h.hourly_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn success_aligns_hourly_for_local_date() {
        let h = harness(Ok(ok_reply()), Ok(two_entry_series()));

        let report = h.service.execute_query("  São Paulo  ", " KEY ").await.unwrap();

        assert_eq!(report.hourly_rain.len(), 24);
        assert_eq!(report.hourly_rain[5].chance_pct, Some(30));
        assert_eq!(report.hourly_rain[23].chance_pct, Some(77));
        assert_eq!(report.hourly_rain[6].chance_pct, None);

        assert_eq!(
            h.seen.lock().unwrap().as_slice(),
            &[("São Paulo".to_string(), "KEY".to_string())]
        );
        assert_eq!(
            h.hourly_requests.lock().unwrap().as_slice(),
            &[(-23.5, -46.6, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())]
        );
    }

    #[tokio::test]
    async fn unresolvable_offset_skips_hourly_call() {
        let mut reply = ok_reply();
        if let Some(w) = reply.weather.as_mut() {
            w.timezone_offset_seconds = i64::MAX;
        }
        let h = harness(Ok(reply), Ok(two_entry_series()));

        let report = h.service.execute_query("São Paulo", "KEY").await.unwrap();
        assert!(report.hourly_rain.is_empty());
        assert_eq!(h.hourly_calls.load(Ordering::SeqCst), 0);
    }
}
