use crate::{error::QueryError, model::WeatherReport};

/// Identifies one submission. Later submissions get larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// What a front end should show right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome<'a> {
    Idle,
    Loading,
    Success(&'a WeatherReport),
    Failure(&'a QueryError),
}

/// Search screen state. Transitions consume the old value and return a new one.
///
/// At most one of `report` and `error` is set. Only the most recent
/// submission may complete; results for older tickets are dropped, so a slow
/// response can never overwrite a newer one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    issued: u64,
    pending: Option<Ticket>,
    report: Option<WeatherReport>,
    error: Option<QueryError>,
}

impl SearchState {
    pub fn idle() -> Self {
        Self::default()
    }

    /// Start a submission. Clears the error; a previous report stays visible.
    pub fn begin(self) -> (Self, Ticket) {
        let ticket = Ticket(self.issued + 1);
        let next = Self {
            issued: ticket.0,
            pending: Some(ticket),
            report: self.report,
            error: None,
        };
        (next, ticket)
    }

    /// Finish the submission identified by `ticket`.
    pub fn complete(self, ticket: Ticket, result: Result<WeatherReport, QueryError>) -> Self {
        if self.pending != Some(ticket) {
            tracing::debug!(?ticket, latest = self.issued, "dropping stale query result");
            return self;
        }

        match result {
            Ok(report) => Self { pending: None, report: Some(report), error: None, ..self },
            Err(error) => Self { pending: None, report: None, error: Some(error), ..self },
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn outcome(&self) -> Outcome<'_> {
        if self.is_loading() {
            return Outcome::Loading;
        }

        match (&self.report, &self.error) {
            (_, Some(error)) => Outcome::Failure(error),
            (Some(report), None) => Outcome::Success(report),
            (None, None) => Outcome::Idle,
        }
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        self.report.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}
