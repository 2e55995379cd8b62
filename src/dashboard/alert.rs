//! Single-slot alert banner

use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Info,
    Warning,
    Danger,
}

impl AlertKind {
    pub fn name(self) -> &'static str {
        match self {
            AlertKind::Success => "success",
            AlertKind::Info => "info",
            AlertKind::Warning => "warning",
            AlertKind::Danger => "danger",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    pub posted_at: Instant,
}

/// Holds at most one alert. Success alerts clear themselves after
/// `auto_dismiss`; everything else stays until dismissed or replaced.
#[derive(Debug)]
pub struct AlertRegion {
    current: Option<Alert>,
    auto_dismiss: Duration,
    posted: usize,
}

impl AlertRegion {
    pub fn new(auto_dismiss: Duration) -> Self {
        Self {
            current: None,
            auto_dismiss,
            posted: 0,
        }
    }

    pub fn post(&mut self, kind: AlertKind, message: impl Into<String>) {
        self.post_at(kind, message, Instant::now());
    }

    pub fn post_at(&mut self, kind: AlertKind, message: impl Into<String>, now: Instant) {
        self.current = Some(Alert {
            kind,
            message: message.into(),
            posted_at: now,
        });
        self.posted += 1;
    }

    /// Expire a success alert once it has been visible long enough
    pub fn tick(&mut self, now: Instant) {
        let expired = self.current.as_ref().is_some_and(|alert| {
            alert.kind == AlertKind::Success
                && now.saturating_duration_since(alert.posted_at) >= self.auto_dismiss
        });
        if expired {
            self.current = None;
        }
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Alert> {
        self.current.as_ref()
    }

    /// Alerts posted since this region was created
    pub fn posted_count(&self) -> usize {
        self.posted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_millis(5000);

    #[test]
    fn test_post_replaces_previous() {
        let mut alerts = AlertRegion::new(TTL);
        alerts.post(AlertKind::Danger, "first");
        alerts.post(AlertKind::Info, "second");

        let current = alerts.current().unwrap();
        assert_eq!(current.kind, AlertKind::Info);
        assert_eq!(current.message, "second");
        assert_eq!(alerts.posted_count(), 2);
    }

    #[test]
    fn test_success_auto_dismiss() {
        let mut alerts = AlertRegion::new(TTL);
        let start = Instant::now();
        alerts.post_at(AlertKind::Success, "done", start);

        alerts.tick(start + Duration::from_millis(4999));
        assert!(alerts.current().is_some());

        alerts.tick(start + TTL);
        assert!(alerts.current().is_none());
    }

    #[test]
    fn test_errors_persist() {
        let mut alerts = AlertRegion::new(TTL);
        let start = Instant::now();
        alerts.post_at(AlertKind::Danger, "broken", start);

        alerts.tick(start + Duration::from_secs(60));
        assert!(alerts.current().is_some());

        alerts.dismiss();
        assert!(alerts.current().is_none());
    }
}
