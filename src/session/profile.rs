// =============================================================================
// Session Model — UTC time-of-day to trading session
// =============================================================================
//
// ASIAN 00-08, LONDON 08-13, LONDON/US 13-16, US 16-22, OFF-HOURS 22-24.
// Each session carries a volume multiplier and a stop buffer.
// =============================================================================

use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;

use crate::types::{NextSession, SessionName};

const LONDON_OPEN: u32 = 8 * 60;
const LONDON_CLOSE: u32 = 16 * 60;
const US_OPEN: u32 = 13 * 60;
const US_CLOSE: u32 = 22 * 60;
const DAY: u32 = 24 * 60;

const DANGER_WINDOW_MINS: u32 = 30;
const TRANSITION_RISK_MINS: u32 = 120;

/// Liquidity expectations for one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionProfile {
    /// Expected volume relative to a neutral session; the raw volume ratio
    /// is divided by this.
    pub volume_multiplier: f64,
    /// Extra fraction taken off the stop to clear session noise.
    pub stop_buffer: f64,
    pub rules: &'static str,
}

impl SessionProfile {
    pub fn for_session(session: SessionName) -> Self {
        match session {
            SessionName::Asian => Self {
                volume_multiplier: 0.6,
                stop_buffer: 0.005,
                rules: "Thin liquidity. Mark the range, expect a sweep before London, \
                        keep stops wide.",
            },
            SessionName::London => Self {
                volume_multiplier: 1.0,
                stop_buffer: 0.003,
                rules: "Directional open. Watch for Asian range breaks and failed breakouts.",
            },
            SessionName::Us => Self {
                volume_multiplier: 1.1,
                stop_buffer: 0.003,
                rules: "Trend continuation or reversal of the London move. Respect macro prints.",
            },
            SessionName::LondonUs => Self {
                volume_multiplier: 1.3,
                stop_buffer: 0.002,
                rules: "Peak liquidity. Strictest volume thresholds, tightest stops.",
            },
            SessionName::OffHours => Self {
                volume_multiplier: 0.5,
                stop_buffer: 0.006,
                rules: "Lowest liquidity. Avoid new entries, widen stops on anything held.",
            },
        }
    }
}

/// Session state derived from a single UTC instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInfo {
    pub session: SessionName,
    pub color: &'static str,
    pub next_session: NextSession,
    pub mins_to_next: u32,
    pub hours_to_next: u32,
    pub mins_remaining: u32,
    pub in_asian: bool,
    pub in_london: bool,
    pub in_us: bool,
    pub in_overlap: bool,
    /// Next session opens within 30 minutes.
    pub in_danger_window: bool,
    /// Asian session with London opening within two hours.
    pub transition_risk: bool,
    pub profile: SessionProfile,
}

impl SessionInfo {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self::from_minutes(now.hour() * 60 + now.minute())
    }

    /// Classify a UTC minute-of-day (0..1440).
    pub fn from_minutes(mins: u32) -> Self {
        let mins = mins % DAY;
        let in_asian = mins < LONDON_OPEN;
        let in_london = (LONDON_OPEN..LONDON_CLOSE).contains(&mins);
        let in_us = (US_OPEN..US_CLOSE).contains(&mins);
        let in_overlap = in_london && in_us;

        let (session, color) = if in_overlap {
            (SessionName::LondonUs, "#f97316")
        } else if in_london {
            (SessionName::London, "#60a5fa")
        } else if in_us {
            (SessionName::Us, "#22c55e")
        } else if in_asian {
            (SessionName::Asian, "#a78bfa")
        } else {
            (SessionName::OffHours, "#6b7280")
        };

        let (next_session, mins_to_next) = if mins < LONDON_OPEN {
            (NextSession::London, LONDON_OPEN - mins)
        } else if mins < US_OPEN {
            (NextSession::Us, US_OPEN - mins)
        } else {
            (NextSession::Asian, DAY - mins)
        };

        Self {
            session,
            color,
            next_session,
            mins_to_next,
            hours_to_next: mins_to_next / 60,
            mins_remaining: mins_to_next % 60,
            in_asian,
            in_london,
            in_us,
            in_overlap,
            in_danger_window: mins_to_next <= DANGER_WINDOW_MINS,
            transition_risk: in_asian && mins_to_next <= TRANSITION_RISK_MINS,
            profile: SessionProfile::for_session(session),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> SessionInfo {
        SessionInfo::at(Utc.with_ymd_and_hms(2024, 5, 14, h, m, 0).unwrap())
    }

    #[test]
    fn london_morning() {
        let s = at(9, 0);
        assert_eq!(s.session, SessionName::London);
        assert_eq!(s.next_session, NextSession::Us);
        assert_eq!(s.mins_to_next, 240);
        assert!(!s.in_danger_window);
    }

    #[test]
    fn afternoon_overlap() {
        let s = at(14, 0);
        assert_eq!(s.session, SessionName::LondonUs);
        assert!(s.in_london && s.in_us && s.in_overlap);
        assert!((s.profile.volume_multiplier - 1.3).abs() < 1e-12);
    }

    #[test]
    fn late_evening_is_off_hours() {
        let s = at(23, 0);
        assert_eq!(s.session, SessionName::OffHours);
        assert_eq!(s.next_session, NextSession::Asian);
        assert_eq!(s.mins_to_next, 60);
    }

    #[test]
    fn early_asian_has_no_transition_risk() {
        let s = at(1, 0);
        assert_eq!(s.session, SessionName::Asian);
        assert_eq!(s.mins_to_next, 420);
        assert!(!s.transition_risk);
    }

    #[test]
    fn late_asian_has_transition_risk() {
        let s = at(7, 0);
        assert_eq!(s.session, SessionName::Asian);
        assert_eq!(s.next_session, NextSession::London);
        assert!(s.transition_risk);
        assert!(!s.in_danger_window);
    }

    #[test]
    fn danger_window_boundary() {
        assert!(at(7, 30).in_danger_window);
        assert!(!at(7, 29).in_danger_window);
        assert!(at(12, 45).in_danger_window);
        assert_eq!(at(12, 45).hours_to_next, 0);
        assert_eq!(at(12, 45).mins_remaining, 15);
    }

    #[test]
    fn session_edges() {
        assert_eq!(at(8, 0).session, SessionName::London);
        assert_eq!(at(13, 0).session, SessionName::LondonUs);
        assert_eq!(at(16, 0).session, SessionName::Us);
        assert_eq!(at(22, 0).session, SessionName::OffHours);
        assert_eq!(at(0, 0).session, SessionName::Asian);
    }
}
