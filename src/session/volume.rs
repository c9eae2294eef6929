// =============================================================================
// Session-Adjusted Volume
// =============================================================================

use serde::{Deserialize, Serialize};

const RECENT_BARS: usize = 5;
const AVERAGE_BARS: usize = 20;
/// Latest bar above this multiple of the 20-bar average is a climax.
const CLIMAX_SPIKE: f64 = 2.0;

/// Session-normalised volume tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VolumeGrade {
    Climax,
    Strong,
    Adequate,
    Weak,
    Dead,
}

impl VolumeGrade {
    pub fn from_ratio(session_ratio: f64) -> Self {
        if session_ratio >= 2.0 {
            Self::Climax
        } else if session_ratio >= 1.2 {
            Self::Strong
        } else if session_ratio >= 0.8 {
            Self::Adequate
        } else if session_ratio >= 0.5 {
            Self::Weak
        } else {
            Self::Dead
        }
    }

    pub fn score(&self) -> i32 {
        match self {
            Self::Climax => 25,
            Self::Strong => 20,
            Self::Adequate => 10,
            Self::Weak => 0,
            Self::Dead => -15,
        }
    }

    pub fn note(&self) -> &'static str {
        match self {
            Self::Climax => "Volume climax for this session",
            Self::Strong => "Strong volume for this session",
            Self::Adequate => "Adequate volume for this session",
            Self::Weak => "Weak volume for this session",
            Self::Dead => "Dead volume for this session, no conviction",
        }
    }
}

impl std::fmt::Display for VolumeGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Climax => write!(f, "CLIMAX"),
            Self::Strong => write!(f, "STRONG"),
            Self::Adequate => write!(f, "ADEQUATE"),
            Self::Weak => write!(f, "WEAK"),
            Self::Dead => write!(f, "DEAD"),
        }
    }
}

/// Where a volume climax printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeContext {
    Accumulation,
    Distribution,
    Spike,
    Normal,
}

impl VolumeContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accumulation => "accumulation",
            Self::Distribution => "distribution",
            Self::Spike => "spike",
            Self::Normal => "normal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeProfile {
    /// 5-bar average over 20-bar average.
    pub raw_ratio: f64,
    /// `raw_ratio` divided by the session's expected multiplier.
    pub session_ratio: f64,
    pub grade: VolumeGrade,
    /// Latest bar over the 20-bar average.
    pub spike: f64,
    pub climax: bool,
    pub context: VolumeContext,
    /// Latest bar above its 20-bar average.
    pub signal_above_average: bool,
}

/// Grade recent volume against what `session_multiplier` says the current
/// session normally trades.  Needs at least 20 bars.
pub fn session_volume(
    volumes: &[f64],
    session_multiplier: f64,
    near_support: bool,
    near_resistance: bool,
) -> Option<VolumeProfile> {
    if volumes.len() < AVERAGE_BARS || session_multiplier <= 0.0 {
        return None;
    }

    let recent = mean(&volumes[volumes.len() - RECENT_BARS..]);
    let average = mean(&volumes[volumes.len() - AVERAGE_BARS..]);
    let latest = volumes[volumes.len() - 1];

    let (raw_ratio, spike) = if average > 0.0 {
        (recent / average, latest / average)
    } else {
        (0.0, 0.0)
    };
    let session_ratio = raw_ratio / session_multiplier;
    let climax = spike > CLIMAX_SPIKE;

    let context = match (climax, near_support, near_resistance) {
        (false, _, _) => VolumeContext::Normal,
        (true, true, _) => VolumeContext::Accumulation,
        (true, false, true) => VolumeContext::Distribution,
        (true, false, false) => VolumeContext::Spike,
    };

    Some(VolumeProfile {
        raw_ratio,
        session_ratio,
        grade: VolumeGrade::from_ratio(session_ratio),
        spike,
        climax,
        context,
        signal_above_average: spike > 1.0,
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_thresholds() {
        assert_eq!(VolumeGrade::from_ratio(2.0), VolumeGrade::Climax);
        assert_eq!(VolumeGrade::from_ratio(1.99), VolumeGrade::Strong);
        assert_eq!(VolumeGrade::from_ratio(1.2), VolumeGrade::Strong);
        assert_eq!(VolumeGrade::from_ratio(0.8), VolumeGrade::Adequate);
        assert_eq!(VolumeGrade::from_ratio(0.5), VolumeGrade::Weak);
        assert_eq!(VolumeGrade::from_ratio(0.49), VolumeGrade::Dead);
        assert_eq!(VolumeGrade::Dead.score(), -15);
    }

    #[test]
    fn flat_volume_normalised_by_session() {
        let v = vec![100.0; 30];
        let asian = session_volume(&v, 0.6, false, false).unwrap();
        assert!((asian.raw_ratio - 1.0).abs() < 1e-12);
        assert!((asian.session_ratio - 1.0 / 0.6).abs() < 1e-12);
        assert_eq!(asian.grade, VolumeGrade::Strong);

        let overlap = session_volume(&v, 1.3, false, false).unwrap();
        assert_eq!(overlap.grade, VolumeGrade::Adequate);
        assert!(!overlap.climax);
        assert_eq!(overlap.context, VolumeContext::Normal);
    }

    #[test]
    fn climax_context_follows_structure() {
        let mut v = vec![100.0; 20];
        v[19] = 500.0;
        let at_support = session_volume(&v, 1.0, true, true).unwrap();
        assert!(at_support.climax);
        assert_eq!(at_support.context, VolumeContext::Accumulation);
        let at_resistance = session_volume(&v, 1.0, false, true).unwrap();
        assert_eq!(at_resistance.context, VolumeContext::Distribution);
        let open_air = session_volume(&v, 1.0, false, false).unwrap();
        assert_eq!(open_air.context, VolumeContext::Spike);
    }

    #[test]
    fn zero_volume_is_dead() {
        let p = session_volume(&[0.0; 25], 1.0, false, false).unwrap();
        assert_eq!(p.grade, VolumeGrade::Dead);
        assert!(!p.climax);
    }

    #[test]
    fn short_history_is_none() {
        assert!(session_volume(&[1.0; 19], 1.0, false, false).is_none());
    }
}
