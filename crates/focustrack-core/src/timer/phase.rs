use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// The two halves of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::Break => "Break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Built-in work/break presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// 25 minutes of work, 5 minutes of break.
    #[default]
    Pomodoro,
    /// 15 minutes of work, 3 minutes of break.
    ShortBreak,
    /// 50 minutes of work, 10 minutes of break.
    LongBreak,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Pomodoro, Preset::ShortBreak, Preset::LongBreak];

    /// Stable key used by the config file and the CLI.
    pub fn key(&self) -> &'static str {
        match self {
            Preset::Pomodoro => "pomodoro",
            Preset::ShortBreak => "short-break",
            Preset::LongBreak => "long-break",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    pub fn config(&self) -> PhaseConfig {
        let (name, work_min, break_min) = match self {
            Preset::Pomodoro => ("Pomodoro", 25, 5),
            Preset::ShortBreak => ("Short Break", 15, 3),
            Preset::LongBreak => ("Long Break", 50, 10),
        };
        PhaseConfig {
            name: name.into(),
            description: format!(
                "{work_min} minutes of focused work followed by a {break_min}-minute break"
            ),
            work_secs: work_min * 60,
            break_secs: break_min * 60,
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| ValidationError::UnknownPreset(s.to_string()))
    }
}

/// Immutable work/break durations with a display name.
///
/// Fields are private so every value has passed through a constructor:
/// a configuration never has both phases at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseConfig {
    name: String,
    description: String,
    work_secs: u64,
    break_secs: u64,
}

impl PhaseConfig {
    /// Build from durations in seconds.
    ///
    /// A single zero-length phase is allowed and elapses on the first tick
    /// after it begins. Both zero is rejected.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        work_secs: u64,
        break_secs: u64,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if work_secs == 0 && break_secs == 0 {
            return Err(ValidationError::InvalidDuration { name });
        }
        Ok(Self {
            name,
            description: description.into(),
            work_secs,
            break_secs,
        })
    }

    /// Build from minute/second pairs for each phase.
    ///
    /// Uses saturating arithmetic so absurd minute counts cannot overflow.
    pub fn custom(
        name: impl Into<String>,
        description: impl Into<String>,
        work: (u64, u64),
        rest: (u64, u64),
    ) -> Result<Self, ValidationError> {
        let to_secs = |(min, sec): (u64, u64)| min.saturating_mul(60).saturating_add(sec);
        Self::new(name, description, to_secs(work), to_secs(rest))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn work_secs(&self) -> u64 {
        self.work_secs
    }

    pub fn break_secs(&self) -> u64 {
        self.break_secs
    }

    pub fn duration_secs(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_secs,
            Phase::Break => self.break_secs,
        }
    }

    pub fn total_secs(&self) -> u64 {
        self.work_secs.saturating_add(self.break_secs)
    }
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Preset::default().config()
    }
}

impl From<Preset> for PhaseConfig {
    fn from(preset: Preset) -> Self {
        preset.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_durations() {
        let p = Preset::Pomodoro.config();
        assert_eq!((p.work_secs(), p.break_secs()), (1500, 300));
        let s = Preset::ShortBreak.config();
        assert_eq!((s.work_secs(), s.break_secs()), (900, 180));
        let l = Preset::LongBreak.config();
        assert_eq!((l.work_secs(), l.break_secs()), (3000, 600));
        assert_eq!(l.name(), "Long Break");
        assert_eq!(
            l.description(),
            "50 minutes of focused work followed by a 10-minute break"
        );
    }

    #[test]
    fn preset_keys_roundtrip() {
        for preset in Preset::ALL {
            assert_eq!(preset.key().parse::<Preset>().unwrap(), preset);
        }
        assert!("tea-break".parse::<Preset>().is_err());
    }

    #[test]
    fn custom_combines_minutes_and_seconds() {
        let c = PhaseConfig::custom("Sprint", "quick", (1, 30), (0, 45)).unwrap();
        assert_eq!(c.work_secs(), 90);
        assert_eq!(c.break_secs(), 45);
        assert_eq!(c.total_secs(), 135);
    }

    #[test]
    fn all_zero_is_rejected() {
        let err = PhaseConfig::custom("Nothing", "", (0, 0), (0, 0)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidDuration {
                name: "Nothing".into()
            }
        );
    }

    #[test]
    fn single_zero_phase_is_allowed() {
        let c = PhaseConfig::new("No break", "", 60, 0).unwrap();
        assert_eq!(c.duration_secs(Phase::Break), 0);
        assert!(PhaseConfig::new("No work", "", 0, 60).is_ok());
    }

    #[test]
    fn huge_minutes_saturate() {
        let c = PhaseConfig::custom("Huge", "", (u64::MAX, 10), (0, 1)).unwrap();
        assert_eq!(c.work_secs(), u64::MAX);
    }
}
