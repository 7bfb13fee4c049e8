//! Generation settings and their validation.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Fastest accepted tempo.
pub const MAX_BPM: f64 = 300.0;

/// Everything one generation run needs. Immutable for the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Tempo in beats per minute (0 < bpm <= [`MAX_BPM`])
    pub bpm: f64,
    /// Time signature numerator (> 0)
    pub time_sig_numerator: u8,
    /// Time signature denominator (power of two)
    pub time_sig_denominator: u8,
    /// MIDI pitch for every note (0-127)
    pub base_pitch: u8,
    /// Seconds a label starts before its first note
    pub label_lead_silence: f64,
    /// Seconds a label runs past its last note
    pub label_trail_silence: f64,
    /// When false, `_` in the text is ignored
    pub underscore_as_rest: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bpm: 120.0,
            time_sig_numerator: 4,
            time_sig_denominator: 4,
            base_pitch: 64,
            label_lead_silence: 0.5,
            label_trail_silence: 0.5,
            underscore_as_rest: false,
        }
    }
}

impl Settings {
    /// Set lead and trail label silence to the same value.
    pub fn with_label_silence(mut self, seconds: f64) -> Self {
        self.label_lead_silence = seconds;
        self.label_trail_silence = seconds;
        self
    }

    /// Reject settings the scheduler would turn into garbage.
    ///
    /// The scheduler itself never validates; callers run this first.
    pub fn validate(&self) -> Result<()> {
        if !self.bpm.is_finite() || self.bpm <= 0.0 || self.bpm > MAX_BPM {
            return Err(invalid(format!(
                "bpm must be in (0, {}], got {}",
                MAX_BPM, self.bpm
            )));
        }
        if self.time_sig_numerator == 0 {
            return Err(invalid("time signature numerator must be positive"));
        }
        if !self.time_sig_denominator.is_power_of_two() {
            return Err(invalid(format!(
                "time signature denominator must be a power of two, got {}",
                self.time_sig_denominator
            )));
        }
        if self.base_pitch > 127 {
            return Err(invalid(format!(
                "base pitch must be 0-127, got {}",
                self.base_pitch
            )));
        }
        for (name, value) in [
            ("label lead silence", self.label_lead_silence),
            ("label trail silence", self.label_trail_silence),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Convert seconds to beats at this tempo.
    pub fn seconds_to_beats(&self, seconds: f64) -> f64 {
        seconds * self.bpm / 60.0
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidSettings(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_bpm() {
        for bpm in [0.0, -10.0, f64::NAN, f64::INFINITY, 300.5, 1e8, 1e12] {
            let settings = Settings {
                bpm,
                ..Settings::default()
            };
            assert!(settings.validate().is_err(), "bpm {} accepted", bpm);
        }
    }

    #[test]
    fn test_accepts_tempo_range_edges() {
        for bpm in [0.5, 1.0, MAX_BPM] {
            let settings = Settings {
                bpm,
                ..Settings::default()
            };
            assert!(settings.validate().is_ok(), "bpm {} rejected", bpm);
        }
    }

    #[test]
    fn test_rejects_bad_time_signature() {
        let zero_num = Settings {
            time_sig_numerator: 0,
            ..Settings::default()
        };
        assert!(zero_num.validate().is_err());

        let odd_den = Settings {
            time_sig_denominator: 3,
            ..Settings::default()
        };
        assert!(odd_den.validate().is_err());

        let zero_den = Settings {
            time_sig_denominator: 0,
            ..Settings::default()
        };
        assert!(zero_den.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_pitch() {
        let settings = Settings {
            base_pitch: 128,
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("base pitch"));
    }

    #[test]
    fn test_rejects_negative_silence() {
        let settings = Settings::default().with_label_silence(-0.1);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_seconds_to_beats() {
        let settings = Settings::default();
        assert_eq!(settings.seconds_to_beats(2.0), 4.0);

        let slow = Settings {
            bpm: 60.0,
            ..Settings::default()
        };
        assert_eq!(slow.seconds_to_beats(2.0), 2.0);
    }
}
