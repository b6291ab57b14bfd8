use std::fmt;

use serde::{Deserialize, Serialize};

/// Perceptual "feel" of a track, derived from tempo, energy and brightness.
///
/// The serialized label strings are matched on by downstream consumers and
/// must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feel {
    #[serde(rename = "Energetic / Intense")]
    EnergeticIntense,
    #[serde(rename = "Upbeat / Driving")]
    UpbeatDriving,
    #[serde(rename = "Calm / Ambient")]
    CalmAmbient,
    #[serde(rename = "Mysterious / Tense")]
    MysteriousTense,
    #[serde(rename = "Standard Action")]
    StandardAction,
    #[serde(rename = "Mid-tempo / Neutral")]
    MidTempoNeutral,
}

impl Feel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feel::EnergeticIntense => "Energetic / Intense",
            Feel::UpbeatDriving => "Upbeat / Driving",
            Feel::CalmAmbient => "Calm / Ambient",
            Feel::MysteriousTense => "Mysterious / Tense",
            Feel::StandardAction => "Standard Action",
            Feel::MidTempoNeutral => "Mid-tempo / Neutral",
        }
    }
}

impl fmt::Display for Feel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Predicate = fn(bpm: f64, energy: f64, brightness: f64) -> bool;

/// Heuristic rules, evaluated in order; the first match wins. The rules
/// overlap, so the ordering is load-bearing.
const RULES: &[(Predicate, Feel)] = &[
    (
        |bpm, _, brightness| bpm > 140.0 && brightness > 2500.0,
        Feel::EnergeticIntense,
    ),
    (
        |bpm, energy, _| bpm > 120.0 && energy > 0.1,
        Feel::UpbeatDriving,
    ),
    (
        |bpm, _, brightness| bpm < 100.0 && brightness < 1800.0,
        Feel::CalmAmbient,
    ),
    (
        |bpm, energy, _| energy < 0.08 && bpm < 120.0,
        Feel::MysteriousTense,
    ),
    (|bpm, _, _| bpm > 120.0, Feel::StandardAction),
];

/// Classify a track's feel from its tempo (BPM), mean RMS energy and mean
/// spectral centroid (Hz). Pure and total; spectral bandwidth and
/// zero-crossing rate are deliberately not consulted.
pub fn estimate_feel(bpm: f64, energy: f64, brightness: f64) -> Feel {
    for (applies, feel) in RULES {
        if applies(bpm, energy, brightness) {
            return *feel;
        }
    }
    Feel::MidTempoNeutral
}
