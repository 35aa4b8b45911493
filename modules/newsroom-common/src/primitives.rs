//! The six behavioral primitives that bias prompting and evaluation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NewsroomError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    FactVerification,
    AntiHyperbole,
    SourceAttribution,
    TemporalAccuracy,
    EntertainmentValue,
    Brevity,
}

impl Primitive {
    pub const ALL: [Primitive; 6] = [
        Primitive::FactVerification,
        Primitive::AntiHyperbole,
        Primitive::SourceAttribution,
        Primitive::TemporalAccuracy,
        Primitive::EntertainmentValue,
        Primitive::Brevity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::FactVerification => "fact_verification",
            Primitive::AntiHyperbole => "anti_hyperbole",
            Primitive::SourceAttribution => "source_attribution",
            Primitive::TemporalAccuracy => "temporal_accuracy",
            Primitive::EntertainmentValue => "entertainment_value",
            Primitive::Brevity => "brevity",
        }
    }

    pub fn default_weight(&self) -> f64 {
        match self {
            Primitive::FactVerification => 0.65,
            Primitive::AntiHyperbole => 0.75,
            Primitive::SourceAttribution => 0.72,
            Primitive::TemporalAccuracy => 0.70,
            Primitive::EntertainmentValue => 0.80,
            Primitive::Brevity => 0.40,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Primitive {
    type Err = NewsroomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Primitive::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| NewsroomError::InvalidRequest(format!("unknown primitive: {s}")))
    }
}

/// Weight vector over the six primitives.
///
/// Missing fields deserialize to their defaults. Reads go through [`get`],
/// which clamps to `[0, 1]` and replaces non-finite values with the default,
/// so a malformed snapshot never leaks out-of-range weights downstream.
///
/// [`get`]: PrimitiveWeights::get
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimitiveWeights {
    pub fact_verification: f64,
    pub anti_hyperbole: f64,
    pub source_attribution: f64,
    pub temporal_accuracy: f64,
    pub entertainment_value: f64,
    pub brevity: f64,
}

impl Default for PrimitiveWeights {
    fn default() -> Self {
        Self {
            fact_verification: Primitive::FactVerification.default_weight(),
            anti_hyperbole: Primitive::AntiHyperbole.default_weight(),
            source_attribution: Primitive::SourceAttribution.default_weight(),
            temporal_accuracy: Primitive::TemporalAccuracy.default_weight(),
            entertainment_value: Primitive::EntertainmentValue.default_weight(),
            brevity: Primitive::Brevity.default_weight(),
        }
    }
}

impl PrimitiveWeights {
    fn slot(&self, primitive: Primitive) -> f64 {
        match primitive {
            Primitive::FactVerification => self.fact_verification,
            Primitive::AntiHyperbole => self.anti_hyperbole,
            Primitive::SourceAttribution => self.source_attribution,
            Primitive::TemporalAccuracy => self.temporal_accuracy,
            Primitive::EntertainmentValue => self.entertainment_value,
            Primitive::Brevity => self.brevity,
        }
    }

    fn slot_mut(&mut self, primitive: Primitive) -> &mut f64 {
        match primitive {
            Primitive::FactVerification => &mut self.fact_verification,
            Primitive::AntiHyperbole => &mut self.anti_hyperbole,
            Primitive::SourceAttribution => &mut self.source_attribution,
            Primitive::TemporalAccuracy => &mut self.temporal_accuracy,
            Primitive::EntertainmentValue => &mut self.entertainment_value,
            Primitive::Brevity => &mut self.brevity,
        }
    }

    /// Sanitized weight in `[0, 1]`.
    pub fn get(&self, primitive: Primitive) -> f64 {
        sanitize(self.slot(primitive), primitive)
    }

    /// Store a weight, clamping into `[0, 1]`.
    pub fn set(&mut self, primitive: Primitive, value: f64) {
        *self.slot_mut(primitive) = sanitize(value, primitive);
    }

    /// Copy with every weight sanitized.
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for primitive in Primitive::ALL {
            out.set(primitive, self.slot(primitive));
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (Primitive, f64)> + '_ {
        Primitive::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}

fn sanitize(value: f64, primitive: Primitive) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        primitive.default_weight()
    }
}
