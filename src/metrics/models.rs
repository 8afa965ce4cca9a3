use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use super::formulas;

/// Every indicator reported per player, in display order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    Display,
)]
pub enum Metric {
    #[serde(rename = "PPS")]
    #[strum(to_string = "PPS")]
    Pps,
    #[serde(rename = "APM")]
    #[strum(to_string = "APM")]
    Apm,
    #[serde(rename = "VS Score")]
    #[strum(to_string = "VS Score")]
    VsScore,
    #[serde(rename = "APP")]
    #[strum(to_string = "APP")]
    App,
    #[serde(rename = "DS/Piece")]
    #[strum(to_string = "DS/Piece")]
    DsPerPiece,
    #[serde(rename = "DS/Second")]
    #[strum(to_string = "DS/Second")]
    DsPerSecond,
    #[serde(rename = "Garbage Efficiency")]
    #[strum(to_string = "Garbage Efficiency")]
    GarbageEfficiency,
    #[serde(rename = "Damage Potential")]
    #[strum(to_string = "Damage Potential")]
    DamagePotential,
}

impl Metric {
    /// Axis range used by chart consumers. Damage Potential has none.
    pub fn display_range(self) -> Option<(f64, f64)> {
        match self {
            Metric::Pps => Some((0.0, 4.0)),
            Metric::Apm => Some((0.0, 240.0)),
            Metric::VsScore => Some((0.0, 400.0)),
            Metric::App => Some((0.0, 1.0)),
            Metric::DsPerPiece => Some((0.0, 0.5)),
            Metric::DsPerSecond => Some((0.0, 1.0)),
            Metric::GarbageEfficiency => Some((0.0, 0.6)),
            Metric::DamagePotential => None,
        }
    }

    /// Maps `value` onto `[0, 1]` within the metric's display range.
    pub fn normalize(self, value: f64) -> Option<f64> {
        let (min, max) = self.display_range()?;
        if max == min {
            return Some(0.5);
        }
        Some(((value - min) / (max - min)).clamp(0.0, 1.0))
    }
}

/// Counters read verbatim from a replay for one player in one round.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawCounters {
    pub pps: f64,
    pub apm: f64,
    pub vsscore: f64,
}

impl RawCounters {
    pub fn new(pps: f64, apm: f64, vsscore: f64) -> Self {
        Self { pps, apm, vsscore }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedStats {
    #[serde(rename = "PPS")]
    pub pps: f64,
    #[serde(rename = "APM")]
    pub apm: f64,
    #[serde(rename = "VS Score")]
    pub vs_score: f64,
    #[serde(rename = "APP")]
    pub app: f64,
    #[serde(rename = "DS/Piece")]
    pub ds_per_piece: f64,
    #[serde(rename = "DS/Second")]
    pub ds_per_second: f64,
    #[serde(rename = "Garbage Efficiency")]
    pub garbage_efficiency: f64,
    #[serde(rename = "Damage Potential")]
    pub damage_potential: f64,
}

impl DerivedStats {
    pub fn from_raw(raw: RawCounters) -> Self {
        let RawCounters { pps, apm, vsscore } = raw;

        // Extreme counters can overflow; every stored value stays finite.
        let app = formulas::finite_or_zero(formulas::app(apm, pps));
        let ds_per_piece = formulas::finite_or_zero(formulas::ds_per_piece(vsscore, apm, pps));
        let ds_per_second = formulas::finite_or_zero(formulas::ds_per_second(vsscore, apm));
        let garbage_efficiency =
            formulas::finite_or_zero(formulas::garbage_efficiency(pps, ds_per_second, app));
        let damage_potential =
            formulas::finite_or_zero(formulas::damage_potential(pps, app, garbage_efficiency));

        Self {
            pps,
            apm,
            vs_score: vsscore,
            app,
            ds_per_piece,
            ds_per_second,
            garbage_efficiency,
            damage_potential,
        }
    }

    pub fn from_fn(mut value_of: impl FnMut(Metric) -> f64) -> Self {
        Self {
            pps: value_of(Metric::Pps),
            apm: value_of(Metric::Apm),
            vs_score: value_of(Metric::VsScore),
            app: value_of(Metric::App),
            ds_per_piece: value_of(Metric::DsPerPiece),
            ds_per_second: value_of(Metric::DsPerSecond),
            garbage_efficiency: value_of(Metric::GarbageEfficiency),
            damage_potential: value_of(Metric::DamagePotential),
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Pps => self.pps,
            Metric::Apm => self.apm,
            Metric::VsScore => self.vs_score,
            Metric::App => self.app,
            Metric::DsPerPiece => self.ds_per_piece,
            Metric::DsPerSecond => self.ds_per_second,
            Metric::GarbageEfficiency => self.garbage_efficiency,
            Metric::DamagePotential => self.damage_potential,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::iter().map(move |metric| (metric, self.get(metric)))
    }

    /// JSON has no encoding for infinities or NaN.
    pub fn is_finite(&self) -> bool {
        self.iter().all(|(_, value)| value.is_finite())
    }
}

/// Per-metric sample lists, reduced to arithmetic means on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatSamples {
    samples: BTreeMap<Metric, Vec<f64>>,
}

impl StatSamples {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stats: &DerivedStats) {
        for (metric, value) in stats.iter() {
            self.samples.entry(metric).or_default().push(value);
        }
    }

    /// Number of `DerivedStats` pushed so far.
    pub fn len(&self) -> usize {
        self.samples.get(&Metric::Pps).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn history(&self, metric: Metric) -> &[f64] {
        self.samples.get(&metric).map_or(&[], Vec::as_slice)
    }

    /// `None` when no samples were recorded.
    pub fn mean(&self) -> Option<DerivedStats> {
        if self.is_empty() {
            return None;
        }
        Some(DerivedStats::from_fn(|metric| mean(self.history(metric))))
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
