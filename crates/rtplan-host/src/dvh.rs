use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DosePresentation {
    Absolute,
    Relative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumePresentation {
    Relative,
    AbsoluteCm3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DvhPoint {
    pub dose: f64,
    pub volume: f64,
}

/// A cumulative dose-volume histogram.
///
/// `curve` is ordered by increasing dose, so volumes decrease along it.
/// Doses are in the unit requested by the query (system unit or percent).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DvhData {
    pub curve: Vec<DvhPoint>,
    pub max_dose: f64,
    pub mean_dose: f64,
    pub min_dose: f64,
}

impl DvhData {
    /// Build a histogram from `(dose, volume)` samples, deriving the summary
    /// statistics from the curve. Mean dose is the area under the cumulative
    /// curve divided by the total volume.
    pub fn from_samples(samples: &[(f64, f64)]) -> Self {
        let curve: Vec<DvhPoint> = samples
            .iter()
            .map(|&(dose, volume)| DvhPoint { dose, volume })
            .collect();

        let max_dose = curve
            .iter()
            .find(|p| p.volume <= 0.0)
            .or(curve.last())
            .map(|p| p.dose)
            .unwrap_or(0.0);
        let total = curve.first().map(|p| p.volume).unwrap_or(0.0);
        let min_dose = curve
            .iter()
            .take_while(|p| p.volume >= total)
            .map(|p| p.dose)
            .fold(0.0, f64::max);
        let mean_dose = if total > 0.0 {
            curve
                .windows(2)
                .map(|w| (w[1].dose - w[0].dose) * (w[0].volume + w[1].volume) / 2.0)
                .sum::<f64>()
                / total
        } else {
            0.0
        };

        Self {
            curve,
            max_dose,
            mean_dose,
            min_dose,
        }
    }

    pub fn min_volume(&self) -> Option<f64> {
        self.curve.iter().map(|p| p.volume).reduce(f64::min)
    }

    pub fn max_curve_dose(&self) -> Option<f64> {
        self.curve.iter().map(|p| p.dose).reduce(f64::max)
    }
}
