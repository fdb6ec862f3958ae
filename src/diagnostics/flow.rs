use crate::flow::FlowField;
use serde::{Deserialize, Serialize};

/// Compact description of a dense flow field for reports.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSummary {
    pub width: usize,
    pub height: usize,
    pub mean_u: f32,
    pub mean_v: f32,
    pub mean_magnitude: f32,
    pub max_magnitude: f32,
    pub all_finite: bool,
}

impl FlowSummary {
    pub fn from_flow(flow: &FlowField) -> Self {
        let mean = flow.mean_vector();
        let magnitude = flow.magnitude();
        Self {
            width: flow.width(),
            height: flow.height(),
            mean_u: mean.x,
            mean_v: mean.y,
            mean_magnitude: magnitude.mean() as f32,
            max_magnitude: flow.max_magnitude(),
            all_finite: flow.all_finite(),
        }
    }
}

/// One pyramid level of a coarse-to-fine run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelReport {
    pub level_index: usize,
    pub width: usize,
    pub height: usize,
    pub elapsed_ms: f64,
    pub flow: FlowSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_a_uniform_field() {
        let s = FlowSummary::from_flow(&FlowField::uniform(4, 2, 3.0, -4.0));
        assert_eq!((s.width, s.height), (4, 2));
        assert_eq!(s.mean_u, 3.0);
        assert_eq!(s.mean_v, -4.0);
        assert_eq!(s.max_magnitude, 5.0);
        assert!((s.mean_magnitude - 5.0).abs() < 1e-6);
        assert!(s.all_finite);
    }
}
