use super::flow::FlowConfig;
use crate::image::ImageF32;
use crate::multiscale::MultiscaleOptions;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration of the `flow_demo` tool.
#[derive(Debug, Deserialize)]
pub struct FlowDemoConfig {
    #[serde(default)]
    pub frames: SyntheticFramesConfig,
    #[serde(default)]
    pub flow: FlowConfig,
    /// Run the coarse-to-fine driver instead of a single-scale solve.
    #[serde(default)]
    pub multiscale: Option<MultiscaleOptions>,
    pub output: FlowDemoOutputConfig,
}

/// A smooth periodic pattern translated by `(shift_x, shift_y)` pixels
/// between the two frames.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct SyntheticFramesConfig {
    pub width: usize,
    pub height: usize,
    /// Pattern wavelength in pixels.
    pub period: f32,
    pub contrast: f32,
    pub shift_x: f32,
    pub shift_y: f32,
}

impl Default for SyntheticFramesConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 48,
            period: 24.0,
            contrast: 60.0,
            shift_x: 0.5,
            shift_y: 0.25,
        }
    }
}

impl SyntheticFramesConfig {
    /// Pattern sampled at time `t` (frame index).
    pub fn render(&self, t: f32) -> ImageF32 {
        let k = TAU / self.period.max(f32::EPSILON);
        ImageF32::from_fn(self.width, self.height, |x, y| {
            let xs = x as f32 - t * self.shift_x;
            let ys = y as f32 - t * self.shift_y;
            128.0 + self.contrast * (k * xs).sin() * (k * ys).cos()
        })
    }

    pub fn render_pair(&self) -> (ImageF32, ImageF32) {
        (self.render(0.0), self.render(1.0))
    }
}

#[derive(Debug, Deserialize)]
pub struct FlowDemoOutputConfig {
    pub summary_json: PathBuf,
}

pub fn load_config(path: &Path) -> Result<FlowDemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let cfg: FlowDemoConfig =
            serde_json::from_str(r#"{"output": {"summary_json": "out/flow.json"}}"#).unwrap();
        assert_eq!(cfg.frames.width, 64);
        assert_eq!(cfg.flow.iterations, 100);
        assert!(cfg.multiscale.is_none());
        assert_eq!(cfg.output.summary_json, PathBuf::from("out/flow.json"));
    }

    #[test]
    fn rendered_pair_is_a_translation() {
        let frames = SyntheticFramesConfig {
            width: 8,
            height: 6,
            shift_x: 2.0,
            shift_y: 0.0,
            ..Default::default()
        };
        let (a, b) = frames.render_pair();
        for y in 0..6 {
            for x in 2..8 {
                assert!((b.get(x, y) - a.get(x - 2, y)).abs() < 1e-3);
            }
        }
    }
}
