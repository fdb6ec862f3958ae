use crate::error::{FlowError, Result};
use crate::gradient::GradientMethod;
use crate::params::FlowParams;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Serialized form of [`FlowParams`]:
///
/// ```json
/// { "alpha": 1.0, "iterations": 100, "gradient": "central" }
/// ```
///
/// Every key is optional. `iterations` is read as a signed integer so that a
/// negative count is reported as invalid parameters instead of a parse error.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub alpha: f32,
    pub iterations: i64,
    pub gradient: GradientMethod,
}

impl Default for FlowConfig {
    fn default() -> Self {
        let params = FlowParams::default();
        Self {
            alpha: params.alpha,
            iterations: params.iterations as i64,
            gradient: params.gradient_method,
        }
    }
}

impl FlowConfig {
    pub fn to_params(&self) -> Result<FlowParams> {
        let iterations = usize::try_from(self.iterations).map_err(|_| {
            FlowError::InvalidParameters(format!(
                "iterations must be >= 0, got {}",
                self.iterations
            ))
        })?;
        let params = FlowParams {
            alpha: self.alpha,
            iterations,
            gradient_method: self.gradient,
        };
        params.validate()?;
        Ok(params)
    }
}

impl TryFrom<FlowConfig> for FlowParams {
    type Error = FlowError;

    fn try_from(config: FlowConfig) -> Result<Self> {
        config.to_params()
    }
}

/// Parse a [`FlowConfig`] from a JSON string.
pub fn parse_flow_config(json: &str) -> std::result::Result<FlowConfig, serde_json::Error> {
    serde_json::from_str(json)
}

/// Read and validate flow parameters from a JSON file.
pub fn load_flow_config(path: &Path) -> Result<FlowParams> {
    let data = fs::read_to_string(path).map_err(|source| FlowError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_flow_config(&data).map_err(|source| FlowError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    config.to_params()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let params = parse_flow_config("{}").unwrap().to_params().unwrap();
        assert_eq!(params, FlowParams::default());
    }

    #[test]
    fn all_keys_are_read() {
        let cfg = parse_flow_config(r#"{"alpha": 0.5, "iterations": 7, "gradient": "central"}"#)
            .unwrap();
        let params = FlowParams::try_from(cfg).unwrap();
        assert_eq!(params.alpha, 0.5);
        assert_eq!(params.iterations, 7);
        assert_eq!(params.gradient_method, GradientMethod::Central);
    }

    #[test]
    fn negative_iterations_are_invalid_parameters() {
        let cfg = parse_flow_config(r#"{"iterations": -3}"#).unwrap();
        assert!(matches!(
            cfg.to_params(),
            Err(FlowError::InvalidParameters(_))
        ));
    }

    #[test]
    fn zero_alpha_is_invalid_parameters() {
        let cfg = parse_flow_config(r#"{"alpha": 0.0}"#).unwrap();
        assert!(matches!(
            cfg.to_params(),
            Err(FlowError::InvalidParameters(_))
        ));
    }

    #[test]
    fn unknown_gradient_fails_to_parse() {
        assert!(parse_flow_config(r#"{"gradient": "sobel"}"#).is_err());
    }

    #[test]
    fn missing_file_is_a_config_io_error() {
        let err = load_flow_config(Path::new("/nonexistent/flow.json")).unwrap_err();
        assert!(matches!(err, FlowError::ConfigIo { .. }));
    }
}
