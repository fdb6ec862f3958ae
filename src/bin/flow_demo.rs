use hornschunck::config::flow_demo::{self, FlowDemoConfig, SyntheticFramesConfig};
use hornschunck::diagnostics::{FlowSummary, LevelReport, TimingBreakdown};
use hornschunck::flow::{FlowField, ResidualSummary};
use hornschunck::multiscale::run_multiscale;
use hornschunck::{FlowParams, HornSchunck};
use serde::Serialize;
use std::env;
use std::fs;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = flow_demo::load_config(Path::new(&config_path))?;
    let params = config.flow.to_params().map_err(|e| e.to_string())?;

    let (previous, current) = config.frames.render_pair();
    let report = match &config.multiscale {
        Some(options) => {
            let out = run_multiscale(&previous, &current, &params, options)
                .map_err(|e| e.to_string())?;
            DemoReport::new(&config, params, &out.flow, None, None, out.levels)
        }
        None => {
            let estimate = HornSchunck::new(params)
                .and_then(|hs| hs.estimate(&previous, &current, None))
                .map_err(|e| e.to_string())?;
            DemoReport::new(
                &config,
                params,
                &estimate.flow,
                Some(estimate.residuals),
                Some(estimate.timing),
                Vec::new(),
            )
        }
    };

    println!(
        "{}x{} frames, true shift ({:.3}, {:.3}), mean flow ({:.3}, {:.3}), mean endpoint error {:.4}",
        report.frames.width,
        report.frames.height,
        report.frames.shift_x,
        report.frames.shift_y,
        report.flow.mean_u,
        report.flow.mean_v,
        report.mean_endpoint_error
    );
    write_json_file(&config.output.summary_json, &report)?;
    println!("Summary written to {}", config.output.summary_json.display());
    Ok(())
}

fn usage() -> String {
    "Usage: flow_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DemoReport {
    frames: SyntheticFramesConfig,
    params: FlowParams,
    flow: FlowSummary,
    mean_endpoint_error: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    residuals: Option<ResidualSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timing: Option<TimingBreakdown>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    levels: Vec<LevelReport>,
}

impl DemoReport {
    fn new(
        config: &FlowDemoConfig,
        params: FlowParams,
        flow: &FlowField,
        residuals: Option<ResidualSummary>,
        timing: Option<TimingBreakdown>,
        levels: Vec<LevelReport>,
    ) -> Self {
        Self {
            frames: config.frames.clone(),
            params,
            flow: FlowSummary::from_flow(flow),
            mean_endpoint_error: mean_endpoint_error(flow, &config.frames),
            residuals,
            timing,
            levels,
        }
    }
}

/// Mean distance between the estimated vectors and the true translation.
fn mean_endpoint_error(flow: &FlowField, frames: &SyntheticFramesConfig) -> f32 {
    let n = flow.u.data.len().max(1) as f32;
    let sum: f32 = flow
        .u
        .data
        .iter()
        .zip(&flow.v.data)
        .map(|(&u, &v)| (u - frames.shift_x).hypot(v - frames.shift_y))
        .sum();
    sum / n
}

fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}
