//! JSON configuration for the library and the demo tool.

pub mod flow;
pub mod flow_demo;

pub use flow::{load_flow_config, FlowConfig};
