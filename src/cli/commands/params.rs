//! Generation parameters shared by `enqueue` and `task update`

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value, json};
use std::fs;
use std::path::Path;

/// Flags mapping onto the web UI's generation arguments
#[derive(Args, Debug, Clone, Default)]
pub struct GenerationArgs {
    /// Positive prompt
    #[arg(long)]
    pub prompt: Option<String>,
    /// Negative prompt
    #[arg(long)]
    pub negative_prompt: Option<String>,
    /// Sampling steps
    #[arg(long)]
    pub steps: Option<u32>,
    /// Classifier-free guidance scale
    #[arg(long)]
    pub cfg_scale: Option<f64>,
    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,
    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,
    /// Sampler name, see `agent-scheduler samplers`
    #[arg(long)]
    pub sampler: Option<String>,
    /// Images per batch
    #[arg(long)]
    pub batch_size: Option<u32>,
    /// Number of batches
    #[arg(long)]
    pub n_iter: Option<u32>,
    /// Seed, -1 for random
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i64>,
}

impl GenerationArgs {
    /// Only the flags that were given, under their API names
    pub fn to_params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        let mut set = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                params.insert(key.to_string(), value);
            }
        };

        set("prompt", self.prompt.as_ref().map(|v| json!(v)));
        set("negative_prompt", self.negative_prompt.as_ref().map(|v| json!(v)));
        set("steps", self.steps.map(|v| json!(v)));
        set("cfg_scale", self.cfg_scale.map(|v| json!(v)));
        set("width", self.width.map(|v| json!(v)));
        set("height", self.height.map(|v| json!(v)));
        set("sampler_name", self.sampler.as_ref().map(|v| json!(v)));
        set("batch_size", self.batch_size.map(|v| json!(v)));
        set("n_iter", self.n_iter.map(|v| json!(v)));
        set("seed", self.seed.map(|v| json!(v)));
        params
    }
}

/// Read a JSON object of generation arguments
pub fn read_params_file(path: &Path) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read params file: {:?}", path))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Params file is not valid JSON: {:?}", path))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("Params file must contain a JSON object: {:?}", path),
    }
}

/// Overlay flag values on top of file values
pub fn merge_params(mut base: Map<String, Value>, overrides: Map<String, Value>) -> Map<String, Value> {
    base.extend(overrides);
    base
}
