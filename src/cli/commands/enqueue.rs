use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use log::info;
use serde_json::{Map, Value};
use std::path::PathBuf;

use super::params::{GenerationArgs, merge_params, read_params_file};
use crate::api::{SchedulerClient, TaskKind};

#[derive(Args)]
pub struct EnqueueCommands {
    #[command(subcommand)]
    pub command: EnqueueSubcommands,
}

#[derive(Subcommand)]
pub enum EnqueueSubcommands {
    /// Queue a text-to-image task
    Txt2img(EnqueueArgs),
    /// Queue an image-to-image task (init images come from --params-file)
    Img2img(EnqueueArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct EnqueueArgs {
    #[command(flatten)]
    pub generation: GenerationArgs,
    /// Checkpoint to generate with, defaults to the one loaded in the web UI
    #[arg(long)]
    pub checkpoint: Option<String>,
    /// JSON object with further generation arguments; flags take precedence
    #[arg(long)]
    pub params_file: Option<PathBuf>,
}

impl EnqueueArgs {
    /// Request body for the enqueue endpoint
    pub fn body(&self, kind: TaskKind) -> Result<Map<String, Value>> {
        let base = match &self.params_file {
            Some(path) => read_params_file(path)?,
            None => Map::new(),
        };
        let mut body = merge_params(base, self.generation.to_params());
        if let Some(checkpoint) = &self.checkpoint {
            body.insert("checkpoint".to_string(), Value::String(checkpoint.clone()));
        }

        if kind == TaskKind::Img2Img && !body.get("init_images").is_some_and(Value::is_array) {
            anyhow::bail!("img2img needs an init_images array, pass it in --params-file");
        }
        Ok(body)
    }
}

pub async fn enqueue_command(args: EnqueueCommands, client: &SchedulerClient) -> Result<()> {
    let (kind, args) = match args.command {
        EnqueueSubcommands::Txt2img(args) => (TaskKind::Txt2Img, args),
        EnqueueSubcommands::Img2img(args) => (TaskKind::Img2Img, args),
    };

    let body = args.body(kind)?;
    info!("Queueing {} task with {} arguments", kind.as_str(), body.len());
    let response = client.enqueue(kind, &body).await?;

    println!(
        "{} Queued {} task {}",
        "✓".bright_green().bold(),
        kind.as_str(),
        response.task_id.bright_yellow().bold()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn txt2img_body_carries_flags_and_checkpoint() {
        let args = EnqueueArgs {
            generation: GenerationArgs {
                prompt: Some("a lighthouse".into()),
                seed: Some(-1),
                ..Default::default()
            },
            checkpoint: Some("sdxl_base.safetensors".into()),
            params_file: None,
        };
        let body = args.body(TaskKind::Txt2Img).unwrap();
        assert_eq!(body["prompt"], json!("a lighthouse"));
        assert_eq!(body["seed"], json!(-1));
        assert_eq!(body["checkpoint"], json!("sdxl_base.safetensors"));
    }

    #[test]
    fn img2img_without_init_images_is_rejected() {
        let args = EnqueueArgs {
            generation: GenerationArgs {
                prompt: Some("a lighthouse".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(args.body(TaskKind::Img2Img).is_err());
        assert!(args.body(TaskKind::Txt2Img).is_ok());
    }
}
