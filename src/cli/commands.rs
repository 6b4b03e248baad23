//! Command implementations

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info};

use crate::adapters::toml_config::AppSettings;
use crate::app::{AppContainer, ExtractRequest, ExtractResponse, InspectRequest};
use crate::cli::args::{ExtractArgs, ProbeArgs};
use crate::config_initialization::build_processing_config;
use crate::domain::model::SourceMetadata;
use crate::error::FrameXError;

/// Machine-readable result of the extract command
#[derive(Debug, Serialize)]
pub struct ExtractSummary {
    pub input: PathBuf,
    pub source: SourceMetadata,
    pub frames: usize,
    pub width: u32,
    pub height: u32,
    pub output_dir: Option<PathBuf>,
    pub persisted: usize,
    pub elapsed_secs: f64,
}

impl ExtractSummary {
    pub fn new(input: PathBuf, output_dir: Option<PathBuf>, response: &ExtractResponse) -> Self {
        Self {
            input,
            source: response.source.clone(),
            frames: response.frames.len(),
            width: response.plan.target_width,
            height: response.plan.target_height,
            output_dir,
            persisted: response.persisted,
            elapsed_secs: response.elapsed.as_secs_f64(),
        }
    }

    pub fn to_text(&self) -> String {
        let mut output = format!(
            "Extracted {} frame(s) at {}x{} from {} in {:.2}s\n",
            self.frames,
            self.width,
            self.height,
            self.input.display(),
            self.elapsed_secs
        );
        if let Some(dir) = &self.output_dir {
            output.push_str(&format!("Wrote {} JPEG file(s) to {}\n", self.persisted, dir.display()));
        }
        output
    }
}

/// Execute the extract command
pub async fn extract(container: &dyn AppContainer, settings: &AppSettings, args: ExtractArgs) -> Result<()> {
    let config = build_processing_config(settings, &args).context("Invalid extraction options")?;
    let output_dir = config.output_dir.clone();

    let response = container
        .extract_interactor()
        .execute(ExtractRequest::new(&args.input, config))
        .await
        .map_err(|e| {
            report_diagnostics(&e);
            e
        })
        .with_context(|| format!("Frame extraction failed for {}", args.input.display()))?;

    let summary = ExtractSummary::new(args.input, output_dir, &response);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary.to_text());
    }
    info!("Extract command completed");
    Ok(())
}

/// Log whatever the decoder wrote to stderr before it failed
fn report_diagnostics(err: &FrameXError) {
    if let Some(diagnostics) = err.diagnostics() {
        error!("Decoder stderr output:\n{}", diagnostics.trim_end());
    }
}

/// Execute the probe command
pub async fn probe(container: &dyn AppContainer, args: ProbeArgs) -> Result<()> {
    let response = container
        .inspect_interactor()
        .execute(InspectRequest {
            input: args.input.clone(),
            format: args.format.into(),
        })
        .await
        .with_context(|| format!("Failed to probe {}", args.input.display()))?;

    print!("{}", response.summary);
    if !response.summary.ends_with('\n') {
        println!();
    }
    Ok(())
}
