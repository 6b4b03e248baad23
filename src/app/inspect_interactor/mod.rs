// Inspect interactor - Orchestrates the source inspection use case

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::domain::model::SourceMetadata;
use crate::error::{FrameXError, FrameXResult};
use crate::ports::ProbePort;

/// Rendering of an inspection report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Request for source inspection
#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub input: PathBuf,
    pub format: ReportFormat,
}

/// Response from source inspection
#[derive(Debug, Clone)]
pub struct InspectResponse {
    pub metadata: SourceMetadata,
    pub summary: String,
}

/// Interactor for source inspection use case
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
}

impl InspectInteractor {
    pub fn new(probe_port: Arc<dyn ProbePort>) -> Self {
        Self { probe_port }
    }

    /// Probe the source and render its metadata
    pub async fn execute(&self, request: InspectRequest) -> FrameXResult<InspectResponse> {
        info!("Inspecting {}", request.input.display());
        let metadata = self.probe_port.probe_source(&request.input).await?;

        let summary = match request.format {
            ReportFormat::Json => serde_json::to_string_pretty(&metadata)
                .map_err(|e| FrameXError::configuration(format!("JSON serialization failed: {}", e)))?,
            ReportFormat::Yaml => serde_yaml::to_string(&metadata)
                .map_err(|e| FrameXError::configuration(format!("YAML serialization failed: {}", e)))?,
            ReportFormat::Text => format_as_text(&request, &metadata),
        };

        Ok(InspectResponse { metadata, summary })
    }
}

fn format_as_text(request: &InspectRequest, metadata: &SourceMetadata) -> String {
    let mut output = String::new();
    output.push_str("Source Information:\n");
    output.push_str(&format!("  File: {}\n", request.input.display()));
    if let Some(container) = &metadata.container {
        output.push_str(&format!("  Container: {}\n", container));
    }
    output.push_str(&format!("  Codec: {}\n", metadata.codec));
    output.push_str(&format!(
        "  Resolution: {}x{} ({:.3}:1)\n",
        metadata.width,
        metadata.height,
        metadata.aspect_ratio()
    ));
    match metadata.frame_rate {
        Some(rate) => output.push_str(&format!("  Frame Rate: {:.3} fps\n", rate)),
        None => output.push_str("  Frame Rate: unknown\n"),
    }
    match metadata.duration {
        Some(duration) => output.push_str(&format!("  Duration: {}\n", duration.format_hms())),
        None => output.push_str("  Duration: unknown\n"),
    }
    output
}
