use std::sync::Arc;

use crate::adapters::toml_config::AppSettings;
use crate::adapters::{FFmpegAdapter, FFprobeAdapter};
use crate::app::extract_interactor::{ExtractInteractor, ExtractOptions};
use crate::app::inspect_interactor::InspectInteractor;
use crate::ports::{DecodePort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn extract_interactor(&self) -> Arc<ExtractInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
}

/// Wires the ffprobe and ffmpeg adapters into the interactors
pub struct DefaultAppContainer {
    extract_interactor: Arc<ExtractInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
}

impl DefaultAppContainer {
    pub fn new(settings: &AppSettings) -> Self {
        let probe_port = Arc::new(FFprobeAdapter::with_binary(&settings.decoder.ffprobe_path));
        let decode_port = Arc::new(FFmpegAdapter::with_binary(&settings.decoder.ffmpeg_path));

        let extract_interactor = Arc::new(
            ExtractInteractor::new(
                Arc::clone(&probe_port) as Arc<dyn ProbePort>,
                Arc::clone(&decode_port) as Arc<dyn DecodePort>,
            )
            .with_options(ExtractOptions {
                chunk_capacity: settings.decoder.chunk_capacity,
                jpeg_quality: settings.extraction.jpeg_quality,
            }),
        );

        let inspect_interactor = Arc::new(InspectInteractor::new(
            Arc::clone(&probe_port) as Arc<dyn ProbePort>,
        ));

        Self {
            extract_interactor,
            inspect_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn extract_interactor(&self) -> Arc<ExtractInteractor> {
        Arc::clone(&self.extract_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }
}
