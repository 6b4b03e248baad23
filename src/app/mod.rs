// Application layer - Use case interactors

pub mod container;
pub mod extract_interactor;
pub mod inspect_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use extract_interactor::{ExtractInteractor, ExtractOptions, ExtractRequest, ExtractResponse};
pub use inspect_interactor::{InspectInteractor, InspectRequest, InspectResponse, ReportFormat};
