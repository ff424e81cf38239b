pub mod effects;
pub mod presentation;
pub mod service;
pub mod settings;
pub mod sources;
pub mod window;

// Re-exports for convenience
pub use effects::{EffectScheduler, EffectState, EffectUpdate};
pub use presentation::{PresentationCoordinator, PresentationSurface};
pub use service::{DisplayService, ServiceCommand, ServiceHandle, SharedState};
pub use settings::SettingsStore;
pub use sources::{PhotoEvent, PhotoSource, SettingsEvent, SettingsSource, SourceError};
pub use window::{MergeOutcome, PhotoWindow};
