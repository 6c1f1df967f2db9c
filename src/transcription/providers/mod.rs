pub mod assembly_api;

pub use assembly_api::{AssemblyAIProvider, TranscriptionFeatures};
