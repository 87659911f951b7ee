//! Next-word text generation library.
//!
//! This crate extends a text prompt word by word using a pretrained sequence
//! model:
//! - Vocabulary lookups (text → indices, index → word)
//! - Fixed-length input windows
//! - Temperature-scaled categorical sampling
//! - A next-word predictor and the generation loop on top of it
//! - Settings shared by the front ends and a legacy model-file patcher
//!
//! Models and vocabularies are loaded once and injected; nothing is cached
//! globally.

pub mod error;

/// Generation loop and its report.
pub mod generator;

/// I/O helpers (path handling, model listing).
pub mod io;

/// Sequence models and the bundled dense model.
pub mod model;

/// Migration of legacy model bundles.
pub mod patch;

/// Single next-word prediction.
pub mod predictor;

/// Temperature sampling.
pub mod sampler;

/// Application settings.
pub mod settings;

pub mod vocabulary;

pub mod window;

pub use error::{NwpError, Result};
pub use generator::{GenerationReport, Generator};
pub use predictor::{NextWordPredictor, UNKNOWN_TOKEN};
pub use sampler::TemperatureSampler;
pub use settings::Settings;
pub use vocabulary::Vocabulary;
