//! Sequence models producing next-word distributions.
//!
//! - `SequenceModel`: the inference seam used by the predictor
//! - `DenseModel`: the bundled bag-of-embeddings model
//! - `config`: helpers over the layered model configuration
//! - `Weights`: the dense model's parameters

use crate::error::Result;

/// Layered model configuration helpers (input window, layer lookup).
pub mod config;

/// Bundled dense model and its JSON / binary-cache loading.
pub mod dense;

mod weights;

pub use dense::{DenseModel, ModelBundle};
pub use weights::Weights;

/// A pretrained model mapping a fixed-length index window to a probability
/// vector over the vocabulary.
///
/// Implementations must not mutate shared state in `infer`; the generator
/// treats models as read-only for the lifetime of the process.
pub trait SequenceModel {
	/// Window length declared by the model, if any. `None` or `Some(0)` means
	/// the caller picks a default.
	fn input_window(&self) -> Option<usize>;

	/// Size of the probability vectors returned by [`infer`](Self::infer).
	fn vocab_size(&self) -> usize;

	/// Runs one forward pass.
	///
	/// # Errors
	/// Malformed input (wrong length, unknown index) is fatal and propagated.
	fn infer(&self, sequence: &[usize]) -> Result<Vec<f32>>;
}

impl<M: SequenceModel + ?Sized> SequenceModel for &M {
	fn input_window(&self) -> Option<usize> {
		(**self).input_window()
	}

	fn vocab_size(&self) -> usize {
		(**self).vocab_size()
	}

	fn infer(&self, sequence: &[usize]) -> Result<Vec<f32>> {
		(**self).infer(sequence)
	}
}

impl<M: SequenceModel + ?Sized> SequenceModel for Box<M> {
	fn input_window(&self) -> Option<usize> {
		(**self).input_window()
	}

	fn vocab_size(&self) -> usize {
		(**self).vocab_size()
	}

	fn infer(&self, sequence: &[usize]) -> Result<Vec<f32>> {
		(**self).infer(sequence)
	}
}
