use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::declared_window;
use super::weights::Weights;
use super::SequenceModel;
use crate::error::{NwpError, Result};
use crate::io::build_output_path;
use crate::window::PAD_INDEX;

/// JSON model bundle: a layered configuration plus the weights.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ModelBundle {
	pub model_config: Value,
	pub weights: Weights,
}

/// Compact form written to the `.bin` cache next to a bundle.
#[derive(Serialize, Deserialize)]
struct CachedModel {
	window: Option<usize>,
	weights: Weights,
}

/// Small bag-of-embeddings next-word model.
///
/// The window tokens (padding excluded) are embedded and averaged, projected
/// through a dense layer and turned into probabilities with a softmax.
///
/// # Invariants
/// - weights are validated at construction
/// - output length is always `vocab_size`
#[derive(Debug, Clone)]
pub struct DenseModel {
	window: Option<usize>,
	weights: Weights,
}

impl DenseModel {
	/// Creates a model from validated weights.
	///
	/// # Errors
	/// Returns an error if the weight shapes are inconsistent.
	pub fn new(window: Option<usize>, weights: Weights) -> Result<Self> {
		weights.validate()?;
		Ok(Self { window, weights })
	}

	/// Builds a model from an in-memory bundle.
	pub fn from_bundle(bundle: ModelBundle) -> Result<Self> {
		// Some exporters store the configuration as an encoded JSON string
		let window = match &bundle.model_config {
			Value::String(encoded) => declared_window(&serde_json::from_str(encoded)?)?,
			model_config => declared_window(model_config)?,
		};
		Self::new(window, bundle.weights)
	}

	/// Loads a model bundle, going through a binary cache when possible.
	///
	/// - `path` is the JSON bundle.
	/// - If a sibling `.bin` file exists and is not older than the bundle, it
	///   is decoded with `postcard` instead.
	/// - Otherwise the bundle is parsed and the cache (re)written. A failed
	///   cache write is logged and the parsed model returned anyway.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let cache_path = build_output_path(path, "bin")?;

		let model = if Self::cache_is_fresh(path, &cache_path) {
			let bytes = std::fs::read(&cache_path)?;
			let cached: CachedModel = postcard::from_bytes(&bytes)?;
			log::debug!("Read model cache {}", cache_path.display());
			Self::new(cached.window, cached.weights)?
		} else {
			let bytes = std::fs::read(path)?;
			let bundle: ModelBundle = serde_json::from_slice(&bytes)?;
			let model = Self::from_bundle(bundle)?;
			if let Err(e) = model.write_cache(&cache_path) {
				log::warn!("Could not write model cache {}: {e}", cache_path.display());
			}
			model
		};

		log::info!(
			"Loaded model {} (vocabulary {}, window {:?})",
			path.display(),
			model.weights.vocab_size,
			model.window
		);
		Ok(model)
	}

	fn cache_is_fresh(source: &Path, cache: &Path) -> bool {
		let modified = |p: &Path| {
			std::fs::metadata(p)
				.ok()
				.filter(|m| m.is_file())
				.and_then(|m| m.modified().ok())
		};
		match (modified(source), modified(cache)) {
			(Some(source), Some(cache)) => cache >= source,
			(None, Some(_)) => true,
			_ => false,
		}
	}

	fn write_cache(&self, cache_path: &Path) -> Result<()> {
		let cached = CachedModel { window: self.window, weights: self.weights.clone() };
		let bytes = postcard::to_stdvec(&cached)?;
		std::fs::write(cache_path, bytes)?;
		log::debug!("Wrote model cache {}", cache_path.display());
		Ok(())
	}

	pub fn weights(&self) -> &Weights {
		&self.weights
	}
}

impl SequenceModel for DenseModel {
	fn input_window(&self) -> Option<usize> {
		self.window
	}

	fn vocab_size(&self) -> usize {
		self.weights.vocab_size
	}

	fn infer(&self, sequence: &[usize]) -> Result<Vec<f32>> {
		if let Some(expected) = self.window.filter(|len| *len > 0) {
			if sequence.len() != expected {
				return Err(NwpError::WindowMismatch { expected, got: sequence.len() });
			}
		}

		let w = &self.weights;
		let mut hidden = vec![0.0f32; w.embedding_dim];
		let mut count = 0usize;
		for &index in sequence {
			if index >= w.vocab_size {
				return Err(NwpError::TokenOutOfRange { index, size: w.vocab_size });
			}
			if index == PAD_INDEX {
				continue;
			}
			for (h, e) in hidden.iter_mut().zip(w.embedding_row(index)) {
				*h += e;
			}
			count += 1;
		}
		if count > 0 {
			hidden.iter_mut().for_each(|h| *h /= count as f32);
		}

		let mut logits = w.bias.clone();
		for (d, h) in hidden.iter().enumerate() {
			let row = &w.kernel[d * w.vocab_size..(d + 1) * w.vocab_size];
			for (logit, k) in logits.iter_mut().zip(row) {
				*logit += h * k;
			}
		}

		Ok(softmax(&logits))
	}
}

fn softmax(logits: &[f32]) -> Vec<f32> {
	let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
	let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
	let total: f32 = exps.iter().sum();
	exps.into_iter().map(|e| e / total).collect()
}
