//! One-off migration for model bundles saved by older exporters.
//!
//! Older files describe the input layer with `batch_shape` (`[batch, L]`);
//! current loaders expect `input_shape` (`[L]`).

use std::path::Path;

use serde_json::Value;

use crate::error::{NwpError, Result};
use crate::model::config::{is_input_layer, layers_mut};

/// Key under which a bundle stores its layered configuration.
pub const MODEL_CONFIG_KEY: &str = "model_config";

/// Rewrites every input layer's `batch_shape` into `input_shape`.
///
/// Returns the number of layers changed. Layers already using `input_shape`
/// are left untouched.
pub fn strip_batch_shape(model_config: &mut Value) -> Result<usize> {
	let mut patched = 0;
	for layer in layers_mut(model_config)?.iter_mut().filter(|layer| is_input_layer(layer)) {
		let Some(config) = layer.get_mut("config").and_then(Value::as_object_mut) else {
			continue;
		};
		let Some(batch_shape) = config.remove("batch_shape") else {
			continue;
		};
		let input_shape = match batch_shape {
			Value::Array(dims) => Value::Array(dims.into_iter().skip(1).collect()),
			other => {
				return Err(NwpError::ModelConfig(format!("batch_shape must be an array, got {other}")));
			}
		};
		config.insert("input_shape".to_owned(), input_shape);
		patched += 1;
	}
	Ok(patched)
}

/// Patches the bundle at `old` and writes the corrected copy to `new`.
///
/// The configuration may be stored either as a JSON object or, as some
/// exporters do, as a JSON-encoded string; the same encoding is written back.
///
/// # Errors
/// Returns an error if the bundle cannot be read, has no `model_config`, or
/// the output cannot be written.
pub fn fix_model_file<P: AsRef<Path>, Q: AsRef<Path>>(old: P, new: Q) -> Result<usize> {
	let bytes = std::fs::read(old.as_ref())?;
	let mut bundle: Value = serde_json::from_slice(&bytes)?;

	let slot = bundle
		.get_mut(MODEL_CONFIG_KEY)
		.ok_or_else(|| NwpError::ModelConfig(format!("missing '{MODEL_CONFIG_KEY}'")))?;

	let patched = match slot {
		Value::String(encoded) => {
			let mut model_config: Value = serde_json::from_str(encoded)?;
			let patched = strip_batch_shape(&mut model_config)?;
			*encoded = serde_json::to_string(&model_config)?;
			patched
		}
		model_config => strip_batch_shape(model_config)?,
	};

	std::fs::write(new.as_ref(), serde_json::to_vec_pretty(&bundle)?)?;
	log::info!(
		"Patched {patched} input layer(s): {} -> {}",
		old.as_ref().display(),
		new.as_ref().display()
	);
	Ok(patched)
}
