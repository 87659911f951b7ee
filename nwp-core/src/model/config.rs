use serde_json::Value;

use crate::error::{NwpError, Result};

/// Layer class carrying the model's input shape.
pub const INPUT_LAYER: &str = "InputLayer";

/// Returns the layer list of a model configuration.
///
/// Accepts both `{"config": {"layers": [...]}}` and a bare `{"layers": [...]}`.
pub fn layers(model_config: &Value) -> Result<&Vec<Value>> {
	model_config
		.pointer("/config/layers")
		.or_else(|| model_config.get("layers"))
		.and_then(Value::as_array)
		.ok_or_else(|| NwpError::ModelConfig("no layer list found".to_owned()))
}

/// Mutable variant of [`layers`].
pub fn layers_mut(model_config: &mut Value) -> Result<&mut Vec<Value>> {
	let path = if model_config.pointer("/config/layers").is_some() { "/config/layers" } else { "/layers" };
	model_config
		.pointer_mut(path)
		.and_then(Value::as_array_mut)
		.ok_or_else(|| NwpError::ModelConfig("no layer list found".to_owned()))
}

/// Whether a layer entry is an input layer.
pub fn is_input_layer(layer: &Value) -> bool {
	layer.get("class_name").and_then(Value::as_str) == Some(INPUT_LAYER)
}

/// Reads the input window length declared by the first input layer.
///
/// `input_shape` is `[L]` while the legacy `batch_shape` is `[batch, L]`.
/// Returns `Ok(None)` when the layer exists but the length is unset (`null`).
///
/// # Errors
/// Returns an error if the configuration has no layers or no input layer.
pub fn declared_window(model_config: &Value) -> Result<Option<usize>> {
	let layer = layers(model_config)?
		.iter()
		.find(|layer| is_input_layer(layer))
		.ok_or_else(|| NwpError::ModelConfig(format!("no {INPUT_LAYER} found")))?;

	let config = layer.get("config");
	let dimension = match config.and_then(|c| c.get("input_shape")) {
		Some(shape) => shape.get(0),
		None => config.and_then(|c| c.get("batch_shape")).and_then(|shape| shape.get(1)),
	};

	Ok(dimension.and_then(Value::as_u64).map(|len| len as usize))
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_reads_input_shape() {
		let config = json!({
			"class_name": "Sequential",
			"config": { "layers": [
				{ "class_name": "InputLayer", "config": { "input_shape": [7] } },
				{ "class_name": "Dense", "config": {} }
			]}
		});
		assert_eq!(declared_window(&config).unwrap(), Some(7));
	}

	#[test]
	fn test_reads_legacy_batch_shape() {
		let config = json!({ "layers": [
			{ "class_name": "InputLayer", "config": { "batch_shape": [null, 4] } }
		]});
		assert_eq!(declared_window(&config).unwrap(), Some(4));
	}

	#[test]
	fn test_unset_window() {
		let config = json!({ "layers": [
			{ "class_name": "InputLayer", "config": { "input_shape": [null] } }
		]});
		assert_eq!(declared_window(&config).unwrap(), None);
	}

	#[test]
	fn test_missing_input_layer() {
		let config = json!({ "layers": [ { "class_name": "Dense" } ] });
		assert!(matches!(declared_window(&config), Err(NwpError::ModelConfig(_))));
		assert!(declared_window(&json!({})).is_err());
	}
}
