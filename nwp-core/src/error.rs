use thiserror::Error;

/// Errors raised while loading assets or running a generation.
///
/// Early termination on the unknown sentinel is *not* an error: it is a
/// normal outcome of [`Generator::generate`](crate::generator::Generator::generate).
#[derive(Debug, Error)]
pub enum NwpError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Binary cache error: {0}")]
	Cache(#[from] postcard::Error),

	/// Temperature must be a finite value strictly greater than zero.
	#[error("Temperature must be > 0, got {0}")]
	InvalidTemperature(f32),

	/// The model returned an empty probability vector.
	#[error("Cannot sample from an empty distribution")]
	EmptyDistribution,

	/// The model was fed a sequence of the wrong length.
	#[error("Input window mismatch: expected {expected} indices, got {got}")]
	WindowMismatch { expected: usize, got: usize },

	/// A token index does not fit the model's vocabulary.
	#[error("Token index {index} out of range for vocabulary of size {size}")]
	TokenOutOfRange { index: usize, size: usize },

	/// Weights or layers do not agree with each other.
	#[error("Invalid model shape: {0}")]
	ModelShape(String),

	/// The model bundle has no usable configuration.
	#[error("Invalid model config: {0}")]
	ModelConfig(String),

	#[error("Invalid setting: {0}")]
	InvalidSetting(String),
}

/// Result type for next-word operations.
pub type Result<T> = std::result::Result<T, NwpError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display() {
		let err = NwpError::WindowMismatch { expected: 5, got: 3 };
		let msg = err.to_string();
		assert!(msg.contains('5'));
		assert!(msg.contains('3'));

		let err = NwpError::InvalidTemperature(-1.0);
		assert!(err.to_string().contains("-1"));
	}

	#[test]
	fn test_io_error_converts() {
		fn open() -> Result<()> {
			std::fs::read("/definitely/not/here.json")?;
			Ok(())
		}
		assert!(matches!(open(), Err(NwpError::Io(_))));
	}

	#[test]
	fn test_error_is_send_sync() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<NwpError>();
	}
}
