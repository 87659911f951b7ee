use serde::{Deserialize, Serialize};

use crate::error::{NwpError, Result};

/// Parameters of the bundled dense next-word model.
///
/// All matrices are stored row-major:
/// - `embedding`: `vocab_size × embedding_dim`
/// - `kernel`: `embedding_dim × vocab_size`
/// - `bias`: `vocab_size`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Weights {
	pub vocab_size: usize,
	pub embedding_dim: usize,
	pub embedding: Vec<f32>,
	pub kernel: Vec<f32>,
	pub bias: Vec<f32>,
}

impl Weights {
	/// Checks that every matrix matches the declared dimensions.
	pub fn validate(&self) -> Result<()> {
		if self.vocab_size == 0 || self.embedding_dim == 0 {
			return Err(NwpError::ModelShape("vocab_size and embedding_dim must be > 0".to_owned()));
		}
		let expected = self.vocab_size.checked_mul(self.embedding_dim).ok_or_else(|| {
			NwpError::ModelShape(format!("{} × {} overflows", self.vocab_size, self.embedding_dim))
		})?;
		if self.embedding.len() != expected {
			return Err(NwpError::ModelShape(format!(
				"embedding has {} values, expected {expected}",
				self.embedding.len()
			)));
		}
		if self.kernel.len() != expected {
			return Err(NwpError::ModelShape(format!("kernel has {} values, expected {expected}", self.kernel.len())));
		}
		if self.bias.len() != self.vocab_size {
			return Err(NwpError::ModelShape(format!(
				"bias has {} values, expected {}",
				self.bias.len(),
				self.vocab_size
			)));
		}
		Ok(())
	}

	/// Embedding row of a token.
	pub(crate) fn embedding_row(&self, index: usize) -> &[f32] {
		let start = index * self.embedding_dim;
		&self.embedding[start..start + self.embedding_dim]
	}
}
