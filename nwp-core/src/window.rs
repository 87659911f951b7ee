/// Index used to left-pad short contexts.
pub const PAD_INDEX: usize = 0;

/// Window length used when a model does not declare one.
pub const DEFAULT_WINDOW: usize = 5;

/// Fits a token sequence to exactly `len` indices.
///
/// - Longer sequences keep their last `len` indices.
/// - Shorter sequences are left-padded with [`PAD_INDEX`].
pub fn fit_window(indices: &[usize], len: usize) -> Vec<usize> {
	let tail = &indices[indices.len().saturating_sub(len)..];
	let mut window = vec![PAD_INDEX; len - tail.len()];
	window.extend_from_slice(tail);
	window
}

/// Resolves the effective window length from what a model declares.
///
/// Zero or missing lengths fall back to `fallback`.
pub fn resolve_window(declared: Option<usize>, fallback: usize) -> usize {
	match declared {
		Some(len) if len > 0 => len,
		_ => {
			log::warn!("Model declares no input window, using {fallback}");
			fallback
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_pads_on_the_left() {
		assert_eq!(fit_window(&[7, 8], 5), vec![0, 0, 0, 7, 8]);
	}

	#[test]
	fn test_keeps_last_indices() {
		assert_eq!(fit_window(&[1, 2, 3, 4, 5, 6, 7], 3), vec![5, 6, 7]);
	}

	#[test]
	fn test_empty_context() {
		assert_eq!(fit_window(&[], 4), vec![0; 4]);
	}

	#[test]
	fn test_resolve_window() {
		assert_eq!(resolve_window(Some(7), 5), 7);
		assert_eq!(resolve_window(Some(0), 5), 5);
		assert_eq!(resolve_window(None, 5), 5);
	}

	proptest! {
		#[test]
		fn window_always_has_requested_length(
			indices in prop::collection::vec(1usize..1000, 0..40),
			len in 1usize..16,
		) {
			let window = fit_window(&indices, len);
			prop_assert_eq!(window.len(), len);

			let kept = indices.len().min(len);
			prop_assert_eq!(&window[len - kept..], &indices[indices.len() - kept..]);
			prop_assert!(window[..len - kept].iter().all(|&i| i == PAD_INDEX));
		}
	}
}
