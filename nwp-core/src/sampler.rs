use rand::Rng;

use crate::error::{NwpError, Result};

/// Temperature used when none is configured.
pub const DEFAULT_TEMPERATURE: f32 = 0.8;

/// Floor added to every probability before taking its logarithm.
const EPSILON: f64 = 1e-8;

/// Temperature-scaled categorical sampler.
///
/// The distribution is rescaled in log-space (`ln(p + ε) / t`), exponentiated,
/// renormalized, then a single index is drawn by weighted random sampling.
/// Temperatures below 1 sharpen the distribution toward its mode, above 1
/// flatten it toward uniform.
///
/// ## Invariants
/// - `temperature` is finite and strictly positive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSampler {
	temperature: f32,
}

impl Default for TemperatureSampler {
	fn default() -> Self {
		Self { temperature: DEFAULT_TEMPERATURE }
	}
}

impl TemperatureSampler {
	/// Creates a sampler for the given temperature.
	///
	/// # Errors
	/// Returns an error if `temperature` is not finite or not > 0.
	pub fn new(temperature: f32) -> Result<Self> {
		if !temperature.is_finite() || temperature <= 0.0 {
			return Err(NwpError::InvalidTemperature(temperature));
		}
		Ok(Self { temperature })
	}

	pub fn temperature(&self) -> f32 {
		self.temperature
	}

	/// Rescales `probabilities` by the temperature and renormalizes them.
	///
	/// The maximum log-value is subtracted before exponentiating so that very
	/// small temperatures do not underflow every weight to zero.
	pub fn rescale(&self, probabilities: &[f32]) -> Vec<f64> {
		let t = self.temperature as f64;
		let scaled: Vec<f64> = probabilities
			.iter()
			.map(|&p| (p.max(0.0) as f64 + EPSILON).ln() / t)
			.collect();
		let max = scaled.iter().copied().fold(f64::NEG_INFINITY, f64::max);

		let weights: Vec<f64> = scaled.iter().map(|s| (s - max).exp()).collect();
		let total: f64 = weights.iter().sum();
		weights.into_iter().map(|w| w / total).collect()
	}

	/// Draws one index in `[0, probabilities.len())`.
	///
	/// # Errors
	/// Returns an error if `probabilities` is empty.
	pub fn sample<R: Rng + ?Sized>(&self, probabilities: &[f32], rng: &mut R) -> Result<usize> {
		if probabilities.is_empty() {
			return Err(NwpError::EmptyDistribution);
		}

		let distribution = self.rescale(probabilities);

		// Cumulative subtraction over the buckets
		let mut r: f64 = rng.random();
		let mut fallback = 0;
		for (index, weight) in distribution.iter().enumerate() {
			if r < *weight {
				return Ok(index);
			}
			r -= weight;
			if *weight > 0.0 {
				fallback = index;
			}
		}

		// Rounding left a sliver past the last bucket
		Ok(fallback)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn test_rejects_bad_temperature() {
		assert!(matches!(TemperatureSampler::new(0.0), Err(NwpError::InvalidTemperature(_))));
		assert!(TemperatureSampler::new(-0.5).is_err());
		assert!(TemperatureSampler::new(f32::NAN).is_err());
		assert!(TemperatureSampler::new(f32::INFINITY).is_err());
		assert!(TemperatureSampler::new(0.01).is_ok());
	}

	#[test]
	fn test_default_temperature() {
		assert_eq!(TemperatureSampler::default().temperature(), DEFAULT_TEMPERATURE);
	}

	#[test]
	fn test_empty_distribution() {
		let sampler = TemperatureSampler::default();
		let mut rng = StdRng::seed_from_u64(1);
		assert!(matches!(sampler.sample(&[], &mut rng), Err(NwpError::EmptyDistribution)));
	}

	#[test]
	fn test_rescale_sums_to_one() {
		let sampler = TemperatureSampler::new(0.5).unwrap();
		let rescaled = sampler.rescale(&[0.1, 0.2, 0.7]);
		let total: f64 = rescaled.iter().sum();
		assert!((total - 1.0).abs() < 1e-9);
		// Sharpening keeps the order but widens the gap
		assert!(rescaled[2] > 0.7);
		assert!(rescaled[0] < rescaled[1]);
	}

	#[test]
	fn test_temperature_one_is_identity() {
		let sampler = TemperatureSampler::new(1.0).unwrap();
		let rescaled = sampler.rescale(&[0.25, 0.25, 0.5]);
		assert!((rescaled[0] - 0.25).abs() < 1e-6);
		assert!((rescaled[2] - 0.5).abs() < 1e-6);
	}

	#[test]
	fn test_high_temperature_flattens() {
		let sampler = TemperatureSampler::new(100.0).unwrap();
		let rescaled = sampler.rescale(&[0.05, 0.05, 0.9]);
		assert!(rescaled.iter().all(|p| (p - 1.0 / 3.0).abs() < 0.02));
	}

	#[test]
	fn test_all_zero_is_uniform() {
		let sampler = TemperatureSampler::default();
		let rescaled = sampler.rescale(&[0.0; 4]);
		assert!(rescaled.iter().all(|p| (p - 0.25).abs() < 1e-12));
	}

	#[test]
	fn test_low_temperature_converges_to_mode() {
		let sampler = TemperatureSampler::new(0.01).unwrap();
		let mut rng = StdRng::seed_from_u64(42);
		let probabilities = [0.2, 0.35, 0.3, 0.15];
		for _ in 0..500 {
			assert_eq!(sampler.sample(&probabilities, &mut rng).unwrap(), 1);
		}
	}

	#[test]
	fn test_sampling_follows_distribution() {
		let sampler = TemperatureSampler::new(1.0).unwrap();
		let mut rng = StdRng::seed_from_u64(7);
		let mut counts = [0usize; 2];
		for _ in 0..10_000 {
			counts[sampler.sample(&[0.8, 0.2], &mut rng).unwrap()] += 1;
		}
		let ratio = counts[0] as f64 / 10_000.0;
		assert!((ratio - 0.8).abs() < 0.03, "ratio was {ratio}");
	}

	proptest! {
		#[test]
		fn sample_is_in_range(
			probabilities in prop::collection::vec(0.0f32..1.0, 1..64),
			temperature in 0.01f32..10.0,
			seed in any::<u64>(),
		) {
			let sampler = TemperatureSampler::new(temperature).unwrap();
			let mut rng = StdRng::seed_from_u64(seed);
			let index = sampler.sample(&probabilities, &mut rng).unwrap();
			prop_assert!(index < probabilities.len());
		}
	}
}
