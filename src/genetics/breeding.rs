use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::genetics::genome::Genome;
use crate::genetics::mutation::rate_threshold;

/// Rates driving `Genome::breed`.
///
/// # Fields
/// - `double_crossover_rate` — probability of double-point crossover; single
///                             crossover is used otherwise
/// - `mutation_rate`         — per-bit flip probability applied to the child
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreedConfig {
    pub double_crossover_rate: f64,
    pub mutation_rate: f64,
}

impl BreedConfig {
    pub fn new(double_crossover_rate: f64, mutation_rate: f64) -> Result<Self> {
        let config = BreedConfig { double_crossover_rate, mutation_rate };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        rate_threshold("double crossover rate", self.double_crossover_rate)?;
        rate_threshold("mutation rate", self.mutation_rate)?;
        Ok(())
    }
}

impl Default for BreedConfig {
    fn default() -> Self {
        BreedConfig { double_crossover_rate: 0.5, mutation_rate: 0.01 }
    }
}

impl Genome {
    /// `offspring` with rates taken from `config`.
    pub fn breed<R: Rng + ?Sized>(
        &self,
        mate: &Genome,
        config: &BreedConfig,
        rng: &mut R,
    ) -> Result<Genome> {
        self.offspring(mate, config.double_crossover_rate, config.mutation_rate, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn defaults_are_valid() {
        assert!(BreedConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_rates() {
        assert!(BreedConfig::new(1.2, 0.0).is_err());
        assert!(BreedConfig::new(0.2, -0.5).is_err());
    }

    #[test]
    fn breed_matches_offspring_for_same_seed() {
        let config = BreedConfig::new(0.7, 0.02).unwrap();
        let a = Genome::random(40, &mut StdRng::seed_from_u64(1));
        let b = Genome::random(40, &mut StdRng::seed_from_u64(2));

        let bred = a.breed(&b, &config, &mut StdRng::seed_from_u64(9)).unwrap();
        let direct = a.offspring(&b, 0.7, 0.02, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(bred, direct);
    }
}
