use rand::Rng;

use crate::error::{EvoError, Result};
use crate::genetics::genome::Genome;

/// Probabilities are evaluated at 1/10000 resolution.
pub const RATE_RESOLUTION: u32 = 10_000;

/// Converts a rate in `[0, 1]` to a threshold on a draw in `0..RATE_RESOLUTION`.
pub(crate) fn rate_threshold(name: &str, rate: f64) -> Result<u32> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(EvoError::InvalidArgument(format!(
            "{name} must lie in [0, 1], got {rate}"
        )));
    }
    Ok((rate * f64::from(RATE_RESOLUTION)).round() as u32)
}

/// True with probability `threshold / RATE_RESOLUTION`.
fn hit<R: Rng + ?Sized>(threshold: u32, rng: &mut R) -> bool {
    rng.gen_range(0..RATE_RESOLUTION) < threshold
}

impl Genome {
    /// Flips each bit independently with probability `rate`.
    ///
    /// `rate = 0` returns an identical genome, `rate = 1` the complement.
    pub fn mutate<R: Rng + ?Sized>(&self, rate: f64, rng: &mut R) -> Result<Genome> {
        let threshold = rate_threshold("mutation rate", rate)?;
        let mut flips = 0usize;
        let genes = self
            .bits()
            .iter()
            .map(|&bit| {
                if hit(threshold, rng) {
                    flips += 1;
                    !bit
                } else {
                    bit
                }
            })
            .collect();
        log::trace!("mutation flipped {flips} of {} bits", self.len());
        Ok(Genome::from_bits(genes))
    }

    /// Crossover with `mate` followed by mutation.
    ///
    /// With probability `dbl_rate` a double-point crossover at a random
    /// `start` in `1..len` and `length` in `1..=len-start`; otherwise a
    /// single-point crossover at a random `start` in `1..len`. Genomes of one
    /// bit or fewer skip crossover and are only mutated.
    pub fn offspring<R: Rng + ?Sized>(
        &self,
        mate: &Genome,
        dbl_rate: f64,
        mut_rate: f64,
        rng: &mut R,
    ) -> Result<Genome> {
        self.ensure_mate(mate)?;
        let dbl_threshold = rate_threshold("double crossover rate", dbl_rate)?;
        rate_threshold("mutation rate", mut_rate)?;

        let len = self.len();
        let child = if len <= 1 {
            log::debug!("genome of {len} bits, skipping crossover");
            self.clone()
        } else if hit(dbl_threshold, rng) {
            let start = rng.gen_range(1..len);
            let length = rng.gen_range(1..=len - start);
            log::debug!("double crossover at {start} for {length} bits");
            self.dbl_cross(mate, start, length)?
        } else {
            let start = rng.gen_range(1..len);
            log::debug!("single crossover at {start}");
            self.sng_cross(mate, start)?
        };

        child.mutate(mut_rate, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn g(s: &str) -> Genome {
        s.parse().unwrap()
    }

    #[test]
    fn zero_rate_is_identity() {
        let mut rng = StdRng::seed_from_u64(11);
        let parent = Genome::random(500, &mut rng);
        assert_eq!(parent.mutate(0.0, &mut rng).unwrap(), parent);
    }

    #[test]
    fn full_rate_complements_every_bit() {
        let mut rng = StdRng::seed_from_u64(12);
        assert_eq!(g("110010").mutate(1.0, &mut rng).unwrap().to_string(), "001101");
    }

    #[test]
    fn mutation_does_not_touch_receiver() {
        let mut rng = StdRng::seed_from_u64(13);
        let parent = g("101010");
        let _ = parent.mutate(1.0, &mut rng).unwrap();
        assert_eq!(parent.to_string(), "101010");
    }

    #[test]
    fn rate_outside_unit_interval_fails() {
        let mut rng = StdRng::seed_from_u64(14);
        assert!(g("10").mutate(1.5, &mut rng).is_err());
        assert!(g("10").mutate(-0.1, &mut rng).is_err());
        assert!(g("10").mutate(f64::NAN, &mut rng).is_err());
    }

    #[test]
    fn flip_frequency_tracks_rate() {
        let mut rng = StdRng::seed_from_u64(15);
        let parent = Genome::random(20_000, &mut rng);
        let child = parent.mutate(0.1, &mut rng).unwrap();
        let flips = parent.distance(&child).unwrap();
        assert!((1_700..2_300).contains(&flips), "flips = {flips}");
    }

    #[test]
    fn offspring_keeps_parent_length() {
        let mut rng = StdRng::seed_from_u64(16);
        let a = Genome::random(64, &mut rng);
        let b = Genome::random(64, &mut rng);
        for dbl_rate in [0.0, 0.5, 1.0] {
            for _ in 0..50 {
                let child = a.offspring(&b, dbl_rate, 0.05, &mut rng).unwrap();
                assert_eq!(child.len(), 64);
            }
        }
    }

    #[test]
    fn offspring_without_mutation_mixes_only_parent_bits() {
        let mut rng = StdRng::seed_from_u64(17);
        let a = g("0000000000");
        let b = g("1111111111");
        for _ in 0..50 {
            let child = a.offspring(&b, 0.0, 0.0, &mut rng).unwrap().to_string();
            // single crossover: a prefix of zeros then a non-empty run of ones
            let zeros = child.find('1').unwrap();
            assert!(zeros < 10);
            assert!(child[zeros..].chars().all(|c| c == '1'));
        }
    }

    #[test]
    fn one_bit_genomes_skip_crossover() {
        let mut rng = StdRng::seed_from_u64(18);
        let a = g("1");
        let child = a.offspring(&g("0"), 1.0, 0.0, &mut rng).unwrap();
        assert_eq!(child, a);
        let empty = g("");
        assert!(empty.offspring(&g(""), 0.5, 0.5, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn offspring_rejects_mismatched_mates() {
        let mut rng = StdRng::seed_from_u64(19);
        assert!(matches!(
            g("1010").offspring(&g("10"), 0.5, 0.0, &mut rng),
            Err(EvoError::InvalidArgument(_))
        ));
    }
}
