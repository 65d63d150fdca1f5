use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::error::{EvoError, Result};

/// A fixed-length bit string.
///
/// Genomes are values: crossover and mutation return new genomes and never
/// touch the receiver. The textual form is one ASCII `'0'`/`'1'` per bit,
/// most significant (first) bit on the left; serde uses the same form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Genome {
    genes: Vec<bool>,
}

impl Genome {
    /// Random genome of `num_bases` bits, each drawn uniformly from {0, 1}.
    pub fn random<R: Rng + ?Sized>(num_bases: usize, rng: &mut R) -> Genome {
        let genes = (0..num_bases).map(|_| rng.gen::<bool>()).collect();
        log::trace!("generated random genome of {num_bases} bases");
        Genome { genes }
    }

    /// Random genome drawn from a freshly entropy-seeded generator.
    pub fn from_entropy(num_bases: usize) -> Genome {
        Genome::random(num_bases, &mut StdRng::from_entropy())
    }

    pub fn from_bits(genes: Vec<bool>) -> Genome {
        Genome { genes }
    }

    pub fn bits(&self) -> &[bool] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Number of positions at which the two genomes differ.
    pub fn distance(&self, other: &Genome) -> Result<usize> {
        self.ensure_mate(other)?;
        Ok(self.genes.iter().zip(&other.genes).filter(|(a, b)| a != b).count())
    }

    pub(crate) fn ensure_mate(&self, mate: &Genome) -> Result<()> {
        if self.len() != mate.len() {
            return Err(EvoError::InvalidArgument(format!(
                "mate length {} differs from genome length {}",
                mate.len(),
                self.len()
            )));
        }
        Ok(())
    }
}

impl FromStr for Genome {
    type Err = EvoError;

    fn from_str(s: &str) -> Result<Genome> {
        let genes = s
            .chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(EvoError::InvalidGene { position, found }),
            })
            .collect::<Result<Vec<bool>>>()?;
        Ok(Genome { genes })
    }
}

impl TryFrom<String> for Genome {
    type Error = EvoError;

    fn try_from(s: String) -> Result<Genome> {
        s.parse()
    }
}

impl From<Genome> for String {
    fn from(genome: Genome) -> String {
        genome.to_string()
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: String = self.genes.iter().map(|&b| if b { '1' } else { '0' }).collect();
        f.write_str(&s)
    }
}
