pub mod genome;
pub mod crossover;
pub mod mutation;
pub mod breeding;

pub use genome::Genome;
pub use breeding::BreedConfig;
pub use mutation::RATE_RESOLUTION;
