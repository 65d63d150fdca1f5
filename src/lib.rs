pub mod error;
pub mod math;
pub mod activation;
pub mod genetics;
pub mod codec;
pub mod network;
pub mod loss;
pub mod optim;

// Convenience re-exports
pub use error::{EvoError, Result};
pub use math::matrix::Matrix;
pub use activation::sigmoid::Sigmoid;
pub use genetics::{BreedConfig, Genome};
pub use codec::transcription::{encode_parameters, transcribe, TranscriptionLayout};
pub use network::{Gradients, Network, Parameters, Topology};
pub use loss::squared_error::SquaredError;
pub use optim::sgd::Sgd;
