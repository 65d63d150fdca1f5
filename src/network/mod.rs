pub mod network;
pub mod parameters;
pub mod topology;

pub use network::Network;
pub use parameters::{Gradients, Parameters};
pub use topology::Topology;
