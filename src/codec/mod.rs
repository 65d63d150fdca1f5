pub mod transcription;

pub use transcription::{transcribe, encode_parameters, TranscriptionLayout};
