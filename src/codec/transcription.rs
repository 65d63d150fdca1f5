//! Genome <-> parameter codec.
//!
//! Each weight or bias is a 16-bit two's-complement integer stored most
//! significant bit first. A decoded integer `v` maps to `v / 32768 / 4`, so
//! values span roughly `[-0.25, 0.25)` in steps of `1 / 131072`.
//!
//! Blocks are read in order: hidden biases, output biases, hidden weights
//! (hidden index outer, input index inner), output weights (output index
//! outer, hidden index inner).

use serde::{Serialize, Deserialize};

use crate::error::{EvoError, Result};
use crate::genetics::genome::Genome;
use crate::math::matrix::Matrix;
use crate::network::parameters::Parameters;
use crate::network::topology::Topology;

pub const CHUNK_BITS: usize = 16;
const SCALE: f64 = 32768.0 * 4.0;

/// Smallest difference between two decodable values.
pub const QUANTUM: f64 = 1.0 / SCALE;

/// Where each parameter block starts inside the genome.
///
/// - `Packed` — blocks follow each other with no gaps.
/// - `Legacy` — one unused 16-bit chunk sits between the hidden biases and
///              the output biases, shifting every later block by 16 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptionLayout {
    #[default]
    Packed,
    Legacy,
}

/// Chunk offsets of the four parameter blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockOffsets {
    b_hid: usize,
    b_out: usize,
    w_hid: usize,
    w_out: usize,
    end: usize,
}

impl TranscriptionLayout {
    fn offsets(&self, topology: &Topology) -> BlockOffsets {
        let gap = match self {
            TranscriptionLayout::Packed => 0,
            TranscriptionLayout::Legacy => 1,
        };
        let b_out = topology.hidden + gap;
        let w_hid = b_out + topology.outputs;
        let w_out = w_hid + topology.hidden * topology.inputs;
        let end = w_out + topology.outputs * topology.hidden;
        BlockOffsets { b_hid: 0, b_out, w_hid, w_out, end }
    }

    /// Minimum genome length, in bits, for `topology`.
    pub fn required_bits(&self, topology: &Topology) -> usize {
        self.offsets(topology).end * CHUNK_BITS
    }
}

/// Decodes one 16-bit chunk, most significant bit first.
pub fn decode_chunk(bits: &[bool]) -> f64 {
    let raw = bits.iter().fold(0u16, |acc, &b| (acc << 1) | u16::from(b));
    f64::from(raw as i16) / SCALE
}

/// Nearest representable 16-bit chunk for `value`, clamped to the codec range.
pub fn encode_chunk(value: f64) -> [bool; CHUNK_BITS] {
    let v = (value * SCALE).round().clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16;
    let raw = v as u16;
    let mut bits = [false; CHUNK_BITS];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = (raw >> (CHUNK_BITS - 1 - i)) & 1 == 1;
    }
    bits
}

/// Decodes `genome` into weights and biases for `topology`.
///
/// Bits past the last block are ignored.
pub fn transcribe(
    genome: &Genome,
    topology: &Topology,
    layout: TranscriptionLayout,
) -> Result<Parameters> {
    topology.validate()?;
    let required = layout.required_bits(topology);
    if genome.len() < required {
        return Err(EvoError::InsufficientGenomeLength { required, actual: genome.len() });
    }

    let offsets = layout.offsets(topology);
    let bits = genome.bits();
    let block = |start: usize, rows: usize, cols: usize| {
        let mut m = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                let at = (start + i * cols + j) * CHUNK_BITS;
                m.data[i][j] = decode_chunk(&bits[at..at + CHUNK_BITS]);
            }
        }
        m
    };

    let (wh_rows, wh_cols) = topology.w_hid_shape();
    let (wo_rows, wo_cols) = topology.w_out_shape();
    Ok(Parameters {
        b_hid: block(offsets.b_hid, topology.hidden, 1),
        b_out: block(offsets.b_out, topology.outputs, 1),
        w_hid: block(offsets.w_hid, wh_rows, wh_cols),
        w_out: block(offsets.w_out, wo_rows, wo_cols),
    })
}

/// Inverse of `transcribe`: packs `parameters` into a genome of exactly
/// `layout.required_bits(topology)` bits. Gap chunks are zero.
pub fn encode_parameters(
    parameters: &Parameters,
    topology: &Topology,
    layout: TranscriptionLayout,
) -> Result<Genome> {
    topology.validate()?;
    parameters.check_shapes(topology)?;

    let offsets = layout.offsets(topology);
    let mut bits = vec![false; offsets.end * CHUNK_BITS];
    let mut write = |start: usize, m: &Matrix| {
        for (k, &value) in m.data.iter().flatten().enumerate() {
            let at = (start + k) * CHUNK_BITS;
            bits[at..at + CHUNK_BITS].copy_from_slice(&encode_chunk(value));
        }
    };
    write(offsets.b_hid, &parameters.b_hid);
    write(offsets.b_out, &parameters.b_out);
    write(offsets.w_hid, &parameters.w_hid);
    write(offsets.w_out, &parameters.w_out);

    Ok(Genome::from_bits(bits))
}
