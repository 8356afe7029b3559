use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use crate::error::{NetError, Result};
use crate::network::network::Network;
use crate::persist::scale::ScaleTable;

/// How parameters are laid out in a weight file.
///
/// Files carry no header: they are the network's parameters in canonical
/// order (input weights, then per neuron its bias followed by its outgoing
/// weights), in native byte order. The reader must already hold a network
/// of the same shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoding {
    /// One `f64` per parameter.
    Raw,
    /// One `i32` per parameter, scaled per layer boundary.
    ///
    /// Boundary `b` with `q` levels stores `round(v / s)` clamped to
    /// `[-q/2, q/2 - 1]`, where `s = 2 * max_abs / q`. The factor of 2 makes
    /// the stored integers span the whole level range; a reader dividing by
    /// `max_abs / q` instead gets values twice too large.
    Quantized(Vec<u32>),
}

/// Writes `network`'s parameters to `writer`.
pub fn write<W: Write>(network: &Network, encoding: &Encoding, mut writer: W) -> Result<()> {
    match encoding {
        Encoding::Raw => {
            let values = network.parameters();
            writer.write_all(bytemuck::cast_slice(&values))?;
        }
        Encoding::Quantized(levels) => {
            let table = ScaleTable::derive(network, levels)?;
            let mut stored = Vec::with_capacity(network.parameter_count());
            network.for_each_parameter(|boundary, value| stored.push(table.quantize(boundary, value)));
            writer.write_all(bytemuck::cast_slice(&stored))?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Overwrites `network`'s parameters from `reader`.
///
/// Quantized files are scaled back with the table derived from the network's
/// current parameters. The stream must hold exactly one value per parameter.
pub fn read<R: Read>(network: &mut Network, encoding: &Encoding, mut reader: R) -> Result<()> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let expected = network.parameter_count();

    match encoding {
        Encoding::Raw => {
            let mut values = vec![0.0f64; exact_count::<f64>(&bytes, expected)?];
            bytemuck::cast_slice_mut(&mut values).copy_from_slice(&bytes);
            network.set_parameters(&values)
        }
        Encoding::Quantized(levels) => {
            let table = ScaleTable::derive(network, levels)?;
            let mut stored = vec![0i32; exact_count::<i32>(&bytes, expected)?];
            bytemuck::cast_slice_mut(&mut stored).copy_from_slice(&bytes);

            let mut values = stored.iter();
            network.for_each_parameter_mut(|boundary, parameter| {
                if let Some(&q) = values.next() {
                    *parameter = table.dequantize(boundary, q);
                }
            });
            Ok(())
        }
    }
}

/// Number of `T` values in `bytes`, which must be exactly `expected`.
fn exact_count<T>(bytes: &[u8], expected: usize) -> Result<usize> {
    let width = std::mem::size_of::<T>();
    if bytes.len() != expected * width {
        return Err(NetError::ShapeMismatch { expected, found: bytes.len() / width });
    }
    Ok(expected)
}

pub fn save<P: AsRef<Path>>(network: &Network, encoding: &Encoding, path: P) -> Result<()> {
    let path = path.as_ref();
    write(network, encoding, BufWriter::new(File::create(path)?))?;
    debug!("saved {} parameters to {}", network.parameter_count(), path.display());
    Ok(())
}

pub fn load<P: AsRef<Path>>(network: &mut Network, encoding: &Encoding, path: P) -> Result<()> {
    let path = path.as_ref();
    read(network, encoding, BufReader::new(File::open(path)?))?;
    debug!("loaded {} parameters from {}", network.parameter_count(), path.display());
    Ok(())
}
