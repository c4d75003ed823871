//! Saving and loading network weights.
//!
//! The format is plain whitespace-delimited text: the number of layers,
//! the layer widths, then for each layer transition one line per
//! destination neuron holding `source_width + 1` weights (bias last).
//! Values round-trip exactly because `f64` is printed with its shortest
//! lossless representation.

use crate::neural::{Activation, Network};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Errors that can occur while persisting or restoring a network.
#[derive(Debug)]
pub enum CheckpointError {
    Io(std::io::Error),
    /// Structurally invalid file: wrong token counts, non-numeric or
    /// non-finite values, impossible layer layout.
    Format(String),
}

impl std::fmt::Display for CheckpointError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Format(msg) => write!(f, "Invalid network file: {}", msg),
        }
    }
}

impl std::error::Error for CheckpointError {}

impl From<std::io::Error> for CheckpointError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl Network {
    /// Write layer sizes and weights to a text file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CheckpointError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        write!(writer, "{}", self.layer_sizes.len())?;
        for size in &self.layer_sizes {
            write!(writer, " {}", size)?;
        }
        writeln!(writer)?;

        for w in &self.weights {
            for row in w.rows() {
                let mut first = true;
                for v in row {
                    if first {
                        write!(writer, "{}", v)?;
                        first = false;
                    } else {
                        write!(writer, " {}", v)?;
                    }
                }
                writeln!(writer)?;
            }
            writeln!(writer)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Read a network back from a text file written by `save`.
    ///
    /// The whole file is validated before any network is returned: layer
    /// count, widths, and the exact weight count must all be consistent,
    /// and every weight must parse as a finite number.
    pub fn load<P: AsRef<Path>>(path: P, activation: Activation) -> Result<Self, CheckpointError> {
        let contents = std::fs::read_to_string(path)?;
        let mut tokens = contents.split_whitespace();

        let layer_count: usize = next_token(&mut tokens, "layer count")?
            .parse()
            .map_err(|_| CheckpointError::Format("layer count is not an integer".into()))?;
        if layer_count < 2 {
            return Err(CheckpointError::Format(format!(
                "expected at least 2 layers, found {}",
                layer_count
            )));
        }

        let mut layer_sizes = Vec::with_capacity(layer_count);
        for i in 0..layer_count {
            let size: usize = next_token(&mut tokens, "layer width")?
                .parse()
                .map_err(|_| CheckpointError::Format(format!("layer width {} is not an integer", i)))?;
            if size == 0 {
                return Err(CheckpointError::Format(format!("layer {} has zero width", i)));
            }
            layer_sizes.push(size);
        }

        let mut network = Network::new(&layer_sizes, activation);
        for t in 0..layer_count - 1 {
            let (rows, cols) = network.weights[t].dim();
            for j in 0..rows {
                for k in 0..cols {
                    let token = next_token(&mut tokens, "weight")?;
                    let value: f64 = token.parse().map_err(|_| {
                        CheckpointError::Format(format!(
                            "weight [{}][{},{}] is not a number: {:?}",
                            t, j, k, token
                        ))
                    })?;
                    if !value.is_finite() {
                        return Err(CheckpointError::Format(format!(
                            "weight [{}][{},{}] is not finite",
                            t, j, k
                        )));
                    }
                    network.weights[t][[j, k]] = value;
                }
            }
        }

        if tokens.next().is_some() {
            return Err(CheckpointError::Format(
                "trailing data after final weight".into(),
            ));
        }

        Ok(network)
    }
}

fn next_token<'a, I: Iterator<Item = &'a str>>(
    tokens: &mut I,
    what: &str,
) -> Result<&'a str, CheckpointError> {
    tokens
        .next()
        .ok_or_else(|| CheckpointError::Format(format!("file ended while reading {}", what)))
}
