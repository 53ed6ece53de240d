use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::layers::layer::Layer;
use crate::loss::loss_fn::Loss;
use crate::math::{Element, Tensor};
use crate::optim::optimizer::{FromLearningRate, Optimizer};
use crate::optim::per_parameter::PerParameter;

/// An ordered stack of layers; order defines forward composition.
///
/// The network exclusively owns its layers. Forward and backward mutate
/// per-layer caches, so a network has a single writer at a time; use
/// [`Network::infer`] (or a clone per worker) for shared inference.
#[derive(Clone)]
pub struct Network<T: Element> {
    layers: Vec<Box<dyn Layer<T>>>,
}

impl<T: Element> Default for Network<T> {
    fn default() -> Self {
        Network::new()
    }
}

impl<T: Element> Network<T> {
    pub fn new() -> Network<T> {
        Network { layers: Vec::new() }
    }

    pub fn add_layer(&mut self, layer: Box<dyn Layer<T>>) {
        self.layers.push(layer);
    }

    /// Builder form of [`add_layer`](Self::add_layer).
    pub fn with_layer<L: Layer<T> + 'static>(mut self, layer: L) -> Network<T> {
        self.layers.push(Box::new(layer));
        self
    }

    pub fn layers(&self) -> &[Box<dyn Layer<T>>] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Forward pass through every layer; refreshes the backward caches.
    pub fn predict(&mut self, input: &Tensor<T, 2>) -> Result<Tensor<T, 2>> {
        let mut current = input.clone();
        for layer in &mut self.layers {
            current = layer.forward(&current)?;
        }
        Ok(current)
    }

    /// Forward pass that never touches layer caches.
    pub fn infer(&self, input: &Tensor<T, 2>) -> Result<Tensor<T, 2>> {
        let mut current = input.clone();
        for layer in &self.layers {
            current = layer.infer(&current)?;
        }
        Ok(current)
    }

    /// Mini-batch training with loss `L` and optimizer `O`.
    ///
    /// One optimizer is created for the whole call, with an independent `O`
    /// per parameter tensor. Returns the mean loss of the last epoch.
    #[instrument(skip_all, fields(samples = x.rows(), epochs = epochs, batch_size = batch_size))]
    pub fn train<L, O, R>(
        &mut self,
        x: &Tensor<T, 2>,
        y: &Tensor<T, 2>,
        epochs: usize,
        batch_size: usize,
        learning_rate: T,
        rng: &mut R,
    ) -> Result<T>
    where
        L: Loss<T>,
        O: Optimizer<T> + FromLearningRate<T>,
        R: Rng + ?Sized,
    {
        let mut optimizer = PerParameter::new(move || O::with_learning_rate(learning_rate));
        self.train_with::<L, R>(x, y, epochs, batch_size, &mut optimizer, rng)
    }

    /// Like [`train`](Self::train) but with a caller-owned optimizer, which
    /// is shared by every parameter tensor exactly as given.
    pub fn train_with<L, R>(
        &mut self,
        x: &Tensor<T, 2>,
        y: &Tensor<T, 2>,
        epochs: usize,
        batch_size: usize,
        optimizer: &mut dyn Optimizer<T>,
        rng: &mut R,
    ) -> Result<T>
    where
        L: Loss<T>,
        R: Rng + ?Sized,
    {
        let mut last_loss = T::zero();
        for epoch in 1..=epochs {
            last_loss = self.run_epoch::<L, R>(x, y, batch_size, optimizer, rng)?;
            debug!(epoch, loss = last_loss.as_f64(), "epoch finished");
        }
        Ok(last_loss)
    }

    /// One shuffled pass over all rows of `x`/`y`.
    ///
    /// Returns the mean per-sample loss, weighting each batch by its rows.
    pub(crate) fn run_epoch<L, R>(
        &mut self,
        x: &Tensor<T, 2>,
        y: &Tensor<T, 2>,
        batch_size: usize,
        optimizer: &mut dyn Optimizer<T>,
        rng: &mut R,
    ) -> Result<T>
    where
        L: Loss<T>,
        R: Rng + ?Sized,
    {
        check_training_data(x, y, batch_size)?;
        let n = x.rows();

        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(rng);

        let mut total_loss = T::zero();
        for batch in indices.chunks(batch_size) {
            let mut x_batch = Tensor::zeros([batch.len(), x.cols()]);
            let mut y_batch = Tensor::zeros([batch.len(), y.cols()]);
            for (j, &idx) in batch.iter().enumerate() {
                x_batch.set_row(j, &x.row(idx))?;
                y_batch.set_row(j, &y.row(idx))?;
            }

            let output = self.predict(&x_batch)?;
            let loss = L::new(&output, &y_batch)?;
            total_loss = total_loss + loss.loss() * T::from_f64(batch.len() as f64);

            let mut grad = loss.loss_gradient();
            for layer in self.layers.iter_mut().rev() {
                grad = layer.backward(&grad)?;
            }

            for layer in &mut self.layers {
                layer.update_params(optimizer);
            }
            optimizer.step();
        }

        Ok(total_loss / T::from_f64(n as f64))
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Writes one line per parametrized layer: every parameter value in
    /// storage order (weights, then bias), space separated.
    pub fn save<W: Write>(&self, out: &mut W) -> Result<()> {
        for layer in &self.layers {
            let params = layer.parameters();
            if params.is_empty() {
                continue;
            }
            let line = params
                .iter()
                .flat_map(|p| p.iter())
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    /// Reads a stream written by [`save`](Self::save) into this network.
    ///
    /// The architecture is not recorded in the stream, so every line is
    /// checked against the value count the matching layer expects. Blank
    /// lines are only skipped after the last layer. On any mismatch nothing
    /// is modified.
    pub fn load<R: BufRead>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        let mut staged: Vec<(usize, Vec<T>)> = Vec::new();

        for (position, layer) in self.layers.iter().enumerate() {
            let params = layer.parameters();
            if params.is_empty() {
                continue;
            }
            let expected: usize = params.iter().map(|p| p.size()).sum();
            // Lines are positional: a zero-width layer is saved as a blank line.
            let line = match lines.next().transpose()? {
                Some(line) => line,
                None if expected == 0 => String::new(),
                None => {
                    return Err(Error::ModelFormat {
                        layer: position,
                        expected,
                        got: 0,
                    })
                }
            };
            let values = parse_values::<T>(&line, position)?;
            if values.len() != expected {
                return Err(Error::ModelFormat {
                    layer: position,
                    expected,
                    got: values.len(),
                });
            }
            staged.push((position, values));
        }

        if let Some(extra) = next_data_line(&mut lines)? {
            return Err(Error::ModelFormat {
                layer: self.layers.len(),
                expected: 0,
                got: extra.split_whitespace().count(),
            });
        }

        for (position, values) in staged {
            let mut offset = 0;
            for param in self.layers[position].parameters_mut() {
                let len = param.size();
                param.assign(&values[offset..offset + len])?;
                offset += len;
            }
        }
        Ok(())
    }

    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load_model<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let reader = BufReader::new(File::open(path)?);
        self.load(reader)
    }
}

fn check_training_data<T: Element>(
    x: &Tensor<T, 2>,
    y: &Tensor<T, 2>,
    batch_size: usize,
) -> Result<()> {
    if x.rows() == 0 {
        return Err(Error::InvalidTraining("no training samples".into()));
    }
    if x.rows() != y.rows() {
        return Err(Error::InvalidTraining(format!(
            "{} input rows but {} target rows",
            x.rows(),
            y.rows()
        )));
    }
    if batch_size == 0 {
        return Err(Error::InvalidTraining("batch_size must be at least 1".into()));
    }
    Ok(())
}

/// Next non-blank line after the last layer, if any.
fn next_data_line<I>(lines: &mut I) -> Result<Option<String>>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    for line in lines {
        let line = line?;
        if !line.trim().is_empty() {
            return Ok(Some(line));
        }
    }
    Ok(None)
}

fn parse_values<T: Element>(line: &str, layer: usize) -> Result<Vec<T>> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<T>().map_err(|_| Error::ParseValue {
                layer,
                token: token.to_string(),
            })
        })
        .collect()
}
