//! Wall-normal layer offsets handed to the boundary-layer extrusion tool.

use crate::prelude::*;

use num_traits::Float;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayerSpacingError {
    #[error("initial wall spacing must be positive and finite, got {0}")]
    InitialSpacing(f64),
    #[error("layer growth rate must be positive and finite, got {0}")]
    GrowthRate(f64),
}

/// Geometric sequence of layer offsets `s0, s0*r, s0*r^2, ..., s0*r^k` (`layers + 1` values).
///
/// Every term is the previous term times `growth_rate`, never the closed form, so the
/// values match a tool that accumulates the same way.
pub fn layer_spacing<F: Float>(
    initial_spacing: F,
    layers: usize,
    growth_rate: F,
) -> Result<Vec<F>, LayerSpacingError> {
    if !(initial_spacing > F::zero() && initial_spacing.is_finite()) {
        let value = initial_spacing.to_f64().unwrap_or(f64::NAN);
        return Err(LayerSpacingError::InitialSpacing(value));
    }

    if !(growth_rate > F::zero() && growth_rate.is_finite()) {
        let value = growth_rate.to_f64().unwrap_or(f64::NAN);
        return Err(LayerSpacingError::GrowthRate(value));
    }

    let mut offsets = Vec::with_capacity(layers + 1);
    let mut current = initial_spacing;
    offsets.push(current);

    for _ in 0..layers {
        current = current * growth_rate;
        offsets.push(current);
    }

    Ok(offsets)
}

/// write the offsets as one comma separated row (the extrusion tool's `layers.csv`)
pub fn write_layers_csv<W: Write>(offsets: &[f64], mut writer: W) -> Result<(), Error> {
    let row = offsets
        .iter()
        .map(|x| utils::shortest(*x))
        .collect::<Vec<_>>()
        .join(",");

    writeln!(writer, "{row}")?;
    writer.flush()?;

    Ok(())
}

/// Parameters of the boundary-layer stack grown off the wall surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoundaryLayerParams {
    /// height of the first cell off the wall
    pub initial_spacing: f64,
    /// number of layers grown after the first one
    pub layers: usize,
    /// ratio between the heights of consecutive layers
    pub growth_rate: f64,
}

impl Default for BoundaryLayerParams {
    fn default() -> Self {
        Self {
            initial_spacing: 1e-4,
            layers: 10,
            growth_rate: 1.2,
        }
    }
}

impl BoundaryLayerParams {
    pub fn offsets(&self) -> Result<Vec<f64>, LayerSpacingError> {
        layer_spacing(self.initial_spacing, self.layers, self.growth_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recurrence() {
        let offsets = layer_spacing(1e-4, 3, 1.5).unwrap();

        assert_eq!(offsets.len(), 4);
        assert_eq!(offsets[0], 1e-4);
        for pair in offsets.windows(2) {
            assert_eq!(pair[1], pair[0] * 1.5);
        }

        let expected = [1e-4, 1.5e-4, 2.25e-4, 3.375e-4];
        for (got, want) in offsets.iter().zip(expected) {
            assert!((got - want).abs() <= 1e-18, "{got} vs {want}");
        }
    }

    #[test]
    fn zero_layers() {
        assert_eq!(layer_spacing(2e-3, 0, 1.1).unwrap(), vec![2e-3]);
    }

    #[test]
    fn single_precision() {
        let offsets = layer_spacing(1.0f32, 2, 2.0).unwrap();
        assert_eq!(offsets, vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert_eq!(
            layer_spacing(0.0, 3, 1.2),
            Err(LayerSpacingError::InitialSpacing(0.0))
        );
        assert_eq!(
            layer_spacing(1e-4, 3, -1.0),
            Err(LayerSpacingError::GrowthRate(-1.0))
        );
        assert!(layer_spacing(f64::NAN, 3, 1.2).is_err());
    }

    #[test]
    fn csv_row() {
        let mut out = Vec::new();
        write_layers_csv(&[0.0001, 0.00012, 1.5], &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "0.0001,0.00012,1.5\n");
    }

    #[test]
    fn default_params() {
        let offsets = BoundaryLayerParams::default().offsets().unwrap();
        assert_eq!(offsets.len(), 11);
        assert_eq!(offsets[0], 1e-4);
    }
}
