/*!
Layer-by-layer accumulation matrices.

Every aggregate the pipeline produces is a square matrix indexed by layer:
row = source layer, column = target layer, with the row/column assignment
fixed by the active [`LayerScheme`].
*/

use std::fmt::{Display, Formatter};

use ndarray::Array2;

use crate::error::{TenetError, TenetResult};
use crate::layers::{LayerScheme, LayerTag};

/// Square matrix of per-layer-pair values.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerMatrix {
    scheme: LayerScheme,
    values: Array2<f64>,
}

impl LayerMatrix {
    /// An all-zero matrix sized for `scheme`.
    pub fn zeros(scheme: LayerScheme) -> LayerMatrix {
        let k = scheme.layer_count();
        LayerMatrix {
            scheme,
            values: Array2::zeros((k, k)),
        }
    }

    pub fn scheme(&self) -> LayerScheme {
        self.scheme
    }

    pub fn layer_count(&self) -> usize {
        self.scheme.layer_count()
    }

    /// Value for the (source, target) layer pair.
    pub fn get(&self, source: LayerTag, target: LayerTag) -> TenetResult<f64> {
        let (i, j) = self.indices(source, target)?;
        Ok(self.values[[i, j]])
    }

    pub fn set(&mut self, source: LayerTag, target: LayerTag, value: f64) -> TenetResult<()> {
        let (i, j) = self.indices(source, target)?;
        self.values[[i, j]] = value;
        Ok(())
    }

    /// Adds `delta` onto the (source, target) cell.
    pub fn add(&mut self, source: LayerTag, target: LayerTag, delta: f64) -> TenetResult<()> {
        let (i, j) = self.indices(source, target)?;
        self.values[[i, j]] += delta;
        Ok(())
    }

    /// Raw access by matrix position. Panics when out of bounds, like any
    /// slice index; use [`get`](Self::get) for tag-checked access.
    pub fn at(&self, row: usize, column: usize) -> f64 {
        self.values[[row, column]]
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Sum over all cells. NaN cells poison the sum, as with any float sum.
    pub fn sum(&self) -> f64 {
        self.values.sum()
    }

    /// Elementwise division, rounding each quotient to `decimals` places.
    /// Cells with a zero denominator become NaN rather than an error or a
    /// silent zero: absence of evidence is not a measured zero.
    pub fn ratio_rounded(&self, divisor: &LayerMatrix, decimals: u32) -> TenetResult<LayerMatrix> {
        if self.scheme != divisor.scheme {
            return Err(TenetError::SchemeMismatch {
                left: self.scheme.to_string(),
                right: divisor.scheme.to_string(),
            });
        }
        let mut out = LayerMatrix::zeros(self.scheme);
        for ((i, j), denominator) in divisor.values.indexed_iter() {
            let cell = if *denominator == 0.0 {
                f64::NAN
            } else {
                round_to(self.values[[i, j]] / denominator, decimals)
            };
            out.values[[i, j]] = cell;
        }
        Ok(out)
    }

    /// Copy with every cell rounded to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> LayerMatrix {
        LayerMatrix {
            scheme: self.scheme,
            values: self.values.mapv(|v| round_to(v, decimals)),
        }
    }

    fn indices(&self, source: LayerTag, target: LayerTag) -> TenetResult<(usize, usize)> {
        let i = self.scheme.require_index(source)?;
        let j = self.scheme.require_index(target)?;
        Ok((i, j))
    }
}

impl Display for LayerMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>12}", "")?;
        for tag in self.scheme.tags() {
            write!(f, "{:>13}", tag.display_name())?;
        }
        writeln!(f)?;
        for (i, tag) in self.scheme.tags().iter().enumerate() {
            write!(f, "{:>12}", tag.display_name())?;
            for j in 0..self.layer_count() {
                write!(f, "{:>13}", format_cell(self.values[[i, j]]))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Rounds to `decimals` places, ties away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn format_cell(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.3}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_matches_scheme_dimension() {
        let cortical = LayerMatrix::zeros(LayerScheme::Cortical);
        assert_eq!(cortical.values().dim(), (4, 4));
        assert_eq!(cortical.sum(), 0.0);

        let full = LayerMatrix::zeros(LayerScheme::CorticalThalamic);
        assert_eq!(full.values().dim(), (6, 6));
    }

    #[test]
    fn test_tag_indexed_access() {
        let mut matrix = LayerMatrix::zeros(LayerScheme::CorticalThalamic);
        matrix.set(LayerTag::L4, LayerTag::ThalamusShell, 2.5).unwrap();
        matrix.add(LayerTag::L4, LayerTag::ThalamusShell, 0.5).unwrap();
        assert_eq!(matrix.get(LayerTag::L4, LayerTag::ThalamusShell).unwrap(), 3.0);
        assert_eq!(matrix.at(1, 5), 3.0);
    }

    #[test]
    fn test_out_of_scheme_tag_is_rejected() {
        let mut matrix = LayerMatrix::zeros(LayerScheme::Cortical);
        assert!(matches!(
            matrix.set(LayerTag::ThalamusCore, LayerTag::L4, 1.0),
            Err(TenetError::LayerNotInScheme { .. })
        ));
        assert!(matrix.get(LayerTag::L4, LayerTag::ThalamusCore).is_err());
    }

    #[test]
    fn test_ratio_marks_zero_denominators_nan() {
        let mut numerator = LayerMatrix::zeros(LayerScheme::Cortical);
        let mut denominator = LayerMatrix::zeros(LayerScheme::Cortical);
        numerator.set(LayerTag::L23, LayerTag::L4, 3.0).unwrap();
        denominator.set(LayerTag::L23, LayerTag::L4, 8.0).unwrap();
        // (L5, L5) stays 0 / 0.

        let ratio = numerator.ratio_rounded(&denominator, 2).unwrap();
        assert_eq!(ratio.get(LayerTag::L23, LayerTag::L4).unwrap(), 0.38);
        assert!(ratio.get(LayerTag::L5, LayerTag::L5).unwrap().is_nan());
    }

    #[test]
    fn test_ratio_rejects_mismatched_schemes() {
        let numerator = LayerMatrix::zeros(LayerScheme::Cortical);
        let denominator = LayerMatrix::zeros(LayerScheme::CorticalThalamic);
        assert!(matches!(
            numerator.ratio_rounded(&denominator, 2),
            Err(TenetError::SchemeMismatch { .. })
        ));
    }

    #[test]
    fn test_round_to_ties_away_from_zero() {
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(-0.125, 2), -0.13);
        assert_eq!(round_to(1.2345, 3), 1.235);
        assert_eq!(round_to(2.0, 2), 2.0);
        assert!(round_to(f64::NAN, 2).is_nan());
        assert_eq!(round_to(f64::INFINITY, 2), f64::INFINITY);
    }

    #[test]
    fn test_rounded_copies_and_rounds_every_cell() {
        let mut matrix = LayerMatrix::zeros(LayerScheme::Cortical);
        matrix.set(LayerTag::L23, LayerTag::L23, 0.123456).unwrap();
        let rounded = matrix.rounded(3);
        assert_eq!(rounded.get(LayerTag::L23, LayerTag::L23).unwrap(), 0.123);
        // Original untouched.
        assert_eq!(matrix.get(LayerTag::L23, LayerTag::L23).unwrap(), 0.123456);
    }

    #[test]
    fn test_display_renders_headers_and_nan() {
        let mut numerator = LayerMatrix::zeros(LayerScheme::Cortical);
        let denominator = LayerMatrix::zeros(LayerScheme::Cortical);
        numerator.set(LayerTag::L23, LayerTag::L4, 1.0).unwrap();
        let ratio = numerator.ratio_rounded(&denominator, 2).unwrap();

        let text = ratio.to_string();
        assert!(text.contains("Layer 23"));
        assert!(text.contains("NaN"));
    }
}
