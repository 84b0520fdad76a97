//! Gini coefficient of a balance distribution, computed in exact decimals.
//!
//! With values sorted ascending and 1-based ranks `i`:
//!
//! ```text
//! gini = Σ (2i − n − 1) · vᵢ / (n · Σ vᵢ)
//! ```

use bigdecimal::{BigDecimal, One, Zero};

/// What to do with zero values before computing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZeroFilter {
    #[default]
    Keep,
    /// Drop zero values.
    Remove,
    /// Replace every value by 1 if non-zero and 0 otherwise, reproducing the
    /// legacy analysis tooling's behaviour.
    LegacyIndicator,
}

pub fn gini(values: &[BigDecimal], filter_zero: bool) -> crate::Result<BigDecimal> {
    let filter = if filter_zero {
        ZeroFilter::Remove
    } else {
        ZeroFilter::Keep
    };
    gini_with(values, filter)
}

pub fn gini_with(values: &[BigDecimal], filter: ZeroFilter) -> crate::Result<BigDecimal> {
    let mut values = values.to_vec();

    // values cannot be negative
    if let Some(min) = values.iter().min().cloned() {
        if min < BigDecimal::zero() {
            for value in values.iter_mut() {
                *value -= &min;
            }
        }
    }

    match filter {
        ZeroFilter::Keep => {}
        ZeroFilter::Remove => values.retain(|value| !value.is_zero()),
        ZeroFilter::LegacyIndicator => {
            for value in values.iter_mut() {
                *value = if value.is_zero() {
                    BigDecimal::zero()
                } else {
                    BigDecimal::one()
                };
            }
        }
    }

    if values.is_empty() {
        return Err(crate::Error::EmptyDistribution);
    }

    values.sort();

    let n = values.len() as i64;
    let sum: BigDecimal = values.iter().sum();
    if sum.is_zero() {
        return Err(crate::Error::ZeroSum);
    }

    let weighted: BigDecimal = values
        .iter()
        .zip(1i64..)
        .map(|(value, rank)| value * BigDecimal::from(2 * rank - n - 1))
        .sum();

    Ok(weighted / (sum * BigDecimal::from(n)))
}
