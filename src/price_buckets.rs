//! Price bucket expansion
//!
//! Turns the configured Prebid price granularity into the discrete CPM
//! ladder that gets one line item per price point. Prices are carried as
//! integer micro-amounts (1 unit = 1,000,000 micros) and all intermediate
//! arithmetic is done on `Decimal`, so stepping by `0.01` never drifts.
//!
//! Rounding to the bucket precision is round-half-away-from-zero everywhere.

use crate::error::{SetupError, SetupResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Micro-amounts per currency unit
pub const MICROS_PER_UNIT: i64 = 1_000_000;

/// Precision used when neither the bucket nor the settings give one
pub const DEFAULT_PRECISION: u32 = 2;

/// Finest precision a micro-amount can represent
pub const MAX_PRECISION: u32 = 6;

/// Largest whole price whose micro-amount still fits in an `i64`
pub const MAX_PRICE_UNITS: i64 = i64::MAX / MICROS_PER_UNIT;

/// Number of prices shown on each side of a truncated summary
const SUMMARY_EDGE: usize = 3;

/// One configured price range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBucket {
    pub min: Decimal,
    pub max: Decimal,
    /// Zero means the bucket is the single point `min`
    pub increment: Decimal,
    /// Overrides the default precision for this bucket
    pub precision: Option<u32>,
}

impl PriceBucket {
    pub fn new(min: Decimal, max: Decimal, increment: Decimal) -> Self {
        Self {
            min,
            max,
            increment,
            precision: None,
        }
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn precision_or(&self, default_precision: u32) -> u32 {
        self.precision.unwrap_or(default_precision)
    }

    /// Unrounded points of this bucket: `min, min + increment, ...` up to and including `max`
    pub fn points(&self) -> Vec<Decimal> {
        if self.increment <= Decimal::ZERO {
            return vec![self.min];
        }

        let mut points = Vec::new();
        let mut next = Some(self.min);
        while let Some(current) = next.filter(|current| *current <= self.max) {
            points.push(current);
            next = current.checked_add(self.increment);
        }
        points
    }

    /// Micro-amounts for this bucket, ascending.
    ///
    /// Fails with [`SetupError::BadSetting`] when a price has no `i64`
    /// micro-amount; validated settings never do.
    pub fn expand(&self, default_precision: u32) -> SetupResult<Vec<i64>> {
        let precision = self.precision_or(default_precision);
        self.points()
            .into_iter()
            .map(|point| {
                to_micro(point, precision).ok_or_else(|| {
                    SetupError::BadSetting(format!(
                        "The price {} is too large to express in micro-amounts.",
                        point
                    ))
                })
            })
            .collect()
    }
}

/// One expanded price together with the precision of the bucket it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricePoint {
    pub micro_amount: i64,
    pub precision: u32,
}

impl PricePoint {
    /// Targeting value / display form, e.g. `"1.50"`
    pub fn label(&self) -> String {
        format_price(self.micro_amount, self.precision)
    }
}

/// Like [`expand`], keeping each price's bucket precision for formatting
pub fn expand_points(
    buckets: &[PriceBucket],
    default_precision: u32,
) -> SetupResult<Vec<PricePoint>> {
    let mut points = Vec::new();
    for bucket in buckets {
        let precision = bucket.precision_or(default_precision);
        points.extend(
            bucket
                .expand(default_precision)?
                .into_iter()
                .map(|micro_amount| PricePoint {
                    micro_amount,
                    precision,
                }),
        );
    }
    Ok(points)
}

/// Expand every bucket, in input order, into micro-amounts.
///
/// Buckets are neither merged nor deduplicated: overlapping ranges produce
/// repeated price points, one per bucket that covers them.
pub fn expand(buckets: &[PriceBucket], default_precision: u32) -> SetupResult<Vec<i64>> {
    let mut prices = Vec::new();
    for bucket in buckets {
        prices.extend(bucket.expand(default_precision)?);
    }
    Ok(prices)
}

/// Round a price to `precision` decimal digits, halves away from zero
pub fn round_price(value: Decimal, precision: u32) -> Decimal {
    value.round_dp_with_strategy(
        precision.min(MAX_PRECISION),
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Round a price and scale it to an integer micro-amount, `None` if it does not fit
pub fn to_micro(value: Decimal, precision: u32) -> Option<i64> {
    round_price(value, precision)
        .checked_mul(Decimal::from(MICROS_PER_UNIT))?
        .round()
        .to_i64()
}

/// Micro-amount back to a decimal value in currency units
pub fn from_micro(micro_amount: i64) -> Decimal {
    Decimal::new(micro_amount, 6)
}

/// Format a micro-amount with exactly `precision` fractional digits, e.g. `3500000` -> `"3.50"`
pub fn format_price(micro_amount: i64, precision: u32) -> String {
    let value = round_price(from_micro(micro_amount), precision);
    format!("{:.*}", precision.min(MAX_PRECISION) as usize, value)
}

/// Short human-readable synopsis of a price ladder for the confirmation screen.
///
/// Up to five prices are listed in full; longer ladders show the first and
/// last three around an ellipsis.
pub fn summarize(prices: &[i64], precision: u32) -> String {
    summarize_with(prices, |p| format_price(*p, precision))
}

/// Like [`summarize`], formatting each price at its own bucket precision
pub fn summarize_points(points: &[PricePoint]) -> String {
    summarize_with(points, PricePoint::label)
}

fn summarize_with<T>(items: &[T], fmt: impl Fn(&T) -> String) -> String {
    if items.len() < 2 * SUMMARY_EDGE {
        return items.iter().map(&fmt).collect::<Vec<_>>().join(", ");
    }

    let head: Vec<String> = items[..SUMMARY_EDGE].iter().map(&fmt).collect();
    let tail: Vec<String> = items[items.len() - SUMMARY_EDGE..]
        .iter()
        .map(&fmt)
        .collect();
    format!("{}, ... {}", head.join(", "), tail.join(", "))
}
