use serde::{Deserialize, Serialize};

use crate::cost::{CostError, FuelTable};
use crate::toll::TollCharge;
use crate::vehicle::FuelType;

/// Relative nudge applied before rounding. Larger than the error of
/// representing a decimal half in binary, far smaller than a cent.
const HALF_UP_TOLERANCE: f64 = 1e-12;

/// Rounds to two decimal places, halves rounding up.
///
/// Decimal halves like `1.005` are stored just below the half
/// (`1.00499..`), so the scaled value is nudged up before rounding.
/// Only defined for the non-negative values costing produces.
#[inline]
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    (scaled + scaled.abs() * HALF_UP_TOLERANCE).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub fuel_consumption_l: f64,
    pub estimated_cost: f64,
}

/// Prices a route from its length and the tolls along it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostEstimator {
    table: FuelTable,
}

impl CostEstimator {
    pub fn new(table: FuelTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &FuelTable {
        &self.table
    }

    /// Computes consumption and total cost.
    ///
    /// ```math
    /// fuel = distance * consumption_rate(fuel_type)
    /// cost = round2(fuel * unit_price(fuel_type) + ∑ amount(toll))
    /// ```
    ///
    /// The duration takes no part in the formula but must still be
    /// a valid travel time, so nonsensical routes are caught here.
    pub fn estimate(
        &self,
        distance_km: f64,
        duration_min: f64,
        fuel: FuelType,
        tolls: &[TollCharge],
    ) -> Result<CostEstimate, CostError> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(CostError::InvalidDistance(distance_km));
        }

        if !duration_min.is_finite() || duration_min < 0.0 {
            return Err(CostError::InvalidDuration(duration_min));
        }

        if let Some(toll) = tolls
            .iter()
            .find(|toll| !toll.amount.is_finite() || toll.amount < 0.0)
        {
            return Err(CostError::InvalidToll {
                name: toll.name.clone(),
                amount: toll.amount,
            });
        }

        let rate = self.table.rate(fuel);
        let fuel_consumption_l = distance_km * rate.consumption_per_km;
        let toll_total: f64 = tolls.iter().map(|toll| toll.amount).sum();

        Ok(CostEstimate {
            fuel_consumption_l,
            estimated_cost: round2(fuel_consumption_l * rate.unit_price + toll_total),
        })
    }
}
