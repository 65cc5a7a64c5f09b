use serde::{Deserialize, Serialize};

use crate::cost::CostError;
use crate::vehicle::FuelType;

/// Consumption and price of a single fuel type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelRate {
    /// Litres (or litre-equivalents) consumed per kilometre.
    pub consumption_per_km: f64,
    /// Price of one litre (or litre-equivalent).
    pub unit_price: f64,
}

impl FuelRate {
    pub const fn new(consumption_per_km: f64, unit_price: f64) -> Self {
        Self {
            consumption_per_km,
            unit_price,
        }
    }

    fn is_valid(&self) -> bool {
        self.consumption_per_km.is_finite()
            && self.consumption_per_km >= 0.0
            && self.unit_price.is_finite()
            && self.unit_price >= 0.0
    }
}

// 8L/100km, as costed by the fleet dashboards
const PETROL: FuelRate = FuelRate::new(0.08, 100.0);
const DIESEL: FuelRate = FuelRate::new(0.07, 90.0);
// ~0.18 kWh/km, at ~8.9 kWh per litre-equivalent
const ELECTRIC: FuelRate = FuelRate::new(0.02, 70.0);
const HYBRID: FuelRate = FuelRate::new(0.05, 100.0);

/// The per-fuel rate table used by the [`CostEstimator`](crate::cost::CostEstimator).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelTable {
    petrol: FuelRate,
    diesel: FuelRate,
    electric: FuelRate,
    hybrid: FuelRate,
}

impl Default for FuelTable {
    fn default() -> Self {
        Self {
            petrol: PETROL,
            diesel: DIESEL,
            electric: ELECTRIC,
            hybrid: HYBRID,
        }
    }
}

impl FuelTable {
    pub fn rate(&self, fuel: FuelType) -> FuelRate {
        match fuel {
            FuelType::Petrol => self.petrol,
            FuelType::Diesel => self.diesel,
            FuelType::Electric => self.electric,
            FuelType::Hybrid => self.hybrid,
        }
    }

    pub fn consumption_rate(&self, fuel: FuelType) -> f64 {
        self.rate(fuel).consumption_per_km
    }

    pub fn unit_price(&self, fuel: FuelType) -> f64 {
        self.rate(fuel).unit_price
    }

    /// Overrides the rate of a single fuel type.
    pub fn with_rate(mut self, fuel: FuelType, rate: FuelRate) -> Result<Self, CostError> {
        if !rate.is_valid() {
            return Err(CostError::InvalidRate(fuel.to_string()));
        }

        *match fuel {
            FuelType::Petrol => &mut self.petrol,
            FuelType::Diesel => &mut self.diesel,
            FuelType::Electric => &mut self.electric,
            FuelType::Hybrid => &mut self.hybrid,
        } = rate;

        Ok(self)
    }
}
