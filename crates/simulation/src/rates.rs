//! Rate models: voltage to transition rate, per gate class.
//!
//! The simulator treats a rate model as opaque. Voltages are in volts and
//! rates in events per second. A rate of zero means the transition never
//! happens; an infinite rate means it happens immediately.

use serde::{Deserialize, Serialize};
use singlechannel_types::GateClass;
use std::fmt;
use std::sync::Arc;

/// Voltage-dependent transition rates for each gate class.
pub trait RateModel {
    /// Closed → open rate for a gate of `class` at `voltage`.
    fn opening_rate(&self, class: GateClass, voltage: f64) -> f64;

    /// Open → closed rate for a gate of `class` at `voltage`.
    fn closing_rate(&self, class: GateClass, voltage: f64) -> f64;
}

impl<T: RateModel + ?Sized> RateModel for &T {
    fn opening_rate(&self, class: GateClass, voltage: f64) -> f64 {
        (**self).opening_rate(class, voltage)
    }

    fn closing_rate(&self, class: GateClass, voltage: f64) -> f64 {
        (**self).closing_rate(class, voltage)
    }
}

impl<T: RateModel + ?Sized> RateModel for Box<T> {
    fn opening_rate(&self, class: GateClass, voltage: f64) -> f64 {
        (**self).opening_rate(class, voltage)
    }

    fn closing_rate(&self, class: GateClass, voltage: f64) -> f64 {
        (**self).closing_rate(class, voltage)
    }
}

impl<T: RateModel + ?Sized> RateModel for Arc<T> {
    fn opening_rate(&self, class: GateClass, voltage: f64) -> f64 {
        (**self).opening_rate(class, voltage)
    }

    fn closing_rate(&self, class: GateClass, voltage: f64) -> f64 {
        (**self).closing_rate(class, voltage)
    }
}

/// An opening/closing rate pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GateRates {
    pub opening: f64,
    pub closing: f64,
}

impl GateRates {
    pub fn new(opening: f64, closing: f64) -> Self {
        Self { opening, closing }
    }

    /// Multiply both rates by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            opening: self.opening * factor,
            closing: self.closing * factor,
        }
    }
}

/// Voltage-independent rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstantRates {
    pub activation: GateRates,
    pub inactivation: GateRates,
}

impl ConstantRates {
    pub fn new(activation: GateRates, inactivation: GateRates) -> Self {
        Self {
            activation,
            inactivation,
        }
    }

    fn for_class(&self, class: GateClass) -> GateRates {
        match class {
            GateClass::Activation => self.activation,
            GateClass::Inactivation => self.inactivation,
        }
    }
}

impl RateModel for ConstantRates {
    fn opening_rate(&self, class: GateClass, _voltage: f64) -> f64 {
        self.for_class(class).opening
    }

    fn closing_rate(&self, class: GateClass, _voltage: f64) -> f64 {
        self.for_class(class).closing
    }
}

/// Rates for one gate class on either side of a threshold voltage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelRates {
    /// Rates while the voltage is below the threshold.
    pub below: GateRates,
    /// Rates while the voltage is at or above the threshold.
    pub above: GateRates,
}

/// Two-level rate model switching at a threshold voltage.
///
/// A clamp protocol only ever visits two voltages, so a step in the rate
/// function is enough to describe any holding/step experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRates {
    /// Threshold voltage in volts.
    pub threshold: f64,
    pub activation: LevelRates,
    pub inactivation: LevelRates,
}

impl ThresholdRates {
    fn for_class(&self, class: GateClass, voltage: f64) -> GateRates {
        let levels = match class {
            GateClass::Activation => &self.activation,
            GateClass::Inactivation => &self.inactivation,
        };
        if voltage < self.threshold {
            levels.below
        } else {
            levels.above
        }
    }
}

impl Default for ThresholdRates {
    /// Sodium-like kinetics: activation opens and inactivation closes on depolarization.
    fn default() -> Self {
        Self {
            threshold: -0.040,
            activation: LevelRates {
                below: GateRates::new(100.0, 4_000.0),
                above: GateRates::new(10_000.0, 200.0),
            },
            inactivation: LevelRates {
                below: GateRates::new(1_000.0, 10.0),
                above: GateRates::new(5.0, 1_000.0),
            },
        }
    }
}

impl RateModel for ThresholdRates {
    fn opening_rate(&self, class: GateClass, voltage: f64) -> f64 {
        self.for_class(class, voltage).opening
    }

    fn closing_rate(&self, class: GateClass, voltage: f64) -> f64 {
        self.for_class(class, voltage).closing
    }
}

type RateFn = Box<dyn Fn(GateClass, f64) -> f64 + Send + Sync>;

/// Closure-backed rate model for plugging in arbitrary rate functions.
pub struct FnRates {
    opening: RateFn,
    closing: RateFn,
}

impl FnRates {
    pub fn new<O, C>(opening: O, closing: C) -> Self
    where
        O: Fn(GateClass, f64) -> f64 + Send + Sync + 'static,
        C: Fn(GateClass, f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            opening: Box::new(opening),
            closing: Box::new(closing),
        }
    }
}

impl fmt::Debug for FnRates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRates").finish_non_exhaustive()
    }
}

impl RateModel for FnRates {
    fn opening_rate(&self, class: GateClass, voltage: f64) -> f64 {
        (self.opening)(class, voltage)
    }

    fn closing_rate(&self, class: GateClass, voltage: f64) -> f64 {
        (self.closing)(class, voltage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_rates_ignore_voltage() {
        let rates = ConstantRates::new(GateRates::new(1.0, 2.0), GateRates::new(3.0, 4.0));
        assert_eq!(rates.opening_rate(GateClass::Activation, -0.1), 1.0);
        assert_eq!(rates.opening_rate(GateClass::Activation, 0.1), 1.0);
        assert_eq!(rates.closing_rate(GateClass::Inactivation, 0.0), 4.0);
    }

    #[test]
    fn test_threshold_rates_switch_at_threshold() {
        let rates = ThresholdRates::default();
        let below = rates.opening_rate(GateClass::Activation, -0.1);
        let at = rates.opening_rate(GateClass::Activation, -0.040);
        assert_eq!(below, 100.0);
        assert_eq!(at, 10_000.0);
        assert_eq!(rates.closing_rate(GateClass::Inactivation, 0.1), 1_000.0);
    }

    #[test]
    fn test_fn_rates_and_blanket_impls() {
        let rates = FnRates::new(
            |class, v| match class {
                GateClass::Activation => v * 10.0,
                GateClass::Inactivation => 0.0,
            },
            |_, _| 7.0,
        );
        let boxed: Box<dyn RateModel> = Box::new(rates);
        assert_eq!(boxed.opening_rate(GateClass::Activation, 2.0), 20.0);
        assert_eq!((&boxed).closing_rate(GateClass::Inactivation, 0.0), 7.0);

        let shared = Arc::new(ConstantRates::default());
        assert_eq!(shared.opening_rate(GateClass::Activation, 0.0), 0.0);
    }
}
