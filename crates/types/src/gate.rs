//! Gate identity and state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The class a gate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateClass {
    /// Activation gate (`m`).
    Activation,
    /// Inactivation gate (`h`).
    Inactivation,
}

impl GateClass {
    /// Both classes, in registration order.
    pub const ALL: [GateClass; 2] = [GateClass::Activation, GateClass::Inactivation];

    /// Conventional single-letter symbol.
    pub fn symbol(self) -> char {
        match self {
            GateClass::Activation => 'm',
            GateClass::Inactivation => 'h',
        }
    }
}

impl fmt::Display for GateClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateClass::Activation => write!(f, "activation"),
            GateClass::Inactivation => write!(f, "inactivation"),
        }
    }
}

/// Gate identifier: class plus index within the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GateId {
    pub class: GateClass,
    pub index: usize,
}

impl GateId {
    /// Activation gate `m{index}`.
    pub fn activation(index: usize) -> Self {
        Self {
            class: GateClass::Activation,
            index,
        }
    }

    /// Inactivation gate `h{index}`.
    pub fn inactivation(index: usize) -> Self {
        Self {
            class: GateClass::Inactivation,
            index,
        }
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class.symbol(), self.index)
    }
}

/// Binary gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    #[default]
    Closed,
    Open,
}

impl GateState {
    pub fn from_open(open: bool) -> Self {
        if open {
            GateState::Open
        } else {
            GateState::Closed
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, GateState::Open)
    }

    /// The state after one transition.
    pub fn toggled(self) -> Self {
        match self {
            GateState::Closed => GateState::Open,
            GateState::Open => GateState::Closed,
        }
    }

    /// Numeric value recorded in trajectories (closed = 0, open = 1).
    pub fn as_f64(self) -> f64 {
        if self.is_open() {
            1.0
        } else {
            0.0
        }
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateState::Closed => write!(f, "closed"),
            GateState::Open => write!(f, "open"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_id_display() {
        assert_eq!(GateId::activation(0).to_string(), "m0");
        assert_eq!(GateId::inactivation(3).to_string(), "h3");
    }

    #[test]
    fn test_gate_ids_order_activation_first() {
        let mut ids = vec![
            GateId::inactivation(0),
            GateId::activation(1),
            GateId::activation(0),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                GateId::activation(0),
                GateId::activation(1),
                GateId::inactivation(0)
            ]
        );
    }

    #[test]
    fn test_state_toggle() {
        assert_eq!(GateState::default(), GateState::Closed);
        assert_eq!(GateState::Closed.toggled(), GateState::Open);
        assert_eq!(GateState::Open.toggled(), GateState::Closed);
        assert_eq!(GateState::Open.as_f64(), 1.0);
        assert_eq!(GateState::Closed.as_f64(), 0.0);
        assert_eq!(GateState::from_open(true), GateState::Open);
    }
}
