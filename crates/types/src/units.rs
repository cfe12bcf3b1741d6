//! Unit conversions.
//!
//! The simulation core works in SI: seconds, volts, siemens, amperes, and
//! transition rates in events per second. Experiment descriptions and exported
//! traces use the display units of the teaching panels: milliseconds,
//! millivolts, picosiemens and picoamperes.

pub const MILLI: f64 = 1e-3;
pub const MICRO: f64 = 1e-6;
pub const PICO: f64 = 1e-12;

pub fn ms_to_s(ms: f64) -> f64 {
    ms * MILLI
}

pub fn s_to_ms(s: f64) -> f64 {
    s / MILLI
}

pub fn s_to_us(s: f64) -> f64 {
    s / MICRO
}

pub fn mv_to_v(mv: f64) -> f64 {
    mv * MILLI
}

pub fn v_to_mv(v: f64) -> f64 {
    v / MILLI
}

pub fn ps_to_s(ps: f64) -> f64 {
    ps * PICO
}

pub fn a_to_pa(a: f64) -> f64 {
    a / PICO
}

/// Rates given per millisecond, converted to per second.
pub fn per_ms_to_per_s(rate: f64) -> f64 {
    rate / MILLI
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_display_round_trips() {
        assert!(close(s_to_ms(ms_to_s(0.5)), 0.5));
        assert!(close(v_to_mv(mv_to_v(-100.0)), -100.0));
    }

    #[test]
    fn test_ohmic_current_in_picoamperes() {
        // 10 pS driven by 100 mV is 1 pA.
        let current = ps_to_s(10.0) * mv_to_v(100.0);
        assert!(close(a_to_pa(current), 1.0));
    }

    #[test]
    fn test_rate_conversion() {
        assert!(close(per_ms_to_per_s(2.0), 2000.0));
        assert!(close(s_to_us(ms_to_s(1.0)), 1000.0));
    }
}
