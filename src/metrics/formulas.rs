// Derived indicators computed from the three raw replay counters.
//
// Guarded formulas resolve to `0.0` when their preconditions do not hold, so
// a player who never placed a piece (or never attacked) gets zeroes instead of
// infinities. Composites must be evaluated in this order:
// APP, DS/Piece, DS/Second, Garbage Efficiency, Damage Potential.

/// Attack per piece.
pub fn app(apm: f64, pps: f64) -> f64 {
    if !(pps > 0.0 && apm > 0.0) {
        return 0.0;
    }
    apm / (pps * 60.0)
}

/// Downstack per second. Unguarded, may be negative.
pub fn ds_per_second(vs: f64, apm: f64) -> f64 {
    vs / 100.0 - apm / 60.0
}

/// Downstack per piece.
pub fn ds_per_piece(vs: f64, apm: f64, pps: f64) -> f64 {
    if !(pps > 0.0 && apm > 0.0) {
        return 0.0;
    }
    ds_per_second(vs, apm) / pps
}

pub fn garbage_efficiency(pps: f64, ds_per_second: f64, app: f64) -> f64 {
    if !(pps > 0.0 && app > 0.0) {
        return 0.0;
    }
    (app * ds_per_second / pps) * 2.0
}

/// Overflowed or undefined results fall back to the guard value.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Speed scaled by attack efficiency and garbage efficiency.
pub fn damage_potential(pps: f64, app: f64, garbage_efficiency: f64) -> f64 {
    pps * (1.0 + app) * (1.0 + garbage_efficiency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[rstest]
    #[case(0.0, 50.0)]
    #[case(2.0, 0.0)]
    #[case(0.0, 0.0)]
    #[case(-1.0, 40.0)]
    #[case(1.5, -3.0)]
    fn guarded_formulas_are_zero_without_speed_or_attack(#[case] pps: f64, #[case] apm: f64) {
        let app = app(apm, pps);
        assert_eq!(app, 0.0);
        assert_eq!(ds_per_piece(120.0, apm, pps), 0.0);
        assert_eq!(
            garbage_efficiency(pps, ds_per_second(120.0, apm), app),
            0.0
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.25)]
    #[case(3.7)]
    fn damage_potential_reduces_to_speed_without_efficiency(#[case] pps: f64) {
        assert_eq!(damage_potential(pps, 0.0, 0.0), pps);
    }

    #[rstest]
    #[case(f64::INFINITY, 0.0)]
    #[case(f64::NEG_INFINITY, 0.0)]
    #[case(f64::NAN, 0.0)]
    #[case(-0.25, -0.25)]
    fn non_finite_values_fall_back_to_zero(#[case] value: f64, #[case] expected: f64) {
        assert_eq!(finite_or_zero(value), expected);
    }

    #[test]
    fn ds_per_second_can_go_negative() {
        assert_close(ds_per_second(10.0, 50.0), 0.1 - 50.0 / 60.0);
        assert!(ds_per_second(10.0, 50.0) < 0.0);
    }

    #[test]
    fn idle_player_with_attack_resolves_to_defined_values() {
        let (pps, apm, vs) = (0.0, 50.0, 10.0);
        let app = app(apm, pps);
        let dps = ds_per_piece(vs, apm, pps);
        let dss = ds_per_second(vs, apm);
        let ge = garbage_efficiency(pps, dss, app);

        assert_eq!(app, 0.0);
        assert_eq!(dps, 0.0);
        assert_close(dss, -0.733_333_333_333);
        assert_eq!(ge, 0.0);
        assert_eq!(damage_potential(pps, app, ge), 0.0);
    }

    #[test]
    fn computes_full_chain_for_active_player() {
        let (pps, apm, vs) = (2.0, 60.0, 120.0);
        let app = app(apm, pps);
        let dps = ds_per_piece(vs, apm, pps);
        let dss = ds_per_second(vs, apm);
        let ge = garbage_efficiency(pps, dss, app);

        assert_close(app, 0.5);
        assert_close(dss, 0.2);
        assert_close(dps, 0.1);
        assert_close(ge, 0.1);
        assert_close(damage_potential(pps, app, ge), 3.3);
    }
}
