// src/strategy/optimization.rs

//! Newsvendor targets for the order-up-to policies.

/// Share of demand worth covering from stock: the probability of not
/// running out that balances holding against backlog cost.
///
/// `CR = backlog / (backlog + holding)`
pub fn critical_ratio(backlog_cost: f64, holding_cost: f64) -> f64 {
    let total = backlog_cost + holding_cost;
    if total <= 0.0 {
        return 0.0;
    }
    backlog_cost / total
}

/// Standard normal quantile, Abramowitz & Stegun 26.2.23 (|error| < 4.5e-4).
/// Saturates at ±5 sigma outside (0, 1).
fn standard_normal_quantile(p: f64) -> f64 {
    const C: [f64; 3] = [2.515517, 0.802853, 0.010328];
    const D: [f64; 3] = [1.432788, 0.189269, 0.001308];

    if p >= 1.0 {
        return 5.0;
    }
    if p <= 0.0 {
        return -5.0;
    }

    // The approximation is for the lower tail; mirror the upper one.
    let tail = p.min(1.0 - p);
    let t = (-2.0 * tail.ln()).sqrt();
    let x = t - (C[0] + C[1] * t + C[2] * t * t)
        / (1.0 + D[0] * t + D[1] * t * t + D[2] * t * t * t);

    if p < 0.5 {
        -x
    } else {
        x
    }
}

/// Order-up-to level covering the lead time plus one review round.
///
/// `S = mu * L + z * sigma * sqrt(L)` with `L = lead_time_periods + 1` and
/// `z` the quantile of the critical ratio. Demand is assumed i.i.d. per
/// round.
pub fn optimal_base_stock(
    backlog_cost: f64,
    holding_cost: f64,
    avg_period_demand: f64,
    std_dev_period_demand: f64,
    lead_time_periods: usize,
) -> u32 {
    let z = standard_normal_quantile(critical_ratio(backlog_cost, holding_cost));
    let horizon = (lead_time_periods + 1) as f64;

    let target = avg_period_demand * horizon + z * std_dev_period_demand * horizon.sqrt();
    target.round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_ratio() {
        assert!((critical_ratio(1.0, 0.5) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(critical_ratio(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_quantile_is_symmetric() {
        assert!(standard_normal_quantile(0.5).abs() < 1e-3);
        let upper = standard_normal_quantile(0.975);
        assert!((upper - 1.96).abs() < 1e-2);
        assert!((standard_normal_quantile(0.025) + upper).abs() < 1e-9);
    }

    #[test]
    fn test_base_stock_without_variance_is_pipeline_demand() {
        // 5 per round over 4 rounds of lead time plus one review round
        assert_eq!(optimal_base_stock(1.0, 0.5, 5.0, 0.0, 4), 25);
        // Costlier backlog pushes the target up.
        assert!(optimal_base_stock(1.0, 0.5, 5.0, 2.0, 4) > 25);
    }
}
