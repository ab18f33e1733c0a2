//! Shape queries over a sampled payoff curve.

use super::engine::PayoffPoint;

/// End of the curve being inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tail {
    /// Lowest prices (toward the zero floor).
    Lower,
    /// Highest prices (toward +infinity).
    Upper,
}

/// Slope over the outermost `points` samples at one end of the curve.
///
/// Returns `None` for curves with fewer than two samples.
#[must_use]
pub fn tail_slope(curve: &[PayoffPoint], tail: Tail, points: usize) -> Option<f64> {
    if curve.len() < 2 {
        return None;
    }
    let n = points.clamp(2, curve.len());
    let (a, b) = match tail {
        Tail::Lower => (curve[0], curve[n - 1]),
        Tail::Upper => (curve[curve.len() - n], curve[curve.len() - 1]),
    };
    segment_slope(a, b)
}

/// Local slope at `price`.
///
/// When `price` is itself a sample, the neighbours on both sides are used
/// (central difference); otherwise the segment straddling `price`.
#[must_use]
pub fn slope_at(curve: &[PayoffPoint], price: f64) -> Option<f64> {
    let (lo, hi) = straddle(curve, price)?;
    segment_slope(curve[lo], curve[hi])
}

/// Linearly interpolated P&L at `price`, clamped to the sampled range.
#[must_use]
pub fn interpolate_pnl(curve: &[PayoffPoint], price: f64) -> Option<f64> {
    let first = curve.first()?;
    let last = curve.last()?;
    if price <= first.price {
        return Some(first.pnl);
    }
    if price >= last.price {
        return Some(last.pnl);
    }

    let idx = curve.partition_point(|p| p.price < price);
    let (a, b) = (curve[idx - 1], curve[idx]);
    if b.price == price {
        return Some(b.pnl);
    }
    let t = (price - a.price) / (b.price - a.price);
    Some(a.pnl + t * (b.pnl - a.pnl))
}

fn straddle(curve: &[PayoffPoint], price: f64) -> Option<(usize, usize)> {
    let len = curve.len();
    if len < 2 {
        return None;
    }

    let idx = curve.partition_point(|p| p.price < price);
    let on_sample = idx < len && curve[idx].price == price;

    let pair = if idx == 0 {
        (0, 1)
    } else if idx >= len || (on_sample && idx == len - 1) {
        (len - 2, len - 1)
    } else if on_sample {
        (idx - 1, idx + 1)
    } else {
        (idx - 1, idx)
    };
    Some(pair)
}

fn segment_slope(a: PayoffPoint, b: PayoffPoint) -> Option<f64> {
    let dx = b.price - a.price;
    if dx <= 0.0 || !dx.is_finite() {
        return None;
    }
    Some((b.pnl - a.pnl) / dx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(points: &[(f64, f64)]) -> Vec<PayoffPoint> {
        points
            .iter()
            .map(|&(price, pnl)| PayoffPoint { price, pnl })
            .collect()
    }

    // Long call, strike 100, premium 5, sampled every 10.
    fn long_call() -> Vec<PayoffPoint> {
        curve(&[
            (70.0, -5.0),
            (80.0, -5.0),
            (90.0, -5.0),
            (100.0, -5.0),
            (110.0, 5.0),
            (120.0, 15.0),
            (130.0, 25.0),
        ])
    }

    #[test]
    fn test_tail_slopes() {
        let c = long_call();
        assert_eq!(tail_slope(&c, Tail::Upper, 3), Some(1.0));
        assert_eq!(tail_slope(&c, Tail::Lower, 3), Some(0.0));
    }

    #[test]
    fn test_tail_slope_short_curve() {
        assert_eq!(tail_slope(&curve(&[(1.0, 1.0)]), Tail::Upper, 3), None);
        assert_eq!(tail_slope(&curve(&[(1.0, 1.0), (2.0, 3.0)]), Tail::Upper, 5), Some(2.0));
    }

    #[test]
    fn test_slope_at_sample_uses_central_difference() {
        // Kink at 100: left slope 0, right slope 1 -> central 0.5
        assert_eq!(slope_at(&long_call(), 100.0), Some(0.5));
    }

    #[test]
    fn test_slope_between_samples() {
        assert_eq!(slope_at(&long_call(), 115.0), Some(1.0));
        assert_eq!(slope_at(&long_call(), 85.0), Some(0.0));
    }

    #[test]
    fn test_slope_at_edges() {
        assert_eq!(slope_at(&long_call(), 70.0), Some(0.0));
        assert_eq!(slope_at(&long_call(), 130.0), Some(1.0));
    }

    #[test]
    fn test_interpolate_pnl() {
        let c = long_call();
        assert_eq!(interpolate_pnl(&c, 105.0), Some(0.0));
        assert_eq!(interpolate_pnl(&c, 110.0), Some(5.0));
        assert_eq!(interpolate_pnl(&c, 10.0), Some(-5.0));
        assert_eq!(interpolate_pnl(&[], 10.0), None);
    }
}
