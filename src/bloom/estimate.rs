//! Textbook Bloom filter estimates. The filters never size themselves;
//! these helpers are for callers picking M and K (and for the CLI/bench).

/// Expected false-positive rate `(1 - e^(-k n / m))^k`.
///
/// Returns 0.0 for an empty set and 1.0 for a zero-sized filter.
pub fn false_positive_rate(m_bits: usize, k: usize, n: usize) -> f64 {
    if n == 0 || k == 0 {
        return 0.0;
    }
    if m_bits == 0 {
        return 1.0;
    }
    let k = k as f64;
    let exp = (-k * n as f64 / m_bits as f64).exp();
    (1.0 - exp).powf(k)
}

/// K minimizing the false-positive rate for `n` keys in `m_bits`: `(m / n) ln 2`, at least 1.
pub fn optimal_k(m_bits: usize, n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    let k = (m_bits as f64 / n as f64) * std::f64::consts::LN_2;
    (k.round() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fpr_edges() {
        assert_eq!(false_positive_rate(1024, 4, 0), 0.0);
        assert_eq!(false_positive_rate(0, 4, 10), 1.0);
    }

    #[test]
    fn fpr_known_point() {
        // m=1024, k=4, n=50: (1 - e^-0.1953)^4 ~ 0.00099
        let p = false_positive_rate(1024, 4, 50);
        assert!((p - 0.00099).abs() < 0.00005, "p={}", p);
    }

    #[test]
    fn fpr_grows_with_load() {
        let a = false_positive_rate(4096, 4, 100);
        let b = false_positive_rate(4096, 4, 1000);
        assert!(a < b);
    }

    #[test]
    fn optimal_k_values() {
        assert_eq!(optimal_k(1024, 0), 1);
        assert_eq!(optimal_k(1000, 100), 7);
        assert_eq!(optimal_k(64, 1000), 1);
    }
}
