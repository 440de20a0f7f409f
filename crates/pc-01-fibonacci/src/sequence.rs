//! Fibonacci sequence arithmetic.
//!
//! Indices are `i8`, so every representable index (`-128..=127`) fits in an
//! `i128` result and `fib` is total.

/// Signed Fibonacci number `F(n)`.
///
/// `F(0) = 0`, `F(1) = F(2) = 1`, and for negative indices
/// `F(-n) = (-1)^(n+1) * F(n)`.
pub fn fib(n: i8) -> i128 {
    let magnitude = n.unsigned_abs();
    let (mut current, mut next) = (0i128, 1i128);
    for _ in 0..magnitude {
        let sum = current + next;
        current = next;
        next = sum;
    }

    if n < 0 && magnitude % 2 == 0 {
        -current
    } else {
        current
    }
}

/// `F(start)..=F(end)` in index order.
pub fn fibonacci_sequence(start: i8, end: i8) -> Vec<i128> {
    (start..=end).map(fib).collect()
}

/// Whether `n` belongs to the (non-negative) Fibonacci sequence.
///
/// Uses the identity that `n` is Fibonacci iff `5n² + 4` or `5n² - 4` is a
/// perfect square. Negative inputs are never Fibonacci. When `5n²` does not
/// fit in a `u128` the sequence is walked directly instead.
pub fn is_fibonacci(n: i128) -> bool {
    if n < 0 {
        return false;
    }
    let n = n.unsigned_abs();

    let Some(five_n_squared) = n.checked_mul(n).and_then(|sq| sq.checked_mul(5)) else {
        return walk_sequence(n);
    };

    let plus = five_n_squared
        .checked_add(4)
        .map(is_perfect_square)
        .unwrap_or_else(|| walk_sequence(n));
    let minus = five_n_squared >= 4 && is_perfect_square(five_n_squared - 4);

    plus || minus
}

/// Greedy Zeckendorf decomposition: distinct, non-consecutive Fibonacci
/// numbers summing to `n`, largest first. Empty for `n == 0`.
pub fn zeckendorf(n: u64) -> Vec<u64> {
    // 1, 2, 3, 5, ... (F(2) onwards, so 1 appears once)
    let mut terms: Vec<u64> = Vec::new();
    let (mut a, mut b) = (1u64, 2u64);
    while a <= n {
        terms.push(a);
        match a.checked_add(b) {
            Some(sum) => {
                a = b;
                b = sum;
            }
            None => {
                if b <= n {
                    terms.push(b);
                }
                break;
            }
        }
    }

    let mut remainder = n;
    let mut parts = Vec::new();
    for &term in terms.iter().rev() {
        if term <= remainder {
            parts.push(term);
            remainder -= term;
        }
        if remainder == 0 {
            break;
        }
    }
    parts
}

/// Golden ratio approximated as `F(79) / F(78)`.
pub fn golden_ratio() -> f64 {
    fib(79) as f64 / fib(78) as f64
}

fn walk_sequence(n: u128) -> bool {
    let (mut current, mut next) = (0u128, 1u128);
    while current < n {
        match current.checked_add(next) {
            Some(sum) => {
                current = next;
                next = sum;
            }
            None => return next == n,
        }
    }
    current == n
}

fn is_perfect_square(value: u128) -> bool {
    let root = isqrt(value);
    root * root == value
}

/// Integer square root by Newton iteration.
fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = n / 2 + n % 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_base_cases() {
        assert_eq!(fib(0), 0);
        assert_eq!(fib(1), 1);
        assert_eq!(fib(2), 1);
        assert_eq!(fib(10), 55);
        assert_eq!(fib(33), 3_524_578);
        assert_eq!(fib(40), 102_334_155);
    }

    #[test]
    fn test_negative_indices() {
        assert_eq!(fib(-1), 1);
        assert_eq!(fib(-2), -1);
        assert_eq!(fib(-9), 34);
        assert_eq!(fib(-10), -55);
        assert_eq!(fib(10) + fib(-10), 0);
        // Odd magnitudes mirror with the same sign.
        assert_ne!(fib(9) + fib(-9), 0);
        assert_eq!(fib(9) + fib(-9), 2 * fib(9));
    }

    #[test]
    fn test_extreme_indices_do_not_overflow() {
        assert_eq!(fib(127), 155_576_970_220_531_065_681_649_693);
        assert_eq!(fib(-128), -251_728_825_683_549_488_150_424_261);
    }

    #[test]
    fn test_is_fibonacci() {
        assert!(is_fibonacci(0));
        assert!(is_fibonacci(1));
        assert!(is_fibonacci(55));
        assert!(!is_fibonacci(56));
        assert!(!is_fibonacci(100));
        assert!(is_fibonacci(6765));
        assert!(!is_fibonacci(-5));
    }

    #[test]
    fn test_is_fibonacci_beyond_square_range() {
        assert!(is_fibonacci(fib(127)));
        assert!(!is_fibonacci(fib(127) + 1));
    }

    #[test]
    fn test_sequence() {
        assert_eq!(fibonacci_sequence(1, 10), vec![1, 1, 2, 3, 5, 8, 13, 21, 34, 55]);
        assert_eq!(fibonacci_sequence(-3, 0), vec![2, -1, 1, 0]);
    }

    #[test]
    fn test_zeckendorf() {
        assert!(zeckendorf(0).is_empty());
        assert_eq!(zeckendorf(100), vec![89, 8, 3]);
        assert_eq!(zeckendorf(6765), vec![6765]);
        assert_eq!(zeckendorf(u64::MAX).iter().sum::<u64>(), u64::MAX);
    }

    #[test]
    fn test_golden_ratio() {
        assert!((golden_ratio() - 1.618_033_988_749_895).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_recurrence_holds(n in -126i8..=125) {
            prop_assert_eq!(fib(n + 2), fib(n + 1) + fib(n));
        }

        #[test]
        fn prop_negative_mirror(n in 0i8..=127) {
            let sign = if n % 2 == 0 { -1 } else { 1 };
            prop_assert_eq!(fib(-n), sign * fib(n));
        }

        #[test]
        fn prop_sequence_members_are_fibonacci(n in 0i8..=127) {
            prop_assert!(is_fibonacci(fib(n)));
        }

        #[test]
        fn prop_zeckendorf_sums_back(n in 0u64..1_000_000_000) {
            let parts = zeckendorf(n);
            prop_assert_eq!(parts.iter().sum::<u64>(), n);
            prop_assert!(parts.iter().all(|p| is_fibonacci(i128::from(*p))));
        }
    }
}
