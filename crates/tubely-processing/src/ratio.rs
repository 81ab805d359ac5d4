//! Rational reduction via the extended Euclidean algorithm.
//!
//! Used to render a precise aspect ratio for diagnostics. The orientation
//! decision does not go through here; see [`crate::orientation`].

/// A ratio `a:b` reduced to lowest terms, together with the divisor used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reduced {
    pub gcd: u64,
    pub a: u64,
    pub b: u64,
}

/// Reduce `a:b` to lowest terms.
///
/// Walks the `(remainder, cofactor_a, cofactor_b)` sequence seeded with
/// `(a, 1, 0)` and `(b, 0, 1)` until the remainder hits zero. The last nonzero
/// remainder is the gcd and the terminating triple `(0, s, t)` satisfies
/// `s·a + t·b = 0`, so `|t| = a/gcd` and `|s| = b/gcd`.
///
/// Returns `None` when either input is zero.
pub fn reduce(a: u64, b: u64) -> Option<Reduced> {
    if a == 0 || b == 0 {
        return None;
    }

    // i128 keeps every intermediate cofactor representable for any u64 input.
    let mut prev: (i128, i128, i128) = (a as i128, 1, 0);
    let mut curr: (i128, i128, i128) = (b as i128, 0, 1);

    while curr.0 != 0 {
        let q = prev.0 / curr.0;
        let next = (prev.0 - q * curr.0, prev.1 - q * curr.1, prev.2 - q * curr.2);
        prev = curr;
        curr = next;
    }

    Some(Reduced {
        gcd: prev.0 as u64,
        a: curr.2.unsigned_abs() as u64,
        b: curr.1.unsigned_abs() as u64,
    })
}

/// Render `width:height` in lowest terms, e.g. `1920x1080` -> `"16:9"`.
pub fn aspect_ratio(width: u32, height: u32) -> Option<String> {
    let reduced = reduce(width as u64, height as u64)?;
    Some(format!("{}:{}", reduced.a, reduced.b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gcd(mut a: u64, mut b: u64) -> u64 {
        while b != 0 {
            let t = a % b;
            a = b;
            b = t;
        }
        a
    }

    #[test]
    fn test_reduce_example() {
        assert_eq!(
            reduce(48, 18),
            Some(Reduced {
                gcd: 6,
                a: 8,
                b: 3
            })
        );
    }

    #[test]
    fn test_reduce_coprime_and_equal() {
        assert_eq!(reduce(7, 5), Some(Reduced { gcd: 1, a: 7, b: 5 }));
        assert_eq!(reduce(9, 9), Some(Reduced { gcd: 9, a: 1, b: 1 }));
        assert_eq!(reduce(1, 1), Some(Reduced { gcd: 1, a: 1, b: 1 }));
    }

    #[test]
    fn test_reduce_rejects_zero() {
        assert_eq!(reduce(0, 5), None);
        assert_eq!(reduce(5, 0), None);
    }

    #[test]
    fn test_reduce_large_inputs() {
        let r = reduce(u64::MAX, u64::MAX - 1).unwrap();
        assert_eq!(r.gcd, 1);
        assert_eq!(r.a, u64::MAX);
        assert_eq!(r.b, u64::MAX - 1);
    }

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(aspect_ratio(1920, 1080).as_deref(), Some("16:9"));
        assert_eq!(aspect_ratio(1080, 1920).as_deref(), Some("9:16"));
        assert_eq!(aspect_ratio(1280, 720).as_deref(), Some("16:9"));
        assert_eq!(aspect_ratio(640, 480).as_deref(), Some("4:3"));
        assert_eq!(aspect_ratio(1000, 0), None);
    }

    proptest! {
        #[test]
        fn prop_reduce_is_lowest_terms(a in 1u64..=u32::MAX as u64, b in 1u64..=u32::MAX as u64) {
            let r = reduce(a, b).unwrap();
            prop_assert!(r.gcd > 0);
            prop_assert_eq!(a, r.gcd * r.a);
            prop_assert_eq!(b, r.gcd * r.b);
            prop_assert_eq!(gcd(r.a, r.b), 1);
        }
    }
}
