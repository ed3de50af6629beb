//! Integer helpers for key derivation and table construction.

/// Greatest common divisor (Euclid).
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Extended Euclid: returns `(g, x, y)` with `a·x + b·y = g = gcd(a, b)`.
pub fn extended_gcd(a: i128, b: i128) -> (i128, i128, i128) {
    let (mut old_r, mut r) = (a, b);
    let (mut old_s, mut s) = (1i128, 0i128);
    let (mut old_t, mut t) = (0i128, 1i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
        (old_t, t) = (t, old_t - q * t);
    }
    (old_r, old_s, old_t)
}

/// Modular inverse of `a` mod `m`, or `None` when `gcd(a, m) != 1`.
pub fn mod_inverse(a: u64, m: u64) -> Option<u64> {
    if m < 2 {
        return None;
    }
    let (g, x, _) = extended_gcd(a as i128, m as i128);
    if g != 1 {
        return None;
    }
    Some(x.rem_euclid(m as i128) as u64)
}

/// `(a · b) mod m` without overflow.
#[inline]
pub fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

/// Square-and-multiply `base^exp mod modulus`.
pub fn modexp(base: u64, mut exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let mut result = 1u64;
    let mut base = base % modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, modulus);
        }
        exp >>= 1;
        base = mul_mod(base, base, modulus);
    }
    result
}

/// Trial-division primality check.
pub fn is_prime(v: u64) -> bool {
    if v < 2 {
        return false;
    }
    if v % 2 == 0 {
        return v == 2;
    }
    let mut d = 3u64;
    while d <= v / d {
        if v % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modexp_matches_textbook_vector() {
        assert_eq!(modexp(65, 17, 3233), 2790);
        assert_eq!(modexp(2790, 2753, 3233), 65);
    }

    #[test]
    fn modexp_edge_cases() {
        assert_eq!(modexp(5, 0, 7), 1);
        assert_eq!(modexp(0, 5, 7), 0);
        assert_eq!(modexp(9, 3, 1), 0);
        // Products above 2^64 reduce correctly.
        let m = u64::MAX - 58;
        assert_eq!(modexp(m - 1, 2, m), 1);
    }

    #[test]
    fn inverse_of_textbook_exponent() {
        assert_eq!(mod_inverse(17, 3120), Some(2753));
        assert_eq!(mod_inverse(7, 3120), Some(1783));
        assert_eq!(mod_inverse(6, 3120), None);
    }

    #[test]
    fn extended_gcd_bezout() {
        let (g, x, y) = extended_gcd(240, 46);
        assert_eq!(g, 2);
        assert_eq!(240 * x + 46 * y, 2);
    }

    #[test]
    fn primality_near_the_top_of_the_range() {
        assert!(is_prime(4_294_967_291));
        assert!(!is_prime(4_294_967_297)); // 641 * 6_700_417
        assert!(!is_prime(u64::MAX));
        assert!(!is_prime(u64::MAX - 1));
    }
}
