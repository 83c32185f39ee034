// rsa_webhook_chat/chat_crypto/src/arith.rs

//! MDC e inverso modular usados na geração de chaves.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Máximo divisor comum pelo algoritmo de Euclides.
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    let (mut a, mut b) = (a.clone(), b.clone());
    while !b.is_zero() {
        let r = &a % &b;
        a = std::mem::replace(&mut b, r);
    }
    a
}

/// Inverso de `a` módulo `m` pelo algoritmo estendido de Euclides (iterativo).
///
/// Devolve `None` quando `mdc(a, m) != 1`. O resultado fica sempre em `[0, m)`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }
    if m.is_one() {
        return Some(BigUint::zero());
    }

    let modulus = BigInt::from(m.clone());
    let (mut old_r, mut r) = (BigInt::from(a % m), modulus.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return None;
    }
    // coeficiente de Bézout pode ser negativo
    old_s.mod_floor(&modulus).to_biguint()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(&big(48), &big(18)), big(6));
        assert_eq!(gcd(&big(17), &big(5)), big(1));
        assert_eq!(gcd(&big(0), &big(9)), big(9));
        assert_eq!(gcd(&big(9), &big(0)), big(9));
    }

    #[test]
    fn test_mod_inverse_textbook_values() {
        assert_eq!(mod_inverse(&big(3), &big(11)), Some(big(4)));
        assert_eq!(mod_inverse(&big(17), &big(3120)), Some(big(2753)));
        assert_eq!(mod_inverse(&big(65537), &big(3120)).map(|d| (d * big(65537)) % big(3120)), Some(big(1)));
    }

    #[test]
    fn test_mod_inverse_requires_coprime() {
        assert_eq!(mod_inverse(&big(6), &big(9)), None);
        assert_eq!(mod_inverse(&big(0), &big(7)), None);
        assert_eq!(mod_inverse(&big(5), &big(0)), None);
    }

    #[test]
    fn test_mod_inverse_of_modulus_one() {
        assert_eq!(mod_inverse(&big(5), &big(1)), Some(big(0)));
    }
}
