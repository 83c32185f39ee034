// rsa_webhook_chat/chat_crypto/src/primality.rs

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand::rngs::OsRng;

/// Teste de Miller-Rabin com `rounds` testemunhas aleatórias em `[2, n-2]`.
///
/// Um `true` erra com probabilidade de no máximo `4^-rounds`; um `false` é
/// sempre definitivo.
pub fn is_probably_prime(n: &BigUint, rounds: usize) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u32);

    if n <= &one {
        return false;
    }
    if n == &two || n == &BigUint::from(3u32) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // n - 1 = 2^r * d, com d ímpar
    let n_minus_one = n - &one;
    let r = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> r;

    let mut rng = OsRng;
    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, n);

        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..r {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(n: u64) -> bool {
        is_probably_prime(&BigUint::from(n), 5)
    }

    #[test]
    fn test_known_primes() {
        for p in [2u64, 3, 5, 97, 7919] {
            assert!(check(p), "{} deveria ser primo", p);
        }
    }

    #[test]
    fn test_known_composites() {
        for c in [0u64, 1, 4, 9, 15, 100] {
            assert!(!check(c), "{} não deveria ser primo", c);
        }
    }

    #[test]
    fn test_carmichael_numbers_are_rejected() {
        // Enganam o teste de Fermat, mas não o de Miller-Rabin.
        for c in [561u64, 1105, 1729, 2465, 2821, 6601] {
            assert!(!is_probably_prime(&BigUint::from(c), 20));
        }
    }

    #[test]
    fn test_mersenne_prime_127() {
        let m127 = (BigUint::one() << 127u32) - BigUint::one();
        assert!(is_probably_prime(&m127, 10));

        let composite = &m127 * BigUint::from(3u32);
        assert!(!is_probably_prime(&composite, 10));
    }
}
