// rsa_webhook_chat/chat_crypto/src/rsa.rs

use std::fmt;
use std::str::FromStr;

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::rngs::OsRng;
use tracing::debug;

use crate::arith::{gcd, mod_inverse};
use crate::error::{CipherError, KeyGenError, TransportError};
use crate::primality::is_probably_prime;

pub const DEFAULT_PUBLIC_EXPONENT: u32 = 65537;

const PRIME_TEST_ROUNDS: usize = 5;
const MAX_PRIME_ATTEMPTS: u32 = 10_000;
const MAX_DISTINCT_ATTEMPTS: u32 = 64;
const MAX_EXPONENT_ATTEMPTS: u32 = 64;
const FALLBACK_EXPONENT_BITS: usize = 16;

/// Chave pública `(n, e)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub n: BigUint,
    pub e: BigUint,
}

/// Chave privada `(n, d)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateKey {
    pub n: BigUint,
    pub d: BigUint,
}

/// Par de chaves gerado uma vez por processo. Nunca é persistido.
#[derive(Clone, Debug)]
pub struct KeyPair {
    public: PublicKey,
    private: PrivateKey,
}

impl KeyPair {
    /// Sorteia dois primos distintos de `bits` bits cada e deriva `e` e `d`.
    pub fn generate(bits: usize) -> Result<KeyPair, KeyGenError> {
        Self::generate_with_primes(bits).map(|(keys, _)| keys)
    }

    /// Igual a `generate`, devolvendo também `(p, q)`. Os primos não ficam no par.
    fn generate_with_primes(bits: usize) -> Result<(KeyPair, (BigUint, BigUint)), KeyGenError> {
        let p = generate_prime(bits)?;
        let mut q = generate_prime(bits)?;
        let mut redraws = 0;
        while p == q {
            redraws += 1;
            if redraws > MAX_DISTINCT_ATTEMPTS {
                return Err(KeyGenError::DistinctPrimesExhausted(MAX_DISTINCT_ATTEMPTS));
            }
            q = generate_prime(bits)?;
        }

        let n = &p * &q;
        let phi = (&p - BigUint::one()) * (&q - BigUint::one());

        let mut e = BigUint::from(DEFAULT_PUBLIC_EXPONENT);
        let mut tries = 0;
        while !gcd(&e, &phi).is_one() {
            tries += 1;
            if tries > MAX_EXPONENT_ATTEMPTS {
                return Err(KeyGenError::ExponentSearchExhausted(MAX_EXPONENT_ATTEMPTS));
            }
            e = generate_prime(FALLBACK_EXPONENT_BITS)?;
            debug!(%e, "65537 não é coprimo com φ(n), tentando outro expoente");
        }

        let d = mod_inverse(&e, &phi).ok_or(KeyGenError::NoModularInverse)?;
        debug!(bits, modulus_bits = n.bits(), "par de chaves RSA gerado");

        let keys = KeyPair {
            public: PublicKey { n: n.clone(), e },
            private: PrivateKey { n, d },
        };
        Ok((keys, (p, q)))
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }
}

/// Sorteia um primo de exatamente `bits` bits (bit mais alto e bit 0 ligados).
pub fn generate_prime(bits: usize) -> Result<BigUint, KeyGenError> {
    if bits < 2 {
        return Err(KeyGenError::UnsupportedBitLength(bits));
    }

    let mut rng = OsRng;
    for _ in 0..MAX_PRIME_ATTEMPTS {
        let mut candidate = rng.gen_biguint(bits as u64);
        candidate.set_bit(bits as u64 - 1, true);
        candidate.set_bit(0, true);
        if is_probably_prime(&candidate, PRIME_TEST_ROUNDS) {
            return Ok(candidate);
        }
    }
    Err(KeyGenError::PrimeSearchExhausted { bits, attempts: MAX_PRIME_ATTEMPTS })
}

/// Cifra o texto como inteiro big-endian: `m^e mod n`.
///
/// Sem padding. Exige `m < n`, caso contrário a volta não recuperaria a mensagem.
pub fn encrypt(plaintext: &str, key: &PublicKey) -> Result<BigUint, CipherError> {
    let m = BigUint::from_bytes_be(plaintext.as_bytes());
    if m >= key.n {
        return Err(CipherError::MessageTooLarge);
    }
    Ok(m.modpow(&key.e, &key.n))
}

/// Decifra `c^d mod n` e decodifica os bytes mínimos big-endian como UTF-8.
pub fn decrypt(ciphertext: &BigUint, key: &PrivateKey) -> Result<String, CipherError> {
    if ciphertext >= &key.n {
        return Err(CipherError::CiphertextOutOfRange);
    }
    let m = ciphertext.modpow(&key.d, &key.n);
    // to_bytes_be() de zero devolve [0]; a mensagem vazia é a sequência vazia.
    let bytes = if m.is_zero() { Vec::new() } else { m.to_bytes_be() };
    Ok(String::from_utf8(bytes)?)
}

impl fmt::Display for PublicKey {
    /// Formato da troca de chaves: `"<n>,<e>"` em decimal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.n, self.e)
    }
}

impl FromStr for PublicKey {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TransportError::MalformedKey(s.to_string());
        let (n, e) = s.trim().split_once(',').ok_or_else(malformed)?;
        let n = n.trim().parse::<BigUint>().map_err(|_| malformed())?;
        let e = e.trim().parse::<BigUint>().map_err(|_| malformed())?;
        if n.is_zero() || e.is_zero() {
            return Err(malformed());
        }
        Ok(PublicKey { n, e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_prime_has_exact_bit_length() {
        for bits in [8usize, 16, 64, 128] {
            let p = generate_prime(bits).unwrap();
            assert_eq!(p.bits(), bits as u64);
            assert!(p.bit(0));
            assert!(is_probably_prime(&p, 20));
        }
    }

    #[test]
    fn test_generate_prime_rejects_tiny_sizes() {
        assert_eq!(generate_prime(0), Err(KeyGenError::UnsupportedBitLength(0)));
        assert_eq!(generate_prime(1), Err(KeyGenError::UnsupportedBitLength(1)));
    }

    #[test]
    fn test_key_pair_invariants() {
        let (keys, (p, q)) = KeyPair::generate_with_primes(128).unwrap();
        let one = BigUint::one();

        assert_ne!(p, q);
        assert_eq!(keys.public.n, &p * &q);
        assert_eq!(keys.private.n, keys.public.n);

        let phi = (&p - &one) * (&q - &one);
        assert_eq!(gcd(&keys.public.e, &phi), one);
        assert_eq!((&keys.public.e * &keys.private.d) % &phi, one);
        assert!(keys.private.d < phi);
    }

    #[test]
    fn test_small_primes_fall_back_to_other_exponents() {
        // Com primos de 16 bits, φ(n) às vezes é múltiplo de 65537; a chave
        // precisa continuar válida de qualquer forma.
        for _ in 0..20 {
            let (keys, (p, q)) = KeyPair::generate_with_primes(16).unwrap();
            let one = BigUint::one();
            let phi = (&p - &one) * (&q - &one);
            assert_eq!((&keys.public.e * &keys.private.d) % &phi, one);
        }
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let keys = KeyPair::generate(256).unwrap();
        for message in ["hello", "", "Olá, mundo! ção ✓", "a"] {
            let c = encrypt(message, keys.public_key()).unwrap();
            assert_eq!(decrypt(&c, keys.private_key()).unwrap(), message);
        }
    }

    #[test]
    fn test_ciphertext_differs_from_plaintext() {
        let keys = KeyPair::generate(256).unwrap();
        let c = encrypt("hello", keys.public_key()).unwrap();
        assert_ne!(c, BigUint::from_bytes_be(b"hello"));
    }

    #[test]
    fn test_message_larger_than_modulus_is_refused() {
        let keys = KeyPair::generate(32).unwrap();
        let long = "uma mensagem longa demais para um módulo de 64 bits";
        assert_eq!(encrypt(long, keys.public_key()), Err(CipherError::MessageTooLarge));
    }

    #[test]
    fn test_ciphertext_out_of_range_is_refused() {
        let keys = KeyPair::generate(64).unwrap();
        let too_big = &keys.public.n + BigUint::one();
        assert_eq!(
            decrypt(&too_big, keys.private_key()),
            Err(CipherError::CiphertextOutOfRange)
        );
    }

    #[test]
    fn test_decrypt_reports_invalid_utf8() {
        // 0xFF nunca aparece em UTF-8 válido.
        let keys = KeyPair::generate(64).unwrap();
        let m = BigUint::from(0xFFu32);
        let c = m.modpow(&keys.public.e, &keys.public.n);
        assert!(matches!(decrypt(&c, keys.private_key()), Err(CipherError::Decode(_))));
    }

    #[test]
    fn test_public_key_exchange_format() {
        let key = PublicKey { n: BigUint::from(3233u32), e: BigUint::from(17u32) };
        assert_eq!(key.to_string(), "3233,17");
        assert_eq!("3233,17".parse::<PublicKey>().unwrap(), key);
        assert_eq!(" 3233 , 17\n".parse::<PublicKey>().unwrap(), key);
    }

    #[test]
    fn test_public_key_rejects_malformed_text() {
        for bad in ["", "3233", "3233;17", "abc,17", "3233,", "0,17", "1,2,3"] {
            assert!(
                matches!(bad.parse::<PublicKey>(), Err(TransportError::MalformedKey(_))),
                "{:?} deveria ser rejeitado",
                bad
            );
        }
    }
}
