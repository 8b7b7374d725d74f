//! Functionality related to hashing different types.
use rand_chacha::{
    rand_core::{RngCore, SeedableRng},
    ChaCha20Rng,
};

use super::hashed::*;

/// Implementors of this trait can be hashed and salted into a [Hashed].
///
/// Most implementations of this trait implement *only* [IntoHashed::into_hashed_with_salt] and
/// [IntoHashed::check_match].
pub trait IntoHashed<const H: usize, const S: usize> {
    /// Hash and salt using a fresh salt drawn from an OS-seeded ChaCha20 CSPRNG.
    fn into_hashed_rand_salt(self) -> Hashed<H, S>
    where
        Self: Sized,
    {
        self.into_hashed_with_salt(rand_salt())
    }

    /// Hash and salt using a given salt.
    fn into_hashed_with_salt(self, salt: Salt<S>) -> Hashed<H, S>;

    /// Check whether the given entity, when hashed, matches the given salt.
    fn check_match(self, hashed: &Hashed<H, S>) -> bool;
}

/// Generate a random S-byte [Salt].
pub fn rand_salt<const S: usize>() -> Salt<S> {
    let mut salt: Salt<S> = [0u8; S];
    let mut rng = ChaCha20Rng::from_entropy();
    rng.fill_bytes(&mut salt);
    salt
}

// Implementations for some external types.
macro_rules! impl_into_hashed_byte_vec {
    ($($t:ty),+) => {
        $(impl<const H: usize, const S: usize> IntoHashed<H, S> for $t {
            fn into_hashed_with_salt(self, salt: Salt<S>) -> Hashed<H, S> {
                let byte_vec: Vec<u8> = self.into();
                Hashed::hash_with_salt(&byte_vec, salt)
            }

            fn check_match(self, hashed: &Hashed<H, S>) -> bool {
                let byte_vec: Vec<u8> = self.into();
                hashed.check_match(&byte_vec)
            }
        })*
    }
}
impl_into_hashed_byte_vec!(Vec<u8>, &[u8], String, &str);
