//! Functionality related to the [Hashed] struct.
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

/// Re-export traits
pub use super::traits::*;

/// A fixed-length, H-byte cryptographic hash.
pub type Hash<const H: usize> = [u8; H];

/// A fixed-length, S-byte cryptographic salt.
pub type Salt<const S: usize> = [u8; S];

/// Length in bytes of the derived key stored for each account.
pub const KEY_LEN: usize = 32;

/// Length in bytes of the salt generated for each account.
pub const SALT_LEN: usize = 32;

/// The [Hashed] layout used for account passwords: a 32-byte key under a 32-byte salt.
pub type PasswordHash = Hashed<KEY_LEN, SALT_LEN>;

/// H bytes hashed and salted using PBKDF2-HMAC-SHA256 & a S-byte salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hashed<const H: usize, const S: usize> {
    hash: Hash<H>,
    salt: Salt<S>,
}
impl<const H: usize, const S: usize> Hashed<H, S> {
    /// PBKDF2 rounds. Changing this invalidates every stored credential.
    pub const NUM_ITERATIONS: u32 = 100_000;

    /// Length of the hex encoding produced by [Hashed::to_hex].
    pub const HEX_LEN: usize = 2 * (S + H);

    /// Hash and salt a byte slice using a given salt.
    pub fn hash_with_salt(byte_slice: &[u8], salt: Salt<S>) -> Self {
        let mut hash: Hash<H> = [0u8; H];
        pbkdf2_hmac::<Sha256>(byte_slice, &salt, Self::NUM_ITERATIONS, &mut hash);

        Self { hash, salt }
    }

    /// Create a [Hashed] from its fields.
    pub fn from_fields(hash: Hash<H>, salt: Salt<S>) -> Self {
        Self { hash, salt }
    }

    /// Check whether the given bytes match the bytes used to make this [Hashed].
    pub fn check_match(&self, byte_slice: &[u8]) -> bool {
        let hashed_input = Self::hash_with_salt(byte_slice, self.salt);
        constant_time_eq(self.hash(), hashed_input.hash())
    }

    /// Encode as lowercase hex of `salt || hash`.
    pub fn to_hex(&self) -> String {
        let mut bytes = Vec::with_capacity(S + H);
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.hash);
        hex::encode(bytes)
    }

    /// Decode the output of [Hashed::to_hex].
    ///
    /// Return [None] if the input is not hex or does not decode to exactly `S + H` bytes.
    pub fn from_hex<T>(encoded: T) -> Option<Self>
    where
        T: AsRef<[u8]>,
    {
        let bytes = hex::decode(encoded).ok()?;
        if bytes.len() != S + H {
            return None;
        }
        let (salt_bytes, hash_bytes) = bytes.split_at(S);
        let salt: Salt<S> = salt_bytes.try_into().ok()?;
        let hash: Hash<H> = hash_bytes.try_into().ok()?;
        Some(Self { hash, salt })
    }

    /// Return the [Hash] of this [Hashed].
    pub fn hash(&self) -> &Hash<H> {
        &self.hash
    }

    /// Return the [Salt] of this [Hashed].
    pub fn salt(&self) -> &Salt<S> {
        &self.salt
    }
}

/// Compare two byte slices without exiting early on the first difference.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let diff = a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff == 0
}
