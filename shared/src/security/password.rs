//! 비밀번호 해싱 (bcrypt)
//!
//! bcrypt digests are self-describing (`$2b$<cost>$<salt+hash>`), so raising the
//! cost later does not invalidate digests that are already stored.

use crate::security::SecurityError;

/// Lowest and highest work factors bcrypt accepts.
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// Salted, cost-parameterized one-way password hasher.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, SecurityError> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            return Err(SecurityError::HashingFailure(format!(
                "bcrypt cost {cost} outside {MIN_BCRYPT_COST}..={MAX_BCRYPT_COST}"
            )));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// 비밀번호 해싱
    pub fn hash(&self, plaintext: &str) -> Result<String, SecurityError> {
        bcrypt::hash(plaintext, self.cost)
            .map_err(|e| SecurityError::HashingFailure(e.to_string()))
    }

    /// 비밀번호 검증
    ///
    /// A mismatch is `Ok(false)`. Only a digest that cannot be parsed is an error.
    pub fn verify(&self, digest: &str, plaintext: &str) -> Result<bool, SecurityError> {
        bcrypt::verify(plaintext, digest)
            .map_err(|e| SecurityError::HashingFailure(format!("unreadable digest: {e}")))
    }
}
