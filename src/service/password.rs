use crate::error::CelebrateError;

/// bcrypt output: the full hash plus the salt it embeds.
#[derive(Debug, Clone)]
pub struct HashedPassword {
    pub hash: String,
    pub salt: String,
}

/// Hash on the blocking pool; bcrypt is deliberately slow.
pub async fn hash_password(password: String, cost: u32) -> Result<HashedPassword, CelebrateError> {
    let parts = tokio::task::spawn_blocking(move || bcrypt::hash_with_result(password, cost))
        .await??;
    Ok(HashedPassword {
        hash: parts.format_for_version(bcrypt::Version::TwoB),
        salt: parts.get_salt(),
    })
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, CelebrateError> {
    let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(matched)
}
