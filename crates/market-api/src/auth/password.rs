//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id 기반 비밀번호 해싱 및 검증.
//! 비용 파라미터는 고정값이며 해시 문자열(PHC)에 함께 저장되므로,
//! 검증 비용은 호출자 입력이 아니라 저장된 파라미터에 의해 결정됩니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::warn;

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
}

/// 비밀번호 해싱.
///
/// 솔트는 호출마다 새로 생성됩니다.
///
/// # Returns
///
/// PHC 형식의 해시 문자열 (솔트 포함)
///
/// # Example
///
/// ```rust,ignore
/// let hash = hash_password("my_secure_password").unwrap();
/// // "$argon2id$v=19$m=19456,t=2,p=1$..."
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 불일치와 내부 오류(해시 형식 오류 등)를 구분하지 않고 모두 `false`를 반환합니다.
/// 내부 오류는 로그로만 남깁니다.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match check_password(password, stored_hash) {
        Ok(matched) => matched,
        Err(e) => {
            warn!(error = %e, "Password verification could not run");
            false
        }
    }
}

fn check_password(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash =
        PasswordHash::new(stored_hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// 블로킹 스레드에서 비밀번호 해싱.
///
/// Argon2는 의도적으로 느리므로 async 런타임 워커를 점유하지 않도록 분리합니다.
pub async fn hash_password_blocking(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|_| PasswordError::HashingFailed)?
}

/// 블로킹 스레드에서 비밀번호 검증.
pub async fn verify_password_blocking(password: String, stored_hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("p1").unwrap();

        // 해시 형식 확인 (argon2id)
        assert!(hash.starts_with("$argon2id$"));

        assert!(verify_password("p1", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_different_passwords_different_hashes() {
        let hash1 = hash_password("Password1").unwrap();
        let hash2 = hash_password("Password1").unwrap();

        // 같은 비밀번호라도 솔트가 다르므로 해시가 다름
        assert_ne!(hash1, hash2);
        assert!(verify_password("Password1", &hash1));
        assert!(verify_password("Password1", &hash2));
    }

    #[test]
    fn test_invalid_hash_format_is_not_verified() {
        assert!(!verify_password("password", "not-a-valid-hash"));
        assert!(matches!(
            check_password("password", "not-a-valid-hash"),
            Err(PasswordError::InvalidHashFormat)
        ));
    }

    #[test]
    fn test_unicode_password() {
        let password = "한글패스워드123";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash));
    }

    #[tokio::test]
    async fn test_blocking_helpers() {
        let hash = hash_password_blocking("p1".to_string()).await.unwrap();
        assert!(verify_password_blocking("p1".to_string(), hash.clone()).await);
        assert!(!verify_password_blocking("p2".to_string(), hash).await);
    }
}
