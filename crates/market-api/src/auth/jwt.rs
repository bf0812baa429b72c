//! JWT 토큰 처리.
//!
//! HS256 Access Token 발급과 2단계 검증 로직.
//!
//! 1. [`TokenCodec::parse`]: 서명/형식/만료만 확인하는 무상태 파싱.
//!    토큰에 담긴 `id`로 사용자를 조회하기 전에 사용합니다.
//! 2. [`TokenCodec::verify_bound`]: 조회한 사용자 레코드와 클레임(`id`, `email`)이
//!    현재 시점에 정확히 일치하는지 추가로 확인합니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use market_core::{AuthConfig, User};

/// Authorization 헤더 접두사.
pub const BEARER_PREFIX: &str = "Bearer ";

/// JWT 페이로드.
///
/// 와이어 키는 대소문자를 구분합니다: `id`, `email`, `exp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    /// 사용자 ID
    pub id: i64,
    /// 발급 시점의 사용자 이메일
    pub email: String,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 사용자에 대한 새 Claims 생성.
    ///
    /// 만료 시각이 표현 범위를 넘으면 `None`입니다.
    pub fn for_user(user: &User, ttl: Duration) -> Option<Self> {
        let exp = Utc::now().checked_add_signed(ttl)?;
        Some(Self {
            id: user.id,
            email: user.email.clone(),
            exp: exp.timestamp(),
        })
    }

    /// 토큰이 만료되었는지 확인.
    ///
    /// `exp`가 현재 시각보다 미래여야 유효합니다.
    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }
}

/// 서명 검증 후 타입 확인 전의 원시 페이로드.
#[derive(Debug, Default, Deserialize)]
struct RawClaims {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    email: Option<Value>,
    #[serde(default)]
    exp: Option<Value>,
}

impl TryFrom<RawClaims> for Claims {
    type Error = TokenError;

    fn try_from(raw: RawClaims) -> Result<Self, Self::Error> {
        let id = raw.id.ok_or(TokenError::MissingClaim("id"))?;
        let id = integer_claim(&id).ok_or(TokenError::InvalidClaim("id"))?;

        let email = raw.email.ok_or(TokenError::MissingClaim("email"))?;
        let email = match email {
            Value::String(s) if !s.is_empty() => s,
            _ => return Err(TokenError::InvalidClaim("email")),
        };

        let exp = raw.exp.ok_or(TokenError::MissingClaim("exp"))?;
        let exp = integer_claim(&exp).ok_or(TokenError::InvalidClaim("exp"))?;

        Ok(Self { id, email, exp })
    }
}

/// 숫자 클레임을 정수로 해석.
///
/// 다른 구현이 발급한 토큰은 숫자를 실수로 인코딩할 수 있으므로
/// 소수부가 없는 실수도 허용합니다.
fn integer_claim(value: &Value) -> Option<i64> {
    let number = value.as_number()?;
    if let Some(n) = number.as_i64() {
        return Some(n);
    }
    let f = number.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// 토큰 검증 실패 사유.
///
/// 모든 사유는 호출자에게 동일하게 `Unauthenticated`로 보고되며,
/// 구체적인 사유는 로그에만 남습니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("인증 토큰이 필요합니다")]
    MissingHeader,
    #[error("잘못된 Authorization 헤더 형식")]
    MalformedHeader,
    #[error("서명 검증 실패")]
    InvalidSignature,
    #[error("잘못된 토큰 형식")]
    Malformed,
    #[error("필수 클레임 누락: {0}")]
    MissingClaim(&'static str),
    #[error("클레임 형식 오류: {0}")]
    InvalidClaim(&'static str),
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("사용자 정보와 클레임 불일치: {0}")]
    PrincipalMismatch(&'static str),
}

/// 토큰 서명 실패.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("토큰 서명 실패: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
    #[error("토큰 만료 시각 계산 실패")]
    ExpiryOutOfRange,
}

/// 토큰 발급/검증기.
///
/// 서명 키는 생성 시점에 한 번 주입되고 이후 변경되지 않습니다.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// 인증 설정에서 생성.
    ///
    /// `token_ttl_hours`는 [`AuthConfig::new`]에서 범위가 검증된 값입니다.
    pub fn new(config: &AuthConfig) -> Self {
        let ttl = Duration::try_hours(config.token_ttl_hours).unwrap_or(Duration::MAX);
        Self::from_secret(config.secret_bytes(), ttl)
    }

    /// 서명 키와 유효 시간으로 생성.
    pub fn from_secret(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // 만료와 필수 클레임은 직접 검사하여 사유별 에러로 구분합니다.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// 토큰 유효 시간.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 인증된 사용자에 대한 Access Token 발급.
    pub fn issue(&self, user: &User) -> Result<String, SigningError> {
        let claims = Claims::for_user(user, self.ttl).ok_or_else(|| {
            error!(user_id = user.id, ttl_secs = self.ttl.num_seconds(), "Token expiry out of range");
            SigningError::ExpiryOutOfRange
        })?;
        self.sign(&claims)
    }

    /// 주어진 Claims를 그대로 서명.
    pub fn sign(&self, claims: &Claims) -> Result<String, SigningError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, user_id = claims.id, "Failed to sign token");
            SigningError::Encode(e)
        })
    }

    /// 무상태 파싱.
    ///
    /// 헤더 형식, 서명, 클레임 형식, 만료를 확인합니다.
    /// 현재 저장된 사용자 상태와의 비교는 하지 않습니다.
    pub fn parse(&self, header_value: Option<&str>) -> Result<Claims, TokenError> {
        let header_value = header_value.ok_or(TokenError::MissingHeader)?;
        let token = header_value
            .strip_prefix(BEARER_PREFIX)
            .filter(|t| !t.is_empty())
            .ok_or(TokenError::MalformedHeader)?;

        let raw = decode::<RawClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                _ => TokenError::Malformed,
            })?
            .claims;

        let claims = Claims::try_from(raw)?;
        if claims.is_expired() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// 사용자 결합 검증.
    ///
    /// [`parse`](Self::parse)에 더해, 방금 조회한 사용자 레코드와
    /// `id`, `email`이 정확히 일치하는지 확인하고 만료를 다시 검사합니다.
    pub fn verify_bound(
        &self,
        header_value: Option<&str>,
        principal: &User,
    ) -> Result<Claims, TokenError> {
        let claims = self.parse(header_value)?;
        bind_claims(claims, principal)
    }
}

/// Claims를 사용자 레코드에 결합.
pub fn bind_claims(claims: Claims, principal: &User) -> Result<Claims, TokenError> {
    if claims.id != principal.id {
        return Err(TokenError::PrincipalMismatch("id"));
    }
    if claims.email != principal.email {
        return Err(TokenError::PrincipalMismatch("email"));
    }
    if claims.is_expired() {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}
