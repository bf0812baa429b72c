//! 설정 관리.
//!
//! 애플리케이션 설정을 환경 변수에서 로드합니다. 설정 객체는 시작 시
//! 한 번 생성된 뒤 변경되지 않으며, 필요한 컴포넌트에 참조로 전달됩니다.
//!
//! # 환경변수
//!
//! - `API_HOST`, `API_PORT`: 바인딩 주소 (기본값: 127.0.0.1:3000)
//! - `DATABASE_URL`: PostgreSQL 연결 문자열 (없으면 DB 기능 비활성화)
//! - `DB_MAX_CONNECTIONS`, `DB_ACQUIRE_TIMEOUT_SECS`: 연결 풀 설정
//! - `JWT_SECRET`: HS256 서명 키 (필수, 최소 32바이트)
//! - `JWT_TTL_HOURS`: 토큰 유효 시간 (기본값: 24)
//! - `CORS_ORIGINS`: 쉼표로 구분된 허용 origin 목록
//! - `REQUEST_TIMEOUT_SECS`: 요청 타임아웃 (기본값: 30)

use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;

/// JWT 서명 키 최소 길이 (바이트).
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// 기본 토큰 유효 시간 (시간).
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// 토큰 유효 시간 상한 (1년).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 366;

/// 애플리케이션 설정.
#[derive(Debug)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 인증 설정
    pub auth: AuthConfig,
}

impl AppConfig {
    /// 프로세스 환경 변수에서 설정 로드.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 키-값 조회 함수에서 설정 로드.
    ///
    /// 테스트에서 전역 환경을 건드리지 않고 설정을 구성할 때 사용합니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            server: ServerConfig::from_lookup(&lookup)?,
            database: DatabaseConfig::from_lookup(&lookup)?,
            auth: AuthConfig::from_lookup(&lookup)?,
        })
    }
}

/// 서버 설정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 허용 CORS origin (비어 있으면 모든 origin 허용)
    pub cors_origins: Vec<String>,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let cors_origins = lookup("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: lookup("API_HOST").unwrap_or(defaults.host),
            port: parse_or(lookup, "API_PORT", defaults.port)?,
            cors_origins,
            request_timeout_secs: parse_or(
                lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
        })
    }

    /// `host:port` 형식의 바인딩 주소.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// 연결 문자열 (없으면 저장소 핸들이 초기화되지 않음)
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 10,
        }
    }
}

impl DatabaseConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            max_connections: parse_or(lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            acquire_timeout_secs: parse_or(
                lookup,
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout_secs,
            )?,
        })
    }
}

/// 인증 설정.
///
/// 서명 키는 프로세스 전역에서 하나만 사용합니다. 키를 바꾸면
/// 발급된 모든 토큰이 즉시 무효화됩니다.
#[derive(Debug)]
pub struct AuthConfig {
    secret: SecretString,
    /// 토큰 유효 시간 (시간)
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    /// 새 인증 설정 생성.
    pub fn new(secret: impl Into<String>, token_ttl_hours: i64) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: format!("최소 {}바이트 이상이어야 합니다", MIN_JWT_SECRET_LEN),
            });
        }
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&token_ttl_hours) {
            return Err(ConfigError::Invalid {
                name: "JWT_TTL_HOURS",
                reason: format!("1 이상 {} 이하여야 합니다", MAX_TOKEN_TTL_HOURS),
            });
        }

        Ok(Self {
            secret: SecretString::from(secret),
            token_ttl_hours,
        })
    }

    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let ttl = parse_or(lookup, "JWT_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?;
        Self::new(secret, ttl)
    }

    /// 서명 키 바이트.
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}

fn parse_or<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
