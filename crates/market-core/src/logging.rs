//! tracing 기반 로깅 초기화.
//!
//! 출력 형식은 `LOG_FORMAT`으로 고릅니다: `pretty`(개발), `json`(로그 수집기), `compact`.
//! 필터는 `RUST_LOG`가 우선이며, 없으면 [`DEFAULT_LOG_FILTER`]를 사용합니다.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// `RUST_LOG`가 없을 때의 기본 필터.
pub const DEFAULT_LOG_FILTER: &str = "market_api=info,market_core=info,tower_http=info";

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(format!("알 수 없는 로그 형식: {}", other)),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// EnvFilter 지시문 (예: "info", "market_api=debug")
    pub filter: String,
    pub format: LogFormat,
    /// 소스 위치(파일:줄) 출력 여부
    pub with_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            format: LogFormat::default(),
            with_location: false,
        }
    }
}

impl LogConfig {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// 프로세스 환경 변수에서 생성.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키-값 조회 함수에서 생성.
    ///
    /// 잘못된 `LOG_FORMAT` 값은 무시하고 기본 형식을 씁니다.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            filter: lookup("RUST_LOG")
                .filter(|f| !f.trim().is_empty())
                .unwrap_or(defaults.filter),
            format: lookup("LOG_FORMAT")
                .and_then(|f| f.parse().ok())
                .unwrap_or(defaults.format),
            with_location: lookup("LOG_LOCATION")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.with_location),
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = fmt::layer()
            .with_file(self.with_location)
            .with_line_number(self.with_location);

        match self.format {
            LogFormat::Pretty => base.pretty().boxed(),
            LogFormat::Json => base.json().boxed(),
            LogFormat::Compact => base.compact().boxed(),
        }
    }
}

/// 전역 subscriber 설치.
///
/// 프로세스당 한 번만 성공하며, 이미 설치되어 있으면 에러를 반환합니다.
///
/// ```no_run
/// use market_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("debug").with_format(LogFormat::Json)).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_new(&config.filter)?;

    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(filter)
        .try_init()?;

    tracing::info!(format = ?config.format, filter = %config.filter, "Logging initialized");
    Ok(())
}
