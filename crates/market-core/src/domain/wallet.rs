//! 지갑 도메인 모델.
//!
//! 지갑은 정확히 한 명의 사용자에게 속합니다. 잔액(`amount`)과
//! 포인트(`points`)는 관리자만 변경할 수 있고, 소유자는 변경되지 않습니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::{validate_amount, validate_not_blank};

/// 지갑 레코드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Wallet {
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub points: Decimal,
    /// 소유 사용자 ID
    pub user_id: i64,
}

impl Wallet {
    /// 특정 사용자 소유인지 확인.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// 지갑 생성 요청.
///
/// `amount`, `points`는 필수이지만 관리자가 아닌 요청자의 값은 0으로 강제됩니다.
/// `user_id`는 관리자 요청에서만 의미가 있습니다.
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct NewWallet {
    #[validate(
        length(min = 1, max = 100, message = "지갑 이름은 1-100자여야 합니다"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,
    #[validate(custom(function = "validate_amount"))]
    pub points: Decimal,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// 저장소에 전달되는 확정된 지갑 값.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWalletRecord {
    pub name: String,
    pub amount: Decimal,
    pub points: Decimal,
    pub user_id: i64,
}

/// 지갑 부분 업데이트.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct WalletUpdate {
    /// 비어 있거나 공백뿐이면 변경하지 않습니다.
    #[serde(default)]
    #[validate(length(max = 100, message = "지갑 이름은 100자 이하여야 합니다"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_amount"))]
    pub amount: Option<Decimal>,
    #[serde(default)]
    #[validate(custom(function = "validate_amount"))]
    pub points: Option<Decimal>,
    /// 소유자 변경 시도 감지용. 현재 소유자와 다르면 거부됩니다.
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl WalletUpdate {
    /// 권한 있는 필드(`amount`, `points`)를 포함하는지 확인.
    pub fn touches_balance(&self) -> bool {
        self.amount.is_some() || self.points.is_some()
    }
}
