//! 장바구니 도메인 모델.
//!
//! 사용자마다 장바구니는 최대 하나입니다 (`user_id` UNIQUE).
//! `items`는 클라이언트가 정한 직렬화 문자열로, 서버는 내용을 해석하지 않습니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::validate_amount;

/// 장바구니 레코드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Cart {
    pub id: i64,
    pub items: Option<String>,
    pub total: Option<Decimal>,
    /// 소유 사용자 ID
    pub user_id: i64,
}

impl Cart {
    /// 부분 업데이트 적용. 레코드가 바뀌었으면 `true`.
    pub fn apply(&mut self, update: &CartUpdate) -> bool {
        let mut changed = false;
        if let Some(items) = &update.items {
            if self.items.as_ref() != Some(items) {
                self.items = Some(items.clone());
                changed = true;
            }
        }
        if let Some(total) = update.total {
            if self.total != Some(total) {
                self.total = Some(total);
                changed = true;
            }
        }
        changed
    }
}

/// 장바구니 생성 요청. 소유자는 요청자로 고정됩니다.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct NewCart {
    #[serde(default)]
    pub items: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_amount"))]
    pub total: Option<Decimal>,
}

/// 장바구니 부분 업데이트. 값이 있는 필드만 덮어씁니다.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CartUpdate {
    #[serde(default)]
    pub items: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_amount"))]
    pub total: Option<Decimal>,
}
