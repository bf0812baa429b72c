//! 상품 도메인 모델.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::{validate_amount, validate_not_blank};

/// 상품 레코드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    /// 구매 시 적립 포인트
    pub points: i32,
    pub category: Option<String>,
    pub stock: i32,
}

impl Product {
    /// 부분 업데이트 적용. 값이 있는 필드만 덮어씁니다.
    pub fn apply(&mut self, update: &ProductUpdate) {
        if let Some(name) = update.name.as_deref().filter(|n| !n.trim().is_empty()) {
            self.name = name.to_string();
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(points) = update.points {
            self.points = points;
        }
        if let Some(category) = &update.category {
            self.category = Some(category.clone());
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
    }
}

/// 상품 생성 요청.
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct NewProduct {
    #[validate(
        length(min = 1, max = 200, message = "상품명은 1-200자여야 합니다"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(custom(function = "validate_amount"))]
    pub price: Decimal,
    #[serde(default)]
    #[validate(range(min = 0, message = "포인트는 0 이상이어야 합니다"))]
    pub points: i32,
    #[serde(default)]
    #[validate(length(max = 100, message = "카테고리는 100자 이하여야 합니다"))]
    pub category: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "재고는 0 이상이어야 합니다"))]
    pub stock: i32,
}

/// 상품 부분 업데이트.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct ProductUpdate {
    /// 비어 있거나 공백뿐이면 변경하지 않습니다.
    #[serde(default)]
    #[validate(length(max = 200, message = "상품명은 200자 이하여야 합니다"))]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_amount"))]
    pub price: Option<Decimal>,
    #[serde(default)]
    #[validate(range(min = 0, message = "포인트는 0 이상이어야 합니다"))]
    pub points: Option<i32>,
    #[serde(default)]
    #[validate(length(max = 100, message = "카테고리는 100자 이하여야 합니다"))]
    pub category: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "재고는 0 이상이어야 합니다"))]
    pub stock: Option<i32>,
}
