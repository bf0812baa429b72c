//! 장바구니 서비스.
//!
//! 장바구니는 사용자 ID로 식별되며 사용자당 하나만 존재합니다.
//! 접근 제어(본인 여부)는 라우트의 strict 게이트가 담당합니다.

use sqlx::{Postgres, Transaction};
use tracing::info;
use validator::Validate;

use market_core::{Cart, CartUpdate, NewCart, TransactionEvent};

use crate::error::ServiceError;
use crate::repository::{run_in_transaction, CartRepository, Database};

/// 장바구니 서비스.
#[derive(Clone)]
pub struct CartService {
    db: Database,
}

impl CartService {
    /// 새 서비스 생성.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 사용자 장바구니 생성. 이미 있으면 `Conflict`.
    pub async fn create(&self, user_id: i64, payload: NewCart) -> Result<Cart, ServiceError> {
        let pool = self.db.handle()?;
        payload.validate()?;

        let cart = run_in_transaction(pool, TransactionEvent::Create, move |tx| {
            Box::pin(insert_cart(tx, user_id, payload))
        })
        .await?;

        info!(cart_id = cart.id, user_id, "Cart created");
        Ok(cart)
    }

    /// 사용자 장바구니 조회.
    pub async fn fetch_by_user(&self, user_id: i64) -> Result<Cart, ServiceError> {
        let pool = self.db.handle()?;
        CartRepository::find_by_user(pool, user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(cart_missing(user_id)))
    }

    /// 사용자 장바구니 부분 업데이트.
    pub async fn update_by_user(
        &self,
        user_id: i64,
        changes: CartUpdate,
    ) -> Result<Cart, ServiceError> {
        let pool = self.db.handle()?;
        changes.validate()?;

        run_in_transaction(pool, TransactionEvent::Update, move |tx| {
            Box::pin(merge_cart(tx, user_id, changes))
        })
        .await
    }

    /// 사용자 장바구니 삭제.
    pub async fn delete_by_user(&self, user_id: i64) -> Result<(), ServiceError> {
        let pool = self.db.handle()?;

        run_in_transaction(pool, TransactionEvent::Delete, move |tx| {
            Box::pin(delete_cart(tx, user_id))
        })
        .await?;

        info!(user_id, "Cart deleted");
        Ok(())
    }
}

fn cart_missing(user_id: i64) -> String {
    format!("사용자 {}의 장바구니가 없습니다", user_id)
}

async fn insert_cart(
    tx: &mut Transaction<'static, Postgres>,
    user_id: i64,
    payload: NewCart,
) -> Result<Cart, ServiceError> {
    if CartRepository::lock_by_user(&mut **tx, user_id)
        .await?
        .is_some()
    {
        return Err(ServiceError::Conflict(format!(
            "사용자 {}의 장바구니가 이미 있습니다",
            user_id
        )));
    }
    Ok(CartRepository::insert(&mut **tx, user_id, payload.items.as_deref(), payload.total).await?)
}

async fn merge_cart(
    tx: &mut Transaction<'static, Postgres>,
    user_id: i64,
    changes: CartUpdate,
) -> Result<Cart, ServiceError> {
    let mut cart = CartRepository::lock_by_user(&mut **tx, user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(cart_missing(user_id)))?;

    if !cart.apply(&changes) {
        return Ok(cart);
    }
    Ok(CartRepository::save(&mut **tx, &cart).await?)
}

async fn delete_cart(
    tx: &mut Transaction<'static, Postgres>,
    user_id: i64,
) -> Result<(), ServiceError> {
    if CartRepository::delete_by_user(&mut **tx, user_id).await? == 0 {
        return Err(ServiceError::NotFound(cart_missing(user_id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{connect_test_db, unique_email};
    use crate::services::UserService;
    use market_core::NewUser;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_operations_fail_without_store() {
        let service = CartService::new(Database::unavailable());

        assert!(matches!(
            service.fetch_by_user(1).await,
            Err(ServiceError::ServiceUnavailable)
        ));
        assert!(matches!(
            service.create(1, NewCart::default()).await,
            Err(ServiceError::ServiceUnavailable)
        ));
        assert!(matches!(
            service.delete_by_user(1).await,
            Err(ServiceError::ServiceUnavailable)
        ));
    }

    #[tokio::test]
    #[ignore] // DB 연결 필요
    async fn test_cart_lifecycle() {
        let db = connect_test_db().await;
        let users = UserService::new(db.clone());
        let carts = CartService::new(db);

        let owner = users
            .create(NewUser {
                name: "Cart Owner".to_string(),
                email: unique_email("cart"),
                password: "p".to_string(),
                confirm_password: "p".to_string(),
            })
            .await
            .unwrap();

        assert!(matches!(
            carts.fetch_by_user(owner.id).await,
            Err(ServiceError::NotFound(_))
        ));

        let created = carts
            .create(
                owner.id,
                NewCart {
                    items: Some("[3,3,5]".to_string()),
                    total: Some(dec!(37.50)),
                },
            )
            .await
            .unwrap();
        assert_eq!(created.user_id, owner.id);

        let err = carts.create(owner.id, NewCart::default()).await.unwrap_err();
        assert!(matches!(err.root(), ServiceError::Conflict(_)));

        let updated = carts
            .update_by_user(
                owner.id,
                CartUpdate {
                    items: None,
                    total: Some(dec!(12.50)),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.total, Some(dec!(12.50)));
        assert_eq!(updated.items.as_deref(), Some("[3,3,5]"));

        carts.delete_by_user(owner.id).await.unwrap();
        let err = carts.delete_by_user(owner.id).await.unwrap_err();
        assert!(matches!(err.root(), ServiceError::NotFound(_)));

        // 사용자 삭제 시 장바구니도 함께 삭제
        carts.create(owner.id, NewCart::default()).await.unwrap();
        users.delete(owner.id).await.unwrap();
        assert!(matches!(
            carts.fetch_by_user(owner.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
