//! 상품 서비스.

use sqlx::{Postgres, Transaction};
use tracing::info;
use validator::Validate;

use market_core::{NewProduct, Product, ProductUpdate, TransactionEvent};

use crate::error::ServiceError;
use crate::repository::{run_in_transaction, Database, ProductRepository};

/// 상품 서비스.
#[derive(Clone)]
pub struct ProductService {
    db: Database,
}

impl ProductService {
    /// 새 서비스 생성.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 상품 등록.
    pub async fn create(&self, payload: NewProduct) -> Result<Product, ServiceError> {
        let pool = self.db.handle()?;
        payload.validate()?;

        let product = run_in_transaction(pool, TransactionEvent::Create, move |tx| {
            Box::pin(insert_product(tx, payload))
        })
        .await?;

        info!(product_id = product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// ID로 상품 조회.
    pub async fn fetch(&self, id: i64) -> Result<Product, ServiceError> {
        let pool = self.db.handle()?;
        ProductRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("상품", id))
    }

    /// 전체 상품 목록.
    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        let pool = self.db.handle()?;
        Ok(ProductRepository::list(pool).await?)
    }

    /// 상품 부분 업데이트.
    pub async fn update(&self, id: i64, changes: ProductUpdate) -> Result<Product, ServiceError> {
        let pool = self.db.handle()?;
        changes.validate()?;

        run_in_transaction(pool, TransactionEvent::Update, move |tx| {
            Box::pin(merge_product(tx, id, changes))
        })
        .await
    }

    /// 상품 삭제.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let pool = self.db.handle()?;

        run_in_transaction(pool, TransactionEvent::Delete, move |tx| {
            Box::pin(delete_product(tx, id))
        })
        .await?;

        info!(product_id = id, "Product deleted");
        Ok(())
    }
}

async fn insert_product(
    tx: &mut Transaction<'static, Postgres>,
    payload: NewProduct,
) -> Result<Product, ServiceError> {
    Ok(ProductRepository::insert(&mut **tx, &payload).await?)
}

async fn merge_product(
    tx: &mut Transaction<'static, Postgres>,
    id: i64,
    changes: ProductUpdate,
) -> Result<Product, ServiceError> {
    let mut product = ProductRepository::lock_by_id(&mut **tx, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("상품", id))?;

    product.apply(&changes);
    Ok(ProductRepository::save(&mut **tx, &product).await?)
}

async fn delete_product(
    tx: &mut Transaction<'static, Postgres>,
    id: i64,
) -> Result<(), ServiceError> {
    if ProductRepository::delete(&mut **tx, id).await? == 0 {
        return Err(ServiceError::not_found("상품", id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::connect_test_db;
    use rust_decimal_macros::dec;

    fn mug() -> NewProduct {
        NewProduct {
            name: "Mug".to_string(),
            description: Some("Ceramic".to_string()),
            price: dec!(12.50),
            points: 5,
            category: Some("kitchen".to_string()),
            stock: 10,
        }
    }

    #[tokio::test]
    async fn test_operations_fail_without_store() {
        let service = ProductService::new(Database::unavailable());

        assert!(matches!(
            service.list().await,
            Err(ServiceError::ServiceUnavailable)
        ));
        assert!(matches!(
            service.create(mug()).await,
            Err(ServiceError::ServiceUnavailable)
        ));
    }

    #[tokio::test]
    #[ignore] // DB 연결 필요
    async fn test_product_lifecycle() {
        let service = ProductService::new(connect_test_db().await);

        let created = service.create(mug()).await.unwrap();
        assert_eq!(created.price, dec!(12.50));

        let updated = service
            .update(
                created.id,
                ProductUpdate {
                    stock: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.stock, 3);
        assert_eq!(updated.name, "Mug");
        assert_eq!(updated.price, dec!(12.50));

        assert!(service
            .list()
            .await
            .unwrap()
            .iter()
            .any(|p| p.id == created.id));

        service.delete(created.id).await.unwrap();
        assert!(matches!(
            service.fetch(created.id).await,
            Err(ServiceError::NotFound(_))
        ));

        let err = service.delete(created.id).await.unwrap_err();
        assert!(matches!(err.root(), ServiceError::NotFound(_)));
    }

    #[tokio::test]
    #[ignore] // DB 연결 필요
    async fn test_out_of_range_values_are_validation_errors() {
        let db = connect_test_db().await;
        let service = ProductService::new(db.clone());

        let huge = NewProduct {
            price: dec!(10000000000000000000),
            ..mug()
        };
        assert!(matches!(
            service.create(huge.clone()).await,
            Err(ServiceError::Validation(_))
        ));

        // 요청 검증을 거치지 않아도 저장소 범위 에러는 400으로 분류
        let pool = db.handle().unwrap();
        let err = ProductRepository::insert(pool, &huge).await.unwrap_err();
        assert!(matches!(
            ServiceError::from(err),
            ServiceError::Validation(_)
        ));

        let long_category = NewProduct {
            category: Some("c".repeat(101)),
            ..mug()
        };
        let err = ProductRepository::insert(pool, &long_category)
            .await
            .unwrap_err();
        assert!(matches!(
            ServiceError::from(err),
            ServiceError::Validation(_)
        ));
    }
}
