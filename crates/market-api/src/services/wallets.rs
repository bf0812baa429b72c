//! 지갑 서비스.
//!
//! 지갑 접근 규칙:
//! - 조회/수정/삭제는 소유자 또는 관리자만 가능합니다.
//!   관리자가 아닌 요청자에게는 없는 지갑과 남의 지갑이 똑같이 `Forbidden`입니다.
//! - 관리자가 아닌 사용자가 만든 지갑은 항상 본인 소유이며 잔액과 포인트가 0으로 시작합니다.
//! - 관리자는 대상 사용자를 지정해 지갑을 만들 수 있고, 그 사용자는 존재해야 합니다.
//! - 잔액(`amount`)과 포인트(`points`)는 관리자만 바꿀 수 있으며,
//!   다른 사용자가 보낸 값은 무시됩니다.
//! - 소유자(`user_id`)는 누구도 바꿀 수 없습니다.

use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info, warn};
use validator::Validate;

use market_core::{NewWallet, NewWalletRecord, TransactionEvent, User, Wallet, WalletUpdate};

use crate::error::ServiceError;
use crate::repository::{run_in_transaction, Database, UserRepository, WalletRepository};

// ==================== 접근 정책 ====================

/// 요청자의 지갑 생성 요청을 저장할 값으로 확정.
pub fn resolve_new_wallet(actor: &User, payload: NewWallet) -> Result<NewWalletRecord, ServiceError> {
    if actor.is_admin() {
        let user_id = payload.user_id.ok_or_else(|| {
            ServiceError::Validation("대상 사용자(user_id)를 지정해야 합니다".to_string())
        })?;
        return Ok(NewWalletRecord {
            name: payload.name,
            amount: payload.amount,
            points: payload.points,
            user_id,
        });
    }

    if payload.amount != Decimal::ZERO || payload.points != Decimal::ZERO {
        debug!(user_id = actor.id, "Ignoring initial balance from non-admin");
    }
    Ok(NewWalletRecord {
        name: payload.name,
        amount: Decimal::ZERO,
        points: Decimal::ZERO,
        user_id: actor.id,
    })
}

/// 소유자 또는 관리자인지 확인.
pub fn authorize_access(actor: &User, wallet: &Wallet) -> Result<(), ServiceError> {
    if actor.is_admin() || wallet.is_owned_by(actor.id) {
        Ok(())
    } else {
        warn!(
            user_id = actor.id,
            wallet_id = wallet.id,
            "Wallet access denied"
        );
        Err(ServiceError::Forbidden)
    }
}

/// 조회한 지갑이 없을 때의 에러.
///
/// 관리자만 `NotFound`를 받고, 다른 요청자는 ID 존재 여부를 알 수 없도록 `Forbidden`입니다.
pub fn missing_wallet(actor: &User, id: i64) -> ServiceError {
    if actor.is_admin() {
        ServiceError::not_found("지갑", id)
    } else {
        debug!(user_id = actor.id, wallet_id = id, "Wallet lookup miss for non-admin");
        ServiceError::Forbidden
    }
}

/// 요청자 권한에 따라 부분 업데이트를 적용.
///
/// 레코드가 실제로 바뀌었으면 `true`를 반환합니다.
pub fn apply_update(
    actor: &User,
    wallet: &mut Wallet,
    changes: &WalletUpdate,
) -> Result<bool, ServiceError> {
    authorize_access(actor, wallet)?;

    if let Some(user_id) = changes.user_id {
        if user_id != wallet.user_id {
            warn!(
                user_id = actor.id,
                wallet_id = wallet.id,
                requested_owner = user_id,
                "Wallet owner change rejected"
            );
            return Err(ServiceError::Forbidden);
        }
    }

    let mut changed = false;
    if let Some(name) = changes.name.as_deref().filter(|n| !n.trim().is_empty()) {
        if wallet.name != name {
            wallet.name = name.to_string();
            changed = true;
        }
    }

    if changes.touches_balance() && !actor.is_admin() {
        debug!(
            user_id = actor.id,
            wallet_id = wallet.id,
            "Ignoring balance change from non-admin"
        );
        return Ok(changed);
    }
    if let Some(amount) = changes.amount {
        changed |= wallet.amount != amount;
        wallet.amount = amount;
    }
    if let Some(points) = changes.points {
        changed |= wallet.points != points;
        wallet.points = points;
    }

    Ok(changed)
}

// ==================== 서비스 ====================

/// 지갑 서비스.
#[derive(Clone)]
pub struct WalletService {
    db: Database,
}

impl WalletService {
    /// 새 서비스 생성.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 지갑 생성.
    pub async fn create(&self, actor: &User, payload: NewWallet) -> Result<Wallet, ServiceError> {
        let pool = self.db.handle()?;
        payload.validate()?;

        let record = resolve_new_wallet(actor, payload)?;
        let check_owner = actor.is_admin();

        let wallet = run_in_transaction(pool, TransactionEvent::Create, move |tx| {
            Box::pin(insert_wallet(tx, record, check_owner))
        })
        .await?;

        info!(
            wallet_id = wallet.id,
            owner_id = wallet.user_id,
            created_by = actor.id,
            "Wallet created"
        );
        Ok(wallet)
    }

    /// 지갑 조회 (소유자 또는 관리자).
    pub async fn fetch(&self, actor: &User, id: i64) -> Result<Wallet, ServiceError> {
        let pool = self.db.handle()?;
        let wallet = WalletRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| missing_wallet(actor, id))?;

        authorize_access(actor, &wallet)?;
        Ok(wallet)
    }

    /// 지갑 부분 업데이트.
    pub async fn update(
        &self,
        actor: &User,
        id: i64,
        changes: WalletUpdate,
    ) -> Result<Wallet, ServiceError> {
        let pool = self.db.handle()?;
        changes.validate()?;

        let actor = actor.clone();
        run_in_transaction(pool, TransactionEvent::Update, move |tx| {
            Box::pin(merge_wallet(tx, actor, id, changes))
        })
        .await
    }

    /// 지갑 삭제 (소유자 또는 관리자).
    pub async fn delete(&self, actor: &User, id: i64) -> Result<(), ServiceError> {
        let pool = self.db.handle()?;

        let owner = actor.clone();
        run_in_transaction(pool, TransactionEvent::Delete, move |tx| {
            Box::pin(delete_wallet(tx, owner, id))
        })
        .await?;

        info!(wallet_id = id, deleted_by = actor.id, "Wallet deleted");
        Ok(())
    }
}

async fn insert_wallet(
    tx: &mut Transaction<'static, Postgres>,
    record: NewWalletRecord,
    check_owner: bool,
) -> Result<Wallet, ServiceError> {
    if check_owner
        && UserRepository::find_by_id(&mut **tx, record.user_id)
            .await?
            .is_none()
    {
        return Err(ServiceError::Validation(format!(
            "대상 사용자가 존재하지 않습니다: {}",
            record.user_id
        )));
    }
    Ok(WalletRepository::insert(&mut **tx, &record).await?)
}

async fn merge_wallet(
    tx: &mut Transaction<'static, Postgres>,
    actor: User,
    id: i64,
    changes: WalletUpdate,
) -> Result<Wallet, ServiceError> {
    let mut wallet = WalletRepository::lock_by_id(&mut **tx, id)
        .await?
        .ok_or_else(|| missing_wallet(&actor, id))?;

    if !apply_update(&actor, &mut wallet, &changes)? {
        return Ok(wallet);
    }
    Ok(WalletRepository::save(&mut **tx, &wallet).await?)
}

async fn delete_wallet(
    tx: &mut Transaction<'static, Postgres>,
    actor: User,
    id: i64,
) -> Result<(), ServiceError> {
    let wallet = WalletRepository::lock_by_id(&mut **tx, id)
        .await?
        .ok_or_else(|| missing_wallet(&actor, id))?;

    authorize_access(&actor, &wallet)?;
    WalletRepository::delete(&mut **tx, id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{connect_test_db, unique_email};
    use crate::services::UserService;
    use market_core::{NewUser, Role};
    use rust_decimal_macros::dec;

    fn user(id: i64, role: Role) -> User {
        User {
            id,
            name: format!("user{}", id),
            email: format!("user{}@x.com", id),
            password_hash: "hash".to_string(),
            role,
        }
    }

    fn wallet(owner: i64) -> Wallet {
        Wallet {
            id: 100,
            name: "W".to_string(),
            amount: dec!(50),
            points: dec!(5),
            user_id: owner,
        }
    }

    fn payload(user_id: Option<i64>) -> NewWallet {
        NewWallet {
            name: "W".to_string(),
            amount: dec!(500),
            points: dec!(10),
            user_id,
        }
    }

    #[test]
    fn test_non_admin_wallet_starts_empty_and_self_owned() {
        let actor = user(7, Role::User);
        let record = resolve_new_wallet(&actor, payload(Some(99))).unwrap();

        assert_eq!(record.user_id, 7);
        assert_eq!(record.amount, Decimal::ZERO);
        assert_eq!(record.points, Decimal::ZERO);
    }

    #[test]
    fn test_admin_wallet_keeps_values_and_target() {
        let admin = user(1, Role::Admin);
        let record = resolve_new_wallet(&admin, payload(Some(7))).unwrap();

        assert_eq!(record.user_id, 7);
        assert_eq!(record.amount, dec!(500));
        assert_eq!(record.points, dec!(10));

        assert!(matches!(
            resolve_new_wallet(&admin, payload(None)),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_access_is_owner_or_admin() {
        let w = wallet(7);
        assert!(authorize_access(&user(7, Role::User), &w).is_ok());
        assert!(authorize_access(&user(1, Role::Admin), &w).is_ok());
        assert!(matches!(
            authorize_access(&user(8, Role::User), &w),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn test_missing_wallet_hides_existence_from_non_admin() {
        assert!(matches!(
            missing_wallet(&user(7, Role::User), 404),
            ServiceError::Forbidden
        ));
        assert!(matches!(
            missing_wallet(&user(1, Role::Admin), 404),
            ServiceError::NotFound(_)
        ));
    }

    #[test]
    fn test_admin_changes_balance_of_other_users_wallet() {
        let mut w = wallet(7);
        let changed = apply_update(
            &user(1, Role::Admin),
            &mut w,
            &WalletUpdate {
                amount: Some(dec!(900)),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(changed);
        assert_eq!(w.amount, dec!(900));
        assert_eq!(w.points, dec!(5));
    }

    #[test]
    fn test_owner_balance_change_is_ignored_but_name_applies() {
        let mut w = wallet(7);
        let changed = apply_update(
            &user(7, Role::User),
            &mut w,
            &WalletUpdate {
                name: Some("Savings".to_string()),
                amount: Some(dec!(1000000)),
                points: Some(dec!(1)),
                user_id: None,
            },
        )
        .unwrap();

        assert!(changed);
        assert_eq!(w.name, "Savings");
        assert_eq!(w.amount, dec!(50));
        assert_eq!(w.points, dec!(5));
    }

    #[test]
    fn test_non_owner_is_rejected_before_any_change() {
        let mut w = wallet(7);
        let before = w.clone();
        let result = apply_update(
            &user(8, Role::User),
            &mut w,
            &WalletUpdate {
                amount: Some(dec!(900)),
                ..Default::default()
            },
        );

        assert!(matches!(result, Err(ServiceError::Forbidden)));
        assert_eq!(w, before);
    }

    #[test]
    fn test_owner_change_is_always_rejected() {
        for actor in [user(7, Role::User), user(1, Role::Admin)] {
            let mut w = wallet(7);
            let result = apply_update(
                &actor,
                &mut w,
                &WalletUpdate {
                    user_id: Some(8),
                    ..Default::default()
                },
            );
            assert!(matches!(result, Err(ServiceError::Forbidden)));
        }

        // 현재 소유자와 같은 값은 변경이 아님
        let mut w = wallet(7);
        let same_owner = WalletUpdate {
            user_id: Some(7),
            ..Default::default()
        };
        assert!(!apply_update(&user(7, Role::User), &mut w, &same_owner).unwrap());
    }

    #[tokio::test]
    async fn test_operations_fail_without_store() {
        let service = WalletService::new(Database::unavailable());
        let actor = user(1, Role::User);

        assert!(matches!(
            service.fetch(&actor, 1).await,
            Err(ServiceError::ServiceUnavailable)
        ));
        assert!(matches!(
            service.create(&actor, payload(None)).await,
            Err(ServiceError::ServiceUnavailable)
        ));
    }

    async fn register(users: &UserService, name: &str) -> User {
        users
            .create(NewUser {
                name: name.to_string(),
                email: unique_email(name),
                password: "p".to_string(),
                confirm_password: "p".to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore] // DB 연결 필요
    async fn test_wallet_scenarios() {
        let db = connect_test_db().await;
        let users = UserService::new(db.clone());
        let wallets = WalletService::new(db);

        let owner = register(&users, "owner").await;
        let stranger = register(&users, "stranger").await;
        let admin = User {
            role: Role::Admin,
            ..register(&users, "admin").await
        };

        let created = wallets.create(&owner, payload(None)).await.unwrap();
        assert_eq!(created.user_id, owner.id);
        assert_eq!(created.amount, Decimal::ZERO);
        assert_eq!(created.points, Decimal::ZERO);

        let topped_up = wallets
            .update(
                &admin,
                created.id,
                WalletUpdate {
                    amount: Some(dec!(250)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(topped_up.amount, dec!(250));

        let err = wallets
            .update(
                &stranger,
                created.id,
                WalletUpdate {
                    amount: Some(dec!(1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err.root(), ServiceError::Forbidden));
        assert_eq!(
            wallets.fetch(&owner, created.id).await.unwrap().amount,
            dec!(250)
        );

        let err = wallets
            .create(&admin, payload(Some(i64::MAX)))
            .await
            .unwrap_err();
        assert!(matches!(err.root(), ServiceError::Validation(_)));

        assert!(matches!(
            wallets.fetch(&stranger, created.id).await,
            Err(ServiceError::Forbidden)
        ));
        wallets.delete(&owner, created.id).await.unwrap();

        // 삭제된 지갑: 일반 사용자에게는 남의 지갑과 구분되지 않음
        assert!(matches!(
            wallets.fetch(&stranger, created.id).await,
            Err(ServiceError::Forbidden)
        ));
        let err = wallets
            .update(&owner, created.id, WalletUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err.root(), ServiceError::Forbidden));
        let err = wallets.delete(&stranger, created.id).await.unwrap_err();
        assert!(matches!(err.root(), ServiceError::Forbidden));
        assert!(matches!(
            wallets.fetch(&admin, created.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
