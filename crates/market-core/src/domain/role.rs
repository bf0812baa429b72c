//! 역할 기반 접근 제어 (RBAC).
//!
//! 사용자 역할은 전순서(total order)를 가지며, 권한 검사는
//! `principal.role >= required_role` 비교로 수행됩니다.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// 사용자 역할.
///
/// 와이어/DB 표현은 정수입니다 (`0 = USER`, `1 = ADMIN`).
/// 선언 순서가 곧 권한 순서이므로 `Ord` 비교를 그대로 사용합니다.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::Type))]
#[serde(try_from = "i16", into = "i16")]
#[repr(i16)]
pub enum Role {
    /// 일반 사용자
    #[default]
    User = 0,
    /// 관리자 - 모든 권한 보유
    Admin = 1,
}

impl Role {
    /// 역할의 우선순위 레벨 반환 (높을수록 더 많은 권한).
    pub fn level(self) -> i16 {
        self as i16
    }

    /// 요구 역할 이상인지 확인.
    pub fn satisfies(self, required: Role) -> bool {
        self >= required
    }

    /// 관리자 권한 이상인지 확인.
    pub fn is_admin(self) -> bool {
        self.satisfies(Role::Admin)
    }
}

impl TryFrom<i16> for Role {
    type Error = DomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::User),
            1 => Ok(Role::Admin),
            other => Err(DomainError::UnknownRole(other)),
        }
    }
}

impl From<Role> for i16 {
    fn from(role: Role) -> Self {
        role.level()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::User => "user",
            Role::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(Role::Admin > Role::User);
        assert!(Role::Admin.satisfies(Role::User));
        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(Role::User.satisfies(Role::User));
        assert!(!Role::User.satisfies(Role::Admin));
    }

    #[test]
    fn test_role_level_matches_wire_value() {
        assert_eq!(Role::User.level(), 0);
        assert_eq!(Role::Admin.level(), 1);
    }

    #[test]
    fn test_role_serialization_is_numeric() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "0");

        let parsed: Role = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, Role::Admin);

        // 정의되지 않은 값은 거부
        assert!(serde_json::from_str::<Role>("7").is_err());
    }

    #[test]
    fn test_role_try_from() {
        assert_eq!(Role::try_from(0), Ok(Role::User));
        assert_eq!(Role::try_from(-1), Err(DomainError::UnknownRole(-1)));
    }

    #[test]
    fn test_default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn prop_only_defined_levels_decode(value in any::<i16>()) {
            match Role::try_from(value) {
                Ok(role) => prop_assert_eq!(i16::from(role), value),
                Err(err) => {
                    prop_assert!(value != 0 && value != 1);
                    prop_assert_eq!(err, DomainError::UnknownRole(value));
                }
            }
        }

        #[test]
        fn prop_satisfies_matches_level_order(a in 0i16..=1, b in 0i16..=1) {
            let (a, b) = (Role::try_from(a).unwrap(), Role::try_from(b).unwrap());
            prop_assert_eq!(a.satisfies(b), a.level() >= b.level());
        }
    }
}
