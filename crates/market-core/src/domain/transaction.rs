//! 트랜잭션 이벤트 태그.

use serde::{Deserialize, Serialize};

/// 원자적 작업 단위에 붙는 관측용 태그.
///
/// 상태를 가지지 않으며 로그에만 사용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionEvent {
    Create,
    Update,
    Delete,
}

impl TransactionEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionEvent::Create => "CREATE",
            TransactionEvent::Update => "UPDATE",
            TransactionEvent::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for TransactionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_labels() {
        assert_eq!(TransactionEvent::Create.to_string(), "CREATE");
        assert_eq!(TransactionEvent::Update.to_string(), "UPDATE");
        assert_eq!(
            serde_json::to_string(&TransactionEvent::Delete).unwrap(),
            "\"DELETE\""
        );
    }
}
