use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated creator's account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatorProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subscribers_count: u64,
}

/// A subscriber of the creator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fan {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subscribed_at: Option<DateTime<Utc>>,
    /// Lifetime spend in the account currency.
    #[serde(default)]
    pub total_spent: f64,
}

/// A payment event (subscription, tip, PPV unlock, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub fan_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_optional_fields_default() {
        let json = r#"{"id": "f1", "username": "fan_one"}"#;
        let fan: Fan = serde_json::from_str(json).unwrap();
        assert_eq!(fan.id, "f1");
        assert_eq!(fan.name, None);
        assert_eq!(fan.subscribed_at, None);
        assert_eq!(fan.total_spent, 0.0);
    }

    #[test]
    fn test_transaction_type_field() {
        let json = r#"{
            "id": "t1",
            "amount": 9.99,
            "type": "tip",
            "fan_id": "f1",
            "created_at": "2026-03-01T10:00:00Z"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.kind, "tip");
        assert_eq!(tx.fan_id.as_deref(), Some("f1"));
    }
}
