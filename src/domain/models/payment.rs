use serde::Deserialize;
use std::collections::HashMap;

/// Event envelope as delivered by the payment processor's webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookData {
    pub object: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Complete,
    Open,
    Expired,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CustomerDetails {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineItem {
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LineItems {
    #[serde(default)]
    pub data: Vec<LineItem>,
}

/// Checkout session as read from the webhook payload. Owned by the payment
/// processor; everything beyond `id` is optional at the wire level and
/// validated here at the boundary instead of ad hoc in business logic.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentSession {
    pub id: String,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub status: Option<SessionStatus>,
    #[serde(default)]
    pub payment_intent: Option<String>,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(default)]
    pub line_items: Option<LineItems>,
}

impl PaymentSession {
    /// Money has actually moved and the session is closed out.
    pub fn is_settled(&self) -> bool {
        self.payment_status == Some(PaymentStatus::Paid)
            && self.status == Some(SessionStatus::Complete)
    }

    pub fn customer_email(&self) -> Option<&str> {
        self.customer_details.as_ref().and_then(|c| c.email.as_deref())
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer_details.as_ref().and_then(|c| c.name.as_deref())
    }

    pub fn event_id(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.get("event_id")).map(|s| s.as_str())
    }

    /// Purchased quantity: explicit metadata wins, then summed line items,
    /// then 1.
    pub fn quantity(&self) -> u32 {
        if let Some(q) = self
            .metadata
            .as_ref()
            .and_then(|m| m.get("quantity"))
            .and_then(|q| q.parse::<u32>().ok())
            && q > 0
        {
            return q;
        }

        if let Some(items) = &self.line_items {
            let sum: i64 = items.data.iter().map(|i| i.quantity.unwrap_or(1)).sum();
            if sum > 0 {
                return sum as u32;
            }
        }

        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(value: serde_json::Value) -> PaymentSession {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn settled_requires_paid_and_complete() {
        let s = session(json!({"id": "cs_1", "payment_status": "paid", "status": "complete"}));
        assert!(s.is_settled());

        let s = session(json!({"id": "cs_1", "payment_status": "unpaid", "status": "complete"}));
        assert!(!s.is_settled());

        let s = session(json!({"id": "cs_1", "payment_status": "paid", "status": "open"}));
        assert!(!s.is_settled());

        let s = session(json!({"id": "cs_1"}));
        assert!(!s.is_settled());
    }

    #[test]
    fn quantity_prefers_metadata() {
        let s = session(json!({
            "id": "cs_1",
            "metadata": {"quantity": "3"},
            "line_items": {"data": [{"quantity": 1}]}
        }));
        assert_eq!(s.quantity(), 3);
    }

    #[test]
    fn quantity_falls_back_to_line_items() {
        let s = session(json!({
            "id": "cs_1",
            "line_items": {"data": [{"quantity": 2}, {"quantity": 1}]}
        }));
        assert_eq!(s.quantity(), 3);
    }

    #[test]
    fn quantity_defaults_to_one() {
        let s = session(json!({"id": "cs_1"}));
        assert_eq!(s.quantity(), 1);

        let s = session(json!({"id": "cs_1", "metadata": {"quantity": "nonsense"}}));
        assert_eq!(s.quantity(), 1);
    }

    #[test]
    fn unknown_statuses_parse_as_other() {
        let s = session(json!({"id": "cs_1", "payment_status": "partially_funded", "status": "frozen"}));
        assert_eq!(s.payment_status, Some(PaymentStatus::Other));
        assert_eq!(s.status, Some(SessionStatus::Other));
    }
}
