//! FILENAME: app/src/reminders.rs
// PURPOSE: Order reminder dispatch contract.
// CONTEXT: The dashboard only knows the `ReminderDispatcher` trait. Every send is
// bounded by a timeout and reports success or failure explicitly.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::logging::{log_info, log_warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReminderError {
    #[error("Reminder needs a customer")]
    MissingCustomer,

    #[error("Reminder needs an order id")]
    MissingOrderId,

    #[error("Reminder dispatch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Reminder rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tone {
    Friendly,
    Firm,
    Urgent,
}

impl Tone {
    pub fn from_name(name: &str) -> Result<Self, String> {
        match name.trim().to_ascii_lowercase().as_str() {
            "friendly" => Ok(Tone::Friendly),
            "firm" => Ok(Tone::Firm),
            "urgent" => Ok(Tone::Urgent),
            other => Err(format!("Unknown reminder tone: {}", other)),
        }
    }

    pub fn compose(&self, customer: &str, order_id: &str) -> String {
        match self {
            Tone::Friendly => format!(
                "Hi {}, just a friendly reminder about order {}. Let us know if you need anything!",
                customer, order_id
            ),
            Tone::Firm => format!(
                "Dear {}, order {} still needs your attention. \
                 Please respond at your earliest convenience.",
                customer, order_id
            ),
            Tone::Urgent => format!(
                "URGENT: {}, order {} requires immediate action to stay on schedule.",
                customer, order_id
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRequest {
    pub id: Uuid,
    pub customer: String,
    pub order_id: String,
    pub tone: Tone,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderReceipt {
    pub reminder_id: Uuid,
    pub order_id: String,
    pub sent_at: DateTime<Utc>,
}

/// Delivers reminders to customers.
#[async_trait]
pub trait ReminderDispatcher: Send + Sync {
    async fn dispatch(&self, request: &ReminderRequest) -> Result<ReminderReceipt, ReminderError>;
}

/// Stands in for a real notification service: waits `delay`, then accepts
/// every reminder except those for `rejected_customer`.
#[derive(Debug, Clone, Default)]
pub struct SimulatedDispatcher {
    pub delay: Duration,
    pub rejected_customer: Option<String>,
}

impl SimulatedDispatcher {
    pub fn new(delay: Duration) -> Self {
        SimulatedDispatcher {
            delay,
            rejected_customer: None,
        }
    }

    pub fn rejecting(mut self, customer: &str) -> Self {
        self.rejected_customer = Some(customer.to_string());
        self
    }
}

#[async_trait]
impl ReminderDispatcher for SimulatedDispatcher {
    async fn dispatch(&self, request: &ReminderRequest) -> Result<ReminderReceipt, ReminderError> {
        tokio::time::sleep(self.delay).await;

        if self.rejected_customer.as_deref() == Some(request.customer.as_str()) {
            return Err(ReminderError::Rejected(format!(
                "{} has opted out of reminders",
                request.customer
            )));
        }

        Ok(ReminderReceipt {
            reminder_id: request.id,
            order_id: request.order_id.clone(),
            sent_at: Utc::now(),
        })
    }
}

/// Validates the input, then dispatches within `timeout`.
pub async fn send_reminder(
    dispatcher: &dyn ReminderDispatcher,
    customer: &str,
    order_id: &str,
    tone: Tone,
    timeout: Duration,
) -> Result<ReminderReceipt, ReminderError> {
    let customer = customer.trim();
    let order_id = order_id.trim();
    if customer.is_empty() {
        return Err(ReminderError::MissingCustomer);
    }
    if order_id.is_empty() {
        return Err(ReminderError::MissingOrderId);
    }

    let request = ReminderRequest {
        id: Uuid::new_v4(),
        customer: customer.to_string(),
        order_id: order_id.to_string(),
        tone,
        message: tone.compose(customer, order_id),
    };

    log_info!("REMINDER", "dispatch {} order={} tone={:?}", request.id, order_id, tone);

    let result = match tokio::time::timeout(timeout, dispatcher.dispatch(&request)).await {
        Ok(result) => result,
        Err(_) => Err(ReminderError::Timeout(timeout)),
    };

    match &result {
        Ok(receipt) => log_info!("REMINDER", "sent {} at {}", receipt.reminder_id, receipt.sent_at),
        Err(e) => log_warn!("REMINDER", "failed {}: {}", request.id, e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_messages() {
        assert!(Tone::Friendly.compose("Acme", "ORD-001").contains("friendly reminder"));
        assert!(Tone::Urgent.compose("Acme", "ORD-001").starts_with("URGENT"));
        assert_eq!(Tone::from_name("Firm").unwrap(), Tone::Firm);
        assert!(Tone::from_name("polite").is_err());
    }

    #[tokio::test]
    async fn test_send_reminder_succeeds() {
        let dispatcher = SimulatedDispatcher::new(Duration::from_millis(1));
        let timeout = Duration::from_secs(1);
        let receipt = send_reminder(&dispatcher, "Acme", " ORD-001 ", Tone::Friendly, timeout)
            .await
            .unwrap();
        assert_eq!(receipt.order_id, "ORD-001");
    }

    #[tokio::test]
    async fn test_send_reminder_validates_input() {
        let dispatcher = SimulatedDispatcher::default();
        let timeout = Duration::from_secs(1);
        assert_eq!(
            send_reminder(&dispatcher, " ", "ORD-001", Tone::Firm, timeout).await,
            Err(ReminderError::MissingCustomer)
        );
        assert_eq!(
            send_reminder(&dispatcher, "Acme", "", Tone::Firm, timeout).await,
            Err(ReminderError::MissingOrderId)
        );
    }

    #[tokio::test]
    async fn test_send_reminder_times_out() {
        let dispatcher = SimulatedDispatcher::new(Duration::from_millis(500));
        let timeout = Duration::from_millis(10);
        assert_eq!(
            send_reminder(&dispatcher, "Acme", "ORD-001", Tone::Urgent, timeout).await,
            Err(ReminderError::Timeout(timeout))
        );
    }

    #[tokio::test]
    async fn test_send_reminder_reports_rejection() {
        let dispatcher = SimulatedDispatcher::new(Duration::ZERO).rejecting("Acme");
        let timeout = Duration::from_secs(1);
        let result = send_reminder(&dispatcher, "Acme", "ORD-001", Tone::Friendly, timeout).await;
        assert!(matches!(result, Err(ReminderError::Rejected(_))));
    }
}
