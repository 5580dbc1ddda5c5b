//! Simulated backend side effects for dashboard buttons.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::simulate_latency;

/// Acknowledgement returned for every relayed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionAck {
    /// Always `true`; no failure path exists.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
}

/// One relayed action, as kept in the relay's journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Action name, e.g. `payFees`.
    pub action: String,
    /// Payload passed alongside the action.
    pub payload: Value,
    /// When the action resolved.
    pub performed_at: DateTime<Utc>,
}

/// Actions the dashboards know how to trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Student downloads an assignment brief.
    DownloadAssignment {
        /// Assignment identifier.
        assignment_id: String,
    },
    /// Student submits an assignment.
    SubmitAssignment {
        /// Assignment identifier.
        assignment_id: String,
    },
    /// Student or parent starts a fee payment.
    PayFees,
    /// Student downloads a transaction receipt.
    DownloadReceipt {
        /// Transaction identifier.
        transaction_id: String,
    },
    /// Parent messages a teacher.
    ContactTeacher {
        /// Teacher's display name.
        teacher_name: String,
    },
    /// Parent asks for a meeting.
    RequestMeeting,
}

impl Action {
    /// Relay name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            Action::DownloadAssignment { .. } => "downloadAssignment",
            Action::SubmitAssignment { .. } => "submitAssignment",
            Action::PayFees => "payFees",
            Action::DownloadReceipt { .. } => "downloadReceipt",
            Action::ContactTeacher { .. } => "contactTeacher",
            Action::RequestMeeting => "requestMeeting",
        }
    }

    /// Relay payload of the action.
    pub fn payload(&self) -> Value {
        match self {
            Action::DownloadAssignment { assignment_id }
            | Action::SubmitAssignment { assignment_id } => {
                json!({ "assignmentId": assignment_id })
            }
            Action::DownloadReceipt { transaction_id } => {
                json!({ "transactionId": transaction_id })
            }
            Action::ContactTeacher { teacher_name } => json!({ "teacherName": teacher_name }),
            Action::PayFees | Action::RequestMeeting => json!({}),
        }
    }

    /// Short notice a view shows once the action resolves.
    pub fn notice(&self) -> String {
        match self {
            Action::DownloadAssignment { assignment_id } => {
                format!("Assignment {assignment_id} has been downloaded.")
            }
            Action::SubmitAssignment { assignment_id } => {
                format!("Assignment {assignment_id} has been submitted successfully.")
            }
            Action::PayFees => "Payment initiated. You will be redirected to the payment gateway."
                .to_string(),
            Action::DownloadReceipt { .. } => {
                "The receipt has been downloaded to your device.".to_string()
            }
            Action::ContactTeacher { teacher_name } => {
                format!("Your message to {teacher_name} has been sent successfully.")
            }
            Action::RequestMeeting => {
                "Your meeting request has been submitted. You will be notified once it's scheduled."
                    .to_string()
            }
        }
    }
}

/// Accepts named actions and reports them done after a simulated delay.
#[derive(Clone)]
pub struct ActionRelay {
    latency: Duration,
    journal: Arc<Mutex<Vec<ActionRecord>>>,
}

impl ActionRelay {
    /// Relay resolving each action after `latency`.
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            journal: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Relay `action` with `payload`. Always succeeds.
    pub async fn perform(&self, action: &str, payload: Value) -> ActionAck {
        simulate_latency(self.latency).await;
        info!(action, %payload, "Action relayed");

        self.journal.lock().push(ActionRecord {
            action: action.to_string(),
            payload,
            performed_at: Utc::now(),
        });

        ActionAck {
            success: true,
            message: format!("{action} action completed successfully"),
        }
    }

    /// Relay a typed dashboard action.
    pub async fn dispatch(&self, action: &Action) -> ActionAck {
        self.perform(action.name(), action.payload()).await
    }

    /// Every action relayed so far, oldest first.
    pub fn journal(&self) -> Vec<ActionRecord> {
        self.journal.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pay_fees_always_succeeds() {
        let relay = ActionRelay::new(Duration::ZERO);
        for _ in 0..3 {
            let ack = relay.perform("payFees", json!({})).await;
            assert!(ack.success);
            assert_eq!(ack.message, "payFees action completed successfully");
        }
        assert_eq!(relay.journal().len(), 3);
    }

    #[tokio::test]
    async fn unknown_actions_are_acknowledged_too() {
        let relay = ActionRelay::new(Duration::ZERO);
        let ack = relay
            .perform("launchRocket", json!({ "target": "moon" }))
            .await;
        assert!(ack.success);

        let journal = relay.journal();
        assert_eq!(journal[0].action, "launchRocket");
        assert_eq!(journal[0].payload["target"], "moon");
    }

    #[tokio::test]
    async fn dispatch_uses_action_name_and_payload() {
        let relay = ActionRelay::new(Duration::ZERO);
        let action = Action::SubmitAssignment {
            assignment_id: "A1002".to_string(),
        };
        let ack = relay.dispatch(&action).await;
        assert_eq!(ack.message, "submitAssignment action completed successfully");

        let record = relay.journal().pop().unwrap();
        assert_eq!(record.action, "submitAssignment");
        assert_eq!(record.payload, json!({ "assignmentId": "A1002" }));
    }

    #[test]
    fn payloads_match_dashboard_contract() {
        let contact = Action::ContactTeacher {
            teacher_name: "Dr. Smith".to_string(),
        };
        assert_eq!(contact.name(), "contactTeacher");
        assert_eq!(contact.payload(), json!({ "teacherName": "Dr. Smith" }));
        assert!(contact.notice().contains("Dr. Smith"));

        let receipt = Action::DownloadReceipt {
            transaction_id: "T3001".to_string(),
        };
        assert_eq!(receipt.payload(), json!({ "transactionId": "T3001" }));
        assert_eq!(Action::RequestMeeting.payload(), json!({}));
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_after_configured_delay() {
        let relay = ActionRelay::new(Duration::from_millis(500));
        let started = tokio::time::Instant::now();
        relay.perform("requestMeeting", json!({})).await;
        assert!(started.elapsed() >= Duration::from_millis(500));
    }
}
