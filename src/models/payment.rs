use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::image::ImageSlot;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "annually")]
    Annually,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    #[serde(rename = "bank")]
    BankTransfer,
    #[serde(rename = "card")]
    Card,
}

/// Transaction record written once per payment submission. It is only
/// ever replaced whole by a new submission.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TransactionDetails {
    pub transaction_id: String,
    pub receipt_url: String,
    pub selected_plan: Plan,
    pub payment_method: PaymentMethod,
    pub total_amount: f64,
    pub expiry_date: DateTime<Utc>,
}

/// Card fields are collected but the card path is permanently disabled;
/// nothing here is ever charged or persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDetails {
    pub card_holder: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

/// A validated payment-panel submission handed to the draft for commit.
/// Bank transfers always carry a receipt; the (disabled) card path has
/// none.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSubmission {
    pub selected_plan: Plan,
    pub payment_method: PaymentMethod,
    pub transaction_id: String,
    pub receipt: Option<ImageSlot>,
}
