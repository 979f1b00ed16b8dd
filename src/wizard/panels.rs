use crate::errors::ValidationErrors;
use crate::models::image::ImageSlot;
use crate::models::listing::PaymentStatus;
use crate::models::payment::{CardDetails, PaymentMethod, PaymentSubmission, Plan};
use crate::services::pricing_service::Pricing;
use crate::wizard::draft::{DetailsPayload, ListingDraft};
use crate::wizard::validation;

/// Form state for the listing-details step. Validation messages stay
/// hidden until the first submit attempt.
#[derive(Debug, Clone)]
pub struct DetailsPanel {
    pub payload: DetailsPayload,
    submitted: bool,
    errors: ValidationErrors,
}

impl DetailsPanel {
    pub fn new(draft: &ListingDraft) -> Self {
        Self {
            payload: draft.details.clone(),
            submitted: false,
            errors: ValidationErrors::new(),
        }
    }

    /// Validate and hand the payload to the controller. `None` means
    /// the commit must not proceed; the errors are now visible.
    pub fn try_submit(&mut self, draft: &ListingDraft) -> Option<DetailsPayload> {
        self.submitted = true;
        self.errors = validation::validate_details(&self.payload, draft);
        if self.errors.is_empty() {
            Some(self.payload.clone())
        } else {
            None
        }
    }

    pub fn visible_errors(&self) -> Option<&ValidationErrors> {
        if self.submitted && !self.errors.is_empty() {
            Some(&self.errors)
        } else {
            None
        }
    }
}

pub fn payment_status_message(status: PaymentStatus) -> Option<&'static str> {
    match status {
        PaymentStatus::Pending => Some("Your payment is pending approval."),
        PaymentStatus::Approved => Some("Your payment has been approved."),
        PaymentStatus::Rejected => Some("Your payment has been rejected."),
        PaymentStatus::NotPaid => None,
    }
}

/// Form state for the payment step. When the listing already carries a
/// payment the panel starts disabled, showing the status message, and
/// edits require an explicit `modify`.
#[derive(Debug, Clone)]
pub struct PaymentPanel {
    pub selected_plan: Plan,
    pub payment_method: PaymentMethod,
    pub transaction_id: String,
    pub receipt: Option<ImageSlot>,
    pub card: CardDetails,
    /// The card path is declared but permanently unavailable.
    pub card_payment_available: bool,
    pricing: Pricing,
    disabled: bool,
    submitted: bool,
    errors: ValidationErrors,
}

impl PaymentPanel {
    pub fn new(draft: &ListingDraft, pricing: Pricing) -> Self {
        let mut panel = Self {
            selected_plan: Plan::Annually,
            payment_method: PaymentMethod::BankTransfer,
            transaction_id: String::new(),
            receipt: None,
            card: CardDetails::default(),
            card_payment_available: false,
            pricing,
            disabled: false,
            submitted: false,
            errors: ValidationErrors::new(),
        };
        if let Some(details) = &draft.payment_details {
            panel.selected_plan = details.selected_plan;
            panel.payment_method = details.payment_method;
            panel.transaction_id = details.transaction_id.clone();
            panel.receipt = Some(ImageSlot::Persisted(details.receipt_url.clone()));
        }
        // Prevents accidental resubmission while a payment is pending
        // or already decided.
        if draft.payment_status != PaymentStatus::NotPaid {
            panel.disabled = true;
        }
        panel
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Explicit opt-in before an existing payment can be replaced.
    pub fn modify(&mut self) {
        self.disabled = false;
    }

    pub fn subtotal(&self) -> f64 {
        self.pricing.plan_price(self.selected_plan)
    }

    pub fn total(&self) -> f64 {
        self.pricing.total(self.selected_plan)
    }

    pub fn try_submit(&mut self) -> Option<PaymentSubmission> {
        if self.disabled {
            return None;
        }
        self.submitted = true;

        let mut errors = ValidationErrors::new();
        match self.payment_method {
            PaymentMethod::BankTransfer => {
                if self.transaction_id.is_empty() {
                    errors.insert("transaction_id", "Transaction ID is required.");
                }
                if self.receipt.is_none() {
                    errors.insert("receipt", "Transaction receipt is required.");
                }
            }
            PaymentMethod::Card => {
                if !self.card_payment_available {
                    errors.insert(
                        "payment_method",
                        "Credit card payment is currently unavailable. Please choose another payment method.",
                    );
                } else {
                    if self.card.card_holder.is_empty() {
                        errors.insert("card_holder", "Card holder name is required.");
                    }
                    if self.card.card_number.is_empty() {
                        errors.insert("card_number", "Card number is required.");
                    }
                    if self.card.expiry.is_empty() {
                        errors.insert("expiry", "Expiry date is required.");
                    }
                    if self.card.cvv.is_empty() {
                        errors.insert("cvv", "CVV is required.");
                    }
                }
            }
        }
        self.errors = errors;

        if !self.errors.is_empty() {
            return None;
        }
        Some(PaymentSubmission {
            selected_plan: self.selected_plan,
            payment_method: self.payment_method,
            transaction_id: self.transaction_id.clone(),
            receipt: self.receipt.clone(),
        })
    }

    pub fn visible_errors(&self) -> Option<&ValidationErrors> {
        if self.submitted && !self.errors.is_empty() {
            Some(&self.errors)
        } else {
            None
        }
    }
}
