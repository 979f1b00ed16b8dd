use std::sync::Arc;

use crate::errors::AdminError;
use crate::gateway::{BlobStore, DocumentStore, IdentityProvider};
use crate::models::listing::ListingKind;
use crate::models::payment::PaymentSubmission;
use crate::services::pricing_service::Pricing;
use crate::wizard::draft::{DetailsPayload, ListingDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Loading,
    /// Terminal: the listing is missing or owned by someone else. The
    /// caller renders nothing and redirects to the listing index.
    Unauthorized,
    Step(u32),
    Submitted,
}

/// Drives step sequencing and commits for one listing upload. Hotels
/// walk four steps, attractions two; the draft itself carries all
/// listing state.
pub struct WizardController {
    docs: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    pricing: Pricing,
    kind: ListingKind,
    state: WizardState,
    draft: ListingDraft,
}

impl WizardController {
    /// Entry point. With a listing id this loads and authorizes the
    /// draft, resuming at the persisted step; without one it starts a
    /// fresh draft at step 1 owned by the current session user.
    pub async fn start(
        docs: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        identity: Arc<dyn IdentityProvider>,
        kind: ListingKind,
        listing_id: Option<&str>,
    ) -> Self {
        let (state, draft) = match identity.current_user().await {
            Err(err) => {
                eprintln!("No signed-in user: {}", err);
                (WizardState::Unauthorized, ListingDraft::empty(kind))
            }
            Ok(user) => match listing_id {
                None => {
                    let mut draft = ListingDraft::empty(kind);
                    draft.owner_user_id = Some(user.user_id);
                    (WizardState::Step(1), draft)
                }
                Some(id) => match ListingDraft::load(docs.as_ref(), kind, id, &user.user_id).await
                {
                    Ok(draft) => {
                        let resume = draft.step.clamp(1, kind.total_steps());
                        (WizardState::Step(resume), draft)
                    }
                    Err(err) => {
                        eprintln!("Error fetching listing {}: {}", id, err);
                        (WizardState::Unauthorized, ListingDraft::empty(kind))
                    }
                },
            },
        };

        Self {
            docs,
            blobs,
            pricing: Pricing::default(),
            kind,
            state,
            draft,
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    pub fn pricing(&self) -> Pricing {
        self.pricing
    }

    pub fn draft(&self) -> &ListingDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ListingDraft {
        &mut self.draft
    }

    pub fn current_step(&self) -> Option<u32> {
        match self.state {
            WizardState::Step(step) => Some(step),
            _ => None,
        }
    }

    fn step_forward(&mut self) {
        if let WizardState::Step(step) = self.state {
            if step < self.kind.total_steps() {
                self.state = WizardState::Step(step + 1);
            }
        }
    }

    /// Skip forward without committing. Only available once the
    /// listing exists; a brand-new draft has to go through the
    /// details commit first.
    pub fn advance(&mut self) {
        if self.draft.id.is_some() {
            self.step_forward();
        }
    }

    pub fn retreat(&mut self) {
        if let WizardState::Step(step) = self.state {
            if step > 1 {
                self.state = WizardState::Step(step - 1);
            }
        }
    }

    /// Commit the details slice and move to the next step. The payload
    /// must come from a panel whose validation passed.
    pub async fn commit_details(&mut self, payload: DetailsPayload) -> Result<String, AdminError> {
        let id = self
            .draft
            .commit_details(self.docs.as_ref(), self.blobs.as_ref(), payload)
            .await?;
        self.step_forward();
        Ok(id)
    }

    /// Rooms & facilities keep their own eager persistence; this only
    /// records that the step was completed.
    pub async fn commit_rooms_step(&mut self) -> Result<(), AdminError> {
        self.draft
            .commit_step_reached(self.docs.as_ref(), 2)
            .await?;
        self.step_forward();
        Ok(())
    }

    pub async fn commit_payment(&mut self, submission: PaymentSubmission) -> Result<(), AdminError> {
        self.draft
            .commit_payment(
                self.docs.as_ref(),
                self.blobs.as_ref(),
                &self.pricing,
                submission,
            )
            .await?;
        self.step_forward();
        Ok(())
    }

    /// Flip the listing into review. The wizard finishes and the
    /// caller redirects regardless of the patch outcome; a failure is
    /// only logged. Known gap: the user gets no feedback when the
    /// final patch fails.
    pub async fn submit_for_review(&mut self) {
        if let Err(err) = self.draft.submit_for_review(self.docs.as_ref()).await {
            eprintln!("Error updating review status: {}", err);
        }
        self.state = WizardState::Submitted;
    }
}
