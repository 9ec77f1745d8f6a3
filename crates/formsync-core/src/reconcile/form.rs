//! Form reconciliation.
//!
//! Brings a remote form in line with a local description: title plus an
//! ordered list of text questions. Updates replace the question list
//! wholesale -- every existing item is deleted (always at index 0, N
//! times, since deletion shifts the remainder down) and the new items are
//! inserted at ascending positions. The two batch calls are not atomic: a
//! crash between them leaves the form with no questions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};
use crate::integrations::forms::{Form, FormRequest, FormsApi};
use crate::store::id_file;

/// Desired state of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    /// Display title, non-empty.
    pub title: String,
    /// Questions in presentation order. Order is significant: on update it
    /// fully replaces the remote order, never merges with it.
    #[serde(default)]
    pub fields: Vec<FormField>,
}

/// One text question of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub label: String,
    #[serde(default)]
    pub required: bool,
    /// Paragraph-style answer box instead of a single line.
    #[serde(default)]
    pub multiline: bool,
}

impl FormDefinition {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".to_string(),
                message: "form title must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn create_item_requests(&self) -> Vec<FormRequest> {
        self.fields
            .iter()
            .enumerate()
            .map(|(i, f)| FormRequest::create_item(&f.label, f.required, f.multiline, i as u32))
            .collect()
    }
}

/// Create-or-update reconciler for a single form.
///
/// The identifier file maps this logical form to its remote id. It is
/// written only after a successful creation; updates leave it untouched.
pub struct FormReconciler<'a, A> {
    api: &'a A,
    id_path: PathBuf,
}

impl<'a, A: FormsApi> FormReconciler<'a, A> {
    pub fn new(api: &'a A, id_path: impl Into<PathBuf>) -> Self {
        Self {
            api,
            id_path: id_path.into(),
        }
    }

    /// Reconcile the remote form with `desired` and return its responder
    /// (view) URL.
    ///
    /// A cached identifier the remote side reports as not-found falls
    /// through to recreation; any other fetch failure propagates
    /// unchanged. At most one attempt per remote call, no retries.
    pub async fn reconcile(&self, desired: &FormDefinition) -> Result<String, CoreError> {
        desired.validate()?;

        if let Some(form_id) = id_file::load(&self.id_path)? {
            match self.api.fetch_form(&form_id).await {
                Ok(existing) => {
                    log::info!("form {form_id} already exists, updating it");
                    return self.update_in_place(&form_id, &existing, desired).await;
                }
                Err(e) if e.is_not_found() => {
                    log::warn!("form {form_id} not found remotely, creating a new one");
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.create(desired).await
    }

    async fn update_in_place(
        &self,
        form_id: &str,
        existing: &Form,
        desired: &FormDefinition,
    ) -> Result<String, CoreError> {
        // Clear existing questions, then apply the title change.
        let mut requests: Vec<FormRequest> = (0..existing.items.len())
            .map(|_| FormRequest::delete_item(0))
            .collect();
        requests.push(FormRequest::update_title(&desired.title));
        self.api.batch_update(form_id, &requests).await?;

        // Add the new questions in order.
        self.api
            .batch_update(form_id, &desired.create_item_requests())
            .await?;

        Ok(existing.responder_uri.clone())
    }

    async fn create(&self, desired: &FormDefinition) -> Result<String, CoreError> {
        let created = self.api.create_form(&desired.title).await?;
        id_file::store(&self.id_path, &created.form_id)?;

        self.api
            .batch_update(&created.form_id, &desired.create_item_requests())
            .await?;

        log::info!("form created: {}", created.responder_uri);
        Ok(created.responder_uri)
    }
}
