//! Google Forms API client.
//!
//! Typed request/response payloads for the Forms v1 REST surface the
//! reconciler needs: create, fetch, and batch-update. Request bodies are
//! explicit structs rather than ad-hoc JSON so a typo in a key fails to
//! compile instead of silently reaching the remote API.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::check_status;
use crate::error::ApiError;

const FORMS_BASE_URL: &str = "https://forms.googleapis.com";

/// A form as returned by create and fetch.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub form_id: String,
    pub info: FormInfo,
    #[serde(default)]
    pub items: Vec<FormItem>,
    pub responder_uri: String,
    #[serde(default)]
    pub revision_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInfo {
    pub title: String,
    #[serde(default)]
    pub document_title: Option<String>,
}

/// One item (question) of a form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormItem {
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub question_item: Option<QuestionItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionItem {
    pub question: Question,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub text_question: Option<TextQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextQuestion {
    #[serde(default)]
    pub paragraph: bool,
}

// --- batchUpdate request payloads ---

/// One request of a `batchUpdate` call, serialized in the wire shape
/// `{"createItem": {...}}` / `{"deleteItem": {...}}` / `{"updateFormInfo": {...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormRequest {
    CreateItem(CreateItemRequest),
    DeleteItem(DeleteItemRequest),
    UpdateFormInfo(UpdateFormInfoRequest),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub item: NewItem,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteItemRequest {
    pub location: Location,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormInfoRequest {
    pub info: InfoPatch,
    pub update_mask: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub index: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoPatch {
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub title: String,
    pub question_item: NewQuestionItem,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestionItem {
    pub question: NewQuestion,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub required: bool,
    pub text_question: NewTextQuestion,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTextQuestion {
    pub paragraph: bool,
}

impl FormRequest {
    /// Insert a text question at `index`.
    pub fn create_item(title: &str, required: bool, paragraph: bool, index: u32) -> Self {
        FormRequest::CreateItem(CreateItemRequest {
            item: NewItem {
                title: title.to_string(),
                question_item: NewQuestionItem {
                    question: NewQuestion {
                        required,
                        text_question: NewTextQuestion { paragraph },
                    },
                },
            },
            location: Location { index },
        })
    }

    /// Delete the item currently at `index`.
    pub fn delete_item(index: u32) -> Self {
        FormRequest::DeleteItem(DeleteItemRequest {
            location: Location { index },
        })
    }

    /// Replace the form title.
    pub fn update_title(title: &str) -> Self {
        FormRequest::UpdateFormInfo(UpdateFormInfoRequest {
            info: InfoPatch {
                title: title.to_string(),
            },
            update_mask: "title".to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
struct CreateFormBody {
    info: InfoPatch,
}

#[derive(Debug, Serialize)]
struct BatchUpdateBody<'a> {
    requests: &'a [FormRequest],
}

/// Remote operations the form reconciler depends on.
///
/// Implemented by [`FormsClient`]; tests substitute an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait FormsApi {
    /// Create a form with only its title set; questions are added with
    /// [`FormsApi::batch_update`] afterwards.
    async fn create_form(&self, title: &str) -> Result<Form, ApiError>;

    /// Fetch a form by identifier.
    async fn fetch_form(&self, form_id: &str) -> Result<Form, ApiError>;

    /// Apply a batch of requests to a form, in order.
    async fn batch_update(&self, form_id: &str, requests: &[FormRequest]) -> Result<(), ApiError>;
}

/// HTTP client for the Google Forms API.
pub struct FormsClient {
    http: Client,
    base_url: String,
    token: String,
}

impl FormsClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: FORMS_BASE_URL.to_string(),
            token: token.into(),
        }
    }

    #[cfg(test)]
    fn with_base_url(token: &str, base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.to_string(),
            token: token.to_string(),
        }
    }
}

impl FormsApi for FormsClient {
    async fn create_form(&self, title: &str) -> Result<Form, ApiError> {
        log::debug!("creating form: {title}");
        let body = CreateFormBody {
            info: InfoPatch {
                title: title.to_string(),
            },
        };
        let resp = self
            .http
            .post(format!("{}/v1/forms", self.base_url))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let resp = check_status(resp, false).await?;
        Ok(resp.json().await?)
    }

    async fn fetch_form(&self, form_id: &str) -> Result<Form, ApiError> {
        let resp = self
            .http
            .get(format!("{}/v1/forms/{form_id}", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let resp = check_status(resp, false).await?;
        Ok(resp.json().await?)
    }

    async fn batch_update(&self, form_id: &str, requests: &[FormRequest]) -> Result<(), ApiError> {
        log::debug!("batch update on form {form_id}: {} requests", requests.len());
        let resp = self
            .http
            .post(format!("{}/v1/forms/{form_id}:batchUpdate", self.base_url))
            .bearer_auth(&self.token)
            .json(&BatchUpdateBody { requests })
            .send()
            .await?;
        check_status(resp, false).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn create_item_serializes_to_wire_shape() {
        let req = FormRequest::create_item("Why do you want to volunteer?", true, true, 3);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "createItem": {
                    "item": {
                        "title": "Why do you want to volunteer?",
                        "questionItem": {
                            "question": {
                                "required": true,
                                "textQuestion": { "paragraph": true }
                            }
                        }
                    },
                    "location": { "index": 3 }
                }
            })
        );
    }

    #[test]
    fn delete_and_title_requests_serialize_to_wire_shape() {
        let del = serde_json::to_value(FormRequest::delete_item(0)).unwrap();
        assert_eq!(
            del,
            serde_json::json!({ "deleteItem": { "location": { "index": 0 } } })
        );

        let title = serde_json::to_value(FormRequest::update_title("New title")).unwrap();
        assert_eq!(
            title,
            serde_json::json!({
                "updateFormInfo": {
                    "info": { "title": "New title" },
                    "updateMask": "title"
                }
            })
        );
    }

    #[test]
    fn form_response_parses_items() {
        let raw = serde_json::json!({
            "formId": "form-1",
            "info": { "title": "T", "documentTitle": "T" },
            "revisionId": "rev-7",
            "responderUri": "https://docs.google.com/forms/d/e/x/viewform",
            "items": [
                {
                    "itemId": "item-1",
                    "title": "Name?",
                    "questionItem": {
                        "question": {
                            "questionId": "q-1",
                            "required": true,
                            "textQuestion": {}
                        }
                    }
                }
            ]
        });
        let form: Form = serde_json::from_value(raw).unwrap();
        assert_eq!(form.form_id, "form-1");
        assert_eq!(form.items.len(), 1);
        let q = form.items[0].question_item.as_ref().unwrap();
        assert!(q.question.required);
        assert!(!q.question.text_question.as_ref().unwrap().paragraph);
    }

    #[tokio::test]
    async fn create_form_posts_title_and_parses_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/forms")
            .match_body(Matcher::Json(
                serde_json::json!({ "info": { "title": "Survey" } }),
            ))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "formId": "new-form",
                    "info": { "title": "Survey" },
                    "responderUri": "https://forms.example/viewform"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = FormsClient::with_base_url("tok", &server.url());
        let form = client.create_form("Survey").await.unwrap();

        assert_eq!(form.form_id, "new-form");
        assert_eq!(form.responder_uri, "https://forms.example/viewform");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_form_classifies_404_as_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/forms/gone-form")
            .with_status(404)
            .with_body("{}")
            .create_async()
            .await;

        let client = FormsClient::with_base_url("tok", &server.url());
        let err = client.fetch_form("gone-form").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn other_failures_keep_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/forms/f")
            .with_status(403)
            .with_body("insufficient scope")
            .create_async()
            .await;

        let client = FormsClient::with_base_url("tok", &server.url());
        match client.fetch_form("f").await.unwrap_err() {
            ApiError::Status { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "insufficient scope");
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn batch_update_sends_requests_array() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/forms/f:batchUpdate")
            .match_body(Matcher::Json(serde_json::json!({
                "requests": [
                    { "deleteItem": { "location": { "index": 0 } } },
                    {
                        "updateFormInfo": {
                            "info": { "title": "T2" },
                            "updateMask": "title"
                        }
                    }
                ]
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = FormsClient::with_base_url("tok", &server.url());
        let requests = vec![FormRequest::delete_item(0), FormRequest::update_title("T2")];
        client.batch_update("f", &requests).await.unwrap();
        mock.assert_async().await;
    }
}
