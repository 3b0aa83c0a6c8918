//! 前端報名流程：表單狀態加上呼叫 `/api/waitlist` 的 HTTP client。
//!
//! 所有本地驗證都在送出請求之前完成，驗證失敗不會產生任何網路流量。
//! 每次送出只有一個終止結果，不做重試。

use crate::api::{ErrorBody, JoinedResponse};
use crate::core::analytics::{signup_event_params, AnalyticsLoader, SIGNUP_EVENT};
use crate::core::{NewWaitlistEntry, Role, ScriptHost, WaitlistSubmission};
use crate::utils::error::{ErrorCategory, LandingError, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub use crate::utils::error::{DUPLICATE_FAILURE, GENERIC_FAILURE};

#[derive(Debug, Clone)]
pub struct WaitlistClient {
    endpoint: String,
    client: Client,
}

impl WaitlistClient {
    /// `base_url` 是網站根網址，例如 `https://www.theranotepro.com`
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            endpoint: format!("{}/api/waitlist", base_url.trim_end_matches('/')),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 成功回傳新紀錄的 id
    pub async fn submit(&self, submission: &WaitlistSubmission) -> Result<String> {
        NewWaitlistEntry::try_from(submission.clone())?;

        tracing::debug!("Submitting waitlist form to {}", self.endpoint);
        let response = self.client.post(&self.endpoint).json(submission).send().await?;
        let status = response.status();

        match status {
            StatusCode::CREATED => {
                let body: JoinedResponse = response.json().await?;
                tracing::info!("✅ Waitlist submission successful: {}", body.id);
                Ok(body.id)
            }
            StatusCode::CONFLICT => Err(LandingError::conflict(
                error_message(response).await.unwrap_or_default(),
            )),
            StatusCode::BAD_REQUEST => {
                let message = error_message(response)
                    .await
                    .unwrap_or_else(|| "Invalid submission".to_string());
                Err(LandingError::validation("form", message))
            }
            other => Err(LandingError::UnexpectedResponse {
                status: other.as_u16(),
                message: error_message(response).await.unwrap_or_default(),
            }),
        }
    }
}

async fn error_message(response: reqwest::Response) -> Option<String> {
    response.json::<ErrorBody>().await.ok().map(|body| body.error)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
    Submitted,
    Failed(String),
}

/// 報名 modal 的表單狀態
#[derive(Debug, Clone)]
pub struct WaitlistForm {
    pub name: String,
    pub email: String,
    pub practice: String,
    pub role: Option<Role>,
    interests: Vec<String>,
    phase: SubmitPhase,
    open: bool,
    // 每次關閉都會換代，舊的回應會被丟棄
    generation: u64,
}

/// 一次送出的憑證，完成時要交回給表單
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket(u64);

impl WaitlistForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            practice: String::new(),
            role: None,
            interests: Vec::new(),
            phase: SubmitPhase::Idle,
            open: false,
            generation: 0,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn phase(&self) -> &SubmitPhase {
        &self.phase
    }

    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    /// 勾選或取消勾選
    pub fn toggle_interest(&mut self, interest: &str) {
        if let Some(pos) = self.interests.iter().position(|i| i == interest) {
            self.interests.remove(pos);
        } else {
            self.interests.push(interest.to_string());
        }
    }

    pub fn to_submission(&self) -> WaitlistSubmission {
        fn non_empty(value: &str) -> Option<String> {
            (!value.trim().is_empty()).then(|| value.to_string())
        }

        WaitlistSubmission {
            name: non_empty(&self.name),
            email: non_empty(&self.email),
            practice: non_empty(&self.practice),
            role: self.role.map(|r| r.as_str().to_string()),
            interests: Some(self.interests.clone()),
        }
    }

    pub fn reset(&mut self) {
        let (generation, open) = (self.generation, self.open);
        *self = Self::new();
        self.generation = generation;
        self.open = open;
    }

    /// 關閉表單：清空欄位，還沒回來的結果一律丟棄
    pub fn close(&mut self) {
        self.reset();
        self.open = false;
        self.generation += 1;
    }

    pub fn begin_submit(&mut self) -> Option<(SubmitTicket, WaitlistSubmission)> {
        if self.phase == SubmitPhase::Submitting {
            return None;
        }
        self.phase = SubmitPhase::Submitting;
        Some((SubmitTicket(self.generation), self.to_submission()))
    }

    /// 套用結果；若表單已關閉或換代則回傳 false。
    /// 成功時在 `host` 上送出轉換事件（需要已同意 analytics）
    pub fn finish<H: ScriptHost + ?Sized>(
        &mut self,
        ticket: SubmitTicket,
        result: &Result<String>,
        host: &mut H,
    ) -> bool {
        if ticket.0 != self.generation || self.phase != SubmitPhase::Submitting {
            tracing::debug!("Discarding waitlist response for a closed form");
            return false;
        }

        self.phase = match result {
            Ok(_) => {
                AnalyticsLoader::track_event(host, SIGNUP_EVENT, &signup_event_params());
                SubmitPhase::Submitted
            }
            Err(e) => {
                tracing::error!("❌ Waitlist submission failed: {}", e);
                SubmitPhase::Failed(failure_message(e))
            }
        };
        true
    }

    pub async fn submit<H: ScriptHost + ?Sized>(
        &mut self,
        client: &WaitlistClient,
        host: &mut H,
    ) -> Result<String> {
        let Some((ticket, submission)) = self.begin_submit() else {
            return Err(LandingError::validation(
                "form",
                "A submission is already in progress",
            ));
        };
        let result = client.submit(&submission).await;
        self.finish(ticket, &result, host);
        result
    }
}

impl Default for WaitlistForm {
    fn default() -> Self {
        Self::new()
    }
}

/// 表單上只區分「已報名」與其他失敗
fn failure_message(error: &LandingError) -> String {
    match error.category() {
        ErrorCategory::Conflict => DUPLICATE_FAILURE.to_string(),
        _ => GENERIC_FAILURE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::document::DocumentHead;

    #[test]
    fn test_toggle_interest() {
        let mut form = WaitlistForm::new();
        form.toggle_interest("AI Notes");
        form.toggle_interest("Scheduling");
        form.toggle_interest("AI Notes");
        assert_eq!(form.interests(), &["Scheduling".to_string()]);
    }

    #[test]
    fn test_submission_omits_blank_fields() {
        let mut form = WaitlistForm::new();
        form.name = "Jane".to_string();
        form.email = "jane@example.com".to_string();
        form.role = Some(Role::Psychologist);

        let submission = form.to_submission();
        assert_eq!(submission.practice, None);
        assert_eq!(submission.role.as_deref(), Some("psychologist"));
        assert_eq!(submission.interests, Some(vec![]));
    }

    #[test]
    fn test_closed_form_discards_late_response() {
        let mut form = WaitlistForm::new();
        form.open();
        let (ticket, _) = form.begin_submit().unwrap();
        assert!(form.begin_submit().is_none());

        form.close();
        let mut head = DocumentHead::new();
        assert!(!form.finish(ticket, &Ok("42".to_string()), &mut head));
        assert_eq!(form.phase(), &SubmitPhase::Idle);
    }

    #[test]
    fn test_failure_messages() {
        let mut head = DocumentHead::new();
        let mut form = WaitlistForm::new();
        let (ticket, _) = form.begin_submit().unwrap();
        form.finish(
            ticket,
            &Err(LandingError::UnexpectedResponse {
                status: 500,
                message: "Failed to join waitlist".to_string(),
            }),
            &mut head,
        );
        assert_eq!(form.phase(), &SubmitPhase::Failed(GENERIC_FAILURE.to_string()));

        form.reset();
        let (ticket, _) = form.begin_submit().unwrap();
        form.finish(ticket, &Err(LandingError::conflict("dup")), &mut head);
        assert_eq!(form.phase(), &SubmitPhase::Failed(DUPLICATE_FAILURE.to_string()));

        // 伺服器回的驗證訊息也不直接顯示
        form.reset();
        let (ticket, _) = form.begin_submit().unwrap();
        form.finish(
            ticket,
            &Err(LandingError::validation("form", "Invalid role")),
            &mut head,
        );
        assert_eq!(form.phase(), &SubmitPhase::Failed(GENERIC_FAILURE.to_string()));
        assert!(head.scripts().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_email_shows_generic_message() {
        // 本地驗證失敗，不會連線
        let client = WaitlistClient::new("http://127.0.0.1:9").unwrap();
        let mut head = DocumentHead::new();
        let mut form = WaitlistForm::new();
        form.open();
        form.name = "Jane".to_string();
        form.email = "foo@bar".to_string();

        let err = form.submit(&client, &mut head).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(form.phase(), &SubmitPhase::Failed(GENERIC_FAILURE.to_string()));
    }
}
