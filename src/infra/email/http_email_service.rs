use crate::domain::ports::{EmailAttachment, EmailService};
use crate::error::AppError;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::Serialize;
use tracing::error;

pub struct HttpEmailService {
    client: Client,
    api_url: String,
    api_key: String,
    from_alias: String,
}

impl HttpEmailService {
    pub fn new(api_url: String, api_key: String, from_alias: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
            from_alias,
        }
    }
}

#[derive(Serialize)]
struct AttachmentPayload {
    filename: String,
    content_base64: String,
    /// Present only for inline images referenced from the HTML via `cid:`.
    #[serde(skip_serializing_if = "Option::is_none")]
    content_id: Option<String>,
}

#[derive(Serialize)]
struct EmailPayload {
    from_alias: String,
    to_addr: String,
    subject: String,
    html_body: String,
    attachments: Vec<AttachmentPayload>,
}

#[async_trait]
impl EmailService for HttpEmailService {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        attachments: &[EmailAttachment],
    ) -> Result<(), AppError> {
        let payload = EmailPayload {
            from_alias: self.from_alias.clone(),
            to_addr: recipient.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
            attachments: attachments
                .iter()
                .map(|a| AttachmentPayload {
                    filename: a.filename.clone(),
                    content_base64: general_purpose::STANDARD.encode(&a.data),
                    content_id: a.content_id.clone(),
                })
                .collect(),
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Email service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Email service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        Ok(())
    }
}
