use std::sync::Arc;

use anyhow::Result;

#[cfg(feature = "ses")]
mod ses;
#[cfg(feature = "smtp")]
mod smtp;
pub mod templates;

#[cfg(feature = "ses")]
pub use ses::SesMailClient;
#[cfg(feature = "smtp")]
pub use smtp::SmtpMailClient;

#[derive(Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_html: Option<String>,
    pub body_text: Option<String>,
}

#[async_trait::async_trait]
pub trait MailClient: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<()>;
    fn from_email(&self) -> &str;
    fn from_name(&self) -> &str;
}

pub type DynMailClient = Arc<dyn MailClient>;

/// Build the mail client selected by `MAIL_PROVIDER` (smtp or ses).
pub async fn create_mail_client() -> Result<DynMailClient> {
    let provider = std::env::var("MAIL_PROVIDER").unwrap_or_else(|_| "smtp".to_string());

    match provider.as_str() {
        "smtp" => {
            #[cfg(feature = "smtp")]
            {
                let client = SmtpMailClient::new()?;
                Ok(Arc::new(client) as DynMailClient)
            }
            #[cfg(not(feature = "smtp"))]
            {
                Err(anyhow::anyhow!("SMTP feature not enabled"))
            }
        }
        "ses" => {
            #[cfg(feature = "ses")]
            {
                let client = SesMailClient::new().await?;
                Ok(Arc::new(client) as DynMailClient)
            }
            #[cfg(not(feature = "ses"))]
            {
                Err(anyhow::anyhow!("SES feature not enabled"))
            }
        }
        other => Err(anyhow::anyhow!("Unknown mail provider: {}", other)),
    }
}

/// Outbound notification surface for the auth flows. Sends run on spawned
/// tasks so the request never waits on the mail transport; failures are
/// logged rather than silently dropped.
#[derive(Clone)]
pub struct Notifier {
    client: Option<DynMailClient>,
    frontend_url: String,
}

impl Notifier {
    pub fn new(client: Option<DynMailClient>, frontend_url: impl Into<String>) -> Self {
        Self {
            client,
            frontend_url: frontend_url.into(),
        }
    }

    pub fn user_registered(&self, email: &str, first_name: Option<&str>) {
        let (subject, html) = templates::register(first_name, &self.frontend_url);
        self.dispatch(email.to_string(), subject, html);
    }

    pub fn password_reset_requested(&self, email: &str, first_name: Option<&str>, code: &str) {
        let (subject, html) = templates::forgot_password(first_name, code, &self.frontend_url);
        self.dispatch(email.to_string(), subject, html);
    }

    fn dispatch(&self, to: String, subject: String, html: String) {
        let Some(client) = self.client.clone() else {
            tracing::debug!("Mail client not configured, dropping \"{}\" to {}", subject, to);
            return;
        };
        tokio::spawn(async move {
            let message = EmailMessage {
                to: to.clone(),
                subject: subject.clone(),
                body_html: Some(html),
                body_text: None,
            };
            if let Err(err) = client.send(message).await {
                tracing::error!("Failed to send \"{}\" mail to {}: {:?}", subject, to, err);
            }
        });
    }
}
