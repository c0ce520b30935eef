use anyhow::Result;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use super::{EmailMessage, MailClient};

pub struct SmtpMailClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
    from_name: String,
}

impl SmtpMailClient {
    pub fn new() -> Result<Self> {
        let host = std::env::var("SMTP_HOST").map_err(|_| anyhow::anyhow!("SMTP_HOST not set"))?;
        let port: u16 = std::env::var("SMTP_PORT")
            .map_err(|_| anyhow::anyhow!("SMTP_PORT not set"))?
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid SMTP port"))?;
        let username =
            std::env::var("SMTP_USERNAME").map_err(|_| anyhow::anyhow!("SMTP_USERNAME not set"))?;
        let password =
            std::env::var("SMTP_PASSWORD").map_err(|_| anyhow::anyhow!("SMTP_PASSWORD not set"))?;
        let from_email =
            std::env::var("MAIL_FROM").map_err(|_| anyhow::anyhow!("MAIL_FROM not set"))?;
        let from_name = std::env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "Tamreen".to_string());

        let creds = Credentials::new(username, password);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
            .map_err(|e| anyhow::anyhow!("Failed to create SMTP transport: {}", e))?
            .port(port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            from_email,
            from_name,
        })
    }
}

#[async_trait::async_trait]
impl MailClient for SmtpMailClient {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        let from_address = format!("{} <{}>", self.from_name, self.from_email);

        let email_builder = Message::builder()
            .from(
                from_address
                    .parse()
                    .map_err(|e| anyhow::anyhow!("Invalid from address: {}", e))?,
            )
            .to(message
                .to
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid to address: {}", e))?)
            .subject(&message.subject);

        let email = match (&message.body_html, &message.body_text) {
            (Some(html), Some(text)) => email_builder
                .multipart(
                    MultiPart::alternative()
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_PLAIN)
                                .body(text.clone()),
                        )
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_HTML)
                                .body(html.clone()),
                        ),
                )
                .map_err(|e| anyhow::anyhow!("Failed to build email: {}", e))?,
            (Some(html), None) => email_builder
                .header(ContentType::TEXT_HTML)
                .body(html.clone())
                .map_err(|e| anyhow::anyhow!("Failed to build email: {}", e))?,
            (None, Some(text)) => email_builder
                .header(ContentType::TEXT_PLAIN)
                .body(text.clone())
                .map_err(|e| anyhow::anyhow!("Failed to build email: {}", e))?,
            (None, None) => {
                return Err(anyhow::anyhow!("Email must have either HTML or text body"));
            }
        };

        self.transport
            .send(email)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send email via SMTP: {}", e))?;

        Ok(())
    }

    fn from_email(&self) -> &str {
        &self.from_email
    }

    fn from_name(&self) -> &str {
        &self.from_name
    }
}
