use lettre::{
    Message, SmtpTransport, Transport,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use tracing::info;

use crate::models::fund::Fund;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("SMTP configuration error: {0}")]
    Config(String),
    #[error("Email sending failed: {0}")]
    Send(#[from] lettre::transport::smtp::Error),
    #[error("Message building failed: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("Address parsing failed: {0}")]
    Address(#[from] lettre::address::AddressError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub subject: String,
    pub html_body: String,
    pub text_body: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    /// Public site root, used to link back to a fundraise page.
    pub base_url: String,
}

fn required(key: &str) -> Result<String, EmailError> {
    env::var(key).map_err(|_| EmailError::Config(format!("{} not set", key)))
}

impl EmailConfig {
    pub fn from_env() -> Result<Self, EmailError> {
        Ok(Self {
            smtp_server: required("SMTP_SERVER")?,
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .map_err(|_| EmailError::Config("Invalid SMTP_PORT".to_string()))?,
            username: required("SMTP_USERNAME")?,
            password: required("SMTP_PASSWORD")?,
            from_email: required("FROM_EMAIL")?,
            from_name: env::var("FROM_NAME").unwrap_or_else(|_| "Blossom".to_string()),
            base_url: env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }
}

pub struct EmailService {
    mailer: SmtpTransport,
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = SmtpTransport::relay(&config.smtp_server)
            .map_err(|e| EmailError::Config(format!("SMTP relay error: {}", e)))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self { mailer, config })
    }

    pub fn from_env() -> Result<Self, EmailError> {
        Self::new(EmailConfig::from_env()?)
    }

    /// Blocking SMTP send. Call from a blocking task.
    pub fn send_email(
        &self,
        to_email: &str,
        to_name: Option<&str>,
        template: EmailTemplate,
    ) -> Result<(), EmailError> {
        let to_address = match to_name {
            Some(name) => format!("{} <{}>", name, to_email),
            None => to_email.to_string(),
        };
        let from_address = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let builder = Message::builder()
            .from(from_address.parse()?)
            .to(to_address.parse()?)
            .subject(&template.subject);

        let message = match template.text_body {
            Some(text_body) => builder.multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(template.html_body),
                    ),
            )?,
            None => builder
                .header(ContentType::TEXT_HTML)
                .body(template.html_body)?,
        };

        info!("Sending email to: {}", to_email);
        self.mailer.send(&message)?;
        info!("Email sent successfully to: {}", to_email);

        Ok(())
    }

    pub fn fund_closed_template(&self, organizer_name: &str, fund: &Fund) -> EmailTemplate {
        fund_closed_template(&self.config.base_url, organizer_name, fund)
    }
}

pub fn fund_closed_template(base_url: &str, organizer_name: &str, fund: &Fund) -> EmailTemplate {
    let fund_link = format!("{}/fund/{}", base_url.trim_end_matches('/'), fund.id);

    let html_body = format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <meta charset="utf-8">
            <title>Fundraise closed</title>
            <style>
                body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
                .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
                .header {{ background-color: #2f6fde; color: white; padding: 20px; text-align: center; }}
                .content {{ padding: 20px; background-color: #f9f9f9; }}
            </style>
        </head>
        <body>
            <div class="container">
                <div class="header">
                    <h1>{title} is now closed</h1>
                </div>
                <div class="content">
                    <h2>Hi {name}!</h2>
                    <p>Your fundraise raised INR {raised} of its INR {target} goal and no longer accepts donations.</p>
                    <p><a href="{link}">View the fundraise and its donors</a></p>
                </div>
            </div>
        </body>
        </html>
        "#,
        title = fund.title,
        name = organizer_name,
        raised = fund.amount_raised,
        target = fund.amount,
        link = fund_link,
    );

    let text_body = format!(
        "Hi {}!\n\nYour fundraise \"{}\" raised INR {} of its INR {} goal and no longer accepts donations.\n\n{}\n",
        organizer_name, fund.title, fund.amount_raised, fund.amount, fund_link
    );

    EmailTemplate {
        subject: format!("Your fundraise \"{}\" has closed", fund.title),
        html_body,
        text_body: Some(text_body),
    }
}
