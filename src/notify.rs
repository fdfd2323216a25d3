//! Operator notification: format a completed submission and deliver it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::forms::{FormKind, Submission};
use crate::scoring::QuizResult;
use crate::telegram::TelegramClient;
use crate::validators::visa_type_label;

/// Delivery seam for operator notifications. Production sends to a fixed
/// Telegram chat; tests capture the text.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, text: &str) -> Result<(), ChannelError>;
}

/// Sends notifications to the configured operator chat.
pub struct TelegramNotifier {
    client: Arc<TelegramClient>,
    operator_chat_id: i64,
}

impl TelegramNotifier {
    pub fn new(client: Arc<TelegramClient>, operator_chat_id: i64) -> Self {
        Self {
            client,
            operator_chat_id,
        }
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<(), ChannelError> {
        self.client.send_text(self.operator_chat_id, text).await
    }
}

/// Fixed-template text block with every collected field.
pub fn format_submission(
    submission: &Submission,
    username: Option<&str>,
    quiz: Option<&QuizResult>,
) -> String {
    let field = |name: &str| {
        submission
            .answers
            .get(name)
            .map(String::as_str)
            .unwrap_or("—")
    };

    let mut text = match submission.form {
        FormKind::Contact => format!(
            "🆕 New service request:\n\
             Service: {}\n\
             Phone: {}",
            field("service"),
            field("phone"),
        ),
        FormKind::Consult => format!(
            "🆕 New consultation booking:\n\
             Name: {}\n\
             Phone: {}\n\
             Email: {}\n\
             Date: {}\n\
             Time: {}",
            field("name"),
            field("phone"),
            field("email"),
            field("date"),
            field("time"),
        ),
        FormKind::Quiz => {
            let visa = field("visa_type");
            let mut text = format!(
                "📝 Visa-chance quiz completed:\n\
                 Phone: {}\n\
                 Visa: {} ({})\n\
                 Invitation: {}\n\
                 Prior US/Schengen visa: {}\n\
                 Income: ${}\n\
                 Family stays home: {}\n\
                 Prior refusals: {}",
                field("phone"),
                visa_type_label(visa),
                visa,
                field("has_invite"),
                field("prior_visa"),
                field("income"),
                field("family_stays"),
                field("refusals"),
            );
            if let Some(result) = quiz {
                text.push_str(&format!("\nEstimated chance: {}%", result.percent));
            }
            text
        }
    };

    if let Some(username) = username {
        text.push_str(&format!("\nFrom: @{username}"));
    }
    text
}
