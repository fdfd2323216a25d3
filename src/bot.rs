//! Dispatcher — routes inbound events to the menu, FAQ, or the active form.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::event::{Incoming, Payload, Reply};
use crate::forms::{FormFlow, FormKind, SessionStore, StepOutcome, Submission};
use crate::menu::{self, Command};
use crate::notify::{NotificationSink, format_submission};
use crate::scoring::{QuizAnswers, QuizResult, score_quiz};

/// Per-process dispatcher. Holds the session store and the operator
/// notification sink; everything else is static.
pub struct Dispatcher {
    store: Arc<SessionStore>,
    sink: Arc<dyn NotificationSink>,
}

impl Dispatcher {
    pub fn new(store: Arc<SessionStore>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { store, sink }
    }

    /// Process one inbound event and produce the replies to send back.
    pub async fn handle(&self, event: &Incoming) -> Vec<Reply> {
        match &event.payload {
            Payload::Command(token) => match Command::parse(token) {
                Some(cmd) => self.handle_command(event, cmd).await,
                None => vec![fallback_reply()],
            },
            Payload::Callback { tag, .. } => {
                if let Some(cmd) = Command::parse(tag) {
                    self.handle_command(event, cmd).await
                } else if let Some(service_id) = tag.strip_prefix("order:") {
                    self.start_contact(event, service_id).await
                } else if let Some(slot) = tag.strip_prefix("consult_time:") {
                    self.handle_form_input(event, slot).await
                } else {
                    tracing::debug!(tag, "Unroutable callback tag");
                    vec![fallback_reply()]
                }
            }
            Payload::Text(text) => {
                if self.store.get(event.user_id).await.is_some() {
                    self.handle_form_input(event, text).await
                } else {
                    vec![fallback_reply()]
                }
            }
        }
    }

    async fn handle_command(&self, event: &Incoming, cmd: Command) -> Vec<Reply> {
        if let Some(text) = cmd.faq_text() {
            return vec![Reply::with_keyboard(text, menu::main_menu())];
        }
        match cmd {
            Command::Start => {
                // Main-menu reset: drops any form in progress.
                self.store.clear(event.user_id).await;
                vec![Reply::with_keyboard(menu::start_text(), menu::main_menu())]
            }
            Command::Help => vec![Reply::with_keyboard(menu::help_text(), menu::main_menu())],
            Command::Services => vec![Reply::with_keyboard(
                menu::services_text(),
                menu::services_menu(),
            )],
            Command::Consult => self.start_form(event, FormKind::Consult).await,
            Command::Quiz => self.start_form(event, FormKind::Quiz).await,
            // FAQ commands were handled above.
            _ => vec![fallback_reply()],
        }
    }

    /// Start a form, silently discarding any prior in-progress state.
    async fn start_form(&self, event: &Incoming, kind: FormKind) -> Vec<Reply> {
        let (state, prompt) = FormFlow::start(kind);
        tracing::info!(user_id = event.user_id, form = %kind, "Form started");
        self.store.put(event.user_id, state).await;
        vec![prompt]
    }

    async fn start_contact(&self, event: &Incoming, service_id: &str) -> Vec<Reply> {
        let Some(service) = menu::service_by_id(service_id) else {
            tracing::warn!(service_id, "Order button with unknown service id");
            return vec![fallback_reply()];
        };
        let (state, prompt) = FormFlow::start_with(FormKind::Contact, &[("service", service.name)]);
        tracing::info!(user_id = event.user_id, service = service.id, "Contact form started");
        self.store.put(event.user_id, state).await;
        vec![Reply::text(format!(
            "You selected: {} ({})\n\n{}",
            service.name, service.price, prompt.text
        ))]
    }

    async fn handle_form_input(&self, event: &Incoming, input: &str) -> Vec<Reply> {
        let Some(mut state) = self.store.get(event.user_id).await else {
            return vec![fallback_reply()];
        };

        match FormFlow::handle_input(&mut state, input, today()) {
            StepOutcome::Reprompt(reply) | StepOutcome::Advanced(reply) => {
                self.store.put(event.user_id, state).await;
                vec![reply]
            }
            StepOutcome::Completed(submission) => {
                self.store.clear(event.user_id).await;
                self.complete(event, submission).await
            }
        }
    }

    /// Build the completion reply and emit the operator notification.
    async fn complete(&self, event: &Incoming, submission: Submission) -> Vec<Reply> {
        let quiz_result = (submission.form == FormKind::Quiz)
            .then(|| score_quiz(&QuizAnswers::from_answers(&submission.answers)));

        let reply = completion_reply(&submission, quiz_result.as_ref());

        let notification =
            format_submission(&submission, event.username.as_deref(), quiz_result.as_ref());
        // Fire-and-forget: the submitting user never sees delivery problems.
        if let Err(e) = self.sink.notify(&notification).await {
            tracing::warn!(form = %submission.form, "Operator notification failed: {e}");
        } else {
            tracing::info!(user_id = event.user_id, form = %submission.form, "Form completed");
        }

        vec![reply]
    }
}

fn completion_reply(submission: &Submission, quiz_result: Option<&QuizResult>) -> Reply {
    let field = |name: &str| {
        submission
            .answers
            .get(name)
            .map(String::as_str)
            .unwrap_or("—")
    };
    match submission.form {
        FormKind::Contact => Reply::with_keyboard(
            "✅ Request sent! We will contact you shortly.",
            menu::main_menu(),
        ),
        FormKind::Consult => Reply::with_keyboard(
            format!(
                "🎉 You are booked for a consultation on {} at {}.\n\
                 Instructions will arrive at {}. Our specialist will call you at {}.",
                field("date"),
                field("time"),
                field("email"),
                field("phone"),
            ),
            menu::main_menu(),
        ),
        FormKind::Quiz => {
            let message = quiz_result.map(|r| r.message.clone()).unwrap_or_default();
            Reply::with_keyboard(
                format!(
                    "Thanks for your answers!\n\n{message}\n\n\
                     For a detailed consultation — send /consult or pick it from the menu."
                ),
                menu::main_menu(),
            )
        }
    }
}

fn fallback_reply() -> Reply {
    Reply::with_keyboard(menu::fallback_text(), menu::main_menu())
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
