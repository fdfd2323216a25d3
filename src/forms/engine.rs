//! Generic form flow driver.
//!
//! One driver walks every form: validate the input for the active step,
//! store the normalized answer and advance on accept, re-issue the prompt
//! on reject. Accepting the last step yields a [`Submission`].

use std::collections::HashMap;

use chrono::NaiveDate;
use rand::Rng;

use crate::event::{Keyboard, Reply};
use crate::validators;

use super::state::ConversationState;
use super::step::{FieldValidator, FormKind, Step, form_def};

/// Finalized answers of a completed form.
#[derive(Debug, Clone)]
pub struct Submission {
    pub form: FormKind,
    pub answers: HashMap<&'static str, String>,
}

/// Result of feeding one input to the active form.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// Input rejected; state unchanged, same step re-prompted.
    Reprompt(Reply),
    /// Input accepted; here is the next step's prompt.
    Advanced(Reply),
    /// Last step accepted; the conversation is done.
    Completed(Submission),
}

/// Stateless driver over the static form definitions.
pub struct FormFlow;

impl FormFlow {
    /// Begin a form: fresh state plus the first step's prompt.
    pub fn start(kind: FormKind) -> (ConversationState, Reply) {
        Self::start_with(kind, &[])
    }

    /// Begin a form with pre-seeded answers (the contact form carries the
    /// chosen service name in before its phone step).
    pub fn start_with(kind: FormKind, seed: &[(&'static str, &str)]) -> (ConversationState, Reply) {
        let mut state = ConversationState::new(kind);
        for &(field, value) in seed {
            state.answers.insert(field, value.to_string());
        }
        let prompt = render_prompt(&form_def(kind)[0], &state);
        (state, prompt)
    }

    /// Feed one user input to the active form.
    ///
    /// `today` is the cutoff for the consultation date step.
    pub fn handle_input(
        state: &mut ConversationState,
        input: &str,
        today: NaiveDate,
    ) -> StepOutcome {
        let steps = form_def(state.form);
        let Some(step) = steps.get(state.step).copied() else {
            // Unreachable through normal traversal; recover to the last step.
            tracing::warn!(form = %state.form, step = state.step, "Step index out of range");
            state.step = steps.len() - 1;
            return StepOutcome::Reprompt(render_prompt(&steps[state.step], state));
        };

        let Some(value) = validate(&step, input, state, today) else {
            return StepOutcome::Reprompt(render_reprompt(&step));
        };

        // The echoed confirmation code is not a collected field.
        if step.validator != FieldValidator::ConfirmCode {
            state.answers.insert(step.field, value);
        }
        state.step += 1;
        state.touch();

        if state.step == steps.len() {
            return StepOutcome::Completed(Submission {
                form: state.form,
                answers: std::mem::take(&mut state.answers),
            });
        }

        let next = steps[state.step];
        if next.validator == FieldValidator::ConfirmCode {
            // Generated exactly once, on entering the code step. Mismatched
            // answers never regenerate it.
            state.confirm_code = Some(generate_code());
        }
        StepOutcome::Advanced(render_prompt(&next, state))
    }
}

fn validate(
    step: &Step,
    input: &str,
    state: &ConversationState,
    today: NaiveDate,
) -> Option<String> {
    match step.validator {
        FieldValidator::FreeText => {
            let trimmed = input.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        FieldValidator::Phone => validators::phone(input),
        FieldValidator::Email => validators::email(input),
        FieldValidator::YesNo => validators::yes_no(input),
        FieldValidator::Income => validators::income(input),
        FieldValidator::VisaType => validators::visa_type(input),
        FieldValidator::Date => validators::date(input, today),
        FieldValidator::TimeSlot => validators::time_slot(input),
        FieldValidator::ConfirmCode => {
            let expected = state.confirm_code.as_deref()?;
            (input.trim() == expected).then(|| expected.to_string())
        }
    }
}

fn render_prompt(step: &Step, state: &ConversationState) -> Reply {
    match step.validator {
        FieldValidator::ConfirmCode => {
            let phone = state.answers.get("phone").map(String::as_str).unwrap_or("");
            let code = state.confirm_code.as_deref().unwrap_or("????");
            Reply::text(format!(
                "🟢 A 4-digit confirmation code was sent to {phone} (test: {code}). Enter the code:"
            ))
        }
        FieldValidator::TimeSlot => Reply::with_keyboard(step.prompt, time_keyboard()),
        _ => Reply::text(step.prompt),
    }
}

fn render_reprompt(step: &Step) -> Reply {
    match step.validator {
        FieldValidator::TimeSlot => Reply::with_keyboard(step.hint, time_keyboard()),
        _ => Reply::text(step.hint),
    }
}

fn time_keyboard() -> Keyboard {
    Keyboard::column(
        validators::TIME_SLOTS
            .iter()
            .map(|slot| (slot.to_string(), format!("consult_time:{slot}"))),
    )
}

fn generate_code() -> String {
    rand::thread_rng().gen_range(1000..10000).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 25).unwrap()
    }

    fn accept(state: &mut ConversationState, input: &str) -> Reply {
        match FormFlow::handle_input(state, input, today()) {
            StepOutcome::Advanced(reply) => reply,
            other => panic!("expected Advanced for {input:?}, got {other:?}"),
        }
    }

    fn code_of(state: &ConversationState) -> String {
        state.confirm_code.clone().expect("code should be generated")
    }

    #[test]
    fn consult_walks_all_steps() {
        let (mut state, first) = FormFlow::start(FormKind::Consult);
        assert!(first.text.contains("What is your name?"));

        accept(&mut state, "Alice");
        let code_prompt = accept(&mut state, "+12345678900");
        let code = code_of(&state);
        assert!(code_prompt.text.contains(&code));
        assert!(code_prompt.text.contains("+12345678900"));

        accept(&mut state, &code);
        accept(&mut state, "alice@example.com");
        let time_prompt = accept(&mut state, "01.01.2026");
        assert!(time_prompt.keyboard.is_some());

        match FormFlow::handle_input(&mut state, "12:00", today()) {
            StepOutcome::Completed(submission) => {
                assert_eq!(submission.form, FormKind::Consult);
                assert_eq!(submission.answers["name"], "Alice");
                assert_eq!(submission.answers["phone"], "+12345678900");
                assert_eq!(submission.answers["email"], "alice@example.com");
                assert_eq!(submission.answers["date"], "01.01.2026");
                assert_eq!(submission.answers["time"], "12:00");
                assert!(!submission.answers.contains_key("confirm_code"));
            }
            other => panic!("expected Completed, got {other:?}"),
        }
    }

    #[test]
    fn rejected_input_leaves_state_unchanged() {
        let (mut state, _) = FormFlow::start(FormKind::Consult);
        accept(&mut state, "Alice");
        let step_before = state.step;
        let answers_before = state.answers.clone();

        match FormFlow::handle_input(&mut state, "not-a-phone", today()) {
            StepOutcome::Reprompt(reply) => assert!(reply.text.contains("valid phone")),
            other => panic!("expected Reprompt, got {other:?}"),
        }
        assert_eq!(state.step, step_before);
        assert_eq!(state.answers, answers_before);
    }

    #[test]
    fn invalid_date_reprompts_with_format_hint() {
        let (mut state, _) = FormFlow::start(FormKind::Consult);
        accept(&mut state, "Alice");
        accept(&mut state, "+12345678900");
        let code = code_of(&state);
        accept(&mut state, &code);
        accept(&mut state, "alice@example.com");

        for bad in ["31.13.2025", "24.08.2025", "yesterday"] {
            match FormFlow::handle_input(&mut state, bad, today()) {
                StepOutcome::Reprompt(reply) => assert!(reply.text.contains("DD.MM.YYYY")),
                other => panic!("expected Reprompt for {bad:?}, got {other:?}"),
            }
        }
        // Still at the date step; today itself is accepted.
        let reply = accept(&mut state, "25.08.2025");
        assert!(reply.keyboard.is_some());
    }

    #[test]
    fn code_mismatches_retry_without_regenerating() {
        let (mut state, _) = FormFlow::start(FormKind::Quiz);
        accept(&mut state, "+12345678900");
        let code = code_of(&state);

        for _ in 0..5 {
            match FormFlow::handle_input(&mut state, "0000", today()) {
                StepOutcome::Reprompt(reply) => assert!(reply.text.contains("Wrong code")),
                other => panic!("expected Reprompt, got {other:?}"),
            }
            assert_eq!(code_of(&state), code, "mismatch must not regenerate the code");
        }

        // The original code still advances exactly once.
        let reply = accept(&mut state, &code);
        assert!(reply.text.contains("1/6"));
    }

    #[test]
    fn generated_code_is_four_digits() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), 4);
            assert!(code.parse::<u16>().unwrap() >= 1000);
        }
    }

    #[test]
    fn quiz_walks_all_steps() {
        let (mut state, first) = FormFlow::start(FormKind::Quiz);
        assert!(first.text.contains("Quiz"));

        accept(&mut state, "+12345678900");
        let code = code_of(&state);
        accept(&mut state, &code);
        accept(&mut state, "1");
        accept(&mut state, "yes");
        accept(&mut state, "YES");
        accept(&mut state, "2000");
        accept(&mut state, "yes");
        match FormFlow::handle_input(&mut state, "no", today()) {
            StepOutcome::Completed(submission) => {
                assert_eq!(submission.form, FormKind::Quiz);
                assert_eq!(submission.answers["visa_type"], "1");
                assert_eq!(submission.answers["prior_visa"], "yes");
                assert_eq!(submission.answers["income"], "2000");
                assert_eq!(submission.answers["refusals"], "no");
            }
            other => panic!("expected Completed, got {other:?}"),
        }
    }

    #[test]
    fn contact_form_keeps_seeded_service() {
        let (mut state, prompt) =
            FormFlow::start_with(FormKind::Contact, &[("service", "Relocation guide package")]);
        assert!(prompt.text.contains("phone number"));

        match FormFlow::handle_input(&mut state, "+12345678900", today()) {
            StepOutcome::Completed(submission) => {
                assert_eq!(submission.answers["service"], "Relocation guide package");
                assert_eq!(submission.answers["phone"], "+12345678900");
            }
            other => panic!("expected Completed, got {other:?}"),
        }
    }
}
