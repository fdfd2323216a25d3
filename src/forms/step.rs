//! Static step lists for the three lead forms.
//!
//! A form is an ordered list of (field, prompt, validator) triples. The
//! definitions are immutable and shared; all traversal logic lives in the
//! flow engine.

/// Which form a conversation is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// Single-step contact request, started from a service button.
    Contact,
    /// Consultation booking.
    Consult,
    /// Visa-chance eligibility quiz.
    Quiz,
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Contact => "contact",
            Self::Consult => "consult",
            Self::Quiz => "quiz",
        };
        write!(f, "{s}")
    }
}

/// Which validator gates a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValidator {
    /// Any non-empty text.
    FreeText,
    Phone,
    /// The 4-digit code generated when the phone step was accepted.
    ConfirmCode,
    Email,
    YesNo,
    Income,
    VisaType,
    /// `DD.MM.YYYY`, today or later.
    Date,
    /// One of the ten fixed hourly slots.
    TimeSlot,
}

/// One prompt/validate/store step.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    /// Key the accepted answer is stored under.
    pub field: &'static str,
    /// Prompt issued when the step becomes active. The confirmation-code
    /// prompt is rendered dynamically by the engine and leaves this empty.
    pub prompt: &'static str,
    /// Re-prompt hint issued when validation rejects the input.
    pub hint: &'static str,
    pub validator: FieldValidator,
}

const PHONE_HINT: &str = "❗ Enter a valid phone number (example: +12345678900):";
const YES_NO_HINT: &str = "Please answer 'yes' or 'no'.";

const CONTACT_STEPS: &[Step] = &[Step {
    field: "phone",
    prompt: "Please share your phone number so we can reach you (example: +12345678900):",
    hint: PHONE_HINT,
    validator: FieldValidator::Phone,
}];

const CONSULT_STEPS: &[Step] = &[
    Step {
        field: "name",
        prompt: "Book a personal consultation.\nWhat is your name?",
        hint: "❗ Please tell us your name:",
        validator: FieldValidator::FreeText,
    },
    Step {
        field: "phone",
        prompt: "Your phone number (example: +12345678900):",
        hint: PHONE_HINT,
        validator: FieldValidator::Phone,
    },
    Step {
        field: "confirm_code",
        prompt: "",
        hint: "❗ Wrong code. Try again:",
        validator: FieldValidator::ConfirmCode,
    },
    Step {
        field: "email",
        prompt: "✅ Phone confirmed. Now enter your email:",
        hint: "❗ Enter a valid email (example: user@email.com):",
        validator: FieldValidator::Email,
    },
    Step {
        field: "date",
        prompt: "Choose a consultation date (DD.MM.YYYY):",
        hint: "❗ Enter a date as DD.MM.YYYY, today or later (example: 20.07.2025):",
        validator: FieldValidator::Date,
    },
    Step {
        field: "time",
        prompt: "Choose a convenient time:",
        hint: "❗ Pick one of the listed time slots:",
        validator: FieldValidator::TimeSlot,
    },
];

const QUIZ_STEPS: &[Step] = &[
    Step {
        field: "phone",
        prompt: "🚦 Quiz: find out your chance of getting a US visa!\n\n\
                 Enter your phone number (example: +12345678900):",
        hint: PHONE_HINT,
        validator: FieldValidator::Phone,
    },
    Step {
        field: "confirm_code",
        prompt: "",
        hint: "❗ Wrong code. Try again:",
        validator: FieldValidator::ConfirmCode,
    },
    Step {
        field: "visa_type",
        prompt: "✅ Phone confirmed!\n\n1/6. Which visa are you applying for?\n\
                 1 — Tourism\n2 — Study\n3 — Work\n4 — Family reunification",
        hint: "Please enter a number from 1 to 4.",
        validator: FieldValidator::VisaType,
    },
    Step {
        field: "has_invite",
        prompt: "2/6. Do you have an official invitation? (yes/no)",
        hint: YES_NO_HINT,
        validator: FieldValidator::YesNo,
    },
    Step {
        field: "prior_visa",
        prompt: "3/6. Have you held a US or Schengen visa in the last 5 years? (yes/no)",
        hint: YES_NO_HINT,
        validator: FieldValidator::YesNo,
    },
    Step {
        field: "income",
        prompt: "4/6. Your monthly income in $ (example: 1000):",
        hint: "Please enter your income as a number (example: 1000):",
        validator: FieldValidator::Income,
    },
    Step {
        field: "family_stays",
        prompt: "5/6. Does your family (spouse/children/parents) remain at home? (yes/no)",
        hint: YES_NO_HINT,
        validator: FieldValidator::YesNo,
    },
    Step {
        field: "refusals",
        prompt: "6/6. Have you ever been refused a visa by the US or another country? (yes/no)",
        hint: YES_NO_HINT,
        validator: FieldValidator::YesNo,
    },
];

/// Step list for a form. Definitions are compile-time constants.
pub fn form_def(kind: FormKind) -> &'static [Step] {
    match kind {
        FormKind::Contact => CONTACT_STEPS,
        FormKind::Consult => CONSULT_STEPS,
        FormKind::Quiz => QUIZ_STEPS,
    }
}
