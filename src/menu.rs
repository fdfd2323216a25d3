//! Main menu, FAQ texts, and the command routing table.
//!
//! Routing is a static match built into the binary: a tag either parses to
//! a [`Command`] or it doesn't. Nothing here is mutable at runtime.

use crate::event::Keyboard;

/// A service the contact-request form can be started for.
#[derive(Debug, Clone, Copy)]
pub struct Service {
    /// Callback tag suffix (`order:<id>`).
    pub id: &'static str,
    pub name: &'static str,
    pub price: &'static str,
}

pub const SERVICES: [Service; 3] = [
    Service {
        id: "guide",
        name: "Relocation guide package",
        price: "$49",
    },
    Service {
        id: "docs",
        name: "Document preparation session",
        price: "$120",
    },
    Service {
        id: "support",
        name: "Full relocation support",
        price: "$450",
    },
];

/// Look up a service by its callback tag suffix.
pub fn service_by_id(id: &str) -> Option<&'static Service> {
    SERVICES.iter().find(|s| s.id == id)
}

/// Everything the menu and slash commands can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Guide,
    Ssn,
    Address,
    Bank,
    SimCard,
    Housing,
    Job,
    Errors,
    Glossary,
    English,
    About,
    Services,
    Consult,
    Quiz,
}

impl Command {
    /// Parse a slash command or button tag. Accepts the token with or
    /// without a leading `/`.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim().strip_prefix('/').unwrap_or(token.trim());
        let cmd = match token {
            "start" => Self::Start,
            "help" => Self::Help,
            "guide" => Self::Guide,
            "ssn" => Self::Ssn,
            "address" => Self::Address,
            "bank" => Self::Bank,
            "phone" => Self::SimCard,
            "housing" => Self::Housing,
            "job" => Self::Job,
            "errors" => Self::Errors,
            "glossary" => Self::Glossary,
            "english" => Self::English,
            "about" => Self::About,
            "services" => Self::Services,
            "consult" => Self::Consult,
            "quiz" => Self::Quiz,
            _ => return None,
        };
        Some(cmd)
    }

    /// FAQ body for informational commands; `None` for commands that start
    /// a flow or need their own handling.
    pub fn faq_text(&self) -> Option<&'static str> {
        let text = match self {
            Self::Guide => {
                "📘 US adaptation guide\n\n\
                 Step-by-step instructions for moving to and settling in the US:\n\
                 — choosing a state\n— preparing before departure\n\
                 — your first week on the ground\n— documents, housing, and work."
            }
            Self::Ssn => {
                "🧾 Getting an SSN (Social Security Number)\n\n\
                 Your SSN is your identifier for work, taxes, and banking.\n\
                 • Book an SSA appointment (online or by phone)\n\
                 • Bring your documents (passport, status, address)\n\
                 • The card arrives by mail in 2-4 weeks."
            }
            Self::Address => {
                "📮 Listing a US address\n\n\
                 You need an address to receive documents (SSN, EAD, etc).\n\
                 • Friends, paid mailbox services, or stable housing all work.\n\
                 Watch your mail — letters do get lost!"
            }
            Self::Bank => {
                "🏦 Opening a US bank account\n\n\
                 • Popular banks: BoA, Chase, Wells Fargo\n\
                 • Often a passport and an address are enough\n\
                 • Some banks open accounts without an SSN."
            }
            Self::SimCard => {
                "📱 SIM card and phone number\n\n\
                 • Carriers: T-Mobile, AT&T, Verizon\n\
                 • Budget options: Mint Mobile, Visible\n\
                 • Buy a SIM in a store or order online."
            }
            Self::Housing => {
                "🏠 Housing in the US\n\n\
                 • Sites: Zillow, Craigslist, Facebook Marketplace\n\
                 • A guarantor or deposit is often required\n\
                 • Airbnb works well for the first weeks."
            }
            Self::Job => {
                "💼 Finding work in the US\n\n\
                 • indeed.com, linkedin.com, craigslist.org\n\
                 • Prepare a resume; list a local address and number.\n\
                 Make sure the job offer is legitimate."
            }
            Self::Errors => {
                "⚠️ Common newcomer mistakes\n\n\
                 • Putting off the SSN and address paperwork\n\
                 • Trusting questionable middlemen\n\
                 • Not budgeting for the first months."
            }
            Self::Glossary => {
                "📚 Immigrant's glossary\n\n\
                 SSN, EAD, I-94, asylum, TPS, USCIS, SSA and more — keep it handy."
            }
            Self::English => {
                "🇺🇸 English courses\n\n\
                 • Free ESL courses at colleges and libraries\n\
                 • Online: Duolingo, BBC Learning, LingQ\n\
                 • One-on-one tutoring."
            }
            Self::About => {
                "ℹ️ About Smart Start USA\n\n\
                 We are a team of immigrants. We advise newcomers, write guides \
                 and templates, and run courses."
            }
            _ => return None,
        };
        Some(text)
    }
}

/// Greeting shown on `/start`.
pub fn start_text() -> &'static str {
    "👋 Hi! I'm the Smart Start USA bot 🇺🇸\n\
     I help you settle in the US: housing, work, documents, consultations and more.\n\
     Pick a section below 👇"
}

/// `/help` listing.
pub fn help_text() -> &'static str {
    "🆘 Help and commands:\n\
     /guide — Relocation guide\n\
     /consult — Book a consultation\n\
     /ssn — Getting an SSN\n\
     /address — Listing an address\n\
     /bank — Opening a bank account\n\
     /phone — Getting a SIM card\n\
     /housing — Finding housing\n\
     /job — Finding work\n\
     /errors — Common mistakes\n\
     /glossary — Glossary of terms\n\
     /english — English courses\n\
     /about — About the project\n\
     /services — Our services\n\
     /quiz — Visa-chance quiz\n\
     Or use the menu below."
}

/// Reply for input that routes nowhere.
pub fn fallback_text() -> &'static str {
    "⚠️ I don't understand that. Send /help or pick a button below."
}

/// Header shown above the services keyboard.
pub fn services_text() -> &'static str {
    "🛠️ Our services:\n\nPick a service to leave a contact request."
}

/// The main inline menu.
pub fn main_menu() -> Keyboard {
    Keyboard::new(vec![
        vec![("Guide", "/guide"), ("Consultation", "/consult"), ("SSN", "/ssn")],
        vec![("Address", "/address"), ("Bank", "/bank"), ("SIM card", "/phone")],
        vec![("Housing", "/housing"), ("Work", "/job"), ("Mistakes", "/errors")],
        vec![
            ("Glossary", "/glossary"),
            ("English", "/english"),
            ("About us", "/about"),
        ],
        vec![
            ("Services", "/services"),
            ("Quiz: visa chance", "/quiz"),
            ("Help", "/help"),
        ],
    ])
}

/// One button per service, tagged `order:<id>`.
pub fn services_menu() -> Keyboard {
    Keyboard::column(SERVICES.iter().map(|s| {
        (
            format!("{} — {}", s.name, s.price),
            format!("order:{}", s.id),
        )
    }))
}
