//! Inbound and outbound message types shared by the channel and dispatcher.

/// What the user actually sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A slash command, without the leading `/` (e.g. `consult`).
    Command(String),
    /// An inline-button press (callback query) carrying an opaque tag.
    Callback { id: String, tag: String },
    /// Free-form text.
    Text(String),
}

/// One inbound event from Telegram.
#[derive(Debug, Clone)]
pub struct Incoming {
    /// Telegram user id — keys the conversation state.
    pub user_id: i64,
    /// Chat to answer in.
    pub chat_id: i64,
    /// Username, for the operator notification footer.
    pub username: Option<String>,
    pub payload: Payload,
}

/// An inline keyboard: rows of (label, callback tag) buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<(String, String)>>,
}

impl Keyboard {
    pub fn new(rows: Vec<Vec<(&str, &str)>>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|(label, tag)| (label.to_string(), tag.to_string()))
                        .collect()
                })
                .collect(),
        }
    }

    /// One button per row, useful for option lists.
    pub fn column(buttons: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            rows: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }
}

/// One outbound reply to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_column_one_button_per_row() {
        let kb = Keyboard::column(vec![
            ("10:00".to_string(), "consult_time:10:00".to_string()),
            ("11:00".to_string(), "consult_time:11:00".to_string()),
        ]);
        assert_eq!(kb.rows.len(), 2);
        assert_eq!(kb.rows[0].len(), 1);
        assert_eq!(kb.rows[0][0].1, "consult_time:10:00");
    }

    #[test]
    fn reply_text_has_no_keyboard() {
        let reply = Reply::text("hello");
        assert_eq!(reply.text, "hello");
        assert!(reply.keyboard.is_none());
    }
}
