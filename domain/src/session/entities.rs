//! Conversation messages

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A file the user attached to a message, base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub content_base64: String,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, content_base64: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content_base64: content_base64.into(),
        }
    }
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Message {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Text sent to the model, with attachments inlined after the content.
    ///
    /// The model needs the base64 body verbatim to pass it to `analyzeDXF`.
    pub fn rendered_content(&self) -> String {
        if self.attachments.is_empty() {
            return self.content.clone();
        }
        let mut out = self.content.clone();
        for attachment in &self.attachments {
            out.push_str(&format!(
                "\n\n[Attached file: {}]\nfile_content (base64):\n{}",
                attachment.filename, attachment.content_base64
            ));
        }
        out
    }
}
