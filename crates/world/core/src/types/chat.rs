use super::common::ObjectId;
use super::flags::ObjectFlags;
use crate::collection::Identified;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ChatKind {
    #[default]
    Say,
    Emote,
    Yell,
    Tell,
    Guild,
    Broadcast,
    /// Server notice without a speaker.
    System,
    /// Plain server message.
    Server,
}

/// One line of chat text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChatMessage {
    pub kind: ChatKind,
    /// Speaking object; `ObjectId(0)` for server text.
    pub source: ObjectId,
    pub source_name: String,
    pub text: String,
}

impl ChatMessage {
    pub fn said(
        source: impl Into<ObjectId>,
        source_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind: ChatKind::Say,
            source: source.into(),
            source_name: source_name.into(),
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            kind: ChatKind::System,
            text: text.into(),
            ..Self::default()
        }
    }

    /// Text as presented in the chat window.
    pub fn full_text(&self) -> String {
        if self.source_name.is_empty() {
            self.text.clone()
        } else {
            format!("{}: {}", self.source_name, self.text)
        }
    }
}

/// Entry of the online player list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OnlinePlayer {
    pub id: ObjectId,
    pub name: String,
    pub flags: ObjectFlags,
}

impl OnlinePlayer {
    pub fn new(id: impl Into<ObjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            flags: ObjectFlags::PLAYER,
        }
    }
}

impl Identified for OnlinePlayer {
    type Key = ObjectId;
    type Fields = ();

    fn key(&self) -> ObjectId {
        self.id
    }
}
