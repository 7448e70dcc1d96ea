//! Snapshot payloads shown in panels.
//!
//! These are plain data replaced wholesale by their messages; the [`Panel`]
//! wrapper tracks visibility and change masks.
//!
//! [`Panel`]: super::Panel

use super::animation::Animation;
use super::common::{Millis, ObjectId};
use super::object::ObjectBase;

/// Description of a looked-at object.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectInfo {
    pub object: ObjectBase,
    pub description: String,
    pub inscription: String,
}

impl ObjectInfo {
    pub fn tick(&mut self, span: Millis) -> bool {
        !self.object.tick(span).is_empty()
    }
}

/// Description of a looked-at player.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerInfo {
    pub object: ObjectBase,
    pub titles: String,
    pub message: String,
    pub homepage: String,
}

impl PlayerInfo {
    pub fn tick(&mut self, span: Millis) -> bool {
        !self.object.tick(span).is_empty()
    }
}

/// Contents of an opened container.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectContents {
    pub container: ObjectId,
    pub items: Vec<ObjectBase>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Article {
    pub number: u32,
    pub poster: String,
    pub title: String,
    pub time: u64,
}

/// A newsgroup with the article headers fetched so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewsGroup {
    pub id: u16,
    pub name: String,
    pub articles: Vec<Article>,
    /// Body of the currently opened article.
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuildMember {
    pub id: ObjectId,
    pub name: String,
    pub rank: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuildInfo {
    pub id: ObjectId,
    pub name: String,
    pub rank: u8,
    pub rank_names: Vec<String>,
    pub members: Vec<GuildMember>,
}

/// Costs and requirements shown when founding a guild.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuildAskData {
    pub cost_hall: u32,
    pub cost_secret: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuildShieldInfo {
    pub guild: ObjectId,
    pub colors: [u8; 2],
    pub design: u8,
    /// Shield resources available for selection.
    pub shields: Vec<String>,
    /// Preview model rendered in the shield editor.
    pub preview: Option<ObjectBase>,
}

impl GuildShieldInfo {
    pub fn tick(&mut self, span: Millis) -> bool {
        self.preview
            .as_mut()
            .is_some_and(|model| !model.tick(span).is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuildEntry {
    pub id: ObjectId,
    pub name: String,
}

/// Guild relations of the avatar's guild.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiplomacyInfo {
    pub guilds: Vec<GuildEntry>,
    pub allies: Vec<ObjectId>,
    pub enemies: Vec<ObjectId>,
    pub you_declared_ally: Vec<ObjectId>,
    pub you_declared_enemy: Vec<ObjectId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterSlot {
    pub id: ObjectId,
    pub name: String,
    pub flags: u8,
}

/// Character selection data sent after login.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WelcomeInfo {
    pub characters: Vec<CharacterSlot>,
    pub message_of_the_day: String,
    pub ads: Vec<String>,
}

/// Options offered by the character creation wizard.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharCreationInfo {
    pub data_ok: bool,
    pub hair_resources: Vec<String>,
    pub head_resources: Vec<String>,
    pub spells: Vec<String>,
    pub skills: Vec<String>,
    /// Preview model rendered in the wizard.
    pub preview: Option<ObjectBase>,
}

impl Default for CharCreationInfo {
    fn default() -> Self {
        Self {
            data_ok: true,
            hair_resources: Vec::new(),
            head_resources: Vec::new(),
            spells: Vec::new(),
            skills: Vec::new(),
            preview: None,
        }
    }
}

impl CharCreationInfo {
    /// Group range of the idle animation played by the default preview.
    const PREVIEW_GROUPS: (u16, u16) = (1, 4);
    const PREVIEW_PERIOD: Millis = 250;

    /// Installs the default preview model.
    pub fn set_default_preview(&mut self) {
        let (low, high) = Self::PREVIEW_GROUPS;
        let model = ObjectBase::new(0, "preview")
            .with_animation(Animation::cycle(Self::PREVIEW_PERIOD, low, high));
        self.preview = Some(model);
    }

    pub fn tick(&mut self, span: Millis) -> bool {
        self.preview
            .as_mut()
            .is_some_and(|model| !model.tick(span).is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LightShading {
    pub intensity: u8,
    /// Direction of the sun on the ground plane, in angle units.
    pub direction: u16,
    pub height: u16,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BackgroundMusic {
    pub resource: String,
    pub looping: bool,
}
