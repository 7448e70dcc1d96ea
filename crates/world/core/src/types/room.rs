use bitflags::bitflags;

use super::assign;
use super::common::ObjectId;
use super::object::masked;

bitflags! {
    /// Tracks which fields of [`RoomInfo`] changed.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct RoomFields: u16 {
        const AVATAR_ID     = 1 << 0;
        const ROOM_FILE     = 1 << 1;
        const ROOM_ID       = 1 << 2;
        const NAME          = 1 << 3;
        const FLAGS         = 1 << 4;
        const DEPTHS        = 1 << 5;
        const BACKGROUND    = 1 << 6;
        const AMBIENT_LIGHT = 1 << 7;
        const AVATAR_LIGHT  = 1 << 8;
    }
}

/// Metadata of the room the avatar currently occupies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomInfo {
    pub avatar_id: ObjectId,
    /// Geometry resource of the room.
    pub room_file: String,
    pub room_id: u32,
    pub name: String,
    pub flags: u32,
    pub depths: [u16; 3],
    pub background: String,
    pub ambient_light: u8,
    pub avatar_light: u8,
}

impl RoomInfo {
    pub fn new(avatar_id: impl Into<ObjectId>, room_file: impl Into<String>) -> Self {
        Self {
            avatar_id: avatar_id.into(),
            room_file: room_file.into(),
            ..Self::default()
        }
    }

    pub fn update_from_snapshot(&mut self, snapshot: &RoomInfo, notify: bool) -> RoomFields {
        let mut changed = RoomFields::empty();
        if assign(&mut self.avatar_id, snapshot.avatar_id) {
            changed |= RoomFields::AVATAR_ID;
        }
        if assign(&mut self.room_file, snapshot.room_file.clone()) {
            changed |= RoomFields::ROOM_FILE;
        }
        if assign(&mut self.room_id, snapshot.room_id) {
            changed |= RoomFields::ROOM_ID;
        }
        if assign(&mut self.name, snapshot.name.clone()) {
            changed |= RoomFields::NAME;
        }
        if assign(&mut self.flags, snapshot.flags) {
            changed |= RoomFields::FLAGS;
        }
        if assign(&mut self.depths, snapshot.depths) {
            changed |= RoomFields::DEPTHS;
        }
        changed |= self.set_background(snapshot.background.clone());
        changed |= self.set_ambient_light(snapshot.ambient_light);
        changed |= self.set_avatar_light(snapshot.avatar_light);
        masked(changed, notify)
    }

    pub fn clear(&mut self, notify: bool) -> RoomFields {
        self.update_from_snapshot(&RoomInfo::default(), notify)
    }

    pub fn set_background(&mut self, background: String) -> RoomFields {
        if assign(&mut self.background, background) {
            RoomFields::BACKGROUND
        } else {
            RoomFields::empty()
        }
    }

    pub fn set_ambient_light(&mut self, level: u8) -> RoomFields {
        if assign(&mut self.ambient_light, level) {
            RoomFields::AMBIENT_LIGHT
        } else {
            RoomFields::empty()
        }
    }

    pub fn set_avatar_light(&mut self, level: u8) -> RoomFields {
        if assign(&mut self.avatar_light, level) {
            RoomFields::AVATAR_LIGHT
        } else {
            RoomFields::empty()
        }
    }
}
