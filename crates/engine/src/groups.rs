//! Shared-expense groups and their members.
//!
//! Members only exist inside a group. Member ids are unique within a group,
//! not globally; the reserved id [`OWNER_MEMBER_ID`] is always the local user.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    util::{normalize_optional_text, normalize_required_name},
};

/// Member id reserved for the owning user ("You").
pub const OWNER_MEMBER_ID: &str = "1";

/// Display name of the owning user.
pub const OWNER_MEMBER_NAME: &str = "You";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl GroupMember {
    /// The owning user.
    pub fn owner() -> Self {
        Self {
            id: OWNER_MEMBER_ID.to_string(),
            name: OWNER_MEMBER_NAME.to_string(),
            avatar: None,
        }
    }

    /// A new member with a fresh id and the upper-cased initial as avatar.
    pub fn new(name: &str) -> Self {
        let name = name.trim().to_string();
        Self {
            id: Uuid::new_v4().to_string(),
            avatar: initial(&name),
            name,
        }
    }

    /// A member whose id is already known.
    pub fn from_parts(id: &str, name: &str, avatar: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            avatar: avatar.map(ToString::to_string),
        }
    }

    pub fn is_owner(&self) -> bool {
        self.id == OWNER_MEMBER_ID
    }

    /// Short badge: the avatar if set, otherwise the first letter of the name.
    pub fn label(&self) -> String {
        self.avatar
            .clone()
            .filter(|a| !a.is_empty())
            .or_else(|| self.name.chars().next().map(String::from))
            .unwrap_or_default()
    }
}

fn initial(name: &str) -> Option<String> {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect::<String>())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub members: Vec<GroupMember>,
}

impl Group {
    pub fn member(&self, member_id: &str) -> Option<&GroupMember> {
        self.members.iter().find(|m| m.id == member_id)
    }

    pub fn has_member(&self, member_id: &str) -> bool {
        self.member(member_id).is_some()
    }

    pub fn member_ids(&self) -> HashSet<&str> {
        self.members.iter().map(|m| m.id.as_str()).collect()
    }
}

/// Input for [`Store::add_group`](crate::Store::add_group).
///
/// Starts with the owner as the only member; add at least one more before
/// submitting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewGroup {
    pub name: String,
    pub members: Vec<GroupMember>,
}

impl NewGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: vec![GroupMember::owner()],
        }
    }

    /// Adds a member by name. Blank names are ignored.
    pub fn member(mut self, name: &str) -> Self {
        if !name.trim().is_empty() {
            self.members.push(GroupMember::new(name));
        }
        self
    }

    /// Removes a member; the owner cannot be removed.
    pub fn remove_member(&mut self, member_id: &str) -> bool {
        if member_id == OWNER_MEMBER_ID {
            return false;
        }
        let before = self.members.len();
        self.members.retain(|m| m.id != member_id);
        self.members.len() != before
    }

    /// Checks the group shape and returns it with trimmed names.
    pub(crate) fn validate(self) -> ResultEngine<Self> {
        let name = normalize_required_name(&self.name, "group")?;

        let mut seen = HashSet::new();
        let mut members = Vec::with_capacity(self.members.len());
        for member in self.members {
            let id = member.id.trim().to_string();
            if id.is_empty() {
                return Err(EngineError::InvalidMember(
                    "member id must not be empty".to_string(),
                ));
            }
            if !seen.insert(id.clone()) {
                return Err(EngineError::ExistingKey(id));
            }
            members.push(GroupMember {
                name: normalize_required_name(&member.name, "member")?,
                avatar: normalize_optional_text(member.avatar.as_deref()),
                id,
            });
        }

        if !seen.contains(OWNER_MEMBER_ID) {
            return Err(EngineError::InvalidMember(format!(
                "group '{name}' must include the owner member \"{OWNER_MEMBER_ID}\""
            )));
        }
        if members.len() < 2 {
            return Err(EngineError::InvalidMember(format!(
                "group '{name}' needs at least 2 members"
            )));
        }

        Ok(Self { name, members })
    }

    pub(crate) fn with_id(self, id: String) -> Group {
        Group {
            id,
            name: self.name,
            members: self.members,
        }
    }
}
