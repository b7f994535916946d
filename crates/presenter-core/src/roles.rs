//! Semantic roles bound to physical face buttons.

use std::fmt;

use crate::error::{PresenterError, Result};
use crate::exit::ExitCode;
use crate::input::Button;

/// A dialog action a face button can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Action,
    Confirm,
    Cancel,
    Inaction,
}

impl Role {
    /// Roles in the order a released button is matched against them.
    pub const ALL: [Role; 4] = [Role::Action, Role::Confirm, Role::Cancel, Role::Inaction];

    /// Exit status produced when this role fires.
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Action => ExitCode::Action,
            Self::Confirm => ExitCode::Confirm,
            Self::Cancel => ExitCode::Cancel,
            Self::Inaction => ExitCode::Inaction,
        }
    }

    /// Label used when a hint sets no text of its own.
    pub fn default_text(self) -> &'static str {
        match self {
            Self::Action => "ACTION",
            Self::Confirm => "SELECT",
            Self::Cancel => "BACK",
            Self::Inaction => "OTHER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Action => "action",
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
            Self::Inaction => "inaction",
        };
        f.write_str(name)
    }
}

/// Parse a face button name. The empty string means "unbound".
pub fn parse_face_button(role: Role, name: &str) -> Result<Option<Button>> {
    match name {
        "" => Ok(None),
        "A" => Ok(Some(Button::A)),
        "B" => Ok(Some(Button::B)),
        "X" => Ok(Some(Button::X)),
        "Y" => Ok(Some(Button::Y)),
        other => Err(PresenterError::Config(format!(
            "invalid {role} button '{other}'"
        ))),
    }
}

/// Which face button, if any, triggers each role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonRoles {
    pub action: Option<Button>,
    pub confirm: Option<Button>,
    pub cancel: Option<Button>,
    pub inaction: Option<Button>,
}

impl ButtonRoles {
    /// Build bindings from button names, validating them.
    pub fn parse(action: &str, confirm: &str, cancel: &str, inaction: &str) -> Result<Self> {
        let roles = Self {
            action: parse_face_button(Role::Action, action)?,
            confirm: parse_face_button(Role::Confirm, confirm)?,
            cancel: parse_face_button(Role::Cancel, cancel)?,
            inaction: parse_face_button(Role::Inaction, inaction)?,
        };
        roles.validate()?;
        Ok(roles)
    }

    /// Button bound to `role`.
    pub fn button(&self, role: Role) -> Option<Button> {
        match role {
            Role::Action => self.action,
            Role::Confirm => self.confirm,
            Role::Cancel => self.cancel,
            Role::Inaction => self.inaction,
        }
    }

    /// Reject bindings that put two roles on the same button.
    pub fn validate(&self) -> Result<()> {
        for button in Button::FACE {
            let bound: Vec<Role> = Role::ALL
                .into_iter()
                .filter(|&role| self.button(role) == Some(button))
                .collect();
            if bound.len() > 1 {
                return Err(PresenterError::Config(format!(
                    "{} button cannot be assigned to more than one role",
                    button.label()
                )));
            }
        }
        Ok(())
    }

    /// Role triggered by releasing `button`.
    pub fn role_for(&self, button: Button) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|&role| self.button(role) == Some(button))
    }
}
