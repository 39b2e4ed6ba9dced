use crate::controller::ControllerId;
use crate::menu::{MenuHandle, MenuId, MenuState};

/// Everything that can go wrong when asking a controller to do something.
///
/// None of these leave the controller in a half-updated state: the request is
/// refused before any active set, pool or queue mutation happens.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    #[error("Menu payload has the wrong type: expected {expected}, got {found}")]
    InvalidPayload {
        expected: &'static str,
        found: &'static str,
    },
    #[error("No menu template is registered for {0}")]
    UnknownIdentifier(MenuId),
    #[error("{menu:?} is owned by {owner:?} and cannot be claimed by {claimant:?}")]
    DoubleOwnership {
        menu: MenuHandle,
        owner: ControllerId,
        claimant: ControllerId,
    },
    #[error("{0:?} does not exist anymore")]
    UnknownMenu(MenuHandle),
    #[error("Cannot {action} {menu:?} while it is {state:?}")]
    InvalidState {
        menu: MenuHandle,
        state: MenuState,
        action: &'static str,
    },
    #[error("A menu template for {0} is already registered")]
    DuplicateIdentifier(MenuId),
    #[error("{child:?} is not a popup of {parent:?}")]
    NotAChild {
        parent: MenuHandle,
        child: MenuHandle,
    },
}
