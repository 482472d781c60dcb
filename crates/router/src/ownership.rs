//! Two-step ownership.
//!
//! The owner proposes a successor; ownership moves only when the successor
//! accepts. Until then the current owner keeps every privilege.

use multilane_types::{Address, ErrorKind, Notification};
use parking_lot::RwLock;
use thiserror::Error;
use tracing::info;

/// Errors from privileged operations and ownership transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OwnershipError {
    /// Caller is not the owner.
    #[error("Only callable by owner (caller {caller})")]
    OnlyCallableByOwner { caller: Address },

    /// Caller is not the proposed owner.
    #[error("Must be proposed owner (caller {caller})")]
    MustBeProposedOwner { caller: Address },

    /// Owner proposed itself.
    #[error("Cannot transfer to self")]
    CannotTransferToSelf,

    /// Initial owner is the zero address.
    #[error("Owner cannot be zero")]
    OwnerCannotBeZero,
}

impl OwnershipError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OwnershipError::OwnerCannotBeZero | OwnershipError::CannotTransferToSelf => {
                ErrorKind::Validation
            }
            _ => ErrorKind::Authorization,
        }
    }
}

#[derive(Debug)]
struct OwnershipState {
    owner: Address,
    pending: Option<Address>,
}

/// Current owner and pending successor.
#[derive(Debug)]
pub struct Ownership {
    state: RwLock<OwnershipState>,
}

impl Ownership {
    /// Create ownership held by `owner`.
    pub fn new(owner: Address) -> Result<Self, OwnershipError> {
        if owner.is_zero() {
            return Err(OwnershipError::OwnerCannotBeZero);
        }
        Ok(Self {
            state: RwLock::new(OwnershipState {
                owner,
                pending: None,
            }),
        })
    }

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.state.read().owner
    }

    /// Proposed successor, if a transfer is in flight.
    pub fn pending_owner(&self) -> Option<Address> {
        self.state.read().pending
    }

    /// Fail unless `caller` is the owner.
    pub fn require_owner(&self, caller: &Address) -> Result<(), OwnershipError> {
        if self.state.read().owner != *caller {
            return Err(OwnershipError::OnlyCallableByOwner { caller: *caller });
        }
        Ok(())
    }

    /// Propose `to` as the next owner.
    ///
    /// A later proposal replaces an earlier one.
    pub fn transfer(&self, caller: &Address, to: Address) -> Result<Notification, OwnershipError> {
        let mut state = self.state.write();
        if state.owner != *caller {
            return Err(OwnershipError::OnlyCallableByOwner { caller: *caller });
        }
        if to == *caller {
            return Err(OwnershipError::CannotTransferToSelf);
        }
        state.pending = Some(to);

        info!(from = %caller, to = %to, "Ownership transfer requested");
        Ok(Notification::OwnershipTransferRequested { from: *caller, to })
    }

    /// Complete a transfer; `caller` must be the proposed owner.
    pub fn accept(&self, caller: &Address) -> Result<Notification, OwnershipError> {
        let mut state = self.state.write();
        if state.pending != Some(*caller) {
            return Err(OwnershipError::MustBeProposedOwner { caller: *caller });
        }
        let from = std::mem::replace(&mut state.owner, *caller);
        state.pending = None;

        info!(from = %from, to = %caller, "Ownership transferred");
        Ok(Notification::OwnershipTransferred { from, to: *caller })
    }
}
