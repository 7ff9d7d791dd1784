//! Access Policy Engine
//! Mission: One shared allow/deny decision for every gated operation

use crate::models::Role;

/// An operation a requester may attempt against the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreatePost,
    EditPost,
    DeletePost,
    CreateComment,
    EditComment,
    DeleteComment,
    AssignRole,
    /// Carries the target account's role so the admin-protection
    /// rule can be evaluated without a second lookup.
    DeleteAccount { target_role: Role },
    ResetPassword,
}

impl Action {
    /// Minimum role required before ownership is even considered
    fn min_role(&self) -> Role {
        match self {
            Action::CreatePost | Action::EditPost | Action::DeletePost => Role::Blogger,
            Action::CreateComment | Action::EditComment | Action::DeleteComment => {
                Role::Subscriber
            }
            Action::AssignRole | Action::DeleteAccount { .. } => Role::Admin,
            Action::ResetPassword => Role::Subscriber,
        }
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    InsufficientRole,
    NotOwner,
    CannotDeleteAdmin,
}

impl Decision {
    /// Turn a decision into a `?`-friendly result for handlers
    pub fn require(self) -> Result<(), DenyReason> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(reason),
        }
    }
}

/// Decide whether `requester` may perform `action` on a resource owned by
/// `resource_owner` (None when the action has no owned target, e.g. creation).
///
/// Rules, first match wins:
/// 1. requester below the action's minimum role -> InsufficientRole
/// 2. deleting an Admin account -> CannotDeleteAdmin, even for admins
/// 3. Admin -> Allow (ownership bypass)
/// 4. requester owns the resource -> Allow, else NotOwner
pub fn authorize(
    requester_role: Role,
    requester_id: i64,
    action: Action,
    resource_owner: Option<i64>,
) -> Decision {
    if requester_role.rank() < action.min_role().rank() {
        return Decision::Deny(DenyReason::InsufficientRole);
    }

    if let Action::DeleteAccount {
        target_role: Role::Admin,
    } = action
    {
        return Decision::Deny(DenyReason::CannotDeleteAdmin);
    }

    if requester_role == Role::Admin {
        return Decision::Allow;
    }

    match resource_owner {
        None => Decision::Allow,
        Some(owner) if owner == requester_id => Decision::Allow,
        Some(_) => Decision::Deny(DenyReason::NotOwner),
    }
}
