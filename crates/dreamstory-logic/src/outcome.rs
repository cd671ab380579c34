//! Results of action requests, as seen by the presentation layer.

use serde::Serialize;

use crate::actions::ActionKind;
use crate::attributes::Mood;
use crate::outside::OutsideBranch;

/// Why a request was refused. Rejections never mutate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectReason {
    /// The action was already completed today.
    AlreadyDone,
    /// The identifier did not name any action.
    UnknownAction,
    /// Location checks are on and the current room does not offer the action.
    WrongRoom,
    /// Alex is out; the pending outside event must be resolved first.
    OutsideEventPending,
}

/// Banner colour for feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackTone {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Outcome {
    /// The action's effects were applied.
    #[serde(rename_all = "camelCase")]
    Applied {
        action: ActionKind,
        points_delta: i32,
        message: String,
        new_mood: Mood,
        /// Set when this resolves an outside event.
        outside: Option<OutsideBranch>,
    },
    /// Relax turned into an outside event; nothing applied yet.
    Redirected { action: ActionKind, message: String },
    Rejected {
        reason: RejectReason,
        message: String,
    },
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn is_redirected(&self) -> bool {
        matches!(self, Self::Redirected { .. })
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Self::Rejected { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Applied { message, .. }
            | Self::Redirected { message, .. }
            | Self::Rejected { message, .. } => message,
        }
    }

    /// `None` for a redirect, which shows a prompt instead of a banner.
    pub fn tone(&self) -> Option<FeedbackTone> {
        match self {
            Self::Applied { points_delta, .. } if *points_delta > 0 => Some(FeedbackTone::Positive),
            Self::Applied { .. } | Self::Rejected { .. } => Some(FeedbackTone::Negative),
            Self::Redirected { .. } => None,
        }
    }
}
