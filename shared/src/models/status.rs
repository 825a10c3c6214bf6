//! Document status enums and their allowed moves
//!
//! Approval-flow documents (estimations, quotations, sales orders, purchase
//! requisitions) share one status shape; work orders and tickets carry their
//! own lifecycles.

use serde::{Deserialize, Serialize};

/// Status of an approval-flow document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    PendingApproval,
    Approved,
    Rejected,
    Cancelled,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::PendingApproval => "pending_approval",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
            DocumentStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(DocumentStatus::Draft),
            "pending_approval" => Some(DocumentStatus::PendingApproval),
            "approved" => Some(DocumentStatus::Approved),
            "rejected" => Some(DocumentStatus::Rejected),
            "cancelled" => Some(DocumentStatus::Cancelled),
            _ => None,
        }
    }

    /// Statuses from which an approval is legal
    pub fn allows_approval(&self) -> bool {
        matches!(self, DocumentStatus::Draft | DocumentStatus::PendingApproval)
    }

    /// Statuses from which a rejection back to draft is legal
    pub fn allows_rejection(&self) -> bool {
        matches!(self, DocumentStatus::PendingApproval)
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a manufacturing work order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl WorkOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderStatus::Planned => "planned",
            WorkOrderStatus::InProgress => "in_progress",
            WorkOrderStatus::Completed => "completed",
            WorkOrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(WorkOrderStatus::Planned),
            "in_progress" => Some(WorkOrderStatus::InProgress),
            "completed" => Some(WorkOrderStatus::Completed),
            "cancelled" => Some(WorkOrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether a work order may move from `self` to `to`
    pub fn can_move_to(&self, to: WorkOrderStatus) -> bool {
        use WorkOrderStatus::*;
        matches!(
            (self, to),
            (Planned, InProgress) | (Planned, Cancelled) | (InProgress, Completed) | (InProgress, Cancelled)
        )
    }
}

impl std::fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a support ticket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(TicketStatus::Open),
            "in_progress" => Some(TicketStatus::InProgress),
            "resolved" => Some(TicketStatus::Resolved),
            "closed" => Some(TicketStatus::Closed),
            _ => None,
        }
    }

    /// Whether a ticket may move from `self` to `to`.
    /// Resolved tickets can reopen; closed tickets are terminal.
    pub fn can_move_to(&self, to: TicketStatus) -> bool {
        use TicketStatus::*;
        matches!(
            (self, to),
            (Open, InProgress)
                | (Open, Resolved)
                | (InProgress, Resolved)
                | (Resolved, Closed)
                | (Resolved, InProgress)
        )
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_allowed_from_draft_and_pending() {
        assert!(DocumentStatus::Draft.allows_approval());
        assert!(DocumentStatus::PendingApproval.allows_approval());
        assert!(!DocumentStatus::Approved.allows_approval());
        assert!(!DocumentStatus::Rejected.allows_approval());
        assert!(!DocumentStatus::Cancelled.allows_approval());
    }

    #[test]
    fn rejection_only_from_pending() {
        assert!(DocumentStatus::PendingApproval.allows_rejection());
        assert!(!DocumentStatus::Draft.allows_rejection());
        assert!(!DocumentStatus::Approved.allows_rejection());
    }

    #[test]
    fn work_order_terminal_states() {
        assert!(!WorkOrderStatus::Completed.can_move_to(WorkOrderStatus::InProgress));
        assert!(!WorkOrderStatus::Cancelled.can_move_to(WorkOrderStatus::Planned));
    }

    #[test]
    fn ticket_reopen_and_close() {
        assert!(TicketStatus::Resolved.can_move_to(TicketStatus::InProgress));
        assert!(TicketStatus::Resolved.can_move_to(TicketStatus::Closed));
        assert!(!TicketStatus::Closed.can_move_to(TicketStatus::Open));
    }
}
