//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Document types that receive allocator-issued numbers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Case,
    Enquiry,
    Estimation,
    Quotation,
    SalesOrder,
    WorkOrder,
    PurchaseRequisition,
    Ticket,
}

impl DocumentType {
    /// Short alphanumeric code embedded in document numbers
    pub fn code(&self) -> &'static str {
        match self {
            DocumentType::Case => "CS",
            DocumentType::Enquiry => "EQ",
            DocumentType::Estimation => "ES",
            DocumentType::Quotation => "Q",
            DocumentType::SalesOrder => "SO",
            DocumentType::WorkOrder => "WO",
            DocumentType::PurchaseRequisition => "PR",
            DocumentType::Ticket => "TK",
        }
    }

    /// Snake_case name used for audit and history rows
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Case => "case",
            DocumentType::Enquiry => "enquiry",
            DocumentType::Estimation => "estimation",
            DocumentType::Quotation => "quotation",
            DocumentType::SalesOrder => "sales_order",
            DocumentType::WorkOrder => "work_order",
            DocumentType::PurchaseRequisition => "purchase_requisition",
            DocumentType::Ticket => "ticket",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "case" => Some(DocumentType::Case),
            "enquiry" => Some(DocumentType::Enquiry),
            "estimation" => Some(DocumentType::Estimation),
            "quotation" => Some(DocumentType::Quotation),
            "sales_order" => Some(DocumentType::SalesOrder),
            "work_order" => Some(DocumentType::WorkOrder),
            "purchase_requisition" => Some(DocumentType::PurchaseRequisition),
            "ticket" => Some(DocumentType::Ticket),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
