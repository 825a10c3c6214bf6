//! Business logic services

pub mod auth;
pub mod enquiry;
pub mod estimation;
pub mod history;
pub mod purchase_requisition;
pub mod quotation;
pub mod sales_order;
pub mod sequence;
pub mod ticket;
pub mod work_order;
pub mod workflow;

pub use auth::AuthService;
pub use enquiry::EnquiryService;
pub use estimation::EstimationService;
pub use history::HistoryService;
pub use purchase_requisition::PurchaseRequisitionService;
pub use quotation::QuotationService;
pub use sales_order::SalesOrderService;
pub use sequence::SequenceService;
pub use ticket::TicketService;
pub use work_order::WorkOrderService;
pub use workflow::WorkflowService;
