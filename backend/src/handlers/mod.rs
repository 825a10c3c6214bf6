//! HTTP handlers

pub mod auth;
pub mod case;
pub mod enquiry;
pub mod estimation;
pub mod health;
pub mod history;
pub mod purchase_requisition;
pub mod quotation;
pub mod sales_order;
pub mod ticket;
pub mod work_order;

pub use auth::*;
pub use case::*;
pub use enquiry::*;
pub use estimation::*;
pub use health::*;
pub use history::*;
pub use purchase_requisition::*;
pub use quotation::*;
pub use sales_order::*;
pub use ticket::*;
pub use work_order::*;
