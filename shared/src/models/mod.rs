//! Domain models for the Sales Workflow Management Platform

mod case;
mod enquiry;
mod estimation;
mod purchase_requisition;
mod quotation;
mod sales_order;
mod status;
mod ticket;
mod user;
mod work_order;

pub use case::*;
pub use enquiry::*;
pub use estimation::*;
pub use purchase_requisition::*;
pub use quotation::*;
pub use sales_order::*;
pub use status::*;
pub use ticket::*;
pub use user::*;
pub use work_order::*;
