//! Data models for Custodia

pub mod asset;
pub mod audit;
pub mod checklist;
pub mod enums;
pub mod inspection;
pub mod loan;
pub mod reference;
pub mod return_record;
pub mod user;

// Re-export commonly used types
pub use asset::Asset;
pub use checklist::ChecklistTemplateItem;
pub use enums::{ConditionGrade, DamageSeverity, LoanStatus, ReturnCondition, UserRole};
pub use inspection::{ChecklistAnswer, Inspection, InspectionDetails};
pub use loan::{Loan, LoanDetails, LoanLineItem};
pub use return_record::{ReturnDetail, ReturnRecord};
pub use user::User;
