//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{assets, checklists, health, inspections, loans, returns, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Custodia API",
        version = "1.0.0",
        description = "Institutional Equipment Lending REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Assets & reference data
        assets::list_assets,
        assets::get_asset,
        assets::create_asset,
        assets::update_asset,
        assets::deactivate_asset,
        assets::list_categories,
        assets::create_category,
        assets::list_locations,
        assets::create_location,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        // Loans
        loans::submit_loan,
        loans::list_loans,
        loans::get_loan,
        loans::get_user_loans,
        loans::approve_loan,
        loans::reject_loan,
        loans::cancel_loan,
        // Inspections
        inspections::record_inspection,
        inspections::get_loan_inspections,
        // Returns
        returns::submit_return,
        returns::get_return,
        // Checklists
        checklists::list_checklist,
        checklists::append_checklist_item,
        checklists::delete_checklist_item,
    ),
    components(
        schemas(
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            // Enums
            crate::models::enums::LoanStatus,
            crate::models::enums::ConditionGrade,
            crate::models::enums::ReturnCondition,
            crate::models::enums::DamageSeverity,
            crate::models::enums::UserRole,
            // Assets & reference data
            crate::models::asset::Asset,
            crate::models::asset::CreateAsset,
            crate::models::asset::UpdateAsset,
            crate::models::reference::Category,
            crate::models::reference::Location,
            crate::models::reference::CreateCategory,
            crate::models::reference::CreateLocation,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::LoanLineItem,
            crate::models::loan::LoanLineDetails,
            crate::models::loan::LoanDetails,
            crate::models::loan::RequestedLine,
            crate::models::loan::CreateLoan,
            crate::models::loan::RejectLoan,
            // Inspections
            crate::models::inspection::Inspection,
            crate::models::inspection::ChecklistAnswer,
            crate::models::inspection::InspectionDetails,
            crate::models::inspection::AnswerInput,
            crate::models::inspection::CreateInspection,
            // Returns
            crate::models::return_record::ReturnRecord,
            crate::models::return_record::ReturnDetail,
            crate::models::return_record::ReturnDetails,
            crate::models::return_record::ReturnSplit,
            crate::models::return_record::CreateReturn,
            // Checklists
            crate::models::checklist::ChecklistTemplateItem,
            crate::models::checklist::CreateTemplateItem,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "assets", description = "Asset ledger and reference data"),
        (name = "users", description = "Attribution users"),
        (name = "loans", description = "Loan lifecycle"),
        (name = "inspections", description = "Pre-issue inspection gate"),
        (name = "returns", description = "Return reconciliation"),
        (name = "checklists", description = "Checklist templates"),
    )
)]
pub struct ApiDoc;

/// Router serving the Swagger UI with the generated document
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
