//! Transactional lifecycle tests against a live Postgres.
//!
//! These exercise the invariants the pure-logic suites cannot reach: the
//! guarded approval updates, the case advance, the side-effect fan-out and
//! the rollback behaviour, all through the real services. They connect via
//! DATABASE_URL and are skipped when it is unset.

use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use sales_workflow_backend::error::AppError;
use sales_workflow_backend::services::{
    enquiry::CreateEnquiryInput,
    estimation::{CreateEstimationInput, EstimationItemInput},
    quotation::{CreateQuotationInput, QuotationItemInput},
    EnquiryService, EstimationService, QuotationService, SequenceService, WorkflowService,
};
use shared::{CaseState, DocumentType};

// ===========================================================================
// Fixtures
// ===========================================================================

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .ok()?;
    sqlx::migrate!("./migrations").run(&pool).await.ok()?;
    Some(pool)
}

fn sequences(pool: &PgPool) -> SequenceService {
    SequenceService::new(pool.clone(), "MEPL".to_string(), 4)
}

async fn seed_user(pool: &PgPool) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO users (email, full_name, role, password_hash)
        VALUES ($1, 'Test User', 'sales', 'not-a-real-hash')
        RETURNING id
        "#,
    )
    .bind(format!("user-{}@example.com", Uuid::new_v4()))
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Drive a fresh case up to a quotation in the given status.
/// Returns (case_id, quotation_id, actor_id).
async fn case_with_quotation(pool: &PgPool, submit: bool) -> (Uuid, Uuid, Uuid) {
    let actor = seed_user(pool).await;
    let enquiries = EnquiryService::new(pool.clone(), sequences(pool));
    let estimations = EstimationService::new(pool.clone(), sequences(pool));
    let quotations = QuotationService::new(pool.clone(), sequences(pool));
    let workflow = WorkflowService::new(pool.clone(), sequences(pool));

    let enquiry = enquiries
        .create_enquiry(
            CreateEnquiryInput {
                customer_name: "Acme Fabrication".to_string(),
                contact_email: None,
                subject: "Conveyor frame".to_string(),
                details: None,
            },
            actor,
        )
        .await
        .unwrap();

    let estimation = estimations
        .create_estimation(
            CreateEstimationInput {
                enquiry_id: enquiry.id,
                items: vec![EstimationItemInput {
                    description: "Mild steel frame".to_string(),
                    quantity: Decimal::from(2),
                    unit_cost: Decimal::from(1500),
                }],
                notes: None,
            },
            actor,
        )
        .await
        .unwrap();

    estimations
        .submit_estimation(estimation.estimation.id, actor)
        .await
        .unwrap();

    let approval = workflow
        .approve_estimation(estimation.estimation.id, actor)
        .await
        .unwrap();
    let transition = approval.case_transition.unwrap();
    let quotation_id = transition.child_documents[0].id;

    if submit {
        quotations.submit_quotation(quotation_id, actor).await.unwrap();
    }

    (transition.case_id, quotation_id, actor)
}

async fn quotation_status(pool: &PgPool, quotation_id: Uuid) -> String {
    sqlx::query_scalar("SELECT status FROM quotations WHERE id = $1")
        .bind(quotation_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn case_state(pool: &PgPool, case_id: Uuid) -> String {
    sqlx::query_scalar("SELECT current_state FROM cases WHERE id = $1")
        .bind(case_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn sales_order_count(pool: &PgPool, quotation_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM sales_orders WHERE quotation_id = $1")
        .bind(quotation_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ===========================================================================
// Approval end to end
// ===========================================================================

#[tokio::test]
async fn approving_pending_quotation_moves_case_to_order() {
    let Some(pool) = test_pool().await else { return };
    let (case_id, quotation_id, actor) = case_with_quotation(&pool, true).await;
    let workflow = WorkflowService::new(pool.clone(), sequences(&pool));

    let outcome = workflow.approve_quotation(quotation_id, actor).await.unwrap();
    let transition = outcome.case_transition.unwrap();
    assert_eq!(transition.from_state, CaseState::Quotation);
    assert_eq!(transition.new_state, CaseState::Order);
    assert_eq!(transition.child_documents.len(), 1);
    assert_eq!(
        transition.child_documents[0].document_type,
        DocumentType::SalesOrder
    );

    assert_eq!(quotation_status(&pool, quotation_id).await, "approved");
    assert_eq!(case_state(&pool, case_id).await, "order");
    assert_eq!(sales_order_count(&pool, quotation_id).await, 1);

    let transition_rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM case_state_transitions WHERE case_id = $1 AND to_state = 'order'",
    )
    .bind(case_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(transition_rows, 1);

    let history_rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM case_histories WHERE entity_type = 'quotation' AND entity_id = $1 AND status = 'approved'",
    )
    .bind(quotation_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(history_rows, 1);
}

#[tokio::test]
async fn repeated_quotation_approval_is_a_conflict_without_a_second_order() {
    let Some(pool) = test_pool().await else { return };
    let (case_id, quotation_id, actor) = case_with_quotation(&pool, true).await;
    let workflow = WorkflowService::new(pool.clone(), sequences(&pool));

    workflow.approve_quotation(quotation_id, actor).await.unwrap();

    let second = workflow.approve_quotation(quotation_id, actor).await;
    assert!(matches!(second, Err(AppError::Conflict { .. })));

    assert_eq!(sales_order_count(&pool, quotation_id).await, 1);
    assert_eq!(case_state(&pool, case_id).await, "order");
}

#[tokio::test]
async fn racing_quotation_approvals_have_exactly_one_winner() {
    let Some(pool) = test_pool().await else { return };
    let (_case_id, quotation_id, actor) = case_with_quotation(&pool, true).await;
    let first = WorkflowService::new(pool.clone(), sequences(&pool));
    let second = first.clone();

    let (a, b) = tokio::join!(
        first.approve_quotation(quotation_id, actor),
        second.approve_quotation(quotation_id, actor),
    );
    let winners = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(winners, 1);

    assert_eq!(sales_order_count(&pool, quotation_id).await, 1);
}

// ===========================================================================
// Generic transition entry point
// ===========================================================================

#[tokio::test]
async fn case_transition_approves_its_trigger_document() {
    let Some(pool) = test_pool().await else { return };
    let (case_id, quotation_id, actor) = case_with_quotation(&pool, false).await;
    let workflow = WorkflowService::new(pool.clone(), sequences(&pool));

    let outcome = workflow
        .transition_case(
            case_id,
            DocumentType::Quotation,
            quotation_id,
            CaseState::Order,
            actor,
        )
        .await
        .unwrap();
    assert_eq!(outcome.new_state, CaseState::Order);

    // The trigger quotation is approved as part of the transition
    assert_eq!(quotation_status(&pool, quotation_id).await, "approved");
    assert_eq!(sales_order_count(&pool, quotation_id).await, 1);
}

#[tokio::test]
async fn case_transition_rejects_a_quotation_from_another_case() {
    let Some(pool) = test_pool().await else { return };
    let (case_a, _quotation_a, actor) = case_with_quotation(&pool, true).await;
    let (_case_b, quotation_b, _) = case_with_quotation(&pool, true).await;
    let workflow = WorkflowService::new(pool.clone(), sequences(&pool));

    let result = workflow
        .transition_case(
            case_a,
            DocumentType::Quotation,
            quotation_b,
            CaseState::Order,
            actor,
        )
        .await;
    assert!(matches!(result, Err(AppError::Conflict { .. })));

    // Nothing moved: case A stays put, quotation B is still pending and
    // no sales order was minted from it
    assert_eq!(case_state(&pool, case_a).await, "quotation");
    assert_eq!(quotation_status(&pool, quotation_b).await, "pending_approval");
    assert_eq!(sales_order_count(&pool, quotation_b).await, 0);
}

#[tokio::test]
async fn case_transition_rejects_an_already_approved_quotation() {
    let Some(pool) = test_pool().await else { return };
    let (case_id, quotation_id, actor) = case_with_quotation(&pool, true).await;
    let workflow = WorkflowService::new(pool.clone(), sequences(&pool));

    workflow.approve_quotation(quotation_id, actor).await.unwrap();

    let result = workflow
        .transition_case(
            case_id,
            DocumentType::Quotation,
            quotation_id,
            CaseState::Order,
            actor,
        )
        .await;
    assert!(matches!(result, Err(AppError::Conflict { .. })));
    assert_eq!(sales_order_count(&pool, quotation_id).await, 1);
}

#[tokio::test]
async fn failed_case_advance_rolls_back_the_trigger_approval() {
    let Some(pool) = test_pool().await else { return };
    let (case_id, quotation_id, actor) = case_with_quotation(&pool, true).await;
    let quotations = QuotationService::new(pool.clone(), sequences(&pool));
    let workflow = WorkflowService::new(pool.clone(), sequences(&pool));

    // Case moves to order via the first quotation
    workflow.approve_quotation(quotation_id, actor).await.unwrap();

    // A second draft quotation on the same case can no longer drive the
    // quotation -> order transition; its approval must be rolled back with
    // the failed case advance
    let extra = quotations
        .create_quotation(
            CreateQuotationInput {
                customer_name: "Acme Fabrication".to_string(),
                case_id: Some(case_id),
                items: vec![QuotationItemInput {
                    description: "Spare rollers".to_string(),
                    quantity: Decimal::from(10),
                    unit_price: Decimal::from(85),
                }],
                valid_until: None,
            },
            actor,
        )
        .await
        .unwrap();

    let result = workflow
        .transition_case(
            case_id,
            DocumentType::Quotation,
            extra.quotation.id,
            CaseState::Order,
            actor,
        )
        .await;
    assert!(matches!(result, Err(AppError::Conflict { .. })));

    assert_eq!(quotation_status(&pool, extra.quotation.id).await, "draft");
    assert_eq!(sales_order_count(&pool, extra.quotation.id).await, 0);
}

// ===========================================================================
// Allocator under concurrency
// ===========================================================================

#[tokio::test]
async fn concurrent_allocations_never_repeat_a_number() {
    let Some(pool) = test_pool().await else { return };
    let allocator = sequences(&pool);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let allocator = allocator.clone();
        handles.push(tokio::spawn(async move {
            allocator.next_document_number(DocumentType::Ticket).await
        }));
    }

    let mut numbers = std::collections::HashSet::new();
    for handle in handles {
        let number = handle.await.unwrap().unwrap();
        assert!(numbers.insert(number));
    }
}
