//! One helper per operation against the cooperative fund API. Every helper issues its
//! request, records its named check, and swallows transport failures as failed checks so the
//! iteration carries on.

use anyhow::Context as _;
use gust_client::prelude::{
    extract_access_token, extract_mutation_id, HttpClient, HttpResponse,
};
use gust_runner::prelude::{HookResult, RunnerContext, VuContext};
use nanoid::nanoid;
use serde_json::json;

use crate::context::{
    fine_endpoint, loan_endpoint, payment_endpoint, quota_endpoint, signup_endpoint,
    CoopFundContext,
};
use crate::queries;

type Ctx = VuContext<CoopFundContext>;

/// Sign up a fresh user and stash the access token in the shared context. Runs once, in the
/// setup hook; any failure here aborts the run.
pub async fn signup_and_store_token(ctx: &mut RunnerContext<CoopFundContext>) -> HookResult {
    let client = HttpClient::new(ctx.reporter().clone(), ctx.request_timeout())
        .context("Failed to build the HTTP client")?;

    let user_name = format!("gust_user_{}", nanoid!(10));
    let payload = json!({
        "user_name": user_name,
        "pass_code": "testpass123",
        "real_name": "gust test user",
    });

    let response = client
        .post("signup", &signup_endpoint(ctx.base_url()), &payload)
        .await
        .context("Signup request failed")?;
    ctx.checks()
        .record("signup status 200", response.is_status(200));

    let token = extract_access_token(&response.body)
        .context("Signup did not return an access token, aborting")?;

    let shared = ctx.get_mut();
    shared.client = Some(client);
    shared.access_token = token;
    shared.affiliate_key = user_name;

    Ok(())
}

/// Issue a GraphQL call and record the named check against its status. Transport failures
/// count as a failed check and yield no response.
async fn checked_graphql(
    ctx: &Ctx,
    operation: &str,
    check: &str,
    endpoint: String,
    query: &str,
    variables: serde_json::Value,
) -> Option<HttpResponse> {
    let shared = ctx.runner_context().get();
    let Some(client) = shared.client() else {
        log::error!("{operation} skipped, setup never supplied an HTTP client");
        ctx.checks().record(check, false);
        return None;
    };
    match client.graphql(operation, &endpoint, query, variables).await {
        Ok(response) => {
            ctx.checks().record(check, response.is_status(200));
            Some(response)
        }
        Err(e) => {
            log::debug!("{operation} failed at the transport level: {e}");
            ctx.checks().record(check, false);
            None
        }
    }
}

fn base_url(ctx: &Ctx) -> String {
    ctx.runner_context().base_url().to_string()
}

fn token(ctx: &Ctx) -> String {
    ctx.runner_context().get().access_token.clone()
}

/// Create a payment and return its id when the mutation yields one. The id may come back as
/// a bare string or wrapped in an object.
pub async fn perform_create_payment(ctx: &Ctx) -> Option<String> {
    let unique = nanoid!(10);
    let variables = json!({
        "accessToken": token(ctx),
        "name": format!("gust_payment_{unique}"),
        "totalAmount": 42.5,
        "ticketNumber": format!("T_{unique}"),
        "accountNumber": format!("A_{unique}"),
        "beingPayed": [
            { "modelType": "LOAN", "amount": 42.5, "modelKey": format!("LOAN_{unique}") }
        ],
    });

    let response = checked_graphql(
        ctx,
        "create_payment",
        "create payment 200",
        payment_endpoint(&base_url(ctx)),
        queries::CREATE_PAYMENT_MUTATION,
        variables,
    )
    .await?;

    extract_mutation_id(&response.body, "createUserPayment")
}

/// Approve the payment, or reject it when rejections are being exercised.
pub async fn perform_approve_or_reject(ctx: &Ctx, id: &str, scenario_tag: &str) {
    let reject = ctx.runner_context().get().exercise_rejections && rand::random::<bool>();
    let (new_state, verb) = if reject {
        ("REJECTED", "rejected")
    } else {
        ("ACCEPTED", "approved")
    };

    let variables = json!({
        "id": id,
        "newState": new_state,
        "commentary": format!("{verb} by gust {scenario_tag}"),
    });

    checked_graphql(
        ctx,
        "approve_or_reject_payment",
        "approve/reject payment 200",
        payment_endpoint(&base_url(ctx)),
        queries::APPROVE_REJECT_MUTATION,
        variables,
    )
    .await;
}

pub async fn perform_get_all_payments(ctx: &Ctx) {
    checked_graphql(
        ctx,
        "get_all_payments",
        "get all payments 200",
        payment_endpoint(&base_url(ctx)),
        queries::GET_ALL_PAYMENTS_QUERY,
        json!({}),
    )
    .await;
}

pub async fn perform_get_user_payments(ctx: &Ctx) {
    checked_graphql(
        ctx,
        "get_user_payments",
        "get user payments 200",
        payment_endpoint(&base_url(ctx)),
        queries::GET_USER_PAYMENTS_QUERY,
        json!({ "accessToken": token(ctx) }),
    )
    .await;
}

pub async fn perform_get_history(ctx: &Ctx) {
    checked_graphql(
        ctx,
        "get_history",
        "get history 200",
        payment_endpoint(&base_url(ctx)),
        queries::GET_HISTORY_QUERY,
        json!({ "accessToken": token(ctx) }),
    )
    .await;
}

pub async fn perform_get_user_loans(ctx: &Ctx) {
    checked_graphql(
        ctx,
        "get_user_loans",
        "get user loans 200",
        loan_endpoint(&base_url(ctx)),
        queries::GET_USER_LOANS_QUERY,
        json!({ "accessToken": token(ctx) }),
    )
    .await;
}

pub async fn perform_get_fines(ctx: &Ctx) {
    checked_graphql(
        ctx,
        "get_fines",
        "get fines 200",
        fine_endpoint(&base_url(ctx)),
        queries::GET_FINES_BY_ID_QUERY,
        json!({ "accessToken": token(ctx) }),
    )
    .await;
}

/// Create a fine against the signed-up user and return the fine key when one comes back.
pub async fn perform_create_fine(ctx: &Ctx) -> Option<String> {
    let affiliate_key = ctx.runner_context().get().affiliate_key.clone();
    let variables = json!({
        "affiliateKey": affiliate_key,
        "amount": 10.0,
        "motive": "gust fine test",
    });

    let response = checked_graphql(
        ctx,
        "create_fine",
        "create fine 200",
        fine_endpoint(&base_url(ctx)),
        queries::CREATE_FINE_MUTATION,
        variables,
    )
    .await?;

    extract_mutation_id(&response.body, "createFine")
}

pub async fn perform_edit_fine(ctx: &Ctx, fine_key: &str) {
    let variables = json!({
        "fineKey": fine_key,
        "newAmount": 12.5,
        "newMotive": "gust fine test (edited)",
        "newStatus": null,
    });

    checked_graphql(
        ctx,
        "edit_fine",
        "edit fine 200",
        fine_endpoint(&base_url(ctx)),
        queries::EDIT_FINE_MUTATION,
        variables,
    )
    .await;
}

pub async fn perform_get_pending_quotas(ctx: &Ctx) {
    checked_graphql(
        ctx,
        "get_pending_quotas",
        "get pending quotas 200",
        quota_endpoint(&base_url(ctx)),
        queries::GET_PENDING_QUOTAS_QUERY,
        json!({ "accessToken": token(ctx) }),
    )
    .await;
}

pub async fn perform_get_monthly_affiliate_quota(ctx: &Ctx) {
    checked_graphql(
        ctx,
        "get_monthly_affiliate_quota",
        "get monthly affiliate quota 200",
        quota_endpoint(&base_url(ctx)),
        queries::GET_MONTHLY_AFFILIATE_QUOTA_QUERY,
        json!({ "accessToken": token(ctx) }),
    )
    .await;
}

pub async fn perform_get_quotas_prestamo_pendientes(ctx: &Ctx) {
    checked_graphql(
        ctx,
        "get_quotas_prestamo_pendientes",
        "get quotas prestamo pendientes 200",
        quota_endpoint(&base_url(ctx)),
        queries::GET_QUOTAS_PRESTAMO_PENDIENTES_QUERY,
        json!({ "accessToken": token(ctx) }),
    )
    .await;
}

pub async fn perform_get_pending_loans_quotas(ctx: &Ctx) {
    checked_graphql(
        ctx,
        "get_pending_loans_quotas",
        "get pending loans quotas 200",
        quota_endpoint(&base_url(ctx)),
        queries::GET_PENDING_LOANS_QUOTAS_QUERY,
        json!({ "accessToken": token(ctx) }),
    )
    .await;
}

pub async fn perform_get_all_members(ctx: &Ctx) {
    checked_graphql(
        ctx,
        "get_all_members",
        "get all members 200",
        payment_endpoint(&base_url(ctx)),
        queries::GET_ALL_MEMBERS_QUERY,
        json!({}),
    )
    .await;
}
