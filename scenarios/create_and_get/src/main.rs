mod context;
mod flows;
mod queries;

use std::time::Duration;

use clap::Parser;
use gust_runner::prelude::*;

use crate::context::CoopFundContext;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct CreateAndGetCli {
    #[command(flatten)]
    gust: GustScenarioCli,

    /// Sometimes submit REJECTED instead of always approving created payments.
    #[clap(long, default_value = "false")]
    exercise_rejections: bool,
}

fn setup(ctx: &mut RunnerContext<CoopFundContext>) -> BoxFuture<'_, HookResult> {
    flows::signup_and_store_token(ctx).boxed()
}

/// One pass over the whole read battery after creating and settling a payment.
fn smoke_behaviour(ctx: &mut VuContext<CoopFundContext>) -> BoxFuture<'_, HookResult> {
    async move {
        if let Some(id) = flows::perform_create_payment(ctx).await {
            flows::perform_approve_or_reject(ctx, &id, "smoke").await;
        }
        pause().await;
        flows::perform_get_all_payments(ctx).await;
        pause().await;
        flows::perform_get_user_payments(ctx).await;
        pause().await;
        flows::perform_get_history(ctx).await;
        pause().await;
        flows::perform_get_user_loans(ctx).await;
        pause().await;
        flows::perform_get_fines(ctx).await;
        pause().await;
        if let Some(fine_key) = flows::perform_create_fine(ctx).await {
            flows::perform_edit_fine(ctx, &fine_key).await;
        }
        pause().await;
        flows::perform_get_pending_quotas(ctx).await;
        pause().await;
        flows::perform_get_monthly_affiliate_quota(ctx).await;
        pause().await;
        flows::perform_get_quotas_prestamo_pendientes(ctx).await;
        pause().await;
        flows::perform_get_pending_loans_quotas(ctx).await;
        pause().await;
        flows::perform_get_all_members(ctx).await;

        Ok(())
    }
    .boxed()
}

/// The ramping scenario keeps iterations short: create, settle, read back.
fn full_behaviour(ctx: &mut VuContext<CoopFundContext>) -> BoxFuture<'_, HookResult> {
    async move {
        if let Some(id) = flows::perform_create_payment(ctx).await {
            flows::perform_approve_or_reject(ctx, &id, "full").await;
        }
        pause().await;
        flows::perform_get_all_payments(ctx).await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        Ok(())
    }
    .boxed()
}

async fn pause() {
    tokio::time::sleep(Duration::from_millis(500)).await;
}

fn stage(secs: u64, target: usize) -> Stage {
    Stage {
        duration: Duration::from_secs(secs),
        target,
    }
}

fn main() -> GustResult<()> {
    let cli: CreateAndGetCli = init();

    let builder = RunConfigBuilder::new(env!("CARGO_PKG_NAME"), cli.gust)
        .with_context(CoopFundContext {
            exercise_rejections: cli.exercise_rejections,
            ..Default::default()
        })
        .use_setup(setup)
        .add_scenario(Scenario::constant_vus(
            "smoke",
            5,
            Duration::from_secs(30),
            smoke_behaviour,
        ))
        .add_scenario(
            Scenario::ramping_vus(
                "full",
                vec![stage(60, 10), stage(120, 50), stage(60, 100), stage(60, 0)],
                full_behaviour,
            )
            // Hold back until the smoke scenario has wrapped up.
            .with_start_offset(Duration::from_secs(35)),
        )
        .with_thresholds(vec![
            Threshold::DurationPercentile {
                percentile: 95.0,
                below_ms: 1000.0,
            },
            Threshold::CheckRate { above: 0.99 },
        ]);

    run(builder)?;

    Ok(())
}
