//! plan-runner: headless schedule and award calendar for one group.
//!
//! Usage:
//!   plan-runner --group GR-002 --capital 20000 --term 48 --cohort 48
//!   plan-runner --group GR-002 --activation 2025-01-15 --flagged 7 --json
//!   plan-runner --group GR-002 --db plans.db --paid 5   (pays up to 5 in total)

use anyhow::{Context, Result};
use chrono::NaiveDate;
use circle_core::{
    config::PlanConfig,
    engine::PlanDesk,
    group::GroupPlan,
    installment::InstallmentStatus,
    ledger::{PlanView, TransparencyReport},
    store::PlanStore,
};
use std::env;
use std::path::Path;

#[derive(serde::Serialize)]
struct RunnerOutput {
    view: PlanView,
    report: TransparencyReport,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let group_id = parse_str(&args, "--group").unwrap_or("GR-001");
    let capital = parse_arg(&args, "--capital", 20_000.0f64);
    let term = parse_arg(&args, "--term", 48u32);
    let cohort = parse_arg(&args, "--cohort", term);
    let paid = parse_arg(&args, "--paid", 0u32);
    let json = args.iter().any(|a| a == "--json");
    let db = parse_str(&args, "--db").unwrap_or(":memory:");
    let data_dir = parse_str(&args, "--data-dir").unwrap_or("./data");

    let activation = parse_str(&args, "--activation")
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("--activation must be YYYY-MM-DD")?;
    let flagged = parse_str(&args, "--flagged")
        .map(str::parse::<i64>)
        .transpose()
        .context("--flagged must be an order number")?;

    let config_path = format!("{data_dir}/plan/plan_config.json");
    let config = if Path::new(&config_path).exists() {
        PlanConfig::load(data_dir)?
    } else {
        log::warn!("{config_path} not found; using built-in defaults");
        PlanConfig::default()
    };

    let store = if db == ":memory:" {
        PlanStore::in_memory()?
    } else {
        PlanStore::open(db)?
    };
    store.migrate()?;
    let desk = PlanDesk::new(config, store)?;

    if desk.store().group(group_id)?.is_none() {
        desk.register_group(&GroupPlan {
            group_id: group_id.to_string(),
            name: format!("Group {group_id}"),
            capital,
            term_months: term,
            cohort_size: cohort,
            activation_date: activation,
            viewer_order_number: flagged,
            viewer_awarded: flagged.is_some(),
        })?;
    }

    let today = chrono::Local::now().date_naive();
    let recorded = desk.pay_up_to(group_id, paid, today)?;
    if !recorded.is_empty() {
        log::info!("recorded {} payment(s) for {group_id}", recorded.len());
    }

    let view = desk.plan_view(group_id, today)?;
    let report = desk.transparency_report(group_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&RunnerOutput { view, report })?);
    } else {
        print_view(&view);
        print_report(&report);
    }
    Ok(())
}

fn print_view(view: &PlanView) {
    println!("=== PLAN {} ===", view.group_id);
    if view.example {
        println!("  (example schedule: plan not yet active)");
    }
    println!(
        "  {:>3}  {:<10}  {:>9}  {:>8}  {:>8}  {:>8}  {:>9}  {:<8}  awards",
        "#", "due", "quota", "admin", "insur.", "subs.", "total", "status"
    );
    for row in &view.rows {
        let i = &row.installment;
        let b = &i.breakdown;
        let subs = b
            .subscription_right
            .map(|s| format!("{s:.2}"))
            .unwrap_or_else(|| "-".into());
        let awards: Vec<String> = row
            .awards
            .iter()
            .map(|a| {
                if a.is_placeholder() {
                    format!("{}:deserted", a.kind.label())
                } else {
                    format!("{}:#{}", a.kind.label(), a.order_number)
                }
            })
            .collect();
        println!(
            "  {:>3}  {:<10}  {:>9.2}  {:>8.2}  {:>8.2}  {:>8}  {:>9.2}  {:<8}  {}",
            i.number,
            i.due.to_string(),
            b.pure_quota,
            b.admin_fee,
            b.life_insurance,
            subs,
            i.total,
            status_label(row.status),
            awards.join(", ")
        );
    }
    if let Some(month) = view.viewer_award_month {
        println!("  viewer awarded in month {}", month + 1);
    }
    println!();
}

fn print_report(report: &TransparencyReport) {
    let c = &report.collected_per_member;
    println!("=== TRANSPARENCY REPORT ===");
    println!("  months elapsed:   {}/{}", report.months_elapsed, report.term_months);
    println!("  awarded:          {}", report.members_awarded);
    println!("  pending:          {}", report.members_pending);
    println!("  deserted bids:    {}", report.deserted_bids);
    println!("  monthly pool:     {:.2}", report.monthly_pool_collection);
    println!("  disbursed:        {:.2}", report.capital_disbursed);
    println!("  paid per member:  {:.2}", c.total);
    println!(
        "    quota {:.2} | admin {:.2} | insurance {:.2} | subscription {:.2}",
        c.pure_quota, c.admin_fee, c.life_insurance, c.subscription_right
    );
}

fn status_label(status: InstallmentStatus) -> &'static str {
    match status {
        InstallmentStatus::Paid => "paid",
        InstallmentStatus::Pending => "pending",
        InstallmentStatus::Overdue => "overdue",
        InstallmentStatus::Future => "future",
    }
}

fn parse_str<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    parse_str(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
