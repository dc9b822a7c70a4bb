//! Balance command - effective income minus effective expenses

use anyhow::Result;
use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::{get_context, get_logger, report, require_user};
use crate::output::format_value;

#[derive(Serialize)]
struct BalanceReport {
    user_id: Uuid,
    balance: Decimal,
}

pub fn run(user_id: Uuid, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let result = require_user(&ctx, user_id).and_then(|_| {
        let balance = ctx.entry_service.balance_for_user(user_id)?;
        Ok(BalanceReport { user_id, balance })
    });

    report(json, &logger, "balance", "entry", result, |summary| {
        let amount = format_value(summary.balance);
        let amount = if summary.balance.is_sign_negative() {
            amount.red()
        } else {
            amount.green()
        };
        println!("{} {}", "Balance:".bold(), amount);
    })
}
