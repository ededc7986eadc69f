//! Plain-text rendering of results, the expense tree and the jurisdiction
//! list. Every function returns the text; printing is left to the caller.

use std::fmt::Write;

use income_core::calculations::{display_total, share_percent};
use income_core::{
    CalculationResult, DisplayPeriod, ExpenseId, ExpenseNode, IncomeSpec, JurisdictionTable,
};
use rust_decimal::Decimal;

use crate::utils::{format_money, format_money_whole};

/// Characters of an expense id shown in listings. Any unique prefix is
/// accepted back on the command line.
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &ExpenseId) -> &str {
    let full = id.as_str();
    full.get(..SHORT_ID_LEN).unwrap_or(full)
}

pub fn describe_income(income: &IncomeSpec) -> String {
    format!(
        "{} {} ({}), {}h x {}d per week, jurisdiction {}",
        format_money(income.amount),
        income.cadence,
        if income.is_gross { "gross" } else { "net" },
        income.hours_per_day.normalize(),
        income.days_per_week.normalize(),
        income.jurisdiction,
    )
}

/// Headline figures at `period`, the per-root expense shares and the
/// take-home breakdown.
pub fn render_summary(
    income: &IncomeSpec,
    result: &CalculationResult,
    period: DisplayPeriod,
) -> String {
    let view = result.at_period(period);
    let mut out = String::new();

    let _ = writeln!(out, "Income: {}", describe_income(income));
    let _ = writeln!(out);
    let _ = writeln!(out, "Per {period}");
    for (label, value) in [
        ("Gross", view.gross),
        ("Federal tax", view.federal_tax),
        ("State tax", view.state_tax),
        ("Total tax", view.total_tax),
        ("Expenses", view.expenses),
        ("Take-home", view.take_home),
    ] {
        let _ = writeln!(out, "  {label:<14}{:>14}", format_money_whole(value));
    }

    let shortfall = result.shortfall();
    if shortfall < Decimal::ZERO {
        let _ = writeln!(
            out,
            "  Expenses exceed net income by {} per year",
            format_money_whole(-shortfall)
        );
    }

    if !result.expense_breakdown.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Expenses per {period}");
        for (entry, scaled) in result.expense_breakdown.iter().zip(&view.expense_breakdown) {
            let _ = writeln!(
                out,
                "  {:<20}{:>14}{:>9.2}%  {}",
                entry.name,
                format_money(scaled.annual_value),
                share_percent(entry, result.expenses_annual),
                entry.color,
            );
        }
    }

    let breakdown = &result.period_breakdown;
    let _ = writeln!(out);
    let _ = writeln!(out, "Take-home by period");
    for (label, value) in [
        ("Monthly", breakdown.monthly),
        ("Weekly", breakdown.weekly),
        ("Daily", breakdown.daily),
        ("Hourly", breakdown.hourly),
    ] {
        let _ = writeln!(out, "  {label:<14}{:>14}", format_money(value));
    }

    out
}

/// One line per node, children indented under their parent. Each figure is
/// the node's display total at its own cadence.
pub fn render_expense_tree(forest: &[ExpenseNode]) -> String {
    if forest.is_empty() {
        return "No expenses yet. Add one with `income expense add`.\n".to_string();
    }

    let mut out = String::new();
    for node in forest {
        write_node(&mut out, node, 0);
    }
    out
}

fn write_node(
    out: &mut String,
    node: &ExpenseNode,
    depth: usize,
) {
    let label = format!("{}{}", "  ".repeat(depth), node.label);
    let _ = writeln!(
        out,
        "{}  {:<28}{:>14} {:<12}{}",
        short_id(&node.id),
        label,
        format_money(display_total(node)),
        node.cadence.as_str(),
        node.color,
    );
    for child in &node.children {
        write_node(out, child, depth + 1);
    }
}

/// The jurisdiction table with `selected` marked.
pub fn render_states(
    table: &JurisdictionTable,
    selected: &str,
) -> String {
    let mut out = String::new();
    for jurisdiction in table.iter() {
        let marker = if jurisdiction.code.eq_ignore_ascii_case(selected.trim()) {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(
            out,
            "{marker} {:<6}{:<32}{:>7.2}%",
            jurisdiction.code,
            jurisdiction.name,
            jurisdiction.rate * Decimal::ONE_HUNDRED,
        );
    }
    out
}
