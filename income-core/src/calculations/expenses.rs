//! Aggregation of the expense forest.
//!
//! A node's annual value is its own annualized amount plus the annual
//! values of all its children, recursively. Container nodes (amount 0)
//! therefore carry exactly their subtree total. Only root nodes appear in
//! the flattened breakdown.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::cadence::{from_annual, to_annual_default};
use super::common::{checked_div_or_zero, round_half_up};
use crate::models::{Cadence, ExpenseBreakdownEntry, ExpenseNode};

/// Lower bound for the scale used by [`default_color`], so the first few
/// small expenses do not all come out red.
const MIN_COLOR_SCALE: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Annual value of `node` including every descendant.
pub fn annual_value(node: &ExpenseNode) -> Decimal {
    node.children
        .iter()
        .map(annual_value)
        .fold(to_annual_default(node.amount, node.cadence), Decimal::saturating_add)
}

/// One entry per root with a positive annual value, in root order.
pub fn flatten(forest: &[ExpenseNode]) -> Vec<ExpenseBreakdownEntry> {
    forest
        .iter()
        .map(|node| ExpenseBreakdownEntry {
            name: node.label.clone(),
            annual_value: annual_value(node),
            color: node.color.clone(),
        })
        .filter(|entry| entry.annual_value > Decimal::ZERO)
        .collect()
}

/// The figure shown next to a node in its own cadence.
///
/// `node.amount` plus each direct child's own annualized amount restated
/// at the node's cadence. Presentation only; never feeds [`annual_value`].
pub fn display_total(node: &ExpenseNode) -> Decimal {
    row_total(
        node.amount,
        node.cadence,
        node.children.iter().map(|child| (child.amount, child.cadence)),
    )
}

/// [`display_total`] from a row's own amount and cadence and the
/// `(amount, cadence)` of its direct children.
pub fn row_total(
    amount: Decimal,
    cadence: Cadence,
    children: impl IntoIterator<Item = (Decimal, Cadence)>,
) -> Decimal {
    children
        .into_iter()
        .map(|(child_amount, child_cadence)| {
            from_annual(to_annual_default(child_amount, child_cadence), cadence)
        })
        .fold(amount, Decimal::saturating_add)
}

/// Impact color for an amount relative to the largest one: red at the
/// maximum, blue at zero, as `hsl(H, 75%, 50%)`.
pub fn spectral_color(
    amount: Decimal,
    max_amount: Decimal,
) -> String {
    let scale = if max_amount.is_zero() {
        Decimal::ONE
    } else {
        max_amount
    };
    let ratio = checked_div_or_zero(amount, scale).min(Decimal::ONE);
    let hue = round_half_up(Decimal::from(240) * (Decimal::ONE - ratio)).normalize();
    format!("hsl({hue}, 75%, 50%)")
}

/// Color for a new node with `amount`, scaled against the largest root
/// display total in `forest` (at least 100).
pub fn default_color(
    amount: Decimal,
    forest: &[ExpenseNode],
) -> String {
    impact_color(amount, forest.iter().map(display_total))
}

/// [`default_color`] given the root display totals directly.
pub fn impact_color(
    amount: Decimal,
    root_totals: impl IntoIterator<Item = Decimal>,
) -> String {
    let max_total = root_totals.into_iter().fold(MIN_COLOR_SCALE, Decimal::max);
    spectral_color(amount, max_total)
}

/// Share of `entry` in `total`, as a percentage with two decimals.
pub fn share_percent(
    entry: &ExpenseBreakdownEntry,
    total: Decimal,
) -> f64 {
    round_half_up(checked_div_or_zero(entry.annual_value, total) * Decimal::ONE_HUNDRED)
        .to_f64()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::Cadence;

    fn leaf(
        id: &str,
        amount: Decimal,
        cadence: Cadence,
    ) -> ExpenseNode {
        ExpenseNode::new(id, id.to_uppercase(), amount, cadence)
    }

    /// Root A (container) → B (1200 yearly) → C (100 monthly).
    fn three_level_tree() -> ExpenseNode {
        leaf("a", Decimal::ZERO, Cadence::Monthly).with_children(vec![
            leaf("b", dec!(1200), Cadence::Yearly)
                .with_children(vec![leaf("c", dec!(100), Cadence::Monthly)]),
        ])
    }

    // =========================================================================
    // annual_value tests
    // =========================================================================

    #[test]
    fn annual_value_of_leaf_is_its_annualized_amount() {
        assert_eq!(annual_value(&leaf("x", dec!(50), Cadence::Weekly)), dec!(2600));
    }

    #[test]
    fn annual_value_sums_whole_subtree() {
        assert_eq!(annual_value(&three_level_tree()), dec!(2400));
    }

    #[test]
    fn annual_value_adds_own_amount_and_children() {
        let node = leaf("p", dec!(100), Cadence::Monthly)
            .with_children(vec![leaf("k", dec!(50), Cadence::Monthly)]);

        assert_eq!(annual_value(&node), dec!(1800));
    }

    #[test]
    fn empty_container_is_worth_nothing() {
        assert_eq!(annual_value(&leaf("x", Decimal::ZERO, Cadence::Monthly)), Decimal::ZERO);
    }

    // =========================================================================
    // flatten tests
    // =========================================================================

    #[test]
    fn flatten_emits_one_entry_per_root() {
        let entries = flatten(&[three_level_tree().with_color("#00ff00")]);

        assert_eq!(
            entries,
            vec![ExpenseBreakdownEntry {
                name: "A".to_string(),
                annual_value: dec!(2400),
                color: "#00ff00".to_string(),
            }]
        );
    }

    #[test]
    fn flatten_drops_zero_value_roots() {
        let forest = vec![
            leaf("empty", Decimal::ZERO, Cadence::Monthly),
            leaf("gym", dec!(40), Cadence::Monthly),
            leaf("odd", dec!(10), Cadence::Unrecognized),
        ];

        let names: Vec<_> = flatten(&forest).into_iter().map(|e| e.name).collect();

        assert_eq!(names, vec!["GYM".to_string()]);
    }

    #[test]
    fn flatten_keeps_root_order() {
        let forest = vec![
            leaf("z", dec!(1), Cadence::Yearly),
            leaf("a", dec!(1000), Cadence::Yearly),
        ];

        let names: Vec<_> = flatten(&forest).into_iter().map(|e| e.name).collect();

        assert_eq!(names, vec!["Z".to_string(), "A".to_string()]);
    }

    // =========================================================================
    // display_total tests
    // =========================================================================

    #[test]
    fn display_total_restates_children_at_parent_cadence() {
        let node = leaf("p", Decimal::ZERO, Cadence::Monthly).with_children(vec![
            leaf("k1", dec!(1200), Cadence::Yearly),
            leaf("k2", dec!(150), Cadence::BiWeekly),
        ]);

        // 1200/12 + 3900/12
        assert_eq!(display_total(&node), dec!(425));
    }

    #[test]
    fn display_total_keeps_own_amount_unconverted() {
        let node = leaf("p", dec!(75), Cadence::Weekly)
            .with_children(vec![leaf("k", dec!(5200), Cadence::Yearly)]);

        assert_eq!(display_total(&node), dec!(175));
    }

    #[test]
    fn display_total_does_not_feed_annual_value() {
        let tree = three_level_tree();

        let _ = display_total(&tree);

        assert_eq!(annual_value(&tree), dec!(2400));
    }

    // =========================================================================
    // color tests
    // =========================================================================

    #[test]
    fn spectral_color_spans_blue_to_red() {
        assert_eq!(spectral_color(Decimal::ZERO, dec!(100)), "hsl(240, 75%, 50%)");
        assert_eq!(spectral_color(dec!(100), dec!(100)), "hsl(0, 75%, 50%)");
        assert_eq!(spectral_color(dec!(50), dec!(100)), "hsl(120, 75%, 50%)");
    }

    #[test]
    fn spectral_color_clamps_above_max() {
        assert_eq!(spectral_color(dec!(500), dec!(100)), "hsl(0, 75%, 50%)");
    }

    #[test]
    fn spectral_color_treats_zero_max_as_one() {
        assert_eq!(spectral_color(dec!(0.5), Decimal::ZERO), "hsl(120, 75%, 50%)");
    }

    #[test]
    fn default_color_scales_against_at_least_one_hundred() {
        assert_eq!(default_color(dec!(25), &[]), "hsl(180, 75%, 50%)");
    }

    #[test]
    fn default_color_scales_against_largest_root() {
        let forest = vec![leaf("rent", dec!(1000), Cadence::Monthly)];

        assert_eq!(default_color(dec!(250), &forest), "hsl(180, 75%, 50%)");
    }

    #[test]
    fn impact_color_matches_default_color() {
        let forest = vec![leaf("rent", dec!(1000), Cadence::Monthly)];

        assert_eq!(
            impact_color(dec!(250), [dec!(1000)]),
            default_color(dec!(250), &forest)
        );
    }

    #[test]
    fn row_total_matches_display_total() {
        let node = leaf("p", dec!(75), Cadence::Weekly)
            .with_children(vec![leaf("k", dec!(5200), Cadence::Yearly)]);

        assert_eq!(
            row_total(dec!(75), Cadence::Weekly, [(dec!(5200), Cadence::Yearly)]),
            display_total(&node)
        );
    }

    #[test]
    fn share_percent_handles_empty_total() {
        let entry = ExpenseBreakdownEntry {
            name: "X".to_string(),
            annual_value: dec!(10),
            color: String::new(),
        };

        assert_eq!(share_percent(&entry, Decimal::ZERO), 0.0);
        assert_eq!(share_percent(&entry, dec!(40)), 25.0);
    }
}
