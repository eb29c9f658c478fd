//! Display payloads for a prediction.

use crate::form::PredictionOutcome;
use chrono::NaiveDate;

/// Currency label shown before every amount.
pub const CURRENCY_LABEL: &str = "RM";

/// Format an amount as `RM 1,234,567.89`.
///
/// An amount exactly halfway between two cents rounds to the even cent;
/// a negative amount keeps its sign even when it rounds to zero.
pub fn format_currency(value: f64) -> String {
    let cents = round_half_even(value.abs() * 100.0);
    let whole = (cents / 100.0).trunc() as u64;
    let frac = (cents % 100.0) as u64;
    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{} {}{}.{:02}", CURRENCY_LABEL, sign, group_thousands(whole), frac)
}

fn round_half_even(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor == 0.5 {
        if floor % 2.0 == 0.0 {
            floor
        } else {
            floor + 1.0
        }
    } else {
        x.round()
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// The one or two result lines.
pub fn render_outcome(outcome: &PredictionOutcome) -> Vec<String> {
    let mut lines = vec![format!("Predicted Price: {}", format_currency(outcome.price))];
    if let Some(adj) = &outcome.adjustment {
        lines.push(format!(
            "Inflation-Adjusted Price: {}",
            format_currency(adj.adjusted_price)
        ));
    }
    lines
}

/// Static note about the age of the training data.
pub fn dataset_note(reference_date: NaiveDate) -> String {
    format!(
        "Note: The dataset used to train this model was last updated on {}.",
        reference_date.format("%B %-d, %Y")
    )
}
