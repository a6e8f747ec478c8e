//! Console summary of a report

use prettytable::{format, Cell, Row, Table};
use strum::IntoEnumIterator;

use crate::core::styles::StyleRole;
use crate::report::aggregator::RiskTier;
use crate::report::assembler::Report;

fn tier_style(tier: RiskTier) -> StyleRole {
    match tier {
        RiskTier::High => StyleRole::HighRisk,
        RiskTier::Medium => StyleRole::MediumRisk,
        RiskTier::Low => StyleRole::LowRisk,
    }
}

fn styled_cell(text: &str, role: StyleRole, color: bool) -> Cell {
    let cell = Cell::new(text);
    match role.to_prettytable_spec() {
        Some(spec) if color => cell.style_spec(&spec),
        _ => cell,
    }
}

/// Risk tiers with their counts and percentages
pub fn risk_table(report: &Report, color: bool) -> Table {
    let metrics = &report.compliance_metrics;
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.set_titles(Row::new(vec![
        styled_cell("Tier", StyleRole::Header, color),
        styled_cell("Events", StyleRole::Header, color),
        styled_cell("Share", StyleRole::Header, color),
    ]));

    for tier in RiskTier::iter() {
        table.add_row(Row::new(vec![
            styled_cell(&tier.to_string(), tier_style(tier), color),
            Cell::new(&metrics.risk_distribution.count(tier).to_string()).style_spec("r"),
            Cell::new(&format!("{:.1}%", metrics.risk_percentages.percent(tier))).style_spec("r"),
        ]));
    }
    table
}

/// Render the operator summary
pub fn render_summary(report: &Report, color: bool) -> String {
    let key = |text: &str| StyleRole::Key.paint(text, color);
    let mut out = String::new();

    out.push_str(&StyleRole::Header.paint("Compliance Summary", color));
    out.push('\n');
    out.push_str(&format!("{} {}\n", key("Total Events:"), report.total_events));
    out.push_str(&format!(
        "{} {}\n",
        key("Repositories Scanned:"),
        report.repositories_scanned
    ));
    out.push_str(&format!(
        "{} {:.2}\n",
        key("Average Compliance Score:"),
        report.summary.average_compliance_score
    ));

    out.push('\n');
    out.push_str(&risk_table(report, color).to_string());

    out.push('\n');
    out.push_str(&StyleRole::Header.paint("Recommendations", color));
    out.push('\n');
    for recommendation in &report.compliance_metrics.recommendations {
        out.push_str(&format!("{} {}\n", StyleRole::Dim.paint("-", color), recommendation));
    }
    out
}

pub fn print_summary(report: &Report, color: bool) {
    print!("{}", render_summary(report, color));
}
