//! Server-side HTML rendering for the dashboard page.

use crate::dashboard::query::criteria_query_string;
use crate::screener::{RenderCycle, SliderSpec, SliderSpecs, WatchlistAdd};
use crate::types::{Chain, TokenRecord};
use std::fmt::Write;

pub const TABLE_HEADERS: [&str; 9] = [
    "Token",
    "Chain",
    "Liquidity",
    "Holders",
    "24h Volume",
    "Buzz",
    "Safety",
    "Momentum",
    "Total Score",
];

const PAGE_STYLE: &str = r#"<style>
body { font-family: system-ui, sans-serif; margin: 0; background: #0e1117; color: #fafafa; }
main { display: grid; grid-template-columns: 300px 1fr; min-height: 100vh; }
aside { background: #262730; padding: 1.5rem; }
section { padding: 1.5rem 2rem; }
label { display: block; margin-top: 1rem; font-size: 0.9rem; }
input[type=range], select { width: 100%; }
table { border-collapse: collapse; width: 100%; margin-bottom: 2rem; }
th, td { padding: 0.4rem 0.8rem; border-bottom: 1px solid #333; text-align: right; }
th:first-child, td:first-child, th:nth-child(2), td:nth-child(2) { text-align: left; }
button { margin-top: 1rem; padding: 0.4rem 1rem; }
.notice { padding: 0.5rem 1rem; background: #1f3a5f; border-radius: 4px; }
.muted { color: #888; font-size: 0.8rem; }
</style>"#;

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Whole-dollar amount with thousands separators, e.g. `$120,000`.
pub fn format_currency(amount: f64) -> String {
    let whole = amount.round() as u64;
    format!("${}", group_thousands(whole))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn render_slider(out: &mut String, name: &str, label: &str, spec: &SliderSpec, value: f64) {
    let _ = write!(
        out,
        r#"<label for="{name}">{label}: <output id="{name}-out">{value}</output></label>
<input type="range" id="{name}" name="{name}" min="{min}" max="{max}" step="{step}" value="{value}"
  oninput="document.getElementById('{name}-out').value = this.value">"#,
        name = name,
        label = label,
        min = spec.min,
        max = spec.max,
        step = spec.step,
        value = value,
    );
}

fn render_table(out: &mut String, records: &[TokenRecord], empty_message: &str) {
    if records.is_empty() {
        let _ = write!(out, r#"<p class="muted">{}</p>"#, empty_message);
        return;
    }

    out.push_str("<table><thead><tr>");
    for header in TABLE_HEADERS {
        let _ = write!(out, "<th>{}</th>", header);
    }
    out.push_str("</tr></thead><tbody>");

    for record in records {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr>",
            escape_html(record.token()),
            record.chain(),
            format_currency(record.liquidity()),
            group_thousands(record.holders() as u64),
            format_currency(record.volume_24h()),
            record.buzz_score(),
            record.safety_score(),
            record.momentum_score(),
            record.total_score(),
        );
    }
    out.push_str("</tbody></table>");
}

fn notice_text(outcome: WatchlistAdd, token: &str) -> String {
    let token = escape_html(token);
    match outcome {
        WatchlistAdd::Added => format!("{} added to watchlist.", token),
        WatchlistAdd::AlreadyPresent => format!("{} is already on your watchlist.", token),
        WatchlistAdd::UnknownToken => format!("{} is not in the current dataset.", token),
    }
}

/// Everything the page needs besides the render cycle itself.
pub struct PageContext<'a> {
    pub sliders: &'a SliderSpecs,
    pub watchlist: &'a [TokenRecord],
    /// Outcome of the add that redirected here, if any
    pub notice: Option<(WatchlistAdd, &'a str)>,
}

/// Render the full dashboard page.
pub fn render_dashboard_html(cycle: &RenderCycle, page: &PageContext<'_>) -> String {
    let criteria = &cycle.criteria;
    let mut out = String::with_capacity(16 * 1024);

    out.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    out.push_str("<title>Token Screener</title>");
    out.push_str(PAGE_STYLE);
    out.push_str("</head><body><main><aside><h2>Filters</h2>");

    out.push_str(r#"<form method="get" action="/">"#);
    render_slider(&mut out, "min_liquidity", "Minimum Liquidity ($)", &page.sliders.min_liquidity, criteria.min_liquidity);
    render_slider(&mut out, "min_volume", "Minimum 24h Volume ($)", &page.sliders.min_volume, criteria.min_volume);
    render_slider(&mut out, "min_score", "Minimum Total Score", &page.sliders.min_score, criteria.min_score);

    out.push_str(r#"<label for="chains">Chains</label><select id="chains" name="chains" multiple size="3">"#);
    for chain in Chain::all() {
        let selected = if criteria.chains.contains(&chain) { " selected" } else { "" };
        let _ = write!(out, r#"<option value="{0}"{1}>{0}</option>"#, chain.as_str(), selected);
    }
    out.push_str("</select>");
    out.push_str(r#"<input type="hidden" name="applied" value="1"><button type="submit">Apply</button></form>"#);
    out.push_str("</aside><section><h1>Token Screener</h1>");

    if let Some((outcome, token)) = page.notice {
        let _ = write!(out, r#"<p class="notice">{}</p>"#, notice_text(outcome, token));
    }

    let _ = write!(out, "<h2>Filtered Tokens ({})</h2>", cycle.filtered.len());
    render_table(&mut out, &cycle.filtered, "No tokens match the current filters.");

    out.push_str("<h2>Add to Watchlist</h2>");
    let _ = write!(
        out,
        r#"<form method="post" action="/watchlist?{}"><select name="token">"#,
        escape_html(&criteria_query_string(criteria))
    );
    for name in cycle.token_names() {
        let name = escape_html(name);
        let _ = write!(out, r#"<option value="{0}">{0}</option>"#, name);
    }
    out.push_str(r#"</select><button type="submit">Add to Watchlist</button></form>"#);

    out.push_str("<h2>Your Watchlist</h2>");
    render_table(&mut out, page.watchlist, "Your watchlist is empty.");

    let _ = write!(
        out,
        r#"<p class="muted">Synthetic data, seed {}. Values are regenerated on every interaction.</p>"#,
        cycle.seed
    );
    out.push_str("</section></main></body></html>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screener::{FilterCriteria, RenderPipeline};

    fn cycle() -> RenderCycle {
        RenderPipeline::default().run_with_seed(FilterCriteria::default(), 5)
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(120_000.0), "$120,000");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_page_lists_every_token_in_select() {
        let cycle = cycle();
        let sliders = SliderSpecs::default();
        let html = render_dashboard_html(
            &cycle,
            &PageContext { sliders: &sliders, watchlist: &[], notice: None },
        );

        for name in cycle.token_names() {
            assert!(html.contains(&format!("<option value=\"{0}\">{0}</option>", name)));
        }
        assert!(html.contains("Your watchlist is empty."));
        assert!(html.contains(&format!("seed {}", cycle.seed)));
    }

    #[test]
    fn test_page_shows_slider_defaults() {
        let cycle = cycle();
        let sliders = SliderSpecs::default();
        let html = render_dashboard_html(
            &cycle,
            &PageContext { sliders: &sliders, watchlist: &[], notice: None },
        );

        assert!(html.contains(r#"name="min_liquidity" min="0" max="150000" step="10000" value="50000""#));
        assert!(html.contains(r#"name="min_volume" min="0" max="400000" step="25000" value="100000""#));
        assert!(html.contains(r#"name="min_score" min="0" max="10" step="0.1" value="7.5""#));
        assert!(html.contains(r#"<option value="Solana" selected>"#));
    }

    #[test]
    fn test_page_renders_watchlist_and_notice() {
        let cycle = cycle();
        let sliders = SliderSpecs::default();
        let watchlist: Vec<_> = cycle.dataset.iter().take(1).cloned().collect();
        let html = render_dashboard_html(
            &cycle,
            &PageContext {
                sliders: &sliders,
                watchlist: &watchlist,
                notice: Some((WatchlistAdd::Added, watchlist[0].token())),
            },
        );

        assert!(html.contains(&format!("{} added to watchlist.", watchlist[0].token())));
        assert!(!html.contains("Your watchlist is empty."));
    }
}
