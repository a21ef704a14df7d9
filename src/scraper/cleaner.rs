use crate::models::{MonthTable, OhlcvBar, OhlcvFrame, RawOhlcvRow};

// ── Numeric coercion ──────────────────────────────────────────────────────────

/// Coerce raw cell text to f64, stripping thousands separators.
/// "1,234.56" → 1234.56 | "" / "N/A" / "-" → None
pub fn parse_numeric(s: &str) -> Option<f64> {
    let cleaned = s.trim().replace(',', "");
    if cleaned.is_empty() || cleaned == "N/A" || cleaned == "-" {
        return None;
    }
    cleaned.parse().ok()
}

fn raw_to_bar(row: RawOhlcvRow) -> OhlcvBar {
    OhlcvBar {
        date: row.date,
        open: parse_numeric(&row.open),
        high: parse_numeric(&row.high),
        low: parse_numeric(&row.low),
        close: parse_numeric(&row.close),
        volume: parse_numeric(&row.volume),
    }
}

// ── Merge ─────────────────────────────────────────────────────────────────────

/// Merge monthly tables into one date-sorted series.
///
/// All rows are kept; unparseable numeric text becomes `None` instead of
/// failing. Merging zero tables yields an empty frame. Rows arrive in
/// task-completion order, so the sort here is a correctness requirement.
pub fn merge_months(tables: Vec<MonthTable>) -> OhlcvFrame {
    let mut bars: Vec<OhlcvBar> = tables
        .into_iter()
        .flat_map(|t| t.rows)
        .map(raw_to_bar)
        .collect();
    bars.sort_by_key(|b| b.date);
    OhlcvFrame { bars }
}
