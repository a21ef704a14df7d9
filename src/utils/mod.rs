use std::time::Instant;

use tracing::info;

/// Wall-clock timer that logs its elapsed time when dropped.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    pub fn start(label: &'static str) -> Self {
        Self { label, start: Instant::now() }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!("{} took {:.2?}", self.label, self.start.elapsed());
    }
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Format a count with thousands separators for CLI output.
pub fn fmt_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
