//! Counter store for report aggregation.
//!
//! Keys are opaque strings discovered while classifying records (`"html"`,
//! `"status_404"`, a raw content type, ...). An absent key counts as zero.

use std::collections::BTreeMap;
use std::io::{self, Write};

/// Width the formatted count is right-aligned to in [`Stats::dump`].
const COUNT_WIDTH: usize = 15;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    counts: BTreeMap<String, u64>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, amount: u64) {
        let count = self.counts.entry(key.into()).or_default();
        *count = count.saturating_add(amount);
    }

    pub fn incr(&mut self, key: impl Into<String>) {
        self.add(key, 1);
    }

    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(key, count)| (key.as_str(), *count))
    }

    /// Writes one `<count> <key>` line per counter, ordered by key.
    pub fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (key, count) in self.iter() {
            writeln!(
                out,
                "{:>width$} {}",
                group_thousands(count),
                key,
                width = COUNT_WIDTH
            )?;
        }
        Ok(())
    }
}

/// Formats `n` with `,` between groups of three digits.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dumped(stats: &Stats) -> String {
        let mut out = Vec::new();
        stats.dump(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn absent_key_is_zero() {
        let stats = Stats::new();
        assert_eq!(stats.get("html"), 0);
        assert!(stats.is_empty());
    }

    #[test]
    fn increments_accumulate() {
        let mut stats = Stats::new();
        stats.add("html_bytes", 1500);
        stats.add("html_bytes", 250);
        stats.incr("html");
        assert_eq!(stats.get("html_bytes"), 1750);
        assert_eq!(stats.get("html"), 1);
    }

    #[test]
    fn add_saturates_instead_of_overflowing() {
        let mut stats = Stats::new();
        stats.add("big", u64::MAX);
        stats.add("big", 10);
        assert_eq!(stats.get("big"), u64::MAX);
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(123456), "123,456");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn dump_sorts_keys_and_aligns_counts() {
        let mut stats = Stats::new();
        stats.incr("status_404");
        stats.add("html_bytes", 1234567);
        stats.incr("fail");
        stats.incr("image/png");

        assert_eq!(
            dumped(&stats),
            concat!(
                "              1 fail\n",
                "      1,234,567 html_bytes\n",
                "              1 image/png\n",
                "              1 status_404\n",
            )
        );
    }

    #[test]
    fn dump_uses_byte_order_not_case_folding() {
        let mut stats = Stats::new();
        stats.incr("redirect");
        stats.incr("Zebra");
        stats.incr("-");

        let keys: Vec<_> = stats.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["-", "Zebra", "redirect"]);
    }

    #[test]
    fn dump_of_empty_store_writes_nothing() {
        assert_eq!(dumped(&Stats::new()), "");
    }
}
