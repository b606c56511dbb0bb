//! Console rendering of runs, history views and the vocabulary.
//!
//! Every function returns a `String` so output can be asserted on; `main`
//! only prints.

use crate::collect::{PostingHit, RunReport};
use crate::history::History;
use crate::tally::DailyCounts;
use crate::vocab::{Vocabulary, VocabularyIndex};

const MISSING: &str = "—";

/// Two-line block for one posting: company and title, then its labels.
pub fn posting_block(hit: &PostingHit) -> String {
    let company = hit.company.as_deref().unwrap_or(MISSING);
    let title = if hit.title.is_empty() {
        MISSING
    } else {
        hit.title.as_str()
    };
    format!("- {company} — {title}\n  Tech: {}\n", hit.labels.join(", "))
}

/// Per-posting blocks for postings with at least one label, then a summary
/// and the frequency table.
pub fn run_report(report: &RunReport) -> String {
    let mut out = String::new();
    let with_hits: Vec<&PostingHit> = report
        .matched
        .iter()
        .filter(|h| !h.labels.is_empty())
        .collect();

    for hit in &with_hits {
        out.push_str(&posting_block(hit));
        out.push('\n');
    }

    out.push_str("Summary:\n");
    out.push_str(&format!("Total slugs: {}\n", report.total_slugs));
    out.push_str(&format!("IT postings processed: {}\n", report.it_postings()));
    out.push_str(&format!(
        "IT postings with at least one tech hit: {}\n",
        with_hits.len()
    ));
    if !report.skipped.is_empty() {
        out.push_str(&format!("Skipped: {}\n", report.skipped.len()));
        for skipped in &report.skipped {
            out.push_str(&format!("  {}: {}\n", skipped.slug, skipped.reason));
        }
    }

    out.push('\n');
    out.push_str(&frequency_table(&report.counts, None));
    out
}

/// Labels by descending count, left-aligned to the widest label.
pub fn frequency_table(counts: &DailyCounts, top: Option<usize>) -> String {
    let mut ranked = counts.most_common();
    if ranked.is_empty() {
        return "No technology terms found.\n".to_string();
    }
    if let Some(n) = top {
        ranked.truncate(n);
    }

    let mut out = String::from("Most common technologies:\n");
    aligned_rows(&mut out, ranked);
    out
}

/// Summary of a (possibly windowed) history.
///
/// Shows the covered date range, the latest day's top labels, totals over
/// the range and, when a vocabulary is given, latest-day category totals.
pub fn history_view(history: &History, top: usize, vocab: Option<&Vocabulary>) -> String {
    let (Some(first), Some(last)) = (history.dates().first(), history.latest_date()) else {
        return "No recorded dates in range.\n".to_string();
    };

    let mut out = String::new();
    out.push_str(&format!(
        "{} recorded date(s): {first} to {last}, {} label(s)\n",
        history.len(),
        history.labels().count()
    ));

    let latest = history.latest_counts();
    out.push_str(&format!("\nTop {top} on {last}:\n"));
    aligned_rows(&mut out, latest.top(top));

    let totals = history.totals();
    out.push_str(&format!("\nTop {top} over range:\n"));
    aligned_rows(&mut out, totals.top(top));

    if let Some(vocab) = vocab {
        out.push_str(&format!("\nCategories on {last}:\n"));
        aligned_rows(&mut out, history.category_totals(vocab));
    }
    out
}

/// Matchers in evaluation order.
pub fn vocabulary_listing(index: &VocabularyIndex) -> String {
    let width = index
        .matchers()
        .iter()
        .map(|m| m.variant().chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for m in index.matchers() {
        out.push_str(&format!(
            "{:<width$}  {:<11}  {}\n",
            m.variant(),
            m.policy().to_string(),
            m.label()
        ));
    }
    out.push_str(&format!("{} matcher(s)\n", index.len()));
    out
}

fn aligned_rows<'a>(out: &mut String, rows: impl IntoIterator<Item = (&'a str, u64)>) {
    let rows: Vec<(&str, u64)> = rows.into_iter().collect();
    if rows.is_empty() {
        out.push_str("  (none)\n");
        return;
    }
    let width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    for (label, n) in rows {
        out.push_str(&format!("{label:<width$}  {n}\n"));
    }
}
