//! # License Detection Module
//!
//! This module decides whether a file already carries the expected license
//! header. The notice line is parsed to find the author and declared years,
//! then the header candidate is compared line by line against the rendered
//! template with an approximate similarity score.
//!
//! The scoring algorithm sits behind the [`LineScorer`] trait so it can be
//! replaced without touching the classification rules.

use std::sync::LazyLock;

use regex::Regex;
use similar::TextDiff;
use tracing::trace;

use crate::processor::FileHeaderSnapshot;
use crate::templates::{CommentStyle, YearExpr, render};

/// Scores the similarity of two lines on a 0-100 scale.
pub trait LineScorer: Send + Sync {
  /// Returns `100.0` for identical lines and lower values the more the lines
  /// differ.
  fn score(&self, left: &str, right: &str) -> f32;
}

/// Character-level similarity ratio, `2 * matches / total_length * 100`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CharRatioScorer;

impl LineScorer for CharRatioScorer {
  fn score(&self, left: &str, right: &str) -> f32 {
    if left == right {
      return 100.0;
    }
    TextDiff::from_chars(left, right).ratio() * 100.0
  }
}

/// Similarity limits used to classify a header candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchThresholds {
  /// Score every line must reach for the header to be considered current.
  pub exact: f32,
  /// Score every line must exceed, once rounded to a whole number, for the
  /// header to be considered an outdated version of the expected one.
  pub near: f32,
}

impl Default for MatchThresholds {
  fn default() -> Self {
    Self {
      exact: 100.0,
      near: 92.0,
    }
  }
}

/// A `Copyright <years> <author>` notice found on the first header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  /// The first year of the notice.
  pub start_year: i32,
  /// The closing year, if the notice declared one.
  pub end_year: Option<i32>,
  /// Whether the notice ended with `present`.
  pub present: bool,
  /// The year text exactly as written in the file.
  pub years: String,
  /// The author text, without the style's closing marker.
  pub author: String,
}

static NOTICE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"Copyright (?P<years>(?P<start>[0-9]{4})(?:\s*-\s*(?P<end>[0-9]{4}|present)?)?) (?P<author>.+)")
    .expect("notice regex must compile")
});

/// Parses the copyright notice out of a header's first line.
///
/// Accepted year forms are `2020`, `2020-`, `2020-2025`, `2020 - 2025` and
/// `2020 - present`.
pub fn parse_notice(line: &str, style: &CommentStyle) -> Option<Notice> {
  let caps = NOTICE_REGEX.captures(line)?;
  let start_year = caps["start"].parse().ok()?;
  let end = caps.name("end").map(|m| m.as_str());
  let present = end == Some("present");
  let end_year = end.filter(|_| !present).and_then(|year| year.parse().ok());

  let mut author = caps["author"].trim_end();
  let close = style.close.trim();
  if !close.is_empty()
    && let Some(stripped) = author.strip_suffix(close)
  {
    author = stripped.trim_end();
  }

  Some(Notice {
    start_year,
    end_year,
    present,
    years: caps["years"].to_string(),
    author: author.to_string(),
  })
}

/// Outcome of validating a file's header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
  /// Whether the file carries this author's license header.
  pub has_notice: bool,
  /// Whether the file must be rewritten.
  pub must_update: bool,
  /// Start year for the header the file should carry.
  pub start_year: i32,
  /// Whether the header the file should carry ends with `present`.
  pub end_year_present: bool,
}

/// Classification of a file's header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStatus {
  /// The expected header is in place.
  Current,
  /// The author's header is there but out of date.
  Stale,
  /// No usable header; a new one has to be inserted.
  Missing,
}

impl ValidationResult {
  /// The year expression the file's header should carry in `current_year`.
  pub const fn year_expr(&self, current_year: i32) -> YearExpr {
    YearExpr::resolve(self.start_year, current_year, self.end_year_present)
  }

  pub const fn status(&self) -> HeaderStatus {
    match (self.has_notice, self.must_update) {
      (true, false) => HeaderStatus::Current,
      (true, true) => HeaderStatus::Stale,
      (false, _) => HeaderStatus::Missing,
    }
  }
}

/// Validates header snapshots against the expected license header.
pub struct HeaderValidator {
  author: String,
  current_year: i32,
  last_year_present: bool,
  thresholds: MatchThresholds,
  scorer: Box<dyn LineScorer>,
}

impl HeaderValidator {
  /// Creates a validator using [`CharRatioScorer`] and default thresholds.
  ///
  /// `last_year_present` decides whether headers without an open `present`
  /// range should end in `present` or in `current_year`.
  pub fn new(author: impl Into<String>, current_year: i32, last_year_present: bool) -> Self {
    Self {
      author: author.into(),
      current_year,
      last_year_present,
      thresholds: MatchThresholds::default(),
      scorer: Box::new(CharRatioScorer),
    }
  }

  /// Replaces the similarity thresholds.
  #[must_use]
  pub const fn with_thresholds(mut self, thresholds: MatchThresholds) -> Self {
    self.thresholds = thresholds;
    self
  }

  /// Replaces the line scorer.
  #[must_use]
  pub fn with_scorer(mut self, scorer: Box<dyn LineScorer>) -> Self {
    self.scorer = scorer;
    self
  }

  pub fn author(&self) -> &str {
    &self.author
  }

  /// Classifies a header snapshot.
  ///
  /// A notice by another author is reported as missing so a new header gets
  /// inserted above it. A notice by this author is compared against the
  /// template rendered with the years it declares; if every line scores
  /// above the near threshold the header is recognized, and it is current
  /// only when it matches the template for the resolved year expression
  /// exactly.
  pub fn validate(&self, snapshot: &FileHeaderSnapshot, style: &CommentStyle) -> ValidationResult {
    let missing = ValidationResult {
      has_notice: false,
      must_update: true,
      start_year: self.current_year,
      end_year_present: self.last_year_present,
    };

    let Some(notice) = parse_notice(&snapshot.first_line, style) else {
      trace!("No copyright notice on the first header line");
      return missing;
    };

    if notice.author != self.author {
      trace!("Found a notice by a different author: {}", notice.author);
      return missing;
    }

    // Near matches are judged on whole-number scores; the exact check is not.
    let declared = render(&self.author, &notice.years, style);
    if !self.all_scores(snapshot, &declared, |score| score.round() > self.thresholds.near) {
      trace!("Header by {} differs too much from the template", notice.author);
      return missing;
    }

    let end_year_present = notice.present || self.last_year_present;
    let expected_years = YearExpr::resolve(notice.start_year, self.current_year, end_year_present);
    let expected = render(&self.author, &expected_years.to_string(), style);
    let current = self.all_scores(snapshot, &expected, |score| score >= self.thresholds.exact);

    ValidationResult {
      has_notice: true,
      must_update: !current,
      start_year: notice.start_year,
      end_year_present,
    }
  }

  /// Pairs header lines with template lines (padding the shorter side with
  /// empty lines) and checks every score against `accept`.
  fn all_scores(&self, snapshot: &FileHeaderSnapshot, template: &[String], accept: impl Fn(f32) -> bool) -> bool {
    let header: Vec<&str> = snapshot.header().map(str::trim_end).collect();
    let len = header.len().max(template.len());

    (0..len).all(|i| {
      let found = header.get(i).copied().unwrap_or("");
      let wanted = template.get(i).map(String::as_str).unwrap_or("");
      accept(self.scorer.score(found, wanted))
    })
  }
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;

  use super::*;
  use crate::processor::read_header;
  use crate::templates::{LICENSE_LENGTH, StyleRegistry, to_text};

  const AUTHOR: &str = "Jane Doe";
  const YEAR: i32 = 2025;

  fn snapshot(content: &str, style: &CommentStyle) -> FileHeaderSnapshot {
    read_header(Cursor::new(content), style, LICENSE_LENGTH).expect("reading from memory")
  }

  fn hash() -> CommentStyle {
    CommentStyle::new("#   ", "#   ", "")
  }

  fn validate(content: &str, last_year_present: bool) -> ValidationResult {
    let style = hash();
    HeaderValidator::new(AUTHOR, YEAR, last_year_present).validate(&snapshot(content, &style), &style)
  }

  fn with_header(years: &str, body: &str) -> String {
    format!("{}\n{}", to_text(&render(AUTHOR, years, &hash()), "\n"), body)
  }

  #[test]
  fn test_parse_notice_forms() {
    let style = hash();

    let notice = parse_notice("#   Copyright 2020 Jane Doe", &style).expect("single year");
    assert_eq!((notice.start_year, notice.end_year, notice.present), (2020, None, false));
    assert_eq!(notice.author, "Jane Doe");

    let notice = parse_notice("# Copyright 2020-2022 Jane Doe", &style).expect("compact range");
    assert_eq!((notice.start_year, notice.end_year), (2020, Some(2022)));

    let notice = parse_notice("# Copyright 2020 - 2022 Jane Doe", &style).expect("spaced range");
    assert_eq!(notice.end_year, Some(2022));
    assert_eq!(notice.years, "2020 - 2022");

    let notice = parse_notice("# Copyright 2020- Jane Doe", &style).expect("open dash");
    assert_eq!((notice.start_year, notice.end_year), (2020, None));
    assert_eq!(notice.author, "Jane Doe");

    let notice = parse_notice("# Copyright 2020 - present Jane Doe", &style).expect("present");
    assert!(notice.present);
    assert_eq!(notice.end_year, None);
  }

  #[test]
  fn test_parse_notice_strips_close_marker() {
    let style = CommentStyle::new("/* ", " * ", " */");
    let notice = parse_notice("/* Copyright 2020 Jane Doe */", &style).expect("notice");
    assert_eq!(notice.author, "Jane Doe");
  }

  #[test]
  fn test_parse_notice_rejects_other_lines() {
    let style = hash();
    assert!(parse_notice("import os", &style).is_none());
    assert!(parse_notice("# Copyright Jane Doe", &style).is_none());
    assert!(parse_notice("# Copyright 20 Jane Doe", &style).is_none());
  }

  #[test]
  fn test_rendered_header_is_current_for_every_style() {
    let registry = StyleRegistry::builtin();
    for ext in registry.extensions() {
      let style = registry.style_for(ext).expect("listed extensions are mapped");
      let content = format!("{}\nbody\n", to_text(&render(AUTHOR, "2025", style), "\n"));

      let result = HeaderValidator::new(AUTHOR, YEAR, false).validate(&snapshot(&content, style), style);
      assert_eq!(result.status(), HeaderStatus::Current, "extension {ext}");
    }
  }

  #[test]
  fn test_no_header() {
    let result = validate("import os\n", true);

    assert_eq!(
      result,
      ValidationResult {
        has_notice: false,
        must_update: true,
        start_year: YEAR,
        end_year_present: true,
      }
    );
  }

  #[test]
  fn test_foreign_author_is_missing() {
    let content = to_text(&render("Someone Else", "2020", &hash()), "\n");
    let result = validate(&content, false);

    assert_eq!(result.status(), HeaderStatus::Missing);
    assert_eq!(result.start_year, YEAR);
  }

  #[test]
  fn test_old_single_year_is_stale() {
    let result = validate(&with_header("2020", "x = 1\n"), false);

    assert_eq!(result.status(), HeaderStatus::Stale);
    assert_eq!(result.start_year, 2020);
    assert_eq!(result.year_expr(YEAR).to_string(), "2020 - 2025");
  }

  #[test]
  fn test_closed_range_updates_to_current_year() {
    let result = validate(&with_header("2020 - 2022", ""), false);

    assert_eq!(result.status(), HeaderStatus::Stale);
    assert_eq!(result.year_expr(YEAR).to_string(), "2020 - 2025");
  }

  #[test]
  fn test_closed_range_updates_to_present() {
    let result = validate(&with_header("2020 - 2022", ""), true);

    assert_eq!(result.status(), HeaderStatus::Stale);
    assert_eq!(result.year_expr(YEAR).to_string(), "2020 - present");
  }

  #[test]
  fn test_current_range_is_current() {
    assert_eq!(validate(&with_header("2020 - 2025", ""), false).status(), HeaderStatus::Current);
    assert_eq!(validate(&with_header("2025", ""), false).status(), HeaderStatus::Current);
  }

  #[test]
  fn test_present_marker_is_kept() {
    let result = validate(&with_header("2020 - present", ""), false);

    assert_eq!(result.status(), HeaderStatus::Current);
    assert!(result.end_year_present);
  }

  #[test]
  fn test_trailing_whitespace_is_ignored() {
    let content: String = with_header("2025", "")
      .lines()
      .map(|line| format!("{line}   \n"))
      .collect();
    assert_eq!(validate(&content, false).status(), HeaderStatus::Current);
  }

  #[test]
  fn test_small_typo_is_stale() {
    let content = with_header("2025", "").replace("compliance", "complience");
    assert_eq!(validate(&content, false).status(), HeaderStatus::Stale);
  }

  #[test]
  fn test_heavy_rewording_is_missing() {
    let content = with_header("2025", "").replace(
      "you may not use this file except in compliance with the License.",
      "this file may only be used in accordance with the License terms.",
    );
    assert_eq!(validate(&content, false).status(), HeaderStatus::Missing);
  }

  #[test]
  fn test_truncated_header_is_missing() {
    let content: String = with_header("2025", "").lines().take(4).map(|line| format!("{line}\n")).collect();
    assert_eq!(validate(&content, false).status(), HeaderStatus::Missing);
  }

  #[test]
  fn test_near_threshold_boundary() {
    let line = "#   limitations under the License.";
    let scorer = CharRatioScorer;
    // One differing character in a 34 character line scores about 97.
    let one_off = scorer.score(line, "#   limitations under the Licence.");
    assert!(one_off > 92.0 && one_off < 100.0);
    // Three differing characters drop below the threshold.
    let three_off = scorer.score(line, "#   limitation  unde  the Licence.");
    assert!(three_off <= 92.0);
  }

  #[test]
  fn test_near_threshold_uses_rounded_score() {
    let line = "#   Unless required by applicable law or agreed to in writing, software";
    let edited = "#   Unless required by applicable law to in writing, software";
    let score = CharRatioScorer.score(line, edited);
    assert!(score > 92.0 && score < 92.5, "score was {score}");

    // Rounds down to 92, which does not exceed the threshold.
    let content = with_header("2025", "").replace(line, edited);
    assert_eq!(validate(&content, false).status(), HeaderStatus::Missing);
  }

  #[test]
  fn test_custom_thresholds() {
    let style = hash();
    let content = with_header("2025", "").replace("compliance", "complience");
    let strict = HeaderValidator::new(AUTHOR, YEAR, false).with_thresholds(MatchThresholds {
      exact: 100.0,
      near: 99.0,
    });

    assert_eq!(
      strict.validate(&snapshot(&content, &style), &style).status(),
      HeaderStatus::Missing
    );
  }

  #[test]
  fn test_custom_scorer() {
    struct ExactScorer;
    impl LineScorer for ExactScorer {
      fn score(&self, left: &str, right: &str) -> f32 {
        if left == right { 100.0 } else { 0.0 }
      }
    }

    let style = hash();
    let content = with_header("2020", "");
    let validator = HeaderValidator::new(AUTHOR, YEAR, false).with_scorer(Box::new(ExactScorer));

    // The year mismatch is not scored against the declared template.
    assert_eq!(validator.validate(&snapshot(&content, &style), &style).status(), HeaderStatus::Stale);
  }
}
