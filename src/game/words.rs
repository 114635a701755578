//! Word data and the import boundary.
//!
//! The host page reads CSV/XLSX itself and hands rows over either as an array
//! of `{word, meaning, incomplete}` objects or as raw CSV text. Malformed rows
//! are skipped and counted rather than failing the import.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::round::PLACEHOLDER;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// Start was attempted before any words were imported.
    #[error("word bank is empty")]
    EmptyWordBank,
}

/// One vocabulary entry. `incomplete` is `word` with the letters the player
/// must supply replaced by `'_'`; same length, every other position matching
/// `word` case-insensitively.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Word {
    pub word: String,
    pub meaning: String,
    pub incomplete: String,
}

impl Word {
    pub fn new(word: &str, meaning: &str, incomplete: &str) -> Self {
        Self {
            word: word.to_string(),
            meaning: meaning.to_string(),
            incomplete: incomplete.to_string(),
        }
    }

    /// Shape check applied at import. Deliberately minimal: equal char
    /// length, non-empty, and non-placeholder positions agreeing with the
    /// full word (case-insensitive).
    pub fn is_well_formed(&self) -> bool {
        let full: Vec<char> = self.word.chars().collect();
        let incomplete: Vec<char> = self.incomplete.chars().collect();
        if full.is_empty() || full.len() != incomplete.len() {
            return false;
        }
        full.iter().zip(incomplete.iter()).all(|(w, i)| {
            *i == PLACEHOLDER || w.to_lowercase().eq(i.to_lowercase())
        })
    }
}

/// Loosely-typed import row. Every field is optional so a row with missing
/// columns deserializes instead of poisoning the whole batch; it is then
/// counted as skipped.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default)]
    pub meaning: Option<String>,
    #[serde(default)]
    pub incomplete: Option<String>,
}

impl RawRow {
    fn into_word(self) -> Option<Word> {
        let word = non_empty(self.word?)?;
        let meaning = non_empty(self.meaning?)?;
        let incomplete = non_empty(self.incomplete?)?;
        let word = Word { word, meaning, incomplete };
        word.is_well_formed().then_some(word)
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// First-cell values that mark a header row, in English or the source
/// locale's term.
fn is_header(first_cell: &str) -> bool {
    let cell = first_cell.trim();
    cell.eq_ignore_ascii_case("word") || cell == "单词"
}

/// Counts reported back to the host after an import.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Ordered, immutable-after-import word list for a session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordBank {
    words: Vec<Word>,
}

impl WordBank {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// The built-in starter list, playable before any import.
    pub fn builtin() -> Self {
        Self {
            words: crate::DEFAULT_WORDS
                .iter()
                .map(|(word, meaning, incomplete)| Word::new(word, meaning, incomplete))
                .collect(),
        }
    }

    /// Build a bank from host-supplied rows. A leading header row is dropped
    /// silently; malformed rows are skipped and counted.
    pub fn from_rows(mut rows: Vec<RawRow>) -> (Self, ImportSummary) {
        let leading_header = rows
            .first()
            .is_some_and(|row| is_header(row.word.as_deref().unwrap_or("")));
        if leading_header {
            rows.remove(0);
        }

        let mut words = Vec::new();
        let mut skipped = 0usize;
        for row in rows {
            match row.into_word() {
                Some(word) => words.push(word),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            log::warn!("import: skipped {skipped} malformed row(s)");
        }
        let summary = ImportSummary { imported: words.len(), skipped };
        (Self { words }, summary)
    }

    /// Same semantics as `from_rows` for plain CSV text: one row per line,
    /// comma-separated `word,meaning,incomplete`, optional double quotes.
    pub fn from_csv(text: &str) -> (Self, ImportSummary) {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                let mut fields = line.split(',').map(unquote);
                RawRow {
                    word: fields.next(),
                    meaning: fields.next(),
                    incomplete: fields.next(),
                }
            })
            .collect();
        Self::from_rows(rows)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Word> {
        self.words.get(index)
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }
}

fn unquote(field: &str) -> String {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(field)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_accepts_case_mismatch_on_fixed_letters() {
        assert!(Word::new("Apple", "苹果", "a_ple").is_well_formed());
        assert!(Word::new("apple", "苹果", "APP_E").is_well_formed());
    }

    #[test]
    fn well_formed_rejects_length_and_letter_mismatches() {
        assert!(!Word::new("apple", "苹果", "a_pl").is_well_formed());
        assert!(!Word::new("apple", "苹果", "a_plx").is_well_formed());
        assert!(!Word::new("", "x", "").is_well_formed());
    }

    #[test]
    fn header_row_is_dropped_without_counting_as_skipped() {
        let rows = vec![
            RawRow {
                word: Some("Word".into()),
                meaning: Some("meaning".into()),
                incomplete: Some("incomplete".into()),
            },
            RawRow {
                word: Some("kite".into()),
                meaning: Some("风筝".into()),
                incomplete: Some("k_te".into()),
            },
        ];
        let (bank, summary) = WordBank::from_rows(rows);
        assert_eq!(bank.len(), 1);
        assert_eq!(summary, ImportSummary { imported: 1, skipped: 0 });
    }

    #[test]
    fn localized_header_is_recognized() {
        let (bank, summary) = WordBank::from_csv("单词,含义,不完整\nkite,风筝,k_te\n");
        assert_eq!(bank.len(), 1);
        assert_eq!(summary.skipped, 0);
    }

    #[test]
    fn malformed_rows_are_skipped_and_counted() {
        let rows = vec![
            RawRow {
                word: Some("kite".into()),
                meaning: Some("风筝".into()),
                incomplete: Some("k_te".into()),
            },
            RawRow {
                word: Some("broken".into()),
                meaning: None,
                incomplete: Some("br_ken".into()),
            },
            RawRow {
                word: Some("short".into()),
                meaning: Some("短".into()),
                incomplete: Some("s_".into()),
            },
        ];
        let (bank, summary) = WordBank::from_rows(rows);
        assert_eq!(bank.len(), 1);
        assert_eq!(summary, ImportSummary { imported: 1, skipped: 2 });
    }

    #[test]
    fn csv_accepts_quoted_fields_and_blank_lines() {
        let text = "word,meaning,incomplete\n\"kite\",\"风筝\",\"k_te\"\n\nriver,河流,r_ver\n";
        let (bank, summary) = WordBank::from_csv(text);
        assert_eq!(bank.len(), 2);
        assert_eq!(summary.imported, 2);
        assert_eq!(bank.get(0).map(|w| w.word.as_str()), Some("kite"));
    }

    #[test]
    fn builtin_bank_matches_the_dataset() {
        let bank = WordBank::builtin();
        assert_eq!(bank.len(), crate::DEFAULT_WORDS.len());
        assert!(!bank.is_empty());
    }
}
