//! Statements files: many statements in one text file.
//!
//! Entries are separated by exactly one blank line. Every entry ends with a
//! newline, so the file is the entries joined by one extra `\n`.
//!
//! Entries are stored normalized to a single closing newline, so
//! `split_statements(&generate_statements_file(texts)?) == texts` holds only
//! when every text ends with exactly one newline. Canonical statement text,
//! signed or not, always does.

use crate::canonical::labels;
use crate::error::{CodecError, Result};
use crate::signed::split_signature;
use crate::statement::statement_hash;
use crate::text::with_trailing_newline;

/// Join statements into a statements file.
///
/// Blank entries are skipped; an entry that itself contains a blank line
/// would split into two and is rejected. Each entry is written with exactly
/// one closing newline.
pub fn generate_statements_file<S: AsRef<str>>(statements: &[S]) -> Result<String> {
    let mut entries = Vec::with_capacity(statements.len());
    for (index, statement) in statements.iter().enumerate() {
        let statement = statement.as_ref();
        if statement.trim().is_empty() {
            continue;
        }
        if statement.trim_end_matches('\n').contains("\n\n") {
            return Err(CodecError::envelope(
                labels::CONTENT,
                format!("statement {index} contains a blank line"),
            ));
        }
        entries.push(with_trailing_newline(statement.trim_end_matches('\n')));
    }
    Ok(entries.join("\n"))
}

/// Split a statements file into its entries.
///
/// Runs of blank lines count as one separator and whitespace-only segments
/// are dropped. Each returned entry ends with a single newline.
pub fn split_statements(file: &str) -> Vec<String> {
    file.split("\n\n")
        .map(|segment| segment.trim_start_matches('\n').trim_end_matches('\n'))
        .filter(|segment| !segment.trim().is_empty())
        .map(|segment| format!("{segment}\n"))
        .collect()
}

/// File name a statement is served under: `<hash>.txt`.
///
/// Signed and unsigned text of the same statement share a name.
pub fn statement_filename(text: &str) -> Result<String> {
    let unsigned = split_signature(text)?.map_or(text, |(unsigned, _)| unsigned);
    Ok(format!("{}.txt", statement_hash(unsigned)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "Publishing domain: a.example\nAuthor: A\nTime: Mon, 01 Jan 2024 00:00:00 GMT\nFormat version: 5\nStatement content: one\n";
    const B: &str = "Publishing domain: b.example\nAuthor: B\nTime: Mon, 01 Jan 2024 00:00:00 GMT\nFormat version: 5\nStatement content: \n\tType: Boycott\n\tSubject: X\n";

    #[test]
    fn test_one_blank_line_between_entries() {
        let file = generate_statements_file(&[A, B]).unwrap();
        assert_eq!(file, format!("{A}\n{B}"));
        assert_eq!(file.matches("\n\n").count(), 1);
        assert!(!file.starts_with('\n'));
    }

    #[test]
    fn test_roundtrip() {
        let file = generate_statements_file(&[A, B, A]).unwrap();
        assert_eq!(split_statements(&file), vec![A, B, A]);
    }

    #[test]
    fn test_split_absorbs_extra_blank_lines() {
        let file = format!("\n\n{A}\n\n\n\n{B}\n\n\n");
        assert_eq!(split_statements(&file), vec![A, B]);
        assert_eq!(split_statements(&format!("{A}\n\n\n{B}")), vec![A, B]);
        assert!(split_statements("\n \n\n\t\n").is_empty());
    }

    #[test]
    fn test_generate_skips_blank_and_rejects_split_entries() {
        assert_eq!(generate_statements_file(&["", A, "  \n"]).unwrap(), A);
        assert!(generate_statements_file(&["x\n\ny\n"]).is_err());
    }

    #[test]
    fn test_entries_come_back_with_one_closing_newline() {
        let unterminated = A.trim_end_matches('\n');
        let file = generate_statements_file(&[unterminated, B]).unwrap();
        assert_eq!(split_statements(&file), vec![A, B]);

        let file = generate_statements_file(&[format!("{A}\n\n")]).unwrap();
        assert_eq!(split_statements(&file), vec![A]);
    }

    #[test]
    fn test_statement_filename() {
        let name = statement_filename(A).unwrap();
        assert_eq!(name, format!("{}.txt", statement_hash(A)));

        let signed = crate::crypto::Keypair::from_seed(&[3; 32]).sign_statement(A).unwrap();
        assert_eq!(statement_filename(&signed).unwrap(), name);
    }
}
