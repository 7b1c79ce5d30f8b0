//! Declarative field tables for typed content blocks.
//!
//! Every typed statement renders as
//!
//! ```text
//!
//! 	Type: <TypeName>
//! 	<Label>: <value>
//! 	<Section>:
//! 		<Label>: <value>
//! ```
//!
//! (a leading newline, then one tab per nesting level). A type describes its
//! block as an ordered `&[FieldSpec]`; rendering and parsing both walk that
//! table, so adding a field is a one-line table edit.

use std::collections::BTreeMap;

use crate::error::{CodecError, Result};

/// How a field participates in a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Always present with this exact text.
    Fixed(&'static str),
}

/// One line (or nested section) of a typed block.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub label: &'static str,
    pub presence: Presence,
    /// Older labels still accepted when parsing.
    pub aliases: &'static [&'static str],
    /// Non-empty for a section header whose children are indented one level deeper.
    pub children: &'static [FieldSpec],
}

impl FieldSpec {
    pub const fn required(label: &'static str) -> Self {
        Self {
            label,
            presence: Presence::Required,
            aliases: &[],
            children: &[],
        }
    }

    pub const fn optional(label: &'static str) -> Self {
        Self {
            label,
            presence: Presence::Optional,
            aliases: &[],
            children: &[],
        }
    }

    pub const fn fixed(label: &'static str, text: &'static str) -> Self {
        Self {
            label,
            presence: Presence::Fixed(text),
            aliases: &[],
            children: &[],
        }
    }

    /// An optional section; rendered only when it has at least one value.
    pub const fn section(label: &'static str, children: &'static [FieldSpec]) -> Self {
        Self {
            label,
            presence: Presence::Optional,
            aliases: &[],
            children,
        }
    }

    pub const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    fn is_section(&self) -> bool {
        !self.children.is_empty()
    }

    /// The value after `<label>: ` if `line` is this field's line.
    fn match_line<'a>(&self, line: &'a str) -> Option<&'a str> {
        std::iter::once(self.label)
            .chain(self.aliases.iter().copied())
            .find_map(|label| line.strip_prefix(label)?.strip_prefix(": "))
    }
}

/// Raw string values of a block, keyed by label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: BTreeMap<&'static str, String>,
    sections: BTreeMap<&'static str, FieldValues>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.sections.values().all(FieldValues::is_empty)
    }

    pub fn set(&mut self, label: &'static str, value: impl Into<String>) -> &mut Self {
        self.values.insert(label, value.into());
        self
    }

    /// Set the value if present. Empty strings count as absent.
    pub fn set_opt<T: ToString>(&mut self, label: &'static str, value: Option<T>) -> &mut Self {
        if let Some(v) = value.map(|v| v.to_string()).filter(|v| !v.is_empty()) {
            self.values.insert(label, v);
        }
        self
    }

    pub fn set_section(&mut self, label: &'static str, section: FieldValues) -> &mut Self {
        if !section.is_empty() {
            self.sections.insert(label, section);
        }
        self
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.values.get(label).map(String::as_str)
    }

    pub fn take(&mut self, label: &str) -> Option<String> {
        self.values.remove(label)
    }

    /// Take a value that must be present.
    pub fn require(&mut self, label: &'static str) -> Result<String> {
        self.take(label)
            .ok_or_else(|| CodecError::content(label, "required field is missing"))
    }

    /// Take and convert a value; a failed conversion names the field.
    pub fn take_with<T>(
        &mut self,
        label: &'static str,
        expected: &str,
        convert: impl FnOnce(&str) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.take(label) {
            None => Ok(None),
            Some(raw) => convert(&raw)
                .map(Some)
                .ok_or_else(|| CodecError::content(label, format!("expected {expected}, got '{raw}'"))),
        }
    }

    /// Take and convert a value that must be present.
    pub fn require_with<T>(
        &mut self,
        label: &'static str,
        expected: &str,
        convert: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T> {
        self.take_with(label, expected, convert)?
            .ok_or_else(|| CodecError::content(label, "required field is missing"))
    }

    pub fn take_section(&mut self, label: &str) -> Option<FieldValues> {
        self.sections.remove(label)
    }
}

/// Render a typed block from its table and values.
pub fn render_block(type_label: &str, specs: &[FieldSpec], values: &FieldValues) -> Result<String> {
    let mut out = format!("\n\tType: {type_label}\n");
    render_fields(&mut out, 1, specs, values)?;
    Ok(out)
}

fn render_fields(out: &mut String, depth: usize, specs: &[FieldSpec], values: &FieldValues) -> Result<()> {
    let indent = "\t".repeat(depth);
    for spec in specs {
        if spec.is_section() {
            if let Some(section) = values.sections.get(spec.label).filter(|s| !s.is_empty()) {
                out.push_str(&format!("{indent}{}: \n", spec.label));
                render_fields(out, depth + 1, spec.children, section)?;
            } else if spec.presence == Presence::Required {
                return Err(CodecError::content(spec.label, "required section is missing"));
            }
            continue;
        }
        let value = match spec.presence {
            Presence::Fixed(text) => Some(text),
            _ => values.get(spec.label).filter(|v| !v.is_empty()),
        };
        match value {
            Some(v) => {
                if v.contains(['\n', '\r']) {
                    return Err(CodecError::content(spec.label, "value must be a single line"));
                }
                out.push_str(&format!("{indent}{}: {v}\n", spec.label));
            }
            None if spec.presence == Presence::Required => {
                return Err(CodecError::content(spec.label, "required field is missing"));
            }
            None => {}
        }
    }
    Ok(())
}

struct Line<'a> {
    depth: usize,
    text: &'a str,
}

/// Parse a typed block against its table.
///
/// Lines must follow table order; unknown, duplicated or reordered lines are
/// rejected with the label of the offending line.
pub fn parse_block(content: &str, type_label: &str, specs: &[FieldSpec]) -> Result<FieldValues> {
    let header = format!("\n\tType: {type_label}\n");
    let body = content
        .strip_prefix(header.as_str())
        .ok_or_else(|| CodecError::content("Type", format!("expected a '{type_label}' block")))?;
    if !body.is_empty() && !body.ends_with('\n') {
        return Err(CodecError::content(type_label, "block must end with a newline"));
    }
    let lines: Vec<Line<'_>> = body
        .split_terminator('\n')
        .map(|raw| {
            let text = raw.trim_start_matches('\t');
            Line {
                depth: raw.len() - text.len(),
                text,
            }
        })
        .collect();

    let mut pos = 0;
    let values = parse_fields(&lines, &mut pos, 1, specs)?;
    if let Some(line) = lines.get(pos) {
        return Err(match find_spec(specs, line.text) {
            Some(spec) => CodecError::content(spec.label, "field is duplicated, misplaced or mis-indented"),
            None => CodecError::content(line_label(line.text), "unrecognized line"),
        });
    }
    Ok(values)
}

fn parse_fields(lines: &[Line<'_>], pos: &mut usize, depth: usize, specs: &[FieldSpec]) -> Result<FieldValues> {
    let mut values = FieldValues::new();
    for spec in specs {
        let matched = lines
            .get(*pos)
            .filter(|line| line.depth == depth)
            .and_then(|line| spec.match_line(line.text));
        let Some(value) = matched else {
            if spec.presence != Presence::Optional {
                return Err(CodecError::content(spec.label, "required field is missing"));
            }
            continue;
        };
        *pos += 1;
        if spec.is_section() {
            if !value.is_empty() {
                return Err(CodecError::content(spec.label, "section header must not carry a value"));
            }
            let section = parse_fields(lines, pos, depth + 1, spec.children)?;
            if section.is_empty() {
                return Err(CodecError::content(spec.label, "section is empty"));
            }
            values.sections.insert(spec.label, section);
            continue;
        }
        match spec.presence {
            Presence::Fixed(text) if value != text => {
                return Err(CodecError::content(spec.label, format!("expected '{text}'")));
            }
            Presence::Fixed(_) => {}
            _ if value.is_empty() => {
                return Err(CodecError::content(spec.label, "value is empty"));
            }
            _ => {
                values.values.insert(spec.label, value.to_string());
            }
        }
    }
    Ok(values)
}

fn find_spec<'s>(specs: &'s [FieldSpec], line: &str) -> Option<&'s FieldSpec> {
    specs.iter().find_map(|spec| {
        if spec.match_line(line).is_some() {
            Some(spec)
        } else {
            find_spec(spec.children, line)
        }
    })
}

fn line_label(line: &str) -> String {
    match line.split_once(": ") {
        Some((label, _)) => label.to_string(),
        None => line.chars().take(40).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCOPE: &[FieldSpec] = &[FieldSpec::required("Description"), FieldSpec::optional("City scope")];
    const SAMPLE: &[FieldSpec] = &[
        FieldSpec::fixed("Description", "A fixed sentence."),
        FieldSpec::required("Name"),
        FieldSpec::optional("Nickname"),
        FieldSpec::required("Legal form").with_aliases(&["Legal entity"]),
        FieldSpec::section("Scope", SCOPE),
    ];

    fn sample_values() -> FieldValues {
        let mut values = FieldValues::new();
        values.set("Name", "Acme").set("Legal form", "corporation");
        values
    }

    #[test]
    fn test_render_omits_absent_optionals() {
        let text = render_block("Sample", SAMPLE, &sample_values()).unwrap();
        assert_eq!(
            text,
            "\n\tType: Sample\n\tDescription: A fixed sentence.\n\tName: Acme\n\tLegal form: corporation\n"
        );
    }

    #[test]
    fn test_render_section() {
        let mut values = sample_values();
        let mut scope = FieldValues::new();
        scope.set("Description", "Citizens").set("City scope", "Berlin");
        values.set_section("Scope", scope);
        let text = render_block("Sample", SAMPLE, &values).unwrap();
        assert!(text.ends_with("\tScope: \n\t\tDescription: Citizens\n\t\tCity scope: Berlin\n"));

        let parsed = parse_block(&text, "Sample", SAMPLE).unwrap();
        assert_eq!(parsed, values);
    }

    #[test]
    fn test_render_missing_required_names_field() {
        let mut values = FieldValues::new();
        values.set("Name", "Acme");
        let err = render_block("Sample", SAMPLE, &values).unwrap_err();
        assert_eq!(err.field(), Some("Legal form"));
    }

    #[test]
    fn test_render_rejects_newline_in_value() {
        let mut values = sample_values();
        values.set("Nickname", "two\nlines");
        let err = render_block("Sample", SAMPLE, &values).unwrap_err();
        assert_eq!(err.field(), Some("Nickname"));
    }

    #[test]
    fn test_parse_roundtrip() {
        let mut values = sample_values();
        values.set("Nickname", "Ünïcode: ok");
        let text = render_block("Sample", SAMPLE, &values).unwrap();
        assert_eq!(parse_block(&text, "Sample", SAMPLE).unwrap(), values);
    }

    #[test]
    fn test_parse_alias() {
        let text = "\n\tType: Sample\n\tDescription: A fixed sentence.\n\tName: Acme\n\tLegal entity: corporation\n";
        let parsed = parse_block(text, "Sample", SAMPLE).unwrap();
        assert_eq!(parsed.get("Legal form"), Some("corporation"));
    }

    #[test]
    fn test_parse_wrong_type() {
        let text = render_block("Sample", SAMPLE, &sample_values()).unwrap();
        let err = parse_block(&text, "Other", SAMPLE).unwrap_err();
        assert_eq!(err.field(), Some("Type"));
    }

    #[test]
    fn test_parse_reordered_lines() {
        let text = "\n\tType: Sample\n\tDescription: A fixed sentence.\n\tLegal form: corporation\n\tName: Acme\n";
        let err = parse_block(text, "Sample", SAMPLE).unwrap_err();
        assert_eq!(err.field(), Some("Name"));
    }

    #[test]
    fn test_parse_unknown_line() {
        let text = "\n\tType: Sample\n\tDescription: A fixed sentence.\n\tName: Acme\n\tLegal form: corporation\n\tColour: red\n";
        let err = parse_block(text, "Sample", SAMPLE).unwrap_err();
        assert_eq!(err.field(), Some("Colour"));
    }

    #[test]
    fn test_parse_altered_fixed_text() {
        let text = "\n\tType: Sample\n\tDescription: Something else.\n\tName: Acme\n\tLegal form: corporation\n";
        let err = parse_block(text, "Sample", SAMPLE).unwrap_err();
        assert_eq!(err.field(), Some("Description"));
    }

    #[test]
    fn test_parse_empty_value() {
        let text = "\n\tType: Sample\n\tDescription: A fixed sentence.\n\tName: \n\tLegal form: corporation\n";
        let err = parse_block(text, "Sample", SAMPLE).unwrap_err();
        assert_eq!(err.field(), Some("Name"));
    }

    #[test]
    fn test_take_with_reports_field() {
        let mut values = FieldValues::new();
        values.set("Count", "many");
        let err = values
            .take_with("Count", "a number", |s| s.parse::<u32>().ok())
            .unwrap_err();
        assert_eq!(err.field(), Some("Count"));
    }
}
