//! Quote-aware tokenization of raw default and environment strings.
//!
//! Raw strings carry two independent delimiter levels: `;` separates
//! records (one list element or one tuple instance each) and whitespace
//! runs separate fields within a record. A field wrapped in matching single
//! or double quotes keeps its interior verbatim, internal whitespace
//! included; the quote markers themselves are stripped. Empty segments are
//! preserved, never skipped: `";;"` is three records.
//!
//! This layer never fails. Arity mismatches are the resolution engine's
//! concern.

/// Splits a raw string into records on the `;` delimiter.
///
/// Empty records are preserved: n delimiters always yield n + 1 records.
///
/// # Examples
///
/// ```
/// use script_args_core::tokenizer::split_records;
///
/// assert_eq!(split_records("a; b;c"), vec!["a", " b", "c"]);
/// assert_eq!(split_records(";;"), vec!["", "", ""]);
/// ```
pub fn split_records(raw: &str) -> Vec<&str> {
    raw.split(';').collect()
}

/// Splits one record into whitespace-delimited fields, honoring quotes.
///
/// A field starting with `'` or `"` runs to the matching close quote; its
/// interior is emitted verbatim. No escape sequences are recognized; an
/// unterminated quote consumes the rest of the record. Unquoted fields are
/// trimmed by construction (whitespace never enters them). An empty or
/// whitespace-only record yields exactly one empty field, so an empty
/// record still counts as one token.
///
/// # Examples
///
/// ```
/// use script_args_core::tokenizer::record_fields;
///
/// assert_eq!(record_fields("v1 123 v2"), vec!["v1", "123", "v2"]);
/// assert_eq!(record_fields("'a b' c"), vec!["a b", "c"]);
/// assert_eq!(record_fields("  "), vec![""]);
/// ```
pub fn record_fields(record: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut chars = record.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else { break };
        if first == '\'' || first == '"' {
            chars.next();
            let mut field = String::new();
            for c in chars.by_ref() {
                if c == first {
                    break;
                }
                field.push(c);
            }
            fields.push(field);
        } else {
            let mut field = String::new();
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                field.push(c);
            }
            fields.push(field);
        }
    }
    if fields.is_empty() {
        fields.push(String::new());
    }
    fields
}

/// Extracts the single token a record contributes to a scalar-typed list.
///
/// The record is trimmed; when the trimmed text is fully wrapped in
/// matching quotes the interior is taken verbatim. Embedded whitespace in
/// an unquoted record passes through unchanged — no field splitting applies
/// here.
///
/// # Examples
///
/// ```
/// use script_args_core::tokenizer::record_token;
///
/// assert_eq!(record_token("  1410 "), "1410");
/// assert_eq!(record_token(" '  c ' "), "  c ");
/// assert_eq!(record_token("plain text"), "plain text");
/// ```
pub fn record_token(record: &str) -> String {
    let trimmed = record.trim();
    let mut chars = trimmed.chars();
    if let (Some(first), Some(last)) = (chars.next(), chars.next_back()) {
        if first == last && (first == '\'' || first == '"') {
            return trimmed[1..trimmed.len() - 1].to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_tokens(raw: &str) -> Vec<String> {
        split_records(raw).into_iter().map(record_token).collect()
    }

    #[test]
    fn test_single_record_passes_through() {
        assert_eq!(list_tokens("123"), vec!["123"]);
    }

    #[test]
    fn test_records_are_trimmed() {
        assert_eq!(list_tokens("123; 1410"), vec!["123", "1410"]);
        assert_eq!(list_tokens(" ; 1410 ; "), vec!["", "1410", ""]);
    }

    #[test]
    fn test_empty_segments_are_preserved() {
        assert_eq!(list_tokens(""), vec![""]);
        assert_eq!(list_tokens(";"), vec!["", ""]);
        assert_eq!(list_tokens(";;;;;"), vec!["", "", "", "", "", ""]);
        assert_eq!(list_tokens(";     ;;;;"), vec!["", "", "", "", "", ""]);
    }

    #[test]
    fn test_quoted_record_keeps_interior_whitespace() {
        assert_eq!(list_tokens(" '  c '  "), vec!["  c "]);
        assert_eq!(list_tokens(" \"  c \" ;  ;   \"  \" "), vec!["  c ", "", "  "]);
    }

    #[test]
    fn test_quoted_empty_record() {
        assert_eq!(list_tokens("''"), vec![""]);
        assert_eq!(list_tokens("\"\""), vec![""]);
    }

    #[test]
    fn test_unquoted_record_with_embedded_text_is_unchanged() {
        assert_eq!(list_tokens("plain text; more"), vec!["plain text", "more"]);
    }

    #[test]
    fn test_fields_split_on_whitespace_runs() {
        assert_eq!(record_fields("v1   123\tv2"), vec!["v1", "123", "v2"]);
    }

    #[test]
    fn test_fields_honor_both_quote_styles() {
        assert_eq!(record_fields("v3 \" 1410 \" v4"), vec!["v3", " 1410 ", "v4"]);
        assert_eq!(record_fields("'' 123 True"), vec!["", "123", "True"]);
    }

    #[test]
    fn test_empty_record_is_one_empty_field() {
        assert_eq!(record_fields(""), vec![""]);
        assert_eq!(record_fields("   "), vec![""]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(record_fields("'open end"), vec!["open end"]);
    }

    #[test]
    fn test_single_quoted_field_keeps_other_quote_char() {
        assert_eq!(record_fields("'say \"hi\"'"), vec!["say \"hi\""]);
    }
}
