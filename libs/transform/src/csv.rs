use stream_api::StreamError;

// ════════════════════════════════════════════════════════════════
//  CsvFormat
// ════════════════════════════════════════════════════════════════

/// Delimited-text encoding of flat JSON records.
///
/// One fixed single-character delimiter per instance. Fields that contain
/// the delimiter, a quote or a line break are quoted per RFC 4180 (quote
/// doubling), so a value can carry the delimiter without shifting column
/// boundaries.
#[derive(Clone, Copy, Debug)]
pub struct CsvFormat {
    delimiter: char,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl CsvFormat {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Parse a delimiter from config text (`","`, `"\t"`, ...).
    pub fn from_config(s: &str) -> Result<Self, StreamError> {
        let delimiter = match s {
            "\\t" | "\t" => '\t',
            s if s.chars().count() == 1 => s.chars().next().unwrap(),
            other => {
                return Err(StreamError::config(format!(
                    "delimiter must be a single character, got {other:?}"
                )));
            }
        };
        Ok(Self { delimiter })
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Header line from field names, in iteration order. Not terminated.
    pub fn header_line<'a>(&self, names: impl Iterator<Item = &'a str>) -> String {
        let mut line = String::new();
        for (i, name) in names.enumerate() {
            if i > 0 {
                line.push(self.delimiter);
            }
            self.push_field(&mut line, name);
        }
        line
    }

    /// One newline-terminated row from the record's values, in encountered
    /// (insertion) order.
    pub fn row_line(&self, record: &serde_json::Map<String, serde_json::Value>) -> String {
        let mut line = String::new();
        for (i, value) in record.values().enumerate() {
            if i > 0 {
                line.push(self.delimiter);
            }
            match value {
                serde_json::Value::String(s) => self.push_field(&mut line, s),
                serde_json::Value::Null => {}
                other => self.push_field(&mut line, &other.to_string()),
            }
        }
        line.push('\n');
        line
    }

    fn push_field(&self, out: &mut String, text: &str) {
        if text.contains(self.delimiter) || text.contains('"') || text.contains('\n') || text.contains('\r') {
            out.push('"');
            out.push_str(&text.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(text);
        }
    }

    /// Split one line back into its raw field texts (RFC 4180 quoting).
    pub fn split_fields(&self, line: &str) -> Vec<String> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut fields = Vec::new();
        let mut chars = line.chars().peekable();
        let mut field = String::new();

        loop {
            if chars.peek() == Some(&'"') {
                // Quoted field (RFC 4180 rule 5-7)
                chars.next(); // consume opening quote
                loop {
                    match chars.next() {
                        Some('"') => {
                            if chars.peek() == Some(&'"') {
                                // Escaped quote: "" → "
                                chars.next();
                                field.push('"');
                            } else {
                                // End of quoted field
                                break;
                            }
                        }
                        Some(c) => field.push(c),
                        None => break, // EOF inside quote — best effort
                    }
                }
                // Consume until delimiter or end
                loop {
                    match chars.peek() {
                        Some(&c) if c == self.delimiter => {
                            chars.next();
                            break;
                        }
                        Some(_) => { chars.next(); } // skip trailing chars after closing quote
                        None => break,
                    }
                }
            } else {
                // Unquoted field
                loop {
                    match chars.peek() {
                        Some(&c) if c == self.delimiter => {
                            chars.next();
                            break;
                        }
                        Some(_) => field.push(chars.next().unwrap()),
                        None => break,
                    }
                }
            }

            fields.push(std::mem::take(&mut field));

            if chars.peek().is_none() && !line.ends_with(self.delimiter) {
                break;
            }
            if chars.peek().is_none() {
                // Trailing delimiter → one more empty field
                fields.push(String::new());
                break;
            }
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, serde_json::Value)]) -> serde_json::Map<String, serde_json::Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn plain_row() {
        let fmt = CsvFormat::default();
        let rec = record(&[
            ("id", serde_json::json!(7)),
            ("name", serde_json::json!("Widget")),
            ("price", serde_json::json!(19.99)),
        ]);
        assert_eq!(fmt.row_line(&rec), "7,Widget,19.99\n");
    }

    #[test]
    fn header_follows_key_order() {
        let fmt = CsvFormat::default();
        let rec = record(&[
            ("b", serde_json::json!(1)),
            ("a", serde_json::json!(2)),
        ]);
        let header = fmt.header_line(rec.keys().map(|k| k.as_str()));
        assert_eq!(header, "b,a");
    }

    #[test]
    fn value_with_delimiter_is_quoted() {
        let fmt = CsvFormat::default();
        let rec = record(&[
            ("address", serde_json::json!("12 Main St, Apt 4")),
            ("city", serde_json::json!("Lyon")),
        ]);
        let line = fmt.row_line(&rec);
        assert_eq!(line, "\"12 Main St, Apt 4\",Lyon\n");

        // Column boundaries survive the round trip.
        let fields = fmt.split_fields(&line);
        assert_eq!(fields, vec!["12 Main St, Apt 4", "Lyon"]);
    }

    #[test]
    fn value_with_quote_and_newline_survives() {
        let fmt = CsvFormat::default();
        let rec = record(&[
            ("note", serde_json::json!("line1\nline2 \"quoted\"")),
            ("n", serde_json::json!(1)),
        ]);
        let line = fmt.row_line(&rec);
        let fields = fmt.split_fields(&line);
        assert_eq!(fields, vec!["line1\nline2 \"quoted\"", "1"]);
    }

    #[test]
    fn null_becomes_empty_field() {
        let fmt = CsvFormat::default();
        let rec = record(&[
            ("a", serde_json::Value::Null),
            ("b", serde_json::json!("x")),
        ]);
        assert_eq!(fmt.row_line(&rec), ",x\n");
        assert_eq!(fmt.split_fields(",x"), vec!["", "x"]);
    }

    #[test]
    fn tab_delimiter_from_config() {
        let fmt = CsvFormat::from_config("\\t").unwrap();
        assert_eq!(fmt.delimiter(), '\t');

        let rec = record(&[("a", serde_json::json!("x,y")), ("b", serde_json::json!(2))]);
        // Comma needs no quoting under a tab delimiter.
        assert_eq!(fmt.row_line(&rec), "x,y\t2\n");
    }

    #[test]
    fn multichar_delimiter_rejected() {
        assert!(CsvFormat::from_config(";;").is_err());
        assert!(CsvFormat::from_config("").is_err());
    }
}
