// TSV module for Forthic
//
// Tab-separated value serialization. Rows are terminated with CRLF; a field
// containing a tab, newline, or double quote is wrapped in double quotes with
// embedded quotes doubled, matching common TSV/CSV quoting conventions.
//
// ## Categories
// - Conversion: >TSV, TSV>
// - Records: RECS>TSV, TSV>RECS

use crate::errors::ForthicError;
use crate::literals::{ForthicRecord, ForthicValue};
use crate::module::{InterpreterContext, Module, ModuleWord};
use std::sync::Arc;

const CRLF: &str = "\r\n";

/// TSVModule provides tab-separated-value serialization operations
pub struct TSVModule {
    module: Module,
}

impl TSVModule {
    /// Create a new TSVModule
    pub fn new() -> Self {
        let mut module = Module::new("tsv".to_string());

        Self::register_conversion_words(&mut module);
        Self::register_record_words(&mut module);

        Self { module }
    }

    /// Get the underlying module
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Get a mutable reference to the underlying module
    pub fn module_mut(&mut self) -> &mut Module {
        &mut self.module
    }

    // ===== Conversion Operations =====

    fn register_conversion_words(module: &mut Module) {
        // >TSV
        let word = Arc::new(ModuleWord::new(">TSV".to_string(), Self::word_to_tsv));
        module.add_exportable_word(word);

        // TSV>
        let word = Arc::new(ModuleWord::new("TSV>".to_string(), Self::word_tsv_to));
        module.add_exportable_word(word);
    }

    fn word_to_tsv(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let val = context.stack_pop()?;

        let rows = match val {
            ForthicValue::Array(rows) => rows,
            _ => Vec::new(),
        };

        let mut out = String::new();
        for row in rows {
            let cells = match row {
                ForthicValue::Array(cells) => cells,
                other => vec![other],
            };
            let fields: Vec<String> = cells.iter().map(Self::format_field).collect();
            out.push_str(&fields.join("\t"));
            out.push_str(CRLF);
        }

        context.stack_push(ForthicValue::String(out));
        Ok(())
    }

    fn word_tsv_to(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let val = context.stack_pop()?;

        let result = match val {
            ForthicValue::String(s) => {
                let rows = Self::parse_tsv(&s)
                    .into_iter()
                    .map(|row| {
                        ForthicValue::Array(row.into_iter().map(ForthicValue::String).collect())
                    })
                    .collect();
                ForthicValue::Array(rows)
            }
            _ => ForthicValue::Array(Vec::new()),
        };

        context.stack_push(result);
        Ok(())
    }

    // ===== Record Operations =====

    fn register_record_words(module: &mut Module) {
        // RECS>TSV
        let word = Arc::new(ModuleWord::new("RECS>TSV".to_string(), Self::word_recs_to_tsv));
        module.add_exportable_word(word);

        // TSV>RECS
        let word = Arc::new(ModuleWord::new("TSV>RECS".to_string(), Self::word_tsv_to_recs));
        module.add_exportable_word(word);
    }

    fn word_recs_to_tsv(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let fields_val = context.stack_pop()?;
        let recs_val = context.stack_pop()?;

        let field_names: Vec<String> = match fields_val {
            ForthicValue::Array(arr) => arr
                .into_iter()
                .filter_map(|v| match v {
                    ForthicValue::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        let recs: Vec<ForthicRecord> = match recs_val {
            ForthicValue::Array(arr) => arr
                .into_iter()
                .filter_map(|v| match v {
                    ForthicValue::Record(r) => Some(r),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        let mut out = String::new();
        out.push_str(&field_names.join("\t"));
        out.push_str(CRLF);

        for rec in &recs {
            let fields: Vec<String> = field_names
                .iter()
                .map(|name| {
                    rec.get(name)
                        .map(Self::format_field)
                        .unwrap_or_default()
                })
                .collect();
            out.push_str(&fields.join("\t"));
            out.push_str(CRLF);
        }

        context.stack_push(ForthicValue::String(out));
        Ok(())
    }

    fn word_tsv_to_recs(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let val = context.stack_pop()?;

        let result = match val {
            ForthicValue::String(s) => {
                let mut rows = Self::parse_tsv(&s);
                if rows.is_empty() {
                    ForthicValue::Array(Vec::new())
                } else {
                    let header = rows.remove(0);
                    let recs: Vec<ForthicValue> = rows
                        .into_iter()
                        .map(|row| {
                            let mut rec = ForthicRecord::new();
                            for (name, value) in header.iter().zip(row.into_iter()) {
                                rec.insert(name.clone(), ForthicValue::String(value));
                            }
                            ForthicValue::Record(rec)
                        })
                        .collect();
                    ForthicValue::Array(recs)
                }
            }
            _ => ForthicValue::Array(Vec::new()),
        };

        context.stack_push(result);
        Ok(())
    }

    // ===== Helpers =====

    fn format_field(value: &ForthicValue) -> String {
        let raw = match value {
            ForthicValue::String(s) => s.clone(),
            ForthicValue::Int(i) => i.to_string(),
            ForthicValue::Float(f) => f.to_string(),
            ForthicValue::Bool(b) => b.to_string(),
            ForthicValue::Null => String::new(),
            other => format!("{:?}", other),
        };

        if raw.contains('\t') || raw.contains('\n') || raw.contains('\r') || raw.contains('"') {
            format!("\"{}\"", raw.replace('"', "\"\""))
        } else {
            raw
        }
    }

    /// Parses TSV text into rows of string fields, honoring double-quoted
    /// fields that may contain embedded tabs, newlines, or doubled quotes.
    fn parse_tsv(text: &str) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        let mut row = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut chars = text.chars().peekable();
        let mut saw_any = false;

        while let Some(c) = chars.next() {
            saw_any = true;
            if in_quotes {
                match c {
                    '"' => {
                        if chars.peek() == Some(&'"') {
                            field.push('"');
                            chars.next();
                        } else {
                            in_quotes = false;
                        }
                    }
                    _ => field.push(c),
                }
                continue;
            }

            match c {
                '"' if field.is_empty() => in_quotes = true,
                '\t' => {
                    row.push(std::mem::take(&mut field));
                }
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                '\n' => {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                _ => field.push(c),
            }
        }

        if !field.is_empty() || !row.is_empty() {
            row.push(field);
            rows.push(row);
        } else if !saw_any {
            // empty input, nothing to do
        }

        rows
    }
}

impl Default for TSVModule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_tsv() {
        let rows = TSVModule::parse_tsv("alpha\tbeta\tgamma\r\n1\t2\t3\r\n");
        assert_eq!(
            rows,
            vec![
                vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()],
                vec!["1".to_string(), "2".to_string(), "3".to_string()],
            ]
        );
    }

    #[test]
    fn parses_quoted_fields_with_embedded_tab_and_newline() {
        let rows = TSVModule::parse_tsv("\"a\t1\"\t\"b\t2\"\t\"c\n3\"\r\n4\t5\t6\r\n");
        assert_eq!(
            rows,
            vec![
                vec!["a\t1".to_string(), "b\t2".to_string(), "c\n3".to_string()],
                vec!["4".to_string(), "5".to_string(), "6".to_string()],
            ]
        );
    }

    #[test]
    fn formats_fields_that_need_quoting() {
        assert_eq!(
            TSVModule::format_field(&ForthicValue::String("a\tb".to_string())),
            "\"a\tb\""
        );
        assert_eq!(
            TSVModule::format_field(&ForthicValue::Int(42)),
            "42"
        );
    }
}
