use std::collections::HashMap;

use gauge_core::UsageLogEntry;

pub(crate) fn encode_row(entry: &UsageLogEntry) -> String {
    let fields = [
        escape(&entry.timestamp),
        escape(&entry.model),
        entry.thinking_tokens.to_string(),
        entry.input_tokens.to_string(),
        entry.output_tokens.to_string(),
        entry.total_tokens.to_string(),
        escape(&entry.conversation_id),
        escape(&entry.session_id),
        escape(&entry.system),
    ];
    let mut row = fields.join(",");
    row.push('\n');
    row
}

fn escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Splits CSV text into records. Quoted fields may contain separators,
/// doubled quotes and line breaks.
pub(crate) fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(ch),
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(ch),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }
    records
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    let blank = record.len() == 1 && record[0].is_empty();
    if !blank {
        records.push(record);
    }
}

/// Maps a row onto the header by column name. Unparseable counts read as 0.
pub(crate) fn entry_from_record(columns: &HashMap<&str, usize>, record: &[String]) -> UsageLogEntry {
    let text = |name: &str| {
        columns
            .get(name)
            .and_then(|&index| record.get(index))
            .cloned()
            .unwrap_or_default()
    };
    let count = |name: &str| text(name).trim().parse::<u64>().unwrap_or(0);
    UsageLogEntry {
        timestamp: text("timestamp"),
        model: text("model"),
        thinking_tokens: count("thinking_tokens"),
        input_tokens: count("input_tokens"),
        output_tokens: count("output_tokens"),
        total_tokens: count("total_tokens"),
        conversation_id: text("conversation_id"),
        session_id: text("session_id"),
        system: text("system"),
    }
}
