//! Source Map v3 output for [`crate::edit_buffer::EditBuffer`].
//!
//! Columns are counted in UTF-16 code units, which is what JS consumers index by.

use serde::{Deserialize, Serialize};

const VERSION: u32 = 3;
const DATA_URL_PREFIX: &str = "data:application/json;charset=utf-8;base64,";
const BASE64_DIGITS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub sources: Vec<String>,
    pub sources_content: Vec<Option<String>>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_url(&self) -> String {
        format!(
            "{DATA_URL_PREFIX}{}",
            encode_base64(self.to_json_string().as_bytes())
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapOptions {
    pub file: Option<String>,
    pub source: String,
    pub include_content: bool,
    /// Map every character of unchanged text instead of segment and line starts.
    pub hires: bool,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    generated_col: u32,
    source_line: u32,
    source_col: u32,
}

/// Collects single-source segments line by line while generated text is emitted.
#[derive(Debug)]
pub(crate) struct MappingsBuilder {
    lines: Vec<Vec<Segment>>,
    generated_col: u32,
}

impl MappingsBuilder {
    pub(crate) fn new() -> Self {
        Self {
            lines: vec![Vec::new()],
            generated_col: 0,
        }
    }

    pub(crate) fn add_mapping(&mut self, source_line: u32, source_col: u32) {
        let generated_col = self.generated_col;
        if let Some(line) = self.lines.last_mut() {
            line.push(Segment {
                generated_col,
                source_line,
                source_col,
            });
        }
    }

    pub(crate) fn advance_char(&mut self, ch: char) {
        if ch == '\n' {
            self.lines.push(Vec::new());
            self.generated_col = 0;
        } else {
            self.generated_col += ch.len_utf16() as u32;
        }
    }

    pub(crate) fn advance(&mut self, text: &str) {
        text.chars().for_each(|ch| self.advance_char(ch));
    }

    pub(crate) fn into_mappings(self) -> String {
        let mut mappings = String::new();
        let mut last_source_line = 0i64;
        let mut last_source_col = 0i64;
        for (line_index, segments) in self.lines.iter().enumerate() {
            if line_index > 0 {
                mappings.push(';');
            }
            let mut last_generated_col = 0i64;
            for (segment_index, segment) in segments.iter().enumerate() {
                if segment_index > 0 {
                    mappings.push(',');
                }
                encode_vlq(&mut mappings, segment.generated_col as i64 - last_generated_col);
                last_generated_col = segment.generated_col as i64;
                // single source, index delta is always zero
                encode_vlq(&mut mappings, 0);
                encode_vlq(&mut mappings, segment.source_line as i64 - last_source_line);
                last_source_line = segment.source_line as i64;
                encode_vlq(&mut mappings, segment.source_col as i64 - last_source_col);
                last_source_col = segment.source_col as i64;
            }
        }
        mappings
    }

    pub(crate) fn finish(self, options: &MapOptions, original: &str) -> SourceMap {
        SourceMap {
            version: VERSION,
            file: options.file.clone(),
            sources: vec![options.source.clone()],
            sources_content: vec![options.include_content.then(|| original.to_string())],
            names: vec![],
            mappings: self.into_mappings(),
        }
    }
}

fn encode_vlq(out: &mut String, value: i64) {
    let mut vlq = if value < 0 {
        ((-value) << 1) | 1
    } else {
        value << 1
    };
    loop {
        let mut digit = vlq & 0b1_1111;
        vlq >>= 5;
        if vlq > 0 {
            digit |= 0b10_0000;
        }
        out.push(BASE64_DIGITS[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}

fn encode_base64(bytes: &[u8]) -> String {
    let digit = |value: u8| BASE64_DIGITS[(value & 0b11_1111) as usize] as char;
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(3) {
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied();
        let b2 = chunk.get(2).copied();
        out.push(digit(b0 >> 2));
        out.push(digit(((b0 & 0b11) << 4) | (b1.unwrap_or(0) >> 4)));
        out.push(b1.map_or('=', |b1| {
            digit(((b1 & 0b1111) << 2) | (b2.unwrap_or(0) >> 6))
        }));
        out.push(b2.map_or('=', digit));
    }
    out
}
