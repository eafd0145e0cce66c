/// One `Key : value` record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBlock {
    fields: Vec<(String, String)>,
}

impl FieldBlock {
    /// First value whose key matches case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// First non-empty value among several synonymous keys.
    pub fn get_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.get(key))
            .find(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    fn push(&mut self, key: &str, value: &str) {
        self.fields.push((key.to_string(), value.to_string()));
    }

    fn append_to_last(&mut self, text: &str) {
        if let Some((_, value)) = self.fields.last_mut() {
            if !value.is_empty() {
                value.push('\n');
            }
            value.push_str(text);
        }
    }
}

/// Line-at-a-time accumulator for key/value output.
///
/// A blank line closes the current block. A line starting with whitespace
/// continues the previous value (an empty key before the separator, as in
/// `             : wrapped text`, is treated the same way).
#[derive(Debug)]
pub struct BlockReader {
    separator: char,
    blocks: Vec<FieldBlock>,
    current: FieldBlock,
}

impl BlockReader {
    pub fn new(separator: char) -> Self {
        Self {
            separator,
            blocks: Vec::new(),
            current: FieldBlock::default(),
        }
    }

    /// Feed one line. Returns false when the line was not key/value data.
    pub fn push_line(&mut self, line: &str) -> bool {
        if line.trim().is_empty() {
            self.finish_block();
            return true;
        }

        let continued = line.starts_with(char::is_whitespace);
        let trimmed = line.trim();

        if continued {
            if self.current.is_empty() {
                return false;
            }
            let text = trimmed
                .strip_prefix(self.separator)
                .map(str::trim)
                .unwrap_or(trimmed);
            self.current.append_to_last(text);
            return true;
        }

        match trimmed.split_once(self.separator) {
            Some((key, value)) if !key.trim().is_empty() => {
                self.current.push(key.trim(), value.trim());
                true
            }
            Some((_, value)) => {
                if self.current.is_empty() {
                    return false;
                }
                self.current.append_to_last(value.trim());
                true
            }
            None => false,
        }
    }

    pub fn finish_block(&mut self) {
        if !self.current.is_empty() {
            self.blocks.push(std::mem::take(&mut self.current));
        }
    }

    pub fn finish(mut self) -> Vec<FieldBlock> {
        self.finish_block();
        self.blocks
    }
}

/// Split `text` into key/value blocks; non key/value lines are skipped.
pub fn parse_field_blocks(text: &str, separator: char) -> Vec<FieldBlock> {
    let mut reader = BlockReader::new(separator);
    for line in text.lines() {
        reader.push_line(line);
    }
    reader.finish()
}
