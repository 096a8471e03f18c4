use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use log::debug;

const SEPARATORS: [char; 3] = [' ', '\t', '\x0c'];

/// A plain key-value text store using the line oriented `key=value` property file format.
///
/// Every string survives a `store`/`load` cycle byte for byte: separators, comment
/// markers, control characters, leading spaces and non ASCII characters are escaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, returning the previous value if there was one.
    pub fn set<K, V>(&mut self, key: K, value: V) -> Option<String>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Writes every entry, in key order, to `writer`.
    ///
    /// # Arguments
    /// * `writer` - Where to write the properties to.
    /// * `comments` - A header, each of its lines is written as a comment.
    pub fn store<W: Write>(&self, mut writer: W, comments: &str) -> io::Result<()> {
        for line in comments.lines() {
            writeln!(writer, "#{line}")?;
        }

        for (key, value) in &self.entries {
            writeln!(writer, "{}={}", escape(key, true), escape(value, false))?;
        }

        writer.flush()
    }

    /// Reads entries from `reader`, replacing the value of keys that already exist.
    ///
    /// # Errors
    /// Fails on io errors and on malformed `\uXXXX` escapes.
    pub fn load<R: BufRead>(&mut self, reader: R) -> io::Result<()> {
        let mut lines = reader.lines();

        while let Some(line) = lines.next() {
            let line = line?;
            let mut logical = line.trim_start_matches(SEPARATORS).to_string();

            if logical.is_empty() || logical.starts_with(['#', '!']) {
                continue;
            }

            while continues(&logical) {
                logical.pop();

                match lines.next() {
                    Some(next) => logical.push_str(next?.trim_start_matches(SEPARATORS)),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            let (key, value) = (unescape(key)?, unescape(value)?);

            debug!(key = key.as_str(), len = value.len(); "loaded property");
            self.entries.insert(key, value);
        }

        Ok(())
    }

    /// Stores the properties into the file at `path`, creating or truncating it.
    pub fn save<P: AsRef<Path>>(&self, path: P, comments: &str) -> io::Result<()> {
        let file = File::create(path)?;
        self.store(BufWriter::new(file), comments)
    }

    /// Loads the properties stored in the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut props = Self::new();
        props.load(BufReader::new(file))?;
        Ok(props)
    }
}

/// Whether a line ends with an odd amount of backslashes, i.e. continues on the next one.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Splits a logical line into its raw (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }

        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let rest = line[key_end..].trim_start_matches(SEPARATORS);
    let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest);
    (&line[..key_end], rest.trim_start_matches(SEPARATORS))
}

fn escape(s: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(s.len() * 2);

    for (i, c) in s.chars().enumerate() {
        match c {
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            c if c < '\x20' || c > '\x7e' => {
                let mut buf = [0; 2];
                for unit in c.encode_utf16(&mut buf).iter() {
                    out.push_str(&format!("\\u{unit:04X}"));
                }
            }
            c => out.push(c),
        }
    }

    out
}

fn unescape(s: &str) -> io::Result<String> {
    let mut units: Vec<u16> = Vec::with_capacity(s.len());
    let mut buf = [0; 2];
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            units.extend_from_slice(c.encode_utf16(&mut buf));
            continue;
        }

        let Some(c) = chars.next() else {
            break;
        };

        match c {
            't' => units.push('\t' as u16),
            'n' => units.push('\n' as u16),
            'r' => units.push('\r' as u16),
            'f' => units.push(0x0c),
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                let unit = (hex.len() == 4)
                    .then(|| u16::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .ok_or_else(|| {
                        io::Error::new(
                            io::ErrorKind::InvalidData,
                            format!("malformed \\uxxxx escape: \\u{hex}"),
                        )
                    })?;
                units.push(unit);
            }
            other => units.extend_from_slice(other.encode_utf16(&mut buf)),
        }
    }

    String::from_utf16(&units).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
