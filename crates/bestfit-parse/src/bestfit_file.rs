//! Parser for Windows best-fit code page files.
//!
//! The files (`bestfit1252.txt`, `bestfit932.txt`, ...) are line-oriented.
//! A keyword line opens a section and declares how many data lines follow;
//! data lines are two numbers; anything after `;` is a comment:
//!
//! ```text
//! CODEPAGE 1252
//! CPINFO 1 0x3f 0x003f
//! MBTABLE 2
//! 0x41 0x0041
//! 0x96 0x2013
//! WCTABLE 2
//! 0x0100 0x41   ;Latin Capital Letter A With Macron
//! 0x2013 0x96
//! ENDCODEPAGE
//! ```
//!
//! Double-byte code pages add a `DBCSRANGE n` block: each of its `n` range
//! lines names lead bytes `lo hi`, and each lead byte in turn gets its own
//! `DBCSTABLE` section of trail byte → Unicode lines.

use std::collections::{BTreeMap, VecDeque};

use bestfit_core::{BestFitPair, LoadOptions, MappingTable};

use crate::code_page::{decode_target, encoding_for_code_page};
use crate::error::{ParseError, syntax};

/// The parsed contents of one best-fit file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestFitFile {
    /// Code page from the `CODEPAGE` header.
    pub code_page: u16,
    /// Maximum bytes per character from `CPINFO` (1 when absent).
    pub max_char_size: u8,
    /// Unicode default character from `CPINFO`, if given.
    pub default_char: Option<char>,
    /// Byte sequence → UTF-16 code unit, from `MBTABLE` and `DBCSTABLE`.
    /// Double-byte keys carry the lead byte in the high octet.
    pub multi_byte: BTreeMap<u16, u16>,
    /// UTF-16 code unit → byte sequence, from `WCTABLE`, in file order.
    pub wide_char: Vec<(u16, u16)>,
}

impl BestFitFile {
    /// Derive the Unicode → Unicode best-fit table.
    ///
    /// Each `WCTABLE` target is decoded back to a character, through the
    /// file's own multi-byte tables first and the code page's decoder
    /// otherwise. Entries that decode to their own source are exact
    /// mappings and are left out, as are surrogate sources and targets that
    /// do not decode. When a source appears twice the first entry wins.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnsupportedCodePage`] if a target is missing
    /// from the file and the code page has no decoder.
    pub fn mapping_table(&self) -> Result<MappingTable, ParseError> {
        let mut pairs = Vec::new();
        for &(source, target) in &self.wide_char {
            if (0xD800..=0xDFFF).contains(&source) {
                continue;
            }
            let Some(replacement) = self.decode(target)? else {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    code_page = self.code_page,
                    source,
                    target,
                    "best-fit target does not decode, skipping"
                );
                continue;
            };
            if u32::from(replacement) != u32::from(source) {
                pairs.push(BestFitPair::new(source, replacement));
            }
        }

        // stable sort keeps file order among duplicates
        pairs.sort_by_key(|pair| pair.source);
        pairs.dedup_by_key(|pair| pair.source);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            code_page = self.code_page,
            wctable = self.wide_char.len(),
            best_fit = pairs.len(),
            "derived best-fit table"
        );
        Ok(MappingTable::from_pairs(pairs))
    }

    fn decode(&self, target: u16) -> Result<Option<char>, ParseError> {
        if let Some(&unit) = self.multi_byte.get(&target) {
            return Ok(char::from_u32(u32::from(unit)));
        }
        let encoding = encoding_for_code_page(self.code_page)
            .ok_or(ParseError::UnsupportedCodePage(self.code_page))?;
        Ok(decode_target(target, encoding))
    }
}

/// Parse the text of a best-fit file.
///
/// # Errors
///
/// Returns a [`ParseError`] for malformed lines, a missing `CODEPAGE`
/// header, sections over [`LoadOptions::max_table_entries`], and, with
/// [`LoadOptions::strict`], sections whose entry count differs from the
/// declared one or unknown keywords.
pub fn parse_bestfit(text: &str, options: &LoadOptions) -> Result<BestFitFile, ParseError> {
    let mut parser = Parser::new(options);
    let mut last_line = 0;
    for (index, raw) in text.lines().enumerate() {
        last_line = index + 1;
        parser.line(last_line, raw)?;
    }
    parser.finish(last_line)
}

/// Parse best-fit text for `code_page` and derive its mapping table.
///
/// # Errors
///
/// Returns [`ParseError::CodePageMismatch`] if the text describes another
/// code page, or any error from [`parse_bestfit`] and
/// [`BestFitFile::mapping_table`].
pub fn load_table(
    text: &str,
    code_page: u16,
    options: &LoadOptions,
) -> Result<MappingTable, ParseError> {
    let file = parse_bestfit(text, options)?;
    if file.code_page != code_page {
        return Err(ParseError::CodePageMismatch {
            expected: code_page,
            found: file.code_page,
        });
    }
    file.mapping_table()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    MultiByte,
    DbcsTable { lead: u8 },
    WideChar,
}

impl SectionKind {
    fn keyword(self) -> &'static str {
        match self {
            SectionKind::MultiByte => "MBTABLE",
            SectionKind::DbcsTable { .. } => "DBCSTABLE",
            SectionKind::WideChar => "WCTABLE",
        }
    }
}

#[derive(Debug)]
struct Section {
    kind: SectionKind,
    declared: usize,
    read: usize,
}

impl Section {
    fn is_full(&self) -> bool {
        self.read >= self.declared
    }
}

struct Parser<'o> {
    options: &'o LoadOptions,
    code_page: Option<u16>,
    max_char_size: u8,
    default_char: Option<char>,
    multi_byte: BTreeMap<u16, u16>,
    wide_char: Vec<(u16, u16)>,
    section: Option<Section>,
    /// Lead byte ranges still to come in the current DBCSRANGE block.
    ranges_left: usize,
    /// Lead bytes whose DBCSTABLE has not been seen yet.
    pending_leads: VecDeque<u8>,
    ended: bool,
}

impl<'o> Parser<'o> {
    fn new(options: &'o LoadOptions) -> Self {
        Self {
            options,
            code_page: None,
            max_char_size: 1,
            default_char: None,
            multi_byte: BTreeMap::new(),
            wide_char: Vec::new(),
            section: None,
            ranges_left: 0,
            pending_leads: VecDeque::new(),
            ended: false,
        }
    }

    fn line(&mut self, line: usize, raw: &str) -> Result<(), ParseError> {
        let content = match raw.find(';') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();
        if content.is_empty() || self.ended {
            return Ok(());
        }

        let mut tokens = content.split_whitespace();
        let Some(first) = tokens.next() else {
            return Ok(());
        };

        if first.starts_with(|c: char| c.is_ascii_alphabetic()) {
            let args: Vec<&str> = tokens.collect();
            self.keyword(line, first, &args)
        } else {
            let second = tokens
                .next()
                .ok_or_else(|| syntax(line, "expected two values"))?;
            let a = parse_u16(line, first)?;
            let b = parse_u16(line, second)?;
            self.data(line, a, b)
        }
    }

    fn keyword(&mut self, line: usize, keyword: &str, args: &[&str]) -> Result<(), ParseError> {
        match keyword.to_ascii_uppercase().as_str() {
            "CODEPAGE" => {
                self.close_section()?;
                self.code_page = Some(parse_u16(line, arg(line, keyword, args, 0)?)?);
            }
            "CPINFO" => {
                self.close_section()?;
                let size = parse_number(line, arg(line, keyword, args, 0)?)?;
                self.max_char_size = u8::try_from(size)
                    .ok()
                    .filter(|size| (1..=2).contains(size))
                    .ok_or_else(|| syntax(line, format!("invalid character size {size}")))?;
                if let Some(unicode) = args.get(2) {
                    let unit = parse_u16(line, unicode)?;
                    self.default_char = char::from_u32(u32::from(unit));
                }
            }
            "MBTABLE" => self.open(line, SectionKind::MultiByte, args)?,
            "DBCSRANGE" => {
                self.close_section()?;
                self.ranges_left = parse_number(line, arg(line, keyword, args, 0)?)?;
            }
            "DBCSTABLE" => {
                let lead = self
                    .pending_leads
                    .pop_front()
                    .ok_or_else(|| syntax(line, "DBCSTABLE without a pending lead byte"))?;
                self.open(line, SectionKind::DbcsTable { lead }, args)?;
            }
            "WCTABLE" => self.open(line, SectionKind::WideChar, args)?,
            "ENDCODEPAGE" => {
                self.close_section()?;
                self.ended = true;
            }
            _ if self.options.strict => {
                return Err(syntax(line, format!("unknown keyword {keyword}")));
            }
            _ => {
                #[cfg(feature = "tracing")]
                tracing::warn!(line, keyword, "ignoring unknown best-fit keyword");
            }
        }
        Ok(())
    }

    fn open(&mut self, line: usize, kind: SectionKind, args: &[&str]) -> Result<(), ParseError> {
        self.close_section()?;
        let declared = parse_number(line, arg(line, kind.keyword(), args, 0)?)?;
        self.check_limit(kind, declared)?;
        self.section = Some(Section {
            kind,
            declared,
            read: 0,
        });
        Ok(())
    }

    fn data(&mut self, line: usize, a: u16, b: u16) -> Result<(), ParseError> {
        let full = self.section.as_ref().is_none_or(Section::is_full);
        // lenient parsing treats a line that cannot be a lead byte range as
        // an overrun of the current section
        let range_like = self.options.strict || (a <= b && b <= 0xFF);
        if full && range_like && self.ranges_left > 0 && self.pending_leads.is_empty() {
            return self.lead_range(line, a, b);
        }

        let strict = self.options.strict;
        let Some(section) = self.section.as_mut() else {
            return Err(syntax(line, "data line outside a table section"));
        };
        if strict && section.is_full() {
            return Err(ParseError::CountMismatch {
                section: section.kind.keyword(),
                declared: section.declared,
                actual: section.read + 1,
            });
        }
        section.read += 1;
        let (kind, read) = (section.kind, section.read);
        self.check_limit(kind, read)?;

        match kind {
            SectionKind::MultiByte => {
                self.multi_byte.insert(a, b);
            }
            SectionKind::DbcsTable { lead } => {
                let trail = u8::try_from(a)
                    .map_err(|_| syntax(line, format!("trail byte 0x{a:X} out of range")))?;
                self.multi_byte.insert(u16::from_be_bytes([lead, trail]), b);
            }
            SectionKind::WideChar => self.wide_char.push((a, b)),
        }
        Ok(())
    }

    fn lead_range(&mut self, line: usize, lo: u16, hi: u16) -> Result<(), ParseError> {
        self.close_section()?;
        let (Ok(lo), Ok(hi)) = (u8::try_from(lo), u8::try_from(hi)) else {
            return Err(syntax(line, "lead byte range out of byte range"));
        };
        if lo > hi {
            return Err(syntax(line, format!("empty lead byte range 0x{lo:X}..0x{hi:X}")));
        }
        self.ranges_left -= 1;
        self.pending_leads.extend(lo..=hi);
        Ok(())
    }

    fn check_limit(&self, kind: SectionKind, count: usize) -> Result<(), ParseError> {
        let limit = self.options.max_table_entries;
        if count > limit {
            return Err(ParseError::LimitExceeded {
                section: kind.keyword(),
                limit,
                actual: count,
            });
        }
        Ok(())
    }

    fn close_section(&mut self) -> Result<(), ParseError> {
        let Some(section) = self.section.take() else {
            return Ok(());
        };
        if section.read != section.declared {
            if self.options.strict {
                return Err(ParseError::CountMismatch {
                    section: section.kind.keyword(),
                    declared: section.declared,
                    actual: section.read,
                });
            }
            #[cfg(feature = "tracing")]
            tracing::warn!(
                section = section.kind.keyword(),
                declared = section.declared,
                actual = section.read,
                "best-fit section count mismatch"
            );
        }
        Ok(())
    }

    fn finish(mut self, last_line: usize) -> Result<BestFitFile, ParseError> {
        self.close_section()?;
        if self.options.strict && (self.ranges_left > 0 || !self.pending_leads.is_empty()) {
            return Err(syntax(last_line, "unfinished DBCSRANGE block"));
        }
        let code_page = self.code_page.ok_or(ParseError::MissingCodePage)?;
        Ok(BestFitFile {
            code_page,
            max_char_size: self.max_char_size,
            default_char: self.default_char,
            multi_byte: self.multi_byte,
            wide_char: self.wide_char,
        })
    }
}

fn arg<'a>(
    line: usize,
    keyword: &str,
    args: &[&'a str],
    index: usize,
) -> Result<&'a str, ParseError> {
    args.get(index)
        .copied()
        .ok_or_else(|| syntax(line, format!("{keyword} is missing argument {}", index + 1)))
}

/// Parse a hex (`0x`-prefixed) or decimal number.
fn parse_number(line: usize, token: &str) -> Result<usize, ParseError> {
    let parsed = match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => token.parse(),
    };
    parsed.map_err(|_| syntax(line, format!("invalid number {token:?}")))
}

fn parse_u16(line: usize, token: &str) -> Result<u16, ParseError> {
    let value = parse_number(line, token)?;
    u16::try_from(value).map_err(|_| syntax(line, format!("value {token} exceeds 0xFFFF")))
}
