//! Comment stripping and whitespace collapsing for style/script text.
//!
//! Two strategies share one contract (text in, text out, no I/O):
//! - [`minify_regex`]: three regular-expression rewrites with no notion of
//!   string literals. Comment-like tokens inside strings are removed too.
//! - [`minify_lexical`]: a small scanner that skips over string, template
//!   and regex literals before removing comments. Best-effort, not a parser.

use std::sync::LazyLock;

use regex::Regex;

use crate::spec::EnumMinifyMode;

static RE_BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));
static RE_LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//[^\r\n]*").expect("valid regex"));
static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Characters after which a `/` opens a regex literal rather than dividing.
const CHARS_BEFORE_REGEX_LITERAL: &str = "(,=:[!&|?{};+-*%<>~^";

/// Literal syntax recognized by [`minify_lexical`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumTextDialect {
    /// Stylesheets: single and double quoted strings.
    Style,
    /// Scripts: quoted strings, template literals, regex literals.
    Script,
}

impl EnumTextDialect {
    /// Dialect for a lowercased extension; unknown extensions read as script.
    pub fn from_extension(ext_lower: &str) -> Self {
        match ext_lower {
            "css" => Self::Style,
            _ => Self::Script,
        }
    }
}

/// Minify `content` with the selected strategy.
pub fn minify_content(
    content: &str,
    rule_minify: EnumMinifyMode,
    enum_dialect: EnumTextDialect,
) -> String {
    match rule_minify {
        EnumMinifyMode::Regex => minify_regex(content),
        EnumMinifyMode::Lexical => minify_lexical(content, enum_dialect),
    }
}

/// Strip `/* */` and `//` comments, collapse whitespace runs, trim.
///
/// Each pass runs on the output of the previous one:
/// 1. block comments, shortest match, across lines;
/// 2. line comments up to (not including) the line break, `\n` or `\r`;
/// 3. every whitespace run becomes one space, then the result is trimmed.
pub fn minify_regex(content: &str) -> String {
    let content = RE_BLOCK_COMMENT.replace_all(content, "");
    let content = RE_LINE_COMMENT.replace_all(&content, "");
    let content = RE_WHITESPACE.replace_all(&content, " ");
    content.trim().to_string()
}

/// Same output as [`minify_regex`] for literal-free input, but comment
/// tokens and whitespace inside literals are left untouched.
///
/// Unterminated quoted strings end at the line break; an unterminated
/// template literal runs to end of input; an unterminated block comment is
/// removed to end of input. A `/` that cannot be closed on the same line is
/// treated as an operator.
pub fn minify_lexical(content: &str, enum_dialect: EnumTextDialect) -> String {
    let l_chars: Vec<char> = content.chars().collect();
    let mut writer = MinifyWriter::with_capacity(content.len());
    let b_is_script = enum_dialect == EnumTextDialect::Script;

    let mut n_idx = 0;
    while n_idx < l_chars.len() {
        let c_cur = l_chars[n_idx];
        let c_next = l_chars.get(n_idx + 1).copied();

        if c_cur.is_whitespace() {
            writer.mark_space();
            n_idx += 1;
        } else if c_cur == '/' && c_next == Some('*') {
            n_idx = skip_block_comment(&l_chars, n_idx + 2);
        } else if c_cur == '/' && c_next == Some('/') {
            n_idx = skip_line_comment(&l_chars, n_idx + 2);
        } else if c_cur == '"' || c_cur == '\'' || (b_is_script && c_cur == '`') {
            let n_end = scan_quoted(&l_chars, n_idx);
            writer.push_verbatim(&l_chars[n_idx..n_end]);
            n_idx = n_end;
        } else if c_cur == '/'
            && b_is_script
            && writer.allows_regex_literal()
            && let Some(n_end) = scan_regex_literal(&l_chars, n_idx)
        {
            writer.push_verbatim(&l_chars[n_idx..n_end]);
            n_idx = n_end;
        } else {
            writer.push(c_cur);
            n_idx += 1;
        }
    }

    writer.finish()
}

/// Output buffer that defers whitespace so runs collapse and edges trim.
#[derive(Debug)]
struct MinifyWriter {
    out: String,
    if_pending_space: bool,
    c_last_significant: Option<char>,
}

impl MinifyWriter {
    fn with_capacity(n_capacity: usize) -> Self {
        Self {
            out: String::with_capacity(n_capacity),
            if_pending_space: false,
            c_last_significant: None,
        }
    }

    fn mark_space(&mut self) {
        self.if_pending_space = true;
    }

    fn flush_space(&mut self) {
        if self.if_pending_space && !self.out.is_empty() {
            self.out.push(' ');
        }
        self.if_pending_space = false;
    }

    fn push(&mut self, c: char) {
        self.flush_space();
        self.out.push(c);
        self.c_last_significant = Some(c);
    }

    fn push_verbatim(&mut self, l_chars: &[char]) {
        if l_chars.is_empty() {
            return;
        }
        self.flush_space();
        self.out.extend(l_chars.iter());
        self.c_last_significant = l_chars.last().copied();
    }

    fn allows_regex_literal(&self) -> bool {
        match self.c_last_significant {
            None => true,
            Some(c) => CHARS_BEFORE_REGEX_LITERAL.contains(c),
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

fn skip_block_comment(l_chars: &[char], n_start: usize) -> usize {
    let mut n_idx = n_start;
    while n_idx + 1 < l_chars.len() {
        if l_chars[n_idx] == '*' && l_chars[n_idx + 1] == '/' {
            return n_idx + 2;
        }
        n_idx += 1;
    }
    l_chars.len()
}

fn skip_line_comment(l_chars: &[char], n_start: usize) -> usize {
    l_chars[n_start.min(l_chars.len())..]
        .iter()
        .position(|c| *c == '\n' || *c == '\r')
        .map_or(l_chars.len(), |n_off| n_start + n_off)
}

/// End index (exclusive) of the quoted literal opening at `n_start`.
fn scan_quoted(l_chars: &[char], n_start: usize) -> usize {
    let c_quote = l_chars[n_start];
    let mut n_idx = n_start + 1;
    while n_idx < l_chars.len() {
        match l_chars[n_idx] {
            '\\' => n_idx += 2,
            c if c == c_quote => return n_idx + 1,
            '\n' | '\r' if c_quote != '`' => return n_idx,
            _ => n_idx += 1,
        }
    }
    l_chars.len()
}

/// End index (exclusive) of the regex literal opening at `n_start`, or
/// `None` when no closing `/` exists on the same line.
fn scan_regex_literal(l_chars: &[char], n_start: usize) -> Option<usize> {
    let mut n_idx = n_start + 1;
    let mut if_in_class = false;
    while n_idx < l_chars.len() {
        match l_chars[n_idx] {
            '\\' => n_idx += 2,
            '\n' | '\r' => return None,
            '[' => {
                if_in_class = true;
                n_idx += 1;
            }
            ']' => {
                if_in_class = false;
                n_idx += 1;
            }
            '/' if !if_in_class => return Some(n_idx + 1),
            _ => n_idx += 1,
        }
    }
    None
}
