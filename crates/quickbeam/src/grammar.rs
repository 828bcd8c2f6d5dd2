//! Grammar adapter
//!
//! Expression text is tokenized and parsed by `syn`'s expression grammar.
//! This module is the only place that calls into it.
//!
//! `syn` is a recursive-descent parser with no depth limit of its own, so
//! text is first measured by [`nesting_depth`] and the grammar then runs on a
//! stack sized for that depth (see [`with_stack_for`]).

use crate::error::{ParseError, Result, SourceLocation};

/// Stack reserved for every nesting level while parsing and transforming.
const STACK_PER_LEVEL: usize = 32 * 1024;

/// Stack reserved regardless of nesting.
const BASE_STACK: usize = 256 * 1024;

/// Two-character operators that count as a single nesting step.
const PAIRED_OPERATORS: [(char, char); 10] = [
    ('&', '&'),
    ('|', '|'),
    ('=', '='),
    ('!', '='),
    ('<', '='),
    ('>', '='),
    ('<', '<'),
    ('>', '>'),
    ('.', '.'),
    (':', ':'),
];

fn is_operator(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '%' | '!' | '&' | '|' | '^' | '<' | '>' | '=' | '.' | ':' | '?'
    )
}

/// One bracket level of the nesting scan.
///
/// `ops` counts operators in the current comma-separated item, `inner` is
/// the deepest bracket group inside that item, `widest` the largest item
/// seen so far at this level.
#[derive(Debug, Default)]
struct Level {
    ops: usize,
    inner: usize,
    widest: usize,
}

impl Level {
    fn span(&self) -> usize {
        self.ops + self.inner
    }

    fn depth(&self) -> usize {
        self.widest.max(self.span()) + 1
    }
}

/// Upper bound on the nesting depth `text` produces, or
/// [`ParseError::TooDeep`] once that bound passes `max_depth`.
///
/// Every bracket group, prefix or infix operator and postfix access adds a
/// level to the items that contain it; commas start a new item at the same
/// level. String and character literals are skipped. Two-character
/// operators such as `&&` count once even where the grammar reads them as
/// two prefix operators; the per-level stack budget absorbs that.
pub fn nesting_depth(text: &str, max_depth: usize) -> Result<usize> {
    // The root node sits at depth zero, so `max_depth + 1` levels are allowed.
    let limit = max_depth.saturating_add(1);
    let too_deep = |line, column| ParseError::TooDeep {
        limit: max_depth,
        location: Some(SourceLocation::new(line, column)),
    };

    let mut stack = vec![Level::default()];
    let mut path = 1;
    let mut after_operand = false;
    let mut previous_operator: Option<char> = None;
    let (mut line, mut column) = (1, 0);

    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }

        if is_operator(c) {
            let paired = previous_operator
                .is_some_and(|prev| PAIRED_OPERATORS.contains(&(prev, c)));
            previous_operator = if paired { None } else { Some(c) };
            if !paired {
                if let Some(level) = stack.last_mut() {
                    level.ops += 1;
                }
                path += 1;
            }
            after_operand = false;
        } else {
            previous_operator = None;
            match c {
                '(' | '[' | '{' => {
                    if after_operand {
                        // Call or index on the preceding operand.
                        if let Some(level) = stack.last_mut() {
                            level.ops += 1;
                        }
                        path += 1;
                    }
                    stack.push(Level::default());
                    path += 1;
                    after_operand = false;
                }
                ')' | ']' | '}' if stack.len() > 1 => {
                    if let Some(group) = stack.pop() {
                        path -= group.span() + 1;
                        let depth = group.depth();
                        if let Some(level) = stack.last_mut() {
                            if depth > level.inner {
                                path += depth - level.inner;
                                level.inner = depth;
                            }
                        }
                    }
                    after_operand = true;
                }
                ',' | ';' => {
                    if let Some(level) = stack.last_mut() {
                        path -= level.span();
                        level.widest = level.widest.max(level.span());
                        level.ops = 0;
                        level.inner = 0;
                    }
                    after_operand = false;
                }
                '"' | '\'' => {
                    skip_quoted(&mut chars, c, &mut line, &mut column);
                    after_operand = true;
                }
                c if c.is_whitespace() => {}
                _ => after_operand = true,
            }
        }

        if path > limit {
            return Err(too_deep(line, column));
        }
    }

    let depth = stack.first().map_or(1, Level::depth);
    if depth > limit {
        return Err(too_deep(line, column));
    }
    Ok(depth)
}

/// Advance past a quoted literal whose opening `quote` was just consumed.
fn skip_quoted(chars: &mut std::str::Chars<'_>, quote: char, line: &mut usize, column: &mut usize) {
    let mut escaped = false;
    for c in chars.by_ref() {
        if c == '\n' {
            *line += 1;
            *column = 0;
        } else {
            *column += 1;
        }
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return;
        }
    }
}

/// Run `f` with enough stack for input nested `depth` levels deep.
///
/// The current stack is used when it has room; otherwise `f` runs on a
/// freshly allocated segment on the same thread.
pub fn with_stack_for<R>(depth: usize, f: impl FnOnce() -> R) -> R {
    let needed = STACK_PER_LEVEL
        .saturating_mul(depth)
        .saturating_add(BASE_STACK);
    stacker::maybe_grow(needed, needed, f)
}

/// Parse `text` into a concrete syntax tree.
///
/// No recovery is attempted: malformed text is a [`ParseError::Syntax`].
/// Callers bound the nesting first with [`nesting_depth`].
pub fn parse_syntax(text: &str) -> Result<syn::Expr> {
    syn::parse_str::<syn::Expr>(text).map_err(|e| {
        let mut message = e.to_string();
        if has_long_single_quoted(text) {
            message.push_str(SINGLE_QUOTE_HINT);
        }
        ParseError::Syntax {
            message,
            location: Some(SourceLocation::from_span(e.span())),
        }
    })
}

/// Appended to grammar errors caused by multi-character single-quoted text.
const SINGLE_QUOTE_HINT: &str =
    " (single-quoted strings hold exactly one character; use double quotes for longer text)";

/// Whether `text` has a single-quoted run longer than one character.
fn has_long_single_quoted(text: &str) -> bool {
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                let (mut line, mut column) = (0, 0);
                skip_quoted(&mut chars, '"', &mut line, &mut column);
            }
            '\'' => {
                let mut len = 0;
                let mut escaped = false;
                for c in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                        continue;
                    } else if c == '\'' {
                        break;
                    }
                    len += 1;
                }
                if len > 1 {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}
