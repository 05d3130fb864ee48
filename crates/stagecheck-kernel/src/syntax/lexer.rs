//! Comment blanking for TypeScript/JavaScript source.
//!
//! Extraction is pattern based, so a commented-out `import` or `export` would
//! otherwise contribute symbols and references. [`strip_comments`] replaces
//! every comment character with a space and keeps newlines, so line numbers
//! computed on the result match the original file.
//!
//! String and template literals are copied through untouched. Quoted strings
//! end at a newline, which bounds the damage of a stray apostrophe in JSX
//! text to one line.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    Quoted(char),
    Template,
}

/// Return `source` with all comments replaced by whitespace.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    // Brace depth of each open `${` inside a template literal.
    let mut template_braces: Vec<usize> = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::BlockComment;
                }
                '\\' => {
                    // Escaped character outside a string (regex literal).
                    out.push(c);
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                '\'' | '"' => {
                    out.push(c);
                    state = State::Quoted(c);
                }
                '`' => {
                    out.push(c);
                    state = State::Template;
                }
                '{' => {
                    if let Some(depth) = template_braces.last_mut() {
                        *depth += 1;
                    }
                    out.push(c);
                }
                '}' => {
                    out.push(c);
                    match template_braces.last_mut() {
                        Some(0) => {
                            template_braces.pop();
                            state = State::Template;
                        }
                        Some(depth) => *depth -= 1,
                        None => {}
                    }
                }
                _ => out.push(c),
            },
            State::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    out.push(' ');
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else if c == '\n' {
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            State::Quoted(quote) => {
                out.push(c);
                if c == '\\' {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                } else if c == quote || c == '\n' {
                    state = State::Code;
                }
            }
            State::Template => {
                out.push(c);
                if c == '\\' {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                } else if c == '`' {
                    state = State::Code;
                } else if c == '$' && chars.peek() == Some(&'{') {
                    if let Some(brace) = chars.next() {
                        out.push(brace);
                    }
                    template_braces.push(0);
                    state = State::Code;
                }
            }
        }
    }

    out
}
