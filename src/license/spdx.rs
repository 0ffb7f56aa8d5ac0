use std::sync::LazyLock;

use regex::Regex;

static TRAILING_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*/\s]+$").unwrap());

/// Trim an identifier taken from a comment line, dropping trailing `*/` and whitespace.
pub fn clean_license_id(raw: &str) -> String {
    TRAILING_COMMENT.replace(raw.trim(), "").into_owned()
}

/// Tokens of an SPDX license expression.
#[derive(Debug, PartialEq, Clone)]
enum Token {
    Id(String),
    Operator,
    LParen,
    RParen,
}

/// Tokenize an SPDX license expression. `AND`, `OR` and `WITH` are matched
/// case-insensitively.
fn tokenize(expr: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '(' {
            tokens.push(Token::LParen);
            chars.next();
        } else if c == ')' {
            tokens.push(Token::RParen);
            chars.next();
        } else {
            let mut s = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || c == '(' || c == ')' {
                    break;
                }
                s.push(c);
                chars.next();
            }
            let token = match s.to_ascii_uppercase().as_str() {
                "AND" | "OR" | "WITH" => Token::Operator,
                _ => Token::Id(s),
            };
            tokens.push(token);
        }
    }
    tokens
}

/// Individual identifiers of a possibly compound expression, in order, without repeats.
///
/// `Apache-2.0 WITH LLVM-exception OR MIT` → `["Apache-2.0", "LLVM-exception", "MIT"]`
pub fn license_components(expr: &str) -> Vec<String> {
    let mut components: Vec<String> = Vec::new();
    for token in tokenize(expr) {
        if let Token::Id(id) = token {
            if !components.contains(&id) {
                components.push(id);
            }
        }
    }
    if components.is_empty() && !expr.trim().is_empty() {
        components.push(expr.trim().to_string());
    }
    components
}
