//! logos-based theme tokenizer.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `#fff` as HexColor beats an error on `#`)
//! 2. For equal length matches, earlier-defined variants win
//!
//! Comments are not tokens: [`strip_comments`] blanks them out first while
//! keeping byte offsets and line breaks intact.

use logos::Logos;

/// Theme token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    /// Hex color: `#fff`, `#ff00aa`, `#ff00aa80`.
    #[regex(r"#[0-9a-fA-F]{3,8}")]
    HexColor,

    /// Double-quoted string, backslash escapes allowed.
    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLiteral,

    /// Integer or float, possibly negative.
    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    /// Section names, property names, keywords, color names.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("=")]
    Equals,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,
}

/// Replace `//` line comments and `/* */` block comments with spaces.
///
/// Newlines inside block comments are kept so line numbers stay valid.
/// Comment markers inside string literals are left alone.
pub fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        result.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                result.push(' ');
                for next in chars.by_ref() {
                    if next == '\n' {
                        result.push('\n');
                        break;
                    }
                    result.extend(std::iter::repeat(' ').take(next.len_utf8()));
                }
            }
            ('/', Some('*')) => {
                chars.next();
                result.push_str("  ");
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        result.push('\n');
                    } else {
                        result.extend(std::iter::repeat(' ').take(next.len_utf8()));
                    }
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => result.push(c),
        }
    }

    result
}

/// Tokenize a theme string into `(Token, text)` pairs.
///
/// Characters that fail to lex are skipped.
pub fn tokenize(input: &str) -> Vec<(Token, String)> {
    Token::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, input[span].to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn punctuation() {
        assert_eq!(
            tokens("{ } ( ) = : ; ,"),
            vec![
                Token::BraceOpen,
                Token::BraceClose,
                Token::ParenOpen,
                Token::ParenClose,
                Token::Equals,
                Token::Colon,
                Token::Semicolon,
                Token::Comma,
            ]
        );
    }

    #[test]
    fn property_line() {
        let result = tokenize("BackgroundColor = #F5F5F5;");
        assert_eq!(result[0], (Token::Ident, "BackgroundColor".into()));
        assert_eq!(result[1], (Token::Equals, "=".into()));
        assert_eq!(result[2], (Token::HexColor, "#F5F5F5".into()));
        assert_eq!(result[3], (Token::Semicolon, ";".into()));
    }

    #[test]
    fn numbers() {
        let result = tokenize("10 -5 0.25");
        assert_eq!(result[0], (Token::Number, "10".into()));
        assert_eq!(result[1], (Token::Number, "-5".into()));
        assert_eq!(result[2], (Token::Number, "0.25".into()));
    }

    #[test]
    fn strings_with_escapes() {
        let result = tokenize(r#""a.png" "say \"hi\"""#);
        assert_eq!(result[0], (Token::StringLiteral, "\"a.png\"".into()));
        assert_eq!(result[1], (Token::StringLiteral, r#""say \"hi\"""#.into()));
    }

    #[test]
    fn strip_line_and_block_comments() {
        let input = "A { // note\n  B = 1; /* x\n y */ C = 2; }";
        let stripped = strip_comments(input);
        assert_eq!(stripped.len(), input.len());
        assert_eq!(stripped.lines().count(), input.lines().count());
        assert_eq!(
            tokens(&stripped),
            tokens("A { B = 1; C = 2; }")
        );
    }

    #[test]
    fn comment_markers_inside_strings_are_kept() {
        let stripped = strip_comments(r#"T = "http://host/a.png";"#);
        assert_eq!(stripped, r#"T = "http://host/a.png";"#);
    }

    #[test]
    fn unterminated_block_comment_consumes_rest() {
        assert!(tokens(&strip_comments("A { /* open")).len() == 2);
    }
}
