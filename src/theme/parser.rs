//! Recursive descent theme parser.
//!
//! Parses theme text into [`Section`]s of renderer properties using the
//! logos-based tokenizer from [`crate::theme::tokenizer`]:
//!
//! ```text
//! Button {
//!     BackgroundColor = #F5F5F5;
//!     Borders = (1, 1, 1, 1);
//!     TextColor : rgb(60, 60, 60);
//!     Texture = "button.png" Part(0, 0, 45, 50) Middle(10, 0, 25, 50) Smooth;
//! }
//! ```

use logos::Logos;

use crate::geometry::{PixelRect, Spacing};
use crate::renderer::{Color, RendererData, TextureRef, Value};

use super::tokenizer::{strip_comments, Token};

/// Errors from theme parsing. Lines are 1-based.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token on line {line}: {message}")]
    UnexpectedToken { line: usize, message: String },
    #[error("invalid value on line {line}: {message}")]
    InvalidValue { line: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
}

/// A named group of renderer properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: String,
    pub data: RendererData,
}

/// A token with the line it started on.
#[derive(Debug, Clone)]
struct PToken {
    token: Token,
    text: String,
    line: usize,
}

fn tokenize_with_lines(input: &str) -> Vec<PToken> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut scanned = 0;
    for (result, span) in Token::lexer(input).spanned() {
        line += input[scanned..span.start].matches('\n').count();
        scanned = span.start;
        if let Ok(token) = result {
            tokens.push(PToken { token, text: input[span].to_string(), line });
        }
    }
    tokens
}

/// Parse theme text into its sections, in source order.
pub fn parse_theme(input: &str) -> Result<Vec<Section>, ParseError> {
    let cleaned = strip_comments(input);
    let mut parser = Parser { tokens: tokenize_with_lines(&cleaned), cursor: 0 };

    let mut sections = Vec::new();
    while !parser.is_eof() {
        sections.push(parser.parse_section()?);
    }
    Ok(sections)
}

/// Recursive descent parser state.
struct Parser {
    tokens: Vec<PToken>,
    cursor: usize,
}

impl Parser {
    fn is_eof(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    fn peek(&self) -> Option<&PToken> {
        self.tokens.get(self.cursor)
    }

    fn peek_is(&self, token: &Token) -> bool {
        self.peek().is_some_and(|t| &t.token == token)
    }

    fn advance(&mut self) -> Option<PToken> {
        let tok = self.tokens.get(self.cursor).cloned();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    fn next_or_eof(&mut self, context: &str) -> Result<PToken, ParseError> {
        self.advance()
            .ok_or_else(|| ParseError::UnexpectedEof(format!("expected {context}")))
    }

    fn expect(&mut self, expected: &Token) -> Result<PToken, ParseError> {
        let tok = self.next_or_eof(&format!("{expected:?}"))?;
        if &tok.token == expected {
            Ok(tok)
        } else {
            Err(unexpected(&tok, &format!("{expected:?}")))
        }
    }

    /// `Name { Property = value; ... }`
    fn parse_section(&mut self) -> Result<Section, ParseError> {
        let name = self.expect(&Token::Ident)?.text;
        self.expect(&Token::BraceOpen)?;

        let mut data = RendererData::new();
        while !self.peek_is(&Token::BraceClose) {
            if self.is_eof() {
                return Err(ParseError::UnexpectedEof(format!("expected '}}' closing {name}")));
            }
            let (property, value) = self.parse_property()?;
            data.set(property, value);
        }
        self.expect(&Token::BraceClose)?;

        Ok(Section { name, data })
    }

    /// `Property = value;` (`:` is accepted in place of `=`).
    fn parse_property(&mut self) -> Result<(String, Value), ParseError> {
        let name = self.expect(&Token::Ident)?.text;
        let sep = self.next_or_eof("'=' or ':'")?;
        if !matches!(sep.token, Token::Equals | Token::Colon) {
            return Err(unexpected(&sep, "'=' or ':'"));
        }
        let value = self.parse_value(&name)?;
        self.expect(&Token::Semicolon)?;
        Ok((name, value))
    }

    fn parse_value(&mut self, property: &str) -> Result<Value, ParseError> {
        let tok = self.next_or_eof("a value")?;
        match tok.token {
            Token::HexColor => Color::from_hex(&tok.text[1..])
                .map(Value::Color)
                .ok_or_else(|| invalid(&tok, format!("'{}' is not a color", tok.text))),
            Token::Number => Ok(Value::Number(number(&tok)?)),
            Token::ParenOpen => self.parse_spacing(&tok).map(Value::Spacing),
            Token::StringLiteral => {
                let text = unquote(&tok.text);
                if property.starts_with("Texture") || self.peek_is_texture_option() {
                    self.parse_texture(text).map(Value::Texture)
                } else {
                    Ok(Value::String(text))
                }
            }
            Token::Ident => match tok.text.as_str() {
                "true" | "True" => Ok(Value::Bool(true)),
                "false" | "False" => Ok(Value::Bool(false)),
                "rgb" | "rgba" => self.parse_color_fn(&tok).map(Value::Color),
                name => Ok(Color::from_name(name)
                    .map(Value::Color)
                    .unwrap_or_else(|| Value::String(name.to_owned()))),
            },
            _ => Err(unexpected(&tok, "a value")),
        }
    }

    fn peek_is_texture_option(&self) -> bool {
        self.peek().is_some_and(|t| {
            t.token == Token::Ident && matches!(t.text.as_str(), "Part" | "Middle" | "Smooth" | "NoSmooth")
        })
    }

    /// Comma-separated numbers after an already consumed `(`.
    fn parse_number_list(&mut self) -> Result<Vec<f32>, ParseError> {
        let mut values = Vec::new();
        loop {
            let tok = self.expect(&Token::Number)?;
            values.push(number(&tok)?);
            let sep = self.next_or_eof("',' or ')'")?;
            match sep.token {
                Token::Comma => continue,
                Token::ParenClose => return Ok(values),
                _ => return Err(unexpected(&sep, "',' or ')'")),
            }
        }
    }

    /// `(all)`, `(horizontal, vertical)` or `(left, top, right, bottom)`.
    fn parse_spacing(&mut self, open: &PToken) -> Result<Spacing, ParseError> {
        match self.parse_number_list()?.as_slice() {
            [all] => Ok(Spacing::all(*all)),
            [h, v] => Ok(Spacing::symmetric(*h, *v)),
            [left, top, right, bottom] => Ok(Spacing::new(*left, *top, *right, *bottom)),
            other => Err(invalid(open, format!("spacing takes 1, 2 or 4 numbers, got {}", other.len()))),
        }
    }

    /// `rgb(r, g, b)` or `rgba(r, g, b, a)`, channels 0-255.
    fn parse_color_fn(&mut self, name: &PToken) -> Result<Color, ParseError> {
        self.expect(&Token::ParenOpen)?;
        let channels = self
            .parse_number_list()?
            .into_iter()
            .map(|v| {
                if (0.0..=255.0).contains(&v) {
                    Ok(v.round() as u8)
                } else {
                    Err(invalid(name, format!("color channel {v} is outside 0-255")))
                }
            })
            .collect::<Result<Vec<u8>, ParseError>>()?;
        match (name.text.as_str(), channels.as_slice()) {
            ("rgb", [r, g, b]) => Ok(Color::rgb(*r, *g, *b)),
            ("rgba", [r, g, b, a]) => Ok(Color::rgba(*r, *g, *b, *a)),
            (func, c) => Err(invalid(name, format!("{func}() does not take {} channels", c.len()))),
        }
    }

    /// `"id" [Part(x, y, w, h)] [Middle(x, y, w, h)] [Smooth | NoSmooth]`
    fn parse_texture(&mut self, id: String) -> Result<TextureRef, ParseError> {
        let mut texture = TextureRef::new(id);
        while self.peek_is_texture_option() {
            let tok = self.next_or_eof("a texture option")?;
            match tok.text.as_str() {
                "Part" => texture.part = Some(self.parse_rect(&tok)?),
                "Middle" => texture.middle = Some(self.parse_rect(&tok)?),
                "Smooth" => texture.smooth = true,
                _ => texture.smooth = false,
            }
        }
        Ok(texture)
    }

    fn parse_rect(&mut self, keyword: &PToken) -> Result<PixelRect, ParseError> {
        self.expect(&Token::ParenOpen)?;
        let values = self.parse_number_list()?;
        let [x, y, w, h] = values.as_slice() else {
            return Err(invalid(keyword, format!("{} takes 4 numbers", keyword.text)));
        };
        let to_u32 = |v: f32| {
            if v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f32 {
                Ok(v as u32)
            } else {
                Err(invalid(keyword, format!("{v} is not a pixel coordinate")))
            }
        };
        Ok(PixelRect::new(to_u32(*x)?, to_u32(*y)?, to_u32(*w)?, to_u32(*h)?))
    }
}

fn number(tok: &PToken) -> Result<f32, ParseError> {
    tok.text
        .parse::<f32>()
        .map_err(|_| invalid(tok, format!("'{}' is not a number", tok.text)))
}

fn unquote(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text);
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                result.push(escaped);
            }
        } else {
            result.push(c);
        }
    }
    result
}

fn unexpected(tok: &PToken, expected: &str) -> ParseError {
    ParseError::UnexpectedToken {
        line: tok.line,
        message: format!("expected {expected}, got {:?} '{}'", tok.token, tok.text),
    }
}

fn invalid(tok: &PToken, message: String) -> ParseError {
    ParseError::InvalidValue { line: tok.line, message }
}
