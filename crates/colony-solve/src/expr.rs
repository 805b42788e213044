//! 受限算式求值
//!
//! 原始目錄的數值欄位允許以小型算式表示（例：`"24 / 16"`、
//! `"working_hours / 2"`）。文法固定為數字、已知名稱、四則運算
//! 與括號；引用範圍外的名稱一律拒絕，不做任何預設補值。

use colony_core::{PlanError, Result};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 求值範圍：名稱到數值的映射
pub type Scope = HashMap<String, Decimal>;

/// 對算式求值
pub fn evaluate(src: &str, scope: &Scope) -> Result<Decimal> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        src,
        tokens,
        pos: 0,
    };
    let value = parser.expression(scope)?;
    parser.expect_end()?;
    Ok(value)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Decimal),
    Name(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(src: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &src[start..end];
                let value = literal.parse::<Decimal>().map_err(|_| {
                    PlanError::BadFormula(format!("無法解析數字 `{}`（於 `{}`）", literal, src))
                })?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Name(src[start..end].to_string()));
            }
            c => {
                return Err(PlanError::BadFormula(format!(
                    "不允許的字元 `{}`（於 `{}`）",
                    c, src
                )));
            }
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    // expression := term (('+' | '-') term)*
    fn expression(&mut self, scope: &Scope) -> Result<Decimal> {
        let mut value = self.term(scope)?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term(scope)?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term(scope)?;
                }
                _ => return Ok(value),
            }
        }
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self, scope: &Scope) -> Result<Decimal> {
        let mut value = self.factor(scope)?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.factor(scope)?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let divisor = self.factor(scope)?;
                    if divisor.is_zero() {
                        return Err(PlanError::BadFormula(format!("除以零（於 `{}`）", self.src)));
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    // factor := NUMBER | NAME | '-' factor | '(' expression ')'
    fn factor(&mut self, scope: &Scope) -> Result<Decimal> {
        match self.peek().cloned() {
            Some(Token::Number(value)) => {
                self.pos += 1;
                Ok(value)
            }
            Some(Token::Name(name)) => {
                self.pos += 1;
                scope.get(&name).copied().ok_or_else(|| {
                    PlanError::BadFormula(format!("未知名稱 `{}`（於 `{}`）", name, self.src))
                })
            }
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.factor(scope)?)
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let value = self.expression(scope)?;
                match self.peek() {
                    Some(Token::RParen) => {
                        self.pos += 1;
                        Ok(value)
                    }
                    _ => Err(PlanError::BadFormula(format!("括號未閉合（於 `{}`）", self.src))),
                }
            }
            _ => Err(PlanError::BadFormula(format!("算式不完整（於 `{}`）", self.src))),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn expect_end(&self) -> Result<()> {
        if self.pos == self.tokens.len() {
            Ok(())
        } else {
            Err(PlanError::BadFormula(format!("多餘的記號（於 `{}`）", self.src)))
        }
    }
}
