//! Parser for design files.

use std::collections::HashSet;

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::converter::Topology;
use crate::error::{Result, SmpsError};

/// Parser for design files.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire design description.
    pub fn parse(&mut self) -> Result<DesignAst> {
        let mut ast = DesignAst::new();
        let mut seen = HashSet::new();

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier => {
                    let param = self.parse_assignment()?;
                    if !seen.insert(param.name.clone()) {
                        return Err(SmpsError::DuplicateParameter {
                            param: param.name,
                            line: param.line,
                        });
                    }
                    ast.params.push(param);
                }
                _ => {
                    return Err(SmpsError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }

            // Each statement must end the line
            match self.current.kind {
                TokenKind::Newline => self.advance()?,
                TokenKind::Eof => {}
                _ => {
                    return Err(SmpsError::parse(
                        self.current.line,
                        format!("unexpected trailing token: {:?}", self.current.text),
                    ));
                }
            }
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(SmpsError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    /// Read a value, reporting whether it was written as a percentage.
    fn expect_value(&mut self, param: &str) -> Result<(f64, bool)> {
        let tok = self.expect(TokenKind::Number).map_err(|_| {
            SmpsError::parse(
                self.current.line,
                format!("expected a numeric value for '{}'", param),
            )
        })?;
        let (text, percent) = match tok.text.strip_suffix('%') {
            Some(text) => (text, true),
            None => (tok.text.as_str(), false),
        };
        let value = parse_value(text).ok_or_else(|| {
            SmpsError::parse(
                tok.line,
                format!("invalid number '{}' for '{}'", tok.text, param),
            )
        })?;
        Ok((value, percent))
    }

    fn parse_directive(&mut self, ast: &mut DesignAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".topology" => {
                let name = self.expect(TokenKind::Identifier)?.text;
                if ast.topology.is_some() {
                    return Err(SmpsError::parse(line, "topology specified twice"));
                }
                let topology = Topology::from_name(&name)
                    .ok_or(SmpsError::UnknownTopology { name, line })?;
                ast.topology = Some(topology);
            }
            ".timer" => {
                if ast.timer.is_some() {
                    return Err(SmpsError::parse(line, "timer specified twice"));
                }
                ast.timer = Some(self.parse_timer_def(line)?);
            }
            _ => {
                return Err(SmpsError::parse(
                    line,
                    format!("unknown directive: {}", directive),
                ));
            }
        }

        Ok(())
    }

    /// Parse `key=value` pairs: `clock`, `psc`, `arr`.
    fn parse_timer_def(&mut self, line: usize) -> Result<TimerDef> {
        let mut def = TimerDef {
            line,
            ..TimerDef::default()
        };

        while self.current.kind == TokenKind::Identifier {
            let key = self.expect(TokenKind::Identifier)?.text.to_lowercase();
            self.expect(TokenKind::Equals)?;
            let (value, percent) = self.expect_value(&key)?;
            if percent {
                return Err(SmpsError::parse(
                    line,
                    format!("timer setting '{}' cannot be a percentage", key),
                ));
            }

            let slot = match key.as_str() {
                "clock" | "fclk" => &mut def.clock,
                "psc" | "prescaler" => &mut def.prescaler,
                "arr" | "reload" => &mut def.reload,
                _ => {
                    return Err(SmpsError::parse(
                        line,
                        format!("unknown timer setting: {}", key),
                    ));
                }
            };
            if slot.replace(value).is_some() {
                return Err(SmpsError::parse(
                    line,
                    format!("timer setting '{}' given twice", key),
                ));
            }
        }

        Ok(def)
    }

    fn parse_assignment(&mut self) -> Result<ParamDef> {
        let tok = self.expect(TokenKind::Identifier)?;
        let name = tok.text.to_lowercase();
        let (value, percent) = self.expect_value(&name)?;
        Ok(ParamDef {
            name,
            value,
            percent,
            line: tok.line,
        })
    }
}
