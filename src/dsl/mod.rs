//! Design file language.
//!
//! A line-oriented text format describing one converter design. Values
//! are in SI base units and accept the usual unit prefixes, so a design can
//! be written the way it reads on a schematic.
//!
//! # Grammar Overview
//!
//! ```text
//! design      = { line }
//! line        = comment | directive | assignment | empty
//! comment     = ('#' | ';') { any_char }
//! directive   = ".topology" name
//!             | ".timer" { setting '=' value }
//! assignment  = key value
//!
//! name        = "boost" | "buck" | "flyback" | "step-up" | "step-down"
//! setting     = "clock" | "psc" | "arr"
//! value       = number [unit_suffix] ['%']
//! unit_suffix = 'p' | 'n' | 'u' | 'µ' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! A `%` sign is only accepted on the boost `ripple_i` / `ripple_v`
//! tolerances. Anywhere else it is a parse error.
//!
//! # Parameters
//!
//! | Key | Meaning | Topologies |
//! |-----|---------|------------|
//! | `vin` | Input voltage (V) | all |
//! | `vout` | Output voltage (V) | all |
//! | `fsw` / `f` | Switching frequency (Hz) | all |
//! | `iout` | Load current (A) | all |
//! | `l` | Inductance (H) | boost, buck |
//! | `c` | Output capacitance (F) | boost, buck |
//! | `ripple_i` | Inductor ripple tolerance: % of Iout (boost), A (buck) | boost, buck |
//! | `ripple_v` | Output ripple tolerance: % of Vout (boost), V (buck) | boost, buck |
//! | `lm` | Magnetizing inductance (H) | flyback |
//! | `n` | Turns ratio Ns/Np | flyback |
//!
//! # Example
//!
//! ```text
//! # 28 V -> 82 V boost stage
//! .topology boost
//! .timer clock=72M
//!
//! vin      28
//! vout     82
//! fsw      8k
//! l        33u
//! c        470u
//! iout     10
//! ripple_i 20%
//! ripple_v 1%
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a design string into an AST.
pub fn parse(input: &str) -> Result<DesignAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a design file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<DesignAst> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::SmpsError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
