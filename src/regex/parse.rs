//! Concrete-syntax front end: lowers `regex-syntax`'s parsed syntax tree
//! into the five-node pattern language, rejecting everything outside it.
//!
//! The lowering starts from the `ast` layer rather than the Hir one: the
//! Hir translator normalizes `a|b` into a character class, which this
//! language does not have, while the ast keeps the alternation intact.

use std::error::Error;
use std::fmt;

use regex_syntax::ast::parse::Parser;
use regex_syntax::ast::Ast as LibAst;
use regex_syntax::ast::RepetitionKind as LibRepKind;

use super::Pattern;

/// An error returned when a pattern string cannot be turned into the
/// five-operator language.
#[derive(Debug)]
pub enum ParseError {
    /// The string is not valid regex syntax at all.
    Syntax(Box<regex_syntax::ast::Error>),
    /// The string parses, but uses a construct the language does not
    /// have (character classes, anchors, bounded repetition, ...).
    Unsupported(&'static str),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::Syntax(err) => write!(f, "invalid pattern syntax: {}", err),
            ParseError::Unsupported(what) => {
                write!(f, "unsupported pattern construct: {}", what)
            }
        }
    }
}

impl Error for ParseError {}

impl Pattern {
    /// Parse a pattern string. Only the empty pattern, literal symbols,
    /// concatenation, `|` and `*` are accepted; groups are transparent
    /// and exist only to override precedence.
    pub fn parse(pattern: &str) -> Result<Pattern, ParseError> {
        let ast = Parser::new()
            .parse(pattern)
            .map_err(|err| ParseError::Syntax(Box::new(err)))?;
        Pattern::from_lib_ast(&ast)
    }

    // Recursion stays by reference: the library's Ast implements Drop,
    // so its variants cannot be moved out of.
    fn from_lib_ast(ast: &LibAst) -> Result<Pattern, ParseError> {
        match ast {
            LibAst::Empty(_) => Ok(Pattern::Empty),

            LibAst::Literal(literal) => Ok(Pattern::literal(literal.c)),

            LibAst::Concat(concat) => Pattern::fold(&concat.asts, Pattern::concatenate),

            LibAst::Alternation(alternation) => {
                Pattern::fold(&alternation.asts, Pattern::choose)
            }

            LibAst::Repetition(repetition) => match &repetition.op.kind {
                LibRepKind::ZeroOrMore => {
                    Ok(Pattern::repeat(Pattern::from_lib_ast(&repetition.ast)?))
                }
                LibRepKind::ZeroOrOne => Err(ParseError::Unsupported("`?` repetition")),
                LibRepKind::OneOrMore => Err(ParseError::Unsupported("`+` repetition")),
                LibRepKind::Range(_) => Err(ParseError::Unsupported("bounded repetition")),
            },

            // Captures have no meaning in an acceptance-only matcher, so
            // every group kind is transparent.
            LibAst::Group(group) => Pattern::from_lib_ast(&group.ast),

            LibAst::Class(_) => Err(ParseError::Unsupported("character class")),
            LibAst::Dot(_) => Err(ParseError::Unsupported("`.` wildcard")),
            LibAst::Assertion(_) => Err(ParseError::Unsupported("anchor or word boundary")),
            LibAst::Flags(_) => Err(ParseError::Unsupported("inline flags")),
        }
    }

    // Left-fold a flat n-ary node into the binary AST.
    fn fold(
        sub: &[LibAst],
        combine: fn(Pattern, Pattern) -> Pattern,
    ) -> Result<Pattern, ParseError> {
        let mut branches = sub.iter();
        let first = match branches.next() {
            Some(ast) => Pattern::from_lib_ast(ast)?,
            None => return Ok(Pattern::Empty),
        };
        branches.try_fold(first, |acc, ast| {
            Ok(combine(acc, Pattern::from_lib_ast(ast)?))
        })
    }
}
