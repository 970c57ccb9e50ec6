//! Textual signatures.
//!
//! Two notations are accepted:
//!
//! * readable: `(int, ref[]) -> long`
//! * JVM descriptor: `(I[Ljava/lang/Object;)J`
//!
//! Class names inside `L...;` are accepted but all collapse to
//! [`Kind::Reference`].

use crate::language::{errors::DescriptorError, kind::Kind, signature::Signature};
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{alpha1, alphanumeric0, char, multispace0, one_of},
    combinator::{map, opt, recognize},
    multi::many0_count,
    sequence::{delimited, pair, preceded},
    IResult,
};

const READABLE_HELP: &str = "Syntax: (<kind>, <kind>...) -> <kind>, e.g. (int, ref[]) -> long";
const DESCRIPTOR_HELP: &str = "Syntax: (<field>...)<return>, e.g. (I[Ljava/lang/Object;)J";

pub fn parse_signature(source: &str) -> Result<Signature, DescriptorError> {
    if source.contains("->") {
        parse_readable(source)
    } else {
        parse_descriptor(source)
    }
}

fn open_paren(input: &str) -> IResult<&str, char> {
    preceded(multispace0, char('('))(input)
}

fn close_paren(input: &str) -> IResult<&str, char> {
    preceded(multispace0, char(')'))(input)
}

fn comma(input: &str) -> IResult<&str, char> {
    preceded(multispace0, char(','))(input)
}

fn arrow(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, tag("->"))(input)
}

fn kind_name(input: &str) -> IResult<&str, (&str, bool)> {
    let (input, _) = multispace0(input)?;
    let (input, name) = recognize(pair(alpha1, alphanumeric0))(input)?;
    let (input, array) = opt(preceded(multispace0, tag("[]")))(input)?;
    Ok((input, (name, array.is_some())))
}

struct Cursor<'a> {
    source: &'a str,
}

impl<'a> Cursor<'a> {
    fn offset(&self, rest: &str) -> usize {
        self.source.len() - rest.len()
    }

    /// Span of the next non-whitespace token in `rest`, or an empty span at
    /// the end of input.
    fn span_at(&self, rest: &str) -> std::ops::Range<usize> {
        let trimmed = rest.trim_start();
        let start = self.offset(trimmed);
        let len = trimmed
            .find(|c: char| c.is_whitespace() || matches!(c, ',' | ')' | '('))
            .unwrap_or(trimmed.len())
            .max(usize::from(!trimmed.is_empty()));
        start..start + len
    }
}

fn parse_readable(source: &str) -> Result<Signature, DescriptorError> {
    let cursor = Cursor { source };
    let (mut rest, _) = open_paren(source).map_err(|_| {
        DescriptorError::new("expected `(` to open the parameter list", cursor.span_at(source))
            .with_help(READABLE_HELP)
    })?;

    let mut params = Vec::new();
    if let Ok((after, _)) = close_paren(rest) {
        rest = after;
    } else {
        loop {
            let span = cursor.span_at(rest);
            let (after, (name, array)) = kind_name(rest).map_err(|_| {
                DescriptorError::new("expected a parameter kind", span.clone())
                    .with_help(READABLE_HELP)
            })?;
            let span = cursor.offset(rest.trim_start())..cursor.offset(after);
            let kind = resolve_named(name, array, span.clone())?;
            if kind.is_void() {
                return Err(DescriptorError::new(
                    "`void` is not a valid parameter kind",
                    span,
                ));
            }
            params.push(kind);
            rest = after;
            if let Ok((after, _)) = comma(rest) {
                rest = after;
                continue;
            }
            let (after, _) = close_paren(rest).map_err(|_| {
                DescriptorError::new("expected `,` or `)` after parameter", cursor.span_at(rest))
                    .with_help(READABLE_HELP)
            })?;
            rest = after;
            break;
        }
    }

    let (after, _) = arrow(rest).map_err(|_| {
        DescriptorError::new("expected `->` before the return kind", cursor.span_at(rest))
            .with_help(READABLE_HELP)
    })?;
    rest = after;
    let (after, (name, array)) = kind_name(rest).map_err(|_| {
        DescriptorError::new("expected a return kind", cursor.span_at(rest))
            .with_help(READABLE_HELP)
    })?;
    let returns = resolve_named(
        name,
        array,
        cursor.offset(rest.trim_start())..cursor.offset(after),
    )?;
    rest = after;

    if !rest.trim().is_empty() {
        return Err(DescriptorError::new(
            "unexpected input after the return kind",
            cursor.offset(rest.trim_start())..source.len(),
        ));
    }
    Ok(Signature::new(params, returns))
}

fn resolve_named(
    name: &str,
    array: bool,
    span: std::ops::Range<usize>,
) -> Result<Kind, DescriptorError> {
    let kind = Kind::from_name(name).ok_or_else(|| {
        DescriptorError::new(format!("unknown kind `{name}`"), span.clone()).with_help(
            "Known kinds: void, boolean, byte, short, char, int, long, float, double, ref",
        )
    })?;
    if !array {
        return Ok(kind);
    }
    kind.as_component()
        .map(Kind::Array)
        .ok_or_else(|| DescriptorError::new(format!("`{name}[]` is not a valid array kind"), span))
}

fn primitive_for(code: char) -> Kind {
    match code {
        'Z' => Kind::Boolean,
        'B' => Kind::Byte,
        'S' => Kind::Short,
        'C' => Kind::Char,
        'I' => Kind::Int,
        'J' => Kind::Long,
        'F' => Kind::Float,
        _ => Kind::Double,
    }
}

fn jvm_field(input: &str) -> IResult<&str, (usize, Kind)> {
    let (input, dims) = many0_count(char('['))(input)?;
    let (input, kind) = alt((
        map(one_of("ZBSCIJFD"), primitive_for),
        map(delimited(char('L'), is_not(";"), char(';')), |_| {
            Kind::Reference
        }),
    ))(input)?;
    Ok((input, (dims, kind)))
}

fn jvm_return(input: &str) -> IResult<&str, (usize, Kind)> {
    alt((map(char('V'), |_| (0, Kind::Void)), jvm_field))(input)
}

fn array_field(
    dims: usize,
    kind: Kind,
    span: std::ops::Range<usize>,
) -> Result<Kind, DescriptorError> {
    match dims {
        0 => Ok(kind),
        1 => kind
            .as_component()
            .map(Kind::Array)
            .ok_or_else(|| DescriptorError::new("invalid array element", span)),
        _ => Err(DescriptorError::new("nested arrays are not supported", span)
            .with_help("Use a single `[` dimension or an opaque reference")),
    }
}

fn parse_descriptor(source: &str) -> Result<Signature, DescriptorError> {
    let cursor = Cursor { source };
    let trimmed = source.trim_start();
    let lead = source.len() - source.trim_start().len();
    let Ok((mut rest, _)) = char::<&str, nom::error::Error<&str>>('(')(trimmed) else {
        return Err(DescriptorError::new(
            "expected `(` to open the descriptor",
            lead..lead + usize::from(!trimmed.is_empty()),
        )
        .with_help(DESCRIPTOR_HELP));
    };

    let mut params = Vec::new();
    loop {
        if let Ok((after, _)) = char::<&str, nom::error::Error<&str>>(')')(rest) {
            rest = after;
            break;
        }
        let start = cursor.offset(rest);
        let (after, (dims, kind)) = jvm_field(rest).map_err(|_| {
            DescriptorError::new("expected a field descriptor", start..start + 1)
                .with_help(DESCRIPTOR_HELP)
        })?;
        params.push(array_field(dims, kind, start..cursor.offset(after))?);
        rest = after;
    }

    let start = cursor.offset(rest);
    let (after, (dims, kind)) = jvm_return(rest).map_err(|_| {
        DescriptorError::new("expected a return descriptor", start..start + 1)
            .with_help(DESCRIPTOR_HELP)
    })?;
    let returns = array_field(dims, kind, start..cursor.offset(after))?;
    if !after.trim_end().is_empty() {
        let at = cursor.offset(after);
        return Err(DescriptorError::new(
            "unexpected input after the return descriptor",
            at..source.len(),
        ));
    }
    Ok(Signature::new(params, returns))
}
