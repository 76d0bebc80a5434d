//! Turns a textual port specification into the ordered list of ports to probe.
//!
//! Three shapes are accepted:
//!
//! - a single port, `8080`
//! - a dash-delimited range, `1000-1020`
//! - a comma-delimited pair, `80,443`
//!
//! The comma form is **not** a list of discrete ports: `80,443` means every
//! port from 80 to 443 inclusive, exactly like `80-443`. Endpoints given in
//! descending order are swapped rather than rejected.
//!
//! ```rust
//! use portprobe::port_spec::{parse, PortScope};
//!
//! let ports = parse("1005-1000").unwrap();
//! assert_eq!(ports.scope(), PortScope::Range { start: 1000, end: 1005 });
//! assert_eq!(ports.len(), 6);
//! ```
use crate::error::ScanError;
use std::fmt;
use std::num::IntErrorKind;
use std::ops::RangeInclusive;
use std::str::FromStr;

const RANGE_DELIMITER: char = '-';
const PAIR_DELIMITER: char = ',';

/// What the user asked for, after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortScope {
    Single(u16),
    /// Inclusive, always `start <= end`.
    Range { start: u16, end: u16 },
}

impl fmt::Display for PortScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(port) => write!(f, "port {port}"),
            Self::Range { start, end } => write!(f, "ports {start} to {end}"),
        }
    }
}

/// Ascending, duplicate free sequence of ports produced by [`parse`].
///
/// Ports are generated on demand from the scope, so a full `0-65535` list
/// costs no more to hold than a single port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortList {
    scope: PortScope,
}

impl PortList {
    pub const fn single(port: u16) -> Self {
        Self {
            scope: PortScope::Single(port),
        }
    }

    /// Builds the inclusive range between `a` and `b`, whichever is smaller first.
    pub fn range(a: u16, b: u16) -> Self {
        let (start, end) = if a > b { (b, a) } else { (a, b) };
        Self {
            scope: PortScope::Range { start, end },
        }
    }

    pub const fn scope(&self) -> PortScope {
        self.scope
    }

    pub const fn start(&self) -> u16 {
        match self.scope {
            PortScope::Single(port) => port,
            PortScope::Range { start, .. } => start,
        }
    }

    pub const fn end(&self) -> u16 {
        match self.scope {
            PortScope::Single(port) => port,
            PortScope::Range { end, .. } => end,
        }
    }

    pub fn iter(&self) -> RangeInclusive<u16> {
        self.start()..=self.end()
    }

    pub fn len(&self) -> usize {
        usize::from(self.end() - self.start()) + 1
    }

    /// A parsed list always holds at least one port.
    pub const fn is_empty(&self) -> bool {
        false
    }

    pub fn to_vec(&self) -> Vec<u16> {
        self.iter().collect()
    }
}

impl IntoIterator for &PortList {
    type Item = u16;
    type IntoIter = RangeInclusive<u16>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromStr for PortList {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parses a port specification.
///
/// Fails with [`ScanError::InvalidFormat`] when the text is not one of the
/// accepted shapes and with [`ScanError::OutOfRange`] when a well-formed
/// integer does not fit in 0-65535. `-5` is read as the integer minus five,
/// not as a range with a missing start, and so fails as out of range.
pub fn parse(spec: &str) -> Result<PortList, ScanError> {
    if spec.is_empty() {
        return Err(ScanError::invalid_format(spec, "empty input"));
    }

    let trimmed = spec.trim();
    if is_signed_integer(trimmed) {
        return parse_single_port(spec, trimmed);
    }

    match pick_delimiter(spec) {
        Some(delimiter) => parse_port_pair(spec, delimiter),
        None => parse_single_port(spec, trimmed),
    }
}

fn pick_delimiter(spec: &str) -> Option<char> {
    [RANGE_DELIMITER, PAIR_DELIMITER]
        .into_iter()
        .find(|&delimiter| spec.contains(delimiter))
}

fn parse_port_pair(spec: &str, delimiter: char) -> Result<PortList, ScanError> {
    let parts: Vec<&str> = spec
        .split(delimiter)
        .filter(|part| !part.is_empty())
        .collect();

    let [first, second] = parts.as_slice() else {
        return Err(ScanError::invalid_format(
            spec,
            format!(
                "expected exactly two ports separated by '{delimiter}', found {}",
                parts.len()
            ),
        ));
    };

    // both tokens must be well formed before either is bounds checked
    let start = parse_integer(spec, first)?;
    let end = parse_integer(spec, second)?;

    Ok(PortList::range(start.to_port()?, end.to_port()?))
}

fn parse_single_port(spec: &str, token: &str) -> Result<PortList, ScanError> {
    parse_integer(spec, token)?.to_port().map(PortList::single)
}

/// A token that is syntactically an integer. `value` is `None` when the
/// digits do not even fit in `i64`.
struct IntegerToken<'a> {
    text: &'a str,
    value: Option<i64>,
}

impl IntegerToken<'_> {
    fn to_port(&self) -> Result<u16, ScanError> {
        self.value
            .and_then(|value| u16::try_from(value).ok())
            .ok_or_else(|| ScanError::OutOfRange {
                value: self.text.to_owned(),
            })
    }
}

/// The whole token must be a base-10 integer with an optional sign.
fn parse_integer<'a>(spec: &str, token: &'a str) -> Result<IntegerToken<'a>, ScanError> {
    match token.parse::<i64>() {
        Ok(value) => Ok(IntegerToken {
            text: token,
            value: Some(value),
        }),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Ok(IntegerToken {
                text: token,
                value: None,
            }),
            _ => Err(ScanError::invalid_format(
                spec,
                format!("'{token}' is not a whole number"),
            )),
        },
    }
}

fn is_signed_integer(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
