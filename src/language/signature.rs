use crate::language::{descriptor, errors::DescriptorError, kind::Kind};
use std::fmt;
use std::str::FromStr;

/// Ordered parameter kinds plus a return kind. Immutable once built; the
/// editing helpers all return a new signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    params: Vec<Kind>,
    returns: Kind,
}

impl Signature {
    pub fn new(params: impl Into<Vec<Kind>>, returns: Kind) -> Self {
        Self {
            params: params.into(),
            returns,
        }
    }

    pub fn returning(returns: Kind) -> Self {
        Self::new(Vec::new(), returns)
    }

    pub fn params(&self) -> &[Kind] {
        &self.params
    }

    pub fn param(&self, index: usize) -> Option<Kind> {
        self.params.get(index).copied()
    }

    pub fn returns(&self) -> Kind {
        self.returns
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn last_param(&self) -> Option<Kind> {
        self.params.last().copied()
    }

    pub fn with_returns(&self, returns: Kind) -> Self {
        Self::new(self.params.clone(), returns)
    }

    pub fn with_params(&self, params: impl Into<Vec<Kind>>) -> Self {
        Self::new(params, self.returns)
    }

    /// Removes `count` parameters starting at `position`.
    pub fn dropping(&self, position: usize, count: usize) -> Self {
        let mut params = self.params.clone();
        let end = (position + count).min(params.len());
        params.drain(position.min(end)..end);
        Self::new(params, self.returns)
    }

    /// Inserts `kinds` before the parameter currently at `position`.
    pub fn inserting(&self, position: usize, kinds: &[Kind]) -> Self {
        let mut params = self.params.clone();
        let at = position.min(params.len());
        params.splice(at..at, kinds.iter().copied());
        Self::new(params, self.returns)
    }

    /// Replaces `count` parameters at `position` with `kinds`.
    pub fn replacing(&self, position: usize, count: usize, kinds: &[Kind]) -> Self {
        self.dropping(position, count).inserting(position, kinds)
    }

    pub fn descriptor(&self) -> String {
        let mut out = String::from("(");
        for param in &self.params {
            out.push_str(&param.descriptor());
        }
        out.push(')');
        out.push_str(&self.returns.descriptor());
        out
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (idx, param) in self.params.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, ") -> {}", self.returns)
    }
}

impl FromStr for Signature {
    type Err = DescriptorError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        descriptor::parse_signature(source)
    }
}
