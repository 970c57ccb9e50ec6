//! Signature rules shared by every combinator.
//!
//! All functions here are pure: they inspect handle signatures and either
//! return the derived shape or the first [`ShapeError`] encountered.

use crate::combinators::error::{ShapeError, ShapeResult};
use crate::combinators::loops::Clause;
use crate::language::kind::Kind;
use crate::runtime::handle::Handle;

pub(crate) fn kinds(list: &[Kind]) -> String {
    let names: Vec<String> = list.iter().map(Kind::name).collect();
    format!("({})", names.join(", "))
}

pub fn require_returns(role: &str, handle: &Handle, kind: Kind) -> ShapeResult<()> {
    if handle.returns() == kind {
        Ok(())
    } else {
        Err(ShapeError::SignatureMismatch {
            role: role.to_string(),
            expected: format!("return kind {kind}"),
            found: handle.returns().to_string(),
        })
    }
}

pub fn require_same_return(context: &str, expected: Kind, found: Kind) -> ShapeResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(ShapeError::InconsistentReturnType {
            context: context.to_string(),
            expected,
            found,
        })
    }
}

/// `params` must start with `leading`, or with the part of it that fits.
pub fn require_prefix(role: &str, params: &[Kind], leading: &[Kind]) -> ShapeResult<()> {
    let shared = params.len().min(leading.len());
    if params[..shared] == leading[..shared] {
        Ok(())
    } else {
        Err(ShapeError::PrefixMismatch {
            role: role.to_string(),
            expected: kinds(leading),
            found: kinds(&params[..shared]),
        })
    }
}

/// Effectively identical: `segment` agrees with `full` over its whole length.
pub fn require_effectively_identical(
    role: &str,
    segment: &[Kind],
    full: &[Kind],
) -> ShapeResult<()> {
    if segment.len() <= full.len() && segment == &full[..segment.len()] {
        Ok(())
    } else {
        Err(ShapeError::SuffixMismatch {
            role: role.to_string(),
            expected: kinds(full),
            found: kinds(segment),
        })
    }
}

/// The longest external segment, after checking every other segment is
/// effectively identical to it.
pub fn common_external(segments: &[(String, Vec<Kind>)]) -> ShapeResult<Vec<Kind>> {
    let longest = segments
        .iter()
        .map(|(_, segment)| segment)
        .max_by_key(|segment| segment.len())
        .cloned()
        .unwrap_or_default();
    for (role, segment) in segments {
        require_effectively_identical(role, segment, &longest)?;
    }
    Ok(longest)
}

/// Derived layout of a validated clause list.
#[derive(Clone, Debug)]
pub struct LoopShape {
    pub clauses: Vec<Clause>,
    /// Index into the iteration variables for each clause, if it has one.
    pub slots: Vec<Option<usize>>,
    /// `V...`
    pub vars: Vec<Kind>,
    /// `A...`
    pub externals: Vec<Kind>,
    pub returns: Kind,
}

pub fn check_loop(clauses: Option<&[Option<Clause>]>) -> ShapeResult<LoopShape> {
    let clauses = clauses.ok_or(ShapeError::NullClause { index: None })?;
    if clauses.is_empty() {
        return Err(ShapeError::EmptyClauses);
    }
    let clauses = clauses
        .iter()
        .enumerate()
        .map(|(index, clause)| {
            clause
                .clone()
                .ok_or(ShapeError::NullClause { index: Some(index) })
        })
        .collect::<ShapeResult<Vec<_>>>()?;

    let mut returns: Option<Kind> = None;
    for (idx, clause) in clauses.iter().enumerate() {
        if clause.is_empty() {
            return Err(ShapeError::MissingHandle {
                role: format!("clause {idx} has no handles"),
            });
        }
        if let Some(pred) = &clause.pred {
            require_returns(&format!("predicate of clause {idx}"), pred, Kind::Boolean)?;
        }
        if let (Some(init), Some(step)) = (&clause.init, &clause.step) {
            require_same_return(
                &format!("init and step of clause {idx}"),
                init.returns(),
                step.returns(),
            )?;
        }
        if let Some(fini) = &clause.fini {
            match returns {
                Some(expected) => require_same_return(
                    &format!("finalizer of clause {idx}"),
                    expected,
                    fini.returns(),
                )?,
                None => returns = Some(fini.returns()),
            }
        }
    }
    if clauses.iter().all(|clause| clause.pred.is_none()) {
        return Err(ShapeError::MissingHandle {
            role: "loop predicate".into(),
        });
    }

    let mut vars = Vec::new();
    let mut slots = Vec::with_capacity(clauses.len());
    for clause in &clauses {
        let kind = clause.var_kind();
        if kind.is_void() {
            slots.push(None);
        } else {
            slots.push(Some(vars.len()));
            vars.push(kind);
        }
    }

    let mut outer = Vec::new();
    for (idx, clause) in clauses.iter().enumerate() {
        for (role, handle) in clause.non_init() {
            let role = format!("{role} of clause {idx}");
            require_prefix(&role, handle.params(), &vars)?;
            if handle.arity() > vars.len() {
                outer.push((role, handle.params()[vars.len()..].to_vec()));
            }
        }
    }
    let inits: Vec<(String, Vec<Kind>)> = clauses
        .iter()
        .enumerate()
        .filter_map(|(idx, clause)| {
            clause
                .init
                .as_ref()
                .map(|init| (format!("init of clause {idx}"), init.params().to_vec()))
        })
        .collect();
    let externals = if outer.is_empty() {
        common_external(&inits)?
    } else {
        let externals = common_external(&outer)?;
        for (role, params) in &inits {
            require_effectively_identical(role, params, &externals)?;
        }
        externals
    };

    Ok(LoopShape {
        clauses,
        slots,
        vars,
        externals,
        returns: returns.unwrap_or(Kind::Void),
    })
}

/// Layout of a specialized loop body: its variable (if non-void), the kind
/// it receives per iteration, and its external parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BodyShape {
    pub var: Option<Kind>,
    pub element: Kind,
    pub externals: Vec<Kind>,
}

/// Body of a counted loop: `(i, A...) -> void` or `(V, i, A...) -> V`.
pub fn check_counted_body(body: &Handle) -> ShapeResult<BodyShape> {
    let params = body.params();
    if body.returns().is_void() {
        return match params.first() {
            Some(Kind::Int) => Ok(BodyShape {
                var: None,
                element: Kind::Int,
                externals: params[1..].to_vec(),
            }),
            _ => Err(ShapeError::VoidBodyShape {
                found: kinds(params),
            }),
        };
    }
    if params.len() < 2 {
        return Err(ShapeError::ArityShape {
            message: format!(
                "counted body returning {} needs (V, int, ...) parameters, found {}",
                body.returns(),
                kinds(params)
            ),
        });
    }
    if params[1] != Kind::Int {
        return Err(ShapeError::ArityShape {
            message: format!(
                "second parameter of a counted body must be int, found {}",
                params[1]
            ),
        });
    }
    require_prefix("counted body", params, &[body.returns()])?;
    Ok(BodyShape {
        var: Some(body.returns()),
        element: Kind::Int,
        externals: params[2..].to_vec(),
    })
}

/// Body of an iterated loop: `(T, A...) -> void` or `(V, T, A...) -> V`.
pub fn check_iterated_body(body: &Handle) -> ShapeResult<BodyShape> {
    let params = body.params();
    if body.returns().is_void() {
        let Some(element) = params.first().copied() else {
            return Err(ShapeError::ArityShape {
                message: "void iterated body must take the element parameter".into(),
            });
        };
        return Ok(BodyShape {
            var: None,
            element,
            externals: params[1..].to_vec(),
        });
    }
    if params.len() < 2 {
        return Err(ShapeError::ArityShape {
            message: format!(
                "iterated body returning {} needs (V, T, ...) parameters, found {}",
                body.returns(),
                kinds(params)
            ),
        });
    }
    require_prefix("iterated body", params, &[body.returns()])?;
    Ok(BodyShape {
        var: Some(body.returns()),
        element: params[1],
        externals: params[2..].to_vec(),
    })
}

/// Body of a while/do-while loop: `(A...) -> void` or `(V, A...) -> V`.
pub fn check_while_body(body: &Handle) -> ShapeResult<BodyShape> {
    let params = body.params();
    let returns = body.returns();
    if returns.is_void() {
        return Ok(BodyShape {
            var: None,
            element: Kind::Void,
            externals: params.to_vec(),
        });
    }
    if params.first() != Some(&returns) {
        return Err(ShapeError::PrefixMismatch {
            role: "loop body".into(),
            expected: kinds(&[returns]),
            found: kinds(params),
        });
    }
    Ok(BodyShape {
        var: Some(returns),
        element: returns,
        externals: params[1..].to_vec(),
    })
}

/// A loop init must agree with the body's variable kind (`void` when the
/// body has no variable).
pub fn check_init(init: Option<&Handle>, var: Option<Kind>) -> ShapeResult<()> {
    match init {
        Some(init) => require_same_return(
            "init and body",
            var.unwrap_or(Kind::Void),
            init.returns(),
        ),
        None => Ok(()),
    }
}
