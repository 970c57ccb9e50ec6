//! The generalized multi-clause loop.
//!
//! Each [`Clause`] drives at most one iteration variable. On every iteration
//! the predicates run in clause order and the first `false` ends the loop;
//! otherwise every step runs in clause order, each one seeing the variables
//! already updated earlier in the same iteration. On exit every finalizer
//! runs in clause order and the last one's value is the loop result.

use crate::combinators::error::ShapeResult;
use crate::combinators::shape::{self, LoopShape};
use crate::language::{kind::Kind, signature::Signature};
use crate::runtime::{error::RuntimeResult, handle::Handle, value::Value};
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
pub struct Clause {
    pub init: Option<Handle>,
    pub step: Option<Handle>,
    pub pred: Option<Handle>,
    pub fini: Option<Handle>,
}

impl Clause {
    pub fn new(
        init: Option<Handle>,
        step: Option<Handle>,
        pred: Option<Handle>,
        fini: Option<Handle>,
    ) -> Self {
        Self {
            init,
            step,
            pred,
            fini,
        }
    }

    pub fn with_init(mut self, init: Handle) -> Self {
        self.init = Some(init);
        self
    }

    pub fn with_step(mut self, step: Handle) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_pred(mut self, pred: Handle) -> Self {
        self.pred = Some(pred);
        self
    }

    pub fn with_fini(mut self, fini: Handle) -> Self {
        self.fini = Some(fini);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.init.is_none() && self.step.is_none() && self.pred.is_none() && self.fini.is_none()
    }

    /// Kind of this clause's iteration variable; `Void` means none.
    pub fn var_kind(&self) -> Kind {
        self.step
            .as_ref()
            .or(self.init.as_ref())
            .map(Handle::returns)
            .unwrap_or(Kind::Void)
    }

    pub(crate) fn non_init(&self) -> impl Iterator<Item = (&'static str, &Handle)> {
        [
            ("step", self.step.as_ref()),
            ("predicate", self.pred.as_ref()),
            ("finalizer", self.fini.as_ref()),
        ]
        .into_iter()
        .filter_map(|(role, handle)| handle.map(|handle| (role, handle)))
    }
}

/// When predicates run relative to the steps of an iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Check {
    BeforeSteps,
    AfterSteps,
}

struct LoopPlan {
    shape: LoopShape,
    check: Check,
}

/// `loop(clauses)`.
pub fn loop_handle(clauses: &[Clause]) -> ShapeResult<Handle> {
    let entries: Vec<Option<Clause>> = clauses.iter().cloned().map(Some).collect();
    loop_nullable(Some(entries.as_slice()))
}

/// `loop(clauses)` for callers whose clause list or entries may be absent.
pub fn loop_nullable(clauses: Option<&[Option<Clause>]>) -> ShapeResult<Handle> {
    build_loop("loop", clauses, Check::BeforeSteps)
}

pub(crate) fn build_loop(
    name: &str,
    clauses: Option<&[Option<Clause>]>,
    check: Check,
) -> ShapeResult<Handle> {
    let shape = shape::check_loop(clauses)?;
    let signature = Signature::new(shape.externals.clone(), shape.returns);
    tracing::debug!(
        name,
        clauses = shape.clauses.len(),
        vars = %shape::kinds(&shape.vars),
        signature = %signature,
        "built loop handle"
    );
    let plan = Arc::new(LoopPlan { shape, check });
    Ok(Handle::new(name, signature, move |args| plan.run(args)))
}

impl LoopPlan {
    fn run(&self, args: &[Value]) -> RuntimeResult<Value> {
        let shape = &self.shape;
        let mut state = Vec::with_capacity(shape.vars.len() + args.len());
        for (clause, slot) in shape.clauses.iter().zip(&shape.slots) {
            let value = match &clause.init {
                Some(init) => init.invoke_prefix(args)?,
                None => Value::zero(clause.var_kind()),
            };
            if slot.is_some() {
                state.push(value);
            }
        }
        state.extend_from_slice(args);

        let mut iteration: u64 = 0;
        loop {
            if self.check == Check::BeforeSteps && !self.predicates_hold(&state)? {
                break;
            }
            for (clause, slot) in shape.clauses.iter().zip(&shape.slots) {
                if let Some(step) = &clause.step {
                    let next = step.invoke_prefix(&state)?;
                    if let Some(index) = slot {
                        state[*index] = next;
                    }
                }
            }
            iteration += 1;
            tracing::trace!(iteration, "loop iteration");
            if self.check == Check::AfterSteps && !self.predicates_hold(&state)? {
                break;
            }
        }

        let mut result = Value::Void;
        for clause in &shape.clauses {
            if let Some(fini) = &clause.fini {
                result = fini.invoke_prefix(&state)?;
            }
        }
        Ok(result)
    }

    fn predicates_hold(&self, state: &[Value]) -> RuntimeResult<bool> {
        for clause in &self.shape.clauses {
            if let Some(pred) = &clause.pred {
                if !pred.invoke_prefix(state)?.as_bool()? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}
