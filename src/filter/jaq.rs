// jq evaluation backed by jaq

use super::FilterEngine;
use crate::error::{EsqError, Result};
use jaq_core::load::{Arena, File, Loader};
use jaq_core::{Compiler, Ctx, FilterT, Native, RcIter};
use jaq_json::Val;
use serde_json::Value;

/// A parsed and compiled jq program
pub struct CompiledFilter {
    expression: String,
    filter: jaq_core::Filter<Native<Val>>,
}

impl CompiledFilter {
    pub fn expression(&self) -> &str {
        &self.expression
    }
}

/// [`FilterEngine`] using jaq with the jq standard library loaded
#[derive(Debug, Clone, Copy, Default)]
pub struct JaqEngine;

impl FilterEngine for JaqEngine {
    type Compiled = CompiledFilter;

    fn parse(&self, expression: &str) -> Result<CompiledFilter> {
        let invalid = |message: String| EsqError::InvalidFilterExpression {
            expression: expression.to_string(),
            message,
        };

        let program = File {
            code: expression,
            path: (),
        };
        let loader = Loader::new(jaq_std::defs().chain(jaq_json::defs()));
        let arena = Arena::default();

        let modules = loader.load(&arena, program).map_err(|errs| {
            invalid(
                errs.into_iter()
                    .map(|(_, e)| format!("{e:?}"))
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;

        let filter = Compiler::default()
            .with_funs(jaq_std::funs().chain(jaq_json::funs()))
            .compile(modules)
            .map_err(|errs| {
                invalid(
                    errs.into_iter()
                        .map(|(_, e)| format!("{e:?}"))
                        .collect::<Vec<_>>()
                        .join("; "),
                )
            })?;

        Ok(CompiledFilter {
            expression: expression.to_string(),
            filter,
        })
    }

    fn run(&self, compiled: &CompiledFilter, input: Value) -> Result<Vec<Value>> {
        let inputs = RcIter::new(core::iter::empty());
        let outputs = compiled
            .filter
            .run((Ctx::new([], &inputs), Val::from(input)));

        let mut values = Vec::new();
        for output in outputs {
            match output {
                Ok(val) => values.push(Value::from(val)),
                Err(e) => {
                    return Err(EsqError::FilterEvaluationError {
                        expression: compiled.expression.clone(),
                        message: e.to_string(),
                    })
                }
            }
        }
        Ok(values)
    }
}
