//! jq pre-processing of input documents before they are validated.
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JqError {
    #[error("jq parse error:\n{0}")]
    Parse(String),
    #[error("jq compile error:\n{0}")]
    Compile(String),
    #[error("jq runtime error: {0}")]
    Runtime(String),
    #[error("jq produced invalid JSON: {0}")]
    Output(#[from] serde_json::Error),
}

/// Run `filter_src` over `input`, returning every value the filter emits.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>, JqError> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    for item in outputs {
        let val = item.map_err(|e| JqError::Runtime(format!("{e:?}")))?;
        // Val renders as JSON text
        out.push(serde_json::from_str(&val.to_string())?);
    }
    Ok(out)
}

fn format_parse_errors(errs: Vec<(load::File<&str, ()>, load::Error<&str>)>) -> JqError {
    let mut s = String::new();
    for (file, err) in errs {
        s.push_str(&format!("{err:?} in `{}`\n", file.code));
    }
    JqError::Parse(s)
}

fn format_undefined_errors(errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>) -> JqError {
    let mut s = String::new();
    for (file, list) in errs {
        for (name, undef) in list {
            s.push_str(&format!("undefined `{name}`: {undef:?} in `{}`\n", file.code));
        }
    }
    JqError::Compile(s)
}
