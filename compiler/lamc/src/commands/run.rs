//! `run` and `cps`: evaluate a program, or print its CPS form.

use lam_cps::transform_program;
use lam_eval::{
    max_depth_from_env, CallConvention, InterpreterBuilder, SharedPrintHandler, Value,
    DEFAULT_MAX_DEPTH,
};
use tracing::debug;

use super::CommandError;

/// Options of `lam run`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// Transform first, then evaluate the transformed tree.
    pub cps: bool,
    /// Depth threshold; `None` falls back to `LAM_MAX_DEPTH`, then the default.
    pub max_depth: Option<usize>,
    /// Install `print` and `println`.
    pub prelude: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            cps: false,
            max_depth: None,
            prelude: true,
        }
    }
}

impl RunOptions {
    /// Threshold actually used: flag, then environment, then default.
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth
            .or_else(max_depth_from_env)
            .unwrap_or(DEFAULT_MAX_DEPTH)
    }
}

/// Parse the arguments after `run`: flags in any position, one file path.
pub fn parse_run_options(args: &[String]) -> Result<(RunOptions, String), CommandError> {
    let mut options = RunOptions::default();
    let mut path = None;

    for arg in args {
        if arg == "--cps" {
            options.cps = true;
        } else if arg == "--no-prelude" {
            options.prelude = false;
        } else if let Some(depth) = arg.strip_prefix("--max-depth=") {
            let depth = depth.parse().map_err(|_| {
                CommandError::Usage(format!("invalid --max-depth value '{depth}'"))
            })?;
            options.max_depth = Some(depth);
        } else if arg.starts_with('-') {
            return Err(CommandError::Usage(format!("unknown option '{arg}'")));
        } else if path.is_none() {
            path = Some(arg.clone());
        } else {
            return Err(CommandError::Usage(format!("unexpected argument '{arg}'")));
        }
    }

    let path = path.ok_or_else(|| CommandError::Usage("missing file path".to_string()))?;
    Ok((options, path))
}

/// Parse and evaluate `source`, returning the program's value.
pub fn run_source(
    source: &str,
    options: &RunOptions,
    print_handler: SharedPrintHandler,
) -> Result<Value, CommandError> {
    let mut program = lam_parse::parse(source)?;
    let mut convention = CallConvention::Implicit;
    if options.cps {
        program = transform_program(&program)?;
        convention = CallConvention::Explicit;
    }

    let mut interpreter = InterpreterBuilder::new()
        .max_depth(options.effective_max_depth())
        .print_handler(print_handler)
        .prelude(options.prelude)
        .convention(convention)
        .build();
    let value = interpreter.run(&program)?;
    debug!(bounces = interpreter.bounces(), "program finished");
    Ok(value)
}

/// Parse `source` and render its CPS form in surface syntax.
///
/// Generated names start with `β_`, which the lexer rejects, so the output
/// is for reading and code generation, not for feeding back to `lam run`.
pub fn cps_source(source: &str) -> Result<String, CommandError> {
    let program = lam_parse::parse(source)?;
    Ok(transform_program(&program)?.to_string())
}
