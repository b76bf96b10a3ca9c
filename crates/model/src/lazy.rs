//! Once-evaluated expression slots.

use std::sync::OnceLock;

use crate::error::EvalError;
use crate::types::Value;

/// A textual expression paired with its evaluate-once result cell.
///
/// Default values are not evaluated at resolution time: the first read
/// runs the supplied evaluator against the expression text, and the
/// outcome — success or failure — is recorded and returned unchanged on
/// every later read. Errors are sticky on purpose: a bad expression must
/// surface to the consumer each time, never degrade into a silent
/// default.
#[derive(Debug)]
pub struct LazyValue {
	expr: String,
	cell: OnceLock<Result<Value, EvalError>>,
}

impl LazyValue {
	/// Wraps an unevaluated expression.
	pub fn new(expr: impl Into<String>) -> Self {
		Self { expr: expr.into(), cell: OnceLock::new() }
	}

	/// The raw expression text.
	pub fn expr(&self) -> &str {
		&self.expr
	}

	/// Returns the recorded outcome, evaluating on first access.
	pub fn get_or_eval<F>(&self, eval: F) -> Result<Value, EvalError>
	where
		F: FnOnce(&str) -> Result<Value, EvalError>,
	{
		self.cell.get_or_init(|| eval(&self.expr)).clone()
	}

	/// The recorded outcome, if any read has happened yet.
	pub fn peek(&self) -> Option<&Result<Value, EvalError>> {
		self.cell.get()
	}
}

impl Clone for LazyValue {
	fn clone(&self) -> Self {
		// The clone keeps the expression but restarts evaluation: a child
		// descriptor inheriting a default must evaluate against its own
		// loader context, not reuse the ancestor's outcome.
		Self::new(self.expr.clone())
	}
}

impl PartialEq for LazyValue {
	fn eq(&self, other: &Self) -> bool {
		self.expr == other.expr
	}
}
