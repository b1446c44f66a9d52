//! Optional resource limits for an evaluation.

/// Resource limits for one [`crate::Evaluator`].
///
/// Both limits are off by default: a program that never terminates runs
/// forever, and deep recursion is bounded only by the host stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalLimits {
    /// Maximum number of statements and expressions evaluated.
    pub gas_limit: Option<u64>,
    /// Maximum number of nested function calls.
    pub max_call_depth: Option<usize>,
}

impl EvalLimits {
    /// No limits at all.
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = Some(depth);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unlimited() {
        let limits = EvalLimits::default();
        assert_eq!(limits, EvalLimits::unlimited());
        assert_eq!(limits.gas_limit, None);
        assert_eq!(limits.max_call_depth, None);
    }

    #[test]
    fn test_builders() {
        let limits = EvalLimits::unlimited()
            .with_gas_limit(500)
            .with_max_call_depth(64);
        assert_eq!(limits.gas_limit, Some(500));
        assert_eq!(limits.max_call_depth, Some(64));
    }
}
