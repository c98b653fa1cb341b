//! Secant method with an explicit iteration budget.

use crate::error::{SolverError, SolverResult};
use tracing::debug;

/// Secant solver configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SecantConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Converged when the step falls below this (units of x)
    pub x_tol: f64,
    /// Converged when |f(x)| falls to or below this
    pub f_tol: f64,
    /// Offset of the second starting point from the first
    pub initial_step: f64,
}

impl Default for SecantConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            x_tol: 1e-6,
            f_tol: 0.0,
            initial_step: 1e-2,
        }
    }
}

impl SecantConfig {
    pub fn validate(&self) -> SolverResult<()> {
        if self.max_iterations == 0 {
            return Err(SolverError::ProblemSetup {
                what: "max_iterations must be at least 1".to_string(),
            });
        }
        if !(self.x_tol > 0.0 && self.x_tol.is_finite()) {
            return Err(SolverError::ProblemSetup {
                what: format!("x_tol must be positive and finite, got {}", self.x_tol),
            });
        }
        if !(self.f_tol >= 0.0 && self.f_tol.is_finite()) {
            return Err(SolverError::ProblemSetup {
                what: format!("f_tol must be non-negative and finite, got {}", self.f_tol),
            });
        }
        if self.initial_step == 0.0 || !self.initial_step.is_finite() {
            return Err(SolverError::ProblemSetup {
                what: "initial_step must be non-zero and finite".to_string(),
            });
        }
        Ok(())
    }
}

/// Converged root.
#[derive(Clone, Copy, Debug)]
pub struct Root {
    pub x: f64,
    /// f(x) at the returned root
    pub residual: f64,
    pub iterations: usize,
}

/// Find `x` with `f(x) = 0` starting from `x0`.
///
/// Fails with [`SolverError::ConvergenceFailed`] once `max_iterations`
/// secant steps have been taken without meeting either tolerance.
pub fn secant<F>(mut f: F, x0: f64, config: &SecantConfig) -> SolverResult<Root>
where
    F: FnMut(f64) -> SolverResult<f64>,
{
    config.validate()?;
    if !x0.is_finite() {
        return Err(SolverError::ProblemSetup {
            what: format!("initial guess must be finite, got {x0}"),
        });
    }

    let mut x_prev = x0;
    let mut f_prev = finite_residual(f(x_prev)?, x_prev)?;
    if f_prev.abs() <= config.f_tol {
        return Ok(Root {
            x: x_prev,
            residual: f_prev,
            iterations: 0,
        });
    }

    let mut x = x0 + config.initial_step;
    let mut fx = finite_residual(f(x)?, x)?;

    for iter in 1..=config.max_iterations {
        if fx.abs() <= config.f_tol {
            debug!(x, residual = fx, iterations = iter, "secant converged on residual");
            return Ok(Root {
                x,
                residual: fx,
                iterations: iter,
            });
        }

        let slope = (fx - f_prev) / (x - x_prev);
        if slope == 0.0 || !slope.is_finite() {
            return Err(SolverError::Numeric {
                what: format!("zero or non-finite secant slope at x = {x}"),
            });
        }

        let x_next = x - fx / slope;
        if !x_next.is_finite() {
            return Err(SolverError::Numeric {
                what: format!("non-finite secant step from x = {x}"),
            });
        }

        x_prev = x;
        f_prev = fx;
        x = x_next;
        fx = finite_residual(f(x)?, x)?;

        if (x - x_prev).abs() < config.x_tol {
            debug!(x, residual = fx, iterations = iter, "secant converged on step");
            return Ok(Root {
                x,
                residual: fx,
                iterations: iter,
            });
        }
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "Maximum iterations {} reached at x = {}, residual = {}",
            config.max_iterations, x, fx
        ),
    })
}

fn finite_residual(value: f64, x: f64) -> SolverResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SolverError::Numeric {
            what: format!("non-finite residual at x = {x}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn simple_quadratic() {
        // Solve x^2 - 4 = 0 from the positive side
        let root = secant(|x| Ok(x * x - 4.0), 3.0, &SecantConfig::default()).unwrap();
        assert_relative_eq!(root.x, 2.0, epsilon = 1e-9);
        assert!(root.residual.abs() < 1e-8);
    }

    #[test]
    fn linear_converges_in_two_steps() {
        let root = secant(|x| Ok(3.0 * x - 6.0), 100.0, &SecantConfig::default()).unwrap();
        assert_relative_eq!(root.x, 2.0, epsilon = 1e-12);
        assert!(root.iterations <= 2);
    }

    #[test]
    fn iteration_cap_is_enforced() {
        let config = SecantConfig {
            max_iterations: 3,
            ..SecantConfig::default()
        };
        // Slowly converging: root of x^9 at zero
        let err = secant(|x| Ok(x.powi(9)), 1.0, &config).unwrap_err();
        assert!(matches!(err, SolverError::ConvergenceFailed { .. }));
    }

    #[test]
    fn flat_function_reports_numeric_error() {
        let err = secant(|_| Ok(1.0), 0.0, &SecantConfig::default()).unwrap_err();
        assert!(matches!(err, SolverError::Numeric { .. }));
    }

    #[test]
    fn residual_errors_propagate() {
        let err = secant(
            |_| {
                Err(SolverError::Fluid(cm_fluids::FluidError::OutOfRange {
                    what: "test",
                }))
            },
            1.0,
            &SecantConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SolverError::Fluid(_)));
    }

    #[test]
    fn rejects_bad_config() {
        let config = SecantConfig {
            x_tol: 0.0,
            ..SecantConfig::default()
        };
        assert!(matches!(
            secant(|x| Ok(x), 1.0, &config),
            Err(SolverError::ProblemSetup { .. })
        ));
    }

    proptest! {
        #[test]
        fn cubic_roots_found_from_nearby_guesses(root in 280.0..330.0f64, offset in -5.0..5.0f64) {
            // Monotonic cubic with a single real root
            let f = |x: f64| Ok((x - root) + 1e-3 * (x - root).powi(3));
            let found = secant(f, root + offset, &SecantConfig::default()).unwrap();
            prop_assert!((found.x - root).abs() < 1e-6);
        }
    }
}
