//! Parallel probe evaluation
//!
//! Evaluation is a pure function per probe, so an already-ordered candidate
//! batch can be evaluated with rayon and collected back in input order.
//! Everything that depends on order or on accumulated coverage (tiling,
//! local shift, selection) stays sequential. Enable with the `parallel`
//! feature.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "parallel")]
//! # fn main() {
//! use ferro_panel::evaluate::Criteria;
//! use ferro_panel::parallel::evaluate_parallel;
//!
//! let probes = Vec::new();
//! let evaluated = evaluate_parallel(probes, &Criteria::default());
//! assert!(evaluated.is_empty());
//! # }
//! # #[cfg(not(feature = "parallel"))]
//! # fn main() {}
//! ```

use rayon::prelude::*;

use crate::evaluate::{evaluate, Criteria};
use crate::probe::Probe;

/// Evaluate probes in parallel
///
/// Returns one evaluated probe per input. Order is preserved.
pub fn evaluate_parallel(probes: Vec<Probe>, criteria: &Criteria) -> Vec<Probe> {
    probes
        .into_par_iter()
        .map(|probe| evaluate(probe, criteria))
        .collect()
}
