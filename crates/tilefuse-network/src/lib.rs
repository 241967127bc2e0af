//! N-tuple network value function for the tile-sliding engine.
//!
//! The network estimates the value of a board as a sum of table lookups, one
//! per tuple pattern:
//!
//! 1. **Patterns** ([`pattern`]) - Fixed ordered subsets of board cells. A
//!    pattern hashes the exponents of its cells into a base-V feature index.
//! 2. **Weight Tables** ([`table`]) - One dense table per pattern, holding a
//!    weight for every possible feature index.
//! 3. **Network** ([`network`]) - The pattern/table pairs with the summed
//!    [`NTupleNetwork::estimate`] and the TD-style [`NTupleNetwork::adjust`]
//!    update.
//! 4. **Persistence** ([`persist`]) - A count-prefixed raw binary layout for
//!    saving and restoring every table exactly.
//!
//! The model is linear in its one-hot tuple features, so `adjust` applies
//! the same scalar correction to each pattern's selected weight. Estimation
//! must behave identically during action selection and learning; both go
//! through the same [`NTupleNetwork`] instance.

pub use self::{network::*, pattern::*, persist::WeightFileError, table::*};

pub mod network;
pub mod pattern;
pub mod persist;
pub mod table;
