//! # abel-classes
//!
//! Equivariant class layer of the ABEL localization engine: the library of
//! primitive classes with their localized values, the inverse Euler class
//! of the virtual normal bundle, and the expression algebra the integrator
//! consumes.

pub mod algebra;
pub mod context;
pub mod euler;
pub mod library;

// Re-export commonly used items
pub use algebra::{
    check_arguments, check_psi_usage, codimension, contact, evaluate, hypersurface, incidency,
    is_vector_valued, jet, o1, o1_i, psi, r1, scalar, vector, ClassExpr, Primitive, Value,
};
pub use context::FixedPoint;
pub use euler::euler_inverse;
