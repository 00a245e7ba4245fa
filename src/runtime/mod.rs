pub mod array;

pub use array::{PredicateFn, VisitFn};
