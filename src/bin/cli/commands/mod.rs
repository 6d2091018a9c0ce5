pub mod contest;
pub mod problem;
pub mod review;
pub mod stats;
pub mod todo;
