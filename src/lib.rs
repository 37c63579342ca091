pub mod combinatorics;
pub mod error;
pub mod noise;
pub mod privacy;
pub mod util;
