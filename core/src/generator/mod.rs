use crate::*;
pub use cluster::*;
pub use random::*;

mod cluster;
mod random;

pub trait RoundGenerator {
    fn generate(&mut self, config: RoundConfig) -> Round;
}
