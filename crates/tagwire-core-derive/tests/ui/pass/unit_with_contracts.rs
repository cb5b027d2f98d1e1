use tagwire_core::{contract, Injectable};

pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

pub trait Named: Send + Sync {
    fn name(&self) -> &'static str;
}

contract!(dyn Clock, dyn Named);

#[derive(Injectable)]
#[injectable(implements(dyn Clock, dyn Named))]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        0
    }
}

impl Named for SystemClock {
    fn name(&self) -> &'static str {
        "system"
    }
}

fn main() {}
