use std::sync::Arc;
use tagwire_core::Injectable;

pub struct Baz;

#[derive(Injectable)]
pub struct Holder {
    #[inject]
    pub baz: Arc<Baz>,
}

fn main() {}
