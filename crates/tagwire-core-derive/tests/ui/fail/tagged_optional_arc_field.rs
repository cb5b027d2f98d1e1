use std::sync::Arc;
use tagwire_core::Injectable;

pub struct Baz;

#[derive(Injectable)]
pub struct Holder {
    pub name: String,
    #[inject]
    pub baz: Option<Arc<Baz>>,
}

fn main() {}
