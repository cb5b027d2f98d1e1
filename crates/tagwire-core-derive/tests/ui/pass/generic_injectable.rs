use std::marker::PhantomData;
use tagwire_core::{Inject, Injectable};

#[derive(Injectable, Default)]
pub struct Config {
    pub path: String,
}

#[derive(Injectable)]
pub struct Cache<K: Send + Sync + 'static> {
    #[inject]
    pub config: Inject<Config>,
    keys: PhantomData<K>,
}

fn main() {
    let cache: Cache<u32> = Cache {
        config: Inject::new(),
        keys: PhantomData,
    };
    assert!(!cache.config.is_populated());
}
