use tagwire_core::{contract, Inject, Injectable};

pub trait UserRepository: Send + Sync {
    fn find(&self, id: u64) -> Option<String>;
}
contract!(dyn UserRepository);

#[derive(Injectable)]
pub struct UserService {
    #[inject]
    pub users: Inject<dyn UserRepository>,
    pub name: String,
}

fn main() {}
