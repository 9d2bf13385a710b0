#![allow(dead_code)]

use service_macros::Service;
use std::sync::Arc;

#[derive(Service)]
struct Seed;

#[derive(Service)]
struct Base {
    #[inject("seed")]
    seed: Arc<Seed>,
}

fn main() {}
