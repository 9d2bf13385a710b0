#![allow(dead_code)]

use service_macros::Service;

#[derive(Service)]
enum Mode {
    Active,
}

fn main() {}
