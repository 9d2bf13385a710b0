use infrastructure_common::{BoxError, Inject, Service};
use service_macros::Service;

#[derive(Service)]
struct Seed;

#[derive(Service)]
#[service(stop = "flush")]
struct Journal {
    #[inject]
    seed: Inject<Seed>,
}

impl Journal {
    async fn flush(&self) -> Result<(), BoxError> {
        Ok(())
    }
}

fn main() {
    let journal = Journal { seed: Inject::new() };
    assert_eq!(journal.injection_points().len(), 1);
    assert!(journal.as_lifecycle().is_some());
    assert!(journal.seed.get().is_none());
}
