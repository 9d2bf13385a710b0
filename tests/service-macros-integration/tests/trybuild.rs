//! trybuild UI tests for service_macros

#[test]
fn ui_service_derive() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/service_ok.rs");
    t.compile_fail("tests/ui/enum_service.rs");
    t.compile_fail("tests/ui/inject_wrong_type.rs");
}
