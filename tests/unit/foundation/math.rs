use super::*;

#[test]
fn lerp_hits_endpoints() {
    assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
    assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
    assert_eq!(lerp(2.0, 6.0, 0.25), 3.0);
}

#[test]
fn format_number_trims() {
    assert_eq!(format_number(12.0, 4), "12");
    assert_eq!(format_number(0.5, 4), "0.5");
    assert_eq!(format_number(1.23456, 3), "1.235");
    assert_eq!(format_number(-0.00001, 3), "0");
    assert_eq!(format_number(f64::NAN, 3), "0");
}
