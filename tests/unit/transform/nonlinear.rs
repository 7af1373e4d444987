use super::*;
use glam::DVec3;

fn assert_close(a: DVec3, b: DVec3) {
    assert!((a - b).length() < 1e-9, "{a:?} != {b:?}");
}

#[test]
fn log_base_zero_axis_passes_through() {
    let t = LogTransform::new(DVec3::new(0.0, 2.0, 0.0)).unwrap();
    let q = t.map(DVec3::new(-3.5, 0.0, 7.0));
    assert_eq!(q.x, -3.5);
    assert_eq!(q.y, 0.0);
    assert_eq!(q.z, 7.0);
}

#[test]
fn log_forward_matches_sign_preserving_formula() {
    let t = LogTransform::new(DVec3::new(0.0, 2.0, 0.0)).unwrap();
    let q = t.map(DVec3::new(0.0, 3.0, 0.0));
    assert!((q.y - 2.0).abs() < 1e-12); // log2(1 + 3) = 2
}

#[test]
fn log_is_total_on_negative_input() {
    let t = LogTransform::new(DVec3::new(10.0, 10.0, 0.0)).unwrap();
    let q = t.map(DVec3::new(-9.0, 9.0, 0.0));
    assert!((q.x + 1.0).abs() < 1e-12); // sign-preserving: -log10(1 + 9)
    assert!((q.y - 1.0).abs() < 1e-12);
    assert!(q.x.is_finite());
}

#[test]
fn log_roundtrips_through_imap_and_inverse() {
    let t = LogTransform::new(DVec3::new(2.0, 10.0, 0.0)).unwrap();
    let inverse = t.inverse().unwrap();
    for p in [
        DVec3::new(5.0, -0.25, 1.0),
        DVec3::new(-100.0, 42.0, -3.0),
        DVec3::ZERO,
    ] {
        assert_close(t.imap(t.map(p)).unwrap(), p);
        assert_close(inverse.map(t.map(p)), p);
    }
}

#[test]
fn log_inverse_negates_base() {
    let t = LogTransform::new(DVec3::new(2.0, 0.0, 0.0)).unwrap();
    let uniforms = t.shader_uniforms(MapDirection::Inverse).unwrap();
    assert_eq!(uniforms[0], UniformValue::Vec3([-2.0, 0.0, 0.0]));
}

#[test]
fn log_rejects_unit_base_magnitude() {
    assert!(LogTransform::new(DVec3::new(1.0, 2.0, 0.0)).is_err());
    assert!(LogTransform::new(DVec3::new(0.0, -1.0, 0.0)).is_err());
}

#[test]
fn polar_maps_theta_r_to_cartesian() {
    let t = PolarTransform;
    let q = t.map(DVec3::new(0.0, 2.0, 1.0));
    assert_close(q, DVec3::new(2.0, 0.0, 1.0));
    let q = t.map(DVec3::new(std::f64::consts::FRAC_PI_2, 3.0, 0.0));
    assert_close(q, DVec3::new(0.0, 3.0, 0.0));
}

#[test]
fn polar_origin_is_a_fixed_degenerate_point() {
    let t = PolarTransform;
    for theta in [0.0, 1.0, -2.5, std::f64::consts::PI] {
        let back = t.imap(t.map(DVec3::new(theta, 0.0, 0.0))).unwrap();
        assert_eq!(back.y, 0.0); // r collapses to 0 for any theta
    }
    // atan2(0, 0) convention keeps the origin mapping total.
    assert_eq!(t.map(t.imap(DVec3::ZERO).unwrap()), DVec3::ZERO);
}

#[test]
fn polar_inverse_pairing_roundtrips() {
    let t = PolarTransform;
    let inverse = t.inverse().unwrap();
    let twice = inverse.inverse().unwrap();
    let p = DVec3::new(0.7, 1.5, 0.0);
    assert_close(inverse.map(t.map(p)), p);
    assert_close(twice.map(p), t.map(p));
}

#[test]
fn inv_polar_recovers_angle_and_radius() {
    let t = InvPolarTransform;
    let q = t.map(DVec3::new(0.0, 4.0, 0.0));
    assert_close(q, DVec3::new(std::f64::consts::FRAC_PI_2, 4.0, 0.0));
}
