use monview_geom::{
    AngleResult, Arrangement, MonitorSpec, Setup, ViewerPoint, angles_of, compute_angles,
};

const EPS: f64 = 1e-9;

fn one(spec: MonitorSpec) -> AngleResult {
    angles_of(&[spec], &ViewerPoint).unwrap()[0]
}

fn grid() -> impl Iterator<Item = MonitorSpec> {
    let widths = [5.0, 30.0, 53.1, 80.0, 120.0];
    let distances = [20.0, 45.0, 70.0, 150.0];
    let offsets = [-40.0, 0.0, 12.5];
    widths.into_iter().flat_map(move |w| {
        distances.into_iter().flat_map(move |d| {
            offsets
                .into_iter()
                .map(move |o| MonitorSpec::new(w, d).with_offset(o))
        })
    })
}

#[test]
fn test_zero_width_collapses_to_centre() {
    for spec in grid() {
        let result = one(MonitorSpec { width: 0.0, ..spec });
        assert_eq!(result.left_edge_angle, result.center_angle, "{spec:?}");
        assert_eq!(result.right_edge_angle, result.center_angle, "{spec:?}");
        assert_eq!(result.span(), 0.0);
    }
}

#[test]
fn test_span_shrinks_with_distance() {
    // far off to the side a screen can look wider from further back, so this
    // only holds for screens centred on their own line of sight
    for spec in grid().filter(|s| s.offset == 0.0) {
        let near = one(spec);
        let far = one(MonitorSpec {
            distance: spec.distance * 1.25,
            ..spec
        });
        assert!(far.span() < near.span(), "{spec:?}");
    }
}

#[test]
fn test_span_grows_with_width() {
    for spec in grid() {
        let narrow = one(spec);
        let wide = one(MonitorSpec {
            width: spec.width + 10.0,
            ..spec
        });
        assert!(wide.span() > narrow.span(), "{spec:?}");
    }
}

#[test]
fn test_rotation_shifts_every_angle() {
    for spec in grid() {
        let base = one(spec);
        for theta in [-120.0, -30.0, 7.5, 45.0, 180.0] {
            let turned = one(spec.with_rotation(theta));
            assert!((turned.left_edge_angle - base.left_edge_angle - theta).abs() < EPS);
            assert!((turned.right_edge_angle - base.right_edge_angle - theta).abs() < EPS);
            assert!((turned.center_angle - base.center_angle - theta).abs() < EPS);
            assert!((turned.span() - base.span()).abs() < EPS);
        }
    }
}

#[test]
fn test_sixty_centimetres_at_seventy() {
    let result = one(MonitorSpec::new(60.0, 70.0));
    let expected = 2.0 * (30.0_f64 / 70.0).atan().to_degrees();
    assert!((result.span() - expected).abs() < EPS);
    assert!((result.span() - 46.4).abs() < 0.1);
    assert!(result.center_angle.abs() < EPS);
}

#[test]
fn test_second_monitor_turned_thirty_degrees() {
    let setup = Setup::new(
        Arrangement::Free,
        70.0,
        vec![
            MonitorSpec::new(60.0, 70.0),
            MonitorSpec::new(60.0, 70.0).with_rotation(30.0),
        ],
    );
    let results = compute_angles(&setup, &ViewerPoint).unwrap();
    assert!((results[1].center_angle - 30.0).abs() < EPS);
    assert!((results[1].span() - results[0].span()).abs() < EPS);
}

#[test]
fn test_overlapping_monitors_are_allowed() {
    let setup = Setup::new(Arrangement::Free, 60.0, vec![MonitorSpec::default(); 3]);
    let results = compute_angles(&setup, &ViewerPoint).unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.windows(2).all(|w| w[0] == AngleResult {
        monitor_id: w[0].monitor_id,
        ..w[1]
    }));
}
