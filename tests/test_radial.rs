use ndarray::Array2;
use radprof::{rad_ind_by_rad_sq, rad_sq_by_rad_ind, RadialEngine, RadialStatsError};

#[test]
fn totals_equal_the_sum_over_populated_bins() {
    let image = Array2::from_elem((7, 7), 4.0f32);
    let mut engine = RadialEngine::new();
    let mut mean = vec![0.0; 5];
    let mut var = vec![0.0; 5];
    let mut n_pts = vec![0; 5];

    let totals = engine
        .rad_prof(image.view(), None, (3, 3), 3, &mut mean, &mut var, &mut n_pts)
        .unwrap();

    let count_sum: i64 = n_pts.iter().map(|&c| c as i64).sum();
    let value_sum: f64 = mean
        .iter()
        .zip(n_pts.iter())
        .map(|(&m, &c)| m * c as f64)
        .sum();

    assert_eq!(totals.tot_pts, count_sum);
    assert!((totals.tot_counts - value_sum).abs() < 1e-9);
}

#[test]
fn masking_every_pixel_zeroes_everything() {
    let image = Array2::from_elem((5, 5), 9.0f32);
    let mask = Array2::from_elem((5, 5), true);
    let mut engine = RadialEngine::new();
    let mut mean = vec![1.0; 4];
    let mut var = vec![1.0; 4];
    let mut n_pts = vec![1; 4];

    let totals = engine
        .rad_prof(image.view(), Some(mask.view()), (2, 2), 2, &mut mean, &mut var, &mut n_pts)
        .unwrap();

    assert_eq!(totals.tot_pts, 0);
    assert_eq!(totals.tot_counts, 0.0);
    assert!(mean.iter().all(|&v| v == 0.0));
    assert!(var.iter().all(|&v| v == 0.0));
    assert!(n_pts.iter().all(|&v| v == 0));

    let asymm = engine
        .rad_asymm(image.view(), Some(mask.view()), (2, 2), 2)
        .unwrap();
    assert_eq!(asymm.asymm, 0.0);
    assert_eq!(asymm.tot_pts, 0);
}

#[test]
fn asymmetry_is_translation_invariant_in_pixel_value() {
    // An asymmetric bump: shifting every pixel value by a constant must
    // leave the unweighted asymmetry unchanged.
    let mut base = Array2::from_elem((7, 7), 50.0f32);
    base[[2, 4]] = 80.0;
    base[[5, 3]] = 30.0;

    let shifted = base.mapv(|v| v + 25.0);

    let mut engine_a = RadialEngine::new();
    let mut engine_b = RadialEngine::new();
    let a = engine_a.rad_asymm(base.view(), None, (3, 3), 3).unwrap();
    let b = engine_b.rad_asymm(shifted.view(), None, (3, 3), 3).unwrap();

    assert!((a.asymm - b.asymm).abs() < 1e-6);
    assert_eq!(a.tot_pts, b.tot_pts);
}

#[test]
fn asymmetry_scales_quadratically_with_pixel_value() {
    let mut base = Array2::from_elem((7, 7), 10.0f32);
    base[[2, 4]] = 40.0;
    base[[5, 3]] = 5.0;

    let k = 3.0f32;
    let scaled = base.mapv(|v| v * k);

    let mut engine_a = RadialEngine::new();
    let mut engine_b = RadialEngine::new();
    let a = engine_a.rad_asymm(base.view(), None, (3, 3), 3).unwrap();
    let b = engine_b.rad_asymm(scaled.view(), None, (3, 3), 3).unwrap();

    assert!((b.asymm - a.asymm * (k as f64).powi(2)).abs() < 1e-3);
}

#[test]
fn radially_symmetric_bump_has_near_zero_asymmetry_that_grows_off_center() {
    // Constant per Mirage bin around (4, 4): exact zero variance within
    // every bin at the true center.
    let bin_of = |d_sq: i64| -> i32 {
        match d_sq {
            0 => 0,
            1 => 1,
            2 => 2,
            k => ((k as f64).sqrt() + 1.5).floor() as i32,
        }
    };
    let mut image = Array2::from_elem((9, 9), 0.0f32);
    for i in 0..9i64 {
        for j in 0..9i64 {
            let d_sq = (i - 4) * (i - 4) + (j - 4) * (j - 4);
            image[[i as usize, j as usize]] = 500.0 / (1.0 + bin_of(d_sq) as f32);
        }
    }

    let mut engine = RadialEngine::new();
    let centered = engine.rad_asymm(image.view(), None, (4, 4), 3).unwrap();
    let shifted = engine.rad_asymm(image.view(), None, (4, 5), 3).unwrap();

    assert!(centered.asymm.abs() < 1e-6);
    assert!(shifted.asymm > centered.asymm);
}

#[test]
fn round_trip_and_monotonicity_of_the_radial_index_tables() {
    let fwd = rad_ind_by_rad_sq(400);
    let inv = rad_sq_by_rad_ind(20);

    for (k, &rad_sq) in inv.iter().enumerate() {
        let rad_sq = rad_sq as usize;
        if rad_sq < fwd.len() {
            assert_eq!(fwd[rad_sq], k as i32);
        }
    }

    assert!(fwd.windows(2).all(|w| w[1] >= w[0]));
    assert!(inv[2..].windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn off_image_center_returns_empty_totals_for_any_radius() {
    let image = Array2::from_elem((6, 6), 1.0f32);
    let mut engine = RadialEngine::new();

    for rad in [0usize, 1, 5, 50] {
        let result = engine
            .rad_asymm(image.view(), None, (-40, 120), rad)
            .unwrap();
        assert_eq!(result.tot_pts, 0);
        assert_eq!(result.asymm, 0.0);
    }
}

// S1: 3x3 flat image, center (1,1), radius 1, length-3 output.
#[test]
fn scenario_s1_trivial_flat_image() {
    let image = Array2::from_elem((3, 3), 1.0f32);
    let mut engine = RadialEngine::new();
    let mut mean = vec![0.0; 3];
    let mut var = vec![0.0; 3];
    let mut n_pts = vec![0; 3];

    let totals = engine
        .rad_prof(image.view(), None, (1, 1), 1, &mut mean, &mut var, &mut n_pts)
        .unwrap();

    assert_eq!(n_pts, vec![1, 4, 0]);
    assert_eq!(mean, vec![1.0, 1.0, 0.0]);
    assert_eq!(var, vec![0.0, 0.0, 0.0]);
    assert_eq!(totals.tot_pts, 5);
    assert_eq!(totals.tot_counts, 5.0);

    let asymm = engine.rad_asymm(image.view(), None, (1, 1), 1).unwrap();
    assert_eq!(asymm.asymm, 0.0);
}

// S2: radSqProf alignment, exact vs. over-allocated output length.
#[test]
fn scenario_s2_rad_sq_prof_alignment() {
    let mut image = Array2::from_elem((3, 3), 1.0f32);
    image[[1, 1]] = 5.0;
    let engine = RadialEngine::new();

    let mut mean = vec![0.0; 2];
    let mut var = vec![0.0; 2];
    let mut n_pts = vec![0; 2];
    engine
        .rad_sq_prof(image.view(), None, (1, 1), 1, &mut mean, &mut var, &mut n_pts)
        .unwrap();
    assert_eq!(n_pts, vec![1, 4]);
    assert_eq!(mean, vec![5.0, 1.0]);

    let mut mean3 = vec![0.0; 3];
    let mut var3 = vec![0.0; 3];
    let mut n_pts3 = vec![0; 3];
    engine
        .rad_sq_prof(image.view(), None, (1, 1), 1, &mut mean3, &mut var3, &mut n_pts3)
        .unwrap();
    assert_eq!(n_pts3, vec![1, 4, 0]);
    assert_eq!(mean3, vec![5.0, 1.0, 0.0]);
}

// S3: masked top row boundary.
#[test]
fn scenario_s3_masked_boundary() {
    let image = Array2::from_elem((5, 5), 10.0f32);
    let mut mask = Array2::from_elem((5, 5), false);
    mask.row_mut(0).fill(true);
    let mut engine = RadialEngine::new();
    let mut mean = vec![0.0; 4];
    let mut var = vec![0.0; 4];
    let mut n_pts = vec![0; 4];

    let totals = engine
        .rad_prof(image.view(), Some(mask.view()), (2, 2), 2, &mut mean, &mut var, &mut n_pts)
        .unwrap();

    assert_eq!(totals.tot_pts, 12);
}

// S4: off-image center, empty iteration box.
#[test]
fn scenario_s4_off_image_center() {
    let image = Array2::from_elem((4, 4), 1.0f32);
    let mut engine = RadialEngine::new();
    let mut mean = vec![0.0; 5];
    let mut var = vec![0.0; 5];
    let mut n_pts = vec![0; 5];

    let totals = engine
        .rad_prof(image.view(), None, (-5, -5), 3, &mut mean, &mut var, &mut n_pts)
        .unwrap();

    assert_eq!(totals.tot_pts, 0);
    assert!(mean.iter().all(|&v| v == 0.0));
}

// S5: weighted asymmetry bias floor, bias larger than every pixel.
#[test]
fn scenario_s5_weighted_bias_floor_stays_finite() {
    let mut image = Array2::from_elem((5, 5), 100.0f32);
    image[[1, 2]] = 108.0;
    image[[3, 2]] = 92.0;
    let mut engine = RadialEngine::new();

    let result = engine
        .rad_asymm_weighted(image.view(), None, (2, 2), 2, 500.0, 5.0, 2.0)
        .unwrap();

    assert!(result.asymm.is_finite());
    assert!(result.asymm >= 0.0);
}

// S6: radial index table boundaries.
#[test]
fn scenario_s6_radial_index_boundaries() {
    assert_eq!(rad_ind_by_rad_sq(10), vec![0, 1, 2, 3, 3, 3, 3, 4, 4, 4]);
    assert_eq!(rad_sq_by_rad_ind(6), vec![0, 1, 2, 4, 9, 16]);
}

#[test]
fn output_buffer_too_small_is_a_reported_error_not_a_panic() {
    let image = Array2::from_elem((3, 3), 1.0f32);
    let mut engine = RadialEngine::new();
    let mut mean = vec![0.0; 1];
    let mut var = vec![0.0; 1];
    let mut n_pts = vec![0; 1];

    let err = engine
        .rad_prof(image.view(), None, (1, 1), 1, &mut mean, &mut var, &mut n_pts)
        .unwrap_err();

    assert_eq!(err, RadialStatsError::OutputTooSmall { required: 3, got: 1 });
}

#[test]
fn mismatched_mask_shape_is_a_reported_error() {
    let image = Array2::from_elem((4, 4), 1.0f32);
    let mask = Array2::from_elem((3, 3), false);
    let mut engine = RadialEngine::new();

    let err = engine
        .rad_asymm(image.view(), Some(mask.view()), (2, 2), 1)
        .unwrap_err();

    assert_eq!(
        err,
        RadialStatsError::MismatchedMaskShape {
            image_shape: (4, 4),
            mask_shape: (3, 3),
        }
    );
}
