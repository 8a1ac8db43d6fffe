#![allow(clippy::float_cmp)]

use lpkit_core::{BoundType, ObjectiveDirection, Problem, ProblemError};
use std::collections::BTreeMap;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn as_map(indices: &[usize], values: &[f64]) -> BTreeMap<usize, f64> {
    indices
        .iter()
        .copied()
        .zip(values.iter().copied())
        .skip(1)
        .collect()
}

/// Four rows p..s, three columns with an objective and a full matrix.
fn sample_problem() -> Problem {
    let mut problem = Problem::new();
    problem.set_name("sample").unwrap();
    problem.set_objective_name("obj").unwrap();
    problem
        .set_objective_direction(ObjectiveDirection::Maximize)
        .unwrap();
    problem.add_rows(4).unwrap();
    for (row, name) in ["p", "q", "r", "s"].into_iter().enumerate() {
        problem.set_row_name(row + 1, name).unwrap();
        problem
            .set_row_bounds(row + 1, BoundType::Upper, 0.0, 100.0 * (row + 1) as f64)
            .unwrap();
    }
    problem.add_columns(3).unwrap();
    for column in 1..=3 {
        problem.set_column_name(column, &format!("x{}", column - 1)).unwrap();
        problem
            .set_column_bounds(column, BoundType::Lower, 0.0, 0.0)
            .unwrap();
        problem
            .set_objective_coefficient(column, column as f64)
            .unwrap();
    }
    problem
        .load_matrix(
            &[0, 1, 1, 2, 3, 3, 4],
            &[0, 1, 3, 2, 1, 2, 3],
            &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        )
        .unwrap();
    problem
}

fn assert_same_structure(a: &Problem, b: &Problem) {
    assert_eq!(a.num_rows().unwrap(), b.num_rows().unwrap());
    assert_eq!(a.num_columns().unwrap(), b.num_columns().unwrap());
    for row in 1..=a.num_rows().unwrap() {
        let (ai, av) = a.matrix_row(row).unwrap();
        let (bi, bv) = b.matrix_row(row).unwrap();
        assert_eq!(as_map(&ai, &av), as_map(&bi, &bv));
        assert_eq!(a.row_bounds(row).unwrap(), b.row_bounds(row).unwrap());
    }
    for column in 1..=a.num_columns().unwrap() {
        assert_eq!(
            a.objective_coefficient(column).unwrap(),
            b.objective_coefficient(column).unwrap()
        );
        assert_eq!(a.column_bounds(column).unwrap(), b.column_bounds(column).unwrap());
    }
    assert_eq!(
        a.objective_direction().unwrap(),
        b.objective_direction().unwrap()
    );
}

#[test]
fn test_new_clear_destroy() {
    init_tracing();
    let mut problem = Problem::new();
    problem.clear().unwrap();
    problem.destroy();
    problem.destroy();
    assert!(matches!(
        problem.clear(),
        Err(ProblemError::UseAfterFree { .. })
    ));
}

#[test]
fn test_every_accessor_fails_after_destroy() {
    init_tracing();
    let mut problem = sample_problem();
    problem.destroy();

    assert!(problem.name().is_err());
    assert!(problem.set_name("x").is_err());
    assert!(problem.objective_name().is_err());
    assert!(problem.objective_direction().is_err());
    assert!(problem.num_rows().is_err());
    assert!(problem.num_columns().is_err());
    assert!(problem.add_columns(1).is_err());
    assert!(problem.row_name(1).is_err());
    assert!(problem.set_row_bounds(1, BoundType::Free, 0.0, 0.0).is_err());
    assert!(problem.objective_coefficient(1).is_err());
    assert!(problem.set_matrix_column(1, &[0], &[0.0]).is_err());
    assert!(problem.load_matrix(&[0], &[0], &[0.0]).is_err());
    assert!(problem.matrix_column(1).is_err());
    assert!(problem.to_csc().is_err());
    assert!(problem.objective_value().is_err());
    assert!(problem.column_primal(1).is_err());
}

#[test]
fn test_mismatched_lengths_leave_matrix_unchanged() {
    init_tracing();
    let mut problem = sample_problem();
    let before = problem.to_csc().unwrap();

    let err = problem
        .set_matrix_column(2, &[0, 1, 2, 3], &[0.0, 7.0])
        .unwrap_err();
    assert_eq!(err.code(), "MATRIX_LENGTH_MISMATCH");
    assert!(matches!(
        problem.load_matrix(&[0, 1, 2], &[0, 1], &[0.0, 1.0, 1.0]),
        Err(ProblemError::LengthMismatch { .. })
    ));
    assert_eq!(problem.to_csc().unwrap(), before);
}

#[test]
fn test_names_round_trip() {
    let mut problem = Problem::new();
    for name in ["Test Name", "ünïcödé", "with spaces and\ttabs"] {
        problem.set_name(name).unwrap();
        assert_eq!(problem.name().unwrap(), name);
        problem.set_objective_name(name).unwrap();
        assert_eq!(problem.objective_name().unwrap(), name);
    }
}

#[test]
fn test_add_rows_and_columns_grow_counts() {
    let mut problem = Problem::new();
    let mut expected_rows = 0;
    for count in [1, 4, 0, 7] {
        let first = problem.add_rows(count).unwrap();
        assert_eq!(first, expected_rows + 1);
        expected_rows += count;
        assert_eq!(problem.num_rows().unwrap(), expected_rows);
    }
    assert_eq!(problem.add_columns(3).unwrap(), 1);
    assert_eq!(problem.add_columns(2).unwrap(), 4);
    assert_eq!(problem.num_columns().unwrap(), 5);
}

#[test]
fn test_set_get_matrix_row_and_column() {
    let mut problem = Problem::new();
    problem.add_rows(10).unwrap();
    problem.add_columns(10).unwrap();
    let indices = [0, 3, 7, 5, 2];
    let values = [9.0, 7.5, 11.0, 5.0, 12.0];

    problem.set_matrix_row(4, &indices, &values).unwrap();
    let (got_indices, got_values) = problem.matrix_row(4).unwrap();
    assert_eq!(as_map(&got_indices, &got_values), as_map(&indices, &values));

    problem.set_matrix_column(9, &indices, &values).unwrap();
    let (got_indices, got_values) = problem.matrix_column(9).unwrap();
    assert_eq!(as_map(&got_indices, &got_values), as_map(&indices, &values));
}

#[test]
fn test_copy_without_names() {
    let original = sample_problem();
    let copy = original.copy(false).unwrap();

    assert_same_structure(&original, &copy);
    assert_eq!(copy.name().unwrap(), "");
    assert_eq!(copy.objective_name().unwrap(), "");
    for row in 1..=copy.num_rows().unwrap() {
        assert_eq!(copy.row_name(row).unwrap(), "");
    }
    for column in 1..=copy.num_columns().unwrap() {
        assert_eq!(copy.column_name(column).unwrap(), "");
    }
}

#[test]
fn test_copy_with_names() {
    let original = sample_problem();
    let copy = original.copy(true).unwrap();

    assert_same_structure(&original, &copy);
    assert_eq!(copy.name().unwrap(), "sample");
    assert_eq!(copy.objective_name().unwrap(), "obj");
    assert_eq!(copy.row_name(3).unwrap(), "r");
    assert_eq!(copy.column_name(2).unwrap(), "x1");
}

#[test]
fn test_copy_survives_destroy_of_original() {
    let mut original = sample_problem();
    let copy = original.copy(true).unwrap();
    original.destroy();
    assert_eq!(copy.num_rows().unwrap(), 4);
    assert_eq!(copy.num_nonzeros().unwrap(), 6);
}

#[test]
fn test_objective_coefficients() {
    let mut problem = Problem::new();
    problem.add_columns(4).unwrap();
    for column in 1..=4 {
        problem
            .set_objective_coefficient(column, 1.5 * column as f64)
            .unwrap();
    }
    for column in 1..=4 {
        assert_eq!(
            problem.objective_coefficient(column).unwrap(),
            1.5 * column as f64
        );
    }
}
