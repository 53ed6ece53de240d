// Tests for the tensor algebra: shape invariants, matrix product, transpose.

use paddle_nn::{matrix_product, transpose_2d, Error, Tensor};

fn counting(rows: usize, cols: usize) -> Tensor<f64, 2> {
    let data = (1..=rows * cols).map(|v| v as f64).collect();
    Tensor::from_vec([rows, cols], data).unwrap()
}

#[test]
fn size_matches_product_of_shape() {
    for extents in [[1, 1, 1], [2, 3, 4], [5, 1, 7], [0, 3, 2]] {
        let t = Tensor::<f32, 3>::new(&extents).unwrap();
        assert_eq!(t.size(), t.shape().iter().product::<usize>());
    }
}

#[test]
fn construction_needs_exactly_rank_extents() {
    assert!(matches!(
        Tensor::<f32, 2>::new(&[4]),
        Err(Error::DimensionMismatch { expected: 2, got: 1 })
    ));
    assert!(Tensor::<f32, 4>::new(&[1, 2, 3, 4]).is_ok());
}

#[test]
fn matrix_product_is_the_dense_product() {
    let a = counting(2, 3); // [[1,2,3],[4,5,6]]
    let b = Tensor::from_vec([3, 2], vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]).unwrap();
    let c = matrix_product(&a, &b).unwrap();
    assert_eq!(c.shape(), [2, 2]);
    assert_eq!(c.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
}

#[test]
fn matrix_product_rejects_inner_mismatch() {
    let a = counting(2, 3);
    let b = counting(2, 3);
    assert!(matches!(
        matrix_product(&a, &b),
        Err(Error::MatmulShape { m: 2, k1: 3, k2: 2, n: 3 })
    ));
}

#[test]
fn transpose_of_2x3() {
    let t = counting(2, 3);
    let tt = transpose_2d(&t).unwrap();
    assert_eq!(tt.shape(), [3, 2]);
    for i in 0..3 {
        for j in 0..2 {
            assert_eq!(tt[[i, j]], t[[j, i]]);
        }
    }
}

#[test]
fn double_transpose_is_identity() {
    for (rows, cols) in [(1, 1), (1, 5), (4, 1), (3, 7)] {
        let t = counting(rows, cols);
        assert_eq!(transpose_2d(&transpose_2d(&t).unwrap()).unwrap(), t);
    }
}

#[test]
fn transpose_swaps_the_last_two_axes_only() {
    let data = (0..24).map(|v| v as f32).collect();
    let t = Tensor::from_vec([2, 3, 4], data).unwrap();
    let tt = transpose_2d(&t).unwrap();
    assert_eq!(tt.shape(), [2, 4, 3]);
    assert_eq!(tt[[1, 3, 2]], t[[1, 2, 3]]);
    assert_eq!(tt[[0, 1, 0]], t[[0, 0, 1]]);
}

#[test]
fn transpose_needs_rank_two() {
    let v = Tensor::<f32, 1>::new(&[4]).unwrap();
    assert!(matches!(transpose_2d(&v), Err(Error::RankTooLow { rank: 1 })));
}

#[test]
fn reshape_rejects_growth_past_storage() {
    let mut t = Tensor::<f32, 2>::zeros([2, 2]);
    assert!(matches!(
        t.reshape(&[3, 2]),
        Err(Error::ReshapeExceedsStorage { requested: 6, available: 4 })
    ));
    assert!(matches!(t.reshape(&[4]), Err(Error::DimensionMismatch { .. })));
    assert_eq!(t.shape(), [2, 2]);
}

#[test]
fn display_renders_nested_blocks() {
    let data = (1..=8).map(|v| v as f64).collect();
    let t = Tensor::from_vec([2, 2, 2], data).unwrap();
    let expected = "{\n  {\n    1 2\n    3 4\n  }\n  {\n    5 6\n    7 8\n  }\n}";
    assert_eq!(t.to_string(), expected);
}
