use rand::Rng;
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::activation::sigmoid;
use crate::error::{ensure_shape, NnError, Result};

/// Dense row-major matrix over any `f64` storage.
///
/// Element `(i, j)` lives at `data[i * stride + j]`. The stride may exceed
/// `cols`, which is how views into a wider parent are represented without
/// copying. The storage type decides ownership:
///
/// - [`Matrix`] owns a `Vec<f64>` and always has `stride == cols`.
/// - [`MatrixView`] borrows `&[f64]` from a parent.
/// - [`MatrixViewMut`] borrows `&mut [f64]`; writes land in the parent.
///
/// Views carry the parent's lifetime, so the borrow checker rejects any view
/// that would outlive its owner.
///
/// Equality compares shape and visible elements only, so a strided view
/// equals a compact matrix holding the same values.
#[derive(Debug, Clone)]
pub struct MatrixBase<S> {
    rows: usize,
    cols: usize,
    stride: usize,
    data: S,
}

pub type Matrix = MatrixBase<Vec<f64>>;
pub type MatrixView<'a> = MatrixBase<&'a [f64]>;
pub type MatrixViewMut<'a> = MatrixBase<&'a mut [f64]>;

/// Number of backing elements a `rows x cols` region with `stride` touches.
fn span(rows: usize, cols: usize, stride: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        (rows - 1) * stride + cols
    }
}

impl Matrix {
    /// Allocates a zeroed `rows x cols` matrix with `stride == cols`.
    pub fn alloc(rows: usize, cols: usize) -> Result<Matrix> {
        let len = rows
            .checked_mul(cols)
            .ok_or(NnError::AllocationFailure { rows, cols })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| NnError::AllocationFailure { rows, cols })?;
        data.resize(len, 0.0);

        Ok(Matrix { rows, cols, stride: cols, data })
    }

    /// Builds a matrix from equally long rows.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, Vec::len);
        let mut res = Matrix::alloc(rows, cols)?;

        for (i, row) in data.iter().enumerate() {
            ensure_shape("from_data", (1, cols), (1, row.len()))?;
            res.row_slice_mut(i).copy_from_slice(row);
        }

        Ok(res)
    }
}

impl<S: AsRef<[f64]>> MatrixBase<S> {
    /// Wraps existing storage. Fails if `stride < cols` or `data` is too
    /// short to hold every row.
    pub fn from_parts(rows: usize, cols: usize, stride: usize, data: S) -> Result<Self> {
        if rows > 0 && stride < cols {
            return Err(NnError::ShapeMismatch {
                op: "from_parts",
                expected: (rows, cols),
                actual: (rows, stride),
            });
        }
        let needed = span(rows, cols, stride);
        let len = data.as_ref().len();
        if len < needed {
            return Err(NnError::OutOfRange { index: needed, bound: len });
        }

        Ok(MatrixBase { rows, cols, stride, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Checked element access.
    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        if i >= self.rows {
            return Err(NnError::OutOfRange { index: i, bound: self.rows });
        }
        if j >= self.cols {
            return Err(NnError::OutOfRange { index: j, bound: self.cols });
        }
        Ok(self.data.as_ref()[i * self.stride + j])
    }

    /// The `cols` values of row `i`.
    ///
    /// # Panics
    /// If `i >= rows`.
    pub fn row_slice(&self, i: usize) -> &[f64] {
        assert!(i < self.rows, "row {i} out of range for {} rows", self.rows);
        let start = i * self.stride;
        &self.data.as_ref()[start..start + self.cols]
    }

    /// Non-owning view of row `index`, sharing this matrix's stride.
    pub fn row(&self, index: usize) -> Result<MatrixView<'_>> {
        if index >= self.rows {
            return Err(NnError::OutOfRange { index, bound: self.rows });
        }
        self.view(index, 0, 1, self.cols)
    }

    /// Non-owning view of the `rows x cols` block whose top-left corner is
    /// `(row, col)`.
    pub fn view(&self, row: usize, col: usize, rows: usize, cols: usize) -> Result<MatrixView<'_>> {
        let (start, len) = self.region(row, col, rows, cols)?;
        Ok(MatrixBase {
            rows,
            cols,
            stride: self.stride,
            data: &self.data.as_ref()[start..start + len],
        })
    }

    pub fn as_view(&self) -> MatrixView<'_> {
        MatrixBase {
            rows: self.rows,
            cols: self.cols,
            stride: self.stride,
            data: self.data.as_ref(),
        }
    }

    /// Copies the visible elements into a compact owning matrix.
    pub fn to_matrix(&self) -> Result<Matrix> {
        let mut res = Matrix::alloc(self.rows, self.cols)?;
        res.copy_from(self)?;
        Ok(res)
    }

    /// Row-major iterator over the visible elements, skipping stride padding.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.rows).flat_map(move |i| self.row_slice(i).iter().copied())
    }

    pub fn squared_norm(&self) -> f64 {
        self.iter().map(|x| x * x).sum()
    }

    /// Allocating product `self * rhs`.
    pub fn dot<T: AsRef<[f64]>>(&self, rhs: &MatrixBase<T>) -> Result<Matrix> {
        let mut res = Matrix::alloc(self.rows, rhs.cols)?;
        multiply(&mut res, self, rhs)?;
        Ok(res)
    }

    /// Debug rendering in the same layout `print` writes to stdout.
    pub fn render(&self, label: &str, indent: usize) -> String {
        let pad = " ".repeat(indent);
        let mut out = format!("{pad}{label} = [\n");
        for i in 0..self.rows {
            out.push_str(&pad);
            out.push_str("    ");
            for x in self.row_slice(i) {
                out.push_str(&format!("{x:.6} "));
            }
            out.push('\n');
        }
        out.push_str(&format!("{pad}]\n"));
        out
    }

    pub fn print(&self, label: &str, indent: usize) {
        print!("{}", self.render(label, indent));
    }

    /// Start offset and backing length of a sub-region, bounds checked.
    fn region(&self, row: usize, col: usize, rows: usize, cols: usize) -> Result<(usize, usize)> {
        let row_end = row.checked_add(rows).unwrap_or(usize::MAX);
        if row_end > self.rows {
            return Err(NnError::OutOfRange { index: row_end, bound: self.rows });
        }
        let col_end = col.checked_add(cols).unwrap_or(usize::MAX);
        if col_end > self.cols {
            return Err(NnError::OutOfRange { index: col_end, bound: self.cols });
        }

        let len = span(rows, cols, self.stride);
        if len == 0 {
            return Ok((0, 0));
        }
        Ok((row * self.stride + col, len))
    }
}

impl<S: AsRef<[f64]> + AsMut<[f64]>> MatrixBase<S> {
    /// Mutable access to row `i`.
    ///
    /// # Panics
    /// If `i >= rows`.
    pub fn row_slice_mut(&mut self, i: usize) -> &mut [f64] {
        assert!(i < self.rows, "row {i} out of range for {} rows", self.rows);
        let start = i * self.stride;
        let cols = self.cols;
        &mut self.data.as_mut()[start..start + cols]
    }

    pub fn row_mut(&mut self, index: usize) -> Result<MatrixViewMut<'_>> {
        if index >= self.rows {
            return Err(NnError::OutOfRange { index, bound: self.rows });
        }
        let cols = self.cols;
        self.view_mut(index, 0, 1, cols)
    }

    pub fn as_view_mut(&mut self) -> MatrixViewMut<'_> {
        MatrixBase {
            rows: self.rows,
            cols: self.cols,
            stride: self.stride,
            data: self.data.as_mut(),
        }
    }

    pub fn view_mut(
        &mut self,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> Result<MatrixViewMut<'_>> {
        let (start, len) = self.region(row, col, rows, cols)?;
        Ok(MatrixBase {
            rows,
            cols,
            stride: self.stride,
            data: &mut self.data.as_mut()[start..start + len],
        })
    }

    /// Applies `f` to every visible element in place.
    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64,
    {
        for i in 0..self.rows {
            for x in self.row_slice_mut(i) {
                *x = f(*x);
            }
        }
    }

    pub fn fill(&mut self, value: f64) {
        self.apply(|_| value);
    }

    /// Overwrites every element with a uniform sample from `[low, high)`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, low: f64, high: f64, rng: &mut R) {
        for i in 0..self.rows {
            for x in self.row_slice_mut(i) {
                *x = low + rng.gen::<f64>() * (high - low);
            }
        }
    }

    pub fn sigmoid_inplace(&mut self) {
        self.apply(sigmoid);
    }

    pub fn scale(&mut self, factor: f64) {
        self.apply(|x| x * factor);
    }

    pub fn copy_from<T: AsRef<[f64]>>(&mut self, src: &MatrixBase<T>) -> Result<()> {
        ensure_shape("copy", self.shape(), src.shape())?;
        for i in 0..self.rows {
            self.row_slice_mut(i).copy_from_slice(src.row_slice(i));
        }
        Ok(())
    }

    /// Elementwise `self += a`.
    pub fn add<T: AsRef<[f64]>>(&mut self, a: &MatrixBase<T>) -> Result<()> {
        self.add_scaled(a, 1.0)
    }

    /// Elementwise `self += factor * a`.
    pub fn add_scaled<T: AsRef<[f64]>>(&mut self, a: &MatrixBase<T>, factor: f64) -> Result<()> {
        ensure_shape("add", self.shape(), a.shape())?;
        for i in 0..self.rows {
            for (x, y) in self.row_slice_mut(i).iter_mut().zip(a.row_slice(i)) {
                *x += factor * y;
            }
        }
        Ok(())
    }
}

/// `dst = a * b` by the plain triple loop.
///
/// `dst` is borrowed mutably, so it can never alias `a` or `b`.
pub fn multiply<D, A, B>(dst: &mut MatrixBase<D>, a: &MatrixBase<A>, b: &MatrixBase<B>) -> Result<()>
where
    D: AsRef<[f64]> + AsMut<[f64]>,
    A: AsRef<[f64]>,
    B: AsRef<[f64]>,
{
    if a.cols != b.rows {
        return Err(NnError::ShapeMismatch {
            op: "multiply",
            expected: (a.cols, b.cols),
            actual: b.shape(),
        });
    }
    ensure_shape("multiply", (a.rows, b.cols), dst.shape())?;

    for i in 0..dst.rows {
        for j in 0..dst.cols {
            let mut sum = 0.0;
            for k in 0..a.cols {
                sum += a[(i, k)] * b[(k, j)];
            }
            dst[(i, j)] = sum;
        }
    }
    Ok(())
}

/// `dst = [src | extra]`, where `extra` is a single column.
pub fn append_column<D, S, E>(
    dst: &mut MatrixBase<D>,
    src: &MatrixBase<S>,
    extra: &MatrixBase<E>,
) -> Result<()>
where
    D: AsRef<[f64]> + AsMut<[f64]>,
    S: AsRef<[f64]>,
    E: AsRef<[f64]>,
{
    ensure_shape("append_column", (src.rows, src.cols + 1), dst.shape())?;
    ensure_shape("append_column", (src.rows, 1), extra.shape())?;

    let last = src.cols;
    for i in 0..dst.rows {
        let row = dst.row_slice_mut(i);
        row[..last].copy_from_slice(src.row_slice(i));
        row[last] = extra[(i, 0)];
    }
    Ok(())
}

/// `dst = [src; extra]`, where `extra` is a single row.
pub fn append_row<D, S, E>(
    dst: &mut MatrixBase<D>,
    src: &MatrixBase<S>,
    extra: &MatrixBase<E>,
) -> Result<()>
where
    D: AsRef<[f64]> + AsMut<[f64]>,
    S: AsRef<[f64]>,
    E: AsRef<[f64]>,
{
    ensure_shape("append_row", (src.rows + 1, src.cols), dst.shape())?;
    ensure_shape("append_row", (1, src.cols), extra.shape())?;

    for i in 0..src.rows {
        dst.row_slice_mut(i).copy_from_slice(src.row_slice(i));
    }
    dst.row_slice_mut(src.rows).copy_from_slice(extra.row_slice(0));
    Ok(())
}

impl<S: AsRef<[f64]>> Index<(usize, usize)> for MatrixBase<S> {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of range for {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.data.as_ref()[i * self.stride + j]
    }
}

impl<S: AsRef<[f64]> + AsMut<[f64]>> IndexMut<(usize, usize)> for MatrixBase<S> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of range for {}x{} matrix",
            self.rows,
            self.cols
        );
        let stride = self.stride;
        &mut self.data.as_mut()[i * stride + j]
    }
}

impl<S: AsRef<[f64]>, T: AsRef<[f64]>> PartialEq<MatrixBase<T>> for MatrixBase<S> {
    fn eq(&self, other: &MatrixBase<T>) -> bool {
        self.shape() == other.shape() && self.iter().eq(other.iter())
    }
}

impl<S: AsRef<[f64]>> fmt::Display for MatrixBase<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = format!("Matrix ({}x{})", self.rows, self.cols);
        f.write_str(&self.render(&label, 0))
    }
}

/// Prints a matrix labelled with the expression that produced it.
#[macro_export]
macro_rules! mat_print {
    ($m:expr) => {
        $m.print(stringify!($m), 0)
    };
}

#[cfg(test)]
mod tests {
    use super::{append_column, append_row, multiply, Matrix, MatrixView};
    use crate::error::NnError;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn sample(rows: usize, cols: usize) -> Matrix {
        let data = (0..rows)
            .map(|i| (0..cols).map(|j| (i * cols + j) as f64).collect())
            .collect();
        Matrix::from_data(data).unwrap()
    }

    #[test]
    fn alloc_is_zeroed_and_compact() {
        let m = Matrix::alloc(3, 4).unwrap();
        assert_eq!(m.shape(), (3, 4));
        assert_eq!(m.stride(), 4);
        assert!(m.iter().all(|x| x == 0.0));
    }

    #[test]
    fn alloc_overflow_is_allocation_failure() {
        let err = Matrix::alloc(usize::MAX, 2).unwrap_err();
        match err {
            NnError::AllocationFailure { rows, cols } => assert_eq!((rows, cols), (usize::MAX, 2)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn from_data_rejects_ragged_rows() {
        let err = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, NnError::ShapeMismatch { op: "from_data", .. }));
    }

    #[test]
    fn row_view_shares_parent_stride() {
        let m = sample(3, 4);
        let r = m.row(1).unwrap();
        assert_eq!(r.shape(), (1, 4));
        assert_eq!(r.stride(), 4);
        assert_eq!(r.row_slice(0), &[4.0, 5.0, 6.0, 7.0]);
        assert!(matches!(m.row(3), Err(NnError::OutOfRange { index: 3, bound: 3 })));
    }

    #[test]
    fn strided_columns_over_interleaved_table() {
        // x1, x2, y per row
        let table = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        let inputs = MatrixView::from_parts(4, 2, 3, &table[..]).unwrap();
        let targets = MatrixView::from_parts(4, 1, 3, &table[2..]).unwrap();

        assert_eq!(inputs.row_slice(2), &[1.0, 0.0]);
        assert_eq!(targets.iter().collect::<Vec<_>>(), vec![0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn from_parts_rejects_short_storage() {
        let data = [0.0; 5];
        assert!(MatrixView::from_parts(2, 3, 3, &data[..]).is_err());
        assert!(MatrixView::from_parts(2, 3, 2, &data[..]).is_err());
    }

    #[test]
    fn writes_through_mutable_view_reach_parent() {
        let mut m = sample(3, 3);
        {
            let mut block = m.view_mut(1, 1, 2, 2).unwrap();
            block.fill(-1.0);
        }
        assert_eq!(m.row_slice(0), &[0.0, 1.0, 2.0]);
        assert_eq!(m.row_slice(1), &[3.0, -1.0, -1.0]);
        assert_eq!(m.row_slice(2), &[6.0, -1.0, -1.0]);

        m.row_mut(0).unwrap()[(0, 2)] = 9.0;
        assert_eq!(m.get(0, 2).unwrap(), 9.0);
        assert!(m.row_mut(3).is_err());
    }

    #[test]
    fn equality_ignores_stride_and_padding() {
        // same 2x2 block, different padding between rows
        let a = [1.0, 2.0, 7.0, 3.0, 4.0];
        let b = [1.0, 2.0, -5.0, -5.0, 3.0, 4.0];
        let va = MatrixView::from_parts(2, 2, 3, &a[..]).unwrap();
        let vb = MatrixView::from_parts(2, 2, 4, &b[..]).unwrap();
        let compact = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();

        assert_eq!(va, vb);
        assert_eq!(va, compact);
        assert_eq!(compact, vb);
        assert_ne!(va, MatrixView::from_parts(1, 2, 3, &a[..]).unwrap());
        assert_ne!(compact, Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 5.0]]).unwrap());
    }

    #[test]
    fn get_checks_columns_against_cols_not_stride() {
        let m = sample(2, 4);
        let v = m.view(0, 0, 2, 2).unwrap();
        assert_eq!(v.get(1, 1).unwrap(), 5.0);
        assert!(matches!(v.get(0, 2), Err(NnError::OutOfRange { index: 2, bound: 2 })));
    }

    #[test]
    fn copy_requires_identical_shapes() {
        let mut dst = Matrix::alloc(2, 2).unwrap();
        let src = sample(2, 3);
        assert!(dst.copy_from(&src).is_err());
        dst.copy_from(&src.view(0, 1, 2, 2).unwrap()).unwrap();
        assert_eq!(dst.iter().collect::<Vec<_>>(), vec![1.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn multiply_known_product() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let b = Matrix::from_data(vec![vec![7.0, 8.0], vec![9.0, 10.0], vec![11.0, 12.0]]).unwrap();
        let c = a.dot(&b).unwrap();
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn multiply_rejects_bad_shapes() {
        let a = sample(2, 3);
        let b = sample(2, 3);
        let mut dst = Matrix::alloc(2, 3).unwrap();
        assert!(matches!(
            multiply(&mut dst, &a, &b),
            Err(NnError::ShapeMismatch { op: "multiply", .. })
        ));

        let b = sample(3, 2);
        assert!(multiply(&mut dst, &a, &b).is_err());
    }

    #[test]
    fn add_accumulates_elementwise() {
        let mut m = sample(2, 2);
        m.add(&sample(2, 2)).unwrap();
        assert_eq!(m.iter().collect::<Vec<_>>(), vec![0.0, 2.0, 4.0, 6.0]);
        assert!(m.add(&sample(1, 2)).is_err());
    }

    #[test]
    fn sigmoid_inplace_maps_zero_to_half() {
        let mut m = Matrix::alloc(1, 3).unwrap();
        m.sigmoid_inplace();
        assert!(m.iter().all(|x| x == 0.5));
    }

    #[test]
    fn append_column_then_reslice_round_trips() {
        let src = sample(3, 2);
        let extra = Matrix::from_data(vec![vec![9.0], vec![8.0], vec![7.0]]).unwrap();
        let mut dst = Matrix::alloc(3, 3).unwrap();
        append_column(&mut dst, &src, &extra).unwrap();

        assert_eq!(dst.view(0, 0, 3, 2).unwrap().to_matrix().unwrap(), src);
        assert_eq!(dst.view(0, 2, 3, 1).unwrap().to_matrix().unwrap(), extra);
    }

    #[test]
    fn append_row_then_reslice_round_trips() {
        let src = sample(2, 3);
        let extra = Matrix::from_data(vec![vec![-1.0, -2.0, -3.0]]).unwrap();
        let mut dst = Matrix::alloc(3, 3).unwrap();
        append_row(&mut dst, &src, &extra).unwrap();

        assert_eq!(dst.view(0, 0, 2, 3).unwrap().to_matrix().unwrap(), src);
        assert_eq!(dst.row(2).unwrap().to_matrix().unwrap(), extra);
    }

    #[test]
    fn append_rejects_wrong_extra_shape() {
        let src = sample(2, 2);
        let mut dst = Matrix::alloc(2, 3).unwrap();
        assert!(append_column(&mut dst, &src, &sample(1, 2)).is_err());
        let mut dst = Matrix::alloc(3, 2).unwrap();
        assert!(append_row(&mut dst, &src, &sample(1, 3)).is_err());
    }

    #[test]
    fn randomize_stays_in_range_and_is_seeded() {
        let mut a = Matrix::alloc(8, 8).unwrap();
        let mut b = Matrix::alloc(8, 8).unwrap();
        a.randomize(-0.5, 0.25, &mut StdRng::seed_from_u64(7));
        b.randomize(-0.5, 0.25, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.iter().all(|x| (-0.5..0.25).contains(&x)));
    }

    #[test]
    fn render_layout() {
        let m = Matrix::from_data(vec![vec![1.0, 2.0]]).unwrap();
        assert_eq!(m.render("m", 2), "  m = [\n      1.000000 2.000000 \n  ]\n");
        assert!(format!("{m}").starts_with("Matrix (1x2) = [\n"));
    }

    proptest! {
        #[test]
        fn multiply_matches_manual_dot(
            (n, k, m) in (1usize..6, 1usize..6, 1usize..6),
            seed in any::<u64>(),
            pick in any::<(usize, usize)>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut a = Matrix::alloc(n, k).unwrap();
            let mut b = Matrix::alloc(k, m).unwrap();
            a.randomize(-2.0, 2.0, &mut rng);
            b.randomize(-2.0, 2.0, &mut rng);

            let c = a.dot(&b).unwrap();
            let (i, j) = (pick.0 % n, pick.1 % m);
            let expected: f64 = (0..k).map(|t| a[(i, t)] * b[(t, j)]).sum();
            assert_abs_diff_eq!(c[(i, j)], expected, epsilon = 1e-12);
        }
    }
}
