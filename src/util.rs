/// Fixed-size row-major grid, addressed by `(row, col)`
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Array2d<T: Default + Copy> {
    rows: usize,
    cols: usize,
    vec: Vec<T>,
}

impl<T: Default + Copy> Array2d<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            vec: vec![T::default(); rows * cols],
        }
    }

    fn position(&self, row: usize, col: usize) -> usize {
        assert!(row < self.rows, "row {} out of bounds", row);
        assert!(col < self.cols, "column {} out of bounds", col);

        row * self.cols + col
    }

    pub fn get(&self, row: usize, col: usize) -> T {
        self.vec[self.position(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let position = self.position(row, col);
        self.vec[position] = value;
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        let position = self.position(row, col);
        &mut self.vec[position]
    }

    /// All cells in row-major order, with their coordinates
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        let cols = self.cols;
        self.vec
            .iter()
            .enumerate()
            .map(move |(i, &value)| (i / cols, i % cols, value))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
}
