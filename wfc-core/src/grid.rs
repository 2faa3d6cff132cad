use wfc_rules::{Direction, MapOptions};

/// Entropy a cell carries before `Prepare` assigns its baseline.
pub const UNSET_ENTROPY: i64 = i64::MAX;

/// Grid position, `x` to the right and `y` downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub const fn manhattan(self, other: Self) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// One grid position and its collapse state.
///
/// Neighbours are stored as indices into the owning [`Grid`], one slot per
/// [`Direction`]; `None` marks the map edge. The slots are fixed once the
/// grid is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub point: Point,
    pub index: usize,
    neighbours: [Option<usize>; 4],
    /// Index of the assigned variant in the generator's pool.
    pub variant: Option<usize>,
    /// Lower collapses sooner.
    pub entropy: i64,
    /// Entropy before any neighbour-driven deduction.
    pub baseline_entropy: i64,
    /// Masked out by an earlier pass: never collapsed, always empty.
    pub unused: bool,
}

impl GridCell {
    #[inline]
    pub const fn is_collapsed(&self) -> bool {
        self.variant.is_some()
    }

    #[inline]
    pub const fn neighbour(&self, direction: Direction) -> Option<usize> {
        self.neighbours[direction.index()]
    }

    /// Existing neighbours with the direction leading to each.
    pub fn neighbours(&self) -> impl Iterator<Item = (Direction, usize)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| self.neighbour(direction).map(|n| (direction, n)))
    }
}

/// Flat arena of cells in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub(crate) cells: Vec<GridCell>,
}

impl Grid {
    /// Builds an uncollapsed grid and wires every cell to its cardinal neighbours.
    pub fn new(width: usize, height: usize) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let point = Point::new(x, y);
                let neighbours = Direction::ALL.map(|direction| {
                    let (dx, dy) = direction.offset();
                    let nx = x.checked_add_signed(dx).filter(|&nx| nx < width)?;
                    let ny = y.checked_add_signed(dy).filter(|&ny| ny < height)?;
                    Some(ny * width + nx)
                });
                cells.push(GridCell {
                    point,
                    index: y * width + x,
                    neighbours,
                    variant: None,
                    entropy: UNSET_ENTROPY,
                    baseline_entropy: UNSET_ENTROPY,
                    unused: false,
                });
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn from_map(map: MapOptions) -> Self {
        Self::new(map.width, map.height)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, index: usize) -> &GridCell {
        &self.cells[index]
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, index: usize) -> &mut GridCell {
        &mut self.cells[index]
    }

    /// Returns the cell at `(x, y)`, or `None` if out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&GridCell> {
        self.index_of(x, y).map(|idx| &self.cells[idx])
    }

    pub fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Cells within Manhattan distance `radius` of `center`, nearest ring first.
    ///
    /// Within one ring the order is clockwise starting from straight up.
    pub fn cells_in_radius(&self, center: usize, radius: usize) -> Vec<usize> {
        let origin = self.cells[center].point;
        let (cx, cy) = (to_isize(origin.x), to_isize(origin.y));
        let mut found = vec![center];
        // Rings past the farthest corner hold no cells.
        let farthest = origin.x.max(self.width - 1 - origin.x)
            + origin.y.max(self.height - 1 - origin.y);
        for distance in 1..=to_isize(radius.min(farthest)) {
            for step in 0..distance {
                // Four edges of the diamond, each walked from its corner.
                let ring = [
                    (step, -distance + step),
                    (distance - step, step),
                    (-step, distance - step),
                    (-distance + step, -step),
                ];
                for (dx, dy) in ring {
                    if let Some(index) = self.signed_index(cx + dx, cy + dy) {
                        found.push(index);
                    }
                }
            }
        }
        found
    }

    fn signed_index(&self, x: isize, y: isize) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.index_of(x, y)
    }
}

fn to_isize(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}
