use glam::IVec2;

/// Iterable square range of chunks.
///
/// The chunks are iterated row-by-row, for example: (1, 1) -> (2, 1) ->
/// (1, 2) -> (2, 2).
pub(crate) struct ChunkRange {
    a: IVec2,
    b: IVec2,
    x: i32,
    z: i32,
    exhausted: bool,
}

impl ChunkRange {
    /// Creates the square range spanning `radius` chunks in every direction
    /// around `center`, i.e. `(2 * radius + 1)²` chunks in total.
    pub(crate) fn around(center: IVec2, radius: i32) -> Self {
        Self::new(center - IVec2::splat(radius), center + IVec2::splat(radius))
    }

    /// # Arguments
    ///
    /// * `a` - inclusive range start.
    ///
    /// * `b` - inclusive range end.
    fn new(a: IVec2, b: IVec2) -> Self {
        Self {
            a,
            b,
            x: a.x,
            z: a.y,
            exhausted: a.cmpgt(b).any(),
        }
    }
}

impl Iterator for ChunkRange {
    type Item = IVec2;

    fn next(&mut self) -> Option<IVec2> {
        if self.exhausted {
            return None;
        }

        let next = Some(IVec2::new(self.x, self.z));
        if self.x == self.b.x {
            if self.z == self.b.y {
                self.exhausted = true;
            } else {
                self.x = self.a.x;
                self.z += 1;
            }
        } else {
            self.x += 1;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_around() {
        let chunks: Vec<IVec2> = ChunkRange::around(IVec2::new(-1, 3), 1).collect();
        assert_eq!(
            chunks,
            vec![
                IVec2::new(-2, 2),
                IVec2::new(-1, 2),
                IVec2::new(0, 2),
                IVec2::new(-2, 3),
                IVec2::new(-1, 3),
                IVec2::new(0, 3),
                IVec2::new(-2, 4),
                IVec2::new(-1, 4),
                IVec2::new(0, 4),
            ]
        );
    }

    #[test]
    fn test_zero_radius() {
        let chunks: Vec<IVec2> = ChunkRange::around(IVec2::new(7, -9), 0).collect();
        assert_eq!(chunks, vec![IVec2::new(7, -9)]);
    }
}
