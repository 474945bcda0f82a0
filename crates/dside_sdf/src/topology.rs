//! Topology matrix: rows are channels, columns are actors, entries are
//! signed firing rates (positive = production, negative = consumption).

/// A dense, row-major topology matrix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topology {
    channels: usize,
    actors: usize,
    data: Vec<i64>,
}

impl Topology {
    /// Build a topology from explicit rows (one `Vec<i64>` per channel).
    ///
    /// # Panics
    ///
    /// Panics if any row's length does not match `actors`, or the number of
    /// rows does not match `channels`.
    #[must_use]
    pub fn from_rows(channels: usize, actors: usize, rows: Vec<Vec<i64>>) -> Self {
        assert_eq!(rows.len(), channels, "row count must match channel count");
        let mut data = Vec::with_capacity(channels * actors);
        for row in rows {
            assert_eq!(row.len(), actors, "row width must match actor count");
            data.extend(row);
        }
        Topology { channels, actors, data }
    }

    #[must_use]
    pub fn zeros(channels: usize, actors: usize) -> Self {
        Topology {
            channels,
            actors,
            data: vec![0; channels * actors],
        }
    }

    #[must_use]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[must_use]
    pub fn actors(&self) -> usize {
        self.actors
    }

    #[must_use]
    pub fn get(&self, channel: usize, actor: usize) -> i64 {
        self.data[channel * self.actors + actor]
    }

    pub fn set(&mut self, channel: usize, actor: usize, value: i64) {
        self.data[channel * self.actors + actor] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_round_trip() {
        let mut t = Topology::zeros(2, 3);
        t.set(1, 2, 7);
        assert_eq!(t.get(1, 2), 7);
        assert_eq!(t.get(0, 0), 0);
    }
}
