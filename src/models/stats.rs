/// Running min/max/sum/count of one station, all in tenths of a degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationStats {
    pub min: i32,
    pub max: i32,
    pub sum: i64,
    pub count: u64,
}

impl StationStats {
    /// Seed from the first reading of a station.
    pub fn new(reading: i32) -> Self {
        Self {
            min: reading,
            max: reading,
            sum: reading as i64,
            count: 1,
        }
    }

    pub fn add(&mut self, reading: i32) {
        if reading < self.min {
            self.min = reading;
        }
        if reading > self.max {
            self.max = reading;
        }
        self.sum += reading as i64;
        self.count += 1;
    }

    pub fn merge(&mut self, other: &StationStats) {
        if other.min < self.min {
            self.min = other.min;
        }
        if other.max > self.max {
            self.max = other.max;
        }
        self.sum += other.sum;
        self.count += other.count;
    }
}
