#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationStats {
    pub total: usize,
    pub unknown: usize,
    pub provinces: usize,
    pub buckets: usize,
}

impl ClassificationStats {
    pub fn resolved(&self) -> usize {
        self.total - self.unknown
    }
}
