// File: ./src/ingest/ids.rs
/// Call-scoped id source: a random suffix chosen once per parse plus a
/// monotonic counter. Ids are unique within one parse only.
#[derive(Debug)]
pub struct IdGenerator {
    suffix: String,
    counter: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        let mut rng = fastrand::Rng::new();
        Self {
            suffix: format!("{:08x}", rng.u32(..)),
            counter: 0,
        }
    }

    fn next(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{}-{}-{}", prefix, self.suffix, self.counter)
    }

    pub fn phase_id(&mut self) -> String {
        self.next("phase")
    }

    pub fn task_id(&mut self) -> String {
        self.next("task")
    }

    /// Placeholder uid for a team member who has no account yet.
    pub fn member_uid(&mut self) -> String {
        self.next("pending")
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
