/// Logical name of a cached remote resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Tasks,
    Projects,
}

impl QueryKey {
    pub fn name(self) -> &'static str {
        match self {
            QueryKey::Tasks => "tasks",
            QueryKey::Projects => "projects",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

/// Cache entry for one resource.
///
/// `generation` grows on every fetch and every local write. A fetch result is
/// only accepted while its generation is still the entry's current one.
#[derive(Debug, Clone)]
pub struct QueryState<T> {
    data: Option<T>,
    status: QueryStatus,
    generation: u64,
    stale: bool,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            status: QueryStatus::Idle,
            generation: 0,
            stale: true,
        }
    }
}

impl<T> QueryState<T> {
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn status(&self) -> &QueryStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    /// Loading with nothing cached to show in the meantime.
    pub fn is_initial_load(&self) -> bool {
        self.data.is_none() && matches!(self.status, QueryStatus::Idle | QueryStatus::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            QueryStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    pub(crate) fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.status = QueryStatus::Loading;
        self.generation
    }

    pub(crate) fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Apply a fetch result. Returns false when a newer fetch or local write
    /// has superseded it.
    pub(crate) fn resolve<E: ToString>(&mut self, generation: u64, result: Result<T, E>) -> bool {
        if generation != self.generation {
            return false;
        }
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.status = QueryStatus::Success;
                self.stale = false;
            }
            Err(e) => {
                // Keep showing the last good data under the error.
                self.status = QueryStatus::Error(e.to_string());
            }
        }
        true
    }

    /// Mutable access that leaves the generation alone, for re-applying
    /// local edits on top of freshly resolved data.
    pub(crate) fn data_mut(&mut self) -> Option<&mut T> {
        self.data.as_mut()
    }

    /// Local write. Supersedes any fetch that is still in flight.
    pub(crate) fn update_data(&mut self, f: impl FnOnce(&mut T)) -> bool {
        let Some(data) = self.data.as_mut() else {
            return false;
        };
        f(data);
        self.generation += 1;
        if self.status == QueryStatus::Loading {
            self.status = QueryStatus::Success;
        }
        true
    }
}
