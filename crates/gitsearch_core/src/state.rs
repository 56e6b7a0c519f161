/// Token identifying one search; results carrying an older value are stale.
pub type Generation = u64;

/// Profile fields returned by the profile lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Profile {
    pub avatar_url: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    /// Declared number of related records (public repositories).
    pub total_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileData {
    pub identifier: String,
    pub avatar_url: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub total_count: u32,
    pub records: Vec<Record>,
    /// Number of record pages merged into `records`; stays 0 for a user with no records.
    pub cursor: u32,
}

impl ProfileData {
    pub(crate) fn new(identifier: String, profile: Profile) -> Self {
        Self {
            identifier,
            avatar_url: profile.avatar_url,
            name: profile.name,
            email: profile.email,
            bio: profile.bio,
            total_count: profile.total_count,
            records: Vec::new(),
            cursor: 0,
        }
    }

    pub fn has_more(&self) -> bool {
        (self.records.len() as u64) < u64::from(self.total_count)
    }

    /// Appends one page in order and advances the cursor. Records beyond the declared
    /// total are dropped so `records.len() <= total_count` holds.
    pub(crate) fn merge_page(&mut self, mut page: Vec<Record>) {
        let room = (self.total_count as usize).saturating_sub(self.records.len());
        page.truncate(room);
        self.records.extend(page);
        self.cursor += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    NotFound,
    Failed,
    Loaded(ProfileData),
}

impl FetchState {
    pub fn loaded(&self) -> Option<&ProfileData> {
        match self {
            FetchState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}
