use std::{fmt, path::Path, str::FromStr};

use lazy_regex::regex_captures;

use crate::error::*;

pub use reqwest::Url;

pub type LocalDateTime = chrono::DateTime<chrono::Local>;

/// Contest ids above this are gym contests.
pub const GYM_CONTEST_ID_MIN: u32 = 100_001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ContestClass {
    Contest,
    Gym,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContestId(u32);

impl ContestId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn class(&self) -> ContestClass {
        if self.0 >= GYM_CONTEST_ID_MIN {
            ContestClass::Gym
        } else {
            ContestClass::Contest
        }
    }
}

impl FromStr for ContestId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.parse::<u32>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(Error::InvalidContestId(s.to_owned())),
        }
    }
}

impl fmt::Display for ContestId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A contest, optionally narrowed down to one problem (index such as "C" or "D1").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProblemRef {
    pub contest: ContestId,
    pub index: Option<String>,
}

impl ProblemRef {
    pub fn new(contest: ContestId, index: Option<&str>) -> Self {
        Self {
            contest,
            index: index.map(|s| s.to_uppercase()),
        }
    }

    /// `["1234", "c"]`, `["1234"]`
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let Some(contest) = args.first() else {
            return Err(Error::InvalidContestId(String::new()));
        };
        let contest = contest.as_ref().parse()?;
        let index = args.get(1).map(AsRef::as_ref);
        Ok(Self::new(contest, index))
    }

    /// `https://codeforces.com/contest/1234/problem/C`,
    /// `https://codeforces.com/gym/101234`,
    /// `https://codeforces.com/problemset/problem/1234/C`
    pub fn from_url(url: &Url) -> Result<Self> {
        let path = url.path().trim_end_matches('/');
        if let Some((_, _, id, index)) =
            regex_captures!(r"^/(contest|gym)/(\d+)(?:/problem/([[:alnum:]]+))?$", path)
        {
            let index = (!index.is_empty()).then_some(index);
            return Ok(Self::new(id.parse()?, index));
        }
        if let Some((_, id, index)) =
            regex_captures!(r"^/problemset/problem/(\d+)/([[:alnum:]]+)$", path)
        {
            return Ok(Self::new(id.parse()?, Some(index)));
        }
        Err(Error::NotContestUrl(url.to_owned()))
    }

    /// Finds the last `contest/<id>[/<problem>]` or `gym/<id>[/<problem>]`
    /// sequence in a workspace path such as `~/cf/contest/1234/c`.
    pub fn from_workspace_path(path: impl AsRef<Path>) -> Option<Self> {
        let parts: Vec<String> = path
            .as_ref()
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        (0..parts.len()).rev().find_map(|i| {
            ContestClass::from_str(&parts[i]).ok()?;
            let contest: ContestId = parts.get(i + 1)?.parse().ok()?;
            Some(Self::new(contest, parts.get(i + 2).map(String::as_str)))
        })
    }

    pub fn contest_class(&self) -> ContestClass {
        self.contest.class()
    }
}

impl fmt::Display for ProblemRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.index {
            Some(index) => write!(f, "{}{}", self.contest, index),
            None => write!(f, "{}", self.contest),
        }
    }
}

/// One row of the submission list, already decoded from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: u64,
    pub when: LocalDateTime,
    pub problem_index: String,
    pub problem_name: String,
    pub lang: String,
    /// e.g. "Accepted", "Wrong answer on test 3", "Running on test 7"
    pub verdict: String,
    pub is_waiting: bool,
    pub time_ms: u64,
    pub memory_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveState {
    Accepted,
    Rejected,
    Untried,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemStanding {
    pub index: String,
    pub name: String,
    pub state: SolveState,
    pub rejected_attempts: u32,
}
