//! Key-level settings diff (backups) and line diff (theme file versions).

use crate::contract::FlatSettings;

/// The status of an item in a diff comparison.
///
/// - `Added`     -- present only in the new side.
/// - `Removed`   -- present only in the old side.
/// - `Changed`   -- present in both sides with different values.
/// - `Unchanged` -- present in both sides with identical values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffStatus {
    Added,
    Removed,
    Changed,
    Unchanged,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
        }
    }
}

impl std::fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One key of a settings comparison
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDiff {
    pub key: String,
    pub status: DiffStatus,
    pub old_value: Option<serde_json::Value>,
    pub new_value: Option<serde_json::Value>,
}

/// Compare two flattened settings maps, ordered by key
pub fn diff_settings(old: &FlatSettings, new: &FlatSettings) -> Vec<SettingDiff> {
    let mut keys: Vec<&String> = old.keys().chain(new.keys()).collect();
    keys.sort();
    keys.dedup();

    keys.into_iter()
        .map(|key| {
            let (old_value, new_value) = (old.get(key), new.get(key));
            let status = match (old_value, new_value) {
                (None, Some(_)) => DiffStatus::Added,
                (Some(_), None) => DiffStatus::Removed,
                (Some(a), Some(b)) if a == b => DiffStatus::Unchanged,
                _ => DiffStatus::Changed,
            };
            SettingDiff {
                key: key.clone(),
                status,
                old_value: old_value.cloned(),
                new_value: new_value.cloned(),
            }
        })
        .collect()
}

/// One line of a file diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiff {
    pub status: DiffStatus,
    pub text: String,
}

/// Files above this many lines on either side are diffed as a whole replacement
pub const MAX_DIFF_LINES: usize = 4000;

/// Line diff based on the longest common subsequence. `Changed` is not produced; a
/// modified line shows up as `Removed` followed by `Added`.
pub fn diff_lines(old: &str, new: &str) -> Vec<LineDiff> {
    let a: Vec<&str> = old.lines().collect();
    let b: Vec<&str> = new.lines().collect();

    if a.len() > MAX_DIFF_LINES || b.len() > MAX_DIFF_LINES {
        return a
            .iter()
            .map(|line| line_diff(DiffStatus::Removed, line))
            .chain(b.iter().map(|line| line_diff(DiffStatus::Added, line)))
            .collect();
    }

    // lcs[i][j] = LCS length of a[i..] and b[j..]
    let mut lcs = vec![vec![0u32; b.len() + 1]; a.len() + 1];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut out = Vec::with_capacity(a.len().max(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            out.push(line_diff(DiffStatus::Unchanged, a[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            out.push(line_diff(DiffStatus::Removed, a[i]));
            i += 1;
        } else {
            out.push(line_diff(DiffStatus::Added, b[j]));
            j += 1;
        }
    }
    out.extend(a[i..].iter().map(|line| line_diff(DiffStatus::Removed, line)));
    out.extend(b[j..].iter().map(|line| line_diff(DiffStatus::Added, line)));
    out
}

fn line_diff(status: DiffStatus, text: &str) -> LineDiff {
    LineDiff {
        status,
        text: text.to_string(),
    }
}
