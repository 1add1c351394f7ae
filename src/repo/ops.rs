// src/repo/ops.rs

//! Fixed binding between named repository operations and command lines.

use std::fmt;

use crate::types::VcsKind;

/// The closed set of operations the pipeline performs on the working copy.
///
/// Arguments are derived only from this variant, the configured VCS and the
/// configured history limit; nothing request-supplied ever reaches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepoOp {
    /// Bounded, graph-annotated history listing.
    ShowLog,
    /// Retrieve remote changes without touching checked-out files.
    Fetch,
    /// Advance checked-out files to the fetched history.
    Update,
}

impl RepoOp {
    pub const ALL: [RepoOp; 3] = [RepoOp::ShowLog, RepoOp::Fetch, RepoOp::Update];

    /// Argument list for this operation.
    pub fn args(self, vcs: VcsKind, log_limit: usize) -> Vec<String> {
        let args: &[&str] = match (vcs, self) {
            (VcsKind::Hg, RepoOp::ShowLog) => &["log", "--graph", "-l"],
            (VcsKind::Hg, RepoOp::Fetch) => &["pull"],
            (VcsKind::Hg, RepoOp::Update) => &["update"],
            (VcsKind::Git, RepoOp::ShowLog) => &["log", "--graph", "-n"],
            (VcsKind::Git, RepoOp::Fetch) => &["fetch"],
            (VcsKind::Git, RepoOp::Update) => &["merge", "--ff-only", "@{upstream}"],
        };

        let mut out: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        if self == RepoOp::ShowLog {
            out.push(log_limit.to_string());
        }
        out
    }
}

impl fmt::Display for RepoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoOp::ShowLog => f.write_str("show-log"),
            RepoOp::Fetch => f.write_str("fetch"),
            RepoOp::Update => f.write_str("update"),
        }
    }
}
