//! Turning a user supplied reference into a fetch request.

/// Remote used when a reference does not name one.
pub const DEFAULT_REMOTE: &str = "origin";

/// A reference broken down into the remote to fetch from and a refspec.
///
/// - `origin/master` fetches `master` from `origin` into the remote-tracking
///   ref `refs/remotes/origin/master`, so `origin/master` resolves afterwards.
/// - `master` fetches `master` from [`DEFAULT_REMOTE`] and forces the local
///   branch of the same name to it.
/// - `origin/pull/12/head:pr-12` keeps the explicit destination and is
///   diffed against `pr-12`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRef {
    /// Remote to fetch from.
    pub remote: String,
    /// Refspec handed to the fetch.
    pub refspec: String,
    /// Revision to diff against once the fetch is done.
    pub diff_target: String,
}

impl FetchRef {
    pub fn parse(reference: &str) -> Self {
        let (source, explicit_dst) = match reference.split_once(':') {
            Some((src, dst)) => (src, Some(dst)),
            None => (reference, None),
        };

        let (remote, branch) = match source.split_once('/') {
            Some((remote, branch)) => (remote.to_string(), branch),
            None => (DEFAULT_REMOTE.to_string(), source),
        };

        let src = qualify(branch);
        let (dst, diff_target) = match explicit_dst {
            Some(dst) => (qualify(dst), dst.to_string()),
            None if source.contains('/') => (
                format!("refs/remotes/{remote}/{branch}"),
                reference.to_string(),
            ),
            None => (format!("refs/heads/{branch}"), reference.to_string()),
        };

        Self {
            remote,
            refspec: format!("+{src}:{dst}"),
            diff_target,
        }
    }
}

/// Short branch names become `refs/heads/...`; full refs are kept.
fn qualify(name: &str) -> String {
    if name.starts_with("refs/") {
        name.to_string()
    } else {
        format!("refs/heads/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_remote_and_branch() {
        let fetch = FetchRef::parse("origin/master");
        assert_eq!(fetch.remote, "origin");
        assert_eq!(
            fetch.refspec,
            "+refs/heads/master:refs/remotes/origin/master"
        );
        assert_eq!(fetch.diff_target, "origin/master");
    }

    #[test]
    fn test_branch_only_uses_default_remote() {
        let fetch = FetchRef::parse("12.0");
        assert_eq!(fetch.remote, "origin");
        assert_eq!(fetch.refspec, "+refs/heads/12.0:refs/heads/12.0");
        assert_eq!(fetch.diff_target, "12.0");
    }

    #[test]
    fn test_explicit_destination() {
        let fetch = FetchRef::parse("upstream/refs/pull/12/head:pr-12");
        assert_eq!(fetch.remote, "upstream");
        assert_eq!(fetch.refspec, "+refs/pull/12/head:refs/heads/pr-12");
        assert_eq!(fetch.diff_target, "pr-12");
    }

    #[test]
    fn test_nested_branch_name() {
        let fetch = FetchRef::parse("origin/feature/x");
        assert_eq!(fetch.remote, "origin");
        assert_eq!(
            fetch.refspec,
            "+refs/heads/feature/x:refs/remotes/origin/feature/x"
        );
    }
}
