//! Git location decomposition.
//!
//! Splits the path of an `ssh` endpoint (`acme/widgets.git?ref=2.1.0//modules`)
//! into owner, repository, ref and subpath with a single named-group pattern.
//! Input that does not match yields an all-empty [`GitLocation`] rather than
//! an error.

use crate::types::GitLocation;
use regex::Regex;
use std::sync::LazyLock;

// owner/reponame.git[?][ref=REF][//path]
// REF is a one-to-three segment numeric/wildcard version, or a bare word.
// Word and digit classes are ASCII-only. The `.` before `git` matches any character.
static GIT_LOCATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<owner>[0-9A-Za-z_]+)/(?P<reponame>[0-9A-Za-z_]+.git)\??(ref=(?P<ref>(([0-9]+\.)?([0-9]+\.)?(\*|[0-9]+))|[0-9A-Za-z_]+))?(//(?P<path>[0-9A-Za-z_/]+))?",
    )
    .expect("Invalid regex")
});

/// Decompose an ssh endpoint path into its git components.
///
/// # Examples
///
/// ```rust
/// use modsource::resolver::split_git_location;
///
/// let location = split_git_location("acme/widgets.git?ref=2.1.0//modules/net");
/// assert_eq!(location.owner, "acme");
/// assert_eq!(location.repository, "widgets.git");
/// assert_eq!(location.ref_, "2.1.0");
/// assert_eq!(location.subpath, "modules/net");
/// ```
#[must_use]
pub fn split_git_location(path: &str) -> GitLocation {
    let Some(caps) = GIT_LOCATION_PATTERN.captures(path) else {
        tracing::debug!(path = %path, "Path does not look like owner/repo.git, leaving git location empty");
        return GitLocation::default();
    };

    let group = |name: &str| caps.name(name).map(|m| m.as_str().to_string()).unwrap_or_default();
    let location = GitLocation {
        owner: group("owner"),
        repository: group("reponame"),
        ref_: group("ref"),
        subpath: group("path"),
    };

    tracing::debug!(?location, "Decomposed git location");
    location
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn location(owner: &str, repository: &str, ref_: &str, subpath: &str) -> GitLocation {
        GitLocation {
            owner: owner.to_string(),
            repository: repository.to_string(),
            ref_: ref_.to_string(),
            subpath: subpath.to_string(),
        }
    }

    #[test]
    fn test_full_location_with_host_prefix() {
        assert_eq!(
            split_git_location("git@example.com:acme/widgets.git?ref=2.1.0//modules/net"),
            location("acme", "widgets.git", "2.1.0", "modules/net")
        );
    }

    #[test_case("acme/widgets.git", location("acme", "widgets.git", "", "") ; "repository only")]
    #[test_case("acme/widgets.git?ref=1.2.0", location("acme", "widgets.git", "1.2.0", "") ; "semver ref")]
    #[test_case("acme/widgets.git?ref=2.1", location("acme", "widgets.git", "2.1", "") ; "two segment ref")]
    #[test_case("acme/widgets.git?ref=1.*", location("acme", "widgets.git", "1.*", "") ; "wildcard ref")]
    #[test_case("acme/widgets.git?ref=main", location("acme", "widgets.git", "main", "") ; "branch ref")]
    #[test_case("acme/widgets.git//vpc", location("acme", "widgets.git", "", "vpc") ; "subpath without ref")]
    #[test_case("/acme/widgets.git?ref=3//net", location("acme", "widgets.git", "3", "net") ; "ssh url path")]
    fn test_split(path: &str, expected: GitLocation) {
        assert_eq!(split_git_location(path), expected);
    }

    #[test]
    fn test_word_ref_stops_at_first_dot() {
        // a leading `v` rules out the numeric form, the word form has no dots
        let parsed = split_git_location("acme/widgets.git?ref=v1.0.0");
        assert_eq!(parsed.ref_, "v1");
        assert_eq!(parsed.subpath, "");
    }

    #[test]
    fn test_repository_without_git_suffix_does_not_match() {
        assert!(split_git_location("acme/widgets?ref=1.0.0").is_empty());
    }

    #[test]
    fn test_hyphenated_owner_matches_only_the_word_tail() {
        let parsed = split_git_location("my-org/network.git");
        assert_eq!(parsed.owner, "org");
        assert_eq!(parsed.repository, "network.git");
    }

    #[test]
    fn test_hyphenated_repository_does_not_match() {
        assert!(split_git_location("acme/my-repo.git").is_empty());
    }

    #[test]
    fn test_non_ascii_letters_are_not_word_characters() {
        let parsed = split_git_location("äcme/widgets.git?ref=1.0");
        assert_eq!(parsed, location("cme", "widgets.git", "1.0", ""));

        // `ï` breaks the repository name before the `.git` suffix
        assert_eq!(split_git_location("acme/wïdgets.git"), GitLocation::default());
    }

    #[test]
    fn test_non_ascii_digits_are_not_ref_digits() {
        // Arabic-Indic `١` is neither an ASCII digit nor an ASCII word character
        let parsed = split_git_location("acme/widgets.git?ref=\u{661}");
        assert_eq!(parsed.owner, "acme");
        assert_eq!(parsed.repository, "widgets.git");
        assert_eq!(parsed.ref_, "");
    }

    #[test_case("" ; "empty")]
    #[test_case("no structure here" ; "free text")]
    #[test_case("registry.terraform.io" ; "host only")]
    fn test_non_matching_input_is_all_empty(path: &str) {
        assert_eq!(split_git_location(path), GitLocation::default());
    }
}
