//! Status reported by graph nodes.

/// The execution state of a node.
///
/// # Lifecycle
///
/// A node moves `Uninitialized → Running | Waiting → Success | Failure`.
/// `Success` and `Failure` are terminal until the node is started again.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Status {
    /// The node has not been started, or was ended before it finished.
    #[default]
    Uninitialized,

    /// The node is doing work of its own and is updated every tick.
    Running,

    /// The node is running but blocked on one or more children.
    Waiting,

    /// The node completed successfully.
    Success,

    /// The node failed, or could not run because it was misconfigured.
    Failure,
}

impl Status {
    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Returns `true` for `Success` and `Failure`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Success | Status::Failure)
    }

    /// Returns `true` for `Running` and `Waiting`, the states the graph
    /// keeps updating.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, Status::Running | Status::Waiting)
    }

    /// Swaps `Success` and `Failure`; every other status is returned as is.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_and_active_are_disjoint() {
        for status in [
            Status::Uninitialized,
            Status::Running,
            Status::Waiting,
            Status::Success,
            Status::Failure,
        ] {
            assert!(!(status.is_terminal() && status.is_active()));
        }
        assert!(!Status::Uninitialized.is_terminal());
        assert!(!Status::Uninitialized.is_active());
    }

    #[test]
    fn invert_only_touches_terminal_states() {
        assert_eq!(Status::Success.invert(), Status::Failure);
        assert_eq!(Status::Failure.invert(), Status::Success);
        assert_eq!(Status::Waiting.invert(), Status::Waiting);
    }

    #[test]
    fn parses_snake_case_names() {
        assert_eq!("waiting".parse::<Status>(), Ok(Status::Waiting));
        assert_eq!(Status::Uninitialized.to_string(), "uninitialized");
    }
}
