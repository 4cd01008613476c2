//! ## Custom Errors
//!
//! This module defines the errors surfaced by the clustering core.

use std::error::Error;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors surfaced by [`crate::cluster::cluster`] and the k-d tree.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug)]
pub enum ClusterError {
    /// A precondition on the arguments to `cluster` was violated: a
    /// non-positive `eps`, a zero `min_pts`, a non-finite coordinate, or a
    /// point whose `cluster_id` was not `0` on entry.
    InvalidArgument(String),
    /// An operation the static k-d tree does not implement (dynamic insert
    /// or delete) was invoked.
    NotSupported(&'static str),
    /// An internal allocation or subsystem failure aborted the call. The
    /// caller's points array is left partially labeled; its contents must be
    /// treated as undefined.
    InternalError(String),
}

impl fmt::Display for ClusterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterError::InvalidArgument(reason) => {
                write!(f, "invalid argument: {reason}")
            }
            ClusterError::NotSupported(operation) => {
                write!(f, "not supported: {operation}")
            }
            ClusterError::InternalError(reason) => {
                write!(f, "internal error: {reason}")
            }
        }
    }
}

impl Error for ClusterError {}
