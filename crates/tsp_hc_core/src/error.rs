use std::fmt::Write;

use thiserror::Error as ThisError;

use crate::{algo::candidate::InsertionCandidate, geo::edge::Edge};

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error(
        "circuit desynchronized: {candidate} does not match the edge list.\nEDGES:\n{}",
        format_edges(edges)
    )]
    Desync {
        candidate: InsertionCandidate,
        edges: Vec<Edge>,
    },
    #[error("search exhausted: {0}")]
    Exhausted(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn desync(candidate: InsertionCandidate, edges: &[Edge]) -> Self {
        Self::Desync {
            candidate,
            edges: edges.to_vec(),
        }
    }

    pub fn exhausted(message: impl Into<String>) -> Self {
        Self::Exhausted(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

fn format_edges(edges: &[Edge]) -> String {
    let mut out = String::new();
    for (idx, edge) in edges.iter().enumerate() {
        let _ = writeln!(out, "  [{idx}] {edge}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::Error;
    use crate::{
        algo::candidate::InsertionCandidate,
        geo::{arena::VertexId, edge::Edge},
    };

    #[test]
    fn desync_message_lists_candidate_and_edge_snapshot() {
        let edges = vec![
            Edge::new(VertexId(0), VertexId(1), 1.0),
            Edge::new(VertexId(1), VertexId(0), 1.0),
        ];
        let candidate =
            InsertionCandidate::new(VertexId(2), Edge::new(VertexId(0), VertexId(2), 3.0), 0.5);

        let message = Error::desync(candidate, &edges).to_string();

        assert!(message.contains("circuit desynchronized"));
        assert!(message.contains("v2"));
        assert!(message.contains("[0] v0->v1"));
        assert!(message.contains("[1] v1->v0"));
    }

    #[test]
    fn helper_constructors_prefix_messages() {
        assert_eq!(
            Error::invalid_input("bad").to_string(),
            "invalid input: bad"
        );
        assert_eq!(
            Error::invalid_state("twice").to_string(),
            "invalid state: twice"
        );
        assert_eq!(
            Error::exhausted("empty").to_string(),
            "search exhausted: empty"
        );
    }
}
