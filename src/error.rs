// Copyright 2025 Lars Brubaker
// License: MIT
//
// Error types for triangulation and path search.

use thiserror::Error;

use crate::geom::{Point, Real};

/// Broad classification of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input polygon cannot be triangulated as given.
    MalformedInput,
    /// A mesh or front invariant was violated mid-sweep.
    Topology,
    /// No path connects the resolved start and goal.
    Search,
    /// A query point lies in no triangle of the mesh.
    Lookup,
    /// A configured work budget ran out.
    Aborted,
    /// Reading or parsing external data failed.
    Io,
}

impl ErrorKind {
    /// Search and lookup failures are ordinary outcomes; everything else
    /// means the requested operation was abandoned.
    pub fn is_recoverable(self) -> bool {
        matches!(self, ErrorKind::Search | ErrorKind::Lookup)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("degenerate edge: repeated point ({x}, {y})")]
    DegenerateEdge { x: Real, y: Real },

    #[error("duplicate point ({x}, {y})")]
    DuplicatePoint { x: Real, y: Real },

    #[error("polygon ring needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    #[error("non-finite coordinate ({x}, {y})")]
    InvalidCoordinate { x: Real, y: Real },

    #[error("intersecting constraints at {}", fmt_points(.points))]
    IntersectingConstraints { points: [Point; 4] },

    #[error("collinear points not supported: {}", fmt_points(.points))]
    Collinear { points: [Point; 3] },

    #[error("missing neighbor triangle across {}", fmt_points(.edge))]
    MissingNeighbor { edge: [Point; 2] },

    #[error("triangles {0} and {1} are not contiguous")]
    NotContiguous(u32, u32),

    #[error("advancing front ended unexpectedly at ({x}, {y})")]
    FrontExhausted { x: Real, y: Real },

    #[error("topology error: {0}")]
    Topology(String),

    #[error("no path between triangles {start} and {goal}")]
    NoPath { start: u32, goal: u32 },

    #[error("path search gave up after expanding {0} nodes")]
    SearchLimitExceeded(usize),

    #[error("point ({x}, {y}) is outside the mesh")]
    PointOutsideMesh { x: Real, y: Real },

    #[error("triangulation aborted after {0} steps")]
    StepLimitExceeded(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DegenerateEdge { .. }
            | Error::DuplicatePoint { .. }
            | Error::TooFewPoints(_)
            | Error::InvalidCoordinate { .. }
            | Error::IntersectingConstraints { .. }
            | Error::Collinear { .. } => ErrorKind::MalformedInput,
            Error::MissingNeighbor { .. }
            | Error::NotContiguous(..)
            | Error::FrontExhausted { .. }
            | Error::Topology(_) => ErrorKind::Topology,
            Error::NoPath { .. } | Error::SearchLimitExceeded(_) => ErrorKind::Search,
            Error::PointOutsideMesh { .. } => ErrorKind::Lookup,
            Error::StepLimitExceeded(_) => ErrorKind::Aborted,
            Error::Io(_) | Error::Parse { .. } | Error::Config(_) => ErrorKind::Io,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

fn fmt_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("({:.4}, {:.4})", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

pub type Result<T> = std::result::Result<T, Error>;
