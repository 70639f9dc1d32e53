use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use crate::{
    Error, Result,
    geo::point::{Point2d, Point3d},
};

/// Parsed input points. Every token in one input shares a dimension.
#[derive(Clone, Debug, PartialEq)]
pub enum PointSet {
    Planar(Vec<Point2d>),
    Spatial(Vec<Point3d>),
}

impl PointSet {
    pub fn len(&self) -> usize {
        match self {
            Self::Planar(points) => points.len(),
            Self::Spatial(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimension(&self) -> usize {
        match self {
            Self::Planar(_) => 2,
            Self::Spatial(_) => 3,
        }
    }
}

/// Reads points from `path`, or stdin when `None`.
pub fn read_points(path: Option<&Path>) -> Result<PointSet> {
    let raw = match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            Error::invalid_input(format!("failed to read input file {}: {e}", path.display()))
        })?,
        None => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw)?;
            raw
        }
    };
    parse_points(&raw)
}

/// Parses whitespace separated `x,y` or `x,y,z` tokens.
pub fn parse_points(input: &str) -> Result<PointSet> {
    let mut planar = Vec::new();
    let mut spatial = Vec::new();
    let mut dimension = None;

    for (idx, tok) in input.split_whitespace().enumerate() {
        let token_no = idx + 1;
        let coords = tok
            .split(',')
            .map(|field| parse_coordinate(token_no, field))
            .collect::<Result<Vec<f64>>>()?;

        match coords.as_slice() {
            [x, y] => planar.push(Point2d::new(*x, *y)),
            [x, y, z] => spatial.push(Point3d::new(*x, *y, *z)),
            _ => {
                return Err(Error::invalid_input(format!(
                    "Token {token_no}: expected 'x,y' or 'x,y,z' but got {} fields: {tok}",
                    coords.len()
                )));
            }
        }

        let len = coords.len();
        if let Some(dim) = dimension.filter(|dim| *dim != len) {
            return Err(Error::invalid_input(format!(
                "Token {token_no}: has {len} coordinates but earlier tokens have {dim}"
            )));
        }
        dimension = Some(len);
    }

    match dimension {
        None => Err(Error::invalid_input("No points provided.")),
        Some(2) => Ok(PointSet::Planar(planar)),
        Some(_) => Ok(PointSet::Spatial(spatial)),
    }
}

fn parse_coordinate(token_no: usize, field: &str) -> Result<f64> {
    let value: f64 = field.parse().map_err(|_| {
        Error::invalid_input(format!("Token {token_no}: invalid coordinate: {field}"))
    })?;
    if !value.is_finite() {
        return Err(Error::invalid_input(format!(
            "Token {token_no}: coordinate must be finite: {field}"
        )));
    }
    Ok(value)
}
